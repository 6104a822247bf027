pub mod credit_card;
pub mod loan;
