pub mod life_tables;
pub mod rmd;
pub mod savings;
