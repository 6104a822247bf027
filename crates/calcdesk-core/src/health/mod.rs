pub mod tdee;
