pub mod matrix;
pub mod percent_error;
pub mod primes;
pub mod slope;
pub mod surface_area;
