//! Physics calculators. These run in `f64`: SI constants such as the
//! Boltzmann constant sit below the smallest scale `Decimal` can hold.

pub mod momentum;
pub mod particle;
pub mod statistical_mechanics;
