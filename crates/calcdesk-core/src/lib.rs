pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "lending")]
pub mod lending;

#[cfg(feature = "retirement")]
pub mod retirement;

#[cfg(feature = "health")]
pub mod health;

#[cfg(feature = "math")]
pub mod math;

#[cfg(feature = "physics")]
pub mod physics;

pub use error::CalcError;
pub use types::*;

/// Standard result type for all calculator operations
pub type CalcResult<T> = Result<T, CalcError>;
