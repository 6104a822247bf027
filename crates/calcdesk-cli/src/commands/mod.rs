pub mod health;
pub mod lending;
pub mod math;
pub mod physics;
pub mod projection;
pub mod retirement;
