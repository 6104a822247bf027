//! Linear momentum, impulse and one-dimensional collisions (SI units).

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_float_metadata, ComputationOutput};
use crate::CalcResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// kg
    pub mass: f64,
    /// m/s, signed along the line of motion
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Elastic,
    PerfectlyInelastic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MomentumInput {
    /// p = m v and kinetic energy for one body.
    Single(Body),
    /// Impulse J = F Δt and the resulting velocity change.
    Impulse { body: Body, force: f64, duration: f64 },
    /// Head-on collision of two bodies.
    Collision { a: Body, b: Body, kind: CollisionKind },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyState {
    pub velocity: f64,
    pub momentum: f64,
    pub kinetic_energy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MomentumOutput {
    Single(BodyState),
    Impulse {
        impulse: f64,
        before: BodyState,
        after: BodyState,
    },
    Collision {
        a_after: BodyState,
        b_after: BodyState,
        total_momentum: f64,
        kinetic_energy_before: f64,
        kinetic_energy_after: f64,
        kinetic_energy_lost: f64,
    },
}

impl Body {
    fn state(self) -> BodyState {
        BodyState {
            velocity: self.velocity,
            momentum: self.mass * self.velocity,
            kinetic_energy: 0.5 * self.mass * self.velocity * self.velocity,
        }
    }
}

pub fn calculate_momentum(input: &MomentumInput) -> CalcResult<ComputationOutput<MomentumOutput>> {
    let start = Instant::now();

    let (output, methodology) = match *input {
        MomentumInput::Single(body) => {
            check_body(&body, "mass")?;
            (MomentumOutput::Single(body.state()), "p = m v, KE = m v^2 / 2")
        }
        MomentumInput::Impulse {
            body,
            force,
            duration,
        } => {
            check_body(&body, "mass")?;
            if !duration.is_finite() || duration <= 0.0 {
                return Err(CalcError::invalid("duration", "Duration must be > 0"));
            }
            if !force.is_finite() {
                return Err(CalcError::invalid("force", "Force must be finite"));
            }
            let impulse = force * duration;
            let after = Body {
                mass: body.mass,
                velocity: body.velocity + impulse / body.mass,
            };
            (
                MomentumOutput::Impulse {
                    impulse,
                    before: body.state(),
                    after: after.state(),
                },
                "J = F Δt = Δp",
            )
        }
        MomentumInput::Collision { a, b, kind } => {
            check_body(&a, "a.mass")?;
            check_body(&b, "b.mass")?;
            let total_mass = a.mass + b.mass;
            let total_momentum = a.mass * a.velocity + b.mass * b.velocity;

            let (va, vb) = match kind {
                CollisionKind::Elastic => (
                    ((a.mass - b.mass) * a.velocity + 2.0 * b.mass * b.velocity) / total_mass,
                    ((b.mass - a.mass) * b.velocity + 2.0 * a.mass * a.velocity) / total_mass,
                ),
                CollisionKind::PerfectlyInelastic => {
                    let v = total_momentum / total_mass;
                    (v, v)
                }
            };

            let a_after = Body { velocity: va, ..a }.state();
            let b_after = Body { velocity: vb, ..b }.state();
            let ke_before = a.state().kinetic_energy + b.state().kinetic_energy;
            let ke_after = a_after.kinetic_energy + b_after.kinetic_energy;

            let methodology = match kind {
                CollisionKind::Elastic => "1-D elastic collision (momentum and KE conserved)",
                CollisionKind::PerfectlyInelastic => {
                    "1-D perfectly inelastic collision (bodies stick together)"
                }
            };
            (
                MomentumOutput::Collision {
                    a_after,
                    b_after,
                    total_momentum,
                    kinetic_energy_before: ke_before,
                    kinetic_energy_after: ke_after,
                    kinetic_energy_lost: (ke_before - ke_after).max(0.0),
                },
                methodology,
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_float_metadata(methodology, input, Vec::new(), elapsed, output))
}

fn check_body(body: &Body, field: &str) -> CalcResult<()> {
    if !body.mass.is_finite() || body.mass <= 0.0 {
        return Err(CalcError::invalid(field, "Mass must be > 0"));
    }
    if !body.velocity.is_finite() {
        return Err(CalcError::invalid(field, "Velocity must be finite"));
    }
    Ok(())
}
