//! Special-relativistic kinematics in natural units (GeV, c = 1) plus SI speed.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_float_metadata, ComputationOutput};
use crate::CalcResult;

/// Speed of light, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParticleInput {
    /// Kinematics of a particle of rest mass `mass_gev` moving at `velocity` m/s.
    Kinematics {
        mass_gev: f64,
        velocity: f64,
        /// Proper lifetime in seconds, for time dilation and decay length.
        #[serde(default)]
        proper_lifetime: Option<f64>,
    },
    /// Momentum of either daughter in the rest frame of a parent decaying to two bodies.
    TwoBodyDecay {
        parent_mass_gev: f64,
        daughter1_mass_gev: f64,
        daughter2_mass_gev: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicsOutput {
    pub beta: f64,
    pub gamma: f64,
    /// GeV/c
    pub momentum_gev: f64,
    pub rest_energy_gev: f64,
    pub total_energy_gev: f64,
    pub kinetic_energy_gev: f64,
    pub rapidity: f64,
    /// Lab-frame lifetime in seconds, when a proper lifetime was given.
    pub dilated_lifetime: Option<f64>,
    /// Mean distance travelled before decay, metres.
    pub decay_length: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoBodyDecayOutput {
    pub momentum_gev: f64,
    pub daughter1_energy_gev: f64,
    pub daughter2_energy_gev: f64,
    /// Kinetic energy released, M - m1 - m2.
    pub q_value_gev: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParticleOutput {
    Kinematics(KinematicsOutput),
    TwoBodyDecay(TwoBodyDecayOutput),
}

pub fn calculate_particle(input: &ParticleInput) -> CalcResult<ComputationOutput<ParticleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (output, methodology) = match *input {
        ParticleInput::Kinematics {
            mass_gev,
            velocity,
            proper_lifetime,
        } => {
            let out = kinematics(mass_gev, velocity, proper_lifetime)?;
            if out.gamma > 1e6 {
                warnings.push(format!(
                    "Ultra-relativistic: gamma = {:.3e}, results are sensitive to rounding in v",
                    out.gamma
                ));
            }
            (
                ParticleOutput::Kinematics(out),
                "Lorentz factor gamma = 1/sqrt(1 - beta^2), E = gamma m, p = gamma beta m",
            )
        }
        ParticleInput::TwoBodyDecay {
            parent_mass_gev,
            daughter1_mass_gev,
            daughter2_mass_gev,
        } => (
            ParticleOutput::TwoBodyDecay(two_body_decay(
                parent_mass_gev,
                daughter1_mass_gev,
                daughter2_mass_gev,
            )?),
            "Two-body decay: p = sqrt(lambda(M^2, m1^2, m2^2)) / 2M",
        ),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_float_metadata(methodology, input, warnings, elapsed, output))
}

fn kinematics(
    mass_gev: f64,
    velocity: f64,
    proper_lifetime: Option<f64>,
) -> CalcResult<KinematicsOutput> {
    if !mass_gev.is_finite() || mass_gev < 0.0 {
        return Err(CalcError::invalid("mass_gev", "Mass must be >= 0"));
    }
    if !velocity.is_finite() || velocity.abs() >= SPEED_OF_LIGHT {
        return Err(CalcError::invalid(
            "velocity",
            "Speed must be below the speed of light",
        ));
    }
    if let Some(tau) = proper_lifetime {
        if !tau.is_finite() || tau < 0.0 {
            return Err(CalcError::invalid(
                "proper_lifetime",
                "Lifetime must be >= 0",
            ));
        }
    }

    let beta = velocity / SPEED_OF_LIGHT;
    let gamma = 1.0 / (1.0 - beta * beta).sqrt();
    let total_energy = gamma * mass_gev;

    Ok(KinematicsOutput {
        beta,
        gamma,
        momentum_gev: gamma * beta * mass_gev,
        rest_energy_gev: mass_gev,
        total_energy_gev: total_energy,
        kinetic_energy_gev: (gamma - 1.0) * mass_gev,
        rapidity: beta.atanh(),
        dilated_lifetime: proper_lifetime.map(|tau| gamma * tau),
        decay_length: proper_lifetime.map(|tau| gamma * beta.abs() * SPEED_OF_LIGHT * tau),
    })
}

fn two_body_decay(parent: f64, m1: f64, m2: f64) -> CalcResult<TwoBodyDecayOutput> {
    for (field, m) in [
        ("parent_mass_gev", parent),
        ("daughter1_mass_gev", m1),
        ("daughter2_mass_gev", m2),
    ] {
        if !m.is_finite() || m < 0.0 {
            return Err(CalcError::invalid(field, "Mass must be >= 0"));
        }
    }
    if parent <= 0.0 {
        return Err(CalcError::invalid("parent_mass_gev", "Parent mass must be > 0"));
    }
    if m1 + m2 > parent {
        return Err(CalcError::Infeasible(format!(
            "decay is kinematically forbidden: {m1} + {m2} > {parent} GeV"
        )));
    }

    // Källén function, clamped against tiny negative rounding at threshold
    let s = parent * parent;
    let lambda = ((s - (m1 + m2).powi(2)) * (s - (m1 - m2).powi(2))).max(0.0);
    let p = lambda.sqrt() / (2.0 * parent);

    Ok(TwoBodyDecayOutput {
        momentum_gev: p,
        daughter1_energy_gev: (s + m1 * m1 - m2 * m2) / (2.0 * parent),
        daughter2_energy_gev: (s + m2 * m2 - m1 * m1) / (2.0 * parent),
        q_value_gev: parent - m1 - m2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64, msg: &str) {
        assert!(
            (actual - expected).abs() < tol,
            "{msg}: expected ~{expected}, got {actual}"
        );
    }

    fn kin(mass_gev: f64, velocity: f64, proper_lifetime: Option<f64>) -> KinematicsOutput {
        match calculate_particle(&ParticleInput::Kinematics {
            mass_gev,
            velocity,
            proper_lifetime,
        })
        .unwrap()
        .result
        {
            ParticleOutput::Kinematics(k) => k,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_gamma_at_point_six_c() {
        // beta = 0.6 -> gamma = 1.25, p = 0.75 m
        let out = kin(1.0, 0.6 * SPEED_OF_LIGHT, None);
        assert_close(out.beta, 0.6, 1e-12, "beta");
        assert_close(out.gamma, 1.25, 1e-12, "gamma");
        assert_close(out.momentum_gev, 0.75, 1e-12, "momentum");
        assert_close(out.kinetic_energy_gev, 0.25, 1e-12, "kinetic energy");
        assert_close(out.rapidity, 0.6931471805599453, 1e-12, "rapidity = ln 2");
    }

    #[test]
    fn test_energy_momentum_relation() {
        let m = 0.938272;
        let out = kin(m, 0.9 * SPEED_OF_LIGHT, None);
        let e2 = out.total_energy_gev.powi(2);
        let rhs = out.momentum_gev.powi(2) + m * m;
        assert_close(e2, rhs, 1e-9, "E^2 = p^2 + m^2");
    }

    #[test]
    fn test_time_dilation_of_muon() {
        let tau = 2.197e-6;
        let out = kin(0.105658, 0.6 * SPEED_OF_LIGHT, Some(tau));
        assert_close(out.dilated_lifetime.unwrap(), 1.25 * tau, 1e-15, "dilated");
        let expected_length = 1.25 * 0.6 * SPEED_OF_LIGHT * tau;
        assert_close(out.decay_length.unwrap(), expected_length, 1e-6, "length");
    }

    #[test]
    fn test_speed_of_light_rejected() {
        let err = calculate_particle(&ParticleInput::Kinematics {
            mass_gev: 1.0,
            velocity: SPEED_OF_LIGHT,
            proper_lifetime: None,
        })
        .unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_two_body_decay_massless_daughters() {
        // pi0 -> gamma gamma: each photon carries M/2
        let out = match calculate_particle(&ParticleInput::TwoBodyDecay {
            parent_mass_gev: 0.134977,
            daughter1_mass_gev: 0.0,
            daughter2_mass_gev: 0.0,
        })
        .unwrap()
        .result
        {
            ParticleOutput::TwoBodyDecay(d) => d,
            other => panic!("unexpected {other:?}"),
        };
        assert_close(out.momentum_gev, 0.0674885, 1e-9, "p");
        assert_close(out.daughter1_energy_gev, 0.0674885, 1e-9, "E1");
    }

    #[test]
    fn test_two_body_decay_forbidden() {
        let err = calculate_particle(&ParticleInput::TwoBodyDecay {
            parent_mass_gev: 0.1,
            daughter1_mass_gev: 0.06,
            daughter2_mass_gev: 0.06,
        })
        .unwrap_err();
        assert!(matches!(err, CalcError::Infeasible(_)));
    }
}
