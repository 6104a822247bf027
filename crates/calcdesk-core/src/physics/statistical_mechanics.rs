//! Canonical-ensemble thermodynamics over discrete energy levels, and
//! Maxwell-Boltzmann characteristic speeds for an ideal gas.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_float_metadata, ComputationOutput};
use crate::CalcResult;

/// Boltzmann constant, J/K (exact in SI 2019).
pub const BOLTZMANN: f64 = 1.380649e-23;
/// Molar gas constant, J/(mol K).
pub const GAS_CONSTANT: f64 = 8.314462618;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyLevel {
    /// Joules
    pub energy: f64,
    #[serde(default = "default_degeneracy")]
    pub degeneracy: u32,
}

fn default_degeneracy() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatMechInput {
    Ensemble {
        levels: Vec<EnergyLevel>,
        /// Kelvin
        temperature: f64,
    },
    MaxwellBoltzmann {
        /// kg/mol
        molar_mass: f64,
        temperature: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleOutput {
    pub partition_function: f64,
    pub ln_partition_function: f64,
    /// Probability of finding the system in each level (degeneracy included).
    pub probabilities: Vec<f64>,
    /// J
    pub mean_energy: f64,
    /// J/K
    pub entropy: f64,
    /// J
    pub helmholtz_free_energy: f64,
    /// J/K
    pub heat_capacity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedsOutput {
    /// m/s
    pub most_probable: f64,
    pub mean: f64,
    pub rms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatMechOutput {
    Ensemble(EnsembleOutput),
    MaxwellBoltzmann(SpeedsOutput),
}

pub fn calculate_stat_mech(input: &StatMechInput) -> CalcResult<ComputationOutput<StatMechOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (output, methodology) = match input {
        StatMechInput::Ensemble {
            levels,
            temperature,
        } => {
            check_temperature(*temperature)?;
            let out = ensemble(levels, *temperature)?;
            if out.probabilities.iter().skip(1).all(|p| *p < 1e-12) && levels.len() > 1 {
                warnings.push(
                    "Excited levels are effectively unpopulated at this temperature".into(),
                );
            }
            (
                StatMechOutput::Ensemble(out),
                "Canonical ensemble, Z = sum g exp(-E / kT) via log-sum-exp",
            )
        }
        StatMechInput::MaxwellBoltzmann {
            molar_mass,
            temperature,
        } => {
            check_temperature(*temperature)?;
            if !molar_mass.is_finite() || *molar_mass <= 0.0 {
                return Err(CalcError::invalid("molar_mass", "Molar mass must be > 0"));
            }
            let rt_over_m = GAS_CONSTANT * temperature / molar_mass;
            (
                StatMechOutput::MaxwellBoltzmann(SpeedsOutput {
                    most_probable: (2.0 * rt_over_m).sqrt(),
                    mean: (8.0 * rt_over_m / PI).sqrt(),
                    rms: (3.0 * rt_over_m).sqrt(),
                }),
                "Maxwell-Boltzmann speed distribution",
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_float_metadata(methodology, input, warnings, elapsed, output))
}

fn check_temperature(t: f64) -> CalcResult<()> {
    if !t.is_finite() || t <= 0.0 {
        return Err(CalcError::invalid("temperature", "Temperature must be > 0 K"));
    }
    Ok(())
}

fn ensemble(levels: &[EnergyLevel], temperature: f64) -> CalcResult<EnsembleOutput> {
    if levels.is_empty() {
        return Err(CalcError::InsufficientData(
            "at least one energy level is required".into(),
        ));
    }
    if let Some(i) = levels
        .iter()
        .position(|l| !l.energy.is_finite() || l.degeneracy == 0)
    {
        return Err(CalcError::invalid(
            "levels",
            format!("level {i} needs a finite energy and degeneracy >= 1"),
        ));
    }

    let kt = BOLTZMANN * temperature;

    // ln(g) - E/kT per level, shifted by the max before exponentiating
    let log_weights: Vec<f64> = levels
        .iter()
        .map(|l| f64::from(l.degeneracy).ln() - l.energy / kt)
        .collect();
    let max = log_weights
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let shifted_sum: f64 = log_weights.iter().map(|w| (w - max).exp()).sum();
    let ln_z = max + shifted_sum.ln();

    let probabilities: Vec<f64> = log_weights.iter().map(|w| (w - ln_z).exp()).collect();

    let mean_energy: f64 = levels
        .iter()
        .zip(&probabilities)
        .map(|(l, p)| p * l.energy)
        .sum();
    let mean_sq: f64 = levels
        .iter()
        .zip(&probabilities)
        .map(|(l, p)| p * l.energy * l.energy)
        .sum();
    let variance = (mean_sq - mean_energy * mean_energy).max(0.0);

    let helmholtz = -kt * ln_z;

    Ok(EnsembleOutput {
        partition_function: ln_z.exp(),
        ln_partition_function: ln_z,
        probabilities,
        mean_energy,
        entropy: (mean_energy - helmholtz) / temperature,
        helmholtz_free_energy: helmholtz,
        heat_capacity: variance / (BOLTZMANN * temperature * temperature),
    })
}
