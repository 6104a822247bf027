use clap::Args;
use serde_json::Value;

use calcdesk_core::physics::momentum::{self, Body, MomentumInput};
use calcdesk_core::physics::particle::{self, ParticleInput};
use calcdesk_core::physics::statistical_mechanics::{self, StatMechInput};

use crate::input;

/// Arguments for momentum. Flags cover a single body; collisions and
/// impulses take --input.
#[derive(Args)]
pub struct MomentumArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Mass in kg
    #[arg(long)]
    pub mass: Option<f64>,

    /// Velocity in m/s
    #[arg(long, allow_hyphen_values = true)]
    pub velocity: Option<f64>,
}

/// Arguments for particle kinematics. Two-body decays take --input.
#[derive(Args)]
pub struct ParticleArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Rest mass in GeV/c^2
    #[arg(long)]
    pub mass_gev: Option<f64>,

    /// Speed in m/s
    #[arg(long, allow_hyphen_values = true)]
    pub velocity: Option<f64>,

    /// Proper lifetime in seconds
    #[arg(long)]
    pub lifetime: Option<f64>,
}

/// Arguments for statistical mechanics. Flags give Maxwell-Boltzmann
/// speeds; an energy-level ensemble takes --input.
#[derive(Args)]
pub struct StatMechArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Molar mass in kg/mol (0.028 for N2)
    #[arg(long)]
    pub molar_mass: Option<f64>,

    /// Temperature in kelvin
    #[arg(long)]
    pub temperature: Option<f64>,
}

pub fn run_momentum(args: MomentumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let momentum_input: MomentumInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => MomentumInput::Single(Body {
            mass: args.mass.ok_or("--mass is required (or provide --input)")?,
            velocity: args
                .velocity
                .ok_or("--velocity is required (or provide --input)")?,
        }),
    };
    let result = momentum::calculate_momentum(&momentum_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_particle(args: ParticleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let particle_input: ParticleInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ParticleInput::Kinematics {
            mass_gev: args
                .mass_gev
                .ok_or("--mass-gev is required (or provide --input)")?,
            velocity: args
                .velocity
                .ok_or("--velocity is required (or provide --input)")?,
            proper_lifetime: args.lifetime,
        },
    };
    let result = particle::calculate_particle(&particle_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_stat_mech(args: StatMechArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sm_input: StatMechInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => StatMechInput::MaxwellBoltzmann {
            molar_mass: args
                .molar_mass
                .ok_or("--molar-mass is required (or provide --input)")?,
            temperature: args
                .temperature
                .ok_or("--temperature is required (or provide --input)")?,
        },
    };
    let result = statistical_mechanics::calculate_stat_mech(&sm_input)?;
    Ok(serde_json::to_value(result)?)
}
