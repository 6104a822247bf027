mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::health::TdeeArgs;
use commands::lending::{CreditCardArgs, LoanArgs};
use commands::math::{MatrixArgs, PercentErrorArgs, PrimeFactorsArgs, SlopeArgs, SurfaceAreaArgs};
use commands::physics::{MomentumArgs, ParticleArgs, StatMechArgs};
use commands::projection::ProjectArgs;
use commands::retirement::{RmdArgs, SavingsArgs};

/// Loan, retirement, health, math and physics calculators
#[derive(Parser)]
#[command(
    name = "calcdesk",
    version,
    about = "Loan, retirement, health, math and physics calculators",
    long_about = "A CLI for everyday calculators with decimal precision. Supports loan \
                  and credit-card payoff schedules, RMDs, savings growth, TDEE, matrix \
                  and geometry helpers, and a handful of physics formulas. Every command \
                  accepts --input <file.json> or JSON on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a balance period by period (amortizing or depleting)
    Project(ProjectArgs),
    /// Auto, personal or mortgage loan payment and schedule
    Loan(LoanArgs),
    /// Credit-card payoff under minimum or fixed payments
    CreditCard(CreditCardArgs),
    /// Required minimum distributions for IRA and 401(k) accounts
    Rmd(RmdArgs),
    /// Savings growth with compounding and contributions
    Savings(SavingsArgs),
    /// Total daily energy expenditure and macro split
    Tdee(TdeeArgs),
    /// Matrix arithmetic, determinant, inverse and rank
    Matrix(MatrixArgs),
    /// Slope, intercept and distance between two points
    Slope(SlopeArgs),
    /// Surface area and volume of common solids
    SurfaceArea(SurfaceAreaArgs),
    /// Percent error of a measurement
    PercentError(PercentErrorArgs),
    /// Prime factorization with divisor count and sum
    PrimeFactors(PrimeFactorsArgs),
    /// Momentum, impulse and 1-D collisions
    Momentum(MomentumArgs),
    /// Relativistic particle kinematics and two-body decays
    Particle(ParticleArgs),
    /// Canonical-ensemble thermodynamics and Maxwell-Boltzmann speeds
    StatMech(StatMechArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Loan(args) => commands::lending::run_loan(args),
        Commands::CreditCard(args) => commands::lending::run_credit_card(args),
        Commands::Rmd(args) => commands::retirement::run_rmd(args),
        Commands::Savings(args) => commands::retirement::run_savings(args),
        Commands::Tdee(args) => commands::health::run_tdee(args),
        Commands::Matrix(args) => commands::math::run_matrix(args),
        Commands::Slope(args) => commands::math::run_slope(args),
        Commands::SurfaceArea(args) => commands::math::run_surface_area(args),
        Commands::PercentError(args) => commands::math::run_percent_error(args),
        Commands::PrimeFactors(args) => commands::math::run_prime_factors(args),
        Commands::Momentum(args) => commands::physics::run_momentum(args),
        Commands::Particle(args) => commands::physics::run_particle(args),
        Commands::StatMech(args) => commands::physics::run_stat_mech(args),
        Commands::Version => {
            println!("calcdesk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
