use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use calcdesk_core::math::matrix::{self, MatrixInput};
use calcdesk_core::math::percent_error::{self, PercentErrorInput};
use calcdesk_core::math::primes::{self, PrimeFactorsInput};
use calcdesk_core::math::slope::{self, Point, SlopeInput};
use calcdesk_core::math::surface_area::{self, Shape};

use crate::input;

/// Arguments for matrix operations
#[derive(Args)]
pub struct MatrixArgs {
    /// Path to a JSON matrix input ({"operation": ..., "a": [[...]], "b": [[...]]})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for two-point slope
#[derive(Args)]
pub struct SlopeArgs {
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub x1: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub y1: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub x2: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub y2: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShapeKind {
    Cube,
    Cuboid,
    Sphere,
    Hemisphere,
    Cylinder,
    Cone,
    SquarePyramid,
}

/// Arguments for surface area and volume
#[derive(Args)]
pub struct SurfaceAreaArgs {
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum)]
    pub shape: Option<ShapeKind>,

    /// Side (cube), base edge (square pyramid) or length (cuboid)
    #[arg(long)]
    pub side: Option<Decimal>,

    /// Width (cuboid)
    #[arg(long)]
    pub width: Option<Decimal>,

    #[arg(long)]
    pub radius: Option<Decimal>,

    #[arg(long)]
    pub height: Option<Decimal>,
}

/// Arguments for percent error
#[derive(Args)]
pub struct PercentErrorArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Measured or experimental value
    #[arg(long, allow_hyphen_values = true)]
    pub measured: Option<Decimal>,

    /// Accepted or theoretical value
    #[arg(long, allow_hyphen_values = true)]
    pub actual: Option<Decimal>,
}

/// Arguments for prime factorization
#[derive(Args)]
pub struct PrimeFactorsArgs {
    #[arg(long)]
    pub input: Option<String>,

    /// Integer to factor
    #[arg(long)]
    pub n: Option<u64>,
}

pub fn run_matrix(args: MatrixArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let matrix_input: MatrixInput = input::require(args.input.as_deref(), "matrix operations")?;
    let result = matrix::calculate_matrix(&matrix_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_slope(args: SlopeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let slope_input: SlopeInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => SlopeInput {
            p1: Point {
                x: args.x1.ok_or("--x1 is required (or provide --input)")?,
                y: args.y1.ok_or("--y1 is required (or provide --input)")?,
            },
            p2: Point {
                x: args.x2.ok_or("--x2 is required (or provide --input)")?,
                y: args.y2.ok_or("--y2 is required (or provide --input)")?,
            },
        },
    };
    let result = slope::calculate_slope(&slope_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_surface_area(args: SurfaceAreaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let shape: Shape = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => shape_from_flags(&args)?,
    };
    let result = surface_area::calculate_surface_area(&shape)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_percent_error(args: PercentErrorArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pe_input: PercentErrorInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => PercentErrorInput {
            measured: args
                .measured
                .ok_or("--measured is required (or provide --input)")?,
            actual: args
                .actual
                .ok_or("--actual is required (or provide --input)")?,
        },
    };
    let result = percent_error::calculate_percent_error(&pe_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_prime_factors(args: PrimeFactorsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pf_input: PrimeFactorsInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => PrimeFactorsInput {
            n: args.n.ok_or("--n is required (or provide --input)")?,
        },
    };
    let result = primes::calculate_prime_factors(&pf_input)?;
    Ok(serde_json::to_value(result)?)
}

fn shape_from_flags(args: &SurfaceAreaArgs) -> Result<Shape, Box<dyn std::error::Error>> {
    let side = || args.side.ok_or("--side is required for this shape");
    let radius = || args.radius.ok_or("--radius is required for this shape");
    let height = || args.height.ok_or("--height is required for this shape");

    let shape = match args.shape.ok_or("--shape is required (or provide --input)")? {
        ShapeKind::Cube => Shape::Cube { side: side()? },
        ShapeKind::Cuboid => Shape::Cuboid {
            length: side()?,
            width: args.width.ok_or("--width is required for a cuboid")?,
            height: height()?,
        },
        ShapeKind::Sphere => Shape::Sphere { radius: radius()? },
        ShapeKind::Hemisphere => Shape::Hemisphere { radius: radius()? },
        ShapeKind::Cylinder => Shape::Cylinder {
            radius: radius()?,
            height: height()?,
        },
        ShapeKind::Cone => Shape::Cone {
            radius: radius()?,
            height: height()?,
        },
        ShapeKind::SquarePyramid => Shape::SquarePyramid {
            base: side()?,
            height: height()?,
        },
    };
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn shape_args(shape: ShapeKind) -> SurfaceAreaArgs {
        SurfaceAreaArgs {
            input: None,
            shape: Some(shape),
            side: Some(dec!(6)),
            width: None,
            radius: Some(dec!(3)),
            height: Some(dec!(4)),
        }
    }

    #[test]
    fn test_pyramid_flags() {
        let shape = shape_from_flags(&shape_args(ShapeKind::SquarePyramid)).unwrap();
        let out = surface_area::calculate_surface_area(&shape).unwrap().result;
        assert_eq!(out.volume, dec!(48));
    }

    #[test]
    fn test_cuboid_needs_width() {
        let err = shape_from_flags(&shape_args(ShapeKind::Cuboid)).unwrap_err();
        assert!(err.to_string().contains("--width"));
    }
}
