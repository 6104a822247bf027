use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Cube { side: Decimal },
    Cuboid { length: Decimal, width: Decimal, height: Decimal },
    Sphere { radius: Decimal },
    /// Closed hemisphere (curved surface plus base disc).
    Hemisphere { radius: Decimal },
    Cylinder { radius: Decimal, height: Decimal },
    Cone { radius: Decimal, height: Decimal },
    SquarePyramid { base: Decimal, height: Decimal },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceAreaOutput {
    pub surface_area: Decimal,
    /// Area excluding bases, for shapes where that is meaningful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lateral_area: Option<Decimal>,
    pub volume: Decimal,
}

pub fn calculate_surface_area(shape: &Shape) -> CalcResult<ComputationOutput<SurfaceAreaOutput>> {
    let start = Instant::now();
    let pi = Decimal::PI;

    let dims: Vec<(&str, Decimal)> = match *shape {
        Shape::Cube { side } => vec![("side", side)],
        Shape::Cuboid {
            length,
            width,
            height,
        } => vec![("length", length), ("width", width), ("height", height)],
        Shape::Sphere { radius } | Shape::Hemisphere { radius } => vec![("radius", radius)],
        Shape::Cylinder { radius, height }
        | Shape::Cone { radius, height } => vec![("radius", radius), ("height", height)],
        Shape::SquarePyramid { base, height } => vec![("base", base), ("height", height)],
    };
    if let Some((field, _)) = dims.iter().find(|(_, v)| *v <= Decimal::ZERO) {
        return Err(CalcError::invalid(field, "Dimensions must be > 0"));
    }

    let output = match *shape {
        Shape::Cube { side } => SurfaceAreaOutput {
            surface_area: dec!(6) * side * side,
            lateral_area: Some(dec!(4) * side * side),
            volume: side * side * side,
        },
        Shape::Cuboid {
            length,
            width,
            height,
        } => SurfaceAreaOutput {
            surface_area: dec!(2) * (length * width + length * height + width * height),
            lateral_area: Some(dec!(2) * height * (length + width)),
            volume: length * width * height,
        },
        Shape::Sphere { radius } => SurfaceAreaOutput {
            surface_area: dec!(4) * pi * radius * radius,
            lateral_area: None,
            volume: dec!(4) / dec!(3) * pi * radius * radius * radius,
        },
        Shape::Hemisphere { radius } => SurfaceAreaOutput {
            surface_area: dec!(3) * pi * radius * radius,
            lateral_area: Some(dec!(2) * pi * radius * radius),
            volume: dec!(2) / dec!(3) * pi * radius * radius * radius,
        },
        Shape::Cylinder { radius, height } => SurfaceAreaOutput {
            surface_area: dec!(2) * pi * radius * (radius + height),
            lateral_area: Some(dec!(2) * pi * radius * height),
            volume: pi * radius * radius * height,
        },
        Shape::Cone { radius, height } => {
            let slant = hypot(radius, height)?;
            SurfaceAreaOutput {
                surface_area: pi * radius * (radius + slant),
                lateral_area: Some(pi * radius * slant),
                volume: pi * radius * radius * height / dec!(3),
            }
        }
        Shape::SquarePyramid { base, height } => {
            let slant = hypot(base / dec!(2), height)?;
            let lateral = dec!(2) * base * slant;
            SurfaceAreaOutput {
                surface_area: base * base + lateral,
                lateral_area: Some(lateral),
                volume: base * base * height / dec!(3),
            }
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-form surface area and volume",
        shape,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn hypot(a: Decimal, b: Decimal) -> CalcResult<Decimal> {
    (a * a + b * b)
        .sqrt()
        .ok_or_else(|| CalcError::Infeasible("slant height could not be computed".into()))
}
