//! Line through two points: slope, intercept, distance, midpoint and angle.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: Decimal,
    pub y: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeInput {
    pub p1: Point,
    pub p2: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeOutput {
    /// `None` for a vertical line.
    pub slope: Option<Decimal>,
    pub y_intercept: Option<Decimal>,
    pub distance: Decimal,
    pub midpoint: Point,
    /// Angle of inclination in degrees, in [0, 180).
    pub angle_degrees: f64,
    pub equation: String,
}

pub fn calculate_slope(input: &SlopeInput) -> CalcResult<ComputationOutput<SlopeOutput>> {
    let start = Instant::now();
    let SlopeInput { p1, p2 } = *input;

    if p1 == p2 {
        return Err(CalcError::invalid(
            "p2",
            "Points must be distinct to define a line",
        ));
    }

    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    let slope = if dx.is_zero() { None } else { Some(dy / dx) };
    let y_intercept = slope.map(|m| p1.y - m * p1.x);

    let distance = (dx * dx + dy * dy)
        .sqrt()
        .ok_or_else(|| CalcError::Infeasible("distance overflowed".into()))?;

    let midpoint = Point {
        x: (p1.x + p2.x) / dec!(2),
        y: (p1.y + p2.y) / dec!(2),
    };

    let mut angle_degrees = dy
        .to_f64()
        .unwrap_or(0.0)
        .atan2(dx.to_f64().unwrap_or(0.0))
        .to_degrees();
    if angle_degrees < 0.0 {
        angle_degrees += 180.0;
    }
    if angle_degrees >= 180.0 {
        angle_degrees -= 180.0;
    }

    let equation = match (slope, y_intercept) {
        (Some(m), Some(b)) => format_equation(m, b),
        _ => format!("x = {}", p1.x.normalize()),
    };

    let output = SlopeOutput {
        slope,
        y_intercept,
        distance,
        midpoint,
        angle_degrees,
        equation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-point slope formula",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn format_equation(m: Decimal, b: Decimal) -> String {
    let m = m.round_dp(6).normalize();
    let b = b.round_dp(6).normalize();
    if b.is_zero() {
        format!("y = {m}x")
    } else if b.is_sign_negative() {
        format!("y = {m}x - {}", b.abs())
    } else {
        format!("y = {m}x + {b}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: Decimal, y: Decimal) -> Point {
        Point { x, y }
    }

    fn run(p1: Point, p2: Point) -> SlopeOutput {
        calculate_slope(&SlopeInput { p1, p2 }).unwrap().result
    }

    #[test]
    fn test_basic_slope() {
        let out = run(pt(dec!(1), dec!(2)), pt(dec!(3), dec!(6)));
        assert_eq!(out.slope, Some(dec!(2)));
        assert_eq!(out.y_intercept, Some(dec!(0)));
        assert_eq!(out.midpoint, pt(dec!(2), dec!(4)));
        assert_eq!(out.equation, "y = 2x");
    }

    #[test]
    fn test_distance_three_four_five() {
        let out = run(pt(dec!(0), dec!(0)), pt(dec!(3), dec!(4)));
        assert!((out.distance - dec!(5)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_negative_slope_and_angle() {
        let out = run(pt(dec!(0), dec!(1)), pt(dec!(1), dec!(0)));
        assert_eq!(out.slope, Some(dec!(-1)));
        assert!((out.angle_degrees - 135.0).abs() < 1e-9);
        assert_eq!(out.equation, "y = -1x + 1");
    }

    #[test]
    fn test_vertical_line() {
        let out = run(pt(dec!(2), dec!(1)), pt(dec!(2), dec!(5)));
        assert_eq!(out.slope, None);
        assert_eq!(out.y_intercept, None);
        assert_eq!(out.equation, "x = 2");
        assert!((out.angle_degrees - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_points_rejected() {
        let p = pt(dec!(1), dec!(1));
        assert!(calculate_slope(&SlopeInput { p1: p, p2: p }).is_err());
    }
}
