//! Dense matrix arithmetic over `Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

/// Pivots smaller than this are treated as zero.
const PIVOT_EPSILON: Decimal = dec!(0.000000000001);

const MAX_DIMENSION: usize = 10;

pub type Matrix = Vec<Vec<Decimal>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatrixOperation {
    Add,
    Subtract,
    Multiply,
    Scalar(Decimal),
    Transpose,
    Determinant,
    Inverse,
    Rank,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixInput {
    pub operation: MatrixOperation,
    pub a: Matrix,
    /// Second operand for add, subtract and multiply.
    #[serde(default)]
    pub b: Option<Matrix>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatrixOutput {
    Matrix(Matrix),
    Scalar(Decimal),
    Rank(usize),
}

pub fn calculate_matrix(input: &MatrixInput) -> CalcResult<ComputationOutput<MatrixOutput>> {
    let start = Instant::now();
    let a = &input.a;
    let (rows, cols) = shape(a, "a")?;

    let (result, methodology) = match &input.operation {
        MatrixOperation::Add => (
            MatrixOutput::Matrix(elementwise(a, second_operand(input)?, |x, y| x + y)?),
            "Element-wise addition",
        ),
        MatrixOperation::Subtract => (
            MatrixOutput::Matrix(elementwise(a, second_operand(input)?, |x, y| x - y)?),
            "Element-wise subtraction",
        ),
        MatrixOperation::Multiply => (
            MatrixOutput::Matrix(multiply(a, second_operand(input)?)?),
            "Row-by-column matrix product",
        ),
        MatrixOperation::Scalar(k) => (
            MatrixOutput::Matrix(a.iter().map(|row| row.iter().map(|x| x * k).collect()).collect()),
            "Scalar multiplication",
        ),
        MatrixOperation::Transpose => (MatrixOutput::Matrix(transpose(a)), "Transpose"),
        MatrixOperation::Determinant => {
            require_square(rows, cols)?;
            (
                MatrixOutput::Scalar(determinant(a)),
                "Gaussian elimination with partial pivoting",
            )
        }
        MatrixOperation::Inverse => {
            require_square(rows, cols)?;
            (MatrixOutput::Matrix(inverse(a)?), "Gauss-Jordan elimination")
        }
        MatrixOperation::Rank => (MatrixOutput::Rank(rank(a)), "Row echelon form"),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, result))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn second_operand(input: &MatrixInput) -> CalcResult<&Matrix> {
    input
        .b
        .as_ref()
        .ok_or_else(|| CalcError::invalid("b", "This operation needs a second matrix"))
}

/// Validate a matrix is non-empty, rectangular and within size limits.
fn shape(m: &Matrix, field: &str) -> CalcResult<(usize, usize)> {
    let rows = m.len();
    let cols = m.first().map(|r| r.len()).unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(CalcError::invalid(field, "Matrix must not be empty"));
    }
    if rows > MAX_DIMENSION || cols > MAX_DIMENSION {
        return Err(CalcError::invalid(
            field,
            format!("Matrix dimensions are limited to {MAX_DIMENSION}x{MAX_DIMENSION}"),
        ));
    }
    if m.iter().any(|r| r.len() != cols) {
        return Err(CalcError::invalid(field, "All rows must have the same length"));
    }
    Ok((rows, cols))
}

fn require_square(rows: usize, cols: usize) -> CalcResult<()> {
    if rows != cols {
        return Err(CalcError::invalid(
            "a",
            format!("Operation requires a square matrix, got {rows}x{cols}"),
        ));
    }
    Ok(())
}

fn elementwise(
    a: &Matrix,
    b: &Matrix,
    op: impl Fn(Decimal, Decimal) -> Decimal,
) -> CalcResult<Matrix> {
    if shape(a, "a")? != shape(b, "b")? {
        return Err(CalcError::invalid("b", "Matrices must have the same dimensions"));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(ra, rb)| ra.iter().zip(rb).map(|(x, y)| op(*x, *y)).collect())
        .collect())
}

pub fn multiply(a: &Matrix, b: &Matrix) -> CalcResult<Matrix> {
    let (n, k) = shape(a, "a")?;
    let (k2, m) = shape(b, "b")?;
    if k != k2 {
        return Err(CalcError::invalid(
            "b",
            format!("Cannot multiply {n}x{k} by {k2}x{m}"),
        ));
    }
    let mut out = vec![vec![Decimal::ZERO; m]; n];
    for i in 0..n {
        for j in 0..m {
            out[i][j] = (0..k).map(|t| a[i][t] * b[t][j]).sum();
        }
    }
    Ok(out)
}

pub fn transpose(a: &Matrix) -> Matrix {
    let cols = a.first().map(|r| r.len()).unwrap_or(0);
    (0..cols).map(|j| a.iter().map(|row| row[j]).collect()).collect()
}

/// Determinant of a square matrix.
pub fn determinant(a: &Matrix) -> Decimal {
    let n = a.len();
    let mut m = a.clone();
    let mut det = Decimal::ONE;

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| m[x][col].abs().cmp(&m[y][col].abs()))
            .unwrap_or(col);
        if m[pivot][col].abs() < PIVOT_EPSILON {
            return Decimal::ZERO;
        }
        if pivot != col {
            m.swap(pivot, col);
            det = -det;
        }
        det *= m[col][col];
        for row in (col + 1)..n {
            let factor = m[row][col] / m[col][col];
            for k in col..n {
                let delta = factor * m[col][k];
                m[row][k] -= delta;
            }
        }
    }
    det
}

/// Inverse via Gauss-Jordan elimination on `[A | I]`.
pub fn inverse(a: &Matrix) -> CalcResult<Matrix> {
    let n = a.len();
    let mut aug: Matrix = a
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..n).map(|j| if i == j { Decimal::ONE } else { Decimal::ZERO }));
            r
        })
        .collect();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| aug[x][col].abs().cmp(&aug[y][col].abs()))
            .unwrap_or(col);
        if aug[pivot][col].abs() < PIVOT_EPSILON {
            return Err(CalcError::DivisionByZero {
                context: "matrix inverse (matrix is singular)".into(),
            });
        }
        aug.swap(pivot, col);

        let p = aug[col][col];
        for v in aug[col].iter_mut() {
            *v /= p;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[row][col];
            if factor.is_zero() {
                continue;
            }
            for k in 0..(2 * n) {
                let delta = factor * aug[col][k];
                aug[row][k] -= delta;
            }
        }
    }

    Ok(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Number of linearly independent rows.
pub fn rank(a: &Matrix) -> usize {
    let mut m = a.clone();
    let rows = m.len();
    let cols = m.first().map(|r| r.len()).unwrap_or(0);
    let mut rank = 0;

    for col in 0..cols {
        if rank == rows {
            break;
        }
        let pivot = (rank..rows)
            .max_by(|&x, &y| m[x][col].abs().cmp(&m[y][col].abs()))
            .unwrap_or(rank);
        if m[pivot][col].abs() < PIVOT_EPSILON {
            continue;
        }
        m.swap(pivot, rank);
        for row in (rank + 1)..rows {
            let factor = m[row][col] / m[rank][col];
            for k in col..cols {
                let delta = factor * m[rank][k];
                m[row][k] -= delta;
            }
        }
        rank += 1;
    }
    rank
}
