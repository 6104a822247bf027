//! Prime factorization by trial division.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

/// Keeps trial division under ~3.2e7 candidate divisors.
pub const MAX_FACTORIZABLE: u64 = 1_000_000_000_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimeFactorsInput {
    pub n: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimePower {
    pub prime: u64,
    pub exponent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimeFactorsOutput {
    pub n: u64,
    pub is_prime: bool,
    /// Prime factors with multiplicity, ascending.
    pub factors: Vec<u64>,
    pub prime_powers: Vec<PrimePower>,
    /// e.g. "2^3 × 3 × 5"
    pub exponent_form: String,
    pub divisor_count: u64,
    pub divisor_sum: u128,
}

pub fn calculate_prime_factors(
    input: &PrimeFactorsInput,
) -> CalcResult<ComputationOutput<PrimeFactorsOutput>> {
    let start = Instant::now();

    if input.n < 2 {
        return Err(CalcError::invalid("n", "n must be at least 2"));
    }
    if input.n > MAX_FACTORIZABLE {
        return Err(CalcError::invalid(
            "n",
            format!("n must be at most {MAX_FACTORIZABLE}"),
        ));
    }

    let prime_powers = factorize(input.n);
    let factors: Vec<u64> = prime_powers
        .iter()
        .flat_map(|pp| std::iter::repeat(pp.prime).take(pp.exponent as usize))
        .collect();

    let exponent_form = prime_powers
        .iter()
        .map(|pp| {
            if pp.exponent == 1 {
                pp.prime.to_string()
            } else {
                format!("{}^{}", pp.prime, pp.exponent)
            }
        })
        .collect::<Vec<_>>()
        .join(" × ");

    let divisor_count = prime_powers.iter().map(|pp| u64::from(pp.exponent) + 1).product();
    let divisor_sum = prime_powers
        .iter()
        .map(|pp| {
            // 1 + p + p^2 + ... + p^e
            let p = u128::from(pp.prime);
            let mut term = 1u128;
            let mut sum = 1u128;
            for _ in 0..pp.exponent {
                term *= p;
                sum += term;
            }
            sum
        })
        .product();

    let output = PrimeFactorsOutput {
        n: input.n,
        is_prime: factors.len() == 1,
        factors,
        prime_powers,
        exponent_form,
        divisor_count,
        divisor_sum,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Trial division by 2, 3 and 6k ± 1",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Factor `n` into ascending prime powers. `n` must be >= 2.
pub fn factorize(mut n: u64) -> Vec<PrimePower> {
    let mut out = Vec::new();

    for p in [2u64, 3] {
        let e = strip(&mut n, p);
        if e > 0 {
            out.push(PrimePower {
                prime: p,
                exponent: e,
            });
        }
    }

    let mut k = 5u64;
    while k.saturating_mul(k) <= n {
        for p in [k, k + 2] {
            let e = strip(&mut n, p);
            if e > 0 {
                out.push(PrimePower {
                    prime: p,
                    exponent: e,
                });
            }
        }
        k += 6;
    }

    if n > 1 {
        out.push(PrimePower {
            prime: n,
            exponent: 1,
        });
    }
    out
}

fn strip(n: &mut u64, p: u64) -> u32 {
    let mut e = 0;
    while *n % p == 0 {
        *n /= p;
        e += 1;
    }
    e
}
