//! Node bindings. Every function takes the calculator's input as a JSON
//! string and returns the full output envelope as a JSON string.

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use calcdesk_core::CalcResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse `input_json`, run `calc`, serialize the result.
fn call<I, O>(input_json: &str, calc: impl FnOnce(&I) -> CalcResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = calc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection and lending
// ---------------------------------------------------------------------------

#[napi]
pub fn project_balance(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::projection::run_projection)
}

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::lending::loan::calculate_loan)
}

#[napi]
pub fn credit_card_payoff(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        calcdesk_core::lending::credit_card::calculate_credit_card_payoff,
    )
}

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_rmd(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::retirement::rmd::calculate_rmd)
}

#[napi]
pub fn savings_growth(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::retirement::savings::calculate_savings)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_tdee(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::health::tdee::calculate_tdee)
}

// ---------------------------------------------------------------------------
// Math
// ---------------------------------------------------------------------------

#[napi]
pub fn matrix_operation(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::math::matrix::calculate_matrix)
}

#[napi]
pub fn two_point_slope(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::math::slope::calculate_slope)
}

#[napi]
pub fn surface_area(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        calcdesk_core::math::surface_area::calculate_surface_area,
    )
}

#[napi]
pub fn percent_error(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        calcdesk_core::math::percent_error::calculate_percent_error,
    )
}

#[napi]
pub fn prime_factors(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::math::primes::calculate_prime_factors)
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

#[napi]
pub fn momentum(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::physics::momentum::calculate_momentum)
}

#[napi]
pub fn particle_kinematics(input_json: String) -> NapiResult<String> {
    call(&input_json, calcdesk_core::physics::particle::calculate_particle)
}

#[napi]
pub fn statistical_mechanics(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        calcdesk_core::physics::statistical_mechanics::calculate_stat_mech,
    )
}
