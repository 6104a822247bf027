//! JSON-in, result-out checks for the standalone calculators, mirroring how
//! the CLI and bindings feed them.

// ===========================================================================
// Health
// ===========================================================================

#[cfg(feature = "health")]
mod health {
    use calcdesk_core::health::tdee::{calculate_tdee, TdeeInput};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tdee_from_json_with_defaults() {
        let input: TdeeInput = serde_json::from_str(
            r#"{"sex":"Male","age":30,"weight":"80","height":"180","activity":"Moderate"}"#,
        )
        .unwrap();
        let out = calculate_tdee(&input).unwrap().result;

        assert_eq!(out.bmr, dec!(1780));
        assert_eq!(out.tdee, dec!(2759));
        // Maintain is the default goal
        assert_eq!(out.goal_calories, dec!(2759));
    }

    #[test]
    fn test_imperial_units_agree_with_metric() {
        let metric: TdeeInput = serde_json::from_str(
            r#"{"sex":"Female","age":40,"weight":"60","height":"165","activity":"Light"}"#,
        )
        .unwrap();
        let imperial: TdeeInput = serde_json::from_str(
            r#"{"sex":"Female","age":40,"weight":"132.277","height":"64.961","units":"Imperial","activity":"Light"}"#,
        )
        .unwrap();

        let a = calculate_tdee(&metric).unwrap().result;
        let b = calculate_tdee(&imperial).unwrap().result;
        assert!((a.tdee - b.tdee).abs() < Decimal::ONE, "{} vs {}", a.tdee, b.tdee);
        assert_eq!(a.bmi, b.bmi);
    }

    #[test]
    fn test_aggressive_cut_is_clamped_to_floor() {
        let input: TdeeInput = serde_json::from_str(
            r#"{"sex":"Female","age":70,"weight":"45","height":"150","activity":"Sedentary","goal":"Lose"}"#,
        )
        .unwrap();
        let output = calculate_tdee(&input).unwrap();
        assert_eq!(output.result.goal_calories, dec!(1200));
        assert_eq!(output.warnings.len(), 1);
    }
}

// ===========================================================================
// Math
// ===========================================================================

#[cfg(feature = "math")]
mod math {
    use calcdesk_core::math::matrix::{
        calculate_matrix, MatrixInput, MatrixOperation, MatrixOutput,
    };
    use calcdesk_core::math::percent_error::{calculate_percent_error, PercentErrorInput};
    use calcdesk_core::math::primes::{calculate_prime_factors, PrimeFactorsInput};
    use calcdesk_core::math::slope::{calculate_slope, SlopeInput};
    use calcdesk_core::math::surface_area::{calculate_surface_area, Shape};
    use calcdesk_core::CalcError;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn matrix(json: &str) -> MatrixOutput {
        let input: MatrixInput = serde_json::from_str(json).unwrap();
        calculate_matrix(&input).unwrap().result
    }

    #[test]
    fn test_inverse_times_original_is_identity() {
        let inverse = match matrix(r#"{"operation":"Inverse","a":[["4","7"],["2","6"]]}"#) {
            MatrixOutput::Matrix(m) => m,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(
            inverse,
            vec![vec![dec!(0.6), dec!(-0.7)], vec![dec!(-0.2), dec!(0.4)]]
        );

        let product = calculate_matrix(&MatrixInput {
            operation: MatrixOperation::Multiply,
            a: vec![vec![dec!(4), dec!(7)], vec![dec!(2), dec!(6)]],
            b: Some(inverse),
        })
        .unwrap()
        .result;
        assert_eq!(
            product,
            MatrixOutput::Matrix(vec![
                vec![Decimal::ONE, Decimal::ZERO],
                vec![Decimal::ZERO, Decimal::ONE]
            ])
        );
    }

    #[test]
    fn test_determinant_and_rank_from_json() {
        assert_eq!(
            matrix(r#"{"operation":"Determinant","a":[["2","1"],["4","3"]]}"#),
            MatrixOutput::Scalar(dec!(2))
        );
        assert_eq!(
            matrix(r#"{"operation":"Rank","a":[["1","2","3"],["2","4","6"],["1","0","1"]]}"#),
            MatrixOutput::Rank(2)
        );
    }

    #[test]
    fn test_singular_inverse_is_an_error() {
        let input: MatrixInput =
            serde_json::from_str(r#"{"operation":"Inverse","a":[["1","2"],["2","4"]]}"#).unwrap();
        assert!(matches!(
            calculate_matrix(&input),
            Err(CalcError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_slope_from_json() {
        let input: SlopeInput = serde_json::from_str(
            r#"{"p1":{"x":"-1","y":"-1"},"p2":{"x":"3","y":"7"}}"#,
        )
        .unwrap();
        let out = calculate_slope(&input).unwrap().result;
        assert_eq!(out.slope, Some(dec!(2)));
        assert_eq!(out.y_intercept, Some(dec!(1)));
        assert_eq!(out.equation, "y = 2x + 1");
    }

    #[test]
    fn test_surface_area_from_json() {
        let shape: Shape =
            serde_json::from_str(r#"{"Cylinder":{"radius":"2","height":"5"}}"#).unwrap();
        let out = calculate_surface_area(&shape).unwrap().result;
        // 2 pi r (r + h) = 28 pi
        assert!((out.surface_area - dec!(87.9646)).abs() < dec!(0.001));
        assert!((out.volume - dec!(62.8319)).abs() < dec!(0.001));
    }

    #[test]
    fn test_percent_error_from_json() {
        let input: PercentErrorInput =
            serde_json::from_str(r#"{"measured":"9.6","actual":"9.81"}"#).unwrap();
        let out = calculate_percent_error(&input).unwrap().result;
        assert!((out.percent_error - dec!(2.1407)).abs() < dec!(0.0001));
        assert!(out.signed_percent_error < Decimal::ZERO);
    }

    #[test]
    fn test_prime_factors_from_json() {
        let input: PrimeFactorsInput = serde_json::from_str(r#"{"n":5040}"#).unwrap();
        let out = calculate_prime_factors(&input).unwrap().result;
        assert_eq!(out.exponent_form, "2^4 × 3^2 × 5 × 7");
        assert_eq!(out.divisor_count, 60);
    }
}

// ===========================================================================
// Physics
// ===========================================================================

#[cfg(feature = "physics")]
mod physics {
    use calcdesk_core::physics::momentum::{calculate_momentum, MomentumInput, MomentumOutput};
    use calcdesk_core::physics::particle::{calculate_particle, ParticleInput, ParticleOutput};
    use calcdesk_core::physics::statistical_mechanics::{
        calculate_stat_mech, StatMechInput, StatMechOutput,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_elastic_collision_conserves_momentum_and_energy() {
        let input: MomentumInput = serde_json::from_str(
            r#"{"Collision":{"a":{"mass":3.0,"velocity":2.0},"b":{"mass":1.0,"velocity":-4.0},"kind":"Elastic"}}"#,
        )
        .unwrap();
        let output = calculate_momentum(&input).unwrap();
        assert_eq!(output.metadata.precision, "f64");

        match output.result {
            MomentumOutput::Collision {
                a_after,
                b_after,
                total_momentum,
                kinetic_energy_before,
                kinetic_energy_after,
                ..
            } => {
                let p_after = 3.0 * a_after.velocity + 1.0 * b_after.velocity;
                assert!((p_after - total_momentum).abs() < 1e-9);
                assert!((kinetic_energy_before - kinetic_energy_after).abs() < 1e-9);
                // v_a' = ((3-1)*2 + 2*1*(-4)) / 4 = -1
                assert!((a_after.velocity + 1.0).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_particle_from_json() {
        let input: ParticleInput = serde_json::from_str(
            r#"{"Kinematics":{"mass_gev":0.938272,"velocity":239833966.4}}"#,
        )
        .unwrap();
        match calculate_particle(&input).unwrap().result {
            // beta = 0.8 -> gamma = 5/3
            ParticleOutput::Kinematics(k) => {
                assert!((k.gamma - 5.0 / 3.0).abs() < 1e-9);
                assert!(k.dilated_lifetime.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ensemble_probabilities_from_json() {
        let input: StatMechInput = serde_json::from_str(
            r#"{"Ensemble":{"levels":[{"energy":0.0},{"energy":4.141947e-21,"degeneracy":2}],"temperature":300.0}}"#,
        )
        .unwrap();
        match calculate_stat_mech(&input).unwrap().result {
            StatMechOutput::Ensemble(e) => {
                let total: f64 = e.probabilities.iter().sum();
                assert!((total - 1.0).abs() < 1e-12);
                // gap = kT at 300 K, so p1/p0 = 2/e
                let ratio = e.probabilities[1] / e.probabilities[0];
                assert!((ratio - 2.0 * (-1.0f64).exp()).abs() < 1e-6);
                assert!(e.heat_capacity > 0.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
