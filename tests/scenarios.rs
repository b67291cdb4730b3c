//! End-to-end checks of the public API and the calculator registry

use calc_numerics::cashflow::{constant_flow, simple_payback};
use calc_numerics::{
    discounted_payback, inv_normal_cdf, normal_cdf, npv, sample_size_per_variant, solve_irr,
    CalcConfig, CalcError, CalculatorInputs, CashFlowSchedule, PaybackResult, Registry,
    SolveResult, Unit,
};

#[test]
fn test_npv_undiscounted_investment() {
    let schedule =
        CashFlowSchedule::new(vec![-100000.0, 25000.0, 30000.0, 35000.0, 40000.0, 45000.0]).unwrap();
    let value = npv(&schedule, 0.0).unwrap();
    assert!((value - 75000.0).abs() < 1e-9);
}

#[test]
fn test_irr_two_payments() {
    let schedule = CashFlowSchedule::new(vec![-100.0, 60.0, 60.0]).unwrap();
    match solve_irr(&schedule) {
        SolveResult::Found(rate) => {
            assert!((rate - 0.1307).abs() < 1e-4, "got {}", rate);
            assert!(npv(&schedule, rate).unwrap().abs() < 1e-6);
        }
        other => panic!("expected an IRR, got {:?}", other),
    }
}

#[test]
fn test_irr_one_sided_flows() {
    let positive = CashFlowSchedule::new(vec![5.0, 10.0, 15.0]).unwrap();
    let negative = CashFlowSchedule::new(vec![-5.0, -10.0, -15.0]).unwrap();
    assert_eq!(solve_irr(&positive), SolveResult::NotFound);
    assert_eq!(solve_irr(&negative), SolveResult::NotFound);
}

#[test]
fn test_payback_zero_rate_matches_simple() {
    let discounted = discounted_payback(2500.0, constant_flow(700.0), 0.0, 20).unwrap();
    let simple = simple_payback(2500.0, constant_flow(700.0), 20).unwrap();
    assert_eq!(discounted, simple);
    assert!((discounted.periods().unwrap() - 2500.0 / 700.0).abs() < 1e-12);

    let never = discounted_payback(2500.0, constant_flow(700.0), 0.0, 3).unwrap();
    assert_eq!(never, PaybackResult::NotReached);
}

#[test]
fn test_inverse_normal_round_trip() {
    for i in 0..=100 {
        let x = -5.0 + i as f64 * 0.1;
        let z = inv_normal_cdf(normal_cdf(x)).unwrap();
        assert!((z - x).abs() < 1e-6, "x = {}, z = {}", x, z);
    }
}

#[test]
fn test_sample_size_low_baseline() {
    let result = sample_size_per_variant(0.025, 0.005, 0.05, 0.8).unwrap();
    // The two-proportion formula gives 16791.5 here; the often quoted 6088 does not follow from it
    assert_eq!(result.per_variant, 16792);
}

#[test]
fn test_sample_size_domain_guard() {
    assert!(matches!(
        sample_size_per_variant(0.025, 0.0, 0.05, 0.8),
        Err(CalcError::Domain { .. })
    ));
    assert!(matches!(
        sample_size_per_variant(0.0, 0.005, 0.05, 0.8),
        Err(CalcError::Domain { .. })
    ));
}

#[test]
fn test_registry_runs_every_entry() {
    let registry = Registry::new(CalcConfig::default());
    let cases = [
        (
            "npv",
            CalculatorInputs::new()
                .with("rate", 0.08)
                .with_cash_flows(vec![-1000.0, 400.0, 400.0, 400.0]),
        ),
        (
            "irr",
            CalculatorInputs::new().with_cash_flows(vec![-1000.0, 400.0, 400.0, 400.0]),
        ),
        (
            "annuity-pv",
            CalculatorInputs::new()
                .with("payment", 400.0)
                .with("rate", 0.08)
                .with("periods", 3.0),
        ),
        (
            "discounted-payback",
            CalculatorInputs::new()
                .with("outlay", 1000.0)
                .with("flow", 400.0)
                .with("rate", 0.08),
        ),
        (
            "ab-test-sample-size",
            CalculatorInputs::new()
                .with("baseline_rate", 0.05)
                .with("mde", 0.01),
        ),
    ];

    assert_eq!(registry.entries().len(), cases.len());
    for (key, inputs) in cases {
        let output = registry.run(key, &inputs).unwrap();
        assert!(output.headline.value.is_some(), "{} produced no headline", key);
    }
}

#[test]
fn test_registry_npv_and_annuity_agree() {
    let registry = Registry::default();
    let npv_out = registry
        .run(
            "npv",
            &CalculatorInputs::new()
                .with("rate", 0.08)
                .with_cash_flows(vec![0.0, 400.0, 400.0, 400.0]),
        )
        .unwrap();
    let annuity_out = registry
        .run(
            "annuity-pv",
            &CalculatorInputs::new()
                .with("payment", 400.0)
                .with("rate", 0.08)
                .with("periods", 3.0),
        )
        .unwrap();

    let a = npv_out.headline.value.unwrap();
    let b = annuity_out.headline.value.unwrap();
    assert!((a - b).abs() < 1e-9);
    assert_eq!(annuity_out.headline.unit, Unit::Currency);
}

#[test]
fn test_registry_respects_config_horizon() {
    let config = CalcConfig {
        payback_horizon: 2,
        ..Default::default()
    };
    let registry = Registry::new(config);
    let output = registry
        .run(
            "discounted-payback",
            &CalculatorInputs::new()
                .with("outlay", 1000.0)
                .with("flow", 400.0)
                .with("rate", 0.0),
        )
        .unwrap();
    assert_eq!(output.headline.value, None);
    assert_eq!(output.warnings.len(), 1);
}

#[test]
fn test_registry_output_serializes() {
    let registry = Registry::default();
    let output = registry
        .run(
            "irr",
            &CalculatorInputs::new().with_cash_flows(vec![-100.0, 60.0, 60.0]),
        )
        .unwrap();
    let json = serde_json::to_string(&output).unwrap();
    assert!(json.contains("\"unit\":\"percent\""));
}
