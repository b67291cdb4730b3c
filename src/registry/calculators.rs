//! Calculator entries backed by the numerical core

use super::{CalculatorEntry, CalculatorInputs, CalculatorOutput, Metric, Unit};
use crate::cashflow::{
    annualize_rate, annuity_due_pv, annuity_pv, discounted_payback, growing_flow, npv,
    simple_payback, solve_irr_with, CashFlowSchedule, PaybackResult, SolveResult,
};
use crate::config::CalcConfig;
use crate::error::{CalcError, CalcResult};
use crate::stats::{achieved_power, sample_size, ProportionTestParams};

pub static CALCULATORS: &[CalculatorEntry] = &[
    CalculatorEntry {
        key: "npv",
        title: "Net Present Value",
        inputs: &["rate", "cash_flows"],
        compute: compute_npv,
    },
    CalculatorEntry {
        key: "irr",
        title: "Internal Rate of Return",
        inputs: &["cash_flows", "periods_per_year?", "hurdle_rate?"],
        compute: compute_irr,
    },
    CalculatorEntry {
        key: "annuity-pv",
        title: "Present Value of an Annuity",
        inputs: &["payment", "rate", "periods", "due?"],
        compute: compute_annuity_pv,
    },
    CalculatorEntry {
        key: "discounted-payback",
        title: "Discounted Payback Period",
        inputs: &["outlay", "flow", "rate", "growth?", "horizon?"],
        compute: compute_discounted_payback,
    },
    CalculatorEntry {
        key: "ab-test-sample-size",
        title: "A/B Test Sample Size",
        inputs: &["baseline_rate", "mde", "alpha?", "power?", "variants?", "daily_visitors?"],
        compute: compute_ab_sample_size,
    },
];

fn compute_npv(inputs: &CalculatorInputs, _config: &CalcConfig) -> CalcResult<CalculatorOutput> {
    let rate = inputs.require("rate")?;
    let schedule = inputs.schedule()?;
    let mut warnings = Vec::new();

    let value = npv(&schedule, rate)?;

    let inflows = CashFlowSchedule::new(schedule.amounts().iter().map(|cf| cf.max(0.0)).collect())?;
    let outflows = CashFlowSchedule::new(schedule.amounts().iter().map(|cf| cf.min(0.0)).collect())?;
    let pv_in = npv(&inflows, rate)?;
    let pv_out = npv(&outflows, rate)?;

    if rate > 1.0 {
        warnings.push(format!(
            "Discount rate of {:.0}% per period is unusually high; enter rates as decimals (0.10 for 10%)",
            rate * 100.0
        ));
    }

    let profitability = if pv_out < 0.0 {
        Metric::new("Profitability index", pv_in / -pv_out, Unit::Ratio)
    } else {
        Metric::not_available("Profitability index", Unit::Ratio)
    };

    Ok(CalculatorOutput::new(Metric::new("Net present value", value, Unit::Currency))
        .with_secondary(Metric::new("PV of inflows", pv_in, Unit::Currency))
        .with_secondary(Metric::new("PV of outflows", pv_out, Unit::Currency))
        .with_secondary(profitability)
        .with_secondary(Metric::new("Undiscounted total", schedule.total(), Unit::Currency))
        .with_warnings(warnings))
}

fn compute_irr(inputs: &CalculatorInputs, config: &CalcConfig) -> CalcResult<CalculatorOutput> {
    let schedule = inputs.schedule()?;
    let periods_per_year = inputs.count_or("periods_per_year", 1)?;
    let mut warnings = Vec::new();

    let changes = schedule.sign_changes();
    if changes > 1 {
        warnings.push(format!(
            "Cash flows change sign {} times, so more than one IRR may exist; the first root found is reported",
            changes
        ));
    }

    let rate = match solve_irr_with(&schedule, &config.irr) {
        SolveResult::Found(rate) => Some(rate),
        SolveResult::NotFound => {
            warnings.push("No internal rate of return exists for these cash flows".to_string());
            None
        }
        SolveResult::DomainError(reason) => return Err(CalcError::Domain { reason }),
    };

    let mut output = CalculatorOutput::new(Metric::from_option(
        "Internal rate of return",
        rate,
        Unit::Percent,
    ));

    if periods_per_year > 1 {
        let annual = rate.map(|r| annualize_rate(r, periods_per_year)).transpose()?;
        output = output.with_secondary(Metric::from_option(
            "Effective annual rate",
            annual,
            Unit::Percent,
        ));
    }

    if let Some(hurdle) = inputs.get("hurdle_rate") {
        let value = npv(&schedule, hurdle)?;
        output = output.with_secondary(Metric::new("NPV at hurdle rate", value, Unit::Currency));
        if let Some(r) = rate {
            if r < hurdle {
                warnings.push("IRR is below the hurdle rate".to_string());
            }
        }
    }

    Ok(output.with_warnings(warnings))
}

fn compute_annuity_pv(inputs: &CalculatorInputs, _config: &CalcConfig) -> CalcResult<CalculatorOutput> {
    let payment = inputs.require("payment")?;
    let rate = inputs.require("rate")?;
    let periods = inputs.require_count("periods")?;

    let due = inputs.get_or("due", 0.0) != 0.0;
    let pv = if due {
        annuity_due_pv(payment, rate, periods)?
    } else {
        annuity_pv(payment, rate, periods)?
    };
    let total = payment * periods as f64;

    Ok(CalculatorOutput::new(Metric::new("Present value", pv, Unit::Currency))
        .with_secondary(Metric::new("Total payments", total, Unit::Currency))
        .with_secondary(Metric::new("Discount", total - pv, Unit::Currency)))
}

fn compute_discounted_payback(
    inputs: &CalculatorInputs,
    config: &CalcConfig,
) -> CalcResult<CalculatorOutput> {
    let outlay = inputs.require("outlay")?;
    let flow = inputs.require("flow")?;
    let rate = inputs.require("rate")?;
    let growth = inputs.get_or("growth", 0.0);
    let horizon = inputs.count_or("horizon", config.payback_horizon)?;
    let mut warnings = Vec::new();

    let discounted = discounted_payback(outlay, growing_flow(flow, growth), rate, horizon)?;
    let simple = simple_payback(outlay, growing_flow(flow, growth), horizon)?;

    if discounted == PaybackResult::NotReached {
        warnings.push(format!(
            "The outlay is not recovered in present-value terms within {} periods",
            horizon
        ));
    }

    Ok(CalculatorOutput::new(Metric::from_option(
        "Discounted payback period",
        discounted.periods(),
        Unit::Periods,
    ))
    .with_secondary(Metric::from_option(
        "Simple payback period",
        simple.periods(),
        Unit::Periods,
    ))
    .with_warnings(warnings))
}

fn compute_ab_sample_size(
    inputs: &CalculatorInputs,
    _config: &CalcConfig,
) -> CalcResult<CalculatorOutput> {
    let params = ProportionTestParams::new(
        inputs.require("baseline_rate")?,
        inputs.require("mde")?,
        inputs.get_or("alpha", 0.05),
        inputs.get_or("power", 0.8),
    )?;
    let variants = inputs.count_or("variants", 2)?;
    if variants < 2 {
        return Err(CalcError::domain("an A/B test needs at least two variants"));
    }
    let mut warnings = Vec::new();

    let result = sample_size(&params)?;

    if params.power < 0.8 {
        warnings.push("Power below 80% makes it likely a real effect goes undetected".to_string());
    }
    if params.alpha > 0.1 {
        warnings.push("Significance level above 10% gives a high false-positive rate".to_string());
    }

    let mut output = CalculatorOutput::new(Metric::new(
        "Sample size per variant",
        result.per_variant as f64,
        Unit::Count,
    ))
    .with_secondary(Metric::new("Total sample size", result.total(variants)? as f64, Unit::Count))
    .with_secondary(Metric::new("Variant conversion rate", params.p2(), Unit::Percent))
    .with_secondary(Metric::new("z (significance)", result.z_alpha, Unit::Number))
    .with_secondary(Metric::new("z (power)", result.z_power, Unit::Number))
    .with_secondary(Metric::new(
        "Achieved power",
        achieved_power(&params, result.per_variant)?,
        Unit::Percent,
    ));

    if let Some(daily) = inputs.get("daily_visitors") {
        let days = result.duration_days(variants, daily)?;
        output = output.with_secondary(Metric::new("Test duration (days)", days as f64, Unit::Count));
    }

    Ok(output.with_warnings(warnings))
}
