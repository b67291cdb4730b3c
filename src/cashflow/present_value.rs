//! Present value of cash-flow schedules and level annuities
//!
//! Every function rejects rates at or below -100% per period, where the
//! compounding base `1 + rate` stops being positive.

use super::CashFlowSchedule;
use crate::error::{check_rate, CalcResult};

/// Net present value: sum of `amount_t / (1 + rate)^t` over all periods
pub fn npv(schedule: &CashFlowSchedule, rate: f64) -> CalcResult<f64> {
    check_rate(rate)?;
    Ok(npv_unchecked(schedule.amounts(), rate))
}

/// NPV without the domain guard, for solvers that choose their own rates.
///
/// May return a non-finite value when `1 + rate` is tiny and the schedule is long.
pub(crate) fn npv_unchecked(cashflows: &[f64], rate: f64) -> f64 {
    let base = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / base.powi(t as i32))
        .sum()
}

/// Discount factor `(1 + rate)^-period`
pub fn discount_factor(rate: f64, period: u32) -> CalcResult<f64> {
    check_rate(rate)?;
    Ok((1.0 + rate).powf(-f64::from(period)))
}

/// NPV evaluated at each rate in turn, in the same order
pub fn npv_profile(schedule: &CashFlowSchedule, rates: &[f64]) -> CalcResult<Vec<f64>> {
    rates.iter().map(|&rate| npv(schedule, rate)).collect()
}

/// PV of a level annuity, payments at the end of each period.
///
/// `amount * (1 - (1+rate)^-periods) / rate`, or `amount * periods` at a zero rate.
pub fn annuity_pv(amount: f64, rate: f64, periods: u32) -> CalcResult<f64> {
    check_rate(rate)?;
    if rate == 0.0 {
        return Ok(amount * f64::from(periods));
    }
    Ok(amount * (1.0 - (1.0 + rate).powf(-f64::from(periods))) / rate)
}

/// PV of a level annuity, first payment immediate
pub fn annuity_due_pv(amount: f64, rate: f64, periods: u32) -> CalcResult<f64> {
    Ok(annuity_pv(amount, rate, periods)? * (1.0 + rate))
}
