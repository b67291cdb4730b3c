//! Discounted and simple payback period search

use crate::error::{check_rate, CalcError, CalcResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Outcome of a payback search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaybackResult {
    /// Fractional period at which cumulative inflow first covers the outlay
    Found(f64),
    /// Horizon exhausted before the outlay was recovered
    NotReached,
}

impl PaybackResult {
    pub fn periods(&self) -> Option<f64> {
        match self {
            PaybackResult::Found(periods) => Some(*periods),
            PaybackResult::NotReached => None,
        }
    }
}

/// Flow function paying `amount` every period
pub fn constant_flow(amount: f64) -> impl Fn(u32) -> f64 {
    move |_| amount
}

/// Flow function paying `first` in period 1, growing by `growth` per period after that
pub fn growing_flow(first: f64, growth: f64) -> impl Fn(u32) -> f64 {
    move |period| first * (1.0 + growth).powf(f64::from(period.saturating_sub(1)))
}

/// Find the smallest fractional period `t*` at which cumulative discounted
/// inflow reaches `outlay`.
///
/// Flows are received at the end of periods `1..=horizon` and discounted by
/// `(1 + rate)^t`. Within the crossing period the position is interpolated
/// linearly. At a zero rate flows are used undiscounted, so the result
/// equals the simple payback period.
pub fn discounted_payback<F>(outlay: f64, flow: F, rate: f64, horizon: u32) -> CalcResult<PaybackResult>
where
    F: Fn(u32) -> f64,
{
    if !outlay.is_finite() || outlay <= 0.0 {
        return Err(CalcError::domain(format!(
            "outlay must be positive, got {}",
            outlay
        )));
    }
    check_rate(rate)?;

    let mut cumulative = 0.0;
    for period in 1..=horizon {
        let amount = flow(period);
        if !amount.is_finite() {
            return Err(CalcError::domain(format!(
                "cash flow at period {} is not finite",
                period
            )));
        }

        let discounted = if rate == 0.0 {
            amount
        } else {
            amount / (1.0 + rate).powf(f64::from(period))
        };

        let before = cumulative;
        cumulative += discounted;

        if cumulative >= outlay {
            // discounted > 0 here: cumulative rose from below outlay to at least outlay
            let payback = (period - 1) as f64 + (outlay - before) / discounted;
            debug!(
                "Payback crossed in period {} at {:.6} (rate {})",
                period, payback, rate
            );
            return Ok(PaybackResult::Found(payback));
        }
    }

    debug!(
        "Payback not reached within {} periods, recovered {:.2} of {:.2}",
        horizon, cumulative, outlay
    );
    Ok(PaybackResult::NotReached)
}

/// Undiscounted payback period
pub fn simple_payback<F>(outlay: f64, flow: F, horizon: u32) -> CalcResult<PaybackResult>
where
    F: Fn(u32) -> f64,
{
    discounted_payback(outlay, flow, 0.0, horizon)
}
