//! Internal Rate of Return (IRR) solver
//!
//! Brackets a sign change of NPV(rate) and bisects it to convergence.
//!
//! # Known limitation
//! A schedule with several sign changes can have several IRRs. The solver
//! is not a multi-root solver: it returns the root inside the first bracket
//! found, checking the default bounds first and then the probe ladder in
//! ascending order. Callers can use [`CashFlowSchedule::sign_changes`] to
//! warn when more than one IRR may exist.

use super::present_value::npv_unchecked;
use super::CashFlowSchedule;
use crate::error::{check_rate, CalcError, CalcResult};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Default lower search bound, just inside the `rate > -1` domain
pub const DEFAULT_LOWER_BOUND: f64 = -0.9999;

/// Default upper search bound (1000% per period)
pub const DEFAULT_UPPER_BOUND: f64 = 10.0;

/// Probe rates walked in order when the default bounds do not bracket a root
pub const DEFAULT_PROBE_LADDER: [f64; 13] =
    [-0.9, -0.5, -0.2, 0.0, 0.1, 0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 8.0, 10.0];

/// Bisection iteration cap; 80 halvings take a width-10 interval far below f64 resolution
pub const DEFAULT_MAX_ITERATIONS: u32 = 80;

/// |NPV| below which a midpoint is accepted as the root
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Search configuration for the IRR solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrConfig {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub probe_ladder: Vec<f64>,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            probe_ladder: DEFAULT_PROBE_LADDER.to_vec(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl IrrConfig {
    /// Check that every search rate stays inside the NPV domain
    pub fn validate(&self) -> CalcResult<()> {
        check_rate(self.lower_bound)?;
        check_rate(self.upper_bound)?;
        if self.upper_bound <= self.lower_bound {
            return Err(CalcError::domain(format!(
                "upper bound {} must exceed lower bound {}",
                self.upper_bound, self.lower_bound
            )));
        }
        if self.probe_ladder.is_empty() {
            return Err(CalcError::domain("probe ladder must not be empty"));
        }
        for &rate in &self.probe_ladder {
            check_rate(rate)?;
        }
        if self.max_iterations == 0 {
            return Err(CalcError::domain("max_iterations must be positive"));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(CalcError::domain("tolerance must be positive"));
        }
        Ok(())
    }
}

/// Outcome of an IRR solve. A rate is only ever reported when a root was bracketed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveResult {
    Found(f64),
    NotFound,
    DomainError(String),
}

impl SolveResult {
    pub fn rate(&self) -> Option<f64> {
        match self {
            SolveResult::Found(rate) => Some(*rate),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SolveResult::Found(_))
    }
}

/// Rates whose NPVs have opposite signs, both nonzero and finite
#[derive(Debug, Clone, Copy)]
struct Bracket {
    lo: f64,
    hi: f64,
    npv_lo: f64,
    npv_hi: f64,
}

/// What a bracket search turned up
enum Search {
    Root(f64),
    Interval(Bracket),
    Nothing,
}

/// A probe point whose NPV evaluated to a finite number
#[derive(Debug, Clone, Copy)]
struct Probe {
    rate: f64,
    npv: f64,
}

fn probe(cashflows: &[f64], rate: f64) -> Option<Probe> {
    let npv = npv_unchecked(cashflows, rate);
    trace!("IRR probe: NPV({}) = {}", rate, npv);
    if npv.is_finite() {
        Some(Probe { rate, npv })
    } else {
        warn!("IRR probe at rate {} gave non-finite NPV, skipping", rate);
        None
    }
}

/// Classify a consecutive pair of probes
fn check_pair(a: Probe, b: Probe) -> Search {
    if a.npv == 0.0 {
        return Search::Root(a.rate);
    }
    if b.npv == 0.0 {
        return Search::Root(b.rate);
    }
    if a.npv.signum() != b.npv.signum() {
        return Search::Interval(Bracket {
            lo: a.rate,
            hi: b.rate,
            npv_lo: a.npv,
            npv_hi: b.npv,
        });
    }
    Search::Nothing
}

fn find_bracket(cashflows: &[f64], config: &IrrConfig) -> Search {
    if let (Some(lo), Some(hi)) = (
        probe(cashflows, config.lower_bound),
        probe(cashflows, config.upper_bound),
    ) {
        match check_pair(lo, hi) {
            Search::Nothing => {}
            found => return found,
        }
    }

    debug!("Default IRR bounds do not bracket a root, walking probe ladder");
    let mut previous: Option<Probe> = None;
    for &rate in &config.probe_ladder {
        let Some(current) = probe(cashflows, rate) else {
            continue;
        };
        if current.npv == 0.0 {
            return Search::Root(current.rate);
        }
        if let Some(prev) = previous {
            match check_pair(prev, current) {
                Search::Nothing => {}
                found => return found,
            }
        }
        previous = Some(current);
    }

    Search::Nothing
}

fn bisect(cashflows: &[f64], bracket: Bracket, config: &IrrConfig) -> SolveResult {
    let Bracket {
        mut lo,
        mut hi,
        mut npv_lo,
        ..
    } = bracket;
    debug!(
        "IRR bracket [{}, {}], NPV [{:.6e}, {:.6e}]",
        lo, hi, bracket.npv_lo, bracket.npv_hi
    );

    for iteration in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let npv_mid = npv_unchecked(cashflows, mid);

        if !npv_mid.is_finite() {
            warn!("IRR bisection hit non-finite NPV at rate {}", mid);
            return SolveResult::NotFound;
        }

        if npv_mid.abs() < config.tolerance {
            debug!("IRR converged to {} after {} iterations", mid, iteration + 1);
            return SolveResult::Found(mid);
        }

        // Keep the half whose endpoints still straddle zero
        if npv_mid.signum() != npv_lo.signum() {
            hi = mid;
        } else {
            lo = mid;
            npv_lo = npv_mid;
        }
    }

    let rate = 0.5 * (lo + hi);
    debug!(
        "IRR bisection reached {} iterations, bracket width {:.3e}",
        config.max_iterations,
        hi - lo
    );
    SolveResult::Found(rate)
}

/// Solve for the IRR of a schedule with the default search configuration
pub fn solve_irr(schedule: &CashFlowSchedule) -> SolveResult {
    solve_irr_with(schedule, &IrrConfig::default())
}

/// Solve for the IRR of a schedule.
///
/// Returns `NotFound` when no sign change of NPV can be located; a rate is
/// never guessed.
pub fn solve_irr_with(schedule: &CashFlowSchedule, config: &IrrConfig) -> SolveResult {
    if let Err(err) = config.validate() {
        return SolveResult::DomainError(err.to_string());
    }

    // No sign change in the flows means NPV keeps one sign for every rate
    if !schedule.has_inflow() || !schedule.has_outflow() {
        debug!("Cash flows never change sign, no IRR exists");
        return SolveResult::NotFound;
    }

    let cashflows = schedule.amounts();
    match find_bracket(cashflows, config) {
        Search::Root(rate) => {
            debug!("IRR probe landed exactly on root {}", rate);
            SolveResult::Found(rate)
        }
        Search::Interval(bracket) => bisect(cashflows, bracket, config),
        Search::Nothing => {
            debug!("No sign change of NPV found across the probe ladder");
            SolveResult::NotFound
        }
    }
}

/// Solve for the IRR of raw amounts, periods 0, 1, 2, ...
pub fn solve_irr_flows(cashflows: &[f64]) -> SolveResult {
    match CashFlowSchedule::new(cashflows.to_vec()) {
        Ok(schedule) => solve_irr(&schedule),
        Err(err) => SolveResult::DomainError(err.to_string()),
    }
}

/// Convert a periodic rate to an effective annual rate: `(1 + r)^n - 1`
pub fn annualize_rate(periodic_rate: f64, periods_per_year: u32) -> CalcResult<f64> {
    check_rate(periodic_rate)?;
    if periods_per_year == 0 {
        return Err(CalcError::domain("periods_per_year must be positive"));
    }
    Ok((1.0 + periodic_rate).powf(f64::from(periods_per_year)) - 1.0)
}
