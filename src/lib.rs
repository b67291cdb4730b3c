//! Calc Numerics - numerical core for business and financial calculators
//!
//! This library provides:
//! - Net present value and level-annuity present value
//! - Internal rate of return by bracketed bisection
//! - Discounted and simple payback period search
//! - Inverse standard normal CDF and two-proportion sample sizing
//! - A registry mapping calculator keys to pure compute functions
//!
//! Every function is deterministic and side-effect free. Inputs outside
//! their mathematical domain are rejected with [`CalcError`]; "no IRR" and
//! "payback not reached" are ordinary results, not errors.

pub mod error;
pub mod config;
pub mod cashflow;
pub mod stats;
pub mod registry;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use config::CalcConfig;
pub use cashflow::{
    CashFlowSchedule, IrrConfig, SolveResult, PaybackResult,
    npv, annuity_pv, solve_irr, discounted_payback,
};
pub use stats::{inv_normal_cdf, normal_cdf, sample_size_per_variant, SampleSizeResult};
pub use registry::{Registry, CalculatorInputs, CalculatorOutput, Metric, Unit};
