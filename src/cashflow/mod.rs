//! Cash-flow analytics: present value, IRR and payback period

mod schedule;
mod present_value;
mod irr;
mod payback;

pub use schedule::{CashFlowSchedule, load_schedule, load_schedule_from_reader};
pub use present_value::{npv, npv_profile, discount_factor, annuity_pv, annuity_due_pv};
pub use irr::{
    solve_irr, solve_irr_with, solve_irr_flows, annualize_rate,
    IrrConfig, SolveResult,
    DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND, DEFAULT_PROBE_LADDER,
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
pub use payback::{discounted_payback, simple_payback, constant_flow, growing_flow, PaybackResult};
