//! Sample size for a two-proportion z-test (A/B conversion test)

use super::normal::{inv_normal_cdf, normal_cdf};
use crate::error::{check_open_unit, CalcError, CalcResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Inputs of a two-sided two-proportion test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionTestParams {
    /// Baseline conversion rate
    pub p1: f64,
    /// Minimum detectable absolute lift
    pub delta: f64,
    /// Two-sided significance level
    pub alpha: f64,
    /// Statistical power, 1 - β
    pub power: f64,
}

impl ProportionTestParams {
    /// Validate every quantity before any computation runs
    pub fn new(p1: f64, delta: f64, alpha: f64, power: f64) -> CalcResult<Self> {
        check_open_unit("baseline rate p1", p1)?;
        if delta.is_nan() || delta <= 0.0 {
            return Err(CalcError::domain(format!(
                "minimum detectable effect must be positive, got {}",
                delta
            )));
        }
        check_open_unit("alpha", alpha)?;
        check_open_unit("power", power)?;
        check_open_unit("variant rate p1 + delta", p1 + delta)?;
        Ok(Self {
            p1,
            delta,
            alpha,
            power,
        })
    }

    /// Variant conversion rate `p1 + delta`
    pub fn p2(&self) -> f64 {
        self.p1 + self.delta
    }

    /// Pooled term `sqrt(2 p̄ (1 - p̄))` used under the null hypothesis
    fn pooled_sd(&self) -> f64 {
        let p_bar = (self.p1 + self.p2()) / 2.0;
        (2.0 * p_bar * (1.0 - p_bar)).sqrt()
    }

    /// Unpooled term `sqrt(p1 q1 + p2 q2)` used under the alternative
    fn unpooled_sd(&self) -> f64 {
        let p2 = self.p2();
        (self.p1 * (1.0 - self.p1) + p2 * (1.0 - p2)).sqrt()
    }
}

/// Largest per-variant count reported; beyond 2^53 the estimate no longer
/// maps to a distinct integer
pub const MAX_SAMPLE_SIZE: u64 = 1 << 53;

/// Required sample size and the critical values behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeResult {
    /// Observations needed in each variant
    pub per_variant: u64,
    /// `Φ⁻¹(1 - α/2)`
    pub z_alpha: f64,
    /// `Φ⁻¹(power)`
    pub z_power: f64,
}

impl SampleSizeResult {
    /// Observations across all variants
    pub fn total(&self, variants: u32) -> CalcResult<u64> {
        self.per_variant
            .checked_mul(u64::from(variants))
            .ok_or_else(|| {
                CalcError::domain(format!(
                    "total sample size overflows for {} variants of {}",
                    variants, self.per_variant
                ))
            })
    }

    /// Days of traffic needed to fill every variant
    pub fn duration_days(&self, variants: u32, daily_visitors: f64) -> CalcResult<u64> {
        if !daily_visitors.is_finite() || daily_visitors <= 0.0 {
            return Err(CalcError::domain(format!(
                "daily visitors must be positive, got {}",
                daily_visitors
            )));
        }
        let days = (self.total(variants)? as f64 / daily_visitors).ceil();
        if days > MAX_SAMPLE_SIZE as f64 {
            return Err(CalcError::domain(format!(
                "test duration of {:e} days is out of range",
                days
            )));
        }
        Ok(days as u64)
    }
}

/// Per-variant sample size for a two-sided two-proportion test.
///
/// `n = ceil(((z_α·s1 + z_β·s2) / δ)²)` with the pooled `s1` and unpooled
/// `s2` standard deviation terms.
pub fn sample_size(params: &ProportionTestParams) -> CalcResult<SampleSizeResult> {
    let z_alpha = inv_normal_cdf(1.0 - params.alpha / 2.0)?;
    let z_power = inv_normal_cdf(params.power)?;

    // A negative sum means a single observation already reaches the power
    let numerator = (z_alpha * params.pooled_sd() + z_power * params.unpooled_sd()).max(0.0);
    let estimate = (numerator / params.delta).powi(2);
    if !estimate.is_finite() || estimate > MAX_SAMPLE_SIZE as f64 {
        return Err(CalcError::domain(format!(
            "sample size estimate {:e} is out of range for {:?}",
            estimate, params
        )));
    }

    let per_variant = (estimate.ceil() as u64).max(1);
    debug!(
        "Sample size {:.3} -> {} per variant (z_alpha {:.6}, z_power {:.6})",
        estimate, per_variant, z_alpha, z_power
    );

    Ok(SampleSizeResult {
        per_variant,
        z_alpha,
        z_power,
    })
}

/// Per-variant sample size from raw inputs
pub fn sample_size_per_variant(p1: f64, delta: f64, alpha: f64, power: f64) -> CalcResult<SampleSizeResult> {
    let params = ProportionTestParams::new(p1, delta, alpha, power)?;
    sample_size(&params)
}

/// Power achieved with `n` observations per variant; the inverse of [`sample_size`]
pub fn achieved_power(params: &ProportionTestParams, n: u64) -> CalcResult<f64> {
    if n == 0 {
        return Err(CalcError::domain("sample size must be positive"));
    }
    let z_alpha = inv_normal_cdf(1.0 - params.alpha / 2.0)?;
    let z = (params.delta * (n as f64).sqrt() - z_alpha * params.pooled_sd()) / params.unpooled_sd();
    Ok(normal_cdf(z))
}
