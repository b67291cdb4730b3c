//! Standard normal distribution: density, CDF and inverse CDF

use crate::error::{check_open_unit, CalcResult};

/// 1/√(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

// Acklam's rational approximation. Central region numerator/denominator.
const A: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
];
const B: [f64; 5] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
];

// Tail numerator/denominator, shared by both tails through symmetry
const C: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
];
const D: [f64; 4] = [
    7.784695709041462e-03,
    3.224671290700398e-01,
    2.445134137142996e+00,
    3.754408661907416e+00,
];

/// Breakpoint between the lower tail and the central region
const P_LOW: f64 = 0.02425;
const P_HIGH: f64 = 1.0 - P_LOW;

/// Inverse of the standard normal CDF (quantile function).
///
/// Given `p ∈ (0, 1)`, returns `z` with `Φ(z) ≈ p`. Probabilities at or
/// outside the interval bounds are a domain error.
///
/// # Algorithm
/// Acklam's piecewise rational approximation: one coefficient set for the
/// central region `[0.02425, 0.97575]` and one for the tails, evaluated
/// with Horner's rule. No refinement step is applied.
///
/// # Accuracy
/// Relative error below 1.15 × 10⁻⁹; absolute error stays around 10⁻⁹
/// across `(0, 1)`, reaching ~5 × 10⁻⁹ only deep in the tails.
pub fn inv_normal_cdf(p: f64) -> CalcResult<f64> {
    check_open_unit("probability", p)?;

    let z = if p < P_LOW {
        tail(p)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        let num = ((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5];
        let den = ((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0;
        q * num / den
    } else {
        -tail(1.0 - p)
    };

    Ok(z)
}

/// Lower-tail branch; `p` is the tail probability
fn tail(p: f64) -> f64 {
    let q = (-2.0 * p.ln()).sqrt();
    let num = ((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5];
    let den = (((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0;
    num / den
}

/// Standard normal CDF Φ(x).
///
/// Computed as `erfc(-x/√2) / 2` with a Chebyshev-fitted complementary
/// error function whose fractional error is below 1.2 × 10⁻⁷ everywhere,
/// so tail probabilities keep their relative precision.
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal density φ(x)
pub fn normal_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Complementary error function
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}
