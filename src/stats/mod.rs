//! Statistics for experiment design: the normal distribution and
//! two-proportion sample sizing

mod normal;
mod sample_size;

pub use normal::{inv_normal_cdf, normal_cdf, normal_pdf};
pub use sample_size::{
    sample_size, sample_size_per_variant, achieved_power, MAX_SAMPLE_SIZE,
    ProportionTestParams, SampleSizeResult,
};
