//! Runtime configuration for the calculator registry
//!
//! Defaults reproduce the documented solver behaviour. A JSON file can
//! override any subset of fields, and a few environment variables can
//! override those again:
//!   CALC_IRR_MAX_ITERATIONS, CALC_IRR_TOLERANCE, CALC_PAYBACK_HORIZON

use crate::cashflow::IrrConfig;
use crate::error::CalcResult;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default number of periods searched for payback when the caller gives none
pub const DEFAULT_PAYBACK_HORIZON: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    /// IRR bracket search and bisection settings
    pub irr: IrrConfig,
    /// Payback search horizon in periods
    pub payback_horizon: u32,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            irr: IrrConfig::default(),
            payback_horizon: DEFAULT_PAYBACK_HORIZON,
        }
    }
}

impl CalcConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> CalcResult<Self> {
        let file = File::open(path.as_ref())?;
        let config: CalcConfig = serde_json::from_reader(BufReader::new(file))?;
        config.irr.validate()?;
        debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply environment overrides; unset or unparseable variables are ignored
    pub fn with_env_overrides(mut self) -> Self {
        self.irr.max_iterations = env::var("CALC_IRR_MAX_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(self.irr.max_iterations);

        self.irr.tolerance = env::var("CALC_IRR_TOLERANCE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(self.irr.tolerance);

        self.payback_horizon = env::var("CALC_PAYBACK_HORIZON")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(self.payback_horizon);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CalcConfig::default();
        assert_eq!(config.irr.max_iterations, 80);
        assert_eq!(config.irr.probe_ladder.len(), 13);
        assert_eq!(config.payback_horizon, DEFAULT_PAYBACK_HORIZON);
        assert!(config.irr.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: CalcConfig =
            serde_json::from_str(r#"{ "irr": { "max_iterations": 120 } }"#).unwrap();
        assert_eq!(config.irr.max_iterations, 120);
        assert_eq!(config.irr.upper_bound, 10.0);
        assert_eq!(config.payback_horizon, DEFAULT_PAYBACK_HORIZON);
    }

    #[test]
    fn test_from_json_path() {
        let path = env::temp_dir().join(format!("calc_config_{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{ "payback_horizon": 12 }}"#).unwrap();

        let config = CalcConfig::from_json_path(&path).unwrap();
        assert_eq!(config.payback_horizon, 12);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_json_path_rejects_bad_bounds() {
        let path = env::temp_dir().join(format!("calc_config_bad_{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{ "irr": {{ "lower_bound": -1.5 }} }}"#).unwrap();

        assert!(CalcConfig::from_json_path(&path).unwrap_err().is_domain());
        std::fs::remove_file(&path).ok();
    }
}
