//! Calculator registry
//!
//! Each calculator is a table entry mapping a stable key to a pure compute
//! function. Every compute function takes named numeric inputs and returns a
//! headline figure, secondary figures and any warnings raised along the way.
//! Parsing raw user input and formatting figures for display belong to the
//! caller.

mod calculators;

pub use calculators::CALCULATORS;

use crate::cashflow::CashFlowSchedule;
use crate::config::CalcConfig;
use crate::error::{CalcError, CalcResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a figure should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Currency,
    /// Decimal fraction, 0.1 = 10%
    Percent,
    Periods,
    Count,
    Ratio,
    Number,
}

/// A labelled figure; `value: None` renders as "not available"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: Option<f64>,
    pub unit: Unit,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: f64, unit: Unit) -> Self {
        Self {
            label: label.into(),
            value: Some(value),
            unit,
        }
    }

    pub fn not_available(label: impl Into<String>, unit: Unit) -> Self {
        Self {
            label: label.into(),
            value: None,
            unit,
        }
    }

    pub fn from_option(label: impl Into<String>, value: Option<f64>, unit: Unit) -> Self {
        Self {
            label: label.into(),
            value,
            unit,
        }
    }
}

/// Result of running one calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorOutput {
    pub headline: Metric,
    pub secondary: Vec<Metric>,
    pub warnings: Vec<String>,
}

impl CalculatorOutput {
    pub fn new(headline: Metric) -> Self {
        Self {
            headline,
            secondary: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_secondary(mut self, metric: Metric) -> Self {
        self.secondary.push(metric);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Look up a secondary figure by label
    pub fn secondary_value(&self, label: &str) -> Option<f64> {
        self.secondary
            .iter()
            .find(|m| m.label == label)
            .and_then(|m| m.value)
    }
}

/// Named numeric inputs plus an optional cash-flow series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorInputs {
    pub values: BTreeMap<String, f64>,
    pub cash_flows: Vec<f64>,
}

impl CalculatorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn with_cash_flows(mut self, cash_flows: Vec<f64>) -> Self {
        self.cash_flows = cash_flows;
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn require(&self, name: &str) -> CalcResult<f64> {
        self.get(name).ok_or_else(|| CalcError::MissingInput {
            name: name.to_string(),
        })
    }

    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    /// Non-negative whole-number input such as a horizon or a count
    pub fn count_or(&self, name: &str, default: u32) -> CalcResult<u32> {
        match self.get(name) {
            None => Ok(default),
            Some(v) => to_count(name, v),
        }
    }

    /// Whole-number input that must be present
    pub fn require_count(&self, name: &str) -> CalcResult<u32> {
        to_count(name, self.require(name)?)
    }

    /// The cash-flow series as a validated schedule
    pub fn schedule(&self) -> CalcResult<CashFlowSchedule> {
        if self.cash_flows.is_empty() {
            return Err(CalcError::MissingInput {
                name: "cash_flows".to_string(),
            });
        }
        CashFlowSchedule::new(self.cash_flows.clone())
    }
}

fn to_count(name: &str, v: f64) -> CalcResult<u32> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Ok(v as u32)
    } else {
        Err(CalcError::domain(format!(
            "{} must be a non-negative whole number, got {}",
            name, v
        )))
    }
}

/// Signature shared by every calculator
pub type ComputeFn = fn(&CalculatorInputs, &CalcConfig) -> CalcResult<CalculatorOutput>;

/// One row of the dispatch table
#[derive(Clone, Copy)]
pub struct CalculatorEntry {
    /// Stable lookup key
    pub key: &'static str,
    pub title: &'static str,
    /// Input names the calculator reads; optional ones are marked with `?`
    pub inputs: &'static [&'static str],
    pub compute: ComputeFn,
}

impl std::fmt::Debug for CalculatorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorEntry")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Dispatches calculator keys to their compute functions
#[derive(Debug, Clone, Default)]
pub struct Registry {
    config: CalcConfig,
}

impl Registry {
    pub fn new(config: CalcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    pub fn entries(&self) -> &'static [CalculatorEntry] {
        CALCULATORS
    }

    pub fn get(&self, key: &str) -> CalcResult<&'static CalculatorEntry> {
        CALCULATORS
            .iter()
            .find(|entry| entry.key == key)
            .ok_or_else(|| CalcError::UnknownCalculator {
                key: key.to_string(),
            })
    }

    pub fn run(&self, key: &str, inputs: &CalculatorInputs) -> CalcResult<CalculatorOutput> {
        let entry = self.get(key)?;
        debug!("Running calculator '{}' with {:?}", entry.key, inputs.values);
        (entry.compute)(inputs, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_unique() {
        let mut keys: Vec<_> = CALCULATORS.iter().map(|e| e.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CALCULATORS.len());
    }

    #[test]
    fn test_unknown_key() {
        let registry = Registry::default();
        let err = registry.run("mortgage", &CalculatorInputs::new()).unwrap_err();
        assert!(matches!(err, CalcError::UnknownCalculator { .. }));
    }

    #[test]
    fn test_missing_input() {
        let registry = Registry::default();
        let err = registry.run("npv", &CalculatorInputs::new()).unwrap_err();
        assert!(matches!(err, CalcError::MissingInput { .. }));
    }

    #[test]
    fn test_count_or() {
        let inputs = CalculatorInputs::new()
            .with("horizon", 12.0)
            .with("bad", 2.5)
            .with("negative", -1.0);
        assert_eq!(inputs.count_or("horizon", 30).unwrap(), 12);
        assert_eq!(inputs.count_or("missing", 30).unwrap(), 30);
        assert!(inputs.count_or("bad", 30).is_err());
        assert!(inputs.count_or("negative", 30).is_err());
    }

    #[test]
    fn test_require_count() {
        let inputs = CalculatorInputs::new().with("periods", 12.0).with("bad", 1.5);
        assert_eq!(inputs.require_count("periods").unwrap(), 12);
        assert!(inputs.require_count("bad").unwrap_err().is_domain());
        assert!(matches!(
            inputs.require_count("missing").unwrap_err(),
            CalcError::MissingInput { .. }
        ));
    }

    #[test]
    fn test_inputs_deserialize() {
        let inputs: CalculatorInputs =
            serde_json::from_str(r#"{ "values": { "rate": 0.1 }, "cash_flows": [-100, 60, 60] }"#)
                .unwrap();
        assert_eq!(inputs.get("rate"), Some(0.1));
        assert_eq!(inputs.schedule().unwrap().len(), 3);
    }
}
