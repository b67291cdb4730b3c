//! Cash-flow schedules and their CSV loader

use crate::error::{CalcError, CalcResult};
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered cash flows indexed by consecutive periods starting at 0.
///
/// Period 0 is conventionally the initial outlay. A schedule is never empty
/// and every amount is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    amounts: Vec<f64>,
}

impl CashFlowSchedule {
    /// Build a schedule from amounts, assigning periods 0, 1, 2, ...
    pub fn new(amounts: Vec<f64>) -> CalcResult<Self> {
        if amounts.is_empty() {
            return Err(CalcError::invalid_schedule("schedule must not be empty"));
        }
        if let Some(period) = amounts.iter().position(|cf| !cf.is_finite()) {
            return Err(CalcError::invalid_schedule(format!(
                "amount at period {} is not finite",
                period
            )));
        }
        Ok(Self { amounts })
    }

    /// Build a schedule from explicit (period, amount) pairs in any order.
    ///
    /// Periods must be unique and cover 0..n without gaps.
    pub fn from_pairs(pairs: &[(u32, f64)]) -> CalcResult<Self> {
        let mut sorted = pairs.to_vec();
        sorted.sort_by_key(|(period, _)| *period);

        for (expected, (period, _)) in sorted.iter().enumerate() {
            let expected = expected as u32;
            if *period < expected {
                return Err(CalcError::invalid_schedule(format!(
                    "duplicate period {}",
                    period
                )));
            }
            if *period > expected {
                return Err(CalcError::invalid_schedule(format!(
                    "missing period {}",
                    expected
                )));
            }
        }

        Self::new(sorted.into_iter().map(|(_, amount)| amount).collect())
    }

    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }

    /// Number of periods, including period 0
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Iterate (period, amount) pairs
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.amounts
            .iter()
            .enumerate()
            .map(|(t, &cf)| (t as u32, cf))
    }

    /// Undiscounted sum of all amounts
    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    pub fn has_inflow(&self) -> bool {
        self.amounts.iter().any(|&cf| cf > 0.0)
    }

    pub fn has_outflow(&self) -> bool {
        self.amounts.iter().any(|&cf| cf < 0.0)
    }

    /// Count sign changes in the amount sequence, ignoring zeros.
    ///
    /// By Descartes' rule of signs this bounds the number of positive
    /// roots of NPV in the discount factor, i.e. the number of IRRs.
    pub fn sign_changes(&self) -> usize {
        let mut changes = 0;
        let mut last_sign = 0.0_f64;
        for &cf in &self.amounts {
            if cf == 0.0 {
                continue;
            }
            let sign = cf.signum();
            if last_sign != 0.0 && sign != last_sign {
                changes += 1;
            }
            last_sign = sign;
        }
        changes
    }
}

/// Raw CSV row: `period,amount`
#[derive(Debug, Deserialize)]
struct CsvRow {
    period: u32,
    amount: f64,
}

/// Load a schedule from a CSV file with `period,amount` columns
pub fn load_schedule<P: AsRef<Path>>(path: P) -> CalcResult<CashFlowSchedule> {
    let reader = Reader::from_path(path)?;
    read_rows(reader)
}

/// Load a schedule from any reader (string buffer, stdin, ...)
pub fn load_schedule_from_reader<R: std::io::Read>(reader: R) -> CalcResult<CashFlowSchedule> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> CalcResult<CashFlowSchedule> {
    let mut pairs = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        pairs.push((row.period, row.amount));
    }
    CashFlowSchedule::from_pairs(&pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schedule_rejected() {
        let err = CashFlowSchedule::new(vec![]).unwrap_err();
        assert!(matches!(err, CalcError::InvalidSchedule { .. }));
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        assert!(CashFlowSchedule::new(vec![-100.0, f64::INFINITY]).is_err());
        assert!(CashFlowSchedule::new(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_from_pairs_sorts() {
        let schedule = CashFlowSchedule::from_pairs(&[(2, 30.0), (0, -50.0), (1, 20.0)]).unwrap();
        assert_eq!(schedule.amounts(), &[-50.0, 20.0, 30.0]);
    }

    #[test]
    fn test_from_pairs_rejects_duplicates_and_gaps() {
        assert!(CashFlowSchedule::from_pairs(&[(0, -1.0), (0, 2.0)]).is_err());
        assert!(CashFlowSchedule::from_pairs(&[(0, -1.0), (2, 2.0)]).is_err());
        assert!(CashFlowSchedule::from_pairs(&[(1, 2.0)]).is_err());
    }

    #[test]
    fn test_sign_changes() {
        let conventional = CashFlowSchedule::new(vec![-100.0, 60.0, 60.0]).unwrap();
        assert_eq!(conventional.sign_changes(), 1);

        // Mine-closure style: outlay, returns, clean-up cost
        let mine = CashFlowSchedule::new(vec![-1600.0, 10000.0, 0.0, -10000.0]).unwrap();
        assert_eq!(mine.sign_changes(), 2);

        let positive = CashFlowSchedule::new(vec![10.0, 0.0, 5.0]).unwrap();
        assert_eq!(positive.sign_changes(), 0);
        assert!(!positive.has_outflow());
    }

    #[test]
    fn test_load_from_reader() {
        let data = "period,amount\n0,-1000\n2,600\n1,500\n";
        let schedule = load_schedule_from_reader(data.as_bytes()).unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.amounts(), &[-1000.0, 500.0, 600.0]);
        assert!((schedule.total() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_load_from_reader_bad_row() {
        let data = "period,amount\n0,abc\n";
        let err = load_schedule_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CalcError::Csv(_)));
    }
}
