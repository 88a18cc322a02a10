//! Monthly accrual rate table (DTF series)
//!
//! Rates are effective annual rates keyed by calendar month. The table is
//! append/update only; missing months resolve through a fallback chain:
//! 1. average of the trailing up-to-12 recorded rates at or before the
//!    requested month
//! 2. the configured default monthly rate, when one is configured
//!
//! Only a repository configured without a default rate can surface
//! `MissingRateData`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::period::Period;

/// Monthly rate series with trailing-average fallback
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyRateTable {
    rates: BTreeMap<Period, f64>,
}

impl MonthlyRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (period, rate) pairs
    pub fn from_entries(entries: impl IntoIterator<Item = (Period, f64)>) -> Self {
        Self {
            rates: entries.into_iter().collect(),
        }
    }

    /// Record or overwrite the rate for a month
    pub fn insert(&mut self, period: Period, rate: f64) {
        self.rates.insert(period, rate);
    }

    /// Exact lookup, no fallback
    pub fn get(&self, period: &Period) -> Option<f64> {
        self.rates.get(period).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rate for a month, resolving misses through the fallback chain
    pub fn rate_or_fallback(
        &self,
        period: &Period,
        default_rate: Option<f64>,
    ) -> Result<f64, EngineError> {
        if let Some(rate) = self.get(period) {
            return Ok(rate);
        }
        if let Some(avg) = self.trailing_average(period, 12) {
            log::debug!("no rate recorded for {period}, using trailing average {avg:.6}");
            return Ok(avg);
        }
        match default_rate {
            Some(rate) => {
                log::warn!("no rate history at or before {period}, using default {rate:.6}");
                Ok(rate)
            }
            None => Err(EngineError::MissingRateData { period: *period }),
        }
    }

    /// Average of the most recent `window` recorded rates at or before `period`
    fn trailing_average(&self, period: &Period, window: usize) -> Option<f64> {
        let trailing: Vec<f64> = self
            .rates
            .range(..=*period)
            .rev()
            .take(window)
            .map(|(_, rate)| *rate)
            .collect();
        if trailing.is_empty() {
            None
        } else {
            Some(trailing.iter().sum::<f64>() / trailing.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(year: i32, month: u32) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn test_exact_lookup_wins() {
        let table = MonthlyRateTable::from_entries([(p(2024, 1), 0.10), (p(2024, 2), 0.12)]);
        assert_relative_eq!(table.rate_or_fallback(&p(2024, 2), Some(0.005)).unwrap(), 0.12);
    }

    #[test]
    fn test_trailing_average_fallback() {
        let table = MonthlyRateTable::from_entries([
            (p(2024, 1), 0.10),
            (p(2024, 2), 0.12),
            (p(2024, 3), 0.14),
        ]);
        // 2024-06 has no rate; average over the three recorded months
        assert_relative_eq!(table.rate_or_fallback(&p(2024, 6), Some(0.005)).unwrap(), 0.12);
    }

    #[test]
    fn test_trailing_average_caps_at_twelve() {
        let entries: Vec<(Period, f64)> = (1..=12)
            .map(|m| (p(2023, m), 0.10))
            .chain((1..=6).map(|m| (p(2024, m), 0.20)))
            .collect();
        let table = MonthlyRateTable::from_entries(entries);
        // Trailing 12 from 2024-07: six months at 0.20, six at 0.10
        assert_relative_eq!(table.rate_or_fallback(&p(2024, 7), Some(0.005)).unwrap(), 0.15);
    }

    #[test]
    fn test_default_when_no_history_before_period() {
        let table = MonthlyRateTable::from_entries([(p(2024, 6), 0.10)]);
        assert_relative_eq!(table.rate_or_fallback(&p(2024, 1), Some(0.005)).unwrap(), 0.005);
    }

    #[test]
    fn test_default_when_empty() {
        let table = MonthlyRateTable::new();
        assert_relative_eq!(table.rate_or_fallback(&p(2024, 1), Some(0.005)).unwrap(), 0.005);
    }

    #[test]
    fn test_missing_rate_surfaced_without_default() {
        let table = MonthlyRateTable::new();
        assert_eq!(
            table.rate_or_fallback(&p(2024, 1), None),
            Err(EngineError::MissingRateData { period: p(2024, 1) })
        );
    }
}
