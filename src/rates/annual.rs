//! Annual inflation index table (IPC series)
//!
//! One multiplicative factor per calendar year, used to deflate a
//! calculation base from its reference year back to earlier years. The
//! behavior for a year with no recorded factor is a configuration choice,
//! not an assumption baked into call sites.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What to do when an indexing range crosses a year with no recorded factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingIndexPolicy {
    /// Treat the missing year as factor 1.0 (no adjustment)
    NoAdjustment,
    /// Surface `MissingAnnualIndex` instead of adjusting silently
    Fail,
}

/// Annual index series
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnualIndexTable {
    factors: BTreeMap<i32, f64>,
}

impl AnnualIndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (year, factor) pairs
    pub fn from_entries(entries: impl IntoIterator<Item = (i32, f64)>) -> Self {
        Self {
            factors: entries.into_iter().collect(),
        }
    }

    /// Record or overwrite the factor for a year
    pub fn insert(&mut self, year: i32, factor: f64) {
        self.factors.insert(year, factor);
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.factors.get(&year).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
