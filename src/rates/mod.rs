//! Rate tables: monthly accrual rates (DTF) and annual inflation indices (IPC)

mod annual;
mod indexer;
mod monthly;
pub mod loader;

pub use annual::{AnnualIndexTable, MissingIndexPolicy};
pub use indexer::BaseIndexer;
pub use monthly::MonthlyRateTable;

use std::error::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::period::Period;

/// Configuration owned by the rate repository
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateConfig {
    /// Monthly rate used when no history exists at or before a requested
    /// month; `None` surfaces `MissingRateData` instead
    pub default_monthly_rate: Option<f64>,

    /// Behavior for indexing ranges crossing a year with no recorded factor
    pub missing_index: MissingIndexPolicy,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            default_monthly_rate: Some(0.005),
            missing_index: MissingIndexPolicy::NoAdjustment,
        }
    }
}

/// Read-only repository of monthly rates and annual indices
///
/// Pure lookups: the fallback chain for missing monthly rates lives in
/// `MonthlyRateTable`, the missing-annual-index policy in `RateConfig`.
/// Cloning is cheap enough to hand each parallel worker its own copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateRepository {
    monthly: MonthlyRateTable,
    annual: AnnualIndexTable,
    config: RateConfig,
}

impl RateRepository {
    pub fn new(config: RateConfig) -> Self {
        Self {
            monthly: MonthlyRateTable::new(),
            annual: AnnualIndexTable::new(),
            config,
        }
    }

    /// Build from pre-loaded tables
    pub fn with_tables(
        monthly: MonthlyRateTable,
        annual: AnnualIndexTable,
        config: RateConfig,
    ) -> Self {
        Self {
            monthly,
            annual,
            config,
        }
    }

    /// Load both tables from CSV files in a rates directory
    pub fn from_csv_path(path: &Path, config: RateConfig) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            monthly: loader::load_monthly_rates(path)?,
            annual: loader::load_annual_indices(path)?,
            config,
        })
    }

    /// Effective annual accrual rate for a month, via the fallback chain
    pub fn monthly_rate(&self, period: &Period) -> Result<f64, EngineError> {
        self.monthly
            .rate_or_fallback(period, self.config.default_monthly_rate)
    }

    /// Inflation factor for a year, if recorded
    pub fn annual_index(&self, year: i32) -> Option<f64> {
        self.annual.get(year)
    }

    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RateConfig {
        &mut self.config
    }

    pub fn monthly_mut(&mut self) -> &mut MonthlyRateTable {
        &mut self.monthly
    }

    pub fn annual_mut(&mut self) -> &mut AnnualIndexTable {
        &mut self.annual
    }
}
