//! Engine error taxonomy
//!
//! Validation errors are rejected before any computation starts; pensioner
//! lookup failures are isolated inside a batch run while entity lookup
//! failures abort it; sequence conflicts are the only retried case.

use chrono::NaiveDate;
use thiserror::Error;

use crate::period::Period;

/// Errors produced by the liquidation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// No monthly rate recorded and the fallback chain is exhausted
    #[error("no monthly rate available for {period} and no fallback configured")]
    MissingRateData { period: Period },

    /// Month outside 1-12
    #[error("invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    /// Liquidation window starts after its cutoff
    #[error("invalid period: start {start} is after cutoff {cutoff}")]
    InvalidPeriod { start: NaiveDate, cutoff: NaiveDate },

    /// Annual index missing for a year inside an indexing range
    /// (only under `MissingIndexPolicy::Fail`)
    #[error("no annual index recorded for year {0}")]
    MissingAnnualIndex(i32),

    /// Pensioner id not present in the roster
    #[error("pensioner {0} not found")]
    PensionerNotFound(String),

    /// Entity id not present in the roster
    #[error("entity {0} not found")]
    EntityNotFound(String),

    /// Pensioner record lacks a usable calculation base
    #[error("pensioner {0} has no calculation base")]
    MissingCalculationBase(String),

    /// Non-positive payment amount, rejected before any balance mutation
    #[error("invalid payment amount {0:.2}, expected a positive value")]
    InvalidPayment(f64),

    /// Race on sequence number assignment; retried once, then surfaced
    #[error("sequence number {0} already taken by a concurrent writer")]
    SequenceConflict(u64),
}
