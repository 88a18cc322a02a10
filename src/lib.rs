//! Cuotapartes - liquidation and interest accrual engine for shared pension obligations
//!
//! This library provides:
//! - Monthly billing account generation per pensioner with prima rules
//! - Simple (non-capitalizing) interest accrual under the mes vencido convention
//! - Cross-year indexing of calculation bases via annual inflation factors
//! - Interest-first payment allocation against outstanding balances
//! - Entity-level batch runs with monotonic consecutivo assignment

pub mod batch;
pub mod error;
pub mod liquidation;
pub mod payments;
pub mod pensioner;
pub mod period;
pub mod rates;

// Re-export commonly used types
pub use batch::{
    BatchConfig, DuplicatePolicy, InMemoryAccountStore, LiquidationBatch, LiquidationBatchRunner,
};
pub use error::EngineError;
pub use liquidation::{
    AccountGenerator, GeneratorConfig, MonthlyBillingAccount, PensionerStatement,
};
pub use pensioner::{PensionerProfile, Roster};
pub use period::Period;
pub use rates::{BaseIndexer, RateConfig, RateRepository};
