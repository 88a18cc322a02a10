//! Batch orchestration: entity-wide runs, sequencing, and the account store

mod runner;
mod store;

pub use runner::{
    BatchConfig, BatchPhase, BatchTotals, LiquidationBatch, LiquidationBatchRunner,
    SkippedPensioner,
};
pub use store::{
    AccountDraft, AccountStatus, AccountStore, DuplicatePolicy, EmitDisposition, EmittedAccount,
    InMemoryAccountStore,
};
