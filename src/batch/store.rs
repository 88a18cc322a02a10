//! Persistence seam for emitted accounts and the consecutivo counter
//!
//! The engine computes accounts without touching storage; emission goes
//! through `AccountStore`, whose implementations must keep the
//! read-max/assign/write step atomic. The in-memory store serializes it
//! under a single lock; a database-backed implementation would use an
//! atomic increment or a uniqueness constraint on
//! (pensioner, period_start, period_end) and surface `SequenceConflict`
//! when it loses a race.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::period::Period;

/// How to handle an account that already exists for the same pensioner and
/// billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Keep the existing consecutivo, overwrite totals (reliquidation)
    Reuse,
    /// Leave the existing record untouched, do not regenerate
    Skip,
    /// Assign a fresh consecutivo and keep both records as versions
    Supersede,
}

/// Lifecycle status of a persisted account record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    /// First emission under its consecutivo
    Emitted,
    /// Totals overwritten by a later run under `DuplicatePolicy::Reuse`
    Reliquidated,
    /// Replaced by a newer version under `DuplicatePolicy::Supersede`
    Superseded,
}

/// An account ready to be persisted, before any sequence is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDraft {
    pub entity_id: String,
    pub pensioner_id: String,
    pub period_start: Period,
    pub period_end: Period,
    pub total_capital: f64,
    pub total_interest: f64,
    pub total_due: f64,
}

/// A persisted account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedAccount {
    /// Consecutivo: globally unique, monotonically increasing
    pub sequence_number: u64,
    pub entity_id: String,
    pub pensioner_id: String,
    pub period_start: Period,
    pub period_end: Period,
    pub total_capital: f64,
    pub total_interest: f64,
    pub total_due: f64,
    pub status: AccountStatus,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of persisting one draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitDisposition {
    /// No prior record for the key; a fresh consecutivo was assigned
    New(u64),
    /// Existing record overwritten, consecutivo kept
    Reused(u64),
    /// Existing record left untouched
    SkippedExisting(u64),
    /// Prior record kept as a version, fresh consecutivo assigned
    Superseded { prior: u64, sequence: u64 },
}

impl EmitDisposition {
    /// The consecutivo now current for the account's key
    pub fn sequence(&self) -> u64 {
        match self {
            EmitDisposition::New(seq)
            | EmitDisposition::Reused(seq)
            | EmitDisposition::SkippedExisting(seq) => *seq,
            EmitDisposition::Superseded { sequence, .. } => *sequence,
        }
    }
}

/// Storage contract for emitted accounts
pub trait AccountStore {
    /// Latest non-superseded record for (pensioner, period_start, period_end)
    fn latest(&self, pensioner_id: &str, period_start: Period, period_end: Period)
        -> Option<EmittedAccount>;

    /// Persist a draft under the duplicate policy
    ///
    /// Implementations must keep the read-max/assign/write step atomic and
    /// return `SequenceConflict` when a concurrent writer wins the race.
    fn emit(
        &self,
        draft: AccountDraft,
        policy: DuplicatePolicy,
    ) -> Result<EmitDisposition, EngineError>;

    /// Highest consecutivo assigned so far (0 when empty)
    fn max_sequence(&self) -> u64;

    /// Snapshot of every persisted record
    fn all(&self) -> Vec<EmittedAccount>;
}

/// Reference store keeping all records in memory behind one lock
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: Mutex<Vec<EmittedAccount>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn latest(
        &self,
        pensioner_id: &str,
        period_start: Period,
        period_end: Period,
    ) -> Option<EmittedAccount> {
        let accounts = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        accounts
            .iter()
            .rev()
            .find(|a| {
                a.pensioner_id == pensioner_id
                    && a.period_start == period_start
                    && a.period_end == period_end
                    && a.status != AccountStatus::Superseded
            })
            .cloned()
    }

    fn emit(
        &self,
        draft: AccountDraft,
        policy: DuplicatePolicy,
    ) -> Result<EmitDisposition, EngineError> {
        let mut accounts = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        let next_sequence = accounts
            .iter()
            .map(|a| a.sequence_number)
            .max()
            .unwrap_or(0)
            + 1;

        let existing = accounts.iter().rposition(|a| {
            a.pensioner_id == draft.pensioner_id
                && a.period_start == draft.period_start
                && a.period_end == draft.period_end
                && a.status != AccountStatus::Superseded
        });

        match existing {
            None => {
                accounts.push(EmittedAccount {
                    sequence_number: next_sequence,
                    entity_id: draft.entity_id,
                    pensioner_id: draft.pensioner_id,
                    period_start: draft.period_start,
                    period_end: draft.period_end,
                    total_capital: draft.total_capital,
                    total_interest: draft.total_interest,
                    total_due: draft.total_due,
                    status: AccountStatus::Emitted,
                    version: 1,
                    created_at: now,
                    updated_at: now,
                });
                Ok(EmitDisposition::New(next_sequence))
            }
            Some(idx) => match policy {
                DuplicatePolicy::Reuse => {
                    let account = &mut accounts[idx];
                    account.total_capital = draft.total_capital;
                    account.total_interest = draft.total_interest;
                    account.total_due = draft.total_due;
                    account.status = AccountStatus::Reliquidated;
                    account.version += 1;
                    account.updated_at = now;
                    Ok(EmitDisposition::Reused(account.sequence_number))
                }
                DuplicatePolicy::Skip => {
                    Ok(EmitDisposition::SkippedExisting(accounts[idx].sequence_number))
                }
                DuplicatePolicy::Supersede => {
                    let prior_sequence = accounts[idx].sequence_number;
                    let prior_version = accounts[idx].version;
                    accounts[idx].status = AccountStatus::Superseded;
                    accounts[idx].updated_at = now;
                    accounts.push(EmittedAccount {
                        sequence_number: next_sequence,
                        entity_id: draft.entity_id,
                        pensioner_id: draft.pensioner_id,
                        period_start: draft.period_start,
                        period_end: draft.period_end,
                        total_capital: draft.total_capital,
                        total_interest: draft.total_interest,
                        total_due: draft.total_due,
                        status: AccountStatus::Emitted,
                        version: prior_version + 1,
                        created_at: now,
                        updated_at: now,
                    });
                    Ok(EmitDisposition::Superseded {
                        prior: prior_sequence,
                        sequence: next_sequence,
                    })
                }
            },
        }
    }

    fn max_sequence(&self) -> u64 {
        let accounts = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        accounts.iter().map(|a| a.sequence_number).max().unwrap_or(0)
    }

    fn all(&self) -> Vec<EmittedAccount> {
        let accounts = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        accounts.clone()
    }
}
