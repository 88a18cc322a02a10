//! Entity-level liquidation batch runs
//!
//! Pre-loads rate tables once, fans account generation out over the
//! entity's active pensioners in parallel, then aggregates and sequences
//! serially. Pensioner-level failures are recorded and skipped so one bad
//! record cannot block an entity-wide run; a missing entity aborts the run.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::store::{AccountDraft, AccountStore, DuplicatePolicy, EmitDisposition};
use crate::error::EngineError;
use crate::liquidation::{
    round_currency, AccountGenerator, GeneratorConfig, PensionerStatement,
};
use crate::pensioner::{Entity, PensionerProfile, Roster};
use crate::period::Period;
use crate::rates::RateRepository;

/// Longest supported liquidation window (50 years of monthly accounts)
const MAX_WINDOW_MONTHS: u32 = 600;

/// Configuration for one batch run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Liquidation cutoff date (day-1 month semantics)
    pub cutoff: NaiveDate,

    /// Number of months in the billing window, counting the cutoff month
    pub window_months: u32,

    /// Handling for accounts already persisted for the same key
    pub duplicate_policy: DuplicatePolicy,
}

/// Progress of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchPhase {
    CollectingPensioners,
    GeneratingAccounts,
    Aggregating,
    Sequencing,
    Done,
}

/// A pensioner excluded from the run, with the failure that excluded it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedPensioner {
    pub pensioner_id: String,
    pub name: String,
    pub reason: String,
}

/// Entity-level aggregate totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchTotals {
    pub total_capital: f64,
    pub total_interest: f64,
    pub total_due: f64,
    pub accounts_with_interest: usize,
    pub accounts_without_interest: usize,
    pub pensioners_processed: usize,
    pub pensioners_skipped: usize,
    pub pensioners_settled: usize,
    pub emitted_new: usize,
    pub reused: usize,
    pub skipped_existing: usize,
    pub superseded: usize,
}

/// Result of one batch run; never mutated after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidationBatch {
    pub entity: Entity,
    pub cutoff: NaiveDate,
    pub window_start: Period,
    pub statements: Vec<PensionerStatement>,
    pub totals: BatchTotals,
    pub errors: Vec<SkippedPensioner>,
    pub phase: BatchPhase,
}

/// Orchestrates account generation, aggregation, and sequencing for one entity
pub struct LiquidationBatchRunner<S: AccountStore> {
    rates: RateRepository,
    store: S,
    generator_config: GeneratorConfig,
}

impl<S: AccountStore> LiquidationBatchRunner<S> {
    pub fn new(rates: RateRepository, store: S, generator_config: GeneratorConfig) -> Self {
        Self {
            rates,
            store,
            generator_config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a liquidation for every active pensioner of the entity
    pub fn run(
        &self,
        roster: &Roster,
        entity_id: &str,
        config: &BatchConfig,
    ) -> Result<LiquidationBatch, EngineError> {
        if config.window_months == 0 || config.window_months > MAX_WINDOW_MONTHS {
            let day_after = config.cutoff.succ_opt().unwrap_or(config.cutoff);
            return Err(EngineError::InvalidPeriod {
                start: day_after,
                cutoff: config.cutoff,
            });
        }

        let entity = roster
            .entity(entity_id)
            .ok_or_else(|| EngineError::EntityNotFound(entity_id.to_string()))?
            .clone();

        log::info!("batch phase: {:?} (entity {})", BatchPhase::CollectingPensioners, entity_id);
        let pensioners: Vec<&PensionerProfile> = roster
            .pensioners_of(entity_id)
            .into_iter()
            .filter(|p| p.status.is_active())
            .collect();
        log::info!("{} active pensioners collected", pensioners.len());

        let cutoff_period = Period::from_date(config.cutoff);
        let window_start = cutoff_period.minus_months(config.window_months - 1);

        log::info!("batch phase: {:?}", BatchPhase::GeneratingAccounts);
        let generator = AccountGenerator::new(self.rates.clone(), self.generator_config);
        let outcomes: Vec<(String, String, Result<PensionerStatement, EngineError>)> = pensioners
            .par_iter()
            .map(|pensioner| {
                let start = effective_start(pensioner, window_start, config.cutoff);
                let statement = generator.statement(pensioner, start, config.cutoff);
                (
                    pensioner.pensioner_id.clone(),
                    pensioner.name.clone(),
                    statement,
                )
            })
            .collect();

        log::info!("batch phase: {:?}", BatchPhase::Aggregating);
        let mut statements = Vec::new();
        let mut errors = Vec::new();
        for (pensioner_id, name, outcome) in outcomes {
            match outcome {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    log::warn!("skipping pensioner {pensioner_id}: {err}");
                    errors.push(SkippedPensioner {
                        pensioner_id,
                        name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let mut totals = BatchTotals {
            pensioners_processed: statements.len(),
            pensioners_skipped: errors.len(),
            ..BatchTotals::default()
        };
        for statement in &statements {
            totals.total_capital += statement.total_capital;
            totals.total_interest += statement.total_interest;
            totals.accounts_with_interest += statement.accounts_with_interest();
            totals.accounts_without_interest += statement.accounts_without_interest();
            if statement.settled {
                totals.pensioners_settled += 1;
            }
        }
        totals.total_capital = round_currency(totals.total_capital);
        totals.total_interest = round_currency(totals.total_interest);
        totals.total_due = round_currency(totals.total_capital + totals.total_interest);

        log::info!("batch phase: {:?}", BatchPhase::Sequencing);
        for statement in &mut statements {
            self.sequence_statement(&entity.entity_id, statement, config.duplicate_policy, &mut totals)?;
        }

        log::info!(
            "batch phase: {:?} ({} statements, {} skipped)",
            BatchPhase::Done,
            totals.pensioners_processed,
            totals.pensioners_skipped
        );
        Ok(LiquidationBatch {
            entity,
            cutoff: config.cutoff,
            window_start,
            statements,
            totals,
            errors,
            phase: BatchPhase::Done,
        })
    }

    /// Emit every account of one statement, stamping assigned consecutivos
    fn sequence_statement(
        &self,
        entity_id: &str,
        statement: &mut PensionerStatement,
        policy: DuplicatePolicy,
        totals: &mut BatchTotals,
    ) -> Result<(), EngineError> {
        for account in &mut statement.accounts {
            let draft = AccountDraft {
                entity_id: entity_id.to_string(),
                pensioner_id: statement.pensioner_id.clone(),
                period_start: account.period,
                period_end: account.period,
                total_capital: account.capital_total,
                total_interest: account.accrued_interest,
                total_due: account.total_due,
            };

            let disposition = self.emit_with_retry(draft, policy)?;
            account.sequence_number = Some(disposition.sequence());

            match disposition {
                EmitDisposition::New(_) => totals.emitted_new += 1,
                EmitDisposition::Reused(_) => totals.reused += 1,
                EmitDisposition::SkippedExisting(_) => totals.skipped_existing += 1,
                EmitDisposition::Superseded { .. } => totals.superseded += 1,
            }
        }
        Ok(())
    }

    /// Sequencing races are retried once with a fresh max-read, then surfaced
    fn emit_with_retry(
        &self,
        draft: AccountDraft,
        policy: DuplicatePolicy,
    ) -> Result<EmitDisposition, EngineError> {
        match self.store.emit(draft.clone(), policy) {
            Err(EngineError::SequenceConflict(seq)) => {
                log::warn!("sequence conflict on {seq}, retrying with a fresh read");
                self.store.emit(draft, policy)
            }
            other => other,
        }
    }
}

/// Later of the window start and the pensioner's nomination month
fn effective_start(
    pensioner: &PensionerProfile,
    window_start: Period,
    cutoff: NaiveDate,
) -> NaiveDate {
    let nomination = Period::from_date(pensioner.nomination_start);
    let start = nomination.max(window_start);
    start.first_day().unwrap_or(cutoff)
}
