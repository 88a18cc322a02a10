//! Account generation for a single pensioner
//!
//! Walks the liquidation window month by month, deflating the calculation
//! base to each account's year, applying the prima rules, and delegating
//! interest to the accrual formula. Generation is a pure function of the
//! pensioner snapshot, the rate tables, and the window: re-running with the
//! same inputs yields identical output, and no state is carried between
//! pensioners.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::accounts::{MonthlyBillingAccount, PensionerStatement};
use super::accrual::{round_currency, AccrualFormula, InterestAccrual};
use crate::error::EngineError;
use crate::pensioner::PensionerProfile;
use crate::period::Period;
use crate::rates::{BaseIndexer, RateRepository};

/// Configuration for a generation run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Per-month interest formula
    pub accrual: AccrualFormula,
}

/// Builds the monthly billing accounts for one pensioner
#[derive(Debug, Clone)]
pub struct AccountGenerator {
    rates: RateRepository,
    config: GeneratorConfig,
}

impl AccountGenerator {
    pub fn new(rates: RateRepository, config: GeneratorConfig) -> Self {
        Self { rates, config }
    }

    pub fn rates(&self) -> &RateRepository {
        &self.rates
    }

    /// Generate one account per calendar month in [start, cutoff]
    ///
    /// Month granularity with day-1 semantics: only the (year, month) of
    /// both dates matters. Rejects windows whose start is after the cutoff
    /// before touching any rate data.
    pub fn generate(
        &self,
        pensioner: &PensionerProfile,
        start_date: NaiveDate,
        cutoff_date: NaiveDate,
    ) -> Result<Vec<MonthlyBillingAccount>, EngineError> {
        if start_date > cutoff_date {
            return Err(EngineError::InvalidPeriod {
                start: start_date,
                cutoff: cutoff_date,
            });
        }
        if !pensioner.has_calculation_base() {
            return Err(EngineError::MissingCalculationBase(
                pensioner.pensioner_id.clone(),
            ));
        }

        let start = Period::from_date(start_date);
        let cutoff = Period::from_date(cutoff_date);
        let indexer = BaseIndexer::new(&self.rates);
        let accrual = InterestAccrual::new(&self.rates, self.config.accrual);

        let mut accounts = Vec::with_capacity(start.months_until(&cutoff).max(0) as usize + 1);
        for period in start.through(cutoff) {
            let adjusted_base = indexer.adjust(
                pensioner.calculation_base,
                pensioner.base_year,
                period.year(),
            )?;
            let base_capital = round_currency(adjusted_base * pensioner.share_percentage);

            let bonus_amount = if pensioner.bonus_schedule.is_bonus_month(period.month()) {
                base_capital
            } else {
                0.0
            };
            let capital_total = base_capital + bonus_amount;

            // The bonus is interest-bearing: accrual runs on capital_total
            let accrued_interest = accrual.accrue(capital_total, period, cutoff)?;

            accounts.push(MonthlyBillingAccount {
                period,
                base_capital,
                bonus_amount,
                capital_total,
                accrued_interest,
                total_due: round_currency(capital_total + accrued_interest),
                sequence_number: None,
            });
        }

        Ok(accounts)
    }

    /// Generate and wrap into a statement with totals
    pub fn statement(
        &self,
        pensioner: &PensionerProfile,
        start_date: NaiveDate,
        cutoff_date: NaiveDate,
    ) -> Result<PensionerStatement, EngineError> {
        let accounts = self.generate(pensioner, start_date, cutoff_date)?;
        Ok(PensionerStatement::from_accounts(
            pensioner.pensioner_id.clone(),
            pensioner.name.clone(),
            Period::from_date(start_date),
            Period::from_date(cutoff_date),
            accounts,
            pensioner.balances.is_settled(),
        ))
    }
}
