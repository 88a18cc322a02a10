//! Interest accrual for monthly billing accounts
//!
//! Interest is simple (non-capitalizing): every elapsed month contributes
//! independently against the account's fixed capital, and contributions are
//! summed. Accrual follows the "mes vencido" convention — a month
//! contributes only once it has fully closed relative to the cutoff, so an
//! account whose own month is at or after the cutoff month carries zero
//! interest.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::period::Period;
use crate::rates::RateRepository;

/// Round to currency precision (2 decimals, half-up)
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Per-month interest formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccrualFormula {
    /// Effective annual rate compounded over the month's actual days:
    /// `capital * ((1 + rate)^(days/365) - 1)`
    CompoundActual365,
    /// Legacy flat formula, `capital * rate`, kept for parity with
    /// liquidations issued under the old convention
    FlatMonthly,
}

impl Default for AccrualFormula {
    fn default() -> Self {
        AccrualFormula::CompoundActual365
    }
}

/// Computes interest contributions from the rate repository
#[derive(Debug, Clone, Copy)]
pub struct InterestAccrual<'a> {
    rates: &'a RateRepository,
    formula: AccrualFormula,
}

impl<'a> InterestAccrual<'a> {
    pub fn new(rates: &'a RateRepository, formula: AccrualFormula) -> Self {
        Self { rates, formula }
    }

    /// Interest contributed by a single elapsed month
    pub fn month_interest(
        &self,
        capital_total: f64,
        period: &Period,
    ) -> Result<f64, EngineError> {
        let rate = self.rates.monthly_rate(period)?;
        let raw = match self.formula {
            AccrualFormula::CompoundActual365 => {
                let days = period.days_in_month() as f64;
                capital_total * ((1.0 + rate).powf(days / 365.0) - 1.0)
            }
            AccrualFormula::FlatMonthly => capital_total * rate,
        };
        Ok(round_currency(raw))
    }

    /// Cumulative interest of an account from its own month up to the
    /// cutoff month
    ///
    /// Sums the contributions of every fully elapsed month, i.e. months `m`
    /// with `account_period <= m < cutoff_period`. Zero whenever the
    /// account month is at or after the cutoff month.
    pub fn accrue(
        &self,
        capital_total: f64,
        account_period: Period,
        cutoff_period: Period,
    ) -> Result<f64, EngineError> {
        if account_period >= cutoff_period {
            return Ok(0.0);
        }

        let mut total = 0.0;
        let mut month = account_period;
        while month < cutoff_period {
            total += self.month_interest(capital_total, &month)?;
            month = month.next();
        }
        Ok(round_currency(total))
    }
}
