//! Billing account output structures
//!
//! Accounts are independent of each other: an account's capital never
//! depends on any other account's interest, and interest never capitalizes
//! into another account's principal.

use serde::{Deserialize, Serialize};

use crate::liquidation::accrual::round_currency;
use crate::period::Period;

/// One pensioner-month of billing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBillingAccount {
    /// Calendar month the account bills for
    pub period: Period,

    /// Adjusted base times the entity's share percentage
    pub base_capital: f64,

    /// Prima for bonus months; zero otherwise
    pub bonus_amount: f64,

    /// `base_capital + bonus_amount`, the interest-bearing principal
    pub capital_total: f64,

    /// Simple interest accrued through the cutoff month
    pub accrued_interest: f64,

    /// `capital_total + accrued_interest`
    pub total_due: f64,

    /// Consecutivo, assigned only when the account is emitted
    pub sequence_number: Option<u64>,
}

impl MonthlyBillingAccount {
    pub fn has_interest(&self) -> bool {
        self.accrued_interest > 0.0
    }
}

/// All billing accounts of one pensioner for a liquidation window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionerStatement {
    pub pensioner_id: String,
    pub name: String,
    pub period_start: Period,
    pub period_end: Period,
    pub accounts: Vec<MonthlyBillingAccount>,
    pub total_capital: f64,
    pub total_interest: f64,
    pub total_due: f64,
    /// Outstanding balances were already fully paid down at run time
    pub settled: bool,
}

impl PensionerStatement {
    /// Build a statement and its totals from generated accounts
    pub fn from_accounts(
        pensioner_id: impl Into<String>,
        name: impl Into<String>,
        period_start: Period,
        period_end: Period,
        accounts: Vec<MonthlyBillingAccount>,
        settled: bool,
    ) -> Self {
        let total_capital = round_currency(accounts.iter().map(|a| a.capital_total).sum());
        let total_interest = round_currency(accounts.iter().map(|a| a.accrued_interest).sum());
        Self {
            pensioner_id: pensioner_id.into(),
            name: name.into(),
            period_start,
            period_end,
            accounts,
            total_capital,
            total_interest,
            total_due: round_currency(total_capital + total_interest),
            settled,
        }
    }

    /// Accounts that accrued any interest
    pub fn accounts_with_interest(&self) -> usize {
        self.accounts.iter().filter(|a| a.has_interest()).count()
    }

    /// Accounts with zero interest (at or after the cutoff month)
    pub fn accounts_without_interest(&self) -> usize {
        self.accounts.len() - self.accounts_with_interest()
    }
}
