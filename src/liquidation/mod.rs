//! Monthly billing account generation and interest accrual

mod accounts;
mod accrual;
mod generator;

pub use accounts::{MonthlyBillingAccount, PensionerStatement};
pub use accrual::{round_currency, AccrualFormula, InterestAccrual};
pub use generator::{AccountGenerator, GeneratorConfig};
