//! Payment allocation against outstanding balances
//!
//! Payments settle interest before capital. An amount beyond both pending
//! balances is credited to capital as a pre-payment rather than refused, so
//! the split always adds up to the payment exactly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::liquidation::round_currency;
use crate::pensioner::{PensionerProfile, Roster};

/// How a payment divides between interest and capital
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub interest_applied: f64,
    pub capital_applied: f64,
}

/// Append-only record of a registered payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub pensioner_id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub interest_applied: f64,
    pub capital_applied: f64,
}

/// Splits payments across pending interest and capital
pub struct PaymentAllocator;

impl PaymentAllocator {
    /// Allocate a payment: interest first, remainder to capital
    ///
    /// Rejects non-positive amounts before any balance is touched.
    /// `interest_applied + capital_applied == amount` exactly; any excess
    /// over both balances stays inside `capital_applied`.
    pub fn allocate(
        amount: f64,
        interest_pending: f64,
        _capital_pending: f64,
    ) -> Result<PaymentSplit, EngineError> {
        if amount <= 0.0 {
            return Err(EngineError::InvalidPayment(amount));
        }

        let interest_applied = round_currency(amount.min(interest_pending.max(0.0)));
        let capital_applied = round_currency(amount - interest_applied);

        Ok(PaymentSplit {
            interest_applied,
            capital_applied,
        })
    }
}

/// Register a payment against a pensioner, mutating its balances
///
/// Decrements `interest_pending` and `capital_pending` by the applied
/// amounts, floored at zero, and records the payment date as the
/// pensioner's new last-payment date.
pub fn register_payment(
    pensioner: &mut PensionerProfile,
    date: NaiveDate,
    amount: f64,
) -> Result<PaymentRecord, EngineError> {
    let split = PaymentAllocator::allocate(
        amount,
        pensioner.balances.interest_pending,
        pensioner.balances.capital_pending,
    )?;

    let balances = &mut pensioner.balances;
    balances.interest_pending =
        round_currency((balances.interest_pending - split.interest_applied).max(0.0));
    balances.capital_pending =
        round_currency((balances.capital_pending - split.capital_applied).max(0.0));
    balances.last_payment = Some(date);

    log::info!(
        "payment of {:.2} for pensioner {}: {:.2} to interest, {:.2} to capital",
        amount,
        pensioner.pensioner_id,
        split.interest_applied,
        split.capital_applied
    );

    Ok(PaymentRecord {
        pensioner_id: pensioner.pensioner_id.clone(),
        date,
        amount,
        interest_applied: split.interest_applied,
        capital_applied: split.capital_applied,
    })
}

/// Register a payment by pensioner id against a roster
pub fn register_roster_payment(
    roster: &mut Roster,
    pensioner_id: &str,
    date: NaiveDate,
    amount: f64,
) -> Result<PaymentRecord, EngineError> {
    let pensioner = roster
        .pensioner_mut(pensioner_id)
        .ok_or_else(|| EngineError::PensionerNotFound(pensioner_id.to_string()))?;
    register_payment(pensioner, date, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pensioner::{BonusSchedule, CarteraStatus, PensionerBalances};
    use approx::assert_relative_eq;

    fn pensioner_with(capital: f64, interest: f64) -> PensionerProfile {
        let mut p = PensionerProfile::new(
            "P100",
            "Maria Lopez",
            "E001",
            5_000_000.0,
            2025,
            0.02,
            BonusSchedule::Twelve,
            NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
            CarteraStatus::Active,
        );
        p.balances = PensionerBalances::new(capital, interest);
        p
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert_eq!(
            PaymentAllocator::allocate(0.0, 100.0, 100.0),
            Err(EngineError::InvalidPayment(0.0))
        );
        assert!(PaymentAllocator::allocate(-50.0, 100.0, 100.0).is_err());
    }

    #[test]
    fn test_interest_settled_first() {
        // Payment smaller than pending interest never touches capital
        let split = PaymentAllocator::allocate(250.0, 300.0, 10_000.0).unwrap();
        assert_relative_eq!(split.interest_applied, 250.0);
        assert_relative_eq!(split.capital_applied, 0.0);
    }

    #[test]
    fn test_excess_credited_to_capital() {
        // 10,500 against 300 interest + 10,000 capital: 200 excess stays in capital
        let split = PaymentAllocator::allocate(10_500.0, 300.0, 10_000.0).unwrap();
        assert_relative_eq!(split.interest_applied, 300.0);
        assert_relative_eq!(split.capital_applied, 10_200.0);
        assert_relative_eq!(split.interest_applied + split.capital_applied, 10_500.0);
    }

    #[test]
    fn test_register_payment_mutates_balances() {
        let mut pensioner = pensioner_with(10_000.0, 300.0);
        let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

        let record = register_payment(&mut pensioner, date, 2_300.0).unwrap();
        assert_relative_eq!(record.interest_applied, 300.0);
        assert_relative_eq!(record.capital_applied, 2_000.0);
        assert_relative_eq!(pensioner.balances.interest_pending, 0.0);
        assert_relative_eq!(pensioner.balances.capital_pending, 8_000.0);
        assert_eq!(pensioner.balances.last_payment, Some(date));
    }

    #[test]
    fn test_overpayment_floors_balances_at_zero() {
        let mut pensioner = pensioner_with(10_000.0, 300.0);
        let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

        register_payment(&mut pensioner, date, 10_500.0).unwrap();
        assert_relative_eq!(pensioner.balances.interest_pending, 0.0);
        assert_relative_eq!(pensioner.balances.capital_pending, 0.0);
        assert!(pensioner.balances.is_settled());
    }

    #[test]
    fn test_roster_payment_requires_known_pensioner() {
        use crate::pensioner::Entity;

        let mut roster = Roster::default();
        roster.push(
            Entity {
                entity_id: "E001".to_string(),
                name: "Municipio".to_string(),
            },
            pensioner_with(10_000.0, 300.0),
        );
        let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

        let record = register_roster_payment(&mut roster, "P100", date, 500.0).unwrap();
        assert_relative_eq!(record.interest_applied, 300.0);
        assert_relative_eq!(record.capital_applied, 200.0);
        assert_eq!(
            roster.pensioner("P100").unwrap().balances.last_payment,
            Some(date)
        );

        assert_eq!(
            register_roster_payment(&mut roster, "P999", date, 500.0),
            Err(EngineError::PensionerNotFound("P999".to_string()))
        );
    }

    #[test]
    fn test_rejected_payment_leaves_balances_untouched() {
        let mut pensioner = pensioner_with(10_000.0, 300.0);
        let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

        assert!(register_payment(&mut pensioner, date, -1.0).is_err());
        assert_relative_eq!(pensioner.balances.capital_pending, 10_000.0);
        assert_relative_eq!(pensioner.balances.interest_pending, 300.0);
        assert_eq!(pensioner.balances.last_payment, None);
    }
}
