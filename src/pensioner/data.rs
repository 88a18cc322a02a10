//! Pensioner and entity records as supplied by the data-access boundary
//!
//! All engine code operates on these named fields; raw roster rows are
//! converted exactly once at load time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cartera (portfolio) status of the pensioner's obligation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarteraStatus {
    /// Obligation is current and must be liquidated
    Active,
    /// Obligation closed out; excluded from batch runs
    Inactive,
    /// Obligation under administrative review; excluded from batch runs
    Suspended,
}

impl CarteraStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CarteraStatus::Active)
    }
}

/// Number of annual mesadas, which fixes the bonus ("prima") months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusSchedule {
    /// 12 mesadas, no bonus months
    Twelve,
    /// 13 mesadas, bonus in December
    Thirteen,
    /// 14 mesadas, bonus in June and December
    Fourteen,
}

impl BonusSchedule {
    /// Schedule for a mesada count of 12, 13, or 14
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            12 => Some(BonusSchedule::Twelve),
            13 => Some(BonusSchedule::Thirteen),
            14 => Some(BonusSchedule::Fourteen),
            _ => None,
        }
    }

    pub fn mesada_count(&self) -> u8 {
        match self {
            BonusSchedule::Twelve => 12,
            BonusSchedule::Thirteen => 13,
            BonusSchedule::Fourteen => 14,
        }
    }

    /// Whether the given calendar month (1-12) carries a prima
    pub fn is_bonus_month(&self, month: u32) -> bool {
        match self {
            BonusSchedule::Twelve => false,
            BonusSchedule::Thirteen => month == 12,
            BonusSchedule::Fourteen => month == 6 || month == 12,
        }
    }
}

/// Employer entity that owes the cuota parte
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    pub name: String,
}

/// Outstanding balances, maintained independently of batch runs and mutated
/// only by payment registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PensionerBalances {
    /// Capital still owed by the entity for this pensioner
    pub capital_pending: f64,

    /// Interest still owed by the entity for this pensioner
    pub interest_pending: f64,

    /// Date of the most recent payment (fecha de pago)
    pub last_payment: Option<NaiveDate>,
}

impl PensionerBalances {
    pub fn new(capital_pending: f64, interest_pending: f64) -> Self {
        Self {
            capital_pending,
            interest_pending,
            last_payment: None,
        }
    }

    /// Both balances fully paid down
    pub fn is_settled(&self) -> bool {
        self.capital_pending <= 0.0 && self.interest_pending <= 0.0
    }
}

/// A pensioner whose obligation is shared with an employer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionerProfile {
    /// Unique pensioner identifier (documento)
    pub pensioner_id: String,

    /// Full name
    pub name: String,

    /// Entity that owes the cuota parte for this pensioner
    pub entity_id: String,

    /// Calculation base, denominated in `base_year` money
    pub calculation_base: f64,

    /// Reference year the calculation base is captured for
    pub base_year: i32,

    /// Fraction of the base owed by the entity as capital
    pub share_percentage: f64,

    /// Mesada count, which fixes the prima months
    pub bonus_schedule: BonusSchedule,

    /// First date the obligation can be billed from
    pub nomination_start: NaiveDate,

    /// Cartera status; only Active pensioners are liquidated
    pub status: CarteraStatus,

    /// Outstanding balances from prior liquidations and payments
    #[serde(default)]
    pub balances: PensionerBalances,
}

impl PensionerProfile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pensioner_id: impl Into<String>,
        name: impl Into<String>,
        entity_id: impl Into<String>,
        calculation_base: f64,
        base_year: i32,
        share_percentage: f64,
        bonus_schedule: BonusSchedule,
        nomination_start: NaiveDate,
        status: CarteraStatus,
    ) -> Self {
        Self {
            pensioner_id: pensioner_id.into(),
            name: name.into(),
            entity_id: entity_id.into(),
            calculation_base,
            base_year,
            share_percentage,
            bonus_schedule,
            nomination_start,
            status,
            balances: PensionerBalances::default(),
        }
    }

    /// Whether the record carries a usable calculation base
    pub fn has_calculation_base(&self) -> bool {
        self.calculation_base > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_schedule_from_count() {
        for count in [12u8, 13, 14] {
            let schedule = BonusSchedule::from_count(count).unwrap();
            assert_eq!(schedule.mesada_count(), count);
        }
        assert_eq!(BonusSchedule::from_count(11), None);
        assert_eq!(BonusSchedule::from_count(15), None);
    }

    #[test]
    fn test_bonus_months() {
        for month in 1..=12 {
            assert!(!BonusSchedule::Twelve.is_bonus_month(month));
            assert_eq!(BonusSchedule::Thirteen.is_bonus_month(month), month == 12);
            assert_eq!(
                BonusSchedule::Fourteen.is_bonus_month(month),
                month == 6 || month == 12
            );
        }
    }

    #[test]
    fn test_settled_balances() {
        assert!(PensionerBalances::default().is_settled());
        assert!(!PensionerBalances::new(100.0, 0.0).is_settled());
        assert!(!PensionerBalances::new(0.0, 5.0).is_settled());
    }
}
