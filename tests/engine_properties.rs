//! Property tests for the liquidation engine invariants

use chrono::NaiveDate;
use proptest::prelude::*;

use cuotapartes::liquidation::{AccrualFormula, InterestAccrual};
use cuotapartes::payments::PaymentAllocator;
use cuotapartes::pensioner::{BonusSchedule, CarteraStatus, PensionerProfile};
use cuotapartes::rates::{BaseIndexer, RateConfig};
use cuotapartes::{AccountGenerator, GeneratorConfig, Period, RateRepository};

fn money() -> impl Strategy<Value = f64> {
    // Cent-resolution amounts up to one billion
    (0i64..100_000_000_000).prop_map(|cents| cents as f64 / 100.0)
}

fn period() -> impl Strategy<Value = Period> {
    (1990i32..2040, 1u32..=12).prop_map(|(y, m)| Period::new(y, m).unwrap())
}

fn schedule() -> impl Strategy<Value = BonusSchedule> {
    prop_oneof![
        Just(BonusSchedule::Twelve),
        Just(BonusSchedule::Thirteen),
        Just(BonusSchedule::Fourteen),
    ]
}

fn repo_with_flat_rate(rate: f64) -> RateRepository {
    let mut repo = RateRepository::new(RateConfig {
        default_monthly_rate: Some(rate),
        ..RateConfig::default()
    });
    repo.annual_mut().insert(2024, 1.05);
    repo.annual_mut().insert(2025, 1.04);
    repo
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_allocation_is_exact_and_bounded(
        amount_cents in 1i64..100_000_000_000,
        interest_pending in money(),
        capital_pending in money(),
    ) {
        let amount = amount_cents as f64 / 100.0;
        let split = PaymentAllocator::allocate(amount, interest_pending, capital_pending).unwrap();

        prop_assert!(split.interest_applied >= 0.0);
        prop_assert!(split.capital_applied >= 0.0);
        prop_assert!(split.interest_applied <= interest_pending + 0.005);
        prop_assert!(
            (split.interest_applied + split.capital_applied - amount).abs() < 1e-6,
            "split {} + {} != {}",
            split.interest_applied,
            split.capital_applied,
            amount
        );
    }

    #[test]
    fn prop_no_interest_at_or_after_cutoff(
        capital in money(),
        account in period(),
        months_after in 0u32..120,
    ) {
        let repo = repo_with_flat_rate(0.10);
        let accrual = InterestAccrual::new(&repo, AccrualFormula::CompoundActual365);
        // Cutoff at or before the account month
        let cutoff = account.minus_months(months_after);
        prop_assert_eq!(accrual.accrue(capital, account, cutoff).unwrap(), 0.0);
    }

    #[test]
    fn prop_accrual_is_sum_of_month_contributions(
        capital in money(),
        account in period(),
        elapsed in 1u32..48,
    ) {
        let repo = repo_with_flat_rate(0.08);
        let accrual = InterestAccrual::new(&repo, AccrualFormula::CompoundActual365);

        let mut cutoff = account;
        let mut by_month = 0.0;
        for _ in 0..elapsed {
            by_month += accrual.month_interest(capital, &cutoff).unwrap();
            cutoff = cutoff.next();
        }

        let total = accrual.accrue(capital, account, cutoff).unwrap();
        prop_assert!((total - by_month).abs() < 0.005 + 1e-9 * by_month.abs());
    }

    #[test]
    fn prop_bonus_eligibility_is_pure(sched in schedule(), month in 1u32..=12) {
        let expected = match sched {
            BonusSchedule::Twelve => false,
            BonusSchedule::Thirteen => month == 12,
            BonusSchedule::Fourteen => month == 6 || month == 12,
        };
        prop_assert_eq!(sched.is_bonus_month(month), expected);
    }

    #[test]
    fn prop_indexer_identity_at_or_after_reference(
        base in money(),
        reference_year in 2000i32..2035,
        years_after in 0i32..30,
    ) {
        let repo = repo_with_flat_rate(0.10);
        let indexer = BaseIndexer::new(&repo);
        let adjusted = indexer.adjust(base, reference_year, reference_year + years_after).unwrap();
        prop_assert_eq!(adjusted, base);
    }

    #[test]
    fn prop_generation_is_deterministic(
        base_cents in 1i64..1_000_000_000_000,
        share in 1u32..100,
        sched in schedule(),
        window in 1u32..60,
    ) {
        let pensioner = PensionerProfile::new(
            "P1",
            "Pensioner",
            "E1",
            base_cents as f64 / 100.0,
            2025,
            share as f64 / 100.0,
            sched,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            CarteraStatus::Active,
        );
        let generator = AccountGenerator::new(repo_with_flat_rate(0.10), GeneratorConfig::default());

        let cutoff = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let start = Period::from_date(cutoff)
            .minus_months(window - 1)
            .first_day()
            .unwrap();

        let first = generator.generate(&pensioner, start, cutoff).unwrap();
        let second = generator.generate(&pensioner, start, cutoff).unwrap();

        prop_assert_eq!(first.len() as u32, window);
        prop_assert_eq!(first, second);
    }
}
