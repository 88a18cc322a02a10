//! Cross-year adjustment of the calculation base
//!
//! A pensioner's calculation base is always captured for a fixed reference
//! year. Accounts billed for earlier years must use the equivalent amount in
//! that year's purchasing power, so the base is deflated by the cumulative
//! annual index factors between the target year and the reference year.

use crate::error::EngineError;
use crate::rates::{MissingIndexPolicy, RateRepository};

/// Deflates a reference-year base into earlier years
#[derive(Debug, Clone, Copy)]
pub struct BaseIndexer<'a> {
    repo: &'a RateRepository,
}

impl<'a> BaseIndexer<'a> {
    pub fn new(repo: &'a RateRepository) -> Self {
        Self { repo }
    }

    /// Equivalent value of `base` (denominated in `reference_year`) for
    /// `target_year`
    ///
    /// Identity for `target_year >= reference_year`: the base is already
    /// denominated for years at or after the reference year. Otherwise
    /// divides by the product of the annual factors for every year in
    /// `(target_year, reference_year]`.
    pub fn adjust(
        &self,
        base: f64,
        reference_year: i32,
        target_year: i32,
    ) -> Result<f64, EngineError> {
        if target_year >= reference_year {
            return Ok(base);
        }

        let mut cumulative = 1.0;
        for year in (target_year + 1)..=reference_year {
            match self.repo.annual_index(year) {
                Some(factor) => cumulative *= factor,
                None => match self.repo.config().missing_index {
                    MissingIndexPolicy::NoAdjustment => {
                        log::debug!("no annual index for {year}, treating as factor 1.0");
                    }
                    MissingIndexPolicy::Fail => {
                        return Err(EngineError::MissingAnnualIndex(year));
                    }
                },
            }
        }

        Ok(base / cumulative)
    }
}
