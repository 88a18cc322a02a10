//! Load the pensioner roster from CSV
//!
//! One row per pensioner with the owning entity denormalized onto it, the
//! way an administrative export delivers it.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;

use super::{BonusSchedule, CarteraStatus, Entity, PensionerBalances, PensionerProfile};

/// Raw CSV row matching the roster export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "EntityId")]
    entity_id: String,
    #[serde(rename = "EntityName")]
    entity_name: String,
    #[serde(rename = "PensionerId")]
    pensioner_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "CalculationBase")]
    calculation_base: f64,
    #[serde(rename = "BaseYear")]
    base_year: i32,
    #[serde(rename = "SharePct")]
    share_percentage: f64,
    #[serde(rename = "Mesadas")]
    mesadas: u8,
    #[serde(rename = "NominationStart")]
    nomination_start: String,
    #[serde(rename = "Cartera")]
    cartera: String,
    #[serde(rename = "CapitalPending")]
    capital_pending: f64,
    #[serde(rename = "InterestPending")]
    interest_pending: f64,
}

impl CsvRow {
    fn to_pensioner(self) -> Result<(Entity, PensionerProfile), Box<dyn Error>> {
        let bonus_schedule = BonusSchedule::from_count(self.mesadas)
            .ok_or_else(|| format!("Unknown Mesadas count: {}", self.mesadas))?;

        let status = match self.cartera.as_str() {
            "ACTIVE" => CarteraStatus::Active,
            "INACTIVE" => CarteraStatus::Inactive,
            "SUSPENDED" => CarteraStatus::Suspended,
            other => return Err(format!("Unknown Cartera status: {}", other).into()),
        };

        let nomination_start = NaiveDate::parse_from_str(&self.nomination_start, "%Y-%m-%d")?;

        let entity = Entity {
            entity_id: self.entity_id.clone(),
            name: self.entity_name,
        };

        let mut profile = PensionerProfile::new(
            self.pensioner_id,
            self.name,
            self.entity_id,
            self.calculation_base,
            self.base_year,
            self.share_percentage,
            bonus_schedule,
            nomination_start,
            status,
        );
        profile.balances = PensionerBalances::new(self.capital_pending, self.interest_pending);

        Ok((entity, profile))
    }
}

/// Entities and pensioners loaded from a roster export
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entities: BTreeMap<String, Entity>,
    pensioners: Vec<PensionerProfile>,
}

impl Roster {
    /// Look up an entity by id
    pub fn entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.get(entity_id)
    }

    /// All entities, ordered by id
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Look up a pensioner by id
    pub fn pensioner(&self, pensioner_id: &str) -> Option<&PensionerProfile> {
        self.pensioners
            .iter()
            .find(|p| p.pensioner_id == pensioner_id)
    }

    /// Mutable pensioner lookup, for payment registration
    pub fn pensioner_mut(&mut self, pensioner_id: &str) -> Option<&mut PensionerProfile> {
        self.pensioners
            .iter_mut()
            .find(|p| p.pensioner_id == pensioner_id)
    }

    /// All pensioners affiliated with an entity, in roster order
    pub fn pensioners_of(&self, entity_id: &str) -> Vec<&PensionerProfile> {
        self.pensioners
            .iter()
            .filter(|p| p.entity_id == entity_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pensioners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pensioners.is_empty()
    }

    /// Add one pensioner (and its entity, if new) to the roster
    pub fn push(&mut self, entity: Entity, pensioner: PensionerProfile) {
        self.entities
            .entry(entity.entity_id.clone())
            .or_insert(entity);
        self.pensioners.push(pensioner);
    }
}

/// Load the roster from a CSV file
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Roster, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    load_from(reader)
}

/// Load the roster from any reader (e.g., string buffer, network stream)
pub fn load_roster_from_reader<R: std::io::Read>(reader: R) -> Result<Roster, Box<dyn Error>> {
    load_from(Reader::from_reader(reader))
}

fn load_from<R: std::io::Read>(mut csv_reader: Reader<R>) -> Result<Roster, Box<dyn Error>> {
    let mut roster = Roster::default();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let (entity, pensioner) = row.to_pensioner()?;
        roster.push(entity, pensioner);
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
EntityId,EntityName,PensionerId,Name,CalculationBase,BaseYear,SharePct,Mesadas,NominationStart,Cartera,CapitalPending,InterestPending
E001,Municipio de Ejemplo,P100,Maria Lopez,5000000,2025,0.02,14,2019-03-01,ACTIVE,1200000,85000
E001,Municipio de Ejemplo,P101,Jorge Diaz,4200000,2025,0.015,13,2021-07-01,ACTIVE,0,0
E002,Hospital Central,P200,Ana Ruiz,3800000,2025,0.03,12,2020-01-01,INACTIVE,500000,0
";

    #[test]
    fn test_load_roster() {
        let roster = load_roster_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.entities().count(), 2);

        let maria = roster.pensioner("P100").unwrap();
        assert_eq!(maria.entity_id, "E001");
        assert_eq!(maria.bonus_schedule, BonusSchedule::Fourteen);
        assert_eq!(maria.balances.capital_pending, 1_200_000.0);
        assert!(maria.status.is_active());

        assert_eq!(roster.pensioners_of("E001").len(), 2);
        assert_eq!(roster.entity("E002").unwrap().name, "Hospital Central");
    }

    #[test]
    fn test_rejects_unknown_cartera() {
        let bad = "\
EntityId,EntityName,PensionerId,Name,CalculationBase,BaseYear,SharePct,Mesadas,NominationStart,Cartera,CapitalPending,InterestPending
E001,Municipio,P100,Maria,5000000,2025,0.02,14,2019-03-01,PENDING,0,0
";
        assert!(load_roster_from_reader(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_unknown_mesada_count() {
        let bad = "\
EntityId,EntityName,PensionerId,Name,CalculationBase,BaseYear,SharePct,Mesadas,NominationStart,Cartera,CapitalPending,InterestPending
E001,Municipio,P100,Maria,5000000,2025,0.02,15,2019-03-01,ACTIVE,0,0
";
        assert!(load_roster_from_reader(bad.as_bytes()).is_err());
    }
}
