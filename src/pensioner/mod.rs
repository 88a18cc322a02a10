//! Pensioner and entity records plus the roster loader

mod data;
pub mod loader;

pub use data::{BonusSchedule, CarteraStatus, Entity, PensionerBalances, PensionerProfile};
pub use loader::{load_roster, load_roster_from_reader, Roster};
