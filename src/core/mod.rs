//! Core types, configuration and errors

pub mod config;
pub mod error;
pub mod types;

pub use config::{config, GameConfig, VictoryPointTable};
pub use error::{Result, WarError};
pub use types::{Faction, HexCoord, ReportId, Turn, UnitId, FACTION_ORDER};
