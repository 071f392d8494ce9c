//! Collaborators the combat core reads from or writes to
//!
//! Each is a trait with an in-crate default implementation so the turn
//! orchestrator runs standalone.

pub mod geometry;
pub mod intel;
pub mod supply;

pub use geometry::{GeometryService, HexCell, HexMap, Terrain, Weather, WeatherModifiers};
pub use intel::{FogOfWar, IntelQuality, IntelReport, IntelSource, IntelStore, Sensor};
pub use supply::{supply_effects, LogisticsSystem, SupplyNode, SupplyService, SupplyTurnResult};
