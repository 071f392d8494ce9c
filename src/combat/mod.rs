//! Per-domain combat resolution
//!
//! Every resolver owns a seeded [`CombatRng`] and emits [`CombatReport`]s.
//! Resolvers never touch the unit table directly; the turn orchestrator
//! applies their effects.

pub mod air;
pub mod air_defense;
pub mod artillery;
pub mod base;
pub mod drones;
pub mod ew;
pub mod ground;
pub mod helicopters;
pub mod missiles;
pub mod report;
pub mod special_forces;

pub use air::{AirMission, AirMissionKind, AirResolver};
pub use air_defense::{select_layered, SamEntry, SamTier};
pub use artillery::{ArtilleryResolver, ArtilleryStats, FireMission, FireMissionKind};
pub use base::{clamp_probability, determine_result, CombatRng};
pub use drones::{DroneMission, DroneMissionKind, DroneResolver, SwarmTuning};
pub use ew::{EwMission, EwMissionKind, EwResolver, EwSystem};
pub use ground::{GroundEngagement, GroundResolver};
pub use helicopters::{HelicopterMission, HelicopterMissionKind, HelicopterResolver, LzSecurity};
pub use missiles::{MissileResolver, MissileStrike};
pub use report::{CombatReport, CombatResult, ReportPhase};
pub use special_forces::{SfMission, SfMissionKind, SpecialForcesResolver};
