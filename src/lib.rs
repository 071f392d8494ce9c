//! Warfront - Turn-Based Theater War Simulation
//!
//! An India/Pakistan conventional conflict resolved in six-hour turns. Each
//! turn runs eleven phases; each combat domain has its own seeded resolver.

pub mod combat;
pub mod core;
pub mod orders;
pub mod scenario;
pub mod services;
pub mod turn;
pub mod units;

pub use crate::core::{Faction, GameConfig, Result, UnitId, WarError};
pub use orders::Orders;
pub use scenario::{Scenario, ScenarioError};
pub use turn::{Phase, TurnOrchestrator, TurnRecord, PHASE_ORDER};
