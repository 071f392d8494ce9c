//! Turn execution
//!
//! The orchestrator runs eleven phases per turn in a fixed order, feeding
//! each domain's orders to its resolver and applying the outcomes to the
//! shared unit table.

pub mod environment;
pub mod orchestrator;
pub mod phase;
mod phases;
pub mod record;
pub mod victory;

pub use environment::{EwConditions, EwEnvironment};
pub use orchestrator::TurnOrchestrator;
pub use phase::{day_number, Phase, TimeOfDay, PHASE_ORDER};
pub use record::{GameRecord, TurnRecord, Winner};
pub use victory::{check_victory, tier_points, VictoryLedger, VpAward};
