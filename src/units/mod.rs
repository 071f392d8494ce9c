//! Unit state model
//!
//! Units are created once at scenario load and persist for the whole game.
//! Destroyed units stay in the table for accounting.

pub mod airbase;
pub mod state;
pub mod table;
pub mod unit;

pub use airbase::{Airbase, AirbaseDamage};
pub use state::{supply_factor, Posture, UnitState, UnitStatus};
pub use table::{UnitTable, UnitTableStats};
pub use unit::{MissileBattery, Specialization, Squadron, Unit, UnitCategory, UnitProfile};
