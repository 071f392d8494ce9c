//! Turn phases and the time-of-day cycle

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::Turn;

/// One step of a turn. Variants are declared in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intelligence,
    Missiles,
    #[serde(rename = "ew")]
    ElectronicWarfare,
    Air,
    Drones,
    Artillery,
    Helicopters,
    Ground,
    SpecialForces,
    Logistics,
    Recovery,
}

/// Every phase, in the only order a turn may run them
pub const PHASE_ORDER: [Phase; 11] = [
    Phase::Intelligence,
    Phase::Missiles,
    Phase::ElectronicWarfare,
    Phase::Air,
    Phase::Drones,
    Phase::Artillery,
    Phase::Helicopters,
    Phase::Ground,
    Phase::SpecialForces,
    Phase::Logistics,
    Phase::Recovery,
];

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intelligence => "intelligence",
            Self::Missiles => "missiles",
            Self::ElectronicWarfare => "ew",
            Self::Air => "air",
            Self::Drones => "drones",
            Self::Artillery => "artillery",
            Self::Helicopters => "helicopters",
            Self::Ground => "ground",
            Self::SpecialForces => "special_forces",
            Self::Logistics => "logistics",
            Self::Recovery => "recovery",
        }
    }

    /// Position in [`PHASE_ORDER`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Six-hour block of the day. Four turns make one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[default]
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    pub fn for_turn(turn: Turn) -> Self {
        match turn.saturating_sub(1) % 4 {
            0 => Self::Dawn,
            1 => Self::Day,
            2 => Self::Dusk,
            _ => Self::Night,
        }
    }

    pub fn is_night(&self) -> bool {
        *self == Self::Night
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dawn => "dawn",
            Self::Day => "day",
            Self::Dusk => "dusk",
            Self::Night => "night",
        }
    }
}

/// Campaign day a turn falls on
pub fn day_number(turn: Turn) -> u32 {
    turn / 4 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_is_declaration_order() {
        for (i, phase) in PHASE_ORDER.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
        assert_eq!(PHASE_ORDER[0], Phase::Intelligence);
        assert_eq!(PHASE_ORDER[10], Phase::Recovery);
    }

    #[test]
    fn test_phase_names_are_stable() {
        let names: Vec<&str> = PHASE_ORDER.iter().map(Phase::as_str).collect();
        assert_eq!(
            names,
            [
                "intelligence",
                "missiles",
                "ew",
                "air",
                "drones",
                "artillery",
                "helicopters",
                "ground",
                "special_forces",
                "logistics",
                "recovery"
            ]
        );
        let json = serde_json::to_string(&Phase::ElectronicWarfare).unwrap();
        assert_eq!(json, "\"ew\"");
    }

    #[test]
    fn test_time_of_day_cycle() {
        assert_eq!(TimeOfDay::for_turn(1), TimeOfDay::Dawn);
        assert_eq!(TimeOfDay::for_turn(2), TimeOfDay::Day);
        assert_eq!(TimeOfDay::for_turn(3), TimeOfDay::Dusk);
        assert_eq!(TimeOfDay::for_turn(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::for_turn(5), TimeOfDay::Dawn);
        assert!(TimeOfDay::for_turn(8).is_night());
    }

    #[test]
    fn test_day_number() {
        assert_eq!(day_number(1), 1);
        assert_eq!(day_number(3), 1);
        assert_eq!(day_number(4), 2);
        assert_eq!(day_number(16), 5);
    }
}
