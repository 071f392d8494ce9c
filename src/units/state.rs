//! Runtime state block shared by every unit

use serde::{Deserialize, Serialize};

use crate::core::types::Turn;

/// Unit lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    Ready,
    Engaged,
    Damaged,
    Retreating,
    Destroyed,
    Reloading,
    Repairing,
    InTransit,
}

impl UnitStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

/// Standing posture of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    Attack,
    #[default]
    Defend,
    Delay,
    Withdraw,
    Reserve,
    Patrol,
    Strike,
}

impl Posture {
    /// Defensive posture name used by the ground posture table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defend => "defend",
            Self::Delay => "delay",
            Self::Withdraw => "withdraw",
            Self::Reserve => "reserve",
            Self::Patrol => "patrol",
            Self::Strike => "strike",
        }
    }
}

/// Mutable combat state of a unit
///
/// Percentage fields (organization, morale, supply, fuel, readiness,
/// suppression) live in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitState {
    /// Current manpower or airframe count
    pub strength_current: u32,
    pub strength_max: u32,
    /// Cohesion
    pub organization: f32,
    pub morale: f32,
    /// Ammunition and consumables
    pub supply_level: f32,
    pub fuel: f32,
    /// Maintenance state
    pub readiness: f32,
    /// Entrenchment level, 0-3
    pub dug_in: u8,
    /// Temporary combat penalty
    pub suppression: f32,
    pub detected: bool,
    pub last_combat_turn: Option<Turn>,
}

impl Default for UnitState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl UnitState {
    pub fn new(strength: u32) -> Self {
        Self {
            strength_current: strength,
            strength_max: strength,
            organization: 100.0,
            morale: 85.0,
            supply_level: 100.0,
            fuel: 100.0,
            readiness: 100.0,
            dug_in: 0,
            suppression: 0.0,
            detected: false,
            last_combat_turn: None,
        }
    }

    pub fn strength_ratio(&self) -> f32 {
        self.strength_current as f32 / self.strength_max.max(1) as f32
    }

    /// 0.5 at zero morale up to 1.0 at full morale
    pub fn morale_factor(&self) -> f32 {
        0.5 + self.morale / 200.0
    }

    /// Four-tier supply multiplier
    pub fn supply_factor(&self) -> f32 {
        supply_factor(self.supply_level)
    }

    pub fn suppression_factor(&self) -> f32 {
        1.0 - self.suppression / 100.0
    }

    /// True if the unit has not fought in the turn before `turn`
    pub fn rested_since(&self, turn: Turn) -> bool {
        match self.last_combat_turn {
            None => true,
            Some(last) => last + 1 < turn,
        }
    }
}

/// Combat power multiplier from supply level
pub fn supply_factor(supply_level: f32) -> f32 {
    if supply_level < 25.0 {
        0.4
    } else if supply_level < 50.0 {
        0.7
    } else if supply_level < 75.0 {
        0.9
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = UnitState::new(18);
        assert_eq!(state.strength_current, 18);
        assert_eq!(state.strength_max, 18);
        assert_eq!(state.organization, 100.0);
        assert_eq!(state.morale, 85.0);
        assert_eq!(state.last_combat_turn, None);
    }

    #[test]
    fn test_supply_tiers() {
        assert_eq!(supply_factor(10.0), 0.4);
        assert_eq!(supply_factor(25.0), 0.7);
        assert_eq!(supply_factor(60.0), 0.9);
        assert_eq!(supply_factor(75.0), 1.0);
    }

    #[test]
    fn test_morale_factor_range() {
        let mut state = UnitState::new(1);
        state.morale = 0.0;
        assert_eq!(state.morale_factor(), 0.5);
        state.morale = 100.0;
        assert_eq!(state.morale_factor(), 1.0);
    }

    #[test]
    fn test_rested_since() {
        let mut state = UnitState::new(1);
        assert!(state.rested_since(1));
        state.last_combat_turn = Some(3);
        assert!(!state.rested_since(3));
        assert!(!state.rested_since(4));
        assert!(state.rested_since(5));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&UnitStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
    }
}
