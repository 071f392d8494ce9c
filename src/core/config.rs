//! Game configuration with documented defaults
//!
//! Every field has a built-in value; a TOML file only needs the keys it
//! wants to change. Missing files or keys never fail a game.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::drones::SwarmTuning;
use crate::core::error::{Result, WarError};
use crate::units::UnitCategory;

/// Victory-point awards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryPointTable {
    /// Award for a decisive-victory report
    pub decisive_victory: u32,
    /// Award for a victory report
    pub victory: u32,
    /// Award for a marginal report
    pub marginal: u32,
    /// Extra award for a SEAD report worth at least `victory` points
    pub sead_bonus: u32,
    /// Extra award for a special-forces report worth at least `victory` points
    pub special_forces_bonus: u32,

    // Destruction bonuses, paid once per unit to the opposing faction
    pub destroyed_aircraft: u32,
    pub destroyed_air_defense: u32,
    pub destroyed_missile: u32,
    pub destroyed_helicopter: u32,
    pub destroyed_drone: u32,
    pub destroyed_artillery: u32,
    pub destroyed_special_forces: u32,
    pub destroyed_ground: u32,
    pub destroyed_isr: u32,
}

impl Default for VictoryPointTable {
    fn default() -> Self {
        Self {
            decisive_victory: 5,
            victory: 3,
            marginal: 1,
            sead_bonus: 2,
            special_forces_bonus: 1,
            destroyed_aircraft: 5,
            destroyed_air_defense: 4,
            destroyed_missile: 3,
            destroyed_helicopter: 3,
            destroyed_drone: 2,
            destroyed_artillery: 2,
            destroyed_special_forces: 3,
            destroyed_ground: 2,
            destroyed_isr: 2,
        }
    }
}

impl VictoryPointTable {
    /// Bonus for destroying a unit of the given category
    pub fn destruction_bonus(&self, category: UnitCategory) -> u32 {
        match category {
            UnitCategory::Aircraft => self.destroyed_aircraft,
            UnitCategory::AirDefense => self.destroyed_air_defense,
            UnitCategory::Missile => self.destroyed_missile,
            UnitCategory::Helicopter => self.destroyed_helicopter,
            UnitCategory::Drone => self.destroyed_drone,
            UnitCategory::Artillery => self.destroyed_artillery,
            UnitCategory::SpecialForces => self.destroyed_special_forces,
            UnitCategory::Ground => self.destroyed_ground,
            UnitCategory::Isr => self.destroyed_isr,
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Turn at which the game ends (16 turns = four days)
    pub max_turns: u32,

    /// Master seed; every resolver and collaborator derives its own stream from it
    pub seed: u64,

    /// Smallest salvo a missile battery will fire
    pub min_missile_salvo: u32,

    /// Force-preservation cap on the CAP defending against the first-moving
    /// faction in a paired air-to-air fight. `None` disables the cap.
    pub max_defending_cap_aircraft: Option<u32>,

    pub victory_points: VictoryPointTable,

    /// Per-system drone saturation tuning. When absent the built-in SAM
    /// numbers are used.
    pub swarm: Option<SwarmTuning>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_turns: 16,
            seed: 42,
            min_missile_salvo: 2,
            max_defending_cap_aircraft: Some(12),
            victory_points: VictoryPointTable::default(),
            swarm: None,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate().map_err(WarError::Config)?;
        Ok(config)
    }

    /// Load from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_turns == 0 {
            return Err("max_turns must be at least 1".into());
        }

        if self.min_missile_salvo == 0 {
            return Err("min_missile_salvo must be at least 1".into());
        }

        let vp = &self.victory_points;
        if vp.decisive_victory < vp.victory || vp.victory < vp.marginal {
            return Err(format!(
                "victory point tiers must be ordered (decisive {} >= victory {} >= marginal {})",
                vp.decisive_victory, vp.victory, vp.marginal
            ));
        }

        if let Some(swarm) = &self.swarm {
            for (system, tuning) in &swarm.per_system {
                if !(0.0..=1.0).contains(&tuning.base_pk) {
                    return Err(format!("swarm base_pk for {} must be in [0, 1]", system));
                }
            }
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<GameConfig> = OnceLock::new();

/// Get the global game config (initializes with defaults if not set)
pub fn config() -> &'static GameConfig {
    CONFIG.get_or_init(GameConfig::default)
}

/// Set the global game config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: GameConfig) -> std::result::Result<(), GameConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_turns, 16);
        assert_eq!(config.max_defending_cap_aircraft, Some(12));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str("max_turns = 8\nseed = 7\n").unwrap();
        assert_eq!(config.max_turns, 8);
        assert_eq!(config.seed, 7);
        assert_eq!(config.min_missile_salvo, 2);
        assert_eq!(config.victory_points.decisive_victory, 5);
    }

    #[test]
    fn test_nested_vp_override() {
        let toml = "[victory_points]\nsead_bonus = 4\n";
        let config = GameConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.victory_points.sead_bonus, 4);
        assert_eq!(config.victory_points.victory, 3);
    }

    #[test]
    fn test_zero_turns_rejected() {
        assert!(GameConfig::from_toml_str("max_turns = 0").is_err());
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let mut config = GameConfig::default();
        config.victory_points.marginal = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_destruction_bonus_lookup() {
        let vp = VictoryPointTable::default();
        assert_eq!(vp.destruction_bonus(UnitCategory::Aircraft), 5);
        assert_eq!(vp.destruction_bonus(UnitCategory::AirDefense), 4);
        assert_eq!(vp.destruction_bonus(UnitCategory::Isr), 2);
    }
}
