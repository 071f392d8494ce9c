//! Airbase facilities

use serde::{Deserialize, Serialize};

use crate::core::types::{Faction, HexCoord};

/// Component damage split from a strike on an airbase
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirbaseDamage {
    pub runway: f32,
    pub fuel: f32,
    pub ammo: f32,
    pub shelters: f32,
    pub maintenance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airbase {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub faction: Faction,
    #[serde(default)]
    pub location: Option<HexCoord>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub hardened_shelters: u32,
    /// 0-100
    #[serde(default = "default_maintenance")]
    pub maintenance_rating: f32,
    /// 0-100, lowered by strikes
    #[serde(default = "full")]
    pub runway_status: f32,
    #[serde(default = "full")]
    pub fuel_storage: f32,
    #[serde(default = "full")]
    pub ammo_storage: f32,
    #[serde(default)]
    pub squadron_ids: Vec<String>,
}

fn full() -> f32 {
    100.0
}

fn default_maintenance() -> f32 {
    80.0
}

impl Airbase {
    pub fn new(id: impl Into<String>, faction: Faction) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            faction,
            location: None,
            capacity: 0,
            hardened_shelters: 0,
            maintenance_rating: 80.0,
            runway_status: 100.0,
            fuel_storage: 100.0,
            ammo_storage: 100.0,
            squadron_ids: Vec::new(),
        }
    }

    pub fn is_operational(&self) -> bool {
        self.runway_status >= 30.0
    }

    /// Sortie-rate multiplier from runway and maintenance condition
    pub fn sortie_modifier(&self) -> f32 {
        (self.runway_status / 100.0) * (self.maintenance_rating / 100.0)
    }

    pub fn apply_damage(&mut self, damage: &AirbaseDamage) {
        self.runway_status = (self.runway_status - damage.runway).max(0.0);
        self.fuel_storage = (self.fuel_storage - damage.fuel * 0.5).max(0.0);
        self.ammo_storage = (self.ammo_storage - damage.ammo * 0.5).max(0.0);
    }
}
