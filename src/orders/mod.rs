//! Orders: per-domain mission descriptors submitted by one faction for one turn
//!
//! Every field has a default so a sparse JSON order still parses. Unit
//! references are not checked here; the orchestrator skips orders whose
//! units it cannot find.

use serde::{Deserialize, Serialize};

use crate::combat::air::AirMissionKind;
use crate::combat::artillery::FireMissionKind;
use crate::combat::drones::DroneMissionKind;
use crate::combat::ew::EwMissionKind;
use crate::combat::ground::{AttackPosture, CitySize};
use crate::combat::helicopters::{HelicopterMissionKind, LzSecurity};
use crate::combat::special_forces::{InsertionMethod, SecurityLevel, SfMissionKind};
use crate::core::error::Result;
use crate::core::types::{Faction, HexCoord, Turn, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileStrikeOrder {
    pub battery_id: UnitId,
    /// Unit or airbase id
    pub target_id: UnitId,
    /// Hardness class: airbase, sam_site, radar, c2, logistics, ground_unit
    pub target_type: String,
    pub missiles: u32,
}

impl Default for MissileStrikeOrder {
    fn default() -> Self {
        Self {
            battery_id: UnitId::default(),
            target_id: UnitId::default(),
            target_type: "ground_unit".into(),
            missiles: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EwOrder {
    pub unit_id: UnitId,
    #[serde(rename = "type", alias = "mission_type")]
    pub kind: EwMissionKind,
    pub target_id: Option<UnitId>,
    /// Counter-countermeasures of the jammed side
    pub target_eccm: f32,
    pub target_system: String,
    pub target_cyber_defense: f32,
    pub attack_sophistication: f32,
    pub sigint_capability: f32,
    pub target_comms_activity: f32,
    pub target_comsec: f32,
}

impl Default for EwOrder {
    fn default() -> Self {
        Self {
            unit_id: UnitId::default(),
            kind: EwMissionKind::default(),
            target_id: None,
            target_eccm: 0.0,
            target_system: "c2".into(),
            target_cyber_defense: 50.0,
            attack_sophistication: 60.0,
            sigint_capability: 60.0,
            target_comms_activity: 70.0,
            target_comsec: 50.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirOrder {
    pub squadron_id: UnitId,
    #[serde(rename = "mission_type", alias = "type")]
    pub kind: AirMissionKind,
    /// Defaults to the squadron's current strength
    pub aircraft: Option<u32>,
    pub target_id: Option<UnitId>,
    /// Strike only; SEAD and CAS use fixed values
    pub target_defense: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneOrder {
    pub unit_id: UnitId,
    #[serde(rename = "type", alias = "mission_type")]
    pub kind: DroneMissionKind,
    pub drone_count: Option<u32>,
    pub drone_type: Option<String>,
    pub target_id: Option<UnitId>,
    pub target_location: Option<HexCoord>,
    /// ISR search radius in hexes
    pub area_radius: u32,
    pub escort_drones: u32,
}

impl Default for DroneOrder {
    fn default() -> Self {
        Self {
            unit_id: UnitId::default(),
            kind: DroneMissionKind::default(),
            drone_count: None,
            drone_type: None,
            target_id: None,
            target_location: None,
            area_radius: 3,
            escort_drones: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtilleryOrder {
    pub battery_id: UnitId,
    pub target_id: Option<UnitId>,
    pub location: Option<HexCoord>,
    pub rounds: u32,
    #[serde(rename = "mission_type", alias = "type")]
    pub kind: FireMissionKind,
}

impl Default for ArtilleryOrder {
    fn default() -> Self {
        Self {
            battery_id: UnitId::default(),
            target_id: None,
            location: None,
            rounds: 20,
            kind: FireMissionKind::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelicopterOrder {
    pub unit_id: UnitId,
    #[serde(rename = "type", alias = "mission_type")]
    pub kind: HelicopterMissionKind,
    pub helicopter_count: Option<u32>,
    pub helicopter_type: Option<String>,
    pub target_id: Option<UnitId>,
    /// Air assault only
    pub troops: u32,
    pub lz_security: LzSecurity,
}

impl Default for HelicopterOrder {
    fn default() -> Self {
        Self {
            unit_id: UnitId::default(),
            kind: HelicopterMissionKind::default(),
            helicopter_count: None,
            helicopter_type: None,
            target_id: None,
            troops: 30,
            lz_security: LzSecurity::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundOrder {
    pub unit_id: UnitId,
    pub target_id: UnitId,
    pub posture: AttackPosture,
    pub river_crossing: bool,
    /// Set when the objective is a city
    pub city_size: Option<CitySize>,
    pub artillery_support: bool,
    pub air_support: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfOrder {
    pub unit_id: UnitId,
    #[serde(rename = "type", alias = "mission_type")]
    pub kind: SfMissionKind,
    /// Defaults to the unit's current strength
    pub team_size: Option<u32>,
    pub target_id: Option<UnitId>,
    pub target_location: Option<HexCoord>,
    pub insertion: InsertionMethod,
    pub extraction: bool,
    /// Recon only
    pub observation_turns: u32,
    /// Used when the target is not a known unit
    pub target_security: SecurityLevel,
    pub target_troops: u32,
    pub support: bool,
}

impl Default for SfOrder {
    fn default() -> Self {
        Self {
            unit_id: UnitId::default(),
            kind: SfMissionKind::default(),
            team_size: None,
            target_id: None,
            target_location: None,
            insertion: InsertionMethod::default(),
            extraction: true,
            observation_turns: 2,
            target_security: SecurityLevel::default(),
            target_troops: 50,
            support: false,
        }
    }
}

/// One faction's eight mission lists for a turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orders {
    pub faction: Option<Faction>,
    pub turn: Turn,
    pub missile_strikes: Vec<MissileStrikeOrder>,
    pub ew_missions: Vec<EwOrder>,
    pub air_missions: Vec<AirOrder>,
    pub drone_missions: Vec<DroneOrder>,
    pub artillery_missions: Vec<ArtilleryOrder>,
    pub helicopter_missions: Vec<HelicopterOrder>,
    pub ground_orders: Vec<GroundOrder>,
    pub sf_missions: Vec<SfOrder>,
}

impl Orders {
    pub fn new(faction: Faction) -> Self {
        Self {
            faction: Some(faction),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.missile_strikes.len()
            + self.ew_missions.len()
            + self.air_missions.len()
            + self.drone_missions.len()
            + self.artillery_missions.len()
            + self.helicopter_missions.len()
            + self.ground_orders.len()
            + self.sf_missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_json_fills_defaults() {
        let json = r#"{
            "missile_strikes": [{"battery_id": "BRAHMOS-1", "target_id": "PAF-SARGODHA"}],
            "sf_missions": [{"unit_id": "PARA-SF-1", "type": "sabotage"}],
            "artillery_missions": [{"battery_id": "ARTY-1"}]
        }"#;
        let orders = Orders::from_json(json).unwrap();
        assert_eq!(orders.len(), 3);

        let strike = &orders.missile_strikes[0];
        assert_eq!(strike.missiles, 2);
        assert_eq!(strike.target_type, "ground_unit");

        let sf = &orders.sf_missions[0];
        assert_eq!(sf.kind, SfMissionKind::Sabotage);
        assert!(sf.extraction);
        assert_eq!(sf.observation_turns, 2);
        assert_eq!(sf.target_security, SecurityLevel::Medium);

        assert_eq!(orders.artillery_missions[0].rounds, 20);
        assert_eq!(orders.artillery_missions[0].kind, FireMissionKind::Bombardment);
    }

    #[test]
    fn test_air_mission_type_aliases() {
        let a: AirOrder = serde_json::from_str(r#"{"squadron_id": "S", "mission_type": "sead"}"#).unwrap();
        let b: AirOrder = serde_json::from_str(r#"{"squadron_id": "S", "type": "sead"}"#).unwrap();
        assert_eq!(a.kind, AirMissionKind::Sead);
        assert_eq!(a, b);
        assert_eq!(a.aircraft, None);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: std::result::Result<EwOrder, _> =
            serde_json::from_str(r#"{"unit_id": "EW-1", "type": "teleport"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_orders() {
        let orders = Orders::new(Faction::India);
        assert!(orders.is_empty());
        assert_eq!(orders.faction, Some(Faction::India));
    }
}
