//! Scenario loading
//!
//! A scenario is the theater map, both orders of battle, sensor and supply
//! infrastructure, and each faction's standing orders. It is read from JSON
//! once; `build` turns it into the world the orchestrator owns.

mod demo;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

use crate::core::types::{Faction, UnitId};
use crate::orders::Orders;
use crate::services::{FogOfWar, HexCell, HexMap, LogisticsSystem, Sensor, SupplyNode, Weather};
use crate::units::{Airbase, Unit, UnitStatus, UnitTable};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Scenario JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scenario IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate unit id: {0}")]
    DuplicateUnit(UnitId),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),
}

/// Orders each faction repeats every turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingOrders {
    pub india: Orders,
    pub pakistan: Orders,
}

impl StandingOrders {
    pub fn get(&self, faction: Faction) -> &Orders {
        match faction {
            Faction::India => &self.india,
            Faction::Pakistan => &self.pakistan,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub weather: Weather,
    pub map: Vec<HexCell>,
    pub units: Vec<Unit>,
    pub airbases: Vec<Airbase>,
    pub sensors: Vec<Sensor>,
    pub supply_nodes: Vec<SupplyNode>,
    pub orders: StandingOrders,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        let scenario = Self::from_json(&content)?;
        tracing::info!(
            "Scenario '{}' loaded from {}: {} units, {} hexes",
            scenario.name,
            path.display(),
            scenario.units.len(),
            scenario.map.len()
        );
        Ok(scenario)
    }

    /// The built-in two-faction theater
    pub fn demo() -> Self {
        demo::theater()
    }

    /// Build the world. `seed` drives the intelligence picture's noise.
    pub fn build(&self, seed: u64) -> Result<(HexMap, UnitTable, FogOfWar, LogisticsSystem), ScenarioError> {
        let mut map = HexMap::from_cells(self.map.iter().cloned());
        map.set_weather(self.weather);

        let mut units = UnitTable::new();
        for unit in &self.units {
            let unit = normalize(unit.clone())?;
            if units.contains(&unit.id) {
                return Err(ScenarioError::DuplicateUnit(unit.id));
            }
            units.insert(unit);
        }

        let mut airbase_ids = BTreeSet::new();
        for airbase in &self.airbases {
            if !airbase_ids.insert(airbase.id.clone()) {
                return Err(ScenarioError::DuplicateUnit(UnitId::new(airbase.id.clone())));
            }
            units.insert_airbase(airbase.clone());
        }

        let mut intel = FogOfWar::new(seed);
        for sensor in &self.sensors {
            intel.add_sensor(sensor.clone());
        }

        let mut logistics = LogisticsSystem::new();
        for node in &self.supply_nodes {
            logistics.add_node(node.clone());
        }

        tracing::debug!(
            "Built scenario '{}': {} units, {} airbases, {} sensors, {} supply nodes",
            self.name,
            units.len(),
            airbase_ids.len(),
            self.sensors.len(),
            self.supply_nodes.len()
        );
        Ok((map, units, intel, logistics))
    }
}

/// Reject malformed units and bring the rest inside the state invariants
fn normalize(mut unit: Unit) -> Result<Unit, ScenarioError> {
    if unit.id.is_empty() {
        return Err(ScenarioError::InvalidUnit(format!(
            "{} unit of type '{}' has no id",
            unit.faction, unit.unit_type
        )));
    }

    let state = &mut unit.state;
    if state.strength_max == 0 {
        state.strength_max = state.strength_current;
    }
    if state.strength_current > state.strength_max {
        return Err(ScenarioError::InvalidUnit(format!(
            "{}: strength {} exceeds maximum {}",
            unit.id, state.strength_current, state.strength_max
        )));
    }
    for value in [
        &mut state.organization,
        &mut state.morale,
        &mut state.supply_level,
        &mut state.fuel,
        &mut state.readiness,
        &mut state.suppression,
    ] {
        *value = value.clamp(0.0, 100.0);
    }
    state.dug_in = state.dug_in.min(3);

    if state.strength_current == 0 {
        unit.status = UnitStatus::Destroyed;
    } else if unit.status == UnitStatus::Destroyed {
        return Err(ScenarioError::InvalidUnit(format!(
            "{} is marked destroyed with strength {}",
            unit.id, state.strength_current
        )));
    }
    if unit.name.is_empty() {
        unit.name = unit.id.to_string();
    }
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitCategory;

    #[test]
    fn test_demo_builds() {
        let scenario = Scenario::demo();
        let (map, units, intel, logistics) = scenario.build(7).unwrap();
        assert!(!map.is_empty());
        assert_eq!(units.len(), scenario.units.len());
        assert!(units.airbase("PAF-SARGODHA").is_some());
        assert!(!intel.sensors(Faction::India).is_empty());
        assert!(logistics.nodes(Faction::Pakistan).count() > 0);
        assert!(!scenario.orders.get(Faction::India).is_empty());
        assert!(!scenario.orders.get(Faction::Pakistan).is_empty());
    }

    #[test]
    fn test_duplicate_unit_is_rejected() {
        let mut scenario = Scenario::default();
        let unit = Unit::new("IN-INF-1", Faction::India, UnitCategory::Ground, "infantry_brigade", 3000);
        scenario.units = vec![unit.clone(), unit];
        let result = scenario.build(1);
        assert!(matches!(result, Err(ScenarioError::DuplicateUnit(id)) if id.as_str() == "IN-INF-1"));
    }

    #[test]
    fn test_zero_strength_unit_starts_destroyed() {
        let mut unit = Unit::new("PK-INF-9", Faction::Pakistan, UnitCategory::Ground, "infantry_brigade", 1000);
        unit.state.strength_current = 0;
        let scenario = Scenario {
            units: vec![unit],
            ..Scenario::default()
        };
        let (_, units, _, _) = scenario.build(1).unwrap();
        let unit = units.get(&UnitId::from("PK-INF-9")).unwrap();
        assert!(unit.is_destroyed());
        assert_eq!(unit.state.strength_max, 1000);
    }

    #[test]
    fn test_overstrength_unit_is_invalid() {
        let mut unit = Unit::new("IN-SQN-9", Faction::India, UnitCategory::Aircraft, "su30mki", 18);
        unit.state.strength_current = 20;
        let scenario = Scenario {
            units: vec![unit],
            ..Scenario::default()
        };
        assert!(matches!(scenario.build(1), Err(ScenarioError::InvalidUnit(_))));
    }

    #[test]
    fn test_sparse_json() {
        let json = r#"{
            "name": "Border skirmish",
            "weather": "fog",
            "map": [{"coord": {"q": 0, "r": 0}, "terrain": "desert"}],
            "units": [
                {"id": "IN-ARMD-1", "faction": "india", "category": "ground",
                 "unit_type": "armored_brigade", "state": {"strength_current": 3200},
                 "location": {"q": 0, "r": 0}}
            ],
            "orders": {"india": {"ground_orders": [{"unit_id": "IN-ARMD-1", "target_id": "PK-INF-1"}]}}
        }"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert_eq!(scenario.orders.india.ground_orders.len(), 1);
        assert!(scenario.orders.pakistan.is_empty());

        let (map, units, _, _) = scenario.build(1).unwrap();
        assert_eq!(map.current_weather(), Weather::Fog);
        let unit = units.get(&UnitId::from("IN-ARMD-1")).unwrap();
        assert_eq!(unit.state.strength_max, 3200);
        assert_eq!(unit.name, "IN-ARMD-1");
    }

    #[test]
    fn test_malformed_json_is_a_json_error() {
        assert!(matches!(Scenario::from_json("{\"units\": 5}"), Err(ScenarioError::Json(_))));
    }
}
