//! Supply consumption and distribution
//!
//! Units draw supplies each turn at a rate set by their class and size.
//! Supply nodes make supplies available with a distance falloff; a unit
//! that receives less than three quarters of any need is undersupplied.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::geometry::GeometryService;
use crate::core::types::{Faction, HexCoord, UnitId};
use crate::units::{Unit, UnitCategory, UnitTable};

/// Consumption multiplier for units that fought this turn
pub const COMBAT_MULTIPLIER: f32 = 3.0;

/// Distance assumed for units without a map position
const UNLOCATED_DISTANCE: u32 = 10;

/// Distance when no supply node can be used
const NO_NODE_DISTANCE: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    Ammunition,
    Fuel,
    Food,
    SpareParts,
    Medical,
}

impl SupplyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ammunition => "ammunition",
            Self::Fuel => "fuel",
            Self::Food => "food",
            Self::SpareParts => "spare_parts",
            Self::Medical => "medical",
        }
    }

    /// Stock a fully functioning network offers per turn
    fn base_availability(&self) -> f32 {
        match self {
            Self::Ammunition | Self::Fuel | Self::Food => 100.0,
            Self::SpareParts => 50.0,
            Self::Medical => 0.0,
        }
    }
}

/// Consumption class of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyClass {
    Infantry,
    Mechanized,
    Armor,
    Artillery,
    SpecialForces,
    Fighter,
    Bomber,
    Helicopter,
    AirDefense,
}

impl SupplyClass {
    pub fn classify(unit: &Unit) -> Self {
        let unit_type = unit.unit_type.to_lowercase();
        match unit.category {
            UnitCategory::Aircraft => {
                if unit_type.contains("fighter") || unit_type.contains("multirole") {
                    Self::Fighter
                } else {
                    Self::Bomber
                }
            }
            UnitCategory::Helicopter => Self::Helicopter,
            UnitCategory::Artillery => Self::Artillery,
            UnitCategory::AirDefense => Self::AirDefense,
            UnitCategory::SpecialForces => Self::SpecialForces,
            _ if unit_type.contains("armor") || unit_type.contains("tank") => Self::Armor,
            _ if unit_type.contains("mech") => Self::Mechanized,
            _ => Self::Infantry,
        }
    }

    /// Per-turn draw per 1000 strength
    pub fn rates(&self) -> &'static [(SupplyType, f32)] {
        use SupplyType::*;
        match self {
            Self::Infantry => &[(Ammunition, 5.0), (Fuel, 2.0), (Food, 10.0)],
            Self::Mechanized => &[(Ammunition, 8.0), (Fuel, 15.0), (Food, 8.0)],
            Self::Armor => &[(Ammunition, 10.0), (Fuel, 25.0), (Food, 6.0)],
            Self::Artillery => &[(Ammunition, 20.0), (Fuel, 5.0), (Food, 4.0)],
            Self::SpecialForces => &[(Ammunition, 3.0), (Fuel, 1.0), (Food, 2.0)],
            Self::Fighter => &[(Ammunition, 15.0), (Fuel, 30.0), (SpareParts, 5.0)],
            Self::Bomber => &[(Ammunition, 25.0), (Fuel, 50.0), (SpareParts, 8.0)],
            Self::Helicopter => &[(Ammunition, 10.0), (Fuel, 20.0), (SpareParts, 4.0)],
            Self::AirDefense => &[(Ammunition, 8.0), (Fuel, 3.0), (SpareParts, 2.0)],
        }
    }
}

/// Multipliers a unit suffers at a given supply level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyEffects {
    pub combat: f32,
    pub movement: f32,
    pub morale: f32,
}

pub fn supply_effects(supply_level: f32) -> SupplyEffects {
    let (combat, movement, morale) = if supply_level >= 75.0 {
        (0.95, 1.0, 0.98)
    } else if supply_level >= 50.0 {
        (0.80, 0.9, 0.90)
    } else if supply_level >= 25.0 {
        (0.50, 0.7, 0.70)
    } else if supply_level >= 10.0 {
        (0.20, 0.4, 0.50)
    } else {
        (0.05, 0.1, 0.20)
    };
    SupplyEffects {
        combat,
        movement,
        morale,
    }
}

/// Depot, railhead or airfield feeding nearby units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub faction: Faction,
    pub location: HexCoord,
    #[serde(default = "default_throughput")]
    pub throughput_per_turn: f32,
    /// 0-100, nodes under 20 cannot supply
    #[serde(default = "default_status")]
    pub status: f32,
}

fn default_throughput() -> f32 {
    100.0
}

fn default_status() -> f32 {
    100.0
}

impl SupplyNode {
    pub fn new(id: impl Into<String>, faction: Faction, location: HexCoord) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            faction,
            location,
            throughput_per_turn: 100.0,
            status: 100.0,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.status >= 20.0
    }
}

/// Outcome of one faction's supply turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyTurnResult {
    pub total_consumed: BTreeMap<SupplyType, f32>,
    pub supplied: Vec<UnitId>,
    pub undersupplied: Vec<UnitId>,
    pub effects: BTreeMap<UnitId, SupplyEffects>,
}

/// Called only by the logistics phase
pub trait SupplyService {
    fn process_turn(
        &mut self,
        faction: Faction,
        units: &mut UnitTable,
        in_combat: &BTreeSet<UnitId>,
        geometry: &dyn GeometryService,
    ) -> SupplyTurnResult;
}

#[derive(Debug, Clone, Default)]
pub struct LogisticsSystem {
    nodes: Vec<SupplyNode>,
    undersupplied: BTreeMap<Faction, Vec<UnitId>>,
}

impl LogisticsSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: SupplyNode) {
        self.nodes.push(node);
    }

    pub fn nodes(&self, faction: Faction) -> impl Iterator<Item = &SupplyNode> {
        self.nodes.iter().filter(move |n| n.faction == faction)
    }

    pub fn damage_node(&mut self, node_id: &str, damage: f32) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            node.status = (node.status - damage).max(0.0);
        }
    }

    pub fn repair_node(&mut self, node_id: &str, amount: f32) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            node.status = (node.status + amount).min(100.0);
        }
    }

    /// Units left short in the faction's last supply turn
    pub fn undersupplied(&self, faction: Faction) -> &[UnitId] {
        self.undersupplied
            .get(&faction)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Hexes to the nearest usable node of the unit's faction
    pub fn supply_distance(&self, unit: &Unit, geometry: &dyn GeometryService) -> u32 {
        let Some(location) = unit.location else {
            return UNLOCATED_DISTANCE;
        };
        self.nodes(unit.faction)
            .filter(|n| n.is_usable())
            .map(|n| geometry.hex_distance(location, n.location))
            .min()
            .unwrap_or(NO_NODE_DISTANCE)
    }

    /// What the unit draws this turn
    pub fn consumption(unit: &Unit, in_combat: bool, distance: u32) -> BTreeMap<SupplyType, f32> {
        let strength_factor = unit.state.strength_current as f32 / 1000.0;
        let mut distance_penalty = 1.0;
        if distance > 5 {
            distance_penalty += (distance - 5) as f32 * 0.1;
        }
        SupplyClass::classify(unit)
            .rates()
            .iter()
            .map(|&(kind, rate)| {
                let mut amount = rate * strength_factor * distance_penalty;
                if in_combat {
                    amount *= COMBAT_MULTIPLIER;
                }
                (kind, amount)
            })
            .collect()
    }

    /// What the network can hand a unit at `distance`
    pub fn availability(distance: u32) -> BTreeMap<SupplyType, f32> {
        let factor = (1.0 - distance as f32 * 0.08).max(0.1);
        [
            SupplyType::Ammunition,
            SupplyType::Fuel,
            SupplyType::Food,
            SupplyType::SpareParts,
        ]
        .into_iter()
        .map(|kind| (kind, kind.base_availability() * factor))
        .collect()
    }
}

impl SupplyService for LogisticsSystem {
    fn process_turn(
        &mut self,
        faction: Faction,
        units: &mut UnitTable,
        in_combat: &BTreeSet<UnitId>,
        geometry: &dyn GeometryService,
    ) -> SupplyTurnResult {
        let mut result = SupplyTurnResult::default();

        for id in units.ids_by_faction(faction) {
            let Some(unit) = units.get_mut(&id) else {
                continue;
            };
            if unit.is_destroyed() {
                continue;
            }

            let distance = self.supply_distance(unit, geometry);
            let needs = Self::consumption(unit, in_combat.contains(&id), distance);
            let available = Self::availability(distance);

            let mut supplied = true;
            for (kind, needed) in &needs {
                let on_hand = available.get(kind).copied().unwrap_or(0.0);
                let drawn = needed.min(on_hand);
                *result.total_consumed.entry(*kind).or_insert(0.0) += drawn;
                if drawn < needed * 0.75 {
                    supplied = false;
                }
            }

            if supplied {
                unit.state.supply_level = (unit.state.supply_level + 10.0).min(100.0);
                result.supplied.push(id.clone());
            } else {
                let total_available: f32 = available.values().sum();
                let total_needed: f32 = needs.values().sum();
                let shortage = (1.0 - total_available / total_needed.max(1.0)).clamp(0.0, 1.0);
                unit.state.supply_level = (unit.state.supply_level - shortage * 20.0).max(0.0);
                result.undersupplied.push(id.clone());
            }
            result
                .effects
                .insert(id, supply_effects(unit.state.supply_level));
        }

        tracing::debug!(
            faction = %faction,
            supplied = result.supplied.len(),
            undersupplied = result.undersupplied.len(),
            "supply turn processed"
        );
        self.undersupplied.insert(faction, result.undersupplied.clone());
        result
    }
}
