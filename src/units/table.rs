//! Unit table: every unit of both factions, destroyed ones included

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::airbase::Airbase;
use super::state::UnitStatus;
use super::unit::{Unit, UnitCategory};
use crate::core::types::{Faction, HexCoord, UnitId};

/// Per-faction tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTableStats {
    pub total: usize,
    pub effective: usize,
    pub destroyed: usize,
    pub retreating: usize,
}

/// Units keyed by id. Iteration follows insertion order so that phase
/// resolution stays deterministic for a given seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitTable {
    units: AHashMap<UnitId, Unit>,
    order: Vec<UnitId>,
    airbases: AHashMap<String, Airbase>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a unit. Returns the previous unit with the same id, if any.
    pub fn insert(&mut self, unit: Unit) -> Option<Unit> {
        let id = unit.id.clone();
        let previous = self.units.insert(id.clone(), unit);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn insert_airbase(&mut self, airbase: Airbase) {
        self.airbases.insert(airbase.id.clone(), airbase);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &UnitId) -> bool {
        self.units.contains_key(id)
    }

    pub fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn get_mut(&mut self, id: &UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    pub fn airbase(&self, id: &str) -> Option<&Airbase> {
        self.airbases.get(id)
    }

    pub fn airbase_mut(&mut self, id: &str) -> Option<&mut Airbase> {
        self.airbases.get_mut(id)
    }

    pub fn airbases(&self) -> impl Iterator<Item = &Airbase> {
        self.airbases.values()
    }

    /// All units in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.order.iter().filter_map(|id| self.units.get(id))
    }

    /// Ids in insertion order
    pub fn ids(&self) -> &[UnitId] {
        &self.order
    }

    pub fn by_faction(&self, faction: Faction) -> Vec<&Unit> {
        self.iter().filter(|u| u.faction == faction).collect()
    }

    pub fn ids_by_faction(&self, faction: Faction) -> Vec<UnitId> {
        self.iter()
            .filter(|u| u.faction == faction)
            .map(|u| u.id.clone())
            .collect()
    }

    pub fn by_category(&self, category: UnitCategory) -> Vec<&Unit> {
        self.iter().filter(|u| u.category == category).collect()
    }

    /// Combat-effective units of `faction` in `category`
    pub fn effective_of(&self, faction: Faction, category: UnitCategory) -> Vec<&Unit> {
        self.iter()
            .filter(|u| u.faction == faction && u.category == category && u.is_combat_effective())
            .collect()
    }

    pub fn combat_effective(&self, faction: Faction) -> Vec<&Unit> {
        self.iter()
            .filter(|u| u.faction == faction && u.is_combat_effective())
            .collect()
    }

    pub fn at_location(&self, location: HexCoord) -> Vec<&Unit> {
        self.iter().filter(|u| u.location == Some(location)).collect()
    }

    pub fn stats(&self, faction: Faction) -> UnitTableStats {
        let mut stats = UnitTableStats::default();
        for unit in self.iter().filter(|u| u.faction == faction) {
            stats.total += 1;
            if unit.is_combat_effective() {
                stats.effective += 1;
            }
            match unit.status {
                UnitStatus::Destroyed => stats.destroyed += 1,
                UnitStatus::Retreating => stats.retreating += 1,
                _ => {}
            }
        }
        stats
    }

    /// Apply `f` to every unit in insertion order
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Unit)) {
        for id in &self.order {
            if let Some(unit) = self.units.get_mut(id) {
                f(unit);
            }
        }
    }
}
