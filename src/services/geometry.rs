//! Hex map geometry: terrain, concealment and ambient weather
//!
//! The combat core only reads this collaborator. Weather modifiers are
//! recomputed from the base table whenever weather or time of day changes,
//! so night penalties never compound across turns.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::HexCoord;

/// Concealment assumed for coordinates off the map
pub const DEFAULT_CONCEALMENT: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Plains,
    Hills,
    Mountain,
    Desert,
    Urban,
    Forest,
    Marsh,
    River,
}

impl Terrain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Hills => "hills",
            Self::Mountain => "mountain",
            Self::Desert => "desert",
            Self::Urban => "urban",
            Self::Forest => "forest",
            Self::Marsh => "marsh",
            Self::River => "river",
        }
    }

    /// Infantry movement cost. Rivers are impassable without a crossing.
    pub fn movement_cost(&self) -> f32 {
        match self {
            Self::Plains => 1.0,
            Self::Hills => 2.0,
            Self::Mountain => 4.0,
            Self::Desert => 1.5,
            Self::Urban => 2.0,
            Self::Forest => 3.0,
            Self::Marsh => 5.0,
            Self::River => f32::INFINITY,
        }
    }

    pub fn defense_bonus(&self) -> f32 {
        match self {
            Self::Plains => 1.0,
            Self::Hills => 1.5,
            Self::Mountain => 2.5,
            Self::Desert => 0.8,
            Self::Urban => 2.0,
            Self::Forest => 1.6,
            Self::Marsh => 1.3,
            Self::River => 0.5,
        }
    }

    /// Base concealment, 0-100
    pub fn concealment(&self) -> f32 {
        match self {
            Self::Plains => 30.0,
            Self::Hills => 60.0,
            Self::Mountain => 80.0,
            Self::Desert => 20.0,
            Self::Urban => 70.0,
            Self::Forest => 85.0,
            Self::Marsh => 50.0,
            Self::River => 0.0,
        }
    }

    /// Sensor detection multiplier for units in this terrain
    pub fn detection_modifier(&self) -> f32 {
        match self {
            Self::Plains => 1.0,
            Self::Hills => 0.7,
            Self::Mountain => 0.5,
            Self::Forest => 0.4,
            Self::Urban => 0.6,
            Self::Desert => 1.1,
            Self::Marsh => 0.7,
            Self::River => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Storm,
    Fog,
    Sandstorm,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Storm => "storm",
            Self::Fog => "fog",
            Self::Sandstorm => "sandstorm",
        }
    }

    /// Daylight modifiers for this weather
    pub fn modifiers(&self) -> WeatherModifiers {
        let (visibility, air_ops, movement) = match self {
            Self::Clear => (1.0, 1.0, 1.0),
            Self::Cloudy => (0.8, 0.9, 1.0),
            Self::Rain => (0.5, 0.5, 0.8),
            Self::Storm => (0.2, 0.1, 0.5),
            Self::Fog => (0.1, 0.2, 0.9),
            Self::Sandstorm => (0.1, 0.1, 0.6),
        };
        WeatherModifiers {
            visibility,
            air_ops,
            movement,
        }
    }

    /// Extra concealment granted by the weather
    fn concealment_bonus(&self) -> f32 {
        match self {
            Self::Fog | Self::Storm | Self::Sandstorm => 30.0,
            Self::Rain => 15.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherModifiers {
    pub visibility: f32,
    pub air_ops: f32,
    pub movement: f32,
}

impl Default for WeatherModifiers {
    fn default() -> Self {
        Weather::Clear.modifiers()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexCell {
    pub coord: HexCoord,
    #[serde(default)]
    pub terrain: Terrain,
    /// 0-3
    #[serde(default)]
    pub fortification: u8,
    #[serde(default)]
    pub elevation_m: i32,
    /// City, airbase or other named location
    #[serde(default)]
    pub location_id: Option<String>,
}

impl HexCell {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            terrain,
            fortification: 0,
            elevation_m: 0,
            location_id: None,
        }
    }

    pub fn with_fortification(mut self, level: u8) -> Self {
        self.fortification = level.min(3);
        self
    }
}

/// Read-only view of the theater map
pub trait GeometryService {
    fn cell(&self, at: HexCoord) -> Option<&HexCell>;

    /// Current weather modifiers (night already folded in)
    fn weather(&self) -> WeatherModifiers;

    /// Concealment at a coordinate, 0-100
    fn concealment(&self, at: HexCoord) -> f32;

    fn terrain_at(&self, at: HexCoord) -> Option<Terrain> {
        self.cell(at).map(|c| c.terrain)
    }

    /// Terrain defense scaled by fortification
    fn defense_modifier(&self, at: HexCoord) -> f32 {
        self.cell(at).map_or(1.0, |c| {
            c.terrain.defense_bonus() * (1.0 + f32::from(c.fortification) * 0.15)
        })
    }

    fn hex_distance(&self, a: HexCoord, b: HexCoord) -> u32 {
        a.distance(&b)
    }
}

/// In-memory hex map
#[derive(Debug, Clone, Default)]
pub struct HexMap {
    cells: AHashMap<HexCoord, HexCell>,
    weather: Weather,
    is_night: bool,
    modifiers: WeatherModifiers,
}

impl HexMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: impl IntoIterator<Item = HexCell>) -> Self {
        let mut map = Self::new();
        for cell in cells {
            map.insert(cell);
        }
        map
    }

    pub fn insert(&mut self, cell: HexCell) {
        self.cells.insert(cell.coord, cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn current_weather(&self) -> Weather {
        self.weather
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
        self.refresh_modifiers();
    }

    pub fn set_night(&mut self, is_night: bool) {
        self.is_night = is_night;
        self.refresh_modifiers();
    }

    fn refresh_modifiers(&mut self) {
        let mut modifiers = self.weather.modifiers();
        if self.is_night {
            modifiers.visibility *= 0.3;
            modifiers.air_ops *= 0.7;
        }
        self.modifiers = modifiers;
    }

    /// Cells within `radius` hexes of `center`
    pub fn cells_within(&self, center: HexCoord, radius: u32) -> Vec<&HexCell> {
        let mut cells: Vec<&HexCell> = self
            .cells
            .values()
            .filter(|c| c.coord.distance(&center) <= radius)
            .collect();
        cells.sort_by_key(|c| (c.coord.q, c.coord.r));
        cells
    }
}

impl GeometryService for HexMap {
    fn cell(&self, at: HexCoord) -> Option<&HexCell> {
        self.cells.get(&at)
    }

    fn weather(&self) -> WeatherModifiers {
        self.modifiers
    }

    fn concealment(&self, at: HexCoord) -> f32 {
        let Some(cell) = self.cells.get(&at) else {
            return DEFAULT_CONCEALMENT;
        };
        let mut concealment = cell.terrain.concealment() + self.weather.concealment_bonus();
        if self.is_night {
            concealment += 25.0;
        }
        concealment.min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_does_not_compound() {
        let mut map = HexMap::new();
        map.set_weather(Weather::Rain);
        map.set_night(true);
        map.set_night(true);
        let weather = map.weather();
        assert!((weather.visibility - 0.15).abs() < 1e-6);
        assert!((weather.air_ops - 0.35).abs() < 1e-6);

        map.set_night(false);
        assert_eq!(map.weather(), Weather::Rain.modifiers());
    }

    #[test]
    fn test_concealment_stacks_and_caps() {
        let at = HexCoord::new(1, 1);
        let mut map = HexMap::from_cells([HexCell::new(at, Terrain::Forest)]);
        assert_eq!(map.concealment(at), 85.0);
        map.set_weather(Weather::Fog);
        map.set_night(true);
        assert_eq!(map.concealment(at), 100.0);
        assert_eq!(map.concealment(HexCoord::new(9, 9)), DEFAULT_CONCEALMENT);
    }

    #[test]
    fn test_defense_modifier_with_fortification() {
        let at = HexCoord::new(0, 0);
        let map = HexMap::from_cells([HexCell::new(at, Terrain::Hills).with_fortification(2)]);
        assert!((map.defense_modifier(at) - 1.95).abs() < 1e-5);
        assert_eq!(map.defense_modifier(HexCoord::new(5, 5)), 1.0);
    }

    #[test]
    fn test_cells_within_radius() {
        let map = HexMap::from_cells([
            HexCell::new(HexCoord::new(0, 0), Terrain::Plains),
            HexCell::new(HexCoord::new(1, 0), Terrain::Plains),
            HexCell::new(HexCoord::new(3, 0), Terrain::Plains),
        ]);
        assert_eq!(map.cells_within(HexCoord::new(0, 0), 1).len(), 2);
    }
}
