//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Scenario-assigned unit identifier (e.g. "IAF-SQN-1")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for combat reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportId(pub Uuid);

impl ReportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn counter (one turn = six hours of game time)
pub type Turn = u32;

/// The two sides of the conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    India,
    Pakistan,
}

/// Resolution order of factions inside every phase. The first entry moves first.
pub const FACTION_ORDER: [Faction; 2] = [Faction::India, Faction::Pakistan];

impl Faction {
    pub fn opponent(&self) -> Self {
        match self {
            Self::India => Self::Pakistan,
            Self::Pakistan => Self::India,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::India => "india",
            Self::Pakistan => "pakistan",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axial hex coordinate on the theater map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Distance in hexes (cube metric)
    pub fn distance(&self, other: &HexCoord) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + (dq + dr).abs() + dr.abs()) / 2) as u32
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_equality() {
        let a = UnitId::from("IAF-SQN-1");
        let b = UnitId::new("IAF-SQN-1");
        let c = UnitId::from("PAF-SQN-1");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unit_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UnitId::from("ARTY-1")).unwrap();
        assert_eq!(json, "\"ARTY-1\"");
    }

    #[test]
    fn test_report_ids_unique() {
        assert_ne!(ReportId::new(), ReportId::new());
    }

    #[test]
    fn test_faction_opponent() {
        assert_eq!(Faction::India.opponent(), Faction::Pakistan);
        assert_eq!(Faction::Pakistan.opponent(), Faction::India);
        assert_eq!(FACTION_ORDER[0], Faction::India);
    }

    #[test]
    fn test_hex_distance() {
        let origin = HexCoord::new(0, 0);
        assert_eq!(origin.distance(&HexCoord::new(0, 0)), 0);
        assert_eq!(origin.distance(&HexCoord::new(1, 0)), 1);
        assert_eq!(origin.distance(&HexCoord::new(2, -1)), 2);
        assert_eq!(origin.distance(&HexCoord::new(3, 3)), 6);
    }
}
