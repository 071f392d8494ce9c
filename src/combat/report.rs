//! Combat report: the universal output of every resolver
//!
//! Field names, phase tags and outcome strings are a wire format read by
//! replay, analytics and the victory-point calculator. Keep them stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::types::{Faction, HexCoord, ReportId, Turn, UnitId};

/// Six-tier outcome classification, declared worst to best so that the
/// derived ordering ranks outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatResult {
    DecisiveDefeat,
    Defeat,
    Stalemate,
    Marginal,
    Victory,
    DecisiveVictory,
}

impl CombatResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DecisiveVictory => "decisive_victory",
            Self::Victory => "victory",
            Self::Marginal => "marginal",
            Self::Stalemate => "stalemate",
            Self::Defeat => "defeat",
            Self::DecisiveDefeat => "decisive_defeat",
        }
    }

    /// 0 (decisive defeat) through 5 (decisive victory)
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Bucket an effectiveness ratio with the 1.5 / 1.0 / 0.5 thresholds
    /// shared by the strike-style resolvers. Below 0.5, any hit is a
    /// stalemate and no hit is a defeat.
    pub fn from_effectiveness(effectiveness: f32, any_hits: bool) -> Self {
        if effectiveness >= 1.5 {
            Self::DecisiveVictory
        } else if effectiveness >= 1.0 {
            Self::Victory
        } else if effectiveness >= 0.5 {
            Self::Marginal
        } else if any_hits {
            Self::Stalemate
        } else {
            Self::Defeat
        }
    }

    /// Bucket a cumulative percentage damage against an air-defense site
    /// (80 / 50 / 25). Anything less is a stalemate.
    pub fn from_sam_damage(damage: f32) -> Self {
        if damage >= 80.0 {
            Self::DecisiveVictory
        } else if damage >= 50.0 {
            Self::Victory
        } else if damage >= 25.0 {
            Self::Marginal
        } else {
            Self::Stalemate
        }
    }
}

impl fmt::Display for CombatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase tag on a report. External consumers match these by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPhase {
    Missiles,
    Ew,
    Cyber,
    Sigint,
    Air,
    AirToAir,
    AirCap,
    AirStrike,
    AirSead,
    AirCas,
    Sead,
    Drone,
    DroneIsr,
    DroneSead,
    Artillery,
    Helicopter,
    HelicopterAirAssault,
    Ground,
    SpecialForces,
    Logistics,
}

impl ReportPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missiles => "missiles",
            Self::Ew => "ew",
            Self::Cyber => "cyber",
            Self::Sigint => "sigint",
            Self::Air => "air",
            Self::AirToAir => "air_to_air",
            Self::AirCap => "air_cap",
            Self::AirStrike => "air_strike",
            Self::AirSead => "air_sead",
            Self::AirCas => "air_cas",
            Self::Sead => "sead",
            Self::Drone => "drone",
            Self::DroneIsr => "drone_isr",
            Self::DroneSead => "drone_sead",
            Self::Artillery => "artillery",
            Self::Helicopter => "helicopter",
            Self::HelicopterAirAssault => "helicopter_air_assault",
            Self::Ground => "ground",
            Self::SpecialForces => "special_forces",
            Self::Logistics => "logistics",
        }
    }

    /// Suppression-of-air-defense report from any domain
    pub fn is_sead(&self) -> bool {
        self.as_str().contains("sead")
    }

    pub fn is_special_forces(&self) -> bool {
        matches!(self, Self::SpecialForces)
    }

    /// Reports that carry no combat outcome worth victory points
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::AirCap | Self::Logistics)
    }
}

impl fmt::Display for ReportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form numeric loss fields ("aircraft", "casualties", "damage", ...)
pub type LossMap = BTreeMap<String, f32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub id: ReportId,
    pub attacker_id: UnitId,
    pub defender_id: UnitId,
    /// Stamped by the orchestrator
    pub turn: Turn,
    pub phase: ReportPhase,
    pub result: CombatResult,
    pub attacker_losses: LossMap,
    pub defender_losses: LossMap,
    pub location: Option<HexCoord>,
    /// First entry is the headline
    pub notes: Vec<String>,
    /// Owning faction when the attacker is not a unit in the table
    pub faction: Option<Faction>,
}

impl CombatReport {
    pub fn new(
        attacker_id: impl Into<UnitId>,
        defender_id: impl Into<UnitId>,
        phase: ReportPhase,
        result: CombatResult,
    ) -> Self {
        Self {
            id: ReportId::new(),
            attacker_id: attacker_id.into(),
            defender_id: defender_id.into(),
            turn: 0,
            phase,
            result,
            attacker_losses: LossMap::new(),
            defender_losses: LossMap::new(),
            location: None,
            notes: Vec::new(),
            faction: None,
        }
    }

    pub fn attacker_loss(mut self, key: &str, value: impl Into<f64>) -> Self {
        self.attacker_losses.insert(key.to_string(), value.into() as f32);
        self
    }

    pub fn defender_loss(mut self, key: &str, value: impl Into<f64>) -> Self {
        self.defender_losses.insert(key.to_string(), value.into() as f32);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_location(mut self, location: Option<HexCoord>) -> Self {
        self.location = location;
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn headline(&self) -> Option<&str> {
        self.notes.first().map(String::as_str)
    }

    /// Loss value by key, zero when absent
    pub fn attacker_lost(&self, key: &str) -> f32 {
        self.attacker_losses.get(key).copied().unwrap_or(0.0)
    }

    pub fn defender_lost(&self, key: &str) -> f32 {
        self.defender_losses.get(key).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ordering() {
        assert!(CombatResult::DecisiveVictory > CombatResult::Victory);
        assert!(CombatResult::Victory > CombatResult::Marginal);
        assert!(CombatResult::Stalemate > CombatResult::Defeat);
        assert!(CombatResult::Defeat > CombatResult::DecisiveDefeat);
        assert_eq!(CombatResult::DecisiveVictory.rank(), 5);
    }

    #[test]
    fn test_result_wire_strings() {
        assert_eq!(CombatResult::DecisiveVictory.as_str(), "decisive_victory");
        let json = serde_json::to_string(&CombatResult::DecisiveDefeat).unwrap();
        assert_eq!(json, "\"decisive_defeat\"");
    }

    #[test]
    fn test_phase_strings_match_serde() {
        for phase in [
            ReportPhase::AirToAir,
            ReportPhase::DroneIsr,
            ReportPhase::HelicopterAirAssault,
            ReportPhase::SpecialForces,
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.as_str()));
        }
    }

    #[test]
    fn test_sead_prefix_detection() {
        assert!(ReportPhase::AirSead.is_sead());
        assert!(ReportPhase::DroneSead.is_sead());
        assert!(ReportPhase::Sead.is_sead());
        assert!(!ReportPhase::AirStrike.is_sead());
    }

    #[test]
    fn test_effectiveness_buckets() {
        assert_eq!(CombatResult::from_effectiveness(1.6, true), CombatResult::DecisiveVictory);
        assert_eq!(CombatResult::from_effectiveness(1.0, true), CombatResult::Victory);
        assert_eq!(CombatResult::from_effectiveness(0.5, true), CombatResult::Marginal);
        assert_eq!(CombatResult::from_effectiveness(0.2, true), CombatResult::Stalemate);
        assert_eq!(CombatResult::from_effectiveness(0.0, false), CombatResult::Defeat);
    }

    #[test]
    fn test_builder_and_headline() {
        let report = CombatReport::new("A", "B", ReportPhase::Ground, CombatResult::Victory)
            .attacker_loss("casualties", 12u32)
            .defender_loss("casualties", 30u32)
            .note("Combat ratio: 2.0:1")
            .note("Terrain: plains");
        assert_eq!(report.headline(), Some("Combat ratio: 2.0:1"));
        assert_eq!(report.attacker_lost("casualties"), 12.0);
        assert_eq!(report.defender_lost("equipment"), 0.0);
    }
}
