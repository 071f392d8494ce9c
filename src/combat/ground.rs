//! Ground combat between two units
//!
//! Both sides start from `Unit::combat_power`. Terrain, entrenchment,
//! posture, type matchup, support and weather then scale the two powers,
//! and the ratio drives casualties, cohesion loss and ground gained.

use serde::{Deserialize, Serialize};

use super::base::{determine_result, CombatRng};
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::{HexCoord, UnitId};
use crate::units::{Posture, Unit, UnitStatus};

/// Share of strength lost per engagement before intensity and ratio
const BASE_CASUALTY_RATE: f32 = 0.05;

/// Defensive multiplier of a terrain type
pub fn terrain_defense(terrain: &str) -> f32 {
    match terrain {
        "plains" => 1.0,
        "hills" => 1.4,
        "mountain" => 2.5,
        "forest" => 1.5,
        "urban" => 2.0,
        "desert" => 0.9,
        "marsh" => 1.2,
        _ => 1.0,
    }
}

/// How an attacking formation commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPosture {
    #[default]
    Assault,
    Probe,
    Exploitation,
}

impl AttackPosture {
    pub fn modifier(&self) -> f32 {
        match self {
            Self::Assault => 1.2,
            Self::Probe => 0.8,
            Self::Exploitation => 1.0,
        }
    }
}

/// Defender multiplier from the defending unit's standing posture.
/// A unit postured to attack counterattacks.
pub fn defense_posture_modifier(posture: Posture) -> f32 {
    match posture {
        Posture::Defend => 1.5,
        Posture::Delay => 1.2,
        Posture::Attack => 0.9,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundType {
    Armor,
    Mechanized,
    Mountain,
    Infantry,
}

impl GroundType {
    pub fn of(unit: &Unit) -> Self {
        let t = unit.unit_type.to_lowercase();
        if t.contains("armor") || t.contains("tank") {
            Self::Armor
        } else if t.contains("mech") {
            Self::Mechanized
        } else if t.contains("mountain") {
            Self::Mountain
        } else {
            Self::Infantry
        }
    }
}

/// Attacker multiplier for a type matchup. Unlisted pairs are even.
pub fn type_matchup(attacker: GroundType, defender: GroundType) -> f32 {
    use GroundType::*;
    match (attacker, defender) {
        (Armor, Infantry) => 1.4,
        (Armor, Mechanized) => 1.2,
        (Mechanized, Armor) => 0.8,
        (Mechanized, Infantry) => 1.2,
        (Infantry, Armor) => 0.5,
        (Infantry, Mechanized) => 0.7,
        (Mountain, Infantry) => 1.3,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSupport {
    pub artillery: bool,
    pub air: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitySize {
    Small,
    Medium,
    Large,
}

impl CitySize {
    pub fn defense(&self) -> f32 {
        match self {
            Self::Small => 1.5,
            Self::Medium => 2.0,
            Self::Large => 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundEngagement {
    pub attacker_id: UnitId,
    pub defender_id: UnitId,
    pub location: Option<HexCoord>,
    pub attacker_posture: AttackPosture,
    pub terrain: String,
    pub river_crossing: bool,
    /// Fighting in a built-up area
    pub urban: bool,
    /// Explicit urban defense multiplier (city size), replacing the terrain table
    pub urban_defense: Option<f32>,
    pub attacker_support: GroundSupport,
    pub defender_support: GroundSupport,
}

impl GroundEngagement {
    pub fn new(attacker_id: UnitId, defender_id: UnitId, terrain: impl Into<String>) -> Self {
        Self {
            attacker_id,
            defender_id,
            location: None,
            attacker_posture: AttackPosture::default(),
            terrain: terrain.into(),
            river_crossing: false,
            urban: false,
            urban_defense: None,
            attacker_support: GroundSupport::default(),
            defender_support: GroundSupport::default(),
        }
    }

    /// Terrain multiplier on defender power
    pub fn terrain_modifier(&self) -> f32 {
        let mut modifier = terrain_defense(&self.terrain);
        if self.urban {
            modifier = self.urban_defense.unwrap_or(modifier.max(2.0));
        }
        if self.river_crossing {
            modifier *= 1.5;
        }
        modifier
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundCombatResult {
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
    pub attacker_org_loss: f32,
    pub defender_org_loss: f32,
    /// 0-2
    pub ground_gained_hexes: u32,
    pub defender_retreated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakthrough {
    pub achieved: bool,
    pub exploitation_hexes: u32,
}

/// Planning aid: would this ratio break a defense `depth` lines deep?
pub fn calculate_breakthrough(attacker_power: f32, defender_power: f32, depth: u32) -> Breakthrough {
    let ratio = attacker_power / defender_power.max(1.0);
    let exploitation_hexes = if ratio >= 3.0 && depth <= 1 {
        3
    } else if ratio >= 2.0 && depth <= 1 {
        2
    } else if ratio >= 2.5 && depth <= 2 {
        1
    } else {
        0
    };
    Breakthrough {
        achieved: exploitation_hexes > 0,
        exploitation_hexes,
    }
}

#[derive(Debug, Clone)]
pub struct GroundResolver {
    rng: CombatRng,
}

impl GroundResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
        }
    }

    /// Fully modified (attacker, defender) powers
    pub fn modified_powers(
        engagement: &GroundEngagement,
        attacker: &Unit,
        defender: &Unit,
        weather: f32,
    ) -> (f32, f32) {
        let mut attack = attacker.combat_power(true);
        let mut defense = defender.combat_power(false);

        defense *= engagement.terrain_modifier();
        defense *= 1.0 + f32::from(defender.state.dug_in) * 0.15;

        attack *= engagement.attacker_posture.modifier();
        defense *= defense_posture_modifier(defender.posture);

        attack *= type_matchup(GroundType::of(attacker), GroundType::of(defender));

        if engagement.attacker_support.artillery {
            attack *= 1.15;
        }
        if engagement.attacker_support.air {
            attack *= 1.10;
        }
        if engagement.defender_support.artillery {
            defense *= 1.10;
        }

        attack *= weather;
        (attack, defense)
    }

    pub fn resolve_engagement(
        &mut self,
        engagement: &GroundEngagement,
        attacker: &Unit,
        defender: &Unit,
        weather: f32,
    ) -> (CombatReport, GroundCombatResult) {
        let (attack, defense) = Self::modified_powers(engagement, attacker, defender, weather);
        self.resolve_powers(
            engagement,
            attack,
            defense,
            attacker.state.strength_current,
            defender.state.strength_current,
        )
    }

    /// Resolve from already-modified powers
    pub fn resolve_powers(
        &mut self,
        engagement: &GroundEngagement,
        attacker_power: f32,
        defender_power: f32,
        attacker_strength: u32,
        defender_strength: u32,
    ) -> (CombatReport, GroundCombatResult) {
        let ratio = attacker_power / defender_power.max(1.0);
        let intensity = ((attacker_power + defender_power) / 100.0).min(2.0);

        let attacker_casualties = (attacker_strength as f32
            * BASE_CASUALTY_RATE
            * intensity
            * (1.0 / ratio.max(0.5))
            * self.rng.roll(1.0, 0.3)) as u32;
        let defender_casualties = (defender_strength as f32
            * BASE_CASUALTY_RATE
            * intensity
            * ratio
            * self.rng.roll(1.0, 0.3)) as u32;

        let attacker_org_loss = self.rng.roll(5.0 + 10.0 / ratio.max(0.5), 0.3);
        let defender_org_loss = self.rng.roll(5.0 + 10.0 * ratio, 0.3);

        let result = determine_result(attacker_power, defender_power);
        let (ground_gained_hexes, defender_retreated) = match result {
            CombatResult::DecisiveVictory => (2, true),
            CombatResult::Victory => (1, true),
            CombatResult::Marginal => (u32::from(self.rng.hit_check(0.5)), false),
            _ => (0, false),
        };

        let outcome = GroundCombatResult {
            attacker_casualties,
            defender_casualties,
            attacker_org_loss,
            defender_org_loss,
            ground_gained_hexes,
            defender_retreated,
        };

        let report = CombatReport::new(
            engagement.attacker_id.clone(),
            engagement.defender_id.clone(),
            ReportPhase::Ground,
            result,
        )
        .attacker_loss("casualties", attacker_casualties)
        .defender_loss("casualties", defender_casualties)
        .attacker_loss("organization", attacker_org_loss)
        .defender_loss("organization", defender_org_loss)
        .with_location(engagement.location)
        .note(format!("Combat ratio: {:.2}:1", ratio))
        .note(format!(
            "Terrain: {} (x{:.1})",
            engagement.terrain,
            engagement.terrain_modifier()
        ))
        .note(format!("Ground gained: {} hexes", ground_gained_hexes));

        (report, outcome)
    }

    /// Built-up area fighting: assault against a prepared defense where
    /// city size sets the terrain multiplier
    pub fn resolve_urban_combat(
        &mut self,
        attacker: &Unit,
        defender: &Unit,
        city: CitySize,
    ) -> (CombatReport, GroundCombatResult) {
        let mut engagement = GroundEngagement::new(attacker.id.clone(), defender.id.clone(), "urban");
        engagement.location = defender.location;
        engagement.urban = true;
        engagement.urban_defense = Some(city.defense());
        self.resolve_engagement(&engagement, attacker, defender, 1.0)
    }

    pub fn apply_combat_results(attacker: &mut Unit, defender: &mut Unit, result: &GroundCombatResult) {
        attacker.take_losses(result.attacker_casualties, result.attacker_org_loss);
        defender.take_losses(result.defender_casualties, result.defender_org_loss);
        if result.defender_retreated && !defender.is_destroyed() {
            defender.status = UnitStatus::Retreating;
        }
    }
}
