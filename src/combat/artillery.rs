//! Tube and rocket artillery fire missions
//!
//! Rocket artillery fires area salvos: a mission of N rounds counts as
//! `N * salvo * 0.3` effective rounds. All effects derive linearly from
//! the accumulated base damage.

use serde::{Deserialize, Serialize};

use super::base::CombatRng;
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::{HexCoord, UnitId};
use crate::units::Unit;

/// Rounds in a standard counter-battery mission
pub const COUNTER_BATTERY_ROUNDS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMissionKind {
    #[default]
    Bombardment,
    Suppression,
    CounterBattery,
    Smoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtilleryClass {
    Tube,
    SelfPropelled,
    Mlrs,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtilleryStats {
    pub class: ArtilleryClass,
    pub range_km: f32,
    pub accuracy: f32,
    pub damage: f32,
    /// Rockets per launcher salvo (MLRS only)
    pub salvo: u32,
}

impl ArtilleryStats {
    const fn new(class: ArtilleryClass, range_km: f32, accuracy: f32, damage: f32, salvo: u32) -> Self {
        Self {
            class,
            range_km,
            accuracy,
            damage,
            salvo,
        }
    }

    pub fn lookup(system: &str) -> Self {
        use ArtilleryClass::*;
        match system.to_lowercase().as_str() {
            "m777" => Self::new(Tube, 30.0, 75.0, 60.0, 0),
            "dhanush" => Self::new(Tube, 38.0, 70.0, 65.0, 0),
            "k9_vajra" => Self::new(SelfPropelled, 40.0, 75.0, 70.0, 0),
            "m109" => Self::new(SelfPropelled, 30.0, 70.0, 60.0, 0),
            "sh15" => Self::new(SelfPropelled, 53.0, 72.0, 65.0, 0),
            "pinaka" => Self::new(Mlrs, 75.0, 65.0, 85.0, 12),
            "smerch" => Self::new(Mlrs, 90.0, 60.0, 90.0, 12),
            "a100" => Self::new(Mlrs, 100.0, 60.0, 88.0, 10),
            _ => Self::new(Tube, 30.0, 65.0, 60.0, 0),
        }
    }

    pub fn is_mlrs(&self) -> bool {
        self.class == ArtilleryClass::Mlrs
    }

    /// Rounds that actually count toward hits
    pub fn effective_rounds(&self, rounds: u32) -> u32 {
        if self.is_mlrs() {
            (rounds as f32 * self.salvo as f32 * 0.3) as u32
        } else {
            rounds
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtilleryTarget {
    InfantryInOpen,
    InfantryDugIn,
    Mechanized,
    Armor,
    Artillery,
    Logistics,
    Fortification,
    Airbase,
}

impl ArtilleryTarget {
    /// Classify a unit; no unit means a fixed fortification
    pub fn classify(target: Option<&Unit>) -> Self {
        let Some(target) = target else {
            return Self::Fortification;
        };
        let t = target.unit_type.to_lowercase();
        if t.contains("armor") || t.contains("tank") {
            Self::Armor
        } else if t.contains("mech") {
            Self::Mechanized
        } else if t.contains("artillery") {
            Self::Artillery
        } else if target.state.dug_in >= 2 {
            Self::InfantryDugIn
        } else {
            Self::InfantryInOpen
        }
    }

    pub fn vulnerability(&self) -> f32 {
        match self {
            Self::InfantryInOpen => 1.5,
            Self::InfantryDugIn => 0.6,
            Self::Mechanized => 0.8,
            Self::Armor => 0.4,
            Self::Artillery => 1.2,
            Self::Logistics => 1.3,
            Self::Fortification => 0.5,
            Self::Airbase => 0.7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InfantryInOpen => "infantry_in_open",
            Self::InfantryDugIn => "infantry_dug_in",
            Self::Mechanized => "mechanized",
            Self::Armor => "armor",
            Self::Artillery => "artillery",
            Self::Logistics => "logistics",
            Self::Fortification => "fortification",
            Self::Airbase => "airbase",
        }
    }

    pub fn is_armored(&self) -> bool {
        matches!(self, Self::Mechanized | Self::Armor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FireMission {
    pub battery_id: UnitId,
    pub target_id: UnitId,
    pub target_location: Option<HexCoord>,
    pub rounds: u32,
    pub kind: FireMissionKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArtilleryEffect {
    pub casualties: u32,
    pub equipment_destroyed: u32,
    /// 0-80
    pub suppression: f32,
    pub fortification_damage: f32,
}

/// Area-denial footprint of sustained fire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuppressionZone {
    pub radius_hexes: u32,
    pub suppression_level: f32,
    pub duration_turns: u32,
    /// Movement multiplier inside the zone
    pub movement_penalty: f32,
}

pub fn suppression_zone(battery_count: u32, system: &str, duration_turns: u32) -> SuppressionZone {
    let (radius_hexes, level) = if ArtilleryStats::lookup(system).is_mlrs() {
        (2, 60.0)
    } else {
        (1, 40.0)
    };
    let scaled = level * (battery_count as f32 / 4.0).min(2.0);
    SuppressionZone {
        radius_hexes,
        suppression_level: scaled.min(80.0),
        duration_turns,
        movement_penalty: 0.5,
    }
}

/// Synthetic accuracy (0-1) of a counter-battery mission
pub fn counter_battery_effectiveness(has_radar: bool, response_minutes: u32, target_mobile: bool) -> f32 {
    let mut effectiveness: f32 = 0.3;
    if has_radar {
        effectiveness += 0.3;
    }
    if response_minutes > 10 {
        effectiveness *= 0.5;
    } else if response_minutes > 5 {
        effectiveness *= 0.7;
    }
    if target_mobile {
        effectiveness *= 0.6;
    }
    effectiveness
}

#[derive(Debug, Clone)]
pub struct ArtilleryResolver {
    rng: CombatRng,
}

impl ArtilleryResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
        }
    }

    pub fn resolve_fire_mission(
        &mut self,
        mission: &FireMission,
        stats: &ArtilleryStats,
        target: Option<&Unit>,
        terrain_concealment: f32,
        weather: f32,
    ) -> (CombatReport, ArtilleryEffect) {
        let concealment_mod = 1.0 - terrain_concealment / 200.0;
        let accuracy = stats.accuracy * weather;
        let target_class = ArtilleryTarget::classify(target);
        let vulnerability = target_class.vulnerability();

        let hit_chance = accuracy / 100.0 * concealment_mod;
        let hits = (0..stats.effective_rounds(mission.rounds))
            .filter(|_| self.rng.hit_check(hit_chance))
            .count() as u32;

        let base_damage = hits as f32 * stats.damage * vulnerability;

        let casualties = match target {
            Some(unit) => {
                let rate = base_damage / 1000.0 * self.rng.roll(1.0, 0.3);
                (unit.state.strength_current as f32 * rate) as u32
            }
            None => 0,
        };

        let suppression = (base_damage * 0.5).min(80.0);
        let equipment_destroyed = if target_class.is_armored() {
            (hits as f32 * 0.1 * vulnerability) as u32
        } else {
            0
        };
        let fortification_damage = if mission.kind == FireMissionKind::Bombardment
            && target_class == ArtilleryTarget::Fortification
        {
            base_damage * 0.3
        } else {
            0.0
        };

        let effect = ArtilleryEffect {
            casualties,
            equipment_destroyed,
            suppression,
            fortification_damage,
        };

        let result = CombatResult::from_effectiveness(base_damage / 100.0, hits > 0);
        let report = CombatReport::new(
            mission.battery_id.clone(),
            mission.target_id.clone(),
            ReportPhase::Artillery,
            result,
        )
        .attacker_loss("rounds_expended", mission.rounds)
        .defender_loss("casualties", casualties)
        .defender_loss("equipment", equipment_destroyed)
        .with_location(mission.target_location)
        .note(format!("Rounds fired: {}, Hits: {}", mission.rounds, hits))
        .note(format!("Casualties: {}, Suppression: {:.0}%", casualties, suppression))
        .note(format!("Target type: {}", target_class.as_str()));

        (report, effect)
    }

    /// Counter-battery fire, run as a standard fire mission with a
    /// synthetic accuracy
    pub fn resolve_counter_battery(
        &mut self,
        firing_battery_id: &UnitId,
        target_battery: &Unit,
        has_radar: bool,
        response_minutes: u32,
        target_mobile: bool,
    ) -> (CombatReport, ArtilleryEffect) {
        let effectiveness = counter_battery_effectiveness(has_radar, response_minutes, target_mobile);
        let stats = ArtilleryStats {
            accuracy: effectiveness * 100.0,
            damage: 70.0,
            ..ArtilleryStats::lookup("")
        };
        let mission = FireMission {
            battery_id: firing_battery_id.clone(),
            target_id: target_battery.id.clone(),
            target_location: target_battery.location,
            rounds: COUNTER_BATTERY_ROUNDS,
            kind: FireMissionKind::CounterBattery,
        };
        self.resolve_fire_mission(&mission, &stats, Some(target_battery), 30.0, 1.0)
    }

    pub fn apply_effects(target: &mut Unit, effect: &ArtilleryEffect) {
        target.take_losses(effect.casualties, 0.0);
        target.apply_suppression(effect.suppression);
    }
}
