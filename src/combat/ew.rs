//! Electronic warfare: jamming, GPS denial, cyber attack and SIGINT
//!
//! Nothing here touches unit state. Resolvers return an `EwEffect` which
//! the orchestrator folds into the turn-scoped EW environment.

use serde::{Deserialize, Serialize};

use super::base::CombatRng;
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::UnitId;
use crate::units::{Unit, UnitCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EwMissionKind {
    #[default]
    JamRadar,
    JamComms,
    GpsDenial,
    Cyber,
    Sigint,
}

impl EwMissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JamRadar => "jam_radar",
            Self::JamComms => "jam_comms",
            Self::GpsDenial => "gps_denial",
            Self::Cyber => "cyber",
            Self::Sigint => "sigint",
        }
    }

    pub fn is_jamming(&self) -> bool {
        matches!(self, Self::JamRadar | Self::JamComms | Self::GpsDenial)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EwMission {
    pub unit_id: UnitId,
    pub kind: EwMissionKind,
    pub target_id: Option<UnitId>,
}

/// Frequency bands an emitter can attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spectrum {
    pub radar: bool,
    pub comms: bool,
    pub gps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EwSystem {
    pub power: f32,
    pub range_km: f32,
    pub spectrum: Spectrum,
}

impl EwSystem {
    const fn new(power: f32, range_km: f32, radar: bool, comms: bool, gps: bool) -> Self {
        Self {
            power,
            range_km,
            spectrum: Spectrum { radar, comms, gps },
        }
    }

    /// Emitter characteristics by platform. The type tag is matched by
    /// substring so "ea18g_growler" finds the growler entry.
    pub fn lookup(unit_type: &str) -> Self {
        let t = unit_type.to_lowercase();
        if t.contains("growler") {
            Self::new(90.0, 150.0, true, true, false)
        } else if t.contains("kj500") {
            Self::new(85.0, 200.0, true, false, false)
        } else if t.contains("krasukha") {
            Self::new(85.0, 300.0, true, false, true)
        } else if t.contains("samyukta") {
            Self::new(70.0, 150.0, true, true, false)
        } else if t.contains("shortstop") {
            Self::new(50.0, 30.0, false, true, false)
        } else {
            Self::new(70.0, 100.0, true, false, false)
        }
    }
}

/// Susceptibility of a unit to jamming
pub fn ew_vulnerability(unit: &Unit) -> f32 {
    let t = unit.unit_type.to_lowercase();
    if t.contains("awacs") || t.contains("aew") {
        0.6
    } else if t.contains("sam") || t.contains("air_defense") || unit.category == UnitCategory::AirDefense {
        0.9
    } else if t.contains("aircraft") || unit.category == UnitCategory::Aircraft {
        0.8
    } else if t.contains("artillery") {
        1.0
    } else {
        0.7
    }
}

/// What SIGINT pulled out of the enemy's traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigintIntel {
    pub unit_locations: bool,
    pub order_of_battle: bool,
    pub intentions: bool,
    pub supply_status: bool,
}

impl SigintIntel {
    /// Weighted score: locations 1, order of battle 2, intentions 3, supply 1
    pub fn value(&self) -> u32 {
        u32::from(self.unit_locations)
            + 2 * u32::from(self.order_of_battle)
            + 3 * u32::from(self.intentions)
            + u32::from(self.supply_status)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EwEffect {
    /// 0-1
    pub radar_degradation: f32,
    /// 0-1
    pub comms_degradation: f32,
    /// 0-1
    pub gps_degradation: f32,
    /// 0-100
    pub cyber_damage: f32,
    pub intel: Option<SigintIntel>,
    pub affected_units: Vec<UnitId>,
}

/// Cyber damage range per target system
fn cyber_damage_range(target_system: &str) -> (f32, f32) {
    match target_system {
        "c2" => (30.0, 60.0),
        "air_defense" => (20.0, 50.0),
        "logistics" => (25.0, 55.0),
        "comms" => (35.0, 65.0),
        _ => (20.0, 40.0),
    }
}

/// Chance a cyber attack gets through
pub fn cyber_success_chance(sophistication: f32, cyber_defense: f32) -> f32 {
    sophistication / 100.0 * (1.0 - cyber_defense / 200.0)
}

/// Base SIGINT intercept chance before the per-category scaling
pub fn sigint_intercept_chance(capability: f32, comms_activity: f32, comsec: f32) -> f32 {
    capability / 100.0 * (comms_activity / 100.0) * (1.0 - comsec / 200.0)
}

#[derive(Debug, Clone)]
pub struct EwResolver {
    rng: CombatRng,
}

impl EwResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
        }
    }

    /// Radar/comms jamming and GPS denial against a set of enemy units
    pub fn resolve_jamming(
        &mut self,
        mission: &EwMission,
        system: &EwSystem,
        targets: &[&Unit],
        target_eccm: f32,
    ) -> (CombatReport, EwEffect) {
        let effective_power = system.power * (1.0 - target_eccm / 200.0);
        let jamming = matches!(mission.kind, EwMissionKind::JamRadar | EwMissionKind::JamComms);
        let mut effect = EwEffect::default();

        if system.spectrum.radar && jamming {
            let base = effective_power / 100.0;
            effect.radar_degradation = (base * self.rng.roll(1.0, 0.2)).min(0.8);
        }
        if system.spectrum.comms && jamming {
            let base = effective_power / 100.0 * 0.8;
            effect.comms_degradation = (base * self.rng.roll(1.0, 0.2)).min(0.7);
        }
        if system.spectrum.gps || mission.kind == EwMissionKind::GpsDenial {
            let base = effective_power / 100.0 * 0.9;
            effect.gps_degradation = (base * self.rng.roll(1.0, 0.15)).min(0.9);
        }

        for unit in targets {
            if self.rng.hit_check(effective_power / 100.0 * ew_vulnerability(unit)) {
                effect.affected_units.push(unit.id.clone());
            }
        }

        let avg = (effect.radar_degradation + effect.comms_degradation + effect.gps_degradation) / 3.0;
        let result = if avg >= 0.6 {
            CombatResult::DecisiveVictory
        } else if avg >= 0.4 {
            CombatResult::Victory
        } else if avg >= 0.2 {
            CombatResult::Marginal
        } else if !effect.affected_units.is_empty() {
            CombatResult::Stalemate
        } else {
            CombatResult::Defeat
        };

        let defender = mission
            .target_id
            .clone()
            .unwrap_or_else(|| UnitId::new("area_jam"));
        let report = CombatReport::new(mission.unit_id.clone(), defender, ReportPhase::Ew, result)
            .note(format!("Mission: {}", mission.kind.as_str()))
            .note(format!("Radar degradation: {:.0}%", effect.radar_degradation * 100.0))
            .note(format!("Comms degradation: {:.0}%", effect.comms_degradation * 100.0))
            .note(format!("Units affected: {}", effect.affected_units.len()));

        (report, effect)
    }

    /// One success roll; a hit damages the named subsystem and cascades
    /// into comms (c2) or radar (air_defense)
    pub fn resolve_cyber_attack(
        &mut self,
        mission: &EwMission,
        target_system: &str,
        target_cyber_defense: f32,
        sophistication: f32,
    ) -> (CombatReport, EwEffect) {
        let mut effect = EwEffect::default();
        let chance = cyber_success_chance(sophistication, target_cyber_defense);

        let result = if self.rng.hit_check(chance) {
            let (lo, hi) = cyber_damage_range(target_system);
            effect.cyber_damage = self.rng.uniform(lo, hi);
            match target_system {
                "c2" => effect.comms_degradation = effect.cyber_damage / 200.0,
                "air_defense" => effect.radar_degradation = effect.cyber_damage / 150.0,
                _ => {}
            }
            if effect.cyber_damage >= 40.0 {
                CombatResult::Victory
            } else {
                CombatResult::Marginal
            }
        } else {
            CombatResult::Defeat
        };

        let report = CombatReport::new(
            mission.unit_id.clone(),
            format!("cyber_{}", target_system),
            ReportPhase::Cyber,
            result,
        )
        .defender_loss("damage", effect.cyber_damage)
        .note(format!("Target system: {}", target_system))
        .note(format!("Attack sophistication: {:.0}", sophistication))
        .note(format!("Damage: {:.1}%", effect.cyber_damage));

        (report, effect)
    }

    /// Four independent intercept draws scored into an intelligence value
    pub fn resolve_sigint(
        &mut self,
        mission: &EwMission,
        capability: f32,
        comms_activity: f32,
        comsec: f32,
    ) -> (CombatReport, EwEffect) {
        let chance = sigint_intercept_chance(capability, comms_activity, comsec);

        let intel = SigintIntel {
            unit_locations: self.rng.hit_check(chance),
            order_of_battle: self.rng.hit_check(chance * 0.7),
            intentions: self.rng.hit_check(chance * 0.5),
            supply_status: self.rng.hit_check(chance * 0.8),
        };

        let value = intel.value();
        let result = if value >= 5 {
            CombatResult::DecisiveVictory
        } else if value >= 3 {
            CombatResult::Victory
        } else if value >= 1 {
            CombatResult::Marginal
        } else {
            CombatResult::Defeat
        };

        let report = CombatReport::new(
            mission.unit_id.clone(),
            "sigint_target",
            ReportPhase::Sigint,
            result,
        )
        .note(format!("Intercept capability: {:.0}%", capability))
        .note(format!("Enemy COMSEC: {:.0}%", comsec))
        .note(format!(
            "Intel gathered: OOB={}, Intentions={}",
            intel.order_of_battle, intel.intentions
        ));

        let effect = EwEffect {
            intel: Some(intel),
            ..EwEffect::default()
        };
        (report, effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Faction;

    fn mission(kind: EwMissionKind) -> EwMission {
        EwMission {
            unit_id: "EW-1".into(),
            kind,
            target_id: None,
        }
    }

    #[test]
    fn test_jamming_caps() {
        let mut resolver = EwResolver::new(1);
        let growler = EwSystem::lookup("growler");
        for _ in 0..50 {
            let (report, effect) =
                resolver.resolve_jamming(&mission(EwMissionKind::JamRadar), &growler, &[], 0.0);
            assert!(effect.radar_degradation <= 0.8);
            assert!(effect.comms_degradation <= 0.7);
            assert_eq!(effect.gps_degradation, 0.0);
            assert_eq!(report.defender_id.as_str(), "area_jam");
        }
    }

    #[test]
    fn test_gps_denial_without_gps_band() {
        let mut resolver = EwResolver::new(2);
        let shortstop = EwSystem::lookup("shortstop");
        let (_, effect) =
            resolver.resolve_jamming(&mission(EwMissionKind::GpsDenial), &shortstop, &[], 0.0);
        assert!(effect.gps_degradation > 0.0 && effect.gps_degradation <= 0.9);
        assert_eq!(effect.radar_degradation, 0.0);
        assert_eq!(effect.comms_degradation, 0.0);
    }

    #[test]
    fn test_eccm_reduces_jamming() {
        let krasukha = EwSystem::lookup("krasukha");
        let mut strong = 0.0;
        let mut weak = 0.0;
        let mut a = EwResolver::new(9);
        let mut b = EwResolver::new(9);
        for _ in 0..30 {
            strong += a.resolve_jamming(&mission(EwMissionKind::JamRadar), &krasukha, &[], 0.0).1.radar_degradation;
            weak += b.resolve_jamming(&mission(EwMissionKind::JamRadar), &krasukha, &[], 150.0).1.radar_degradation;
        }
        assert!(weak < strong);
    }

    #[test]
    fn test_affected_units_listed() {
        let mut resolver = EwResolver::new(4);
        let sam = Unit::new("PAF-SAM", Faction::Pakistan, UnitCategory::AirDefense, "hq9", 100);
        let targets = vec![&sam];
        let mut hit = false;
        for _ in 0..20 {
            let (_, effect) = resolver.resolve_jamming(
                &mission(EwMissionKind::JamRadar),
                &EwSystem::lookup("growler"),
                &targets,
                0.0,
            );
            hit |= effect.affected_units.contains(&sam.id);
        }
        assert!(hit);
    }

    #[test]
    fn test_cyber_cascade() {
        let mut resolver = EwResolver::new(5);
        // Unblockable attack
        let (report, effect) = resolver.resolve_cyber_attack(&mission(EwMissionKind::Cyber), "c2", 0.0, 100.0);
        assert!((30.0..=60.0).contains(&effect.cyber_damage));
        assert!((effect.comms_degradation - effect.cyber_damage / 200.0).abs() < 1e-6);
        assert_eq!(report.phase, ReportPhase::Cyber);
        assert_eq!(report.defender_id.as_str(), "cyber_c2");
    }

    #[test]
    fn test_cyber_failure_is_defeat() {
        let mut resolver = EwResolver::new(5);
        let (report, effect) = resolver.resolve_cyber_attack(&mission(EwMissionKind::Cyber), "c2", 100.0, 0.0);
        assert_eq!(report.result, CombatResult::Defeat);
        assert_eq!(effect.cyber_damage, 0.0);
    }

    #[test]
    fn test_sigint_value_scoring() {
        let full = SigintIntel {
            unit_locations: true,
            order_of_battle: true,
            intentions: true,
            supply_status: true,
        };
        assert_eq!(full.value(), 7);
        assert_eq!(SigintIntel::default().value(), 0);

        let mut resolver = EwResolver::new(6);
        let (report, effect) = resolver.resolve_sigint(&mission(EwMissionKind::Sigint), 0.0, 70.0, 50.0);
        assert_eq!(report.result, CombatResult::Defeat);
        assert_eq!(effect.intel, Some(SigintIntel::default()));
    }
}
