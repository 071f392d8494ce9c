//! Special forces: three-phase direct missions and standalone recon
//!
//! A direct mission runs infiltration, execution and extraction in turn.
//! Reconnaissance is a separate loop over observation turns with one
//! compromise check per turn.

use serde::{Deserialize, Serialize};

use super::base::CombatRng;
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::{HexCoord, UnitId};
use crate::units::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SfMissionKind {
    #[default]
    Raid,
    Recon,
    Sabotage,
    /// Direct action
    Da,
    /// Special reconnaissance
    Sr,
    PersonnelRecovery,
}

impl SfMissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raid => "raid",
            Self::Recon => "recon",
            Self::Sabotage => "sabotage",
            Self::Da => "da",
            Self::Sr => "sr",
            Self::PersonnelRecovery => "personnel_recovery",
        }
    }

    pub fn difficulty(&self) -> f32 {
        match self {
            Self::Raid => 1.2,
            Self::Recon => 0.7,
            Self::Sabotage => 1.0,
            Self::Da => 1.3,
            Self::Sr => 0.6,
            Self::PersonnelRecovery => 1.5,
        }
    }

    pub fn is_recon(&self) -> bool {
        matches!(self, Self::Recon | Self::Sr)
    }

    fn is_direct_action(&self) -> bool {
        matches!(self, Self::Raid | Self::Da)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionMethod {
    #[default]
    Ground,
    Helo,
    Halo,
    Water,
}

impl InsertionMethod {
    /// Detection multiplier from insertion noise
    pub fn noise(&self) -> f32 {
        match self {
            Self::Ground => 1.0,
            Self::Helo => 1.3,
            Self::Halo => 0.7,
            Self::Water => 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl SecurityLevel {
    pub fn value(&self) -> f32 {
        match self {
            Self::Low => 0.3,
            Self::Medium => 0.5,
            Self::High => 0.7,
            Self::VeryHigh => 0.9,
        }
    }

    /// Security of a target position from its entrenchment
    pub fn from_dug_in(dug_in: u8) -> Self {
        match dug_in {
            0 => Self::Low,
            1 => Self::Medium,
            2 => Self::High,
            _ => Self::VeryHigh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SfStats {
    pub skill: f32,
    pub stealth: f32,
    pub firepower: f32,
    pub endurance: f32,
}

impl SfStats {
    const fn new(skill: f32, stealth: f32, firepower: f32, endurance: f32) -> Self {
        Self {
            skill,
            stealth,
            firepower,
            endurance,
        }
    }

    pub fn lookup(unit_type: &str) -> Self {
        match unit_type.to_lowercase().as_str() {
            "para_sf" => Self::new(90.0, 85.0, 70.0, 85.0),
            "marcos" => Self::new(92.0, 88.0, 75.0, 88.0),
            "garud" => Self::new(85.0, 80.0, 72.0, 82.0),
            "ssg" => Self::new(88.0, 85.0, 72.0, 85.0),
            "ssgn" => Self::new(90.0, 90.0, 70.0, 88.0),
            "zarrar" => Self::new(82.0, 78.0, 70.0, 80.0),
            _ => Self::new(80.0, 75.0, 65.0, 80.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SfMission {
    pub unit_id: UnitId,
    pub kind: SfMissionKind,
    pub team_size: u32,
    pub target_id: Option<UnitId>,
    pub target_location: Option<HexCoord>,
    pub insertion: InsertionMethod,
    pub extraction_planned: bool,
}

/// Conditions around the objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SfTarget {
    pub security: SecurityLevel,
    pub troops: u32,
    /// 0-1, quality of pre-mission intelligence
    pub intel_quality: f32,
    /// Air or artillery on call
    pub support_available: bool,
}

/// One unit observed by a recon team
#[derive(Debug, Clone, PartialEq)]
pub struct SfSighting {
    pub unit_id: UnitId,
    pub location: Option<HexCoord>,
    pub accuracy: f32,
    pub estimated_strength: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SfResult {
    pub mission_success: bool,
    /// 0-1
    pub objective_achieved: f32,
    pub casualties: u32,
    pub captured: u32,
    pub enemy_casualties: u32,
    pub damage_inflicted: f32,
    pub compromised: bool,
    pub sightings: Vec<SfSighting>,
    pub vulnerabilities_found: bool,
}

/// Chance the team is spotted on the way in
pub fn detection_chance(insertion: InsertionMethod, security: f32, stealth: f32, intel_quality: f32) -> f32 {
    security * insertion.noise() * (1.0 - stealth / 200.0) * (1.0 - intel_quality * 0.3)
}

#[derive(Debug, Clone)]
pub struct SpecialForcesResolver {
    rng: CombatRng,
}

impl SpecialForcesResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
        }
    }

    pub fn resolve_mission(
        &mut self,
        mission: &SfMission,
        stats: &SfStats,
        target: &SfTarget,
    ) -> (CombatReport, SfResult) {
        let security = target.security.value();
        let (infiltrated, compromised) =
            self.resolve_infiltration(mission, stats.stealth, security, target.intel_quality);

        if !infiltrated {
            let result = SfResult {
                casualties: self.casualties(mission.team_size, security, true, true),
                compromised: true,
                ..SfResult::default()
            };
            let report = self.report(mission, CombatResult::Defeat, &result);
            return (report, result);
        }

        let (achieved, enemy_casualties, damage) = self.execute(mission, stats, target);

        let (casualties, captured) = if mission.extraction_planned {
            let remaining_enemy = target.troops.saturating_sub(enemy_casualties);
            self.resolve_extraction(mission, stats.stealth, security, compromised, remaining_enemy)
        } else if self.rng.hit_check(stats.stealth / 100.0) {
            (0, 0)
        } else {
            (self.casualties(mission.team_size, security * 0.5, compromised, false), 0)
        };

        let mission_success = achieved >= 0.7;
        let result_tier = if mission_success && casualties == 0 {
            CombatResult::DecisiveVictory
        } else if mission_success && casualties as f32 <= mission.team_size as f32 * 0.2 {
            CombatResult::Victory
        } else if achieved >= 0.5 {
            CombatResult::Marginal
        } else if achieved > 0.0 {
            CombatResult::Stalemate
        } else {
            CombatResult::Defeat
        };

        let result = SfResult {
            mission_success,
            objective_achieved: achieved,
            casualties,
            captured,
            enemy_casualties,
            damage_inflicted: damage,
            compromised,
            ..SfResult::default()
        };
        let report = self.report(mission, result_tier, &result);
        (report, result)
    }

    /// Returns (proceeds, compromised)
    fn resolve_infiltration(
        &mut self,
        mission: &SfMission,
        stealth: f32,
        security: f32,
        intel_quality: f32,
    ) -> (bool, bool) {
        let chance = detection_chance(mission.insertion, security, stealth, intel_quality);
        if !self.rng.hit_check(chance) {
            return (true, false);
        }
        // Detected: press on compromised, or abort
        (self.rng.hit_check(stealth / 100.0 * 0.5), true)
    }

    /// Returns (objective achieved, enemy casualties, damage)
    fn execute(&mut self, mission: &SfMission, stats: &SfStats, target: &SfTarget) -> (f32, u32, f32) {
        let mut success = stats.skill / 100.0 * (1.0 + target.intel_quality * 0.3) / mission.kind.difficulty();
        let mut firepower = stats.firepower;
        if target.support_available {
            success *= 1.2;
            firepower *= 1.5;
        }
        let troops = target.troops as f32;

        if self.rng.hit_check(success) {
            let achieved = self.rng.roll(0.9, 0.1);
            return match mission.kind {
                k if k.is_direct_action() => {
                    let casualties = (troops * self.rng.roll(0.3, 0.2) * firepower / 100.0) as u32;
                    (achieved, casualties, self.rng.roll(70.0, 0.2))
                }
                SfMissionKind::Sabotage => {
                    let damage = self.rng.roll(80.0, 0.15);
                    (achieved, self.rng.roll(3.0, 0.5) as u32, damage)
                }
                _ => (achieved, 0, 0.0),
            };
        }

        if self.rng.hit_check(success * 0.7) {
            let achieved = self.rng.roll(0.5, 0.2);
            if mission.kind.is_direct_action() || mission.kind == SfMissionKind::Sabotage {
                let damage = self.rng.roll(40.0, 0.3);
                let casualties = (troops * self.rng.roll(0.1, 0.3) * firepower / 100.0) as u32;
                return (achieved, casualties, damage);
            }
            return (achieved, 0, 0.0);
        }

        (0.0, 0, 0.0)
    }

    /// Returns (casualties, captured)
    fn resolve_extraction(
        &mut self,
        mission: &SfMission,
        stealth: f32,
        security: f32,
        compromised: bool,
        remaining_enemy: u32,
    ) -> (u32, u32) {
        let security = if compromised { security * 1.5 } else { security };
        let pursuit = security * (remaining_enemy as f32 / (remaining_enemy as f32 + 10.0));
        let chance = stealth / 100.0 * (1.0 - pursuit * 0.5);

        if self.rng.hit_check(chance) {
            return (0, 0);
        }

        let mut casualties = self.casualties(mission.team_size, security, true, true);
        let mut captured = 0;
        if casualties > 0 && self.rng.hit_check(0.2) {
            captured = casualties.min(self.rng.randint(1, 2));
            casualties -= captured;
        }
        (casualties, captured)
    }

    fn casualties(&mut self, team_size: u32, security: f32, compromised: bool, fighting: bool) -> u32 {
        let mut rate = 0.05;
        if compromised {
            rate *= 2.0;
        }
        if fighting {
            rate *= 1.5;
        }
        rate *= security;
        let casualties = (team_size as f32 * rate * self.rng.roll(1.0, 0.5)).max(0.0) as u32;
        casualties.min(team_size)
    }

    /// Standalone special reconnaissance over `observation_turns`
    pub fn resolve_recon(
        &mut self,
        mission: &SfMission,
        stats: &SfStats,
        target_area: &[&Unit],
        observation_turns: u32,
    ) -> (CombatReport, SfResult) {
        let mut result = SfResult::default();

        for _ in 0..observation_turns {
            if self.rng.hit_check(0.1 * (1.0 - stats.stealth / 200.0)) {
                result.compromised = true;
                break;
            }
            for unit in target_area {
                if result.sightings.iter().any(|s| s.unit_id == unit.id) {
                    continue;
                }
                if self.rng.hit_check(stats.skill / 100.0 * 0.5) {
                    let accuracy = self.rng.roll(0.9, 0.1);
                    let estimated_strength =
                        (unit.state.strength_current as f32 * self.rng.roll(1.0, 0.15)) as u32;
                    result.sightings.push(SfSighting {
                        unit_id: unit.id.clone(),
                        location: unit.location,
                        accuracy,
                        estimated_strength,
                    });
                }
            }
        }

        if !result.sightings.is_empty() && self.rng.hit_check(stats.skill / 100.0) {
            result.vulnerabilities_found = true;
        }

        let objective = result.sightings.len() as f32 / target_area.len().max(1) as f32;
        if result.compromised {
            result.casualties = self.casualties(mission.team_size, 0.5, true, false);
        }
        result.objective_achieved = objective;
        result.mission_success = objective >= 0.5 && !result.compromised;

        let tier = if objective >= 0.8 && !result.compromised {
            CombatResult::DecisiveVictory
        } else if objective >= 0.5 {
            CombatResult::Victory
        } else if objective >= 0.3 {
            CombatResult::Marginal
        } else {
            CombatResult::Defeat
        };

        let report = self.report(mission, tier, &result);
        (report, result)
    }

    fn report(&self, mission: &SfMission, tier: CombatResult, result: &SfResult) -> CombatReport {
        let defender = mission
            .target_id
            .clone()
            .unwrap_or_else(|| UnitId::new("target_area"));
        CombatReport::new(mission.unit_id.clone(), defender, ReportPhase::SpecialForces, tier)
            .attacker_loss("casualties", result.casualties)
            .attacker_loss("captured", result.captured)
            .defender_loss("casualties", result.enemy_casualties)
            .defender_loss("damage", result.damage_inflicted)
            .with_location(mission.target_location)
            .note(format!("Mission: {}", mission.kind.as_str()))
            .note(format!("Team size: {}", mission.team_size))
            .note(format!(
                "Objective achieved: {:.0}%",
                result.objective_achieved * 100.0
            ))
            .note(format!("Compromised: {}", result.compromised))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Faction;
    use crate::units::UnitCategory;

    fn mission(kind: SfMissionKind) -> SfMission {
        SfMission {
            unit_id: "SF-1".into(),
            kind,
            team_size: 12,
            target_id: Some("TGT".into()),
            target_location: None,
            insertion: InsertionMethod::Halo,
            extraction_planned: true,
        }
    }

    fn target(security: SecurityLevel) -> SfTarget {
        SfTarget {
            security,
            troops: 100,
            intel_quality: 0.9,
            support_available: false,
        }
    }

    #[test]
    fn test_detection_chance() {
        let base = detection_chance(InsertionMethod::Ground, 0.5, 80.0, 0.0);
        assert!((base - 0.3).abs() < 1e-6);
        assert!(detection_chance(InsertionMethod::Helo, 0.5, 80.0, 0.0) > base);
        assert!(detection_chance(InsertionMethod::Halo, 0.5, 80.0, 0.0) < base);
    }

    #[test]
    fn test_security_from_dug_in() {
        assert_eq!(SecurityLevel::from_dug_in(0), SecurityLevel::Low);
        assert_eq!(SecurityLevel::from_dug_in(2), SecurityLevel::High);
        assert_eq!(SecurityLevel::from_dug_in(3), SecurityLevel::VeryHigh);
    }

    #[test]
    fn test_mission_bounds() {
        let mut resolver = SpecialForcesResolver::new(1);
        let stats = SfStats::lookup("para_sf");
        for _ in 0..50 {
            let (report, result) = resolver.resolve_mission(&mission(SfMissionKind::Raid), &stats, &target(SecurityLevel::High));
            assert!(result.casualties + result.captured <= 12);
            assert!(result.objective_achieved <= 1.0);
            assert_eq!(report.phase, ReportPhase::SpecialForces);
            assert_eq!(report.headline(), Some("Mission: raid"));
        }
    }

    #[test]
    fn test_sabotage_mostly_damage() {
        let mut resolver = SpecialForcesResolver::new(2);
        let stats = SfStats::lookup("marcos");
        for _ in 0..30 {
            let (_, result) = resolver.resolve_mission(&mission(SfMissionKind::Sabotage), &stats, &target(SecurityLevel::Low));
            if result.objective_achieved >= 0.8 {
                assert!(result.damage_inflicted >= 68.0);
                assert!(result.enemy_casualties <= 4);
            }
        }
    }

    #[test]
    fn test_recon_inflicts_nothing() {
        let mut resolver = SpecialForcesResolver::new(3);
        let stats = SfStats::lookup("ssg");
        let enemy: Vec<Unit> = (0..4)
            .map(|i| Unit::new(format!("IA-{}", i), Faction::India, UnitCategory::Ground, "infantry", 100))
            .collect();
        let refs: Vec<&Unit> = enemy.iter().collect();
        for _ in 0..20 {
            let (report, result) = resolver.resolve_recon(&mission(SfMissionKind::Sr), &stats, &refs, 3);
            assert_eq!(result.enemy_casualties, 0);
            assert!(result.sightings.len() <= 4);
            assert_eq!(report.defender_lost("casualties"), 0.0);
        }
    }

    #[test]
    fn test_recon_empty_area_is_defeat() {
        let mut resolver = SpecialForcesResolver::new(4);
        let (report, result) = resolver.resolve_recon(&mission(SfMissionKind::Recon), &SfStats::lookup("ssg"), &[], 2);
        assert_eq!(result.objective_achieved, 0.0);
        assert_eq!(report.result, CombatResult::Defeat);
    }
}
