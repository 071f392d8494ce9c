//! Attack helicopter strikes and air-assault insertions
//!
//! Low-flying rotary aircraft are most exposed to short-range air defense
//! and comparatively safe from long-range SAM systems.

use serde::{Deserialize, Serialize};

use super::air_defense::{SamEntry, SamTier};
use super::base::CombatRng;
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::UnitId;
use crate::units::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelicopterMissionKind {
    #[default]
    Attack,
    Cas,
    AirAssault,
}

impl HelicopterMissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Cas => "cas",
            Self::AirAssault => "air_assault",
        }
    }
}

/// Landing-zone threat during an insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LzSecurity {
    Cold,
    #[default]
    Warm,
    Hot,
}

impl LzSecurity {
    pub fn risk(&self) -> f32 {
        match self {
            Self::Cold => 0.0,
            Self::Warm => 0.3,
            Self::Hot => 0.7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Warm => "warm",
            Self::Hot => "hot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelicopterStats {
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    pub armor_pen: f32,
    /// Troops carried (transports only)
    pub capacity: u32,
}

impl HelicopterStats {
    const fn new(attack: f32, defense: f32, speed: f32, armor_pen: f32, capacity: u32) -> Self {
        Self {
            attack,
            defense,
            speed,
            armor_pen,
            capacity,
        }
    }

    pub fn lookup(helicopter_type: &str) -> Self {
        match helicopter_type.to_lowercase().as_str() {
            "apache" => Self::new(90.0, 60.0, 75.0, 85.0, 0),
            "lch" => Self::new(75.0, 55.0, 70.0, 70.0, 0),
            "rudra" => Self::new(65.0, 50.0, 70.0, 60.0, 0),
            "cobra" => Self::new(75.0, 55.0, 70.0, 75.0, 0),
            "t129" => Self::new(80.0, 58.0, 72.0, 78.0, 0),
            "z10" => Self::new(82.0, 55.0, 70.0, 80.0, 0),
            "chinook" => Self::new(20.0, 40.0, 65.0, 0.0, 40),
            "mi17" => Self::new(30.0, 45.0, 60.0, 0.0, 30),
            _ => Self::new(70.0, 50.0, 70.0, 70.0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelicopterTarget {
    Armor,
    Mechanized,
    Infantry,
    Artillery,
    Logistics,
    AirDefense,
}

impl HelicopterTarget {
    pub fn classify(target: &Unit) -> Self {
        let t = target.unit_type.to_lowercase();
        if t.contains("armor") || t.contains("tank") {
            Self::Armor
        } else if t.contains("mech") {
            Self::Mechanized
        } else if t.contains("artillery") {
            Self::Artillery
        } else if t.contains("air_defense") || t.contains("sam") {
            Self::AirDefense
        } else if t.contains("logistics") || t.contains("supply") {
            Self::Logistics
        } else {
            Self::Infantry
        }
    }

    pub fn vulnerability(&self) -> f32 {
        match self {
            Self::Armor => 0.8,
            Self::Mechanized => 1.2,
            Self::Infantry => 1.0,
            Self::Artillery => 1.5,
            Self::Logistics => 1.8,
            Self::AirDefense => 0.4,
        }
    }

    pub fn is_armored(&self) -> bool {
        matches!(self, Self::Armor | Self::Mechanized)
    }
}

/// Air-defense effectiveness multiplier against helicopters
pub fn rotary_engagement_modifier(sam: &SamEntry) -> f32 {
    let t = sam.system_type.to_lowercase();
    if t.contains("manpads") || t.contains("shorad") {
        return 1.2;
    }
    match sam.tier() {
        SamTier::Short => 1.2,
        SamTier::Long | SamTier::Medium => 0.7,
        SamTier::Unknown => 1.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HelicopterMission {
    pub unit_id: UnitId,
    pub kind: HelicopterMissionKind,
    pub helicopter_count: u32,
    pub helicopter_type: String,
    pub target_id: Option<UnitId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HelicopterEngagement {
    pub helicopters_lost: u32,
    pub helicopters_damaged: u32,
    pub target_casualties: u32,
    pub target_equipment_destroyed: u32,
    pub troops_inserted: u32,
}

#[derive(Debug, Clone)]
pub struct HelicopterResolver {
    rng: CombatRng,
}

impl HelicopterResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
        }
    }

    /// Attack or close-support run: air-defense gauntlet, then the strike
    pub fn resolve_attack(
        &mut self,
        mission: &HelicopterMission,
        target: &Unit,
        air_defense: &[SamEntry],
        terrain_concealment: f32,
        weather: f32,
    ) -> (CombatReport, HelicopterEngagement) {
        let stats = HelicopterStats::lookup(&mission.helicopter_type);
        let count = mission.helicopter_count;
        let mut engagement = HelicopterEngagement::default();

        for ad in air_defense {
            if engagement.helicopters_lost >= count {
                break;
            }
            let pk = ad.effectiveness.unwrap_or(0.5)
                * rotary_engagement_modifier(ad)
                * (1.0 - stats.defense / 100.0 * 0.5);
            let engagements = ad.rounds.min(count - engagement.helicopters_lost);
            for _ in 0..engagements {
                if self.rng.hit_check(pk) {
                    if self.rng.hit_check(0.7) {
                        engagement.helicopters_lost += 1;
                    } else {
                        engagement.helicopters_damaged += 1;
                    }
                }
            }
        }

        let surviving = count.saturating_sub(engagement.helicopters_lost);
        if surviving == 0 {
            let report = self.attack_report(mission, CombatResult::Defeat, &engagement);
            return (report, engagement);
        }

        let target_class = HelicopterTarget::classify(target);
        let concealment_mod = 1.0 - terrain_concealment / 200.0;
        let hit_chance = stats.attack / 100.0 * concealment_mod * weather;

        let mut hits = 0;
        for _ in 0..surviving {
            if self.rng.hit_check(hit_chance) {
                hits += 1;
                if target_class.is_armored() && self.rng.hit_check(stats.armor_pen / 100.0) {
                    engagement.target_equipment_destroyed += 1;
                }
            }
        }

        // 2% of the target per hit before vulnerability
        let casualty_rate = hits as f32 * 0.02 * target_class.vulnerability();
        engagement.target_casualties =
            (target.state.strength_current as f32 * casualty_rate * self.rng.roll(1.0, 0.3)) as u32;

        let effectiveness =
            (hits + engagement.target_equipment_destroyed * 2) as f32 / count.max(1) as f32;
        let result = CombatResult::from_effectiveness(effectiveness, hits > 0);

        let report = self.attack_report(mission, result, &engagement);
        (report, engagement)
    }

    fn attack_report(
        &self,
        mission: &HelicopterMission,
        result: CombatResult,
        engagement: &HelicopterEngagement,
    ) -> CombatReport {
        let defender = mission
            .target_id
            .clone()
            .unwrap_or_else(|| UnitId::new("target"));
        CombatReport::new(mission.unit_id.clone(), defender, ReportPhase::Helicopter, result)
            .attacker_loss("helicopters_lost", engagement.helicopters_lost)
            .attacker_loss("helicopters_damaged", engagement.helicopters_damaged)
            .defender_loss("casualties", engagement.target_casualties)
            .defender_loss("equipment", engagement.target_equipment_destroyed)
            .note(format!("Mission: {}", mission.kind.as_str()))
            .note(format!("Force: {} {}", mission.helicopter_count, mission.helicopter_type))
    }

    /// Troop insertion. Each helicopter lost takes its share of the troops
    /// with it, on approach or at the landing zone.
    pub fn resolve_air_assault(
        &mut self,
        mission: &HelicopterMission,
        troops: u32,
        lz: LzSecurity,
        air_defense: &[SamEntry],
        weather: f32,
    ) -> (CombatReport, HelicopterEngagement) {
        let count = mission.helicopter_count;
        let troops_per_helo = troops.checked_div(count).unwrap_or(0);
        let mut lost = 0;
        let mut damaged = 0;
        let mut troops_lost = 0;

        for ad in air_defense {
            if lost >= count {
                break;
            }
            let pk = ad.effectiveness.unwrap_or(0.4) * weather;
            let engagements = ad.rounds.min(count - lost);
            for _ in 0..engagements {
                if self.rng.hit_check(pk) {
                    if self.rng.hit_check(0.6) {
                        lost += 1;
                        troops_lost += troops_per_helo;
                    } else {
                        damaged += 1;
                    }
                }
            }
        }

        let landing = count.saturating_sub(lost);
        for _ in 0..landing {
            if self.rng.hit_check(lz.risk() * 0.3) {
                if self.rng.hit_check(0.4) {
                    lost += 1;
                    troops_lost += troops_per_helo;
                } else {
                    damaged += 1;
                }
            }
        }

        let troops_lost = troops_lost.min(troops);
        let inserted = troops - troops_lost;
        let share = inserted as f32 / troops.max(1) as f32;
        let result = if troops == 0 {
            CombatResult::Defeat
        } else if share >= 0.8 {
            CombatResult::DecisiveVictory
        } else if share >= 0.6 {
            CombatResult::Victory
        } else if share >= 0.4 {
            CombatResult::Marginal
        } else if inserted > 0 {
            CombatResult::Stalemate
        } else {
            CombatResult::Defeat
        };

        let engagement = HelicopterEngagement {
            helicopters_lost: lost,
            helicopters_damaged: damaged,
            troops_inserted: inserted,
            ..HelicopterEngagement::default()
        };

        let report = CombatReport::new(
            mission.unit_id.clone(),
            "landing_zone",
            ReportPhase::HelicopterAirAssault,
            result,
        )
        .attacker_loss("helicopters", lost)
        .attacker_loss("troops", troops_lost)
        .note(format!("LZ security: {}", lz.as_str()))
        .note(format!("Troops inserted: {}/{}", inserted, troops))
        .note(format!("Helicopters lost: {}, damaged: {}", lost, damaged));

        (report, engagement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Faction;
    use crate::units::UnitCategory;

    fn mission(kind: HelicopterMissionKind, count: u32, heli: &str) -> HelicopterMission {
        HelicopterMission {
            unit_id: "HELO-1".into(),
            kind,
            helicopter_count: count,
            helicopter_type: heli.into(),
            target_id: Some("TGT".into()),
        }
    }

    #[test]
    fn test_rotary_modifier_by_tier() {
        assert_eq!(rotary_engagement_modifier(&SamEntry::new("spyder", 4)), 1.2);
        assert_eq!(rotary_engagement_modifier(&SamEntry::new("manpads", 4)), 1.2);
        assert_eq!(rotary_engagement_modifier(&SamEntry::new("s400", 4)), 0.7);
        assert_eq!(rotary_engagement_modifier(&SamEntry::new("zu23", 4)), 1.0);
    }

    #[test]
    fn test_equipment_kills_only_vs_armor() {
        let mut resolver = HelicopterResolver::new(1);
        let infantry = Unit::new("INF", Faction::Pakistan, UnitCategory::Ground, "infantry", 100);
        for _ in 0..20 {
            let (_, eng) =
                resolver.resolve_attack(&mission(HelicopterMissionKind::Attack, 4, "apache"), &infantry, &[], 0.0, 1.0);
            assert_eq!(eng.target_equipment_destroyed, 0);
        }
    }

    #[test]
    fn test_attack_report_fields() {
        let mut resolver = HelicopterResolver::new(2);
        let tanks = Unit::new("ARM", Faction::Pakistan, UnitCategory::Ground, "armor_brigade", 100);
        let (report, eng) =
            resolver.resolve_attack(&mission(HelicopterMissionKind::Cas, 4, "apache"), &tanks, &[], 0.0, 1.0);
        assert_eq!(report.phase, ReportPhase::Helicopter);
        assert_eq!(report.headline(), Some("Mission: cas"));
        assert_eq!(report.defender_lost("equipment"), eng.target_equipment_destroyed as f32);
        assert_eq!(eng.helicopters_lost, 0);
    }

    #[test]
    fn test_cold_lz_without_air_defense_is_clean() {
        let mut resolver = HelicopterResolver::new(3);
        let (report, eng) = resolver.resolve_air_assault(
            &mission(HelicopterMissionKind::AirAssault, 4, "mi17"),
            40,
            LzSecurity::Cold,
            &[],
            1.0,
        );
        assert_eq!(eng.troops_inserted, 40);
        assert_eq!(report.result, CombatResult::DecisiveVictory);
        assert_eq!(report.phase, ReportPhase::HelicopterAirAssault);
    }

    #[test]
    fn test_troop_losses_follow_helicopters() {
        let mut resolver = HelicopterResolver::new(4);
        let ad = vec![SamEntry::new("spyder", 10).with_effectiveness(1.0)];
        for _ in 0..20 {
            let (report, eng) = resolver.resolve_air_assault(
                &mission(HelicopterMissionKind::AirAssault, 4, "mi17"),
                40,
                LzSecurity::Hot,
                &ad,
                1.0,
            );
            let lost = report.attacker_lost("helicopters") as u32;
            assert_eq!(40 - eng.troops_inserted, lost * 10);
        }
    }

    #[test]
    fn test_lz_risk_levels() {
        assert_eq!(LzSecurity::Cold.risk(), 0.0);
        assert_eq!(LzSecurity::Warm.risk(), 0.3);
        assert_eq!(LzSecurity::Hot.risk(), 0.7);
    }
}
