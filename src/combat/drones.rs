//! Drone operations: UCAV and loitering strikes, ISR and swarm SEAD
//!
//! Swarm attacks use a saturation model. Once attackers outnumber a SAM's
//! intercept capacity, each intercept attempt is scaled down by
//! `capacity / attackers`, so mass buys survivability.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::air_defense::SamEntry;
use super::base::CombatRng;
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::{HexCoord, UnitId};
use crate::units::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneMissionKind {
    Isr,
    #[default]
    Strike,
    Loitering,
    Sead,
    Swarm,
}

impl DroneMissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isr => "isr",
            Self::Strike => "strike",
            Self::Loitering => "loitering",
            Self::Sead => "sead",
            Self::Swarm => "swarm",
        }
    }

    pub fn is_swarm(&self) -> bool {
        matches!(self, Self::Sead | Self::Swarm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneClass {
    Isr,
    Ucav,
    Loitering,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneStats {
    pub class: DroneClass,
    pub damage: f32,
    pub accuracy: f32,
    pub stealth: f32,
    pub detection: f32,
    /// Weapons carried per airframe (UCAVs only)
    pub weapons: u32,
}

impl DroneStats {
    const fn new(class: DroneClass, damage: f32, accuracy: f32, stealth: f32, detection: f32, weapons: u32) -> Self {
        Self {
            class,
            damage,
            accuracy,
            stealth,
            detection,
            weapons,
        }
    }

    pub fn lookup(drone_type: &str) -> Option<Self> {
        use DroneClass::*;
        let stats = match drone_type.to_lowercase().as_str() {
            "heron" => Self::new(Isr, 0.0, 0.0, 40.0, 85.0, 0),
            "searcher" => Self::new(Isr, 0.0, 0.0, 35.0, 70.0, 0),
            "shahpar" => Self::new(Isr, 0.0, 0.0, 30.0, 60.0, 0),
            "harop" => Self::new(Loitering, 80.0, 85.0, 60.0, 70.0, 1),
            "mq9" => Self::new(Ucav, 75.0, 80.0, 45.0, 70.0, 4),
            "wing_loong" => Self::new(Ucav, 70.0, 75.0, 40.0, 70.0, 4),
            "burraq" => Self::new(Ucav, 65.0, 70.0, 35.0, 70.0, 2),
            "switchblade" => Self::new(Loitering, 40.0, 80.0, 70.0, 70.0, 1),
            "hero_120" => Self::new(Loitering, 60.0, 82.0, 65.0, 70.0, 1),
            _ => return None,
        };
        Some(stats)
    }

    /// Stats for a strike, defaulting to a generic UCAV
    pub fn strike(drone_type: &str) -> Self {
        Self::lookup(drone_type).unwrap_or(Self::new(DroneClass::Ucav, 60.0, 70.0, 40.0, 70.0, 2))
    }

    /// Stats for reconnaissance, defaulting to a generic ISR airframe
    pub fn isr(drone_type: &str) -> Self {
        Self::lookup(drone_type).unwrap_or(Self::new(DroneClass::Isr, 0.0, 0.0, 40.0, 70.0, 0))
    }
}

/// Target class vulnerability multiplier
pub fn drone_target_vulnerability(target: Option<&Unit>) -> f32 {
    let Some(target) = target else {
        // No unit: treat as a logistics site
        return 1.4;
    };
    let t = target.unit_type.to_lowercase();
    if t.contains("radar") {
        2.0
    } else if t.contains("sam") || t.contains("air_defense") {
        1.5
    } else if t.contains("artillery") {
        1.3
    } else if t.contains("command") || t.contains("hq") {
        1.8
    } else if t.contains("armor") {
        0.6
    } else if t.contains("logistics") {
        1.4
    } else {
        0.8
    }
}

/// Optional per-system override of SAM numbers for swarm attacks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmTuning {
    /// Keyed by normalized system name, matched as a substring of the
    /// target's normalized type
    pub per_system: BTreeMap<String, SystemTuning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemTuning {
    pub base_pk: f32,
    pub intercept_capacity: u32,
}

impl SwarmTuning {
    pub fn lookup(&self, normalized_type: &str) -> Option<&SystemTuning> {
        self.per_system
            .iter()
            .find(|(key, _)| normalized_type.contains(key.as_str()))
            .map(|(_, tuning)| tuning)
    }
}

/// Saturation scaling for a SAM facing `attackers` drones
pub fn saturation_factor(intercept_capacity: u32, attackers: u32) -> f32 {
    if attackers > intercept_capacity {
        intercept_capacity as f32 / attackers as f32
    } else {
        1.0
    }
}

/// Per-attempt swarm intercept probability (small targets halve it)
pub fn swarm_intercept_pk(base_pk: f32, intercept_capacity: u32, attackers: u32) -> f32 {
    base_pk * saturation_factor(intercept_capacity, attackers) * 0.5
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroneMission {
    pub unit_id: UnitId,
    pub kind: DroneMissionKind,
    pub drone_count: u32,
    pub drone_type: String,
    pub target_id: Option<UnitId>,
    pub escort_drones: u32,
}

/// One enemy unit located by an ISR sortie
#[derive(Debug, Clone, PartialEq)]
pub struct IsrSighting {
    pub unit_id: UnitId,
    pub location: Option<HexCoord>,
    pub estimated_strength: u32,
    /// Multiplier applied to true strength for the estimate
    pub accuracy: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DroneEngagement {
    pub drones_lost: u32,
    pub escorts_lost: u32,
    pub targets_destroyed: u32,
    pub targets_damaged: u32,
    pub sightings: Vec<IsrSighting>,
    /// Percentage damage dealt to a SAM site (swarm attacks)
    pub sam_damage: f32,
    /// Drones of any role shot down before reaching the SAM (swarm attacks)
    pub intercepted: u32,
}

#[derive(Debug, Clone)]
pub struct DroneResolver {
    rng: CombatRng,
    swarm: Option<SwarmTuning>,
}

impl DroneResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
            swarm: None,
        }
    }

    pub fn with_swarm_tuning(mut self, swarm: Option<SwarmTuning>) -> Self {
        self.swarm = swarm;
        self
    }

    /// UCAV or loitering-munition strike. Loitering munitions are expended
    /// whatever happens.
    pub fn resolve_strike(
        &mut self,
        mission: &DroneMission,
        target: Option<&Unit>,
        air_defense: &[SamEntry],
        ew_degradation: f32,
        weather: f32,
    ) -> (CombatReport, DroneEngagement) {
        let stats = DroneStats::strike(&mission.drone_type);
        let is_loitering = stats.class == DroneClass::Loitering;
        let count = mission.drone_count;
        let mut losses = 0;

        for ad in air_defense {
            if losses >= count {
                break;
            }
            let mut pk = ad.effectiveness.unwrap_or(0.5) * (1.0 - stats.stealth / 200.0);
            if is_loitering {
                pk *= 0.6;
            }
            pk *= 1.0 - ew_degradation;

            let engagements = ad.rounds.min(count - losses);
            for _ in 0..engagements {
                if self.rng.hit_check(pk) {
                    losses += 1;
                }
            }
        }

        let surviving = count.saturating_sub(losses);
        let mut engagement = DroneEngagement::default();
        if surviving == 0 {
            engagement.drones_lost = losses.min(count);
            let report = self.strike_report(mission, CombatResult::Defeat, &engagement);
            return (report, engagement);
        }

        let vulnerability = drone_target_vulnerability(target);
        let accuracy = stats.accuracy * (1.0 - ew_degradation * 0.5);
        let hit_chance = accuracy / 100.0 * weather;

        let (shots, kill_chance) = if is_loitering {
            (surviving, stats.damage / 100.0 * vulnerability)
        } else {
            (surviving * stats.weapons, stats.damage / 100.0 * vulnerability * 0.5)
        };

        for _ in 0..shots {
            if self.rng.hit_check(hit_chance) {
                if self.rng.hit_check(kill_chance) {
                    engagement.targets_destroyed += 1;
                } else {
                    engagement.targets_damaged += 1;
                }
            }
        }

        engagement.drones_lost = if is_loitering { count } else { losses };

        let effectiveness = (engagement.targets_destroyed * 2 + engagement.targets_damaged) as f32
            / count.max(1) as f32;
        let any_effect = engagement.targets_destroyed + engagement.targets_damaged > 0;
        let result = CombatResult::from_effectiveness(effectiveness, any_effect);

        let report = self.strike_report(mission, result, &engagement);
        (report, engagement)
    }

    fn strike_report(
        &self,
        mission: &DroneMission,
        result: CombatResult,
        engagement: &DroneEngagement,
    ) -> CombatReport {
        let defender = mission
            .target_id
            .clone()
            .unwrap_or_else(|| UnitId::new("target"));
        CombatReport::new(mission.unit_id.clone(), defender, ReportPhase::Drone, result)
            .attacker_loss("drones", engagement.drones_lost)
            .defender_loss("destroyed", engagement.targets_destroyed)
            .defender_loss("damaged", engagement.targets_damaged)
            .note(format!("Mission: {}", mission.kind.as_str()))
            .note(format!("Drones: {} {}", mission.drone_count, mission.drone_type))
    }

    /// Reconnaissance over enemy territory. Only long-range air defense
    /// (50 km or more) can reach drones at standoff.
    pub fn resolve_isr(
        &mut self,
        mission: &DroneMission,
        enemy_units: &[&Unit],
        air_defense: &[SamEntry],
        ew_degradation: f32,
        weather: f32,
    ) -> (CombatReport, DroneEngagement) {
        let stats = DroneStats::isr(&mission.drone_type);
        let count = mission.drone_count;
        let mut losses = 0;

        for ad in air_defense {
            if losses >= count {
                break;
            }
            if ad.range_km < 50.0 {
                continue;
            }
            let pk = ad.effectiveness.unwrap_or(0.3) * 0.5 * (1.0 - stats.stealth / 200.0);
            if self.rng.hit_check(pk) {
                losses += 1;
            }
        }

        let surviving = count - losses;
        let detection = stats.detection * (1.0 - ew_degradation * 0.3) * weather;

        let mut sightings = Vec::new();
        if surviving > 0 {
            for unit in enemy_units {
                let concealment = f32::from(unit.state.dug_in) * 15.0 + 20.0;
                let chance = detection / 100.0 * (1.0 - concealment / 200.0);
                if self.rng.hit_check(chance) {
                    let accuracy = self.rng.roll(0.8, 0.2);
                    sightings.push(IsrSighting {
                        unit_id: unit.id.clone(),
                        location: unit.location,
                        estimated_strength: (unit.state.strength_current as f32 * accuracy) as u32,
                        accuracy,
                    });
                }
            }
        }

        let found = sightings.len();
        let total = enemy_units.len();
        let result = if total == 0 {
            CombatResult::Stalemate
        } else {
            let coverage = found as f32 / total as f32;
            if coverage >= 0.8 {
                CombatResult::DecisiveVictory
            } else if coverage >= 0.5 {
                CombatResult::Victory
            } else if coverage >= 0.3 {
                CombatResult::Marginal
            } else if found > 0 {
                CombatResult::Stalemate
            } else {
                CombatResult::Defeat
            }
        };

        let report = CombatReport::new(mission.unit_id.clone(), "area_recon", ReportPhase::DroneIsr, result)
            .attacker_loss("drones", losses)
            .note(format!("ISR mission: {} drones active", surviving))
            .note(format!("Units detected: {}/{}", found, total))
            .note(format!("Detection rating: {:.0}%", detection));

        let engagement = DroneEngagement {
            drones_lost: losses,
            sightings,
            ..DroneEngagement::default()
        };
        (report, engagement)
    }

    /// Swarm attack on an air-defense site. Escorts and decoys absorb
    /// intercepts before strike drones; every strike drone is expended.
    pub fn resolve_sead_swarm(
        &mut self,
        mission: &DroneMission,
        target_sam: &SamEntry,
    ) -> (CombatReport, DroneEngagement) {
        let strike_drones = mission.drone_count;
        let total = strike_drones + mission.escort_drones;

        let intercepted = self.swarm_intercepts(total, target_sam);
        let escorts_lost = intercepted.min(mission.escort_drones);
        let losses = (intercepted - escorts_lost).min(strike_drones);

        let surviving = strike_drones - losses;
        let mut sam_damage = 0.0;
        for _ in 0..surviving {
            if self.rng.hit_check(0.75) {
                sam_damage += self.rng.roll(30.0, 0.2);
            }
        }

        let result = CombatResult::from_sam_damage(sam_damage);
        let engagement = DroneEngagement {
            drones_lost: strike_drones,
            escorts_lost,
            targets_destroyed: u32::from(sam_damage >= 80.0),
            targets_damaged: u32::from((25.0..80.0).contains(&sam_damage)),
            sightings: Vec::new(),
            sam_damage,
            intercepted,
        };

        tracing::trace!(total, intercepted, "swarm saturation");

        let defender = target_sam
            .unit_id
            .clone()
            .unwrap_or_else(|| UnitId::new("sam_site"));
        let report = CombatReport::new(mission.unit_id.clone(), defender, ReportPhase::DroneSead, result)
            .attacker_loss("drones", strike_drones)
            .attacker_loss("escorts", escorts_lost)
            .defender_loss("damage", sam_damage)
            .note(format!("Swarm attack: {} total drones", total))
            .note(format!("SAM damage: {:.0}%", sam_damage));

        (report, engagement)
    }

    /// Intercept probability and capacity a SAM brings against a swarm,
    /// taken from the tuning table when it names the system
    fn swarm_defense(&self, target_sam: &SamEntry) -> (f32, u32) {
        match self
            .swarm
            .as_ref()
            .and_then(|s| s.lookup(&target_sam.normalized_type()))
        {
            Some(tuning) => (tuning.base_pk, tuning.intercept_capacity),
            None => (target_sam.effectiveness.unwrap_or(0.6), target_sam.rounds),
        }
    }

    /// Drones the SAM shoots down before they reach it, one attempt per
    /// unit of intercept capacity
    pub fn swarm_intercepts(&mut self, attackers: u32, target_sam: &SamEntry) -> u32 {
        let (base_pk, capacity) = self.swarm_defense(target_sam);
        let pk = swarm_intercept_pk(base_pk, capacity, attackers);
        let mut intercepted = 0;
        for _ in 0..capacity.min(attackers) {
            if self.rng.hit_check(pk) {
                intercepted += 1;
            }
        }
        intercepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Faction;
    use crate::units::UnitCategory;

    fn mission(kind: DroneMissionKind, count: u32, drone_type: &str) -> DroneMission {
        DroneMission {
            unit_id: "DRONE-1".into(),
            kind,
            drone_count: count,
            drone_type: drone_type.into(),
            target_id: Some("TGT".into()),
            escort_drones: 0,
        }
    }

    #[test]
    fn test_loitering_always_expended() {
        let mut resolver = DroneResolver::new(1);
        for _ in 0..20 {
            let (report, eng) =
                resolver.resolve_strike(&mission(DroneMissionKind::Loitering, 6, "harop"), None, &[], 0.0, 1.0);
            assert_eq!(eng.drones_lost, 6);
            assert_eq!(report.attacker_lost("drones"), 6.0);
        }
    }

    #[test]
    fn test_ucav_survives_without_air_defense() {
        let mut resolver = DroneResolver::new(2);
        let (report, eng) = resolver.resolve_strike(&mission(DroneMissionKind::Strike, 4, "mq9"), None, &[], 0.0, 1.0);
        assert_eq!(eng.drones_lost, 0);
        assert_eq!(report.phase, ReportPhase::Drone);
        assert_eq!(report.headline(), Some("Mission: strike"));
    }

    #[test]
    fn test_shot_down_strike_is_defeat() {
        let mut resolver = DroneResolver::new(3);
        let ad = vec![SamEntry::new("akash", 10).with_effectiveness(1.0)];
        // 0.42 per shot against a single harop
        let mut defeats = 0;
        for _ in 0..30 {
            let (report, eng) =
                resolver.resolve_strike(&mission(DroneMissionKind::Loitering, 1, "harop"), None, &ad, 0.0, 1.0);
            if eng.targets_destroyed + eng.targets_damaged == 0 {
                assert!(report.result <= CombatResult::Stalemate);
                defeats += 1;
            }
        }
        assert!(defeats > 0);
    }

    #[test]
    fn test_isr_detects_and_estimates() {
        let mut resolver = DroneResolver::new(4);
        let enemy: Vec<Unit> = (0..5)
            .map(|i| Unit::new(format!("PA-{}", i), Faction::Pakistan, UnitCategory::Ground, "infantry", 100))
            .collect();
        let refs: Vec<&Unit> = enemy.iter().collect();
        let (report, eng) = resolver.resolve_isr(&mission(DroneMissionKind::Isr, 2, "heron"), &refs, &[], 0.0, 1.0);
        assert_eq!(report.phase, ReportPhase::DroneIsr);
        for s in &eng.sightings {
            assert!((60..=100).contains(&s.estimated_strength));
        }
    }

    #[test]
    fn test_isr_short_range_ad_cannot_engage() {
        let mut resolver = DroneResolver::new(5);
        let ad = vec![SamEntry::new("spyder", 10).with_effectiveness(1.0).with_range(15.0)];
        for _ in 0..20 {
            let (_, eng) = resolver.resolve_isr(&mission(DroneMissionKind::Isr, 2, "heron"), &[], &ad, 0.0, 1.0);
            assert_eq!(eng.drones_lost, 0);
        }
    }

    #[test]
    fn test_saturation_factor() {
        assert_eq!(saturation_factor(20, 10), 1.0);
        assert_eq!(saturation_factor(20, 40), 0.5);
        assert!((swarm_intercept_pk(0.6, 20, 80) - 0.6 * 0.25 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_escorts_absorb_first() {
        let mut resolver = DroneResolver::new(6);
        let sam = SamEntry::new("hq9", 4).with_effectiveness(1.0);
        let mut m = mission(DroneMissionKind::Swarm, 4, "harop");
        m.escort_drones = 10;
        for _ in 0..20 {
            let (report, eng) = resolver.resolve_sead_swarm(&m, &sam);
            // Four intercept attempts can never get past ten escorts
            assert!(eng.escorts_lost <= 4);
            assert_eq!(eng.drones_lost, 4);
            assert_eq!(report.phase, ReportPhase::DroneSead);
        }
    }

    #[test]
    fn test_swarm_tuning_overrides_sam() {
        let mut per_system = BTreeMap::new();
        per_system.insert(
            "hq9".to_string(),
            SystemTuning {
                base_pk: 0.0,
                intercept_capacity: 0,
            },
        );
        let tuning = SwarmTuning { per_system };
        assert!(tuning.lookup("hq9p").is_some());
        assert!(tuning.lookup("s400").is_none());

        let mut resolver = DroneResolver::new(7).with_swarm_tuning(Some(tuning));
        let sam = SamEntry::new("HQ-9/P", 40).with_effectiveness(1.0);
        let (_, eng) = resolver.resolve_sead_swarm(&mission(DroneMissionKind::Swarm, 6, "harop"), &sam);
        assert_eq!(eng.escorts_lost, 0);
    }
}
