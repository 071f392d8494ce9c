//! Air combat: air-to-air engagements, strikes and SEAD
//!
//! Air-to-air runs a BVR stage (first-look standoff salvos, then two
//! mutual salvos) followed by up to three WVR rounds. Strikes penetrate
//! the layered SAM defense unless they carry a standoff weapon.

use serde::{Deserialize, Serialize};

use super::air_defense::SamEntry;
use super::base::{determine_result, CombatRng};
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::UnitId;
use crate::units::UnitProfile;

/// Average BVR missile kill probability
pub const BVR_BASE_PK: f32 = 0.75;

/// Weapons launched from outside SAM envelopes
pub const STANDOFF_WEAPONS: &[&str] = &[
    "scalp",
    "storm_shadow",
    "brahmos_air",
    "kh59",
    "hammer",
    "raad",
    "harpoon",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirMissionKind {
    #[default]
    Cap,
    Sweep,
    Escort,
    Strike,
    Sead,
    Cas,
}

impl AirMissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cap => "cap",
            Self::Sweep => "sweep",
            Self::Escort => "escort",
            Self::Strike => "strike",
            Self::Sead => "sead",
            Self::Cas => "cas",
        }
    }

    /// Missions that go looking for enemy fighters
    pub fn is_air_superiority(&self) -> bool {
        matches!(self, Self::Cap | Self::Sweep)
    }

    /// Defensive value of the target for a strike of this kind
    pub fn target_defense(&self) -> f32 {
        match self {
            Self::Sead => 70.0,
            Self::Cas => 40.0,
            _ => 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirMission {
    pub squadron_id: UnitId,
    pub kind: AirMissionKind,
    pub aircraft_count: u32,
    pub aircraft_type: String,
    pub target_id: Option<UnitId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AirEngagement {
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub attacker_damaged: u32,
    pub defender_damaged: u32,
}

/// Fraction of the enemy a radar can see through its stealth
pub fn detection_factor(radar: f32, enemy_stealth: f32) -> f32 {
    (radar - enemy_stealth) / 100.0
}

/// Per-missile BVR kill probability
pub fn bvr_pk(detects: f32, enemy_ew: f32, weather: f32) -> f32 {
    BVR_BASE_PK * detects * (1.0 - enemy_ew / 200.0) * weather
}

/// Per-aircraft WVR hit probability
pub fn wvr_pk(a2a: f32, speed: f32, enemy_speed: f32, weather: f32) -> f32 {
    a2a / 100.0 * (speed / enemy_speed.max(1.0)) * 0.3 * weather
}

/// SAM kill probability against one penetrating aircraft
pub fn sam_pk_vs_aircraft(effectiveness: f32, weather: f32, ew_suite: f32, stealth: f32) -> f32 {
    effectiveness * weather * (1.0 - ew_suite / 200.0) * (1.0 - stealth / 200.0)
}

pub fn has_standoff_weapon(weapons: &[String]) -> bool {
    weapons
        .iter()
        .any(|w| STANDOFF_WEAPONS.contains(&w.to_lowercase().as_str()))
}

/// Running loss tally for one side of a BVR fight
struct Side<'a> {
    count: u32,
    losses: u32,
    detects: f32,
    profile: &'a UnitProfile,
}

impl Side<'_> {
    fn remaining(&self) -> u32 {
        self.count.saturating_sub(self.losses)
    }
}

#[derive(Debug, Clone)]
pub struct AirResolver {
    rng: CombatRng,
}

impl AirResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
        }
    }

    pub fn resolve_air_to_air(
        &mut self,
        attacker: &AirMission,
        defender: &AirMission,
        attacker_stats: &UnitProfile,
        defender_stats: &UnitProfile,
        weather: f32,
    ) -> (CombatReport, AirEngagement) {
        let (bvr_att, bvr_def) =
            self.resolve_bvr(attacker, defender, attacker_stats, defender_stats, weather);

        let att_remaining = attacker.aircraft_count - bvr_att;
        let def_remaining = defender.aircraft_count - bvr_def;

        let wvr = if att_remaining > 0 && def_remaining > 0 {
            self.resolve_wvr(att_remaining, def_remaining, attacker_stats, defender_stats, weather)
        } else {
            AirEngagement::default()
        };

        let engagement = AirEngagement {
            attacker_losses: (bvr_att + wvr.attacker_losses).min(attacker.aircraft_count),
            defender_losses: (bvr_def + wvr.defender_losses).min(defender.aircraft_count),
            attacker_damaged: wvr.attacker_damaged,
            defender_damaged: wvr.defender_damaged,
        };

        let result = determine_result(
            engagement.defender_losses as f32 * 10.0 + 1.0,
            engagement.attacker_losses as f32 * 10.0 + 1.0,
        );

        let report = CombatReport::new(
            attacker.squadron_id.clone(),
            defender.squadron_id.clone(),
            ReportPhase::Air,
            result,
        )
        .attacker_loss("aircraft", engagement.attacker_losses)
        .defender_loss("aircraft", engagement.defender_losses)
        .note(format!("BVR: Attacker lost {}, Defender lost {}", bvr_att, bvr_def))
        .note(format!(
            "WVR: Attacker lost {}, Defender lost {}",
            wvr.attacker_losses, wvr.defender_losses
        ));

        (report, engagement)
    }

    /// One salvo of up to two missiles from `shooter` at `target`
    fn salvo(&mut self, shooter: &Side, target: &mut Side, weather: f32) {
        let missiles = shooter.remaining().min(2);
        let pk = bvr_pk(shooter.detects, target.profile.ew_suite, weather);
        for _ in 0..missiles {
            if target.losses >= target.count {
                break;
            }
            if self.rng.hit_check(pk) {
                target.losses += 1;
            }
        }
    }

    /// Returns (attacker losses, defender losses)
    fn resolve_bvr(
        &mut self,
        attacker: &AirMission,
        defender: &AirMission,
        attacker_stats: &UnitProfile,
        defender_stats: &UnitProfile,
        weather: f32,
    ) -> (u32, u32) {
        let mut att = Side {
            count: attacker.aircraft_count,
            losses: 0,
            detects: detection_factor(attacker_stats.radar, defender_stats.stealth),
            profile: attacker_stats,
        };
        let mut def = Side {
            count: defender.aircraft_count,
            losses: 0,
            detects: detection_factor(defender_stats.radar, attacker_stats.stealth),
            profile: defender_stats,
        };

        // First look: the side that sees further gets unanswered salvos
        if att.detects > def.detects {
            let salvos = if att.detects >= def.detects * 1.5 { 2 } else { 1 };
            for _ in 0..salvos {
                if att.remaining() == 0 || def.remaining() == 0 {
                    break;
                }
                self.salvo(&att, &mut def, weather);
            }
        } else if def.detects > att.detects {
            let salvos = if def.detects >= att.detects * 1.5 { 2 } else { 1 };
            for _ in 0..salvos {
                if att.remaining() == 0 || def.remaining() == 0 {
                    break;
                }
                self.salvo(&def, &mut att, weather);
            }
        }

        // Mutual exchanges, attacker fires first
        for _ in 0..2 {
            if att.remaining() == 0 || def.remaining() == 0 {
                break;
            }
            // Both salvo sizes are fixed before either side fires
            let def_shooters = Side {
                count: def.count,
                losses: def.losses,
                detects: def.detects,
                profile: def.profile,
            };
            self.salvo(&att, &mut def, weather);
            self.salvo(&def_shooters, &mut att, weather);
        }

        tracing::trace!(
            attacker_losses = att.losses,
            defender_losses = def.losses,
            "bvr complete"
        );
        (att.losses.min(att.count), def.losses.min(def.count))
    }

    fn resolve_wvr(
        &mut self,
        attacker_count: u32,
        defender_count: u32,
        attacker_stats: &UnitProfile,
        defender_stats: &UnitProfile,
        weather: f32,
    ) -> AirEngagement {
        let mut result = AirEngagement::default();
        let rounds = attacker_count.max(defender_count).min(3);

        let att_pk = wvr_pk(attacker_stats.a2a, attacker_stats.speed, defender_stats.speed, weather);
        let def_pk = wvr_pk(defender_stats.a2a, defender_stats.speed, attacker_stats.speed, weather);

        for _ in 0..rounds {
            let remaining_att = attacker_count.saturating_sub(result.attacker_losses);
            let remaining_def = defender_count.saturating_sub(result.defender_losses);
            if remaining_att == 0 || remaining_def == 0 {
                break;
            }

            for _ in 0..remaining_att {
                if result.defender_losses >= defender_count {
                    break;
                }
                if self.rng.hit_check(att_pk) {
                    if self.rng.hit_check(0.7) {
                        result.defender_losses += 1;
                    } else {
                        result.defender_damaged += 1;
                    }
                }
            }

            for _ in 0..remaining_def {
                if result.attacker_losses >= attacker_count {
                    break;
                }
                if self.rng.hit_check(def_pk) {
                    if self.rng.hit_check(0.7) {
                        result.attacker_losses += 1;
                    } else {
                        result.attacker_damaged += 1;
                    }
                }
            }
        }

        result.attacker_losses = result.attacker_losses.min(attacker_count);
        result.defender_losses = result.defender_losses.min(defender_count);
        result
    }

    /// Air-to-ground strike through layered air defense
    pub fn resolve_strike(
        &mut self,
        striker: &AirMission,
        striker_stats: &UnitProfile,
        target_defense: f32,
        sam_coverage: &[SamEntry],
        weather: f32,
    ) -> CombatReport {
        let mut aircraft = striker.aircraft_count;
        let mut losses_to_sam = 0;

        if !has_standoff_weapon(&striker_stats.weapons) {
            for sam in sam_coverage {
                if aircraft == 0 {
                    break;
                }
                let effectiveness = sam.effectiveness.unwrap_or(0.3);
                let engagements = (sam.rounds / 2).min(aircraft);
                let pk = sam_pk_vs_aircraft(
                    effectiveness,
                    weather,
                    striker_stats.ew_suite,
                    striker_stats.stealth,
                );
                for _ in 0..engagements {
                    if self.rng.hit_check(pk) {
                        losses_to_sam += 1;
                        aircraft -= 1;
                    }
                }
            }
        }

        let remaining = striker.aircraft_count - losses_to_sam;
        let ground_attack = striker_stats.ground_attack;

        let mut hits = 0;
        let mut total_damage = 0.0;
        for _ in 0..remaining {
            if self.rng.hit_check(ground_attack / 100.0 * weather) {
                hits += 1;
                total_damage += self.rng.roll(ground_attack * 0.5, 0.25);
            }
        }

        let effectiveness = total_damage / target_defense.max(1.0);
        let result = CombatResult::from_effectiveness(effectiveness, hits > 0);

        let defender = striker
            .target_id
            .clone()
            .unwrap_or_else(|| UnitId::new("ground_target"));
        CombatReport::new(striker.squadron_id.clone(), defender, ReportPhase::AirStrike, result)
            .attacker_loss("aircraft", losses_to_sam)
            .defender_loss("damage", total_damage)
            .note(format!(
                "Strike force: {}, Lost to SAM: {}",
                striker.aircraft_count, losses_to_sam
            ))
            .note(format!("Delivered: {} aircraft, Hits: {}", remaining, hits))
            .note(format!("Total damage: {:.1}", total_damage))
    }

    /// SEAD duel: the SAM engages first, survivors fire anti-radiation
    /// missiles. Scored by cumulative percentage damage to the site.
    pub fn resolve_sead(
        &mut self,
        striker: &AirMission,
        striker_stats: &UnitProfile,
        target_sam: &SamEntry,
    ) -> (CombatReport, f32) {
        let effectiveness = target_sam.effectiveness.unwrap_or(0.3);
        let engagements = (target_sam.rounds / 2).min(striker.aircraft_count);
        let pk = sam_pk_vs_aircraft(effectiveness, 1.0, striker_stats.ew_suite, striker_stats.stealth);

        let mut losses = 0;
        for _ in 0..engagements {
            if self.rng.hit_check(pk) {
                losses += 1;
            }
        }

        let remaining = striker.aircraft_count - losses;
        let arm_pk = 0.65 * (striker_stats.radar / 100.0);
        let mut sam_damage = 0.0;
        for _ in 0..remaining {
            if self.rng.hit_check(arm_pk) {
                sam_damage += self.rng.roll(40.0, 0.2);
            }
        }

        let result = CombatResult::from_sam_damage(sam_damage);
        let defender = target_sam
            .unit_id
            .clone()
            .unwrap_or_else(|| UnitId::new("sam_site"));
        let report = CombatReport::new(striker.squadron_id.clone(), defender, ReportPhase::Sead, result)
            .attacker_loss("aircraft", losses)
            .defender_loss("damage", sam_damage)
            .note(format!("SEAD aircraft: {}, Lost: {}", striker.aircraft_count, losses))
            .note(format!("SAM damage: {:.1}%", sam_damage));

        (report, sam_damage)
    }
}
