//! Turn-scoped electronic-warfare environment
//!
//! Written by the EW phase, read by every later phase of the same turn and
//! reset by `start_turn`. Jamming entries are keyed by the faction that
//! suffers them; SIGINT value is keyed by the faction that collected it.

use serde::{Deserialize, Serialize};

use crate::combat::ew::{EwEffect, EwMissionKind, SigintIntel};
use crate::core::types::Faction;

/// EW conditions affecting one faction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EwConditions {
    /// 0-1
    pub radar_jam: f32,
    /// 0-1
    pub comms_jam: f32,
    /// 0-1
    pub gps_jam: f32,
    /// Percent damage from the last successful cyber attack
    pub cyber_damage: f32,
    /// Intelligence value gathered by this faction's SIGINT
    pub sigint_value: u32,
}

impl EwConditions {
    fn merge_radar(&mut self, value: f32) {
        self.radar_jam = self.radar_jam.max(value);
    }

    fn merge_comms(&mut self, value: f32) {
        self.comms_jam = self.comms_jam.max(value);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EwEnvironment {
    india: EwConditions,
    pakistan: EwConditions,
}

impl EwEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, faction: Faction) -> &EwConditions {
        match faction {
            Faction::India => &self.india,
            Faction::Pakistan => &self.pakistan,
        }
    }

    fn get_mut(&mut self, faction: Faction) -> &mut EwConditions {
        match faction {
            Faction::India => &mut self.india,
            Faction::Pakistan => &mut self.pakistan,
        }
    }

    /// Radar jamming suffered by `faction`
    pub fn radar_jam(&self, faction: Faction) -> f32 {
        self.get(faction).radar_jam
    }

    /// Intercept/detection multiplier for a defender, `1 - radar jam`
    pub fn radar_modifier(&self, defender: Faction) -> f32 {
        1.0 - self.radar_jam(defender)
    }

    /// Fold a jamming or cyber effect into the target faction's conditions.
    ///
    /// Radar and comms take the max over the turn. GPS and cyber damage are
    /// overwritten by any non-zero value. Which fields a mission may touch
    /// depends on its kind.
    pub fn apply(&mut self, target: Faction, kind: EwMissionKind, effect: &EwEffect) {
        let conditions = self.get_mut(target);
        match kind {
            EwMissionKind::JamRadar | EwMissionKind::JamComms => {
                conditions.merge_radar(effect.radar_degradation);
                conditions.merge_comms(effect.comms_degradation);
            }
            EwMissionKind::GpsDenial => {
                if effect.gps_degradation > 0.0 {
                    conditions.gps_jam = effect.gps_degradation;
                }
                conditions.merge_radar(effect.radar_degradation);
            }
            EwMissionKind::Cyber => {
                if effect.cyber_damage > 0.0 {
                    conditions.cyber_damage = effect.cyber_damage;
                }
                conditions.merge_comms(effect.comms_degradation);
                conditions.merge_radar(effect.radar_degradation);
            }
            EwMissionKind::Sigint => {}
        }
    }

    /// Record SIGINT gathered by `collector`
    pub fn record_sigint(&mut self, collector: Faction, intel: &SigintIntel) {
        let conditions = self.get_mut(collector);
        conditions.sigint_value = conditions.sigint_value.max(intel.value());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(radar: f32, comms: f32, gps: f32, cyber: f32) -> EwEffect {
        EwEffect {
            radar_degradation: radar,
            comms_degradation: comms,
            gps_degradation: gps,
            cyber_damage: cyber,
            ..EwEffect::default()
        }
    }

    #[test]
    fn test_jamming_takes_max() {
        let mut env = EwEnvironment::new();
        env.apply(Faction::Pakistan, EwMissionKind::JamRadar, &effect(0.5, 0.2, 0.0, 0.0));
        env.apply(Faction::Pakistan, EwMissionKind::JamRadar, &effect(0.3, 0.4, 0.0, 0.0));
        let p = env.get(Faction::Pakistan);
        assert_eq!(p.radar_jam, 0.5);
        assert_eq!(p.comms_jam, 0.4);
        assert!(env.get(Faction::India).radar_jam == 0.0);
        assert!((env.radar_modifier(Faction::Pakistan) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_jamming_ignores_gps_band() {
        let mut env = EwEnvironment::new();
        env.apply(Faction::India, EwMissionKind::JamComms, &effect(0.2, 0.3, 0.6, 0.0));
        assert_eq!(env.get(Faction::India).gps_jam, 0.0);
    }

    #[test]
    fn test_gps_and_cyber_overwrite_when_nonzero() {
        let mut env = EwEnvironment::new();
        env.apply(Faction::India, EwMissionKind::GpsDenial, &effect(0.0, 0.0, 0.7, 0.0));
        env.apply(Faction::India, EwMissionKind::GpsDenial, &effect(0.0, 0.0, 0.4, 0.0));
        assert_eq!(env.get(Faction::India).gps_jam, 0.4);
        env.apply(Faction::India, EwMissionKind::GpsDenial, &effect(0.0, 0.0, 0.0, 0.0));
        assert_eq!(env.get(Faction::India).gps_jam, 0.4);

        env.apply(Faction::India, EwMissionKind::Cyber, &effect(0.1, 0.2, 0.0, 45.0));
        let i = env.get(Faction::India);
        assert_eq!(i.cyber_damage, 45.0);
        assert_eq!(i.comms_jam, 0.2);
    }

    #[test]
    fn test_reset_clears() {
        let mut env = EwEnvironment::new();
        env.apply(Faction::India, EwMissionKind::JamRadar, &effect(0.5, 0.5, 0.0, 0.0));
        env.record_sigint(
            Faction::Pakistan,
            &SigintIntel {
                unit_locations: true,
                order_of_battle: true,
                intentions: false,
                supply_status: false,
            },
        );
        assert!(!env.is_clear());
        env.reset();
        assert!(env.is_clear());
    }
}
