//! Military units and their specializations

use serde::{Deserialize, Serialize};

use super::state::{Posture, UnitState, UnitStatus};
use crate::core::types::{Faction, HexCoord, Turn, UnitId};

/// Broad unit category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Aircraft,
    Ground,
    Artillery,
    Helicopter,
    Drone,
    Missile,
    AirDefense,
    SpecialForces,
    Isr,
}

impl UnitCategory {
    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Aircraft | Self::Helicopter)
    }
}

/// Static per-type ratings loaded with a unit. Missing values fall back to
/// the defaults the resolvers have always assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitProfile {
    pub attack: f32,
    pub defense: f32,
    pub radar: f32,
    pub ew_suite: f32,
    pub stealth: f32,
    /// Air-to-air skill
    pub a2a: f32,
    pub speed: f32,
    pub ground_attack: f32,
    /// Interceptor rounds carried by an air-defense unit
    pub missiles_available: Option<u32>,
    pub range_km: Option<f32>,
    /// Weapon tags (standoff weapons let strike aircraft skip air defense)
    pub weapons: Vec<String>,
    /// Target ids an air-defense unit is assigned to protect
    pub protecting: Vec<String>,
}

impl Default for UnitProfile {
    fn default() -> Self {
        Self {
            attack: 50.0,
            defense: 50.0,
            radar: 70.0,
            ew_suite: 50.0,
            stealth: 15.0,
            a2a: 70.0,
            speed: 75.0,
            ground_attack: 70.0,
            missiles_available: None,
            range_km: None,
            weapons: Vec::new(),
            protecting: Vec::new(),
        }
    }
}

impl UnitProfile {
    /// Does this unit protect the given target id (exact or substring match)?
    pub fn protects(&self, target_id: &str) -> bool {
        if target_id.is_empty() {
            return false;
        }
        self.protecting
            .iter()
            .any(|p| p == target_id || p.contains(target_id))
    }
}

/// Aircraft squadron bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Squadron {
    /// Sorties per airframe per day
    pub sortie_rate: f32,
    pub sorties_flown_today: u32,
    pub weapons_loadout: Vec<String>,
    pub base_id: Option<String>,
}

impl Default for Squadron {
    fn default() -> Self {
        Self {
            sortie_rate: 1.5,
            sorties_flown_today: 0,
            weapons_loadout: Vec::new(),
            base_id: None,
        }
    }
}

impl Squadron {
    /// Daily sortie ceiling (four turns per day)
    pub fn max_daily_sorties(&self) -> u32 {
        (self.sortie_rate * 4.0) as u32
    }
}

/// Cruise or ballistic missile battery bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileBattery {
    pub missile_type: String,
    pub missiles_remaining: u32,
    pub missiles_max: u32,
    pub reload_time_turns: u32,
    pub turns_until_reload: u32,
    pub range_km: f32,
    pub is_mobile: bool,
}

impl Default for MissileBattery {
    fn default() -> Self {
        Self {
            missile_type: String::new(),
            missiles_remaining: 0,
            missiles_max: 0,
            reload_time_turns: 4,
            turns_until_reload: 0,
            range_km: 0.0,
            is_mobile: true,
        }
    }
}

impl MissileBattery {
    pub fn new(missile_type: impl Into<String>, missiles: u32) -> Self {
        Self {
            missile_type: missile_type.into(),
            missiles_remaining: missiles,
            missiles_max: missiles,
            ..Self::default()
        }
    }
}

/// Domain-specific fields carried by some units
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Specialization {
    #[default]
    None,
    Squadron(Squadron),
    Battery(MissileBattery),
}

/// One military asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    #[serde(default)]
    pub name: String,
    pub faction: Faction,
    pub category: UnitCategory,
    /// Free-form type tag, e.g. "su30mki", "armored_brigade", "s400"
    pub unit_type: String,
    #[serde(default)]
    pub location: Option<HexCoord>,
    pub state: UnitState,
    #[serde(default)]
    pub status: UnitStatus,
    #[serde(default)]
    pub posture: Posture,
    #[serde(default)]
    pub profile: UnitProfile,
    #[serde(default)]
    pub specialization: Specialization,
}

impl Unit {
    pub fn new(
        id: impl Into<UnitId>,
        faction: Faction,
        category: UnitCategory,
        unit_type: impl Into<String>,
        strength: u32,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            faction,
            category,
            unit_type: unit_type.into(),
            location: None,
            state: UnitState::new(strength),
            status: if strength == 0 {
                UnitStatus::Destroyed
            } else {
                UnitStatus::Ready
            },
            posture: Posture::default(),
            profile: UnitProfile::default(),
            specialization: Specialization::None,
        }
    }

    pub fn with_location(mut self, location: HexCoord) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_profile(mut self, profile: UnitProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_posture(mut self, posture: Posture) -> Self {
        self.posture = posture;
        self
    }

    pub fn with_squadron(mut self, squadron: Squadron) -> Self {
        self.specialization = Specialization::Squadron(squadron);
        self
    }

    pub fn with_battery(mut self, battery: MissileBattery) -> Self {
        self.specialization = Specialization::Battery(battery);
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == UnitStatus::Destroyed
    }

    /// Can the unit still fight?
    pub fn is_combat_effective(&self) -> bool {
        if matches!(self.status, UnitStatus::Destroyed | UnitStatus::Retreating) {
            return false;
        }
        self.state.strength_current > 0 && self.state.organization >= 20.0
    }

    /// Current combat power: base rating scaled by strength, cohesion,
    /// morale, supply and suppression
    pub fn combat_power(&self, attack: bool) -> f32 {
        if !self.is_combat_effective() {
            return 0.0;
        }

        let base = if attack {
            self.profile.attack
        } else {
            self.profile.defense
        };

        base * self.state.strength_ratio()
            * (self.state.organization / 100.0)
            * self.state.morale_factor()
            * self.state.supply_factor()
            * self.state.suppression_factor()
    }

    /// Apply casualties and cohesion loss.
    ///
    /// Strength never drops below zero. Zero strength destroys the unit;
    /// organization or morale under 15 forces a retreat. Destroyed is terminal.
    pub fn take_losses(&mut self, casualties: u32, organization_loss: f32) {
        let state = &mut self.state;
        state.strength_current = state.strength_current.saturating_sub(casualties);
        state.organization = (state.organization - organization_loss.max(0.0)).max(0.0);

        let loss_ratio = casualties as f32 / state.strength_max.max(1) as f32;
        state.morale = (state.morale - loss_ratio * 20.0).max(0.0);

        if self.status.is_terminal() {
            return;
        }

        if self.state.strength_current == 0 {
            self.status = UnitStatus::Destroyed;
        } else if self.state.organization < 15.0 || self.state.morale < 15.0 {
            self.status = UnitStatus::Retreating;
        }
    }

    pub fn apply_suppression(&mut self, amount: f32) {
        self.state.suppression = (self.state.suppression + amount).clamp(0.0, 100.0);
    }

    /// Stamp the unit as having fought this turn
    pub fn mark_in_combat(&mut self, turn: Turn) {
        self.state.last_combat_turn = Some(turn);
        if self.status == UnitStatus::Ready {
            self.status = UnitStatus::Engaged;
        }
    }

    /// End-of-turn recovery. Retreating units stay retreating.
    pub fn recover(&mut self, turn: Turn) {
        self.state.suppression = (self.state.suppression - 20.0).max(0.0);

        if self.state.rested_since(turn) {
            self.state.organization = (self.state.organization + 5.0).min(100.0);
        }

        if self.state.morale < 50.0 {
            self.state.morale = (self.state.morale + 3.0).min(50.0);
        }

        if self.status == UnitStatus::Engaged {
            self.status = UnitStatus::Ready;
        }
    }

    pub fn consume_supply(&mut self, combat: bool) {
        let consumption = if combat { 15.0 } else { 5.0 };
        self.state.supply_level = (self.state.supply_level - consumption).max(0.0);

        if self.category.is_airborne() {
            let burn = if combat { 10.0 } else { 5.0 };
            self.state.fuel = (self.state.fuel - burn).max(0.0);
        }
    }

    pub fn squadron(&self) -> Option<&Squadron> {
        match &self.specialization {
            Specialization::Squadron(s) => Some(s),
            _ => None,
        }
    }

    pub fn squadron_mut(&mut self) -> Option<&mut Squadron> {
        match &mut self.specialization {
            Specialization::Squadron(s) => Some(s),
            _ => None,
        }
    }

    pub fn battery(&self) -> Option<&MissileBattery> {
        match &self.specialization {
            Specialization::Battery(b) => Some(b),
            _ => None,
        }
    }

    pub fn battery_mut(&mut self) -> Option<&mut MissileBattery> {
        match &mut self.specialization {
            Specialization::Battery(b) => Some(b),
            _ => None,
        }
    }

    /// Squadron can launch another sortie today
    pub fn can_sortie(&self) -> bool {
        let Some(squadron) = self.squadron() else {
            return false;
        };
        self.is_combat_effective()
            && self.state.fuel >= 20.0
            && squadron.sorties_flown_today < squadron.max_daily_sorties()
    }

    /// Record a sortie. Returns false for non-squadron units.
    pub fn fly_sortie(&mut self) -> bool {
        let Some(squadron) = self.squadron_mut() else {
            return false;
        };
        squadron.sorties_flown_today += 1;
        self.state.fuel = (self.state.fuel - 15.0).max(0.0);
        self.state.readiness = (self.state.readiness - 2.0).max(0.0);
        true
    }

    /// Reset daily counters at dawn
    pub fn reset_daily(&mut self) {
        if let Some(squadron) = self.squadron_mut() {
            squadron.sorties_flown_today = 0;
        }
    }

    /// Battery has rounds, is not reloading and can fight
    pub fn can_fire(&self) -> bool {
        let Some(battery) = self.battery() else {
            return false;
        };
        battery.missiles_remaining > 0 && battery.turns_until_reload == 0 && self.is_combat_effective()
    }

    /// Fire up to `count` missiles. Returns the number actually fired.
    pub fn fire_missiles(&mut self, count: u32) -> u32 {
        let Some(battery) = self.battery_mut() else {
            return 0;
        };
        let fired = count.min(battery.missiles_remaining);
        battery.missiles_remaining -= fired;
        battery.turns_until_reload = battery.reload_time_turns;
        if fired > 0 && battery.reload_time_turns > 0 && self.status == UnitStatus::Ready {
            self.status = UnitStatus::Reloading;
        }
        fired
    }

    /// Advance the reload counter by one turn
    pub fn tick_reload(&mut self) {
        let Some(battery) = self.battery_mut() else {
            return;
        };
        if battery.turns_until_reload > 0 {
            battery.turns_until_reload -= 1;
        }
        let reloaded = battery.turns_until_reload == 0;
        if reloaded && self.status == UnitStatus::Reloading {
            self.status = UnitStatus::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brigade() -> Unit {
        Unit::new("1-ARMD", Faction::India, UnitCategory::Ground, "armored_brigade", 100)
    }

    #[test]
    fn test_full_strength_power() {
        let unit = brigade();
        // 50 * 1.0 * 1.0 * (0.5 + 85/200) * 1.0 * 1.0
        assert!((unit.combat_power(true) - 46.25).abs() < 0.001);
    }

    #[test]
    fn test_power_zero_when_retreating() {
        let mut unit = brigade();
        unit.status = UnitStatus::Retreating;
        assert_eq!(unit.combat_power(true), 0.0);
    }

    #[test]
    fn test_low_organization_not_effective() {
        let mut unit = brigade();
        unit.state.organization = 19.0;
        assert!(!unit.is_combat_effective());
    }

    #[test]
    fn test_take_losses_destroys_at_zero() {
        let mut unit = brigade();
        unit.take_losses(250, 0.0);
        assert_eq!(unit.state.strength_current, 0);
        assert_eq!(unit.status, UnitStatus::Destroyed);
    }

    #[test]
    fn test_take_losses_forces_retreat() {
        let mut unit = brigade();
        unit.take_losses(10, 90.0);
        assert_eq!(unit.status, UnitStatus::Retreating);
        assert_eq!(unit.state.strength_current, 90);
    }

    #[test]
    fn test_morale_drop_from_losses() {
        let mut unit = brigade();
        unit.take_losses(50, 0.0);
        // 50/100 * 20 = 10
        assert!((unit.state.morale - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_destroyed_is_terminal() {
        let mut unit = brigade();
        unit.take_losses(100, 0.0);
        unit.take_losses(0, 50.0);
        unit.recover(5);
        assert_eq!(unit.status, UnitStatus::Destroyed);
    }

    #[test]
    fn test_recover_does_not_restore_retreat() {
        let mut unit = brigade();
        unit.take_losses(0, 90.0);
        for turn in 1..10 {
            unit.recover(turn);
        }
        assert_eq!(unit.status, UnitStatus::Retreating);
        assert!(unit.state.organization > 10.0);
    }

    #[test]
    fn test_recover_releases_engaged() {
        let mut unit = brigade();
        unit.mark_in_combat(3);
        assert_eq!(unit.status, UnitStatus::Engaged);
        unit.recover(3);
        assert_eq!(unit.status, UnitStatus::Ready);
    }

    #[test]
    fn test_recover_suppression_and_org() {
        let mut unit = brigade();
        unit.apply_suppression(30.0);
        unit.state.organization = 60.0;
        unit.mark_in_combat(4);
        unit.recover(4);
        assert_eq!(unit.state.suppression, 10.0);
        assert_eq!(unit.state.organization, 60.0);
        unit.recover(6);
        assert_eq!(unit.state.organization, 65.0);
    }

    #[test]
    fn test_suppression_capped() {
        let mut unit = brigade();
        unit.apply_suppression(80.0);
        unit.apply_suppression(80.0);
        assert_eq!(unit.state.suppression, 100.0);
    }

    #[test]
    fn test_squadron_sortie_cycle() {
        let mut sqn = Unit::new("IAF-SQN-1", Faction::India, UnitCategory::Aircraft, "su30mki", 18)
            .with_squadron(Squadron::default());
        for _ in 0..6 {
            assert!(sqn.can_sortie());
            sqn.state.fuel = 100.0;
            assert!(sqn.fly_sortie());
        }
        assert!(!sqn.can_sortie());
        sqn.reset_daily();
        assert!(sqn.can_sortie());
    }

    #[test]
    fn test_battery_fire_and_reload() {
        let mut battery = Unit::new("BRAHMOS-1", Faction::India, UnitCategory::Missile, "brahmos_regt", 4)
            .with_battery(MissileBattery::new("brahmos", 8));
        assert!(battery.can_fire());
        assert_eq!(battery.fire_missiles(3), 3);
        assert_eq!(battery.battery().unwrap().missiles_remaining, 5);
        assert_eq!(battery.status, UnitStatus::Reloading);
        assert!(!battery.can_fire());
        for _ in 0..4 {
            battery.tick_reload();
        }
        assert_eq!(battery.status, UnitStatus::Ready);
        assert!(battery.can_fire());
        assert_eq!(battery.fire_missiles(10), 5);
        assert_eq!(battery.battery().unwrap().missiles_remaining, 0);
        assert!(!battery.can_fire());
    }

    #[test]
    fn test_protects_substring() {
        let profile = UnitProfile {
            protecting: vec!["AB-ADAMPUR".into()],
            ..UnitProfile::default()
        };
        assert!(profile.protects("AB-ADAMPUR"));
        assert!(profile.protects("ADAMPUR"));
        assert!(!profile.protects("AB-HALWARA"));
        assert!(!profile.protects(""));
    }
}
