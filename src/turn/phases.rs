//! Per-domain phase execution
//!
//! Within a phase the first faction's missions resolve before the second's,
//! each list in submission order, and later missions see the unit state
//! left by earlier ones. An order naming an unknown or destroyed unit, or a
//! unit its faction does not own, is skipped.

use crate::combat::air::{AirMission, AirMissionKind};
use crate::combat::air_defense::{select_layered, SamEntry};
use crate::combat::artillery::{ArtilleryClass, ArtilleryStats, FireMission, FireMissionKind};
use crate::combat::drones::{DroneMission, DroneMissionKind};
use crate::combat::ew::{EwMission, EwMissionKind, EwSystem};
use crate::combat::ground::GroundEngagement;
use crate::combat::helicopters::{HelicopterMission, HelicopterMissionKind};
use crate::combat::missiles::{target_hardness, MissileStrike};
use crate::combat::special_forces::{SecurityLevel, SfMission, SfStats, SfTarget};
use crate::combat::{ArtilleryResolver, CombatReport, CombatResult, GroundResolver, ReportPhase};
use crate::core::types::{Faction, HexCoord, UnitId, FACTION_ORDER};
use crate::orders::{
    AirOrder, ArtilleryOrder, DroneOrder, EwOrder, GroundOrder, HelicopterOrder, MissileStrikeOrder,
    Orders, SfOrder,
};
use crate::services::geometry::DEFAULT_CONCEALMENT;
use crate::services::{GeometryService, IntelQuality, IntelReport, IntelSource, IntelStore, SupplyService};
use crate::units::{Unit, UnitCategory, UnitStatus, UnitTable};

use super::orchestrator::TurnOrchestrator;
use super::phase::TimeOfDay;

/// ISR platforms that extend friendly fighter radar
const AWACS_KEYWORDS: [&str; 6] = ["awacs", "aew", "phalcon", "netra", "erieye", "zdk"];

/// Enemy units located by a successful SIGINT location intercept
const SIGINT_LOCATED_UNITS: usize = 3;

/// Search radius of a special-reconnaissance team around its objective
const RECON_RADIUS_HEXES: u32 = 3;

/// SAM damage (percent) that destroys the site
const SAM_DESTROYED_DAMAGE: f32 = 80.0;
/// SAM damage (percent) that costs the site strength
const SAM_DAMAGED_DAMAGE: f32 = 25.0;

fn sam_entry(unit: &Unit, rounds: u32) -> SamEntry {
    let mut entry = SamEntry::new(unit.unit_type.clone(), rounds);
    entry.unit_id = Some(unit.id.clone());
    entry.ready = unit.status == UnitStatus::Ready;
    entry
}

/// Squadrons respect their daily sortie limit; other units always launch
fn sortie_ready(unit: &Unit) -> bool {
    unit.squadron().is_none() || unit.can_sortie()
}

fn live_enemies(units: &UnitTable, faction: Faction) -> Vec<&Unit> {
    units
        .by_faction(faction.opponent())
        .into_iter()
        .filter(|u| !u.is_destroyed())
        .collect()
}

fn within(center: Option<HexCoord>, location: Option<HexCoord>, radius: u32) -> bool {
    match (center, location) {
        (Some(center), Some(at)) => center.distance(&at) <= radius,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

impl TurnOrchestrator {
    // === LOOKUPS ===

    fn owned_unit(&self, id: &UnitId, faction: Faction) -> Option<&Unit> {
        match self.units.get(id) {
            Some(unit) if unit.faction == faction && unit.is_destroyed() => {
                tracing::debug!("{} is destroyed, order skipped", id);
                None
            }
            Some(unit) if unit.faction == faction => Some(unit),
            Some(_) => {
                tracing::warn!("{} order names {} which it does not own, skipped", faction, id);
                None
            }
            None => {
                tracing::debug!("{} order names unknown unit {}, skipped", faction, id);
                None
            }
        }
    }

    fn mark_in_combat(&mut self, id: &UnitId) {
        let turn = self.game.turn;
        if let Some(unit) = self.units.get_mut(id) {
            unit.mark_in_combat(turn);
        }
        if let Some(record) = self.current.as_mut() {
            record.units_in_combat.insert(id.clone());
        }
    }

    /// Layered SAM defense of `target_id` by `defender`'s air-defense units
    fn sams_defending(&self, target_id: &str, defender: Faction) -> Vec<SamEntry> {
        let mut protecting = Vec::new();
        let mut others = Vec::new();
        for unit in self.units.effective_of(defender, UnitCategory::AirDefense) {
            let rounds = unit
                .profile
                .missiles_available
                .unwrap_or(unit.state.supply_level as u32);
            let entry = sam_entry(unit, rounds);
            if unit.profile.protects(target_id) {
                protecting.push(entry);
            } else {
                others.push(entry);
            }
        }
        select_layered(protecting, &others)
    }

    /// Every air-defense unit of `defender`, as seen by low and slow flyers
    fn air_defense_coverage(&self, defender: Faction) -> Vec<SamEntry> {
        self.units
            .effective_of(defender, UnitCategory::AirDefense)
            .into_iter()
            .map(|unit| {
                sam_entry(unit, (unit.state.supply_level / 10.0) as u32)
                    .with_effectiveness(unit.combat_power(true) / 100.0)
                    .with_range(unit.profile.range_km.unwrap_or(30.0))
            })
            .collect()
    }

    /// The SAM a suppression mission goes after: the named target if it is
    /// an air-defense unit, otherwise the first effective one
    fn target_sam(&self, target_id: Option<&UnitId>, defender: Faction) -> SamEntry {
        let named = target_id
            .and_then(|id| self.units.get(id))
            .filter(|u| u.category == UnitCategory::AirDefense);
        let unit = named.or_else(|| {
            self.units
                .effective_of(defender, UnitCategory::AirDefense)
                .into_iter()
                .next()
        });
        match unit {
            Some(unit) => sam_entry(unit, (unit.state.supply_level / 5.0) as u32)
                .with_effectiveness(unit.combat_power(true) / 100.0),
            None => SamEntry::new("none", 0).with_effectiveness(0.0),
        }
    }

    fn apply_sam_damage(&mut self, sam_id: Option<&UnitId>, damage: f32) {
        let Some(unit) = sam_id.and_then(|id| self.units.get_mut(id)) else {
            return;
        };
        if damage >= SAM_DESTROYED_DAMAGE {
            let strength = unit.state.strength_current;
            unit.take_losses(strength, 50.0);
        } else if damage >= SAM_DAMAGED_DAMAGE {
            let casualties = (unit.state.strength_current as f32 * damage / 100.0) as u32;
            unit.take_losses(casualties, 20.0);
        }
    }

    /// Radar multiplier from an operational AWACS, degraded by jamming
    fn awacs_radar_boost(&self, faction: Faction) -> f32 {
        let has_awacs = self
            .units
            .effective_of(faction, UnitCategory::Isr)
            .iter()
            .any(|u| {
                let unit_type = u.unit_type.to_lowercase();
                AWACS_KEYWORDS.iter().any(|k| unit_type.contains(k))
            });
        if has_awacs {
            1.5 * (1.0 - 0.3 * self.environment.radar_jam(faction))
        } else {
            1.0
        }
    }

    fn has_counter_battery_radar(&self, faction: Faction) -> bool {
        self.units.combat_effective(faction).iter().any(|u| {
            let unit_type = u.unit_type.to_lowercase();
            unit_type.contains("radar") || unit_type.contains("swathi") || unit_type.contains("tpq")
        })
    }

    fn concealment_at(&self, location: Option<HexCoord>) -> f32 {
        location.map_or(DEFAULT_CONCEALMENT, |at| self.map.concealment(at))
    }

    // === INTELLIGENCE ===

    /// Sensor sweeps for both sides, then intel decay. Produces no reports.
    pub(super) fn intelligence_phase(&mut self) -> Vec<CombatReport> {
        let turn = self.game.turn;
        for observer in FACTION_ORDER {
            let enemies = live_enemies(&self.units, observer);
            let written = self.intel.process_detection(observer, &enemies, &self.map, turn);
            tracing::debug!("{} sensors wrote {} intel reports", observer, written.len());
        }
        for observer in FACTION_ORDER {
            self.intel.decay(observer, turn);
        }
        Vec::new()
    }

    // === MISSILES ===

    pub(super) fn missile_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let mut reports = Vec::new();
        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.missile_strikes {
                if let Some(report) = self.resolve_missile_strike(order, faction) {
                    reports.push(report.with_faction(faction));
                }
            }
        }
        reports
    }

    fn resolve_missile_strike(&mut self, order: &MissileStrikeOrder, faction: Faction) -> Option<CombatReport> {
        let battery = self.owned_unit(&order.battery_id, faction)?;
        if !battery.can_fire() {
            tracing::debug!("Battery {} cannot fire, strike skipped", order.battery_id);
            return None;
        }
        let (missile_type, remaining) = battery
            .battery()
            .map(|b| (b.missile_type.clone(), b.missiles_remaining))?;
        let salvo = order.missiles.max(self.config.min_missile_salvo).min(remaining);

        let enemy = faction.opponent();
        let sams = self.sams_defending(order.target_id.as_str(), enemy);
        let fired = self.units.get_mut(&order.battery_id)?.fire_missiles(salvo);

        let strike = MissileStrike {
            battery_id: order.battery_id.clone(),
            target_id: order.target_id.clone(),
            target_type: order.target_type.clone(),
            missiles_fired: fired,
            missile_type,
        };
        let outcome = self.resolvers.missile.resolve_strike(
            &strike,
            &sams,
            target_hardness(&order.target_type),
            self.map.weather().air_ops,
            self.environment.radar_modifier(enemy),
        );

        if outcome.total_damage > 0.0 && self.units.airbase(order.target_id.as_str()).is_some() {
            let damage = self.resolvers.missile.airbase_damage(outcome.total_damage);
            if let Some(airbase) = self.units.airbase_mut(order.target_id.as_str()) {
                airbase.apply_damage(&damage);
                tracing::info!(
                    "Airbase {} hit, runway at {:.0}%",
                    airbase.id,
                    airbase.runway_status
                );
            }
        }
        Some(outcome.report)
    }

    // === ELECTRONIC WARFARE ===

    pub(super) fn ew_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let mut reports = Vec::new();
        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.ew_missions {
                if let Some(report) = self.resolve_ew_mission(order, faction) {
                    reports.push(report.with_faction(faction));
                }
            }
        }
        reports
    }

    fn resolve_ew_mission(&mut self, order: &EwOrder, faction: Faction) -> Option<CombatReport> {
        let unit = self.owned_unit(&order.unit_id, faction)?;
        let system = EwSystem::lookup(&unit.unit_type);
        let enemy = faction.opponent();
        let mission = EwMission {
            unit_id: order.unit_id.clone(),
            kind: order.kind,
            target_id: order.target_id.clone(),
        };

        let (report, effect) = match order.kind {
            EwMissionKind::Cyber => self.resolvers.ew.resolve_cyber_attack(
                &mission,
                &order.target_system,
                order.target_cyber_defense,
                order.attack_sophistication,
            ),
            EwMissionKind::Sigint => self.resolvers.ew.resolve_sigint(
                &mission,
                order.sigint_capability,
                order.target_comms_activity,
                order.target_comsec,
            ),
            EwMissionKind::JamRadar | EwMissionKind::JamComms | EwMissionKind::GpsDenial => {
                let targets = live_enemies(&self.units, faction);
                self.resolvers
                    .ew
                    .resolve_jamming(&mission, &system, &targets, order.target_eccm)
            }
        };

        match effect.intel {
            Some(intel) => {
                self.environment.record_sigint(faction, &intel);
                if intel.unit_locations {
                    self.record_sigint_locations(faction);
                }
            }
            None => self.environment.apply(enemy, order.kind, &effect),
        }
        Some(report)
    }

    fn record_sigint_locations(&mut self, collector: Faction) {
        let turn = self.game.turn;
        let enemy = collector.opponent();
        let located: Vec<IntelReport> = live_enemies(&self.units, collector)
            .into_iter()
            .take(SIGINT_LOCATED_UNITS)
            .map(|u| {
                IntelReport::new(u.id.clone(), enemy, IntelQuality::Detected, turn)
                    .with_source(IntelSource::Sigint)
            })
            .collect();
        for report in located {
            self.intel.add_intel(collector, report);
        }
    }

    // === AIR ===

    /// Paired fighter sweeps first, then strike, SEAD and close support
    pub(super) fn air_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let [first, second] = FACTION_ORDER;
        let first_cap: Vec<&AirOrder> = orders[0]
            .air_missions
            .iter()
            .filter(|m| m.kind.is_air_superiority())
            .collect();
        let second_cap: Vec<&AirOrder> = orders[1]
            .air_missions
            .iter()
            .filter(|m| m.kind.is_air_superiority())
            .collect();

        let mut reports = Vec::new();
        for i in 0..first_cap.len().max(second_cap.len()) {
            let report = match (first_cap.get(i), second_cap.get(i)) {
                (Some(attacker), Some(defender)) => {
                    self.resolve_air_to_air(attacker, defender, first)
                }
                (Some(order), None) => self.uncontested_cap(order, first),
                (None, Some(order)) => self.uncontested_cap(order, second),
                (None, None) => None,
            };
            reports.extend(report);
        }

        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.air_missions {
                match order.kind {
                    AirMissionKind::Strike | AirMissionKind::Sead | AirMissionKind::Cas => {
                        if let Some(report) = self.resolve_air_strike(order, faction) {
                            reports.push(report.with_faction(faction));
                        }
                    }
                    AirMissionKind::Escort => {
                        tracing::debug!("Escort {} flies with the strike package", order.squadron_id);
                    }
                    AirMissionKind::Cap | AirMissionKind::Sweep => {}
                }
            }
        }
        reports
    }

    fn resolve_air_to_air(
        &mut self,
        attacker_order: &AirOrder,
        defender_order: &AirOrder,
        attacker_faction: Faction,
    ) -> Option<CombatReport> {
        let defender_faction = attacker_faction.opponent();
        let attacker = self.owned_unit(&attacker_order.squadron_id, attacker_faction)?;
        let defender = self.owned_unit(&defender_order.squadron_id, defender_faction)?;
        if !sortie_ready(attacker) || !sortie_ready(defender) {
            tracing::debug!(
                "Air-to-air {} vs {} skipped, squadron not ready",
                attacker.id,
                defender.id
            );
            return None;
        }

        let attacker_count = attacker_order
            .aircraft
            .unwrap_or(attacker.state.strength_current)
            .min(attacker.state.strength_current);
        let mut defender_count = defender_order
            .aircraft
            .unwrap_or(defender.state.strength_current)
            .min(defender.state.strength_current);
        if let Some(cap) = self.config.max_defending_cap_aircraft {
            defender_count = defender_count.min(cap);
        }

        let mut attacker_stats = attacker.profile.clone();
        attacker_stats.radar *= self.awacs_radar_boost(attacker_faction);
        let mut defender_stats = defender.profile.clone();
        defender_stats.radar *= self.awacs_radar_boost(defender_faction);

        let attacker_mission = AirMission {
            squadron_id: attacker.id.clone(),
            kind: attacker_order.kind,
            aircraft_count: attacker_count,
            aircraft_type: attacker.unit_type.clone(),
            target_id: None,
        };
        let defender_mission = AirMission {
            squadron_id: defender.id.clone(),
            kind: defender_order.kind,
            aircraft_count: defender_count,
            aircraft_type: defender.unit_type.clone(),
            target_id: None,
        };

        let weather = self.map.weather().air_ops;
        let (mut report, engagement) = self.resolvers.air.resolve_air_to_air(
            &attacker_mission,
            &defender_mission,
            &attacker_stats,
            &defender_stats,
            weather,
        );

        for (id, losses) in [
            (&attacker_mission.squadron_id, engagement.attacker_losses),
            (&defender_mission.squadron_id, engagement.defender_losses),
        ] {
            if let Some(unit) = self.units.get_mut(id) {
                if losses > 0 {
                    unit.take_losses(losses, 5.0);
                }
                unit.fly_sortie();
            }
        }

        report.phase = ReportPhase::AirToAir;
        Some(report.with_faction(attacker_faction))
    }

    /// Informational report for a CAP nobody contested
    fn uncontested_cap(&mut self, order: &AirOrder, faction: Faction) -> Option<CombatReport> {
        let unit = self.owned_unit(&order.squadron_id, faction)?;
        if !sortie_ready(unit) {
            return None;
        }
        let aircraft = order.aircraft.unwrap_or(unit.state.strength_current);
        let sector = order.target_id.as_ref().map_or("unknown", |t| t.as_str());

        let report = CombatReport::new(
            order.squadron_id.clone(),
            "airspace",
            ReportPhase::AirCap,
            CombatResult::Victory,
        )
        .attacker_loss("aircraft", 0u32)
        .note(format!("CAP mission: {} aircraft", aircraft))
        .note(format!("Sector: {}", sector))
        .note("Uncontested - air superiority maintained")
        .with_faction(faction);

        if let Some(unit) = self.units.get_mut(&order.squadron_id) {
            unit.fly_sortie();
        }
        Some(report)
    }

    fn resolve_air_strike(&mut self, order: &AirOrder, faction: Faction) -> Option<CombatReport> {
        let squadron = self.owned_unit(&order.squadron_id, faction)?;
        if !sortie_ready(squadron) {
            tracing::debug!("Squadron {} has no sorties left today", squadron.id);
            return None;
        }
        let strength = squadron.state.strength_current;
        let count = order.aircraft.unwrap_or(strength).min(strength);
        if count == 0 {
            return None;
        }
        let stats = squadron.profile.clone();
        let mission = AirMission {
            squadron_id: squadron.id.clone(),
            kind: order.kind,
            aircraft_count: count,
            aircraft_type: squadron.unit_type.clone(),
            target_id: order.target_id.clone(),
        };

        let enemy = faction.opponent();
        let report = if order.kind == AirMissionKind::Sead {
            let sam = self.target_sam(order.target_id.as_ref(), enemy);
            let (mut report, damage) = self.resolvers.air.resolve_sead(&mission, &stats, &sam);
            self.apply_sam_damage(sam.unit_id.as_ref(), damage);
            report.phase = ReportPhase::AirSead;
            report
        } else {
            let target = order.target_id.as_ref().map_or("", |t| t.as_str());
            let sams = self.sams_defending(target, enemy);
            let defense = match order.kind {
                AirMissionKind::Strike => order.target_defense.unwrap_or_else(|| order.kind.target_defense()),
                _ => order.kind.target_defense(),
            };
            let weather = self.map.weather().air_ops;
            let mut report = self
                .resolvers
                .air
                .resolve_strike(&mission, &stats, defense, &sams, weather);
            report.phase = if order.kind == AirMissionKind::Cas {
                ReportPhase::AirCas
            } else {
                ReportPhase::AirStrike
            };
            report
        };

        let lost = report.attacker_lost("aircraft") as u32;
        if let Some(unit) = self.units.get_mut(&order.squadron_id) {
            if lost > 0 {
                unit.take_losses(lost, 5.0);
            }
            unit.fly_sortie();
        }
        Some(report)
    }

    // === DRONES ===

    pub(super) fn drone_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let mut reports = Vec::new();
        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.drone_missions {
                if let Some(report) = self.resolve_drone_mission(order, faction) {
                    reports.push(report.with_faction(faction));
                }
            }
        }
        reports
    }

    fn resolve_drone_mission(&mut self, order: &DroneOrder, faction: Faction) -> Option<CombatReport> {
        let unit = self.owned_unit(&order.unit_id, faction)?;
        let strength = unit.state.strength_current;
        let count = order.drone_count.unwrap_or(strength).min(strength);
        if count == 0 {
            return None;
        }
        let mission = DroneMission {
            unit_id: unit.id.clone(),
            kind: order.kind,
            drone_count: count,
            drone_type: order.drone_type.clone().unwrap_or_else(|| unit.unit_type.clone()),
            target_id: order.target_id.clone(),
            escort_drones: order.escort_drones,
        };

        let enemy = faction.opponent();
        let turn = self.game.turn;
        // Drones fly under their own side's jamming picture
        let ew_degradation = self.environment.radar_jam(faction);
        let weather = self.map.weather().air_ops;

        let (report, engagement) = match order.kind {
            DroneMissionKind::Isr => {
                let coverage = self.air_defense_coverage(enemy);
                let area: Vec<&Unit> = live_enemies(&self.units, faction)
                    .into_iter()
                    .filter(|u| within(order.target_location, u.location, order.area_radius))
                    .collect();
                let (report, engagement) =
                    self.resolvers
                        .drone
                        .resolve_isr(&mission, &area, &coverage, ew_degradation, weather);
                for sighting in &engagement.sightings {
                    let intel = IntelReport::new(sighting.unit_id.clone(), enemy, IntelQuality::Identified, turn)
                        .with_source(IntelSource::Isr)
                        .with_location(sighting.location)
                        .with_strength(sighting.estimated_strength);
                    self.intel.add_intel(faction, intel);
                }
                (report, engagement)
            }
            DroneMissionKind::Sead | DroneMissionKind::Swarm => {
                let sam = self.target_sam(order.target_id.as_ref(), enemy);
                let (report, engagement) = self.resolvers.drone.resolve_sead_swarm(&mission, &sam);
                self.apply_sam_damage(sam.unit_id.as_ref(), engagement.sam_damage);
                (report, engagement)
            }
            DroneMissionKind::Strike | DroneMissionKind::Loitering => {
                let coverage = self.air_defense_coverage(enemy);
                let target = order.target_id.as_ref().and_then(|id| self.units.get(id));
                let (report, engagement) = self.resolvers.drone.resolve_strike(
                    &mission,
                    target,
                    &coverage,
                    ew_degradation,
                    weather,
                );
                let hits = engagement.targets_destroyed + engagement.targets_damaged;
                if hits > 0 {
                    if let Some(target) = order.target_id.as_ref().and_then(|id| self.units.get_mut(id)) {
                        target.take_losses(
                            engagement.targets_destroyed * 2 + engagement.targets_damaged,
                            (engagement.targets_destroyed * 5) as f32,
                        );
                    }
                }
                (report, engagement)
            }
        };

        let lost = engagement.drones_lost + engagement.escorts_lost;
        if lost > 0 {
            if let Some(unit) = self.units.get_mut(&order.unit_id) {
                unit.take_losses(lost, (lost * 3) as f32);
            }
        }
        Some(report)
    }

    // === ARTILLERY ===

    pub(super) fn artillery_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let mut reports = Vec::new();
        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.artillery_missions {
                if let Some(report) = self.resolve_fire_mission(order, faction) {
                    reports.push(report.with_faction(faction));
                }
            }
        }
        reports
    }

    fn resolve_fire_mission(&mut self, order: &ArtilleryOrder, faction: Faction) -> Option<CombatReport> {
        let battery = self.owned_unit(&order.battery_id, faction)?;
        let stats = ArtilleryStats::lookup(&battery.unit_type);
        let target = order.target_id.as_ref().and_then(|id| self.units.get(id));

        let (report, effect) = match target {
            Some(target)
                if order.kind == FireMissionKind::CounterBattery
                    && target.category == UnitCategory::Artillery =>
            {
                let has_radar = self.has_counter_battery_radar(faction);
                let response_minutes = if has_radar { 5 } else { 15 };
                let target_mobile = ArtilleryStats::lookup(&target.unit_type).class != ArtilleryClass::Tube;
                self.resolvers.artillery.resolve_counter_battery(
                    &order.battery_id,
                    target,
                    has_radar,
                    response_minutes,
                    target_mobile,
                )
            }
            _ => {
                let location = order.location.or_else(|| target.and_then(|t| t.location));
                let mission = FireMission {
                    battery_id: order.battery_id.clone(),
                    target_id: order
                        .target_id
                        .clone()
                        .unwrap_or_else(|| UnitId::new("grid")),
                    target_location: location,
                    rounds: order.rounds,
                    kind: order.kind,
                };
                let concealment = self.concealment_at(location);
                let visibility = self.map.weather().visibility;
                self.resolvers
                    .artillery
                    .resolve_fire_mission(&mission, &stats, target, concealment, visibility)
            }
        };

        if let Some(target_id) = order.target_id.as_ref() {
            if effect.casualties > 0 || effect.suppression > 0.0 {
                if let Some(target) = self.units.get_mut(target_id) {
                    ArtilleryResolver::apply_effects(target, &effect);
                    self.mark_in_combat(target_id);
                }
            }
        }
        if let Some(battery) = self.units.get_mut(&order.battery_id) {
            battery.consume_supply(true);
        }
        Some(report)
    }

    // === HELICOPTERS ===

    pub(super) fn helicopter_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let mut reports = Vec::new();
        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.helicopter_missions {
                if let Some(report) = self.resolve_helicopter_mission(order, faction) {
                    reports.push(report.with_faction(faction));
                }
            }
        }
        reports
    }

    fn resolve_helicopter_mission(
        &mut self,
        order: &HelicopterOrder,
        faction: Faction,
    ) -> Option<CombatReport> {
        let unit = self.owned_unit(&order.unit_id, faction)?;
        let strength = unit.state.strength_current;
        let count = order.helicopter_count.unwrap_or(strength).min(strength);
        if count == 0 {
            return None;
        }
        let mission = HelicopterMission {
            unit_id: unit.id.clone(),
            kind: order.kind,
            helicopter_count: count,
            helicopter_type: order
                .helicopter_type
                .clone()
                .unwrap_or_else(|| unit.unit_type.clone()),
            target_id: order.target_id.clone(),
        };

        let coverage = self.air_defense_coverage(faction.opponent());
        let weather = self.map.weather().air_ops;

        let (report, engagement) = match order.kind {
            HelicopterMissionKind::AirAssault => self.resolvers.helicopter.resolve_air_assault(
                &mission,
                order.troops,
                order.lz_security,
                &coverage,
                weather,
            ),
            HelicopterMissionKind::Attack | HelicopterMissionKind::Cas => {
                let target_id = order.target_id.as_ref()?;
                let target = self.units.get(target_id)?;
                let concealment = self.concealment_at(target.location);
                let result = self.resolvers.helicopter.resolve_attack(
                    &mission,
                    target,
                    &coverage,
                    concealment,
                    weather,
                );
                let engagement = &result.1;
                if engagement.target_casualties > 0 || engagement.target_equipment_destroyed > 0 {
                    let (casualties, equipment) =
                        (engagement.target_casualties, engagement.target_equipment_destroyed);
                    if let Some(target) = self.units.get_mut(target_id) {
                        target.take_losses(casualties, (equipment * 3) as f32);
                    }
                    self.mark_in_combat(target_id);
                }
                result
            }
        };

        if engagement.helicopters_lost > 0 {
            if let Some(unit) = self.units.get_mut(&order.unit_id) {
                let lost = engagement.helicopters_lost;
                unit.take_losses(lost, (lost * 5) as f32);
            }
        }
        Some(report)
    }

    // === GROUND ===

    pub(super) fn ground_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let mut reports = Vec::new();
        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.ground_orders {
                if let Some(report) = self.resolve_ground_combat(order, faction) {
                    reports.push(report.with_faction(faction));
                }
            }
        }
        reports
    }

    fn resolve_ground_combat(&mut self, order: &GroundOrder, faction: Faction) -> Option<CombatReport> {
        if order.unit_id == order.target_id {
            return None;
        }
        let mut attacker = self.owned_unit(&order.unit_id, faction)?.clone();
        let mut defender = self.units.get(&order.target_id)?.clone();
        if attacker.is_destroyed() || defender.is_destroyed() {
            return None;
        }

        let terrain = attacker
            .location
            .and_then(|at| self.map.terrain_at(at))
            .map_or("plains", |t| t.as_str());
        let mut engagement = GroundEngagement::new(attacker.id.clone(), defender.id.clone(), terrain);
        engagement.location = attacker.location;
        engagement.attacker_posture = order.posture;
        engagement.river_crossing = order.river_crossing;
        if let Some(city) = order.city_size {
            engagement.urban = true;
            engagement.urban_defense = Some(city.defense());
        }
        engagement.attacker_support.artillery = order.artillery_support;
        engagement.attacker_support.air = order.air_support;

        let weather = self.map.weather().movement;
        let (report, result) =
            self.resolvers
                .ground
                .resolve_engagement(&engagement, &attacker, &defender, weather);
        GroundResolver::apply_combat_results(&mut attacker, &mut defender, &result);

        for unit in [attacker, defender] {
            let id = unit.id.clone();
            if let Some(slot) = self.units.get_mut(&id) {
                *slot = unit;
            }
            self.mark_in_combat(&id);
        }
        Some(report)
    }

    // === SPECIAL FORCES ===

    pub(super) fn special_forces_phase(&mut self, orders: [&Orders; 2]) -> Vec<CombatReport> {
        let mut reports = Vec::new();
        for (faction, orders) in FACTION_ORDER.into_iter().zip(orders) {
            for order in &orders.sf_missions {
                if let Some(report) = self.resolve_sf_mission(order, faction) {
                    reports.push(report.with_faction(faction));
                }
            }
        }
        reports
    }

    fn resolve_sf_mission(&mut self, order: &SfOrder, faction: Faction) -> Option<CombatReport> {
        let unit = self.owned_unit(&order.unit_id, faction)?;
        let strength = unit.state.strength_current;
        let team_size = order.team_size.unwrap_or(strength).min(strength);
        if team_size == 0 {
            return None;
        }
        let stats = SfStats::lookup(&unit.unit_type);
        let mission = SfMission {
            unit_id: unit.id.clone(),
            kind: order.kind,
            team_size,
            target_id: order.target_id.clone(),
            target_location: order.target_location,
            insertion: order.insertion,
            extraction_planned: order.extraction,
        };

        let enemy = faction.opponent();
        let turn = self.game.turn;

        let (report, result) = if order.kind.is_recon() {
            let area: Vec<&Unit> = live_enemies(&self.units, faction)
                .into_iter()
                .filter(|u| within(order.target_location, u.location, RECON_RADIUS_HEXES))
                .collect();
            let (report, result) = self.resolvers.special_forces.resolve_recon(
                &mission,
                &stats,
                &area,
                order.observation_turns,
            );
            for sighting in &result.sightings {
                let intel = IntelReport::new(sighting.unit_id.clone(), enemy, IntelQuality::Confirmed, turn)
                    .with_source(IntelSource::SpecialForces)
                    .with_location(sighting.location)
                    .with_strength(sighting.estimated_strength)
                    .with_confidence(sighting.accuracy);
                self.intel.add_intel(faction, intel);
            }
            (report, result)
        } else {
            let target_unit = order.target_id.as_ref().and_then(|id| self.units.get(id));
            let (security, troops) = match target_unit {
                Some(t) => (SecurityLevel::from_dug_in(t.state.dug_in), t.state.strength_current),
                None => (order.target_security, order.target_troops),
            };
            let intel_quality = order
                .target_id
                .as_ref()
                .map_or(IntelQuality::None, |id| self.intel.quality_of(faction, id))
                .mission_value();
            let target = SfTarget {
                security,
                troops,
                intel_quality,
                support_available: order.support,
            };
            let (report, result) = self
                .resolvers
                .special_forces
                .resolve_mission(&mission, &stats, &target);

            if result.enemy_casualties > 0 {
                if let Some(target_id) = order.target_id.as_ref() {
                    if let Some(target) = self.units.get_mut(target_id) {
                        target.take_losses(result.enemy_casualties, result.damage_inflicted * 0.3);
                        self.mark_in_combat(target_id);
                    }
                }
            }
            (report, result)
        };

        let lost = result.casualties + result.captured;
        if lost > 0 {
            if let Some(unit) = self.units.get_mut(&order.unit_id) {
                unit.take_losses(lost, (result.casualties * 5) as f32);
            }
        }
        Some(report)
    }

    // === LOGISTICS & RECOVERY ===

    /// Supply for both sides; one report per side with undersupplied units
    pub(super) fn logistics_phase(&mut self) -> Vec<CombatReport> {
        let in_combat = self
            .current
            .as_ref()
            .map(|r| r.units_in_combat.clone())
            .unwrap_or_default();

        let mut reports = Vec::new();
        for faction in FACTION_ORDER {
            let result = self
                .logistics
                .process_turn(faction, &mut self.units, &in_combat, &self.map);
            if result.undersupplied.is_empty() {
                continue;
            }
            tracing::info!("{}: {} units undersupplied", faction, result.undersupplied.len());
            reports.push(
                CombatReport::new(
                    faction.as_str(),
                    "supply",
                    ReportPhase::Logistics,
                    CombatResult::Stalemate,
                )
                .defender_loss("units_undersupplied", result.undersupplied.len() as u32)
                .note(format!("{}: {} units undersupplied", faction, result.undersupplied.len()))
                .note(format!("Units supplied: {}", result.supplied.len()))
                .with_faction(faction),
            );
        }
        reports
    }

    /// Recover every unit; reset sortie counters at dawn and advance reloads
    pub(super) fn recovery_phase(&mut self) -> Vec<CombatReport> {
        let turn = self.game.turn;
        let dawn = TimeOfDay::for_turn(turn) == TimeOfDay::Dawn;
        self.units.for_each_mut(|unit| {
            unit.recover(turn);
            if dawn {
                unit.reset_daily();
            }
            unit.tick_reload();
        });
        Vec::new()
    }
}
