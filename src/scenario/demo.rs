//! Built-in Punjab-sector theater
//!
//! Pakistan holds the western half of the map (q < 10), India the eastern
//! half. Both sides field every domain so a demo turn exercises all phases.

use crate::combat::air::AirMissionKind;
use crate::combat::artillery::FireMissionKind;
use crate::combat::drones::DroneMissionKind;
use crate::combat::ew::EwMissionKind;
use crate::combat::ground::{AttackPosture, CitySize};
use crate::combat::helicopters::HelicopterMissionKind;
use crate::combat::special_forces::{InsertionMethod, SfMissionKind};
use crate::core::types::{Faction, HexCoord, UnitId};
use crate::orders::{
    AirOrder, ArtilleryOrder, DroneOrder, EwOrder, GroundOrder, HelicopterOrder, MissileStrikeOrder,
    Orders, SfOrder,
};
use crate::services::{HexCell, Sensor, SupplyNode, Terrain, Weather};
use crate::units::{Airbase, MissileBattery, Posture, Squadron, Unit, UnitCategory, UnitProfile};

use super::{Scenario, StandingOrders};

const MAP_WIDTH: i32 = 20;
const MAP_HEIGHT: i32 = 12;

fn terrain_for(q: i32, r: i32) -> Terrain {
    match (q, r) {
        (9 | 10, _) => Terrain::River,
        (5, 4) | (15, 4) => Terrain::Urban,
        (_, r) if r >= 9 => Terrain::Desert,
        (_, 0) => Terrain::Hills,
        (q, r) if (q + r) % 7 == 0 => Terrain::Forest,
        _ => Terrain::Plains,
    }
}

fn map() -> Vec<HexCell> {
    let mut cells = Vec::new();
    for q in 0..MAP_WIDTH {
        for r in 0..MAP_HEIGHT {
            let mut cell = HexCell::new(HexCoord::new(q, r), terrain_for(q, r));
            if q == 8 || q == 11 {
                cell = cell.with_fortification(2);
            }
            cells.push(cell);
        }
    }
    cells
}

fn unit(
    id: &str,
    faction: Faction,
    category: UnitCategory,
    unit_type: &str,
    strength: u32,
    at: (i32, i32),
) -> Unit {
    Unit::new(id, faction, category, unit_type, strength).with_location(HexCoord::new(at.0, at.1))
}

fn squadron(base: &str) -> Squadron {
    Squadron {
        base_id: Some(base.into()),
        ..Squadron::default()
    }
}

fn fighter(radar: f32, a2a: f32, stealth: f32, weapons: &[&str]) -> UnitProfile {
    UnitProfile {
        radar,
        a2a,
        stealth,
        weapons: weapons.iter().map(|w| w.to_string()).collect(),
        ..UnitProfile::default()
    }
}

fn sam_site(missiles: u32, range_km: f32, protecting: &[&str]) -> UnitProfile {
    UnitProfile {
        missiles_available: Some(missiles),
        range_km: Some(range_km),
        protecting: protecting.iter().map(|p| p.to_string()).collect(),
        ..UnitProfile::default()
    }
}

fn india_units() -> Vec<Unit> {
    use UnitCategory::*;
    let f = Faction::India;
    let mut infantry = unit("IN-INF-1", f, Ground, "infantry_brigade", 3000, (11, 5));
    infantry.state.dug_in = 1;
    vec![
        unit("IAF-SQN-1", f, Aircraft, "su30mki", 18, (17, 3))
            .with_profile(fighter(80.0, 75.0, 15.0, &[]))
            .with_squadron(squadron("IAF-AMBALA")),
        unit("IAF-SQN-2", f, Aircraft, "rafale", 18, (17, 3))
            .with_profile(fighter(90.0, 85.0, 30.0, &["scalp", "meteor"]))
            .with_squadron(squadron("IAF-AMBALA")),
        unit("IAF-SQN-3", f, Aircraft, "mirage2000", 16, (16, 6))
            .with_profile(fighter(75.0, 70.0, 20.0, &[]))
            .with_squadron(squadron("IAF-ADAMPUR")),
        unit("IAF-AWACS-1", f, Isr, "phalcon_awacs", 2, (18, 5)),
        unit("IN-EW-1", f, Isr, "samyukta", 4, (13, 5)),
        unit("IN-SWATHI-1", f, Isr, "swathi_radar", 1, (13, 6)),
        unit("IN-S400-1", f, AirDefense, "s400", 8, (17, 4))
            .with_profile(sam_site(32, 250.0, &["IAF-AMBALA"])),
        unit("IN-AKASH-1", f, AirDefense, "akash", 6, (12, 5))
            .with_profile(sam_site(24, 30.0, &["IN-ARMD-1", "IN-INF-1"])),
        unit("IN-BRAHMOS-1", f, Missile, "brahmos", 4, (15, 7))
            .with_battery(MissileBattery::new("brahmos", 8)),
        unit("IN-HERON-1", f, Drone, "heron", 6, (14, 4)),
        unit("IN-HAROP-1", f, Drone, "harop", 10, (14, 5)),
        unit("IN-ARTY-1", f, Artillery, "k9_vajra", 18, (12, 6)),
        unit("IN-PINAKA-1", f, Artillery, "pinaka", 12, (13, 7)),
        unit("IN-APACHE-1", f, Helicopter, "apache", 6, (14, 6)),
        unit("IN-ARMD-1", f, Ground, "armored_brigade", 3500, (11, 4)).with_posture(Posture::Attack),
        infantry,
        unit("IN-PARA-SF-1", f, SpecialForces, "para_sf", 40, (12, 3)),
    ]
}

fn pakistan_units() -> Vec<Unit> {
    use UnitCategory::*;
    let f = Faction::Pakistan;
    let mut infantry = unit("PK-INF-1", f, Ground, "infantry_brigade", 3000, (8, 5));
    infantry.state.dug_in = 2;
    vec![
        unit("PAF-SQN-1", f, Aircraft, "jf17", 18, (2, 5))
            .with_profile(fighter(70.0, 70.0, 15.0, &[]))
            .with_squadron(squadron("PAF-SARGODHA")),
        unit("PAF-SQN-2", f, Aircraft, "f16", 16, (2, 5))
            .with_profile(fighter(80.0, 78.0, 15.0, &["amraam"]))
            .with_squadron(squadron("PAF-SARGODHA")),
        unit("PAF-AEW-1", f, Isr, "erieye_aew", 2, (1, 6)),
        unit("PK-EW-1", f, Isr, "shortstop_jammer", 4, (6, 5)),
        unit("PK-HQ9-1", f, AirDefense, "hq9", 8, (2, 4))
            .with_profile(sam_site(32, 200.0, &["PAF-SARGODHA"])),
        unit("PK-SPADA-1", f, AirDefense, "spada2000", 6, (7, 4))
            .with_profile(sam_site(18, 20.0, &["PK-ARMD-1", "PK-INF-1"])),
        unit("PK-BABUR-1", f, Missile, "babur", 4, (4, 8))
            .with_battery(MissileBattery::new("babur", 6)),
        unit("PK-SHAHPAR-1", f, Drone, "shahpar", 6, (5, 5)),
        unit("PK-BURRAQ-1", f, Drone, "burraq", 6, (5, 6)),
        unit("PK-ARTY-1", f, Artillery, "sh15", 18, (7, 6)),
        unit("PK-A100-1", f, Artillery, "a100", 12, (6, 7)),
        unit("PK-COBRA-1", f, Helicopter, "cobra", 6, (5, 3)),
        unit("PK-ARMD-1", f, Ground, "armored_brigade", 3200, (8, 4)),
        infantry,
        unit("PK-SSG-1", f, SpecialForces, "ssg", 30, (7, 3)),
    ]
}

fn airbases() -> Vec<Airbase> {
    let mut ambala = Airbase::new("IAF-AMBALA", Faction::India);
    ambala.location = Some(HexCoord::new(17, 3));
    ambala.capacity = 48;
    ambala.hardened_shelters = 24;
    ambala.squadron_ids = vec!["IAF-SQN-1".into(), "IAF-SQN-2".into()];

    let mut adampur = Airbase::new("IAF-ADAMPUR", Faction::India);
    adampur.location = Some(HexCoord::new(16, 6));
    adampur.capacity = 24;
    adampur.squadron_ids = vec!["IAF-SQN-3".into()];

    let mut sargodha = Airbase::new("PAF-SARGODHA", Faction::Pakistan);
    sargodha.location = Some(HexCoord::new(2, 5));
    sargodha.capacity = 60;
    sargodha.hardened_shelters = 30;
    sargodha.squadron_ids = vec!["PAF-SQN-1".into(), "PAF-SQN-2".into()];

    vec![ambala, adampur, sargodha]
}

fn sensors() -> Vec<Sensor> {
    vec![
        Sensor::awacs("IN-PHALCON", Faction::India, HexCoord::new(18, 5)),
        Sensor::ground_radar("IN-ROHINI", Faction::India, HexCoord::new(13, 4)),
        Sensor::recon("IN-BORDER-OP", Faction::India, HexCoord::new(11, 6), 4),
        Sensor::awacs("PK-ERIEYE", Faction::Pakistan, HexCoord::new(1, 6)),
        Sensor::ground_radar("PK-TPS77", Faction::Pakistan, HexCoord::new(6, 4)),
        Sensor::recon("PK-BORDER-OP", Faction::Pakistan, HexCoord::new(8, 6), 4),
    ]
}

fn supply_nodes() -> Vec<SupplyNode> {
    vec![
        SupplyNode::new("IN-DEPOT-AMRITSAR", Faction::India, HexCoord::new(15, 4)),
        SupplyNode::new("IN-RAILHEAD-FEROZPUR", Faction::India, HexCoord::new(13, 8)),
        SupplyNode::new("PK-DEPOT-LAHORE", Faction::Pakistan, HexCoord::new(5, 4)),
        SupplyNode::new("PK-RAILHEAD-KASUR", Faction::Pakistan, HexCoord::new(6, 8)),
    ]
}

fn id(s: &str) -> UnitId {
    UnitId::from(s)
}

fn india_orders() -> Orders {
    Orders {
        missile_strikes: vec![MissileStrikeOrder {
            battery_id: id("IN-BRAHMOS-1"),
            target_id: id("PAF-SARGODHA"),
            target_type: "airbase".into(),
            missiles: 4,
        }],
        ew_missions: vec![EwOrder {
            unit_id: id("IN-EW-1"),
            kind: EwMissionKind::JamRadar,
            target_eccm: 40.0,
            ..EwOrder::default()
        }],
        air_missions: vec![
            AirOrder {
                squadron_id: id("IAF-SQN-1"),
                kind: AirMissionKind::Cap,
                aircraft: Some(12),
                ..AirOrder::default()
            },
            AirOrder {
                squadron_id: id("IAF-SQN-3"),
                kind: AirMissionKind::Sead,
                aircraft: Some(6),
                target_id: Some(id("PK-SPADA-1")),
                ..AirOrder::default()
            },
            AirOrder {
                squadron_id: id("IAF-SQN-2"),
                kind: AirMissionKind::Strike,
                aircraft: Some(8),
                target_id: Some(id("PK-ARMD-1")),
                target_defense: Some(60.0),
            },
        ],
        drone_missions: vec![
            DroneOrder {
                unit_id: id("IN-HERON-1"),
                kind: DroneMissionKind::Isr,
                drone_count: Some(2),
                target_location: Some(HexCoord::new(7, 5)),
                area_radius: 4,
                ..DroneOrder::default()
            },
            DroneOrder {
                unit_id: id("IN-HAROP-1"),
                kind: DroneMissionKind::Loitering,
                drone_count: Some(4),
                target_id: Some(id("PK-ARTY-1")),
                ..DroneOrder::default()
            },
        ],
        artillery_missions: vec![
            ArtilleryOrder {
                battery_id: id("IN-ARTY-1"),
                target_id: Some(id("PK-INF-1")),
                rounds: 36,
                kind: FireMissionKind::Bombardment,
                ..ArtilleryOrder::default()
            },
            ArtilleryOrder {
                battery_id: id("IN-PINAKA-1"),
                target_id: Some(id("PK-ARTY-1")),
                rounds: 12,
                kind: FireMissionKind::CounterBattery,
                ..ArtilleryOrder::default()
            },
        ],
        helicopter_missions: vec![HelicopterOrder {
            unit_id: id("IN-APACHE-1"),
            kind: HelicopterMissionKind::Attack,
            helicopter_count: Some(4),
            target_id: Some(id("PK-ARMD-1")),
            ..HelicopterOrder::default()
        }],
        ground_orders: vec![GroundOrder {
            unit_id: id("IN-ARMD-1"),
            target_id: id("PK-INF-1"),
            posture: AttackPosture::Assault,
            river_crossing: true,
            artillery_support: true,
            air_support: true,
            ..GroundOrder::default()
        }],
        sf_missions: vec![SfOrder {
            unit_id: id("IN-PARA-SF-1"),
            kind: SfMissionKind::Recon,
            team_size: Some(8),
            target_location: Some(HexCoord::new(7, 4)),
            insertion: InsertionMethod::Halo,
            ..SfOrder::default()
        }],
        ..Orders::new(Faction::India)
    }
}

fn pakistan_orders() -> Orders {
    Orders {
        missile_strikes: vec![MissileStrikeOrder {
            battery_id: id("PK-BABUR-1"),
            target_id: id("IAF-AMBALA"),
            target_type: "airbase".into(),
            missiles: 3,
        }],
        ew_missions: vec![EwOrder {
            unit_id: id("PK-EW-1"),
            kind: EwMissionKind::Sigint,
            ..EwOrder::default()
        }],
        air_missions: vec![
            AirOrder {
                squadron_id: id("PAF-SQN-2"),
                kind: AirMissionKind::Cap,
                aircraft: Some(10),
                ..AirOrder::default()
            },
            AirOrder {
                squadron_id: id("PAF-SQN-1"),
                kind: AirMissionKind::Cas,
                aircraft: Some(6),
                target_id: Some(id("IN-ARMD-1")),
                ..AirOrder::default()
            },
        ],
        drone_missions: vec![
            DroneOrder {
                unit_id: id("PK-SHAHPAR-1"),
                kind: DroneMissionKind::Isr,
                drone_count: Some(2),
                target_location: Some(HexCoord::new(12, 5)),
                area_radius: 3,
                ..DroneOrder::default()
            },
            DroneOrder {
                unit_id: id("PK-BURRAQ-1"),
                kind: DroneMissionKind::Strike,
                drone_count: Some(3),
                target_id: Some(id("IN-AKASH-1")),
                ..DroneOrder::default()
            },
        ],
        artillery_missions: vec![
            ArtilleryOrder {
                battery_id: id("PK-ARTY-1"),
                target_id: Some(id("IN-INF-1")),
                rounds: 30,
                kind: FireMissionKind::Suppression,
                ..ArtilleryOrder::default()
            },
            ArtilleryOrder {
                battery_id: id("PK-A100-1"),
                target_id: Some(id("IN-ARMD-1")),
                rounds: 10,
                kind: FireMissionKind::Bombardment,
                ..ArtilleryOrder::default()
            },
        ],
        helicopter_missions: vec![HelicopterOrder {
            unit_id: id("PK-COBRA-1"),
            kind: HelicopterMissionKind::Cas,
            helicopter_count: Some(4),
            target_id: Some(id("IN-INF-1")),
            ..HelicopterOrder::default()
        }],
        ground_orders: vec![GroundOrder {
            unit_id: id("PK-ARMD-1"),
            target_id: id("IN-INF-1"),
            posture: AttackPosture::Probe,
            city_size: Some(CitySize::Medium),
            artillery_support: true,
            ..GroundOrder::default()
        }],
        sf_missions: vec![SfOrder {
            unit_id: id("PK-SSG-1"),
            kind: SfMissionKind::Sabotage,
            team_size: Some(10),
            target_id: Some(id("IN-SWATHI-1")),
            insertion: InsertionMethod::Ground,
            ..SfOrder::default()
        }],
        ..Orders::new(Faction::Pakistan)
    }
}

pub(super) fn theater() -> Scenario {
    let mut units = india_units();
    units.extend(pakistan_units());
    Scenario {
        name: "Punjab sector".into(),
        weather: Weather::Clear,
        map: map(),
        units,
        airbases: airbases(),
        sensors: sensors(),
        supply_nodes: supply_nodes(),
        orders: StandingOrders {
            india: india_orders(),
            pakistan: pakistan_orders(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_unit_ids_are_unique() {
        let scenario = theater();
        let ids: BTreeSet<_> = scenario.units.iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids.len(), scenario.units.len());
    }

    #[test]
    fn test_orders_reference_own_units() {
        let scenario = theater();
        for faction in crate::core::types::FACTION_ORDER {
            let own: BTreeSet<_> = scenario
                .units
                .iter()
                .filter(|u| u.faction == faction)
                .map(|u| u.id.clone())
                .collect();
            let orders = scenario.orders.get(faction);
            for order in &orders.air_missions {
                assert!(own.contains(&order.squadron_id), "{}", order.squadron_id);
            }
            for order in &orders.ground_orders {
                assert!(own.contains(&order.unit_id), "{}", order.unit_id);
            }
            for order in &orders.missile_strikes {
                assert!(own.contains(&order.battery_id), "{}", order.battery_id);
            }
        }
    }

    #[test]
    fn test_every_domain_has_orders() {
        let scenario = theater();
        for orders in [&scenario.orders.india, &scenario.orders.pakistan] {
            assert!(!orders.missile_strikes.is_empty());
            assert!(!orders.ew_missions.is_empty());
            assert!(!orders.air_missions.is_empty());
            assert!(!orders.drone_missions.is_empty());
            assert!(!orders.artillery_missions.is_empty());
            assert!(!orders.helicopter_missions.is_empty());
            assert!(!orders.ground_orders.is_empty());
            assert!(!orders.sf_missions.is_empty());
        }
    }
}
