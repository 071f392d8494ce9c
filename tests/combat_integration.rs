//! Combat resolver integration tests
//!
//! Each resolver is driven through its public API the way the turn
//! orchestrator drives it.

use std::collections::BTreeMap;

use warfront::combat::air_defense::{select_layered, SamEntry};
use warfront::combat::drones::SystemTuning;
use warfront::combat::ground::GroundEngagement;
use warfront::combat::missiles::MissileStrike;
use warfront::combat::{
    determine_result, AirMission, AirMissionKind, AirResolver, CombatResult, DroneMission,
    DroneMissionKind, DroneResolver, GroundResolver, MissileResolver, ReportPhase, SwarmTuning,
};
use warfront::core::types::Faction;
use warfront::units::{Unit, UnitCategory, UnitProfile, UnitStatus};

fn strike(missiles: u32) -> MissileStrike {
    MissileStrike {
        battery_id: "IN-BRAHMOS-1".into(),
        target_id: "PK-HQ9-1".into(),
        target_type: "sam_site".into(),
        missiles_fired: missiles,
        missile_type: "brahmos".into(),
    }
}

#[test]
fn test_undefended_missile_strike_leaks_everything() {
    let mut resolver = MissileResolver::new(11);
    let outcome = resolver.resolve_strike(&strike(4), &[], 50.0, 1.0, 1.0);

    assert_eq!(outcome.interception.missiles_incoming, 4);
    assert_eq!(outcome.interception.missiles_intercepted, 0);
    assert_eq!(outcome.interception.missiles_leaked, 4);
    assert!(outcome.hits <= 4);
    assert_eq!(outcome.report.phase, ReportPhase::Missiles);
    assert_eq!(outcome.report.attacker_lost("missiles_fired"), 4.0);
}

#[test]
fn test_damage_ratio_tiers() {
    // 80 damage against hardness 50 is a 1.6 ratio
    assert_eq!(CombatResult::from_effectiveness(80.0 / 50.0, true), CombatResult::DecisiveVictory);
    assert_eq!(CombatResult::from_effectiveness(1.0, true), CombatResult::Victory);
    assert_eq!(CombatResult::from_effectiveness(0.3, true), CombatResult::Stalemate);
    assert_eq!(CombatResult::from_effectiveness(0.0, false), CombatResult::Defeat);
}

#[test]
fn test_defended_strike_accounting_balances() {
    let mut resolver = MissileResolver::new(5);
    let sams = vec![
        SamEntry::new("s400", 16),
        SamEntry::new("akash", 8),
    ];
    for seed_strike in 1..=8 {
        let outcome = resolver.resolve_strike(&strike(seed_strike), &sams, 50.0, 1.0, 1.0);
        let i = &outcome.interception;
        assert_eq!(i.missiles_incoming, i.missiles_intercepted + i.missiles_leaked);
    }
}

#[test]
fn test_layered_defense_picks_one_per_tier() {
    let protecting = vec![SamEntry::new("spyder", 4)];
    let others = vec![
        SamEntry::new("s400", 8),
        SamEntry::new("hq9", 8),
        SamEntry::new("akash", 8),
        SamEntry::new("barak8", 8),
    ];
    let layered = select_layered(protecting, &others);
    let types: Vec<&str> = layered.iter().map(|s| s.system_type.as_str()).collect();
    assert_eq!(types, vec!["spyder", "s400", "akash"]);
}

#[test]
fn test_ground_three_to_one_is_decisive() {
    let mut resolver = GroundResolver::new(3);
    let engagement = GroundEngagement::new("IN-ARMD-1".into(), "PK-INF-1".into(), "plains");
    let (report, result) = resolver.resolve_powers(&engagement, 300.0, 100.0, 3500, 3000);

    assert_eq!(report.result, CombatResult::DecisiveVictory);
    assert_eq!(result.ground_gained_hexes, 2);
    assert!(result.defender_retreated);
    assert_eq!(determine_result(300.0, 100.0), CombatResult::DecisiveVictory);
}

#[test]
fn test_ground_results_apply_retreat() {
    let mut resolver = GroundResolver::new(9);
    let mut attacker = Unit::new("IN-ARMD-1", Faction::India, UnitCategory::Ground, "armored_brigade", 3500);
    let mut defender = Unit::new("PK-INF-1", Faction::Pakistan, UnitCategory::Ground, "infantry_brigade", 3000);
    let engagement = GroundEngagement::new(attacker.id.clone(), defender.id.clone(), "plains");
    let (_, result) = resolver.resolve_powers(&engagement, 300.0, 100.0, 3500, 3000);

    GroundResolver::apply_combat_results(&mut attacker, &mut defender, &result);
    assert!(defender.state.strength_current < 3000);
    assert_eq!(defender.status, UnitStatus::Retreating);
    assert!(!defender.is_combat_effective());
}

#[test]
fn test_air_to_air_losses_bounded_by_counts() {
    let mut resolver = AirResolver::new(21);
    let profile = UnitProfile::default();
    let attacker = AirMission {
        squadron_id: "IAF-SQN-1".into(),
        kind: AirMissionKind::Sweep,
        aircraft_count: 12,
        aircraft_type: "su30mki".into(),
        target_id: None,
    };
    let defender = AirMission {
        squadron_id: "PAF-SQN-2".into(),
        kind: AirMissionKind::Cap,
        aircraft_count: 8,
        aircraft_type: "f16".into(),
        target_id: None,
    };
    let (report, engagement) = resolver.resolve_air_to_air(&attacker, &defender, &profile, &profile, 1.0);
    assert!(engagement.attacker_losses <= 12);
    assert!(engagement.defender_losses <= 8);
    assert_eq!(report.attacker_id.as_str(), "IAF-SQN-1");
}

fn swarm(drones: u32, escorts: u32) -> DroneMission {
    DroneMission {
        unit_id: "IN-HAROP-1".into(),
        kind: DroneMissionKind::Swarm,
        drone_count: drones,
        drone_type: "harop".into(),
        target_id: Some("PK-SPADA-1".into()),
        escort_drones: escorts,
    }
}

#[test]
fn test_drone_sead_swarm_against_empty_site() {
    let sam = SamEntry::new("spada2000", 0);
    for seed in 0..20 {
        let mut resolver = DroneResolver::new(seed);
        let (report, engagement) = resolver.resolve_sead_swarm(&swarm(20, 4), &sam);

        // No intercept capacity, so every drone reaches the site
        assert_eq!(engagement.intercepted, 0);
        assert_eq!(engagement.escorts_lost, 0);
        assert_eq!(engagement.drones_lost, 20);
        assert_eq!(report.phase, ReportPhase::DroneSead);
        assert_eq!(report.result, CombatResult::from_sam_damage(engagement.sam_damage));
        assert!(engagement.sam_damage > 0.0);
    }
}

#[test]
fn test_swarm_tuning_replaces_sam_numbers() {
    let mut per_system = BTreeMap::new();
    per_system.insert(
        "spada".to_string(),
        SystemTuning {
            base_pk: 1.0,
            intercept_capacity: 8,
        },
    );
    let tuning = SwarmTuning { per_system };

    // Tuned capacity lets an empty launcher engage
    let empty = SamEntry::new("SPADA-2000", 0);
    let mut intercepted = 0;
    for seed in 0..50 {
        let mut resolver = DroneResolver::new(seed).with_swarm_tuning(Some(tuning.clone()));
        let (_, engagement) = resolver.resolve_sead_swarm(&swarm(4, 0), &empty);
        assert!(engagement.intercepted <= 4);
        intercepted += engagement.intercepted;
    }
    assert!(intercepted > 0);

    // A system the table does not name keeps its own numbers
    let untuned = SamEntry::new("hq9", 0).with_effectiveness(1.0);
    for seed in 0..20 {
        let mut resolver = DroneResolver::new(seed).with_swarm_tuning(Some(tuning.clone()));
        assert_eq!(resolver.swarm_intercepts(4, &untuned), 0);
    }
}

#[test]
fn test_swarm_intercepts_saturate() {
    const CAPACITY: u32 = 10;
    const SEEDS: u64 = 200;
    let sam = SamEntry::new("spada2000", CAPACITY).with_effectiveness(0.9);

    let mean_intercepts = |attackers: u32| {
        let total: u32 = (0..SEEDS)
            .map(|seed| {
                let mut resolver = DroneResolver::new(seed);
                let (_, engagement) = resolver.resolve_sead_swarm(&swarm(attackers, 0), &sam);
                engagement.intercepted
            })
            .sum();
        total as f32 / SEEDS as f32
    };

    let mut last_rate = f32::MAX;
    let mut last_mean = f32::MAX;
    for attackers in [CAPACITY, 2 * CAPACITY, 8 * CAPACITY] {
        let mean = mean_intercepts(attackers);
        let rate = mean / attackers as f32;
        assert!(mean <= CAPACITY as f32, "{} attackers: {}", attackers, mean);
        assert!(rate < last_rate, "{} attackers: rate {} vs {}", attackers, rate, last_rate);
        assert!(mean < last_mean, "{} attackers: mean {} vs {}", attackers, mean, last_mean);
        last_rate = rate;
        last_mean = mean;
    }
}
