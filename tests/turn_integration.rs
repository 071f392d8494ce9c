//! Turn orchestrator integration tests
//!
//! Runs the built-in demo theater through full turns and checks the
//! turn-level guarantees: phase order, idempotent scoring, per-turn EW reset
//! and the unit state invariants.

use std::collections::BTreeSet;

use warfront::core::types::{Faction, UnitId};
use warfront::orders::{MissileStrikeOrder, Orders};
use warfront::turn::{TimeOfDay, PHASE_ORDER};
use warfront::units::UnitStatus;
use warfront::{GameConfig, Scenario, TurnOrchestrator};

fn demo(seed: u64) -> (TurnOrchestrator, Orders, Orders) {
    let scenario = Scenario::demo();
    let config = GameConfig {
        seed,
        ..GameConfig::default()
    };
    let india = scenario.orders.india.clone();
    let pakistan = scenario.orders.pakistan.clone();
    let orchestrator = TurnOrchestrator::from_scenario(config, &scenario).unwrap();
    (orchestrator, india, pakistan)
}

#[test]
fn test_phases_run_in_fixed_order() {
    let (mut orch, india, pakistan) = demo(42);
    orch.start_turn();

    for (i, phase) in PHASE_ORDER.iter().enumerate() {
        orch.execute_phase(*phase, &india, &pakistan).unwrap();
        let record = orch.current_turn().unwrap();
        assert_eq!(record.current_phase, *phase);
        for (j, other) in PHASE_ORDER.iter().enumerate() {
            assert_eq!(record.is_phase_complete(*other), j <= i, "{} after {}", other, phase);
        }
    }

    let record = orch.end_turn().unwrap();
    assert!(record.is_complete());
    assert_eq!(record.phase_complete.len(), 11);
}

#[test]
fn test_full_turn_produces_reports_for_every_domain() {
    let (mut orch, india, pakistan) = demo(42);
    let record = orch.execute_full_turn(&india, &pakistan).unwrap();

    assert_eq!(record.turn, 1);
    assert_eq!(record.time_of_day, TimeOfDay::Dawn);
    for prefix in ["missiles", "air", "drone", "artillery", "helicopter", "ground", "special_forces"] {
        assert!(
            record.reports_with_prefix(prefix).next().is_some(),
            "no {} report",
            prefix
        );
    }
    assert!(record.combat_reports.iter().all(|r| r.turn == 1));
    assert!(record.combat_reports.iter().all(|r| r.faction.is_some()));
}

#[test]
fn test_victory_points_are_not_double_counted() {
    let (mut orch, india, pakistan) = demo(7);
    orch.execute_full_turn(&india, &pakistan).unwrap();
    let india_vp = orch.game().india_vp;
    let pakistan_vp = orch.game().pakistan_vp;

    let again = orch.calculate_victory_points();
    assert_eq!(again.total(), 0);
    assert_eq!(orch.game().india_vp, india_vp);
    assert_eq!(orch.game().pakistan_vp, pakistan_vp);
}

#[test]
fn test_ew_environment_resets_each_turn() {
    let (mut orch, india, pakistan) = demo(3);
    orch.execute_full_turn(&india, &pakistan).unwrap();
    orch.start_turn();
    assert!(orch.environment().is_clear());
}

#[test]
fn test_missile_battery_expends_salvo() {
    let (mut orch, india, pakistan) = demo(42);
    orch.execute_full_turn(&india, &pakistan).unwrap();
    let battery = orch.units().get(&UnitId::from("IN-BRAHMOS-1")).unwrap();
    assert_eq!(battery.battery().unwrap().missiles_remaining, 4);
}

#[test]
fn test_orders_for_enemy_units_are_skipped() {
    let (mut orch, _, _) = demo(42);
    let mut india = Orders::new(Faction::India);
    india.missile_strikes.push(MissileStrikeOrder {
        battery_id: UnitId::from("PK-BABUR-1"),
        target_id: UnitId::from("IAF-AMBALA"),
        target_type: "airbase".into(),
        missiles: 4,
    });
    let pakistan = Orders::new(Faction::Pakistan);

    orch.start_turn();
    let reports = orch
        .execute_phase(warfront::Phase::Missiles, &india, &pakistan)
        .unwrap();
    assert!(reports.is_empty());
    let babur = orch.units().get(&UnitId::from("PK-BABUR-1")).unwrap();
    assert_eq!(babur.battery().unwrap().missiles_remaining, 6);
}

#[test]
fn test_unit_invariants_hold_over_many_turns() {
    let (mut orch, india, pakistan) = demo(1234);
    let mut destroyed: BTreeSet<UnitId> = BTreeSet::new();

    for _ in 0..8 {
        orch.execute_full_turn(&india, &pakistan).unwrap();
        for unit in orch.units().iter() {
            let state = &unit.state;
            assert!(state.strength_current <= state.strength_max, "{}", unit.id);
            for value in [state.organization, state.morale, state.supply_level, state.fuel, state.readiness] {
                assert!((0.0..=100.0).contains(&value), "{}: {}", unit.id, value);
            }
            assert_eq!(unit.is_destroyed(), state.strength_current == 0, "{}", unit.id);
            if destroyed.contains(&unit.id) {
                assert_eq!(unit.status, UnitStatus::Destroyed);
            }
            if unit.is_destroyed() {
                destroyed.insert(unit.id.clone());
            }
        }
    }
    assert_eq!(orch.game().history.len(), 8);
}

#[test]
fn test_same_seed_same_outcome() {
    let run = |seed| {
        let (mut orch, india, pakistan) = demo(seed);
        let mut outcomes = Vec::new();
        for _ in 0..3 {
            let record = orch.execute_full_turn(&india, &pakistan).unwrap();
            outcomes.extend(record.combat_reports.iter().map(|r| {
                (r.phase, r.attacker_id.clone(), r.defender_id.clone(), r.result)
            }));
        }
        (outcomes, orch.game().india_vp, orch.game().pakistan_vp)
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn test_game_ends_at_turn_limit() {
    let scenario = Scenario::demo();
    let config = GameConfig {
        max_turns: 2,
        ..GameConfig::default()
    };
    let mut orch = TurnOrchestrator::from_scenario(config, &scenario).unwrap();
    let (india, pakistan) = (&scenario.orders.india, &scenario.orders.pakistan);

    orch.execute_full_turn(india, pakistan).unwrap();
    assert!(!orch.is_game_over());
    orch.execute_full_turn(india, pakistan).unwrap();
    assert!(orch.is_game_over());
    assert!(orch.game().winner.is_some());

    let json = serde_json::to_value(orch.game()).unwrap();
    assert_eq!(json["history"].as_array().unwrap().len(), 2);
}
