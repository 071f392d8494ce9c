//! Victory-point accounting
//!
//! Awards are idempotent: a report is scored at most once (tracked by id)
//! and a destroyed unit pays its destruction bonus at most once.

use std::collections::BTreeSet;

use super::record::{GameRecord, Winner};
use crate::combat::report::{CombatReport, CombatResult};
use crate::core::config::VictoryPointTable;
use crate::core::types::{Faction, ReportId, UnitId};
use crate::units::UnitTable;

/// Points awarded by one scoring pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VpAward {
    pub india: u32,
    pub pakistan: u32,
}

impl VpAward {
    fn add(&mut self, faction: Faction, points: u32) {
        match faction {
            Faction::India => self.india += points,
            Faction::Pakistan => self.pakistan += points,
        }
    }

    pub fn total(&self) -> u32 {
        self.india + self.pakistan
    }
}

/// Points for reaching a result tier
pub fn tier_points(result: CombatResult, table: &VictoryPointTable) -> u32 {
    match result {
        CombatResult::DecisiveVictory => table.decisive_victory,
        CombatResult::Victory => table.victory,
        CombatResult::Marginal => table.marginal,
        _ => 0,
    }
}

#[derive(Debug, Clone, Default)]
pub struct VictoryLedger {
    processed_reports: BTreeSet<ReportId>,
    destroyed_counted: BTreeSet<UnitId>,
}

impl VictoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score every unprocessed report, then every newly destroyed unit
    pub fn award(
        &mut self,
        reports: &[CombatReport],
        units: &UnitTable,
        table: &VictoryPointTable,
        game: &mut GameRecord,
    ) -> VpAward {
        let mut award = VpAward::default();

        for report in reports {
            if !self.processed_reports.insert(report.id) {
                continue;
            }
            if report.phase.is_informational() {
                continue;
            }

            let attacker = units.get(&report.attacker_id);
            let Some(faction) = attacker.map(|u| u.faction).or(report.faction) else {
                continue;
            };

            let points = tier_points(report.result, table);
            if points == 0 {
                continue;
            }
            award.add(faction, points);

            if attacker.is_some() && points >= table.victory {
                if report.phase.is_sead() {
                    award.add(faction, table.sead_bonus);
                }
                if report.phase.is_special_forces() {
                    award.add(faction, table.special_forces_bonus);
                }
            }
        }

        for unit in units.iter() {
            if unit.is_destroyed() && self.destroyed_counted.insert(unit.id.clone()) {
                award.add(unit.faction.opponent(), table.destruction_bonus(unit.category));
            }
        }

        game.add_vp(Faction::India, award.india);
        game.add_vp(Faction::Pakistan, award.pakistan);
        award
    }

    pub fn is_processed(&self, id: &ReportId) -> bool {
        self.processed_reports.contains(id)
    }

    pub fn destroyed_counted(&self) -> usize {
        self.destroyed_counted.len()
    }
}

/// End the game once the turn limit is reached. Returns true when the game
/// is over.
pub fn check_victory(game: &mut GameRecord) -> bool {
    if game.turn < game.max_turns {
        return false;
    }
    game.game_over = true;
    game.winner = Some(match game.india_vp.cmp(&game.pakistan_vp) {
        std::cmp::Ordering::Greater => Winner::India,
        std::cmp::Ordering::Less => Winner::Pakistan,
        std::cmp::Ordering::Equal => Winner::Draw,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::report::ReportPhase;
    use crate::units::{Unit, UnitCategory};

    fn table() -> UnitTable {
        let mut units = UnitTable::new();
        units.insert(Unit::new("IAF-1", Faction::India, UnitCategory::Aircraft, "rafale", 18));
        units.insert(Unit::new("PAF-SAM", Faction::Pakistan, UnitCategory::AirDefense, "hq9", 8));
        units
    }

    #[test]
    fn test_tier_award_and_sead_bonus() {
        let units = table();
        let vp = VictoryPointTable::default();
        let mut game = GameRecord::new(16);
        let mut ledger = VictoryLedger::new();

        let reports = vec![CombatReport::new(
            "IAF-1",
            "PAF-SAM",
            ReportPhase::AirSead,
            CombatResult::Victory,
        )];
        let award = ledger.award(&reports, &units, &vp, &mut game);
        assert_eq!(award.india, 3 + 2);
        assert_eq!(game.india_vp, 5);
    }

    #[test]
    fn test_award_is_idempotent() {
        let mut units = table();
        let vp = VictoryPointTable::default();
        let mut game = GameRecord::new(16);
        let mut ledger = VictoryLedger::new();

        if let Some(sam) = units.get_mut(&UnitId::from("PAF-SAM")) {
            sam.take_losses(8, 0.0);
        }
        let reports = vec![CombatReport::new(
            "IAF-1",
            "PAF-SAM",
            ReportPhase::AirStrike,
            CombatResult::DecisiveVictory,
        )];

        let first = ledger.award(&reports, &units, &vp, &mut game);
        assert_eq!(first.india, 5 + vp.destroyed_air_defense);
        let second = ledger.award(&reports, &units, &vp, &mut game);
        assert_eq!(second.total(), 0);
        assert_eq!(game.india_vp, 5 + vp.destroyed_air_defense);
        assert_eq!(ledger.destroyed_counted(), 1);
    }

    #[test]
    fn test_later_calls_score_only_new_reports() {
        let units = table();
        let vp = VictoryPointTable::default();
        let mut game = GameRecord::new(16);
        let mut ledger = VictoryLedger::new();

        let first = CombatReport::new("IAF-1", "PAF-SAM", ReportPhase::AirStrike, CombatResult::Victory);
        let second = CombatReport::new("IAF-1", "PAF-SAM", ReportPhase::AirStrike, CombatResult::Marginal);

        ledger.award(std::slice::from_ref(&first), &units, &vp, &mut game);
        let award = ledger.award(&[second, first], &units, &vp, &mut game);
        assert_eq!(award.india, vp.marginal);
        assert_eq!(game.india_vp, vp.victory + vp.marginal);
    }

    #[test]
    fn test_informational_and_unowned_reports_score_nothing() {
        let units = table();
        let vp = VictoryPointTable::default();
        let mut game = GameRecord::new(16);
        let mut ledger = VictoryLedger::new();

        let reports = vec![
            CombatReport::new("IAF-1", "airspace", ReportPhase::AirCap, CombatResult::Victory),
            CombatReport::new("ghost", "x", ReportPhase::Ground, CombatResult::Victory),
            CombatReport::new("ghost", "x", ReportPhase::Ground, CombatResult::Victory)
                .with_faction(Faction::Pakistan),
        ];
        let award = ledger.award(&reports, &units, &vp, &mut game);
        assert_eq!(award.india, 0);
        // Faction fallback scores the tier, never the bonuses
        assert_eq!(award.pakistan, 3);
    }

    #[test]
    fn test_check_victory() {
        let mut game = GameRecord::new(4);
        game.turn = 3;
        assert!(!check_victory(&mut game));
        game.turn = 4;
        game.pakistan_vp = 7;
        assert!(check_victory(&mut game));
        assert_eq!(game.winner, Some(Winner::Pakistan));

        let mut tied = GameRecord::new(1);
        tied.turn = 1;
        check_victory(&mut tied);
        assert_eq!(tied.winner, Some(Winner::Draw));
    }
}
