//! Turn and game records

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::phase::{day_number, Phase, TimeOfDay, PHASE_ORDER};
use crate::combat::report::CombatReport;
use crate::core::types::{Faction, Turn, UnitId};
use crate::services::geometry::Weather;

/// Everything that happened in one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: Turn,
    pub day: u32,
    pub time_of_day: TimeOfDay,
    pub weather: Weather,
    /// Last phase started
    pub current_phase: Phase,
    pub phase_complete: BTreeMap<Phase, bool>,
    pub combat_reports: Vec<CombatReport>,
    pub units_in_combat: BTreeSet<UnitId>,
}

impl TurnRecord {
    pub fn new(turn: Turn, weather: Weather) -> Self {
        Self {
            turn,
            day: day_number(turn),
            time_of_day: TimeOfDay::for_turn(turn),
            weather,
            current_phase: Phase::Intelligence,
            phase_complete: PHASE_ORDER.iter().map(|p| (*p, false)).collect(),
            combat_reports: Vec::new(),
            units_in_combat: BTreeSet::new(),
        }
    }

    pub fn is_phase_complete(&self, phase: Phase) -> bool {
        self.phase_complete.get(&phase).copied().unwrap_or(false)
    }

    /// All eleven phases have run
    pub fn is_complete(&self) -> bool {
        PHASE_ORDER.iter().all(|p| self.is_phase_complete(*p))
    }

    /// Reports whose phase string starts with `prefix` ("air" matches
    /// "air_to_air", "air_strike", ...)
    pub fn reports_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a CombatReport> {
        self.combat_reports
            .iter()
            .filter(move |r| r.phase.as_str().starts_with(prefix))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    India,
    Pakistan,
    Draw,
}

impl From<Faction> for Winner {
    fn from(faction: Faction) -> Self {
        match faction {
            Faction::India => Self::India,
            Faction::Pakistan => Self::Pakistan,
        }
    }
}

/// Cumulative game standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub turn: Turn,
    pub max_turns: u32,
    pub india_vp: u32,
    pub pakistan_vp: u32,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub history: Vec<TurnRecord>,
}

impl GameRecord {
    pub fn new(max_turns: u32) -> Self {
        Self {
            turn: 0,
            max_turns,
            india_vp: 0,
            pakistan_vp: 0,
            game_over: false,
            winner: None,
            history: Vec::new(),
        }
    }

    pub fn vp(&self, faction: Faction) -> u32 {
        match faction {
            Faction::India => self.india_vp,
            Faction::Pakistan => self.pakistan_vp,
        }
    }

    pub fn add_vp(&mut self, faction: Faction, points: u32) {
        match faction {
            Faction::India => self.india_vp += points,
            Faction::Pakistan => self.pakistan_vp += points,
        }
    }
}
