//! Turn orchestrator: the eleven-phase state machine
//!
//! Owns the world (map, units, intelligence, logistics) and one seeded
//! resolver per domain. A turn is `start_turn`, every phase in
//! [`PHASE_ORDER`], then `end_turn`. Phase effects apply as they resolve and
//! are never rolled back.

use crate::combat::{
    AirResolver, ArtilleryResolver, CombatReport, DroneResolver, EwResolver, GroundResolver,
    HelicopterResolver, MissileResolver, SpecialForcesResolver,
};
use crate::core::config::GameConfig;
use crate::core::error::{Result, WarError};
use crate::orders::Orders;
use crate::scenario::Scenario;
use crate::services::{FogOfWar, GeometryService, HexMap, LogisticsSystem};
use crate::units::UnitTable;

use super::environment::EwEnvironment;
use super::phase::{Phase, TimeOfDay, PHASE_ORDER};
use super::record::{GameRecord, TurnRecord};
use super::victory::{self, VictoryLedger, VpAward};

/// Independent stream for each consumer of the master seed
pub(crate) fn derive_seed(seed: u64, stream: u64) -> u64 {
    seed ^ (stream + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// One resolver per domain
pub(super) struct Resolvers {
    pub missile: MissileResolver,
    pub ew: EwResolver,
    pub air: AirResolver,
    pub drone: DroneResolver,
    pub artillery: ArtilleryResolver,
    pub helicopter: HelicopterResolver,
    pub ground: GroundResolver,
    pub special_forces: SpecialForcesResolver,
}

impl Resolvers {
    fn seeded(config: &GameConfig) -> Self {
        let seed = config.seed;
        Self {
            missile: MissileResolver::new(derive_seed(seed, 1)),
            ew: EwResolver::new(derive_seed(seed, 2)),
            air: AirResolver::new(derive_seed(seed, 3)),
            drone: DroneResolver::new(derive_seed(seed, 4)).with_swarm_tuning(config.swarm.clone()),
            artillery: ArtilleryResolver::new(derive_seed(seed, 5)),
            helicopter: HelicopterResolver::new(derive_seed(seed, 6)),
            ground: GroundResolver::new(derive_seed(seed, 7)),
            special_forces: SpecialForcesResolver::new(derive_seed(seed, 8)),
        }
    }
}

pub struct TurnOrchestrator {
    pub(super) config: GameConfig,
    pub(super) map: HexMap,
    pub(super) units: UnitTable,
    pub(super) intel: FogOfWar,
    pub(super) logistics: LogisticsSystem,
    pub(super) environment: EwEnvironment,
    pub(super) game: GameRecord,
    pub(super) current: Option<TurnRecord>,
    pub(super) ledger: VictoryLedger,
    pub(super) resolvers: Resolvers,
}

impl TurnOrchestrator {
    pub fn new(
        config: GameConfig,
        map: HexMap,
        units: UnitTable,
        intel: FogOfWar,
        logistics: LogisticsSystem,
    ) -> Self {
        let resolvers = Resolvers::seeded(&config);
        let game = GameRecord::new(config.max_turns);
        Self {
            config,
            map,
            units,
            intel,
            logistics,
            environment: EwEnvironment::new(),
            game,
            current: None,
            ledger: VictoryLedger::new(),
            resolvers,
        }
    }

    /// Build the world from a scenario, seeding intelligence from the config
    pub fn from_scenario(config: GameConfig, scenario: &Scenario) -> Result<Self> {
        let (map, units, intel, logistics) = scenario.build(derive_seed(config.seed, 0))?;
        Ok(Self::new(config, map, units, intel, logistics))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &HexMap {
        &self.map
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut UnitTable {
        &mut self.units
    }

    pub fn intel(&self) -> &FogOfWar {
        &self.intel
    }

    pub fn logistics(&self) -> &LogisticsSystem {
        &self.logistics
    }

    pub fn environment(&self) -> &EwEnvironment {
        &self.environment
    }

    pub fn game(&self) -> &GameRecord {
        &self.game
    }

    pub fn current_turn(&self) -> Option<&TurnRecord> {
        self.current.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.game_over
    }

    /// Advance the turn counter, set day/night on the map and clear the EW
    /// environment
    pub fn start_turn(&mut self) -> &TurnRecord {
        self.game.turn += 1;
        let turn = self.game.turn;
        let time_of_day = TimeOfDay::for_turn(turn);
        self.map.set_night(time_of_day.is_night());
        self.environment.reset();

        let record = TurnRecord::new(turn, self.map.current_weather());
        tracing::info!(
            "Turn {} started (day {}, {}, {})",
            turn,
            record.day,
            time_of_day.as_str(),
            record.weather.as_str()
        );
        self.current.insert(record)
    }

    /// Run one phase. `first` holds the orders of `FACTION_ORDER[0]`,
    /// `second` those of `FACTION_ORDER[1]`.
    pub fn execute_phase(
        &mut self,
        phase: Phase,
        first: &Orders,
        second: &Orders,
    ) -> Result<Vec<CombatReport>> {
        let Some(record) = self.current.as_mut() else {
            return Err(WarError::TurnNotStarted);
        };
        record.current_phase = phase;

        let orders = [first, second];
        let mut reports = match phase {
            Phase::Intelligence => self.intelligence_phase(),
            Phase::Missiles => self.missile_phase(orders),
            Phase::ElectronicWarfare => self.ew_phase(orders),
            Phase::Air => self.air_phase(orders),
            Phase::Drones => self.drone_phase(orders),
            Phase::Artillery => self.artillery_phase(orders),
            Phase::Helicopters => self.helicopter_phase(orders),
            Phase::Ground => self.ground_phase(orders),
            Phase::SpecialForces => self.special_forces_phase(orders),
            Phase::Logistics => self.logistics_phase(),
            Phase::Recovery => self.recovery_phase(),
        };

        let turn = self.game.turn;
        for report in &mut reports {
            report.turn = turn;
        }

        tracing::debug!("Phase {} produced {} reports", phase, reports.len());
        for report in &reports {
            tracing::trace!(
                phase = report.phase.as_str(),
                attacker = %report.attacker_id,
                defender = %report.defender_id,
                result = report.result.as_str(),
                "{}",
                report.headline().unwrap_or("")
            );
        }

        if let Some(record) = self.current.as_mut() {
            record.phase_complete.insert(phase, true);
            record.combat_reports.extend(reports.iter().cloned());
        }
        Ok(reports)
    }

    /// Score the turn, check for game end and archive the record
    pub fn end_turn(&mut self) -> Result<TurnRecord> {
        if self.current.is_none() {
            return Err(WarError::TurnNotStarted);
        }
        let award = self.calculate_victory_points();
        self.check_victory();

        let record = self.current.clone().ok_or(WarError::TurnNotStarted)?;
        if !record.is_complete() {
            tracing::warn!("Turn {} ended with phases still pending", record.turn);
        }
        tracing::info!(
            "Turn {} ended: india +{} ({}), pakistan +{} ({})",
            record.turn,
            award.india,
            self.game.india_vp,
            award.pakistan,
            self.game.pakistan_vp
        );
        self.game.history.push(record.clone());
        Ok(record)
    }

    /// Start a turn, run all eleven phases in order and end it
    pub fn execute_full_turn(&mut self, first: &Orders, second: &Orders) -> Result<TurnRecord> {
        self.start_turn();
        for phase in PHASE_ORDER {
            self.execute_phase(phase, first, second)?;
        }
        self.end_turn()
    }

    /// Award points for the current turn's reports and for newly destroyed
    /// units. Safe to call repeatedly.
    pub fn calculate_victory_points(&mut self) -> VpAward {
        let Some(record) = self.current.as_ref() else {
            return VpAward::default();
        };
        self.ledger.award(
            &record.combat_reports,
            &self.units,
            &self.config.victory_points,
            &mut self.game,
        )
    }

    /// Returns true once the game is over
    pub fn check_victory(&mut self) -> bool {
        let was_over = self.game.game_over;
        let over = victory::check_victory(&mut self.game);
        if over && !was_over {
            tracing::info!(
                "Game over after turn {}: winner {:?} (india {}, pakistan {})",
                self.game.turn,
                self.game.winner,
                self.game.india_vp,
                self.game.pakistan_vp
            );
        }
        over
    }

    /// Current weather modifiers, night included
    pub fn weather(&self) -> crate::services::WeatherModifiers {
        self.map.weather()
    }
}
