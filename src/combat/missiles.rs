//! Missile strikes: layered interception, then leaked-missile damage
//!
//! Interception is sequential. Each SAM in the order supplied takes its
//! shots at whatever is still inbound, two interceptor rounds per attempt.

use serde::{Deserialize, Serialize};

use super::air_defense::SamEntry;
use super::base::CombatRng;
use super::report::{CombatReport, CombatResult, ReportPhase};
use crate::core::types::UnitId;
use crate::units::AirbaseDamage;

/// Interceptor rounds spent per intercept attempt
pub const ROUNDS_PER_INTERCEPT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedClass {
    Subsonic,
    Supersonic,
    QuasiBallistic,
    Ballistic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileStats {
    pub accuracy: f32,
    pub damage: f32,
    pub speed: SpeedClass,
    /// 0-100, how easily defenders track the missile
    pub detectability: f32,
}

impl MissileStats {
    const fn new(accuracy: f32, damage: f32, speed: SpeedClass, detectability: f32) -> Self {
        Self {
            accuracy,
            damage,
            speed,
            detectability,
        }
    }

    /// Stats by missile type; unknown types get a generic subsonic cruise missile
    pub fn lookup(missile_type: &str) -> Self {
        use SpeedClass::*;
        match missile_type.to_lowercase().as_str() {
            "brahmos" => Self::new(90.0, 95.0, Supersonic, 60.0),
            "nirbhay" => Self::new(85.0, 80.0, Subsonic, 40.0),
            "babur" => Self::new(85.0, 75.0, Subsonic, 35.0),
            "raad" => Self::new(80.0, 70.0, Subsonic, 30.0),
            "prithvi" => Self::new(70.0, 90.0, Ballistic, 80.0),
            "pralay" => Self::new(85.0, 85.0, QuasiBallistic, 70.0),
            "shaheen" => Self::new(75.0, 90.0, Ballistic, 85.0),
            "ghaznavi" => Self::new(70.0, 85.0, Ballistic, 80.0),
            _ => Self::new(75.0, 70.0, Subsonic, 50.0),
        }
    }
}

/// Intercept probability of a SAM system against a speed class.
/// Unknown systems intercept at 0.5.
pub fn sam_effectiveness(system_type: &str, speed: SpeedClass) -> f32 {
    // (subsonic, supersonic, quasi-ballistic, ballistic)
    let row = match system_type.to_lowercase().as_str() {
        "s400" => [0.95, 0.35, 0.45, 0.40],
        "barak8" | "mrsam" => [0.88, 0.10, 0.30, 0.25],
        "akash" => [0.75, 0.03, 0.12, 0.05],
        "spyder" => [0.80, 0.03, 0.08, 0.03],
        "hq9" => [0.80, 0.0, 0.20, 0.15],
        "hq16" => [0.70, 0.0, 0.08, 0.05],
        "spada2000" => [0.65, 0.0, 0.03, 0.01],
        "fm90" => [0.55, 0.0, 0.01, 0.01],
        _ => return 0.5,
    };
    match speed {
        SpeedClass::Subsonic => row[0],
        SpeedClass::Supersonic => row[1],
        SpeedClass::QuasiBallistic => row[2],
        SpeedClass::Ballistic => row[3],
    }
}

/// Per-attempt intercept probability after EW and detection scaling
pub fn intercept_probability(system_type: &str, stats: &MissileStats, ew_modifier: f32) -> f32 {
    let detect = (stats.detectability / 100.0 * 1.5).min(1.0);
    sam_effectiveness(system_type, stats.speed) * ew_modifier * detect
}

/// Damage needed to destroy a target class
pub fn target_hardness(target_type: &str) -> f32 {
    match target_type {
        "airbase" => 80.0,
        "sam_site" => 50.0,
        "radar" => 30.0,
        "c2" => 70.0,
        "logistics" => 40.0,
        "ground_unit" => 40.0,
        _ => 60.0,
    }
}

/// A salvo on its way to a target
#[derive(Debug, Clone, PartialEq)]
pub struct MissileStrike {
    pub battery_id: UnitId,
    pub target_id: UnitId,
    pub target_type: String,
    pub missiles_fired: u32,
    pub missile_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterceptionResult {
    pub missiles_incoming: u32,
    pub missiles_intercepted: u32,
    pub missiles_leaked: u32,
    pub interceptor_rounds_used: u32,
}

#[derive(Debug, Clone)]
pub struct MissileOutcome {
    pub report: CombatReport,
    pub interception: InterceptionResult,
    pub hits: u32,
    pub total_damage: f32,
}

/// Missile-domain resolver
#[derive(Debug, Clone)]
pub struct MissileResolver {
    rng: CombatRng,
}

impl MissileResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: CombatRng::seeded(seed),
        }
    }

    pub fn resolve_strike(
        &mut self,
        strike: &MissileStrike,
        defending_sams: &[SamEntry],
        target_hardness: f32,
        weather_modifier: f32,
        ew_modifier: f32,
    ) -> MissileOutcome {
        let stats = MissileStats::lookup(&strike.missile_type);

        let interception =
            self.resolve_interception(strike.missiles_fired, &stats, defending_sams, ew_modifier);

        let mut hits = 0;
        let mut total_damage = 0.0;
        for _ in 0..interception.missiles_leaked {
            let hit_chance = stats.accuracy / 100.0 * weather_modifier;
            if self.rng.hit_check(hit_chance) {
                hits += 1;
                total_damage += self.rng.roll(stats.damage, 0.15);
            }
        }

        let damage_ratio = total_damage / target_hardness.max(1.0);
        let result = CombatResult::from_effectiveness(damage_ratio, hits > 0);

        let report = CombatReport::new(
            strike.battery_id.clone(),
            strike.target_id.clone(),
            ReportPhase::Missiles,
            result,
        )
        .attacker_loss("missiles_fired", strike.missiles_fired)
        .defender_loss("missiles_intercepted", interception.missiles_intercepted)
        .defender_loss("damage_taken", total_damage)
        .note(format!("Fired {} {}", strike.missiles_fired, strike.missile_type))
        .note(format!(
            "Intercepted {}, {} leaked",
            interception.missiles_intercepted, interception.missiles_leaked
        ))
        .note(format!("Hits: {}, Total damage: {:.1}", hits, total_damage));

        MissileOutcome {
            report,
            interception,
            hits,
            total_damage,
        }
    }

    /// Sequential interception. Accounting always satisfies
    /// `incoming == intercepted + leaked`.
    pub fn resolve_interception(
        &mut self,
        missiles_incoming: u32,
        stats: &MissileStats,
        defending_sams: &[SamEntry],
        ew_modifier: f32,
    ) -> InterceptionResult {
        let mut remaining = missiles_incoming;
        let mut intercepted = 0;
        let mut rounds_used = 0;

        for sam in defending_sams {
            if remaining == 0 {
                break;
            }
            if !sam.ready || sam.rounds == 0 {
                continue;
            }

            let pk = intercept_probability(&sam.system_type, stats, ew_modifier);
            let mut rounds = sam.rounds.min(remaining * ROUNDS_PER_INTERCEPT);
            rounds_used += rounds;

            let attempts = remaining;
            for _ in 0..attempts {
                if rounds < ROUNDS_PER_INTERCEPT {
                    break;
                }
                rounds -= ROUNDS_PER_INTERCEPT;
                if self.rng.hit_check(pk) {
                    intercepted += 1;
                    remaining -= 1;
                }
            }
            tracing::trace!(sam = %sam.system_type, pk, remaining, "interception layer");
        }

        InterceptionResult {
            missiles_incoming,
            missiles_intercepted: intercepted,
            missiles_leaked: remaining,
            interceptor_rounds_used: rounds_used,
        }
    }

    /// Split strike damage across airbase components
    pub fn airbase_damage(&mut self, damage: f32) -> AirbaseDamage {
        AirbaseDamage {
            runway: damage * 0.4 * self.rng.roll(1.0, 0.3),
            fuel: damage * 0.2 * self.rng.roll(1.0, 0.3),
            ammo: damage * 0.15 * self.rng.roll(1.0, 0.3),
            shelters: damage * 0.15 * self.rng.roll(1.0, 0.3),
            maintenance: damage * 0.1 * self.rng.roll(1.0, 0.3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(count: u32, missile: &str) -> MissileStrike {
        MissileStrike {
            battery_id: "BATTERY".into(),
            target_id: "TARGET".into(),
            target_type: "sam_site".into(),
            missiles_fired: count,
            missile_type: missile.into(),
        }
    }

    #[test]
    fn test_no_sams_everything_leaks() {
        let mut resolver = MissileResolver::new(7);
        let outcome = resolver.resolve_strike(&strike(4, "babur"), &[], 50.0, 1.0, 1.0);
        assert_eq!(outcome.interception.missiles_leaked, 4);
        assert_eq!(outcome.interception.missiles_intercepted, 0);
        assert_eq!(outcome.report.phase, ReportPhase::Missiles);
        assert_eq!(outcome.report.headline(), Some("Fired 4 babur"));
    }

    #[test]
    fn test_supersonic_immune_to_hq9() {
        let mut resolver = MissileResolver::new(11);
        let sams = vec![SamEntry::new("hq9", 40), SamEntry::new("hq16", 40)];
        for _ in 0..20 {
            let outcome = resolver.resolve_strike(&strike(6, "brahmos"), &sams, 50.0, 1.0, 1.0);
            assert_eq!(outcome.interception.missiles_intercepted, 0);
        }
    }

    #[test]
    fn test_rounds_limit_attempts() {
        let mut resolver = MissileResolver::new(3);
        let stats = MissileStats::lookup("babur");
        // Three rounds allow a single attempt
        let sams = vec![SamEntry::new("s400", 3)];
        let result = resolver.resolve_interception(5, &stats, &sams, 1.0);
        assert!(result.missiles_intercepted <= 1);
        assert_eq!(result.missiles_intercepted + result.missiles_leaked, 5);
    }

    #[test]
    fn test_unready_sam_skipped() {
        let mut resolver = MissileResolver::new(3);
        let stats = MissileStats::lookup("babur");
        let mut sam = SamEntry::new("s400", 40);
        sam.ready = false;
        let result = resolver.resolve_interception(5, &stats, &[sam], 1.0);
        assert_eq!(result.missiles_leaked, 5);
        assert_eq!(result.interceptor_rounds_used, 0);
    }

    #[test]
    fn test_intercept_probability_scaling() {
        let stats = MissileStats::lookup("babur");
        // 0.95 * 1.0 * min(1, 0.35 * 1.5)
        let pk = intercept_probability("s400", &stats, 1.0);
        assert!((pk - 0.95 * 0.525).abs() < 1e-4);
        assert_eq!(intercept_probability("s400", &stats, 0.0), 0.0);
    }

    #[test]
    fn test_unknown_tables() {
        assert_eq!(sam_effectiveness("nike", SpeedClass::Ballistic), 0.5);
        assert_eq!(MissileStats::lookup("mystery").accuracy, 75.0);
        assert_eq!(target_hardness("airbase"), 80.0);
        assert_eq!(target_hardness("bridge"), 60.0);
    }

    #[test]
    fn test_airbase_damage_split() {
        let mut resolver = MissileResolver::new(5);
        let damage = resolver.airbase_damage(100.0);
        assert!((28.0..=52.0).contains(&damage.runway));
        assert!((7.0..=13.0).contains(&damage.maintenance));
    }
}
