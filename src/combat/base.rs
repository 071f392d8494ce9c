//! Shared combat primitives
//!
//! A seedable random source plus the pure formulas every domain reuses.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::report::CombatResult;

/// Clamp a probability into [0, 1]. NaN becomes 0.
pub fn clamp_probability(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Seedable random source owned by each resolver
#[derive(Debug, Clone)]
pub struct CombatRng {
    rng: ChaCha8Rng,
}

impl CombatRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in [low, high]
    pub fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// Multiplicatively perturb `base` by up to +/- `variance`
    pub fn roll(&mut self, base: f32, variance: f32) -> f32 {
        base * (1.0 + self.uniform(-variance, variance))
    }

    /// Bernoulli draw. The probability is clamped into [0, 1] first.
    pub fn hit_check(&mut self, p: f32) -> bool {
        let p = clamp_probability(p);
        let hit = self.rng.gen::<f32>() < p;
        tracing::trace!(p, hit, "hit check");
        hit
    }

    /// Integer draw in [low, high]
    pub fn randint(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// Damage after armor reduction, a critical-hit check and a +/-20% roll
    pub fn calculate_damage(&mut self, base_damage: f32, armor: f32, critical_chance: f32) -> f32 {
        let mut damage = base_damage * (100.0 / (100.0 + armor.max(0.0)));
        if self.hit_check(critical_chance) {
            damage *= 1.5;
        }
        self.roll(damage, 0.2)
    }
}

/// Hit probability clamped to [0.05, 0.95]
pub fn calculate_hit_chance(
    attacker_skill: f32,
    defender_evasion: f32,
    range_modifier: f32,
    weather_modifier: f32,
    ecm_modifier: f32,
) -> f32 {
    let base = attacker_skill / 100.0;
    // Evasion at 100 halves the chance
    let evasion = defender_evasion / 200.0;
    let chance = base * (1.0 - evasion) * range_modifier * weather_modifier * ecm_modifier;
    if chance.is_nan() {
        return 0.05;
    }
    chance.clamp(0.05, 0.95)
}

/// Score-ratio outcome classifier
pub fn determine_result(attacker_score: f32, defender_score: f32) -> CombatResult {
    let ratio = attacker_score / defender_score.max(1.0);

    if ratio >= 3.0 {
        CombatResult::DecisiveVictory
    } else if ratio >= 1.5 {
        CombatResult::Victory
    } else if ratio >= 1.1 {
        CombatResult::Marginal
    } else if ratio >= 0.9 {
        CombatResult::Stalemate
    } else if ratio >= 0.67 {
        CombatResult::Defeat
    } else {
        CombatResult::DecisiveDefeat
    }
}

/// Suppression from firepower, halved at full concealment
pub fn calculate_suppression(firepower: f32, target_concealment: f32) -> f32 {
    let base = firepower * 0.5;
    let concealment_reduction = target_concealment / 100.0 * 0.5;
    base * (1.0 - concealment_reduction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_result_thresholds() {
        assert_eq!(determine_result(300.0, 100.0), CombatResult::DecisiveVictory);
        assert_eq!(determine_result(150.0, 100.0), CombatResult::Victory);
        assert_eq!(determine_result(110.0, 100.0), CombatResult::Marginal);
        assert_eq!(determine_result(90.0, 100.0), CombatResult::Stalemate);
        assert_eq!(determine_result(67.0, 100.0), CombatResult::Defeat);
        assert_eq!(determine_result(66.0, 100.0), CombatResult::DecisiveDefeat);
    }

    #[test]
    fn test_determine_result_guards_zero_defender() {
        assert_eq!(determine_result(3.0, 0.0), CombatResult::DecisiveVictory);
        assert_eq!(determine_result(0.0, 0.0), CombatResult::DecisiveDefeat);
    }

    #[test]
    fn test_hit_chance_clamped() {
        assert_eq!(calculate_hit_chance(200.0, 0.0, 1.0, 1.0, 1.0), 0.95);
        assert_eq!(calculate_hit_chance(1.0, 100.0, 0.1, 0.1, 0.1), 0.05);
        let mid = calculate_hit_chance(80.0, 40.0, 1.0, 1.0, 1.0);
        assert!((mid - 0.64).abs() < 0.001);
    }

    #[test]
    fn test_hit_check_extremes() {
        let mut rng = CombatRng::seeded(1);
        for _ in 0..100 {
            assert!(!rng.hit_check(0.0));
            assert!(rng.hit_check(1.0));
            assert!(!rng.hit_check(-3.0));
            assert!(rng.hit_check(7.0));
            assert!(!rng.hit_check(f32::NAN));
        }
    }

    #[test]
    fn test_roll_within_variance() {
        let mut rng = CombatRng::seeded(2);
        for _ in 0..200 {
            let v = rng.roll(100.0, 0.2);
            assert!((80.0..=120.0).contains(&v));
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = CombatRng::seeded(99);
        let mut b = CombatRng::seeded(99);
        for _ in 0..20 {
            assert_eq!(a.roll(10.0, 0.5), b.roll(10.0, 0.5));
        }
    }

    #[test]
    fn test_damage_armor_reduction() {
        let mut rng = CombatRng::seeded(3);
        for _ in 0..50 {
            // 100 * 100/200 = 50, crit at most 75, +/-20%
            let d = rng.calculate_damage(100.0, 100.0, 0.1);
            assert!((40.0..=90.0).contains(&d));
        }
    }

    #[test]
    fn test_suppression() {
        assert_eq!(calculate_suppression(100.0, 0.0), 50.0);
        assert_eq!(calculate_suppression(100.0, 100.0), 25.0);
    }

    #[test]
    fn test_clamp_probability() {
        assert_eq!(clamp_probability(1.5), 1.0);
        assert_eq!(clamp_probability(-0.1), 0.0);
        assert_eq!(clamp_probability(f32::NAN), 0.0);
    }
}
