//! Expected-round heuristic
//!
//! A planning heuristic, not a combat simulator: it folds the team's
//! average hits into one damage-per-round figure and divides enemy HP by
//! it. The coefficients are tunable and carry no game-balance derivation.

use crate::analysis::bundle::AnalysisBundle;

/// Fraction of summed average hits assumed to land usefully each round
/// (overkill, missed turns, non-maximal skill usage)
pub const DEFAULT_EFFECTIVENESS: f64 = 0.6;
pub const DEFAULT_MIN_ROUNDS: u32 = 1;
pub const DEFAULT_MAX_ROUNDS: u32 = 10;
/// Returned when there is nothing to estimate against
pub const FALLBACK_ROUNDS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundEstimator {
    pub effectiveness: f64,
    pub min_rounds: u32,
    pub max_rounds: u32,
    pub fallback_rounds: u32,
}

impl Default for RoundEstimator {
    fn default() -> Self {
        Self {
            effectiveness: DEFAULT_EFFECTIVENESS,
            min_rounds: DEFAULT_MIN_ROUNDS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            fallback_rounds: FALLBACK_ROUNDS,
        }
    }
}

impl RoundEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective team damage per round, floored at 1.0
    pub fn team_damage_per_round(&self, bundle: &AnalysisBundle) -> f64 {
        let total: f64 = bundle
            .team_estimates
            .iter()
            .map(|e| e.profile.average_hit.max(0.0))
            .sum();
        (total * self.effectiveness).max(1.0)
    }

    /// Expected rounds to defeat the enemy, clamped to `[min, max]`
    ///
    /// Returns the fallback when the bundle is absent/empty or the enemy
    /// has no positive HP. Inverted bounds are treated as swapped.
    pub fn estimate(&self, bundle: Option<&AnalysisBundle>) -> u32 {
        let bundle = match bundle {
            Some(b) if !b.is_empty() => b,
            _ => return self.fallback_rounds,
        };

        let enemy_hp = bundle.enemy.stats.hp;
        if enemy_hp.is_nan() || enemy_hp <= 0.0 {
            return self.fallback_rounds;
        }

        let (lo, hi) = self.bounds();
        let rounds = (enemy_hp / self.team_damage_per_round(bundle)).ceil();
        rounds.clamp(lo as f64, hi as f64) as u32
    }

    fn bounds(&self) -> (u32, u32) {
        (
            self.min_rounds.min(self.max_rounds),
            self.min_rounds.max(self.max_rounds),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::damage::{DamageProfile, NamedDamageProfile};

    fn bundle(enemy_hp: f64, hits: &[f64]) -> AnalysisBundle {
        let mut bundle = AnalysisBundle::default();
        bundle.enemy.stats.hp = enemy_hp;
        bundle.team_estimates = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| NamedDamageProfile {
                name: format!("c{}", i + 1),
                profile: DamageProfile {
                    average_hit: *hit,
                    burst_potential: hit * 2.0,
                },
            })
            .collect();
        bundle
    }

    #[test]
    fn test_worked_example() {
        let estimator = RoundEstimator::default();
        let b = bundle(20_000.0, &[3000.0, 2500.0]);
        assert!((estimator.team_damage_per_round(&b) - 3300.0).abs() < 1e-6);
        assert_eq!(estimator.estimate(Some(&b)), 7);
    }

    #[test]
    fn test_fallback_cases() {
        let estimator = RoundEstimator::default();
        assert_eq!(estimator.estimate(None), 2);
        assert_eq!(estimator.estimate(Some(&AnalysisBundle::default())), 2);
        assert_eq!(estimator.estimate(Some(&bundle(0.0, &[3000.0]))), 2);
        assert_eq!(estimator.estimate(Some(&bundle(-5.0, &[3000.0]))), 2);
    }

    #[test]
    fn test_clamped_to_upper_bound() {
        let estimator = RoundEstimator::default();
        assert_eq!(estimator.estimate(Some(&bundle(1_000_000.0, &[10.0]))), 10);
        // No damage at all: DPR floors at 1.0, still clamped
        assert_eq!(estimator.estimate(Some(&bundle(500.0, &[]))), 10);
    }

    #[test]
    fn test_clamped_to_lower_bound() {
        let estimator = RoundEstimator::default();
        assert_eq!(estimator.estimate(Some(&bundle(10.0, &[50_000.0]))), 1);
    }

    #[test]
    fn test_tunable_coefficients() {
        let estimator = RoundEstimator {
            effectiveness: 1.0,
            max_rounds: 20,
            ..Default::default()
        };
        assert_eq!(estimator.estimate(Some(&bundle(15_000.0, &[1000.0]))), 15);
    }

    #[test]
    fn test_inverted_bounds_swapped() {
        let estimator = RoundEstimator {
            min_rounds: 5,
            max_rounds: 3,
            ..Default::default()
        };
        assert_eq!(estimator.estimate(Some(&bundle(20_000.0, &[3000.0, 2500.0]))), 5);
        assert_eq!(estimator.estimate(Some(&bundle(10.0, &[50_000.0]))), 3);
    }
}
