//! Attribute resolution
//!
//! Character layers, in order:
//! 1. base attributes
//! 2. loadout block (percent modifiers scale the *base* value)
//! 3. relic block (same rule)
//! 4. trace bonuses: all flat entries, then all percent entries, each
//!    percent entry multiplying the running value by `(1 + fraction)`
//!
//! Afterwards crit rate is clamped to [0, 1], everything else is floored
//! at 0, and values are rounded (2 decimals flat, 4 decimals rates).
//! Crit damage, energy regen and break effect have no upper cap.

use crate::core::types::{round_to, Attribute, FLAT_PRECISION};
use crate::stats::attributes::{BaseAttributes, EffectiveStats, RelicAttributeBlock};
use crate::stats::character::TraceBonus;
use crate::stats::enemy::{EnemyBaseStats, EnemyStats};

/// Threat score weights (HP, DEF, SPD, toughness)
pub const THREAT_WEIGHT_HP: f64 = 0.001;
pub const THREAT_WEIGHT_DEF: f64 = 0.5;
pub const THREAT_WEIGHT_SPD: f64 = 0.3;
pub const THREAT_WEIGHT_TOUGHNESS: f64 = 0.2;

/// Unrounded running values, indexed by attribute
#[derive(Debug, Clone, Copy, Default)]
struct StatLine([f64; 9]);

impl StatLine {
    fn from_base(base: &BaseAttributes) -> Self {
        let mut line = Self::default();
        for attribute in Attribute::ALL {
            line.0[attribute as usize] = base.get(attribute);
        }
        line
    }

    fn get(&self, attribute: Attribute) -> f64 {
        self.0[attribute as usize]
    }

    fn add(&mut self, attribute: Attribute, amount: f64) {
        self.0[attribute as usize] += amount;
    }

    fn scale(&mut self, attribute: Attribute, factor: f64) {
        self.0[attribute as usize] *= factor;
    }

    fn apply_block(&mut self, base: &BaseAttributes, block: &RelicAttributeBlock) {
        for attribute in Attribute::ALL {
            self.add(attribute, block.contribution(attribute, base.get(attribute)));
        }
    }

    fn apply_traces(&mut self, traces: &[TraceBonus]) {
        for trace in traces {
            if let TraceBonus::Flat { attribute, amount } = trace {
                self.add(*attribute, *amount);
            }
        }
        for trace in traces {
            if let TraceBonus::PercentOf {
                attribute,
                fraction,
            } = trace
            {
                self.scale(*attribute, 1.0 + fraction);
            }
        }
    }

    fn finalize(&self) -> EffectiveStats {
        let mut stats = EffectiveStats::default();
        for attribute in Attribute::ALL {
            let raw = self.get(attribute);
            let bounded = if attribute == Attribute::CritRate {
                raw.clamp(0.0, 1.0)
            } else {
                raw.max(0.0)
            };
            stats.set(attribute, round_to(bounded, attribute.precision()));
        }
        stats
    }
}

/// Resolve a character's effective stats from its layers
///
/// Absent data is treated as zero; there are no error conditions.
pub fn resolve_character(
    base: &BaseAttributes,
    loadout: Option<&RelicAttributeBlock>,
    relics: &RelicAttributeBlock,
    traces: &[TraceBonus],
) -> EffectiveStats {
    let mut line = StatLine::from_base(base);
    if let Some(block) = loadout {
        line.apply_block(base, block);
    }
    line.apply_block(base, relics);
    line.apply_traces(traces);
    line.finalize()
}

/// Weighted linear threat estimate for an enemy
pub fn threat_score(base: &EnemyBaseStats) -> f64 {
    let score = base.hp.max(0.0) * THREAT_WEIGHT_HP
        + base.def.max(0.0) * THREAT_WEIGHT_DEF
        + base.spd.max(0.0) * THREAT_WEIGHT_SPD
        + base.toughness.max(0.0) * THREAT_WEIGHT_TOUGHNESS;
    round_to(score, FLAT_PRECISION)
}

/// Resolve an enemy: additive pass over the base block plus threat score
pub fn resolve_enemy(base: &EnemyBaseStats, weakness_coverage: usize) -> EnemyStats {
    let flat = |value: f64| round_to(value.max(0.0), FLAT_PRECISION);
    EnemyStats {
        hp: flat(base.hp),
        def: flat(base.def),
        spd: flat(base.spd),
        toughness: flat(base.toughness),
        threat: threat_score(base),
        weakness_coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseAttributes {
        BaseAttributes {
            atk: 1000.0,
            hp: 1000.0,
            def: 500.0,
            spd: 100.0,
            crit_rate: 0.05,
            crit_dmg: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_percent_modifiers_scale_base_not_running_total() {
        let loadout = RelicAttributeBlock {
            atk_percent: 0.1,
            ..Default::default()
        };
        let relics = RelicAttributeBlock {
            atk_percent: 0.2,
            atk_flat: 100.0,
            ..Default::default()
        };
        let stats = resolve_character(&base(), Some(&loadout), &relics, &[]);
        // 1000 + 1000*0.1 + 1000*0.2 + 100
        assert_eq!(stats.atk, 1400.0);
    }

    #[test]
    fn test_traces_flat_first_then_percent_of_running_value() {
        let relics = RelicAttributeBlock {
            atk_percent: 0.4,
            ..Default::default()
        };
        // Percent listed before flat: order in the list does not matter
        let traces = [
            TraceBonus::PercentOf {
                attribute: Attribute::Atk,
                fraction: 0.1,
            },
            TraceBonus::Flat {
                attribute: Attribute::Atk,
                amount: 50.0,
            },
        ];
        let stats = resolve_character(&base(), None, &relics, &traces);
        // (1000 + 400 + 50) * 1.1
        assert_eq!(stats.atk, 1595.0);
    }

    #[test]
    fn test_crit_rate_clamped_crit_dmg_uncapped() {
        let loadout = RelicAttributeBlock {
            crit_rate: 0.3,
            crit_dmg: 1.0,
            ..Default::default()
        };
        let relics = RelicAttributeBlock {
            crit_rate: 0.8,
            crit_dmg: 2.5,
            energy_regen: 1.5,
            ..Default::default()
        };
        let stats = resolve_character(&base(), Some(&loadout), &relics, &[]);
        assert_eq!(stats.crit_rate, 1.0);
        assert_eq!(stats.crit_dmg, 4.0);
        assert_eq!(stats.energy_regen, 1.5);
    }

    #[test]
    fn test_negative_modifiers_floor_at_zero() {
        let relics = RelicAttributeBlock {
            atk_flat: -5000.0,
            crit_rate: -1.0,
            spd_flat: -200.0,
            ..Default::default()
        };
        let stats = resolve_character(&base(), None, &relics, &[]);
        assert_eq!(stats.atk, 0.0);
        assert_eq!(stats.crit_rate, 0.0);
        assert_eq!(stats.spd, 0.0);
    }

    #[test]
    fn test_rounding_precision() {
        let relics = RelicAttributeBlock {
            atk_percent: 0.123456,
            crit_rate: 0.123456,
            ..Default::default()
        };
        let stats = resolve_character(&base(), None, &relics, &[]);
        assert_eq!(stats.atk, 1123.46);
        assert_eq!(stats.crit_rate, 0.1735);
    }

    #[test]
    fn test_resolution_is_reproducible() {
        let relics = RelicAttributeBlock {
            atk_percent: 0.4321,
            hp_percent: 0.1111,
            crit_dmg: 0.777,
            ..Default::default()
        };
        let traces = [TraceBonus::PercentOf {
            attribute: Attribute::Hp,
            fraction: 0.18,
        }];
        let first = resolve_character(&base(), None, &relics, &traces);
        let second = resolve_character(&base(), None, &relics, &traces);
        assert_eq!(first, second);
        assert_eq!(first.hp.to_bits(), second.hp.to_bits());
    }

    #[test]
    fn test_enemy_threat_score() {
        let base = EnemyBaseStats {
            hp: 300_000.0,
            def: 800.0,
            spd: 100.0,
            toughness: 240.0,
        };
        let stats = resolve_enemy(&base, 2);
        // 300 + 400 + 30 + 48
        assert_eq!(stats.threat, 778.0);
        assert_eq!(stats.hp, 300_000.0);
        assert_eq!(stats.weakness_coverage, 2);
    }

    #[test]
    fn test_enemy_negative_values_floor_at_zero() {
        let base = EnemyBaseStats {
            hp: -10.0,
            ..Default::default()
        };
        let stats = resolve_enemy(&base, 0);
        assert_eq!(stats.hp, 0.0);
        assert_eq!(stats.threat, 0.0);
    }
}
