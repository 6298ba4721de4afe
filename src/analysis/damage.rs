//! Average-case damage expectation per character
//!
//! This is a coarse expectation (crit folded into a single multiplier),
//! not a hit simulation and not a guaranteed damage value.

use crate::core::types::{round_to, FLAT_PRECISION};
use crate::stats::{Character, EffectiveStats};
use serde::{Deserialize, Serialize};

/// Multiplier applied to the average hit to gauge burst potential
pub const BURST_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    /// `attack * (1 + crit_rate * crit_dmg)`
    pub average_hit: f64,
    /// `average_hit * 2`
    pub burst_potential: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedDamageProfile {
    pub name: String,
    #[serde(flatten)]
    pub profile: DamageProfile,
}

pub fn damage_profile(stats: &EffectiveStats) -> DamageProfile {
    let average = stats.atk * (1.0 + stats.crit_rate * stats.crit_dmg);
    DamageProfile {
        average_hit: round_to(average, FLAT_PRECISION),
        burst_potential: round_to(average * BURST_MULTIPLIER, FLAT_PRECISION),
    }
}

/// Damage profile for every roster member, in roster order
pub fn team_estimates(characters: &[Character]) -> Vec<NamedDamageProfile> {
    characters
        .iter()
        .map(|c| NamedDamageProfile {
            name: c.name.clone(),
            profile: damage_profile(c.effective()),
        })
        .collect()
}
