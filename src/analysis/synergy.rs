//! Team composition metrics against a specific enemy

use crate::core::types::{round_to, FLAT_PRECISION, RATE_PRECISION};
use crate::stats::{Character, Enemy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynergyMetrics {
    pub element_counts: BTreeMap<String, usize>,
    pub path_counts: BTreeMap<String, usize>,
    /// Roster members whose element is one of the enemy's weaknesses
    pub weakness_match_names: Vec<String>,
    /// `|matches| / max(1, roster size)`, always within [0, 1]
    pub weakness_match_ratio: f64,
    /// Mean enemy resistance over the elements the team actually fields
    pub avg_enemy_resistance_vs_team: f64,
    pub avg_speed: f64,
    pub max_speed: f64,
}

pub fn synergy(roster: &[Character], enemy: &Enemy) -> SynergyMetrics {
    let mut element_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut path_counts: BTreeMap<String, usize> = BTreeMap::new();
    for character in roster {
        *element_counts.entry(character.element.clone()).or_default() += 1;
        *path_counts.entry(character.path.clone()).or_default() += 1;
    }

    let weakness_match_names: Vec<String> = roster
        .iter()
        .filter(|c| enemy.is_weak_to(&c.element))
        .map(|c| c.name.clone())
        .collect();
    let weakness_match_ratio =
        weakness_match_names.len() as f64 / roster.len().max(1) as f64;

    let avg_enemy_resistance_vs_team = if element_counts.is_empty() {
        0.0
    } else {
        let total: f64 = element_counts
            .keys()
            .map(|element| enemy.resistance(element))
            .sum();
        total / element_counts.len() as f64
    };

    let speeds: Vec<f64> = roster.iter().map(|c| c.effective().spd).collect();
    let avg_speed = if speeds.is_empty() {
        0.0
    } else {
        speeds.iter().sum::<f64>() / speeds.len() as f64
    };
    let max_speed = speeds.iter().copied().fold(0.0, f64::max);

    SynergyMetrics {
        element_counts,
        path_counts,
        weakness_match_names,
        weakness_match_ratio: round_to(weakness_match_ratio, RATE_PRECISION),
        avg_enemy_resistance_vs_team: round_to(avg_enemy_resistance_vs_team, RATE_PRECISION),
        avg_speed: round_to(avg_speed, FLAT_PRECISION),
        max_speed: round_to(max_speed, FLAT_PRECISION),
    }
}
