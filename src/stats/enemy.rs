//! Enemy records and their derived metrics

use crate::stats::resolver::resolve_enemy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base attributes of an enemy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyBaseStats {
    pub hp: f64,
    #[serde(alias = "defense")]
    pub def: f64,
    #[serde(alias = "speed")]
    pub spd: f64,
    pub toughness: f64,
}

/// Loosely-typed enemy record at the configuration boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub name: String,
    pub level: u32,
    pub base_stats: EnemyBaseStats,
    #[serde(alias = "weakness")]
    pub weaknesses: Vec<String>,
    /// Positive = resistance, negative = vulnerability
    pub resistances: BTreeMap<String, f64>,
    #[serde(alias = "special_buffs")]
    pub buffs: Vec<String>,
    pub notes: Option<String>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            name: "unknown".into(),
            level: 90,
            base_stats: EnemyBaseStats::default(),
            weaknesses: Vec::new(),
            resistances: BTreeMap::new(),
            buffs: Vec::new(),
            notes: None,
        }
    }
}

/// Resolved enemy attributes plus advisory metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: f64,
    pub def: f64,
    pub spd: f64,
    pub toughness: f64,
    /// Advisory only; never used in planning math
    pub threat: f64,
    pub weakness_coverage: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub name: String,
    pub level: u32,
    pub weaknesses: Vec<String>,
    pub resistances: BTreeMap<String, f64>,
    pub buffs: Vec<String>,
    pub notes: Option<String>,
    base: EnemyBaseStats,
    effective: EnemyStats,
}

impl Enemy {
    pub fn new(name: impl Into<String>, base: EnemyBaseStats) -> Self {
        let mut enemy = Self {
            name: name.into(),
            level: 90,
            weaknesses: Vec::new(),
            resistances: BTreeMap::new(),
            buffs: Vec::new(),
            notes: None,
            base,
            effective: EnemyStats::default(),
        };
        enemy.refresh();
        enemy
    }

    pub fn from_config(config: &EnemyConfig) -> Self {
        let mut enemy = Self {
            name: config.name.clone(),
            level: config.level,
            weaknesses: config.weaknesses.clone(),
            resistances: config.resistances.clone(),
            buffs: config.buffs.clone(),
            notes: config.notes.clone(),
            base: config.base_stats.clone(),
            effective: EnemyStats::default(),
        };
        enemy.refresh();
        enemy
    }

    /// Stand-in used when no enemy data was supplied
    pub fn unknown() -> Self {
        Self::from_config(&EnemyConfig::default())
    }

    pub fn with_weaknesses(mut self, weaknesses: Vec<String>) -> Self {
        self.weaknesses = weaknesses;
        self.refresh();
        self
    }

    pub fn with_resistance(mut self, element: impl Into<String>, value: f64) -> Self {
        self.resistances.insert(element.into(), value);
        self
    }

    pub fn with_buffs(mut self, buffs: Vec<String>) -> Self {
        self.buffs = buffs;
        self
    }

    pub fn set_base(&mut self, base: EnemyBaseStats) {
        self.base = base;
        self.refresh();
    }

    pub fn base(&self) -> &EnemyBaseStats {
        &self.base
    }

    pub fn effective(&self) -> &EnemyStats {
        &self.effective
    }

    /// True when the enemy carries no identifying data
    pub fn is_unknown(&self) -> bool {
        let name = self.name.trim();
        name.is_empty() || name.eq_ignore_ascii_case("unknown")
    }

    /// Case-insensitive weakness check
    pub fn is_weak_to(&self, element: &str) -> bool {
        let element = element.trim();
        self.weaknesses
            .iter()
            .any(|w| w.trim().eq_ignore_ascii_case(element))
    }

    /// Signed resistance against an element, 0 when not listed
    pub fn resistance(&self, element: &str) -> f64 {
        let element = element.trim();
        self.resistances
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(element))
            .map(|(_, value)| *value)
            .unwrap_or(0.0)
    }

    fn refresh(&mut self) {
        self.effective = resolve_enemy(&self.base, self.weaknesses.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_config_defaults() {
        let config: EnemyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.name, "unknown");
        assert_eq!(config.level, 90);
        assert!(Enemy::from_config(&config).is_unknown());
    }

    #[test]
    fn test_weakness_and_resistance_lookup() {
        let enemy = Enemy::new("Cocolia", EnemyBaseStats::default())
            .with_weaknesses(vec!["Fire".into(), "Wind".into()])
            .with_resistance("Ice", 0.4)
            .with_resistance("Quantum", -0.2);

        assert!(enemy.is_weak_to("fire"));
        assert!(!enemy.is_weak_to("Ice"));
        assert_eq!(enemy.resistance("ice"), 0.4);
        assert_eq!(enemy.resistance("Quantum"), -0.2);
        assert_eq!(enemy.resistance("Physical"), 0.0);
        assert_eq!(enemy.effective().weakness_coverage, 2);
    }

    #[test]
    fn test_legacy_field_aliases() {
        let config: EnemyConfig = serde_json::from_str(
            r#"{"name": "Svarog", "weakness": ["Fire"], "special_buffs": ["Shield"], "base_stats": {"defense": 700}}"#,
        )
        .unwrap();
        assert_eq!(config.weaknesses, vec!["Fire".to_string()]);
        assert_eq!(config.buffs, vec!["Shield".to_string()]);
        assert_eq!(config.base_stats.def, 700.0);
    }
}
