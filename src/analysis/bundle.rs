//! Everything the analyzers derive for one team, in one serializable value

use crate::analysis::damage::{team_estimates, NamedDamageProfile};
use crate::analysis::synergy::{synergy, SynergyMetrics};
use crate::analysis::turn_order::{turn_order, TurnSlot};
use crate::stats::{EffectiveStats, EnemyStats, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub name: String,
    pub element: String,
    pub path: String,
    pub stats: EffectiveStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub name: String,
    pub level: u32,
    pub stats: EnemyStats,
    pub weaknesses: Vec<String>,
    pub resistances: BTreeMap<String, f64>,
    pub buffs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    pub characters: Vec<CharacterSnapshot>,
    pub turn_order: Vec<TurnSlot>,
    pub team_estimates: Vec<NamedDamageProfile>,
    pub enemy: EnemySnapshot,
    pub synergy: SynergyMetrics,
}

impl AnalysisBundle {
    /// Run every analyzer over a team snapshot
    pub fn analyze(team: &Team) -> Self {
        let characters = team
            .roster
            .iter()
            .map(|c| CharacterSnapshot {
                name: c.name.clone(),
                element: c.element.clone(),
                path: c.path.clone(),
                stats: c.effective().clone(),
            })
            .collect();

        let enemy = EnemySnapshot {
            name: team.enemy.name.clone(),
            level: team.enemy.level,
            stats: team.enemy.effective().clone(),
            weaknesses: team.enemy.weaknesses.clone(),
            resistances: team.enemy.resistances.clone(),
            buffs: team.enemy.buffs.clone(),
        };

        Self {
            characters,
            turn_order: turn_order(&team.roster),
            team_estimates: team_estimates(&team.roster),
            enemy,
            synergy: synergy(&team.roster, &team.enemy),
        }
    }

    /// No characters analyzed and no enemy HP to plan against
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.team_estimates.is_empty() && self.enemy.stats.hp <= 0.0
    }

    pub fn character(&self, name: &str) -> Option<&CharacterSnapshot> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Names in turn order
    pub fn actors_by_speed(&self) -> Vec<String> {
        self.turn_order.iter().map(|s| s.name.clone()).collect()
    }
}
