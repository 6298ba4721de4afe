//! A party roster facing one enemy

use crate::stats::character::{Character, CharacterConfig};
use crate::stats::enemy::{Enemy, EnemyConfig};

/// Ordered roster (input order, not turn order) plus one enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub roster: Vec<Character>,
    pub enemy: Enemy,
}

impl Team {
    pub fn new(roster: Vec<Character>, enemy: Enemy) -> Self {
        Self { roster, enemy }
    }

    pub fn from_config(roster: &[CharacterConfig], enemy: Option<&EnemyConfig>) -> Self {
        Self {
            roster: roster.iter().map(Character::from_config).collect(),
            enemy: enemy.map(Enemy::from_config).unwrap_or_else(Enemy::unknown),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }
}
