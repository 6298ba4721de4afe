//! Per-battle state, persisted records and cross-battle statistics

use crate::battle::action::{ActionKind, BattleAction};
use crate::core::types::SlotIndex;
use serde::{Deserialize, Serialize};

/// One emitted action as stored in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub round: u32,
    pub action_type: ActionKind,
    #[serde(default)]
    pub slot: Option<SlotIndex>,
    #[serde(default)]
    pub target: Option<String>,
    pub rationale: String,
    /// True when the advisor failed and the fallback was used
    #[serde(default)]
    pub fallback: bool,
}

impl ActionRecord {
    pub fn from_action(round: u32, action: &BattleAction) -> Self {
        Self {
            round,
            action_type: action.kind(),
            slot: action.slot(),
            target: action.target_direction().map(|d| d.key().to_string()),
            rationale: action.rationale().to_string(),
            fallback: false,
        }
    }

    /// Record for an action substituted after a reasoning failure
    pub fn fallback(round: u32, action: &BattleAction) -> Self {
        Self {
            fallback: true,
            ..Self::from_action(round, action)
        }
    }
}

/// Round counter plus history; only the decision loop mutates it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    round: u32,
    history: Vec<ActionRecord>,
}

impl BattleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub(crate) fn advance(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    pub(crate) fn push(&mut self, record: ActionRecord) {
        self.history.push(record);
    }

    pub fn fallback_count(&self) -> usize {
        self.history.iter().filter(|r| r.fallback).count()
    }
}

/// What gets persisted when a battle ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub rounds: u32,
    pub history: Vec<ActionRecord>,
    pub result: String,
    #[serde(default)]
    pub plan: Option<String>,
    pub ended_at_millis: u64,
}

/// Battles fought and won across `end_battle` calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTally {
    pub battles: u32,
    pub victories: u32,
}

impl BattleTally {
    /// Result labels counted as a win
    pub fn is_victory(result: &str) -> bool {
        matches!(
            result.trim().to_lowercase().as_str(),
            "victory" | "win" | "won" | "success" | "cleared"
        )
    }

    pub fn record(&mut self, result: &str) {
        self.battles += 1;
        if Self::is_victory(result) {
            self.victories += 1;
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            self.victories as f64 / self.battles as f64
        }
    }
}
