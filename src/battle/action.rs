//! The per-turn action handed to whoever presses the buttons

use crate::core::types::{SlotIndex, MAX_PARTY_SLOTS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FALLBACK_RATIONALE: &str = "fallback after reasoning failure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Ultimate,
    Skill,
    BasicAttack,
    SwitchTargetLeft,
    SwitchTargetRight,
    Wait,
}

impl ActionKind {
    pub fn key(self) -> &'static str {
        match self {
            ActionKind::Ultimate => "ultimate",
            ActionKind::Skill => "skill",
            ActionKind::BasicAttack => "basic_attack",
            ActionKind::SwitchTargetLeft => "switch_target_left",
            ActionKind::SwitchTargetRight => "switch_target_right",
            ActionKind::Wait => "wait",
        }
    }

    fn implied_direction(self) -> Option<TargetDirection> {
        match self {
            ActionKind::SwitchTargetLeft => Some(TargetDirection::Left),
            ActionKind::SwitchTargetRight => Some(TargetDirection::Right),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ultimate" | "ult" => Ok(ActionKind::Ultimate),
            "skill" => Ok(ActionKind::Skill),
            "basic_attack" | "basic" | "attack" => Ok(ActionKind::BasicAttack),
            "switch_target_left" => Ok(ActionKind::SwitchTargetLeft),
            "switch_target_right" => Ok(ActionKind::SwitchTargetRight),
            "wait" => Ok(ActionKind::Wait),
            other => Err(format!("Unknown action type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDirection {
    Left,
    Right,
}

impl TargetDirection {
    pub fn key(self) -> &'static str {
        match self {
            TargetDirection::Left => "left",
            TargetDirection::Right => "right",
        }
    }
}

impl FromStr for TargetDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(TargetDirection::Left),
            "right" | "r" => Ok(TargetDirection::Right),
            other => Err(format!("Unknown target direction: {}", other)),
        }
    }
}

/// One decision. Built through the constructors so that an ultimate
/// always names a slot in `1..=MAX_PARTY_SLOTS`; serialize-only for that
/// reason (advisor replies go through the parser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleAction {
    #[serde(rename = "action_type")]
    kind: ActionKind,
    #[serde(rename = "character_index")]
    slot: Option<SlotIndex>,
    target_direction: Option<TargetDirection>,
    #[serde(rename = "reasoning")]
    rationale: String,
}

impl BattleAction {
    /// Any non-ultimate action; switch actions carry their direction
    pub fn new(kind: ActionKind, rationale: impl Into<String>) -> Self {
        Self {
            kind,
            slot: None,
            target_direction: kind.implied_direction(),
            rationale: rationale.into(),
        }
    }

    /// Ultimate for a 1-based party slot, clamped into range
    pub fn ultimate(slot: SlotIndex, rationale: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Ultimate,
            slot: Some(slot.clamp(1, MAX_PARTY_SLOTS)),
            target_direction: None,
            rationale: rationale.into(),
        }
    }

    /// The conservative action used whenever reasoning fails
    pub fn fallback() -> Self {
        Self::new(ActionKind::BasicAttack, FALLBACK_RATIONALE)
    }

    /// Tag which party member acts (ignored for ultimates, which already carry one)
    pub fn with_slot(mut self, slot: SlotIndex) -> Self {
        if self.kind != ActionKind::Ultimate {
            self.slot = Some(slot.clamp(1, MAX_PARTY_SLOTS));
        }
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn slot(&self) -> Option<SlotIndex> {
        self.slot
    }

    pub fn target_direction(&self) -> Option<TargetDirection> {
        self.target_direction
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Input the execution side should send for this action
    pub fn key_hint(&self) -> Option<String> {
        match self.kind {
            ActionKind::Ultimate => self.slot.map(|s| s.to_string()),
            ActionKind::Skill => Some("E".into()),
            ActionKind::BasicAttack => Some("Q".into()),
            ActionKind::SwitchTargetLeft => Some("Left".into()),
            ActionKind::SwitchTargetRight => Some("Right".into()),
            ActionKind::Wait => None,
        }
    }
}

impl fmt::Display for BattleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(slot) = self.slot {
            write!(f, " #{}", slot)?;
        }
        if !self.rationale.is_empty() {
            write!(f, " ({})", self.rationale)?;
        }
        Ok(())
    }
}
