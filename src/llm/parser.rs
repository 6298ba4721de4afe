//! Defensive parsing of advisor replies
//!
//! Replies are free text that may wrap a JSON object in a fenced block.
//! Every failure comes back as a [`ReasoningFailure`] value; nothing in
//! here panics or returns a crate error.

use crate::battle::action::{ActionKind, BattleAction, TargetDirection};
use crate::core::types::SlotIndex;
use crate::llm::advisory::AdvisoryPlan;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why the advisor could not produce a usable answer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReasoningFailure {
    #[error("advisor timed out after {0:?}")]
    Timeout(Duration),

    #[error("advisor failed: {0}")]
    Advisor(String),

    #[error("advisor returned an empty response")]
    Empty,

    #[error("malformed advisor response: {0}")]
    Malformed(String),
}

/// Strip fence markers around a structured block
///
/// Prefers a ```json fence, then any ``` fence, else the whole text.
/// An unterminated fence runs to the end of the text.
pub fn extract_fenced_block(response: &str) -> &str {
    let inner = if let Some((_, rest)) = response.split_once("```json") {
        rest
    } else if let Some((_, rest)) = response.split_once("```") {
        rest
    } else {
        return response.trim();
    };
    let block = match inner.split_once("```") {
        Some((block, _)) => block,
        None => inner,
    };
    block.trim()
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

fn parse_structured<T: DeserializeOwned>(response: &str) -> Result<T, ReasoningFailure> {
    if response.trim().is_empty() {
        return Err(ReasoningFailure::Empty);
    }
    let block = extract_fenced_block(response);
    if block.is_empty() {
        return Err(ReasoningFailure::Malformed("empty fenced block".into()));
    }

    match serde_json::from_str::<T>(block) {
        Ok(value) => Ok(value),
        Err(first) => extract_json(block)
            .filter(|inner| inner.len() < block.len())
            .and_then(|inner| serde_json::from_str::<T>(inner).ok())
            .ok_or_else(|| ReasoningFailure::Malformed(first.to_string())),
    }
}

/// Action JSON as the advisor writes it
#[derive(Debug, Deserialize)]
struct ActionWire {
    action_type: Option<String>,
    character_index: Option<Value>,
    target_direction: Option<String>,
    #[serde(default)]
    reasoning: String,
}

fn slot_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl ActionWire {
    fn into_action(self) -> Result<BattleAction, ReasoningFailure> {
        let direction = match self.target_direction.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.parse::<TargetDirection>()
                    .map_err(ReasoningFailure::Malformed)?,
            ),
            _ => None,
        };

        let kind = match self.action_type.as_deref().map(str::trim) {
            None | Some("") => ActionKind::Wait,
            Some(raw) if matches!(raw.to_lowercase().as_str(), "switch_target" | "switch") => {
                match direction {
                    Some(TargetDirection::Left) => ActionKind::SwitchTargetLeft,
                    Some(TargetDirection::Right) => ActionKind::SwitchTargetRight,
                    None => {
                        return Err(ReasoningFailure::Malformed(
                            "target switch without a direction".into(),
                        ))
                    }
                }
            }
            Some(raw) => raw.parse::<ActionKind>().map_err(ReasoningFailure::Malformed)?,
        };

        let slot = self.character_index.as_ref().and_then(slot_from);
        let slot = slot.map(|s| s.clamp(1, SlotIndex::MAX as i64) as SlotIndex);

        let action = match (kind, slot) {
            (ActionKind::Ultimate, Some(slot)) => BattleAction::ultimate(slot, self.reasoning),
            (ActionKind::Ultimate, None) => {
                return Err(ReasoningFailure::Malformed(
                    "ultimate without a character_index".into(),
                ))
            }
            (kind, Some(slot)) => BattleAction::new(kind, self.reasoning).with_slot(slot),
            (kind, None) => BattleAction::new(kind, self.reasoning),
        };
        Ok(action)
    }
}

/// Parse a per-turn decision
///
/// A missing `action_type` means wait; an unknown one is malformed.
pub fn parse_battle_action(response: &str) -> Result<BattleAction, ReasoningFailure> {
    parse_structured::<ActionWire>(response)?.into_action()
}

/// Parse the structured part of a planning write-up
pub fn parse_advisory_plan(response: &str) -> Result<AdvisoryPlan, ReasoningFailure> {
    let plan: AdvisoryPlan = parse_structured(response)?;
    if plan.is_empty() {
        return Err(ReasoningFailure::Malformed("no plan in response".into()));
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_json_block() {
        let response = "Here you go:\n```json\n{\"action_type\": \"skill\"}\n```\nGood luck.";
        assert_eq!(extract_fenced_block(response), "{\"action_type\": \"skill\"}");
    }

    #[test]
    fn test_extract_plain_fence_and_unterminated() {
        assert_eq!(extract_fenced_block("```\n{}\n```"), "{}");
        assert_eq!(extract_fenced_block("```json\n{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(extract_fenced_block("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = "Decision: {\"action_type\": \"wait\"} done";
        assert_eq!(extract_json(response), Some("{\"action_type\": \"wait\"}"));
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_parse_ultimate() {
        let action = parse_battle_action(
            "```json\n{\"action_type\": \"ultimate\", \"character_index\": 2, \"reasoning\": \"burst\"}\n```",
        )
        .unwrap();
        assert_eq!(action.kind(), ActionKind::Ultimate);
        assert_eq!(action.slot(), Some(2));
        assert_eq!(action.rationale(), "burst");
    }

    #[test]
    fn test_parse_slot_as_string_and_clamped() {
        let action =
            parse_battle_action(r#"{"action_type": "ultimate", "character_index": "7"}"#).unwrap();
        assert_eq!(action.slot(), Some(4));
    }

    #[test]
    fn test_parse_text_around_json() {
        let action =
            parse_battle_action("I will attack. {\"action_type\": \"basic_attack\"} Done.").unwrap();
        assert_eq!(action.kind(), ActionKind::BasicAttack);
    }

    #[test]
    fn test_parse_switch_with_direction() {
        let action = parse_battle_action(
            r#"{"action_type": "switch_target", "target_direction": "right"}"#,
        )
        .unwrap();
        assert_eq!(action.kind(), ActionKind::SwitchTargetRight);
    }

    #[test]
    fn test_missing_action_type_waits() {
        let action = parse_battle_action(r#"{"reasoning": "nothing to do"}"#).unwrap();
        assert_eq!(action.kind(), ActionKind::Wait);
    }

    #[test]
    fn test_failures_are_classified() {
        assert_eq!(parse_battle_action("   "), Err(ReasoningFailure::Empty));
        assert!(matches!(
            parse_battle_action("```json\n```"),
            Err(ReasoningFailure::Malformed(_))
        ));
        assert!(matches!(
            parse_battle_action("no idea"),
            Err(ReasoningFailure::Malformed(_))
        ));
        assert!(matches!(
            parse_battle_action(r#"{"action_type": "dance"}"#),
            Err(ReasoningFailure::Malformed(_))
        ));
        assert!(matches!(
            parse_battle_action(r#"{"action_type": "ultimate"}"#),
            Err(ReasoningFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_advisory_plan() {
        let text = r#"Plan below.
```json
{"plan_a": {"name": "Steady", "expected_rounds": 3, "steps": []}, "recommendation": "A"}
```"#;
        let plan = parse_advisory_plan(text).unwrap();
        assert_eq!(plan.plan_a.as_ref().unwrap().name, "Steady");
        assert_eq!(plan.recommendation.as_deref(), Some("A"));

        assert!(parse_advisory_plan("{}").is_err());
    }
}
