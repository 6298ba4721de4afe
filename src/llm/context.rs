//! Prompt contexts handed to the advisor
//!
//! Two shapes: a planning request carrying the whole analysis, and a
//! per-turn battle request carrying the round number and action history.

use crate::analysis::AnalysisBundle;
use crate::battle::state::ActionRecord;
use crate::strategy::{Preferences, StrategyMode, StrategyPlan};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlanningContext {
    pub mode: StrategyMode,
    pub preferences: Preferences,
    pub analysis: AnalysisBundle,
    /// Heuristic plans the advisor may refine
    pub heuristic_plans: Vec<StrategyPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BattleContext {
    pub round: u32,
    pub history: Vec<ActionRecord>,
    pub plan: Option<StrategyPlan>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptContext {
    Planning(PlanningContext),
    Battle(BattleContext),
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

impl PromptContext {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            PromptContext::Planning(_) => PLANNING_SYSTEM_PROMPT,
            PromptContext::Battle(_) => BATTLE_SYSTEM_PROMPT,
        }
    }

    /// User message for this context
    pub fn render(&self) -> String {
        match self {
            PromptContext::Planning(ctx) => {
                let plans: Vec<String> = ctx.heuristic_plans.iter().map(|p| p.render()).collect();
                format!(
                    "MODE: {}\n\nPREFERENCES:\n{}\n\nANALYSIS:\n{}\n\nHEURISTIC PLANS:\n{}\n\
                     Write the detailed strategy, then the structured plan in a ```json block:",
                    ctx.mode,
                    pretty(&ctx.preferences),
                    pretty(&ctx.analysis),
                    plans.join("\n"),
                )
            }
            PromptContext::Battle(ctx) => {
                let plan = ctx
                    .plan
                    .as_ref()
                    .map(|p| p.render())
                    .unwrap_or_else(|| "(no plan selected)".into());
                let scheduled: Vec<String> = ctx
                    .plan
                    .iter()
                    .flat_map(|p| p.steps_in_round(ctx.round))
                    .map(|step| format!("  - {}", step))
                    .collect();
                let scheduled = if scheduled.is_empty() {
                    "  (nothing scheduled)".to_string()
                } else {
                    scheduled.join("\n")
                };
                format!(
                    "ROUND: {}\n\nEXECUTED ACTIONS:\n{}\n\nPLAN:\n{}\n\
                     SCHEDULED THIS ROUND:\n{}\n\n\
                     Decide the next action as JSON:",
                    ctx.round,
                    pretty(&ctx.history),
                    plan,
                    scheduled,
                )
            }
        }
    }
}

/// System prompt for strategy write-ups
pub const PLANNING_SYSTEM_PROMPT: &str = r#"You are a strategy planner for a turn-based RPG.
Given a party, an enemy and the derived analysis, produce at least two plans.

PLAN A (stable): no restarts, steady clear, turn-by-turn steps, expected rounds.
PLAN B (aggressive): minimum rounds, may rely on restarting the encounter. If it
does, state the bait condition: which character must be hit, when, why (energy,
counter trigger), and how many restarts are acceptable.

OUTPUT FORMAT (JSON inside a ```json block):
{
  "analysis": {
    "damage_calculation": "...",
    "turn_order": "...",
    "synergy": "...",
    "key_points": ["..."]
  },
  "plan_a": {
    "name": "...",
    "description": "...",
    "expected_rounds": 3,
    "steps": [
      {"round": 1, "actions": [{"character": "...", "action": "ultimate|skill|basic attack", "target": "...", "reasoning": "..."}]}
    ]
  },
  "plan_b": {
    "name": "...",
    "description": "...",
    "expected_rounds": 2,
    "requires_reroll": true,
    "reroll_condition": {"target_character": "...", "trigger_timing": "...", "purpose": "...", "max_retries": 5},
    "steps": []
  },
  "recommendation": "A or B, and why"
}
"#;

/// System prompt for per-turn decisions
pub const BATTLE_SYSTEM_PROMPT: &str = r#"You are deciding the next action in a turn-based RPG battle.
Follow the selected plan unless the history shows it has gone off track.

OUTPUT FORMAT (JSON only, no explanation):
{
  "action_type": "ultimate" | "skill" | "basic_attack" | "switch_target_left" | "switch_target_right" | "wait",
  "character_index": 1-4 (required for ultimate),
  "target_direction": "left" | "right" (for target switches),
  "reasoning": "why"
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::action::BattleAction;
    use crate::strategy::{PlanStep, PlanVariant};

    #[test]
    fn test_battle_render() {
        let ctx = PromptContext::Battle(BattleContext {
            round: 3,
            history: vec![ActionRecord::from_action(2, &BattleAction::fallback())],
            plan: None,
        });
        let text = ctx.render();
        assert!(text.starts_with("ROUND: 3"));
        assert!(text.contains("basic_attack"));
        assert!(text.contains("(no plan selected)"));
        assert!(text.contains("(nothing scheduled)"));
        assert_eq!(ctx.system_prompt(), BATTLE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_battle_render_lists_this_rounds_steps() {
        let plan = StrategyPlan {
            name: "Pull".into(),
            description: String::new(),
            variant: PlanVariant::Stable,
            options: vec!["A".into()],
            recommendation: None,
            steps: vec![
                PlanStep::new(1, "Bronya", "Skill").on("Seele"),
                PlanStep::new(2, "Seele", "Ultimate").on("Cocolia"),
            ],
            guidance: Vec::new(),
            requires_reroll: false,
            reroll: None,
            expected_rounds: Some(2),
        };
        let ctx = PromptContext::Battle(BattleContext {
            round: 2,
            history: Vec::new(),
            plan: Some(plan),
        });
        let text = ctx.render();
        let scheduled = text.split("SCHEDULED THIS ROUND:").nth(1).unwrap();
        assert!(scheduled.contains("R2 Seele: Ultimate -> Cocolia"));
        assert!(!scheduled.contains("Bronya"));
    }

    #[test]
    fn test_planning_render() {
        let ctx = PromptContext::Planning(PlanningContext {
            mode: StrategyMode::Abyss,
            preferences: Preferences::default(),
            analysis: AnalysisBundle::default(),
            heuristic_plans: Vec::new(),
        });
        let text = ctx.render();
        assert!(text.starts_with("MODE: abyss"));
        assert!(text.contains("allow_reroll"));
        assert_eq!(ctx.system_prompt(), PLANNING_SYSTEM_PROMPT);
    }

    #[test]
    fn test_context_serializes_with_kind_tag() {
        let ctx = PromptContext::Battle(BattleContext {
            round: 1,
            history: Vec::new(),
            plan: None,
        });
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["kind"], "battle");
        assert_eq!(json["round"], 1);
    }
}
