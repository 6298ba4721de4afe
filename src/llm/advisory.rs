//! Structured block of an advisor's planning write-up
//!
//! Every field is optional on the wire; advisors routinely omit parts of
//! the schema and a partial plan is still worth keeping.

use crate::strategy::preferences::{DEFAULT_MAX_RETRIES, MAX_RETRIES, MIN_RETRIES};
use crate::strategy::{PlanChoice, PlanStep, PlanVariant, RerollCondition, StrategyPlan};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryAnalysis {
    pub damage_calculation: String,
    pub turn_order: String,
    pub synergy: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryAction {
    pub character: String,
    pub action: String,
    pub target: Option<String>,
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryRound {
    pub round: u32,
    pub actions: Vec<AdvisoryAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryReroll {
    pub target_character: String,
    pub trigger_timing: String,
    pub purpose: String,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryOption {
    pub name: String,
    pub description: String,
    pub expected_rounds: Option<u32>,
    pub requires_reroll: bool,
    pub reroll_condition: Option<AdvisoryReroll>,
    pub steps: Vec<AdvisoryRound>,
}

impl AdvisoryOption {
    /// Convert into the shared plan schema, flattening rounds into steps
    pub fn to_plan(&self, variant: PlanVariant, label: &str) -> StrategyPlan {
        let steps = self
            .steps
            .iter()
            .flat_map(|round| {
                round.actions.iter().map(move |a| PlanStep {
                    round: round.round.max(1),
                    actor: a.character.clone(),
                    action: a.action.clone(),
                    target: a.target.clone().filter(|t| !t.trim().is_empty()),
                    rationale: a.reasoning.clone().filter(|r| !r.trim().is_empty()),
                })
            })
            .collect();

        let reroll = self.reroll_condition.as_ref().map(|r| RerollCondition {
            target_character: r.target_character.clone(),
            trigger: r.trigger_timing.clone(),
            purpose: r.purpose.clone(),
            max_retries: r
                .max_retries
                .unwrap_or(DEFAULT_MAX_RETRIES)
                .clamp(MIN_RETRIES, MAX_RETRIES),
        });

        StrategyPlan {
            name: self.name.clone(),
            description: self.description.clone(),
            variant,
            options: vec![label.to_string()],
            recommendation: None,
            steps,
            guidance: Vec::new(),
            requires_reroll: self.requires_reroll || reroll.is_some(),
            reroll,
            expected_rounds: self.expected_rounds,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryPlan {
    pub analysis: Option<AdvisoryAnalysis>,
    pub plan_a: Option<AdvisoryOption>,
    pub plan_b: Option<AdvisoryOption>,
    pub recommendation: Option<String>,
}

impl AdvisoryPlan {
    /// True when neither option came through
    pub fn is_empty(&self) -> bool {
        self.plan_a.is_none() && self.plan_b.is_none()
    }

    /// Which option the recommendation names, e.g. "B", "Plan A: safer"
    pub fn recommended_variant(&self) -> Option<PlanVariant> {
        let text = self.recommendation.as_deref()?;
        let choice = text
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|token| !token.is_empty())
            .find(|token| !matches!(token.to_lowercase().as_str(), "plan" | "option"))?
            .parse::<PlanChoice>()
            .ok()?;
        Some(match choice {
            PlanChoice::Stable => PlanVariant::Stable,
            PlanChoice::Aggressive => PlanVariant::Aggressive,
        })
    }

    /// Plans in A, B order; the recommendation is attached to each
    pub fn to_plans(&self) -> Vec<StrategyPlan> {
        let options = [
            (self.plan_a.as_ref(), PlanVariant::Stable, "A"),
            (self.plan_b.as_ref(), PlanVariant::Aggressive, "B"),
        ];
        options
            .into_iter()
            .filter_map(|(option, variant, label)| option.map(|o| o.to_plan(variant, label)))
            .map(|mut plan| {
                plan.recommendation = self.recommendation.clone();
                plan
            })
            .collect()
    }
}
