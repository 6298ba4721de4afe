//! Plan schema shared by every strategy
//!
//! Plans are values: a strategy builds them once per request and nothing
//! edits them afterwards. New inputs mean a new plan list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which branch of the stable/aggressive duality a plan belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanVariant {
    Stable,
    Aggressive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub round: u32,
    pub actor: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl PlanStep {
    pub fn new(round: u32, actor: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            round,
            actor: actor.into(),
            action: action.into(),
            target: None,
            rationale: None,
        }
    }

    pub fn on(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn because(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{} {}: {}", self.round, self.actor, self.action)?;
        if let Some(target) = &self.target {
            write!(f, " -> {}", target)?;
        }
        if let Some(rationale) = &self.rationale {
            write!(f, " ({})", rationale)?;
        }
        Ok(())
    }
}

/// The random event a reroll plan restarts the encounter for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerollCondition {
    pub target_character: String,
    pub trigger: String,
    pub purpose: String,
    pub max_retries: u32,
}

impl RerollCondition {
    pub fn describe(&self) -> String {
        format!(
            "Restart unless {} is hit by {} (up to {} retries): {}",
            self.target_character, self.trigger, self.max_retries, self.purpose
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPlan {
    pub name: String,
    pub description: String,
    pub variant: PlanVariant,
    /// Mutually exclusive option labels offered alongside this plan
    pub options: Vec<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    pub steps: Vec<PlanStep>,
    #[serde(default)]
    pub guidance: Vec<String>,
    pub requires_reroll: bool,
    #[serde(default)]
    pub reroll: Option<RerollCondition>,
    #[serde(default)]
    pub expected_rounds: Option<u32>,
}

impl StrategyPlan {
    /// Highest round number any step is scheduled for
    pub fn last_round(&self) -> u32 {
        self.steps.iter().map(|s| s.round).max().unwrap_or(0)
    }

    pub fn steps_in_round(&self, round: u32) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter().filter(move |s| s.round == round)
    }

    /// Multi-line text rendering for terminals and prompts
    pub fn render(&self) -> String {
        let mut out = format!("{}\n  {}\n", self.name, self.description);
        if let Some(rounds) = self.expected_rounds {
            out.push_str(&format!("  Expected rounds: {}\n", rounds));
        }
        for step in &self.steps {
            out.push_str(&format!("  - {}\n", step));
        }
        if let Some(reroll) = &self.reroll {
            out.push_str(&format!("  Reroll: {}\n", reroll.describe()));
        }
        if let Some(rec) = &self.recommendation {
            out.push_str(&format!("  Recommendation: {}\n", rec));
        }
        for line in &self.guidance {
            out.push_str(&format!("  * {}\n", line));
        }
        out
    }
}
