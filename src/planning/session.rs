//! One planning pass: configuration -> team -> analysis -> plans
//!
//! Plan generation itself never fails. The advisor write-up is optional
//! and its failure only means `advisory` is `None`. When the write-up
//! carries a structured plan, its options join the heuristic candidates
//! and the recommended one is selected unless `plan_choice` says
//! otherwise. Persistence is a separate step so callers decide whether a
//! storage error matters.

use crate::analysis::{AnalysisBundle, CharacterSnapshot, EnemySnapshot, RoundEstimator};
use crate::core::config::PlannerConfig;
use crate::core::error::Result;
use crate::llm::advisor::{consult, Advisor};
use crate::llm::advisory::AdvisoryPlan;
use crate::llm::context::{PlanningContext, PromptContext};
use crate::llm::parser::parse_advisory_plan;
use crate::stats::{CharacterConfig, EnemyConfig, Team};
use crate::storage::{keys, load_record, save_record, MemoryStore};
use crate::strategy::{StrategyCatalog, StrategyMode, StrategyPlan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Roster as stored under `characters`: raw records plus what they resolved to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredRoster {
    pub roster: Vec<CharacterConfig>,
    #[serde(default)]
    pub computed: Vec<CharacterSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredEnemy {
    pub enemy: EnemyConfig,
    #[serde(default)]
    pub computed: Option<EnemySnapshot>,
}

/// Free-text strategy from the advisor, with its structured block if it parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryText {
    pub text: String,
    #[serde(default)]
    pub plan: Option<AdvisoryPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSummary {
    pub mode: StrategyMode,
    pub plan_count: usize,
    pub selected: usize,
    pub selected_name: Option<String>,
    pub expected_rounds: Option<u32>,
    pub warnings: Vec<String>,
    pub has_advisory: bool,
    pub generated_at: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanningReport {
    pub mode: StrategyMode,
    pub warnings: Vec<String>,
    pub roster: Vec<CharacterConfig>,
    pub enemy: Option<EnemyConfig>,
    pub analysis: AnalysisBundle,
    pub plans: Vec<StrategyPlan>,
    /// Index into `plans`: `preferences.plan_choice` if set, else the
    /// advisor's recommended plan, else the first heuristic plan
    pub selected: usize,
    pub advisory: Option<AdvisoryText>,
}

impl PlanningReport {
    pub fn selected_plan(&self) -> Option<&StrategyPlan> {
        self.plans.get(self.selected)
    }

    pub fn summary(&self) -> PlanningSummary {
        let selected = self.selected_plan();
        PlanningSummary {
            mode: self.mode,
            plan_count: self.plans.len(),
            selected: self.selected,
            selected_name: selected.map(|p| p.name.clone()),
            expected_rounds: selected.and_then(|p| p.expected_rounds),
            warnings: self.warnings.clone(),
            has_advisory: self.advisory.is_some(),
            generated_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }
}

pub struct PlanningSession {
    config: PlannerConfig,
    store: Arc<dyn MemoryStore>,
    advisor: Option<Arc<dyn Advisor>>,
    catalog: StrategyCatalog,
}

impl PlanningSession {
    pub fn new(config: PlannerConfig, store: Arc<dyn MemoryStore>) -> Self {
        Self {
            config,
            store,
            advisor: None,
            catalog: StrategyCatalog::new(RoundEstimator::new()),
        }
    }

    /// Ask this advisor for a write-up when `ai.enabled` is set
    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Roster from the config, else the one stored by an earlier pass
    fn recall_roster(&self) -> Vec<CharacterConfig> {
        if !self.config.roster.is_empty() {
            return self.config.roster.clone();
        }
        match load_record::<StoredRoster>(self.store.as_ref(), keys::CHARACTERS) {
            Ok(Some(stored)) => {
                info!("Recalled {} characters from storage", stored.roster.len());
                stored.roster
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Stored roster unreadable, planning without one: {}", e);
                Vec::new()
            }
        }
    }

    fn recall_enemy(&self) -> Option<EnemyConfig> {
        if self.config.enemy.is_some() {
            return self.config.enemy.clone();
        }
        match load_record::<StoredEnemy>(self.store.as_ref(), keys::ENEMY) {
            Ok(Some(stored)) => {
                info!("Recalled enemy '{}' from storage", stored.enemy.name);
                Some(stored.enemy)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Stored enemy unreadable, planning without one: {}", e);
                None
            }
        }
    }

    /// Run the whole pipeline; nothing is persisted yet
    pub async fn plan(&self) -> PlanningReport {
        let roster = self.recall_roster();
        let enemy = self.recall_enemy();
        let team = Team::from_config(&roster, enemy.as_ref());
        let analysis = AnalysisBundle::analyze(&team);

        let preferences = &self.config.preferences;
        let outcome = self
            .catalog
            .generate(&self.config.mode, &team, &analysis, preferences);

        let advisory = self
            .advise(outcome.mode, &analysis, &outcome.plans)
            .await;

        let mut plans = outcome.plans;
        let recommended = advisory
            .as_ref()
            .and_then(|a| a.plan.as_ref())
            .and_then(|plan| self.adopt_advised(plan, &mut plans));
        let selected = match (preferences.plan_choice, recommended) {
            (None, Some(index)) => index,
            _ => preferences.plan_index(plans.len()),
        };

        PlanningReport {
            mode: outcome.mode,
            warnings: outcome.warnings,
            roster,
            enemy,
            analysis,
            plans,
            selected,
            advisory,
        }
    }

    /// Append the advisor's options to `plans`; returns the index of the
    /// recommended one (the first appended when nothing is recommended)
    fn adopt_advised(
        &self,
        advised: &AdvisoryPlan,
        plans: &mut Vec<StrategyPlan>,
    ) -> Option<usize> {
        let allow_reroll = self.config.preferences.allow_reroll;
        let candidates: Vec<StrategyPlan> = advised
            .to_plans()
            .into_iter()
            .filter(|plan| {
                let keep = allow_reroll || !plan.requires_reroll;
                if !keep {
                    debug!("Dropping advisor plan '{}': rerolls not allowed", plan.name);
                }
                keep
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let offset = plans.len();
        let pick = advised
            .recommended_variant()
            .and_then(|variant| candidates.iter().position(|p| p.variant == variant))
            .unwrap_or(0);
        info!("Adopted {} advisor plan(s)", candidates.len());
        plans.extend(candidates);
        Some(offset + pick)
    }

    async fn advise(
        &self,
        mode: StrategyMode,
        analysis: &AnalysisBundle,
        plans: &[StrategyPlan],
    ) -> Option<AdvisoryText> {
        if !self.config.ai.enabled {
            return None;
        }
        let advisor = self.advisor.as_ref()?;

        let context = PromptContext::Planning(PlanningContext {
            mode,
            preferences: self.config.preferences.clone(),
            analysis: analysis.clone(),
            heuristic_plans: plans.to_vec(),
        });

        match consult(advisor.as_ref(), &context, self.config.ai.timeout()).await {
            Ok(text) => {
                let plan = match parse_advisory_plan(&text) {
                    Ok(plan) => Some(plan),
                    Err(e) => {
                        debug!("Advisory text has no usable structured block: {}", e);
                        None
                    }
                };
                info!("Advisor {} produced a {}-byte strategy", advisor.name(), text.len());
                Some(AdvisoryText { text, plan })
            }
            Err(failure) => {
                warn!("Advisory strategy unavailable: {}", failure);
                None
            }
        }
    }

    /// Write every planning entry to the store
    pub fn persist(&self, report: &PlanningReport) -> Result<()> {
        let store = self.store.as_ref();

        save_record(
            store,
            keys::CHARACTERS,
            &StoredRoster {
                roster: report.roster.clone(),
                computed: report.analysis.characters.clone(),
            },
        )?;
        if let Some(enemy) = &report.enemy {
            save_record(
                store,
                keys::ENEMY,
                &StoredEnemy {
                    enemy: enemy.clone(),
                    computed: Some(report.analysis.enemy.clone()),
                },
            )?;
        }
        save_record(store, keys::COMPUTED, &report.analysis)?;
        save_record(store, keys::PREFERENCES, &self.config.preferences)?;
        save_record(store, keys::STRATEGY_PLAN, &report.plans)?;
        save_record(store, keys::PLANNING_SUMMARY, &report.summary())?;
        if let Some(plan) = report.selected_plan() {
            save_record(store, keys::SELECTED_PLAN, plan)?;
        }
        if let Some(advisory) = &report.advisory {
            save_record(store, keys::AI_STRATEGY_TEXT, advisory)?;
        }

        info!(
            "Persisted {} plan(s) for mode {}",
            report.plans.len(),
            report.mode
        );
        Ok(())
    }
}
