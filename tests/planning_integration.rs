//! Planning pipeline integration tests

use async_trait::async_trait;
use starrail_planner::battle::{ActionKind, DecisionLoop};
use starrail_planner::core::config::PlannerConfig;
use starrail_planner::core::error::Result;
use starrail_planner::llm::{Advisor, PromptContext};
use starrail_planner::planning::{AdvisoryText, PlanningSession, PlanningSummary};
use starrail_planner::storage::{keys, load_record, FileMemoryStore, InMemoryStore, MemoryStore};
use starrail_planner::strategy::{PlanVariant, StrategyMode, StrategyPlan};
use std::sync::{Arc, Mutex};

const EXAMPLE_CONFIG: &str = include_str!("../config/planner.example.toml");

const ADVISORY_REPLY: &str = r#"Seele should open with her skill while Bronya pulls her forward.

```json
{
  "analysis": {"turn_order": "Seele first", "key_points": ["resurgence on kill"]},
  "plan_a": {
    "name": "Bronya pull",
    "description": "Two pulls then ultimate",
    "expected_rounds": 3,
    "steps": [{"round": 1, "actions": [{"character": "Bronya", "action": "skill", "target": "Seele"}]}]
  },
  "recommendation": "A"
}
```"#;

struct Scripted(&'static str);

#[async_trait]
impl Advisor for Scripted {
    async fn advise(&self, context: &PromptContext) -> Result<String> {
        assert!(matches!(context, PromptContext::Planning(_)));
        Ok(self.0.to_string())
    }
}

/// Battle advisor that remembers which plan each prompt carried
#[derive(Default)]
struct PlanEcho {
    plans_seen: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl Advisor for PlanEcho {
    async fn advise(&self, context: &PromptContext) -> Result<String> {
        if let PromptContext::Battle(ctx) = context {
            self.plans_seen
                .lock()
                .unwrap()
                .push(ctx.plan.as_ref().map(|p| p.name.clone()));
            assert!(context.render().contains("R1 Bronya: skill -> Seele"));
        }
        Ok(r#"{"action_type": "skill", "reasoning": "follow the pull"}"#.into())
    }
}

fn example_config() -> PlannerConfig {
    PlannerConfig::from_toml_str(EXAMPLE_CONFIG).unwrap()
}

#[test]
fn test_example_config_parses_cleanly() {
    let config = example_config();
    assert_eq!(config.roster.len(), 2);
    assert_eq!(config.roster[0].name, "Seele");
    assert_eq!(config.roster[0].traces.to_bonuses().len(), 1);
    assert_eq!(config.roster[1].traces.to_bonuses().len(), 1);
    assert_eq!(config.enemy.as_ref().unwrap().weaknesses.len(), 3);
    assert!(config.validate().is_empty());
}

#[tokio::test]
async fn test_full_pipeline_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileMemoryStore::new(dir.path()).unwrap());
    let session = PlanningSession::new(example_config(), store.clone());

    let report = session.plan().await;
    assert_eq!(report.mode, StrategyMode::MaterialFarm);
    assert_eq!(report.analysis.turn_order[0].name, "Seele");
    assert_eq!(report.plans.len(), 2);
    session.persist(&report).unwrap();

    let plans: Vec<StrategyPlan> = load_record(store.as_ref(), keys::STRATEGY_PLAN)
        .unwrap()
        .unwrap();
    assert_eq!(plans, report.plans);

    let summary: PlanningSummary = load_record(store.as_ref(), keys::PLANNING_SUMMARY)
        .unwrap()
        .unwrap();
    assert_eq!(summary.plan_count, 2);
    assert_eq!(summary.selected, 0);
    assert!(!summary.has_advisory);

    assert!(dir.path().join("selected_plan.json").exists());
}

#[tokio::test]
async fn test_stable_only_preferences_drop_reroll_plan() {
    let mut config = example_config();
    config.preferences.allow_reroll = false;
    for mode in ["material_farm", "abyss", "custom"] {
        config.mode = mode.into();
        let report = PlanningSession::new(config.clone(), Arc::new(InMemoryStore::new()))
            .plan()
            .await;
        assert!(!report.plans.is_empty(), "{} produced no plans", mode);
        assert!(
            report.plans.iter().all(|p| !p.requires_reroll),
            "{} offered a reroll plan",
            mode
        );
    }
}

#[tokio::test]
async fn test_empty_inputs_still_plan() {
    let report = PlanningSession::new(PlannerConfig::default(), Arc::new(InMemoryStore::new()))
        .plan()
        .await;
    assert!(report.roster.is_empty());
    assert!(!report.plans.is_empty());
    assert!(report.plans.iter().all(|p| !p.steps.is_empty()));
}

#[tokio::test]
async fn test_advisory_text_persisted() {
    let mut config = example_config();
    config.ai.enabled = true;
    let store = Arc::new(InMemoryStore::new());
    let session =
        PlanningSession::new(config, store.clone()).with_advisor(Arc::new(Scripted(ADVISORY_REPLY)));

    let report = session.plan().await;
    assert!(report.advisory.as_ref().unwrap().plan.is_some());

    // two heuristic plans plus the advisor's plan A, which is selected
    assert_eq!(report.plans.len(), 3);
    assert_eq!(report.selected, 2);
    let chosen = report.selected_plan().unwrap();
    assert_eq!(chosen.name, "Bronya pull");
    assert_eq!(chosen.variant, PlanVariant::Stable);
    assert_eq!(chosen.steps[0].actor, "Bronya");

    session.persist(&report).unwrap();
    let stored: AdvisoryText = load_record(store.as_ref(), keys::AI_STRATEGY_TEXT)
        .unwrap()
        .unwrap();
    assert!(stored.text.starts_with("Seele should open"));
    let summary: PlanningSummary = load_record(store.as_ref(), keys::PLANNING_SUMMARY)
        .unwrap()
        .unwrap();
    assert_eq!(summary.selected_name.as_deref(), Some("Bronya pull"));
}

#[tokio::test]
async fn test_advised_plan_drives_the_battle() {
    let mut config = example_config();
    config.ai.enabled = true;
    let store = Arc::new(InMemoryStore::new());
    let session =
        PlanningSession::new(config, store.clone()).with_advisor(Arc::new(Scripted(ADVISORY_REPLY)));
    let report = session.plan().await;
    session.persist(&report).unwrap();

    let selected: StrategyPlan = load_record(store.as_ref(), keys::SELECTED_PLAN)
        .unwrap()
        .unwrap();
    let echo = Arc::new(PlanEcho::default());
    let mut dl = DecisionLoop::new(echo.clone(), store).with_plan(selected);

    dl.start_battle().unwrap();
    let action = dl.decide().await.unwrap();
    assert_eq!(action.kind(), ActionKind::Skill);
    assert!(!dl.state().unwrap().history()[0].fallback);

    let seen = echo.plans_seen.lock().unwrap().clone();
    assert_eq!(seen, vec![Some("Bronya pull".to_string())]);
}

#[tokio::test]
async fn test_unparsable_advisory_keeps_text() {
    let mut config = example_config();
    config.ai.enabled = true;
    let session = PlanningSession::new(config, Arc::new(InMemoryStore::new()))
        .with_advisor(Arc::new(Scripted("Just burst it down.")));

    let report = session.plan().await;
    let advisory = report.advisory.unwrap();
    assert_eq!(advisory.text, "Just burst it down.");
    assert!(advisory.plan.is_none());
    assert_eq!(report.plans.len(), 2);
}

#[tokio::test]
async fn test_advisor_ignored_when_disabled() {
    let store = Arc::new(InMemoryStore::new());
    let session = PlanningSession::new(example_config(), store.clone())
        .with_advisor(Arc::new(Scripted(ADVISORY_REPLY)));
    let report = session.plan().await;
    assert!(report.advisory.is_none());

    session.persist(&report).unwrap();
    assert!(!store.exists(keys::AI_STRATEGY_TEXT));
}
