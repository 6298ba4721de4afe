//! Decision loop integration tests with scripted, failing and slow advisors

use async_trait::async_trait;
use starrail_planner::battle::{
    ActionKind, BattleRecord, DecisionLoop, FALLBACK_RATIONALE,
};
use starrail_planner::core::error::{PlannerError, Result};
use starrail_planner::llm::{Advisor, PromptContext};
use starrail_planner::storage::{keys, load_record, FileMemoryStore, InMemoryStore, MemoryStore};
use starrail_planner::strategy::{PlanStep, PlanVariant, StrategyPlan};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replies in order; records the round and history length it was shown
struct Scripted {
    replies: Mutex<VecDeque<Result<String>>>,
    seen: Mutex<Vec<(u32, usize, bool)>>,
}

impl Scripted {
    fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Advisor for Scripted {
    async fn advise(&self, context: &PromptContext) -> Result<String> {
        if let PromptContext::Battle(ctx) = context {
            self.seen
                .lock()
                .unwrap()
                .push((ctx.round, ctx.history.len(), ctx.plan.is_some()));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(r#"{"action_type": "wait"}"#.into()))
    }
}

struct Slow;

#[async_trait]
impl Advisor for Slow {
    async fn advise(&self, _context: &PromptContext) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(120)).await;
        Ok(r#"{"action_type": "skill"}"#.into())
    }
}

fn plan() -> StrategyPlan {
    StrategyPlan {
        name: "Steady three-round farm".into(),
        description: "Buff, burst, finish".into(),
        variant: PlanVariant::Stable,
        options: vec!["A".into()],
        recommendation: None,
        steps: vec![PlanStep::new(1, "Bronya", "Skill").on("Seele")],
        guidance: Vec::new(),
        requires_reroll: false,
        reroll: None,
        expected_rounds: Some(3),
    }
}

#[tokio::test]
async fn test_scripted_battle_with_mixed_failures() {
    let advisor = Arc::new(Scripted::new(vec![
        Ok("```json\n{\"action_type\": \"ultimate\", \"character_index\": 1, \"reasoning\": \"open\"}\n```".into()),
        Err(PlannerError::LlmError("connection reset".into())),
        Ok("I am not sure what to do".into()),
        Ok(r#"{"action_type": "switch_target", "target_direction": "left"}"#.into()),
    ]));
    let store = Arc::new(InMemoryStore::new());
    let mut dl = DecisionLoop::new(advisor.clone(), store.clone()).with_plan(plan());

    dl.start_battle().unwrap();
    let mut kinds = Vec::new();
    for _ in 0..4 {
        kinds.push(dl.decide().await.unwrap().kind());
    }
    assert_eq!(
        kinds,
        vec![
            ActionKind::Ultimate,
            ActionKind::BasicAttack,
            ActionKind::BasicAttack,
            ActionKind::SwitchTargetLeft,
        ]
    );

    let state = dl.state().unwrap();
    assert_eq!(state.round(), 4);
    assert_eq!(state.fallback_count(), 2);
    let rounds: Vec<u32> = state.history().iter().map(|r| r.round).collect();
    assert_eq!(rounds, vec![1, 2, 3, 4]);

    // the advisor saw the growing history every round
    let seen = advisor.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![(1, 0, true), (2, 1, true), (3, 2, true), (4, 3, true)]
    );

    let key = dl.end_battle("victory").unwrap();
    let record: BattleRecord = load_record(store.as_ref(), &key).unwrap().unwrap();
    assert_eq!(record.rounds, 4);
    assert_eq!(record.history.len(), 4);
    assert_eq!(record.plan.as_deref(), Some("Steady three-round farm"));
    assert_eq!(record.history[1].rationale, FALLBACK_RATIONALE);
}

#[tokio::test(start_paused = true)]
async fn test_slow_advisor_times_out_to_fallback() {
    let store = Arc::new(InMemoryStore::new());
    let mut dl = DecisionLoop::new(Arc::new(Slow), store).with_timeout(Duration::from_secs(5));

    dl.start_battle().unwrap();
    let action = dl.decide().await.unwrap();
    assert_eq!(action.kind(), ActionKind::BasicAttack);
    let history = dl.state().unwrap().history();
    assert_eq!(history.len(), 1);
    assert!(history[0].fallback);
}

#[tokio::test]
async fn test_repeated_battles_never_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileMemoryStore::new(dir.path()).unwrap());
    let advisor = Arc::new(Scripted::new(Vec::new()));
    let mut dl = DecisionLoop::new(advisor, store.clone());

    let mut keys_seen = Vec::new();
    for result in ["victory", "defeat", "victory"] {
        dl.start_battle().unwrap();
        dl.decide().await.unwrap();
        keys_seen.push(dl.end_battle(result).unwrap());
    }
    keys_seen.sort();
    keys_seen.dedup();
    assert_eq!(keys_seen.len(), 3);

    let records = store
        .list()
        .unwrap()
        .into_iter()
        .filter(|name| name.starts_with(keys::BATTLE_RECORD_PREFIX))
        .count();
    assert_eq!(records, 3);

    let tally = dl.tally();
    assert_eq!(tally.battles, 3);
    assert_eq!(tally.victories, 2);
    assert!(store.exists(keys::BATTLE_STATS));
}

#[tokio::test]
async fn test_state_machine_guards() {
    let store = Arc::new(InMemoryStore::new());
    let mut dl = DecisionLoop::new(Arc::new(Scripted::new(Vec::new())), store);

    assert!(matches!(dl.decide().await, Err(PlannerError::NotInBattle)));
    assert!(dl.end_battle("victory").is_none());

    dl.start_battle().unwrap();
    assert!(matches!(
        dl.replace_plan(Some(plan())),
        Err(PlannerError::BattleInProgress)
    ));
    assert!(dl.plan().is_none());

    dl.end_battle("defeat");
    dl.replace_plan(Some(plan())).unwrap();
    assert_eq!(dl.plan().unwrap().name, "Steady three-round farm");

    assert!(matches!(dl.decide().await, Err(PlannerError::NotInBattle)));
}
