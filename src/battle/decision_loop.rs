//! Per-turn decision loop
//!
//! Idle -> InBattle on `start_battle`, back to Idle on `end_battle`.
//! `decide` asks the advisor once per round; any failure is logged and
//! replaced by the fallback action, never propagated.

use crate::battle::action::BattleAction;
use crate::battle::state::{ActionRecord, BattleRecord, BattleState, BattleTally};
use crate::core::error::{PlannerError, Result};
use crate::llm::advisor::{consult, Advisor};
use crate::llm::context::{BattleContext, PromptContext};
use crate::llm::parser::parse_battle_action;
use crate::storage::{keys, load_record, save_record, MemoryStore};
use crate::strategy::StrategyPlan;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(30);

/// Loop phases
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoopPhase {
    #[default]
    Idle,
    InBattle(BattleState),
}

pub struct DecisionLoop {
    advisor: Arc<dyn Advisor>,
    store: Arc<dyn MemoryStore>,
    plan: Option<StrategyPlan>,
    timeout: Duration,
    phase: LoopPhase,
    tally: BattleTally,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl DecisionLoop {
    /// Create an idle loop; battle statistics saved earlier are picked up
    pub fn new(advisor: Arc<dyn Advisor>, store: Arc<dyn MemoryStore>) -> Self {
        let tally = match load_record::<BattleTally>(store.as_ref(), keys::BATTLE_STATS) {
            Ok(Some(tally)) => tally,
            Ok(None) => BattleTally::default(),
            Err(e) => {
                warn!("Ignoring unreadable battle stats: {}", e);
                BattleTally::default()
            }
        };
        Self {
            advisor,
            store,
            plan: None,
            timeout: DEFAULT_DECISION_TIMEOUT,
            phase: LoopPhase::Idle,
            tally,
        }
    }

    pub fn with_plan(mut self, plan: StrategyPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn plan(&self) -> Option<&StrategyPlan> {
        self.plan.as_ref()
    }

    /// Swap the plan between battles
    pub fn replace_plan(&mut self, plan: Option<StrategyPlan>) -> Result<()> {
        if self.is_in_battle() {
            return Err(PlannerError::BattleInProgress);
        }
        self.plan = plan;
        Ok(())
    }

    pub fn is_in_battle(&self) -> bool {
        matches!(self.phase, LoopPhase::InBattle(_))
    }

    pub fn phase(&self) -> &LoopPhase {
        &self.phase
    }

    /// Live state, if a battle is running
    pub fn state(&self) -> Option<&BattleState> {
        match &self.phase {
            LoopPhase::InBattle(state) => Some(state),
            LoopPhase::Idle => None,
        }
    }

    pub fn tally(&self) -> BattleTally {
        self.tally
    }

    /// Idle -> InBattle with a fresh round counter and empty history
    pub fn start_battle(&mut self) -> Result<()> {
        if self.is_in_battle() {
            return Err(PlannerError::BattleInProgress);
        }
        self.phase = LoopPhase::InBattle(BattleState::new());
        info!(
            "Battle started with plan {:?} via {}",
            self.plan.as_ref().map(|p| p.name.as_str()),
            self.advisor.name()
        );
        Ok(())
    }

    /// Emit the action for the next round
    pub async fn decide(&mut self) -> Result<BattleAction> {
        let LoopPhase::InBattle(state) = &mut self.phase else {
            return Err(PlannerError::NotInBattle);
        };

        let round = state.advance();
        let context = PromptContext::Battle(BattleContext {
            round,
            history: state.history().to_vec(),
            plan: self.plan.clone(),
        });

        let outcome = consult(self.advisor.as_ref(), &context, self.timeout)
            .await
            .and_then(|text| {
                debug!("Round {} advisor text: {}", round, text);
                parse_battle_action(&text)
            });

        let (action, record) = match outcome {
            Ok(action) => {
                let record = ActionRecord::from_action(round, &action);
                (action, record)
            }
            Err(failure) => {
                error!("Round {} reasoning failed: {}; using fallback", round, failure);
                let action = BattleAction::fallback();
                let record = ActionRecord::fallback(round, &action);
                (action, record)
            }
        };

        state.push(record);
        debug!("Round {} -> {}", round, action);
        Ok(action)
    }

    /// InBattle -> Idle; persists the record and returns its key
    ///
    /// Returns `None` when no battle was running or the record could not
    /// be saved. The tally counts the battle either way.
    pub fn end_battle(&mut self, result: &str) -> Option<String> {
        let LoopPhase::InBattle(state) = std::mem::take(&mut self.phase) else {
            warn!("end_battle called with no battle in progress");
            return None;
        };

        let record = BattleRecord {
            rounds: state.round(),
            history: state.history().to_vec(),
            result: result.to_string(),
            plan: self.plan.as_ref().map(|p| p.name.clone()),
            ended_at_millis: now_millis(),
        };

        self.tally.record(result);
        if let Err(e) = save_record(self.store.as_ref(), keys::BATTLE_STATS, &self.tally) {
            warn!("Failed to persist battle stats: {}", e);
        }

        let key = keys::battle_record(record.ended_at_millis);
        info!(
            "Battle ended: {} after {} rounds ({} fallbacks); {}/{} won",
            result,
            record.rounds,
            state.fallback_count(),
            self.tally.victories,
            self.tally.battles
        );
        match save_record(self.store.as_ref(), &key, &record) {
            Ok(_) => Some(key),
            Err(e) => {
                warn!("Failed to persist battle record {}: {}", key, e);
                None
            }
        }
    }
}
