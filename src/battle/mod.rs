//! Battle system - per-turn decisions against a selected plan
//!
//! The loop owns the round counter and action history. What it emits is
//! hand-off data; pressing keys is someone else's job.

pub mod action;
pub mod decision_loop;
pub mod state;

// Re-exports for convenient access
pub use action::{ActionKind, BattleAction, TargetDirection, FALLBACK_RATIONALE};
pub use decision_loop::{DecisionLoop, LoopPhase, DEFAULT_DECISION_TIMEOUT};
pub use state::{ActionRecord, BattleRecord, BattleState, BattleTally};
