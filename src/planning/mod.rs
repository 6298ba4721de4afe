//! Planning pipeline - from configuration to persisted plans

pub mod session;

pub use session::{
    AdvisoryText, PlanningReport, PlanningSession, PlanningSummary, StoredEnemy, StoredRoster,
};
