//! Starrail Planner - combat analytics and strategy planning for a turn-based RPG

pub mod analysis;
pub mod battle;
pub mod core;
pub mod llm;
pub mod planning;
pub mod stats;
pub mod storage;
pub mod strategy;
