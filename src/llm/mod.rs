//! LLM integration - advisor seam, HTTP client, prompt contexts and reply parsing

pub mod advisor;
pub mod advisory;
pub mod client;
pub mod context;
pub mod parser;

pub use advisor::{consult, Advisor, DisabledAdvisor};
pub use advisory::AdvisoryPlan;
pub use client::LlmClient;
pub use context::{BattleContext, PlanningContext, PromptContext};
pub use parser::{parse_advisory_plan, parse_battle_action, ReasoningFailure};
