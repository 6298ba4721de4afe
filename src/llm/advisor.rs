//! The reasoning collaborator seam
//!
//! Anything that can turn a prompt context into text is an [`Advisor`].
//! [`consult`] wraps one call with a timeout and classifies every failure
//! as a [`ReasoningFailure`] value instead of an error to propagate.

use crate::core::error::{PlannerError, Result};
use crate::llm::context::PromptContext;
use crate::llm::parser::ReasoningFailure;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, context: &PromptContext) -> Result<String>;

    /// Label used in logs
    fn name(&self) -> &str {
        "advisor"
    }
}

/// Stand-in used when no LLM is configured; every call fails
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAdvisor;

#[async_trait]
impl Advisor for DisabledAdvisor {
    async fn advise(&self, _context: &PromptContext) -> Result<String> {
        Err(PlannerError::LlmError("advisor disabled".into()))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// One advisor call with a timeout; non-blank text or a classified failure
pub async fn consult(
    advisor: &dyn Advisor,
    context: &PromptContext,
    timeout: Duration,
) -> std::result::Result<String, ReasoningFailure> {
    match tokio::time::timeout(timeout, advisor.advise(context)).await {
        Err(_) => Err(ReasoningFailure::Timeout(timeout)),
        Ok(Err(e)) => Err(ReasoningFailure::Advisor(e.to_string())),
        Ok(Ok(text)) if text.trim().is_empty() => Err(ReasoningFailure::Empty),
        Ok(Ok(text)) => {
            tracing::debug!("{} replied with {} bytes", advisor.name(), text.len());
            Ok(text)
        }
    }
}
