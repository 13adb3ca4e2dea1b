//! The decision-maker boundary.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use webpilot_core_types::{ActionRecord, Observation, ToolCall};

use crate::errors::AgentError;

/// Abstraction over whatever decides the next actions, so vendors can be
/// swapped and the loop can be tested offline.
///
/// One call per cycle: the full task text, the current observation, and the
/// accumulated history go in; an ordered batch of intended actions comes
/// out. An empty batch is a valid answer ("thinking"), not an error.
#[async_trait]
pub trait DecisionMaker: Send + Sync {
    async fn decide(
        &self,
        task: &str,
        observation: &Observation,
        history: &[ActionRecord],
    ) -> Result<Vec<ToolCall>, AgentError>;
}

/// Deterministic decision-maker used for tests and offline development.
///
/// Pops one pre-scripted batch per cycle; once the script is exhausted it
/// keeps answering with empty batches.
#[derive(Debug, Default)]
pub struct ScriptedDecisionMaker {
    batches: Mutex<VecDeque<Vec<ToolCall>>>,
}

impl ScriptedDecisionMaker {
    pub fn new(batches: Vec<Vec<ToolCall>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
        }
    }
}

#[async_trait]
impl DecisionMaker for ScriptedDecisionMaker {
    async fn decide(
        &self,
        _task: &str,
        _observation: &Observation,
        _history: &[ActionRecord],
    ) -> Result<Vec<ToolCall>, AgentError> {
        let mut batches = self
            .batches
            .lock()
            .map_err(|_| AgentError::decision("scripted decision state poisoned"))?;
        Ok(batches.pop_front().unwrap_or_default())
    }
}
