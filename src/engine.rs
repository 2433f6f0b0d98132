//! The external decision-engine seam.
//!
//! Rule execution is an opaque black box consumed through a narrow async
//! contract. Implement [`DecisionEngine`] for whatever engine runs your
//! graphs; the scenario runner only ever talks to this trait.

use crate::error::EvaluationError;
use crate::rule::RuleGraph;
use crate::trace::TraceMap;
use async_trait::async_trait;
use serde_json::Value;

/// Options passed through to the engine on every evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluateOptions {
    /// Request a per-node execution trace alongside the result.
    pub trace: bool,
}

/// The engine's answer for one evaluation: the final result object and,
/// when requested, the per-node trace.
#[derive(Debug, Clone, Default)]
pub struct DecisionResponse {
    pub result: Value,
    pub trace: TraceMap,
}

/// An opaque rule-execution engine.
///
/// Errors are surfaced as opaque strings wrapped in
/// [`EvaluationError::Engine`]; the runner records them per-scenario rather
/// than propagating them.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    async fn evaluate(
        &self,
        graph: &RuleGraph,
        context: &serde_json::Map<String, Value>,
        options: EvaluateOptions,
    ) -> Result<DecisionResponse, EvaluationError>;
}
