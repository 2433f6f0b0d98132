//! # Kensho - Scenario Synthesis and Verification Engine
//!
//! **Kensho** answers a hard question about business-rule decision graphs:
//! given a rule's declared input/output schema, can we synthesize
//! representative test inputs, run them through the rule, and prove the rule
//! behaves as expected?
//!
//! The crate is engine-agnostic. Rule execution itself is an opaque black
//! box consumed through the [`DecisionEngine`](engine::DecisionEngine)
//! trait; everything around it lives here:
//!
//! 1.  **Describe**: derive a structural input/output schema from a rule's
//!     node/edge graph ([`rule::RuleSchema::extract`]).
//! 2.  **Synthesize**: generate bounded, type-aware combinations of input
//!     values from the schema ([`generator`]), with a randomized fallback
//!     for combinatorially explosive spaces.
//! 3.  **Verify**: drive generated or supplied scenarios through the engine
//!     and compare results against expectations
//!     ([`scenario::ScenarioRunner`]), mapping opaque execution traces back
//!     onto named schema fields ([`trace`]).
//! 4.  **Report**: render the outcome as a deterministic, round-trippable
//!     CSV report ([`csv`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kensho::engine::{DecisionEngine, DecisionResponse, EvaluateOptions};
//! use kensho::error::EvaluationError;
//! use kensho::generator::ValueGenerator;
//! use kensho::rule::RuleGraph;
//! use kensho::scenario::{ScenarioRunner, generate_scenarios};
//! use async_trait::async_trait;
//!
//! // Implement the engine seam for whatever runs your decision graphs.
//! struct MyEngine;
//!
//! #[async_trait]
//! impl DecisionEngine for MyEngine {
//!     async fn evaluate(
//!         &self,
//!         graph: &RuleGraph,
//!         context: &serde_json::Map<String, serde_json::Value>,
//!         options: EvaluateOptions,
//!     ) -> Result<DecisionResponse, EvaluationError> {
//!         // Hand the graph and context to your execution engine here.
//!         Ok(DecisionResponse::default())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load a rule graph and decode a CSV of test scenarios for it.
//!     let graph = RuleGraph::from_file("rules/eligibility.json")?;
//!     let csv_text = std::fs::read_to_string("tests/eligibility.csv")?;
//!     let scenarios = kensho::csv::scenarios_from_text(&csv_text, "eligibility.json")?;
//!
//!     // Or synthesize scenarios straight from the rule's schema.
//!     let mut generator = ValueGenerator::with_seed(42);
//!     let _generated =
//!         generate_scenarios(&mut generator, &graph, "eligibility.json", None, 10, None)?;
//!
//!     // Evaluate everything and render the report.
//!     let runner = ScenarioRunner::new(MyEngine);
//!     let (report_csv, all_passed) = runner.csv_for_rule_run(&graph, &scenarios).await?;
//!     println!("{}", report_csv);
//!     println!("all tests passed: {}", all_passed);
//!
//!     Ok(())
//! }
//! ```

pub mod csv;
pub mod engine;
pub mod error;
pub mod generator;
pub mod prelude;
pub mod rule;
pub mod scenario;
pub mod trace;
