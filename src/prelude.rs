//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions so library users
//! can reach the core workflow with a single import.
//!
//! # Example
//!
//! ```rust,no_run
//! use kensho::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load a rule and derive its schema
//! let graph = RuleGraph::from_file("path/to/rule.json")?;
//! let schema = RuleSchema::extract(&graph)?;
//!
//! // Synthesize bounded input combinations for it
//! let mut generator = ValueGenerator::new();
//! let combinations = generate_combinations(&mut generator, &schema, None, 10, None);
//! println!("{} candidate inputs", combinations.len());
//! # Ok(())
//! # }
//! ```

// Rule graphs and schema extraction
pub use crate::rule::{
    Edge, Field, FieldId, FieldKind, Node, NodeContent, RuleGraph, RuleSchema, SchemaField,
    derive_name_from_filepath,
};

// Value and combination synthesis
pub use crate::generator::{
    CriteriaOp, ValidationRule, ValueGenerator, cartesian_product_limited, generate_combinations,
    subsets_with_limit,
};

// Scenarios and batch evaluation
pub use crate::scenario::{
    RuleRunReport, Scenario, ScenarioResult, ScenarioRunner, Variable, generate_scenarios,
    values_equal, variables_to_object,
};

// Trace mapping
pub use crate::trace::{TraceDirection, TraceEntry, TraceMap, map_traces, sanitize_key};

// Engine seam
pub use crate::engine::{DecisionEngine, DecisionResponse, EvaluateOptions};

// Tabular codec
pub use crate::csv::{parse_csv, report_to_csv, scenarios_from_csv, scenarios_from_text, scenarios_to_csv};

// Error types
pub use crate::error::{CsvError, EvaluationError, FileError, GenerationError, SchemaError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
