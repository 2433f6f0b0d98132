use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while deriving a schema from a rule graph.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("No output node found in the rule graph")]
    MissingOutputNode,
}

/// Errors that can occur during value-space generation.
///
/// The public generator API degrades these to an empty value set instead of
/// failing the run; scenario synthesis is best-effort.
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("Field '{field}' has an unsupported type: '{type_name}'")]
    UnsupportedFieldType { field: String, type_name: String },
}

/// Errors that can occur while evaluating a scenario against the engine.
///
/// Engine failures are opaque strings by contract; they are recorded on the
/// failing scenario's result and never abort the batch.
#[derive(Error, Debug, Clone)]
pub enum EvaluationError {
    #[error("Decision engine failed: {0}")]
    Engine(String),
}

/// Errors that can occur while decoding CSV scenario data.
#[derive(Error, Debug, Clone)]
pub enum CsvError {
    #[error("CSV content is empty or invalid")]
    Empty,
}

/// Errors that can occur while loading a rule graph from disk.
///
/// `NotFound` is kept distinct from other failures so callers can map it to
/// not-found semantics at their own boundary.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Rule file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read rule file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse rule file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
