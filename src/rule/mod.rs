//! The rule graph data model, schema extraction, and file loading.

pub mod graph;
pub mod loader;
pub mod schema;

pub use graph::*;
pub use loader::*;
pub use schema::*;
