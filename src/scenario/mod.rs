//! Scenario data model and batch evaluation.

pub mod model;
pub mod runner;

pub use model::*;
pub use runner::*;
