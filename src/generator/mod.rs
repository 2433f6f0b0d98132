//! Bounded, type-aware synthesis of candidate input values and complete
//! input combinations.

pub mod combinations;
pub mod criteria;
pub mod values;

pub use combinations::*;
pub use criteria::*;
pub use values::*;
