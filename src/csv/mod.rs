//! The tabular codec: deterministic, round-trippable CSV encoding of
//! scenario runs and decoding of uploaded scenario data.

pub mod decode;
pub mod encode;

pub use decode::*;
pub use encode::*;
