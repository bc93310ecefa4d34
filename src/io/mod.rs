//! Input/output helpers.
//!
//! - JSON report export (`export`)

pub mod export;

pub use export::*;
