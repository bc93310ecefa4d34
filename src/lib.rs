//! `liquidity-signals` library crate.
//!
//! The binary (`liq`) is a thin wrapper around this library so that:
//!
//! - the analysis core is testable without spawning processes or hitting FRED
//! - the core stays pure: fetching, caching and presentation live outside `analysis`
//! - modules are reusable (e.g., a future dashboard or notebook bindings)

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod narrative;
pub mod report;
