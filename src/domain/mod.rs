//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the FRED sources (`Symbol`) and their column names
//! - raw and date-indexed series (`RawSeries`, `TimeSeries`)
//! - the aligned table every analysis stage consumes (`AlignedTable`)
//! - run configuration (`AnalysisConfig`, `LookbackWindow`)

pub mod types;

pub use types::*;
