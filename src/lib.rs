#![doc(test(attr(deny(warnings))))]

//! DRE Core computes income statements (DRE), multi-dimensional rentability,
//! financial indicators and growth/seasonality analysis from a period's
//! transactions. Every entry point is a pure function of its inputs.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod finance;
pub mod stats;
pub mod utils;

pub use crate::core::ReportService;
pub use config::AnalysisConfig;
pub use domain::{AnalysisInput, FinancialReport};
pub use errors::{EngineError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("DRE Core tracing initialized.");
    });
}
