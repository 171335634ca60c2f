#![doc(test(attr(deny(warnings))))]

//! Cash-flow forecasting from revenue and expense records.
//!
//! The forecasting engine lives in `cashflow-core`; this crate adds the export
//! formats and the `cashflow_cli` command-line front end.

pub mod cli;
pub mod errors;
pub mod export;
pub mod utils;

pub use cashflow_core::{
    AgingReport, AgingService, AlertService, BalanceAlert, Clock, CoreError, FixedClock,
    ForecastService, DEFAULT_HORIZON_MONTHS, MAX_HORIZON_MONTHS,
};
pub use cashflow_domain::{
    CashFlowProjection, FinancialRecord, ForecastReport, ForecastSummary, ProjectedOccurrence,
    RecordType, RecurrencePattern,
};
pub use errors::ForecastError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

const VERBOSE_DIRECTIVE: &str = "cashflow_forecast=debug,cashflow_core=debug";

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_verbosity(false);
}

/// Like [`init`], with debug-level events for the forecasting crates when `verbose` is set.
pub fn init_with_verbosity(verbose: bool) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(verbose.then_some(VERBOSE_DIRECTIVE));
        tracing::info!("Cashflow forecast tracing initialized.");
    });
}
