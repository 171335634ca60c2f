//! cashflow-core
//!
//! Forecasting, alerting and aging services built on cashflow-domain.
//! No CLI, no terminal I/O, no direct storage interactions.

pub mod aging_service;
pub mod alert_service;
pub mod error;
pub mod forecast_service;
pub mod storage;
pub mod time;

pub use aging_service::*;
pub use alert_service::*;
pub use error::CoreError;
pub use forecast_service::*;
pub use time::{Clock, FixedClock};

#[cfg(test)]
mod tests;
