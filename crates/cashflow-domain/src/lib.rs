//! cashflow-domain
//!
//! Pure domain models for cash-flow forecasting (records, recurrence, projections).
//! No I/O, no CLI, no storage. Only data types, calendar helpers and core enums.

pub mod common;
pub mod projection;
pub mod record;
pub mod recurrence;

pub use common::*;
pub use projection::*;
pub use record::*;
pub use recurrence::*;
