//! Output shapes of the forecast: monthly projections and the derived summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One synthesized occurrence of a recurring record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectedOccurrence {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Cash movement for one calendar month of the forecast horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProjection {
    pub month: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub inflow: f64,
    pub outflow: f64,
    pub recurring_expenses: f64,
    pub one_time_expenses: f64,
    /// Running balance from the first forecast month through this one.
    pub balance: f64,
}

impl CashFlowProjection {
    /// Net movement of this month alone.
    pub fn net(&self) -> f64 {
        self.inflow - self.outflow
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub total_recurring_monthly: f64,
    pub current_balance: f64,
    pub projected_balance_6_months: f64,
    pub projected_balance_12_months: f64,
    pub recurring_expense_count: usize,
}

/// Projection plus summary as handed to presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub reference_date: NaiveDate,
    pub horizon_months: u32,
    pub projections: Vec<CashFlowProjection>,
    pub summary: ForecastSummary,
}
