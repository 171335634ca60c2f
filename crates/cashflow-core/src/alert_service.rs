//! Balance alerts raised from a finished projection.

use std::fmt;

use serde::{Deserialize, Serialize};

use cashflow_domain::CashFlowProjection;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertSeverity::Warning => "Warning",
            AlertSeverity::Critical => "Critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAlert {
    pub month: String,
    pub month_index: usize,
    pub balance: f64,
    pub severity: AlertSeverity,
    pub message: String,
}

pub struct AlertService;

impl AlertService {
    /// Flags every month whose running balance is negative (critical) or below
    /// `low_balance_threshold` (warning). Alerts follow the projection's month order.
    pub fn balance_alerts(
        projections: &[CashFlowProjection],
        low_balance_threshold: f64,
    ) -> Vec<BalanceAlert> {
        projections
            .iter()
            .enumerate()
            .filter_map(|(month_index, projection)| {
                let balance = projection.balance;
                let (severity, message) = if balance < 0.0 {
                    (
                        AlertSeverity::Critical,
                        format!(
                            "Negative balance of {:.2} projected for {}",
                            balance, projection.month
                        ),
                    )
                } else if balance < low_balance_threshold {
                    (
                        AlertSeverity::Warning,
                        format!(
                            "Balance of {:.2} in {} is below the {:.2} threshold",
                            balance, projection.month, low_balance_threshold
                        ),
                    )
                } else {
                    return None;
                };
                Some(BalanceAlert {
                    month: projection.month.clone(),
                    month_index,
                    balance,
                    severity,
                    message,
                })
            })
            .collect()
    }

    /// First month in which the balance turns negative, if any.
    pub fn first_shortfall(projections: &[CashFlowProjection]) -> Option<&CashFlowProjection> {
        projections.iter().find(|projection| projection.balance < 0.0)
    }
}
