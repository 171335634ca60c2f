//! Financial records supplied by the upstream data layer.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::common::{parse_date, Amounted};
use crate::recurrence::{lenient_pattern, RecurrencePattern};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Classifies a financial record. Only revenue and expense rows feed the forecast.
pub enum RecordType {
    Revenue,
    Expense,
    Asset,
    Liability,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordType::Revenue => "revenue",
            RecordType::Expense => "expense",
            RecordType::Asset => "asset",
            RecordType::Liability => "liability",
        };
        f.write_str(label)
    }
}

/// A single row of financial data, one-time or recurring.
///
/// Amounts and dates are decoded leniently: an unparsable amount or date is stored as `None`
/// and the forecast treats it as missing instead of rejecting the row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Uuid>,
    #[serde(alias = "record_type")]
    pub record_type: RecordType,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(
        default,
        alias = "transaction_date",
        deserialize_with = "lenient_date"
    )]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default, alias = "is_recurring", deserialize_with = "lenient_flag")]
    pub is_recurring: bool,
    #[serde(
        default,
        alias = "recurrence_pattern",
        deserialize_with = "lenient_pattern",
        skip_serializing_if = "Option::is_none"
    )]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(
        default,
        alias = "next_due_date",
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_due_date: Option<NaiveDate>,
    #[serde(
        default,
        alias = "end_date",
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FinancialRecord {
    pub fn new(record_type: RecordType, amount: f64, transaction_date: NaiveDate) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            record_type,
            amount: Some(amount),
            transaction_date: Some(transaction_date),
            is_recurring: false,
            recurrence_pattern: None,
            next_due_date: None,
            end_date: None,
            description: None,
            category: None,
        }
    }

    pub fn revenue(amount: f64, transaction_date: NaiveDate) -> Self {
        Self::new(RecordType::Revenue, amount, transaction_date)
    }

    pub fn expense(amount: f64, transaction_date: NaiveDate) -> Self {
        Self::new(RecordType::Expense, amount, transaction_date)
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Self {
        self.is_recurring = true;
        self.recurrence_pattern = Some(pattern);
        self
    }

    pub fn with_next_due_date(mut self, date: NaiveDate) -> Self {
        self.next_due_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Absolute amount, zero when the amount is missing or not finite.
    pub fn magnitude(&self) -> f64 {
        self.amount().abs()
    }

    /// Date a recurring series starts counting from.
    pub fn recurrence_seed(&self) -> Option<NaiveDate> {
        self.next_due_date.or(self.transaction_date)
    }

    pub fn is_revenue(&self) -> bool {
        self.record_type == RecordType::Revenue
    }

    pub fn is_expense(&self) -> bool {
        self.record_type == RecordType::Expense
    }

    pub fn is_recurring_expense(&self) -> bool {
        self.is_expense() && self.is_recurring
    }

    pub fn is_one_time_expense(&self) -> bool {
        self.is_expense() && !self.is_recurring
    }
}

impl Amounted for FinancialRecord {
    fn amount(&self) -> f64 {
        match self.amount {
            Some(value) if value.is_finite() => value,
            _ => 0.0,
        }
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(value)) => Some(value),
        Some(RawAmount::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(RawAmount::Other(_)) | None => None,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawDate>::deserialize(deserializer)? {
        Some(RawDate::Text(text)) => parse_date(&text),
        Some(RawDate::Other(_)) | None => None,
    })
}

/// Upstream ids are display-only; anything that is not a UUID decodes to `None`.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(text)) => Uuid::parse_str(text.trim()).ok(),
        Some(RawId::Other(_)) | None => None,
    })
}

/// `null` and unrecognised values read as `false`; `"true"`, `"yes"` and `1` as `true`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(flag)) => flag,
        Some(RawFlag::Number(value)) => value != 0,
        Some(RawFlag::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        Some(RawFlag::Other(_)) | None => false,
    })
}
