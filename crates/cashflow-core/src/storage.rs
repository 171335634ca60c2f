use cashflow_domain::FinancialRecord;

use crate::CoreError;

/// Abstraction over backends able to supply and persist record datasets.
pub trait RecordSource: Send + Sync {
    fn load_records(&self, name: &str) -> Result<Vec<FinancialRecord>, CoreError>;
    fn save_records(&self, name: &str, records: &[FinancialRecord]) -> Result<(), CoreError>;
    fn list_datasets(&self) -> Result<Vec<String>, CoreError>;
}

/// Describes records the forecast will degrade or ignore.
pub fn record_warnings(records: &[FinancialRecord]) -> Vec<String> {
    let mut warnings = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let label = record
            .description
            .clone()
            .unwrap_or_else(|| format!("record #{index}"));
        if record.amount.map_or(true, |amount| !amount.is_finite()) {
            warnings.push(format!("{label} has no usable amount; counted as 0"));
        }
        // One-time rows are bucketed by transaction date only; recurring rows need a seed.
        let placeable = if record.is_recurring {
            record.recurrence_seed().is_some()
        } else {
            record.transaction_date.is_some()
        };
        if !placeable {
            warnings.push(format!("{label} has no date and cannot be placed in a month"));
        }
        if record.is_recurring && record.recurrence_pattern.is_none() {
            warnings.push(format!(
                "{label} is recurring without a pattern; no occurrences are projected"
            ));
        }
        if let (Some(seed), Some(end)) = (record.recurrence_seed(), record.end_date) {
            if record.is_recurring && end < seed {
                warnings.push(format!("{label} ends before its first occurrence"));
            }
        }
    }
    warnings
}
