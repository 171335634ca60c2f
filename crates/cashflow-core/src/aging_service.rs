//! Aging analysis: buckets dated receivables and payables by days past due.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cashflow_domain::{FinancialRecord, RecordType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AgingBucket {
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 5] = [
        AgingBucket::Current,
        AgingBucket::Days1To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Over90,
    ];

    pub fn for_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=0 => AgingBucket::Current,
            1..=30 => AgingBucket::Days1To30,
            31..=60 => AgingBucket::Days31To60,
            61..=90 => AgingBucket::Days61To90,
            _ => AgingBucket::Over90,
        }
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgingBucket::Current => "Current",
            AgingBucket::Days1To30 => "1-30",
            AgingBucket::Days31To60 => "31-60",
            AgingBucket::Days61To90 => "61-90",
            AgingBucket::Over90 => "90+",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BucketTotal {
    pub bucket: AgingBucket,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgingBreakdown {
    pub buckets: Vec<BucketTotal>,
    pub total: f64,
}

impl Default for AgingBreakdown {
    fn default() -> Self {
        Self {
            buckets: AgingBucket::ALL
                .iter()
                .map(|bucket| BucketTotal {
                    bucket: *bucket,
                    total: 0.0,
                    count: 0,
                })
                .collect(),
            total: 0.0,
        }
    }
}

impl AgingBreakdown {
    fn add(&mut self, bucket: AgingBucket, amount: f64) {
        if let Some(slot) = self.buckets.iter_mut().find(|slot| slot.bucket == bucket) {
            slot.total += amount;
            slot.count += 1;
        }
        self.total += amount;
    }

    pub fn bucket(&self, bucket: AgingBucket) -> Option<&BucketTotal> {
        self.buckets.iter().find(|slot| slot.bucket == bucket)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgingReport {
    pub reference_date: NaiveDate,
    pub receivables: AgingBreakdown,
    pub payables: AgingBreakdown,
}

pub struct AgingService;

impl AgingService {
    /// Buckets one-time revenue (receivables) and expense (payables) records by how many days
    /// their due date lies before `reference`. Recurring and undated records are skipped.
    pub fn analyze(records: &[FinancialRecord], reference: NaiveDate) -> AgingReport {
        let mut report = AgingReport {
            reference_date: reference,
            receivables: AgingBreakdown::default(),
            payables: AgingBreakdown::default(),
        };
        for record in records.iter().filter(|record| !record.is_recurring) {
            let Some(due) = record.next_due_date.or(record.transaction_date) else {
                continue;
            };
            let bucket = AgingBucket::for_days_overdue((reference - due).num_days());
            match record.record_type {
                RecordType::Revenue => report.receivables.add(bucket, record.magnitude()),
                RecordType::Expense => report.payables.add(bucket, record.magnitude()),
                RecordType::Asset | RecordType::Liability => {}
            }
        }
        report
    }
}
