//! Cash-flow forecasting: recurring-expense projection, monthly bucketing and running balance.

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use cashflow_domain::{
    Amounted, CashFlowProjection, FinancialRecord, ForecastReport, ForecastSummary, MonthWindow,
    ProjectedOccurrence, RecurrencePattern, TimeUnit,
};

use crate::{time::Clock, CoreError};

pub const DEFAULT_HORIZON_MONTHS: u32 = 12;
pub const MAX_HORIZON_MONTHS: u32 = 1200;

const SIX_MONTHS_INDEX: usize = 5;
const TWELVE_MONTHS_INDEX: usize = 11;

/// Records split once by the role they play in the projection.
///
/// A recurring expense lives only in `recurring_expenses`; it never contributes to the
/// one-time sums.
#[derive(Debug, Default)]
pub struct RecordPartition<'a> {
    pub revenue: Vec<&'a FinancialRecord>,
    pub one_time_expenses: Vec<&'a FinancialRecord>,
    pub recurring_expenses: Vec<&'a FinancialRecord>,
}

impl<'a> RecordPartition<'a> {
    pub fn split(records: &'a [FinancialRecord]) -> Self {
        let mut partition = RecordPartition::default();
        for record in records {
            if record.is_revenue() {
                partition.revenue.push(record);
            } else if record.is_recurring_expense() {
                partition.recurring_expenses.push(record);
            } else if record.is_one_time_expense() {
                partition.one_time_expenses.push(record);
            }
        }
        partition
    }
}

pub struct ForecastService;

impl ForecastService {
    /// Synthesizes the future occurrences of a recurring record within the horizon.
    ///
    /// Occurrences before `reference` are skipped; the first emitted one is on or after it.
    /// Emission stops at `reference + horizon_months` (exclusive) or after `end_date`
    /// (inclusive), whichever comes first. Records that are not recurring, have no pattern, or
    /// have no usable seed date yield nothing.
    pub fn project_recurring(
        record: &FinancialRecord,
        reference: NaiveDate,
        horizon_months: u32,
    ) -> Vec<ProjectedOccurrence> {
        let mut occurrences = Vec::new();
        if !record.is_recurring {
            return occurrences;
        }
        let (Some(pattern), Some(seed)) = (record.recurrence_pattern, record.recurrence_seed())
        else {
            return occurrences;
        };
        let Some(horizon_end) = reference.checked_add_months(Months::new(horizon_months)) else {
            return occurrences;
        };
        let Some(mut index) = first_due_index(pattern, seed, reference) else {
            return occurrences;
        };

        let amount = record.magnitude();
        while let Some(date) = pattern.occurrence(seed, index) {
            if date >= horizon_end {
                break;
            }
            if record.end_date.is_some_and(|end| date > end) {
                break;
            }
            occurrences.push(ProjectedOccurrence { date, amount });
            match index.checked_add(1) {
                Some(next) => index = next,
                None => break,
            }
        }
        occurrences
    }

    /// Builds one projection per calendar month, starting with the month containing
    /// `reference`.
    pub fn build_projection(
        records: &[FinancialRecord],
        reference: NaiveDate,
        horizon_months: u32,
    ) -> Result<Vec<CashFlowProjection>, CoreError> {
        validate_horizon(horizon_months)?;

        let partition = RecordPartition::split(records);
        debug!(
            revenue = partition.revenue.len(),
            one_time = partition.one_time_expenses.len(),
            recurring = partition.recurring_expenses.len(),
            horizon_months,
            %reference,
            "building cash-flow projection"
        );

        let windows = (0..horizon_months)
            .map(|offset| {
                MonthWindow::offset_from(reference, offset).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "forecast month {offset} falls outside the supported calendar range"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut recurring_totals = vec![0.0; windows.len()];
        for record in &partition.recurring_expenses {
            for occurrence in Self::project_recurring(record, reference, horizon_months) {
                if let Some(slot) = month_index(reference, occurrence.date)
                    .and_then(|index| recurring_totals.get_mut(index))
                {
                    *slot += occurrence.amount;
                }
            }
        }

        let mut projections: Vec<CashFlowProjection> = windows
            .iter()
            .zip(recurring_totals)
            .map(|(window, recurring_expenses)| {
                let inflow = sum_in_window(
                    &partition.revenue,
                    window,
                    <FinancialRecord as Amounted>::amount,
                );
                let one_time_expenses = sum_in_window(
                    &partition.one_time_expenses,
                    window,
                    FinancialRecord::magnitude,
                );
                CashFlowProjection {
                    month: window.label(),
                    start: window.start,
                    end: window.end,
                    inflow,
                    outflow: one_time_expenses + recurring_expenses,
                    recurring_expenses,
                    one_time_expenses,
                    balance: 0.0,
                }
            })
            .collect();

        let mut running = 0.0;
        for projection in &mut projections {
            running += projection.net();
            projection.balance = running;
        }

        Ok(projections)
    }

    /// Derives headline figures from the records and an already-built projection.
    pub fn summarize(
        records: &[FinancialRecord],
        projections: &[CashFlowProjection],
    ) -> ForecastSummary {
        let total_recurring_monthly: f64 = records
            .iter()
            .filter(|record| record.is_recurring_expense())
            .map(|record| {
                record
                    .recurrence_pattern
                    .unwrap_or(RecurrencePattern::Unspecified)
                    .monthly_equivalent(record.magnitude())
            })
            .sum();
        let balance_at = |index: usize| projections.get(index).map_or(0.0, |p| p.balance);

        ForecastSummary {
            total_recurring_monthly,
            current_balance: balance_at(0),
            projected_balance_6_months: balance_at(SIX_MONTHS_INDEX),
            projected_balance_12_months: balance_at(TWELVE_MONTHS_INDEX),
            recurring_expense_count: records.iter().filter(|record| record.is_recurring).count(),
        }
    }

    /// Builds the projection and its summary in one call.
    pub fn forecast(
        records: &[FinancialRecord],
        reference: NaiveDate,
        horizon_months: u32,
    ) -> Result<ForecastReport, CoreError> {
        let projections = Self::build_projection(records, reference, horizon_months)?;
        let summary = Self::summarize(records, &projections);
        Ok(ForecastReport {
            reference_date: reference,
            horizon_months,
            projections,
            summary,
        })
    }

    /// Same as [`ForecastService::forecast`], anchored to the clock's current date.
    pub fn forecast_now(
        clock: &dyn Clock,
        records: &[FinancialRecord],
        horizon_months: u32,
    ) -> Result<ForecastReport, CoreError> {
        Self::forecast(records, clock.today(), horizon_months)
    }
}

pub fn validate_horizon(horizon_months: u32) -> Result<(), CoreError> {
    if horizon_months < 1 {
        return Err(CoreError::Validation(
            "forecast horizon must be at least 1 month".into(),
        ));
    }
    if horizon_months > MAX_HORIZON_MONTHS {
        return Err(CoreError::Validation(format!(
            "forecast horizon must not exceed {MAX_HORIZON_MONTHS} months"
        )));
    }
    Ok(())
}

/// Index of the first occurrence on or after `reference`.
///
/// Jumps close to the answer arithmetically, then steps forward. Occurrence dates strictly
/// increase with the index, so the stepping loop runs at most a couple of times.
fn first_due_index(
    pattern: RecurrencePattern,
    seed: NaiveDate,
    reference: NaiveDate,
) -> Option<u32> {
    if seed >= reference {
        return Some(0);
    }
    let interval = pattern.interval();
    let estimate = match interval.unit {
        TimeUnit::Week => {
            let days = (reference - seed).num_days();
            days / (7 * i64::from(interval.every))
        }
        TimeUnit::Month | TimeUnit::Year => {
            let months_per_step = match interval.unit {
                TimeUnit::Year => 12 * i64::from(interval.every),
                _ => i64::from(interval.every),
            };
            month_distance(seed, reference) / months_per_step
        }
    };
    let mut index = u32::try_from(estimate.max(0)).ok()?;
    loop {
        let date = pattern.occurrence(seed, index)?;
        if date >= reference {
            return Some(index);
        }
        index = index.checked_add(1)?;
    }
}

fn month_distance(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Position of `date`'s month relative to the month containing `reference`.
fn month_index(reference: NaiveDate, date: NaiveDate) -> Option<usize> {
    usize::try_from(month_distance(reference, date)).ok()
}

fn sum_in_window(
    records: &[&FinancialRecord],
    window: &MonthWindow,
    value: impl Fn(&FinancialRecord) -> f64,
) -> f64 {
    records
        .iter()
        .filter(|record| {
            record
                .transaction_date
                .is_some_and(|date| window.contains(date))
        })
        .map(|record| value(record))
        .sum()
}
