use chrono::NaiveDate;

use crate::{
    aging_service::{AgingBucket, AgingService},
    alert_service::{AlertService, AlertSeverity},
    forecast_service::{ForecastService, RecordPartition, DEFAULT_HORIZON_MONTHS},
    storage::record_warnings,
    time::FixedClock,
    CoreError,
};
use cashflow_domain::{FinancialRecord, MonthWindow, RecordType, RecurrencePattern};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 3, 15)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn single_revenue_carries_balance_forward() {
    let records = vec![FinancialRecord::revenue(5000.0, date(2025, 3, 2))];

    let projection = ForecastService::build_projection(&records, today(), 3).expect("projection");

    assert_eq!(projection.len(), 3);
    assert_eq!(projection[0].month, "Mar 2025");
    assert_eq!(projection[0].inflow, 5000.0);
    assert_eq!(projection[0].outflow, 0.0);
    assert_eq!(projection[0].balance, 5000.0);
    for later in &projection[1..] {
        assert_eq!(later.inflow, 0.0);
        assert_eq!(later.outflow, 0.0);
        assert_eq!(later.balance, 5000.0);
    }
}

#[test]
fn monthly_recurring_expense_is_normalised_and_repeats() {
    let records =
        vec![FinancialRecord::expense(-200.0, today()).with_recurrence(RecurrencePattern::Monthly)];

    let projection = ForecastService::build_projection(&records, today(), 3).expect("projection");

    let recurring: Vec<f64> = projection.iter().map(|p| p.recurring_expenses).collect();
    assert_eq!(recurring, vec![200.0, 200.0, 200.0]);
    let balances: Vec<f64> = projection.iter().map(|p| p.balance).collect();
    assert_eq!(balances, vec![-200.0, -400.0, -600.0]);
    assert!(projection.iter().all(|p| p.one_time_expenses == 0.0));
}

#[test]
fn weekly_recurring_expense_counts_occurrences_in_current_month() {
    let record = FinancialRecord::expense(50.0, today()).with_recurrence(RecurrencePattern::Weekly);
    let window = MonthWindow::containing(today());

    let occurrences = ForecastService::project_recurring(&record, today(), 1);
    let in_month = occurrences
        .iter()
        .filter(|occurrence| window.contains(occurrence.date))
        .count();
    let projection =
        ForecastService::build_projection(std::slice::from_ref(&record), today(), 1)
            .expect("projection");

    // Mar 15, 22 and 29.
    assert_eq!(in_month, 3);
    assert_eq!(projection.len(), 1);
    assert!(approx(projection[0].recurring_expenses, 150.0));
}

#[test]
fn recurring_expense_ending_today_emits_nothing_once_seed_passes_end() {
    let record = FinancialRecord::expense(100.0, date(2025, 2, 20))
        .with_recurrence(RecurrencePattern::Monthly)
        .with_end_date(today());

    let projection =
        ForecastService::build_projection(std::slice::from_ref(&record), today(), 2)
            .expect("projection");

    assert!(ForecastService::project_recurring(&record, today(), 2).is_empty());
    assert_eq!(projection[0].recurring_expenses, 0.0);
    assert_eq!(projection[1].recurring_expenses, 0.0);
}

#[test]
fn empty_input_yields_zeroed_horizon() {
    let report = ForecastService::forecast(&[], today(), DEFAULT_HORIZON_MONTHS).expect("report");

    assert_eq!(report.projections.len(), 12);
    assert!(report.projections.iter().all(|p| p.inflow == 0.0
        && p.outflow == 0.0
        && p.recurring_expenses == 0.0
        && p.one_time_expenses == 0.0
        && p.balance == 0.0));
    assert_eq!(report.summary.current_balance, 0.0);
    assert_eq!(report.summary.recurring_expense_count, 0);
    assert_eq!(report.projections[11].month, "Feb 2026");
}

#[test]
fn zero_horizon_is_rejected() {
    let err = ForecastService::build_projection(&[], today(), 0).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn oversized_horizon_is_rejected() {
    let err = ForecastService::forecast(&[], today(), 100_000).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn seed_in_the_past_advances_to_first_future_occurrence() {
    let record = FinancialRecord::expense(80.0, date(2020, 1, 31))
        .with_recurrence(RecurrencePattern::Monthly);

    let occurrences = ForecastService::project_recurring(&record, today(), 3);

    let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 3, 31), date(2025, 4, 30), date(2025, 5, 31)]
    );
    assert!(occurrences.iter().all(|o| o.amount == 80.0));
}

#[test]
fn next_due_date_overrides_transaction_date_as_seed() {
    let record = FinancialRecord::expense(30.0, date(2025, 1, 1))
        .with_recurrence(RecurrencePattern::Quarterly)
        .with_next_due_date(date(2025, 4, 10));

    let occurrences = ForecastService::project_recurring(&record, today(), 12);

    let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2025, 4, 10),
            date(2025, 7, 10),
            date(2025, 10, 10),
            date(2026, 1, 10)
        ]
    );
}

#[test]
fn occurrences_never_pass_end_date() {
    let end = date(2025, 5, 1);
    let record = FinancialRecord::expense(10.0, date(2025, 1, 6))
        .with_recurrence(RecurrencePattern::Weekly)
        .with_end_date(end);

    let occurrences = ForecastService::project_recurring(&record, today(), 12);

    assert!(!occurrences.is_empty());
    assert!(occurrences.iter().all(|o| o.date <= end && o.date >= today()));
}

#[test]
fn recurrence_terminates_for_every_pattern() {
    for pattern in [
        RecurrencePattern::Weekly,
        RecurrencePattern::Monthly,
        RecurrencePattern::Quarterly,
        RecurrencePattern::Yearly,
        RecurrencePattern::Unspecified,
    ] {
        let record = FinancialRecord::expense(1.0, date(1990, 6, 1)).with_recurrence(pattern);
        let occurrences = ForecastService::project_recurring(&record, today(), 24);
        assert!(!occurrences.is_empty(), "{pattern} produced nothing");
        assert!(occurrences.len() <= 24 * 5, "{pattern} produced too many");
        assert!(occurrences.windows(2).all(|pair| pair[0].date < pair[1].date));
    }
}

#[test]
fn unspecified_pattern_projects_monthly() {
    let monthly =
        FinancialRecord::expense(25.0, today()).with_recurrence(RecurrencePattern::Monthly);
    let fallback =
        FinancialRecord::expense(25.0, today()).with_recurrence(RecurrencePattern::Unspecified);

    assert_eq!(
        ForecastService::project_recurring(&monthly, today(), 6),
        ForecastService::project_recurring(&fallback, today(), 6)
    );
}

#[test]
fn recurring_flag_without_pattern_projects_nothing() {
    let mut record = FinancialRecord::expense(40.0, today());
    record.is_recurring = true;

    assert!(ForecastService::project_recurring(&record, today(), 12).is_empty());
    let projection =
        ForecastService::build_projection(std::slice::from_ref(&record), today(), 2)
            .expect("projection");
    assert_eq!(projection[0].outflow, 0.0);
}

#[test]
fn recurring_expenses_are_not_double_counted_as_one_time() {
    let records = vec![
        FinancialRecord::expense(300.0, today()).with_recurrence(RecurrencePattern::Monthly),
        FinancialRecord::expense(-45.5, date(2025, 3, 3)),
    ];

    let partition = RecordPartition::split(&records);
    let projection = ForecastService::build_projection(&records, today(), 1).expect("projection");

    assert_eq!(partition.recurring_expenses.len(), 1);
    assert_eq!(partition.one_time_expenses.len(), 1);
    assert_eq!(projection[0].one_time_expenses, 45.5);
    assert_eq!(projection[0].recurring_expenses, 300.0);
    assert_eq!(projection[0].outflow, 345.5);
}

#[test]
fn revenue_is_historical_only() {
    let records = vec![
        FinancialRecord::revenue(1000.0, today()).with_recurrence(RecurrencePattern::Monthly),
        FinancialRecord::revenue(250.0, date(2025, 2, 28)),
    ];

    let projection = ForecastService::build_projection(&records, today(), 3).expect("projection");

    assert_eq!(projection[0].inflow, 1000.0);
    assert_eq!(projection[1].inflow, 0.0);
    assert_eq!(projection[2].inflow, 0.0);
}

#[test]
fn assets_and_liabilities_are_ignored() {
    let records = vec![
        FinancialRecord::new(RecordType::Asset, 9000.0, today()),
        FinancialRecord::new(RecordType::Liability, 4000.0, today()),
    ];

    let projection = ForecastService::build_projection(&records, today(), 1).expect("projection");

    assert_eq!(projection[0].inflow, 0.0);
    assert_eq!(projection[0].outflow, 0.0);
}

#[test]
fn malformed_records_degrade_to_zero_or_are_skipped() {
    let mut nan_amount = FinancialRecord::expense(10.0, today());
    nan_amount.amount = Some(f64::NAN);
    let mut missing_amount = FinancialRecord::revenue(10.0, today());
    missing_amount.amount = None;
    let mut undated = FinancialRecord::expense(99.0, today());
    undated.transaction_date = None;
    let records = vec![
        nan_amount,
        missing_amount,
        undated,
        FinancialRecord::revenue(500.0, today()),
    ];

    let projection = ForecastService::build_projection(&records, today(), 2).expect("projection");

    assert_eq!(projection[0].inflow, 500.0);
    assert_eq!(projection[0].outflow, 0.0);
    assert_eq!(projection[1].balance, 500.0);
    assert_eq!(record_warnings(&records).len(), 3);
}

#[test]
fn one_time_record_dated_only_by_next_due_date_is_reported() {
    let mut due_only = FinancialRecord::expense(80.0, today()).with_description("Invoice 7");
    due_only.transaction_date = None;
    due_only.next_due_date = Some(date(2025, 3, 20));
    let mut recurring_due_only =
        FinancialRecord::expense(80.0, today()).with_recurrence(RecurrencePattern::Monthly);
    recurring_due_only.transaction_date = None;
    recurring_due_only.next_due_date = Some(date(2025, 3, 20));

    let records = vec![due_only, recurring_due_only];
    let projection = ForecastService::build_projection(&records, today(), 1).expect("projection");
    let warnings = record_warnings(&records);

    assert_eq!(projection[0].one_time_expenses, 0.0);
    assert_eq!(projection[0].recurring_expenses, 80.0);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("Invoice 7 has no date"));
}

#[test]
fn running_balance_matches_monthly_nets() {
    let records = vec![
        FinancialRecord::revenue(4200.0, date(2025, 3, 1)),
        FinancialRecord::revenue(1800.0, date(2025, 4, 20)),
        FinancialRecord::expense(-650.0, date(2025, 3, 30)),
        FinancialRecord::expense(120.0, date(2025, 5, 5)),
        FinancialRecord::expense(75.0, date(2025, 3, 20))
            .with_recurrence(RecurrencePattern::Weekly),
        FinancialRecord::expense(1200.0, date(2024, 6, 1))
            .with_recurrence(RecurrencePattern::Yearly),
        FinancialRecord::expense(-900.0, date(2025, 1, 15))
            .with_recurrence(RecurrencePattern::Quarterly),
    ];

    let projection = ForecastService::build_projection(&records, today(), 12).expect("projection");

    assert!(approx(projection[0].balance, projection[0].net()));
    for pair in projection.windows(2) {
        assert!(approx(
            pair[1].balance,
            pair[0].balance + pair[1].inflow - pair[1].outflow
        ));
    }
    assert!(projection
        .iter()
        .all(|p| p.recurring_expenses >= 0.0 && p.one_time_expenses >= 0.0));
}

#[test]
fn projection_is_deterministic() {
    let records = vec![
        FinancialRecord::revenue(3100.0, date(2025, 3, 4)),
        FinancialRecord::expense(60.0, date(2025, 3, 1)).with_recurrence(RecurrencePattern::Weekly),
    ];

    let first = ForecastService::forecast(&records, today(), 12).expect("first");
    let second = ForecastService::forecast(&records, today(), 12).expect("second");

    assert_eq!(first, second);
}

#[test]
fn summary_normalises_weekly_and_yearly_amounts() {
    let weekly =
        vec![FinancialRecord::expense(100.0, today()).with_recurrence(RecurrencePattern::Weekly)];
    let yearly =
        vec![FinancialRecord::expense(1200.0, today()).with_recurrence(RecurrencePattern::Yearly)];

    let weekly_summary = ForecastService::summarize(&weekly, &[]);
    let yearly_summary = ForecastService::summarize(&yearly, &[]);

    assert!(approx(weekly_summary.total_recurring_monthly, 433.0));
    assert!(approx(yearly_summary.total_recurring_monthly, 100.0));
    assert_eq!(weekly_summary.recurring_expense_count, 1);
}

#[test]
fn summary_reads_balances_with_bounds_checks() {
    let records = vec![
        FinancialRecord::revenue(1000.0, today()),
        FinancialRecord::expense(100.0, today()).with_recurrence(RecurrencePattern::Monthly),
    ];

    let short = ForecastService::forecast(&records, today(), 3).expect("short");
    let long = ForecastService::forecast(&records, today(), 12).expect("long");

    assert_eq!(short.summary.current_balance, 900.0);
    assert_eq!(short.summary.projected_balance_6_months, 0.0);
    assert_eq!(short.summary.projected_balance_12_months, 0.0);
    assert_eq!(long.summary.projected_balance_6_months, 400.0);
    assert_eq!(long.summary.projected_balance_12_months, -200.0);
    assert_eq!(long.summary.total_recurring_monthly, 100.0);
}

#[test]
fn recurring_count_includes_every_recurring_record() {
    let mut no_pattern = FinancialRecord::expense(10.0, today());
    no_pattern.is_recurring = true;
    let records = vec![
        FinancialRecord::revenue(10.0, today()).with_recurrence(RecurrencePattern::Monthly),
        no_pattern,
        FinancialRecord::expense(10.0, today()),
    ];

    let summary = ForecastService::summarize(&records, &[]);

    assert_eq!(summary.recurring_expense_count, 2);
    assert_eq!(summary.total_recurring_monthly, 10.0);
}

#[test]
fn forecast_now_uses_injected_clock() {
    let clock = FixedClock::new(date(2024, 12, 10));
    let records = vec![FinancialRecord::revenue(10.0, date(2024, 12, 1))];

    let report = ForecastService::forecast_now(&clock, &records, 2).expect("report");

    assert_eq!(report.reference_date, date(2024, 12, 10));
    assert_eq!(report.projections[0].month, "Dec 2024");
    assert_eq!(report.projections[1].month, "Jan 2025");
    assert_eq!(report.projections[1].balance, 10.0);
}

#[test]
fn alerts_flag_negative_and_low_balances() {
    let records = vec![
        FinancialRecord::revenue(250.0, today()),
        FinancialRecord::expense(200.0, today()).with_recurrence(RecurrencePattern::Monthly),
    ];
    let projection = ForecastService::build_projection(&records, today(), 3).expect("projection");

    let alerts = AlertService::balance_alerts(&projection, 100.0);

    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    assert_eq!(alerts[0].balance, 50.0);
    assert_eq!(alerts[1].severity, AlertSeverity::Critical);
    assert_eq!(alerts[1].month_index, 1);
    assert_eq!(
        AlertService::first_shortfall(&projection).map(|p| p.month.as_str()),
        Some("Apr 2025")
    );
}

#[test]
fn alerts_are_empty_for_healthy_projection() {
    let records = vec![FinancialRecord::revenue(10_000.0, today())];
    let projection = ForecastService::build_projection(&records, today(), 6).expect("projection");

    assert!(AlertService::balance_alerts(&projection, 0.0).is_empty());
    assert!(AlertService::first_shortfall(&projection).is_none());
}

#[test]
fn aging_buckets_by_days_overdue() {
    let records = vec![
        FinancialRecord::revenue(100.0, date(2025, 3, 20)),
        FinancialRecord::revenue(200.0, date(2025, 3, 1)),
        FinancialRecord::revenue(300.0, date(2025, 1, 30)),
        FinancialRecord::expense(-400.0, date(2024, 11, 1)),
        FinancialRecord::expense(50.0, date(2025, 1, 1))
            .with_recurrence(RecurrencePattern::Monthly),
    ];

    let report = AgingService::analyze(&records, today());

    let current = report.receivables.bucket(AgingBucket::Current).unwrap();
    assert_eq!((current.total, current.count), (100.0, 1));
    let recent = report.receivables.bucket(AgingBucket::Days1To30).unwrap();
    assert_eq!((recent.total, recent.count), (200.0, 1));
    let older = report.receivables.bucket(AgingBucket::Days31To60).unwrap();
    assert_eq!((older.total, older.count), (300.0, 1));
    assert_eq!(report.receivables.total, 600.0);

    let stale = report.payables.bucket(AgingBucket::Over90).unwrap();
    assert_eq!((stale.total, stale.count), (400.0, 1));
    assert_eq!(report.payables.total, 400.0);
}

#[test]
fn aging_bucket_boundaries() {
    assert_eq!(AgingBucket::for_days_overdue(-5), AgingBucket::Current);
    assert_eq!(AgingBucket::for_days_overdue(0), AgingBucket::Current);
    assert_eq!(AgingBucket::for_days_overdue(30), AgingBucket::Days1To30);
    assert_eq!(AgingBucket::for_days_overdue(31), AgingBucket::Days31To60);
    assert_eq!(AgingBucket::for_days_overdue(90), AgingBucket::Days61To90);
    assert_eq!(AgingBucket::for_days_overdue(91), AgingBucket::Over90);
}
