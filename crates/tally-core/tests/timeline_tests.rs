use chrono::NaiveDate;
use tally_core::{compute_timeline, CoreError, TimelinePoint};
use tally_domain::{EventDraft, Recurrence, RecurrencePattern};

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn monthly_end_of_month_series_clamps_without_drifting() {
    let rule = Recurrence::new(RecurrencePattern::Monthly, d(2024, 1, 31));
    let events = vec![EventDraft::recurring("payday", 2500.0, rule).into_event(1)];

    let report = compute_timeline(&events, d(2024, 1, 1), d(2024, 4, 30), 0.0, None).unwrap();

    let dates: Vec<_> = report.occurrences.iter().map(|occ| occ.date).collect();
    assert_eq!(
        dates,
        vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)],
        "clamped days must snap back to the original day-of-month when possible"
    );
}

#[test]
fn unbounded_recurrence_stops_exactly_at_window_end() {
    let rule = Recurrence::new(RecurrencePattern::Daily, d(2025, 1, 1));
    let events = vec![EventDraft::recurring("coffee", -3.0, rule).into_event(1)];

    let report = compute_timeline(&events, d(2025, 1, 1), d(2025, 1, 10), 100.0, None).unwrap();

    assert_eq!(report.occurrences.len(), 10);
    assert!(report
        .occurrences
        .iter()
        .all(|occ| occ.date <= d(2025, 1, 10)));
}

#[test]
fn biweekly_steps_fourteen_days_whatever_the_interval_says() {
    let rule = Recurrence::new(RecurrencePattern::Biweekly, d(2025, 1, 1)).every(5);
    let events = vec![EventDraft::recurring("paycheck", 1200.0, rule).into_event(1)];

    let report = compute_timeline(&events, d(2025, 1, 1), d(2025, 3, 1), 0.0, None).unwrap();

    let dates: Vec<_> = report.occurrences.iter().map(|occ| occ.date).collect();
    assert_eq!(
        dates,
        vec![d(2025, 1, 1), d(2025, 1, 15), d(2025, 1, 29), d(2025, 2, 12), d(2025, 2, 26)]
    );
}

#[test]
fn timeline_has_one_point_per_day_inclusive() {
    let report = compute_timeline(&[], d(2024, 2, 1), d(2024, 3, 1), 0.0, None).unwrap();
    // 29 days of a leap-year February plus March 1st.
    assert_eq!(report.timeline.len(), 30);
    assert_eq!(report.timeline.first().unwrap().date, d(2024, 2, 1));
    assert_eq!(report.timeline.last().unwrap().date, d(2024, 3, 1));
}

#[test]
fn ending_balance_matches_independent_summation() {
    let events = vec![
        EventDraft::one_off("deposit", 321.45, d(2025, 1, 3)).into_event(1),
        EventDraft::recurring(
            "rent",
            -900.0,
            Recurrence::new(RecurrencePattern::Monthly, d(2025, 1, 1)),
        )
        .into_event(2),
        EventDraft::recurring(
            "gym",
            -25.5,
            Recurrence::new(RecurrencePattern::Weekly, d(2025, 1, 2)).every(2),
        )
        .into_event(3),
    ];
    let starting = 5000.0;

    let report = compute_timeline(&events, d(2025, 1, 1), d(2025, 3, 31), starting, None).unwrap();

    let total: f64 = report.occurrences.iter().map(|occ| occ.amount).sum();
    let expected = ((starting + total) * 100.0).round() / 100.0;
    assert_eq!(report.ending_balance, expected);
    assert_eq!(
        report.ending_balance,
        report.timeline.last().unwrap().balance
    );
}

#[test]
fn identical_inputs_produce_byte_identical_reports() {
    let events = vec![
        EventDraft::one_off("bonus", 150.0, d(2025, 2, 14))
            .with_labels(vec!["income".into()])
            .into_event(1),
        EventDraft::recurring(
            "streaming",
            -12.99,
            Recurrence::new(RecurrencePattern::Monthly, d(2025, 1, 7)),
        )
        .into_event(2),
    ];

    let first = compute_timeline(&events, d(2025, 1, 1), d(2025, 3, 31), 250.0, None).unwrap();
    let second = compute_timeline(&events, d(2025, 1, 1), d(2025, 3, 31), 250.0, None).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn single_debit_scenario_walks_the_expected_balances() {
    let events = vec![EventDraft::one_off("groceries", -50.0, d(2025, 1, 2)).into_event(1)];

    let report = compute_timeline(&events, d(2025, 1, 1), d(2025, 1, 3), 1000.0, None).unwrap();

    assert_eq!(
        report.timeline,
        vec![
            TimelinePoint { date: d(2025, 1, 1), balance: 1000.0 },
            TimelinePoint { date: d(2025, 1, 2), balance: 950.0 },
            TimelinePoint { date: d(2025, 1, 3), balance: 950.0 },
        ]
    );
    assert_eq!(report.ending_balance, 950.0);
    assert_eq!(report.starting_balance, 1000.0);
}

#[test]
fn inverted_window_is_rejected_before_computation() {
    let err = compute_timeline(&[], d(2025, 1, 31), d(2025, 1, 1), 0.0, None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidWindow { .. }));
}

#[test]
fn single_day_window_is_valid() {
    let events = vec![EventDraft::one_off("toll", -2.5, d(2025, 1, 1)).into_event(1)];
    let report = compute_timeline(&events, d(2025, 1, 1), d(2025, 1, 1), 10.0, None).unwrap();
    assert_eq!(report.timeline.len(), 1);
    assert_eq!(report.ending_balance, 7.5);
}

#[test]
fn points_are_rounded_but_the_running_total_is_not() {
    // Two sub-cent credits individually round to 0.00 but together reach
    // 0.01. If rounding happened between additions the second point would
    // still read 0.00.
    let events = vec![
        EventDraft::one_off("interest", 0.004, d(2025, 1, 1)).into_event(1),
        EventDraft::one_off("interest", 0.004, d(2025, 1, 2)).into_event(2),
    ];

    let report = compute_timeline(&events, d(2025, 1, 1), d(2025, 1, 2), 0.0, None).unwrap();

    assert_eq!(report.timeline[0].balance, 0.0);
    assert_eq!(report.timeline[1].balance, 0.01);
}

#[test]
fn same_day_amounts_are_applied_one_at_a_time() {
    // (1670.59 + 1.764) + 1.561 lands just below the half-cent boundary
    // and rounds to 1673.91, while 1670.59 + (1.764 + 1.561) lands exactly
    // on it and would round to 1673.92. The balance must take the first
    // path: one addition per occurrence, in order.
    let events = vec![
        EventDraft::one_off("refund", 1.764, d(2025, 1, 1)).into_event(1),
        EventDraft::one_off("interest", 1.561, d(2025, 1, 1)).into_event(2),
    ];

    let report = compute_timeline(&events, d(2025, 1, 1), d(2025, 1, 1), 1670.59, None).unwrap();

    assert_eq!(report.timeline[0].balance, 1673.91);
    assert_eq!(report.ending_balance, 1673.91);
}

#[test]
fn label_filtered_timeline_only_counts_matching_events() {
    let events = vec![
        EventDraft::one_off("rent", -900.0, d(2025, 1, 2))
            .with_labels(vec!["rent".into(), "fixed".into()])
            .into_event(1),
        EventDraft::one_off("concert", -60.0, d(2025, 1, 2))
            .with_labels(vec!["fun".into()])
            .into_event(2),
    ];

    let filter = vec!["fixed".to_string(), "other".to_string()];
    let report =
        compute_timeline(&events, d(2025, 1, 1), d(2025, 1, 3), 1000.0, Some(&filter)).unwrap();

    assert_eq!(report.occurrences.len(), 1);
    assert_eq!(report.ending_balance, 100.0);
}
