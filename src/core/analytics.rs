//! Lifecycle classification and revenue aggregation over domain records.
//!
//! Everything in here is a pure function of the records and a
//! [`ReferenceClock`]; nothing reads the wall clock.
use crate::core::record::DomainRecord;
use chrono::{Datelike, Local, Month, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

/// Records expired for longer than this many days are in redemption.
pub const REDEMPTION_AFTER_DAYS: i64 = 30;
/// Last day (inclusive) of the first expiring-soon window.
pub const EXPIRING_SOON_DAYS: i64 = 7;
/// Last day (inclusive) of the second expiring-soon window.
pub const EXPIRING_LATER_DAYS: i64 = 30;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Short label for a month, e.g. `Jan`.
pub fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn month_of(date: NaiveDate) -> Month {
    MONTHS[date.month0() as usize]
}

/// The instant metrics are computed against, with the year and month that
/// scope the monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceClock {
    pub now: NaiveDateTime,
    pub current_year: i32,
    pub current_month: Month,
}

impl ReferenceClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_period(now, now.year(), month_of(now.date()))
    }

    pub fn with_period(now: NaiveDateTime, current_year: i32, current_month: Month) -> Self {
        ReferenceClock {
            now,
            current_year,
            current_month,
        }
    }

    /// Clock at the current local time.
    pub fn local() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Lifecycle {
    Redemption,
    Expired,
    ExpiringSoon7,
    ExpiringSoon30,
    Active,
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Lifecycle::Redemption => "Redemption",
                Lifecycle::Expired => "Expired",
                Lifecycle::ExpiringSoon7 => "Expiring 0-7d",
                Lifecycle::ExpiringSoon30 => "Expiring 8-30d",
                Lifecycle::Active => "Active",
            }
        )
    }
}

/// Whole days from the clock's date until the record expires. Negative once
/// the record has expired.
pub fn days_until_expiry(record: &DomainRecord, clock: &ReferenceClock) -> i64 {
    (record.expiry_date - clock.today()).num_days()
}

/// Places a record in exactly one lifecycle bucket.
///
/// Checks run in priority order and compare whole days: 0-7 days until
/// expiry is the first window, 8-30 the second, anything later is active.
/// A clock with a time of day still lands day 7 in the first window.
pub fn classify(record: &DomainRecord, clock: &ReferenceClock) -> Lifecycle {
    let days_until = days_until_expiry(record, clock);
    let days_since_expiry = -days_until;

    if days_since_expiry > REDEMPTION_AFTER_DAYS {
        Lifecycle::Redemption
    } else if days_since_expiry > 0 {
        Lifecycle::Expired
    } else if days_until <= EXPIRING_SOON_DAYS {
        Lifecycle::ExpiringSoon7
    } else if days_until <= EXPIRING_LATER_DAYS {
        Lifecycle::ExpiringSoon30
    } else {
        Lifecycle::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyEntry {
    #[serde(skip)]
    pub month: Month,
    pub label: &'static str,
    /// Revenue of records registered in this month of the current year.
    pub revenue: f64,
    /// Records registered in this month of the current year.
    pub registrations: usize,
    /// Revenue of records expiring in this month, any year.
    pub expiring_revenue: f64,
}

impl MonthlyEntry {
    fn empty(month: Month) -> Self {
        MonthlyEntry {
            month,
            label: month_label(month),
            revenue: 0.0,
            registrations: 0,
            expiring_revenue: 0.0,
        }
    }
}

/// The result of one aggregation pass. Amounts are in the reference
/// currency of the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub record_count: usize,
    pub total_revenue: f64,
    pub expired_revenue: f64,
    pub redemption_revenue: f64,
    pub average_domain_value: f64,
    pub expiring_7_days: usize,
    pub expiring_30_days: usize,
    pub expired_count: usize,
    pub redemption_count: usize,
    pub active_count: usize,
    pub monthly_series: [MonthlyEntry; 12],
    pub monthly_growth_percent: f64,
}

impl MetricsSnapshot {
    pub fn month(&self, month: Month) -> &MonthlyEntry {
        &self.monthly_series[month.number_from_month() as usize - 1]
    }

    /// Revenue with no lifecycle bucket of its own: active and
    /// expiring-soon records.
    pub fn renewable_revenue(&self) -> f64 {
        self.total_revenue - self.expired_revenue - self.redemption_revenue
    }
}

/// Aggregates normalized records into a fresh snapshot.
///
/// All amounts must already be in one currency.
pub fn aggregate(records: &[DomainRecord], clock: &ReferenceClock) -> MetricsSnapshot {
    let mut snapshot = MetricsSnapshot {
        record_count: records.len(),
        total_revenue: 0.0,
        expired_revenue: 0.0,
        redemption_revenue: 0.0,
        average_domain_value: 0.0,
        expiring_7_days: 0,
        expiring_30_days: 0,
        expired_count: 0,
        redemption_count: 0,
        active_count: 0,
        monthly_series: MONTHS.map(MonthlyEntry::empty),
        monthly_growth_percent: 0.0,
    };

    for record in records {
        snapshot.total_revenue += record.amount;

        match classify(record, clock) {
            Lifecycle::Redemption => {
                snapshot.redemption_revenue += record.amount;
                snapshot.redemption_count += 1;
            }
            Lifecycle::Expired => {
                snapshot.expired_revenue += record.amount;
                snapshot.expired_count += 1;
            }
            Lifecycle::ExpiringSoon7 => snapshot.expiring_7_days += 1,
            Lifecycle::ExpiringSoon30 => snapshot.expiring_30_days += 1,
            Lifecycle::Active => snapshot.active_count += 1,
        }

        let registered = record.effective_registration_date();
        if registered.year() == clock.current_year {
            let entry = &mut snapshot.monthly_series[registered.month0() as usize];
            entry.revenue += record.amount;
            entry.registrations += 1;
        }
        snapshot.monthly_series[record.expiry_date.month0() as usize].expiring_revenue +=
            record.amount;
    }

    if !records.is_empty() {
        snapshot.average_domain_value = snapshot.total_revenue / records.len() as f64;
    }

    let current = snapshot.month(clock.current_month).revenue;
    let previous = snapshot.month(clock.current_month.pred()).revenue;
    snapshot.monthly_growth_percent = growth_percent(current, previous);

    debug!(
        "Aggregated {} records: total {:.2}, growth {:.2}%",
        snapshot.record_count, snapshot.total_revenue, snapshot.monthly_growth_percent
    );
    snapshot
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> ReferenceClock {
        let now = ymd(2025, 6, 15).and_time(NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        ReferenceClock::new(now)
    }

    fn record(amount: f64, registered: Option<NaiveDate>, expiry: NaiveDate) -> DomainRecord {
        DomainRecord {
            domain: format!("d{amount}.com"),
            amount,
            currency: "USD".to_string(),
            registration_date: registered,
            registration_estimated: false,
            expiry_date: expiry,
        }
    }

    fn expiring_in(days: i64, amount: f64) -> DomainRecord {
        let clock = clock();
        record(amount, Some(ymd(2024, 1, 10)), clock.today() + Duration::days(days))
    }

    #[test]
    fn test_clock_derives_year_and_month() {
        let clock = clock();
        assert_eq!(clock.current_year, 2025);
        assert_eq!(clock.current_month, Month::June);
        assert_eq!(clock.today(), ymd(2025, 6, 15));
    }

    #[test]
    fn test_empty_records() {
        let snapshot = aggregate(&[], &clock());
        assert_eq!(snapshot.record_count, 0);
        assert_eq!(snapshot.total_revenue, 0.0);
        assert_eq!(snapshot.expired_revenue, 0.0);
        assert_eq!(snapshot.redemption_revenue, 0.0);
        assert_eq!(snapshot.average_domain_value, 0.0);
        assert_eq!(snapshot.monthly_growth_percent, 0.0);
        assert_eq!(
            snapshot.expiring_7_days
                + snapshot.expiring_30_days
                + snapshot.expired_count
                + snapshot.redemption_count
                + snapshot.active_count,
            0
        );
        assert!(snapshot.monthly_series.iter().all(|m| m.revenue == 0.0
            && m.registrations == 0
            && m.expiring_revenue == 0.0));
    }

    #[test]
    fn test_classification_boundaries() {
        let clock = clock();
        let cases = [
            (-31, Lifecycle::Redemption),
            (-30, Lifecycle::Expired),
            (-1, Lifecycle::Expired),
            (0, Lifecycle::ExpiringSoon7),
            (5, Lifecycle::ExpiringSoon7),
            (7, Lifecycle::ExpiringSoon7),
            (8, Lifecycle::ExpiringSoon30),
            (29, Lifecycle::ExpiringSoon30),
            (30, Lifecycle::ExpiringSoon30),
            (31, Lifecycle::Active),
            (400, Lifecycle::Active),
        ];
        for (days, expected) in cases {
            assert_eq!(
                classify(&expiring_in(days, 1.0), &clock),
                expected,
                "expiry in {days} days"
            );
        }
    }

    #[test]
    fn test_window_edges_ignore_time_of_day() {
        for (h, m) in [(0, 0), (10, 30), (23, 59)] {
            let now = ymd(2025, 6, 15).and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap());
            let clock = ReferenceClock::new(now);
            let week = record(1.0, None, ymd(2025, 6, 22));
            let month = record(1.0, None, ymd(2025, 7, 15));
            assert_eq!(classify(&week, &clock), Lifecycle::ExpiringSoon7, "{now}");
            assert_eq!(classify(&month, &clock), Lifecycle::ExpiringSoon30, "{now}");
        }
    }

    #[test]
    fn test_redemption_scenario() {
        let snapshot = aggregate(&[expiring_in(-31, 40.0)], &clock());
        assert_eq!(snapshot.redemption_count, 1);
        assert_eq!(snapshot.redemption_revenue, 40.0);
        assert_eq!(snapshot.expired_revenue, 0.0);
        assert_eq!(snapshot.expired_count, 0);
    }

    #[test]
    fn test_expired_scenario() {
        let snapshot = aggregate(&[expiring_in(-1, 12.0)], &clock());
        assert_eq!(snapshot.expired_count, 1);
        assert_eq!(snapshot.expired_revenue, 12.0);
        assert_eq!(snapshot.redemption_count, 0);
    }

    #[test]
    fn test_seven_day_window_scenario() {
        let snapshot = aggregate(&[expiring_in(5, 20.0)], &clock());
        assert_eq!(snapshot.expiring_7_days, 1);
        assert_eq!(snapshot.expiring_30_days, 0);
        assert_eq!(snapshot.expired_revenue, 0.0);
        assert_eq!(snapshot.redemption_revenue, 0.0);
        assert_eq!(snapshot.total_revenue, 20.0);
        assert_eq!(snapshot.renewable_revenue(), 20.0);
    }

    #[test]
    fn test_revenue_conservation_and_exclusive_buckets() {
        let records: Vec<_> = [-90, -31, -30, -2, 0, 3, 7, 15, 29, 30, 200]
            .iter()
            .enumerate()
            .map(|(i, days)| expiring_in(*days, 10.0 + i as f64 * 1.5))
            .collect();
        let snapshot = aggregate(&records, &clock());

        let expected_total: f64 = records.iter().map(|r| r.amount).sum();
        assert_eq!(snapshot.total_revenue, expected_total);
        assert_eq!(snapshot.record_count, records.len());
        assert_eq!(
            snapshot.expiring_7_days
                + snapshot.expiring_30_days
                + snapshot.expired_count
                + snapshot.redemption_count
                + snapshot.active_count,
            records.len()
        );
        assert_eq!(snapshot.redemption_count, 2);
        assert_eq!(snapshot.expired_count, 2);
        assert_eq!(snapshot.expiring_7_days, 3);
        assert_eq!(snapshot.expiring_30_days, 3);
        assert_eq!(snapshot.active_count, 1);
        assert!((snapshot.average_domain_value - expected_total / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = vec![
            expiring_in(-45, 10.0),
            expiring_in(3, 11.0),
            record(12.5, Some(ymd(2025, 5, 2)), ymd(2026, 5, 2)),
            record(7.25, None, ymd(2025, 6, 20)),
        ];
        let clock = clock();
        assert_eq!(aggregate(&records, &clock), aggregate(&records, &clock));
    }

    #[test]
    fn test_year_scoping() {
        let records = vec![record(50.0, Some(ymd(2024, 3, 10)), ymd(2025, 3, 10))];
        let snapshot = aggregate(&records, &clock());

        let march = snapshot.month(Month::March);
        assert_eq!(march.label, "Mar");
        assert_eq!(march.revenue, 0.0);
        assert_eq!(march.registrations, 0);
        assert_eq!(march.expiring_revenue, 50.0);
        assert_eq!(snapshot.total_revenue, 50.0);
    }

    #[test]
    fn test_expiring_revenue_ignores_year() {
        let records = vec![
            record(5.0, Some(ymd(2025, 1, 1)), ymd(2027, 9, 1)),
            record(6.0, Some(ymd(2025, 1, 1)), ymd(2019, 9, 30)),
        ];
        let snapshot = aggregate(&records, &clock());
        assert_eq!(snapshot.month(Month::September).expiring_revenue, 11.0);
        assert_eq!(snapshot.month(Month::January).revenue, 11.0);
        assert_eq!(snapshot.month(Month::January).registrations, 2);
    }

    #[test]
    fn test_missing_registration_uses_expiry() {
        let records = vec![record(9.0, None, ymd(2025, 8, 1))];
        let snapshot = aggregate(&records, &clock());
        assert_eq!(snapshot.month(Month::August).revenue, 9.0);
        assert_eq!(snapshot.month(Month::August).registrations, 1);
    }

    #[test]
    fn test_monthly_growth() {
        let records = vec![
            record(100.0, Some(ymd(2025, 5, 3)), ymd(2026, 5, 3)),
            record(150.0, Some(ymd(2025, 6, 1)), ymd(2026, 6, 1)),
        ];
        let snapshot = aggregate(&records, &clock());
        assert!((snapshot.monthly_growth_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_zero_guard() {
        let records = vec![record(150.0, Some(ymd(2025, 6, 1)), ymd(2026, 6, 1))];
        let snapshot = aggregate(&records, &clock());
        assert_eq!(snapshot.monthly_growth_percent, 0.0);
    }

    #[test]
    fn test_growth_wraps_december_to_january() {
        let now = ymd(2025, 1, 20).and_hms_opt(0, 0, 0).unwrap();
        let clock = ReferenceClock::new(now);
        let records = vec![
            record(100.0, Some(ymd(2025, 12, 5)), ymd(2026, 12, 5)),
            record(50.0, Some(ymd(2025, 1, 5)), ymd(2026, 1, 5)),
        ];
        let snapshot = aggregate(&records, &clock);
        assert!((snapshot.monthly_growth_percent + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_period_overrides_now() {
        let now = ymd(2025, 6, 15).and_hms_opt(0, 0, 0).unwrap();
        let clock = ReferenceClock::with_period(now, 2024, Month::March);
        let records = vec![
            record(10.0, Some(ymd(2024, 2, 1)), ymd(2026, 2, 1)),
            record(30.0, Some(ymd(2024, 3, 1)), ymd(2026, 3, 1)),
        ];
        let snapshot = aggregate(&records, &clock);
        assert_eq!(snapshot.month(Month::February).revenue, 10.0);
        assert!((snapshot.monthly_growth_percent - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_aggregation() {
        let records: Vec<_> = (0..50).map(|i| expiring_in(i - 25, i as f64)).collect();
        let clock = clock();
        let expected = aggregate(&records, &clock);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| aggregate(&records, &clock)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_growth_percent() {
        assert_eq!(growth_percent(10.0, 0.0), 0.0);
        assert_eq!(growth_percent(0.0, 0.0), 0.0);
        assert_eq!(growth_percent(50.0, 100.0), -50.0);
    }
}
