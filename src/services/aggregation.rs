//! Monthly service-order aggregation for the dashboard charts.
//!
//! Orders are bucketed by calendar month and status into three views: a
//! status-stacked monthly series, a monthly total series and an overall
//! status summary. Each call builds a fresh snapshot from the complete record
//! slice it is given; nothing is cached or shared between calls.
//!
//! Two lenient policies apply instead of errors:
//! - an order without a usable timestamp is placed in the month of `now`;
//! - an order whose status is not `Aberta`, `Em Andamento` or `Finalizada`
//!   is left out of the status counters but still counts toward its month's
//!   total. Totals can therefore exceed the stacked counters for a month.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::models::service_order::{OrderRecord, OrderStatus, StatusLabel};

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_PT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Month abbreviations used in bucket labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthNames {
    #[default]
    En,
    Pt,
}

impl MonthNames {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Some(Self::En),
            "pt" | "pt-br" | "portuguese" => Some(Self::Pt),
            _ => None,
        }
    }

    /// Abbreviation for a zero-based month index.
    pub fn abbreviation(&self, month0: u32) -> &'static str {
        let table = match self {
            Self::En => &MONTHS_EN,
            Self::Pt => &MONTHS_PT,
        };
        table[(month0 % 12) as usize]
    }
}

/// Calendar month bucket key.
///
/// Field order matters: the derived `Ord` compares `year` first, then
/// `month0`, which is chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// Zero-based month index (January = 0).
    pub month0: u32,
}

impl MonthKey {
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// Display label, e.g. `Jan/2024`.
    pub fn label(&self, names: MonthNames) -> String {
        format!("{}/{:04}", names.abbreviation(self.month0), self.year)
    }
}

/// Knobs that change how records map to months and how months are labelled.
#[derive(Debug, Clone, Copy)]
pub struct AggregationSettings {
    /// Offset applied to `created_at` before taking its calendar month.
    pub utc_offset: FixedOffset,
    pub month_names: MonthNames,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            month_names: MonthNames::default(),
        }
    }
}

impl AggregationSettings {
    /// Build settings from a minute offset; out-of-range offsets fall back to UTC.
    pub fn new(utc_offset_minutes: i32, month_names: MonthNames) -> Self {
        let utc_offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self {
            utc_offset,
            month_names,
        }
    }

    /// Month an order belongs to: `created_at`, else `entry_date`, else `now`.
    pub fn month_of(&self, record: &OrderRecord, now: DateTime<Utc>) -> MonthKey {
        if let Some(created_at) = record.created_at {
            return MonthKey::of_date(created_at.with_timezone(&self.utc_offset).date_naive());
        }
        if let Some(entry_date) = record.entry_date {
            return MonthKey::of_date(entry_date);
        }
        MonthKey::of_date(now.with_timezone(&self.utc_offset).date_naive())
    }
}

/// One month of the status-stacked bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackedMonthBucket {
    pub label: String,
    pub open: u64,
    pub in_progress: u64,
    pub finished: u64,
}

impl StackedMonthBucket {
    fn empty(label: String) -> Self {
        Self {
            label,
            open: 0,
            in_progress: 0,
            finished: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.open + self.in_progress + self.finished
    }
}

/// One month of the order trend line: every order counts, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendMonthPoint {
    pub label: String,
    pub total: u64,
}

/// Status counts across the whole input, independent of month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub open: u64,
    pub in_progress: u64,
    pub finished: u64,
}

impl StatusSummary {
    pub fn total(&self) -> u64 {
        self.open + self.in_progress + self.finished
    }
}

/// Result of one aggregation call. Both series are in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderAggregates {
    pub stacked: Vec<StackedMonthBucket>,
    pub trend: Vec<TrendMonthPoint>,
    pub summary: StatusSummary,
}

/// Aggregate with default settings (UTC, English labels) at the current time.
pub fn aggregate(records: &[OrderRecord]) -> OrderAggregates {
    aggregate_with(records, &AggregationSettings::default(), Utc::now())
}

/// Aggregate a complete record snapshot.
///
/// `now` is only consulted for records that carry no timestamp at all.
pub fn aggregate_with(
    records: &[OrderRecord],
    settings: &AggregationSettings,
    now: DateTime<Utc>,
) -> OrderAggregates {
    let mut stacked: BTreeMap<MonthKey, StackedMonthBucket> = BTreeMap::new();
    let mut trend: BTreeMap<MonthKey, TrendMonthPoint> = BTreeMap::new();
    let mut summary = StatusSummary::default();
    let mut unrecognized: u64 = 0;
    let mut undated: u64 = 0;

    for record in records {
        if record.created_at.is_none() && record.entry_date.is_none() {
            undated += 1;
        }
        let key = settings.month_of(record, now);

        let bucket = stacked
            .entry(key)
            .or_insert_with(|| StackedMonthBucket::empty(key.label(settings.month_names)));

        match StatusLabel::classify(&record.status) {
            StatusLabel::Known(OrderStatus::Open) => {
                bucket.open += 1;
                summary.open += 1;
            }
            StatusLabel::Known(OrderStatus::InProgress) => {
                bucket.in_progress += 1;
                summary.in_progress += 1;
            }
            StatusLabel::Known(OrderStatus::Finished) => {
                bucket.finished += 1;
                summary.finished += 1;
            }
            // Cancelled orders are reported elsewhere, never stacked.
            StatusLabel::Known(OrderStatus::Cancelled) => {}
            StatusLabel::Unrecognized(_) => unrecognized += 1,
        }

        trend
            .entry(key)
            .or_insert_with(|| TrendMonthPoint {
                label: key.label(settings.month_names),
                total: 0,
            })
            .total += 1;
    }

    if unrecognized > 0 {
        tracing::warn!(
            count = unrecognized,
            "Service orders with unrecognized status excluded from status counters"
        );
    }
    if undated > 0 {
        tracing::debug!(count = undated, "Service orders without timestamp bucketed into current month");
    }

    OrderAggregates {
        stacked: stacked.into_values().collect(),
        trend: trend.into_values().collect(),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap())
    }

    fn order(year: i32, month: u32, status: &str) -> OrderRecord {
        OrderRecord::new(at(year, month, 10), None, status)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    fn run(records: &[OrderRecord]) -> OrderAggregates {
        aggregate_with(records, &AggregationSettings::default(), fixed_now())
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let result = run(&[]);
        assert!(result.stacked.is_empty());
        assert!(result.trend.is_empty());
        assert_eq!(result.summary, StatusSummary::default());
    }

    #[test]
    fn two_month_scenario() {
        let result = run(&[
            order(2024, 1, "Aberta"),
            order(2024, 1, "Finalizada"),
            order(2024, 2, "Aberta"),
        ]);

        assert_eq!(
            result.stacked,
            vec![
                StackedMonthBucket {
                    label: "Jan/2024".into(),
                    open: 1,
                    in_progress: 0,
                    finished: 1,
                },
                StackedMonthBucket {
                    label: "Feb/2024".into(),
                    open: 1,
                    in_progress: 0,
                    finished: 0,
                },
            ]
        );
        assert_eq!(
            result.trend,
            vec![
                TrendMonthPoint {
                    label: "Jan/2024".into(),
                    total: 2,
                },
                TrendMonthPoint {
                    label: "Feb/2024".into(),
                    total: 1,
                },
            ]
        );
        assert_eq!(
            result.summary,
            StatusSummary {
                open: 2,
                in_progress: 0,
                finished: 1,
            }
        );
    }

    #[test]
    fn default_aggregate_uses_utc_and_english_labels() {
        let records = [
            order(2023, 12, "Em Andamento"),
            order(2024, 1, "Aberta"),
            order(2024, 1, "Cancelada"),
        ];
        let result = aggregate(&records);
        assert_eq!(result, run(&records));
        let labels: Vec<&str> = result.trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["Dec/2023", "Jan/2024"]);
        assert_eq!(result.trend[1].total, 2);
    }

    #[test]
    fn unrecognized_status_counts_only_toward_trend() {
        let result = run(&[order(2024, 3, "Em andamento")]);
        assert_eq!(result.stacked.len(), 1);
        assert_eq!(result.stacked[0].total(), 0);
        assert_eq!(result.summary, StatusSummary::default());
        assert_eq!(result.trend[0].total, 1);
        assert_eq!(result.trend[0].label, "Mar/2024");
    }

    #[test]
    fn cancelled_orders_are_not_stacked() {
        let result = run(&[order(2024, 3, "Cancelada"), order(2024, 3, "Em Andamento")]);
        assert_eq!(result.stacked[0].in_progress, 1);
        assert_eq!(result.stacked[0].total(), 1);
        assert_eq!(result.summary.total(), 1);
        assert_eq!(result.trend[0].total, 2);
    }

    #[test]
    fn same_month_different_years_stay_separate() {
        let result = run(&[order(2024, 1, "Aberta"), order(2023, 1, "Aberta")]);
        let labels: Vec<&str> = result.stacked.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan/2023", "Jan/2024"]);
        assert_eq!(result.trend.len(), 2);
    }

    #[test]
    fn ordering_is_chronological_not_lexicographic() {
        // Alphabetically "Apr" < "Dec" < "Feb" < "Jan"; chronologically not.
        let result = run(&[
            order(2024, 2, "Aberta"),
            order(2023, 12, "Aberta"),
            order(2024, 4, "Aberta"),
            order(2024, 1, "Aberta"),
        ]);
        let labels: Vec<&str> = result.trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Dec/2023", "Jan/2024", "Feb/2024", "Apr/2024"]);
        let stacked: Vec<&str> = result.stacked.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(stacked, labels);
    }

    #[test]
    fn month_rollover_at_year_boundary() {
        let result = run(&[
            OrderRecord::new(
                Some(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()),
                None,
                "Aberta",
            ),
            OrderRecord::new(
                Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                None,
                "Aberta",
            ),
        ]);
        let labels: Vec<&str> = result.trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Dec/2023", "Jan/2024"]);
    }

    #[test]
    fn missing_timestamp_falls_back_to_now() {
        let result = run(&[OrderRecord::new(None, None, "Aberta")]);
        assert_eq!(result.stacked[0].label, "Jun/2024");
        assert_eq!(result.stacked[0].open, 1);
    }

    #[test]
    fn entry_date_used_when_created_at_missing() {
        let result = run(&[OrderRecord::new(
            None,
            NaiveDate::from_ymd_opt(2024, 4, 30),
            "Finalizada",
        )]);
        assert_eq!(result.stacked[0].label, "Apr/2024");
        assert_eq!(result.summary.finished, 1);
    }

    #[test]
    fn created_at_takes_precedence_over_entry_date() {
        let result = run(&[OrderRecord::new(
            at(2024, 5, 2),
            NaiveDate::from_ymd_opt(2024, 4, 30),
            "Aberta",
        )]);
        assert_eq!(result.trend[0].label, "May/2024");
    }

    #[test]
    fn offset_moves_created_at_across_month_boundary() {
        let record = OrderRecord::new(
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap()),
            None,
            "Aberta",
        );
        let shop = AggregationSettings::new(-4 * 60, MonthNames::En);
        let result = aggregate_with(&[record.clone()], &shop, fixed_now());
        assert_eq!(result.trend[0].label, "Feb/2024");

        let utc = run(&[record]);
        assert_eq!(utc.trend[0].label, "Mar/2024");
    }

    #[test]
    fn portuguese_labels() {
        let settings = AggregationSettings::new(0, MonthNames::Pt);
        let result = aggregate_with(
            &[order(2024, 2, "Aberta"), order(2024, 12, "Aberta")],
            &settings,
            fixed_now(),
        );
        let labels: Vec<&str> = result.stacked.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Fev/2024", "Dez/2024"]);
    }

    #[test]
    fn stacked_counters_sum_to_summary() {
        let records = vec![
            order(2024, 1, "Aberta"),
            order(2024, 1, "Em Andamento"),
            order(2024, 2, "Finalizada"),
            order(2024, 2, "Cancelada"),
            order(2024, 3, "Concluída"),
            order(2023, 11, "Em Andamento"),
        ];
        let result = run(&records);
        let stacked_total: u64 = result.stacked.iter().map(StackedMonthBucket::total).sum();
        assert_eq!(stacked_total, result.summary.total());
        let open: u64 = result.stacked.iter().map(|b| b.open).sum();
        assert_eq!(open, result.summary.open);
        let trend_total: u64 = result.trend.iter().map(|p| p.total).sum();
        assert_eq!(trend_total, records.len() as u64);
    }

    #[test]
    fn trend_matches_stacked_when_all_statuses_known() {
        let result = run(&[
            order(2024, 1, "Aberta"),
            order(2024, 1, "Em Andamento"),
            order(2024, 1, "Finalizada"),
            order(2024, 2, "Finalizada"),
        ]);
        assert_eq!(result.stacked.len(), result.trend.len());
        for (bucket, point) in result.stacked.iter().zip(&result.trend) {
            assert_eq!(bucket.label, point.label);
            assert_eq!(bucket.total(), point.total);
        }
    }

    #[test]
    fn series_have_unique_strictly_increasing_months() {
        let records: Vec<OrderRecord> = (0..40)
            .map(|i| order(2020 + (i * 7 % 5), (i * 5 % 12) as u32 + 1, "Aberta"))
            .collect();
        let result = run(&records);
        let parse = |label: &str| {
            let (mon, year) = label.split_once('/').unwrap();
            let month = MONTHS_EN.iter().position(|m| *m == mon).unwrap();
            (year.parse::<i32>().unwrap(), month)
        };
        for pair in result.trend.windows(2) {
            assert!(parse(&pair[0].label) < parse(&pair[1].label));
        }
        for pair in result.stacked.windows(2) {
            assert!(parse(&pair[0].label) < parse(&pair[1].label));
        }
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut records = vec![
            order(2024, 2, "Aberta"),
            order(2024, 1, "Finalizada"),
            order(2023, 7, "Em Andamento"),
            order(2024, 1, "Aberta"),
        ];
        let forward = run(&records);
        records.reverse();
        assert_eq!(run(&records), forward);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let records = vec![order(2024, 1, "Aberta"), OrderRecord::new(None, None, "x")];
        assert_eq!(run(&records), run(&records));
    }

    #[test]
    fn month_names_from_code() {
        assert_eq!(MonthNames::from_code("pt-BR"), Some(MonthNames::Pt));
        assert_eq!(MonthNames::from_code("EN"), Some(MonthNames::En));
        assert_eq!(MonthNames::from_code("fr"), None);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let settings = AggregationSettings::new(48 * 60, MonthNames::En);
        assert_eq!(settings.utc_offset, Utc.fix());
    }
}
