use chrono::{Days, NaiveDate};
use core_types::Record;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A trailing span of `days` calendar days ending on (and including) `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    days: i64,
    today: NaiveDate,
}

impl Window {
    pub fn new(days: i64, today: NaiveDate) -> Self {
        Self { days, today }
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    /// A non-positive length describes no days at all.
    pub fn is_empty(&self) -> bool {
        self.start().is_none()
    }

    /// The oldest day in the window, `today - (days - 1)`.
    pub fn start(&self) -> Option<NaiveDate> {
        if self.days <= 0 {
            return None;
        }
        self.today.checked_sub_days(Days::new((self.days - 1) as u64))
    }

    pub fn end(&self) -> NaiveDate {
        self.today
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start()
            .is_some_and(|start| start <= date && date <= self.today)
    }

    /// Every day of the window, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let len = if self.days > 0 { self.days as usize } else { 0 };
        self.start()
            .into_iter()
            .flat_map(|start| start.iter_days())
            .take(len)
    }
}

/// One calendar day of the dense series. Days without a record carry zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// Short display form, e.g. `Jan 10`.
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenditure: Decimal,
}

/// The output of [`reconcile`]: the gap-filled series plus the real records that
/// fell inside the window, both in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub series: Vec<SeriesPoint>,
    pub matched: Vec<Record>,
}

/// Formats a day the way chart axes label it.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Builds the dense daily series for the trailing `window_days` ending on `today`.
///
/// Records are looked up by date, so the input order does not matter and records
/// outside the window are simply never visited. A non-positive window produces an
/// empty result. Nothing is cached: call again after every store mutation or window
/// change.
pub fn reconcile(records: &[Record], window_days: i64, today: NaiveDate) -> Reconciliation {
    let window = Window::new(window_days, today);
    if window.is_empty() {
        tracing::debug!(window_days, "Empty window requested; nothing to reconcile.");
        return Reconciliation::default();
    }

    let by_date: HashMap<NaiveDate, &Record> = records.iter().map(|r| (r.date, r)).collect();

    let mut result = Reconciliation {
        series: Vec::with_capacity(window_days as usize),
        matched: Vec::new(),
    };

    for date in window.dates() {
        let point = match by_date.get(&date) {
            Some(record) => {
                result.matched.push((*record).clone());
                SeriesPoint {
                    date,
                    label: day_label(date),
                    revenue: record.revenue,
                    expenditure: record.expenditure,
                }
            }
            None => SeriesPoint {
                date,
                label: day_label(date),
                revenue: Decimal::ZERO,
                expenditure: Decimal::ZERO,
            },
        };
        result.series.push(point);
    }

    result
}
