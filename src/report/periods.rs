//! Buckets expenses into calendar periods for the spending trend chart.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, Duration, Month};

use crate::{
    timeframe::{start_of_month, subtract_months},
    transaction::Transaction,
};

/// Number of daily buckets, ending today.
const DAYS_IN_WINDOW: i64 = 30;
/// Number of monthly buckets, ending with the current month.
const MONTHS_IN_WINDOW: u32 = 12;
/// Number of yearly buckets, ending with the current year.
const YEARS_IN_WINDOW: i32 = 5;

/// The size of the periods that spending is bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per day over the last 30 days.
    Day,
    /// One bucket per calendar month over the last 12 months.
    #[default]
    Month,
    /// One bucket per calendar year over the last 5 years.
    Year,
}

impl Granularity {
    /// Parse a granularity token, falling back to [Granularity::Month] for
    /// missing or unrecognised values.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("day") => Self::Day,
            Some("year") => Self::Year,
            _ => Self::Month,
        }
    }

    /// The token that selects this granularity in a query string.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// The first date covered by the chart window when the current date is `today`.
    pub fn window_start(self, today: Date) -> Date {
        match self {
            Self::Day => today - Duration::days(DAYS_IN_WINDOW - 1),
            Self::Month => start_of_month(subtract_months(today, MONTHS_IN_WINDOW - 1)),
            Self::Year => {
                Date::from_calendar_date(today.year() - (YEARS_IN_WINDOW - 1), Month::January, 1)
                    .unwrap_or(today)
            }
        }
    }

    /// Format `date` as the label of the period that contains it.
    pub fn label(self, date: Date) -> String {
        match self {
            Self::Day => format!(
                "{:02} {} {}",
                date.day(),
                month_abbreviation(date.month()),
                date.year()
            ),
            Self::Month => format!("{} {}", month_abbreviation(date.month()), date.year()),
            Self::Year => date.year().to_string(),
        }
    }

    /// The first date of every period in the window, oldest first.
    fn period_starts(self, today: Date) -> Vec<Date> {
        let start = self.window_start(today);

        match self {
            Self::Day => (0..DAYS_IN_WINDOW)
                .map(|offset| start + Duration::days(offset))
                .collect(),
            Self::Month => (0..MONTHS_IN_WINDOW)
                .rev()
                .map(|months_ago| start_of_month(subtract_months(today, months_ago)))
                .collect(),
            Self::Year => (0..YEARS_IN_WINDOW)
                .filter_map(|offset| {
                    Date::from_calendar_date(start.year() + offset, Month::January, 1).ok()
                })
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Granularity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = Option::<String>::deserialize(deserializer)?;

        Ok(Self::from_token(token.as_deref()))
    }
}

/// The total spent in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    /// "dd MMM yyyy", "MMM yyyy" or "yyyy" depending on the granularity.
    pub period_label: String,
    /// The sum of the amounts in the period.
    pub total: f64,
}

/// Sum `transactions` into one bucket per period of the chart window ending `today`.
///
/// Every period in the window is emitted, oldest first, with a total of zero
/// when nothing was spent. Transactions are matched to buckets by their
/// formatted label and anything outside the window is ignored.
pub fn aggregate_by_period(
    transactions: &[Transaction],
    granularity: Granularity,
    today: Date,
) -> Vec<PeriodTotal> {
    let mut periods: Vec<PeriodTotal> = granularity
        .period_starts(today)
        .into_iter()
        .map(|date| PeriodTotal {
            period_label: granularity.label(date),
            total: 0.0,
        })
        .collect();

    let index_by_label: HashMap<String, usize> = periods
        .iter()
        .enumerate()
        .map(|(index, period)| (period.period_label.clone(), index))
        .collect();

    for transaction in transactions {
        if transaction.date > today {
            continue;
        }

        if let Some(&index) = index_by_label.get(&granularity.label(transaction.date)) {
            periods[index].total += transaction.amount;
        }
    }

    periods
}

fn month_abbreviation(month: Month) -> &'static str {
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
