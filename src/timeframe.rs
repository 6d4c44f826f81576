//! Maps a symbolic timeframe token to the first date of a reporting window.
//!
//! A window always ends today and has no upper bound, so the start date is
//! the only thing that needs computing.

use serde::{Deserialize, Deserializer};
use time::{Date, Duration, Month};

/// How far back a report or transaction listing should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    /// The last 30 days.
    Day,
    /// The current calendar month so far.
    Month,
    /// The last five years.
    Year,
    /// The last twelve months. Used for missing or unrecognised tokens.
    #[default]
    Default,
}

impl Timeframe {
    /// Parse a timeframe token.
    ///
    /// Anything other than "day", "month" or "year" (including no token at all)
    /// selects [Timeframe::Default].
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("day") => Self::Day,
            Some("month") => Self::Month,
            Some("year") => Self::Year,
            _ => Self::Default,
        }
    }

    /// The token that selects this timeframe in a query string.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
            Self::Default => "default",
        }
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = Option::<String>::deserialize(deserializer)?;

        Ok(Self::from_token(token.as_deref()))
    }
}

/// Get the earliest date included in `timeframe` when the current date is `today`.
///
/// Month and year arithmetic moves by calendar months. When the target month
/// is shorter than the current day of the month, the day is clamped to the
/// last day of the target month (e.g. 31 March minus one month is 28/29 February).
pub fn resolve_start_date(timeframe: Timeframe, today: Date) -> Date {
    match timeframe {
        Timeframe::Day => today - Duration::days(30),
        Timeframe::Month => today.replace_day(1).unwrap_or(today),
        Timeframe::Year => subtract_months(today, 5 * 12),
        Timeframe::Default => subtract_months(today, 12),
    }
}

/// Move `date` back by `months` calendar months, clamping the day of the month.
pub(crate) fn subtract_months(date: Date, months: u32) -> Date {
    let month_index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months as i32;
    let year = month_index.div_euclid(12);
    let month = month_from_index(month_index.rem_euclid(12));
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

/// The first day of the month containing `date`.
pub(crate) fn start_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

fn month_from_index(index: i32) -> Month {
    // `index` is in 0..12 so this never falls back.
    Month::try_from(index as u8 + 1).unwrap_or(Month::January)
}
