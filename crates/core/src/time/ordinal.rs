use chrono::{Datelike, NaiveDate};

/// Proleptic-Gregorian day number with 0001-01-01 as day 1.
///
/// This is the regression's independent variable: strictly monotonic in date
/// order, so consecutive calendar days are exactly one unit apart and the
/// fitted slope is a per-day price change.
pub fn date_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}
