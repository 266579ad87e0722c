//! Dates and the lookback window that prices are fetched over.

use std::ops::Deref;

use time::{macros::format_description, OffsetDateTime};

///[DateTime] is a wrapper around the epoch time as i64. Data sources hand back epoch seconds so
///this is the representation that flows through the series, conversion into the time package only
///happens when a date needs to be displayed.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Copy, Ord)]
pub struct DateTime(i64);

impl DateTime {
    pub const SECS_IN_DAY: i64 = 86_400;

    pub fn now() -> Self {
        OffsetDateTime::now_utc().into()
    }

    /// Formats as `YYYY-MM-DD`, falls back to the raw timestamp if the value is out of range for
    /// the time package.
    pub fn date_string(&self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        OffsetDateTime::from_unix_timestamp(self.0)
            .ok()
            .and_then(|date| date.format(&format).ok())
            .unwrap_or_else(|| self.0.to_string())
    }

    /// Short `MM-DD` label used on chart axes.
    pub fn axis_label(&self) -> String {
        let format = format_description!("[month]-[day]");
        OffsetDateTime::from_unix_timestamp(self.0)
            .ok()
            .and_then(|date| date.format(&format).ok())
            .unwrap_or_else(|| self.0.to_string())
    }

    /// None when the shift does not fit in epoch seconds.
    pub fn minus_days(&self, days: i64) -> Option<Self> {
        days.checked_mul(Self::SECS_IN_DAY)
            .and_then(|secs| self.0.checked_sub(secs))
            .map(DateTime)
    }
}

impl Deref for DateTime {
    type Target = i64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(value: OffsetDateTime) -> Self {
        value.unix_timestamp().into()
    }
}

impl From<DateTime> for i64 {
    fn from(v: DateTime) -> Self {
        v.0
    }
}

impl From<i64> for DateTime {
    fn from(v: i64) -> Self {
        DateTime(v)
    }
}

/// Inclusive range of dates that a fetch covers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateWindow {
    pub start: DateTime,
    pub end: DateTime,
}

impl DateWindow {
    pub fn new(start: impl Into<DateTime>, end: impl Into<DateTime>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    //Window of length given ending at end, None if the start overflows
    pub fn lookback_days(end: impl Into<DateTime>, length_in_days: i64) -> Option<Self> {
        let end_val = end.into();
        Some(Self {
            start: end_val.minus_days(length_in_days)?,
            end: end_val,
        })
    }

    pub fn ending_now(length_in_days: i64) -> Option<Self> {
        Self::lookback_days(DateTime::now(), length_in_days)
    }
}
