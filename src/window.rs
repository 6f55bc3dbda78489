//! Date ranges that expenses are fetched and summed over.

use time::{Date, Duration, OffsetDateTime, Time, UtcOffset, macros::format_description};

use crate::{Error, aggregation::DAYS_IN_WEEK, models::epoch_millis};

/// An inclusive range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

fn end_of_day(date: Date, offset: UtcOffset) -> OffsetDateTime {
    // 23:59:59.999 is always a valid time.
    let last_millisecond = Time::from_hms_milli(23, 59, 59, 999).unwrap_or(Time::MIDNIGHT);

    date.with_time(last_millisecond).assume_offset(offset)
}

impl EvaluationWindow {
    /// The current calendar month up to the end of today, in the offset of `now`.
    ///
    /// This is the window that budgets are evaluated over.
    pub fn current_month(now: OffsetDateTime) -> Self {
        let offset = now.offset();
        let today = now.date();
        let first_of_month = today.replace_day(1).unwrap_or(today);

        Self {
            start: first_of_month.midnight().assume_offset(offset),
            end: end_of_day(today, offset),
        }
    }

    /// The seven calendar days ending today, in the offset of `now`.
    pub fn last_seven_days(now: OffsetDateTime) -> Self {
        let offset = now.offset();
        let today = now.date();
        let first_day = today - Duration::days(DAYS_IN_WEEK as i64 - 1);

        Self {
            start: first_day.midnight().assume_offset(offset),
            end: end_of_day(today, offset),
        }
    }

    /// The smallest window that covers both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// A user-selected range from the start of `start` to the end of `end`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `start` is after `end`.
    pub fn from_dates(start: Date, end: Date, offset: UtcOffset) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidDateRange(start.to_string(), end.to_string()));
        }

        Ok(Self {
            start: start.midnight().assume_offset(offset),
            end: end_of_day(end, offset),
        })
    }

    /// The start of the window as epoch milliseconds.
    pub fn start_millis(&self) -> i64 {
        epoch_millis::to_millis(self.start)
    }

    /// The end of the window as epoch milliseconds.
    pub fn end_millis(&self) -> i64 {
        epoch_millis::to_millis(self.end)
    }

    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Parse a date in the format YYYY-MM-DD.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}
