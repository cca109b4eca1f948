//! The pluggable date abstraction every other component depends on.
//!
//! All date arithmetic, comparison, formatting and parsing in this crate
//! goes through a [`DateAdapter`]. The calendar state machine and the view
//! builders never touch a concrete date representation, which keeps them
//! correct across calendar backends: the hand-rolled civil implementation
//! in [`civil`] and the chrono-backed one in [`chrono_adapter`].

pub mod chrono_adapter;
pub mod civil;

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::error::InvalidDateError;

/// Granularity for date comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Compare years only.
    Year,
    /// Compare down to the month.
    Month,
    /// Compare down to the day.
    Day,
    /// Compare down to the minute.
    Minute,
}

/// Style of a month or weekday name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// Full name, e.g. "January" / "Sunday".
    Long,
    /// Abbreviated name, e.g. "Jan" / "Sun".
    Short,
    /// Single-letter name, e.g. "J" / "S".
    Narrow,
}

/// An externally provided date-like value awaiting coercion.
///
/// Bound input values arrive as dates, as free-form text or as nothing at
/// all; [`DateAdapter::deserialize`] turns any of these into a valid date
/// or `None`, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput<D> {
    /// An already-typed date value.
    Date(D),
    /// A textual value, parsed as ISO 8601.
    Text(String),
    /// No value.
    Empty,
}

impl<D> DateInput<D> {
    /// Convenience constructor for text input.
    pub fn text(value: impl Into<String>) -> Self {
        DateInput::Text(value.into())
    }
}

/// Locale data fixed at adapter construction.
///
/// Changing locale means constructing a new adapter; name tables are never
/// swapped under a live adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// First day of the week, 0 = Sunday .. 6 = Saturday.
    pub first_day_of_week: u32,
    /// Full month names, January first.
    pub long_months: Vec<String>,
    /// Abbreviated month names, January first.
    pub short_months: Vec<String>,
    /// Single-letter month names, January first.
    pub narrow_months: Vec<String>,
    /// Full weekday names, Sunday first.
    pub long_days: Vec<String>,
    /// Abbreviated weekday names, Sunday first.
    pub short_days: Vec<String>,
    /// Single-letter weekday names, Sunday first.
    pub narrow_days: Vec<String>,
}

impl Locale {
    /// English locale with Sunday as the first day of the week.
    pub fn english() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|name| (*name).to_string()).collect()
        }
        let long_months = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        let short_months = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let narrow_months = ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"];
        let long_days = [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ];
        let short_days = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let narrow_days = ["S", "M", "T", "W", "T", "F", "S"];
        Self {
            first_day_of_week: 0,
            long_months: owned(&long_months),
            short_months: owned(&short_months),
            narrow_months: owned(&narrow_months),
            long_days: owned(&long_days),
            short_days: owned(&short_days),
            narrow_days: owned(&narrow_days),
        }
    }

    /// Same name tables with a different first day of week.
    pub fn with_first_day_of_week(mut self, day: u32) -> Self {
        self.first_day_of_week = day % 7;
        self
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

/// Locale-aware date arithmetic and formatting behind a generic date type.
///
/// Adapters are stateless apart from their locale and safe to share across
/// many picker instances. The setter contract is fixed: `with_*` methods
/// return a new value, adapters never mutate a date in place.
///
/// Months are 0-based (`0..=11`) throughout, days of month 1-based, days of
/// week 0-based with 0 = Sunday.
pub trait DateAdapter {
    /// The concrete date-time representation.
    type Date: Clone + PartialEq + fmt::Debug;
    /// The display/parse format specification this adapter understands.
    type FormatSpec;

    /// The current date and time.
    fn today(&self) -> Self::Date;

    /// Creates a date at midnight.
    ///
    /// Fails with [`InvalidDateError`] when the month index is outside
    /// `0..=11`, the day is less than 1, or the day does not exist in the
    /// target month.
    fn create_date(&self, year: i32, month: u32, day: u32) -> Result<Self::Date, InvalidDateError> {
        self.create_datetime(year, month, day, 0, 0)
    }

    /// Creates a date with a time of day, seconds zeroed.
    fn create_datetime(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hours: u32,
        minutes: u32,
    ) -> Result<Self::Date, InvalidDateError>;

    /// The year component.
    fn year(&self, date: &Self::Date) -> i32;
    /// The month component, `0..=11`.
    fn month(&self, date: &Self::Date) -> u32;
    /// The day-of-month component, 1-based.
    fn day(&self, date: &Self::Date) -> u32;
    /// The hour component, `0..=23`.
    fn hours(&self, date: &Self::Date) -> u32;
    /// The minute component, `0..=59`.
    fn minutes(&self, date: &Self::Date) -> u32;
    /// The day of week, 0 = Sunday .. 6 = Saturday.
    fn day_of_week(&self, date: &Self::Date) -> u32;
    /// Number of days in the date's month.
    fn days_in_month(&self, date: &Self::Date) -> u32;

    /// Returns a copy with the hour replaced (wrapped into `0..=23`).
    fn with_hours(&self, date: &Self::Date, hours: u32) -> Self::Date;
    /// Returns a copy with the minute replaced (wrapped into `0..=59`).
    fn with_minutes(&self, date: &Self::Date, minutes: u32) -> Self::Date;
    /// Returns a copy with the seconds replaced (wrapped into `0..=59`).
    fn with_seconds(&self, date: &Self::Date, seconds: u32) -> Self::Date;

    /// Adds calendar years, clamping Feb 29 to Feb 28 off leap years.
    fn add_years(&self, date: &Self::Date, delta: i32) -> Self::Date;
    /// Adds calendar months, clamping the day to the target month's length
    /// (Jan 31 + 1 month is the last day of February, never March).
    fn add_months(&self, date: &Self::Date, delta: i32) -> Self::Date;
    /// Adds calendar days.
    fn add_days(&self, date: &Self::Date, delta: i64) -> Self::Date;
    /// Adds hours.
    fn add_hours(&self, date: &Self::Date, delta: i64) -> Self::Date;
    /// Adds minutes.
    fn add_minutes(&self, date: &Self::Date, delta: i64) -> Self::Date;

    /// Compares two dates down to the given granularity.
    fn compare(&self, a: &Self::Date, b: &Self::Date, unit: Unit) -> Ordering;

    /// Whether two dates are equal down to the given granularity.
    fn same(&self, a: &Self::Date, b: &Self::Date, unit: Unit) -> bool {
        self.compare(a, b, unit) == Ordering::Equal
    }

    /// Clamps a date inclusively between optional bounds.
    fn clamp(
        &self,
        date: &Self::Date,
        min: Option<&Self::Date>,
        max: Option<&Self::Date>,
    ) -> Self::Date {
        if let Some(min) = min
            && self.compare(date, min, Unit::Minute) == Ordering::Less
        {
            return min.clone();
        }
        if let Some(max) = max
            && self.compare(date, max, Unit::Minute) == Ordering::Greater
        {
            return max.clone();
        }
        date.clone()
    }

    /// Whether the value is a well-formed date.
    fn is_valid(&self, date: &Self::Date) -> bool;

    /// Coerces an external value into a valid date, or `None`.
    ///
    /// Never fails: empty or unparseable input yields `None`.
    fn deserialize(&self, value: &DateInput<Self::Date>) -> Option<Self::Date>;

    /// Parses text against a list of parse formats tried in order.
    fn parse(&self, text: &str, formats: &[Self::FormatSpec]) -> Option<Self::Date>;

    /// Formats a date with the given display format.
    ///
    /// Fails with [`InvalidDateError::UnformattableDate`] for invalid dates.
    fn format(&self, date: &Self::Date, spec: &Self::FormatSpec)
    -> Result<String, InvalidDateError>;

    /// First day of the week for this locale, 0 = Sunday.
    fn first_day_of_week(&self) -> u32;
    /// Month names, January first.
    fn month_names(&self, style: NameStyle) -> &[String];
    /// Day-of-month display names, "1" through "31".
    fn date_names(&self) -> &[String];
    /// Weekday names, Sunday first.
    fn day_of_week_names(&self, style: NameStyle) -> &[String];
    /// The display name of the date's year.
    fn year_name(&self, date: &Self::Date) -> String;

    /// Weekday names rotated so index 0 is the locale's first day of week.
    fn rotated_day_of_week_names(&self, style: NameStyle) -> SmallVec<[String; 7]> {
        let names = self.day_of_week_names(style);
        let first = self.first_day_of_week() as usize % 7;
        names
            .iter()
            .cycle()
            .skip(first)
            .take(names.len())
            .cloned()
            .collect()
    }
}
