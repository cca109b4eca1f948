//! Error types shared across the picker core.

use thiserror::Error;

/// Fatal configuration errors.
///
/// These indicate integrator mistakes (missing adapter, double input
/// binding, opening without an input) and are raised at setup or call time.
/// They are not recoverable at runtime; fix the wiring instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No [`DateAdapter`](crate::adapter::DateAdapter) was supplied.
    #[error("no DateAdapter provided; a date adapter is required to build a calendar")]
    MissingAdapter,
    /// No date format table was supplied.
    #[error("no date format table provided; a format table is required to build a calendar")]
    MissingFormats,
    /// A second input was registered with the same datepicker.
    #[error("a datepicker can only be associated with a single input")]
    MultipleInputs,
    /// `open` was called before any input was registered.
    #[error("attempted to open a datepicker with no associated input")]
    OpenWithoutInput,
}

/// Structural errors for malformed date construction or formatting.
///
/// Raised synchronously by adapters; callers either validate up front or
/// handle the error. Policy-level invalid values coming from the outside
/// world are never surfaced this way, they coerce to `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDateError {
    /// Month index outside `0..=11`.
    #[error("invalid month index {month}; month index must be between 0 and 11")]
    MonthOutOfRange {
        /// The offending month index.
        month: u32,
    },
    /// Day of month less than 1.
    #[error("invalid day {day}; day must be greater than 0")]
    DayOutOfRange {
        /// The offending day number.
        day: u32,
    },
    /// Day that does not exist in the target month (e.g. Feb 30).
    #[error("invalid day {day} for month with index {month}")]
    DayNotInMonth {
        /// The offending day number.
        day: u32,
        /// The 0-based month index it was combined with.
        month: u32,
    },
    /// Hours outside `0..=23` or minutes outside `0..=59`.
    #[error("invalid time {hours:02}:{minutes:02}")]
    TimeOutOfRange {
        /// The offending hour value.
        hours: u32,
        /// The offending minute value.
        minutes: u32,
    },
    /// An invalid date was passed to `format`.
    #[error("cannot format an invalid date")]
    UnformattableDate,
}
