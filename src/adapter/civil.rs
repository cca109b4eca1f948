//! A dependency-free adapter over a hand-rolled civil calendar.
//!
//! This is the "native" backend: proleptic Gregorian arithmetic with no
//! timezone handling, suitable wherever the host does not already carry a
//! date library.

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::adapter::{DateAdapter, DateInput, Locale, NameStyle, Unit};
use crate::error::InvalidDateError;

/// A calendar date with a time of day, no timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDateTime {
    year: i32,
    month: u32,
    day: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl CivilDateTime {
    /// Creates a date at midnight if the values are valid.
    ///
    /// `month` is 1-based here, matching how dates are usually written; the
    /// adapter surface translates from 0-based month indexes.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hours: 0,
            minutes: 0,
            seconds: 0,
        })
    }

    /// Returns a copy with the given time of day, if valid.
    pub fn and_hms(self, hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if hours > 23 || minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Self {
            hours,
            minutes,
            seconds,
            ..self
        })
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The day of month, 1-based.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// The hour, `0..=23`.
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// The minute, `0..=59`.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// The second, `0..=59`.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The current UTC date and time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let secs = duration.as_secs() as i64;
        let (year, month, day) = civil_from_days(secs.div_euclid(86_400));
        let day_secs = secs.rem_euclid(86_400) as u32;
        Self {
            year,
            month,
            day,
            hours: day_secs / 3_600,
            minutes: day_secs / 60 % 60,
            seconds: day_secs % 60,
        }
    }

    /// Seconds since the civil epoch (1970-01-01 00:00:00).
    fn epoch_seconds(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day) * 86_400
            + i64::from(self.hours) * 3_600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds)
    }

    fn from_epoch_seconds(secs: i64) -> Self {
        let (year, month, day) = civil_from_days(secs.div_euclid(86_400));
        let day_secs = secs.rem_euclid(86_400) as u32;
        Self {
            year,
            month,
            day,
            hours: day_secs / 3_600,
            minutes: day_secs / 60 % 60,
            seconds: day_secs % 60,
        }
    }
}

/// Display format for the civil adapter.
///
/// The enumerated render styles stand where a formatting library's options
/// object would; each named display slot of the format table maps onto one
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CivilFormatSpec {
    /// "1/31/2024"
    ShortDate,
    /// "1/31/2024 14:05"
    ShortDateTime,
    /// "14:05"
    HourMinute,
    /// "January 31, 2024"
    LongDate,
    /// "Jan 31"
    ShortMonthDay,
    /// "January 31"
    LongMonthDay,
    /// "Jan 2024"
    ShortMonthYear,
    /// "January 2024"
    LongMonthYear,
}

/// [`DateAdapter`] over [`CivilDateTime`].
#[derive(Debug, Clone)]
pub struct CivilDateAdapter {
    locale: Locale,
    date_names: Vec<String>,
}

impl CivilDateAdapter {
    /// Creates an adapter for the given locale.
    pub fn new(locale: Locale) -> Self {
        let date_names = (1..=31).map(|day| day.to_string()).collect();
        Self { locale, date_names }
    }

    fn month_name(&self, date: &CivilDateTime, style: NameStyle) -> &str {
        &self.month_names(style)[(date.month - 1) as usize]
    }
}

impl Default for CivilDateAdapter {
    fn default() -> Self {
        Self::new(Locale::english())
    }
}

impl DateAdapter for CivilDateAdapter {
    type Date = CivilDateTime;
    type FormatSpec = CivilFormatSpec;

    fn today(&self) -> CivilDateTime {
        CivilDateTime::now()
    }

    fn create_datetime(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hours: u32,
        minutes: u32,
    ) -> Result<CivilDateTime, InvalidDateError> {
        if month > 11 {
            return Err(InvalidDateError::MonthOutOfRange { month });
        }
        if day == 0 {
            return Err(InvalidDateError::DayOutOfRange { day });
        }
        let date = CivilDateTime::new(year, month + 1, day)
            .ok_or(InvalidDateError::DayNotInMonth { day, month })?;
        date.and_hms(hours, minutes, 0)
            .ok_or(InvalidDateError::TimeOutOfRange { hours, minutes })
    }

    fn year(&self, date: &CivilDateTime) -> i32 {
        date.year
    }

    fn month(&self, date: &CivilDateTime) -> u32 {
        date.month - 1
    }

    fn day(&self, date: &CivilDateTime) -> u32 {
        date.day
    }

    fn hours(&self, date: &CivilDateTime) -> u32 {
        date.hours
    }

    fn minutes(&self, date: &CivilDateTime) -> u32 {
        date.minutes
    }

    fn day_of_week(&self, date: &CivilDateTime) -> u32 {
        // 1970-01-01 was a Thursday; 0 = Sunday.
        (days_from_civil(date.year, date.month, date.day) + 4).rem_euclid(7) as u32
    }

    fn days_in_month(&self, date: &CivilDateTime) -> u32 {
        days_in_month(date.year, date.month)
    }

    fn with_hours(&self, date: &CivilDateTime, hours: u32) -> CivilDateTime {
        CivilDateTime {
            hours: hours % 24,
            ..*date
        }
    }

    fn with_minutes(&self, date: &CivilDateTime, minutes: u32) -> CivilDateTime {
        CivilDateTime {
            minutes: minutes % 60,
            ..*date
        }
    }

    fn with_seconds(&self, date: &CivilDateTime, seconds: u32) -> CivilDateTime {
        CivilDateTime {
            seconds: seconds % 60,
            ..*date
        }
    }

    fn add_years(&self, date: &CivilDateTime, delta: i32) -> CivilDateTime {
        self.add_months(date, delta.saturating_mul(12))
    }

    fn add_months(&self, date: &CivilDateTime, delta: i32) -> CivilDateTime {
        let total = i64::from(date.year) * 12 + i64::from(date.month) - 1 + i64::from(delta);
        let year = total.div_euclid(12) as i32;
        let month = (total.rem_euclid(12) + 1) as u32;
        let day = date.day.min(days_in_month(year, month));
        CivilDateTime {
            year,
            month,
            day,
            ..*date
        }
    }

    fn add_days(&self, date: &CivilDateTime, delta: i64) -> CivilDateTime {
        CivilDateTime::from_epoch_seconds(date.epoch_seconds() + delta * 86_400)
    }

    fn add_hours(&self, date: &CivilDateTime, delta: i64) -> CivilDateTime {
        CivilDateTime::from_epoch_seconds(date.epoch_seconds() + delta * 3_600)
    }

    fn add_minutes(&self, date: &CivilDateTime, delta: i64) -> CivilDateTime {
        CivilDateTime::from_epoch_seconds(date.epoch_seconds() + delta * 60)
    }

    fn compare(&self, a: &CivilDateTime, b: &CivilDateTime, unit: Unit) -> Ordering {
        let by_year = a.year.cmp(&b.year);
        if unit == Unit::Year || by_year != Ordering::Equal {
            return by_year;
        }
        let by_month = a.month.cmp(&b.month);
        if unit == Unit::Month || by_month != Ordering::Equal {
            return by_month;
        }
        let by_day = a.day.cmp(&b.day);
        if unit == Unit::Day || by_day != Ordering::Equal {
            return by_day;
        }
        (a.hours, a.minutes).cmp(&(b.hours, b.minutes))
    }

    fn is_valid(&self, _date: &CivilDateTime) -> bool {
        // CivilDateTime can only be constructed from valid components.
        true
    }

    fn deserialize(&self, value: &DateInput<CivilDateTime>) -> Option<CivilDateTime> {
        match value {
            DateInput::Date(date) => Some(*date),
            DateInput::Text(text) => {
                if text.trim().is_empty() {
                    return None;
                }
                parse_iso(text)
            }
            DateInput::Empty => None,
        }
    }

    fn parse(&self, text: &str, _formats: &[CivilFormatSpec]) -> Option<CivilDateTime> {
        // The civil backend has no format-driven parser; ISO 8601 covers
        // what bound inputs hand us, matching the enumerated parse slots
        // being empty for this adapter.
        parse_iso(text)
    }

    fn format(
        &self,
        date: &CivilDateTime,
        spec: &CivilFormatSpec,
    ) -> Result<String, InvalidDateError> {
        let text = match spec {
            CivilFormatSpec::ShortDate => {
                format!("{}/{}/{}", date.month, date.day, date.year)
            }
            CivilFormatSpec::ShortDateTime => format!(
                "{}/{}/{} {}:{:02}",
                date.month, date.day, date.year, date.hours, date.minutes
            ),
            CivilFormatSpec::HourMinute => format!("{}:{:02}", date.hours, date.minutes),
            CivilFormatSpec::LongDate => format!(
                "{} {}, {}",
                self.month_name(date, NameStyle::Long),
                date.day,
                date.year
            ),
            CivilFormatSpec::ShortMonthDay => {
                format!("{} {}", self.month_name(date, NameStyle::Short), date.day)
            }
            CivilFormatSpec::LongMonthDay => {
                format!("{} {}", self.month_name(date, NameStyle::Long), date.day)
            }
            CivilFormatSpec::ShortMonthYear => {
                format!("{} {}", self.month_name(date, NameStyle::Short), date.year)
            }
            CivilFormatSpec::LongMonthYear => {
                format!("{} {}", self.month_name(date, NameStyle::Long), date.year)
            }
        };
        Ok(text)
    }

    fn first_day_of_week(&self) -> u32 {
        self.locale.first_day_of_week
    }

    fn month_names(&self, style: NameStyle) -> &[String] {
        match style {
            NameStyle::Long => &self.locale.long_months,
            NameStyle::Short => &self.locale.short_months,
            NameStyle::Narrow => &self.locale.narrow_months,
        }
    }

    fn date_names(&self) -> &[String] {
        &self.date_names
    }

    fn day_of_week_names(&self, style: NameStyle) -> &[String] {
        match style {
            NameStyle::Long => &self.locale.long_days,
            NameStyle::Short => &self.locale.short_days,
            NameStyle::Narrow => &self.locale.narrow_days,
        }
    }

    fn year_name(&self, date: &CivilDateTime) -> String {
        date.year.to_string()
    }
}

/// Parses `YYYY-MM-DD`, optionally followed by `THH:MM[:SS]` or
/// ` HH:MM[:SS]`.
fn parse_iso(text: &str) -> Option<CivilDateTime> {
    let text = text.trim();
    let (date_part, time_part) = match text.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };

    let mut fields = date_part.splitn(3, '-');
    let year: i32 = fields.next()?.parse().ok()?;
    let month: u32 = fields.next()?.parse().ok()?;
    let day: u32 = fields.next()?.parse().ok()?;
    let date = CivilDateTime::new(year, month, day)?;

    let Some(time_part) = time_part else {
        return Some(date);
    };
    let mut fields = time_part.trim_end_matches('Z').splitn(3, ':');
    let hours: u32 = fields.next()?.parse().ok()?;
    let minutes: u32 = fields.next()?.parse().ok()?;
    let seconds: u32 = match fields.next() {
        Some(seconds) => seconds.parse().ok()?,
        None => 0,
    };
    date.and_hms(hours, minutes, seconds)
}

/// Number of days in a month, `month` 1-based.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days since 1970-01-01 for a civil date (Howard Hinnant's algorithm).
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let mut y = year;
    let m = month as i32;
    let d = day as i32;
    y -= if m <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = m + if m > 2 { -3 } else { 9 };
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    i64::from(era) * 146_097 + i64::from(doe) - 719_468
}

/// Civil (year, month 1-based, day) for days since 1970-01-01.
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = mp + if mp < 10 { 3 } else { -9 };
    let year = y + if month <= 2 { 1 } else { 0 };
    (year as i32, month as u32, day as u32)
}
