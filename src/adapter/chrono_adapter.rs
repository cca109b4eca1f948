//! [`DateAdapter`] backed by [`chrono`]'s naive date-time.
//!
//! Format specs are strftime strings, so the standard format table for this
//! adapter is plain `&str` data and parsing goes through
//! [`chrono::NaiveDateTime::parse_from_str`].

use std::cmp::Ordering;
use std::fmt::Write as _;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::adapter::{DateAdapter, DateInput, Locale, NameStyle, Unit};
use crate::error::InvalidDateError;

/// Fallback chain applied when deserializing free-form text.
const DESERIALIZE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const DESERIALIZE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// [`DateAdapter`] over [`chrono::NaiveDateTime`].
#[derive(Debug, Clone)]
pub struct ChronoDateAdapter {
    locale: Locale,
    date_names: Vec<String>,
}

impl ChronoDateAdapter {
    /// Creates an adapter for the given locale.
    pub fn new(locale: Locale) -> Self {
        let date_names = (1..=31).map(|day| day.to_string()).collect();
        Self { locale, date_names }
    }
}

impl Default for ChronoDateAdapter {
    fn default() -> Self {
        Self::new(Locale::english())
    }
}

impl DateAdapter for ChronoDateAdapter {
    type Date = NaiveDateTime;
    type FormatSpec = String;

    fn today(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn create_datetime(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hours: u32,
        minutes: u32,
    ) -> Result<NaiveDateTime, InvalidDateError> {
        if month > 11 {
            return Err(InvalidDateError::MonthOutOfRange { month });
        }
        if day == 0 || day > 31 {
            return Err(InvalidDateError::DayOutOfRange { day });
        }
        let date = NaiveDate::from_ymd_opt(year, month + 1, day)
            .ok_or(InvalidDateError::DayNotInMonth { day, month })?;
        let time = NaiveTime::from_hms_opt(hours, minutes, 0)
            .ok_or(InvalidDateError::TimeOutOfRange { hours, minutes })?;
        Ok(NaiveDateTime::new(date, time))
    }

    fn year(&self, date: &NaiveDateTime) -> i32 {
        date.year()
    }

    fn month(&self, date: &NaiveDateTime) -> u32 {
        date.month0()
    }

    fn day(&self, date: &NaiveDateTime) -> u32 {
        date.day()
    }

    fn hours(&self, date: &NaiveDateTime) -> u32 {
        date.hour()
    }

    fn minutes(&self, date: &NaiveDateTime) -> u32 {
        date.minute()
    }

    fn day_of_week(&self, date: &NaiveDateTime) -> u32 {
        date.weekday().num_days_from_sunday()
    }

    fn days_in_month(&self, date: &NaiveDateTime) -> u32 {
        let (year, month) = if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    fn with_hours(&self, date: &NaiveDateTime, hours: u32) -> NaiveDateTime {
        date.with_hour(hours % 24).unwrap_or(*date)
    }

    fn with_minutes(&self, date: &NaiveDateTime, minutes: u32) -> NaiveDateTime {
        date.with_minute(minutes % 60).unwrap_or(*date)
    }

    fn with_seconds(&self, date: &NaiveDateTime, seconds: u32) -> NaiveDateTime {
        date.with_second(seconds % 60).unwrap_or(*date)
    }

    fn add_years(&self, date: &NaiveDateTime, delta: i32) -> NaiveDateTime {
        self.add_months(date, delta.saturating_mul(12))
    }

    fn add_months(&self, date: &NaiveDateTime, delta: i32) -> NaiveDateTime {
        // chrono clamps the day of month when the target month is shorter.
        let shifted = if delta >= 0 {
            date.checked_add_months(Months::new(delta as u32))
        } else {
            date.checked_sub_months(Months::new(delta.unsigned_abs()))
        };
        shifted.unwrap_or(*date)
    }

    fn add_days(&self, date: &NaiveDateTime, delta: i64) -> NaiveDateTime {
        Duration::try_days(delta)
            .and_then(|span| date.checked_add_signed(span))
            .unwrap_or(*date)
    }

    fn add_hours(&self, date: &NaiveDateTime, delta: i64) -> NaiveDateTime {
        Duration::try_hours(delta)
            .and_then(|span| date.checked_add_signed(span))
            .unwrap_or(*date)
    }

    fn add_minutes(&self, date: &NaiveDateTime, delta: i64) -> NaiveDateTime {
        Duration::try_minutes(delta)
            .and_then(|span| date.checked_add_signed(span))
            .unwrap_or(*date)
    }

    fn compare(&self, a: &NaiveDateTime, b: &NaiveDateTime, unit: Unit) -> Ordering {
        let by_year = a.year().cmp(&b.year());
        if unit == Unit::Year || by_year != Ordering::Equal {
            return by_year;
        }
        let by_month = a.month().cmp(&b.month());
        if unit == Unit::Month || by_month != Ordering::Equal {
            return by_month;
        }
        let by_day = a.day().cmp(&b.day());
        if unit == Unit::Day || by_day != Ordering::Equal {
            return by_day;
        }
        (a.hour(), a.minute()).cmp(&(b.hour(), b.minute()))
    }

    fn is_valid(&self, _date: &NaiveDateTime) -> bool {
        true
    }

    fn deserialize(&self, value: &DateInput<NaiveDateTime>) -> Option<NaiveDateTime> {
        match value {
            DateInput::Date(date) => Some(*date),
            DateInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                DESERIALIZE_DATETIME_FORMATS
                    .iter()
                    .find_map(|spec| NaiveDateTime::parse_from_str(text, spec).ok())
                    .or_else(|| {
                        DESERIALIZE_DATE_FORMATS.iter().find_map(|spec| {
                            NaiveDate::parse_from_str(text, spec)
                                .ok()
                                .and_then(|date| date.and_hms_opt(0, 0, 0))
                        })
                    })
            }
            DateInput::Empty => None,
        }
    }

    fn parse(&self, text: &str, formats: &[String]) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        formats.iter().find_map(|spec| {
            NaiveDateTime::parse_from_str(text, spec)
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, spec)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .or_else(|| {
                    NaiveTime::parse_from_str(text, spec)
                        .ok()
                        .map(|time| NaiveDateTime::new(self.today().date(), time))
                })
        })
    }

    fn format(&self, date: &NaiveDateTime, spec: &String) -> Result<String, InvalidDateError> {
        let mut out = String::new();
        // DelayedFormat reports invalid strftime items through fmt::Error.
        write!(out, "{}", date.format(spec)).map_err(|_| InvalidDateError::UnformattableDate)?;
        Ok(out)
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

    fn year_name(&self, date: &NaiveDateTime) -> String {
        date.year().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    fn adapter() -> ChronoDateAdapter {
        ChronoDateAdapter::default()
    }

    #[test]
    fn create_date_uses_zero_based_months() {
        let adapter = adapter();
        let date = adapter.create_date(2024, 0, 31).expect("valid date");
        assert_eq!(date.month(), 1);
        assert_eq!(adapter.month(&date), 0);
        assert!(adapter.create_date(2024, 12, 1).is_err());
        assert!(adapter.create_date(2024, 1, 30).is_err());
    }

    #[test]
    fn add_months_clamps_day() {
        let adapter = adapter();
        let jan31 = adapter.create_date(2024, 0, 31).expect("valid date");
        let feb = adapter.add_months(&jan31, 1);
        assert_eq!((adapter.month(&feb), adapter.day(&feb)), (1, 29));
        let dec = adapter.add_months(&jan31, -1);
        assert_eq!((adapter.year(&dec), adapter.month(&dec)), (2023, 11));
    }

    #[test]
    fn compare_truncates_to_unit() {
        let adapter = adapter();
        let a = adapter.create_datetime(2024, 5, 3, 8, 0).expect("valid");
        let b = adapter.create_datetime(2024, 5, 3, 17, 45).expect("valid");
        assert_eq!(adapter.compare(&a, &b, Unit::Day), Ordering::Equal);
        assert_eq!(adapter.compare(&a, &b, Unit::Minute), Ordering::Less);
    }

    #[test]
    fn deserialize_handles_text_and_empty() {
        let adapter = adapter();
        let parsed = adapter
            .deserialize(&DateInput::text("2024-06-03 08:30"))
            .expect("valid input");
        assert_eq!((parsed.hour(), parsed.minute()), (8, 30));
        assert!(adapter.deserialize(&DateInput::text("garbage")).is_none());
        assert!(adapter.deserialize(&DateInput::<NaiveDateTime>::Empty).is_none());
    }

    #[test]
    fn parse_falls_back_from_datetime_to_date_to_time() {
        let adapter = adapter();
        let formats = vec!["%Y-%m-%d %H:%M".to_string(), "%Y-%m-%d".to_string()];
        let with_time = adapter.parse("2024-06-03 08:30", &formats).expect("parses");
        assert_eq!(with_time.hour(), 8);
        let date_only = adapter.parse("2024-06-03", &formats).expect("parses");
        assert_eq!((date_only.hour(), date_only.minute()), (0, 0));
        assert!(adapter.parse("junk", &formats).is_none());
    }

    #[test]
    fn format_renders_strftime_specs() {
        let adapter = adapter();
        let date = adapter.create_datetime(2024, 0, 31, 14, 5).expect("valid");
        assert_eq!(
            adapter
                .format(&date, &"%b %-d, %Y".to_string())
                .expect("formats"),
            "Jan 31, 2024"
        );
        assert_eq!(
            adapter
                .format(&date, &"%-I:%M %p".to_string())
                .expect("formats"),
            "2:05 PM"
        );
    }

    #[test]
    fn days_in_month_handles_december_and_february() {
        let adapter = adapter();
        let dec = adapter.create_date(2024, 11, 5).expect("valid");
        assert_eq!(adapter.days_in_month(&dec), 31);
        let feb = adapter.create_date(2024, 1, 5).expect("valid");
        assert_eq!(adapter.days_in_month(&feb), 29);
    }
}
