//! Format tables consumed by the picker surfaces.
//!
//! A [`DateFormats`] bundles the parse slots tried against typed input and
//! the display slots used for input text and header/ARIA labels. The table
//! is generic over the adapter's format spec, so each backend ships its own
//! standard table.

use crate::adapter::civil::CivilFormatSpec;

/// Format specs tried, in order, when parsing typed input.
#[derive(Debug, Clone)]
pub struct ParseFormats<F> {
    /// Candidates for a date-only input.
    pub date_input: Vec<F>,
    /// Candidates for a combined date and time input.
    pub datetime_input: Vec<F>,
    /// Candidates for a time-only input.
    pub time_input: Vec<F>,
}

/// Format specs for rendering dates back to the user.
#[derive(Debug, Clone)]
pub struct DisplayFormats<F> {
    /// Text written into a date-only input.
    pub date_input: F,
    /// Text written into a combined date and time input.
    pub datetime_input: F,
    /// Text written into a time-only input.
    pub time_input: F,
    /// Accessible label for a full date.
    pub date_a11y_label: F,
    /// Month-and-day label, abbreviated.
    pub month_day_label: F,
    /// Accessible month-and-day label, spelled out.
    pub month_day_a11y_label: F,
    /// Calendar header label for a month.
    pub month_year_label: F,
    /// Accessible calendar header label for a month.
    pub month_year_a11y_label: F,
    /// Standalone time label.
    pub time_label: F,
}

/// The full format table for one adapter backend.
#[derive(Debug, Clone)]
pub struct DateFormats<F> {
    /// Parse slots.
    pub parse: ParseFormats<F>,
    /// Display slots.
    pub display: DisplayFormats<F>,
}

impl DateFormats<String> {
    /// Standard strftime table for [`ChronoDateAdapter`].
    ///
    /// [`ChronoDateAdapter`]: crate::adapter::chrono_adapter::ChronoDateAdapter
    pub fn chrono_standard() -> Self {
        let dates = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
        Self {
            parse: ParseFormats {
                date_input: dates.iter().map(|spec| (*spec).to_string()).collect(),
                datetime_input: dates
                    .iter()
                    .map(|spec| format!("{spec} %H:%M"))
                    .chain(dates.iter().map(|spec| (*spec).to_string()))
                    .collect(),
                time_input: vec!["%H:%M".to_string(), "%I:%M %p".to_string()],
            },
            display: DisplayFormats {
                date_input: "%b %-d, %Y".to_string(),
                datetime_input: "%b %-d, %Y %-I:%M %p".to_string(),
                time_input: "%-I:%M %p".to_string(),
                date_a11y_label: "%B %-d, %Y".to_string(),
                month_day_label: "%b %-d".to_string(),
                month_day_a11y_label: "%B %-d".to_string(),
                month_year_label: "%B %Y".to_string(),
                month_year_a11y_label: "%B %Y".to_string(),
                time_label: "%H:%M".to_string(),
            },
        }
    }
}

impl DateFormats<CivilFormatSpec> {
    /// Standard table for [`CivilDateAdapter`].
    ///
    /// The civil backend parses ISO 8601 directly, so the parse slots are
    /// empty.
    ///
    /// [`CivilDateAdapter`]: crate::adapter::civil::CivilDateAdapter
    pub fn civil_standard() -> Self {
        Self {
            parse: ParseFormats {
                date_input: Vec::new(),
                datetime_input: Vec::new(),
                time_input: Vec::new(),
            },
            display: DisplayFormats {
                date_input: CivilFormatSpec::ShortDate,
                datetime_input: CivilFormatSpec::ShortDateTime,
                time_input: CivilFormatSpec::HourMinute,
                date_a11y_label: CivilFormatSpec::LongDate,
                month_day_label: CivilFormatSpec::ShortMonthDay,
                month_day_a11y_label: CivilFormatSpec::LongMonthDay,
                month_year_label: CivilFormatSpec::LongMonthYear,
                month_year_a11y_label: CivilFormatSpec::LongMonthYear,
                time_label: CivilFormatSpec::HourMinute,
            },
        }
    }
}
