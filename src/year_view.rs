//! The month-of-year grid.

use crate::adapter::{DateAdapter, NameStyle, Unit};
use crate::cell::CalendarCell;
use crate::formats::DateFormats;
use crate::key::{Key, KeyEvent, LayoutDirection};
use crate::view::{KeyOutcome, ViewContext, date_enabled};

/// A rendered year: twelve month cells laid out four per row.
///
/// Cell values are 0-based month indexes.
#[derive(Debug, Clone)]
pub struct YearView {
    /// Header label, the year name.
    pub label: String,
    /// One cell per month, January first.
    pub cells: Vec<CalendarCell>,
    /// Month index holding focus.
    pub active_month: u32,
    /// Month index of the selection, when it falls in this year.
    pub selected_month: Option<u32>,
    /// Month index of today, when it falls in this year.
    pub today_month: Option<u32>,
}

/// Builds the grid for the year containing `ctx.active_date`.
pub fn build_year_view<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    formats: &DateFormats<A::FormatSpec>,
) -> YearView {
    let active = ctx.active_date;
    let year = adapter.year(active);
    let short_names = adapter.month_names(NameStyle::Short);

    let cells = (0..12)
        .map(|month| {
            let date = representative_date(adapter, active, month);
            let display = short_names[month as usize].clone();
            let aria = adapter
                .format(&date, &formats.display.month_year_a11y_label)
                .unwrap_or_else(|_| display.clone());
            let enabled = date_enabled(adapter, ctx, &date, Unit::Month);
            CalendarCell::new(month as i32, display, aria, enabled)
        })
        .collect();

    let today = adapter.today();
    let month_in_this_year =
        |candidate: &A::Date| (adapter.year(candidate) == year).then(|| adapter.month(candidate));

    YearView {
        label: adapter.year_name(active),
        cells,
        active_month: adapter.month(active),
        selected_month: ctx.selected.and_then(|date| month_in_this_year(date)),
        today_month: month_in_this_year(&today),
    }
}

/// The active date moved into `month` of the same year, with the day of
/// month clamped to the target month's length and the time kept.
fn representative_date<A: DateAdapter>(adapter: &A, active: &A::Date, month: u32) -> A::Date {
    adapter.add_months(active, month as i32 - adapter.month(active) as i32)
}

/// Keyboard handling for the year grid.
///
/// The vertical stride is uneven: with the twelve months split into rows of
/// seven and five, the `-5/-7/-12` pattern keeps arrow travel visually
/// vertical.
pub fn handle_year_key<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    event: KeyEvent,
    layout: LayoutDirection,
) -> KeyOutcome<A::Date> {
    let active = ctx.active_date;
    let month = adapter.month(active);
    let horizontal = if layout.is_rtl() { -1 } else { 1 };
    match event.key {
        Key::ArrowLeft => KeyOutcome::Navigate(adapter.add_months(active, -horizontal)),
        Key::ArrowRight => KeyOutcome::Navigate(adapter.add_months(active, horizontal)),
        Key::ArrowUp => {
            let stride = if month <= 4 {
                -5
            } else if month >= 7 {
                -7
            } else {
                -12
            };
            KeyOutcome::Navigate(adapter.add_months(active, stride))
        }
        Key::ArrowDown => {
            let stride = if month <= 4 {
                7
            } else if month >= 7 {
                5
            } else {
                12
            };
            KeyOutcome::Navigate(adapter.add_months(active, stride))
        }
        Key::Home => KeyOutcome::Navigate(adapter.add_months(active, -(month as i32))),
        Key::End => KeyOutcome::Navigate(adapter.add_months(active, 11 - month as i32)),
        Key::PageUp => {
            KeyOutcome::Navigate(adapter.add_years(active, if event.alt { -10 } else { -1 }))
        }
        Key::PageDown => {
            KeyOutcome::Navigate(adapter.add_years(active, if event.alt { 10 } else { 1 }))
        }
        Key::Enter | Key::Space => {
            if date_enabled(adapter, ctx, active, Unit::Month) {
                KeyOutcome::Select(active.clone())
            } else {
                KeyOutcome::Blocked
            }
        }
        Key::Escape => KeyOutcome::Ignored,
    }
}
