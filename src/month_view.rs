//! The day-of-month grid.

use smallvec::SmallVec;

use crate::adapter::{DateAdapter, NameStyle, Unit};
use crate::cell::CalendarCell;
use crate::formats::DateFormats;
use crate::key::{Key, KeyEvent, LayoutDirection};
use crate::view::{KeyOutcome, ViewContext, date_enabled};

/// A rendered month: weekday header, leading blanks and one cell per day.
///
/// Cell values are 1-based days of month. Rows are seven wide; the host lays
/// out `leading_blanks` empty slots before the first cell.
#[derive(Debug, Clone)]
pub struct MonthView {
    /// Header label, e.g. "January 2024".
    pub label: String,
    /// Weekday names rotated so index 0 is the locale's first day of week.
    pub weekdays: SmallVec<[String; 7]>,
    /// Empty slots before day 1 in the first row.
    pub leading_blanks: usize,
    /// One cell per day of the month, in order.
    pub cells: Vec<CalendarCell>,
    /// Day of month holding focus.
    pub active_day: u32,
    /// Day of month of the selection, when it falls in this month.
    pub selected_day: Option<u32>,
    /// Day of month of today, when it falls in this month.
    pub today_day: Option<u32>,
}

/// Builds the grid for the month containing `ctx.active_date`.
pub fn build_month_view<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    formats: &DateFormats<A::FormatSpec>,
) -> MonthView {
    let active = ctx.active_date;
    let year = adapter.year(active);
    let month = adapter.month(active);
    let first_of_month = adapter.add_days(active, 1 - i64::from(adapter.day(active)));
    let days = adapter.days_in_month(active);

    let leading_blanks =
        ((7 + adapter.day_of_week(&first_of_month) - adapter.first_day_of_week()) % 7) as usize;

    let label = adapter
        .format(active, &formats.display.month_year_label)
        .unwrap_or_else(|_| {
            format!("{} {}", adapter.month_names(NameStyle::Long)[month as usize], year)
        });

    let date_names = adapter.date_names();
    let mut cells = Vec::with_capacity(days as usize);
    let mut date = first_of_month;
    for day in 1..=days {
        let display = date_names
            .get((day - 1) as usize)
            .cloned()
            .unwrap_or_else(|| day.to_string());
        let aria = adapter
            .format(&date, &formats.display.date_a11y_label)
            .unwrap_or_else(|_| display.clone());
        let enabled = date_enabled(adapter, ctx, &date, Unit::Day);
        cells.push(CalendarCell::new(day as i32, display, aria, enabled));
        date = adapter.add_days(&date, 1);
    }

    let today = adapter.today();
    let day_in_this_month = |candidate: &A::Date| {
        (adapter.year(candidate) == year && adapter.month(candidate) == month)
            .then(|| adapter.day(candidate))
    };

    MonthView {
        label,
        weekdays: adapter.rotated_day_of_week_names(NameStyle::Narrow),
        leading_blanks,
        cells,
        active_day: adapter.day(active),
        selected_day: ctx.selected.and_then(|date| day_in_this_month(date)),
        today_day: day_in_this_month(&today),
    }
}

/// Keyboard handling for the month grid.
///
/// Navigation is free to land on disabled dates; only activation checks
/// selectability. The returned date is unclamped, the calendar clamps when
/// it applies the move.
pub fn handle_month_key<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    event: KeyEvent,
    layout: LayoutDirection,
) -> KeyOutcome<A::Date> {
    let active = ctx.active_date;
    let horizontal: i64 = if layout.is_rtl() { -1 } else { 1 };
    match event.key {
        Key::ArrowLeft => KeyOutcome::Navigate(adapter.add_days(active, -horizontal)),
        Key::ArrowRight => KeyOutcome::Navigate(adapter.add_days(active, horizontal)),
        Key::ArrowUp => KeyOutcome::Navigate(adapter.add_days(active, -7)),
        Key::ArrowDown => KeyOutcome::Navigate(adapter.add_days(active, 7)),
        Key::Home => {
            KeyOutcome::Navigate(adapter.add_days(active, 1 - i64::from(adapter.day(active))))
        }
        Key::End => {
            let last = adapter.days_in_month(active);
            KeyOutcome::Navigate(
                adapter.add_days(active, i64::from(last) - i64::from(adapter.day(active))),
            )
        }
        Key::PageUp => KeyOutcome::Navigate(if event.alt {
            adapter.add_years(active, -1)
        } else {
            adapter.add_months(active, -1)
        }),
        Key::PageDown => KeyOutcome::Navigate(if event.alt {
            adapter.add_years(active, 1)
        } else {
            adapter.add_months(active, 1)
        }),
        Key::Enter | Key::Space => {
            if date_enabled(adapter, ctx, active, Unit::Day) {
                KeyOutcome::Select(active.clone())
            } else {
                KeyOutcome::Blocked
            }
        }
        Key::Escape => KeyOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapter::civil::CivilDateAdapter;
    use crate::view::DateFilter;

    fn setup() -> (CivilDateAdapter, DateFormats<crate::adapter::civil::CivilFormatSpec>) {
        (CivilDateAdapter::default(), DateFormats::civil_standard())
    }

    #[test]
    fn january_2024_has_offset_one_and_31_cells() {
        let (adapter, formats) = setup();
        let active = adapter.create_date(2024, 0, 15).expect("valid");
        let view = build_month_view(&adapter, &ViewContext::new(&active), &formats);
        // Jan 1, 2024 was a Monday and the week starts on Sunday.
        assert_eq!(view.leading_blanks, 1);
        assert_eq!(view.cells.len(), 31);
        assert_eq!(view.label, "January 2024");
        assert_eq!(view.active_day, 15);
        assert_eq!(view.cells[0].display_value, "1");
        assert_eq!(view.cells[0].aria_label, "January 1, 2024");
    }

    #[test]
    fn weekday_header_rotates_with_locale() {
        let adapter =
            CivilDateAdapter::new(crate::adapter::Locale::english().with_first_day_of_week(1));
        let formats = DateFormats::civil_standard();
        let active = adapter.create_date(2024, 0, 1).expect("valid");
        let view = build_month_view(&adapter, &ViewContext::new(&active), &formats);
        assert_eq!(view.weekdays[0], "M");
        // Monday-start week pushes Jan 1, 2024 (a Monday) to offset zero.
        assert_eq!(view.leading_blanks, 0);
    }

    #[test]
    fn bounds_disable_cells_outside_range() {
        let (adapter, formats) = setup();
        let active = adapter.create_date(2024, 0, 15).expect("valid");
        let min = adapter.create_date(2024, 0, 10).expect("valid");
        let mut ctx = ViewContext::new(&active);
        ctx.min_date = Some(&min);
        let view = build_month_view(&adapter, &ctx, &formats);
        assert!(!view.cells[8].enabled);
        assert!(view.cells[9].enabled);
    }

    #[test]
    fn home_and_end_jump_to_month_edges() {
        let (adapter, _) = setup();
        let active = adapter.create_date(2024, 1, 15).expect("valid");
        let ctx = ViewContext::new(&active);
        let home = handle_month_key(&adapter, &ctx, KeyEvent::new(Key::Home), LayoutDirection::Ltr);
        let end = handle_month_key(&adapter, &ctx, KeyEvent::new(Key::End), LayoutDirection::Ltr);
        assert_eq!(
            home,
            KeyOutcome::Navigate(adapter.create_date(2024, 1, 1).expect("valid"))
        );
        assert_eq!(
            end,
            KeyOutcome::Navigate(adapter.create_date(2024, 1, 29).expect("valid"))
        );
    }

    #[test]
    fn horizontal_arrows_mirror_under_rtl() {
        let (adapter, _) = setup();
        let active = adapter.create_date(2024, 0, 15).expect("valid");
        let ctx = ViewContext::new(&active);
        let ltr = handle_month_key(
            &adapter,
            &ctx,
            KeyEvent::new(Key::ArrowRight),
            LayoutDirection::Ltr,
        );
        let rtl = handle_month_key(
            &adapter,
            &ctx,
            KeyEvent::new(Key::ArrowRight),
            LayoutDirection::Rtl,
        );
        assert_eq!(
            ltr,
            KeyOutcome::Navigate(adapter.create_date(2024, 0, 16).expect("valid"))
        );
        assert_eq!(
            rtl,
            KeyOutcome::Navigate(adapter.create_date(2024, 0, 14).expect("valid"))
        );
    }

    #[test]
    fn page_keys_move_by_month_and_year() {
        let (adapter, _) = setup();
        let active = adapter.create_date(2024, 0, 31).expect("valid");
        let ctx = ViewContext::new(&active);
        let next_month = handle_month_key(
            &adapter,
            &ctx,
            KeyEvent::new(Key::PageDown),
            LayoutDirection::Ltr,
        );
        // Clamped into February.
        assert_eq!(
            next_month,
            KeyOutcome::Navigate(adapter.create_date(2024, 1, 29).expect("valid"))
        );
        let prev_year = handle_month_key(
            &adapter,
            &ctx,
            KeyEvent::with_alt(Key::PageUp),
            LayoutDirection::Ltr,
        );
        assert_eq!(
            prev_year,
            KeyOutcome::Navigate(adapter.create_date(2023, 0, 31).expect("valid"))
        );
    }

    #[test]
    fn selection_is_blocked_on_disabled_dates() {
        let (adapter, _) = setup();
        let active = adapter.create_date(2024, 0, 15).expect("valid");
        let filter: DateFilter<_> = Arc::new(|_: &_, _| false);
        let mut ctx = ViewContext::new(&active);
        ctx.date_filter = Some(&filter);
        let outcome =
            handle_month_key(&adapter, &ctx, KeyEvent::new(Key::Enter), LayoutDirection::Ltr);
        assert_eq!(outcome, KeyOutcome::Blocked);

        // Navigation onto the disabled neighbour still works.
        let nav = handle_month_key(
            &adapter,
            &ctx,
            KeyEvent::new(Key::ArrowRight),
            LayoutDirection::Ltr,
        );
        assert!(matches!(nav, KeyOutcome::Navigate(_)));
    }
}
