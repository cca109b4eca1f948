//! The hour and minute selection rings.

use crate::adapter::{DateAdapter, Unit};
use crate::cell::CalendarCell;
use crate::formats::DateFormats;
use crate::key::{Key, KeyEvent, LayoutDirection};
use crate::view::{KeyOutcome, ViewContext, date_enabled};

/// Which ring the clock is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Picking the hour.
    #[default]
    Hour,
    /// Picking the minute.
    Minute,
}

/// A rendered clock ring.
///
/// Hour cell values are actual hours (`0..=23` even in 12-hour mode);
/// minute cell values are minutes.
#[derive(Debug, Clone)]
pub struct ClockView {
    /// Which ring is shown.
    pub mode: ClockMode,
    /// Whether hours display as 1-12 with an AM/PM period.
    pub twelve_hour: bool,
    /// Whether the active time is before noon.
    pub am: bool,
    /// The ring cells, clockwise from the top.
    pub cells: Vec<CalendarCell>,
    /// The hour as displayed, `1..=12` in 12-hour mode.
    pub hour_display: u32,
    /// The active minute.
    pub minute: u32,
}

/// Builds the ring for `mode` around `ctx.active_date`.
///
/// The minute face never renders ticks finer than five minutes even
/// when `clock_step` is smaller; keyboard stepping through
/// [`handle_clock_key`] still honors the configured step.
pub fn build_clock_view<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    formats: &DateFormats<A::FormatSpec>,
    mode: ClockMode,
    twelve_hour: bool,
    clock_step: u32,
) -> ClockView {
    let active = ctx.active_date;
    let hours = adapter.hours(active);
    let am = hours < 12;

    let cells = match mode {
        ClockMode::Hour => {
            let ring: Vec<u32> = if twelve_hour {
                let base = if am { 0 } else { 12 };
                // Noon and midnight render as 12 but sit at hour 0 of
                // their half-day.
                (0..12).map(|h| base + h).collect()
            } else {
                (0..24).collect()
            };
            ring.into_iter()
                .map(|hour| {
                    let candidate = adapter.with_hours(active, hour);
                    let display = hour_for_display(hour, twelve_hour).to_string();
                    let aria = adapter
                        .format(&candidate, &formats.display.time_label)
                        .unwrap_or_else(|_| display.clone());
                    let enabled = date_enabled(adapter, ctx, &candidate, Unit::Minute);
                    CalendarCell::new(hour as i32, display, aria, enabled)
                })
                .collect()
        }
        ClockMode::Minute => {
            let tick = clock_step.clamp(5, 60);
            (0..60)
                .step_by(tick as usize)
                .map(|minute| {
                    let candidate = adapter.with_minutes(active, minute);
                    let display = format!("{minute:02}");
                    let aria = adapter
                        .format(&candidate, &formats.display.time_label)
                        .unwrap_or_else(|_| display.clone());
                    let enabled = date_enabled(adapter, ctx, &candidate, Unit::Minute);
                    CalendarCell::new(minute as i32, display, aria, enabled)
                })
                .collect()
        }
    };

    ClockView {
        mode,
        twelve_hour,
        am,
        cells,
        hour_display: hour_for_display(hours, twelve_hour),
        minute: adapter.minutes(active),
    }
}

/// The hour as shown on the face: `1..=12` in 12-hour mode, unchanged
/// otherwise.
pub fn hour_for_display(hours: u32, twelve_hour: bool) -> u32 {
    if !twelve_hour {
        return hours;
    }
    match hours % 12 {
        0 => 12,
        hour => hour,
    }
}

/// The active date moved to the other half of the day, if the target time
/// is selectable. `to_am` is the requested period; returns `None` when
/// already there or when the target is disabled.
pub fn toggled_period<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    to_am: bool,
) -> Option<A::Date> {
    let is_am = adapter.hours(ctx.active_date) < 12;
    if is_am == to_am {
        return None;
    }
    let candidate = adapter.add_hours(ctx.active_date, if is_am { 12 } else { -12 });
    date_enabled(adapter, ctx, &candidate, Unit::Minute).then_some(candidate)
}

/// Keyboard handling for the clock. Up and Right step forward, Down and
/// Left step back, by an hour or by `clock_step` minutes depending on the
/// ring.
pub fn handle_clock_key<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    event: KeyEvent,
    layout: LayoutDirection,
    mode: ClockMode,
    clock_step: u32,
) -> KeyOutcome<A::Date> {
    let active = ctx.active_date;
    let step = i64::from(clock_step.clamp(1, 60));
    let horizontal: i64 = if layout.is_rtl() { -1 } else { 1 };
    let stepped = |delta: i64| match mode {
        ClockMode::Hour => adapter.add_hours(active, delta),
        ClockMode::Minute => adapter.add_minutes(active, delta * step),
    };
    match event.key {
        Key::ArrowUp => KeyOutcome::Navigate(stepped(1)),
        Key::ArrowDown => KeyOutcome::Navigate(stepped(-1)),
        Key::ArrowRight => KeyOutcome::Navigate(stepped(horizontal)),
        Key::ArrowLeft => KeyOutcome::Navigate(stepped(-horizontal)),
        Key::Enter | Key::Space => {
            if date_enabled(adapter, ctx, active, Unit::Minute) {
                KeyOutcome::Select(active.clone())
            } else {
                KeyOutcome::Blocked
            }
        }
        _ => KeyOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::civil::CivilDateAdapter;
    use crate::formats::DateFormats;

    fn setup() -> (CivilDateAdapter, DateFormats<crate::adapter::civil::CivilFormatSpec>) {
        (CivilDateAdapter::default(), DateFormats::civil_standard())
    }

    #[test]
    fn twelve_hour_ring_covers_the_active_half_day() {
        let (adapter, formats) = setup();
        let afternoon = adapter.create_datetime(2024, 5, 15, 14, 30).expect("valid");
        let ctx = ViewContext::new(&afternoon);
        let view = build_clock_view(&adapter, &ctx, &formats, ClockMode::Hour, true, 1);
        assert!(!view.am);
        assert_eq!(view.hour_display, 2);
        assert_eq!(view.cells.len(), 12);
        assert_eq!(view.cells[0].value, 12);
        assert_eq!(view.cells[0].display_value, "12");
        assert_eq!(view.cells[11].value, 23);
        assert_eq!(view.cells[11].display_value, "11");
    }

    #[test]
    fn twenty_four_hour_ring_has_24_cells() {
        let (adapter, formats) = setup();
        let morning = adapter.create_datetime(2024, 5, 15, 9, 0).expect("valid");
        let ctx = ViewContext::new(&morning);
        let view = build_clock_view(&adapter, &ctx, &formats, ClockMode::Hour, false, 1);
        assert_eq!(view.cells.len(), 24);
        assert_eq!(view.hour_display, 9);
        assert_eq!(view.cells[0].display_value, "0");
    }

    #[test]
    fn minute_ring_respects_the_step() {
        let (adapter, formats) = setup();
        let date = adapter.create_datetime(2024, 5, 15, 9, 0).expect("valid");
        let ctx = ViewContext::new(&date);
        let five = build_clock_view(&adapter, &ctx, &formats, ClockMode::Minute, true, 1);
        assert_eq!(five.cells.len(), 12);
        let quarter = build_clock_view(&adapter, &ctx, &formats, ClockMode::Minute, true, 15);
        assert_eq!(quarter.cells.len(), 4);
        assert_eq!(quarter.cells[1].value, 15);
        assert_eq!(quarter.cells[1].display_value, "15");
    }

    #[test]
    fn sub_five_minute_steps_keep_the_five_minute_face() {
        let (adapter, formats) = setup();
        let date = adapter.create_datetime(2024, 5, 15, 9, 0).expect("valid");
        let ctx = ViewContext::new(&date);
        let face = build_clock_view(&adapter, &ctx, &formats, ClockMode::Minute, true, 1);
        assert_eq!(face.cells.len(), 12);
        assert_eq!(face.cells[1].value, 5);
        // The keyboard still moves by the configured single minute.
        let up = handle_clock_key(
            &adapter,
            &ctx,
            KeyEvent::new(Key::ArrowUp),
            LayoutDirection::Ltr,
            ClockMode::Minute,
            1,
        );
        assert_eq!(
            up,
            KeyOutcome::Navigate(adapter.create_datetime(2024, 5, 15, 9, 1).expect("valid"))
        );
    }

    #[test]
    fn hour_display_maps_midnight_and_noon_to_12() {
        assert_eq!(hour_for_display(0, true), 12);
        assert_eq!(hour_for_display(12, true), 12);
        assert_eq!(hour_for_display(13, true), 1);
        assert_eq!(hour_for_display(13, false), 13);
    }

    #[test]
    fn am_pm_toggle_shifts_12_hours_and_honors_bounds() {
        let (adapter, _) = setup();
        let morning = adapter.create_datetime(2024, 5, 15, 9, 30).expect("valid");
        let ctx = ViewContext::new(&morning);
        let pm = toggled_period(&adapter, &ctx, false).expect("toggles");
        assert_eq!(adapter.hours(&pm), 21);
        assert!(toggled_period(&adapter, &ctx, true).is_none());

        // A max date before the afternoon blocks the toggle.
        let max = adapter.create_datetime(2024, 5, 15, 12, 0).expect("valid");
        let mut bounded = ViewContext::new(&morning);
        bounded.max_date = Some(&max);
        assert!(toggled_period(&adapter, &bounded, false).is_none());
    }

    #[test]
    fn arrows_step_hours_or_minutes() {
        let (adapter, _) = setup();
        let date = adapter.create_datetime(2024, 5, 15, 23, 50).expect("valid");
        let ctx = ViewContext::new(&date);
        let hour_up = handle_clock_key(
            &adapter,
            &ctx,
            KeyEvent::new(Key::ArrowUp),
            LayoutDirection::Ltr,
            ClockMode::Hour,
            5,
        );
        // Wraps into the next day.
        assert_eq!(
            hour_up,
            KeyOutcome::Navigate(adapter.create_datetime(2024, 5, 16, 0, 50).expect("valid"))
        );
        let minute_up = handle_clock_key(
            &adapter,
            &ctx,
            KeyEvent::new(Key::ArrowUp),
            LayoutDirection::Ltr,
            ClockMode::Minute,
            5,
        );
        assert_eq!(
            minute_up,
            KeyOutcome::Navigate(adapter.create_datetime(2024, 5, 15, 23, 55).expect("valid"))
        );
    }
}
