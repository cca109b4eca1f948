//! The scrolling year list.
//!
//! Unlike the month and year grids this view is stateful: the list of years
//! grows incrementally as the user scrolls, and already-built cells are
//! never rebuilt. Scroll events are sampled so a fast fling extends the
//! list once per sampling period, not once per event.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::adapter::{DateAdapter, Unit};
use crate::cell::CalendarCell;
use crate::key::{Key, KeyEvent};
use crate::view::{KeyOutcome, ViewContext, date_enabled};

/// Years added per pagination step, and on each side of the initial page.
const YEARS_PER_PAGE: i32 = 10;

/// Minimum interval between two pagination steps.
const SCROLL_SAMPLE_PERIOD: Duration = Duration::from_millis(300);

/// Which end of the list the visible window has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEdge {
    /// The earliest years.
    Start,
    /// The latest years.
    End,
}

/// Rate limiter for scroll-driven pagination.
///
/// Time is passed in explicitly so hosts without a scroll clock (and tests)
/// can drive it.
#[derive(Debug)]
pub struct ScrollSampler {
    period: Duration,
    last: Option<Instant>,
}

impl ScrollSampler {
    /// Creates a sampler with the given minimum interval.
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// Returns `true` if enough time has passed since the last admitted
    /// event, and records `now` if so.
    pub fn admit(&mut self, now: Instant) -> bool {
        let due = match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.period,
            None => true,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Forgets the last admitted event.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// The year list. Cell values are calendar years.
#[derive(Debug)]
pub struct YearsView {
    cells: VecDeque<CalendarCell>,
    sampler: ScrollSampler,
}

impl YearsView {
    /// Builds the initial page: the selected (or active) year plus
    /// [`YEARS_PER_PAGE`] years on each side.
    pub fn build<A: DateAdapter>(adapter: &A, ctx: &ViewContext<'_, A>) -> Self {
        let center = ctx.selected.unwrap_or(ctx.active_date);
        let center_year = adapter.year(center);
        let mut view = Self {
            cells: VecDeque::with_capacity((2 * YEARS_PER_PAGE + 1) as usize),
            sampler: ScrollSampler::new(SCROLL_SAMPLE_PERIOD),
        };
        view.cells.push_back(year_cell(adapter, ctx, center_year));
        view.extend(adapter, ctx, ScrollEdge::Start);
        view.extend(adapter, ctx, ScrollEdge::End);
        view
    }

    /// The built cells, earliest year first.
    pub fn cells(&self) -> &VecDeque<CalendarCell> {
        &self.cells
    }

    /// The earliest year in the list.
    pub fn first_year(&self) -> i32 {
        self.cells.front().map(|cell| cell.value).unwrap_or_default()
    }

    /// The latest year in the list.
    pub fn last_year(&self) -> i32 {
        self.cells.back().map(|cell| cell.value).unwrap_or_default()
    }

    /// Reports that the visible window reached an edge of the list.
    ///
    /// Pagination runs at most once per sampling period; returns `true`
    /// when the list actually grew.
    pub fn scrolled_to_edge<A: DateAdapter>(
        &mut self,
        adapter: &A,
        ctx: &ViewContext<'_, A>,
        edge: ScrollEdge,
        now: Instant,
    ) -> bool {
        if !self.sampler.admit(now) {
            return false;
        }
        let grew = self.extend(adapter, ctx, edge);
        if grew {
            tracing::trace!(?edge, years = self.cells.len(), "years list extended");
        }
        grew
    }

    /// Appends or prepends one page of years.
    ///
    /// Stops at a disabled boundary: once the outermost year cannot be
    /// selected, scrolling further in that direction adds nothing.
    fn extend<A: DateAdapter>(
        &mut self,
        adapter: &A,
        ctx: &ViewContext<'_, A>,
        edge: ScrollEdge,
    ) -> bool {
        let boundary_enabled = match edge {
            ScrollEdge::Start => self.cells.front().map(|cell| cell.enabled),
            ScrollEdge::End => self.cells.back().map(|cell| cell.enabled),
        };
        if boundary_enabled != Some(true) {
            return false;
        }
        for _ in 0..YEARS_PER_PAGE {
            match edge {
                ScrollEdge::Start => {
                    let year = self.first_year() - 1;
                    self.cells.push_front(year_cell(adapter, ctx, year));
                }
                ScrollEdge::End => {
                    let year = self.last_year() + 1;
                    self.cells.push_back(year_cell(adapter, ctx, year));
                }
            }
        }
        true
    }
}

/// A cell for `year`, judged against the active date's month, day and time.
fn year_cell<A: DateAdapter>(adapter: &A, ctx: &ViewContext<'_, A>, year: i32) -> CalendarCell {
    let date = adapter.add_years(ctx.active_date, year - adapter.year(ctx.active_date));
    let name = adapter.year_name(&date);
    let enabled = date_enabled(adapter, ctx, &date, Unit::Minute);
    CalendarCell::new(year, name.clone(), name, enabled)
}

/// Keyboard handling for the year list.
pub fn handle_years_key<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    event: KeyEvent,
) -> KeyOutcome<A::Date> {
    let active = ctx.active_date;
    match event.key {
        Key::ArrowUp => KeyOutcome::Navigate(adapter.add_years(active, -1)),
        Key::ArrowDown => KeyOutcome::Navigate(adapter.add_years(active, 1)),
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
    use std::sync::Arc;

    use super::*;
    use crate::adapter::civil::CivilDateAdapter;
    use crate::view::DateFilter;

    fn adapter() -> CivilDateAdapter {
        CivilDateAdapter::default()
    }

    #[test]
    fn initial_page_is_centered_on_the_active_year() {
        let adapter = adapter();
        let active = adapter.create_date(2024, 5, 15).expect("valid");
        let view = YearsView::build(&adapter, &ViewContext::new(&active));
        assert_eq!(view.cells().len(), 21);
        assert_eq!(view.first_year(), 2014);
        assert_eq!(view.last_year(), 2034);
    }

    #[test]
    fn initial_page_centers_on_the_selection_when_present() {
        let adapter = adapter();
        let active = adapter.create_date(2024, 5, 15).expect("valid");
        let selected = adapter.create_date(2030, 0, 1).expect("valid");
        let mut ctx = ViewContext::new(&active);
        ctx.selected = Some(&selected);
        let view = YearsView::build(&adapter, &ctx);
        assert_eq!(view.first_year(), 2020);
        assert_eq!(view.last_year(), 2040);
    }

    #[test]
    fn pagination_only_extends_the_reached_edge() {
        let adapter = adapter();
        let active = adapter.create_date(2024, 5, 15).expect("valid");
        let ctx = ViewContext::new(&active);
        let mut view = YearsView::build(&adapter, &ctx);
        let t0 = Instant::now();

        assert!(view.scrolled_to_edge(&adapter, &ctx, ScrollEdge::End, t0));
        assert_eq!(view.last_year(), 2044);
        assert_eq!(view.first_year(), 2014);

        let later = t0 + Duration::from_millis(400);
        assert!(view.scrolled_to_edge(&adapter, &ctx, ScrollEdge::Start, later));
        assert_eq!(view.first_year(), 2004);
        assert_eq!(view.cells().len(), 41);
    }

    #[test]
    fn sampler_throttles_rapid_scrolls() {
        let adapter = adapter();
        let active = adapter.create_date(2024, 0, 1).expect("valid");
        let ctx = ViewContext::new(&active);
        let mut view = YearsView::build(&adapter, &ctx);
        let t0 = Instant::now();

        assert!(view.scrolled_to_edge(&adapter, &ctx, ScrollEdge::End, t0));
        assert!(!view.scrolled_to_edge(&adapter, &ctx, ScrollEdge::End, t0 + Duration::from_millis(100)));
        assert!(view.scrolled_to_edge(&adapter, &ctx, ScrollEdge::End, t0 + Duration::from_millis(350)));
        assert_eq!(view.last_year(), 2031);
    }

    #[test]
    fn population_stops_past_a_disabled_boundary() {
        let adapter = adapter();
        let active = adapter.create_date(2024, 5, 15).expect("valid");
        let max = adapter.create_date(2034, 11, 31).expect("valid");
        let mut ctx = ViewContext::new(&active);
        ctx.max_date = Some(&max);
        let mut view = YearsView::build(&adapter, &ctx);
        // 2034 is the last enabled year and the initial page ends on it.
        assert_eq!(view.last_year(), 2034);

        // One page past the boundary is still built, fully disabled.
        let t0 = Instant::now();
        assert!(view.scrolled_to_edge(&adapter, &ctx, ScrollEdge::End, t0));
        assert_eq!(view.last_year(), 2044);
        assert!(!view.cells().back().map(|cell| cell.enabled).unwrap_or(true));

        // After that, scrolling down adds nothing.
        let later = t0 + Duration::from_millis(400);
        assert!(!view.scrolled_to_edge(&adapter, &ctx, ScrollEdge::End, later));
        assert_eq!(view.cells().len(), 31);
    }

    #[test]
    fn filter_disables_year_cells() {
        let adapter = adapter();
        let active = adapter.create_date(2024, 5, 15).expect("valid");
        let filter: DateFilter<_> = Arc::new(|date: &_, _| {
            CivilDateAdapter::default().year(date) % 2 == 0
        });
        let mut ctx = ViewContext::new(&active);
        ctx.date_filter = Some(&filter);
        let view = YearsView::build(&adapter, &ctx);
        let even = view.cells().iter().find(|cell| cell.value == 2024);
        let odd = view.cells().iter().find(|cell| cell.value == 2025);
        assert!(even.map(|cell| cell.enabled).unwrap_or(false));
        assert!(!odd.map(|cell| cell.enabled).unwrap_or(true));
    }

    #[test]
    fn keys_step_years_and_select_enabled_ones() {
        let adapter = adapter();
        let active = adapter.create_date(2024, 1, 29).expect("valid");
        let ctx = ViewContext::new(&active);
        let up = handle_years_key(&adapter, &ctx, KeyEvent::new(Key::ArrowUp));
        // Leap day clamps into the shorter February.
        assert_eq!(
            up,
            KeyOutcome::Navigate(adapter.create_date(2023, 1, 28).expect("valid"))
        );
        let select = handle_years_key(&adapter, &ctx, KeyEvent::new(Key::Enter));
        assert_eq!(select, KeyOutcome::Select(active));
    }
}
