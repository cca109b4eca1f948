//! The calendar state machine.
//!
//! [`Calendar`] owns the active date, the selection and the current view,
//! and routes keyboard and pointer events to the view builders. It is
//! headless: hosts render the grids it hands out and feed events back in.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::adapter::{DateAdapter, DateInput, NameStyle, Unit};
use crate::clock_view::{self, ClockMode, ClockView};
use crate::error::ConfigError;
use crate::formats::DateFormats;
use crate::intl::PickerIntl;
use crate::key::{Key, KeyEvent, LayoutDirection};
use crate::month_view::{self, MonthView};
use crate::observer::{Observers, SubscriptionId};
use crate::view::{DateFilter, KeyOutcome, ViewContext};
use crate::year_view::{self, YearView};
use crate::years_view::{self, ScrollEdge, YearsView};

/// The sub-views a calendar can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarView {
    /// Day-of-month grid.
    #[default]
    Month,
    /// Month-of-year grid.
    Year,
    /// Scrolling year list.
    Years,
    /// Hour and minute rings.
    Clock,
}

/// What kind of value the picker produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerType {
    /// A calendar date.
    #[default]
    Date,
    /// A calendar date with a time of day.
    DateTime,
    /// A time of day only.
    Time,
}

impl PickerType {
    /// Whether values of this type carry a time of day.
    pub fn has_time(self) -> bool {
        matches!(self, Self::DateTime | Self::Time)
    }
}

/// Which way a period change should appear to slide. A rendering hint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationDir {
    /// The new period is earlier than the old one.
    Left,
    /// The new period is later than the old one.
    Right,
}

/// Text for the calendar header, recomputed on every active-date or view
/// change.
#[derive(Debug, Clone, Default)]
pub struct HeaderLabels {
    /// Text on the period button ("January 2024", "2024", "2014 – 2034").
    pub period_text: String,
    /// Accessible label for the period button.
    pub period_label: String,
    /// Accessible label for the previous-period button.
    pub prev_label: String,
    /// Accessible label for the next-period button.
    pub next_label: String,
    /// The active year.
    pub year_text: String,
    /// The active month and day, abbreviated.
    pub month_day_text: String,
    /// The active weekday, abbreviated.
    pub day_text: String,
    /// The active hour as displayed.
    pub hour_text: String,
    /// The active minute, zero-padded.
    pub minute_text: String,
}

/// Configures and validates a [`Calendar`].
pub struct CalendarBuilder<A: DateAdapter> {
    adapter: Option<Arc<A>>,
    formats: Option<Arc<DateFormats<A::FormatSpec>>>,
    intl: Arc<PickerIntl>,
    picker_type: PickerType,
    start_view: CalendarView,
    start_at: Option<A::Date>,
    min_date: Option<A::Date>,
    max_date: Option<A::Date>,
    date_filter: Option<DateFilter<A::Date>>,
    clock_step: u32,
    twelve_hour: bool,
    layout: LayoutDirection,
}

impl<A: DateAdapter> Default for CalendarBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: DateAdapter> CalendarBuilder<A> {
    /// An empty builder. An adapter and a format table are mandatory.
    pub fn new() -> Self {
        Self {
            adapter: None,
            formats: None,
            intl: Arc::new(PickerIntl::new()),
            picker_type: PickerType::default(),
            start_view: CalendarView::default(),
            start_at: None,
            min_date: None,
            max_date: None,
            date_filter: None,
            clock_step: 1,
            twelve_hour: false,
            layout: LayoutDirection::default(),
        }
    }

    /// The date backend.
    pub fn adapter(mut self, adapter: Arc<A>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// The format table.
    pub fn formats(mut self, formats: Arc<DateFormats<A::FormatSpec>>) -> Self {
        self.formats = Some(formats);
        self
    }

    /// The label catalog. Defaults to English.
    pub fn intl(mut self, intl: Arc<PickerIntl>) -> Self {
        self.intl = intl;
        self
    }

    /// What kind of value the calendar picks.
    pub fn picker_type(mut self, picker_type: PickerType) -> Self {
        self.picker_type = picker_type;
        self
    }

    /// The view shown first. Coerced to fit the picker type.
    pub fn start_view(mut self, view: CalendarView) -> Self {
        self.start_view = view;
        self
    }

    /// The initially active date. Defaults to today.
    pub fn start_at(mut self, date: Option<A::Date>) -> Self {
        self.start_at = date;
        self
    }

    /// Inclusive lower bound.
    pub fn min_date(mut self, date: Option<A::Date>) -> Self {
        self.min_date = date;
        self
    }

    /// Inclusive upper bound.
    pub fn max_date(mut self, date: Option<A::Date>) -> Self {
        self.max_date = date;
        self
    }

    /// Selectability predicate.
    pub fn date_filter(mut self, filter: Option<DateFilter<A::Date>>) -> Self {
        self.date_filter = filter;
        self
    }

    /// Minute granularity of the clock. Clamped to `1..=60`.
    pub fn clock_step(mut self, step: u32) -> Self {
        self.clock_step = step.clamp(1, 60);
        self
    }

    /// Whether hours display as 1-12 with AM/PM.
    pub fn twelve_hour(mut self, twelve_hour: bool) -> Self {
        self.twelve_hour = twelve_hour;
        self
    }

    /// Text direction, for mirrored arrow keys.
    pub fn layout(mut self, layout: LayoutDirection) -> Self {
        self.layout = layout;
        self
    }

    /// Builds the calendar, failing fast on missing configuration.
    pub fn build(self) -> Result<Calendar<A>, ConfigError> {
        let adapter = self.adapter.ok_or(ConfigError::MissingAdapter)?;
        let formats = self.formats.ok_or(ConfigError::MissingFormats)?;
        let start = self
            .start_at
            .unwrap_or_else(|| adapter.today());
        let active_date = adapter.clamp(&start, self.min_date.as_ref(), self.max_date.as_ref());
        let view = coerce_view(self.start_view, self.picker_type);
        let mut calendar = Calendar {
            adapter,
            formats,
            intl: self.intl,
            picker_type: self.picker_type,
            view,
            clock_mode: ClockMode::Hour,
            active_date,
            selected: None,
            min_date: self.min_date,
            max_date: self.max_date,
            date_filter: self.date_filter,
            clock_step: self.clock_step,
            twelve_hour: self.twelve_hour,
            layout: self.layout,
            animation_dir: None,
            header: HeaderLabels::default(),
            years: None,
            pending_focus: false,
            state_changes: Observers::new(),
            selected_change: Observers::new(),
            user_selection: Observers::new(),
        };
        if calendar.view == CalendarView::Years {
            calendar.years = Some(calendar.build_years());
        }
        calendar.refresh_header();
        tracing::debug!(view = ?calendar.view, "calendar session built");
        Ok(calendar)
    }
}

/// `Time` pickers always show the clock; `Date` pickers never do.
fn coerce_view(requested: CalendarView, picker_type: PickerType) -> CalendarView {
    match picker_type {
        PickerType::Time => CalendarView::Clock,
        PickerType::Date if requested == CalendarView::Clock => CalendarView::Month,
        _ => requested,
    }
}

/// The calendar state machine. Construct through [`CalendarBuilder`].
pub struct Calendar<A: DateAdapter> {
    adapter: Arc<A>,
    formats: Arc<DateFormats<A::FormatSpec>>,
    intl: Arc<PickerIntl>,
    picker_type: PickerType,
    view: CalendarView,
    clock_mode: ClockMode,
    active_date: A::Date,
    selected: Option<A::Date>,
    min_date: Option<A::Date>,
    max_date: Option<A::Date>,
    date_filter: Option<DateFilter<A::Date>>,
    clock_step: u32,
    twelve_hour: bool,
    layout: LayoutDirection,
    animation_dir: Option<AnimationDir>,
    header: HeaderLabels,
    years: Option<YearsView>,
    pending_focus: bool,
    state_changes: Observers<()>,
    selected_change: Observers<A::Date>,
    user_selection: Observers<()>,
}

impl<A: DateAdapter> Calendar<A> {
    /// The current view.
    pub fn view(&self) -> CalendarView {
        self.view
    }

    /// Which clock ring is shown while in the clock view.
    pub fn clock_mode(&self) -> ClockMode {
        self.clock_mode
    }

    /// The date holding focus. Never outside `[min, max]`.
    pub fn active_date(&self) -> &A::Date {
        &self.active_date
    }

    /// The selected value, if any.
    pub fn selected(&self) -> Option<&A::Date> {
        self.selected.as_ref()
    }

    /// Whether the active time is before noon.
    pub fn is_am(&self) -> bool {
        self.adapter.hours(&self.active_date) < 12
    }

    /// The slide hint from the last active-date change.
    pub fn animation_dir(&self) -> Option<AnimationDir> {
        self.animation_dir
    }

    /// The current header text.
    pub fn header(&self) -> &HeaderLabels {
        &self.header
    }

    /// Registers a callback run after every state change.
    pub fn on_state_change(
        &mut self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.state_changes.subscribe(move |()| callback())
    }

    /// Registers a callback for submitted values.
    pub fn on_selected_change(
        &mut self,
        callback: impl Fn(&A::Date) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.selected_change.subscribe(callback)
    }

    /// Registers a callback for end-of-interaction (submit or cancel).
    pub fn on_user_selection(
        &mut self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.user_selection.subscribe(move |()| callback())
    }

    fn context(&self) -> ViewContext<'_, A> {
        ViewContext {
            active_date: &self.active_date,
            selected: self.selected.as_ref(),
            min_date: self.min_date.as_ref(),
            max_date: self.max_date.as_ref(),
            date_filter: self.date_filter.as_ref(),
        }
    }

    /// Builds the current month grid.
    pub fn month_view(&self) -> MonthView {
        month_view::build_month_view(&*self.adapter, &self.context(), &self.formats)
    }

    /// Builds the current year grid.
    pub fn year_view(&self) -> YearView {
        year_view::build_year_view(&*self.adapter, &self.context(), &self.formats)
    }

    /// The year list, when the years view is active.
    pub fn years_view(&self) -> Option<&YearsView> {
        self.years.as_ref()
    }

    /// Builds the current clock ring.
    pub fn clock_view(&self) -> ClockView {
        clock_view::build_clock_view(
            &*self.adapter,
            &self.context(),
            &self.formats,
            self.clock_mode,
            self.twelve_hour,
            self.clock_step,
        )
    }

    /// Moves focus to `value`, clamped to the current bounds.
    ///
    /// Derives the slide hint by comparing the old and new period: months
    /// for the month and year views, years for the year list.
    pub fn set_active_date(&mut self, value: A::Date) {
        let old = self.active_date.clone();
        self.active_date =
            self.adapter
                .clamp(&value, self.min_date.as_ref(), self.max_date.as_ref());
        let unit = match self.view {
            CalendarView::Years => Unit::Year,
            _ => Unit::Month,
        };
        match self.adapter.compare(&old, &self.active_date, unit) {
            Ordering::Greater => self.animation_dir = Some(AnimationDir::Left),
            Ordering::Less => self.animation_dir = Some(AnimationDir::Right),
            Ordering::Equal => {}
        }
        self.refresh_header();
        self.state_changes.notify(&());
    }

    /// Switches view, coerced to fit the picker type. Requests focus on the
    /// new view's active cell.
    pub fn change_view(&mut self, view: CalendarView) {
        let view = coerce_view(view, self.picker_type);
        if view == CalendarView::Years {
            if self.years.is_none() {
                self.years = Some(self.build_years());
            }
        } else {
            self.years = None;
        }
        self.view = view;
        self.pending_focus = true;
        self.refresh_header();
        self.state_changes.notify(&());
    }

    /// A day was activated in the month view.
    pub fn date_selected(&mut self, date: A::Date) {
        self.selected = Some(date.clone());
        self.set_active_date(date);
        if self.picker_type.has_time() {
            self.clock_mode = ClockMode::Hour;
            self.change_view(CalendarView::Clock);
        }
    }

    /// A month was activated in the year view.
    pub fn month_selected(&mut self, month: A::Date) {
        self.selected = Some(month.clone());
        self.set_active_date(month);
        self.change_view(CalendarView::Month);
    }

    /// A year was activated in the year list.
    pub fn year_selected(&mut self, year: A::Date) {
        self.selected = Some(year.clone());
        self.set_active_date(year);
        self.change_view(CalendarView::Year);
    }

    /// The time was adjusted on the clock.
    pub fn time_changed(&mut self, date: A::Date) {
        self.selected = Some(date.clone());
        self.set_active_date(date);
    }

    /// The period button was clicked: month view opens the year view, the
    /// year view opens the year list. No-op from the year list and the
    /// clock.
    pub fn period_label_clicked(&mut self) {
        match self.view {
            CalendarView::Month => self.change_view(CalendarView::Year),
            CalendarView::Year => self.change_view(CalendarView::Years),
            CalendarView::Years | CalendarView::Clock => {}
        }
    }

    /// Shows the hour ring.
    pub fn show_hour_view(&mut self) {
        if self.picker_type.has_time() {
            self.clock_mode = ClockMode::Hour;
            self.change_view(CalendarView::Clock);
        }
    }

    /// Shows the minute ring.
    pub fn show_minute_view(&mut self) {
        if self.picker_type.has_time() {
            self.clock_mode = ClockMode::Minute;
            self.change_view(CalendarView::Clock);
        }
    }

    /// Switches back to the month view from the clock.
    pub fn show_month_view(&mut self) {
        if self.picker_type != PickerType::Time {
            self.change_view(CalendarView::Month);
        }
    }

    /// Moves the active time to the requested half of the day, when the
    /// target time is selectable.
    pub fn toggle_am_pm(&mut self, to_am: bool) {
        if let Some(date) = clock_view::toggled_period(&*self.adapter, &self.context(), to_am) {
            self.selected = Some(date.clone());
            self.set_active_date(date);
        }
    }

    /// Steps the current view one period back.
    pub fn previous_clicked(&mut self) {
        self.nav(-1);
    }

    /// Steps the current view one period forward.
    pub fn next_clicked(&mut self) {
        self.nav(1);
    }

    fn nav(&mut self, diff: i64) {
        let next = match self.view {
            CalendarView::Month => self.adapter.add_months(&self.active_date, diff as i32),
            CalendarView::Year => self.adapter.add_years(&self.active_date, diff as i32),
            CalendarView::Clock => match self.clock_mode {
                ClockMode::Hour => self.adapter.add_hours(&self.active_date, diff),
                ClockMode::Minute => self.adapter.add_minutes(&self.active_date, diff),
            },
            // The year list paginates by scrolling instead.
            CalendarView::Years => return,
        };
        self.set_active_date(next);
    }

    /// Whether stepping back would leave the period containing `min_date`.
    pub fn previous_enabled(&self) -> bool {
        match &self.min_date {
            Some(min) => !self.same_view(&self.active_date, min),
            None => true,
        }
    }

    /// Whether stepping forward would leave the period containing
    /// `max_date`.
    pub fn next_enabled(&self) -> bool {
        match &self.max_date {
            Some(max) => !self.same_view(&self.active_date, max),
            None => true,
        }
    }

    fn same_view(&self, a: &A::Date, b: &A::Date) -> bool {
        let unit = match self.view {
            CalendarView::Month => Unit::Month,
            CalendarView::Year | CalendarView::Years => Unit::Year,
            CalendarView::Clock => Unit::Minute,
        };
        self.adapter.same(a, b, unit)
    }

    /// Reports that the year list scrolled to an edge; paginates when due.
    pub fn years_scrolled(&mut self, edge: ScrollEdge, now: Instant) -> bool {
        let Some(mut years) = self.years.take() else {
            return false;
        };
        let grew = years.scrolled_to_edge(&*self.adapter, &self.context(), edge, now);
        self.years = Some(years);
        if grew {
            self.refresh_header();
            self.state_changes.notify(&());
        }
        grew
    }

    /// Routes a key event to the current view.
    pub fn handle_key(&mut self, event: KeyEvent) {
        if event.key == Key::Escape {
            return;
        }
        let adapter = &*self.adapter;
        let ctx = self.context();
        let outcome = match self.view {
            CalendarView::Month => {
                month_view::handle_month_key(adapter, &ctx, event, self.layout)
            }
            CalendarView::Year => year_view::handle_year_key(adapter, &ctx, event, self.layout),
            CalendarView::Years => years_view::handle_years_key(adapter, &ctx, event),
            CalendarView::Clock => clock_view::handle_clock_key(
                adapter,
                &ctx,
                event,
                self.layout,
                self.clock_mode,
                self.clock_step,
            ),
        };
        match outcome {
            KeyOutcome::Navigate(date) => self.set_active_date(date),
            KeyOutcome::Select(date) => match self.view {
                CalendarView::Month => self.date_selected(date),
                CalendarView::Year => self.month_selected(date),
                CalendarView::Years => self.year_selected(date),
                CalendarView::Clock => self.time_changed(date),
            },
            KeyOutcome::Blocked => {
                tracing::debug!(key = ?event.key, "activation blocked on disabled date");
            }
            KeyOutcome::Ignored => {}
        }
    }

    /// Submits the active date and ends the interaction.
    pub fn submit(&mut self) {
        let date = self.active_date.clone();
        self.selected_change.notify(&date);
        self.user_selection.notify(&());
    }

    /// Ends the interaction without submitting.
    pub fn cancel(&mut self) {
        self.user_selection.notify(&());
    }

    /// Assigns the selection from host input. Invalid input clears it.
    pub fn set_selected(&mut self, value: &DateInput<A::Date>) {
        self.selected = self.adapter.deserialize(value);
        self.reinit_views();
    }

    /// Assigns the lower bound and re-clamps the active date. The
    /// selection is left alone.
    pub fn set_min_date(&mut self, value: &DateInput<A::Date>) {
        self.min_date = self.adapter.deserialize(value);
        self.reinit_views();
        self.set_active_date(self.active_date.clone());
    }

    /// Assigns the upper bound and re-clamps the active date. The
    /// selection is left alone.
    pub fn set_max_date(&mut self, value: &DateInput<A::Date>) {
        self.max_date = self.adapter.deserialize(value);
        self.reinit_views();
        self.set_active_date(self.active_date.clone());
    }

    /// Replaces the selectability predicate.
    pub fn set_date_filter(&mut self, filter: Option<DateFilter<A::Date>>) {
        self.date_filter = filter;
        self.reinit_views();
        self.state_changes.notify(&());
    }

    /// Whether a focus request is pending, clearing it. Hosts drain this
    /// after applying a state change.
    pub fn take_pending_focus(&mut self) -> bool {
        std::mem::take(&mut self.pending_focus)
    }

    /// Drops deferred work. Called when the surrounding popup closes.
    pub fn clear_pending(&mut self) {
        self.pending_focus = false;
    }

    fn build_years(&self) -> YearsView {
        YearsView::build(&*self.adapter, &self.context())
    }

    /// Enablement inputs changed; stateful views rebuild from scratch.
    fn reinit_views(&mut self) {
        if self.years.is_some() {
            self.years = Some(self.build_years());
        }
    }

    fn refresh_header(&mut self) {
        let adapter = &*self.adapter;
        let active = &self.active_date;
        let strings = self.intl.read();

        let month_year = adapter
            .format(active, &self.formats.display.month_year_label)
            .unwrap_or_default();
        let (period_text, period_label, prev_label, next_label) = match self.view {
            CalendarView::Month => (
                month_year.clone(),
                strings.switch_to_multi_year_view_label.clone(),
                strings.prev_month_label.clone(),
                strings.next_month_label.clone(),
            ),
            CalendarView::Year => (
                adapter.year_name(active),
                strings.switch_to_month_view_label.clone(),
                strings.prev_year_label.clone(),
                strings.next_year_label.clone(),
            ),
            CalendarView::Years => {
                let text = match &self.years {
                    Some(years) => strings.format_year_range(
                        &years.first_year().to_string(),
                        &years.last_year().to_string(),
                    ),
                    None => adapter.year_name(active),
                };
                (
                    text,
                    strings.switch_to_month_view_label.clone(),
                    strings.prev_multi_year_label.clone(),
                    strings.next_multi_year_label.clone(),
                )
            }
            CalendarView::Clock => (
                month_year.clone(),
                strings.switch_to_clock_view_label.clone(),
                String::new(),
                String::new(),
            ),
        };

        let weekday = adapter.day_of_week(active) as usize;
        self.header = HeaderLabels {
            period_text,
            period_label,
            prev_label,
            next_label,
            year_text: adapter.year_name(active),
            month_day_text: adapter
                .format(active, &self.formats.display.month_day_label)
                .unwrap_or_default(),
            day_text: adapter
                .day_of_week_names(NameStyle::Short)
                .get(weekday)
                .cloned()
                .unwrap_or_default(),
            hour_text: clock_view::hour_for_display(adapter.hours(active), self.twelve_hour)
                .to_string(),
            minute_text: format!("{:02}", adapter.minutes(active)),
        };
    }
}
