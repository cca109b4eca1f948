//! The datepicker controller.
//!
//! [`Datepicker`] owns the open/closed popup state, the committed value and
//! the registered input, and spins up a [`Calendar`] session while open.
//! It is headless like everything else here: the host renders the popup
//! and forwards events.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::adapter::{DateAdapter, DateInput, Unit};
use crate::calendar::{Calendar, CalendarBuilder, CalendarView, PickerType};
use crate::error::ConfigError;
use crate::formats::DateFormats;
use crate::intl::PickerIntl;
use crate::key::{Key, KeyEvent, LayoutDirection};
use crate::observer::{Observers, SubscriptionId};
use crate::view::DateFilter;

/// Mints unique picker ids within one process scope.
///
/// Owned by whoever creates pickers instead of living in a global, so two
/// independent hosts never fight over a shared counter.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// A generator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id, e.g. `chronopick-0`.
    pub fn mint(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("chronopick-{n}")
    }
}

/// The headless stand-in for the bound input control.
///
/// Carries the value and the selection constraints the input contributes
/// to the picker.
pub struct PickerInput<A: DateAdapter> {
    /// The input's current value.
    pub value: Option<A::Date>,
    /// Inclusive lower bound.
    pub min: Option<A::Date>,
    /// Inclusive upper bound.
    pub max: Option<A::Date>,
    /// Selectability predicate.
    pub date_filter: Option<DateFilter<A::Date>>,
    /// Whether the input is disabled.
    pub disabled: bool,
}

impl<A: DateAdapter> Default for PickerInput<A> {
    fn default() -> Self {
        Self {
            value: None,
            min: None,
            max: None,
            date_filter: None,
            disabled: false,
        }
    }
}

/// The datepicker controller.
pub struct Datepicker<A: DateAdapter> {
    adapter: Arc<A>,
    formats: Arc<DateFormats<A::FormatSpec>>,
    intl: Arc<PickerIntl>,
    id: String,
    picker_type: PickerType,
    start_view: CalendarView,
    start_at: Option<A::Date>,
    clock_step: u32,
    twelve_hour: bool,
    touch_ui: bool,
    layout: LayoutDirection,
    disabled_override: Option<bool>,
    opened: bool,
    selected: Option<A::Date>,
    input: Option<PickerInput<A>>,
    calendar: Option<Calendar<A>>,
    opened_events: Observers<()>,
    closed_events: Observers<()>,
    selected_changed: Observers<A::Date>,
    disabled_changes: Observers<bool>,
}

impl<A: DateAdapter> Datepicker<A> {
    /// Creates a closed picker with no input registered.
    pub fn new(
        adapter: Arc<A>,
        formats: Arc<DateFormats<A::FormatSpec>>,
        ids: &IdGenerator,
    ) -> Self {
        Self {
            adapter,
            formats,
            intl: Arc::new(PickerIntl::new()),
            id: ids.mint(),
            picker_type: PickerType::default(),
            start_view: CalendarView::default(),
            start_at: None,
            clock_step: 1,
            twelve_hour: false,
            touch_ui: false,
            layout: LayoutDirection::default(),
            disabled_override: None,
            opened: false,
            selected: None,
            input: None,
            calendar: None,
            opened_events: Observers::new(),
            closed_events: Observers::new(),
            selected_changed: Observers::new(),
            disabled_changes: Observers::new(),
        }
    }

    /// The label catalog shared with the calendar session.
    pub fn with_intl(mut self, intl: Arc<PickerIntl>) -> Self {
        self.intl = intl;
        self
    }

    /// What kind of value the picker produces.
    pub fn with_picker_type(mut self, picker_type: PickerType) -> Self {
        self.picker_type = picker_type;
        self
    }

    /// The calendar view shown first.
    pub fn with_start_view(mut self, view: CalendarView) -> Self {
        self.start_view = view;
        self
    }

    /// The date to open the calendar on. Falls back to the input's value.
    pub fn with_start_at(mut self, date: Option<A::Date>) -> Self {
        self.start_at = date;
        self
    }

    /// Minute granularity, clamped to `1..=60`.
    pub fn with_clock_step(mut self, step: u32) -> Self {
        self.clock_step = step.clamp(1, 60);
        self
    }

    /// Whether hours display as 1-12 with AM/PM.
    pub fn with_twelve_hour(mut self, twelve_hour: bool) -> Self {
        self.twelve_hour = twelve_hour;
        self
    }

    /// Whether the popup opens as a full-screen dialog.
    pub fn with_touch_ui(mut self, touch_ui: bool) -> Self {
        self.touch_ui = touch_ui;
        self
    }

    /// Text direction for the calendar session.
    pub fn with_layout(mut self, layout: LayoutDirection) -> Self {
        self.layout = layout;
        self
    }

    /// The picker's unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the popup is open.
    pub fn opened(&self) -> bool {
        self.opened
    }

    /// Whether the popup opens as a full-screen dialog.
    pub fn touch_ui(&self) -> bool {
        self.touch_ui
    }

    /// The committed value.
    pub fn selected(&self) -> Option<&A::Date> {
        self.selected.as_ref()
    }

    /// The calendar session, while open.
    pub fn calendar(&self) -> Option<&Calendar<A>> {
        self.calendar.as_ref()
    }

    /// Mutable access to the calendar session, while open.
    pub fn calendar_mut(&mut self) -> Option<&mut Calendar<A>> {
        self.calendar.as_mut()
    }

    /// Whether the picker is disabled. Unset overrides inherit the
    /// registered input's disabled state.
    pub fn disabled(&self) -> bool {
        match self.disabled_override {
            Some(disabled) => disabled,
            None => self.input.as_ref().map(|input| input.disabled).unwrap_or(false),
        }
    }

    /// Overrides the disabled state.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled_override != Some(disabled) {
            self.disabled_override = Some(disabled);
            self.disabled_changes.notify(&disabled);
        }
    }

    /// Registers the bound input. A picker accepts exactly one.
    pub fn register_input(&mut self, input: PickerInput<A>) -> Result<(), ConfigError> {
        if self.input.is_some() {
            return Err(ConfigError::MultipleInputs);
        }
        self.selected = input.value.clone();
        self.input = Some(input);
        Ok(())
    }

    /// Applies a new value typed into the bound input.
    ///
    /// A date-only value (one parsing to midnight) inherits the hours
    /// and minutes of the retained selection on time-carrying pickers.
    pub fn input_value_changed(&mut self, value: &DateInput<A::Date>) {
        let parsed = self
            .adapter
            .deserialize(value)
            .map(|date| self.merge_retained_time(&date));
        if let Some(input) = &mut self.input {
            input.value = parsed.clone();
        }
        self.selected = parsed.clone();
        if let Some(calendar) = &mut self.calendar {
            match parsed {
                Some(date) => calendar.set_selected(&DateInput::Date(date)),
                None => calendar.set_selected(&DateInput::Empty),
            }
        }
    }

    /// Registers a callback run when the popup opens.
    pub fn on_opened(&mut self, callback: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        self.opened_events.subscribe(move |()| callback())
    }

    /// Registers a callback run when the popup closes.
    pub fn on_closed(&mut self, callback: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        self.closed_events.subscribe(move |()| callback())
    }

    /// Registers a callback for committed value changes.
    pub fn on_selected_changed(
        &mut self,
        callback: impl Fn(&A::Date) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.selected_changed.subscribe(callback)
    }

    /// Registers a callback for disabled-state changes.
    pub fn on_disabled_change(
        &mut self,
        callback: impl Fn(&bool) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.disabled_changes.subscribe(callback)
    }

    /// Opens the popup and builds the calendar session.
    ///
    /// Already open or disabled pickers return without doing anything; a
    /// picker with no registered input cannot open at all.
    pub fn open(&mut self) -> Result<(), ConfigError> {
        if self.opened || self.disabled() {
            return Ok(());
        }
        let input = self.input.as_ref().ok_or(ConfigError::OpenWithoutInput)?;

        let start_at = self.start_at.clone().or_else(|| input.value.clone());
        let mut calendar = CalendarBuilder::new()
            .adapter(self.adapter.clone())
            .formats(self.formats.clone())
            .intl(self.intl.clone())
            .picker_type(self.picker_type)
            .start_view(self.start_view)
            .start_at(start_at)
            .min_date(input.min.clone())
            .max_date(input.max.clone())
            .date_filter(input.date_filter.clone())
            .clock_step(self.clock_step)
            .twelve_hour(self.twelve_hour)
            .layout(self.layout)
            .build()?;
        if let Some(selected) = &self.selected {
            calendar.set_selected(&DateInput::Date(selected.clone()));
        }
        self.calendar = Some(calendar);
        self.opened = true;
        tracing::debug!(id = %self.id, touch_ui = self.touch_ui, "datepicker opened");
        self.opened_events.notify(&());
        Ok(())
    }

    /// Closes the popup, dropping the calendar session and any deferred
    /// work it still held. Idempotent.
    pub fn close(&mut self) {
        if !self.opened {
            return;
        }
        if let Some(calendar) = &mut self.calendar {
            calendar.clear_pending();
        }
        self.calendar = None;
        self.opened = false;
        tracing::debug!(id = %self.id, "datepicker closed");
        self.closed_events.notify(&());
    }

    /// Routes a key event: Escape closes the popup, everything else goes
    /// to the calendar session.
    pub fn handle_key(&mut self, event: KeyEvent) {
        if event.key == Key::Escape {
            self.close();
            return;
        }
        if let Some(calendar) = &mut self.calendar {
            calendar.handle_key(event);
        }
    }

    /// Commits the calendar session's active date and closes.
    pub fn submit_clicked(&mut self) {
        let Some(calendar) = &mut self.calendar else {
            return;
        };
        let date = calendar.active_date().clone();
        calendar.submit();
        self.select(date);
        self.close();
    }

    /// Discards the session and closes.
    pub fn cancel_clicked(&mut self) {
        if let Some(calendar) = &mut self.calendar {
            calendar.cancel();
        }
        self.close();
    }

    /// Commits `date` as the selected value.
    ///
    /// Minutes round up to the clock step, then the value is clamped to
    /// the input's bounds and its seconds zeroed; clamping last keeps
    /// the committed value inside `[min, max]` even when rounding would
    /// overrun a bound. Observers fire only when the committed value
    /// differs from the previous one at day granularity for date pickers
    /// and minute granularity otherwise.
    pub fn select(&mut self, date: A::Date) {
        let adapter = self.adapter.clone();
        let (min, max) = match &self.input {
            Some(input) => (input.min.as_ref(), input.max.as_ref()),
            None => (None, None),
        };
        let mut value = date;
        let remainder = adapter.minutes(&value) % self.clock_step;
        if remainder != 0 {
            value = adapter.add_minutes(&value, i64::from(self.clock_step - remainder));
        }
        value = adapter.clamp(&value, min, max);
        value = adapter.with_seconds(&value, 0);

        let unit = if self.picker_type.has_time() {
            Unit::Minute
        } else {
            Unit::Day
        };
        let changed = match &self.selected {
            Some(old) => !adapter.same(old, &value, unit),
            None => true,
        };
        self.selected = Some(value.clone());
        if let Some(input) = &mut self.input {
            input.value = Some(value.clone());
        }
        if changed {
            self.selected_changed.notify(&value);
        }
    }

    /// A parsed input value at midnight keeps the hours and minutes
    /// already retained, so typing a date into the input does not
    /// discard time precision. Only the input ingress path merges;
    /// a time dialed on the clock commits as-is, midnight included.
    fn merge_retained_time(&self, date: &A::Date) -> A::Date {
        let adapter = &*self.adapter;
        match &self.selected {
            Some(prev)
                if self.picker_type.has_time()
                    && adapter.hours(date) == 0
                    && adapter.minutes(date) == 0 =>
            {
                let with_hours = adapter.with_hours(date, adapter.hours(prev));
                adapter.with_minutes(&with_hours, adapter.minutes(prev))
            }
            _ => date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::adapter::civil::{CivilDateAdapter, CivilDateTime, CivilFormatSpec};

    fn picker() -> Datepicker<CivilDateAdapter> {
        Datepicker::new(
            Arc::new(CivilDateAdapter::default()),
            Arc::new(DateFormats::civil_standard()),
            &IdGenerator::new(),
        )
    }

    fn date(year: i32, month0: u32, day: u32) -> CivilDateTime {
        CivilDateAdapter::default()
            .create_date(year, month0, day)
            .expect("valid date")
    }

    fn datetime(year: i32, month0: u32, day: u32, h: u32, m: u32) -> CivilDateTime {
        CivilDateAdapter::default()
            .create_datetime(year, month0, day, h, m)
            .expect("valid date")
    }

    #[test]
    fn ids_are_minted_per_generator() {
        let ids = IdGenerator::new();
        let adapter = Arc::new(CivilDateAdapter::default());
        let formats: Arc<DateFormats<CivilFormatSpec>> =
            Arc::new(DateFormats::civil_standard());
        let first = Datepicker::new(adapter.clone(), formats.clone(), &ids);
        let second = Datepicker::new(adapter, formats, &ids);
        assert_eq!(first.id(), "chronopick-0");
        assert_eq!(second.id(), "chronopick-1");
    }

    #[test]
    fn open_requires_an_input() {
        let mut picker = picker();
        assert!(matches!(picker.open(), Err(ConfigError::OpenWithoutInput)));
        picker.register_input(PickerInput::default()).expect("registers");
        picker.open().expect("opens");
        assert!(picker.opened());
        assert!(picker.calendar().is_some());
    }

    #[test]
    fn open_is_a_noop_when_open_or_disabled() {
        let mut picker = picker();
        picker.register_input(PickerInput::default()).expect("registers");
        let opened = Arc::new(AtomicUsize::new(0));
        let counter = opened.clone();
        picker.on_opened(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        picker.set_disabled(true);
        picker.open().expect("no-op open");
        assert!(!picker.opened());
        assert_eq!(opened.load(Ordering::SeqCst), 0);

        picker.set_disabled(false);
        picker.open().expect("opens");
        picker.open().expect("second open is a no-op");
        assert_eq!(opened.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_state_inherits_from_the_input_until_overridden() {
        let mut picker = picker();
        picker
            .register_input(PickerInput {
                disabled: true,
                ..PickerInput::default()
            })
            .expect("registers");
        assert!(picker.disabled());
        picker.set_disabled(false);
        assert!(!picker.disabled());
    }

    #[test]
    fn only_one_input_may_register() {
        let mut picker = picker();
        picker.register_input(PickerInput::default()).expect("registers");
        assert!(matches!(
            picker.register_input(PickerInput::default()),
            Err(ConfigError::MultipleInputs)
        ));
    }

    #[test]
    fn start_at_falls_back_to_the_input_value() {
        let mut picker = picker();
        picker
            .register_input(PickerInput {
                value: Some(date(2024, 3, 12)),
                ..PickerInput::default()
            })
            .expect("registers");
        picker.open().expect("opens");
        let calendar = picker.calendar().expect("session");
        assert_eq!(calendar.active_date(), &date(2024, 3, 12));
        assert_eq!(calendar.selected(), Some(&date(2024, 3, 12)));
    }

    #[test]
    fn select_normalizes_and_emits_only_on_change() {
        let mut picker = picker()
            .with_picker_type(PickerType::DateTime)
            .with_clock_step(15);
        picker
            .register_input(PickerInput {
                max: Some(datetime(2024, 5, 30, 23, 45)),
                ..PickerInput::default()
            })
            .expect("registers");
        let emitted = Arc::new(AtomicUsize::new(0));
        let counter = emitted.clone();
        picker.on_selected_changed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Minutes round up to the next step.
        picker.select(datetime(2024, 5, 15, 9, 44));
        assert_eq!(picker.selected(), Some(&datetime(2024, 5, 15, 9, 45)));
        assert_eq!(emitted.load(Ordering::SeqCst), 1);

        // Same minute again: no emission.
        picker.select(datetime(2024, 5, 15, 9, 45));
        assert_eq!(emitted.load(Ordering::SeqCst), 1);

        // Out-of-range values clamp to the bound.
        picker.select(datetime(2024, 6, 10, 10, 0));
        assert_eq!(picker.selected(), Some(&datetime(2024, 5, 30, 23, 45)));
    }

    #[test]
    fn quantized_minutes_stay_inside_the_max_bound() {
        let mut picker = picker()
            .with_picker_type(PickerType::DateTime)
            .with_clock_step(15);
        picker
            .register_input(PickerInput {
                max: Some(datetime(2024, 5, 30, 23, 40)),
                ..PickerInput::default()
            })
            .expect("registers");
        picker.select(datetime(2024, 5, 30, 23, 50));
        assert_eq!(picker.selected(), Some(&datetime(2024, 5, 30, 23, 40)));
    }

    #[test]
    fn typed_date_keeps_retained_time() {
        let mut picker = picker().with_picker_type(PickerType::DateTime);
        picker.register_input(PickerInput::default()).expect("registers");
        picker.select(datetime(2024, 5, 15, 14, 30));
        picker.input_value_changed(&DateInput::text("2024-06-20"));
        assert_eq!(picker.selected(), Some(&datetime(2024, 5, 20, 14, 30)));
    }

    #[test]
    fn explicit_midnight_selection_commits_midnight() {
        let mut picker = picker().with_picker_type(PickerType::DateTime);
        picker.register_input(PickerInput::default()).expect("registers");
        picker.select(datetime(2024, 5, 15, 14, 30));
        picker.select(datetime(2024, 5, 15, 0, 0));
        assert_eq!(picker.selected(), Some(&datetime(2024, 5, 15, 0, 0)));
    }

    #[test]
    fn submit_commits_the_active_date_and_closes() {
        let mut picker = picker().with_start_at(Some(date(2024, 2, 10)));
        picker.register_input(PickerInput::default()).expect("registers");
        picker.open().expect("opens");
        picker.handle_key(KeyEvent::new(Key::ArrowRight));
        picker.submit_clicked();
        assert!(!picker.opened());
        assert_eq!(picker.selected(), Some(&date(2024, 2, 11)));
    }

    #[test]
    fn escape_closes_and_cancel_keeps_the_old_value() {
        let mut picker = picker();
        picker
            .register_input(PickerInput {
                value: Some(date(2024, 0, 5)),
                ..PickerInput::default()
            })
            .expect("registers");
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = closed.clone();
        picker.on_closed(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        picker.open().expect("opens");
        picker.handle_key(KeyEvent::new(Key::Escape));
        assert!(!picker.opened());
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        picker.open().expect("reopens");
        picker.cancel_clicked();
        assert_eq!(picker.selected(), Some(&date(2024, 0, 5)));
        assert_eq!(closed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn closing_with_pending_deferred_work_is_safe() {
        let mut picker = picker();
        picker.register_input(PickerInput::default()).expect("registers");
        picker.open().expect("opens");
        let calendar = picker.calendar_mut().expect("session");
        calendar.change_view(CalendarView::Years);
        // The view change left a focus request pending; closing drops it
        // without draining.
        picker.close();
        assert!(picker.calendar().is_none());
        picker.close();
        assert!(!picker.opened());
    }

    #[test]
    fn input_value_changes_coerce_and_flow_into_the_session() {
        let mut picker = picker();
        picker.register_input(PickerInput::default()).expect("registers");
        picker.open().expect("opens");

        picker.input_value_changed(&DateInput::text("2024-04-12"));
        assert_eq!(picker.selected(), Some(&date(2024, 3, 12)));
        let calendar = picker.calendar().expect("session");
        assert_eq!(calendar.selected(), Some(&date(2024, 3, 12)));

        picker.input_value_changed(&DateInput::text("garbage"));
        assert_eq!(picker.selected(), None);
        assert_eq!(picker.calendar().expect("session").selected(), None);
    }
}
