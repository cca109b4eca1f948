//! User-visible strings for picker chrome.
//!
//! Hosts swap translations in at runtime; every surface holding a
//! [`PickerIntl`] re-reads the strings on its next render and can subscribe
//! to be told when they change.

use parking_lot::{RwLock, RwLockReadGuard};

use crate::observer::{Observers, SubscriptionId};

/// The label catalog.
///
/// Defaults to English; hosts overwrite fields wholesale through
/// [`PickerIntl::update`].
#[derive(Debug, Clone)]
pub struct IntlStrings {
    /// ARIA label for the calendar popup.
    pub calendar_label: String,
    /// Label for the button that opens the calendar popup.
    pub open_calendar_label: String,
    /// Label for the previous-month button.
    pub prev_month_label: String,
    /// Label for the next-month button.
    pub next_month_label: String,
    /// Label for the previous-year button.
    pub prev_year_label: String,
    /// Label for the next-year button.
    pub next_year_label: String,
    /// Label for the previous-years-page button.
    pub prev_multi_year_label: String,
    /// Label for the next-years-page button.
    pub next_multi_year_label: String,
    /// Label for the header button while the year or years view is shown.
    pub switch_to_month_view_label: String,
    /// Label for the header button while the month view is shown.
    pub switch_to_multi_year_view_label: String,
    /// Label for the AM toggle on the clock.
    pub set_to_am_label: String,
    /// Label for the PM toggle on the clock.
    pub set_to_pm_label: String,
    /// Label for the control that switches to the clock view.
    pub switch_to_clock_view_label: String,
    /// Confirm button text.
    pub ok_label: String,
    /// Cancel button text.
    pub cancel_label: String,
}

impl Default for IntlStrings {
    fn default() -> Self {
        Self {
            calendar_label: "Calendar".into(),
            open_calendar_label: "Open calendar".into(),
            prev_month_label: "Previous month".into(),
            next_month_label: "Next month".into(),
            prev_year_label: "Previous year".into(),
            next_year_label: "Next year".into(),
            prev_multi_year_label: "Previous years".into(),
            next_multi_year_label: "Next years".into(),
            switch_to_month_view_label: "Choose date".into(),
            switch_to_multi_year_view_label: "Choose month and year".into(),
            set_to_am_label: "Set time to AM".into(),
            set_to_pm_label: "Set time to PM".into(),
            switch_to_clock_view_label: "Change time".into(),
            ok_label: "Ok".into(),
            cancel_label: "Cancel".into(),
        }
    }
}

impl IntlStrings {
    /// Label for a span of years, e.g. the years-view header.
    pub fn format_year_range(&self, start: &str, end: &str) -> String {
        format!("{start} \u{2013} {end}")
    }
}

/// Shared, mutable handle to the label catalog.
#[derive(Debug, Default)]
pub struct PickerIntl {
    strings: RwLock<IntlStrings>,
    changes: RwLock<Observers<()>>,
}

impl PickerIntl {
    /// Creates a catalog with the default English strings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the current strings.
    pub fn read(&self) -> RwLockReadGuard<'_, IntlStrings> {
        self.strings.read()
    }

    /// Mutates the strings and notifies subscribers afterwards.
    pub fn update(&self, mutate: impl FnOnce(&mut IntlStrings)) {
        {
            let mut strings = self.strings.write();
            mutate(&mut strings);
        }
        tracing::debug!("picker intl strings updated");
        self.changes.read().notify(&());
    }

    /// Registers a callback invoked after every [`update`](Self::update).
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        self.changes.write().subscribe(move |()| callback())
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changes.write().unsubscribe(id)
    }
}
