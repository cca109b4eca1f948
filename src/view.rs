//! Shared plumbing for the view builders.

use std::sync::Arc;

use crate::adapter::{DateAdapter, Unit};

/// Host-supplied predicate narrowing which dates are selectable.
///
/// The unit says how much of the candidate is meaningful for the check: the
/// month view asks at [`Unit::Day`], the year view at [`Unit::Month`], the
/// clock at [`Unit::Minute`].
pub type DateFilter<D> = Arc<dyn Fn(&D, Unit) -> bool + Send + Sync>;

/// Everything a view builder needs to know about the surrounding picker.
pub struct ViewContext<'a, A: DateAdapter> {
    /// The date the view is centered on and that holds focus.
    pub active_date: &'a A::Date,
    /// The currently selected value, if any.
    pub selected: Option<&'a A::Date>,
    /// Inclusive lower bound.
    pub min_date: Option<&'a A::Date>,
    /// Inclusive upper bound.
    pub max_date: Option<&'a A::Date>,
    /// Selectability predicate.
    pub date_filter: Option<&'a DateFilter<A::Date>>,
}

impl<'a, A: DateAdapter> ViewContext<'a, A> {
    /// A context with only an active date, everything else unset.
    pub fn new(active_date: &'a A::Date) -> Self {
        Self {
            active_date,
            selected: None,
            min_date: None,
            max_date: None,
            date_filter: None,
        }
    }
}

/// What a view did with a key event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome<D> {
    /// Focus moved to a new active date; nothing was selected.
    Navigate(D),
    /// The active cell was activated and carries this value.
    Select(D),
    /// The key was understood but the target cell is disabled.
    Blocked,
    /// The key means nothing to this view.
    Ignored,
}

/// Whether `date` is selectable in this context, judged at `unit`
/// granularity.
///
/// A date outside `[min, max]` or rejected by the filter is still rendered
/// and navigable, it just cannot be selected.
pub fn date_enabled<A: DateAdapter>(
    adapter: &A,
    ctx: &ViewContext<'_, A>,
    date: &A::Date,
    unit: Unit,
) -> bool {
    if let Some(filter) = ctx.date_filter
        && !filter.as_ref()(date, unit)
    {
        return false;
    }
    if let Some(min) = ctx.min_date
        && adapter.compare(date, min, unit).is_lt()
    {
        return false;
    }
    if let Some(max) = ctx.max_date
        && adapter.compare(date, max, unit).is_gt()
    {
        return false;
    }
    true
}
