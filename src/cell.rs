//! The grid-cell value produced by the view builders.

/// One selectable cell in a calendar grid.
///
/// Cells are immutable once built. When the owning view's period changes
/// the whole grid is rebuilt, cells are never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    /// The value the cell stands for: a day of month (1-based), a month
    /// index (0-based) or a year.
    pub value: i32,
    /// The text to render inside the cell.
    pub display_value: String,
    /// The accessibility label for the cell.
    pub aria_label: String,
    /// Whether the cell may be selected.
    pub enabled: bool,
}

impl CalendarCell {
    /// Creates a cell.
    pub fn new(
        value: i32,
        display_value: impl Into<String>,
        aria_label: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            value,
            display_value: display_value.into(),
            aria_label: aria_label.into(),
            enabled,
        }
    }
}
