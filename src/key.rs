//! Keyboard events consumed by the calendar views.

/// Keys the calendar views react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Enter.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
}

/// A key press together with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The pressed key.
    pub key: Key,
    /// Whether Alt was held.
    pub alt: bool,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn new(key: Key) -> Self {
        Self { key, alt: false }
    }

    /// A key press with Alt held.
    pub fn with_alt(key: Key) -> Self {
        Self { key, alt: true }
    }
}

/// Reading direction of the hosting layout.
///
/// Horizontal arrow navigation in the month grid is mirrored under
/// right-to-left layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl LayoutDirection {
    /// Returns `true` for right-to-left layouts.
    pub fn is_rtl(self) -> bool {
        matches!(self, LayoutDirection::Rtl)
    }
}
