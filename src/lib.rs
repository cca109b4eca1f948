//! Headless calendar and date-time picker core.
//!
//! Everything a datepicker widget needs except the pixels: a pluggable
//! [`DateAdapter`](adapter::DateAdapter) over the host's date
//! representation, pure view builders for the month, year, year-list and
//! clock grids, the [`Calendar`](calendar::Calendar) state machine that
//! drives them, and the [`Datepicker`](datepicker::Datepicker) controller
//! that ties a popup session to a bound input. Hosts render the grids and
//! feed pointer and key events back in.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chronopick::adapter::DateAdapter;
//! use chronopick::adapter::civil::CivilDateAdapter;
//! use chronopick::datepicker::{Datepicker, IdGenerator, PickerInput};
//! use chronopick::formats::DateFormats;
//! use chronopick::key::{Key, KeyEvent};
//!
//! let adapter = Arc::new(CivilDateAdapter::default());
//! let ids = IdGenerator::new();
//! let mut picker = Datepicker::new(
//!     adapter.clone(),
//!     Arc::new(DateFormats::civil_standard()),
//!     &ids,
//! )
//! .with_start_at(adapter.create_date(2024, 0, 15).ok());
//!
//! picker.register_input(PickerInput::default())?;
//! picker.open()?;
//!
//! // Walk one day right and commit it.
//! picker.handle_key(KeyEvent::new(Key::ArrowRight));
//! picker.submit_clicked();
//!
//! let selected = picker.selected().copied().expect("a committed value");
//! assert_eq!(adapter.day(&selected), 16);
//! # Ok::<(), chronopick::error::ConfigError>(())
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod adapter;
pub mod calendar;
pub mod cell;
pub mod clock_view;
pub mod datepicker;
pub mod error;
pub mod formats;
pub mod intl;
pub mod key;
pub mod month_view;
pub mod observer;
pub mod view;
pub mod year_view;
pub mod years_view;
