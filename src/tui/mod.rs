//! Terminal user interface for reviewing and resolving duplicates.
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Key events are captured from the terminal (crossterm)
//! 2. Events are translated to [`Action`]s
//! 3. Actions modify the [`App`] state and may request an [`Effect`]
//! 4. The UI renders from the current state (ratatui)
//!
//! The scan pipeline runs on its own worker thread and feeds the app
//! through the scan channel; the app never blocks on it.

pub mod app;
pub mod events;
pub mod run;
pub mod ui;

pub use app::{Action, App, AppMode, Effect};
pub use events::{EventError, EventHandler};
pub use run::{run_tui, TuiError, TuiResult};
pub use ui::{format_size, render};
