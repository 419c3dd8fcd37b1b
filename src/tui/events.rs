//! Keyboard event handling for the TUI.
//!
//! Translates crossterm key events into [`Action`]s. The mapping is
//! mode-aware: `n` means "keep newest" while reviewing but "no" inside
//! the confirmation dialog.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use super::app::{Action, AppMode};

/// Error type for event handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Terminal I/O error while polling or reading events.
    #[error("event I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Polls the terminal for key events and maps them to actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    /// Create a new event handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Poll for the next action, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when no key was pressed within the timeout or
    /// the key has no binding in the current mode.
    pub fn poll(&self, timeout: Duration, mode: AppMode) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(Self::map_key(key, mode))
            }
            _ => Ok(None),
        }
    }

    /// Map one key press to an action for the given mode.
    #[must_use]
    pub fn map_key(key: KeyEvent, mode: AppMode) -> Option<Action> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        match mode {
            AppMode::Scanning => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            AppMode::Reviewing => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
                KeyCode::Tab | KeyCode::PageDown => Some(Action::NextGroup),
                KeyCode::BackTab | KeyCode::PageUp => Some(Action::PreviousGroup),
                KeyCode::Char(' ') => Some(Action::ToggleMark),
                KeyCode::Char('o') => Some(Action::KeepEarliest),
                KeyCode::Char('n') => Some(Action::KeepLatest),
                KeyCode::Char('c') => Some(Action::ClearMarks),
                KeyCode::Char('m') | KeyCode::Enter => Some(Action::Quarantine),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            AppMode::Confirming => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::Confirm),
                KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => Some(Action::Cancel),
                _ => None,
            },
            AppMode::Quitting => None,
        }
    }
}
