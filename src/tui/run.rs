//! TUI main loop.
//!
//! Terminal setup, the event loop, and cleanup on exit. The loop drains
//! the scan channel (progress events in order, then the completed
//! collection), renders the current state, translates key presses into
//! actions, and executes the quarantine batch when the user confirms it.
//!
//! The terminal is restored on every exit path, including panics.

use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::CrosstermBackend;
use thiserror::Error;

use super::app::{Action, App, AppMode, Effect};
use super::events::EventHandler;
use super::ui::render;
use crate::actions::quarantine_batch;
use crate::duplicates::{FinderError, ScanUpdate};

/// Frame budget: ~60 FPS.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout, matched to the frame budget.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),

    /// The scan was interrupted by a shutdown signal.
    #[error("interrupted by shutdown signal")]
    Interrupted,

    /// The scan itself failed before producing a collection.
    #[error("scan failed: {0}")]
    ScanFailed(String),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive TUI until the user quits.
///
/// `updates` is the scan channel from
/// [`spawn_scan`](crate::duplicates::spawn_scan); `quarantine_root` is
/// where quarantine folders are created when the user confirms a batch.
/// The `shutdown_flag` is set when the user quits mid-scan so the
/// background worker winds down too.
///
/// # Errors
///
/// Returns `TuiError::Io`/`TuiError::Event` for terminal failures,
/// `TuiError::Interrupted` when the scan was cancelled, and
/// `TuiError::ScanFailed` when the scan aborted before completing.
/// The terminal is restored in every case.
pub fn run_tui(
    app: &mut App,
    updates: &Receiver<ScanUpdate>,
    quarantine_root: Option<&PathBuf>,
    shutdown_flag: Option<&Arc<AtomicBool>>,
) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_tui_inner(app, updates, quarantine_root, shutdown_flag);

    let _ = panic::take_hook();
    result
}

fn run_tui_inner(
    app: &mut App,
    updates: &Receiver<ScanUpdate>,
    quarantine_root: Option<&PathBuf>,
    shutdown_flag: Option<&Arc<AtomicBool>>,
) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let event_handler = EventHandler::new();
    let mut last_render = Instant::now();

    loop {
        // Drain the scan channel without blocking the UI
        loop {
            match updates.try_recv() {
                Ok(ScanUpdate::Progress(event)) => app.on_progress(event),
                Ok(ScanUpdate::Finished(Ok(outcome))) => app.on_scan_finished(outcome),
                Ok(ScanUpdate::Finished(Err(FinderError::Interrupted))) => {
                    restore_terminal()?;
                    return Err(TuiError::Interrupted);
                }
                Ok(ScanUpdate::Finished(Err(e))) => {
                    restore_terminal()?;
                    return Err(TuiError::ScanFailed(e.to_string()));
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        if app.should_quit() {
            break;
        }

        terminal.draw(|frame| render(frame, app))?;

        if let Some(action) = event_handler.poll(POLL_TIMEOUT, app.mode())? {
            // Quitting mid-scan also winds down the background worker
            if action == Action::Quit && app.mode() == AppMode::Scanning {
                if let Some(flag) = shutdown_flag {
                    flag.store(true, Ordering::SeqCst);
                }
            }

            if let Some(effect) = app.handle_action(action) {
                execute_effect(app, effect, quarantine_root);
            }
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    restore_terminal()?;
    log::info!("TUI exited normally");
    Ok(())
}

/// Execute a side effect requested by the app.
fn execute_effect(app: &mut App, effect: Effect, quarantine_root: Option<&PathBuf>) {
    match effect {
        Effect::Quarantine(paths) => {
            let Some(root) = quarantine_root else {
                app.on_batch_error("no quarantine destination available");
                return;
            };
            match quarantine_batch(&paths, root) {
                Ok(result) => app.apply_batch_result(&result),
                Err(e) => {
                    // Folder creation failed: the whole batch is off
                    log::error!("Quarantine batch aborted: {}", e);
                    app.on_batch_error(&e.to_string());
                }
            }
        }
    }
}

fn setup_terminal() -> TuiResult<Terminal> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
