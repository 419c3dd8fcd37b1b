//! Progress event contract and console progress display.
//!
//! The scan pipeline never calls into presentation code directly. It
//! emits [`ProgressEvent`] values through a [`ProgressSink`]; consumers
//! (the TUI, or the [`ConsoleProgress`] indicatif frontend for list/JSON
//! output) drain them on their own schedule. Events are delivered in the
//! order they were generated.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Pipeline phase a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walking the directory tree; no total is known yet.
    Discovering,
    /// Querying file sizes; total is the discovered file count.
    Sizing,
    /// Hashing candidate files; total is the candidate count.
    Hashing,
}

impl Phase {
    /// Short human-readable phase label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Discovering => "Discovering files",
            Self::Sizing => "Sizing files",
            Self::Hashing => "Comparing content",
        }
    }
}

/// A discrete progress notification from the scan pipeline.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase the event belongs to.
    pub phase: Phase,
    /// Items processed so far in this phase.
    pub processed: u64,
    /// Total items in this phase; 0 means unknown/indeterminate.
    pub total: u64,
    /// Short display string (running count, or current file name).
    pub label: String,
}

impl ProgressEvent {
    /// Create a new event.
    #[must_use]
    pub fn new(phase: Phase, processed: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            phase,
            processed,
            total,
            label: label.into(),
        }
    }

    /// Whether the phase has a known total.
    #[must_use]
    pub fn is_determinate(&self) -> bool {
        self.total > 0
    }
}

/// Consumer side of the progress contract.
///
/// Emission must never block scanning on a slow consumer, so
/// implementations are expected to enqueue and return.
pub trait ProgressSink: Send {
    /// Deliver one event. Delivery order must match emission order.
    fn emit(&self, event: ProgressEvent);
}

/// Sink that discards all events; useful for tests and silent scans.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Truncate a file name for use as a progress label.
///
/// Names longer than `max` characters keep the first `max - 3`
/// characters and gain an ellipsis, mirroring what the review UI shows.
#[must_use]
pub fn truncate_label(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let head: String = name.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

/// Indicatif-based progress display for non-TUI output modes.
///
/// Feeds one bar at a time: a spinner while discovering (count-only),
/// then determinate bars for the sizing and hashing phases.
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
    phase: Option<Phase>,
    quiet: bool,
}

impl ConsoleProgress {
    /// Create a console progress display.
    ///
    /// If `quiet` is true nothing is drawn.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: None,
            phase: None,
            quiet,
        }
    }

    /// Apply one event to the display.
    pub fn handle(&mut self, event: &ProgressEvent) {
        if self.quiet {
            return;
        }

        if self.phase != Some(event.phase) {
            self.finish_current();
            self.phase = Some(event.phase);
            self.bar = Some(if event.is_determinate() {
                let pb = ProgressBar::new(event.total);
                pb.set_style(determinate_style());
                pb
            } else {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            });
            if let Some(ref pb) = self.bar {
                pb.set_prefix(event.phase.label());
            }
        }

        if let Some(ref pb) = self.bar {
            pb.set_position(event.processed);
            pb.set_message(event.label.clone());
        }
    }

    /// Finish and clear the active bar.
    pub fn finish(&mut self) {
        self.finish_current();
        self.phase = None;
    }

    fn finish_current(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix} [{elapsed_precise}] {pos} files {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
}

fn determinate_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█>-")
}
