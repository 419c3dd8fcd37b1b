//! TUI application state management.
//!
//! # Overview
//!
//! The [`App`] struct is the central state container for the interactive
//! review UI: current mode, the duplicate collection under review, the
//! selection state, cursor position, and the latest scan progress.
//!
//! State transitions are explicit: events become [`Action`]s, actions
//! mutate the app, and side effects (the quarantine batch) are returned
//! as [`Effect`]s for the run loop to execute. The app itself never
//! touches the filesystem.
//!
//! Selection is keyed by file path, not by list row, so marks survive
//! any amount of re-rendering and cursor movement.

use std::path::PathBuf;

use crate::actions::BatchMoveResult;
use crate::duplicates::{DuplicateGroup, ScanOutcome, ScanStats};
use crate::progress::ProgressEvent;
use crate::scanner::FileRecord;
use crate::selection::{KeepPolicy, SelectionState};

/// Application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Scan in progress - shows live progress
    #[default]
    Scanning,
    /// Reviewing duplicate groups - main navigation mode
    Reviewing,
    /// Confirming a quarantine batch
    Confirming,
    /// Application is quitting
    Quitting,
}

/// User action produced by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor up one file row
    NavigateUp,
    /// Move the cursor down one file row
    NavigateDown,
    /// Jump to the first file of the next group
    NextGroup,
    /// Jump to the first file of the previous group
    PreviousGroup,
    /// Toggle the mark on the file under the cursor
    ToggleMark,
    /// Mark all but the earliest copy in every group
    KeepEarliest,
    /// Mark all but the latest copy in every group
    KeepLatest,
    /// Clear every mark
    ClearMarks,
    /// Request relocation of the marked files
    Quarantine,
    /// Confirm the pending relocation
    Confirm,
    /// Cancel the pending relocation
    Cancel,
    /// Quit the application
    Quit,
}

/// Side effect the run loop must execute on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move these files into the quarantine folder.
    Quarantine(Vec<PathBuf>),
}

/// Central TUI state.
#[derive(Debug, Default)]
pub struct App {
    mode: AppMode,
    outcome: Option<ScanOutcome>,
    selection: SelectionState,
    /// Flat index over all member rows across groups
    cursor: usize,
    /// Latest progress event while scanning
    progress: Option<ProgressEvent>,
    /// One-line status message
    status: String,
    found_duplicates: bool,
    had_move_failures: bool,
}

impl App {
    /// Create an app in scanning mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: "Scanning...".to_string(),
            ..Self::default()
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Whether the app wants to exit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.mode == AppMode::Quitting
    }

    /// Latest progress event, if scanning.
    #[must_use]
    pub fn progress(&self) -> Option<&ProgressEvent> {
        self.progress.as_ref()
    }

    /// Current status line.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The scan outcome under review, if the scan has completed.
    #[must_use]
    pub fn outcome(&self) -> Option<&ScanOutcome> {
        self.outcome.as_ref()
    }

    /// Scan statistics, if the scan has completed.
    #[must_use]
    pub fn stats(&self) -> Option<&ScanStats> {
        self.outcome.as_ref().map(|o| &o.stats)
    }

    /// Whether the completed scan found any duplicates.
    #[must_use]
    pub fn found_duplicates(&self) -> bool {
        self.found_duplicates
    }

    /// Whether any quarantine move failed during this session.
    #[must_use]
    pub fn had_move_failures(&self) -> bool {
        self.had_move_failures
    }

    /// Number of marked files.
    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.selection.len()
    }

    /// Whether a path is marked.
    #[must_use]
    pub fn is_marked(&self, path: &std::path::Path) -> bool {
        self.selection.is_marked(path)
    }

    /// Flat cursor position over member rows.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of member rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.outcome
            .as_ref()
            .map_or(0, |o| o.collection.total_files())
    }

    /// Record a progress event from the scan worker.
    pub fn on_progress(&mut self, event: ProgressEvent) {
        self.status = format!("{}: {}", event.phase.label(), event.label);
        self.progress = Some(event);
    }

    /// Install the completed scan and switch to review mode.
    pub fn on_scan_finished(&mut self, outcome: ScanOutcome) {
        self.found_duplicates = !outcome.collection.is_empty();
        self.status = if self.found_duplicates {
            format!(
                "Found {} duplicate group(s), {} file(s)",
                outcome.collection.len(),
                outcome.collection.total_files()
            )
        } else {
            "No duplicates found.".to_string()
        };
        if outcome.stats.has_errors() {
            self.status
                .push_str(&format!("  ({} file(s) skipped)", outcome.stats.error_count()));
        }
        self.outcome = Some(outcome);
        self.selection = SelectionState::new();
        self.cursor = 0;
        self.progress = None;
        self.mode = AppMode::Reviewing;
    }

    /// The group and member under the flat index.
    #[must_use]
    pub fn member_at(&self, index: usize) -> Option<(&DuplicateGroup, &FileRecord)> {
        let outcome = self.outcome.as_ref()?;
        let mut remaining = index;
        for group in outcome.collection.groups() {
            if remaining < group.len() {
                return Some((group, &group.members()[remaining]));
            }
            remaining -= group.len();
        }
        None
    }

    /// Flat index of the first member row of each group.
    #[must_use]
    pub fn group_offsets(&self) -> Vec<usize> {
        let Some(outcome) = self.outcome.as_ref() else {
            return Vec::new();
        };
        let mut offsets = Vec::with_capacity(outcome.collection.len());
        let mut offset = 0;
        for group in outcome.collection.groups() {
            offsets.push(offset);
            offset += group.len();
        }
        offsets
    }

    /// Apply one action; returns a side effect for the run loop, if any.
    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        match self.mode {
            AppMode::Scanning => self.handle_scanning(action),
            AppMode::Reviewing => return self.handle_reviewing(action),
            AppMode::Confirming => return self.handle_confirming(action),
            AppMode::Quitting => {}
        }
        None
    }

    fn handle_scanning(&mut self, action: Action) {
        if action == Action::Quit {
            self.mode = AppMode::Quitting;
        }
    }

    fn handle_reviewing(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::NavigateUp => self.cursor = self.cursor.saturating_sub(1),
            Action::NavigateDown => {
                if self.cursor + 1 < self.row_count() {
                    self.cursor += 1;
                }
            }
            Action::NextGroup => {
                if let Some(&offset) = self
                    .group_offsets()
                    .iter()
                    .find(|&&offset| offset > self.cursor)
                {
                    self.cursor = offset;
                }
            }
            Action::PreviousGroup => {
                if let Some(&offset) = self
                    .group_offsets()
                    .iter()
                    .rev()
                    .find(|&&offset| offset < self.cursor)
                {
                    self.cursor = offset;
                }
            }
            Action::ToggleMark => {
                if let Some((_, member)) = self.member_at(self.cursor) {
                    let path = member.path.clone();
                    let marked = self.selection.toggle(&path);
                    self.status = format!(
                        "{} {}",
                        if marked { "Marked" } else { "Unmarked" },
                        path.display()
                    );
                }
            }
            Action::KeepEarliest | Action::KeepLatest => {
                let policy = if action == Action::KeepEarliest {
                    KeepPolicy::Earliest
                } else {
                    KeepPolicy::Latest
                };
                if let Some(outcome) = self.outcome.as_ref() {
                    self.selection.apply_policy_all(&outcome.collection, policy);
                    self.status = format!(
                        "{} file(s) marked ({})",
                        self.selection.len(),
                        match policy {
                            KeepPolicy::Earliest => "keeping earliest",
                            KeepPolicy::Latest => "keeping latest",
                        }
                    );
                }
            }
            Action::ClearMarks => {
                self.selection.clear();
                self.status = "All marks cleared".to_string();
            }
            Action::Quarantine => {
                if self.selection.is_empty() {
                    self.status = "Nothing marked - toggle files with space first".to_string();
                } else {
                    self.mode = AppMode::Confirming;
                }
            }
            Action::Quit => self.mode = AppMode::Quitting,
            _ => {}
        }
        None
    }

    fn handle_confirming(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Confirm => {
                self.mode = AppMode::Reviewing;
                Some(Effect::Quarantine(self.selection.marked_paths()))
            }
            Action::Cancel | Action::Quit => {
                self.mode = AppMode::Reviewing;
                self.status = "Relocation cancelled".to_string();
                None
            }
            _ => None,
        }
    }

    /// Fold the outcome of a quarantine batch back into the state:
    /// moved members leave their groups, groups below two members are
    /// dropped, stale marks are cleared, the cursor is clamped.
    pub fn apply_batch_result(&mut self, result: &BatchMoveResult) {
        if let Some(outcome) = self.outcome.as_mut() {
            for moved in &result.moved {
                outcome.collection.remove_path(&moved.from);
            }
            self.selection.retain_in(&outcome.collection);
        }
        if result.failure_count() > 0 {
            self.had_move_failures = true;
        }
        self.status = result.summary();
        let rows = self.row_count();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
    }

    /// Surface a fatal batch error (quarantine folder creation failed).
    pub fn on_batch_error(&mut self, message: &str) {
        self.had_move_failures = true;
        self.status = format!("Relocation aborted: {message}");
    }
}
