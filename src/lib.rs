//! dupsweep - duplicate file finder with quarantine.
//!
//! Finds duplicate files by exact size and BLAKE3 content fingerprint,
//! presents the groups for review (interactive TUI or list/JSON output),
//! and relocates marked copies into a timestamped quarantine folder
//! instead of deleting them.
//!
//! # Pipeline
//!
//! Traversal -> size bucketing -> content hashing/grouping, executed
//! sequentially on a background worker that reports progress over an
//! ordered channel and hands the completed collection off atomically.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod selection;
pub mod signal;
pub mod tui;

use std::path::PathBuf;

use anyhow::Context;

use crate::actions::{default_quarantine_root, quarantine_batch, QuarantineError};
use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{spawn_scan, FinderError, ScanOutcome, ScanUpdate};
use crate::error::ExitCode;
use crate::progress::ConsoleProgress;
use crate::scanner::WalkerConfig;
use crate::selection::SelectionState;
use crate::tui::{run_tui, App, TuiError};

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for fatal conditions only: unusable scan root,
/// failed quarantine-folder creation, terminal failures. Non-fatal
/// per-file problems are reflected in the exit code instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let Commands::Scan(args) = cli.command;
    let config = Config::load();

    let excluded = config.effective_excluded_dirs(&args.exclude, args.no_default_excludes);
    let walker_config = WalkerConfig::with_excluded_dirs(excluded);

    let quarantine_root = args
        .quarantine_dir
        .clone()
        .or_else(|| config.quarantine_root.clone())
        .or_else(default_quarantine_root);

    let shutdown = signal::install_shutdown_flag();
    let (worker, updates) = spawn_scan(
        args.path.clone(),
        walker_config,
        Some(std::sync::Arc::clone(&shutdown)),
    );

    let code = match args.output {
        OutputFormat::Tui => {
            let mut app = App::new();
            let result = run_tui(
                &mut app,
                &updates,
                quarantine_root.as_ref(),
                Some(&shutdown),
            );
            let _ = worker.join();

            match result {
                Ok(()) => interactive_exit_code(&app),
                Err(TuiError::Interrupted) => ExitCode::Interrupted,
                Err(TuiError::ScanFailed(msg)) => return Err(anyhow::anyhow!(msg)),
                Err(e) => return Err(e.into()),
            }
        }
        format => {
            let result = run_batch(format, &args, quarantine_root, &updates, cli.quiet);
            let _ = worker.join();
            result?
        }
    };

    Ok(code)
}

fn interactive_exit_code(app: &App) -> ExitCode {
    if app.outcome().is_none() {
        // The user quit before the scan delivered anything
        ExitCode::Interrupted
    } else if app.had_move_failures() || app.stats().is_some_and(|s| s.has_errors()) {
        ExitCode::PartialSuccess
    } else if !app.found_duplicates() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

/// Non-interactive mode: drain progress to the console, print the
/// results, optionally apply a keep policy and quarantine the marked
/// files.
fn run_batch(
    format: OutputFormat,
    args: &ScanArgs,
    quarantine_root: Option<PathBuf>,
    updates: &std::sync::mpsc::Receiver<ScanUpdate>,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let mut console = ConsoleProgress::new(quiet);
    let mut finished: Option<Result<ScanOutcome, FinderError>> = None;

    for update in updates.iter() {
        match update {
            ScanUpdate::Progress(event) => console.handle(&event),
            ScanUpdate::Finished(result) => {
                console.finish();
                finished = Some(result);
            }
        }
    }

    let mut outcome = match finished {
        Some(Ok(outcome)) => outcome,
        Some(Err(FinderError::Interrupted)) | None => return Ok(ExitCode::Interrupted),
        Some(Err(e)) => return Err(e.into()),
    };

    let found = !outcome.collection.is_empty();
    let mut move_failures = 0usize;

    if args.apply_move && found {
        if let Some(keep) = args.keep {
            let mut selection = SelectionState::new();
            selection.apply_policy_all(&outcome.collection, keep.to_policy());
            let marked = selection.marked_paths();

            if !marked.is_empty() {
                let root = quarantine_root.ok_or(QuarantineError::NoDestinationRoot)?;
                // Folder creation failure aborts the whole batch
                let batch = quarantine_batch(&marked, &root)
                    .context("quarantine relocation aborted")?;
                for moved in &batch.moved {
                    outcome.collection.remove_path(&moved.from);
                }
                selection.retain_in(&outcome.collection);
                move_failures = batch.failure_count();
                eprintln!("{}", batch.summary());
            }
        }
    }

    match format {
        OutputFormat::Json => {
            let value = output::render_json(&outcome);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => print!("{}", output::render_list(&outcome)),
    }

    let code = if move_failures > 0 || outcome.stats.has_errors() {
        ExitCode::PartialSuccess
    } else if !found {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };
    Ok(code)
}
