//! Command-line interface definitions.
//!
//! All CLI arguments and options are defined with the clap derive API:
//! global options (verbosity, error format) plus the `scan` subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory and review interactively (default)
//! dupsweep scan ~/Downloads
//!
//! # Extra directory-name exclusions
//! dupsweep scan ~/Downloads --exclude node_modules --exclude .git
//!
//! # Scripted: list groups, keep the newest copy, quarantine the rest
//! dupsweep scan ~/Downloads --output list --keep latest --move --yes
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::selection::KeepPolicy;

/// Duplicate file finder with interactive review and quarantine.
///
/// dupsweep finds duplicate files by size and BLAKE3 content
/// fingerprint, shows the groups for review, and moves marked copies to
/// a timestamped quarantine folder instead of deleting them.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory tree for duplicate files
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Root directory to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Directory names to skip during traversal (repeatable)
    ///
    /// Added to the configured exclusion set (system folders by default).
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Ignore the configured exclusion set; only --exclude names apply
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Output mode (tui for interactive review, list/json for scripting)
    #[arg(short, long, value_enum, default_value = "tui")]
    pub output: OutputFormat,

    /// Bulk-mark every group with this keep policy
    #[arg(long, value_enum, value_name = "POLICY")]
    pub keep: Option<KeepArg>,

    /// Quarantine the marked files after the scan (non-interactive)
    ///
    /// Requires --keep to decide what to mark and --yes to confirm.
    #[arg(long = "move", requires = "keep", requires = "yes")]
    pub apply_move: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Where to create the quarantine folder
    ///
    /// Defaults to the configured root, or the desktop/home directory.
    #[arg(long, value_name = "PATH")]
    pub quarantine_dir: Option<PathBuf>,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Interactive terminal user interface
    Tui,
    /// Plain text listing
    List,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tui => write!(f, "tui"),
            OutputFormat::List => write!(f, "list"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// CLI-facing keep policy names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeepArg {
    /// Keep the earliest copy, mark the rest
    Earliest,
    /// Keep the latest copy, mark the rest
    Latest,
}

impl KeepArg {
    /// Convert to the core policy type.
    #[must_use]
    pub fn to_policy(self) -> KeepPolicy {
        match self {
            Self::Earliest => KeepPolicy::Earliest,
            Self::Latest => KeepPolicy::Latest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["dupsweep", "scan", "/tmp"]).unwrap();
        let Commands::Scan(args) = cli.command;

        assert_eq!(args.path, PathBuf::from("/tmp"));
        assert_eq!(args.output, OutputFormat::Tui);
        assert!(args.exclude.is_empty());
        assert!(!args.apply_move);
    }

    #[test]
    fn test_repeatable_excludes() {
        let cli = Cli::try_parse_from([
            "dupsweep", "scan", "/tmp", "-x", "node_modules", "--exclude", "target",
        ])
        .unwrap();
        let Commands::Scan(args) = cli.command;

        assert_eq!(args.exclude, vec!["node_modules", "target"]);
    }

    #[test]
    fn test_move_requires_keep_and_yes() {
        assert!(Cli::try_parse_from(["dupsweep", "scan", "/tmp", "--move"]).is_err());
        assert!(
            Cli::try_parse_from(["dupsweep", "scan", "/tmp", "--move", "--keep", "earliest"])
                .is_err()
        );
        assert!(Cli::try_parse_from([
            "dupsweep", "scan", "/tmp", "--move", "--keep", "earliest", "--yes",
        ])
        .is_ok());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dupsweep", "-q", "-v", "scan", "/tmp"]).is_err());
    }

    #[test]
    fn test_keep_arg_maps_to_policy() {
        assert_eq!(KeepArg::Earliest.to_policy(), KeepPolicy::Earliest);
        assert_eq!(KeepArg::Latest.to_policy(), KeepPolicy::Latest);
    }
}
