//! File actions module.
//!
//! Relocation of marked duplicates into a timestamped quarantine folder.
//! There is no permanent deletion anywhere in the application; recovery
//! is always possible by moving files back out of the quarantine.

pub mod quarantine;

pub use quarantine::{
    create_quarantine_dir, default_quarantine_root, move_to_quarantine, quarantine_batch,
    quarantine_folder_name, BatchMoveResult, MoveResult, QuarantineError,
};
