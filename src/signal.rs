//! Graceful shutdown signaling.
//!
//! A single shared atomic flag, set by the Ctrl+C handler and checked by
//! the scan pipeline between discrete units of work (per file, per
//! phase). A hash computation in flight is never aborted mid-read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Install the Ctrl+C handler and return the shared shutdown flag.
///
/// If the handler cannot be installed (e.g. another handler already
/// owns the signal), the flag is still returned and the scan simply
/// runs without graceful interruption.
#[must_use]
pub fn install_shutdown_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));

    let handler_flag = Arc::clone(&flag);
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            // Second Ctrl+C: the user really wants out
            log::warn!("Forced exit");
            std::process::exit(crate::error::ExitCode::Interrupted.as_i32());
        }
        log::info!("Interrupt received, finishing current file...");
    }) {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    flag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_unset() {
        let flag = install_shutdown_flag();
        assert!(!flag.load(Ordering::SeqCst));
    }
}
