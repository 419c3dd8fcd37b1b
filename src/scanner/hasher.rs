//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3
//! fingerprints of file contents. Files are read in fixed-size blocks and
//! folded into a running digest, so memory use is bounded by the block
//! size regardless of file size.
//!
//! Two files with identical content always produce identical
//! fingerprints; the chance of an accidental collision between different
//! contents is negligible for duplicate detection.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! match hasher.hash_file(Path::new("/path/to/file")) {
//!     Ok(fp) => println!("{}", dupsweep::scanner::fingerprint_to_hex(&fp)),
//!     Err(e) => eprintln!("unhashable: {}", e),
//! }
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// Read block size: 64 KiB per read keeps memory bounded while staying
/// large enough to amortize syscall overhead.
pub const BLOCK_SIZE: usize = 64 * 1024;

/// A 32-byte BLAKE3 content fingerprint.
pub type Fingerprint = [u8; 32];

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    block_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default block size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block_size: BLOCK_SIZE,
        }
    }

    /// Create a hasher with a custom block size.
    ///
    /// Block sizes below 512 bytes are clamped up to 512.
    #[must_use]
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(512),
        }
    }

    /// Compute the content fingerprint of a file.
    ///
    /// The file is read in blocks of `block_size` bytes; each block is
    /// folded into the running digest.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read. The
    /// caller is expected to treat the file as unhashable and continue.
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buf = vec![0u8; self.block_size];

        loop {
            let n = file.read(&mut buf).map_err(|e| map_io_error(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

/// Render a fingerprint as a lowercase hex string.
#[must_use]
pub fn fingerprint_to_hex(fingerprint: &Fingerprint) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(64);
    for byte in fingerprint {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

fn map_io_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_identical_content_identical_fingerprint() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", b"hello");
        let b = write_file(&dir, "b.txt", b"hello");

        let hasher = Hasher::new();
        assert_eq!(
            hasher.hash_file(&a).unwrap(),
            hasher.hash_file(&b).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_fingerprint() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", b"hello");
        let b = write_file(&dir, "b.txt", b"world");

        let hasher = Hasher::new();
        assert_ne!(
            hasher.hash_file(&a).unwrap(),
            hasher.hash_file(&b).unwrap()
        );
    }

    #[test]
    fn test_last_byte_difference_detected() {
        let dir = TempDir::new().unwrap();
        let mut content_a = vec![0xAAu8; 1024];
        let mut content_b = content_a.clone();
        content_a[1023] = 0x01;
        content_b[1023] = 0x02;
        let a = write_file(&dir, "x.bin", &content_a);
        let b = write_file(&dir, "y.bin", &content_b);

        let hasher = Hasher::new();
        assert_ne!(
            hasher.hash_file(&a).unwrap(),
            hasher.hash_file(&b).unwrap()
        );
    }

    #[test]
    fn test_multi_block_file_matches_single_read() {
        // Content spanning several blocks must hash the same as the
        // one-shot digest of the full content.
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..3 * BLOCK_SIZE + 17).map(|i| (i % 251) as u8).collect();
        let path = write_file(&dir, "big.bin", &content);

        let streamed = Hasher::new().hash_file(&path).unwrap();
        let oneshot = *blake3::hash(&content).as_bytes();
        assert_eq!(streamed, oneshot);
    }

    #[test]
    fn test_small_block_size_same_result() {
        let dir = TempDir::new().unwrap();
        let content = vec![0x42u8; 4096];
        let path = write_file(&dir, "f.bin", &content);

        let default = Hasher::new().hash_file(&path).unwrap();
        let tiny = Hasher::with_block_size(512).hash_file(&path).unwrap();
        assert_eq!(default, tiny);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.txt");

        let err = Hasher::new().hash_file(&missing).unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
    }

    #[test]
    fn test_fingerprint_to_hex() {
        let mut fp = [0u8; 32];
        fp[0] = 0xAB;
        fp[31] = 0x01;

        let hex = fingerprint_to_hex(&fp);
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("ab"));
        assert!(hex.ends_with("01"));
    }
}
