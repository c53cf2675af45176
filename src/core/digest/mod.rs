//! # Digest Module
//!
//! Computes content digests for files.
//!
//! ## Supported Algorithms
//! - **MD5** - Default, matches `md5sum` output
//! - **SHA-256** - For lists that need a collision-resistant fingerprint
//!
//! Files are streamed through the hash in fixed-size chunks, so memory use
//! does not depend on file size.
//!
//! ## Example
//! ```rust,ignore
//! use digest_pool::core::digest::{DigestConfig, DigestKind};
//!
//! let digest = DigestConfig::new()
//!     .algorithm(DigestKind::Sha256)
//!     .buffer_size(64 * 1024)
//!     .build()?;
//!
//! let value = digest.digest_file(&path)?;
//! println!("{}", value.to_hex());
//! ```

mod streaming;
mod traits;

pub use streaming::{Md5Digest, NamedHash, Sha256Digest, StreamingDigest};
pub use traits::{DigestAlgorithm, DigestKind, DigestValue};

use crate::error::DigestError;

/// Default read buffer size in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Configuration builder for digest engines
#[derive(Debug, Clone)]
pub struct DigestConfig {
    algorithm: DigestKind,
    buffer_size: usize,
}

impl DigestConfig {
    /// Create a new configuration with defaults (MD5, 4 KiB buffer)
    pub fn new() -> Self {
        Self {
            algorithm: DigestKind::Md5,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the digest algorithm
    pub fn algorithm(mut self, algorithm: DigestKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read buffer size in bytes
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Build the digest engine
    pub fn build(self) -> Result<Box<dyn DigestAlgorithm>, DigestError> {
        match self.algorithm {
            DigestKind::Md5 => Ok(Box::new(Md5Digest::new(self.buffer_size)?)),
            DigestKind::Sha256 => Ok(Box::new(Sha256Digest::new(self.buffer_size)?)),
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn config_defaults_to_md5() {
        let config = DigestConfig::new();
        assert_eq!(config.algorithm, DigestKind::Md5);
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn build_creates_requested_algorithm() {
        let digest = DigestConfig::new()
            .algorithm(DigestKind::Sha256)
            .build()
            .unwrap();
        assert_eq!(digest.kind(), DigestKind::Sha256);
    }

    #[test]
    fn build_rejects_zero_buffer() {
        assert!(DigestConfig::new().buffer_size(0).build().is_err());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let temp_dir = TempDir::new().unwrap();
        let digest = DigestConfig::new().build().unwrap();

        let result = digest.digest_file(&temp_dir.path().join("missing.bin"));

        match result {
            Err(DigestError::Open { path, .. }) => assert!(path.ends_with("missing.bin")),
            other => panic!("expected open error, got {:?}", other),
        }
    }

    #[test]
    fn file_digest_is_stable_across_threads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");
        fs::write(&path, vec![7u8; 50_000]).unwrap();

        let digest: Arc<dyn DigestAlgorithm> = Arc::from(DigestConfig::new().build().unwrap());
        let sequential = digest.digest_file(&path).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let digest = Arc::clone(&digest);
                let path = path.clone();
                thread::spawn(move || digest.digest_file(&path).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), sequential);
        }
        assert_eq!(sequential.to_hex().len(), DigestKind::Md5.hex_len());
    }
}
