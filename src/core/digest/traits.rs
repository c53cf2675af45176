//! Trait definitions for content digests.

use crate::error::DigestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Available digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestKind {
    /// MD5 - 16 bytes, 32 hex characters
    Md5,
    /// SHA-256 - 32 bytes, 64 hex characters
    Sha256,
}

impl DigestKind {
    /// Length of the raw digest in bytes
    pub fn output_len(&self) -> usize {
        match self {
            DigestKind::Md5 => 16,
            DigestKind::Sha256 => 32,
        }
    }

    /// Length of the hex rendering
    pub fn hex_len(&self) -> usize {
        self.output_len() * 2
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestKind::Md5 => write!(f, "md5"),
            DigestKind::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Trait for digest implementations
///
/// Implementations hold configuration only. Every call builds its own
/// hashing context and read buffer, so one instance can be shared by
/// all workers.
pub trait DigestAlgorithm: Send + Sync {
    /// Digest everything `reader` yields until end of input.
    fn digest_reader(&self, reader: &mut dyn Read) -> Result<DigestValue, DigestError>;

    /// Digest the contents of the file at `path`.
    fn digest_file(&self, path: &Path) -> Result<DigestValue, DigestError> {
        let mut file = File::open(path).map_err(|source| DigestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.digest_reader(&mut file)
    }

    /// Get the algorithm kind
    fn kind(&self) -> DigestKind;
}

/// A finished digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestValue {
    bytes: Vec<u8>,
    kind: DigestKind,
}

impl DigestValue {
    pub fn new(bytes: Vec<u8>, kind: DigestKind) -> Self {
        Self { bytes, kind }
    }

    /// Get the raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex, two characters per byte
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Get the algorithm that produced this digest
    pub fn kind(&self) -> DigestKind {
        self.kind
    }
}

impl fmt::Display for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_hex_zero_pads_each_byte() {
        let value = DigestValue::new(vec![0x00, 0x0A, 0xDE, 0xAD], DigestKind::Md5);
        assert_eq!(value.to_hex(), "000adead");
        assert_eq!(value.to_string(), "000adead");
    }

    #[test]
    fn kind_lengths() {
        assert_eq!(DigestKind::Md5.hex_len(), 32);
        assert_eq!(DigestKind::Sha256.hex_len(), 64);
    }

    #[test]
    fn kind_display() {
        assert_eq!(DigestKind::Md5.to_string(), "md5");
        assert_eq!(DigestKind::Sha256.to_string(), "sha256");
    }
}
