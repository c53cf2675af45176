//! Chunked streaming digest over any RustCrypto hash.

use super::{DigestAlgorithm, DigestKind, DigestValue};
use crate::error::DigestError;
use sha2::Digest;
use std::io::{ErrorKind, Read};
use std::marker::PhantomData;

/// A RustCrypto hash this crate knows how to label.
pub trait NamedHash: Digest {
    const KIND: DigestKind;
}

impl NamedHash for md5::Md5 {
    const KIND: DigestKind = DigestKind::Md5;
}

impl NamedHash for sha2::Sha256 {
    const KIND: DigestKind = DigestKind::Sha256;
}

/// Feeds a reader through `D` one buffer at a time.
pub struct StreamingDigest<D> {
    buffer_size: usize,
    _hash: PhantomData<fn() -> D>,
}

/// MD5 over a chunked reader
pub type Md5Digest = StreamingDigest<md5::Md5>;

/// SHA-256 over a chunked reader
pub type Sha256Digest = StreamingDigest<sha2::Sha256>;

impl<D: NamedHash> StreamingDigest<D> {
    pub fn new(buffer_size: usize) -> Result<Self, DigestError> {
        if buffer_size == 0 {
            return Err(DigestError::InvalidBufferSize);
        }
        Ok(Self {
            buffer_size,
            _hash: PhantomData,
        })
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

impl<D: NamedHash> DigestAlgorithm for StreamingDigest<D> {
    fn digest_reader(&self, reader: &mut dyn Read) -> Result<DigestValue, DigestError> {
        let mut hasher = D::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(DigestError::Read { source }),
            }
        }

        Ok(DigestValue::new(hasher.finalize().to_vec(), D::KIND))
    }

    fn kind(&self) -> DigestKind {
        D::KIND
    }
}
