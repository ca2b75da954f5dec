//! Checksum capability — pluggable digest algorithms for chunk verification
//! and content fingerprinting.
//!
//! An algorithm is selected by name when a descriptor is built and must
//! resolve to the same implementation on every peer that later verifies the
//! content, so the registry is a closed list: `blake3` for the wide
//! content-addressing digest, `crc32` for a narrow, cheap one.
//!
//! Each algorithm also owns the wire form of its digests — the codec above
//! never assumes a digest width.

use bytes::Bytes;
use thiserror::Error;

use crate::stream::{ByteStream, StreamError};

/// A digest value. Width is fixed per algorithm, opaque to everyone else.
pub type Digest = Bytes;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A digest handed to `serialize_digest` that this algorithm could not
    /// have produced.
    #[error("digest is {got} bytes, {name} digests are {expected}")]
    DigestWidth {
        name: &'static str,
        expected: usize,
        got: usize,
    },
}

// ── Capability ────────────────────────────────────────────────────────────────

/// Incremental-and-one-shot hashing plus the fixed-width wire form of a
/// digest.
///
/// One instance carries one running aggregate state: `update` folds bytes
/// into it, `finish` returns the aggregate digest and resets the state.
/// `checksum` is a pure one-shot that leaves the aggregate untouched.
pub trait ChecksumAlgorithm: Send {
    /// Registry name, as written into content descriptors.
    fn name(&self) -> &'static str;

    /// Digest width in bytes, as serialized.
    fn digest_len(&self) -> usize;

    /// One-shot digest of `bytes`. Does not touch the running aggregate.
    fn checksum(&self, bytes: &[u8]) -> Digest;

    /// Fold `bytes` into the running aggregate.
    fn update(&mut self, bytes: &[u8]);

    /// Return the aggregate digest and reset the running state.
    fn finish(&mut self) -> Digest;

    /// Write one digest in this algorithm's wire form.
    fn serialize_digest(
        &self,
        digest: &Digest,
        stream: &mut dyn ByteStream,
    ) -> Result<(), ChecksumError>;

    /// Read one digest in this algorithm's wire form.
    fn unserialize_digest(&self, stream: &mut dyn ByteStream) -> Result<Digest, ChecksumError>;
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Names accepted by [`create`], in preference order.
pub const ALGORITHM_NAMES: &[&str] = &["blake3", "crc32"];

/// Resolve an algorithm by name. `None` means the name is unknown and the
/// caller cannot proceed — digests from an unresolvable algorithm are
/// unverifiable.
pub fn create(name: &str) -> Option<Box<dyn ChecksumAlgorithm>> {
    match name {
        "blake3" => Some(Box::new(Blake3Checksum::new())),
        "crc32" => Some(Box::new(Crc32Checksum::new())),
        _ => None,
    }
}

// ── BLAKE3 ────────────────────────────────────────────────────────────────────

/// 32-byte BLAKE3 digests, written raw on the wire.
pub struct Blake3Checksum {
    hasher: blake3::Hasher,
}

impl Blake3Checksum {
    pub fn new() -> Self {
        Self {
            hasher: blake3::Hasher::new(),
        }
    }
}

impl Default for Blake3Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksumAlgorithm for Blake3Checksum {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn digest_len(&self) -> usize {
        32
    }

    fn checksum(&self, bytes: &[u8]) -> Digest {
        Bytes::copy_from_slice(blake3::hash(bytes).as_bytes())
    }

    fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn finish(&mut self) -> Digest {
        let digest = Bytes::copy_from_slice(self.hasher.finalize().as_bytes());
        self.hasher.reset();
        digest
    }

    fn serialize_digest(
        &self,
        digest: &Digest,
        stream: &mut dyn ByteStream,
    ) -> Result<(), ChecksumError> {
        if digest.len() != self.digest_len() {
            return Err(ChecksumError::DigestWidth {
                name: self.name(),
                expected: self.digest_len(),
                got: digest.len(),
            });
        }
        stream.write(digest)?;
        Ok(())
    }

    fn unserialize_digest(&self, stream: &mut dyn ByteStream) -> Result<Digest, ChecksumError> {
        Ok(stream.read_exact(self.digest_len())?)
    }
}

// ── CRC32 ─────────────────────────────────────────────────────────────────────

/// 4-byte CRC32 digests, written as one uint32 in the stream's endianness.
///
/// Cheap but collision-prone — integrity against accidental corruption only,
/// never against an adversarial peer.
pub struct Crc32Checksum {
    hasher: crc32fast::Hasher,
}

impl Crc32Checksum {
    pub fn new() -> Self {
        Self {
            hasher: crc32fast::Hasher::new(),
        }
    }

    fn to_digest(value: u32) -> Digest {
        Bytes::copy_from_slice(&value.to_be_bytes())
    }

    fn from_digest(digest: &Digest) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(digest);
        u32::from_be_bytes(raw)
    }
}

impl Default for Crc32Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksumAlgorithm for Crc32Checksum {
    fn name(&self) -> &'static str {
        "crc32"
    }

    fn digest_len(&self) -> usize {
        4
    }

    fn checksum(&self, bytes: &[u8]) -> Digest {
        Self::to_digest(crc32fast::hash(bytes))
    }

    fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn finish(&mut self) -> Digest {
        let digest = Self::to_digest(self.hasher.clone().finalize());
        self.hasher = crc32fast::Hasher::new();
        digest
    }

    fn serialize_digest(
        &self,
        digest: &Digest,
        stream: &mut dyn ByteStream,
    ) -> Result<(), ChecksumError> {
        if digest.len() != self.digest_len() {
            return Err(ChecksumError::DigestWidth {
                name: self.name(),
                expected: self.digest_len(),
                got: digest.len(),
            });
        }
        stream.write_u32(Self::from_digest(digest))?;
        Ok(())
    }

    fn unserialize_digest(&self, stream: &mut dyn ByteStream) -> Result<Digest, ChecksumError> {
        Ok(Self::to_digest(stream.read_u32()?))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
