//! Content fingerprint — the aggregate digest identifying a whole content
//! bundle.
//!
//! Every byte range that crosses the wire during a child descriptor's
//! serialize or unserialize is folded into this accumulator, in traversal
//! order. Two peers that walk the same descriptor bytes therefore arrive at
//! the same fingerprint without a separate hashing pass.
//!
//! The accumulator is passed `&mut` into every codec call rather than living
//! as ambient shared state, so ownership and update ordering are visible in
//! the signatures.

use swarmcast_core::{checksum, ChecksumAlgorithm, Digest};

use crate::error::MetadataError;

/// Running aggregate digest for one content bundle.
pub struct ContentFingerprint {
    name: String,
    algorithm: Box<dyn ChecksumAlgorithm>,
}

impl ContentFingerprint {
    /// Resolve `algorithm_name` in the checksum registry and start an empty
    /// accumulator.
    pub fn new(algorithm_name: &str) -> Result<Self, MetadataError> {
        let algorithm = checksum::create(algorithm_name)
            .ok_or_else(|| MetadataError::UnknownAlgorithm(algorithm_name.to_owned()))?;
        Ok(Self {
            name: algorithm_name.to_owned(),
            algorithm,
        })
    }

    /// The registry name this accumulator was built with, as written into
    /// content descriptors.
    pub fn algorithm_name(&self) -> &str {
        &self.name
    }

    /// Fold a byte range into the aggregate.
    pub fn update(&mut self, bytes: &[u8]) {
        self.algorithm.update(bytes);
    }

    /// The aggregate digest over everything folded so far. Resets the
    /// accumulator.
    pub fn finish(&mut self) -> Digest {
        self.algorithm.finish()
    }
}
