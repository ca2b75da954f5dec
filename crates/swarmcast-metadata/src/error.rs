//! Error taxonomy for the descriptor codec.
//!
//! Every error aborts the in-progress structured operation and propagates
//! upward unchanged — the codec retries nothing and recovers nothing. A
//! structure touched by a failed call is partially populated and must be
//! discarded by the caller.

use thiserror::Error;

use swarmcast_core::{ChecksumError, StreamError};

#[derive(Debug, Error)]
pub enum MetadataError {
    /// The named checksum algorithm is not in the registry. Raised at
    /// construction on the writing side, or when a descriptor names an
    /// algorithm this build cannot resolve on the reading side.
    #[error("unknown checksum algorithm {0:?}")]
    UnknownAlgorithm(String),

    /// Stream-type byte that is not one of the defined values.
    #[error("unknown stream type byte 0x{0:02x}")]
    UnknownStreamType(u8),

    /// An optional attribute too large for its int32 wire field, where the
    /// negative range is reserved for the unset sentinel. Wrapping it would
    /// read back as unset on the other end.
    #[error("attribute value {0} exceeds the int32 wire range")]
    AttributeOutOfRange(u32),

    /// The source media could not supply a segment's bytes during chunking.
    #[error("media segment at timecode {timecode} unavailable")]
    MediaFetch {
        timecode: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Checksum(#[from] ChecksumError),
}
