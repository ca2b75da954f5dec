//! swarmcast-metadata — the content descriptor codec.
//!
//! Turns a media stream into a verifiable, chunked, content-addressable
//! descriptor: chunk-size derivation, per-chunk digests, a wire-exact
//! field-ordered binary form, and a running content fingerprint folded over
//! every byte range that crosses the wire.

pub mod descriptor;
pub mod error;
pub mod fingerprint;
pub mod inspect;
pub mod media;

pub use descriptor::{SegmentDescriptor, StreamDescriptor};
pub use error::MetadataError;
pub use fingerprint::ContentFingerprint;
pub use inspect::{DescriptorSummary, SegmentSummary};
pub use media::{Cue, MediaSource, StreamType, Track};
