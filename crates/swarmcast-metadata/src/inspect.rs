//! Human-readable view of a descriptor for logs and diagnostics.
//!
//! The summary is the only serde surface in this crate; the wire format is
//! hand-written and never goes through serde.

use serde::Serialize;

use crate::descriptor::{SegmentDescriptor, StreamDescriptor};

/// How many digest bytes to show in previews.
const DIGEST_PREVIEW_BYTES: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct DescriptorSummary {
    pub stream_type: String,
    pub mime_type: String,
    pub checksum_algorithm: String,
    pub bandwidth: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub num_channels: Option<u32>,
    pub sampling_frequency: Option<u32>,
    pub chunk_size: u32,
    pub init_segment_bytes: usize,
    pub total_chunks: usize,
    pub segments: Vec<SegmentSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentSummary {
    pub timecode: u32,
    pub length: u32,
    pub chunks: usize,
    /// Hex of the first digest's leading bytes, enough to eyeball identity.
    pub first_chunk: Option<String>,
}

impl From<&SegmentDescriptor> for SegmentSummary {
    fn from(segment: &SegmentDescriptor) -> Self {
        Self {
            timecode: segment.timecode,
            length: segment.length,
            chunks: segment.chunks.len(),
            first_chunk: segment
                .chunks
                .first()
                .map(|digest| hex::encode(&digest[..digest.len().min(DIGEST_PREVIEW_BYTES)])),
        }
    }
}

impl From<&StreamDescriptor> for DescriptorSummary {
    fn from(descriptor: &StreamDescriptor) -> Self {
        Self {
            stream_type: descriptor.stream_type.as_str().to_owned(),
            mime_type: descriptor.mime_type.clone(),
            checksum_algorithm: descriptor.checksum_algorithm_name().to_owned(),
            bandwidth: descriptor.bandwidth,
            width: descriptor.width,
            height: descriptor.height,
            num_channels: descriptor.num_channels,
            sampling_frequency: descriptor.sampling_frequency,
            chunk_size: descriptor.chunk_size,
            init_segment_bytes: descriptor.init_segment.len(),
            total_chunks: descriptor
                .media_segments
                .iter()
                .map(|segment| segment.chunks.len())
                .sum(),
            segments: descriptor.media_segments.iter().map(Into::into).collect(),
        }
    }
}
