//! Stream descriptor codec — the serializable description of one logical
//! media stream and its chunk map.
//!
//! A descriptor is built once from a media source (chunk-size derivation,
//! per-chunk digests), then serialized field by field in a fixed order; or
//! constructed empty and populated entirely by `unserialize`. Re-serializing
//! a parsed descriptor is byte-identical to the original.
//!
//! Both directions fold the init-segment bytes and every chunk digest into
//! the caller's [`ContentFingerprint`], immediately after the byte range's
//! own I/O and before the next field is touched, so writer and reader drive
//! the accumulator through the same sequence.
//!
//! Wire layout (all multi-byte integers in the stream's endianness):
//!
//! ```text
//! byte     type
//! cstring  mimeType            bytes + 0x00, no length prefix
//! uint32   bandwidth
//! int32    width               -1 = unset
//! int32    height              -1 = unset
//! int32    numChannels         -1 = unset
//! int32    samplingFrequency   -1 = unset
//! int32    chunkSize
//! uint32   initSegmentLength
//! byte[..] initSegment
//! uint32   mediaSegmentCount
//! per segment:
//!   uint32 timecode
//!   uint32 length
//!   uint32 chunkCount
//!   digest[chunkCount]         width fixed by the checksum algorithm
//! ```

use bytes::Bytes;

use swarmcast_core::{checksum, ByteStream, ChecksumAlgorithm, Digest, StreamError};

use crate::error::MetadataError;
use crate::fingerprint::ContentFingerprint;
use crate::media::{Cue, MediaSource, StreamType};

/// Smallest candidate chunk-size exponent.
const MIN_CHUNK_EXPONENT: u32 = 15;
/// Largest candidate chunk-size exponent; the fallback when every smaller
/// size would need too many chunks per stream.
const MAX_CHUNK_EXPONENT: u32 = 19;
/// A chunk size qualifies when the whole stream splits into fewer chunks
/// than this, keeping per-segment chunk tables small on the wire.
const MAX_CHUNK_COUNT: u64 = 255;

// ── Segment ───────────────────────────────────────────────────────────────────

/// One media segment: a contiguous byte range starting at a cue, described
/// by one digest per chunk-size slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescriptor {
    /// Presentation time of the segment start.
    pub timecode: u32,
    /// Byte length of the segment's raw data.
    pub length: u32,
    /// One digest per slice; `chunks.len() == length.div_ceil(chunk_size)`.
    pub chunks: Vec<Digest>,
}

// ── Descriptor ────────────────────────────────────────────────────────────────

/// The serializable description of one logical stream — a single track or a
/// multiplexed combination.
pub struct StreamDescriptor {
    checksum_name: String,
    checksum: Box<dyn ChecksumAlgorithm>,

    pub stream_type: StreamType,
    pub mime_type: String,
    pub bandwidth: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub num_channels: Option<u32>,
    pub sampling_frequency: Option<u32>,

    /// Container initialization data, length-prefixed on the wire.
    pub init_segment: Bytes,
    /// Shared by every segment of this descriptor. A power of two in
    /// 2^15..=2^19 once populated.
    pub chunk_size: u32,
    pub media_segments: Vec<SegmentDescriptor>,

    /// Total byte size across all segments. Used only to pick `chunk_size`;
    /// never serialized.
    stream_size: u64,
}

impl StreamDescriptor {
    /// Empty descriptor for the deserialization path: every media-derived
    /// attribute starts unset and is populated by `unserialize`.
    pub fn new(algorithm_name: &str) -> Result<Self, MetadataError> {
        let checksum = checksum::create(algorithm_name)
            .ok_or_else(|| MetadataError::UnknownAlgorithm(algorithm_name.to_owned()))?;
        Ok(Self {
            checksum_name: algorithm_name.to_owned(),
            checksum,
            stream_type: StreamType::Unspecified,
            mime_type: String::new(),
            bandwidth: 0,
            width: None,
            height: None,
            num_channels: None,
            sampling_frequency: None,
            init_segment: Bytes::new(),
            chunk_size: 0,
            media_segments: Vec::new(),
            stream_size: 0,
        })
    }

    /// Descriptor seeded from a source media handle: copies the mime type
    /// and folds every track's attributes.
    ///
    /// The fold only compares each track against the type already set: two
    /// tracks mixing video and audio promote the type to `Multiplexed`, and
    /// every attribute a track defines overwrites the previous value. With
    /// more than two mixed tracks the same fold applies; the precedence that
    /// falls out is inherited behavior, not a contract.
    pub fn from_media(
        algorithm_name: &str,
        media: &dyn MediaSource,
        init_segment: Option<Bytes>,
    ) -> Result<Self, MetadataError> {
        let mut descriptor = Self::new(algorithm_name)?;
        descriptor.init_segment = init_segment.unwrap_or_default();
        descriptor.mime_type = media.mime_type().to_owned();

        for track in media.tracks() {
            let track_av = matches!(track.kind, StreamType::Video | StreamType::Audio);
            let self_av = matches!(
                descriptor.stream_type,
                StreamType::Video | StreamType::Audio
            );
            if track_av && self_av && descriptor.stream_type != track.kind {
                descriptor.stream_type = StreamType::Multiplexed;
            } else {
                descriptor.stream_type = track.kind;
            }
            if track.width.is_some() {
                descriptor.width = track.width;
            }
            if track.height.is_some() {
                descriptor.height = track.height;
            }
            if track.channels.is_some() {
                descriptor.num_channels = track.channels;
            }
            if track.sampling_frequency.is_some() {
                descriptor.sampling_frequency = track.sampling_frequency;
            }
        }
        Ok(descriptor)
    }

    /// Registry name of the checksum algorithm digesting this descriptor's
    /// chunks.
    pub fn checksum_algorithm_name(&self) -> &str {
        &self.checksum_name
    }

    /// Total byte size across all segments, as derived from the cue list.
    pub fn stream_size(&self) -> u64 {
        self.stream_size
    }

    // ── Chunk-size derivation ─────────────────────────────────────────────────

    /// Derive `stream_size` from the cue list and pick the chunk size.
    ///
    /// The stream size is the sum of byte deltas between consecutive cue
    /// offsets. Candidate chunk sizes are tried from 2^15 upward; the first
    /// one that splits the stream into fewer than 255 chunks wins, keeping
    /// verification as fine-grained as the table-size budget allows. If none
    /// qualifies the loop exits holding 2^19.
    pub fn calculate_stream_size(&mut self, cues: &[Cue]) {
        let mut previous = 0u64;
        for cue in cues {
            self.stream_size += cue.offset.saturating_sub(previous);
            previous = cue.offset;
        }

        for exponent in MIN_CHUNK_EXPONENT..=MAX_CHUNK_EXPONENT {
            self.chunk_size = 1u32 << exponent;
            if self.stream_size.div_ceil(self.chunk_size as u64) < MAX_CHUNK_COUNT {
                break;
            }
        }
    }

    // ── Chunking pass ─────────────────────────────────────────────────────────

    /// Fetch, split, and digest every segment of the source media, in cue
    /// order.
    ///
    /// Each segment's fetch is issued only after the previous segment's
    /// chunking completed. Each chunk digest is fed into `fingerprint` as it
    /// is produced. A fetch error aborts the pass, leaving `media_segments`
    /// populated up to the failed cue — nothing is rolled back.
    pub fn add_media_segments(
        &mut self,
        media: &mut dyn MediaSource,
        fingerprint: &mut ContentFingerprint,
    ) -> Result<(), MetadataError> {
        let cues: Vec<Cue> = media.cues().to_vec();
        self.calculate_stream_size(&cues);

        for cue in &cues {
            let bytes =
                media
                    .media_segment(cue.timecode)
                    .map_err(|source| MetadataError::MediaFetch {
                        timecode: cue.timecode,
                        source,
                    })?;
            let chunks = self.chunk_bytes(&bytes, fingerprint);
            tracing::debug!(
                timecode = cue.timecode,
                length = bytes.len(),
                chunks = chunks.len(),
                "segment chunked"
            );
            self.media_segments.push(SegmentDescriptor {
                timecode: cue.timecode,
                length: bytes.len() as u32,
                chunks,
            });
        }

        tracing::debug!(
            segments = self.media_segments.len(),
            chunk_size = self.chunk_size,
            stream_size = self.stream_size,
            "chunking pass complete"
        );
        Ok(())
    }

    /// Split `bytes` into consecutive `chunk_size` slices (the final slice
    /// may be short) and digest each with this descriptor's own algorithm.
    fn chunk_bytes(&self, bytes: &[u8], fingerprint: &mut ContentFingerprint) -> Vec<Digest> {
        let mut chunks = Vec::new();
        for slice in bytes.chunks(self.chunk_size as usize) {
            let digest = self.checksum.checksum(slice);
            fingerprint.update(&digest);
            chunks.push(digest);
        }
        chunks
    }

    // ── Serialize ─────────────────────────────────────────────────────────────

    /// Write the descriptor in the fixed field order.
    ///
    /// Every write is a strict continuation: the next field is not written
    /// until the previous one succeeded, and the first error aborts the whole
    /// call with nothing further written.
    pub fn serialize(
        &self,
        stream: &mut dyn ByteStream,
        fingerprint: &mut ContentFingerprint,
    ) -> Result<(), MetadataError> {
        stream.write_u8(self.stream_type.wire_byte())?;
        stream.write_string(&self.mime_type)?;
        stream.write_u32(self.bandwidth)?;
        write_unset_or(stream, self.width)?;
        write_unset_or(stream, self.height)?;
        write_unset_or(stream, self.num_channels)?;
        write_unset_or(stream, self.sampling_frequency)?;
        stream.write_i32(self.chunk_size as i32)?;

        stream.write_u32(self.init_segment.len() as u32)?;
        stream.write(&self.init_segment)?;
        fingerprint.update(&self.init_segment);

        stream.write_u32(self.media_segments.len() as u32)?;
        for segment in &self.media_segments {
            stream.write_u32(segment.timecode)?;
            stream.write_u32(segment.length)?;
            stream.write_u32(segment.chunks.len() as u32)?;
            for chunk in &segment.chunks {
                self.checksum.serialize_digest(chunk, stream)?;
                fingerprint.update(chunk);
            }
        }

        tracing::debug!(
            mime_type = %self.mime_type,
            segments = self.media_segments.len(),
            bytes = stream.tell(),
            "descriptor serialized"
        );
        Ok(())
    }

    // ── Unserialize ───────────────────────────────────────────────────────────

    /// Read the descriptor, mirroring `serialize` field for field.
    ///
    /// The init-segment bytes and every chunk digest are folded into
    /// `fingerprint` immediately upon being read, reproducing the writer's
    /// update sequence. Any stream error aborts the call; fields read so far
    /// stay populated and the descriptor must then be discarded.
    pub fn unserialize(
        &mut self,
        stream: &mut dyn ByteStream,
        fingerprint: &mut ContentFingerprint,
    ) -> Result<(), MetadataError> {
        let type_byte = stream.read_u8()?;
        self.stream_type = StreamType::from_wire_byte(type_byte)
            .ok_or(MetadataError::UnknownStreamType(type_byte))?;
        self.mime_type = stream.read_string()?;
        self.bandwidth = stream.read_u32()?;
        self.width = read_unset_or(stream)?;
        self.height = read_unset_or(stream)?;
        self.num_channels = read_unset_or(stream)?;
        self.sampling_frequency = read_unset_or(stream)?;
        self.chunk_size = stream.read_i32()? as u32;

        let init_length = stream.read_u32()?;
        let init_segment = stream.read_exact(init_length as usize)?;
        fingerprint.update(&init_segment);
        self.init_segment = init_segment;

        let segment_count = stream.read_u32()?;
        for _ in 0..segment_count {
            let timecode = stream.read_u32()?;
            let length = stream.read_u32()?;
            let chunk_count = stream.read_u32()?;
            let mut chunks = Vec::new();
            for _ in 0..chunk_count {
                let digest = self.checksum.unserialize_digest(stream)?;
                fingerprint.update(&digest);
                chunks.push(digest);
            }
            self.media_segments.push(SegmentDescriptor {
                timecode,
                length,
                chunks,
            });
        }

        tracing::debug!(
            mime_type = %self.mime_type,
            segments = self.media_segments.len(),
            chunk_size = self.chunk_size,
            "descriptor unserialized"
        );
        Ok(())
    }
}

// ── Optional numeric fields ───────────────────────────────────────────────────

// Optional attributes travel as int32 with -1 meaning unset; in memory they
// are plain Options. Values above i32::MAX have no wire form — the negative
// range belongs to the sentinel — and are rejected rather than wrapped.

fn write_unset_or(stream: &mut dyn ByteStream, value: Option<u32>) -> Result<(), MetadataError> {
    match value {
        Some(value) => {
            let raw =
                i32::try_from(value).map_err(|_| MetadataError::AttributeOutOfRange(value))?;
            stream.write_i32(raw)?;
        }
        None => stream.write_i32(-1)?,
    }
    Ok(())
}

fn read_unset_or(stream: &mut dyn ByteStream) -> Result<Option<u32>, StreamError> {
    let raw = stream.read_i32()?;
    Ok(if raw < 0 { None } else { Some(raw as u32) })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
