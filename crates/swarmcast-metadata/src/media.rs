//! Media source boundary — what the container parser must expose for a
//! stream to be described.
//!
//! Parsing itself (WebM/MP4 cue and track extraction) lives outside this
//! crate; the codec only consumes track attributes, the cue list, and raw
//! segment byte ranges.

use bytes::Bytes;

/// Kind of a logical stream or contributing track.
///
/// `Multiplexed` never appears on a track — it is what a descriptor becomes
/// when its tracks mix video and audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    Unspecified,
    Video,
    Audio,
    Multiplexed,
}

impl StreamType {
    /// Single-byte wire form. `Unspecified` keeps the historical -1 sentinel,
    /// which a one-byte field stores as 0xFF.
    pub fn wire_byte(self) -> u8 {
        match self {
            StreamType::Unspecified => 0xFF,
            StreamType::Video => 1,
            StreamType::Audio => 2,
            StreamType::Multiplexed => 4,
        }
    }

    pub fn from_wire_byte(byte: u8) -> Option<Self> {
        match byte {
            0xFF => Some(StreamType::Unspecified),
            1 => Some(StreamType::Video),
            2 => Some(StreamType::Audio),
            4 => Some(StreamType::Multiplexed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StreamType::Unspecified => "unspecified",
            StreamType::Video => "video",
            StreamType::Audio => "audio",
            StreamType::Multiplexed => "multiplexed",
        }
    }
}

/// One track of the source media. Attributes the track does not define are
/// `None` rather than a -1 sentinel.
#[derive(Debug, Clone)]
pub struct Track {
    pub kind: StreamType,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub channels: Option<u32>,
    pub sampling_frequency: Option<u32>,
}

impl Track {
    pub fn video(width: u32, height: u32) -> Self {
        Self {
            kind: StreamType::Video,
            width: Some(width),
            height: Some(height),
            channels: None,
            sampling_frequency: None,
        }
    }

    pub fn audio(channels: u32, sampling_frequency: u32) -> Self {
        Self {
            kind: StreamType::Audio,
            width: None,
            height: None,
            channels: Some(channels),
            sampling_frequency: Some(sampling_frequency),
        }
    }
}

/// One cue point: a segment starts at `timecode` and at byte `offset` of the
/// source. Cue lists are ordered by ascending timecode and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub timecode: u32,
    pub offset: u64,
}

/// Capability the container parser implements for the codec.
pub trait MediaSource {
    /// MIME type of the whole container, e.g. `video/webm`.
    fn mime_type(&self) -> &str;

    /// Tracks contributing to this stream.
    fn tracks(&self) -> &[Track];

    /// Cue list, ascending.
    fn cues(&self) -> &[Cue];

    /// Raw bytes of the segment starting at `timecode`, up to the next cue
    /// or end of media.
    fn media_segment(
        &mut self,
        timecode: u32,
    ) -> Result<Bytes, Box<dyn std::error::Error + Send + Sync>>;
}
