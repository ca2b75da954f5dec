//! swarmcast integration test harness.
//!
//! End-to-end scenarios across the core and metadata crates: build a
//! descriptor from synthetic media, push it through memory- and file-backed
//! streams, and verify the round-trip and fingerprint laws hold across
//! crate boundaries.
//!
//! Everything here is deterministic — the synthetic media source generates
//! a fixed byte pattern cut by its cue list.

use bytes::Bytes;
use swarmcast_metadata::{Cue, MediaSource, Track};

// ── Harness ───────────────────────────────────────────────────────────────────

/// Deterministic media source shared by the scenarios: `total_size` bytes of
/// a fixed pattern, cut into segments by the cue list.
pub struct SyntheticMedia {
    pub mime_type: String,
    pub tracks: Vec<Track>,
    pub cues: Vec<Cue>,
    pub data: Vec<u8>,
}

impl SyntheticMedia {
    pub fn new(total_size: usize, cues: Vec<Cue>, tracks: Vec<Track>) -> Self {
        Self {
            mime_type: "video/webm".to_owned(),
            tracks,
            cues,
            data: (0..total_size).map(|i| (i * 7 % 256) as u8).collect(),
        }
    }
}

impl MediaSource for SyntheticMedia {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn cues(&self) -> &[Cue] {
        &self.cues
    }

    fn media_segment(
        &mut self,
        timecode: u32,
    ) -> Result<Bytes, Box<dyn std::error::Error + Send + Sync>> {
        let index = self
            .cues
            .iter()
            .position(|cue| cue.timecode == timecode)
            .ok_or_else(|| format!("no cue at timecode {timecode}"))?;
        let start = self.cues[index].offset as usize;
        let end = self
            .cues
            .get(index + 1)
            .map(|cue| cue.offset as usize)
            .unwrap_or(self.data.len());
        Ok(Bytes::copy_from_slice(&self.data[start..end]))
    }
}

/// The canonical two-track scenario: one 640x360 video track, one stereo
/// 44.1 kHz audio track, 300 kB of media cut at offsets 0/100000/250000.
pub fn two_track_media() -> SyntheticMedia {
    SyntheticMedia::new(
        300_000,
        vec![
            Cue { timecode: 0, offset: 0 },
            Cue { timecode: 1000, offset: 100_000 },
            Cue { timecode: 2000, offset: 250_000 },
        ],
        vec![Track::video(640, 360), Track::audio(2, 44_100)],
    )
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

mod descriptor_file;
mod end_to_end;
