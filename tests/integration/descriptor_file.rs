//! Descriptor files on disk: serialize through a FileStream, reopen
//! read-only, unserialize.

use crate::two_track_media;
use anyhow::Result;
use bytes::Bytes;
use swarmcast_core::{ByteStream, Endianness, FileStream};
use swarmcast_metadata::{ContentFingerprint, StreamDescriptor};

#[test]
fn descriptor_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stream.swarmcast");

    let mut media = two_track_media();
    let mut descriptor =
        StreamDescriptor::from_media("blake3", &media, Some(Bytes::from_static(b"init")))?;
    descriptor.add_media_segments(&mut media, &mut ContentFingerprint::new("blake3")?)?;

    let mut out = FileStream::create(&path, Endianness::Little)?;
    let mut write_fp = ContentFingerprint::new("blake3")?;
    descriptor.serialize(&mut out, &mut write_fp)?;
    drop(out);

    let mut input = FileStream::open(&path, Endianness::Little)?;
    let mut received = StreamDescriptor::new("blake3")?;
    let mut read_fp = ContentFingerprint::new("blake3")?;
    received.unserialize(&mut input, &mut read_fp)?;

    assert_eq!(received.mime_type, descriptor.mime_type);
    assert_eq!(received.chunk_size, descriptor.chunk_size);
    assert_eq!(received.init_segment, descriptor.init_segment);
    assert_eq!(received.media_segments, descriptor.media_segments);
    assert_eq!(input.tell(), input.size());

    // Same fingerprint on both ends of the file.
    assert_eq!(write_fp.finish(), read_fp.finish());
    Ok(())
}

#[test]
fn truncated_descriptor_file_fails_cleanly() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stream.swarmcast");

    let mut media = two_track_media();
    let mut descriptor = StreamDescriptor::from_media("blake3", &media, None)?;
    descriptor.add_media_segments(&mut media, &mut ContentFingerprint::new("blake3")?)?;

    let mut out = FileStream::create(&path, Endianness::Little)?;
    descriptor.serialize(&mut out, &mut ContentFingerprint::new("blake3")?)?;
    drop(out);

    // Chop the tail off the file.
    let full = std::fs::read(&path)?;
    std::fs::write(&path, &full[..full.len() - 16])?;

    let mut input = FileStream::open(&path, Endianness::Little)?;
    let mut received = StreamDescriptor::new("blake3")?;
    let result = received.unserialize(&mut input, &mut ContentFingerprint::new("blake3")?);
    assert!(result.is_err());
    Ok(())
}
