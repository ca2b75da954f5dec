use crate::two_track_media;
use anyhow::Result;
use bytes::Bytes;
use swarmcast_core::{ByteStream, Endianness, MemoryStream};
use swarmcast_metadata::{ContentFingerprint, DescriptorSummary, StreamDescriptor, StreamType};

#[test]
fn two_track_source_builds_a_multiplexed_descriptor() -> Result<()> {
    let mut media = two_track_media();
    let mut descriptor = StreamDescriptor::from_media(
        "blake3",
        &media,
        Some(Bytes::from_static(b"webm-init-data")),
    )?;
    let mut fingerprint = ContentFingerprint::new("blake3")?;
    descriptor.add_media_segments(&mut media, &mut fingerprint)?;

    assert_eq!(descriptor.stream_type, StreamType::Multiplexed);
    assert_eq!(descriptor.width, Some(640));
    assert_eq!(descriptor.height, Some(360));
    assert_eq!(descriptor.num_channels, Some(2));
    assert_eq!(descriptor.sampling_frequency, Some(44_100));

    // 250 kB of cue deltas splits well under 255 chunks at the smallest size.
    assert_eq!(descriptor.chunk_size, 1 << 15);
    assert_eq!(descriptor.media_segments.len(), 3);
    for segment in &descriptor.media_segments {
        let expected = (segment.length as u64).div_ceil(descriptor.chunk_size as u64);
        assert_eq!(segment.chunks.len() as u64, expected);
    }
    Ok(())
}

#[test]
fn descriptor_survives_the_wire_end_to_end() -> Result<()> {
    let mut media = two_track_media();
    let mut descriptor =
        StreamDescriptor::from_media("blake3", &media, Some(Bytes::from_static(b"init")))?;
    descriptor.bandwidth = 1_500_000;
    descriptor.add_media_segments(&mut media, &mut ContentFingerprint::new("blake3")?)?;

    let mut wire = MemoryStream::new(Endianness::Little);
    descriptor.serialize(&mut wire, &mut ContentFingerprint::new("blake3")?)?;

    wire.seek(0)?;
    let mut received = StreamDescriptor::new("blake3")?;
    received.unserialize(&mut wire, &mut ContentFingerprint::new("blake3")?)?;

    assert_eq!(received.stream_type, StreamType::Multiplexed);
    assert_eq!(received.mime_type, "video/webm");
    assert_eq!(received.bandwidth, 1_500_000);
    assert_eq!(received.init_segment.as_ref(), b"init");
    assert_eq!(received.media_segments, descriptor.media_segments);

    // The whole wire image was consumed — nothing trailing, nothing skipped.
    assert_eq!(wire.tell(), wire.size());
    Ok(())
}

#[test]
fn summary_of_a_received_descriptor_is_reportable() -> Result<()> {
    let mut media = two_track_media();
    let mut descriptor = StreamDescriptor::from_media("blake3", &media, None)?;
    descriptor.add_media_segments(&mut media, &mut ContentFingerprint::new("blake3")?)?;

    let mut wire = MemoryStream::new(Endianness::Little);
    descriptor.serialize(&mut wire, &mut ContentFingerprint::new("blake3")?)?;
    wire.seek(0)?;
    let mut received = StreamDescriptor::new("blake3")?;
    received.unserialize(&mut wire, &mut ContentFingerprint::new("blake3")?)?;

    let summary = DescriptorSummary::from(&received);
    let json = serde_json::to_value(&summary)?;
    assert_eq!(json["stream_type"], "multiplexed");
    assert_eq!(json["segments"].as_array().unwrap().len(), 3);
    assert_eq!(
        summary.total_chunks,
        received
            .media_segments
            .iter()
            .map(|s| s.chunks.len())
            .sum::<usize>()
    );
    Ok(())
}

#[test]
fn big_endian_wire_round_trips_too() -> Result<()> {
    let mut media = two_track_media();
    let mut descriptor = StreamDescriptor::from_media("crc32", &media, None)?;
    descriptor.add_media_segments(&mut media, &mut ContentFingerprint::new("crc32")?)?;

    let mut wire = MemoryStream::new(Endianness::Big);
    descriptor.serialize(&mut wire, &mut ContentFingerprint::new("crc32")?)?;

    wire.seek(0)?;
    let mut received = StreamDescriptor::new("crc32")?;
    received.unserialize(&mut wire, &mut ContentFingerprint::new("crc32")?)?;
    assert_eq!(received.media_segments, descriptor.media_segments);
    Ok(())
}
