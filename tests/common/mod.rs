#![allow(dead_code)]

//! Builders for the byte layout of MP3 streams.

/// MPEG 1 Layer III bitrates in kbit/s, by index.
const BITRATES: [u32; 15] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// Header of an unprotected MPEG 1 Layer III stereo frame at 44.1 kHz.
pub fn frame_header(bitrate_index: u8, padding: bool) -> [u8; 4] {
    [0xFF, 0xFB, bitrate_index << 4 | (padding as u8) << 1, 0x00]
}

/// Length of a frame built by [`frame`].
pub fn frame_length(bitrate_index: u8, padding: bool) -> usize {
    (1152 * BITRATES[bitrate_index as usize] as usize * 125) / 44100 + padding as usize
}

/// A complete frame with a zeroed body.
pub fn frame(bitrate_index: u8, padding: bool) -> Vec<u8> {
    let mut r = vec![0; frame_length(bitrate_index, padding)];
    r[..4].copy_from_slice(&frame_header(bitrate_index, padding));
    r
}

/// A 104-byte frame at 32 kbit/s.
pub fn small_frame() -> Vec<u8> {
    frame(1, false)
}

/// Encode a 28-bit integer in seven bits per byte.
pub fn synchsafe(n: u32) -> [u8; 4] {
    [
        (n >> 21) as u8 & 0x7F,
        (n >> 14) as u8 & 0x7F,
        (n >> 7) as u8 & 0x7F,
        n as u8 & 0x7F,
    ]
}

/// An ID3v2.3 tag holding frames, followed by zeroed padding.
pub fn id3v2_tag(frames: &[(&str, &[u8])], padding: usize) -> Vec<u8> {
    versioned_id3v2(3, 0, &[], frames, padding)
}

/// An ID3v2 tag of any major version, with header flags and an extended header
/// placed ahead of its frames.
///
/// Frame headers follow the version: three-byte identifiers and sizes for 2.2,
/// synchsafe sizes for 2.4.
pub fn versioned_id3v2(
    major: u8,
    flags: u8,
    extended_header: &[u8],
    frames: &[(&str, &[u8])],
    padding: usize,
) -> Vec<u8> {
    let mut body = extended_header.to_vec();
    for (id, content) in frames {
        let size = content.len() as u32;
        body.extend_from_slice(id.as_bytes());
        match major {
            2 => body.extend_from_slice(&size.to_be_bytes()[1..]),
            3 => body.extend_from_slice(&size.to_be_bytes()),
            _ => body.extend_from_slice(&synchsafe(size)),
        }
        if major > 2 {
            body.extend_from_slice(&[0, 0]);
        }
        body.extend_from_slice(content);
    }
    body.resize(body.len() + padding, 0);

    let mut r = vec![b'I', b'D', b'3', major, 0, flags];
    r.extend_from_slice(&synchsafe(body.len() as u32));
    r.extend(body);
    r
}

/// An ID3v2.3 tag of a total length, holding only padding.
pub fn empty_id3v2(byte_length: usize) -> Vec<u8> {
    id3v2_tag(&[], byte_length - 10)
}

/// A frame carrying a Xing tag with a frame count.
pub fn xing_frame(identifier: &[u8; 4], frames: u32) -> Vec<u8> {
    let mut r = frame(9, false);
    // Header, then 32 bytes of stereo side information.
    r[36..40].copy_from_slice(identifier);
    r[40..44].copy_from_slice(&1u32.to_be_bytes());
    r[44..48].copy_from_slice(&frames.to_be_bytes());
    r
}

/// A frame with the given header carrying a Xing tag, placed after a number of
/// bytes of side information. Only the fields given are flagged as present.
pub fn xing_tag(
    header: [u8; 4],
    side_info_length: usize,
    frames: Option<u32>,
    bytes: Option<u32>,
    toc: bool,
    quality: Option<u32>,
) -> Vec<u8> {
    let flags = frames.is_some() as u32
        | (bytes.is_some() as u32) << 1
        | (toc as u32) << 2
        | (quality.is_some() as u32) << 3;

    let mut r = header.to_vec();
    r.resize(4 + side_info_length, 0);
    r.extend_from_slice(b"Xing");
    r.extend_from_slice(&flags.to_be_bytes());
    for value in [frames, bytes].into_iter().flatten() {
        r.extend_from_slice(&value.to_be_bytes());
    }
    if toc {
        r.extend(0..100u8);
    }
    if let Some(quality) = quality {
        r.extend_from_slice(&quality.to_be_bytes());
    }
    r
}

/// Concatenate parts of a stream.
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// A 50-byte tag followed by three 104-byte frames.
pub fn tagged_stream() -> Vec<u8> {
    let frame = small_frame();
    concat(&[&empty_id3v2(50), &frame, &frame, &frame])
}
