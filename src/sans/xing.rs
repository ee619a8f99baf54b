//! Decoder for Xing and Info tags.
//!
//! Encoders write these into the first frame of a stream, in place of audio,
//! to summarise the stream for players. The frame carrying the tag is a valid
//! Layer III frame, so any frame read at the start of a stream should be
//! checked for one with [`read_tag_in`].

use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use super::{
    Kind, Section, Unit,
    frame::{Frame, Layer, read_frame},
    take,
};

#[repr(C, packed)]
#[derive(FromBytes)]
struct TagHeader {
    identifier: [u8; 4],
    flags: [u8; 4],
}

bitfield! {
    struct TagFlags(u32) {
        [0] has_frames,
        [1] has_bytes,
        [2] has_toc,
        [3] has_quality,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier {
    /// Written for variable bitrate streams.
    Xing,
    /// Written for constant bitrate streams.
    Info,
}

/// A decoded Xing or Info tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xing {
    pub identifier: Identifier,
    /// Header of the frame carrying the tag.
    pub header: Frame,
    /// Number of frames in the stream.
    pub frames: Option<u32>,
    /// Number of bytes in the stream.
    pub bytes: Option<u32>,
    /// Encoder quality indicator, 0 (best) to 100 (worst).
    pub quality: Option<u32>,
}

/// Decode the Xing or Info tag in the frame starting at an offset in a slice.
pub fn read_tag(r: &[u8], i: usize) -> Option<Unit<Xing>> {
    read_tag_in(r, &read_frame(r, i)?)
}

/// Decode the Xing or Info tag carried by a frame already read from a slice.
pub fn read_tag_in(r: &[u8], frame: &Unit<Frame>) -> Option<Unit<Xing>> {
    let Unit { section, value } = frame;

    if value.layer != Layer::III {
        return None;
    }

    let crc = if value.is_protected { 2 } else { 0 };
    let mut j = section.offset + 4 + crc + value.side_info_length();

    let TagHeader { identifier, flags } = zerocopy::transmute!(take::<8>(r, j)?);
    j += 8;

    let identifier = match &identifier {
        b"Xing" => Identifier::Xing,
        b"Info" => Identifier::Info,
        _ => return None,
    };

    let flags = TagFlags(u32::from_be_bytes(flags));

    let frames = read_field(r, &mut j, flags.has_frames())?;
    let bytes = read_field(r, &mut j, flags.has_bytes())?;
    if flags.has_toc() {
        j += 100;
    }
    let quality = read_field(r, &mut j, flags.has_quality())?;

    Some(Unit {
        section: Section::new(Kind::Tag, section.offset, section.byte_length),
        value: Xing {
            identifier,
            header: value.clone(),
            frames,
            bytes,
            quality,
        },
    })
}

/// Read an optional big-endian field, advancing the offset past it if present.
fn read_field(r: &[u8], i: &mut usize, is_present: bool) -> Option<Option<u32>> {
    if !is_present {
        return Some(None);
    }

    let value = u32::from_be_bytes(take(r, *i)?);
    *i += 4;

    Some(Some(value))
}
