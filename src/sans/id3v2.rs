//! Decoder for ID3v2 tags.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use super::{Kind, Section, Unit, take};

#[repr(C, packed)]
#[derive(FromBytes)]
struct TagHeader {
    identifier: [u8; 3],
    major: u8,
    revision: u8,
    flags: u8,
    size: [u8; 4],
}

bitfield! {
    struct TagFlags(u8) {
        [4] footer,
        [5] experimental,
        [6] extended_header,
        [7] unsynchronisation,
    }
}

/// A decoded ID3v2 tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v2 {
    /// Major version, 2 to 4.
    pub major: u8,
    pub revision: u8,
    pub flags: Flags,
    /// Size of the tag excluding its header and footer.
    pub size: u32,
    pub frames: Vec<Id3Frame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub unsynchronisation: bool,
    pub extended_header: bool,
    pub experimental: bool,
    pub footer: bool,
}

/// A frame within an ID3v2 tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Frame {
    /// Three (version 2.2) or four character frame identifier.
    pub id: String,
    /// Size of the frame excluding its header.
    pub size: u32,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A text information frame.
    Text(String),
    /// A comment frame.
    Comment {
        language: String,
        description: String,
        text: String,
    },
    /// Any frame not decoded further.
    Opaque,
}

/// Decode the ID3v2 tag whose header starts at an offset in a slice.
///
/// Frames are decoded from the part of the tag lying within the slice.
pub fn read_tag(r: &[u8], i: usize) -> Option<Unit<Id3v2>> {
    let TagHeader {
        identifier,
        major,
        revision,
        flags,
        size,
    } = zerocopy::transmute!(take::<10>(r, i)?);

    if &identifier != b"ID3" || !(2..=4).contains(&major) || revision == 0xFF {
        return None;
    }

    let size = synchsafe(size)?;
    let flags = TagFlags(flags);
    let flags = Flags {
        unsynchronisation: flags.unsynchronisation(),
        extended_header: flags.extended_header(),
        experimental: flags.experimental(),
        footer: major == 4 && flags.footer(),
    };

    let body = i + 10;
    let end = (body + size as usize).min(r.len());

    let start = match (major, flags.extended_header) {
        // Version 2.2 uses the extended header bit to flag compression instead.
        (2, true) => None,
        // A damaged extended header hides the frames, but not the tag.
        (_, true) => extended_header_length(r, body, major).and_then(|l| body.checked_add(l)),
        (_, false) => Some(body),
    };
    let frames = start.map_or_else(Vec::new, |start| read_frames(&r[..end], start, major));

    let byte_length = 10 + size as usize + if flags.footer { 10 } else { 0 };

    Some(Unit {
        section: Section::new(Kind::Tag, i, byte_length),
        value: Id3v2 {
            major,
            revision,
            flags,
            size,
            frames,
        },
    })
}

fn extended_header_length(r: &[u8], i: usize, major: u8) -> Option<usize> {
    let size = take::<4>(r, i)?;

    // Version 2.3 excludes the size field itself.
    Some(match major {
        3 => 4 + u32::from_be_bytes(size) as usize,
        _ => synchsafe(size)? as usize,
    })
}

fn read_frames(r: &[u8], mut i: usize, major: u8) -> Vec<Id3Frame> {
    let mut frames = Vec::new();

    while let Some((id, size, header_length)) = read_frame_header(r, i, major) {
        let start = i + header_length;
        let Some(body) = r.get(start..start + size as usize) else {
            break;
        };

        let content = match id.as_str() {
            "TXXX" | "TXX" => Content::Opaque,
            "COMM" | "COM" => read_comment(body).unwrap_or(Content::Opaque),
            id if id.starts_with('T') => match body.split_first() {
                Some((&encoding, text)) => Content::Text(decode_text(encoding, text)),
                None => Content::Opaque,
            },
            _ => Content::Opaque,
        };

        frames.push(Id3Frame { id, size, content });
        i = start + size as usize;
    }

    frames
}

fn read_frame_header(r: &[u8], i: usize, major: u8) -> Option<(String, u32, usize)> {
    let (id, size, header_length) = if major == 2 {
        let [_, _, _, x, y, z] = take::<6>(r, i)?;
        (r.get(i..i + 3)?, u32::from_be_bytes([0, x, y, z]), 6)
    } else {
        let [_, _, _, _, w, x, y, z, ..] = take::<10>(r, i)?;
        let size = if major == 4 {
            synchsafe([w, x, y, z])?
        } else {
            u32::from_be_bytes([w, x, y, z])
        };
        (r.get(i..i + 4)?, size, 10)
    };

    // Padding, or anything which isn't a frame identifier, ends the frames.
    if !id
        .iter()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return None;
    }

    let id = id.iter().map(|&c| c as char).collect();
    Some((id, size, header_length))
}

fn read_comment(r: &[u8]) -> Option<Content> {
    let (&encoding, r) = r.split_first()?;
    let language = r.get(..3)?.iter().map(|&c| c as char).collect();
    let (description, text) = split_terminated(encoding, r.get(3..)?);

    Some(Content::Comment {
        language,
        description: decode_text(encoding, description),
        text: decode_text(encoding, text),
    })
}

/// Split a string at its terminator, which is two bytes wide for UTF-16.
fn split_terminated(encoding: u8, r: &[u8]) -> (&[u8], &[u8]) {
    let position = match encoding {
        1 | 2 => r
            .chunks_exact(2)
            .position(|c| c[0] == 0 && c[1] == 0)
            .map(|p| (p * 2, 2)),
        _ => r.iter().position(|&c| c == 0).map(|p| (p, 1)),
    };

    match position {
        Some((p, width)) => (&r[..p], &r[p + width..]),
        None => (r, &r[r.len()..]),
    }
}

/// Decode a string in one of the four ID3v2 text encodings.
fn decode_text(encoding: u8, r: &[u8]) -> String {
    let text: String = match encoding {
        0 => r.iter().map(|&c| c as char).collect(),
        1 => match r {
            [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, true),
            [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, false),
            _ => decode_utf16(r, false),
        },
        2 => decode_utf16(r, false),
        _ => String::from_utf8_lossy(r).into_owned(),
    };

    text.trim_end_matches('\0').to_string()
}

fn decode_utf16(r: &[u8], is_little_endian: bool) -> String {
    let units = r.chunks_exact(2).map(|c| {
        if is_little_endian {
            u16::from_le_bytes([c[0], c[1]])
        } else {
            u16::from_be_bytes([c[0], c[1]])
        }
    });

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Decode a 28-bit integer stored in the low seven bits of four bytes.
fn synchsafe(r: [u8; 4]) -> Option<u32> {
    r.iter().try_fold(0, |acc, &b| (b < 0x80).then(|| acc << 7 | b as u32))
}
