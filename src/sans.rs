//! Stateless decoders for the structural units of an MP3 stream.
//!
//! Each decoder reads exactly one unit starting at a given offset of a byte
//! slice, and returns it along with a [`Section`] describing the span of bytes
//! it covers. Decoders never read outside the slice; a unit which cannot be
//! decoded at an offset is reported as `None`.
//!
//! This module is intended for applications that need to drive decoding
//! themselves. See [`crate::avec`] for traversals of a whole stream.
//!
//! # Layout
//!
//! An MP3 stream opens with zero or more tags: an [`id3v2`] block, and
//! possibly a [`xing`] information frame which looks like, but is not, audio.
//! The first true audio [`frame`] ends the tags. Every later unit is expected
//! to be another frame, starting exactly where the previous one ended.

use alloc::vec::Vec;

use either::Either::{self, Left, Right};

pub mod frame;
pub mod id3v2;
pub mod xing;

pub use frame::{Frame, read_frame};

/// The kind of unit a [`Section`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Non-audio metadata.
    Tag,
    /// Audio data with its own header.
    Frame,
}

/// The span of bytes occupied by a decoded unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind: Kind,
    /// Offset of the first byte of the unit.
    pub offset: usize,
    /// Number of bytes in the unit, never zero.
    pub byte_length: usize,
    /// Offset at which the following unit is expected to begin.
    pub next_offset: usize,
}

impl Section {
    pub(crate) fn new(kind: Kind, offset: usize, byte_length: usize) -> Self {
        Self {
            kind,
            offset,
            byte_length,
            next_offset: offset + byte_length,
        }
    }
}

/// A decoded unit, pairing its fields with the span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit<T> {
    pub section: Section,
    pub value: T,
}

/// A decoded tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Id3v2(id3v2::Id3v2),
    Xing(xing::Xing),
}

/// A unit found while sweeping the start of a stream, a tag or a frame.
pub type Segment = Either<Unit<Tag>, Unit<Frame>>;

/// Read every tag at the start of a slice, ending with the first frame.
///
/// At each offset, an ID3v2 tag is tried first, then a frame, which is taken as
/// a tag if it carries Xing information. Sweeping resumes immediately after any
/// unit found, and otherwise moves on by a single byte, so unrecognised bytes
/// between tags are skipped. The returned segments hold at most one frame,
/// always in last place.
pub fn read_tags(r: &[u8]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut i = 0;

    while i < r.len() {
        let segment = if let Some(unit) = id3v2::read_tag(r, i) {
            Left(unit.map(Tag::Id3v2))
        } else if let Some(frame) = read_frame(r, i) {
            match xing::read_tag_in(r, &frame) {
                Some(unit) => Left(unit.map(Tag::Xing)),
                None => Right(frame),
            }
        } else {
            i += 1;
            continue;
        };

        match &segment {
            Left(tag) => {
                tracing::debug!(offset = i, byte_length = tag.section.byte_length, "found tag");
                i = tag.section.next_offset;
                segments.push(segment);
            }
            Right(frame) => {
                tracing::debug!(offset = i, byte_length = frame.section.byte_length, "found first frame");
                segments.push(segment);
                break;
            }
        }
    }

    segments
}

/// Read the final frame of a slice.
///
/// Scans backwards from the last byte for a sync candidate which decodes as a
/// frame header.
pub fn read_last_frame(r: &[u8]) -> Option<Unit<Frame>> {
    (0..r.len())
        .rev()
        .filter(|&i| r[i] == 0xFF)
        .find_map(|i| read_frame(r, i))
}

impl<T> Unit<T> {
    /// Convert the value of this unit, keeping its section.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Unit<U> {
        Unit {
            section: self.section,
            value: f(self.value),
        }
    }
}

/// Take an exact number of bytes from an offset in a slice.
pub(crate) fn take<const N: usize>(r: &[u8], i: usize) -> Option<[u8; N]> {
    r.get(i..i.checked_add(N)?)?.try_into().ok()
}
