//! Slice-based traversals.

use core::iter::FusedIterator;

use alloc::vec::Vec;

use thiserror::Error;

use crate::sans::Unit;

use super::{
    Decoder, Leading,
    histogram::{ByteLengths, Summary},
};

/// Errors occurring while traversing a slice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A frame number below one was requested.
    #[error("Invalid frame number ({0}), please specify a number greater than 0.")]
    InvalidFrameNumber(i64),
    /// No frame could be decoded where the previous frame ended.
    #[error("Frame read error at offset {offset} (frame {ordinal}).")]
    FrameRead { offset: usize, ordinal: usize },
}

/// Iterator over the frames following a first frame.
///
/// Each frame is read where the previous one ended, until the end of the slice
/// is reached. A frame which cannot be decoded yields an error, after which the
/// iterator is exhausted.
///
/// This struct is created by [`frames`].
#[derive(Debug)]
pub struct Frames<'a, D: Decoder + ?Sized> {
    decoder: &'a D,
    r: &'a [u8],
    offset: usize,
    ordinal: usize,
    is_done: bool,
}

/// Iterate over the frames of a slice which follow its first frame.
pub fn frames<'a, D: Decoder + ?Sized>(
    decoder: &'a D,
    r: &'a [u8],
    first: &Unit<D::Frame>,
) -> Frames<'a, D> {
    Frames {
        decoder,
        r,
        offset: first.section.next_offset,
        ordinal: 2,
        is_done: false,
    }
}

impl<D: Decoder + ?Sized> Frames<'_, D> {
    /// The 1-based position of the next frame to be read.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The offset of the next frame to be read.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<D: Decoder + ?Sized> Iterator for Frames<'_, D> {
    type Item = Result<Unit<D::Frame>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done || self.offset >= self.r.len() {
            return None;
        }

        let (offset, ordinal) = (self.offset, self.ordinal);

        // A frame must end past its start for traversal to terminate.
        let frame = self
            .decoder
            .read_frame(self.r, offset)
            .filter(|frame| frame.section.next_offset > offset);

        let Some(frame) = frame else {
            tracing::warn!(offset, ordinal, "frame read error");
            self.is_done = true;
            return Some(Err(Error::FrameRead { offset, ordinal }));
        };

        tracing::trace!(offset, ordinal, byte_length = frame.section.byte_length, "read frame");

        self.offset = frame.section.next_offset;
        self.ordinal += 1;

        Some(Ok(frame))
    }
}

impl<D: Decoder + ?Sized> FusedIterator for Frames<'_, D> {}

/// Read the tags at the start of a slice, and the first frame following them.
pub fn leading<D: Decoder + ?Sized>(decoder: &D, r: &[u8]) -> Leading<D::Tag, D::Frame> {
    decoder.read_tags(r)
}

/// Find a frame by its 1-based position in a slice.
///
/// Returns `Ok(None)` if the slice holds fewer frames. A frame number below one
/// is rejected before any decoding takes place.
pub fn frame<D: Decoder + ?Sized>(
    decoder: &D,
    r: &[u8],
    number: i64,
) -> Result<Option<Unit<D::Frame>>, Error> {
    if number < 1 {
        return Err(Error::InvalidFrameNumber(number));
    }

    // No slice holds more frames than it has bytes.
    let Ok(target) = usize::try_from(number) else {
        return Ok(None);
    };

    let Some(first) = decoder.read_tags(r).first_frame else {
        return Ok(None);
    };

    if target == 1 {
        return Ok(Some(first));
    }

    let mut frames = frames(decoder, r, &first);
    loop {
        let ordinal = frames.ordinal();
        let Some(frame) = frames.next().transpose()? else {
            return Ok(None);
        };

        if ordinal == target {
            return Ok(Some(frame));
        }
    }
}

/// Count the tags and frames of a slice by their length in bytes.
///
/// Fails on the first frame which cannot be decoded, discarding any counts
/// made so far.
pub fn summary<D: Decoder + ?Sized>(decoder: &D, r: &[u8]) -> Result<Summary, Error> {
    let Leading { tags, first_frame } = decoder.read_tags(r);

    let mut summary = Summary::default();
    summary.tags.extend(tags.iter().map(|tag| &tag.section));

    let Some(first) = first_frame else {
        return Ok(summary);
    };

    let mut lengths = ByteLengths::new();
    lengths.add(&first.section);

    for frame in frames(decoder, r, &first) {
        lengths.add(&frame?.section);
    }

    summary.frames = Some(lengths);

    Ok(summary)
}

/// The tags, first frame and last frame of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info<T, F> {
    pub tags: Vec<Unit<T>>,
    pub first_frame: Option<Unit<F>>,
    pub last_frame: Option<Unit<F>>,
}

/// Read the tags, first frame and last frame of a slice.
pub fn info<D: Decoder + ?Sized>(decoder: &D, r: &[u8]) -> Info<D::Tag, D::Frame> {
    let Leading { tags, first_frame } = decoder.read_tags(r);

    Info {
        tags,
        first_frame,
        last_frame: decoder.read_last_frame(r),
    }
}
