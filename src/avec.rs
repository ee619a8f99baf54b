//! Traversals of a complete MP3 stream held in memory.
//!
//! The functions in this module walk a byte slice from unit to unit, using a
//! [`Decoder`] to read each one. Traversals keep no state beyond the current
//! offset, and never modify the slice, so any number may run over the same
//! stream.
//!
//! # Example
//!
//! ```
//! use mp3fan::avec::Mpeg;
//!
//! let data = std::fs::read("song.mp3")?;
//!
//! let summary = mp3fan::avec::summary(&Mpeg, &data)?;
//! println!("{} frames", summary.total_frames());
//!
//! if let Some(frame) = mp3fan::avec::frame(&Mpeg, &data, 100)? {
//!     println!("{} kbit/s", frame.value.bitrate);
//! }
//! ```

use alloc::vec::Vec;

use either::Either::{Left, Right};

use crate::sans::{self, Unit};

pub mod histogram;
pub mod slice;

pub use histogram::{ByteLengths, Summary};
pub use slice::{Error, Frames, Info, frame, frames, info, leading, summary};

/// Decode the units of a stream.
///
/// Traversals call a decoder for every unit they visit, and rely only on the
/// [`sans::Section`] of each; tag and frame values are passed through to the
/// caller untouched.
///
/// [`Mpeg`] implements this trait for real streams.
pub trait Decoder {
    /// The decoded value of a tag.
    type Tag;
    /// The decoded value of a frame.
    type Frame;

    /// Read every tag at the start of a slice, along with the first frame.
    fn read_tags(&self, r: &[u8]) -> Leading<Self::Tag, Self::Frame>;

    /// Read the single frame starting at an offset in a slice.
    ///
    /// Returns `None` if no valid frame header is found there.
    fn read_frame(&self, r: &[u8], offset: usize) -> Option<Unit<Self::Frame>>;

    /// Read the final frame of a slice.
    fn read_last_frame(&self, r: &[u8]) -> Option<Unit<Self::Frame>>;
}

/// The tags at the start of a stream, and the frame following them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leading<T, F> {
    pub tags: Vec<Unit<T>>,
    pub first_frame: Option<Unit<F>>,
}

impl<T, F> Default for Leading<T, F> {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            first_frame: None,
        }
    }
}

/// Decoder for MPEG audio streams with ID3v2 and Xing tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mpeg;

impl Decoder for Mpeg {
    type Tag = sans::Tag;
    type Frame = sans::Frame;

    fn read_tags(&self, r: &[u8]) -> Leading<Self::Tag, Self::Frame> {
        let mut leading = Leading::default();

        // The sweep ends with the first frame, if it finds one.
        for segment in sans::read_tags(r) {
            match segment {
                Left(tag) => leading.tags.push(tag),
                Right(frame) => leading.first_frame = Some(frame),
            }
        }

        leading
    }

    fn read_frame(&self, r: &[u8], offset: usize) -> Option<Unit<Self::Frame>> {
        sans::read_frame(r, offset)
    }

    fn read_last_frame(&self, r: &[u8]) -> Option<Unit<Self::Frame>> {
        sans::read_last_frame(r)
    }
}
