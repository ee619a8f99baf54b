//! Histograms of unit sizes.

use alloc::vec::Vec;

use crate::sans::Section;

/// A count of units by their length in bytes.
///
/// Lengths are kept in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteLengths(Vec<(usize, usize)>);

impl ByteLengths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more unit with the length of a section.
    pub fn add(&mut self, section: &Section) {
        let length = section.byte_length;

        match self.0.iter_mut().find(|(l, _)| *l == length) {
            Some((_, count)) => *count += 1,
            None => self.0.push((length, 1)),
        }
    }

    /// The number of units counted with a length, or zero.
    pub fn get(&self, length: usize) -> usize {
        self.0
            .iter()
            .find(|(l, _)| *l == length)
            .map_or(0, |(_, count)| *count)
    }

    /// The number of units counted.
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }

    /// Pairs of length and count, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().copied()
    }

    /// The number of distinct lengths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> Extend<&'a Section> for ByteLengths {
    fn extend<I: IntoIterator<Item = &'a Section>>(&mut self, iter: I) {
        iter.into_iter().for_each(|section| self.add(section));
    }
}

/// Histograms of the tags and frames of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub tags: ByteLengths,
    /// Absent if the stream holds no frames at all.
    pub frames: Option<ByteLengths>,
}

impl Summary {
    /// The number of frames counted, zero if there were none.
    pub fn total_frames(&self) -> usize {
        self.frames.as_ref().map_or(0, ByteLengths::total)
    }
}
