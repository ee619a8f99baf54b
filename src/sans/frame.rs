//! Decoder for MPEG audio frame headers.

use tartan_bitfield::bitfield;
use zerocopy::TryFromBytes;

use super::{Kind, Section, Unit, take};

bitfield! {
    struct FrameHeader(u32) {
        [0..2] emphasis: u8,
        [2] original,
        [3] copyright,
        [4..6] mode_extension: u8,
        [6..8] channel_mode: u8,
        [8] private,
        [9] padding,
        [10..12] sampling_rate_index: u8,
        [12..16] bitrate_index: u8,
        [16] unprotected,
        [17..19] layer: u8,
        [19..21] version: u8,
        [21..32] sync: u16,
    }
}

/// MPEG audio version.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromBytes)]
pub enum Version {
    Mpeg25 = 0b00,
    Mpeg2 = 0b10,
    Mpeg1 = 0b11,
}

/// MPEG audio layer.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromBytes)]
pub enum Layer {
    III = 0b01,
    II = 0b10,
    I = 0b11,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromBytes)]
pub enum ChannelMode {
    Stereo = 0b00,
    JointStereo = 0b01,
    DualChannel = 0b10,
    Mono = 0b11,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromBytes)]
pub enum Emphasis {
    None = 0b00,
    FiftyFifteen = 0b01,
    Reserved = 0b10,
    CcittJ17 = 0b11,
}

/// Bitrates in kbit/s for indices 1 to 14, by version and layer.
const BITRATES: [[u16; 14]; 5] = [
    // MPEG 1, Layer I
    [32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
    // MPEG 1, Layer II
    [32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
    // MPEG 1, Layer III
    [32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
    // MPEG 2 and 2.5, Layer I
    [32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
    // MPEG 2 and 2.5, Layers II and III
    [8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
];

/// Sampling rates in Hz for indices 0 to 2, by version.
const SAMPLING_RATES: [[u32; 3]; 3] = [
    [44100, 48000, 32000],
    [22050, 24000, 16000],
    [11025, 12000, 8000],
];

/// The decoded header of an audio frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub version: Version,
    pub layer: Layer,
    /// Whether a 16-bit CRC follows the header.
    pub is_protected: bool,
    /// Bitrate in kbit/s.
    pub bitrate: u32,
    /// Sampling rate in Hz.
    pub sampling_rate: u32,
    pub padding: bool,
    pub private: bool,
    pub channel_mode: ChannelMode,
    pub mode_extension: u8,
    pub copyright: bool,
    pub original: bool,
    pub emphasis: Emphasis,
    /// Number of samples encoded per channel.
    pub samples: u32,
}

impl Frame {
    fn from_header(h: &FrameHeader) -> Option<Self> {
        if h.sync() != 0x7FF {
            return None;
        }

        let version: Version = zerocopy::try_transmute!(h.version()).ok()?;
        let layer: Layer = zerocopy::try_transmute!(h.layer()).ok()?;
        let channel_mode: ChannelMode = zerocopy::try_transmute!(h.channel_mode()).ok()?;
        let emphasis: Emphasis = zerocopy::try_transmute!(h.emphasis()).ok()?;

        let row = match (version, layer) {
            (Version::Mpeg1, Layer::I) => 0,
            (Version::Mpeg1, Layer::II) => 1,
            (Version::Mpeg1, Layer::III) => 2,
            (_, Layer::I) => 3,
            (_, _) => 4,
        };

        // Index 0 marks a free-format stream, whose frame sizes can't be known.
        let bitrate = *BITRATES[row].get((h.bitrate_index() as usize).checked_sub(1)?)?;

        let sampling_rate = match version {
            Version::Mpeg1 => SAMPLING_RATES[0],
            Version::Mpeg2 => SAMPLING_RATES[1],
            Version::Mpeg25 => SAMPLING_RATES[2],
        };
        let sampling_rate = *sampling_rate.get(h.sampling_rate_index() as usize)?;

        let samples = match (version, layer) {
            (_, Layer::I) => 384,
            (_, Layer::II) | (Version::Mpeg1, Layer::III) => 1152,
            (_, Layer::III) => 576,
        };

        Some(Self {
            version,
            layer,
            is_protected: !h.unprotected(),
            bitrate: bitrate as u32,
            sampling_rate,
            padding: h.padding(),
            private: h.private(),
            channel_mode,
            mode_extension: h.mode_extension(),
            copyright: h.copyright(),
            original: h.original(),
            emphasis,
            samples,
        })
    }

    /// Number of bytes in the frame, including its header.
    pub fn byte_length(&self) -> usize {
        let padding = match (self.padding, self.layer) {
            (false, _) => 0,
            (true, Layer::I) => 4,
            (true, _) => 1,
        };

        // Bytes per second are `bitrate * 1000 / 8`.
        let bytes = self.samples as u64 * self.bitrate as u64 * 125 / self.sampling_rate as u64;

        bytes as usize + padding
    }

    /// Number of bytes of Layer III side information following the header.
    pub fn side_info_length(&self) -> usize {
        match (self.version, self.channel_mode) {
            (Version::Mpeg1, ChannelMode::Mono) => 17,
            (Version::Mpeg1, _) => 32,
            (_, ChannelMode::Mono) => 9,
            (_, _) => 17,
        }
    }
}

/// Decode the frame whose header starts at an offset in a slice.
///
/// Only the four header bytes need to lie within the slice.
pub fn read_frame(r: &[u8], i: usize) -> Option<Unit<Frame>> {
    let header = FrameHeader(u32::from_be_bytes(take(r, i)?));
    let frame = Frame::from_header(&header)?;

    Some(Unit {
        section: Section::new(Kind::Frame, i, frame.byte_length()),
        value: frame,
    })
}
