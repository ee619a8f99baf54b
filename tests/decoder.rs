use std::cell::Cell;

use mp3fan::{
    avec::{self, Decoder, Error, Leading},
    sans::{Kind, Section, Unit},
};

/// A decoder reading units from a fixed layout rather than from bytes.
///
/// Tags are laid out first, then frames, each with the given length. Offsets
/// listed as corrupt fail to decode.
#[derive(Default)]
struct Scripted {
    tags: Vec<usize>,
    frames: Vec<usize>,
    corrupt: Vec<usize>,
    calls: Cell<usize>,
}

impl Scripted {
    fn new(tags: &[usize], frames: &[usize]) -> Self {
        Self {
            tags: tags.to_vec(),
            frames: frames.to_vec(),
            ..Default::default()
        }
    }

    fn len(&self) -> usize {
        self.tags.iter().chain(&self.frames).sum()
    }

    fn units(&self) -> impl Iterator<Item = Section> + '_ {
        let kinds = self
            .tags
            .iter()
            .map(|&l| (Kind::Tag, l))
            .chain(self.frames.iter().map(|&l| (Kind::Frame, l)));

        kinds.scan(0, |offset, (kind, byte_length)| {
            let section = Section {
                kind,
                offset: *offset,
                byte_length,
                next_offset: *offset + byte_length,
            };
            *offset += byte_length;
            Some(section)
        })
    }
}

impl Decoder for Scripted {
    type Tag = ();
    type Frame = usize;

    fn read_tags(&self, _: &[u8]) -> Leading<(), usize> {
        self.calls.set(self.calls.get() + 1);

        let mut leading = Leading::default();
        for section in self.units() {
            match section.kind {
                Kind::Tag => leading.tags.push(Unit { section, value: () }),
                Kind::Frame => {
                    leading.first_frame = Some(Unit { section, value: 1 });
                    break;
                }
            }
        }
        leading
    }

    fn read_frame(&self, _: &[u8], offset: usize) -> Option<Unit<usize>> {
        self.calls.set(self.calls.get() + 1);

        if self.corrupt.contains(&offset) {
            return None;
        }

        self.units()
            .filter(|s| s.kind == Kind::Frame)
            .enumerate()
            .find(|(_, s)| s.offset == offset)
            .map(|(i, section)| Unit {
                section,
                value: i + 1,
            })
    }

    fn read_last_frame(&self, _: &[u8]) -> Option<Unit<usize>> {
        self.calls.set(self.calls.get() + 1);
        let count = self.frames.len();
        self.units().last().filter(|s| s.kind == Kind::Frame).map(|section| Unit {
            section,
            value: count,
        })
    }
}

#[test]
fn invalid_number_decodes_nothing() {
    let decoder = Scripted::new(&[50], &[104, 104, 104]);
    let r = vec![0; decoder.len()];

    for number in [0, -1, i64::MIN] {
        assert_eq!(
            avec::frame(&decoder, &r, number),
            Err(Error::InvalidFrameNumber(number))
        );
    }
    assert_eq!(decoder.calls.get(), 0);
}

#[test]
fn first_frame_needs_no_frame_read() {
    let decoder = Scripted::new(&[50], &[104, 104]);
    let r = vec![0; decoder.len()];

    let frame = avec::frame(&decoder, &r, 1).unwrap().unwrap();
    assert_eq!(frame.value, 1);
    assert_eq!(decoder.calls.get(), 1);
}

#[test]
fn lookup_stops_at_target() {
    let decoder = Scripted::new(&[], &[100; 10]);
    let r = vec![0; decoder.len()];

    let frame = avec::frame(&decoder, &r, 4).unwrap().unwrap();
    assert_eq!(frame.value, 4);
    assert_eq!(frame.section.offset, 300);
    // One sweep, then frames 2 to 4.
    assert_eq!(decoder.calls.get(), 4);
}

#[test]
fn lookup_every_frame() {
    let lengths = [104, 105, 417, 418, 104];
    let decoder = Scripted::new(&[10, 20], &lengths);
    let r = vec![0; decoder.len()];

    let mut offset = 30;
    for (i, length) in lengths.iter().enumerate() {
        let frame = avec::frame(&decoder, &r, i as i64 + 1).unwrap().unwrap();
        assert_eq!(frame.value, i + 1);
        assert_eq!(frame.section.offset, offset);
        offset += length;
    }
    assert_eq!(avec::frame(&decoder, &r, 6), Ok(None));
}

#[test]
fn corruption_is_not_end_of_stream() {
    let mut decoder = Scripted::new(&[50], &[104, 104, 104]);
    decoder.corrupt.push(50 + 208);
    let r = vec![0; decoder.len()];

    assert_eq!(
        avec::frame(&decoder, &r, 5),
        Err(Error::FrameRead {
            offset: 258,
            ordinal: 3
        })
    );
    assert_eq!(
        avec::summary(&decoder, &r),
        Err(Error::FrameRead {
            offset: 258,
            ordinal: 3
        })
    );
}

#[test]
fn traversal_ends_at_buffer_end() {
    let decoder = Scripted::new(&[], &[100, 100, 100]);
    // A shorter buffer than the layout describes.
    let r = vec![0; 150];

    let summary = avec::summary(&decoder, &r).unwrap();
    assert_eq!(summary.total_frames(), 2);
    assert_eq!(avec::frame(&decoder, &r, 3), Ok(None));
}

#[test]
fn stalled_frame_is_an_error() {
    /// Reports every frame as empty, so that it never advances.
    struct Stalled;

    impl Decoder for Stalled {
        type Tag = ();
        type Frame = ();

        fn read_tags(&self, _: &[u8]) -> Leading<(), ()> {
            Leading {
                tags: vec![],
                first_frame: self.read_frame(&[], 0),
            }
        }

        fn read_frame(&self, _: &[u8], offset: usize) -> Option<Unit<()>> {
            let section = Section {
                kind: Kind::Frame,
                offset,
                byte_length: 0,
                next_offset: offset,
            };
            Some(Unit { section, value: () })
        }

        fn read_last_frame(&self, _: &[u8]) -> Option<Unit<()>> {
            None
        }
    }

    let r = [0; 16];
    assert_eq!(
        avec::summary(&Stalled, &r),
        Err(Error::FrameRead {
            offset: 0,
            ordinal: 2
        })
    );
}

#[test]
fn info_passes_values_through() {
    let decoder = Scripted::new(&[50, 60], &[104, 104, 104]);
    let r = vec![0; decoder.len()];

    let info = avec::info(&decoder, &r);
    assert_eq!(info.tags.len(), 2);
    assert_eq!(info.first_frame.unwrap().value, 1);
    assert_eq!(info.last_frame.unwrap().value, 3);
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::InvalidFrameNumber(0).to_string(),
        "Invalid frame number (0), please specify a number greater than 0."
    );
    assert_eq!(
        Error::FrameRead {
            offset: 154,
            ordinal: 2
        }
        .to_string(),
        "Frame read error at offset 154 (frame 2)."
    );
}
