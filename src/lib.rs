#![no_std]

//! An inspector for the structure of MP3 files.
//!
//! Mp3fan walks an MP3 byte stream unit by unit, separating the leading
//! metadata tags from the audio frames which follow them. It can look up a
//! single frame by its position in the stream, and fold the whole stream into
//! histograms of tag and frame sizes.
//!
//! Most users should begin with the functions in the [`avec`] module, which
//! traverse a complete in-memory buffer. The [`sans`] module exposes the
//! underlying stateless decoders, each reading one unit at a given offset.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `cli`: build the `mp3fan` command-line tool (default).

extern crate alloc;

pub mod avec;
pub mod sans;
