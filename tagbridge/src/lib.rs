//! Encode, decode, and translate ID3v2 frame bodies and Lyrics3v2 fields.
//!
//! # Overview
//!
//! An ID3v2 frame body is modeled as an ordered list of [`TypedField`](field::TypedField)s. The layout
//! of a body is chosen by its [`FrameId`](id3::v2::FrameId), and decoding a body is simply decoding
//! each of its fields in order.
//!
//! Lyrics3v2 tags are much simpler, made up of a handful of text fields. A subset of ID3v2 frames can
//! be [translated](translate) into Lyrics3v2 fields.
//!
//! # Examples
//!
//! ## Decoding a frame body
//!
//! ```rust
//! # fn main() -> tagbridge::error::Result<()> {
//! use tagbridge::field::names;
//! use tagbridge::id3::v2::{FrameBody, FrameId};
//!
//! // An ISO-8859-1 encoded `TALB` frame
//! let body = FrameBody::from_bytes(FrameId::new("TALB")?, b"\x00Moon Safari")?;
//! assert_eq!(body.text(names::TEXT), Some("Moon Safari"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Building a Lyrics3v2 tag from ID3v2 frames
//!
//! ```rust
//! # fn main() -> tagbridge::error::Result<()> {
//! use tagbridge::config::WriteOptions;
//! use tagbridge::id3::v2::Id3v2Frame;
//! use tagbridge::lyrics3::Lyrics3v2Tag;
//!
//! let frames = [
//! 	Id3v2Frame::text("TIT2", "La femme d'argent")?,
//! 	Id3v2Frame::text("TALB", "Moon Safari")?,
//! 	// No Lyrics3v2 counterpart, skipped
//! 	Id3v2Frame::text("TBPM", "93")?,
//! ];
//!
//! let tag = Lyrics3v2Tag::from_id3v2_frames(&frames)?;
//! assert_eq!(tag.title(), Some("La femme d'argent"));
//! assert_eq!(tag.album(), Some("Moon Safari"));
//!
//! let bytes = tag.as_bytes(WriteOptions::default())?;
//! assert!(bytes.starts_with(b"LYRICSBEGIN"));
//! assert!(bytes.ends_with(b"LYRICS200"));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! * `id3v2_compression_support` (default): Inflate zlib compressed ID3v2 frames. Without it,
//!   compressed frames are reported as an error.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod cursor;
pub mod error;
pub mod field;
pub mod id3;
pub mod lyrics3;
pub(crate) mod macros;
pub mod translate;
mod util;

pub use util::text::TextEncoding;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use tagbridge::prelude::*;
	//! ```

	pub use crate::config::{ParseOptions, ParsingMode, WriteOptions};
	pub use crate::field::{FieldValue, TypedField};
	pub use crate::id3::v2::{FrameBody, FrameId, Id3v2Frame};
	pub use crate::lyrics3::{FieldBody, Lyrics3v2Field, Lyrics3v2Tag};
}
