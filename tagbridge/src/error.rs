//! Contains the errors that can arise within tagbridge
//!
//! The primary error is [`TagBridgeError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.
//!
//! Not every error is fatal. Outer reading loops use [`TagBridgeError::is_end_of_buffer`] as a
//! normal termination signal, and bulk migrations skip frames failing with
//! [`ErrorKind::UnsupportedFrameKind`].

pub use crate::util::text::TextEncodingError;

use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, TagBridgeError>`
pub type Result<T> = std::result::Result<T, TagBridgeError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Cursor related errors
	/// A fixed-length or scanning read would run past the end of the readable region
	Bounds(BoundsError),
	/// No field start could be found before the end of the buffer
	///
	/// This is only a failure for explicit single-field reads. Loops over a field region
	/// treat it as "no more fields".
	EndOfBuffer,

	// Structural errors
	/// Errors that arise from structurally invalid frames, fields, and tags
	InvalidTag(InvalidTagError),
	/// Attempting to write an abnormally large amount of data
	TooMuchData,
	/// Expected the data to be a different size than provided
	///
	/// This occurs when the size of an item is written as one value, but that size is either too
	/// big or small to be valid within the bounds of that item.
	SizeMismatch,

	// Semantic errors
	/// There is no destination field for a source frame ID
	///
	/// Carries the offending frame ID.
	UnsupportedFrameKind(String),

	// Text related errors
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Errors that arise while encoding text
	TextEncode(TextEncodingError),
	/// Arises when decoding OR encoding a problematic [`Lyrics3Timestamp`](crate::lyrics3::Lyrics3Timestamp)
	BadTimestamp(&'static str),

	// Conversions for external errors
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
}

/// A read that would cross the limit of a [`Cursor`](crate::cursor::Cursor)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundsError {
	/// The cursor position at the time of the read
	pub position: usize,
	/// The number of bytes requested
	pub requested: usize,
	/// The cursor limit
	pub limit: usize,
}

impl Display for BoundsError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Attempted to read {} bytes at position {}, past the limit ({})",
			self.requested, self.position, self.limit
		)
	}
}

/// The types of structural violations in frames, fields, and tags
#[derive(Debug)]
#[non_exhaustive]
pub enum InvalidTagKind {
	// Identifiers
	/// Arises when an ID3v2 frame ID contains invalid characters (must be within `'A'..'Z'` or `'0'..'9'`)
	/// or if the ID is not 4 characters long.
	BadFrameId(Vec<u8>),
	/// Arises when a Lyrics3v2 field ID contains invalid characters or is not 3 characters long
	BadFieldId(Vec<u8>),

	// Sizes
	/// Arises when a frame is declared with a negative size
	NegativeSize(i64),
	/// Arises when a frame is declared with a size of 0
	EmptyFrame(String),
	/// Arises when a frame is too small to hold the data its flags require
	BadFrameLength,
	/// Arises when a compressed frame is encountered, but support is disabled
	CompressedFrameEncountered,
	/// Arises when the fields of a body do not consume exactly the declared size
	TrailingData {
		/// The declared body size
		declared: usize,
		/// The number of bytes the fields consumed
		consumed: usize,
	},
	/// Arises when a Lyrics3v2 field size is not made up of 5 decimal digits
	BadFieldSize(Vec<u8>),

	// Object lists
	/// Arises when a size-terminated field is declared anywhere but the end of a body
	MisplacedSizeTerminatedField(&'static str),
	/// Arises when a number does not fit in its declared width
	NumberOutOfRange {
		/// The width of the field in bytes
		width: u8,
		/// The rejected value
		value: u64,
	},
	/// Arises when a value is assigned to a field of a different type
	FieldTypeMismatch(&'static str),
	/// Arises when a terminated string value contains its own terminator
	EmbeddedTerminator(&'static str),
	/// Arises when a body has no field with the requested name
	MissingField(String),
	/// Arises when a text encoding byte is not in `0..=3`
	BadTextEncoding(u8),

	// Whole tags
	/// Arises when a Lyrics3v2 tag does not start with `LYRICSBEGIN`
	BadTagHeader,
	/// Arises when a Lyrics3v2 tag does not end with a 6-digit size and `LYRICS200`
	BadTagFooter,
}

impl Display for InvalidTagKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::BadFrameId(frame_id) => write!(f, "Failed to parse a frame ID: 0x{frame_id:x?}"),
			Self::BadFieldId(field_id) => {
				write!(f, "Failed to parse a Lyrics3v2 field ID: 0x{field_id:x?}")
			},
			Self::NegativeSize(size) => write!(f, "Frame declared a negative size ({size})"),
			Self::EmptyFrame(id) => write!(f, "Frame `{id}` is empty"),
			Self::BadFrameLength => write!(
				f,
				"Frame isn't long enough to satisfy its flags"
			),
			Self::CompressedFrameEncountered => write!(
				f,
				"Encountered a compressed frame, support for compressed frames is disabled"
			),
			Self::TrailingData { declared, consumed } => write!(
				f,
				"Frame fields consumed {consumed} bytes of a {declared} byte body"
			),
			Self::BadFieldSize(size) => {
				write!(f, "Found an invalid Lyrics3v2 field size: 0x{size:x?}")
			},
			Self::MisplacedSizeTerminatedField(name) => write!(
				f,
				"Size-terminated field \"{name}\" must be the last field of its body"
			),
			Self::NumberOutOfRange { width, value } => write!(
				f,
				"Value {value} does not fit in a {width} byte number field"
			),
			Self::FieldTypeMismatch(name) => {
				write!(f, "Field \"{name}\" holds a different type")
			},
			Self::EmbeddedTerminator(name) => {
				write!(f, "Field \"{name}\" contains a null character")
			},
			Self::MissingField(name) => write!(f, "Body has no field named \"{name}\""),
			Self::BadTextEncoding(encoding) => {
				write!(f, "Found an invalid text encoding ({encoding})")
			},
			Self::BadTagHeader => write!(f, "Lyrics3v2 tag is missing \"LYRICSBEGIN\""),
			Self::BadTagFooter => write!(f, "Lyrics3v2 tag has an invalid footer"),
		}
	}
}

/// A structural violation within a frame, field, or tag
///
/// The violation is fatal to the current frame only. Callers scanning many frames may skip it
/// and continue with the next.
pub struct InvalidTagError {
	kind: InvalidTagKind,
}

impl InvalidTagError {
	/// Create a new `InvalidTagError` from an [`InvalidTagKind`]
	#[must_use]
	pub const fn new(kind: InvalidTagKind) -> Self {
		Self { kind }
	}

	/// Returns the [`InvalidTagKind`]
	pub fn kind(&self) -> &InvalidTagKind {
		&self.kind
	}
}

impl Debug for InvalidTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Invalid tag: {:?}", self.kind)
	}
}

impl Display for InvalidTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Invalid tag: {}", self.kind)
	}
}

/// Errors that could occur within tagbridge
pub struct TagBridgeError {
	pub(crate) kind: ErrorKind,
}

impl TagBridgeError {
	/// Create a `TagBridgeError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::error::{ErrorKind, TagBridgeError};
	///
	/// let end_of_buffer = TagBridgeError::new(ErrorKind::EndOfBuffer);
	/// assert!(end_of_buffer.is_end_of_buffer());
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether this error signals that no further field exists in a buffer
	pub fn is_end_of_buffer(&self) -> bool {
		matches!(self.kind, ErrorKind::EndOfBuffer)
	}

	/// Whether this error signals a source frame without a destination mapping
	pub fn is_unsupported_frame_kind(&self) -> bool {
		matches!(self.kind, ErrorKind::UnsupportedFrameKind(_))
	}
}

impl std::error::Error for TagBridgeError {}

impl Debug for TagBridgeError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<BoundsError> for TagBridgeError {
	fn from(input: BoundsError) -> Self {
		Self {
			kind: ErrorKind::Bounds(input),
		}
	}
}

impl From<InvalidTagError> for TagBridgeError {
	fn from(input: InvalidTagError) -> Self {
		Self {
			kind: ErrorKind::InvalidTag(input),
		}
	}
}

impl From<TextEncodingError> for TagBridgeError {
	fn from(input: TextEncodingError) -> Self {
		Self {
			kind: ErrorKind::TextEncode(input),
		}
	}
}

impl From<std::io::Error> for TagBridgeError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl Display for TagBridgeError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::Io(ref err) => write!(f, "{err}"),

			ErrorKind::Bounds(ref err) => write!(f, "Out of bounds: {err}"),
			ErrorKind::EndOfBuffer => write!(f, "Reached the end of the buffer"),
			ErrorKind::InvalidTag(ref err) => write!(f, "{err}"),
			ErrorKind::UnsupportedFrameKind(ref id) => write!(
				f,
				"Cannot create a Lyrics3v2 field from an ID3v2 \"{id}\" frame"
			),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(ref message) => write!(f, "Text encoding: {message}"),
			ErrorKind::BadTimestamp(message) => {
				write!(f, "Encountered an invalid timestamp: {message}")
			},
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
		}
	}
}
