use super::FrameBody;
use super::synchsafe::{SynchsafeInteger, resynchronize};
use crate::config::{ParseOptions, ParsingMode};
use crate::cursor::Cursor;
use crate::error::{ErrorKind, Result, TagBridgeError};
use crate::field::{FieldValue, names};
use crate::macros::{invalid_tag, parse_mode_choice};
use crate::util::text::TextEncoding;

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use byteorder::{BigEndian, ByteOrder};

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Id3v2Version {
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

/// An ID3v2.3/4 frame ID
///
/// A frame ID is always 4 characters, each within `'A'..='Z'` or `'0'..='9'`.
#[derive(PartialEq, Clone, Debug, Eq, Hash)]
pub struct FrameId(Cow<'static, str>);

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is not 4 characters long
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::id3::v2::FrameId;
	///
	/// assert!(FrameId::new("TPE1").is_ok());
	/// assert!(FrameId::new("TP1").is_err());
	/// assert!(FrameId::new("tpe1").is_err());
	/// ```
	pub fn new<I>(id: I) -> Result<Self>
	where
		I: Into<Cow<'static, str>>,
	{
		let id = id.into();
		Self::verify_id(&id)?;

		Ok(Self(id))
	}

	fn from_bytes(id: &[u8]) -> Result<Self> {
		match std::str::from_utf8(id) {
			Ok(id) => Self::new(id.to_owned()),
			Err(_) => Err(invalid_tag!(BadFrameId(id.to_vec()))),
		}
	}

	fn verify_id(id_str: &str) -> Result<()> {
		let valid_char = |c: char| c.is_ascii_uppercase() || c.is_ascii_digit();
		if id_str.len() != 4 || !id_str.chars().all(valid_char) {
			invalid_tag!(@BAIL BadFrameId(id_str.as_bytes().to_vec()));
		}

		Ok(())
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Various flags to describe the content of an item
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
	/// The group identifier the frame belongs to
	pub grouping_identity: Option<u8>,
	/// Frame is zlib compressed
	pub compression: bool,
	/// Frame encryption method symbol
	///
	/// NOTE: The encryption method is unknown, so the body of an encrypted frame is kept opaque.
	pub encryption: Option<u8>,
	/// Frame is unsynchronised
	///
	/// In short, this makes all "0xFF X (X >= 0xE0)" combinations into "0xFF 0x00 X" to avoid confusion
	/// with the MPEG frame header. This is only a frame flag in ID3v2.4.
	pub unsynchronisation: bool,
	/// Frame has a data length indicator
	///
	/// The data length indicator is the size of the frame if the flags were all zeroed out.
	pub data_length_indicator: Option<u32>,
}

impl FrameFlags {
	/// Parse the flags from an ID3v2.4 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	/// * `data_length_indicator`
	pub fn parse_id3v24(flags: u16) -> Self {
		FrameFlags {
			tag_alter_preservation: flags & 0x4000 == 0x4000,
			file_alter_preservation: flags & 0x2000 == 0x2000,
			read_only: flags & 0x1000 == 0x1000,
			grouping_identity: (flags & 0x0040 == 0x0040).then_some(0),
			compression: flags & 0x0008 == 0x0008,
			encryption: (flags & 0x0004 == 0x0004).then_some(0),
			unsynchronisation: flags & 0x0002 == 0x0002,
			data_length_indicator: (flags & 0x0001 == 0x0001).then_some(0),
		}
	}

	/// Parse the flags from an ID3v2.3 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	pub fn parse_id3v23(flags: u16) -> Self {
		FrameFlags {
			tag_alter_preservation: flags & 0x8000 == 0x8000,
			file_alter_preservation: flags & 0x4000 == 0x4000,
			read_only: flags & 0x2000 == 0x2000,
			grouping_identity: (flags & 0x0020 == 0x0020).then_some(0),
			compression: flags & 0x0080 == 0x0080,
			encryption: (flags & 0x0040 == 0x0040).then_some(0),
			unsynchronisation: false,
			data_length_indicator: None,
		}
	}
}

/// The result of reading a single frame with [`Id3v2Frame::read`]
#[derive(Debug)]
pub enum ParsedFrame {
	/// A frame was read
	Next(Id3v2Frame),
	/// A frame was unreadable, and skipped
	Skip,
	/// The frames have ended, either due to padding or a lack of data
	Eof,
}

/// An ID3v2 frame
///
/// A frame is a [`FrameBody`] with flags. The frame ID is owned by the body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Id3v2Frame {
	flags: FrameFlags,
	body: FrameBody,
}

impl Id3v2Frame {
	/// Create a new frame from a body
	pub fn new(body: FrameBody) -> Self {
		Self {
			flags: FrameFlags::default(),
			body,
		}
	}

	/// Create a text information frame
	///
	/// The text is stored as [`TextEncoding::Latin1`] where possible, and [`TextEncoding::UTF16`]
	/// otherwise.
	///
	/// # Errors
	///
	/// * `id` is not a valid [`FrameId`]
	/// * `id` does not have a text information layout
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::id3::v2::Id3v2Frame;
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let album = Id3v2Frame::text("TALB", "Moon Safari")?;
	/// assert_eq!(album.id_str(), "TALB");
	/// assert_eq!(album.body().text("Text"), Some("Moon Safari"));
	/// # Ok(()) }
	/// ```
	pub fn text(id: &str, text: &str) -> Result<Self> {
		let id = FrameId::new(id.to_owned())?;
		let mut body = FrameBody::for_id(id);

		set_encoding(&mut body, text)?;
		body.set_value(
			names::TEXT,
			FieldValue::SizeTerminatedString(text.to_owned()),
		)?;

		Ok(Self::new(body))
	}

	/// Create an unsynchronized lyrics (`USLT`) frame
	///
	/// # Errors
	///
	/// * `language` is not 3 Latin-1 characters
	pub fn unsynchronized_lyrics(language: &str, description: &str, lyrics: &str) -> Result<Self> {
		Self::language_encoded_text("USLT", language, description, lyrics)
	}

	/// Create a comment (`COMM`) frame
	///
	/// # Errors
	///
	/// * `language` is not 3 Latin-1 characters
	pub fn comment(language: &str, description: &str, text: &str) -> Result<Self> {
		Self::language_encoded_text("COMM", language, description, text)
	}

	fn language_encoded_text(
		id: &'static str,
		language: &str,
		description: &str,
		text: &str,
	) -> Result<Self> {
		let mut body = FrameBody::for_id(FrameId::new(id)?);

		set_encoding(&mut body, &format!("{description}{text}"))?;
		set_language(&mut body, language)?;
		body.set_value(
			names::DESCRIPTION,
			FieldValue::TerminatedString(description.to_owned()),
		)?;
		body.set_value(
			names::TEXT,
			FieldValue::SizeTerminatedString(text.to_owned()),
		)?;

		Ok(Self::new(body))
	}

	/// Create a synchronized lyrics (`SYLT`) frame
	///
	/// `lines` are pairs of timestamps and text, where the unit of the timestamps is given by
	/// `timestamp_format`.
	///
	/// # Errors
	///
	/// * `language` is not 3 Latin-1 characters
	pub fn synchronized_lyrics(
		language: &str,
		timestamp_format: TimestampFormat,
		description: &str,
		lines: Vec<(u32, String)>,
	) -> Result<Self> {
		let mut body = FrameBody::for_id(FrameId::new("SYLT")?);

		let all_text = lines
			.iter()
			.fold(description.to_owned(), |acc, (_, text)| acc + text);
		set_encoding(&mut body, &all_text)?;
		set_language(&mut body, language)?;
		body.set_value(
			names::TIMESTAMP_FORMAT,
			FieldValue::Number {
				width: 1,
				value: timestamp_format as u64,
			},
		)?;
		// Content type 1 is "lyrics"
		body.set_value(names::CONTENT_TYPE, FieldValue::Number { width: 1, value: 1 })?;
		body.set_value(
			names::DESCRIPTION,
			FieldValue::TerminatedString(description.to_owned()),
		)?;
		body.set_value(names::SYNCED_TEXT, FieldValue::SyncedText(lines))?;

		Ok(Self::new(body))
	}

	/// The frame ID
	pub fn id(&self) -> &FrameId {
		self.body.id()
	}

	/// The frame ID as a string
	pub fn id_str(&self) -> &str {
		self.body.id().as_str()
	}

	/// The flags of the frame
	pub fn flags(&self) -> FrameFlags {
		self.flags
	}

	/// Replace the flags
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.flags = flags;
	}

	/// The body of the frame
	pub fn body(&self) -> &FrameBody {
		&self.body
	}

	/// A mutable reference to the body of the frame
	pub fn body_mut(&mut self) -> &mut FrameBody {
		&mut self.body
	}

	/// Read the next frame from `cursor`
	///
	/// The frame header is `[ID: 4][size: 4][flags: 2]`, where the size is synchsafe in ID3v2.4.
	///
	/// A zero byte in place of the frame ID marks the start of padding, and ends the frames.
	///
	/// # Errors
	///
	/// Outside of [`ParsingMode::Strict`], unreadable frames are skipped. Otherwise:
	///
	/// * The frame ID is invalid
	/// * The frame is empty
	/// * The frame extends past the end of `cursor`
	/// * The frame body fails to decode, see [`FrameBody::decode`]
	pub fn read(
		cursor: &mut Cursor<'_>,
		version: Id3v2Version,
		parse_options: ParseOptions,
	) -> Result<ParsedFrame> {
		let parsing_mode = parse_options.parsing_mode;

		let Ok(header) = cursor.read_fixed(10) else {
			return Ok(ParsedFrame::Eof);
		};

		// Assume we just started reading padding
		if header[0] == 0 {
			return Ok(ParsedFrame::Eof);
		}

		let mut size = BigEndian::read_u32(&header[4..8]);
		if version == Id3v2Version::V4 {
			size = size.unsynch();
		}

		let size = size as usize;
		let content = cursor.take(size)?;

		let id = match FrameId::from_bytes(&header[..4]) {
			Ok(id) => id,
			Err(err) => {
				return parse_mode_choice!(
					parsing_mode,
					STRICT: Err(err),
					DEFAULT: {
						log::warn!("Failed to read frame header, skipping: {}", err);
						Ok(ParsedFrame::Skip)
					}
				);
			},
		};

		let raw_flags = BigEndian::read_u16(&header[8..]);
		let mut flags = match version {
			Id3v2Version::V3 => FrameFlags::parse_id3v23(raw_flags),
			Id3v2Version::V4 => FrameFlags::parse_id3v24(raw_flags),
		};

		if size == 0 {
			if parsing_mode == ParsingMode::Strict {
				invalid_tag!(@BAIL EmptyFrame(id.to_string()));
			}

			log::debug!("Encountered a zero length frame `{}`, skipping", id);
			return Ok(ParsedFrame::Skip);
		}

		log::trace!("Reading frame `{}` ({} bytes)", id, size);

		let body = match read_body(content, id, &mut flags, version) {
			Ok(body) => body,
			Err(err) => {
				return parse_mode_choice!(
					parsing_mode,
					STRICT: Err(err),
					DEFAULT: {
						log::warn!("Failed to read frame body, skipping: {}", err);
						Ok(ParsedFrame::Skip)
					}
				);
			},
		};

		Ok(ParsedFrame::Next(Self { flags, body }))
	}
}

/// The unit of the timestamps in a `SYLT` frame
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimestampFormat {
	/// The timestamps are absolute, in MPEG frames
	MpegFrames = 1,
	/// The timestamps are absolute, in milliseconds
	Milliseconds = 2,
}

impl TimestampFormat {
	/// Get a `TimestampFormat` from a u8, must be 1-2 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			1 => Some(Self::MpegFrames),
			2 => Some(Self::Milliseconds),
			_ => None,
		}
	}
}

fn set_encoding(body: &mut FrameBody, text: &str) -> Result<()> {
	let encoding = if TextEncoding::verify_latin1(text) {
		TextEncoding::Latin1
	} else {
		TextEncoding::UTF16
	};

	body.set_value(
		names::TEXT_ENCODING,
		FieldValue::Number {
			width: 1,
			value: u64::from(encoding as u8),
		},
	)
}

fn set_language(body: &mut FrameBody, language: &str) -> Result<()> {
	body.set_value(
		names::LANGUAGE,
		FieldValue::FixedString {
			width: 3,
			value: language.to_owned(),
		},
	)
}

// The flags are applied in the order:
//
// unsynchronization -> compression -> encryption
fn read_body(
	content: Cursor<'_>,
	id: FrameId,
	flags: &mut FrameFlags,
	version: Id3v2Version,
) -> Result<FrameBody> {
	let resynchronized;
	let decompressed;

	let mut content = content;
	if flags.unsynchronisation {
		resynchronized = resynchronize(content.read_remaining());
		content = Cursor::new(&resynchronized);
	}

	// Get the encryption method symbol
	if let Some(enc) = flags.encryption.as_mut() {
		log::trace!("Reading encryption method symbol");
		*enc = content
			.read_u8()
			.map_err(|_| invalid_tag!(BadFrameLength))?;
	}

	// Get the group identifier
	if let Some(group) = flags.grouping_identity.as_mut() {
		log::trace!("Reading group identifier");
		*group = content
			.read_u8()
			.map_err(|_| invalid_tag!(BadFrameLength))?;
	}

	// Get the real data length
	if flags.data_length_indicator.is_some() || flags.compression {
		log::trace!("Reading data length indicator");

		let len = content
			.read_fixed(4)
			.map_err(|_| invalid_tag!(BadFrameLength))?;
		let mut len = BigEndian::read_u32(len);
		if version == Id3v2Version::V4 {
			len = len.unsynch();
		}

		flags.data_length_indicator = Some(len);
	}

	// Frames must have at least 1 byte, *after* all of the additional data flags can provide
	if content.is_exhausted() {
		invalid_tag!(@BAIL BadFrameLength);
	}

	if flags.compression {
		decompressed = inflate(content.read_remaining())?;
		content = Cursor::new(&decompressed);
	}

	// Nothing further we can do with encrypted frames
	if flags.encryption.is_some() {
		log::debug!("Frame `{}` is encrypted, keeping it opaque", id);
		return FrameBody::opaque(id, content.read_remaining().to_vec());
	}

	let mut body = FrameBody::for_id(id);
	let size = i64::try_from(content.remaining())
		.map_err(|_| TagBridgeError::new(ErrorKind::TooMuchData))?;
	body.decode(&mut content, size)?;

	Ok(body)
}

#[cfg(feature = "id3v2_compression_support")]
fn inflate(content: &[u8]) -> Result<Vec<u8>> {
	use std::io::Read as _;

	let mut decompressed = Vec::new();
	flate2::read::ZlibDecoder::new(content).read_to_end(&mut decompressed)?;

	Ok(decompressed)
}

#[cfg(not(feature = "id3v2_compression_support"))]
#[allow(clippy::unnecessary_wraps)]
fn inflate(_: &[u8]) -> Result<Vec<u8>> {
	Err(invalid_tag!(CompressedFrameEncountered))
}

#[cfg(test)]
mod tests {
	use super::{FrameFlags, FrameId, Id3v2Frame, Id3v2Version, ParsedFrame, TimestampFormat};
	use crate::config::{ParseOptions, ParsingMode};
	use crate::cursor::Cursor;
	use crate::field::names;
	use crate::util::text::TextEncoding;

	fn frame(id: &[u8; 4], size: [u8; 4], flags: u16, content: &[u8]) -> Vec<u8> {
		let mut bytes = id.to_vec();
		bytes.extend(size);
		bytes.extend(flags.to_be_bytes());
		bytes.extend(content);
		bytes
	}

	fn read_one(bytes: &[u8], version: Id3v2Version, mode: ParsingMode) -> ParsedFrame {
		let mut cursor = Cursor::new(bytes);
		Id3v2Frame::read(&mut cursor, version, ParseOptions::new().parsing_mode(mode)).unwrap()
	}

	#[test_log::test]
	fn read_v3_text_frame() {
		let bytes = frame(b"TALB", [0, 0, 0, 12], 0, b"\0Moon Safari");

		let ParsedFrame::Next(frame) = read_one(&bytes, Id3v2Version::V3, ParsingMode::Strict)
		else {
			panic!("Expected a frame");
		};

		assert_eq!(frame.id_str(), "TALB");
		assert_eq!(frame.flags(), FrameFlags::default());
		assert_eq!(frame.body().text(names::TEXT), Some("Moon Safari"));
	}

	#[test_log::test]
	fn read_v4_synchsafe_size() {
		// 200 bytes, synchsafe
		let text = "a".repeat(199);
		let mut content = vec![0];
		content.extend(text.as_bytes());

		let bytes = frame(b"TIT2", [0, 0, 0x01, 0x48], 0, &content);
		let ParsedFrame::Next(frame) = read_one(&bytes, Id3v2Version::V4, ParsingMode::Strict)
		else {
			panic!("Expected a frame");
		};

		assert_eq!(frame.body().text(names::TEXT), Some(text.as_str()));
	}

	#[test_log::test]
	fn padding_ends_frames() {
		let bytes = [0; 16];
		assert!(matches!(
			read_one(&bytes, Id3v2Version::V4, ParsingMode::Strict),
			ParsedFrame::Eof
		));
	}

	#[test_log::test]
	fn skip_bad_frame_id() {
		let mut bytes = frame(b"T!T2", [0, 0, 0, 4], 0, b"\0foo");
		bytes.extend(frame(b"TPE1", [0, 0, 0, 4], 0, b"\0bar"));

		let mut cursor = Cursor::new(&bytes);
		let parse_options = ParseOptions::new();

		let first = Id3v2Frame::read(&mut cursor, Id3v2Version::V3, parse_options).unwrap();
		assert!(matches!(first, ParsedFrame::Skip));

		let ParsedFrame::Next(second) =
			Id3v2Frame::read(&mut cursor, Id3v2Version::V3, parse_options).unwrap()
		else {
			panic!("Expected a frame");
		};
		assert_eq!(second.body().text(names::TEXT), Some("bar"));

		// Strict mode doesn't tolerate it
		let mut cursor = Cursor::new(&bytes);
		let strict = ParseOptions::new().parsing_mode(ParsingMode::Strict);
		assert!(Id3v2Frame::read(&mut cursor, Id3v2Version::V3, strict).is_err());
	}

	#[test_log::test]
	fn empty_frame() {
		let bytes = frame(b"TIT2", [0; 4], 0, &[]);
		assert!(matches!(
			read_one(&bytes, Id3v2Version::V3, ParsingMode::BestAttempt),
			ParsedFrame::Skip
		));

		let mut cursor = Cursor::new(&bytes);
		let strict = ParseOptions::new().parsing_mode(ParsingMode::Strict);
		assert!(Id3v2Frame::read(&mut cursor, Id3v2Version::V3, strict).is_err());
	}

	#[test_log::test]
	fn frame_overruns_buffer() {
		let bytes = frame(b"TIT2", [0, 0, 0, 20], 0, b"\0foo");

		let mut cursor = Cursor::new(&bytes);
		let err = Id3v2Frame::read(&mut cursor, Id3v2Version::V3, ParseOptions::new()).unwrap_err();
		assert!(matches!(err.kind(), crate::error::ErrorKind::Bounds(_)));
	}

	#[test_log::test]
	fn unsynchronised_v4_frame() {
		// [0xFF, 0x00, 0xE0] resynchronizes to [0xFF, 0xE0]
		let bytes = frame(b"PRIV", [0, 0, 0, 9], 0x0002, b"owner\0\xFF\x00\xE0");

		let ParsedFrame::Next(frame) = read_one(&bytes, Id3v2Version::V4, ParsingMode::Strict)
		else {
			panic!("Expected a frame");
		};

		assert!(frame.flags().unsynchronisation);
		assert_eq!(frame.body().text(names::OWNER), Some("owner"));
		assert_eq!(frame.body().bytes(names::DATA), Some(&[0xFF, 0xE0][..]));
	}

	#[test_log::test]
	fn encrypted_frame_is_opaque() {
		// Encryption flag, method symbol 0x80
		let bytes = frame(b"TIT2", [0, 0, 0, 4], 0x0040, &[0x80, 0xAA, 0xBB, 0xCC]);

		let ParsedFrame::Next(frame) = read_one(&bytes, Id3v2Version::V3, ParsingMode::Strict)
		else {
			panic!("Expected a frame");
		};

		assert_eq!(frame.flags().encryption, Some(0x80));
		assert_eq!(
			frame.body().bytes(names::DATA),
			Some(&[0xAA, 0xBB, 0xCC][..])
		);
	}

	#[test_log::test]
	#[cfg(feature = "id3v2_compression_support")]
	fn compressed_v3_frame() {
		use flate2::Compression;
		use flate2::write::ZlibEncoder;
		use std::io::Write;

		let content = b"\0Moon Safari";

		let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
		encoder.write_all(content).unwrap();
		let compressed = encoder.finish().unwrap();

		// Decompressed size, followed by the zlib stream
		let mut frame_content = (content.len() as u32).to_be_bytes().to_vec();
		frame_content.extend(&compressed);

		let size = (frame_content.len() as u32).to_be_bytes();
		let bytes = frame(b"TALB", size, 0x0080, &frame_content);

		let ParsedFrame::Next(frame) = read_one(&bytes, Id3v2Version::V3, ParsingMode::Strict)
		else {
			panic!("Expected a frame");
		};

		assert_eq!(frame.flags().data_length_indicator, Some(12));
		assert_eq!(frame.body().text(names::TEXT), Some("Moon Safari"));
	}

	#[test_log::test]
	fn text_constructor_picks_encoding() {
		let latin1 = Id3v2Frame::text("TIT2", "l\u{00f8}fty").unwrap();
		assert_eq!(latin1.body().text_encoding(), TextEncoding::Latin1);

		let utf16 = Id3v2Frame::text("TIT2", "\u{4e2d}").unwrap();
		assert_eq!(utf16.body().text_encoding(), TextEncoding::UTF16);

		// PCNT has no text
		assert!(Id3v2Frame::text("PCNT", "foo").is_err());
		assert!(FrameId::new("TIT").is_err());
	}

	#[test_log::test]
	fn synchronized_lyrics_constructor() {
		let frame = Id3v2Frame::synchronized_lyrics(
			"eng",
			TimestampFormat::Milliseconds,
			"",
			vec![(1000, String::from("la la"))],
		)
		.unwrap();

		assert_eq!(frame.body().number(names::TIMESTAMP_FORMAT), Some(2));
		assert_eq!(frame.body().text(names::LANGUAGE), Some("eng"));

		// Bad language
		assert!(Id3v2Frame::comment("english", "", "foo").is_err());
	}
}
