use crate::error::{ErrorKind, Result, TagBridgeError};
use crate::macros::err;

/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The byte index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let encoding = match self.encoding {
			TextEncoding::Latin1 => "Latin-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF8 => "UTF-8",
			TextEncoding::UTF16BE => "UTF-16 BE",
		};

		write!(
			f,
			"invalid {encoding} sequence from index {}",
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The byte order of a [`TextEncoding::UTF16`] string, as given by its BOM
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Utf16ByteOrder {
	LittleEndian,
	BigEndian,
}

/// The text encoding for use in ID3v2 frames
///
/// Lyrics3v2 fields are always [`TextEncoding::Latin1`].
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash, Default)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	#[default]
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	/// Whether every character of `text` can be represented in Latin-1
	pub(crate) fn verify_latin1(text: &str) -> bool {
		text.chars().all(|c| u32::from(c) <= 255)
	}

	/// The length of a string terminator in this encoding
	pub fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}

	/// Encode `text`, optionally appending a terminator
	///
	/// [`TextEncoding::UTF16`] is written little endian, with a BOM. An empty UTF-16 string is
	/// written without a BOM.
	///
	/// # Errors
	///
	/// * `lossy` is disabled, and `text` contains characters that cannot be represented in Latin-1
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::TextEncoding;
	///
	/// # fn main() -> Result<(), tagbridge::error::TextEncodingError> {
	/// let encoded = TextEncoding::Latin1.encode("Moon Safari", true, false)?;
	/// assert_eq!(encoded, b"Moon Safari\0");
	/// # Ok(()) }
	/// ```
	pub fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		self.encode_with_bom(text, terminated, lossy, None)
	}

	/// Encode `text`, writing a [`TextEncoding::UTF16`] BOM in the given byte order
	///
	/// With `bom` of `None`, this is [`TextEncoding::encode`]. Otherwise, the BOM is always
	/// written, even for an empty string. `bom` is ignored by every other encoding.
	pub(crate) fn encode_with_bom(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
		bom: Option<Utf16ByteOrder>,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		match self {
			TextEncoding::Latin1 => {
				let mut out =
					latin1_encode(text, lossy).collect::<std::result::Result<Vec<u8>, _>>()?;
				if terminated {
					out.push(0)
				}

				Ok(out)
			},
			TextEncoding::UTF16 => Ok(match bom {
				None => utf16_encode(text, u16::to_le_bytes, !text.is_empty(), terminated),
				Some(Utf16ByteOrder::LittleEndian) => {
					utf16_encode(text, u16::to_le_bytes, true, terminated)
				},
				Some(Utf16ByteOrder::BigEndian) => {
					utf16_encode(text, u16::to_be_bytes, true, terminated)
				},
			}),
			TextEncoding::UTF16BE => Ok(utf16_encode(text, u16::to_be_bytes, false, terminated)),
			TextEncoding::UTF8 => {
				let mut out = text.as_bytes().to_vec();

				if terminated {
					out.push(0);
				}

				Ok(out)
			},
		}
	}

	/// The number of bytes [`TextEncoding::encode`] produces for `text`
	///
	/// This does not depend on `lossy`, every replaced character is still a single byte.
	pub fn encoded_len(self, text: &str, terminated: bool) -> usize {
		self.encoded_len_with_bom(text, terminated, None)
	}

	/// The number of bytes [`TextEncoding::encode_with_bom`] produces for `text`
	pub(crate) fn encoded_len_with_bom(
		self,
		text: &str,
		terminated: bool,
		bom: Option<Utf16ByteOrder>,
	) -> usize {
		let content_len = match self {
			TextEncoding::Latin1 => text.chars().count(),
			TextEncoding::UTF8 => text.len(),
			TextEncoding::UTF16 if text.is_empty() && bom.is_none() => 0,
			TextEncoding::UTF16 => 2 + text.encode_utf16().count() * 2,
			TextEncoding::UTF16BE => text.encode_utf16().count() * 2,
		};

		if terminated {
			return content_len + self.terminator_len();
		}

		content_len
	}

	/// Decode `bytes`, which must not include a terminator
	///
	/// Nothing is trimmed from the result, so that re-encoding reproduces `bytes`. The byte order
	/// of a [`TextEncoding::UTF16`] BOM is returned alongside the text, even when the BOM is the
	/// only content of `bytes`.
	pub(crate) fn decode(
		self,
		bytes: &[u8],
	) -> Result<(String, Option<Utf16ByteOrder>)> {
		if bytes.is_empty() {
			return Ok((String::new(), None));
		}

		let text = match self {
			TextEncoding::Latin1 => latin1_decode(bytes),
			TextEncoding::UTF16 => {
				if bytes.len() < 2 {
					err!(TextDecode("UTF-16 string has an invalid length (< 2)"));
				}

				return match [bytes[0], bytes[1]] {
					[0xFE, 0xFF] => {
						let text = utf16_decode_bytes(&bytes[2..], u16::from_be_bytes)?;
						Ok((text, Some(Utf16ByteOrder::BigEndian)))
					},
					[0xFF, 0xFE] => {
						let text = utf16_decode_bytes(&bytes[2..], u16::from_le_bytes)?;
						Ok((text, Some(Utf16ByteOrder::LittleEndian)))
					},
					_ => err!(TextDecode("UTF-16 string has an invalid byte order mark")),
				};
			},
			TextEncoding::UTF16BE => utf16_decode_bytes(bytes, u16::from_be_bytes)?,
			TextEncoding::UTF8 => String::from_utf8(bytes.to_vec()).map_err(|_| {
				TagBridgeError::new(ErrorKind::TextDecode("Expected a UTF-8 string"))
			})?,
		};

		Ok((text, None))
	}
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	bytes.iter().map(|c| char::from(*c)).collect::<String>()
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> impl Iterator<Item = std::result::Result<u8, TextEncodingError>> {
	s.chars().enumerate().map(move |(index, c)| {
		if (c as u32) <= 255 {
			Ok(c as u8)
		} else if lossy {
			Ok(b'?')
		} else {
			Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index, // All characters up to this point are single-byte
			})
		}
	})
}

fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	if bytes.len() % 2 != 0 {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	let words = bytes
		.chunks_exact(2)
		.map(|c| endianness([c[0], c[1]]))
		.collect::<Vec<u16>>();

	String::from_utf16(&words)
		.map_err(|_| TagBridgeError::new(ErrorKind::TextDecode("Given an invalid UTF-16 string")))
}

fn utf16_encode(
	text: &str,
	endianness: fn(u16) -> [u8; 2],
	bom: bool,
	terminated: bool,
) -> Vec<u8> {
	let mut encoded = Vec::<u8>::new();

	if bom {
		encoded.extend_from_slice(&endianness(0xFEFF_u16));
	}

	for ch in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(ch));
	}

	if terminated {
		encoded.extend_from_slice(&[0, 0]);
	}

	encoded
}
