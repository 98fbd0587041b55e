//! Typed sub-fields of a frame body
//!
//! A frame body is an ordered list of [`TypedField`]s. Each field knows how to decode itself from a
//! [`Cursor`], encode itself, and report its encoded size. The encoding of a field is determined
//! entirely by its [`FieldValue`] variant, and the [`FieldContext`] provided by the owning body.
//!
//! Size-terminated variants (see [`FieldValue::is_size_terminated`]) have no length of their own.
//! They consume everything up to the limit of the cursor, and so can only ever be the final
//! field of a body.

use crate::cursor::Cursor;
use crate::error::Result;
use crate::macros::invalid_tag;
use crate::util::text::{TextEncoding, Utf16ByteOrder, latin1_decode};

use std::fmt::{Display, Formatter};

use byteorder::{BigEndian, ByteOrder};

/// Names of the fields used by the built-in frame bodies
pub mod names {
	/// The text encoding byte, which sets the encoding of every following string field
	pub const TEXT_ENCODING: &str = "TextEncoding";
	/// The primary text content of a frame
	pub const TEXT: &str = "Text";
	/// ISO-639-2 language code
	pub const LANGUAGE: &str = "Language";
	/// Content descriptor
	pub const DESCRIPTION: &str = "Description";
	/// The unit of synchronized timestamps
	pub const TIMESTAMP_FORMAT: &str = "TimeStampFormat";
	/// The type of synchronized content
	pub const CONTENT_TYPE: &str = "ContentType";
	/// A list of synchronized text and timestamps
	pub const SYNCED_TEXT: &str = "SynchronisedText";
	/// An owner identifier
	pub const OWNER: &str = "Owner";
	/// An encryption method symbol
	pub const METHOD_SYMBOL: &str = "MethodSymbol";
	/// Encryption method specific data
	pub const ENCRYPTION_INFO: &str = "EncryptionInfo";
	/// Opaque binary data
	pub const DATA: &str = "Data";
	/// A play counter
	pub const COUNTER: &str = "Counter";
}

/// Context needed by fields while decoding and encoding
///
/// This is provided by the owning body. Fields never reach back into their body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldContext {
	/// The encoding of all string fields
	pub encoding: TextEncoding,
}

impl FieldContext {
	/// Create a new `FieldContext`
	pub fn new(encoding: TextEncoding) -> Self {
		Self { encoding }
	}
}

/// The value of a [`TypedField`], which also determines how it is encoded
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FieldValue {
	/// A big-endian unsigned integer of a fixed width
	///
	/// `value` must fit in `width` bytes, and `width` must be within `1..=8`.
	Number {
		/// The width in bytes
		width: u8,
		/// The value
		value: u64,
	},
	/// A Latin-1 string of a fixed number of characters
	FixedString {
		/// The width in bytes
		width: u8,
		/// The value
		value: String,
	},
	/// A string followed by a terminator, in the encoding of the [`FieldContext`]
	TerminatedString(String),
	/// A string spanning the remainder of the body, in the encoding of the [`FieldContext`]
	SizeTerminatedString(String),
	/// Raw bytes spanning the remainder of the body
	SizeTerminatedBytes(Vec<u8>),
	/// A list of terminated strings, each followed by a 4 byte big-endian timestamp, spanning the remainder of the body
	SyncedText(Vec<(u32, String)>),
}

impl FieldValue {
	/// Whether this value spans the remainder of its body
	pub fn is_size_terminated(&self) -> bool {
		matches!(
			self,
			FieldValue::SizeTerminatedString(_)
				| FieldValue::SizeTerminatedBytes(_)
				| FieldValue::SyncedText(_)
		)
	}

	fn same_kind(&self, other: &FieldValue) -> bool {
		match (self, other) {
			(
				FieldValue::Number { width: a, .. },
				FieldValue::Number { width: b, .. },
			)
			| (
				FieldValue::FixedString { width: a, .. },
				FieldValue::FixedString { width: b, .. },
			) => a == b,
			_ => std::mem::discriminant(self) == std::mem::discriminant(other),
		}
	}
}

impl Display for FieldValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			FieldValue::Number { value, .. } => write!(f, "{value}"),
			FieldValue::FixedString { value, .. }
			| FieldValue::TerminatedString(value)
			| FieldValue::SizeTerminatedString(value) => write!(f, "{value}"),
			FieldValue::SizeTerminatedBytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
			FieldValue::SyncedText(lines) => {
				for (index, (timestamp, text)) in lines.iter().enumerate() {
					if index > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{timestamp}: {text}")?;
				}
				Ok(())
			},
		}
	}
}

/// A single named field in a frame body
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedField {
	identifier: &'static str,
	value: FieldValue,
	// A terminated string decoded without its terminator, encode it the same way
	unterminated: bool,
	// The UTF-16 BOM of each decoded string, in order, when it differs from what `encode` writes
	boms: Vec<Option<Utf16ByteOrder>>,
}

impl TypedField {
	/// Create a new `TypedField`
	///
	/// # Errors
	///
	/// * A [`FieldValue::Number`] has a width outside of `1..=8`, or a value that doesn't fit
	/// * A [`FieldValue::FixedString`] value is not exactly `width` Latin-1 characters
	/// * A [`FieldValue::TerminatedString`] or [`FieldValue::SyncedText`] value contains a null
	///   character
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::field::{FieldValue, TypedField};
	///
	/// let symbol = TypedField::new("MethodSymbol", FieldValue::Number { width: 1, value: 0x80 });
	/// assert!(symbol.is_ok());
	///
	/// let too_big = TypedField::new("MethodSymbol", FieldValue::Number { width: 1, value: 256 });
	/// assert!(too_big.is_err());
	/// ```
	pub fn new(identifier: &'static str, value: FieldValue) -> Result<Self> {
		verify_value(identifier, &value)?;
		Ok(Self {
			identifier,
			value,
			unterminated: false,
			boms: Vec::new(),
		})
	}

	/// An empty [`FieldValue::Number`]
	///
	/// # Panics
	///
	/// `width` is not within `1..=8`
	pub fn number(identifier: &'static str, width: u8) -> Self {
		assert!((1..=8).contains(&width), "number fields are 1 to 8 bytes");
		Self::from_value(identifier, FieldValue::Number { width, value: 0 })
	}

	/// An empty [`FieldValue::FixedString`], filled with `width` null characters
	///
	/// # Panics
	///
	/// `width` is 0
	pub fn fixed_string(identifier: &'static str, width: u8) -> Self {
		assert!(width > 0, "fixed strings cannot be empty");
		let value = "\0".repeat(usize::from(width));
		Self::from_value(identifier, FieldValue::FixedString { width, value })
	}

	/// An empty [`FieldValue::TerminatedString`]
	pub fn terminated_string(identifier: &'static str) -> Self {
		Self::from_value(identifier, FieldValue::TerminatedString(String::new()))
	}

	/// An empty [`FieldValue::SizeTerminatedString`]
	pub fn size_terminated_string(identifier: &'static str) -> Self {
		Self::from_value(identifier, FieldValue::SizeTerminatedString(String::new()))
	}

	/// An empty [`FieldValue::SizeTerminatedBytes`]
	pub fn size_terminated_bytes(identifier: &'static str) -> Self {
		Self::from_value(identifier, FieldValue::SizeTerminatedBytes(Vec::new()))
	}

	/// An empty [`FieldValue::SyncedText`]
	pub fn synced_text(identifier: &'static str) -> Self {
		Self::from_value(identifier, FieldValue::SyncedText(Vec::new()))
	}

	fn from_value(identifier: &'static str, value: FieldValue) -> Self {
		Self {
			identifier,
			value,
			unterminated: false,
			boms: Vec::new(),
		}
	}

	/// The name of the field within its body
	pub fn identifier(&self) -> &'static str {
		self.identifier
	}

	/// The current value
	pub fn value(&self) -> &FieldValue {
		&self.value
	}

	/// Replace the value
	///
	/// # Errors
	///
	/// * `value` is a different variant (or width) than the current value
	/// * `value` fails the checks of [`TypedField::new`]
	pub fn set_value(&mut self, value: FieldValue) -> Result<()> {
		if !self.value.same_kind(&value) {
			invalid_tag!(@BAIL FieldTypeMismatch(self.identifier));
		}

		verify_value(self.identifier, &value)?;

		self.value = value;
		self.unterminated = false;
		self.boms.clear();
		Ok(())
	}

	/// Whether this field spans the remainder of its body
	pub fn is_size_terminated(&self) -> bool {
		self.value.is_size_terminated()
	}

	/// Fill this field from `cursor`
	///
	/// # Errors
	///
	/// * Not enough data remains for a fixed-width field, or for a synchronized timestamp
	/// * The text cannot be decoded in the context encoding
	pub fn decode(&mut self, cursor: &mut Cursor<'_>, context: FieldContext) -> Result<()> {
		let encoding = context.encoding;
		self.boms.clear();
		match &mut self.value {
			FieldValue::Number { width, value } => {
				let bytes = cursor.read_fixed(usize::from(*width))?;
				*value = BigEndian::read_uint(bytes, usize::from(*width));
			},
			FieldValue::FixedString { width, value } => {
				let bytes = cursor.read_fixed(usize::from(*width))?;
				*value = latin1_decode(bytes);
			},
			FieldValue::TerminatedString(value) => {
				let (text, bom, terminated) = read_terminated(cursor, encoding)?;
				self.boms.push(unusual_bom(&text, bom));
				*value = text;
				self.unterminated = !terminated;
			},
			FieldValue::SizeTerminatedString(value) => {
				let (text, bom) = encoding.decode(cursor.read_remaining())?;
				self.boms.push(unusual_bom(&text, bom));
				*value = text;
			},
			FieldValue::SizeTerminatedBytes(value) => {
				*value = cursor.read_remaining().to_vec();
			},
			FieldValue::SyncedText(lines) => {
				lines.clear();
				while !cursor.is_exhausted() {
					let (text, bom, _) = read_terminated(cursor, encoding)?;
					let timestamp = BigEndian::read_u32(cursor.read_fixed(4)?);
					self.boms.push(unusual_bom(&text, bom));
					lines.push((timestamp, text));
				}
			},
		}

		if self.boms.iter().all(Option::is_none) {
			self.boms.clear();
		}

		Ok(())
	}

	/// Encode this field
	///
	/// # Errors
	///
	/// * A number doesn't fit in its width
	/// * A string cannot be represented in the context encoding
	pub fn encode(&self, context: FieldContext) -> Result<Vec<u8>> {
		let encoding = context.encoding;
		let bytes = match &self.value {
			FieldValue::Number { width, value } => {
				check_number_range(*width, *value)?;

				let mut bytes = vec![0; usize::from(*width)];
				BigEndian::write_uint(&mut bytes, *value, usize::from(*width));
				bytes
			},
			FieldValue::FixedString { width, value } => {
				let bytes = TextEncoding::Latin1.encode(value, false, false)?;
				if bytes.len() != usize::from(*width) {
					invalid_tag!(@BAIL FieldTypeMismatch(self.identifier));
				}
				bytes
			},
			FieldValue::TerminatedString(value) => {
				encoding.encode_with_bom(value, !self.unterminated, false, self.bom(0))?
			},
			FieldValue::SizeTerminatedString(value) => {
				encoding.encode_with_bom(value, false, false, self.bom(0))?
			},
			FieldValue::SizeTerminatedBytes(value) => value.clone(),
			FieldValue::SyncedText(lines) => {
				let mut bytes = Vec::new();
				for (index, (timestamp, text)) in lines.iter().enumerate() {
					bytes.extend(encoding.encode_with_bom(text, true, false, self.bom(index))?);
					bytes.extend(timestamp.to_be_bytes());
				}
				bytes
			},
		};

		Ok(bytes)
	}

	/// The number of bytes [`TypedField::encode`] produces in `context`
	pub fn size(&self, context: FieldContext) -> usize {
		let encoding = context.encoding;
		match &self.value {
			FieldValue::Number { width, .. } | FieldValue::FixedString { width, .. } => {
				usize::from(*width)
			},
			FieldValue::TerminatedString(value) => {
				encoding.encoded_len_with_bom(value, !self.unterminated, self.bom(0))
			},
			FieldValue::SizeTerminatedString(value) => {
				encoding.encoded_len_with_bom(value, false, self.bom(0))
			},
			FieldValue::SizeTerminatedBytes(value) => value.len(),
			FieldValue::SyncedText(lines) => lines
				.iter()
				.enumerate()
				.map(|(index, (_, text))| {
					encoding.encoded_len_with_bom(text, true, self.bom(index)) + 4
				})
				.sum(),
		}
	}

	fn bom(&self, index: usize) -> Option<Utf16ByteOrder> {
		self.boms.get(index).copied().flatten()
	}
}

impl Display for TypedField {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} = {}", self.identifier, self.value)
	}
}

// Only a BOM that a plain `encode` wouldn't reproduce is worth keeping
fn unusual_bom(text: &str, bom: Option<Utf16ByteOrder>) -> Option<Utf16ByteOrder> {
	match bom {
		Some(Utf16ByteOrder::LittleEndian) if !text.is_empty() => None,
		_ => bom,
	}
}

// A terminated string may be missing its terminator, but it may not be missing entirely
fn read_terminated(
	cursor: &mut Cursor<'_>,
	encoding: TextEncoding,
) -> Result<(String, Option<Utf16ByteOrder>, bool)> {
	if cursor.is_exhausted() {
		cursor.read_fixed(encoding.terminator_len())?;
	}

	let remaining = cursor.remaining();
	let scanned = match encoding.terminator_len() {
		2 => cursor.read_until_wide_zero(remaining),
		_ => cursor.read_until_zero(remaining),
	};

	let (text, bom) = encoding.decode(scanned.bytes)?;
	Ok((text, bom, scanned.terminated))
}

fn check_number_range(width: u8, value: u64) -> Result<()> {
	if width < 8 && value >> (u32::from(width) * 8) != 0 {
		invalid_tag!(@BAIL NumberOutOfRange { width, value });
	}

	Ok(())
}

fn verify_value(identifier: &'static str, value: &FieldValue) -> Result<()> {
	match value {
		FieldValue::Number { width, value } => {
			if !(1..=8).contains(width) {
				invalid_tag!(@BAIL FieldTypeMismatch(identifier));
			}

			check_number_range(*width, *value)
		},
		FieldValue::FixedString { width, value } => {
			let valid = value.chars().count() == usize::from(*width)
				&& TextEncoding::verify_latin1(value);
			if *width == 0 || !valid {
				invalid_tag!(@BAIL FieldTypeMismatch(identifier));
			}

			Ok(())
		},
		FieldValue::TerminatedString(value) => {
			if value.contains('\0') {
				invalid_tag!(@BAIL EmbeddedTerminator(identifier));
			}

			Ok(())
		},
		FieldValue::SyncedText(lines) => {
			if lines.iter().any(|(_, text)| text.contains('\0')) {
				invalid_tag!(@BAIL EmbeddedTerminator(identifier));
			}

			Ok(())
		},
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::{FieldContext, FieldValue, TypedField};
	use crate::cursor::Cursor;
	use crate::error::{ErrorKind, InvalidTagKind};
	use crate::util::text::TextEncoding;

	#[test_log::test]
	fn number_decode_big_endian() {
		let mut field = TypedField::number("Counter", 4);
		let mut cursor = Cursor::new(&[0x00, 0x01, 0x02, 0x03]);

		field.decode(&mut cursor, FieldContext::default()).unwrap();
		assert_eq!(
			field.value(),
			&FieldValue::Number {
				width: 4,
				value: 0x0001_0203
			}
		);
		assert_eq!(
			field.encode(FieldContext::default()).unwrap(),
			[0x00, 0x01, 0x02, 0x03]
		);
	}

	#[test_log::test]
	fn number_decode_short_input() {
		let mut field = TypedField::number("Counter", 4);
		let mut cursor = Cursor::new(&[0x00, 0x01]);

		let err = field
			.decode(&mut cursor, FieldContext::default())
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::Bounds(_)));
	}

	#[test_log::test]
	fn number_range_rejected_early() {
		let mut field = TypedField::number("MethodSymbol", 1);
		let err = field
			.set_value(FieldValue::Number {
				width: 1,
				value: 0x100,
			})
			.unwrap_err();

		match err.kind() {
			ErrorKind::InvalidTag(invalid) => assert!(matches!(
				invalid.kind(),
				InvalidTagKind::NumberOutOfRange {
					width: 1,
					value: 0x100
				}
			)),
			_ => panic!("Expected an invalid tag error, got: {err:?}"),
		}

		// Width mismatch
		assert!(
			field
				.set_value(FieldValue::Number { width: 2, value: 1 })
				.is_err()
		);
		// Wrong variant
		assert!(
			field
				.set_value(FieldValue::TerminatedString(String::from("foo")))
				.is_err()
		);
	}

	#[test_log::test]
	fn terminated_string_without_terminator() {
		let mut field = TypedField::terminated_string("Owner");
		let mut cursor = Cursor::new(b"foo@bar.com");

		field.decode(&mut cursor, FieldContext::default()).unwrap();
		assert_eq!(
			field.value(),
			&FieldValue::TerminatedString(String::from("foo@bar.com"))
		);
		assert!(cursor.is_exhausted());

		// No terminator is invented on the way back out
		let context = FieldContext::default();
		assert_eq!(field.encode(context).unwrap(), b"foo@bar.com");
		assert_eq!(field.size(context), 11);
	}

	#[test_log::test]
	fn utf16_terminated_string() {
		let context = FieldContext::new(TextEncoding::UTF16);
		let data = [0xFF, 0xFE, 0x61, 0x00, 0x62, 0x00, 0x00, 0x00, 0x7F];

		let mut field = TypedField::terminated_string("Description");
		let mut cursor = Cursor::new(&data);
		field.decode(&mut cursor, context).unwrap();

		assert_eq!(
			field.value(),
			&FieldValue::TerminatedString(String::from("ab"))
		);
		assert_eq!(cursor.position(), 8);
		assert_eq!(field.encode(context).unwrap(), &data[..8]);
		assert_eq!(field.size(context), 8);
	}

	#[test_log::test]
	fn utf16_bom_kept() {
		let context = FieldContext::new(TextEncoding::UTF16);

		// A lone BOM for an empty string, then a big endian string
		for data in [&[0xFF, 0xFE, 0x00, 0x00][..], &[0xFE, 0xFF, 0x00, 0x61, 0x00, 0x00]] {
			let mut field = TypedField::terminated_string("Description");
			field.decode(&mut Cursor::new(data), context).unwrap();

			assert_eq!(field.encode(context).unwrap(), data);
			assert_eq!(field.size(context), data.len());
		}

		// A new value is written the default way
		let mut field = TypedField::terminated_string("Description");
		field
			.decode(&mut Cursor::new(&[0xFE, 0xFF, 0x00, 0x61, 0x00, 0x00]), context)
			.unwrap();
		field
			.set_value(FieldValue::TerminatedString(String::new()))
			.unwrap();
		assert_eq!(field.encode(context).unwrap(), [0x00, 0x00]);

		// An ordinary little endian string decodes to the same field as one that was set
		let mut decoded = TypedField::terminated_string("Description");
		decoded
			.decode(&mut Cursor::new(&[0xFF, 0xFE, 0x61, 0x00, 0x00, 0x00]), context)
			.unwrap();
		let mut set = TypedField::terminated_string("Description");
		set.set_value(FieldValue::TerminatedString(String::from("a")))
			.unwrap();
		assert_eq!(decoded, set);
	}

	#[test_log::test]
	fn embedded_terminator_rejected() {
		let mut field = TypedField::terminated_string("Owner");
		let err = field
			.set_value(FieldValue::TerminatedString(String::from("a\0b")))
			.unwrap_err();
		match err.kind() {
			ErrorKind::InvalidTag(invalid) => assert!(matches!(
				invalid.kind(),
				InvalidTagKind::EmbeddedTerminator("Owner")
			)),
			_ => panic!("Expected an invalid tag error, got: {err:?}"),
		}
		assert_eq!(
			field.value(),
			&FieldValue::TerminatedString(String::new())
		);

		assert!(
			TypedField::new(
				"SynchronisedText",
				FieldValue::SyncedText(vec![(0, String::from("la\0la"))])
			)
			.is_err()
		);

		// Size terminated text runs to the end of the frame, so a null is just content
		assert!(
			TypedField::new(
				"Text",
				FieldValue::SizeTerminatedString(String::from("Moon Safari\0"))
			)
			.is_ok()
		);
	}

	#[test_log::test]
	fn synced_text_truncated_timestamp() {
		let mut field = TypedField::synced_text("SynchronisedText");
		let mut cursor = Cursor::new(b"la\0\x00\x00\x03\xE8la\0\x00\x00");

		let err = field
			.decode(&mut cursor, FieldContext::default())
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::Bounds(_)));
	}

	#[test_log::test]
	fn synced_text_size() {
		let mut field = TypedField::synced_text("SynchronisedText");
		field
			.set_value(FieldValue::SyncedText(vec![
				(1000, String::from("la")),
				(2000, String::new()),
			]))
			.unwrap();

		let context = FieldContext::default();
		let encoded = field.encode(context).unwrap();
		assert_eq!(encoded, b"la\0\x00\x00\x03\xE8\0\x00\x00\x07\xD0");
		assert_eq!(field.size(context), encoded.len());
	}
}
