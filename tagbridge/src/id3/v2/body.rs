use super::FrameId;
use super::registry::{lookup_body_constructor, opaque};
use crate::cursor::Cursor;
use crate::error::{ErrorKind, Result, TagBridgeError};
use crate::field::{FieldContext, FieldValue, TypedField, names};
use crate::macros::invalid_tag;
use crate::util::text::TextEncoding;

use std::fmt::{Display, Formatter};

/// The body of an ID3v2 frame
///
/// A body is an ordered list of [`TypedField`]s, declared once per frame ID. The order is fixed,
/// and is the order the fields appear on the wire.
///
/// The body of a frame ID without a registered layout (see [`lookup_body_constructor`]) is a
/// single opaque [`FieldValue::SizeTerminatedBytes`] field.
///
/// # Text encoding
///
/// If the body has a [`names::TEXT_ENCODING`] field, its value determines the encoding of every
/// string field. Otherwise, all strings are [`TextEncoding::Latin1`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameBody {
	id: FrameId,
	fields: Vec<TypedField>,
}

impl FrameBody {
	/// Create a new `FrameBody` from an explicit field list
	///
	/// # Errors
	///
	/// * A size-terminated field is followed by another field
	/// * A [`names::TEXT_ENCODING`] field holds an invalid encoding
	pub fn new(id: FrameId, fields: Vec<TypedField>) -> Result<Self> {
		if let Some((_, leading)) = fields.split_last() {
			if let Some(field) = leading.iter().find(|field| field.is_size_terminated()) {
				invalid_tag!(@BAIL MisplacedSizeTerminatedField(field.identifier()));
			}
		}

		let body = Self { id, fields };
		if let Some(encoding) = body.number(names::TEXT_ENCODING) {
			encoding_from_value(encoding)?;
		}

		Ok(body)
	}

	/// Create an empty body with the registered layout of `id`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::id3::v2::{FrameBody, FrameId};
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let body = FrameBody::for_id(FrameId::new("COMM")?);
	/// assert_eq!(body.fields().len(), 4);
	///
	/// // Unknown IDs are kept opaque
	/// let body = FrameBody::for_id(FrameId::new("XXXX")?);
	/// assert_eq!(body.fields().len(), 1);
	/// # Ok(()) }
	/// ```
	pub fn for_id(id: FrameId) -> Self {
		let fields = match lookup_body_constructor(id.as_str()) {
			Some(constructor) => constructor(),
			None => {
				log::trace!("No registered layout for frame `{}`, keeping it opaque", id);
				opaque()
			},
		};

		Self { id, fields }
	}

	/// Create a body for `id` holding `content` verbatim
	pub(crate) fn opaque(id: FrameId, content: Vec<u8>) -> Result<Self> {
		let data = TypedField::new(names::DATA, FieldValue::SizeTerminatedBytes(content))?;
		Ok(Self {
			id,
			fields: vec![data],
		})
	}

	/// Decode a body for `id` from the whole of `bytes`
	///
	/// # Errors
	///
	/// See [`FrameBody::decode`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::id3::v2::{FrameBody, FrameId};
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let body = FrameBody::from_bytes(FrameId::new("TALB")?, b"\x00Moon Safari")?;
	/// assert_eq!(body.text("Text"), Some("Moon Safari"));
	///
	/// assert_eq!(body.encode()?, b"\x00Moon Safari");
	/// # Ok(()) }
	/// ```
	pub fn from_bytes(id: FrameId, bytes: &[u8]) -> Result<Self> {
		let mut body = Self::for_id(id);
		let declared_size = i64::try_from(bytes.len())
			.map_err(|_| TagBridgeError::new(ErrorKind::TooMuchData))?;
		body.decode(&mut Cursor::new(bytes), declared_size)?;

		Ok(body)
	}

	/// The ID of the owning frame
	pub fn id(&self) -> &FrameId {
		&self.id
	}

	/// The fields, in declared order
	pub fn fields(&self) -> &[TypedField] {
		&self.fields
	}

	/// Get a field by name
	pub fn field(&self, name: &str) -> Option<&TypedField> {
		self.fields.iter().find(|field| field.identifier() == name)
	}

	/// Get the text of a string field by name
	pub fn text(&self, name: &str) -> Option<&str> {
		match self.field(name)?.value() {
			FieldValue::FixedString { value, .. }
			| FieldValue::TerminatedString(value)
			| FieldValue::SizeTerminatedString(value) => Some(value),
			_ => None,
		}
	}

	/// Get the value of a number field by name
	pub fn number(&self, name: &str) -> Option<u64> {
		match self.field(name)?.value() {
			FieldValue::Number { value, .. } => Some(*value),
			_ => None,
		}
	}

	/// Get the content of a byte field by name
	pub fn bytes(&self, name: &str) -> Option<&[u8]> {
		match self.field(name)?.value() {
			FieldValue::SizeTerminatedBytes(value) => Some(value),
			_ => None,
		}
	}

	/// Get the lines of a synchronized text field by name
	pub fn synced_text(&self, name: &str) -> Option<&[(u32, String)]> {
		match self.field(name)?.value() {
			FieldValue::SyncedText(lines) => Some(lines),
			_ => None,
		}
	}

	/// Replace the value of a field by name
	///
	/// # Errors
	///
	/// * There is no field named `name`
	/// * Setting an invalid [`names::TEXT_ENCODING`]
	/// * See [`TypedField::set_value`]
	pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<()> {
		if let (names::TEXT_ENCODING, FieldValue::Number { value, .. }) = (name, &value) {
			encoding_from_value(*value)?;
		}

		let Some(field) = self
			.fields
			.iter_mut()
			.find(|field| field.identifier() == name)
		else {
			invalid_tag!(@BAIL MissingField(name.to_owned()));
		};

		field.set_value(value)
	}

	/// The encoding of the string fields
	pub fn text_encoding(&self) -> TextEncoding {
		self.number(names::TEXT_ENCODING)
			.and_then(|encoding| encoding_from_value(encoding).ok())
			.unwrap_or_default()
	}

	fn context(&self) -> FieldContext {
		FieldContext::new(self.text_encoding())
	}

	/// Decode the fields from the next `declared_size` bytes of `cursor`
	///
	/// The fields are decoded in order, against a cursor limited to the frame. Every field must
	/// be read, and the fields must consume the frame exactly. On failure, the body is left
	/// untouched.
	///
	/// `cursor` is always advanced past the frame, unless `declared_size` exceeds the
	/// remaining length.
	///
	/// # Errors
	///
	/// * `declared_size` is negative
	/// * `declared_size` extends past the limit of `cursor`
	/// * Any field fails to decode, see [`TypedField::decode`]
	/// * The fields do not consume exactly `declared_size` bytes
	/// * A [`names::TEXT_ENCODING`] field holds an invalid encoding
	pub fn decode(&mut self, cursor: &mut Cursor<'_>, declared_size: i64) -> Result<()> {
		let Ok(size) = usize::try_from(declared_size) else {
			invalid_tag!(@BAIL NegativeSize(declared_size));
		};

		log::trace!("Decoding frame `{}` ({} bytes)", self.id, size);

		let mut frame = cursor.take(size)?;
		let start = frame.position();

		let mut fields = self.fields.clone();
		let mut context = FieldContext::default();
		for field in &mut fields {
			field.decode(&mut frame, context)?;

			if let (names::TEXT_ENCODING, FieldValue::Number { value, .. }) =
				(field.identifier(), field.value())
			{
				context = FieldContext::new(encoding_from_value(*value)?);
			}
		}

		if !frame.is_exhausted() {
			invalid_tag!(@BAIL TrailingData {
				declared: size,
				consumed: frame.position() - start,
			});
		}

		self.fields = fields;
		Ok(())
	}

	/// Encode the fields, in order
	///
	/// # Errors
	///
	/// See [`TypedField::encode`]
	pub fn encode(&self) -> Result<Vec<u8>> {
		let context = self.context();

		let mut content = Vec::with_capacity(self.size());
		for field in &self.fields {
			content.extend(field.encode(context)?);
		}

		Ok(content)
	}

	/// The sum of the encoded size of each field
	pub fn size(&self) -> usize {
		let context = self.context();
		self.fields.iter().map(|field| field.size(context)).sum()
	}
}

fn encoding_from_value(value: u64) -> Result<TextEncoding> {
	let byte = u8::try_from(value).unwrap_or(u8::MAX);
	match TextEncoding::from_u8(byte) {
		Some(encoding) => Ok(encoding),
		None => Err(invalid_tag!(BadTextEncoding(byte))),
	}
}

impl Display for FrameBody {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: ", self.id)?;
		for (index, field) in self.fields.iter().enumerate() {
			if index > 0 {
				write!(f, "; ")?;
			}
			write!(f, "{field}")?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::FrameBody;
	use crate::cursor::Cursor;
	use crate::error::{ErrorKind, InvalidTagKind};
	use crate::field::{FieldValue, TypedField, names};
	use crate::id3::v2::FrameId;
	use crate::util::text::TextEncoding;

	fn id(id: &'static str) -> FrameId {
		FrameId::new(id).unwrap()
	}

	fn expect_invalid(err: &crate::error::TagBridgeError) -> &InvalidTagKind {
		match err.kind() {
			ErrorKind::InvalidTag(invalid) => invalid.kind(),
			_ => panic!("Expected an invalid tag error, got: {err:?}"),
		}
	}

	#[test_log::test]
	fn encryption_method_round_trip() {
		let content = b"foo@bar.com\0\x80\x01\x02\x03";

		let body = FrameBody::from_bytes(id("ENCR"), content).unwrap();
		assert_eq!(body.text(names::OWNER), Some("foo@bar.com"));
		assert_eq!(body.number(names::METHOD_SYMBOL), Some(0x80));
		assert_eq!(body.bytes(names::ENCRYPTION_INFO), Some(&[1, 2, 3][..]));

		assert_eq!(body.encode().unwrap(), content);
		assert_eq!(body.size(), content.len());
	}

	#[test_log::test]
	fn trailing_blob_may_be_empty() {
		let content = b"foo@bar.com\0\x80";

		let body = FrameBody::from_bytes(id("ENCR"), content).unwrap();
		assert_eq!(body.bytes(names::ENCRYPTION_INFO), Some(&[][..]));
		assert_eq!(body.encode().unwrap(), content);
	}

	#[test_log::test]
	fn missing_fixed_field() {
		// The method symbol is missing entirely
		let err = FrameBody::from_bytes(id("ENCR"), b"foo@bar.com\0").unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::Bounds(_)));
	}

	#[test_log::test]
	fn trailing_data() {
		let err = FrameBody::from_bytes(id("PCNT"), &[0, 0, 0, 1, 0xFF]).unwrap_err();
		assert!(matches!(
			expect_invalid(&err),
			InvalidTagKind::TrailingData {
				declared: 5,
				consumed: 4
			}
		));
	}

	#[test_log::test]
	fn negative_size() {
		let mut body = FrameBody::for_id(id("TIT2"));
		let err = body.decode(&mut Cursor::new(b"\0foo"), -1).unwrap_err();
		assert!(matches!(expect_invalid(&err), InvalidTagKind::NegativeSize(-1)));
	}

	#[test_log::test]
	fn decode_is_bounded_by_declared_size() {
		let data = b"\0foo\0bar";
		let mut cursor = Cursor::new(data);

		let mut body = FrameBody::for_id(id("TIT2"));
		body.decode(&mut cursor, 4).unwrap();

		assert_eq!(body.text(names::TEXT), Some("foo"));
		assert_eq!(cursor.position(), 4);
	}

	#[test_log::test]
	fn failed_decode_leaves_body_untouched() {
		let mut body = FrameBody::for_id(id("TIT2"));
		body.set_value(names::TEXT, FieldValue::SizeTerminatedString(String::from("foo")))
			.unwrap();
		let original = body.clone();

		// Invalid text encoding
		let err = body.decode(&mut Cursor::new(b"\x07bar"), 4).unwrap_err();
		assert!(matches!(expect_invalid(&err), InvalidTagKind::BadTextEncoding(7)));
		assert_eq!(body, original);
	}

	#[test_log::test]
	fn utf16_comment() {
		let mut content = vec![TextEncoding::UTF16 as u8];
		content.extend(b"eng");
		content.extend(TextEncoding::UTF16.encode("desc", true, false).unwrap());
		content.extend(TextEncoding::UTF16.encode("l\u{00f8}fty", false, false).unwrap());

		let body = FrameBody::from_bytes(id("COMM"), &content).unwrap();
		assert_eq!(body.text_encoding(), TextEncoding::UTF16);
		assert_eq!(body.text(names::LANGUAGE), Some("eng"));
		assert_eq!(body.text(names::DESCRIPTION), Some("desc"));
		assert_eq!(body.text(names::TEXT), Some("l\u{00f8}fty"));

		assert_eq!(body.encode().unwrap(), content);
	}

	#[test_log::test]
	fn synchronized_lyrics() {
		let mut content = vec![0];
		content.extend(b"eng");
		content.extend([2, 1]);
		content.extend(b"\0");
		content.extend(b"la la\0\x00\x00\x03\xE8");
		content.extend(b"more\0\x00\x00\x07\xD0");

		let body = FrameBody::from_bytes(id("SYLT"), &content).unwrap();
		assert_eq!(body.number(names::TIMESTAMP_FORMAT), Some(2));
		assert_eq!(
			body.synced_text(names::SYNCED_TEXT),
			Some(
				&[
					(1000, String::from("la la")),
					(2000, String::from("more"))
				][..]
			)
		);

		assert_eq!(body.encode().unwrap(), content);
	}

	#[test_log::test]
	fn unknown_frame_is_opaque() {
		let content = [0xDE, 0xAD, 0xBE, 0xEF];
		let body = FrameBody::from_bytes(id("XXXX"), &content).unwrap();

		assert_eq!(body.bytes(names::DATA), Some(&content[..]));
		assert_eq!(body.encode().unwrap(), content);
	}

	#[test_log::test]
	fn misplaced_size_terminated_field() {
		let err = FrameBody::new(
			id("XXXX"),
			vec![
				TypedField::size_terminated_bytes(names::DATA),
				TypedField::number(names::COUNTER, 4),
			],
		)
		.unwrap_err();

		assert!(matches!(
			expect_invalid(&err),
			InvalidTagKind::MisplacedSizeTerminatedField("Data")
		));
	}

	#[test_log::test]
	fn set_invalid_encoding() {
		let mut body = FrameBody::for_id(id("TIT2"));
		assert!(
			body.set_value(
				names::TEXT_ENCODING,
				FieldValue::Number { width: 1, value: 9 }
			)
			.is_err()
		);
		assert_eq!(body.text_encoding(), TextEncoding::Latin1);

		assert!(
			body.set_value("Nonexistent", FieldValue::Number { width: 1, value: 0 })
				.is_err()
		);
	}
}
