use super::FieldBody;
use crate::config::WriteOptions;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::id3::v2::Id3v2Frame;
use crate::macros::{err, invalid_tag};
use crate::translate::translate_frame;

use std::fmt::{Display, Formatter};

/// The length of a Lyrics3v2 field ID
pub const FIELD_ID_LEN: usize = 3;
/// The length of the size prefix of a Lyrics3v2 field
pub const FIELD_SIZE_LEN: usize = 5;

const MAX_FIELD_DATA_LEN: usize = 99_999;

/// Whether `id` is a structurally valid Lyrics3v2 field ID
///
/// A field ID is 3 characters, each within `'A'..='Z'` or `'0'..='9'`. A valid ID does not need to
/// be one of the IDs known to [`FieldBody`].
///
/// # Examples
///
/// ```rust
/// use tagbridge::lyrics3::is_valid_field_id;
///
/// assert!(is_valid_field_id(b"LYR"));
/// assert!(is_valid_field_id(b"XY1"));
///
/// assert!(!is_valid_field_id(b"lyr"));
/// assert!(!is_valid_field_id(b"LYRI"));
/// ```
pub fn is_valid_field_id(id: &[u8]) -> bool {
	id.len() == FIELD_ID_LEN
		&& id
			.iter()
			.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// A Lyrics3v2 field
///
/// On the wire, a field is `[ID: 3][size: 5 ASCII digits][data]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lyrics3v2Field {
	body: FieldBody,
}

impl Lyrics3v2Field {
	/// Create a new `Lyrics3v2Field`
	pub fn new(body: FieldBody) -> Self {
		Self { body }
	}

	/// Read the next field from `cursor`
	///
	/// Any zero bytes before the field are skipped.
	///
	/// # Errors
	///
	/// * Only zero bytes remain, see [`TagBridgeError::is_end_of_buffer`](crate::error::TagBridgeError::is_end_of_buffer)
	/// * The field ID is invalid
	/// * The field size is not 5 decimal digits
	/// * The field data extends past the end of `cursor`
	/// * The field data is malformed, see [`FieldBody::parse`]
	pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
		cursor.skip_leading_zeros()?;

		let id = cursor.read_fixed(FIELD_ID_LEN)?;
		if !is_valid_field_id(id) {
			invalid_tag!(@BAIL BadFieldId(id.to_vec()));
		}

		// The ID is ASCII at this point
		let id = String::from_utf8_lossy(id);

		log::trace!("Reading Lyrics3v2 field `{}`", id);

		let size = cursor.read_fixed(FIELD_SIZE_LEN)?;
		let size = parse_digits(size).ok_or_else(|| invalid_tag!(BadFieldSize(size.to_vec())))?;

		let data = cursor.read_fixed(size)?;
		Ok(Self {
			body: FieldBody::parse(&id, data)?,
		})
	}

	/// Read a single field from `bytes`
	///
	/// # Errors
	///
	/// See [`Lyrics3v2Field::read`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::lyrics3::{FieldBody, Lyrics3v2Field};
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let field = Lyrics3v2Field::from_bytes(b"\0\0EAL00011Moon Safari")?;
	/// assert_eq!(field.body(), &FieldBody::Album(String::from("Moon Safari")));
	/// # Ok(()) }
	/// ```
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Self::read(&mut Cursor::new(bytes))
	}

	/// Create a field from an ID3v2 frame
	///
	/// Returns `None` if the frame translates to no field, such as an empty album.
	///
	/// # Errors
	///
	/// * The frame has no Lyrics3v2 counterpart, [`ErrorKind::UnsupportedFrameKind`](crate::error::ErrorKind::UnsupportedFrameKind)
	pub fn from_id3v2_frame(frame: &Id3v2Frame) -> Result<Option<Self>> {
		Ok(translate_frame(frame)?.map(Self::new))
	}

	/// The field ID
	pub fn id(&self) -> &str {
		self.body.id()
	}

	/// The body of the field
	pub fn body(&self) -> &FieldBody {
		&self.body
	}

	/// A mutable reference to the body of the field
	pub fn body_mut(&mut self) -> &mut FieldBody {
		&mut self.body
	}

	/// Consume the field, returning its body
	pub fn into_body(self) -> FieldBody {
		self.body
	}

	/// The size of the written field, including the ID and size prefix
	///
	/// This is the size with [`WriteOptions::save_empty_fields`] enabled. A field with an empty
	/// body is 8 bytes here, even though it is skipped entirely when empty fields aren't saved.
	pub fn size(&self) -> usize {
		FIELD_ID_LEN + FIELD_SIZE_LEN + self.body.size()
	}

	/// Write the field
	///
	/// A field with an empty body is only written if [`WriteOptions::save_empty_fields`] is
	/// enabled. Otherwise, nothing at all is written.
	///
	/// # Errors
	///
	/// * The field data is longer than 99999 bytes
	/// * See [`FieldBody::as_bytes`]
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		if self.body.is_empty() && !write_options.save_empty_fields {
			log::debug!("Skipping empty Lyrics3v2 field `{}`", self.id());
			return Ok(Vec::new());
		}

		let data = self.body.as_bytes(write_options.lossy_text_encoding)?;
		if data.len() > MAX_FIELD_DATA_LEN {
			err!(TooMuchData);
		}

		let mut bytes = Vec::with_capacity(FIELD_ID_LEN + FIELD_SIZE_LEN + data.len());
		bytes.extend(self.id().as_bytes());
		bytes.extend(format!("{:05}", data.len()).as_bytes());
		bytes.extend(data);

		Ok(bytes)
	}
}

impl Display for Lyrics3v2Field {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} : {}", self.id(), self.body)
	}
}

/// Parse a string of ASCII digits
pub(crate) fn parse_digits(digits: &[u8]) -> Option<usize> {
	if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
		return None;
	}

	digits.iter().try_fold(0_usize, |acc, digit| {
		acc.checked_mul(10)?.checked_add(usize::from(digit - b'0'))
	})
}
