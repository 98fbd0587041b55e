use super::field::parse_digits;
use super::{FieldBody, LyricLine, Lyrics3v2Field};
use crate::config::{ParseOptions, WriteOptions};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::id3::v2::Id3v2Frame;
use crate::macros::{err, invalid_tag, parse_mode_choice};
use crate::translate::translate_frame;

/// The marker at the start of every Lyrics3v2 tag
pub const LYRICS3V2_HEADER: &[u8; 11] = b"LYRICSBEGIN";
/// The marker at the end of every Lyrics3v2 tag
pub const LYRICS3V2_FOOTER: &[u8; 9] = b"LYRICS200";

const TAG_SIZE_LEN: usize = 6;
const MAX_TAG_SIZE: usize = 999_999;

macro_rules! impl_accessor {
	($($name:ident => $variant:ident;)+) => {
		paste::paste! {
			$(
				#[doc = "Get the text of the `" $variant "` field"]
				pub fn $name(&self) -> Option<&str> {
					self.fields.iter().find_map(|field| match field.body() {
						FieldBody::$variant(text) => Some(text.as_str()),
						_ => None,
					})
				}

				#[doc = "Set the text of the `" $variant "` field, replacing any existing one"]
				pub fn [<set_ $name>](&mut self, value: String) {
					self.insert(Lyrics3v2Field::new(FieldBody::$variant(value)));
				}

				#[doc = "Remove the `" $variant "` field"]
				pub fn [<remove_ $name>](&mut self) {
					self.fields
						.retain(|field| !matches!(field.body(), FieldBody::$variant(_)));
				}
			)+
		}
	}
}

/// A Lyrics3v2 tag
///
/// A tag is `LYRICSBEGIN`, followed by the fields, a 6 digit tag size, and `LYRICS200`. The size
/// covers everything but itself and the footer.
///
/// Each field ID appears at most once.
///
/// ## Conversions
///
/// ### From ID3v2
///
/// See [`Lyrics3v2Tag::from_id3v2_frames`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Lyrics3v2Tag {
	fields: Vec<Lyrics3v2Field>,
}

impl Lyrics3v2Tag {
	/// Create a new empty `Lyrics3v2Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::lyrics3::Lyrics3v2Tag;
	///
	/// let mut tag = Lyrics3v2Tag::new();
	/// tag.set_album(String::from("Moon Safari"));
	/// assert_eq!(tag.album(), Some("Moon Safari"));
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	impl_accessor!(
		title => Title;
		artist => Artist;
		album => Album;
		author => Author;
		comment => AdditionalInfo;
	);

	/// Get the lines of the `LYR` field
	pub fn lyrics(&self) -> Option<&[LyricLine]> {
		self.fields.iter().find_map(|field| match field.body() {
			FieldBody::Lyrics(lines) => Some(lines.as_slice()),
			_ => None,
		})
	}

	/// The fields, in the order they will be written
	pub fn fields(&self) -> &[Lyrics3v2Field] {
		&self.fields
	}

	/// Get a field by ID
	pub fn get(&self, id: &str) -> Option<&Lyrics3v2Field> {
		self.fields.iter().find(|field| field.id() == id)
	}

	/// Insert a field, returning the field it replaced
	pub fn insert(&mut self, field: Lyrics3v2Field) -> Option<Lyrics3v2Field> {
		match self.fields.iter_mut().find(|f| f.id() == field.id()) {
			Some(existing) => Some(std::mem::replace(existing, field)),
			None => {
				self.fields.push(field);
				None
			},
		}
	}

	/// Remove a field by ID
	pub fn remove(&mut self, id: &str) -> Option<Lyrics3v2Field> {
		let index = self.fields.iter().position(|field| field.id() == id)?;
		Some(self.fields.remove(index))
	}

	/// Whether the tag has no fields
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Parse a complete tag from `bytes`
	///
	/// # Errors
	///
	/// * `bytes` does not start with [`LYRICS3V2_HEADER`]
	/// * `bytes` does not end with a 6 digit size and [`LYRICS3V2_FOOTER`]
	/// * The tag size does not match the length of `bytes`
	///
	/// With [`ParsingMode::Strict`](crate::config::ParsingMode::Strict), any malformed field. Otherwise, reading
	/// stops at the first malformed field.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::config::ParseOptions;
	/// use tagbridge::lyrics3::Lyrics3v2Tag;
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let tag = Lyrics3v2Tag::parse(b"LYRICSBEGINEAL00011Moon Safari000030LYRICS200", ParseOptions::new())?;
	/// assert_eq!(tag.album(), Some("Moon Safari"));
	/// # Ok(()) }
	/// ```
	pub fn parse(bytes: &[u8], parse_options: ParseOptions) -> Result<Self> {
		let parsing_mode = parse_options.parsing_mode;

		let Some(content) = bytes.strip_prefix(LYRICS3V2_HEADER.as_slice()) else {
			invalid_tag!(@BAIL BadTagHeader);
		};

		let Some(content) = content.strip_suffix(LYRICS3V2_FOOTER.as_slice()) else {
			invalid_tag!(@BAIL BadTagFooter);
		};

		let Some(fields_len) = content.len().checked_sub(TAG_SIZE_LEN) else {
			invalid_tag!(@BAIL BadTagFooter);
		};

		let (fields_region, size) = content.split_at(fields_len);
		let Some(size) = parse_digits(size) else {
			invalid_tag!(@BAIL BadTagFooter);
		};

		if size != LYRICS3V2_HEADER.len() + fields_len {
			log::debug!(
				"Lyrics3v2 tag size mismatch (declared: {}, actual: {})",
				size,
				LYRICS3V2_HEADER.len() + fields_len
			);
			err!(SizeMismatch);
		}

		let mut tag = Self::new();
		let mut cursor = Cursor::new(fields_region);
		loop {
			match Lyrics3v2Field::read(&mut cursor) {
				Ok(field) => {
					if let Some(replaced) = tag.insert(field) {
						log::warn!("Replacing duplicate Lyrics3v2 field `{}`", replaced.id());
					}
				},
				Err(e) if e.is_end_of_buffer() => break,
				Err(e) => {
					parse_mode_choice!(
						parsing_mode,
						STRICT: return Err(e),
						DEFAULT: {
							log::warn!("Failed to read Lyrics3v2 field, stopping: {}", e);
							break;
						}
					);
				},
			}
		}

		Ok(tag)
	}

	/// Write the complete tag
	///
	/// # Errors
	///
	/// * The tag is larger than 999999 bytes
	/// * Any field fails to write, see [`Lyrics3v2Field::as_bytes`]
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		let mut bytes = LYRICS3V2_HEADER.to_vec();
		for field in &self.fields {
			bytes.extend(field.as_bytes(write_options)?);
		}

		if bytes.len() > MAX_TAG_SIZE {
			err!(TooMuchData);
		}

		bytes.extend(format!("{:06}", bytes.len()).as_bytes());
		bytes.extend(LYRICS3V2_FOOTER);

		Ok(bytes)
	}

	/// Create a tag from a set of ID3v2 frames
	///
	/// Frames without a Lyrics3v2 counterpart are skipped. Lyrics from every `USLT` and `SYLT`
	/// frame are appended to a single `LYR` field, in order. For every other field, the last
	/// frame wins.
	///
	/// # Errors
	///
	/// * A supported frame fails to translate, see [`Lyrics3v2Field::from_id3v2_frame`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::id3::v2::Id3v2Frame;
	/// use tagbridge::lyrics3::Lyrics3v2Tag;
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let frames = [
	/// 	Id3v2Frame::text("TALB", "Moon Safari")?,
	/// 	Id3v2Frame::text("TBPM", "120")?,
	/// ];
	///
	/// let tag = Lyrics3v2Tag::from_id3v2_frames(&frames)?;
	/// assert_eq!(tag.album(), Some("Moon Safari"));
	/// assert_eq!(tag.fields().len(), 1);
	/// # Ok(()) }
	/// ```
	pub fn from_id3v2_frames<'a, I>(frames: I) -> Result<Self>
	where
		I: IntoIterator<Item = &'a Id3v2Frame>,
	{
		let mut tag = Self::new();
		for frame in frames {
			let body = match translate_frame(frame) {
				Ok(Some(body)) => body,
				Ok(None) => {
					log::debug!("Frame `{}` produced no Lyrics3v2 field", frame.id());
					continue;
				},
				Err(e) if e.is_unsupported_frame_kind() => {
					log::debug!("Skipping frame `{}`, no Lyrics3v2 counterpart", frame.id());
					continue;
				},
				Err(e) => return Err(e),
			};

			tag.merge(body);
		}

		Ok(tag)
	}

	fn merge(&mut self, body: FieldBody) {
		if let FieldBody::Lyrics(new_lines) = body {
			for field in &mut self.fields {
				if let FieldBody::Lyrics(lines) = field.body_mut() {
					lines.extend(new_lines);
					return;
				}
			}

			self.fields
				.push(Lyrics3v2Field::new(FieldBody::Lyrics(new_lines)));
			return;
		}

		self.insert(Lyrics3v2Field::new(body));
	}
}
