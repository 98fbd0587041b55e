use super::Lyrics3Timestamp;
use crate::error::{ErrorKind, Result, TagBridgeError};
use crate::macros::err;

use std::fmt::{Display, Formatter};

const DELIMITER: &str = "||";

/// A single image link from an `IMG` field
///
/// On the wire, an image is `filename||description||[mm:ss]`, where the timestamp is optional.
///
/// Two images are only equal if their filename, description, and timestamp (including its
/// presence) are all equal.
///
/// # Examples
///
/// ```rust
/// use tagbridge::lyrics3::{Lyrics3Image, Lyrics3Timestamp};
///
/// # fn main() -> tagbridge::error::Result<()> {
/// let mut image = Lyrics3Image::new("cover.jpg", "Front cover");
/// image.set_timestamp(Some(Lyrics3Timestamp::new(1, 30)?));
///
/// let written = image.write_string();
/// assert_eq!(written, "cover.jpg||Front cover||[01:30]");
/// assert_eq!(image.size(), written.len());
///
/// assert_eq!(Lyrics3Image::read_string(&written, 0)?, image);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Lyrics3Image {
	filename: String,
	description: String,
	timestamp: Option<Lyrics3Timestamp>,
}

impl Lyrics3Image {
	/// Create a new `Lyrics3Image` with no timestamp
	pub fn new(filename: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			filename: filename.into(),
			description: description.into(),
			timestamp: None,
		}
	}

	/// The filename (or URL) of the image
	pub fn filename(&self) -> &str {
		&self.filename
	}

	/// Set the filename
	pub fn set_filename(&mut self, filename: String) {
		self.filename = filename;
	}

	/// The description of the image
	pub fn description(&self) -> &str {
		&self.description
	}

	/// Set the description
	pub fn set_description(&mut self, description: String) {
		self.description = description;
	}

	/// The time the image should be displayed, if any
	pub fn timestamp(&self) -> Option<Lyrics3Timestamp> {
		self.timestamp
	}

	/// Set the timestamp
	pub fn set_timestamp(&mut self, timestamp: Option<Lyrics3Timestamp>) {
		self.timestamp = timestamp;
	}

	/// The length of the written image, in characters
	///
	/// The filename and description are each followed by a 2 character delimiter.
	pub fn size(&self) -> usize {
		let mut size = self.filename.chars().count() + 2 + self.description.chars().count() + 2;
		if self.timestamp.is_some() {
			size += Lyrics3Timestamp::SIZE;
		}

		size
	}

	/// Read an image from `image_string`, starting at `offset`
	///
	/// A timestamp is only read if exactly [`Lyrics3Timestamp::SIZE`] characters remain after the
	/// description. Anything else after the description is ignored.
	///
	/// # Errors
	///
	/// * `offset` is out of bounds, or not on a character boundary
	/// * Either delimiter is missing
	/// * The timestamp is malformed
	pub fn read_string(image_string: &str, offset: usize) -> Result<Self> {
		if offset > image_string.len() || !image_string.is_char_boundary(offset) {
			err!(TextDecode("Lyrics3v2 image offset is out of bounds"));
		}

		let remaining = &image_string[offset..];
		let mut parts = remaining.splitn(3, DELIMITER);

		let (Some(filename), Some(description), Some(timestamp)) =
			(parts.next(), parts.next(), parts.next())
		else {
			return Err(TagBridgeError::new(ErrorKind::TextDecode(
				"Lyrics3v2 image is missing a delimiter",
			)));
		};

		let timestamp = match timestamp.len() {
			0 => None,
			Lyrics3Timestamp::SIZE => Some(timestamp.parse::<Lyrics3Timestamp>()?),
			_ => {
				log::warn!("Ignoring an image timestamp of an invalid length: {:?}", timestamp);
				None
			},
		};

		Ok(Self {
			filename: filename.to_owned(),
			description: description.to_owned(),
			timestamp,
		})
	}

	/// Write the image as a string
	pub fn write_string(&self) -> String {
		let mut written = format!(
			"{}{DELIMITER}{}{DELIMITER}",
			self.filename, self.description
		);

		if let Some(timestamp) = self.timestamp {
			written.push_str(&timestamp.to_string());
		}

		written
	}
}

impl Display for Lyrics3Image {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"filename = {}, description = {}",
			self.filename, self.description
		)?;

		if let Some(timestamp) = self.timestamp {
			write!(f, ", timestamp = {timestamp}")?;
		}

		Ok(())
	}
}
