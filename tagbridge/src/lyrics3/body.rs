use super::{Lyrics3Image, Lyrics3Timestamp};
use crate::error::{ErrorKind, Result, TagBridgeError};
use crate::util::text::{TextEncoding, latin1_decode};

use std::fmt::{Display, Formatter};

const LINE_SEPARATOR: &str = "\r\n";

/// A single line of an `LYR` field
///
/// A line can be displayed at any number of times, each written before the text as a
/// [`Lyrics3Timestamp`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LyricLine {
	/// The times this line is displayed
	pub timestamps: Vec<Lyrics3Timestamp>,
	/// The text of the line
	pub text: String,
}

impl LyricLine {
	/// Create a line with no timestamps
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			timestamps: Vec::new(),
			text: text.into(),
		}
	}

	fn parse(mut line: &str) -> Self {
		let mut timestamps = Vec::new();
		while let Some(candidate) = line.get(..Lyrics3Timestamp::SIZE) {
			// Something like `[chorus]` is just text
			let Ok(timestamp) = candidate.parse::<Lyrics3Timestamp>() else {
				break;
			};

			timestamps.push(timestamp);
			line = &line[Lyrics3Timestamp::SIZE..];
		}

		Self {
			timestamps,
			text: line.to_owned(),
		}
	}

	fn size(&self) -> usize {
		self.timestamps.len() * Lyrics3Timestamp::SIZE + self.text.chars().count()
	}
}

impl Display for LyricLine {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for timestamp in &self.timestamps {
			write!(f, "{timestamp}")?;
		}

		f.write_str(&self.text)
	}
}

/// The `IND` field
///
/// Each indication is written as a single `'0'` or `'1'` character.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct Indications {
	/// An `LYR` field is present
	pub lyrics_present: bool,
	/// The `LYR` field contains timestamps
	pub timestamps_present: bool,
	/// The track should not be chosen by random selection
	pub inhibit_random_selection: bool,
}

impl Indications {
	const SIZE: usize = 3;

	fn parse(data: &[u8]) -> Result<Self> {
		// Older writers only store the first two indications
		if !(2..=Self::SIZE).contains(&data.len()) {
			return Err(TagBridgeError::new(ErrorKind::TextDecode(
				"Lyrics3v2 indications must be 2 or 3 characters",
			)));
		}

		let mut flags = [false; Self::SIZE];
		for (flag, c) in flags.iter_mut().zip(data) {
			*flag = match c {
				b'0' => false,
				b'1' => true,
				_ => {
					return Err(TagBridgeError::new(ErrorKind::TextDecode(
						"Lyrics3v2 indications must be '0' or '1'",
					)));
				},
			};
		}

		let [lyrics_present, timestamps_present, inhibit_random_selection] = flags;
		Ok(Self {
			lyrics_present,
			timestamps_present,
			inhibit_random_selection,
		})
	}

	fn as_bytes(&self) -> [u8; Self::SIZE] {
		let flag = |set: bool| if set { b'1' } else { b'0' };
		[
			flag(self.lyrics_present),
			flag(self.timestamps_present),
			flag(self.inhibit_random_selection),
		]
	}
}

/// The body of a Lyrics3v2 field
///
/// Every body besides [`FieldBody::Unsupported`] is Latin-1 text on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FieldBody {
	/// `IND`
	Indications(Indications),
	/// `LYR`, lines separated by CRLF
	Lyrics(Vec<LyricLine>),
	/// `INF`, additional information
	AdditionalInfo(String),
	/// `AUT`, the lyrics author
	Author(String),
	/// `EAL`, extended album name
	Album(String),
	/// `EAR`, extended artist name
	Artist(String),
	/// `ETT`, extended track title
	Title(String),
	/// `IMG`, image links separated by CRLF
	Images(Vec<Lyrics3Image>),
	/// A structurally valid field this crate doesn't understand, kept verbatim
	Unsupported {
		/// The field ID
		id: String,
		/// The field data
		data: Vec<u8>,
	},
}

impl FieldBody {
	/// The field ID of this body
	pub fn id(&self) -> &str {
		match self {
			FieldBody::Indications(_) => "IND",
			FieldBody::Lyrics(_) => "LYR",
			FieldBody::AdditionalInfo(_) => "INF",
			FieldBody::Author(_) => "AUT",
			FieldBody::Album(_) => "EAL",
			FieldBody::Artist(_) => "EAR",
			FieldBody::Title(_) => "ETT",
			FieldBody::Images(_) => "IMG",
			FieldBody::Unsupported { id, .. } => id,
		}
	}

	/// Parse the data of the field `id`
	///
	/// `id` is assumed to be valid, see [`is_valid_field_id`](super::is_valid_field_id).
	///
	/// # Errors
	///
	/// * The data of an `IND` or `IMG` field is malformed
	pub fn parse(id: &str, data: &[u8]) -> Result<Self> {
		let body = match id {
			"IND" => FieldBody::Indications(Indications::parse(data)?),
			"LYR" => {
				let text = latin1_decode(data);
				if text.is_empty() {
					FieldBody::Lyrics(Vec::new())
				} else {
					FieldBody::Lyrics(text.split(LINE_SEPARATOR).map(LyricLine::parse).collect())
				}
			},
			"INF" => FieldBody::AdditionalInfo(latin1_decode(data)),
			"AUT" => FieldBody::Author(latin1_decode(data)),
			"EAL" => FieldBody::Album(latin1_decode(data)),
			"EAR" => FieldBody::Artist(latin1_decode(data)),
			"ETT" => FieldBody::Title(latin1_decode(data)),
			"IMG" => {
				let text = latin1_decode(data);
				let mut images = Vec::new();
				if !text.is_empty() {
					for entry in text.split(LINE_SEPARATOR) {
						images.push(Lyrics3Image::read_string(entry, 0)?);
					}
				}

				FieldBody::Images(images)
			},
			_ => {
				log::debug!("Keeping unsupported Lyrics3v2 field `{}` verbatim", id);
				FieldBody::Unsupported {
					id: id.to_owned(),
					data: data.to_vec(),
				}
			},
		};

		Ok(body)
	}

	/// The text of a text body
	///
	/// Returns `None` for [`FieldBody::Indications`], [`FieldBody::Lyrics`], [`FieldBody::Images`],
	/// and [`FieldBody::Unsupported`].
	pub fn text(&self) -> Option<&str> {
		match self {
			FieldBody::AdditionalInfo(text)
			| FieldBody::Author(text)
			| FieldBody::Album(text)
			| FieldBody::Artist(text)
			| FieldBody::Title(text) => Some(text),
			_ => None,
		}
	}

	/// The length of the field data
	pub fn size(&self) -> usize {
		match self {
			FieldBody::Indications(_) => Indications::SIZE,
			FieldBody::Lyrics(lines) => joined_size(lines.iter().map(LyricLine::size)),
			FieldBody::Images(images) => joined_size(images.iter().map(Lyrics3Image::size)),
			FieldBody::Unsupported { data, .. } => data.len(),
			FieldBody::AdditionalInfo(text)
			| FieldBody::Author(text)
			| FieldBody::Album(text)
			| FieldBody::Artist(text)
			| FieldBody::Title(text) => text.chars().count(),
		}
	}

	/// Whether there is no field data
	pub fn is_empty(&self) -> bool {
		self.size() == 0
	}

	/// Write the field data
	///
	/// # Errors
	///
	/// * `lossy` is disabled, and the text contains characters that cannot be represented in Latin-1
	pub fn as_bytes(&self, lossy: bool) -> Result<Vec<u8>> {
		let text = match self {
			FieldBody::Indications(indications) => return Ok(indications.as_bytes().to_vec()),
			FieldBody::Unsupported { data, .. } => return Ok(data.clone()),
			FieldBody::Lyrics(lines) => lines
				.iter()
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(LINE_SEPARATOR),
			FieldBody::Images(images) => images
				.iter()
				.map(Lyrics3Image::write_string)
				.collect::<Vec<_>>()
				.join(LINE_SEPARATOR),
			FieldBody::AdditionalInfo(text)
			| FieldBody::Author(text)
			| FieldBody::Album(text)
			| FieldBody::Artist(text)
			| FieldBody::Title(text) => text.clone(),
		};

		Ok(TextEncoding::Latin1.encode(&text, false, lossy)?)
	}
}

fn joined_size(sizes: impl ExactSizeIterator<Item = usize>) -> usize {
	let separators = sizes.len().saturating_sub(1) * LINE_SEPARATOR.len();
	sizes.sum::<usize>() + separators
}

impl Display for FieldBody {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			FieldBody::Indications(indications) => {
				let bytes = indications.as_bytes();
				f.write_str(&latin1_decode(&bytes))
			},
			FieldBody::Lyrics(lines) => {
				for (index, line) in lines.iter().enumerate() {
					if index > 0 {
						writeln!(f)?;
					}
					write!(f, "{line}")?;
				}
				Ok(())
			},
			FieldBody::Images(images) => {
				for (index, image) in images.iter().enumerate() {
					if index > 0 {
						writeln!(f)?;
					}
					write!(f, "{image}")?;
				}
				Ok(())
			},
			FieldBody::Unsupported { data, .. } => write!(f, "<{} bytes>", data.len()),
			FieldBody::AdditionalInfo(text)
			| FieldBody::Author(text)
			| FieldBody::Album(text)
			| FieldBody::Artist(text)
			| FieldBody::Title(text) => f.write_str(text),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{FieldBody, Indications, LyricLine};
	use crate::lyrics3::{Lyrics3Image, Lyrics3Timestamp};

	#[test_log::test]
	fn lyrics_with_timestamps() {
		let data = b"[00:01][01:00]la la\r\n[chorus]\r\nmore";
		let body = FieldBody::parse("LYR", data).unwrap();

		let FieldBody::Lyrics(lines) = &body else {
			panic!("Expected lyrics");
		};

		assert_eq!(lines.len(), 3);
		assert_eq!(
			lines[0].timestamps,
			[
				Lyrics3Timestamp::new(0, 1).unwrap(),
				Lyrics3Timestamp::new(1, 0).unwrap()
			]
		);
		assert_eq!(lines[0].text, "la la");
		assert_eq!(lines[1], LyricLine::new("[chorus]"));
		assert_eq!(lines[2], LyricLine::new("more"));

		assert_eq!(body.size(), data.len());
		assert_eq!(body.as_bytes(false).unwrap(), data);
	}

	#[test_log::test]
	fn empty_lyrics() {
		let body = FieldBody::parse("LYR", b"").unwrap();
		assert_eq!(body, FieldBody::Lyrics(Vec::new()));
		assert!(body.is_empty());
	}

	#[test_log::test]
	fn indications() {
		let body = FieldBody::parse("IND", b"10").unwrap();
		assert_eq!(
			body,
			FieldBody::Indications(Indications {
				lyrics_present: true,
				..Indications::default()
			})
		);

		// Always written in full
		assert_eq!(body.as_bytes(false).unwrap(), b"100");

		assert!(FieldBody::parse("IND", b"1").is_err());
		assert!(FieldBody::parse("IND", b"1x0").is_err());
	}

	#[test_log::test]
	fn images() {
		let data = b"a.png||first||[00:10]\r\nb.png||||";
		let body = FieldBody::parse("IMG", data).unwrap();

		let mut first = Lyrics3Image::new("a.png", "first");
		first.set_timestamp(Some(Lyrics3Timestamp::new(0, 10).unwrap()));
		assert_eq!(
			body,
			FieldBody::Images(vec![first, Lyrics3Image::new("b.png", "")])
		);

		assert_eq!(body.size(), data.len());
		assert_eq!(body.as_bytes(false).unwrap(), data);
	}

	#[test_log::test]
	fn unsupported_is_verbatim() {
		let body = FieldBody::parse("XYZ", &[0xFF, 0x00, 0x01]).unwrap();
		assert_eq!(body.id(), "XYZ");
		assert_eq!(body.as_bytes(false).unwrap(), [0xFF, 0x00, 0x01]);
	}

	#[test_log::test]
	fn lossy_text() {
		let body = FieldBody::Title(String::from("\u{4e2d}\u{6587}"));
		assert!(body.as_bytes(false).is_err());
		assert_eq!(body.as_bytes(true).unwrap(), b"??");
		assert_eq!(body.size(), 2);
	}
}
