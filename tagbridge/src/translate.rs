//! ID3v2 to Lyrics3v2 translation
//!
//! Lyrics3v2 can only express a handful of the concepts ID3v2 can. Each supported frame ID maps to
//! a destination field, and a rule for extracting the payload from the frame. Any other frame ID is
//! rejected with [`ErrorKind::UnsupportedFrameKind`].
//!
//! | ID3v2        | Lyrics3v2 | Rule                                           |
//! |--------------|-----------|------------------------------------------------|
//! | `USLT`       | `LYR`     | One line per line of text                      |
//! | `SYLT`       | `LYR`     | One line per synchronized entry                |
//! | `COMM`       | `INF`     | The comment text, verbatim                     |
//! | `TCOM`       | `AUT`     | The text, even if empty                        |
//! | `TALB`       | `EAL`     | The text, with no field produced if it's empty |
//! | `TPE1`       | `EAR`     | The text, with no field produced if it's empty |
//! | `TIT2`       | `ETT`     | The text, with no field produced if it's empty |
//!
//! Trailing nulls are trimmed from the text of the `T***` frames only.

use crate::error::{ErrorKind, Result, TagBridgeError};
use crate::field::names;
use crate::id3::v2::{Id3v2Frame, TimestampFormat};
use crate::lyrics3::{FieldBody, LyricLine, Lyrics3Timestamp};

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ExtractionRule {
	UnsynchronizedLines,
	SynchronizedLines,
	Verbatim,
	TextOrEmpty,
	TextIfPresent,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TargetField {
	Lyrics,
	AdditionalInfo,
	Author,
	Album,
	Artist,
	Title,
}

enum Payload {
	Text(String),
	Lines(Vec<LyricLine>),
}

impl TargetField {
	fn build(self, payload: Payload) -> FieldBody {
		match (self, payload) {
			(TargetField::Lyrics, Payload::Lines(lines)) => FieldBody::Lyrics(lines),
			(TargetField::Lyrics, Payload::Text(text)) => {
				FieldBody::Lyrics(vec![LyricLine::new(text)])
			},
			(_, Payload::Lines(lines)) => self.build(Payload::Text(
				lines
					.into_iter()
					.map(|line| line.text)
					.collect::<Vec<_>>()
					.join("\r\n"),
			)),
			(TargetField::AdditionalInfo, Payload::Text(text)) => FieldBody::AdditionalInfo(text),
			(TargetField::Author, Payload::Text(text)) => FieldBody::Author(text),
			(TargetField::Album, Payload::Text(text)) => FieldBody::Album(text),
			(TargetField::Artist, Payload::Text(text)) => FieldBody::Artist(text),
			(TargetField::Title, Payload::Text(text)) => FieldBody::Title(text),
		}
	}
}

type TranslationTable = HashMap<&'static str, (ExtractionRule, TargetField)>;

fn translation_table() -> &'static TranslationTable {
	static INSTANCE: OnceLock<TranslationTable> = OnceLock::new();
	INSTANCE.get_or_init(|| {
		HashMap::from([
			("USLT", (ExtractionRule::UnsynchronizedLines, TargetField::Lyrics)),
			("SYLT", (ExtractionRule::SynchronizedLines, TargetField::Lyrics)),
			("COMM", (ExtractionRule::Verbatim, TargetField::AdditionalInfo)),
			("TCOM", (ExtractionRule::TextOrEmpty, TargetField::Author)),
			("TALB", (ExtractionRule::TextIfPresent, TargetField::Album)),
			("TPE1", (ExtractionRule::TextIfPresent, TargetField::Artist)),
			("TIT2", (ExtractionRule::TextIfPresent, TargetField::Title)),
		])
	})
}

/// Whether [`translate_frame`] has a mapping for `id`
pub fn is_translatable(id: &str) -> bool {
	translation_table().contains_key(id)
}

/// Translate an ID3v2 frame into the body of a Lyrics3v2 field
///
/// Returns `None` if the frame has a mapping, but its content produces no field. See the
/// [module documentation](self) for the mappings.
///
/// # Errors
///
/// * The frame has no mapping, [`ErrorKind::UnsupportedFrameKind`]
///
/// # Examples
///
/// ```rust
/// use tagbridge::id3::v2::Id3v2Frame;
/// use tagbridge::lyrics3::FieldBody;
/// use tagbridge::translate::translate_frame;
///
/// # fn main() -> tagbridge::error::Result<()> {
/// let album = Id3v2Frame::text("TALB", "Moon Safari")?;
/// assert_eq!(
/// 	translate_frame(&album)?,
/// 	Some(FieldBody::Album(String::from("Moon Safari")))
/// );
///
/// let empty_album = Id3v2Frame::text("TALB", "")?;
/// assert_eq!(translate_frame(&empty_album)?, None);
///
/// let bpm = Id3v2Frame::text("TBPM", "120")?;
/// assert!(translate_frame(&bpm).unwrap_err().is_unsupported_frame_kind());
/// # Ok(()) }
/// ```
pub fn translate_frame(frame: &Id3v2Frame) -> Result<Option<FieldBody>> {
	let Some(&(rule, target)) = translation_table().get(frame.id_str()) else {
		return Err(TagBridgeError::new(ErrorKind::UnsupportedFrameKind(
			frame.id_str().to_owned(),
		)));
	};

	log::trace!("Translating frame `{}` to {:?}", frame.id(), target);

	let payload = match rule {
		ExtractionRule::UnsynchronizedLines => {
			let text = frame_text(frame);
			let lines = text
				.split('\n')
				.map(|line| LyricLine::new(line.strip_suffix('\r').unwrap_or(line)))
				.collect();

			Payload::Lines(lines)
		},
		ExtractionRule::SynchronizedLines => Payload::Lines(synchronized_lines(frame)),
		ExtractionRule::Verbatim => Payload::Text(frame_text(frame).to_owned()),
		ExtractionRule::TextOrEmpty => Payload::Text(text_information(frame)),
		ExtractionRule::TextIfPresent => {
			let text = text_information(frame);
			if text.is_empty() {
				return Ok(None);
			}

			Payload::Text(text)
		},
	};

	Ok(Some(target.build(payload)))
}

fn frame_text(frame: &Id3v2Frame) -> &str {
	frame.body().text(names::TEXT).unwrap_or_default()
}

// ID3v2.4 text frames may hold multiple null separated values, which Lyrics3v2 can't express
fn text_information(frame: &Id3v2Frame) -> String {
	frame_text(frame).trim_end_matches('\0').to_owned()
}

fn synchronized_lines(frame: &Id3v2Frame) -> Vec<LyricLine> {
	let body = frame.body();
	let Some(entries) = body.synced_text(names::SYNCED_TEXT) else {
		return Vec::new();
	};

	let timestamp_format = body
		.number(names::TIMESTAMP_FORMAT)
		.and_then(|format| u8::try_from(format).ok())
		.and_then(TimestampFormat::from_u8);

	if timestamp_format != Some(TimestampFormat::Milliseconds) {
		log::warn!(
			"Dropping the timestamps of `{}`, only millisecond timestamps can be converted",
			frame.id()
		);
	}

	entries
		.iter()
		.map(|(time, text)| {
			let mut line = LyricLine::new(text.as_str());
			if timestamp_format == Some(TimestampFormat::Milliseconds) {
				match Lyrics3Timestamp::from_millis(u64::from(*time)) {
					Ok(timestamp) => line.timestamps.push(timestamp),
					Err(e) => log::warn!("Dropping a synchronized lyrics timestamp: {}", e),
				}
			}

			line
		})
		.collect()
}
