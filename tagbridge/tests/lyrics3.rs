#![allow(missing_docs)]

use tagbridge::config::{ParseOptions, ParsingMode, WriteOptions};
use tagbridge::cursor::Cursor;
use tagbridge::error::ErrorKind;
use tagbridge::lyrics3::{
	FieldBody, Indications, LyricLine, Lyrics3Image, Lyrics3Timestamp, Lyrics3v2Field,
	Lyrics3v2Tag,
};

fn timestamp(minutes: u8, seconds: u8) -> Lyrics3Timestamp {
	Lyrics3Timestamp::new(minutes, seconds).unwrap()
}

#[test_log::test]
fn padding_before_field() {
	let padded = Lyrics3v2Field::from_bytes(b"\x00\x00ABC00004\x01\x02\x03\x04").unwrap();
	let unpadded = Lyrics3v2Field::from_bytes(b"ABC00004\x01\x02\x03\x04").unwrap();

	assert_eq!(padded, unpadded);
	assert_eq!(
		padded.body(),
		&FieldBody::Unsupported {
			id: String::from("ABC"),
			data: vec![1, 2, 3, 4],
		}
	);
}

#[test_log::test]
fn scan_fields() {
	let bytes = b"EAR00003Air\x00\x00\x00EAL00011Moon Safari\x00\x00";

	let mut cursor = Cursor::new(bytes);
	let mut fields = Vec::new();
	loop {
		match Lyrics3v2Field::read(&mut cursor) {
			Ok(field) => fields.push(field),
			Err(e) if e.is_end_of_buffer() => break,
			Err(e) => panic!("Unexpected error: {e}"),
		}
	}

	assert_eq!(
		fields,
		[
			Lyrics3v2Field::new(FieldBody::Artist(String::from("Air"))),
			Lyrics3v2Field::new(FieldBody::Album(String::from("Moon Safari"))),
		]
	);
}

#[test_log::test]
fn image_round_trip() {
	let mut timed = Lyrics3Image::new("cover.jpg", "Front cover");
	timed.set_timestamp(Some(timestamp(0, 42)));

	let images = [
		Lyrics3Image::new("", ""),
		Lyrics3Image::new("", "Front cover"),
		Lyrics3Image::new("cover.jpg", ""),
		timed,
	];

	for image in images {
		let read = Lyrics3Image::read_string(&image.write_string(), 0).unwrap();
		assert_eq!(read.filename(), image.filename());
		assert_eq!(read.description(), image.description());
		assert_eq!(read.timestamp(), image.timestamp());
		assert_eq!(read, image);
	}
}

#[test_log::test]
fn full_tag() {
	let mut fields = Vec::new();
	fields.extend(b"IND00003110");
	fields.extend(b"LYR00025[00:01][00:30]la la\r\nmore");
	fields.extend(b"IMG00024cover.jpg||Front cover||");

	let mut bytes = b"LYRICSBEGIN".to_vec();
	bytes.extend(&fields);
	bytes.extend(format!("{:06}", 11 + fields.len()).as_bytes());
	bytes.extend(b"LYRICS200");

	let tag = Lyrics3v2Tag::parse(&bytes, ParseOptions::new()).unwrap();

	assert_eq!(
		tag.get("IND").map(Lyrics3v2Field::body),
		Some(&FieldBody::Indications(Indications {
			lyrics_present: true,
			timestamps_present: true,
			inhibit_random_selection: false,
		}))
	);

	let lyrics = tag.lyrics().unwrap();
	assert_eq!(lyrics[0].timestamps, [timestamp(0, 1), timestamp(0, 30)]);
	assert_eq!(lyrics[0].text, "la la");
	assert_eq!(lyrics[1], LyricLine::new("more"));

	assert_eq!(
		tag.get("IMG").map(Lyrics3v2Field::body),
		Some(&FieldBody::Images(vec![Lyrics3Image::new(
			"cover.jpg",
			"Front cover"
		)]))
	);

	for field in tag.fields() {
		assert_eq!(
			field.size(),
			field.as_bytes(WriteOptions::default()).unwrap().len()
		);
	}

	assert_eq!(tag.as_bytes(WriteOptions::default()).unwrap(), bytes);
}

#[test_log::test]
fn truncated_field_in_tag() {
	let mut bytes = b"LYRICSBEGIN".to_vec();
	bytes.extend(b"EAR00003AirETT00099Sexy Boy");
	let size = bytes.len();
	bytes.extend(format!("{size:06}").as_bytes());
	bytes.extend(b"LYRICS200");

	let tag = Lyrics3v2Tag::parse(&bytes, ParseOptions::new()).unwrap();
	assert_eq!(tag.artist(), Some("Air"));
	assert!(tag.title().is_none());

	let err = Lyrics3v2Tag::parse(
		&bytes,
		ParseOptions::new().parsing_mode(ParsingMode::Strict),
	)
	.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Bounds(_)));
}

#[test_log::test]
fn lossy_text() {
	let field = Lyrics3v2Field::new(FieldBody::Title(String::from("Sexy Bøy ♥")));

	let err = field.as_bytes(WriteOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TextEncode(_)));

	assert_eq!(
		field
			.as_bytes(WriteOptions::new().lossy_text_encoding(true))
			.unwrap(),
		b"ETT00010Sexy B\xF8y ?"
	);
}
