#![allow(missing_docs)]

// Tests for ID3v2 to Lyrics3v2 conversions

use tagbridge::config::{ParseOptions, WriteOptions};
use tagbridge::id3::v2::{FrameBody, FrameId, Id3v2Frame, TimestampFormat};
use tagbridge::lyrics3::{FieldBody, LyricLine, Lyrics3Timestamp, Lyrics3v2Field, Lyrics3v2Tag};

fn unknown_frame() -> Id3v2Frame {
	Id3v2Frame::new(FrameBody::for_id(FrameId::new("XXXX").unwrap()))
}

#[test_log::test]
fn empty_composer_is_empty_author() {
	let frame = Id3v2Frame::text("TCOM", "").unwrap();
	let field = Lyrics3v2Field::from_id3v2_frame(&frame)
		.unwrap()
		.expect("an empty composer should still produce a field");

	assert_eq!(field.body(), &FieldBody::Author(String::new()));

	assert!(field.as_bytes(WriteOptions::default()).unwrap().is_empty());
	assert_eq!(
		field
			.as_bytes(WriteOptions::new().save_empty_fields(true))
			.unwrap(),
		b"AUT00000"
	);
}

#[test_log::test]
fn empty_album_produces_nothing() {
	let frame = Id3v2Frame::text("TALB", "").unwrap();
	assert!(Lyrics3v2Field::from_id3v2_frame(&frame).unwrap().is_none());
}

#[test_log::test]
fn album() {
	let frame = Id3v2Frame::text("TALB", "Moon Safari").unwrap();
	let field = Lyrics3v2Field::from_id3v2_frame(&frame).unwrap().unwrap();

	assert_eq!(field.id(), "EAL");
	assert_eq!(field.body(), &FieldBody::Album(String::from("Moon Safari")));
	assert_eq!(
		field.as_bytes(WriteOptions::default()).unwrap(),
		b"EAL00011Moon Safari"
	);
}

#[test_log::test]
fn lyrics_accumulate() {
	let frames = [
		Id3v2Frame::unsynchronized_lyrics("eng", "", "la la").unwrap(),
		Id3v2Frame::text("TIT2", "Sexy Boy").unwrap(),
		Id3v2Frame::unsynchronized_lyrics("eng", "", "more").unwrap(),
	];

	let tag = Lyrics3v2Tag::from_id3v2_frames(&frames).unwrap();

	assert_eq!(tag.fields().len(), 2);
	assert_eq!(
		tag.lyrics(),
		Some(&[LyricLine::new("la la"), LyricLine::new("more")][..])
	);
	assert_eq!(tag.title(), Some("Sexy Boy"));
}

#[test_log::test]
fn synchronized_and_unsynchronized_lyrics_accumulate() {
	let frames = [
		Id3v2Frame::synchronized_lyrics(
			"eng",
			TimestampFormat::Milliseconds,
			"",
			vec![(5_000, String::from("la la"))],
		)
		.unwrap(),
		Id3v2Frame::unsynchronized_lyrics("eng", "", "more").unwrap(),
	];

	let tag = Lyrics3v2Tag::from_id3v2_frames(&frames).unwrap();
	let lyrics = tag.lyrics().unwrap();

	assert_eq!(lyrics.len(), 2);
	assert_eq!(lyrics[0].timestamps, [Lyrics3Timestamp::new(0, 5).unwrap()]);
	assert_eq!(lyrics[0].text, "la la");
	assert_eq!(lyrics[1], LyricLine::new("more"));
}

#[test_log::test]
fn unknown_frame_skipped_in_bulk() {
	let frames = [
		Id3v2Frame::text("TPE1", "Air").unwrap(),
		unknown_frame(),
		Id3v2Frame::text("TALB", "Moon Safari").unwrap(),
	];

	let tag = Lyrics3v2Tag::from_id3v2_frames(&frames).unwrap();
	assert_eq!(tag.artist(), Some("Air"));
	assert_eq!(tag.album(), Some("Moon Safari"));
	assert_eq!(tag.fields().len(), 2);
}

#[test_log::test]
fn unknown_frame_fails_explicitly() {
	let err = Lyrics3v2Field::from_id3v2_frame(&unknown_frame()).unwrap_err();
	assert!(err.is_unsupported_frame_kind());
}

#[test_log::test]
fn migrated_tag_round_trip() {
	let frames = [
		Id3v2Frame::text("TIT2", "Kelly Watch the Stars").unwrap(),
		Id3v2Frame::text("TPE1", "Air").unwrap(),
		Id3v2Frame::comment("eng", "", "Track 6").unwrap(),
		Id3v2Frame::unsynchronized_lyrics("eng", "", "Kelly\r\nwatch the stars").unwrap(),
	];

	let tag = Lyrics3v2Tag::from_id3v2_frames(&frames).unwrap();
	let bytes = tag.as_bytes(WriteOptions::default()).unwrap();

	let reparsed = Lyrics3v2Tag::parse(&bytes, ParseOptions::new()).unwrap();
	assert_eq!(reparsed, tag);
	assert_eq!(reparsed.comment(), Some("Track 6"));
	assert_eq!(
		reparsed.lyrics(),
		Some(&[LyricLine::new("Kelly"), LyricLine::new("watch the stars")][..])
	);
}
