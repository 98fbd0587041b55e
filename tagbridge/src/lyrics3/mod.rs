//! Lyrics3v2 items
//!
//! Lyrics3v2 is a line-oriented tag, appended to MP3 files between the audio and the ID3v1 tag.
//! Every field is Latin-1 text, prefixed by a 3 character ID and a 5 digit size.
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Lyrics3v2Field`]
//! * [`Lyrics3v2Tag`]

mod body;
mod field;
mod image;
mod tag;
mod timestamp;

pub use body::{FieldBody, Indications, LyricLine};
pub use field::{FIELD_ID_LEN, FIELD_SIZE_LEN, Lyrics3v2Field, is_valid_field_id};
pub use image::Lyrics3Image;
pub use tag::{LYRICS3V2_FOOTER, LYRICS3V2_HEADER, Lyrics3v2Tag};
pub use timestamp::Lyrics3Timestamp;
