//! ID3 specific items
//!
//! Only ID3v2.3 and ID3v2.4 frames are supported. Locating and parsing the tag header is left to the
//! caller, which hands each frame region to [`v2::Id3v2Frame::read`].

pub mod v2;
