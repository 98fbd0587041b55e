//! ID3v2 frames and frame bodies
//!
//! ## Important notes
//!
//! See:
//!
//! * [`FrameBody`]
//! * [`Id3v2Frame`]

mod body;
mod frame;
mod registry;
mod synchsafe;

pub use body::FrameBody;
pub use frame::{FrameFlags, FrameId, Id3v2Frame, Id3v2Version, ParsedFrame, TimestampFormat};
pub use registry::{BodyConstructor, lookup_body_constructor};
