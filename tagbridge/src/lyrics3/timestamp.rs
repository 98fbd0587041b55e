use crate::error::{Result, TagBridgeError};
use crate::macros::err;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A Lyrics3v2 timestamp
///
/// This is written as `[mm:ss]`, always 7 characters. As such, the largest representable time is
/// `[99:59]`.
///
/// # Examples
///
/// ```rust
/// use tagbridge::lyrics3::Lyrics3Timestamp;
///
/// # fn main() -> tagbridge::error::Result<()> {
/// let timestamp: Lyrics3Timestamp = "[01:05]".parse()?;
/// assert_eq!(timestamp.as_millis(), 65_000);
///
/// let timestamp = Lyrics3Timestamp::from_millis(65_999)?;
/// assert_eq!(timestamp.to_string(), "[01:05]");
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lyrics3Timestamp {
	minutes: u8,
	seconds: u8,
}

impl Lyrics3Timestamp {
	/// The length of a timestamp when written
	pub const SIZE: usize = 7;

	/// Create a new `Lyrics3Timestamp`
	///
	/// # Errors
	///
	/// * `minutes` > 99
	/// * `seconds` > 59
	pub fn new(minutes: u8, seconds: u8) -> Result<Self> {
		if minutes > 99 {
			err!(BadTimestamp("Minutes must not exceed 99"));
		}

		if seconds > 59 {
			err!(BadTimestamp("Seconds must not exceed 59"));
		}

		Ok(Self { minutes, seconds })
	}

	/// Create a `Lyrics3Timestamp` from a time in milliseconds
	///
	/// Anything below a second is truncated.
	///
	/// # Errors
	///
	/// * `millis` is larger than `[99:59]`
	pub fn from_millis(millis: u64) -> Result<Self> {
		let total_seconds = millis / 1000;
		let (Ok(minutes), Ok(seconds)) = (
			u8::try_from(total_seconds / 60),
			u8::try_from(total_seconds % 60),
		) else {
			err!(BadTimestamp("Timestamp is too large"));
		};

		Self::new(minutes, seconds)
	}

	/// The minutes
	pub fn minutes(&self) -> u8 {
		self.minutes
	}

	/// The seconds
	pub fn seconds(&self) -> u8 {
		self.seconds
	}

	/// The total time in milliseconds
	pub fn as_millis(&self) -> u64 {
		(u64::from(self.minutes) * 60 + u64::from(self.seconds)) * 1000
	}
}

impl FromStr for Lyrics3Timestamp {
	type Err = TagBridgeError;

	fn from_str(s: &str) -> Result<Self> {
		let bytes = s.as_bytes();
		if bytes.len() != Self::SIZE || bytes[0] != b'[' || bytes[3] != b':' || bytes[6] != b']' {
			err!(BadTimestamp("Timestamp is not in the form `[mm:ss]`"));
		}

		let digits = |part: &[u8]| -> Result<u8> {
			if !part.iter().all(u8::is_ascii_digit) {
				err!(BadTimestamp("Timestamp contains non-digit characters"));
			}

			Ok((part[0] - b'0') * 10 + (part[1] - b'0'))
		};

		Self::new(digits(&bytes[1..3])?, digits(&bytes[4..6])?)
	}
}

impl Display for Lyrics3Timestamp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{:02}:{:02}]", self.minutes, self.seconds)
	}
}

impl From<Lyrics3Timestamp> for u64 {
	fn from(input: Lyrics3Timestamp) -> Self {
		input.as_millis()
	}
}
