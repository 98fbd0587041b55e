//! A bounded, position-tracking reader over an in-memory byte region
//!
//! Every typed field decodes itself from a [`Cursor`]. A cursor never reads past its limit, and
//! only moves forward.

use crate::error::{BoundsError, ErrorKind, Result, TagBridgeError};

/// A bounded view over a byte slice
///
/// The invariant `position <= limit <= buffer.len()` always holds. Reads advance `position`, and
/// nothing ever moves `limit`. To read a sub-region, use [`Cursor::take`], which hands out a new
/// cursor with a tighter limit.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
	buffer: &'a [u8],
	position: usize,
	limit: usize,
}

/// The result of a scan for a string terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned<'a> {
	/// The bytes preceding the terminator (or the limit)
	pub bytes: &'a [u8],
	/// Whether a terminator was found and consumed
	pub terminated: bool,
}

impl<'a> Cursor<'a> {
	/// Create a new cursor over the entirety of `buffer`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::cursor::Cursor;
	///
	/// let cursor = Cursor::new(b"TIT2");
	/// assert_eq!(cursor.remaining(), 4);
	/// ```
	pub fn new(buffer: &'a [u8]) -> Self {
		Self {
			buffer,
			position: 0,
			limit: buffer.len(),
		}
	}

	/// The current position, relative to the start of the underlying buffer
	pub fn position(&self) -> usize {
		self.position
	}

	/// The position past which nothing may be read
	pub fn limit(&self) -> usize {
		self.limit
	}

	/// The number of bytes left before the limit
	pub fn remaining(&self) -> usize {
		self.limit - self.position
	}

	/// Whether the cursor has reached its limit
	pub fn is_exhausted(&self) -> bool {
		self.position == self.limit
	}

	fn bounds_error(&self, requested: usize) -> TagBridgeError {
		BoundsError {
			position: self.position,
			requested,
			limit: self.limit,
		}
		.into()
	}

	/// Read exactly `n` bytes
	///
	/// # Errors
	///
	/// * Fewer than `n` bytes remain before the limit, nothing is consumed
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::cursor::Cursor;
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let mut cursor = Cursor::new(&[1, 2, 3]);
	/// assert_eq!(cursor.read_fixed(2)?, &[1, 2]);
	///
	/// // Never zero padded or truncated
	/// assert!(cursor.read_fixed(2).is_err());
	/// assert_eq!(cursor.position(), 2);
	/// # Ok(()) }
	/// ```
	pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(self.bounds_error(n));
		}

		let start = self.position;
		self.position += n;
		Ok(&self.buffer[start..self.position])
	}

	/// Read a single byte
	///
	/// # Errors
	///
	/// * The cursor is exhausted
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_fixed(1)?[0])
	}

	/// Read up to `max_len` bytes, stopping at (and consuming) the first zero byte
	///
	/// The returned bytes never include the terminator. If no terminator is found, the cursor is
	/// left at the end of the scanned region.
	pub fn read_until_zero(&mut self, max_len: usize) -> Scanned<'a> {
		let start = self.position;
		let end = start + max_len.min(self.remaining());
		let region = &self.buffer[start..end];

		match region.iter().position(|b| *b == 0) {
			Some(terminator) => {
				self.position = start + terminator + 1;
				Scanned {
					bytes: &region[..terminator],
					terminated: true,
				}
			},
			None => {
				self.position = end;
				Scanned {
					bytes: region,
					terminated: false,
				}
			},
		}
	}

	/// Same as [`Cursor::read_until_zero`], but the terminator is a 2-byte aligned `0x00 0x00`
	///
	/// This is the terminator for UTF-16 text.
	pub fn read_until_wide_zero(&mut self, max_len: usize) -> Scanned<'a> {
		let start = self.position;
		let end = start + max_len.min(self.remaining());
		let region = &self.buffer[start..end];

		let terminator = region
			.chunks_exact(2)
			.position(|pair| pair == [0, 0])
			.map(|index| index * 2);

		match terminator {
			Some(terminator) => {
				self.position = start + terminator + 2;
				Scanned {
					bytes: &region[..terminator],
					terminated: true,
				}
			},
			None => {
				self.position = end;
				Scanned {
					bytes: region,
					terminated: false,
				}
			},
		}
	}

	/// Read everything up to the limit
	pub fn read_remaining(&mut self) -> &'a [u8] {
		let start = self.position;
		self.position = self.limit;
		&self.buffer[start..self.limit]
	}

	/// Skip over any zero bytes, leaving the cursor on the next non-zero byte
	///
	/// # Errors
	///
	/// * There is no non-zero byte before the limit, [`ErrorKind::EndOfBuffer`]. The cursor is
	///   left exhausted.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::cursor::Cursor;
	///
	/// # fn main() -> tagbridge::error::Result<()> {
	/// let mut cursor = Cursor::new(&[0, 0, b'A']);
	/// cursor.skip_leading_zeros()?;
	/// assert_eq!(cursor.position(), 2);
	///
	/// let mut padding = Cursor::new(&[0, 0, 0]);
	/// assert!(padding.skip_leading_zeros().unwrap_err().is_end_of_buffer());
	/// # Ok(()) }
	/// ```
	pub fn skip_leading_zeros(&mut self) -> Result<()> {
		let region = &self.buffer[self.position..self.limit];
		match region.iter().position(|b| *b != 0) {
			Some(offset) => {
				self.position += offset;
				Ok(())
			},
			None => {
				self.position = self.limit;
				Err(TagBridgeError::new(ErrorKind::EndOfBuffer))
			},
		}
	}

	/// Split off the next `len` bytes as their own cursor
	///
	/// The returned cursor starts at the current position, and is limited to `len` bytes. This
	/// cursor is advanced past the region.
	///
	/// # Errors
	///
	/// * Fewer than `len` bytes remain before the limit
	pub fn take(&mut self, len: usize) -> Result<Cursor<'a>> {
		if len > self.remaining() {
			return Err(self.bounds_error(len));
		}

		let sub_cursor = Cursor {
			buffer: self.buffer,
			position: self.position,
			limit: self.position + len,
		};

		self.position += len;
		Ok(sub_cursor)
	}
}

impl<'a> From<&'a [u8]> for Cursor<'a> {
	fn from(buffer: &'a [u8]) -> Self {
		Cursor::new(buffer)
	}
}
