//! Utilities for working with unsynchronized ID3v2 content
//!
//! See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation) for an explanation.

/// Resynchronize an in-memory region
///
/// Every `0xFF 0x00` pair is read as a single `0xFF`.
pub(crate) fn resynchronize(content: &[u8]) -> Vec<u8> {
	let mut resynchronized = Vec::with_capacity(content.len());

	let mut encountered_ff = false;
	for &byte in content {
		if encountered_ff {
			encountered_ff = false;

			// Only skip the next byte if this is valid unsynchronization
			if byte == 0 {
				continue;
			}
		}

		resynchronized.push(byte);
		encountered_ff = byte == 0xFF;
	}

	resynchronized
}

/// An integer that can be converted from its synchsafe variant
///
/// A synchsafe integer only uses the lower 7 bits of each byte, so that it can never contain
/// an MPEG frame sync.
pub(crate) trait SynchsafeInteger: Sized {
	/// Unsynchronise a synchsafe integer
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3)
			| ((self & 0x7F_0000) >> 2)
			| ((self & 0x7F00) >> 1)
			| (self & 0x7F)
	}
}

#[cfg(test)]
mod tests {
	use super::{SynchsafeInteger, resynchronize};

	const UNSYNCHRONIZED_CONTENT: &[u8] =
		&[0xFF, 0x00, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00, 0x00];
	const EXPECTED: &[u8] = &[0xFF, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00];

	#[test_log::test]
	fn resynchronize_content() {
		assert_eq!(resynchronize(UNSYNCHRONIZED_CONTENT), EXPECTED);
	}

	#[test_log::test]
	fn resynchronize_should_not_replace_unrelated() {
		const ORIGINAL_CONTENT: &[u8] = &[0xFF, 0x1A, 0xFF, 0xC0, 0x10, 0x01];
		assert_eq!(resynchronize(ORIGINAL_CONTENT), ORIGINAL_CONTENT);
	}

	#[test_log::test]
	fn resynchronize_trailing_ff() {
		assert_eq!(resynchronize(&[0x01, 0xFF]), [0x01, 0xFF]);
	}

	#[test_log::test]
	fn unsynch_u32() {
		assert_eq!(0x7F7F_7F7F_u32.unsynch(), 0xFFF_FFFF_u32);
		// A 257 byte ID3v2.4 frame
		assert_eq!(0x0000_0201_u32.unsynch(), 257);
	}
}
