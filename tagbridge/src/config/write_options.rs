/// Options to control how tagbridge writes fields and tags
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) save_empty_fields: bool,
	pub(crate) lossy_text_encoding: bool,
}

impl WriteOptions {
	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			save_empty_fields: false,
			lossy_text_encoding: false,
		}
	}

	/// Whether to write Lyrics3v2 fields with an empty body
	///
	/// When disabled, an empty field is dropped *entirely*: neither its ID nor its body is written.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::config::WriteOptions;
	///
	/// // I want every field I created to show up, even the empty ones
	/// let options = WriteOptions::new().save_empty_fields(true);
	/// ```
	pub fn save_empty_fields(mut self, save_empty_fields: bool) -> Self {
		self.save_empty_fields = save_empty_fields;
		self
	}

	/// Whether to allow lossy text encoding
	///
	/// This only applies to writing Lyrics3v2 fields and tags, which are always ISO-8859-1. When
	/// this is enabled, characters that cannot be represented are replaced with `?` rather than
	/// causing an error.
	///
	/// ID3v2 frame bodies are unaffected. Their text is always encoded strictly.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbridge::config::WriteOptions;
	///
	/// // I don't care about losing a few characters
	/// let options = WriteOptions::new().lossy_text_encoding(true);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     save_empty_fields: false,
	///     lossy_text_encoding: false,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
