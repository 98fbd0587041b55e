// Shorthand for return Err(TagBridgeError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(TagBridgeError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(TagBridgeError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::TagBridgeError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:literal)) => {
		return Err(crate::error::TagBridgeError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for InvalidTagError::new(InvalidTagKind::Foo).into()
//
// Usage:
//
// - invalid_tag!(Variant)
// - invalid_tag!(Variant(args..))
// - invalid_tag!(Variant { field: value, .. })
//
// or bail:
//
// - invalid_tag!(@BAIL Variant)
// - invalid_tag!(@BAIL Variant(args..))
macro_rules! invalid_tag {
	(@BAIL $($tt:tt)+) => {
		return Err(invalid_tag!($($tt)+))
	};
	($variant:ident $($rest:tt)*) => {
		Into::<crate::error::TagBridgeError>::into(crate::error::InvalidTagError::new(
			crate::error::InvalidTagKind::$variant $($rest)*,
		))
	};
}

// A macro for handling the different `ParsingMode`s
//
// NOTE: All fields are optional, if `STRICT` or `RELAXED` are missing, it will
// 		 fall through to `DEFAULT`.
//
// Usage:
//
// - parse_mode_choice!(
// 		ident_of_parsing_mode,
// 		STRICT: some_expr,
// 		RELAXED: some_expr,
// 		DEFAULT: some_expr,
// 	 )
macro_rules! parse_mode_choice {
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr,)?
		DEFAULT: $default:expr
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			#[allow(unreachable_patterns)]
			_ => { $default }
		}
	};
}

pub(crate) use {err, invalid_tag, parse_mode_choice};
