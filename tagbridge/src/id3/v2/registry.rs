//! The mapping from frame IDs to the layout of their bodies

use crate::field::{TypedField, names};

use std::collections::HashMap;
use std::sync::OnceLock;

/// Creates the declared (empty) field list for a frame body
pub type BodyConstructor = fn() -> Vec<TypedField>;

fn text_information() -> Vec<TypedField> {
	vec![
		TypedField::number(names::TEXT_ENCODING, 1),
		TypedField::size_terminated_string(names::TEXT),
	]
}

// COMM and USLT share a layout
fn language_encoded_text() -> Vec<TypedField> {
	vec![
		TypedField::number(names::TEXT_ENCODING, 1),
		TypedField::fixed_string(names::LANGUAGE, 3),
		TypedField::terminated_string(names::DESCRIPTION),
		TypedField::size_terminated_string(names::TEXT),
	]
}

fn synchronized_text() -> Vec<TypedField> {
	vec![
		TypedField::number(names::TEXT_ENCODING, 1),
		TypedField::fixed_string(names::LANGUAGE, 3),
		TypedField::number(names::TIMESTAMP_FORMAT, 1),
		TypedField::number(names::CONTENT_TYPE, 1),
		TypedField::terminated_string(names::DESCRIPTION),
		TypedField::synced_text(names::SYNCED_TEXT),
	]
}

fn encryption_method() -> Vec<TypedField> {
	vec![
		TypedField::terminated_string(names::OWNER),
		TypedField::number(names::METHOD_SYMBOL, 1),
		TypedField::size_terminated_bytes(names::ENCRYPTION_INFO),
	]
}

fn private() -> Vec<TypedField> {
	vec![
		TypedField::terminated_string(names::OWNER),
		TypedField::size_terminated_bytes(names::DATA),
	]
}

fn play_counter() -> Vec<TypedField> {
	vec![TypedField::number(names::COUNTER, 4)]
}

/// The field list for frames with no registered layout
///
/// The entire body is kept as opaque bytes.
pub(crate) fn opaque() -> Vec<TypedField> {
	vec![TypedField::size_terminated_bytes(names::DATA)]
}

macro_rules! gen_registry {
	($($($id:literal)|+ => $constructor:ident),+ $(,)?) => {
		fn registry() -> &'static HashMap<&'static str, BodyConstructor> {
			static INSTANCE: OnceLock<HashMap<&'static str, BodyConstructor>> = OnceLock::new();
			INSTANCE.get_or_init(|| {
				let mut map: HashMap<&'static str, BodyConstructor> = HashMap::new();
				$(
					$(
						map.insert($id, $constructor);
					)+
				)+
				map
			})
		}
	};
}

gen_registry! {
	"TALB" | "TBPM" | "TCOM" | "TCON" | "TCOP" | "TDAT" | "TDEN" | "TDLY" | "TDOR" | "TDRC"
	| "TDRL" | "TDTG" | "TENC" | "TEXT" | "TFLT" | "TIME" | "TIPL" | "TIT1" | "TIT2" | "TIT3"
	| "TKEY" | "TLAN" | "TLEN" | "TMCL" | "TMED" | "TMOO" | "TOAL" | "TOFN" | "TOLY" | "TOPE"
	| "TORY" | "TOWN" | "TPE1" | "TPE2" | "TPE3" | "TPE4" | "TPOS" | "TPRO" | "TPUB" | "TRCK"
	| "TRDA" | "TRSN" | "TRSO" | "TSIZ" | "TSOA" | "TSOP" | "TSOT" | "TSRC" | "TSSE" | "TSST"
	| "TYER" => text_information,
	"COMM" | "USLT" => language_encoded_text,
	"SYLT" => synchronized_text,
	"ENCR" => encryption_method,
	"PRIV" => private,
	"PCNT" => play_counter,
}

/// Find the constructor for the body of `id`
///
/// Returns `None` if `id` has no registered layout.
///
/// # Examples
///
/// ```rust
/// use tagbridge::id3::v2::lookup_body_constructor;
///
/// let album = lookup_body_constructor("TALB").expect("should be registered");
/// assert_eq!(album().len(), 2);
///
/// assert!(lookup_body_constructor("XXXX").is_none());
/// ```
pub fn lookup_body_constructor(id: &str) -> Option<BodyConstructor> {
	registry().get(id).copied()
}
