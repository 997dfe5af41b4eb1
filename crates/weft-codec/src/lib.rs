//! Value-to-token codec.
//!
//! Components that must survive a render→submit round trip without
//! server-side session state encode their bound value into an opaque
//! printable string (the *token*), emit it as part of the rendered markup
//! (typically a hidden field), and decode it back when the form is
//! submitted.
//!
//! The [`Squeezer`] performs both directions through an ordered registry of
//! [`SqueezeAdaptor`]s. Each adaptor owns one or more leading tag characters
//! and a claim predicate over [`serde_json::Value`]; encoding picks the
//! first adaptor that claims the value, decoding dispatches on the token's
//! first character.
//!
//! Two laws hold for every supported value `v`:
//!
//! - round trip: `unsqueeze(squeeze(v)) == v`
//! - determinism: the same value always produces the same token
//!
//! Values no adaptor claims fail at encode time with
//! [`SqueezeError::UnsupportedType`]; no partial token is ever produced.

pub mod adaptors;

pub use adaptors::{
	BoolAdaptor, ComplexAdaptor, FloatAdaptor, IntegerAdaptor, NullAdaptor, StringAdaptor,
};

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while converting between values and tokens.
#[derive(Debug, Error)]
pub enum SqueezeError {
	/// No registered adaptor claims the value. Raised at encode time.
	#[error("no adaptor claims value of type {kind}")]
	UnsupportedType {
		/// JSON kind of the offending value (`"array"`, `"object"`, ...)
		kind: &'static str,
	},

	/// The token cannot be decoded: empty, unknown tag character, or a
	/// payload the owning adaptor rejects.
	#[error("malformed token {token:?}: {reason}")]
	MalformedToken {
		/// The offending token, truncated for display
		token: String,
		/// Why decoding failed
		reason: String,
	},

	/// Serializing a complex payload failed.
	#[error("failed to encode complex value")]
	Encode(#[source] serde_json::Error),
}

/// Result alias for codec operations.
pub type SqueezeResult<T> = Result<T, SqueezeError>;

/// One codec strategy: claims a class of values, owns the tag characters
/// its tokens start with, and converts in both directions.
///
/// Adaptors must be deterministic and must satisfy the round-trip law for
/// every value they claim.
pub trait SqueezeAdaptor: Send + Sync {
	/// Tag characters this adaptor's tokens may start with.
	fn tags(&self) -> &'static [char];

	/// Whether this adaptor encodes `value`.
	fn claims(&self, value: &Value) -> bool;

	/// Encode a claimed value into a token starting with one of [`Self::tags`].
	fn squeeze(&self, value: &Value) -> SqueezeResult<String>;

	/// Decode a token whose first character is one of [`Self::tags`].
	fn unsqueeze(&self, token: &str) -> SqueezeResult<Value>;
}

/// Converts application values to and from transportable string tokens.
///
/// # Examples
///
/// ```
/// use weft_codec::Squeezer;
/// use serde_json::json;
///
/// let squeezer = Squeezer::new();
/// let token = squeezer.squeeze(&json!(42)).unwrap();
/// assert_eq!(squeezer.unsqueeze(&token).unwrap(), json!(42));
/// ```
pub struct Squeezer {
	adaptors: Vec<Box<dyn SqueezeAdaptor>>,
	by_tag: HashMap<char, usize>,
}

impl Squeezer {
	/// A squeezer with the default adaptor set: unit/null, booleans,
	/// integers, finite floats, strings, and arrays/objects.
	pub fn new() -> Self {
		Self::with_adaptors(vec![
			Box::new(NullAdaptor),
			Box::new(BoolAdaptor),
			Box::new(IntegerAdaptor),
			Box::new(FloatAdaptor),
			Box::new(StringAdaptor),
			Box::new(ComplexAdaptor),
		])
	}

	/// A squeezer restricted to the given adaptors.
	///
	/// Registration order decides both encode precedence (first claiming
	/// adaptor wins) and tag ownership (first adaptor registering a tag
	/// character keeps it).
	pub fn with_adaptors(adaptors: Vec<Box<dyn SqueezeAdaptor>>) -> Self {
		let mut by_tag = HashMap::new();
		for (index, adaptor) in adaptors.iter().enumerate() {
			for &tag in adaptor.tags() {
				by_tag.entry(tag).or_insert(index);
			}
		}
		Self { adaptors, by_tag }
	}

	/// Encode `value` into a transportable token.
	pub fn squeeze(&self, value: &Value) -> SqueezeResult<String> {
		let adaptor = self
			.adaptors
			.iter()
			.find(|a| a.claims(value))
			.ok_or_else(|| SqueezeError::UnsupportedType {
				kind: kind_of(value),
			})?;
		adaptor.squeeze(value)
	}

	/// Decode a token produced by [`Squeezer::squeeze`].
	pub fn unsqueeze(&self, token: &str) -> SqueezeResult<Value> {
		let tag = token
			.chars()
			.next()
			.ok_or_else(|| malformed(token, "empty token"))?;
		let index = self
			.by_tag
			.get(&tag)
			.ok_or_else(|| malformed(token, format!("unknown tag {tag:?}")))?;
		self.adaptors[*index].unsqueeze(token)
	}
}

impl Default for Squeezer {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Squeezer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut tags: Vec<char> = self.by_tag.keys().copied().collect();
		tags.sort_unstable();
		f.debug_struct("Squeezer").field("tags", &tags).finish()
	}
}

/// JSON kind name, used in error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Build a [`SqueezeError::MalformedToken`], truncating long tokens.
pub(crate) fn malformed(token: &str, reason: impl Into<String>) -> SqueezeError {
	let mut shown: String = token.chars().take(64).collect();
	if shown.len() < token.len() {
		shown.push('…');
	}
	SqueezeError::MalformedToken {
		token: shown,
		reason: reason.into(),
	}
}
