//! Built-in squeeze adaptors.
//!
//! Token shapes (the leading character is the adaptor tag):
//!
//! | tag | payload                               | value kind        |
//! |-----|---------------------------------------|-------------------|
//! | `X` | none                                  | null              |
//! | `T` | none                                  | `true`            |
//! | `F` | none                                  | `false`           |
//! | `i` | decimal digits                        | integer           |
//! | `d` | `f64` display form                    | finite float      |
//! | `S` | the string itself                     | string            |
//! | `J` | base64 of the JSON serialization      | array or object   |

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

use crate::{SqueezeAdaptor, SqueezeError, SqueezeResult, malformed};

/// Encodes `null` as the bare tag `X`.
pub struct NullAdaptor;

impl SqueezeAdaptor for NullAdaptor {
	fn tags(&self) -> &'static [char] {
		&['X']
	}

	fn claims(&self, value: &Value) -> bool {
		value.is_null()
	}

	fn squeeze(&self, _value: &Value) -> SqueezeResult<String> {
		Ok("X".to_string())
	}

	fn unsqueeze(&self, token: &str) -> SqueezeResult<Value> {
		if token == "X" {
			Ok(Value::Null)
		} else {
			Err(malformed(token, "null token carries a payload"))
		}
	}
}

/// Encodes booleans as the bare tags `T` and `F`.
pub struct BoolAdaptor;

impl SqueezeAdaptor for BoolAdaptor {
	fn tags(&self) -> &'static [char] {
		&['T', 'F']
	}

	fn claims(&self, value: &Value) -> bool {
		value.is_boolean()
	}

	fn squeeze(&self, value: &Value) -> SqueezeResult<String> {
		match value {
			Value::Bool(true) => Ok("T".to_string()),
			Value::Bool(false) => Ok("F".to_string()),
			other => Err(SqueezeError::UnsupportedType {
				kind: crate::kind_of(other),
			}),
		}
	}

	fn unsqueeze(&self, token: &str) -> SqueezeResult<Value> {
		match token {
			"T" => Ok(Value::Bool(true)),
			"F" => Ok(Value::Bool(false)),
			_ => Err(malformed(token, "boolean token carries a payload")),
		}
	}
}

/// Encodes signed and unsigned integers as `i` plus decimal digits.
pub struct IntegerAdaptor;

impl SqueezeAdaptor for IntegerAdaptor {
	fn tags(&self) -> &'static [char] {
		&['i']
	}

	fn claims(&self, value: &Value) -> bool {
		value.as_i64().is_some() || value.as_u64().is_some()
	}

	fn squeeze(&self, value: &Value) -> SqueezeResult<String> {
		if let Some(i) = value.as_i64() {
			Ok(format!("i{i}"))
		} else if let Some(u) = value.as_u64() {
			Ok(format!("i{u}"))
		} else {
			Err(SqueezeError::UnsupportedType {
				kind: crate::kind_of(value),
			})
		}
	}

	fn unsqueeze(&self, token: &str) -> SqueezeResult<Value> {
		let digits = &token[1..];
		if let Ok(i) = digits.parse::<i64>() {
			Ok(Value::from(i))
		} else if let Ok(u) = digits.parse::<u64>() {
			Ok(Value::from(u))
		} else {
			Err(malformed(token, "integer payload does not parse"))
		}
	}
}

/// Encodes finite floats as `d` plus the shortest round-tripping display
/// form. Non-finite floats cannot be represented as JSON numbers, so a
/// `d` token that parses to NaN or an infinity is malformed.
pub struct FloatAdaptor;

impl SqueezeAdaptor for FloatAdaptor {
	fn tags(&self) -> &'static [char] {
		&['d']
	}

	fn claims(&self, value: &Value) -> bool {
		value.is_f64()
	}

	fn squeeze(&self, value: &Value) -> SqueezeResult<String> {
		let Some(f) = value.as_f64() else {
			return Err(SqueezeError::UnsupportedType {
				kind: crate::kind_of(value),
			});
		};
		Ok(format!("d{f}"))
	}

	fn unsqueeze(&self, token: &str) -> SqueezeResult<Value> {
		let payload = &token[1..];
		let f: f64 = payload
			.parse()
			.map_err(|_| malformed(token, "float payload does not parse"))?;
		if !f.is_finite() {
			return Err(malformed(token, "non-finite float"));
		}
		serde_json::Number::from_f64(f)
			.map(Value::Number)
			.ok_or_else(|| malformed(token, "float not representable"))
	}
}

/// Encodes strings as `S` plus the string itself, verbatim.
pub struct StringAdaptor;

impl SqueezeAdaptor for StringAdaptor {
	fn tags(&self) -> &'static [char] {
		&['S']
	}

	fn claims(&self, value: &Value) -> bool {
		value.is_string()
	}

	fn squeeze(&self, value: &Value) -> SqueezeResult<String> {
		let Some(s) = value.as_str() else {
			return Err(SqueezeError::UnsupportedType {
				kind: crate::kind_of(value),
			});
		};
		Ok(format!("S{s}"))
	}

	fn unsqueeze(&self, token: &str) -> SqueezeResult<Value> {
		Ok(Value::String(token[1..].to_string()))
	}
}

/// Encodes arrays and objects as `J` plus the base64 of their JSON
/// serialization, keeping the token printable regardless of payload.
///
/// Object keys serialize in sorted order, so equal values always produce
/// equal tokens.
pub struct ComplexAdaptor;

impl SqueezeAdaptor for ComplexAdaptor {
	fn tags(&self) -> &'static [char] {
		&['J']
	}

	fn claims(&self, value: &Value) -> bool {
		value.is_array() || value.is_object()
	}

	fn squeeze(&self, value: &Value) -> SqueezeResult<String> {
		let json = serde_json::to_string(value).map_err(SqueezeError::Encode)?;
		Ok(format!("J{}", BASE64.encode(json.as_bytes())))
	}

	fn unsqueeze(&self, token: &str) -> SqueezeResult<Value> {
		let bytes = BASE64
			.decode(&token[1..])
			.map_err(|e| malformed(token, format!("invalid base64: {e}")))?;
		serde_json::from_slice(&bytes).map_err(|e| malformed(token, format!("invalid JSON: {e}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_integer_tokens_are_plain_decimals() {
		assert_eq!(IntegerAdaptor.squeeze(&json!(42)).unwrap(), "i42");
		assert_eq!(IntegerAdaptor.squeeze(&json!(-3)).unwrap(), "i-3");
	}

	#[test]
	fn test_float_rejects_non_finite_payloads() {
		for token in ["dNaN", "dinf", "d-inf"] {
			assert!(FloatAdaptor.unsqueeze(token).is_err(), "token {token:?}");
		}
	}

	#[test]
	fn test_string_payload_is_verbatim() {
		assert_eq!(StringAdaptor.squeeze(&json!("i99")).unwrap(), "Si99");
		assert_eq!(
			StringAdaptor.unsqueeze("Si99").unwrap(),
			Value::String("i99".to_string())
		);
	}

	#[test]
	fn test_complex_token_is_printable() {
		let token = ComplexAdaptor
			.squeeze(&json!({"title": "Straße \u{7}"}))
			.unwrap();
		assert!(token.chars().all(|c| c.is_ascii_graphic()));
	}

	#[test]
	fn test_complex_rejects_garbage_base64() {
		assert!(ComplexAdaptor.unsqueeze("J!!!").is_err());
	}

	#[test]
	fn test_bool_round_trip() {
		assert_eq!(BoolAdaptor.unsqueeze("T").unwrap(), json!(true));
		assert_eq!(BoolAdaptor.unsqueeze("F").unwrap(), json!(false));
		assert!(BoolAdaptor.unsqueeze("Fx").is_err());
	}
}
