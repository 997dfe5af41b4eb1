//! Bindings connect a component's named slots to application state.
//!
//! A binding is shared (`Send + Sync`, cheap to clone where the concrete
//! type allows it) so the application can keep one end while a component
//! holds the other: the component writes the rewound value through the
//! binding, the application reads it back out after the walk.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by binding operations.
#[derive(Debug, Error)]
pub enum BindingError {
	/// The binding does not support the requested operation. Always fatal
	/// to the calling code path; never retried.
	#[error("binding does not support {operation}")]
	InvalidAccess {
		/// The refused operation
		operation: &'static str,
	},

	/// The bound value is not of the requested type.
	#[error("bound value is not a {expected}")]
	TypeMismatch {
		/// Expected type name
		expected: &'static str,
	},
}

/// A named value slot on a component.
pub trait Binding: Send + Sync {
	/// Read the bound value.
	fn value(&self) -> Result<Value, BindingError>;

	/// Replace the bound value.
	fn set_value(&self, value: Value) -> Result<(), BindingError>;

	/// Read the bound value as a boolean.
	fn as_bool(&self) -> Result<bool, BindingError> {
		self.value()?
			.as_bool()
			.ok_or(BindingError::TypeMismatch { expected: "boolean" })
	}

	/// Read the bound value as a signed integer.
	fn as_i64(&self) -> Result<i64, BindingError> {
		self.value()?
			.as_i64()
			.ok_or(BindingError::TypeMismatch { expected: "integer" })
	}

	/// Read the bound value as a float.
	fn as_f64(&self) -> Result<f64, BindingError> {
		self.value()?
			.as_f64()
			.ok_or(BindingError::TypeMismatch { expected: "float" })
	}

	/// Read the bound value as a string.
	fn as_str(&self) -> Result<String, BindingError> {
		match self.value()? {
			Value::String(s) => Ok(s),
			_ => Err(BindingError::TypeMismatch { expected: "string" }),
		}
	}
}

/// A read-write slot shared between a component and the application.
///
/// Cloning yields another handle on the same slot.
///
/// # Examples
///
/// ```
/// use weft_core::{Binding, ValueBinding};
/// use serde_json::json;
///
/// let slot = ValueBinding::new(json!(42));
/// let other = slot.clone();
/// other.set(json!(7));
/// assert_eq!(slot.get(), json!(7));
/// ```
#[derive(Clone, Debug)]
pub struct ValueBinding {
	slot: Arc<RwLock<Value>>,
}

impl ValueBinding {
	/// A slot holding `initial`.
	pub fn new(initial: Value) -> Self {
		Self {
			slot: Arc::new(RwLock::new(initial)),
		}
	}

	/// Snapshot the current value.
	pub fn get(&self) -> Value {
		self.slot.read().clone()
	}

	/// Replace the current value.
	pub fn set(&self, value: Value) {
		*self.slot.write() = value;
	}
}

impl Default for ValueBinding {
	fn default() -> Self {
		Self::new(Value::Null)
	}
}

impl Binding for ValueBinding {
	fn value(&self) -> Result<Value, BindingError> {
		Ok(self.get())
	}

	fn set_value(&self, value: Value) -> Result<(), BindingError> {
		self.set(value);
		Ok(())
	}
}

/// A read-only literal.
#[derive(Clone, Debug)]
pub struct StaticBinding {
	value: Value,
}

impl StaticBinding {
	/// A binding that always yields `value`.
	pub fn new(value: Value) -> Self {
		Self { value }
	}
}

impl Binding for StaticBinding {
	fn value(&self) -> Result<Value, BindingError> {
		Ok(self.value.clone())
	}

	fn set_value(&self, _value: Value) -> Result<(), BindingError> {
		Err(BindingError::InvalidAccess {
			operation: "set_value",
		})
	}
}
