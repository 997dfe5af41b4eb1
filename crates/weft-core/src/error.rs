//! Walk-level error taxonomy.
//!
//! Failures inside a tree walk abort the walk and propagate to the request
//! handler; nothing in the core retries.

use thiserror::Error;
use weft_codec::SqueezeError;

use crate::binding::BindingError;
use crate::cycle::WalkPhase;

/// Errors that abort a tree walk.
#[derive(Debug, Error)]
pub enum CycleError {
	/// The codec failed while encoding or decoding a component's value.
	#[error("serialization failure in component {component:?}")]
	Serialization {
		/// Component the failure occurred in
		component: String,
		/// Underlying codec failure
		#[source]
		source: SqueezeError,
	},

	/// A binding refused an operation a component needed.
	#[error("binding access failure in component {component:?}")]
	Binding {
		/// Component the failure occurred in
		component: String,
		/// Underlying binding failure
		#[source]
		source: BindingError,
	},

	/// Application listener logic raised; propagated unchanged to the
	/// request handler, which decides user-visible behavior.
	#[error("listener raised in component {component:?}")]
	Listener {
		/// Component whose listener raised
		component: String,
		/// The application fault
		#[source]
		source: anyhow::Error,
	},

	/// A walk was started from a state other than idle, or ended twice.
	#[error("illegal walk phase transition {from:?} -> {to:?}")]
	IllegalPhase {
		/// Phase the cycle was in
		from: WalkPhase,
		/// Phase the caller requested
		to: WalkPhase,
	},

	/// A form component was driven outside of any form's walk.
	#[error("component {component:?} used outside an active form")]
	NoActiveForm {
		/// The orphaned component
		component: String,
	},

	/// A rewinding component found no submitted value under its element id.
	#[error("missing request parameter {name:?} for component {component:?}")]
	MissingParameter {
		/// Element id looked up
		name: String,
		/// Component that needed it
		component: String,
	},
}

/// Result alias for walk operations.
pub type CycleResult<T> = Result<T, CycleError>;
