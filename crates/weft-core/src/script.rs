//! Script listener bindings.
//!
//! A script listener is a binding that doubles as an action listener: when
//! triggered, it executes a script in an external interpreter. The
//! interpreter lives behind the narrow [`ScriptEngine`] plugin boundary —
//! nothing here evaluates code in-process — and instances are checked out
//! of the engine pool per invocation and returned on every exit path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use serde_json::Value;
use tracing::debug;

use crate::binding::{Binding, BindingError};
use crate::component::FormComponent;
use crate::cycle::RequestCycle;
use crate::listener::ActionListener;
use crate::pool::PoolKey;

/// Facts exposed to a script invocation.
pub type ScriptVars = HashMap<String, Value>;

/// External script interpreter.
///
/// Implementations typically bridge to an interpreter process; the core
/// only ever passes serializable facts across this boundary.
pub trait ScriptEngine: Send {
	/// Execute `script` in `language`. `location` identifies the script's
	/// origin for diagnostics.
	fn exec(
		&mut self,
		language: &str,
		location: &str,
		script: &str,
		vars: &ScriptVars,
	) -> anyhow::Result<()>;
}

/// Creates pooled interpreter instances.
pub type ScriptEngineFactory = Arc<dyn Fn() -> Box<dyn ScriptEngine> + Send + Sync>;

/// Pool shelf for idle interpreters.
pub const SCRIPT_ENGINE_POOL: PoolKey<Box<dyn ScriptEngine>> = PoolKey::new("weft.script-engine");

/// A binding whose value is a script, and which acts as a listener by
/// executing it.
///
/// As a binding it is read-only: its value is the script text, its boolean
/// reading is always true, and numeric readings are invalid accesses.
pub struct ScriptListenerBinding {
	language: String,
	script: String,
	location: String,
}

impl ScriptListenerBinding {
	/// A listener executing `script` in `language`. `location` names where
	/// the script came from, for diagnostics.
	pub fn new(
		language: impl Into<String>,
		script: impl Into<String>,
		location: impl Into<String>,
	) -> Self {
		Self {
			language: language.into(),
			script: script.into(),
			location: location.into(),
		}
	}

	/// The script's origin.
	pub fn location(&self) -> &str {
		&self.location
	}
}

impl Binding for ScriptListenerBinding {
	fn value(&self) -> Result<Value, BindingError> {
		Ok(Value::String(self.script.clone()))
	}

	fn set_value(&self, _value: Value) -> Result<(), BindingError> {
		Err(BindingError::InvalidAccess {
			operation: "set_value",
		})
	}

	fn as_bool(&self) -> Result<bool, BindingError> {
		Ok(true)
	}

	fn as_i64(&self) -> Result<i64, BindingError> {
		Err(BindingError::InvalidAccess { operation: "as_i64" })
	}

	fn as_f64(&self) -> Result<f64, BindingError> {
		Err(BindingError::InvalidAccess { operation: "as_f64" })
	}
}

impl ActionListener for ScriptListenerBinding {
	fn action_triggered(
		&self,
		component: &dyn FormComponent,
		cycle: &mut RequestCycle,
	) -> anyhow::Result<()> {
		let factory = cycle
			.engine()
			.config()
			.script_engines()
			.cloned()
			.with_context(|| {
				format!(
					"script listener at {} invoked with no script engine configured",
					self.location
				)
			})?;

		let mut vars = ScriptVars::new();
		vars.insert(
			"component".to_string(),
			Value::String(component.id().to_string()),
		);
		if let Some(page) = cycle.active_page() {
			vars.insert("page".to_string(), Value::String(page.to_string()));
		}
		vars.insert("rewinding".to_string(), Value::Bool(cycle.is_rewinding()));

		let started = Instant::now();
		let mut interpreter = cycle
			.engine()
			.pool()
			.retrieve(&SCRIPT_ENGINE_POOL, || factory());
		let result = interpreter.exec(&self.language, &self.location, &self.script, &vars);
		debug!(
			location = %self.location,
			elapsed_ms = started.elapsed().as_millis() as u64,
			"script listener executed"
		);
		// The interpreter returns to the pool when the guard drops, on the
		// error path included.
		result.with_context(|| format!("script listener at {} failed", self.location))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::{Engine, EngineConfig};
	use crate::error::CycleResult;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use weft_http::Request;
	use weft_markup::MarkupWriter;

	struct Probe;

	impl FormComponent for Probe {
		fn id(&self) -> &str {
			"probe"
		}

		fn render_or_rewind(
			&mut self,
			_writer: &mut dyn MarkupWriter,
			_cycle: &mut RequestCycle,
		) -> CycleResult<()> {
			Ok(())
		}
	}

	struct RecordingEngine {
		runs: Arc<AtomicUsize>,
		fail: bool,
	}

	impl ScriptEngine for RecordingEngine {
		fn exec(
			&mut self,
			language: &str,
			_location: &str,
			script: &str,
			vars: &ScriptVars,
		) -> anyhow::Result<()> {
			assert_eq!(language, "lua");
			assert_eq!(script, "return_book()");
			assert_eq!(vars.get("component"), Some(&Value::String("probe".into())));
			self.runs.fetch_add(1, Ordering::SeqCst);
			if self.fail {
				anyhow::bail!("interpreter exploded");
			}
			Ok(())
		}
	}

	fn engine_with_scripts(runs: Arc<AtomicUsize>, fail: bool, created: Arc<AtomicUsize>) -> Engine {
		let factory: ScriptEngineFactory = Arc::new(move || {
			created.fetch_add(1, Ordering::SeqCst);
			Box::new(RecordingEngine {
				runs: runs.clone(),
				fail,
			})
		});
		Engine::new(EngineConfig::new().with_script_engines(factory))
	}

	fn cycle_for(engine: Engine) -> RequestCycle {
		let request = Request::builder().uri("/").build().unwrap();
		RequestCycle::new(Arc::new(engine), request)
	}

	#[test]
	fn test_interpreter_is_pooled_across_invocations() {
		let runs = Arc::new(AtomicUsize::new(0));
		let created = Arc::new(AtomicUsize::new(0));
		let mut cycle = cycle_for(engine_with_scripts(runs.clone(), false, created.clone()));
		let binding = ScriptListenerBinding::new("lua", "return_book()", "pages/Borrowed, line 12");

		binding.action_triggered(&Probe, &mut cycle).unwrap();
		binding.action_triggered(&Probe, &mut cycle).unwrap();

		assert_eq!(runs.load(Ordering::SeqCst), 2);
		assert_eq!(created.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_interpreter_returns_to_pool_on_failure() {
		let runs = Arc::new(AtomicUsize::new(0));
		let created = Arc::new(AtomicUsize::new(0));
		let mut cycle = cycle_for(engine_with_scripts(runs.clone(), true, created.clone()));
		let binding = ScriptListenerBinding::new("lua", "return_book()", "pages/Borrowed, line 12");

		assert!(binding.action_triggered(&Probe, &mut cycle).is_err());
		assert!(binding.action_triggered(&Probe, &mut cycle).is_err());

		// Still only one interpreter: the failed run released its instance.
		assert_eq!(created.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_unconfigured_engine_is_an_error() {
		let mut cycle = cycle_for(Engine::new(EngineConfig::new()));
		let binding = ScriptListenerBinding::new("lua", "x", "here");
		let err = binding.action_triggered(&Probe, &mut cycle).unwrap_err();
		assert!(err.to_string().contains("no script engine"));
	}

	#[test]
	fn test_binding_accessors() {
		let binding = ScriptListenerBinding::new("lua", "return 1", "here");
		assert!(binding.as_bool().unwrap());
		assert_eq!(binding.as_str().unwrap(), "return 1");
		assert!(matches!(
			binding.as_i64(),
			Err(BindingError::InvalidAccess { operation: "as_i64" })
		));
		assert!(matches!(
			binding.as_f64(),
			Err(BindingError::InvalidAccess { operation: "as_f64" })
		));
		assert!(matches!(
			binding.set_value(Value::Null),
			Err(BindingError::InvalidAccess { .. })
		));
	}
}
