//! Process-wide engine host.

use std::fmt;

use once_cell::sync::OnceCell;
use weft_codec::Squeezer;

use crate::pool::Pool;
use crate::script::ScriptEngineFactory;

const DEFAULT_FORM_ID_PARAMETER: &str = "_form_id";
const DEFAULT_SERVICE_PARAMETER: &str = "_sp";
const DEFAULT_POOL_CAPACITY: usize = 8;

/// Engine options.
///
/// # Examples
///
/// ```
/// use weft_core::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_form_id_parameter("formid")
///     .with_pool_capacity(2);
/// assert_eq!(config.form_id_parameter(), "formid");
/// ```
pub struct EngineConfig {
	form_id_parameter: String,
	service_parameter: String,
	pool_capacity: usize,
	squeezer: Option<Squeezer>,
	script_engines: Option<ScriptEngineFactory>,
}

impl EngineConfig {
	/// Default options.
	pub fn new() -> Self {
		Self {
			form_id_parameter: DEFAULT_FORM_ID_PARAMETER.to_string(),
			service_parameter: DEFAULT_SERVICE_PARAMETER.to_string(),
			pool_capacity: DEFAULT_POOL_CAPACITY,
			squeezer: None,
			script_engines: None,
		}
	}

	/// Name of the hidden parameter carrying the submitted form's id.
	pub fn with_form_id_parameter(mut self, name: impl Into<String>) -> Self {
		self.form_id_parameter = name.into();
		self
	}

	/// Name of the parameter carrying encoded service parameters.
	pub fn with_service_parameter(mut self, name: impl Into<String>) -> Self {
		self.service_parameter = name.into();
		self
	}

	/// Idle objects retained per pool shelf.
	pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
		self.pool_capacity = capacity;
		self
	}

	/// Replace the default value codec.
	pub fn with_squeezer(mut self, squeezer: Squeezer) -> Self {
		self.squeezer = Some(squeezer);
		self
	}

	/// Register a factory for pooled script engines, enabling script
	/// listener bindings.
	pub fn with_script_engines(mut self, factory: ScriptEngineFactory) -> Self {
		self.script_engines = Some(factory);
		self
	}

	/// The configured form-id parameter name.
	pub fn form_id_parameter(&self) -> &str {
		&self.form_id_parameter
	}

	/// The configured service parameter name.
	pub fn service_parameter(&self) -> &str {
		&self.service_parameter
	}

	/// The configured script engine factory, if any.
	pub fn script_engines(&self) -> Option<&ScriptEngineFactory> {
		self.script_engines.as_ref()
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for EngineConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EngineConfig")
			.field("form_id_parameter", &self.form_id_parameter)
			.field("service_parameter", &self.service_parameter)
			.field("pool_capacity", &self.pool_capacity)
			.field("custom_squeezer", &self.squeezer.is_some())
			.field("script_engines", &self.script_engines.is_some())
			.finish()
	}
}

/// Process-wide host shared by all request cycles.
///
/// Supplies the value codec (lazily constructed unless the configuration
/// provides one) and the resource pool.
#[derive(Debug)]
pub struct Engine {
	config: EngineConfig,
	squeezer: OnceCell<Squeezer>,
	pool: Pool,
}

impl Engine {
	/// An engine with the given options.
	pub fn new(mut config: EngineConfig) -> Self {
		let squeezer = OnceCell::new();
		if let Some(custom) = config.squeezer.take() {
			// A configured codec pre-seeds the cell.
			let _ = squeezer.set(custom);
		}
		let pool = Pool::new(config.pool_capacity);
		Self {
			config,
			squeezer,
			pool,
		}
	}

	/// The engine options.
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// The shared value codec, constructed on first use.
	pub fn squeezer(&self) -> &Squeezer {
		self.squeezer.get_or_init(Squeezer::new)
	}

	/// The shared resource pool.
	pub fn pool(&self) -> &Pool {
		&self.pool
	}
}
