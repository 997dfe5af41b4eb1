//! Per-request walk state.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use weft_http::Request;

use crate::engine::Engine;
use crate::error::{CycleError, CycleResult};

/// Which pass, if any, is currently walking the tree.
///
/// One phase per page-render cycle; never persisted across requests. The
/// only legal transitions are `Idle → Rendering`, `Idle → Rewinding`, and
/// back to `Idle` when the walk completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPhase {
	/// No walk in progress
	Idle,
	/// Producing markup
	Rendering,
	/// Replaying a form submission
	Rewinding,
}

/// Assigns element ids in first-seen order.
///
/// The first use of a component id yields the id itself; later uses of the
/// same id append `$0`, `$1`, … in encounter order. Because allocation
/// depends only on traversal order, a render walk and a rewind walk of the
/// same tree produce identical sequences.
#[derive(Debug, Default)]
pub struct IdAllocator {
	next_suffix: HashMap<String, u32>,
}

impl IdAllocator {
	/// An allocator with no ids assigned.
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocate the next element id for `component_id`.
	///
	/// # Examples
	///
	/// ```
	/// use weft_core::IdAllocator;
	///
	/// let mut ids = IdAllocator::new();
	/// assert_eq!(ids.allocate("book"), "book");
	/// assert_eq!(ids.allocate("book"), "book$0");
	/// assert_eq!(ids.allocate("book"), "book$1");
	/// assert_eq!(ids.allocate("note"), "note");
	/// ```
	pub fn allocate(&mut self, component_id: &str) -> String {
		match self.next_suffix.get_mut(component_id) {
			None => {
				self.next_suffix.insert(component_id.to_string(), 0);
				component_id.to_string()
			}
			Some(suffix) => {
				let id = format!("{component_id}${suffix}");
				*suffix += 1;
				id
			}
		}
	}
}

/// One form's contribution to the walk: whether *this* form is the one
/// being rewound, and the element-id allocator for its descendants.
///
/// A fresh state is pushed for every walk of the form, so the allocator
/// restarts at the top of each pass.
#[derive(Debug)]
pub struct FormState {
	form_id: String,
	rewinding: bool,
	allocator: IdAllocator,
}

impl FormState {
	/// State for one walk of the form `form_id`.
	pub fn new(form_id: impl Into<String>, rewinding: bool) -> Self {
		Self {
			form_id: form_id.into(),
			rewinding,
			allocator: IdAllocator::new(),
		}
	}

	/// Id of the form this state belongs to.
	pub fn form_id(&self) -> &str {
		&self.form_id
	}

	/// Whether this form is the one whose submission is being replayed.
	pub fn is_rewinding(&self) -> bool {
		self.rewinding
	}

	/// Allocate the element id for a descendant component, in traversal
	/// order.
	pub fn element_id(&mut self, component_id: &str) -> String {
		self.allocator.allocate(component_id)
	}
}

/// Per-request state threaded through every walk.
///
/// A cycle is created per incoming request and never shared between
/// requests; the component tree it drives may be reused, which is why the
/// walk drivers detach the tree before walking it.
pub struct RequestCycle {
	engine: Arc<Engine>,
	request: Request,
	phase: WalkPhase,
	rewind_target: Option<String>,
	active_page: Option<String>,
	form_stack: Vec<FormState>,
	service_parameters: Option<Vec<Value>>,
}

impl RequestCycle {
	/// A cycle for one incoming request.
	///
	/// If the request is a submission carrying the engine's form-id
	/// parameter, the named form becomes the rewind target.
	pub fn new(engine: Arc<Engine>, request: Request) -> Self {
		let rewind_target = if request.is_submission() {
			request
				.parameter(engine.config().form_id_parameter())
				.map(str::to_string)
		} else {
			None
		};
		Self {
			engine,
			request,
			phase: WalkPhase::Idle,
			rewind_target,
			active_page: None,
			form_stack: Vec::new(),
			service_parameters: None,
		}
	}

	/// The process-wide engine host.
	pub fn engine(&self) -> &Engine {
		&self.engine
	}

	/// The request this cycle serves.
	pub fn request(&self) -> &Request {
		&self.request
	}

	/// Look up a submitted parameter.
	pub fn parameter(&self, name: &str) -> Option<&str> {
		self.request.parameter(name)
	}

	/// Current walk phase.
	pub fn phase(&self) -> WalkPhase {
		self.phase
	}

	/// Whether a rewind walk is in progress anywhere on the page.
	pub fn is_rewinding(&self) -> bool {
		self.phase == WalkPhase::Rewinding
	}

	/// Id of the form whose submission is being replayed, if any.
	pub fn rewind_target(&self) -> Option<&str> {
		self.rewind_target.as_deref()
	}

	/// Name of the page currently being walked.
	pub fn active_page(&self) -> Option<&str> {
		self.active_page.as_deref()
	}

	/// Record the page a walk driver is about to walk.
	pub fn set_active_page(&mut self, name: impl Into<String>) {
		self.active_page = Some(name.into());
	}

	/// Enter a walk. Only legal from [`WalkPhase::Idle`].
	pub fn begin(&mut self, phase: WalkPhase) -> CycleResult<()> {
		if self.phase != WalkPhase::Idle || phase == WalkPhase::Idle {
			return Err(CycleError::IllegalPhase {
				from: self.phase,
				to: phase,
			});
		}
		self.phase = phase;
		Ok(())
	}

	/// Leave the current walk, returning to idle and dropping any form
	/// state the walk left behind.
	pub fn finish(&mut self) {
		self.phase = WalkPhase::Idle;
		self.form_stack.clear();
	}

	/// Push the state of a form whose children are about to be walked.
	pub fn push_form(&mut self, state: FormState) {
		self.form_stack.push(state);
	}

	/// Pop the innermost form's state once its children are walked.
	pub fn pop_form(&mut self) -> Option<FormState> {
		self.form_stack.pop()
	}

	/// The innermost active form's state, if a form walk is in progress.
	pub fn form_state(&mut self) -> Option<&mut FormState> {
		self.form_stack.last_mut()
	}

	/// Service parameters carried by the request, decoded through the
	/// engine's codec on first access.
	///
	/// Absent parameter means an empty slice; a token decoding to an array
	/// yields its elements, any other value yields a single-element slice.
	pub fn service_parameters(&mut self) -> CycleResult<&[Value]> {
		if self.service_parameters.is_none() {
			let decoded = match self
				.request
				.parameter(self.engine.config().service_parameter())
			{
				None => Vec::new(),
				Some(raw) => {
					let value = self.engine.squeezer().unsqueeze(raw).map_err(|source| {
						CycleError::Serialization {
							component: "service-parameters".to_string(),
							source,
						}
					})?;
					match value {
						Value::Array(items) => items,
						other => vec![other],
					}
				}
			};
			self.service_parameters = Some(decoded);
		}
		Ok(self.service_parameters.as_deref().unwrap_or(&[]))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::EngineConfig;
	use serde_json::json;
	use weft_http::Request;

	fn cycle_for(request: Request) -> RequestCycle {
		RequestCycle::new(Arc::new(Engine::new(EngineConfig::new())), request)
	}

	#[test]
	fn test_get_request_has_no_rewind_target() {
		let request = Request::builder().uri("/page").build().unwrap();
		let cycle = cycle_for(request);
		assert_eq!(cycle.rewind_target(), None);
		assert_eq!(cycle.phase(), WalkPhase::Idle);
	}

	#[test]
	fn test_submission_extracts_rewind_target() {
		let request = Request::builder()
			.uri("/page")
			.form(&[("_form_id", "returnForm")])
			.build()
			.unwrap();
		let cycle = cycle_for(request);
		assert_eq!(cycle.rewind_target(), Some("returnForm"));
	}

	#[test]
	fn test_phase_transitions() {
		let request = Request::builder().uri("/").build().unwrap();
		let mut cycle = cycle_for(request);

		cycle.begin(WalkPhase::Rendering).unwrap();
		assert!(matches!(
			cycle.begin(WalkPhase::Rewinding),
			Err(CycleError::IllegalPhase { .. })
		));
		cycle.finish();
		cycle.begin(WalkPhase::Rewinding).unwrap();
		assert!(cycle.is_rewinding());
		cycle.finish();
		assert_eq!(cycle.phase(), WalkPhase::Idle);
	}

	#[test]
	fn test_begin_idle_is_illegal() {
		let request = Request::builder().uri("/").build().unwrap();
		let mut cycle = cycle_for(request);
		assert!(matches!(
			cycle.begin(WalkPhase::Idle),
			Err(CycleError::IllegalPhase { .. })
		));
	}

	#[test]
	fn test_finish_clears_leftover_form_state() {
		let request = Request::builder().uri("/").build().unwrap();
		let mut cycle = cycle_for(request);
		cycle.begin(WalkPhase::Rendering).unwrap();
		cycle.push_form(FormState::new("f", false));
		cycle.finish();
		assert!(cycle.form_state().is_none());
	}

	#[test]
	fn test_service_parameters_decode_once() {
		let engine = Arc::new(Engine::new(EngineConfig::new()));
		let token = engine.squeezer().squeeze(&json!([7, "x"])).unwrap();
		let request = Request::builder()
			.uri("/")
			.form(&[("_form_id", "f"), ("_sp", &token)])
			.build()
			.unwrap();
		let mut cycle = RequestCycle::new(engine, request);
		assert_eq!(cycle.service_parameters().unwrap(), &[json!(7), json!("x")]);
		// Second access hits the cache.
		assert_eq!(cycle.service_parameters().unwrap().len(), 2);
	}

	#[test]
	fn test_allocator_sequences_match_across_passes() {
		let mut render_ids = IdAllocator::new();
		let mut rewind_ids = IdAllocator::new();
		let tree = ["book", "book", "note", "book"];
		let rendered: Vec<String> = tree.iter().map(|id| render_ids.allocate(id)).collect();
		let rewound: Vec<String> = tree.iter().map(|id| rewind_ids.allocate(id)).collect();
		assert_eq!(rendered, rewound);
		assert_eq!(rendered, ["book", "book$0", "note", "book$1"]);
	}
}
