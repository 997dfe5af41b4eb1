//! The form component.

use weft_core::{CycleResult, FormComponent, FormState, RequestCycle};
use weft_markup::MarkupWriter;

/// A component subtree submitted and replayed as a unit.
///
/// The form decides, per walk, whether *it* is the form being rewound: the
/// page may hold several forms, and a submission names exactly one of them
/// through the implicit form-id field rendered into every envelope. The
/// children of a non-submitted form still get walked during a rewind so
/// their skip logic runs, but they produce nothing and consume nothing.
///
/// # Examples
///
/// ```
/// use weft_form::{Form, Hidden};
/// use weft_core::ValueBinding;
/// use serde_json::json;
///
/// let pk = ValueBinding::new(json!(42));
/// let form = Form::new("returnForm", "/borrowed")
///     .with_component(Hidden::new("book", pk.clone()));
/// ```
pub struct Form {
	id: String,
	action: String,
	children: Vec<Box<dyn FormComponent>>,
}

impl Form {
	/// An empty form posting to `action`.
	pub fn new(id: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			action: action.into(),
			children: Vec::new(),
		}
	}

	/// Append a child component. Children are walked in the order they
	/// were added.
	pub fn with_component(mut self, component: impl FormComponent + 'static) -> Self {
		self.children.push(Box::new(component));
		self
	}

	/// Append a child component in place.
	pub fn add_component(&mut self, component: impl FormComponent + 'static) {
		self.children.push(Box::new(component));
	}

	fn walk_children(
		&mut self,
		writer: &mut dyn MarkupWriter,
		cycle: &mut RequestCycle,
		rendering: bool,
	) -> CycleResult<()> {
		if rendering {
			writer.begin("form");
			writer.attribute("method", "post");
			writer.attribute("action", &self.action);
			writer.begin_empty("input");
			writer.attribute("type", "hidden");
			writer.attribute("name", cycle.engine().config().form_id_parameter());
			writer.attribute("value", &self.id);
		}
		for child in &mut self.children {
			child.render_or_rewind(writer, cycle)?;
		}
		if rendering {
			writer.end();
		}
		Ok(())
	}
}

impl FormComponent for Form {
	fn id(&self) -> &str {
		&self.id
	}

	fn render_or_rewind(
		&mut self,
		writer: &mut dyn MarkupWriter,
		cycle: &mut RequestCycle,
	) -> CycleResult<()> {
		let rewound = cycle.is_rewinding() && cycle.rewind_target() == Some(self.id.as_str());
		let rendering = !cycle.is_rewinding();

		cycle.push_form(FormState::new(self.id.clone(), rewound));
		let result = self.walk_children(writer, cycle, rendering);
		cycle.pop_form();
		result
	}

	fn detach(&mut self) {
		for child in &mut self.children {
			child.detach();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use weft_core::{Engine, EngineConfig, WalkPhase};
	use weft_http::Request;
	use weft_markup::HtmlMarkupWriter;

	#[test]
	fn test_rendered_envelope_carries_form_id() {
		let engine = Arc::new(Engine::new(EngineConfig::new()));
		let request = Request::builder().uri("/borrowed").build().unwrap();
		let mut cycle = RequestCycle::new(engine, request);
		let mut writer = HtmlMarkupWriter::new();
		let mut form = Form::new("returnForm", "/borrowed");

		cycle.begin(WalkPhase::Rendering).unwrap();
		form.render_or_rewind(&mut writer, &mut cycle).unwrap();
		cycle.finish();

		let html = writer.into_string();
		assert!(html.starts_with(r#"<form method="post" action="/borrowed">"#));
		assert!(html.contains(r#"name="_form_id" value="returnForm""#));
		assert!(html.ends_with("</form>"));
	}

	#[test]
	fn test_form_state_is_popped_after_walk() {
		let engine = Arc::new(Engine::new(EngineConfig::new()));
		let request = Request::builder().uri("/").build().unwrap();
		let mut cycle = RequestCycle::new(engine, request);
		let mut writer = HtmlMarkupWriter::new();
		let mut form = Form::new("f", "/");

		cycle.begin(WalkPhase::Rendering).unwrap();
		form.render_or_rewind(&mut writer, &mut cycle).unwrap();
		assert!(cycle.form_state().is_none());
		cycle.finish();
	}
}
