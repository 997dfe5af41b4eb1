//! Submit button.

use std::sync::Arc;

use serde_json::Value;
use weft_core::{
	ActionListener, Binding, CycleError, CycleResult, FormComponent, RequestCycle, invoke,
};
use weft_markup::MarkupWriter;

/// A submit button.
///
/// Browsers only submit the parameter of the button actually pressed, so
/// on rewind the button checks for its element id among the parameters:
/// present means this button fired, and the selected binding (if any) is
/// set to true before the listener runs.
pub struct Submit {
	id: String,
	label: String,
	selected: Option<Box<dyn Binding>>,
	listener: Option<Arc<dyn ActionListener>>,
	name: Option<String>,
}

impl Submit {
	/// A button labeled `label`.
	pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			selected: None,
			listener: None,
			name: None,
		}
	}

	/// Bind a flag set to true when this button is the one pressed.
	pub fn with_selected(mut self, selected: impl Binding + 'static) -> Self {
		self.selected = Some(Box::new(selected));
		self
	}

	/// Attach a listener run when this button is the one pressed.
	pub fn with_listener(mut self, listener: impl ActionListener + 'static) -> Self {
		self.listener = Some(Arc::new(listener));
		self
	}

	/// Element id recorded during the current walk.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

impl FormComponent for Submit {
	fn id(&self) -> &str {
		&self.id
	}

	fn render_or_rewind(
		&mut self,
		writer: &mut dyn MarkupWriter,
		cycle: &mut RequestCycle,
	) -> CycleResult<()> {
		let (name, form_rewound) = {
			let form = cycle
				.form_state()
				.ok_or_else(|| CycleError::NoActiveForm {
					component: self.id.clone(),
				})?;
			(form.element_id(&self.id), form.is_rewinding())
		};
		self.name = Some(name.clone());

		if !form_rewound {
			if cycle.is_rewinding() {
				return Ok(());
			}

			writer.begin_empty("input");
			writer.attribute("type", "submit");
			writer.attribute("name", &name);
			writer.attribute("value", &self.label);
			return Ok(());
		}

		if cycle.parameter(&name).is_none() {
			return Ok(());
		}
		if let Some(selected) = &self.selected {
			selected
				.set_value(Value::Bool(true))
				.map_err(|source| CycleError::Binding {
					component: self.id.clone(),
					source,
				})?;
		}
		if let Some(listener) = self.listener.clone() {
			invoke(listener.as_ref(), self, cycle)?;
		}
		Ok(())
	}

	fn detach(&mut self) {
		self.name = None;
	}
}
