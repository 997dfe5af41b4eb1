//! Single-line text input.

use serde_json::Value;
use weft_core::{Binding, CycleError, CycleResult, FormComponent, RequestCycle};
use weft_markup::MarkupWriter;

/// A text input bound to a string value.
///
/// No codec is involved: the submitted string is written back through the
/// binding verbatim, and a missing parameter rewinds as the empty string.
/// A null bound value renders as an empty input.
pub struct TextField {
	id: String,
	value: Box<dyn Binding>,
	name: Option<String>,
}

impl TextField {
	/// A text field with the in-out `value` binding.
	pub fn new(id: impl Into<String>, value: impl Binding + 'static) -> Self {
		Self {
			id: id.into(),
			value: Box::new(value),
			name: None,
		}
	}

	/// Element id recorded during the current walk.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

impl FormComponent for TextField {
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

			let value = self.value.value().map_err(|source| CycleError::Binding {
				component: self.id.clone(),
				source,
			})?;
			let text = match value {
				Value::Null => String::new(),
				Value::String(s) => s,
				other => other.to_string(),
			};

			writer.begin_empty("input");
			writer.attribute("type", "text");
			writer.attribute("name", &name);
			writer.attribute("value", &text);
			return Ok(());
		}

		let raw = cycle.parameter(&name).unwrap_or_default().to_string();
		self.value
			.set_value(Value::String(raw))
			.map_err(|source| CycleError::Binding {
				component: self.id.clone(),
				source,
			})
	}

	fn detach(&mut self) {
		self.name = None;
	}
}
