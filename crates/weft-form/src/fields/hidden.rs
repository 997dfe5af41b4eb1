//! Hidden field carrying an encoded value through the round trip.

use std::sync::Arc;

use weft_core::{
	ActionListener, Binding, CycleError, CycleResult, FormComponent, RequestCycle, invoke,
};
use weft_markup::MarkupWriter;

/// A hidden input whose value survives the render→submit round trip.
///
/// On render, the bound value is squeezed into a token and emitted as the
/// input's value. On rewind, the submitted token is unsqueezed and written
/// back through the binding; the listener, if any, then runs and observes
/// the freshly-rewound value.
///
/// A typical use is carrying an entity's primary key: the listener
/// re-reads the entity so the rest of the form operates on the data the
/// hidden field named.
pub struct Hidden {
	id: String,
	value: Box<dyn Binding>,
	listener: Option<Arc<dyn ActionListener>>,
	name: Option<String>,
}

impl Hidden {
	/// A hidden field with the in-out `value` binding.
	pub fn new(id: impl Into<String>, value: impl Binding + 'static) -> Self {
		Self {
			id: id.into(),
			value: Box::new(value),
			listener: None,
			name: None,
		}
	}

	/// Attach a listener informed after the value is rewound.
	pub fn with_listener(mut self, listener: impl ActionListener + 'static) -> Self {
		self.listener = Some(Arc::new(listener));
		self
	}

	/// Element id recorded during the current walk, if the component has
	/// been reached.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

impl FormComponent for Hidden {
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
			// Some other form or action on the page was submitted; skip
			// the codec work entirely.
			if cycle.is_rewinding() {
				return Ok(());
			}

			let value = self.value.value().map_err(|source| CycleError::Binding {
				component: self.id.clone(),
				source,
			})?;
			let token = cycle
				.engine()
				.squeezer()
				.squeeze(&value)
				.map_err(|source| CycleError::Serialization {
					component: self.id.clone(),
					source,
				})?;

			writer.begin_empty("input");
			writer.attribute("type", "hidden");
			writer.attribute("name", &name);
			writer.attribute("value", &token);
			return Ok(());
		}

		let raw = cycle
			.parameter(&name)
			.ok_or_else(|| CycleError::MissingParameter {
				name: name.clone(),
				component: self.id.clone(),
			})?
			.to_string();
		let value = cycle
			.engine()
			.squeezer()
			.unsqueeze(&raw)
			.map_err(|source| CycleError::Serialization {
				component: self.id.clone(),
				source,
			})?;

		self.value
			.set_value(value)
			.map_err(|source| CycleError::Binding {
				component: self.id.clone(),
				source,
			})?;

		// A listener is not always necessary; synchronization is often a
		// side effect of the binding itself.
		if let Some(listener) = self.listener.clone() {
			invoke(listener.as_ref(), self, cycle)?;
		}
		Ok(())
	}

	fn detach(&mut self) {
		self.name = None;
	}
}
