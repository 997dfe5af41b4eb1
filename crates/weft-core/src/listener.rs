//! Post-rewind action dispatch.
//!
//! After a rewind updates a component's bound value, the component's
//! listener — if one was registered at configuration time — is invoked
//! with the component and the cycle, so application logic reacts to the
//! freshly-rewound value. A listener runs at most once per rewind pass per
//! component, and always observes post-rewind state.

use std::fmt;
use std::sync::Arc;

use crate::component::FormComponent;
use crate::cycle::RequestCycle;
use crate::error::{CycleError, CycleResult};

/// Application callback attached to a component.
pub trait ActionListener: Send + Sync {
	/// React to the component's completed rewind.
	///
	/// Errors are application faults; the framework propagates them
	/// unchanged to the request handler.
	fn action_triggered(
		&self,
		component: &dyn FormComponent,
		cycle: &mut RequestCycle,
	) -> anyhow::Result<()>;
}

/// Cheaply-cloneable closure adapter for [`ActionListener`].
///
/// # Examples
///
/// ```
/// use weft_core::Callback;
///
/// let returned = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
/// let listener = Callback::new({
///     let returned = returned.clone();
///     move |_component, _cycle| {
///         returned.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
///         Ok(())
///     }
/// });
/// ```
#[derive(Clone)]
pub struct Callback {
	inner: Arc<dyn Fn(&dyn FormComponent, &mut RequestCycle) -> anyhow::Result<()> + Send + Sync>,
}

impl Callback {
	/// Wrap a closure as a listener.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&dyn FormComponent, &mut RequestCycle) -> anyhow::Result<()> + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}
}

impl ActionListener for Callback {
	fn action_triggered(
		&self,
		component: &dyn FormComponent,
		cycle: &mut RequestCycle,
	) -> anyhow::Result<()> {
		(self.inner)(component, cycle)
	}
}

impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

/// Dispatch a listener, wrapping any application fault with the
/// originating component's id.
pub fn invoke(
	listener: &dyn ActionListener,
	component: &dyn FormComponent,
	cycle: &mut RequestCycle,
) -> CycleResult<()> {
	listener
		.action_triggered(component, cycle)
		.map_err(|source| CycleError::Listener {
			component: component.id().to_string(),
			source,
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::{Engine, EngineConfig};
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

	fn test_cycle() -> RequestCycle {
		let request = Request::builder().uri("/").build().unwrap();
		RequestCycle::new(Arc::new(Engine::new(EngineConfig::new())), request)
	}

	#[test]
	fn test_callback_dispatches() {
		let hits = Arc::new(AtomicUsize::new(0));
		let listener = Callback::new({
			let hits = hits.clone();
			move |component, _cycle| {
				assert_eq!(component.id(), "probe");
				hits.fetch_add(1, Ordering::SeqCst);
				Ok(())
			}
		});
		let mut cycle = test_cycle();
		invoke(&listener, &Probe, &mut cycle).unwrap();
		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_fault_carries_component_id() {
		let listener = Callback::new(|_c, _cy| Err(anyhow::anyhow!("boom")));
		let mut cycle = test_cycle();
		let err = invoke(&listener, &Probe, &mut cycle).unwrap_err();
		match err {
			CycleError::Listener { component, source } => {
				assert_eq!(component, "probe");
				assert_eq!(source.to_string(), "boom");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
