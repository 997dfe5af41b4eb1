//! The component contract.

use weft_markup::MarkupWriter;

use crate::cycle::RequestCycle;
use crate::error::CycleResult;

/// A node in a page's component tree.
///
/// One method serves both passes: during a render walk the component
/// produces markup from its bound values, during a rewind walk it
/// re-derives its bound values from the submitted parameters. Which pass
/// is active is read from the cycle and the enclosing form's state, never
/// stored on the component itself.
///
/// Components are configured once at tree-build time and reused across
/// requests; any state that belongs to a single request must be cleared by
/// [`detach`](Self::detach), which the walk driver calls before every
/// walk.
pub trait FormComponent: Send {
	/// Component id, scoped to its containing form. Element ids derive
	/// from it in traversal order.
	fn id(&self) -> &str;

	/// Render markup or consume submitted parameters, depending on the
	/// active pass.
	fn render_or_rewind(
		&mut self,
		writer: &mut dyn MarkupWriter,
		cycle: &mut RequestCycle,
	) -> CycleResult<()>;

	/// Reset transient per-request state. Called by the walk driver before
	/// each new walk; the default has nothing to reset.
	fn detach(&mut self) {}
}
