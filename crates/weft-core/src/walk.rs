//! Tree-walk drivers.
//!
//! Each driver entry point serves one complete request, and begins by
//! resetting the page's transient state: component trees are reused
//! across requests, and that reuse is only sound because `detach` runs —
//! explicitly, by the driver — at the start of every request. Within one
//! request the state is *not* reset between the rewind walk and the
//! response render, which is how listener effects (a confirmation
//! message, a reloaded entity) reach the rendered response.

use tracing::debug;
use weft_markup::{MarkupWriter, NullMarkupWriter};

use crate::cycle::{RequestCycle, WalkPhase};
use crate::error::CycleResult;

/// A renderable page owning a component tree.
pub trait Page: Send {
	/// Page name, used for diagnostics and script variables.
	fn name(&self) -> &str;

	/// Reset transient per-request state, recursing into owned components.
	fn detach(&mut self);

	/// Prepare for rendering (load data the render needs). Not called for
	/// rewind walks.
	fn begin_response(&mut self, cycle: &mut RequestCycle) -> CycleResult<()> {
		let _ = cycle;
		Ok(())
	}

	/// Drive the page's component tree, interleaving any static markup the
	/// page wants around its components.
	fn walk(&mut self, writer: &mut dyn MarkupWriter, cycle: &mut RequestCycle) -> CycleResult<()>;
}

/// Serve a plain request: reset, then render.
pub fn render_page(
	page: &mut dyn Page,
	cycle: &mut RequestCycle,
	writer: &mut dyn MarkupWriter,
) -> CycleResult<()> {
	page.detach();
	cycle.set_active_page(page.name());
	render_walk(page, cycle, writer)
}

/// Replay a submission without rendering a response: reset, then rewind.
///
/// Useful when the caller renders the response itself (or redirects);
/// [`process_request`] is the usual full orchestration.
pub fn rewind_page(page: &mut dyn Page, cycle: &mut RequestCycle) -> CycleResult<()> {
	page.detach();
	cycle.set_active_page(page.name());
	rewind_walk(page, cycle)
}

/// Serve a request end to end: reset once, replay the submission if there
/// is one, then render the response.
///
/// The rewind and the render are two walks of the same tree in one
/// request; listener effects from the rewind are visible to the render.
pub fn process_request(
	page: &mut dyn Page,
	cycle: &mut RequestCycle,
	writer: &mut dyn MarkupWriter,
) -> CycleResult<()> {
	page.detach();
	cycle.set_active_page(page.name());
	if cycle.rewind_target().is_some() {
		rewind_walk(page, cycle)?;
	}
	render_walk(page, cycle, writer)
}

/// Render pass: walk the tree once, producing markup.
fn render_walk(
	page: &mut dyn Page,
	cycle: &mut RequestCycle,
	writer: &mut dyn MarkupWriter,
) -> CycleResult<()> {
	cycle.begin(WalkPhase::Rendering)?;
	debug!(page = page.name(), "render pass");
	let result = page
		.begin_response(cycle)
		.and_then(|()| page.walk(writer, cycle));
	cycle.finish();
	result
}

/// Rewind pass: walk the tree again for a submission, producing no markup.
///
/// The walk mirrors the traversal order of the render pass that produced
/// the submitted page, which is what lines the element ids up.
fn rewind_walk(page: &mut dyn Page, cycle: &mut RequestCycle) -> CycleResult<()> {
	cycle.begin(WalkPhase::Rewinding)?;
	debug!(
		page = page.name(),
		target = cycle.rewind_target().unwrap_or("<none>"),
		"rewind pass"
	);
	let mut writer = NullMarkupWriter::new();
	let result = page.walk(&mut writer, cycle);
	cycle.finish();
	result
}
