//! # Weft
//!
//! A server-side component web framework built around a render/rewind
//! form lifecycle: a page's component tree is walked once to produce
//! markup, and walked again — in the same order — when the form comes
//! back, re-deriving each component's state from the submitted
//! parameters instead of producing output.
//!
//! The pieces, leaves first:
//!
//! - [`codec`]: the value codec turning bound values into opaque
//!   printable tokens and back (`unsqueeze(squeeze(v)) == v`)
//! - [`markup`]: the ordered markup writer components render through
//! - [`http`]: the request/response surface the hosting container feeds
//! - [`core`]: request cycle, component contract, bindings, listener
//!   dispatch, resource pool, and the two tree-walk drivers
//! - [`form`]: the form controller and the concrete form components
//!   (requires the `forms` feature, on by default)
//!
//! ## Feature Flags
//!
//! - `forms` - form controller and form components
//! - `full` (default) - everything
//!
//! ## A round trip
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use weft::core::{Engine, EngineConfig, RequestCycle, ValueBinding, render_page};
//! use weft::form::{Form, Hidden};
//! use weft::http::Request;
//! use weft::markup::HtmlMarkupWriter;
//! # use weft::core::{CycleResult, Page};
//! # use weft::markup::MarkupWriter;
//! # struct OnePage { form: Form }
//! # impl Page for OnePage {
//! #     fn name(&self) -> &str { "OnePage" }
//! #     fn detach(&mut self) { weft::core::FormComponent::detach(&mut self.form) }
//! #     fn walk(&mut self, writer: &mut dyn MarkupWriter, cycle: &mut RequestCycle) -> CycleResult<()> {
//! #         weft::core::FormComponent::render_or_rewind(&mut self.form, writer, cycle)
//! #     }
//! # }
//!
//! let engine = Arc::new(Engine::new(EngineConfig::new()));
//! let pk = ValueBinding::new(json!(42));
//! let mut page = OnePage {
//!     form: Form::new("returnForm", "/borrowed")
//!         .with_component(Hidden::new("book", pk.clone())),
//! };
//!
//! let request = Request::builder().uri("/borrowed").build().unwrap();
//! let mut cycle = RequestCycle::new(engine, request);
//! let mut writer = HtmlMarkupWriter::new();
//! render_page(&mut page, &mut cycle, &mut writer).unwrap();
//! assert!(writer.into_string().contains(r#"name="book" value="i42""#));
//! ```

pub use weft_codec as codec;
pub use weft_core as core;
pub use weft_http as http;
pub use weft_markup as markup;

#[cfg(feature = "forms")]
pub use weft_form as form;

// The everyday names, at the root.
pub use weft_codec::{SqueezeError, Squeezer};
pub use weft_core::{
	ActionListener, Binding, Callback, CycleError, CycleResult, Engine, EngineConfig,
	FormComponent, Page, RequestCycle, ValueBinding, WalkPhase, process_request, render_page,
	rewind_page,
};
pub use weft_http::{Request, Response};
pub use weft_markup::{HtmlMarkupWriter, MarkupWriter, NullMarkupWriter};

#[cfg(feature = "forms")]
pub use weft_form::{Form, Hidden, Submit, TextField};
