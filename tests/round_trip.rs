//! Facade-level round trip: render a page, submit it, and check the
//! submission's effects reach the response render of the same request.

#![cfg(feature = "forms")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use weft::{
	Binding, Callback, CycleResult, Engine, EngineConfig, Form, FormComponent, Hidden,
	HtmlMarkupWriter, MarkupWriter, Page, Request, RequestCycle, Response, ValueBinding,
	process_request, render_page,
};

struct CheckoutPage {
	form: Form,
	message: ValueBinding,
}

impl Page for CheckoutPage {
	fn name(&self) -> &str {
		"Checkout"
	}

	fn detach(&mut self) {
		self.form.detach();
		self.message.set(json!(null));
	}

	fn walk(
		&mut self,
		writer: &mut dyn MarkupWriter,
		cycle: &mut RequestCycle,
	) -> CycleResult<()> {
		if let Ok(message) = self.message.as_str() {
			writer.begin("p");
			writer.print(&message);
			writer.end();
		}
		self.form.render_or_rewind(writer, cycle)
	}
}

#[test]
fn full_request_cycle_through_the_facade() {
	let engine = Arc::new(Engine::new(EngineConfig::new()));
	let pk = ValueBinding::new(json!(42));
	let message = ValueBinding::new(json!(null));
	let hits = Arc::new(AtomicUsize::new(0));

	let listener = Callback::new({
		let pk = pk.clone();
		let message = message.clone();
		let hits = hits.clone();
		move |_component, _cycle| {
			hits.fetch_add(1, Ordering::SeqCst);
			message.set(json!(format!("returned book {}", pk.get())));
			Ok(())
		}
	});
	let mut page = CheckoutPage {
		form: Form::new("returnForm", "/borrowed")
			.with_component(Hidden::new("book", pk.clone()).with_listener(listener)),
		message: message.clone(),
	};

	// First request: plain render.
	let request = Request::builder().uri("/borrowed").build().unwrap();
	let mut cycle = RequestCycle::new(engine.clone(), request);
	let mut writer = HtmlMarkupWriter::new();
	render_page(&mut page, &mut cycle, &mut writer).unwrap();
	let html = writer.into_string();
	let token = engine.squeezer().squeeze(&json!(42)).unwrap();
	assert!(html.contains(&format!(r#"value="{token}""#)), "html: {html}");
	assert!(!html.contains("<p>"), "no message yet: {html}");

	// Second request: the submission comes back. One driver call replays
	// it and renders the response; the listener's message must survive
	// from the rewind walk into the render walk.
	let submission = Request::builder()
		.uri("/borrowed")
		.form(&[("_form_id", "returnForm"), ("book", token.as_str())])
		.build()
		.unwrap();
	let mut cycle = RequestCycle::new(engine, submission);
	let mut writer = HtmlMarkupWriter::new();
	process_request(&mut page, &mut cycle, &mut writer).unwrap();

	let response = Response::ok().with_html(writer.into_string());
	let body = String::from_utf8_lossy(&response.body).into_owned();
	assert_eq!(hits.load(Ordering::SeqCst), 1);
	assert!(body.contains("<p>returned book 42</p>"), "body: {body}");
}
