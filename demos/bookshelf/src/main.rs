//! Drives a borrowed-books round trip from the command line: render the
//! page, replay a return-book submission, and print both responses.

use std::sync::Arc;

use bookshelf::{Book, BorrowedBooksPage, MemoryLibrary, Operations as _};
use serde_json::json;
use weft::core::{Engine, EngineConfig, RequestCycle, process_request, render_page};
use weft::http::{Request, Response};
use weft::markup::HtmlMarkupWriter;

fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_max_level(tracing::Level::DEBUG)
		.init();

	let library = Arc::new(MemoryLibrary::new());
	for (id, title, author) in [
		(1, "Dune", "Frank Herbert"),
		(2, "Emma", "Jane Austen"),
		(3, "Ubik", "Philip K. Dick"),
	] {
		library.insert(Book {
			id,
			title: title.to_string(),
			author: author.to_string(),
			holder: None,
		});
	}
	library.borrow_book(1, "kate")?;
	library.borrow_book(3, "kate")?;

	let engine = Arc::new(Engine::new(EngineConfig::new()));
	let mut page = BorrowedBooksPage::new("kate", library.clone(), {
		let library = library.clone();
		Arc::new(move || library.query())
	});

	// First request: the user picks a book to return.
	let request = Request::builder().uri("/borrowed?select=1").build()?;
	let mut cycle = RequestCycle::new(engine.clone(), request);
	let mut writer = HtmlMarkupWriter::new();
	render_page(&mut page, &mut cycle, &mut writer)?;
	println!("--- GET /borrowed?select=1 ---\n{}\n", writer.into_string());

	// Second request: the form comes back; the hidden field carries the
	// selected book's encoded primary key.
	let token = engine.squeezer().squeeze(&json!(1))?;
	let submission = Request::builder()
		.uri("/borrowed")
		.form(&[
			("_form_id", "returnForm"),
			("book", token.as_str()),
			("return", "Return selected book"),
		])
		.build()?;
	let mut cycle = RequestCycle::new(engine, submission);
	let mut writer = HtmlMarkupWriter::new();
	process_request(&mut page, &mut cycle, &mut writer)?;
	let response = Response::ok().with_html(writer.into_string());
	println!(
		"--- POST /borrowed ---\n{}",
		String::from_utf8_lossy(&response.body)
	);

	Ok(())
}
