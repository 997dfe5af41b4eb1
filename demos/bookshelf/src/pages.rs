//! Application pages.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;
use weft::core::{
	Binding, Callback, CycleError, CycleResult, FormComponent, Page, RequestCycle, ValueBinding,
};
use weft::form::{Form, Hidden, Submit};
use weft::markup::MarkupWriter;

use crate::domain::{Book, BookQuery, LibraryError, Operations};

/// Creates finder instances; called again whenever a finder's backend
/// state goes bad.
pub type QueryFactory = Arc<dyn Fn() -> Box<dyn BookQuery> + Send + Sync>;

/// Lists the user's borrowed books and lets them return one.
///
/// The selected book's primary key is carried by a hidden field; on
/// submission the field's listener re-reads the entity through
/// [`Operations::return_book`] and records a message, which the response
/// render of the same request then shows.
pub struct BorrowedBooksPage {
	user: String,
	query_factory: QueryFactory,
	form: Form,
	selected: ValueBinding,
	message: ValueBinding,
	query: Option<Box<dyn BookQuery>>,
	books: Vec<Book>,
}

impl BorrowedBooksPage {
	/// A page for `user`'s borrowed books.
	pub fn new(
		user: impl Into<String>,
		operations: Arc<dyn Operations>,
		query_factory: QueryFactory,
	) -> Self {
		let selected = ValueBinding::new(json!(null));
		let message = ValueBinding::new(json!(null));

		let listener = Callback::new({
			let selected = selected.clone();
			let message = message.clone();
			move |_component, _cycle| {
				let Ok(book_id) = selected.as_i64() else {
					message.set(json!("No book selected."));
					return Ok(());
				};
				match operations.return_book(book_id) {
					Ok(book) => {
						message.set(json!(format!("Returned book: {}", book.title)));
						Ok(())
					}
					Err(err) if err.is_transient() => Err(err.into()),
					Err(err) => {
						message.set(json!(format!("Could not return book: {err}")));
						Ok(())
					}
				}
			}
		});

		let form = Form::new("returnForm", "/borrowed")
			.with_component(Hidden::new("book", selected.clone()).with_listener(listener))
			.with_component(Submit::new("return", "Return selected book"));

		Self {
			user: user.into(),
			query_factory,
			form,
			selected,
			message,
			query: None,
			books: Vec::new(),
		}
	}

	/// The message recorded by the last walk, if any.
	pub fn message(&self) -> Option<String> {
		self.message.as_str().ok()
	}

	/// Books loaded for the current render.
	pub fn books(&self) -> &[Book] {
		&self.books
	}

	/// Load the user's borrowed books. A transient failure gets one
	/// retry against a freshly created finder; anything else propagates.
	fn load_books(&mut self) -> Result<(), LibraryError> {
		for attempt in 0..2 {
			let query = self.query.get_or_insert_with(|| (self.query_factory)());
			match query.borrowed_by(&self.user) {
				Ok(books) => {
					self.books = books;
					return Ok(());
				}
				Err(err) if err.is_transient() && attempt == 0 => {
					warn!(error = %err, "borrowed-books query failed, recreating finder");
					self.query = None;
				}
				Err(err) => return Err(err),
			}
		}
		Ok(())
	}
}

impl Page for BorrowedBooksPage {
	fn name(&self) -> &str {
		"BorrowedBooks"
	}

	fn detach(&mut self) {
		self.selected.set(json!(null));
		self.message.set(json!(null));
		self.books.clear();
		self.query = None;
		self.form.detach();
	}

	fn begin_response(&mut self, cycle: &mut RequestCycle) -> CycleResult<()> {
		// A plain request selects a book via ?select=<id>; after a rewind
		// the hidden field has already set the selection.
		if self.selected.as_i64().is_err() {
			if let Some(id) = cycle.parameter("select").and_then(|raw| raw.parse::<i64>().ok()) {
				self.selected.set(json!(id));
			}
		}
		self.load_books().map_err(|source| CycleError::Listener {
			component: self.name().to_string(),
			source: source.into(),
		})
	}

	fn walk(&mut self, writer: &mut dyn MarkupWriter, cycle: &mut RequestCycle) -> CycleResult<()> {
		writer.begin("h1");
		writer.print("Borrowed Books");
		writer.end();

		if let Ok(message) = self.message.as_str() {
			writer.begin("p");
			writer.attribute("class", "message");
			writer.print(&message);
			writer.end();
		}

		if !self.books.is_empty() {
			writer.begin("ul");
			for book in &self.books {
				writer.begin("li");
				writer.begin("a");
				writer.attribute("href", &format!("/borrowed?select={}", book.id));
				writer.print(&book.title);
				writer.end();
				writer.print(&format!(" by {}", book.author));
				writer.end();
			}
			writer.end();
		}

		self.form.render_or_rewind(writer, cycle)
	}
}
