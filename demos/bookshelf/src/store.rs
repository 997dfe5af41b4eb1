//! In-memory library backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{Book, BookQuery, LibraryError, Operations};

/// A library held entirely in memory; the demo's stand-in for a real
/// backend.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
	books: RwLock<BTreeMap<i64, Book>>,
}

impl MemoryLibrary {
	/// An empty library.
	pub fn new() -> Self {
		Self::default()
	}

	/// Put a book in the catalog, replacing any previous one with the
	/// same id.
	pub fn insert(&self, book: Book) {
		self.books.write().insert(book.id, book);
	}

	/// Look a book up by id.
	pub fn get(&self, book_id: i64) -> Option<Book> {
		self.books.read().get(&book_id).cloned()
	}

	/// A finder backed by this library.
	pub fn query(self: &Arc<Self>) -> Box<dyn BookQuery> {
		Box::new(MemoryQuery {
			library: Arc::clone(self),
		})
	}
}

impl Operations for MemoryLibrary {
	fn borrow_book(&self, book_id: i64, user: &str) -> Result<Book, LibraryError> {
		let mut books = self.books.write();
		let book = books
			.get_mut(&book_id)
			.ok_or(LibraryError::BookNotFound(book_id))?;
		book.holder = Some(user.to_string());
		Ok(book.clone())
	}

	fn return_book(&self, book_id: i64) -> Result<Book, LibraryError> {
		let mut books = self.books.write();
		let book = books
			.get_mut(&book_id)
			.ok_or(LibraryError::BookNotFound(book_id))?;
		if book.holder.is_none() {
			return Err(LibraryError::NotBorrowed(book_id));
		}
		book.holder = None;
		Ok(book.clone())
	}
}

struct MemoryQuery {
	library: Arc<MemoryLibrary>,
}

impl BookQuery for MemoryQuery {
	fn borrowed_by(&mut self, user: &str) -> Result<Vec<Book>, LibraryError> {
		Ok(self
			.library
			.books
			.read()
			.values()
			.filter(|book| book.holder.as_deref() == Some(user))
			.cloned()
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn book(id: i64, title: &str) -> Book {
		Book {
			id,
			title: title.to_string(),
			author: "Author".to_string(),
			holder: None,
		}
	}

	#[test]
	fn test_borrow_and_return() {
		let library = Arc::new(MemoryLibrary::new());
		library.insert(book(1, "Dune"));

		let borrowed = library.borrow_book(1, "kate").unwrap();
		assert_eq!(borrowed.holder.as_deref(), Some("kate"));

		let returned = library.return_book(1).unwrap();
		assert_eq!(returned.holder, None);
	}

	#[test]
	fn test_return_of_shelved_book_is_an_error() {
		let library = Arc::new(MemoryLibrary::new());
		library.insert(book(1, "Dune"));
		assert!(matches!(
			library.return_book(1),
			Err(LibraryError::NotBorrowed(1))
		));
	}

	#[test]
	fn test_query_sees_only_the_users_books() {
		let library = Arc::new(MemoryLibrary::new());
		library.insert(book(1, "Dune"));
		library.insert(book(2, "Emma"));
		library.insert(book(3, "Ubik"));
		library.borrow_book(1, "kate").unwrap();
		library.borrow_book(3, "kate").unwrap();
		library.borrow_book(2, "sam").unwrap();

		let mut query = library.query();
		let titles: Vec<String> = query
			.borrowed_by("kate")
			.unwrap()
			.into_iter()
			.map(|b| b.title)
			.collect();
		assert_eq!(titles, ["Dune", "Ubik"]);
	}
}
