//! Library domain: books and the persistence traits the pages call.
//!
//! Persistence itself is somebody else's problem; the pages only see
//! these traits.

use thiserror::Error;

/// A book in the library's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
	/// Primary key
	pub id: i64,
	/// Title
	pub title: String,
	/// Author
	pub author: String,
	/// User currently holding the book, if it is checked out
	pub holder: Option<String>,
}

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum LibraryError {
	/// No book under that id.
	#[error("no book with id {0}")]
	BookNotFound(i64),

	/// The book is on the shelf already.
	#[error("book {0} is not checked out")]
	NotBorrowed(i64),

	/// The backend could not be reached; retrying may help.
	#[error("library backend unavailable: {0}")]
	Unavailable(String),
}

impl LibraryError {
	/// Whether retrying against a fresh connection could succeed.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Unavailable(_))
	}
}

/// A finder over the catalog. Instances may hold backend state (a cursor,
/// a connection) and are recreated when that state goes bad.
pub trait BookQuery: Send {
	/// Books currently held by `user`, in catalog order.
	fn borrowed_by(&mut self, user: &str) -> Result<Vec<Book>, LibraryError>;
}

/// Mutating library operations.
pub trait Operations: Send + Sync {
	/// Check a book out to `user`.
	fn borrow_book(&self, book_id: i64, user: &str) -> Result<Book, LibraryError>;

	/// Return a checked-out book to the shelf, yielding its fresh state.
	fn return_book(&self, book_id: i64) -> Result<Book, LibraryError>;
}
