//! Bookshelf: a small library-management application built on weft.
//!
//! The interesting page is [`pages::BorrowedBooksPage`]: it lists the
//! books a user has borrowed and lets them return one. The selected
//! book's primary key rides through the round trip in a hidden field;
//! when the form comes back, the field's listener re-reads the entity
//! through [`domain::Operations`] and records a user-visible message.

pub mod domain;
pub mod pages;
pub mod store;

pub use domain::{Book, BookQuery, LibraryError, Operations};
pub use pages::BorrowedBooksPage;
pub use store::MemoryLibrary;
