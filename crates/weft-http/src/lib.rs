//! Transport surface for the component lifecycle.
//!
//! The hosting container owns the actual server loop; this crate only
//! defines the [`Request`] and [`Response`] shapes the framework consumes
//! and produces, built on `hyper`/`http` primitives. Form and query
//! parameters are flattened into one percent-decoded map at construction
//! time, which is all the rewind machinery ever looks at.

mod request;
mod response;

pub use request::{Request, RequestBuilder};
pub use response::Response;

use thiserror::Error;

/// Errors raised while constructing transport values.
#[derive(Debug, Error)]
pub enum HttpError {
	/// The URI does not parse.
	#[error("invalid URI")]
	InvalidUri(#[from] http::uri::InvalidUri),

	/// A header name does not parse.
	#[error("invalid header name {0:?}")]
	InvalidHeaderName(String),

	/// A header value does not parse.
	#[error("invalid header value for {0:?}")]
	InvalidHeaderValue(String),
}
