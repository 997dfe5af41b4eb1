use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{HeaderMap, StatusCode};

/// An outgoing response.
///
/// # Examples
///
/// ```
/// use weft_http::Response;
///
/// let response = Response::ok().with_html("<p>returned</p>");
/// assert_eq!(response.status, hyper::StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct Response {
	/// Status code
	pub status: StatusCode,
	/// Response headers
	pub headers: HeaderMap,
	/// Response body
	pub body: Bytes,
}

impl Response {
	/// A response with the given status and an empty body.
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// A `200 OK` response with an empty body.
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// A `500 Internal Server Error` response with an empty body.
	pub fn server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the raw body.
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set an HTML body and content type.
	pub fn with_html(mut self, html: impl Into<String>) -> Self {
		self.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("text/html; charset=utf-8"),
		);
		self.body = Bytes::from(html.into());
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_html_response_sets_content_type() {
		let response = Response::ok().with_html("<p>hi</p>");
		assert_eq!(
			response.headers.get(CONTENT_TYPE).unwrap(),
			"text/html; charset=utf-8"
		);
		assert_eq!(&response.body[..], b"<p>hi</p>");
	}

	#[test]
	fn test_error_response() {
		let response = Response::server_error();
		assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert!(response.body.is_empty());
	}
}
