use std::collections::HashMap;

use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::HttpError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An incoming request, with form and query parameters flattened into one
/// decoded map.
///
/// Body parameters of a form-encoded POST take precedence over query
/// parameters of the same name.
///
/// # Examples
///
/// ```
/// use weft_http::Request;
/// use hyper::Method;
///
/// let request = Request::builder()
///     .method(Method::GET)
///     .uri("/books?author=Herbert")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.parameter("author"), Some("Herbert"));
/// assert!(!request.is_submission());
/// ```
#[derive(Debug, Clone)]
pub struct Request {
	/// HTTP method
	pub method: Method,
	/// Request URI
	pub uri: Uri,
	/// HTTP version
	pub version: Version,
	/// Request headers
	pub headers: HeaderMap,
	/// Raw request body
	pub body: Bytes,
	params: HashMap<String, String>,
}

impl Request {
	/// Construct a request and parse its parameters.
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		let mut params = parse_urlencoded(uri.query().unwrap_or(""));
		if method == Method::POST && is_form_content_type(&headers) {
			let body_str = String::from_utf8_lossy(&body);
			params.extend(parse_urlencoded(&body_str));
		}
		Self {
			method,
			uri,
			version,
			headers,
			body,
			params,
		}
	}

	/// Start building a request.
	pub fn builder() -> RequestBuilder {
		RequestBuilder::new()
	}

	/// The request path.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Look up a single decoded parameter.
	pub fn parameter(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// All decoded parameters.
	pub fn parameters(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Whether this request is a form submission (a POST). Which form was
	/// submitted is decided upstream from the posted parameters.
	pub fn is_submission(&self) -> bool {
		self.method == Method::POST
	}
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: Vec<(String, String)>,
	body: Bytes,
}

impl RequestBuilder {
	fn new() -> Self {
		Self {
			uri: "/".to_string(),
			..Self::default()
		}
	}

	/// Set the HTTP method.
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Set the request URI.
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	/// Add a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Set the raw body.
	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a form-encoded POST body from name/value pairs.
	///
	/// Switches the method to POST and sets the content type.
	///
	/// # Examples
	///
	/// ```
	/// use weft_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/return")
	///     .form(&[("book", "i42"), ("note", "two words")])
	///     .build()
	///     .unwrap();
	///
	/// assert!(request.is_submission());
	/// assert_eq!(request.parameter("note"), Some("two words"));
	/// ```
	pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
		let encoded = pairs
			.iter()
			.map(|(name, value)| {
				format!(
					"{}={}",
					utf8_percent_encode(name, NON_ALPHANUMERIC),
					utf8_percent_encode(value, NON_ALPHANUMERIC)
				)
			})
			.collect::<Vec<_>>()
			.join("&");
		self.method = Method::POST;
		self.headers
			.push((CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string()));
		self.body = Bytes::from(encoded);
		self
	}

	/// Build the request, parsing the URI and headers.
	pub fn build(self) -> Result<Request, HttpError> {
		let uri: Uri = self.uri.parse()?;
		let mut headers = HeaderMap::new();
		for (name, value) in self.headers {
			let header_name: HeaderName = name
				.parse()
				.map_err(|_| HttpError::InvalidHeaderName(name.clone()))?;
			let header_value: HeaderValue = value
				.parse()
				.map_err(|_| HttpError::InvalidHeaderValue(name.clone()))?;
			headers.append(header_name, header_value);
		}
		Ok(Request::new(
			self.method,
			uri,
			self.version,
			headers,
			self.body,
		))
	}
}

fn is_form_content_type(headers: &HeaderMap) -> bool {
	headers
		.get(CONTENT_TYPE)
		.and_then(|v| v.to_str().ok())
		.is_some_and(|v| v.split(';').next().is_some_and(|t| t.trim() == FORM_CONTENT_TYPE))
}

/// Parse an `application/x-www-form-urlencoded` string into a decoded map.
///
/// Splits on the first `=` only, so values may contain `=` (base64 padding
/// and the like survive).
fn parse_urlencoded(input: &str) -> HashMap<String, String> {
	input
		.split('&')
		.filter(|pair| !pair.is_empty())
		.filter_map(|pair| {
			let mut parts = pair.splitn(2, '=');
			Some((
				decode_component(parts.next()?),
				decode_component(parts.next().unwrap_or("")),
			))
		})
		.collect()
}

fn decode_component(raw: &str) -> String {
	let spaced = raw.replace('+', " ");
	percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_query_parameters_are_decoded() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/search?name=John%20Doe&tag=a%2Bb")
			.build()
			.unwrap();
		assert_eq!(request.parameter("name"), Some("John Doe"));
		assert_eq!(request.parameter("tag"), Some("a+b"));
	}

	#[test]
	fn test_form_body_overrides_query() {
		let request = Request::builder()
			.uri("/submit?who=query")
			.form(&[("who", "body")])
			.build()
			.unwrap();
		assert_eq!(request.parameter("who"), Some("body"));
	}

	#[test]
	fn test_form_round_trips_hostile_values() {
		let request = Request::builder()
			.uri("/submit")
			.form(&[("token", "Si42&x=y"), ("empty", "")])
			.build()
			.unwrap();
		assert_eq!(request.parameter("token"), Some("Si42&x=y"));
		assert_eq!(request.parameter("empty"), Some(""));
	}

	#[test]
	fn test_values_keep_embedded_equals() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/cb?state=aGVsbG8=")
			.build()
			.unwrap();
		assert_eq!(request.parameter("state"), Some("aGVsbG8="));
	}

	#[test]
	fn test_post_without_form_content_type_keeps_body_opaque() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/raw")
			.body("a=1&b=2")
			.build()
			.unwrap();
		assert_eq!(request.parameter("a"), None);
		assert!(request.is_submission());
	}
}
