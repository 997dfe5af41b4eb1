//! Markup output as an ordered sequence of writes.
//!
//! Components emit markup through the [`MarkupWriter`] trait rather than
//! concatenating strings themselves, so the same render code can target a
//! real HTML buffer ([`HtmlMarkupWriter`]) or be driven with all output
//! discarded ([`NullMarkupWriter`], used while replaying a form
//! submission).

use std::borrow::Cow;

/// Receiver for an ordered sequence of markup writes.
///
/// Start tags are built incrementally: [`begin`](Self::begin) (or
/// [`begin_empty`](Self::begin_empty) for void elements) opens the tag,
/// [`attribute`](Self::attribute) calls add to it while it is still open,
/// and the bracket is closed lazily when the next content write arrives.
/// Calling `attribute` with no start tag open is a usage error and is
/// ignored.
pub trait MarkupWriter {
	/// Open a start tag that will later be balanced by [`end`](Self::end).
	fn begin(&mut self, tag: &str);

	/// Open a void element (`<input …/>`); no matching `end` is expected.
	fn begin_empty(&mut self, tag: &str);

	/// Add an attribute to the currently open start tag. The value is
	/// escaped for a double-quoted attribute position.
	fn attribute(&mut self, name: &str, value: &str);

	/// Write text content, escaped for a text position.
	fn print(&mut self, text: &str);

	/// Write pre-rendered markup verbatim.
	fn raw(&mut self, markup: &str);

	/// Close the innermost element opened with [`begin`](Self::begin).
	fn end(&mut self);
}

/// [`MarkupWriter`] producing an HTML string.
///
/// # Examples
///
/// ```
/// use weft_markup::{HtmlMarkupWriter, MarkupWriter};
///
/// let mut writer = HtmlMarkupWriter::new();
/// writer.begin("label");
/// writer.attribute("for", "title");
/// writer.print("Title");
/// writer.end();
/// writer.begin_empty("input");
/// writer.attribute("name", "title");
/// assert_eq!(
///     writer.into_string(),
///     r#"<label for="title">Title</label><input name="title"/>"#
/// );
/// ```
#[derive(Debug, Default)]
pub struct HtmlMarkupWriter {
	buf: String,
	open_tags: Vec<String>,
	/// A start tag bracket is pending.
	tag_open: bool,
	/// The pending start tag is a void element.
	empty_pending: bool,
}

impl HtmlMarkupWriter {
	/// A writer with an empty buffer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Close any pending bracket and unbalanced tags, returning the markup.
	pub fn into_string(mut self) -> String {
		self.close_pending();
		while !self.open_tags.is_empty() {
			self.end();
		}
		self.buf
	}

	fn close_pending(&mut self) {
		if self.tag_open {
			if self.empty_pending {
				self.buf.push_str("/>");
			} else {
				self.buf.push('>');
			}
			self.tag_open = false;
			self.empty_pending = false;
		}
	}
}

impl MarkupWriter for HtmlMarkupWriter {
	fn begin(&mut self, tag: &str) {
		self.close_pending();
		self.buf.push('<');
		self.buf.push_str(tag);
		self.open_tags.push(tag.to_string());
		self.tag_open = true;
	}

	fn begin_empty(&mut self, tag: &str) {
		self.close_pending();
		self.buf.push('<');
		self.buf.push_str(tag);
		self.tag_open = true;
		self.empty_pending = true;
	}

	fn attribute(&mut self, name: &str, value: &str) {
		debug_assert!(self.tag_open, "attribute {name:?} written with no open start tag");
		if !self.tag_open {
			return;
		}
		self.buf.push(' ');
		self.buf.push_str(name);
		self.buf.push_str("=\"");
		push_cow(
			&mut self.buf,
			html_escape::encode_double_quoted_attribute(value),
		);
		self.buf.push('"');
	}

	fn print(&mut self, text: &str) {
		self.close_pending();
		push_cow(&mut self.buf, html_escape::encode_text(text));
	}

	fn raw(&mut self, markup: &str) {
		self.close_pending();
		self.buf.push_str(markup);
	}

	fn end(&mut self) {
		self.close_pending();
		debug_assert!(!self.open_tags.is_empty(), "end() with no open element");
		if let Some(tag) = self.open_tags.pop() {
			self.buf.push_str("</");
			self.buf.push_str(&tag);
			self.buf.push('>');
		}
	}
}

fn push_cow(buf: &mut String, piece: Cow<'_, str>) {
	buf.push_str(piece.as_ref());
}

/// [`MarkupWriter`] that discards every write.
///
/// Used for walks that must drive components through their render code
/// path while producing no output, such as the rewind of a submitted form.
#[derive(Debug, Default)]
pub struct NullMarkupWriter;

impl NullMarkupWriter {
	/// A discarding writer.
	pub fn new() -> Self {
		Self
	}
}

impl MarkupWriter for NullMarkupWriter {
	fn begin(&mut self, _tag: &str) {}

	fn begin_empty(&mut self, _tag: &str) {}

	fn attribute(&mut self, _name: &str, _value: &str) {}

	fn print(&mut self, _text: &str) {}

	fn raw(&mut self, _markup: &str) {}

	fn end(&mut self) {}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_nested_elements_balance() {
		let mut writer = HtmlMarkupWriter::new();
		writer.begin("ul");
		writer.begin("li");
		writer.print("first");
		writer.end();
		writer.begin("li");
		writer.print("second");
		writer.end();
		writer.end();
		assert_eq!(
			writer.into_string(),
			"<ul><li>first</li><li>second</li></ul>"
		);
	}

	#[test]
	fn test_attribute_values_are_escaped() {
		let mut writer = HtmlMarkupWriter::new();
		writer.begin_empty("input");
		writer.attribute("value", r#"say "hi" & <go>"#);
		let html = writer.into_string();
		assert!(html.contains("&quot;"), "html: {html}");
		assert!(!html.contains(r#"say "hi""#), "html: {html}");
	}

	#[test]
	fn test_text_is_escaped() {
		let mut writer = HtmlMarkupWriter::new();
		writer.begin("p");
		writer.print("a < b & c");
		writer.end();
		assert_eq!(writer.into_string(), "<p>a &lt; b &amp; c</p>");
	}

	#[test]
	fn test_pending_empty_tag_closes_on_finish() {
		let mut writer = HtmlMarkupWriter::new();
		writer.begin_empty("input");
		writer.attribute("type", "hidden");
		assert_eq!(writer.into_string(), r#"<input type="hidden"/>"#);
	}

	#[test]
	fn test_pending_empty_tag_closes_before_next_write() {
		let mut writer = HtmlMarkupWriter::new();
		writer.begin_empty("br");
		writer.print("after");
		assert_eq!(writer.into_string(), "<br/>after");
	}

	#[test]
	fn test_unbalanced_tags_close_on_finish() {
		let mut writer = HtmlMarkupWriter::new();
		writer.begin("div");
		writer.begin("span");
		writer.print("x");
		assert_eq!(writer.into_string(), "<div><span>x</span></div>");
	}

	#[test]
	fn test_raw_bypasses_escaping() {
		let mut writer = HtmlMarkupWriter::new();
		writer.raw("<!-- keep -->");
		assert_eq!(writer.into_string(), "<!-- keep -->");
	}

	#[test]
	fn test_null_writer_discards_everything() {
		let mut writer = NullMarkupWriter::new();
		writer.begin("div");
		writer.attribute("id", "x");
		writer.print("gone");
		writer.end();
	}
}
