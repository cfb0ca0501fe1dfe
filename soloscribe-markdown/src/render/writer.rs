//! Streaming HTML writer shared by built-in rules and caller render rules.
use html_escape::encode_double_quoted_attribute;

use super::AttributeSet;

/// Append-only HTML sink.
///
/// Output is never reordered: every call appends at the end, in the order
/// rules make them.
#[derive(Debug, Default)]
pub struct HtmlWriter {
  buffer:    String,
  last_char: Option<char>,
}

impl HtmlWriter {
  #[must_use]
  pub const fn new() -> Self {
    Self {
      buffer:    String::new(),
      last_char: None,
    }
  }

  /// Append `html` unescaped.
  pub fn raw(&mut self, html: &str) {
    if let Some(last) = html.chars().next_back() {
      self.buffer.push_str(html);
      self.last_char = Some(last);
    }
  }

  /// Append `text` with `&`, `<`, `>` and `"` escaped.
  pub fn text(&mut self, text: &str) {
    self.raw(&encode_double_quoted_attribute(text));
  }

  /// Emit `<name>`. Closing tags are written as `tag("/name")`.
  pub fn tag(&mut self, name: &str) {
    self.raw("<");
    self.raw(name);
    self.raw(">");
  }

  /// Emit `<name attr="value" ...>`.
  pub fn tag_with(&mut self, name: &str, attributes: &AttributeSet) {
    self.open_tag(name, attributes);
    self.raw(">");
  }

  /// Emit a self-closing `<name attr="value" ... />`.
  pub fn void_tag(&mut self, name: &str, attributes: &AttributeSet) {
    self.open_tag(name, attributes);
    self.raw(" />");
  }

  /// Emit `</name>`.
  pub fn close_tag(&mut self, name: &str) {
    self.raw("</");
    self.raw(name);
    self.raw(">");
  }

  /// Start a new line unless output is empty or already ends with one.
  pub fn line(&mut self) {
    if self.last_char.is_some_and(|last| last != '\n') {
      self.raw("\n");
    }
  }

  /// HTML written so far.
  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.buffer
  }

  pub(crate) fn finish(self) -> String {
    self.buffer
  }

  fn open_tag(&mut self, name: &str, attributes: &AttributeSet) {
    let mut tag = String::with_capacity(name.len() + 1);
    tag.push('<');
    tag.push_str(name);
    for (key, value) in attributes.iter() {
      tag.push(' ');
      tag.push_str(&encode_double_quoted_attribute(key));
      tag.push_str("=\"");
      tag.push_str(&encode_double_quoted_attribute(value));
      tag.push('"');
    }
    self.raw(&tag);
  }
}
