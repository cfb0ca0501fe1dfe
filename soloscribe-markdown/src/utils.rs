//! Helpers shared by the renderer: heading anchor ids and URL handling.
use std::{collections::HashMap, sync::LazyLock};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;

/// Id used for headings whose text slugifies to nothing.
pub const DEFAULT_ANCHOR_ID: &str = "id";

/// Protocols left intact when URL sanitizing is on.
const SAFE_PROTOCOLS: [&str; 4] = ["http", "https", "mailto", "data"];

/// Characters escaped in link destinations: controls, space, and ASCII that
/// is neither reserved nor unreserved in RFC 3986. Existing `%` escapes are
/// left alone.
const URL_ENCODE_SET: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'<')
  .add(b'>')
  .add(b'\\')
  .add(b'^')
  .add(b'`')
  .add(b'{')
  .add(b'|')
  .add(b'}');

#[allow(
  clippy::expect_used,
  reason = "This regex is a compile-time constant and is known to be valid"
)]
static ANCHOR_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[\w\-_]+").expect("Failed to compile anchor character regex")
});

/// Slugify heading text for use as an anchor id.
///
/// Lowercases, turns spaces into dashes and keeps only word characters,
/// `-` and `_`.
///
/// ```
/// use soloscribe_markdown::utils::slugify;
///
/// assert_eq!(slugify("Hello, Markdown!"), "hello-markdown");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
  let lowered = text.to_lowercase().replace(' ', "-");
  ANCHOR_CHARS_RE
    .find_iter(&lowered)
    .map(|found| found.as_str())
    .collect()
}

/// Generator of unique anchor ids within one rendered document.
#[derive(Debug, Default)]
pub struct AnchorIds {
  seen: HashMap<String, usize>,
}

impl AnchorIds {
  /// Id for a heading with the given text. Repeats get `-1`, `-2`, ...
  /// suffixes.
  pub fn generate(&mut self, text: &str) -> String {
    let mut id = slugify(text);
    if id.is_empty() {
      id = DEFAULT_ANCHOR_ID.to_string();
    }
    self.unique(id)
  }

  fn unique(&mut self, id: String) -> String {
    match self.seen.get_mut(&id) {
      Some(count) => {
        let candidate = format!("{id}-{count}");
        *count += 1;
        self.unique(candidate)
      },
      None => {
        self.seen.insert(id.clone(), 1);
        id
      },
    }
  }
}

/// Blank out destinations whose protocol is not known to be safe.
///
/// Relative URLs, fragments and queries are kept.
#[must_use]
pub fn sanitize_url(url: &str) -> String {
  let url = url.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c'));
  for (index, c) in url.char_indices() {
    match c {
      '/' | '?' | '#' => break,
      ':' => {
        let protocol = url[..index].to_lowercase();
        if !SAFE_PROTOCOLS.contains(&protocol.as_str()) {
          return String::new();
        }
        break;
      },
      _ => {},
    }
  }
  url.to_string()
}

/// Percent-encode characters that may not appear literally in a URL.
#[must_use]
pub fn percent_encode_url(url: &str) -> String {
  utf8_percent_encode(url, URL_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify() {
    assert_eq!(slugify("Hello World"), "hello-world");
    assert_eq!(slugify("C++ & Rust_2024"), "c--rust_2024");
    assert_eq!(slugify("Ünïcode Títle"), "ünïcode-títle");
    assert_eq!(slugify("!!!"), "");
  }

  #[test]
  fn test_anchor_ids_are_unique() {
    let mut ids = AnchorIds::default();
    assert_eq!(ids.generate("Intro"), "intro");
    assert_eq!(ids.generate("Intro"), "intro-1");
    assert_eq!(ids.generate("Intro"), "intro-2");
    assert_eq!(ids.generate("intro-1"), "intro-1-1");
    assert_eq!(ids.generate("?"), "id");
    assert_eq!(ids.generate(""), "id-1");
  }

  #[test]
  fn test_sanitize_url() {
    assert_eq!(sanitize_url("https://example.com"), "https://example.com");
    assert_eq!(sanitize_url("MAILTO:me@example.com"), "MAILTO:me@example.com");
    assert_eq!(sanitize_url("javascript:alert(1)"), "");
    assert_eq!(sanitize_url(" vbscript:x "), "");
    assert_eq!(sanitize_url("/path:with/colon"), "/path:with/colon");
    assert_eq!(sanitize_url("page?x=a:b"), "page?x=a:b");
    assert_eq!(sanitize_url("#frag"), "#frag");
  }

  #[test]
  fn test_percent_encode_url() {
    assert_eq!(percent_encode_url("/a b/ä?q=\"x\""), "/a%20b/%C3%A4?q=%22x%22");
    assert_eq!(percent_encode_url("/already%20done"), "/already%20done");
  }
}
