//! Line-based parser for the YAML subset accepted in front matter.
//!
//! Supported forms:
//!
//! ```yaml
//! title: Plain scalar
//! quoted: "double" or 'single'
//! tags:
//!   - list
//!   - items
//! summary: |
//!   literal block,
//!   kept line by line
//! ```
//!
//! Anything else is skipped with a warning.
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use super::FRONT_MATTER_DELIMITER;

#[allow(
  clippy::expect_used,
  reason = "This regex is a compile-time constant and is known to be valid"
)]
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[ ]{0,3}([A-Za-z0-9._-]+):\s*(.*)$")
    .expect("Failed to compile front matter key regex")
});

#[allow(
  clippy::expect_used,
  reason = "This regex is a compile-time constant and is known to be valid"
)]
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[ ]+-\s*(.*)$").expect("Failed to compile front matter list regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Scalar,
  List,
  Literal,
}

/// Parse the raw front matter block, delimiters included, into
/// `(key, values)` pairs in document order.
pub(super) fn parse_entries(raw: &str) -> Vec<(String, Vec<String>)> {
  let mut entries = Vec::new();
  let mut current: Option<(String, Vec<String>, Mode)> = None;

  for line in body_lines(raw) {
    if let Some((_, values, Mode::Literal)) = current.as_mut()
      && (line.is_empty() || line.starts_with([' ', '\t']))
    {
      values.push(line.trim_start().to_string());
      continue;
    }

    if let Some(captures) = KEY_RE.captures(line) {
      flush(&mut entries, current.take());
      let key = captures[1].to_string();
      let value = captures[2].trim();
      current = Some(match value {
        "|" => (key, Vec::new(), Mode::Literal),
        "" => (key, Vec::new(), Mode::List),
        value => (key, vec![unquote(value)], Mode::Scalar),
      });
      continue;
    }

    if let Some((_, values, Mode::List)) = current.as_mut()
      && let Some(captures) = LIST_ITEM_RE.captures(line)
    {
      values.push(unquote(captures[1].trim()));
      continue;
    }

    if !line.trim().is_empty() {
      warn!("Ignoring unsupported front matter line: {line}");
    }
  }

  flush(&mut entries, current);
  entries
}

/// Lines between the opening and closing delimiter.
fn body_lines(raw: &str) -> impl Iterator<Item = &str> {
  let mut lines = raw.lines();
  let mut first = lines.next();
  if first.is_some_and(|line| line.trim_end() == FRONT_MATTER_DELIMITER) {
    first = None;
  }
  first
    .into_iter()
    .chain(lines)
    .take_while(|line| line.trim_end() != FRONT_MATTER_DELIMITER)
}

fn flush(
  entries: &mut Vec<(String, Vec<String>)>,
  current: Option<(String, Vec<String>, Mode)>,
) {
  let Some((key, mut values, mode)) = current else {
    return;
  };
  if mode == Mode::Literal {
    while values.last().is_some_and(String::is_empty) {
      values.pop();
    }
    values = vec![values.join("\n")];
  }
  entries.push((key, values));
}

fn unquote(value: &str) -> String {
  if value.len() >= 2 {
    if let Some(inner) = value
      .strip_prefix('\'')
      .and_then(|rest| rest.strip_suffix('\''))
    {
      return inner.replace("''", "'");
    }
    if let Some(inner) = value
      .strip_prefix('"')
      .and_then(|rest| rest.strip_suffix('"'))
    {
      return inner.replace("\\\"", "\"").replace("\\\\", "\\");
    }
  }
  value.to_string()
}
