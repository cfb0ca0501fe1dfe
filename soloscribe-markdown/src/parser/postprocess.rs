//! Tree post-processors for extensions comrak does not provide.
use std::{collections::HashMap, sync::LazyLock};

use log::trace;
use regex::Regex;

use crate::{
  ast::{Document, NodeId, NodeKind},
  config::Extension,
};

const INS_DELIMITER: &str = "++";

/// Keys accepted inside an image attribute block.
const IMAGE_ATTRIBUTE_KEYS: [&str; 2] = ["width", "height"];

#[allow(
  clippy::expect_used,
  reason = "This regex is a compile-time constant and is known to be valid"
)]
static TASK_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\[([ xX])\]\s+").expect("Failed to compile task marker regex")
});

/// Run the post-processor contributed by `extension`, if it has one.
pub(super) fn apply(extension: Extension, document: &mut Document) {
  match extension {
    Extension::Ins => insert_ins(document),
    Extension::ImageAttributes => attach_image_attributes(document),
    Extension::TaskList => mark_task_items(document),
    Extension::Autolink
    | Extension::Strikethrough
    | Extension::Tables
    | Extension::Footnotes
    | Extension::YamlFrontMatter
    | Extension::HeadingAnchors => {},
  }
}

fn all_ids(document: &Document) -> Vec<NodeId> {
  document
    .root()
    .descendants()
    .map(|node| node.id())
    .collect()
}

/// What sits just outside a `++` run, as seen by delimiter flanking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flank {
  /// Whitespace, a line break or the edge of the container.
  Blank,
  /// Any other character, or a non-text inline such as emphasis or code.
  Solid,
}

impl Flank {
  fn of(c: Option<char>) -> Self {
    match c {
      Some(c) if !c.is_whitespace() => Self::Solid,
      _ => Self::Blank,
    }
  }
}

/// Flank contributed by the sibling next to a text node. `from_end` picks
/// the sibling's last character (a previous sibling) over its first.
fn sibling_flank(document: &Document, sibling: Option<NodeId>, from_end: bool) -> Flank {
  let Some(sibling) = sibling else {
    return Flank::Blank;
  };
  match document.kind(sibling) {
    NodeKind::Text { literal } => {
      Flank::of(if from_end {
        literal.chars().next_back()
      } else {
        literal.chars().next()
      })
    },
    NodeKind::SoftLineBreak | NodeKind::HardLineBreak => Flank::Blank,
    _ => Flank::Solid,
  }
}

/// A matched `++` run inside a text node.
#[derive(Debug, Clone, Copy)]
struct Delimiter {
  offset: usize,
  opens:  bool,
}

/// Wrap every `++text++` run in an [`NodeKind::Ins`] node.
fn insert_ins(document: &mut Document) {
  for container in all_ids(document) {
    let delimiters = match_ins_delimiters(document, container);
    if delimiters.is_empty() {
      continue;
    }
    trace!(
      "Wrapping {} inserted-text runs",
      delimiters.values().map(Vec::len).sum::<usize>() / 2
    );
    rebuild_with_ins(document, container, &delimiters);
  }
}

/// Pair up the `++` runs among the direct children of `container` in one
/// pass, keyed by the text node holding them and sorted by offset.
///
/// A run can open when followed by non-whitespace and close when preceded by
/// non-whitespace. Closers match the innermost open run; unmatched runs stay
/// text.
fn match_ins_delimiters(
  document: &Document,
  container: NodeId,
) -> HashMap<NodeId, Vec<Delimiter>> {
  let mut matched: HashMap<NodeId, Vec<Delimiter>> = HashMap::new();
  let mut openers: Vec<(NodeId, usize)> = Vec::new();

  for child in document.child_ids(container) {
    let NodeKind::Text { literal } = document.kind(child) else {
      continue;
    };
    for (offset, _) in literal.match_indices(INS_DELIMITER) {
      let before = match literal[..offset].chars().next_back() {
        Some(c) => Flank::of(Some(c)),
        None => sibling_flank(document, document.previous_sibling(child), true),
      };
      let after = match literal[offset + INS_DELIMITER.len()..].chars().next() {
        Some(c) => Flank::of(Some(c)),
        None => sibling_flank(document, document.next_sibling(child), false),
      };

      if before == Flank::Solid
        && let Some((node, opener)) = openers.pop()
      {
        matched.entry(node).or_default().push(Delimiter {
          offset: opener,
          opens:  true,
        });
        matched.entry(child).or_default().push(Delimiter {
          offset,
          opens: false,
        });
      } else if after == Flank::Solid {
        openers.push((child, offset));
      }
    }
  }

  for delimiters in matched.values_mut() {
    delimiters.sort_by_key(|delimiter| delimiter.offset);
  }
  matched
}

/// Re-append the children of `container`, cutting matched delimiters out of
/// their text nodes and nesting everything between a pair under an `Ins`.
fn rebuild_with_ins(
  document: &mut Document,
  container: NodeId,
  delimiters: &HashMap<NodeId, Vec<Delimiter>>,
) {
  let children = document.child_ids(container);
  for child in &children {
    document.detach(*child);
  }

  let mut open = vec![container];
  for child in children {
    let parent = open.last().copied().unwrap_or(container);
    let Some(splits) = delimiters.get(&child) else {
      document.append_child(parent, child);
      continue;
    };
    let literal = match document.kind_mut(child) {
      NodeKind::Text { literal } => std::mem::take(literal),
      _ => continue,
    };

    let mut start = 0;
    for delimiter in splits {
      let parent = open.last().copied().unwrap_or(container);
      push_piece(document, parent, &literal[start..delimiter.offset]);
      if delimiter.opens {
        open.push(document.append_new(parent, NodeKind::Ins));
      } else {
        open.pop();
      }
      start = delimiter.offset + INS_DELIMITER.len();
    }
    let parent = open.last().copied().unwrap_or(container);
    push_piece(document, parent, &literal[start..]);
  }
}

fn push_piece(document: &mut Document, parent: NodeId, piece: &str) {
  if !piece.is_empty() {
    document.append_new(parent, NodeKind::Text {
      literal: piece.to_string(),
    });
  }
}

/// Move a `{width=.. height=..}` block following an image into an
/// [`NodeKind::ImageAttributes`] child of that image.
fn attach_image_attributes(document: &mut Document) {
  for image in all_ids(document) {
    if !matches!(document.kind(image), NodeKind::Image { .. }) {
      continue;
    }
    let Some(next) = document.next_sibling(image) else {
      continue;
    };
    let NodeKind::Text { literal } = document.kind_mut(next) else {
      continue;
    };
    let Some((attributes, consumed)) = parse_image_attributes(literal) else {
      continue;
    };
    literal.replace_range(..consumed, "");
    if literal.is_empty() {
      document.detach(next);
    }
    document.append_new(image, NodeKind::ImageAttributes { attributes });
  }
}

/// Parse a leading `{key=value ...}` block. Returns the attributes and the
/// number of bytes consumed, or `None` if any key is unsupported.
fn parse_image_attributes(text: &str) -> Option<(Vec<(String, String)>, usize)> {
  let body = text.strip_prefix('{')?;
  let end = body.find('}')?;
  let mut attributes = Vec::new();
  for pair in body[..end].split_whitespace() {
    let (key, value) = pair.split_once('=')?;
    if !IMAGE_ATTRIBUTE_KEYS.contains(&key) || value.is_empty() {
      return None;
    }
    attributes.push((key.to_string(), value.to_string()));
  }
  if attributes.is_empty() {
    return None;
  }
  Some((attributes, end + 2))
}

/// Turn list items starting with `[ ]` or `[x]` into task items by
/// prepending a [`NodeKind::TaskListMarker`].
fn mark_task_items(document: &mut Document) {
  for item in all_ids(document) {
    if !matches!(document.kind(item), NodeKind::ListItem) {
      continue;
    }
    let Some(paragraph) = document.first_child(item) else {
      continue;
    };
    if !matches!(document.kind(paragraph), NodeKind::Paragraph) {
      continue;
    }
    let Some(text) = document.first_child(paragraph) else {
      continue;
    };
    let NodeKind::Text { literal } = document.kind_mut(text) else {
      continue;
    };
    let Some(captures) = TASK_MARKER_RE.captures(literal) else {
      continue;
    };
    let checked = captures[1].eq_ignore_ascii_case("x");
    let consumed = captures[0].len();

    literal.replace_range(..consumed, "");
    if literal.is_empty() {
      document.detach(text);
    }
    let marker = document.alloc(NodeKind::TaskListMarker { checked });
    document.prepend_child(item, marker);
  }
}
