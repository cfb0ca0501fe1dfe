//! Conversion of comrak's arena AST into a [`Document`].
use std::collections::HashMap;

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use log::trace;

use super::front_matter;
use crate::ast::{Alignment, Document, NodeId, NodeKind};

/// How a single comrak node maps onto our tree.
enum Mapped {
  /// One node of the given kind; its children are converted beneath it.
  Node(NodeKind),
  /// Text, merged into a preceding text sibling.
  Text(String),
  /// A table with per-column alignments.
  Table(Vec<Option<Alignment>>),
  /// Raw front matter, parsed into entries.
  FrontMatter(String),
  /// No counterpart: children are hoisted into the parent.
  Flatten,
}

/// Convert the comrak tree rooted at `root` and number its footnotes.
///
/// The walk keeps its own stack of `(comrak node, parent)` pairs, so deeply
/// nested input does not grow the call stack. Siblings are popped in order
/// and each subtree is finished before the next sibling, so every append
/// lands after the previous sibling's subtree.
pub(super) fn convert<'a>(root: &'a AstNode<'a>) -> Document {
  let mut document = Document::new();
  let mut stack = Vec::new();
  push_children(&mut stack, root, Document::ROOT);

  while let Some((node, parent)) = stack.pop() {
    let mapped = map_value(&node.data.borrow().value);
    match mapped {
      Mapped::Node(kind) => {
        let id = document.append_new(parent, kind);
        push_children(&mut stack, node, id);
      },
      Mapped::Text(literal) => push_text(&mut document, parent, &literal),
      Mapped::Table(alignments) => {
        let cells = convert_table(node, &mut document, parent, &alignments);
        stack.extend(cells.into_iter().rev());
      },
      Mapped::FrontMatter(raw) => {
        let block = document.append_new(parent, NodeKind::FrontMatterBlock);
        for (key, values) in front_matter::parse_entries(&raw) {
          document.append_new(block, NodeKind::FrontMatterEntry { key, values });
        }
      },
      Mapped::Flatten => {
        trace!("Flattening unsupported node into its parent");
        push_children(&mut stack, node, parent);
      },
    }
  }

  number_footnotes(&mut document);
  document
}

/// Queue the children of `node` for conversion under `parent`, first child
/// on top.
fn push_children<'a>(
  stack: &mut Vec<(&'a AstNode<'a>, NodeId)>,
  node: &'a AstNode<'a>,
  parent: NodeId,
) {
  let first = stack.len();
  stack.extend(node.children().map(|child| (child, parent)));
  stack[first..].reverse();
}

fn map_value(value: &NodeValue) -> Mapped {
  let kind = match value {
    NodeValue::FrontMatter(raw) => return Mapped::FrontMatter(raw.clone()),
    NodeValue::Text(text) => return Mapped::Text(text.to_string()),
    NodeValue::Table(table) => {
      let alignments = table
        .alignments
        .iter()
        .map(|alignment| {
          match alignment {
            TableAlignment::Left => Some(Alignment::Left),
            TableAlignment::Center => Some(Alignment::Center),
            TableAlignment::Right => Some(Alignment::Right),
            TableAlignment::None => None,
          }
        })
        .collect();
      return Mapped::Table(alignments);
    },

    NodeValue::BlockQuote => NodeKind::BlockQuote,
    NodeValue::List(list) => {
      match list.list_type {
        ListType::Bullet => {
          NodeKind::BulletList {
            tight:  list.tight,
            marker: char::from(list.bullet_char),
          }
        },
        ListType::Ordered => {
          NodeKind::OrderedList {
            tight:     list.tight,
            start:     list.start,
            delimiter: match list.delimiter {
              ListDelimType::Period => '.',
              ListDelimType::Paren => ')',
            },
          }
        },
      }
    },
    NodeValue::Item(_) | NodeValue::TaskItem(..) => NodeKind::ListItem,
    NodeValue::CodeBlock(block) => {
      if block.fenced {
        NodeKind::FencedCodeBlock {
          info:         block.info.clone(),
          literal:      block.literal.clone(),
          fence_char:   char::from(block.fence_char),
          fence_length: block.fence_length,
        }
      } else {
        NodeKind::IndentedCodeBlock {
          literal: block.literal.clone(),
        }
      }
    },
    NodeValue::HtmlBlock(html) => {
      NodeKind::HtmlBlock {
        literal: html.literal.clone(),
      }
    },
    NodeValue::Paragraph => NodeKind::Paragraph,
    NodeValue::Heading(heading) => NodeKind::Heading {
      level: heading.level,
    },
    NodeValue::ThematicBreak => NodeKind::ThematicBreak,
    NodeValue::FootnoteDefinition(definition) => {
      NodeKind::FootnoteDefinition {
        label:      definition.name.clone(),
        number:     0,
        references: 0,
      }
    },

    NodeValue::SoftBreak => NodeKind::SoftLineBreak,
    NodeValue::LineBreak => NodeKind::HardLineBreak,
    NodeValue::Code(code) => {
      NodeKind::Code {
        literal: code.literal.clone(),
      }
    },
    NodeValue::HtmlInline(html) => {
      NodeKind::HtmlInline {
        literal: html.to_string(),
      }
    },
    NodeValue::Emph => NodeKind::Emphasis,
    NodeValue::Strong => NodeKind::StrongEmphasis,
    NodeValue::Strikethrough => NodeKind::Strikethrough,
    NodeValue::Link(link) => {
      NodeKind::Link {
        destination: link.url.clone(),
        title:       non_empty(&link.title),
      }
    },
    NodeValue::Image(link) => {
      NodeKind::Image {
        destination: link.url.clone(),
        title:       non_empty(&link.title),
      }
    },
    NodeValue::FootnoteReference(reference) => {
      NodeKind::FootnoteReference {
        label:      reference.name.clone(),
        number:     0,
        occurrence: 0,
      }
    },

    _ => return Mapped::Flatten,
  };
  Mapped::Node(kind)
}

fn non_empty(title: &str) -> Option<String> {
  (!title.is_empty()).then(|| title.to_string())
}

/// Append text under `parent`, extending the last child when it already is
/// text. Comrak splits text at every delimiter candidate, which would
/// otherwise leave runs of adjacent text nodes.
fn push_text(document: &mut Document, parent: NodeId, literal: &str) {
  if let Some(last) = document.last_child(parent)
    && let NodeKind::Text { literal: existing } = document.kind_mut(last)
  {
    existing.push_str(literal);
    return;
  }
  document.append_new(parent, NodeKind::Text {
    literal: literal.to_string(),
  });
}

/// Tables become `TableBlock > TableHead? TableBody?`, with header rows
/// under the head and the remaining rows under the body.
///
/// Returns each comrak cell with the id of its new `TableCell`, in document
/// order, for the cell contents to be converted beneath.
fn convert_table<'a>(
  node: &'a AstNode<'a>,
  document: &mut Document,
  parent: NodeId,
  alignments: &[Option<Alignment>],
) -> Vec<(&'a AstNode<'a>, NodeId)> {
  let table = document.append_new(parent, NodeKind::TableBlock);
  let mut head = None;
  let mut body = None;
  let mut cells = Vec::new();

  for row in node.children() {
    let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
    let section = if header {
      *head.get_or_insert_with(|| document.append_new(table, NodeKind::TableHead))
    } else {
      *body.get_or_insert_with(|| document.append_new(table, NodeKind::TableBody))
    };
    let row_id = document.append_new(section, NodeKind::TableRow);

    for (column, cell) in row.children().enumerate() {
      let alignment = alignments.get(column).copied().flatten();
      let cell_id =
        document.append_new(row_id, NodeKind::TableCell { header, alignment });
      cells.push((cell, cell_id));
    }
  }
  cells
}

/// Number footnote definitions in order of first reference and give every
/// reference its occurrence index.
///
/// Definitions nobody references are dropped. The remaining definitions are
/// moved to the end of the document, sorted by number.
fn number_footnotes(document: &mut Document) {
  let ids: Vec<NodeId> = document
    .root()
    .descendants()
    .map(|node| node.id())
    .collect();

  // label -> (number, reference count)
  let mut numbers: HashMap<String, (usize, usize)> = HashMap::new();
  let mut definitions = Vec::new();

  for id in ids {
    match document.kind_mut(id) {
      NodeKind::FootnoteReference {
        label,
        number,
        occurrence,
      } => {
        let next = numbers.len() + 1;
        let entry = numbers.entry(label.to_lowercase()).or_insert((next, 0));
        entry.1 += 1;
        *number = entry.0;
        *occurrence = entry.1;
      },
      NodeKind::FootnoteDefinition { .. } => definitions.push(id),
      _ => {},
    }
  }

  let mut numbered = Vec::new();
  for id in definitions {
    if let NodeKind::FootnoteDefinition {
      label,
      number,
      references,
    } = document.kind_mut(id)
    {
      if let Some((assigned, count)) = numbers.get(&label.to_lowercase()) {
        *number = *assigned;
        *references = *count;
        numbered.push((*assigned, id));
      } else {
        trace!("Dropping unreferenced footnote definition '{label}'");
      }
    }
    document.detach(id);
  }

  numbered.sort_by_key(|(number, _)| *number);
  for (_, id) in numbered {
    document.append_child(Document::ROOT, id);
  }
}

#[cfg(test)]
mod tests {
  use comrak::{Arena, Options, parse_document};

  use super::*;
  use crate::ast::NodeType;

  fn convert_with(text: &str, configure: impl FnOnce(&mut Options<'_>)) -> Document {
    let arena = Arena::new();
    let mut options = Options::default();
    configure(&mut options);
    let root = parse_document(&arena, text, &options);
    convert(root)
  }

  #[test]
  fn test_adjacent_text_is_merged() {
    let document = convert_with("a [b c_ d", |_| {});
    let paragraph = document.root().first_child().expect("paragraph");
    assert_eq!(paragraph.children().count(), 1);
    assert_eq!(paragraph.text_content(), "a [b c_ d");
  }

  #[test]
  fn test_table_sections_and_alignment() {
    let document = convert_with("| a | b |\n|:--|--:|\n| 1 | 2 |\n", |options| {
      options.extension.table = true;
    });
    let table = document.root().first_child().expect("table");
    assert_eq!(table.node_type(), NodeType::TableBlock);
    let sections: Vec<_> = table.children().map(|node| node.node_type()).collect();
    assert_eq!(sections, vec![NodeType::TableHead, NodeType::TableBody]);

    let cells: Vec<_> = table
      .descendants()
      .filter(|node| node.node_type() == NodeType::TableCell)
      .map(|node| node.kind().clone())
      .collect();
    assert_eq!(cells[0], NodeKind::TableCell {
      header:    true,
      alignment: Some(Alignment::Left),
    });
    assert_eq!(cells[3], NodeKind::TableCell {
      header:    false,
      alignment: Some(Alignment::Right),
    });
  }

  #[test]
  fn test_empty_link_title_is_none() {
    let document = convert_with("[x](/a) [y](/b \"t\")", |_| {});
    let links: Vec<_> = document
      .root()
      .descendants()
      .filter_map(|node| {
        match node.kind() {
          NodeKind::Link { title, .. } => Some(title.clone()),
          _ => None,
        }
      })
      .collect();
    assert_eq!(links, vec![None, Some("t".to_string())]);
  }

  #[test]
  fn test_footnotes_numbered_by_first_reference() {
    let text = "A[^b] B[^a] C[^b]\n\n[^a]: first\n[^b]: second\n[^c]: unused\n";
    let document = convert_with(text, |options| options.extension.footnotes = true);

    let references: Vec<_> = document
      .root()
      .descendants()
      .filter_map(|node| {
        match node.kind() {
          NodeKind::FootnoteReference {
            number, occurrence, ..
          } => Some((*number, *occurrence)),
          _ => None,
        }
      })
      .collect();
    assert_eq!(references, vec![(1, 1), (2, 1), (1, 2)]);

    let definitions: Vec<_> = document
      .root()
      .children()
      .filter_map(|node| {
        match node.kind() {
          NodeKind::FootnoteDefinition {
            label,
            number,
            references,
          } => Some((label.clone(), *number, *references)),
          _ => None,
        }
      })
      .collect();
    assert_eq!(definitions, vec![
      ("b".to_string(), 1, 2),
      ("a".to_string(), 2, 1),
    ]);
  }
}
