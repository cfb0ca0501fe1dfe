//! Built-in HTML for extension node types: tables, task list markers and
//! footnotes.
use super::{AttributeSet, HtmlRenderer};
use crate::{
  ast::{NodeKind, NodeRef},
  error::Result,
};

const BACKREF_ARROW: &str = "\u{21a9}";

/// `table`, `thead`, `tbody`, `tr` and the cells: each on its own line.
pub(super) fn enter_table<'r>(r: &mut HtmlRenderer<'r>, node: NodeRef<'r>) -> Result<()> {
  let mut base = AttributeSet::new();
  if let NodeKind::TableCell {
    alignment: Some(alignment),
    ..
  } = node.kind()
  {
    base.insert("align", alignment.as_str());
  }
  r.html.line();
  r.open_with(node, table_tag(node), base)?;
  Ok(())
}

pub(super) fn exit_table(r: &mut HtmlRenderer<'_>, node: NodeRef<'_>) {
  r.html.close_tag(table_tag(node));
  r.html.line();
}

fn table_tag(node: NodeRef<'_>) -> &'static str {
  match node.kind() {
    NodeKind::TableHead => "thead",
    NodeKind::TableBody => "tbody",
    NodeKind::TableRow => "tr",
    NodeKind::TableCell { header: true, .. } => "th",
    NodeKind::TableCell { .. } => "td",
    _ => "table",
  }
}

pub(super) fn render_task_list_marker<'r>(
  r: &mut HtmlRenderer<'r>,
  node: NodeRef<'r>,
  checked: bool,
) -> Result<()> {
  let mut base = AttributeSet::new()
    .with("type", "checkbox")
    .with("disabled", "");
  if checked {
    base.insert("checked", "");
  }
  r.open_with(node, "input", base)?;
  // The marker text, including its trailing whitespace, was cut from the
  // item's first paragraph.
  r.html.text(" ");
  Ok(())
}

fn definition_id(label: &str) -> String {
  format!("fn-{label}")
}

fn reference_id(label: &str, occurrence: usize) -> String {
  if occurrence > 1 {
    format!("fnref-{label}-{occurrence}")
  } else {
    format!("fnref-{label}")
  }
}

pub(super) fn render_footnote_reference<'r>(
  r: &mut HtmlRenderer<'r>,
  node: NodeRef<'r>,
  label: &str,
  number: usize,
  occurrence: usize,
) -> Result<()> {
  r.open_with(node, "sup", AttributeSet::new().with("class", "footnote-ref"))?;
  let link = AttributeSet::new()
    .with("href", format!("#{}", definition_id(label)))
    .with("id", reference_id(label, occurrence))
    .with("data-footnote-ref", "");
  r.open_with(node, "a", link)?;
  r.html.raw(&number.to_string());
  r.html.close_tag("a");
  r.html.close_tag("sup");
  Ok(())
}

/// The `<section>` holding every referenced definition, in number order.
pub(super) fn render_footnote_section<'r>(
  r: &mut HtmlRenderer<'r>,
  document: NodeRef<'r>,
  definitions: &[NodeRef<'r>],
) -> Result<()> {
  let section = AttributeSet::new()
    .with("class", "footnotes")
    .with("data-footnotes", "");
  r.html.line();
  r.open_with(document, "section", section)?;
  r.html.line();
  r.open(document, "ol")?;
  r.html.line();
  for definition in definitions {
    r.render(*definition)?;
  }
  r.html.line();
  r.html.close_tag("ol");
  r.html.line();
  r.html.close_tag("section");
  r.html.line();
  Ok(())
}

/// One `<li>` of the footnote section. When the definition ends in a
/// paragraph, that paragraph carries the back-references; otherwise they
/// follow the content.
pub(super) fn enter_footnote_definition<'r>(
  r: &mut HtmlRenderer<'r>,
  node: NodeRef<'r>,
  label: &str,
) -> Result<()> {
  r.html.line();
  r.open_with(node, "li", AttributeSet::new().with("id", definition_id(label)))?;
  r.html.line();
  Ok(())
}

pub(super) fn exit_footnote_definition<'r>(
  r: &mut HtmlRenderer<'r>,
  node: NodeRef<'r>,
) -> Result<()> {
  let ends_in_paragraph = node
    .last_child()
    .is_some_and(|child| matches!(child.kind(), NodeKind::Paragraph));
  if !ends_in_paragraph {
    r.html.line();
    render_footnote_backrefs(r, node)?;
  }

  r.html.line();
  r.html.close_tag("li");
  r.html.line();
  Ok(())
}

/// Links from a definition back to each of its references.
pub(super) fn render_footnote_backrefs<'r>(
  r: &mut HtmlRenderer<'r>,
  definition: NodeRef<'r>,
) -> Result<()> {
  let NodeKind::FootnoteDefinition {
    label,
    number,
    references,
  } = definition.kind()
  else {
    return Ok(());
  };

  for occurrence in 1..=*references {
    let index = if occurrence > 1 {
      format!("{number}-{occurrence}")
    } else {
      number.to_string()
    };
    let link = AttributeSet::new()
      .with("href", format!("#{}", reference_id(label, occurrence)))
      .with("class", "footnote-backref")
      .with("data-footnote-backref", "")
      .with("data-footnote-backref-idx", index.as_str())
      .with("aria-label", format!("Back to reference {index}"));
    r.open_with(definition, "a", link)?;
    if occurrence > 1 {
      r.open_with(definition, "sup", AttributeSet::new().with("class", "footnote-ref"))?;
      r.html.raw(&occurrence.to_string());
      r.html.close_tag("sup");
    }
    r.html.raw(BACKREF_ARROW);
    r.html.close_tag("a");
    if occurrence < *references {
      r.html.raw(" ");
    }
  }
  Ok(())
}
