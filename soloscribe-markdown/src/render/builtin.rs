//! Built-in HTML for CommonMark node types.
//!
//! Output follows the CommonMark reference renderer: block tags start on a
//! fresh line and are followed by a newline, inline tags are written in
//! place.
//!
//! Every rule is split in two. [`enter`] writes everything up to the
//! children and says whether the walk should descend; [`exit`] writes what
//! follows the children. The renderer drives both from its own stack.
use super::{AttributeSet, HtmlRenderer, extensions};
use crate::{
  ast::{NodeKind, NodeRef, NodeType},
  error::Result,
};

/// What the walk does after [`enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Walk {
  /// Render the children, then call [`exit`].
  Children,
  /// The node is fully rendered.
  Done,
}

/// Footnote definitions at the top level are rendered by the document's
/// [`exit`], inside the footnote section.
pub(super) fn is_deferred(node: NodeRef<'_>) -> bool {
  node.node_type() == NodeType::FootnoteDefinition
    && node
      .parent()
      .is_some_and(|parent| parent.node_type() == NodeType::Document)
}

pub(super) fn enter<'r>(r: &mut HtmlRenderer<'r>, node: NodeRef<'r>) -> Result<Walk> {
  match node.kind() {
    NodeKind::Document => {},

    NodeKind::Heading { level } => {
      r.html.line();
      r.open(node, &format!("h{level}"))?;
    },
    NodeKind::Paragraph => {
      if !omits_p(r, node) {
        r.html.line();
        r.open(node, "p")?;
      }
    },
    NodeKind::BlockQuote => enter_block(r, node, "blockquote", AttributeSet::new())?,
    NodeKind::BulletList { .. } => enter_block(r, node, "ul", AttributeSet::new())?,
    NodeKind::OrderedList { start, .. } => {
      let mut base = AttributeSet::new();
      if *start != 1 {
        base.insert("start", start.to_string());
      }
      enter_block(r, node, "ol", base)?;
    },
    NodeKind::ListItem => r.open(node, "li")?,
    NodeKind::FencedCodeBlock { info, literal, .. } => {
      let mut base = AttributeSet::new();
      if let Some(language) = info.split_whitespace().next() {
        base.insert("class", format!("language-{language}"));
      }
      render_code_block(r, node, literal, base)?;
      return Ok(Walk::Done);
    },
    NodeKind::IndentedCodeBlock { literal } => {
      render_code_block(r, node, literal, AttributeSet::new())?;
      return Ok(Walk::Done);
    },
    NodeKind::ThematicBreak => {
      r.html.line();
      r.void_with(node, "hr", AttributeSet::new())?;
      r.html.line();
      return Ok(Walk::Done);
    },
    NodeKind::HtmlBlock { literal } => {
      r.html.line();
      if r.options.escape_html {
        r.open(node, "p")?;
        r.html.text(literal);
        r.html.close_tag("p");
      } else {
        r.html.raw(literal);
      }
      r.html.line();
      return Ok(Walk::Done);
    },

    NodeKind::Text { literal } => {
      r.html.text(literal);
      return Ok(Walk::Done);
    },
    NodeKind::Emphasis => r.open(node, "em")?,
    NodeKind::StrongEmphasis => r.open(node, "strong")?,
    NodeKind::Code { literal } => {
      r.open(node, "code")?;
      r.html.text(literal);
      r.html.close_tag("code");
      return Ok(Walk::Done);
    },
    NodeKind::Link { destination, title } => {
      let mut base = AttributeSet::new();
      if r.options.sanitize_urls {
        base.insert("rel", "nofollow");
      }
      base.insert("href", r.prepare_url(destination));
      if let Some(title) = title {
        base.insert("title", title.as_str());
      }
      r.open_with(node, "a", base)?;
    },
    NodeKind::Image { destination, title } => {
      let mut base = AttributeSet::new()
        .with("src", r.prepare_url(destination))
        .with("alt", node.text_content());
      if let Some(title) = title {
        base.insert("title", title.as_str());
      }
      r.void_with(node, "img", base)?;
      return Ok(Walk::Done);
    },
    NodeKind::HtmlInline { literal } => {
      if r.options.escape_html {
        r.html.text(literal);
      } else {
        r.html.raw(literal);
      }
      return Ok(Walk::Done);
    },
    NodeKind::SoftLineBreak => {
      r.html.raw(&r.options.softbreak);
      return Ok(Walk::Done);
    },
    NodeKind::HardLineBreak => {
      r.void_with(node, "br", AttributeSet::new())?;
      r.html.line();
      return Ok(Walk::Done);
    },

    NodeKind::Strikethrough => r.open(node, "del")?,
    NodeKind::Ins => r.open(node, "ins")?,
    NodeKind::TableBlock
    | NodeKind::TableHead
    | NodeKind::TableBody
    | NodeKind::TableRow
    | NodeKind::TableCell { .. } => extensions::enter_table(r, node)?,
    NodeKind::TaskListMarker { checked } => {
      extensions::render_task_list_marker(r, node, *checked)?;
      return Ok(Walk::Done);
    },
    NodeKind::FootnoteReference {
      label,
      number,
      occurrence,
    } => {
      extensions::render_footnote_reference(r, node, label, *number, *occurrence)?;
      return Ok(Walk::Done);
    },
    NodeKind::FootnoteDefinition { label, .. } => {
      extensions::enter_footnote_definition(r, node, label)?;
    },

    // Front matter only feeds metadata; image attributes only feed the
    // image's `<img>` attributes.
    NodeKind::FrontMatterBlock
    | NodeKind::FrontMatterEntry { .. }
    | NodeKind::ImageAttributes { .. } => return Ok(Walk::Done),
  }
  Ok(Walk::Children)
}

pub(super) fn exit<'r>(r: &mut HtmlRenderer<'r>, node: NodeRef<'r>) -> Result<()> {
  match node.kind() {
    NodeKind::Document => {
      let definitions: Vec<_> = node.children().filter(|child| is_deferred(*child)).collect();
      if !definitions.is_empty() {
        extensions::render_footnote_section(r, node, &definitions)?;
      }
    },
    NodeKind::Heading { level } => {
      r.html.close_tag(&format!("h{level}"));
      r.html.line();
    },
    NodeKind::Paragraph => exit_paragraph(r, node)?,
    NodeKind::BlockQuote => exit_block(r, "blockquote"),
    NodeKind::BulletList { .. } => exit_block(r, "ul"),
    NodeKind::OrderedList { .. } => exit_block(r, "ol"),
    NodeKind::ListItem => {
      r.html.close_tag("li");
      r.html.line();
    },
    NodeKind::Emphasis => r.html.close_tag("em"),
    NodeKind::StrongEmphasis => r.html.close_tag("strong"),
    NodeKind::Link { .. } => r.html.close_tag("a"),
    NodeKind::Strikethrough => r.html.close_tag("del"),
    NodeKind::Ins => r.html.close_tag("ins"),
    NodeKind::TableBlock
    | NodeKind::TableHead
    | NodeKind::TableBody
    | NodeKind::TableRow
    | NodeKind::TableCell { .. } => extensions::exit_table(r, node),
    NodeKind::FootnoteDefinition { .. } => extensions::exit_footnote_definition(r, node)?,
    _ => {},
  }
  Ok(())
}

fn exit_paragraph<'r>(r: &mut HtmlRenderer<'r>, node: NodeRef<'r>) -> Result<()> {
  if let Some(definition) = node.parent()
    && definition.node_type() == NodeType::FootnoteDefinition
    && node.next_sibling().is_none()
  {
    r.html.raw(" ");
    extensions::render_footnote_backrefs(r, definition)?;
  }

  if !omits_p(r, node) {
    r.html.close_tag("p");
    r.html.line();
  }
  Ok(())
}

fn omits_p(r: &HtmlRenderer<'_>, paragraph: NodeRef<'_>) -> bool {
  in_tight_list(paragraph)
    || (r.options.omit_single_paragraph_p && is_lone_top_level(paragraph))
}

fn in_tight_list(paragraph: NodeRef<'_>) -> bool {
  paragraph
    .parent()
    .and_then(|item| item.parent())
    .is_some_and(|list| {
      matches!(
        list.kind(),
        NodeKind::BulletList { tight: true, .. } | NodeKind::OrderedList { tight: true, .. }
      )
    })
}

fn is_lone_top_level(paragraph: NodeRef<'_>) -> bool {
  paragraph
    .parent()
    .is_some_and(|parent| parent.node_type() == NodeType::Document)
    && paragraph.previous_sibling().is_none()
    && paragraph.next_sibling().is_none()
}

/// Container block: the open and close tags each sit on their own line.
fn enter_block<'r>(
  r: &mut HtmlRenderer<'r>,
  node: NodeRef<'r>,
  tag: &str,
  base: AttributeSet,
) -> Result<()> {
  r.html.line();
  r.open_with(node, tag, base)?;
  r.html.line();
  Ok(())
}

fn exit_block(r: &mut HtmlRenderer<'_>, tag: &str) {
  r.html.line();
  r.html.close_tag(tag);
  r.html.line();
}

fn render_code_block<'r>(
  r: &mut HtmlRenderer<'r>,
  node: NodeRef<'r>,
  literal: &str,
  code_attributes: AttributeSet,
) -> Result<()> {
  r.html.line();
  r.open(node, "pre")?;
  r.open_with(node, "code", code_attributes)?;
  r.html.text(literal);
  r.html.close_tag("code");
  r.html.close_tag("pre");
  r.html.line();
  Ok(())
}
