//! The rendering pipeline and its builder.
//!
//! A [`Markdown`] collects extension flags, low-level options, visitors,
//! attribute rules and render rules. [`Markdown::render`] then runs
//! parse → visit → extract metadata → render and returns a [`Rendered`].
//!
//! # Examples
//!
//! ```
//! use soloscribe_markdown::{NodeType, render_markdown};
//!
//! let rendered = render_markdown("# Hello", |md| {
//!   md.attributes(NodeType::Heading, |attrs| {
//!     attrs.insert("class", "my-text");
//!     Ok(())
//!   });
//! })
//! .expect("rules do not fail");
//!
//! assert_eq!(rendered.html.trim(), r#"<h1 class="my-text">Hello</h1>"#);
//! ```
use log::{debug, trace};

use crate::{
  ast::{Document, NodeRef, NodeType, NodeTypeSet},
  config::{Config, ParserOptions, RendererOptions},
  error::{CallbackResult, Result},
  metadata,
  parser,
  render::{self, CustomAttributes, CustomRenderer, RuleSet},
  types::Rendered,
  visitor::{self, Visitor},
};

/// Render `text` with a pipeline set up by `configure`.
///
/// # Errors
///
/// Returns the first error raised by a visitor, attribute rule or render
/// rule registered in `configure`.
pub fn render_markdown<'a>(
  text: &str,
  configure: impl FnOnce(&mut Markdown<'a>),
) -> Result<Rendered> {
  let mut markdown = Markdown::new();
  configure(&mut markdown);
  markdown.render(text)
}

/// Builder and runner of the Markdown → HTML pipeline.
///
/// Rules and visitors may borrow from the caller for `'a`. Everything is
/// registered through `&mut self` before [`render`](Self::render), which
/// holds the builder for the whole call, so nothing can be registered
/// while a render is running.
#[derive(Default)]
pub struct Markdown<'a> {
  config:   Config,
  parser:   ParserOptions,
  renderer: RendererOptions,
  visitors: Vec<Box<dyn Visitor + 'a>>,
  rules:    RuleSet<'a>,
}

/// Typed shorthands for [`Markdown::render_rule`].
macro_rules! render_rule_shorthands {
  ($lt:lifetime; $($(#[$doc:meta])* $method:ident => $types:expr;)*) => {
    $(
      $(#[$doc])*
      pub fn $method(
        &mut self,
        rule: impl Fn(&mut CustomRenderer<'_, '_>) -> CallbackResult + $lt,
      ) -> &mut Self {
        self.render_rule($types, rule)
      }
    )*
  };
}

impl<'a> Markdown<'a> {
  /// A pipeline with every extension disabled and no rules.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable extensions.
  pub fn config(&mut self, configure: impl FnOnce(&mut Config)) -> &mut Self {
    configure(&mut self.config);
    self
  }

  /// Adjust the low-level parser options.
  pub fn parser(&mut self, configure: impl FnOnce(&mut ParserOptions)) -> &mut Self {
    configure(&mut self.parser);
    self
  }

  /// Adjust the low-level renderer options.
  pub fn renderer(
    &mut self,
    configure: impl FnOnce(&mut RendererOptions),
  ) -> &mut Self {
    configure(&mut self.renderer);
    self
  }

  /// Add a visitor. Visitors run in the order they are added.
  pub fn visitor(&mut self, visitor: impl Visitor + 'a) -> &mut Self {
    self.visitors.push(Box::new(visitor));
    trace!("Registered visitor #{}", self.visitors.len() - 1);
    self
  }

  /// Add a closure visitor.
  pub fn visit(
    &mut self,
    visit: impl FnMut(NodeRef<'_>) -> CallbackResult + 'a,
  ) -> &mut Self {
    self.visitor(visit)
  }

  /// Add an attribute rule for nodes of the given types.
  ///
  /// Every rule matching a node runs, in registration order, on the same
  /// attribute set. Built-in decorations such as heading anchors have
  /// already been applied when the first rule runs.
  pub fn attributes(
    &mut self,
    types: impl Into<NodeTypeSet>,
    rule: impl Fn(&mut CustomAttributes<'_, '_>) -> CallbackResult + 'a,
  ) -> &mut Self {
    let types = types.into();
    trace!("Registered attribute rule for {types:?}");
    self.rules.add_attribute_rule(types, Box::new(rule));
    self
  }

  /// Replace the HTML of nodes of the given types.
  ///
  /// For each type, the rule registered last wins. A rule is responsible
  /// for the node's whole output: children are only rendered if it calls
  /// [`CustomRenderer::render_children`].
  pub fn render_rule(
    &mut self,
    types: impl Into<NodeTypeSet>,
    rule: impl Fn(&mut CustomRenderer<'_, '_>) -> CallbackResult + 'a,
  ) -> &mut Self {
    let types = types.into();
    trace!("Registered render rule for {types:?}");
    self.rules.add_render_rule(types, Box::new(rule));
    self
  }

  render_rule_shorthands! { 'a;
    /// Render rule for every block node, the document included.
    block => NodeTypeSet::blocks();
    /// Render rule for every inline node.
    inline => NodeTypeSet::inlines();
    document => NodeType::Document;
    heading => NodeType::Heading;
    paragraph => NodeType::Paragraph;
    block_quote => NodeType::BlockQuote;
    /// Render rule for both bullet and ordered lists.
    list_block => NodeTypeSet::lists();
    bullet_list => NodeType::BulletList;
    ordered_list => NodeType::OrderedList;
    list_item => NodeType::ListItem;
    /// Render rule for both fenced and indented code blocks.
    code_block => NodeTypeSet::code_blocks();
    fenced_code_block => NodeType::FencedCodeBlock;
    indented_code_block => NodeType::IndentedCodeBlock;
    thematic_break => NodeType::ThematicBreak;
    html_block => NodeType::HtmlBlock;
    text => NodeType::Text;
    emphasis => NodeType::Emphasis;
    strong_emphasis => NodeType::StrongEmphasis;
    code => NodeType::Code;
    link => NodeType::Link;
    image => NodeType::Image;
    hard_line_break => NodeType::HardLineBreak;
    soft_line_break => NodeType::SoftLineBreak;
    html_inline => NodeType::HtmlInline;
    /// Render rule for `~~strikethrough~~` (strikethrough extension).
    strikethrough => NodeType::Strikethrough;
    /// Render rule for `++inserted++` text (ins extension).
    ins => NodeType::Ins;
    /// Render rule for `<table>` (tables extension).
    table_block => NodeType::TableBlock;
    table_head => NodeType::TableHead;
    table_body => NodeType::TableBody;
    table_row => NodeType::TableRow;
    table_cell => NodeType::TableCell;
    /// Render rule for `[^label]` (footnotes extension).
    footnote_reference => NodeType::FootnoteReference;
    footnote_definition => NodeType::FootnoteDefinition;
    /// Render rule for the front matter container (YAML front matter
    /// extension). Renders nothing by default.
    front_matter_block => NodeType::FrontMatterBlock;
    front_matter_entry => NodeType::FrontMatterEntry;
    /// Render rule for `{width=.. height=..}` blocks (image attributes
    /// extension). Renders nothing by default.
    image_attributes => NodeType::ImageAttributes;
    /// Render rule for `[ ]` / `[x]` markers (task list extension).
    task_list_marker => NodeType::TaskListMarker;
  }

  /// Parse `text` with the configured extensions, without visiting or
  /// rendering.
  #[must_use]
  pub fn parse(&self, text: &str) -> Document {
    parser::parse(text, &self.config.extensions(), &self.parser)
  }

  /// Run the pipeline on `text`.
  ///
  /// # Errors
  ///
  /// Returns the first error raised by a visitor, attribute rule or render
  /// rule. Nothing is returned in that case.
  pub fn render(&mut self, text: &str) -> Result<Rendered> {
    let extensions = self.config.extensions();
    debug!(
      "Rendering with extensions {extensions:?}, {} visitors, {} attribute rules, {} render rules",
      self.visitors.len(),
      self.rules.attribute_rule_count(),
      self.rules.render_rule_count()
    );

    let document = parser::parse(text, &extensions, &self.parser);
    visitor::run_visitors(&document, &mut self.visitors)?;
    let metadata = self
      .config
      .enable_yaml_front_matter
      .then(|| metadata::extract_metadata(&document));
    let html = render::render_document(&document, &extensions, &self.renderer, &self.rules)?;

    Ok(Rendered { html, metadata })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_metadata_follows_front_matter_flag() {
    let text = "---\ntitle: Hi\n---\n\nBody\n";
    let disabled = Markdown::new().render(text).expect("render");
    assert_eq!(disabled.metadata, None);

    let enabled = Markdown::new()
      .config(|config| config.enable_yaml_front_matter = true)
      .render(text)
      .expect("render");
    assert_eq!(enabled.get("title"), Some(&["Hi".to_string()][..]));
    assert_eq!(enabled.html, "<p>Body</p>\n");
  }

  #[test]
  fn test_shorthand_targets_its_type() {
    let rendered = render_markdown("*a* b", |md| {
      md.emphasis(|ctx| {
        ctx.html().raw("[");
        ctx.render_children()?;
        ctx.html().raw("]");
        Ok(())
      });
    })
    .expect("render");
    assert_eq!(rendered.html, "<p>[a] b</p>\n");
  }

  #[test]
  fn test_markdown_is_reusable() {
    let mut markdown = Markdown::new();
    markdown.config(|config| {
      config.enable_all_extensions();
    });
    let first = markdown.render("# Same\n\ntext[^1]\n\n[^1]: note").expect("render");
    let second = markdown.render("# Same\n\ntext[^1]\n\n[^1]: note").expect("render");
    assert_eq!(first, second);
  }
}
