//! Renderer stage: one streaming pre-order pass over a [`Document`].
//!
//! For every node the renderer first consults the caller's dispatch table.
//! A hit hands the node to the caller's rule; otherwise the built-in rule
//! for the node type runs. Built-in rules route every opening tag through
//! the attribute decoration stage.
mod attributes;
mod builtin;
mod dispatch;
mod extensions;
mod writer;

use std::collections::HashMap;

pub use attributes::{AttributeSet, CustomAttributes};
pub use dispatch::CustomRenderer;
pub use writer::HtmlWriter;

use self::{
  attributes::{AttributeFn, AttributeRule},
  builtin::Walk,
  dispatch::{DispatchTable, RenderFn},
};
use crate::{
  ast::{Document, NodeId, NodeKind, NodeRef, NodeType, NodeTypeSet},
  config::{Extension, RendererOptions},
  error::{Error, Result},
  utils::{self, AnchorIds},
};

/// Caller attribute and render rules, in registration order.
#[derive(Default)]
pub(crate) struct RuleSet<'a> {
  attribute_rules: Vec<AttributeRule<'a>>,
  render_rules:    Vec<Box<RenderFn<'a>>>,
  dispatch:        DispatchTable,
}

impl<'a> RuleSet<'a> {
  pub(crate) fn add_attribute_rule(
    &mut self,
    types: NodeTypeSet,
    apply: Box<AttributeFn<'a>>,
  ) {
    self.attribute_rules.push(AttributeRule { types, apply });
  }

  pub(crate) fn add_render_rule(&mut self, types: NodeTypeSet, rule: Box<RenderFn<'a>>) {
    let index = self.render_rules.len();
    self.render_rules.push(rule);
    self.dispatch.register(types, index);
  }

  fn render_rule(&self, node_type: NodeType) -> Option<&RenderFn<'a>> {
    self
      .dispatch
      .lookup(node_type)
      .and_then(|index| self.render_rules.get(index))
      .map(Box::as_ref)
  }

  pub(crate) const fn attribute_rule_count(&self) -> usize {
    self.attribute_rules.len()
  }

  pub(crate) const fn render_rule_count(&self) -> usize {
    self.render_rules.len()
  }
}

/// Render `document` to HTML.
///
/// # Errors
///
/// Returns the first error raised by a caller attribute or render rule. No
/// partial output is returned.
pub(crate) fn render_document(
  document: &Document,
  extensions: &[Extension],
  options: &RendererOptions,
  rules: &RuleSet<'_>,
) -> Result<String> {
  let mut renderer = HtmlRenderer::new(rules, options, extensions);
  renderer.render(document.root())?;
  Ok(renderer.html.finish())
}

/// State of one render call.
pub(crate) struct HtmlRenderer<'r> {
  rules:            &'r RuleSet<'r>,
  options:          &'r RendererOptions,
  heading_anchors:  bool,
  image_attributes: bool,
  anchors:          AnchorIds,
  /// Anchor of each heading, generated once however often it is decorated.
  heading_ids:      HashMap<NodeId, String>,
  html:             HtmlWriter,
}

/// One step of the built-in walk.
enum Step<'r> {
  Enter(NodeRef<'r>),
  Exit(NodeRef<'r>),
}

impl<'r> HtmlRenderer<'r> {
  fn new(
    rules: &'r RuleSet<'r>,
    options: &'r RendererOptions,
    extensions: &[Extension],
  ) -> Self {
    Self {
      rules,
      options,
      heading_anchors: extensions.contains(&Extension::HeadingAnchors),
      image_attributes: extensions.contains(&Extension::ImageAttributes),
      anchors: AnchorIds::default(),
      heading_ids: HashMap::new(),
      html: HtmlWriter::new(),
    }
  }

  /// Render `node` and its subtree through dispatch.
  ///
  /// Built-in rules are driven from an explicit stack of enter and exit
  /// steps, so document depth does not grow the call stack. Only a caller
  /// rule that renders children re-enters this method.
  fn render(&mut self, node: NodeRef<'r>) -> Result<()> {
    let rules = self.rules;
    let mut stack = vec![Step::Enter(node)];
    while let Some(step) = stack.pop() {
      let node = match step {
        Step::Enter(node) => node,
        Step::Exit(node) => {
          builtin::exit(self, node)?;
          continue;
        },
      };

      let node_type = node.node_type();
      if let Some(rule) = rules.render_rule(node_type) {
        let mut custom = CustomRenderer::new(node, self);
        rule(&mut custom).map_err(|error| {
          Error::from_callback(error, |source| Error::Render { node_type, source })
        })?;
        continue;
      }

      if builtin::enter(self, node)? == Walk::Children {
        stack.push(Step::Exit(node));
        let first = stack.len();
        stack.extend(
          node
            .children()
            .filter(|child| !builtin::is_deferred(*child))
            .map(Step::Enter),
        );
        stack[first..].reverse();
      }
    }
    Ok(())
  }

  fn render_children(&mut self, node: NodeRef<'r>) -> Result<()> {
    for child in node.children() {
      self.render(child)?;
    }
    Ok(())
  }

  /// Decorate the attributes of `tag` emitted by `node`: built-in
  /// decorations first, then every matching caller rule in registration
  /// order.
  fn attributes(
    &mut self,
    node: NodeRef<'r>,
    tag: &str,
    mut attrs: AttributeSet,
  ) -> Result<AttributeSet> {
    self.decorate_builtin(node, &mut attrs);

    let node_type = node.node_type();
    let rules = self.rules;
    for rule in rules
      .attribute_rules
      .iter()
      .filter(|rule| rule.types.contains(node_type))
    {
      let mut custom = CustomAttributes::new(node, tag, &mut attrs);
      (rule.apply)(&mut custom).map_err(|error| {
        Error::from_callback(error, |source| {
          Error::Attributes {
            node_type,
            tag: tag.to_string(),
            source,
          }
        })
      })?;
    }
    Ok(attrs)
  }

  fn decorate_builtin(&mut self, node: NodeRef<'r>, attrs: &mut AttributeSet) {
    match node.kind() {
      NodeKind::Heading { .. } if self.heading_anchors => {
        let anchors = &mut self.anchors;
        let id = self
          .heading_ids
          .entry(node.id())
          .or_insert_with(|| anchors.generate(&node.text_content()));
        attrs.insert("id", id.as_str());
      },
      NodeKind::Image { .. } if self.image_attributes => {
        for child in node.children() {
          if let NodeKind::ImageAttributes { attributes } = child.kind() {
            for (name, value) in attributes {
              attrs.insert(name.as_str(), value.as_str());
            }
          }
        }
      },
      _ => {},
    }
  }

  /// Emit `<tag ...>` for `node` with decorated attributes.
  fn open(&mut self, node: NodeRef<'r>, tag: &str) -> Result<()> {
    self.open_with(node, tag, AttributeSet::new())
  }

  fn open_with(&mut self, node: NodeRef<'r>, tag: &str, base: AttributeSet) -> Result<()> {
    let attrs = self.attributes(node, tag, base)?;
    self.html.tag_with(tag, &attrs);
    Ok(())
  }

  fn void_with(&mut self, node: NodeRef<'r>, tag: &str, base: AttributeSet) -> Result<()> {
    let attrs = self.attributes(node, tag, base)?;
    self.html.void_tag(tag, &attrs);
    Ok(())
  }

  /// Apply the sanitizing and encoding options to a link or image
  /// destination.
  fn prepare_url(&self, destination: &str) -> String {
    let mut url = if self.options.sanitize_urls {
      utils::sanitize_url(destination)
    } else {
      destination.to_string()
    };
    if self.options.percent_encode_urls {
      url = utils::percent_encode_url(&url);
    }
    url
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deep_tree_renders_without_recursion() {
    let depth = 100_000;
    let mut document = Document::new();
    let mut parent = Document::ROOT;
    for _ in 0..depth {
      parent = document.append_new(parent, NodeKind::BlockQuote);
    }
    let paragraph = document.append_new(parent, NodeKind::Paragraph);
    document.append_new(paragraph, NodeKind::Text {
      literal: "deep".to_string(),
    });

    let rules = RuleSet::default();
    let html = render_document(&document, &[], &RendererOptions::default(), &rules)
      .expect("no rules, no failures");
    assert_eq!(html.matches("<blockquote>").count(), depth);
    assert_eq!(html.matches("</blockquote>").count(), depth);
    assert!(html.contains("<p>deep</p>"));
  }

  #[test]
  fn test_heading_id_is_generated_once_per_heading() {
    let mut document = Document::new();
    for _ in 0..2 {
      let heading = document.append_new(Document::ROOT, NodeKind::Heading { level: 1 });
      document.append_new(heading, NodeKind::Text {
        literal: "Same".to_string(),
      });
    }

    let mut rules = RuleSet::default();
    rules.add_render_rule(
      NodeType::Heading.into(),
      Box::new(|ctx: &mut CustomRenderer<'_, '_>| {
        let first = ctx.attributes("h1")?;
        let second = ctx.attributes("h1")?;
        assert_eq!(first.get("id"), second.get("id"));
        ctx.html().tag_with("h1", &second);
        ctx.html().close_tag("h1");
        Ok(())
      }),
    );
    let html = render_document(
      &document,
      &[Extension::HeadingAnchors],
      &RendererOptions::default(),
      &rules,
    )
    .expect("render");
    assert_eq!(html, r#"<h1 id="same"></h1><h1 id="same-1"></h1>"#);
  }
}
