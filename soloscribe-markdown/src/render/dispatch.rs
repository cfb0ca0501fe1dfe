//! Render dispatch: caller rules that replace the built-in HTML for whole
//! node types.
use std::collections::HashMap;

use log::trace;

use super::{AttributeSet, HtmlRenderer, HtmlWriter};
use crate::{
  ast::{NodeRef, NodeType, NodeTypeSet},
  error::{BoxError, CallbackResult},
};

pub(crate) type RenderFn<'a> =
  dyn Fn(&mut CustomRenderer<'_, '_>) -> CallbackResult + 'a;

/// Maps each node type to the index of the rule that renders it.
///
/// Registering a rule overwrites any earlier entry for the same type, so the
/// last registration wins.
#[derive(Debug, Default)]
pub(crate) struct DispatchTable {
  rules: HashMap<NodeType, usize>,
}

impl DispatchTable {
  pub(crate) fn register(&mut self, types: NodeTypeSet, rule: usize) {
    for node_type in types.iter() {
      if let Some(previous) = self.rules.insert(node_type, rule) {
        trace!("Render rule #{rule} shadows rule #{previous} for {node_type}");
      }
    }
  }

  pub(crate) fn lookup(&self, node_type: NodeType) -> Option<usize> {
    self.rules.get(&node_type).copied()
  }
}

/// Context handed to a caller render rule.
///
/// The rule owns the node's output completely: nothing is written for the
/// node, and none of its descendants are rendered, unless the rule does so
/// through this context.
pub struct CustomRenderer<'c, 'r> {
  node:     NodeRef<'r>,
  renderer: &'c mut HtmlRenderer<'r>,
}

impl<'c, 'r> CustomRenderer<'c, 'r> {
  pub(crate) const fn new(node: NodeRef<'r>, renderer: &'c mut HtmlRenderer<'r>) -> Self {
    Self { node, renderer }
  }

  /// The node being rendered.
  #[must_use]
  pub const fn node(&self) -> NodeRef<'r> {
    self.node
  }

  /// The output sink.
  pub const fn html(&mut self) -> &mut HtmlWriter {
    &mut self.renderer.html
  }

  /// Render the children of the current node in order. Each child goes
  /// through dispatch again, so other caller rules still apply to it.
  ///
  /// # Errors
  ///
  /// Returns the error of any rule that fails while rendering the children.
  pub fn render_children(&mut self) -> CallbackResult {
    self.render_children_of(self.node)
  }

  /// Render the children of `node` in order, through dispatch.
  ///
  /// # Errors
  ///
  /// Returns the error of any rule that fails while rendering the children.
  pub fn render_children_of(&mut self, node: NodeRef<'r>) -> CallbackResult {
    Ok(self.renderer.render_children(node)?)
  }

  /// Render `node` and its subtree through dispatch.
  ///
  /// # Errors
  ///
  /// Returns the error of any rule that fails while rendering the subtree.
  pub fn render(&mut self, node: NodeRef<'r>) -> CallbackResult {
    Ok(self.renderer.render(node)?)
  }

  /// Attributes for a `tag` emitted by the current node, after built-in
  /// decorations and caller attribute rules.
  ///
  /// # Errors
  ///
  /// Returns the error of a failing attribute rule.
  pub fn attributes(&mut self, tag: &str) -> Result<AttributeSet, BoxError> {
    self.attributes_with(tag, AttributeSet::new())
  }

  /// Like [`attributes`](Self::attributes), starting from `base`.
  ///
  /// # Errors
  ///
  /// Returns the error of a failing attribute rule.
  pub fn attributes_with(
    &mut self,
    tag: &str,
    base: AttributeSet,
  ) -> Result<AttributeSet, BoxError> {
    Ok(self.renderer.attributes(self.node, tag, base)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_last_registration_wins() {
    let mut table = DispatchTable::default();
    table.register(NodeTypeSet::from([NodeType::Heading, NodeType::Text]), 0);
    table.register(NodeType::Heading.into(), 1);
    assert_eq!(table.lookup(NodeType::Heading), Some(1));
    assert_eq!(table.lookup(NodeType::Text), Some(0));
    assert_eq!(table.lookup(NodeType::Paragraph), None);
  }

  #[test]
  fn test_empty_set_registers_nothing() {
    let mut table = DispatchTable::default();
    table.register(NodeTypeSet::new(), 0);
    for node_type in NodeType::ALL {
      assert_eq!(table.lookup(node_type), None);
    }
  }
}
