//! Read-only tree visitors run between parsing and rendering.
use log::debug;

use crate::{
  ast::{Document, NodeRef},
  error::{CallbackResult, Error, Result},
};

/// A read-only traversal over the parsed document.
///
/// [`visit`](Visitor::visit) is called once per node in pre-order. Visitors
/// receive shared [`NodeRef`]s, so they can inspect payloads and navigate
/// but cannot restructure the tree.
///
/// Any `FnMut(NodeRef<'_>) -> CallbackResult` closure is a visitor.
pub trait Visitor {
  /// Inspect one node.
  ///
  /// # Errors
  ///
  /// An error stops the traversal and aborts the whole render call.
  fn visit(&mut self, node: NodeRef<'_>) -> CallbackResult;
}

impl<F> Visitor for F
where
  F: FnMut(NodeRef<'_>) -> CallbackResult,
{
  fn visit(&mut self, node: NodeRef<'_>) -> CallbackResult {
    self(node)
  }
}

/// Run each visitor over the whole document, one full traversal per visitor,
/// in registration order.
///
/// # Errors
///
/// Returns the first visitor error, wrapped with the visitor's index.
pub fn run_visitors(
  document: &Document,
  visitors: &mut [Box<dyn Visitor + '_>],
) -> Result<()> {
  for (index, visitor) in visitors.iter_mut().enumerate() {
    for node in document.root().descendants() {
      visitor.visit(node).map_err(|error| {
        Error::from_callback(error, |source| Error::Visitor { index, source })
      })?;
    }
  }
  debug!("Ran {} visitors", visitors.len());
  Ok(())
}
