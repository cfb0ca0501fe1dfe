//! Arena-backed document tree.
//!
//! Every node lives in a single [`Document`] and is addressed by a
//! [`NodeId`]. Parent and sibling links are plain ids, so the tree owns its
//! nodes exactly once and navigation never needs reference counting.
//!
//! Callers only ever see the tree through [`NodeRef`], a shared borrow of the
//! document plus an id. Structure can therefore not change while a visitor or
//! render rule is looking at it.
mod kind;

use std::fmt;

pub use kind::{Alignment, NodeKind, NodeType, NodeTypeSet};

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  /// Position of the node in the arena.
  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }
}

#[derive(Debug, Clone)]
struct NodeData {
  kind:        NodeKind,
  parent:      Option<NodeId>,
  first_child: Option<NodeId>,
  last_child:  Option<NodeId>,
  previous:    Option<NodeId>,
  next:        Option<NodeId>,
}

impl NodeData {
  const fn new(kind: NodeKind) -> Self {
    Self {
      kind,
      parent: None,
      first_child: None,
      last_child: None,
      previous: None,
      next: None,
    }
  }
}

/// A parsed document: the arena owning every node, rooted at a
/// [`NodeKind::Document`] node.
#[derive(Debug, Clone)]
pub struct Document {
  nodes: Vec<NodeData>,
}

impl Default for Document {
  fn default() -> Self {
    Self::new()
  }
}

impl Document {
  /// Id of the root node.
  pub const ROOT: NodeId = NodeId(0);

  /// Create a document holding only its root.
  #[must_use]
  pub fn new() -> Self {
    Self {
      nodes: vec![NodeData::new(NodeKind::Document)],
    }
  }

  /// The root node.
  #[must_use]
  pub fn root(&self) -> NodeRef<'_> {
    NodeRef {
      document: self,
      id:       Self::ROOT,
    }
  }

  /// Look up a node by id.
  #[must_use]
  pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
    (id.0 < self.nodes.len()).then_some(NodeRef { document: self, id })
  }

  /// Number of nodes reachable from the root.
  #[must_use]
  pub fn node_count(&self) -> usize {
    self.root().descendants().count()
  }

  fn data(&self, id: NodeId) -> &NodeData {
    &self.nodes[id.0]
  }

  fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
    &mut self.nodes[id.0]
  }

  pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
    &self.data(id).kind
  }

  pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
    &mut self.data_mut(id).kind
  }

  pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.data(id).parent
  }

  pub(crate) fn first_child(&self, id: NodeId) -> Option<NodeId> {
    self.data(id).first_child
  }

  pub(crate) fn last_child(&self, id: NodeId) -> Option<NodeId> {
    self.data(id).last_child
  }

  pub(crate) fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
    self.data(id).next
  }

  pub(crate) fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
    self.data(id).previous
  }

  /// Ids of the direct children of `id`, collected so the caller may mutate
  /// the tree while walking them.
  pub(crate) fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
    let mut ids = Vec::new();
    let mut child = self.first_child(id);
    while let Some(current) = child {
      ids.push(current);
      child = self.next_sibling(current);
    }
    ids
  }

  /// Allocate a detached node.
  pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(NodeData::new(kind));
    id
  }

  /// Allocate a node and append it to `parent`.
  pub(crate) fn append_new(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
    let id = self.alloc(kind);
    self.append_child(parent, id);
    id
  }

  pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
    self.detach(child);
    let last = self.data(parent).last_child;
    {
      let data = self.data_mut(child);
      data.parent = Some(parent);
      data.previous = last;
    }
    match last {
      Some(last) => self.data_mut(last).next = Some(child),
      None => self.data_mut(parent).first_child = Some(child),
    }
    self.data_mut(parent).last_child = Some(child);
  }

  pub(crate) fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
    match self.first_child(parent) {
      Some(first) => self.insert_before(first, child),
      None => self.append_child(parent, child),
    }
  }

  /// Insert `node` directly before `sibling`.
  pub(crate) fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
    self.detach(node);
    let parent = self.parent(sibling);
    let previous = self.previous_sibling(sibling);
    {
      let data = self.data_mut(node);
      data.parent = parent;
      data.previous = previous;
      data.next = Some(sibling);
    }
    self.data_mut(sibling).previous = Some(node);
    match previous {
      Some(previous) => self.data_mut(previous).next = Some(node),
      None => {
        if let Some(parent) = parent {
          self.data_mut(parent).first_child = Some(node);
        }
      },
    }
  }

  /// Insert `node` directly after `sibling`.
  pub(crate) fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
    self.detach(node);
    let parent = self.parent(sibling);
    let next = self.next_sibling(sibling);
    {
      let data = self.data_mut(node);
      data.parent = parent;
      data.previous = Some(sibling);
      data.next = next;
    }
    self.data_mut(sibling).next = Some(node);
    match next {
      Some(next) => self.data_mut(next).previous = Some(node),
      None => {
        if let Some(parent) = parent {
          self.data_mut(parent).last_child = Some(node);
        }
      },
    }
  }

  /// Unlink `node` from its parent and siblings. Its own children stay
  /// attached to it.
  pub(crate) fn detach(&mut self, node: NodeId) {
    let data = self.data(node);
    let (parent, previous, next) = (data.parent, data.previous, data.next);
    match previous {
      Some(previous) => self.data_mut(previous).next = next,
      None => {
        if let Some(parent) = parent {
          self.data_mut(parent).first_child = next;
        }
      },
    }
    match next {
      Some(next) => self.data_mut(next).previous = previous,
      None => {
        if let Some(parent) = parent {
          self.data_mut(parent).last_child = previous;
        }
      },
    }
    let data = self.data_mut(node);
    data.parent = None;
    data.previous = None;
    data.next = None;
  }

  /// Next node after `current` in a pre-order walk of the subtree at `root`.
  fn successor(&self, root: NodeId, current: NodeId) -> Option<NodeId> {
    if let Some(child) = self.first_child(current) {
      return Some(child);
    }
    let mut node = current;
    loop {
      if node == root {
        return None;
      }
      if let Some(next) = self.next_sibling(node) {
        return Some(next);
      }
      node = self.parent(node)?;
    }
  }
}

/// Read-only handle on one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
  document: &'a Document,
  id:       NodeId,
}

impl fmt::Debug for NodeRef<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeRef")
      .field("id", &self.id)
      .field("kind", self.kind())
      .finish()
  }
}

impl PartialEq for NodeRef<'_> {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::eq(self.document, other.document) && self.id == other.id
  }
}

impl Eq for NodeRef<'_> {}

impl<'a> NodeRef<'a> {
  const fn wrap(&self, id: NodeId) -> NodeRef<'a> {
    NodeRef {
      document: self.document,
      id,
    }
  }

  #[must_use]
  pub const fn id(&self) -> NodeId {
    self.id
  }

  /// The document this node belongs to.
  #[must_use]
  pub const fn document(&self) -> &'a Document {
    self.document
  }

  #[must_use]
  pub fn kind(&self) -> &'a NodeKind {
    self.document.kind(self.id)
  }

  #[must_use]
  pub fn node_type(&self) -> NodeType {
    self.kind().node_type()
  }

  /// Literal text of leaf nodes such as text, code and HTML.
  #[must_use]
  pub fn literal(&self) -> Option<&'a str> {
    self.kind().literal()
  }

  #[must_use]
  pub fn parent(&self) -> Option<Self> {
    self.document.parent(self.id).map(|id| self.wrap(id))
  }

  #[must_use]
  pub fn first_child(&self) -> Option<Self> {
    self.document.first_child(self.id).map(|id| self.wrap(id))
  }

  #[must_use]
  pub fn last_child(&self) -> Option<Self> {
    self.document.last_child(self.id).map(|id| self.wrap(id))
  }

  #[must_use]
  pub fn next_sibling(&self) -> Option<Self> {
    self.document.next_sibling(self.id).map(|id| self.wrap(id))
  }

  #[must_use]
  pub fn previous_sibling(&self) -> Option<Self> {
    self.document.previous_sibling(self.id).map(|id| self.wrap(id))
  }

  /// Direct children in document order.
  #[must_use]
  pub fn children(&self) -> Children<'a> {
    Children {
      document: self.document,
      next:     self.document.first_child(self.id),
    }
  }

  /// This node followed by all its descendants, in pre-order.
  #[must_use]
  pub fn descendants(&self) -> Descendants<'a> {
    Descendants {
      document: self.document,
      root:     self.id,
      next:     Some(self.id),
    }
  }

  /// Parent, grandparent, ... up to the root.
  pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
    std::iter::successors(self.parent(), NodeRef::parent)
  }

  /// Plain text of the subtree: text and code literals, line breaks as
  /// newlines.
  #[must_use]
  pub fn text_content(&self) -> String {
    let mut text = String::new();
    for node in self.descendants() {
      match node.kind() {
        NodeKind::Text { literal } | NodeKind::Code { literal } => {
          text.push_str(literal);
        },
        NodeKind::SoftLineBreak | NodeKind::HardLineBreak => text.push('\n'),
        _ => {},
      }
    }
    text
  }
}

/// Iterator over the direct children of a node.
pub struct Children<'a> {
  document: &'a Document,
  next:     Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
  type Item = NodeRef<'a>;

  fn next(&mut self) -> Option<Self::Item> {
    let id = self.next?;
    self.next = self.document.next_sibling(id);
    Some(NodeRef {
      document: self.document,
      id,
    })
  }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
  document: &'a Document,
  root:     NodeId,
  next:     Option<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
  type Item = NodeRef<'a>;

  fn next(&mut self) -> Option<Self::Item> {
    let id = self.next?;
    self.next = self.document.successor(self.root, id);
    Some(NodeRef {
      document: self.document,
      id,
    })
  }
}
