//! Attribute decoration: caller hooks that add, change or remove HTML
//! attributes on the tags a node emits.
use indexmap::IndexMap;

use crate::{
  ast::{NodeRef, NodeTypeSet},
  error::CallbackResult,
};

/// Attributes of one tag, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet(IndexMap<String, String>);

impl AttributeSet {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style [`insert`](Self::insert).
  #[must_use]
  pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.insert(name, value);
    self
  }

  /// Set an attribute, returning the previous value. An existing attribute
  /// keeps its position.
  pub fn insert(
    &mut self,
    name: impl Into<String>,
    value: impl Into<String>,
  ) -> Option<String> {
    self.0.insert(name.into(), value.into())
  }

  /// Remove an attribute, keeping the order of the others.
  pub fn remove(&mut self, name: &str) -> Option<String> {
    self.0.shift_remove(name)
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.0.contains_key(name)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut set = Self::new();
    for (name, value) in iter {
      set.insert(name, value);
    }
    set
  }
}

/// What an attribute rule sees: the node, the tag being emitted and the
/// attributes collected so far.
pub struct CustomAttributes<'c, 'r> {
  node:  NodeRef<'r>,
  tag:   &'c str,
  attrs: &'c mut AttributeSet,
}

impl<'c, 'r> CustomAttributes<'c, 'r> {
  pub(crate) const fn new(
    node: NodeRef<'r>,
    tag: &'c str,
    attrs: &'c mut AttributeSet,
  ) -> Self {
    Self { node, tag, attrs }
  }

  /// The node emitting the tag.
  #[must_use]
  pub const fn node(&self) -> NodeRef<'r> {
    self.node
  }

  /// Name of the tag, e.g. `h1` or `img`.
  #[must_use]
  pub const fn tag(&self) -> &str {
    self.tag
  }

  /// Attributes as left by built-in decorations and earlier rules.
  #[must_use]
  pub fn attrs(&self) -> &AttributeSet {
    self.attrs
  }

  pub fn attrs_mut(&mut self) -> &mut AttributeSet {
    self.attrs
  }

  pub fn insert(
    &mut self,
    name: impl Into<String>,
    value: impl Into<String>,
  ) -> Option<String> {
    self.attrs.insert(name, value)
  }

  pub fn remove(&mut self, name: &str) -> Option<String> {
    self.attrs.remove(name)
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&str> {
    self.attrs.get(name)
  }
}

pub(crate) type AttributeFn<'a> =
  dyn Fn(&mut CustomAttributes<'_, '_>) -> CallbackResult + 'a;

/// A caller attribute rule and the node types it applies to.
pub(crate) struct AttributeRule<'a> {
  pub(crate) types: NodeTypeSet,
  pub(crate) apply: Box<AttributeFn<'a>>,
}
