//! Node payloads and the closed set of node type tags used for dispatch.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
  Left,
  Center,
  Right,
}

impl Alignment {
  /// Value used for the HTML `align` attribute.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Left => "left",
      Self::Center => "center",
      Self::Right => "right",
    }
  }
}

/// Payload of a single node in the document tree.
///
/// Structure (parent, children, siblings) lives in the
/// [`Document`](super::Document) arena; this enum only carries what is
/// specific to each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
  /// Root of every document.
  Document,

  Heading {
    /// Heading level (1-6).
    level: u8,
  },
  Paragraph,
  BlockQuote,
  BulletList {
    tight:  bool,
    /// Bullet character (`-`, `+` or `*`).
    marker: char,
  },
  OrderedList {
    tight:     bool,
    start:     usize,
    /// Delimiter after the number (`.` or `)`).
    delimiter: char,
  },
  ListItem,
  FencedCodeBlock {
    info:         String,
    literal:      String,
    fence_char:   char,
    fence_length: usize,
  },
  IndentedCodeBlock {
    literal: String,
  },
  ThematicBreak,
  HtmlBlock {
    literal: String,
  },

  TableBlock,
  TableHead,
  TableBody,
  TableRow,
  TableCell {
    header:    bool,
    alignment: Option<Alignment>,
  },

  FootnoteDefinition {
    label:      String,
    /// Position in reference order, starting at 1.
    number:     usize,
    /// How many references point at this definition.
    references: usize,
  },

  /// Container for the YAML front matter entries.
  FrontMatterBlock,
  FrontMatterEntry {
    key:    String,
    values: Vec<String>,
  },

  Text {
    literal: String,
  },
  Emphasis,
  StrongEmphasis,
  Code {
    literal: String,
  },
  Link {
    destination: String,
    title:       Option<String>,
  },
  Image {
    destination: String,
    title:       Option<String>,
  },
  HardLineBreak,
  SoftLineBreak,
  HtmlInline {
    literal: String,
  },
  Strikethrough,
  Ins,
  TaskListMarker {
    checked: bool,
  },
  FootnoteReference {
    label:      String,
    /// Number of the referenced definition.
    number:     usize,
    /// 1-based index of this reference among all references to the same
    /// definition.
    occurrence: usize,
  },
  /// Attributes given in `{...}` directly after an image.
  ImageAttributes {
    attributes: Vec<(String, String)>,
  },
}

impl NodeKind {
  /// Runtime type tag of this node.
  #[must_use]
  pub const fn node_type(&self) -> NodeType {
    match self {
      Self::Document => NodeType::Document,
      Self::Heading { .. } => NodeType::Heading,
      Self::Paragraph => NodeType::Paragraph,
      Self::BlockQuote => NodeType::BlockQuote,
      Self::BulletList { .. } => NodeType::BulletList,
      Self::OrderedList { .. } => NodeType::OrderedList,
      Self::ListItem => NodeType::ListItem,
      Self::FencedCodeBlock { .. } => NodeType::FencedCodeBlock,
      Self::IndentedCodeBlock { .. } => NodeType::IndentedCodeBlock,
      Self::ThematicBreak => NodeType::ThematicBreak,
      Self::HtmlBlock { .. } => NodeType::HtmlBlock,
      Self::TableBlock => NodeType::TableBlock,
      Self::TableHead => NodeType::TableHead,
      Self::TableBody => NodeType::TableBody,
      Self::TableRow => NodeType::TableRow,
      Self::TableCell { .. } => NodeType::TableCell,
      Self::FootnoteDefinition { .. } => NodeType::FootnoteDefinition,
      Self::FrontMatterBlock => NodeType::FrontMatterBlock,
      Self::FrontMatterEntry { .. } => NodeType::FrontMatterEntry,
      Self::Text { .. } => NodeType::Text,
      Self::Emphasis => NodeType::Emphasis,
      Self::StrongEmphasis => NodeType::StrongEmphasis,
      Self::Code { .. } => NodeType::Code,
      Self::Link { .. } => NodeType::Link,
      Self::Image { .. } => NodeType::Image,
      Self::HardLineBreak => NodeType::HardLineBreak,
      Self::SoftLineBreak => NodeType::SoftLineBreak,
      Self::HtmlInline { .. } => NodeType::HtmlInline,
      Self::Strikethrough => NodeType::Strikethrough,
      Self::Ins => NodeType::Ins,
      Self::TaskListMarker { .. } => NodeType::TaskListMarker,
      Self::FootnoteReference { .. } => NodeType::FootnoteReference,
      Self::ImageAttributes { .. } => NodeType::ImageAttributes,
    }
  }

  /// Literal text carried by leaf variants.
  #[must_use]
  pub fn literal(&self) -> Option<&str> {
    match self {
      Self::Text { literal }
      | Self::Code { literal }
      | Self::HtmlInline { literal }
      | Self::HtmlBlock { literal }
      | Self::IndentedCodeBlock { literal }
      | Self::FencedCodeBlock { literal, .. } => Some(literal),
      _ => None,
    }
  }
}

/// Fieldless tag for every [`NodeKind`] variant.
///
/// Attribute and render rules are registered against sets of these tags.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NodeType {
  Document,
  Heading,
  Paragraph,
  BlockQuote,
  BulletList,
  OrderedList,
  ListItem,
  FencedCodeBlock,
  IndentedCodeBlock,
  ThematicBreak,
  HtmlBlock,
  TableBlock,
  TableHead,
  TableBody,
  TableRow,
  TableCell,
  FootnoteDefinition,
  FrontMatterBlock,
  FrontMatterEntry,
  Text,
  Emphasis,
  StrongEmphasis,
  Code,
  Link,
  Image,
  HardLineBreak,
  SoftLineBreak,
  HtmlInline,
  Strikethrough,
  Ins,
  TaskListMarker,
  FootnoteReference,
  ImageAttributes,
}

impl NodeType {
  /// Every node type, blocks first.
  pub const ALL: [Self; 33] = [
    Self::Document,
    Self::Heading,
    Self::Paragraph,
    Self::BlockQuote,
    Self::BulletList,
    Self::OrderedList,
    Self::ListItem,
    Self::FencedCodeBlock,
    Self::IndentedCodeBlock,
    Self::ThematicBreak,
    Self::HtmlBlock,
    Self::TableBlock,
    Self::TableHead,
    Self::TableBody,
    Self::TableRow,
    Self::TableCell,
    Self::FootnoteDefinition,
    Self::FrontMatterBlock,
    Self::FrontMatterEntry,
    Self::Text,
    Self::Emphasis,
    Self::StrongEmphasis,
    Self::Code,
    Self::Link,
    Self::Image,
    Self::HardLineBreak,
    Self::SoftLineBreak,
    Self::HtmlInline,
    Self::Strikethrough,
    Self::Ins,
    Self::TaskListMarker,
    Self::FootnoteReference,
    Self::ImageAttributes,
  ];

  const fn bit(self) -> u64 {
    1 << (self as u64)
  }

  /// Whether nodes of this type are block-level.
  ///
  /// The document root counts as a block.
  #[must_use]
  pub const fn is_block(self) -> bool {
    (self as u8) < (Self::Text as u8)
  }

  /// Whether nodes of this type are inline-level.
  #[must_use]
  pub const fn is_inline(self) -> bool {
    !self.is_block()
  }

  /// Type name as used in log output.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Document => "Document",
      Self::Heading => "Heading",
      Self::Paragraph => "Paragraph",
      Self::BlockQuote => "BlockQuote",
      Self::BulletList => "BulletList",
      Self::OrderedList => "OrderedList",
      Self::ListItem => "ListItem",
      Self::FencedCodeBlock => "FencedCodeBlock",
      Self::IndentedCodeBlock => "IndentedCodeBlock",
      Self::ThematicBreak => "ThematicBreak",
      Self::HtmlBlock => "HtmlBlock",
      Self::TableBlock => "TableBlock",
      Self::TableHead => "TableHead",
      Self::TableBody => "TableBody",
      Self::TableRow => "TableRow",
      Self::TableCell => "TableCell",
      Self::FootnoteDefinition => "FootnoteDefinition",
      Self::FrontMatterBlock => "FrontMatterBlock",
      Self::FrontMatterEntry => "FrontMatterEntry",
      Self::Text => "Text",
      Self::Emphasis => "Emphasis",
      Self::StrongEmphasis => "StrongEmphasis",
      Self::Code => "Code",
      Self::Link => "Link",
      Self::Image => "Image",
      Self::HardLineBreak => "HardLineBreak",
      Self::SoftLineBreak => "SoftLineBreak",
      Self::HtmlInline => "HtmlInline",
      Self::Strikethrough => "Strikethrough",
      Self::Ins => "Ins",
      Self::TaskListMarker => "TaskListMarker",
      Self::FootnoteReference => "FootnoteReference",
      Self::ImageAttributes => "ImageAttributes",
    }
  }
}

impl fmt::Display for NodeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A set of [`NodeType`] tags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeTypeSet(u64);

impl NodeTypeSet {
  /// The empty set.
  #[must_use]
  pub const fn new() -> Self {
    Self(0)
  }

  /// Every node type.
  #[must_use]
  pub fn all() -> Self {
    NodeType::ALL.into_iter().collect()
  }

  /// Every block-level type, including the document root.
  #[must_use]
  pub fn blocks() -> Self {
    NodeType::ALL.into_iter().filter(|t| t.is_block()).collect()
  }

  /// Every inline-level type.
  #[must_use]
  pub fn inlines() -> Self {
    NodeType::ALL.into_iter().filter(|t| t.is_inline()).collect()
  }

  /// Both list variants.
  #[must_use]
  pub const fn lists() -> Self {
    Self(NodeType::BulletList.bit() | NodeType::OrderedList.bit())
  }

  /// Both code block variants.
  #[must_use]
  pub const fn code_blocks() -> Self {
    Self(NodeType::FencedCodeBlock.bit() | NodeType::IndentedCodeBlock.bit())
  }

  /// Both line break variants.
  #[must_use]
  pub const fn line_breaks() -> Self {
    Self(NodeType::HardLineBreak.bit() | NodeType::SoftLineBreak.bit())
  }

  pub const fn insert(&mut self, node_type: NodeType) {
    self.0 |= node_type.bit();
  }

  #[must_use]
  pub const fn with(mut self, node_type: NodeType) -> Self {
    self.insert(node_type);
    self
  }

  #[must_use]
  pub const fn contains(self, node_type: NodeType) -> bool {
    self.0 & node_type.bit() != 0
  }

  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  #[must_use]
  pub const fn len(self) -> usize {
    self.0.count_ones() as usize
  }

  /// Iterate the members in declaration order.
  pub fn iter(self) -> impl Iterator<Item = NodeType> {
    NodeType::ALL.into_iter().filter(move |t| self.contains(*t))
  }
}

impl fmt::Debug for NodeTypeSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}

impl From<NodeType> for NodeTypeSet {
  fn from(node_type: NodeType) -> Self {
    Self(node_type.bit())
  }
}

impl<const N: usize> From<[NodeType; N]> for NodeTypeSet {
  fn from(types: [NodeType; N]) -> Self {
    types.into_iter().collect()
  }
}

impl From<&[NodeType]> for NodeTypeSet {
  fn from(types: &[NodeType]) -> Self {
    types.iter().copied().collect()
  }
}

impl FromIterator<NodeType> for NodeTypeSet {
  fn from_iter<I: IntoIterator<Item = NodeType>>(iter: I) -> Self {
    let mut set = Self::new();
    for node_type in iter {
      set.insert(node_type);
    }
    set
  }
}
