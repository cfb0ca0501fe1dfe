//! Front matter metadata extraction.
use indexmap::IndexMap;
use log::debug;

use crate::ast::{Document, NodeKind};

/// Front matter values by key, in order of first appearance.
pub type Metadata = IndexMap<String, Vec<String>>;

/// Collect every front matter entry of `document` in pre-order.
///
/// A key that appears more than once accumulates its values in order. A
/// document without front matter yields an empty map.
#[must_use]
pub fn extract_metadata(document: &Document) -> Metadata {
  let mut metadata = Metadata::new();
  for node in document.root().descendants() {
    if let NodeKind::FrontMatterEntry { key, values } = node.kind() {
      metadata
        .entry(key.clone())
        .or_default()
        .extend(values.iter().cloned());
    }
  }
  debug!("Extracted {} front matter keys", metadata.len());
  metadata
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    config::{Extension, ParserOptions},
    parser::parse,
  };

  fn metadata_of(text: &str) -> Metadata {
    let document = parse(text, &[Extension::YamlFrontMatter], &ParserOptions::default());
    extract_metadata(&document)
  }

  #[test]
  fn test_front_matter_keys_in_order() {
    let metadata = metadata_of("---\ntitle: Hello\ntags:\n  - a\n  - b\n---\n\n# Body\n");
    assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["title", "tags"]);
    assert_eq!(metadata["title"], vec!["Hello"]);
    assert_eq!(metadata["tags"], vec!["a", "b"]);
  }

  #[test]
  fn test_repeated_keys_accumulate() {
    let metadata = metadata_of("---\ntag: a\nother: x\ntag: b\n---\n\nBody\n");
    assert_eq!(metadata["tag"], vec!["a", "b"]);
    assert_eq!(metadata.get_index_of("other"), Some(1));
  }

  #[test]
  fn test_no_front_matter_is_empty() {
    assert!(metadata_of("# Just a heading\n").is_empty());
  }
}
