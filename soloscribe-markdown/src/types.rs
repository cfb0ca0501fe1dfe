//! Types returned by the rendering pipeline.
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// Result of one render call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rendered {
  /// Rendered HTML output.
  pub html: String,

  /// Front matter values by key.
  ///
  /// `None` when front matter is disabled, an empty map when it is enabled
  /// but the document has none.
  pub metadata: Option<Metadata>,
}

impl Rendered {
  /// Values of a front matter key, or `None` for unknown keys and when
  /// front matter is disabled.
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&[String]> {
    self.metadata.as_ref()?.get(key).map(Vec::as_slice)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_distinguishes_missing_metadata() {
    let disabled = Rendered {
      html:     String::new(),
      metadata: None,
    };
    assert_eq!(disabled.get("title"), None);

    let mut metadata = Metadata::new();
    metadata.insert("title".to_string(), vec!["Hello".to_string()]);
    let enabled = Rendered {
      html:     String::new(),
      metadata: Some(metadata),
    };
    assert_eq!(enabled.get("title"), Some(&["Hello".to_string()][..]));
    assert_eq!(enabled.get("missing"), None);
  }
}
