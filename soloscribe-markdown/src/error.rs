//! Error types for the rendering pipeline.
//!
//! Parsing and configuration never fail. The only failures are errors raised
//! by caller-supplied visitors, attribute rules and render rules; each one
//! aborts the whole render call.
use crate::ast::NodeType;

/// Error type returned by caller callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What a visitor, attribute rule or render rule returns.
pub type CallbackResult = std::result::Result<(), BoxError>;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a render call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Visitor #{index} failed: {source}")]
  Visitor {
    /// Registration index of the failing visitor.
    index:  usize,
    source: BoxError,
  },
  #[error("Attribute rule failed on <{tag}> for {node_type} node: {source}")]
  Attributes {
    node_type: NodeType,
    tag:       String,
    source:    BoxError,
  },
  #[error("Render rule failed for {node_type} node: {source}")]
  Render {
    node_type: NodeType,
    source:    BoxError,
  },
}

impl Error {
  /// The error originally raised by the caller's callback.
  #[must_use]
  pub fn callback_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
    match self {
      Self::Visitor { source, .. }
      | Self::Attributes { source, .. }
      | Self::Render { source, .. } => source.as_ref(),
    }
  }

  /// Wrap a callback failure, unless it already is a pipeline error raised by
  /// a nested rule. Nested failures surface unchanged so the caller sees the
  /// rule that actually failed.
  pub(crate) fn from_callback(
    error: BoxError,
    wrap: impl FnOnce(BoxError) -> Self,
  ) -> Self {
    match error.downcast::<Self>() {
      Ok(nested) => *nested,
      Err(source) => wrap(source),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_nested_errors_are_not_rewrapped() {
    let inner = Error::Render {
      node_type: NodeType::Text,
      source:    "boom".into(),
    };
    let outer = Error::from_callback(Box::new(inner), |source| {
      Error::Render {
        node_type: NodeType::Paragraph,
        source,
      }
    });
    assert!(matches!(outer, Error::Render {
      node_type: NodeType::Text,
      ..
    }));
    assert_eq!(outer.callback_error().to_string(), "boom");
  }

  #[test]
  fn test_foreign_errors_are_wrapped() {
    let error = Error::from_callback("bad input".into(), |source| {
      Error::Visitor { index: 2, source }
    });
    assert_eq!(error.to_string(), "Visitor #2 failed: bad input");
  }
}
