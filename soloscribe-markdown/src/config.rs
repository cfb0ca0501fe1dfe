//! Extension flags and low-level parser/renderer options.
//!
//! # Examples
//!
//! ```
//! use soloscribe_markdown::{Config, Extension};
//!
//! let config = Config {
//!   enable_tables: true,
//!   enable_footnotes: true,
//!   ..Default::default()
//! };
//!
//! assert_eq!(config.extensions(), vec![Extension::Tables, Extension::Footnotes]);
//! ```
use serde::{Deserialize, Serialize};

/// Which optional Markdown extensions are active.
///
/// Every flag defaults to `false` and any combination is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct Config {
  /// Turn bare URLs and `www.` addresses into links.
  pub enable_autolink:         bool,
  /// `~~text~~` renders as `<del>`.
  pub enable_strikethrough:    bool,
  /// GFM pipe tables.
  pub enable_tables:           bool,
  /// `[^label]` references and definitions.
  pub enable_footnotes:        bool,
  /// `id` attributes on headings.
  pub enable_heading_anchors:  bool,
  /// `++text++` renders as `<ins>`.
  pub enable_ins:              bool,
  /// Leading `---` block parsed into metadata.
  pub enable_yaml_front_matter: bool,
  /// `{width=.. height=..}` after images.
  pub enable_image_attributes: bool,
  /// `- [ ]` and `- [x]` list items.
  pub enable_task_list:        bool,
}

impl Config {
  /// Config with every extension enabled.
  #[must_use]
  pub fn all() -> Self {
    let mut config = Self::default();
    config.enable_all_extensions();
    config
  }

  /// Enable every extension.
  pub const fn enable_all_extensions(&mut self) -> &mut Self {
    self.enable_autolink = true;
    self.enable_strikethrough = true;
    self.enable_tables = true;
    self.enable_footnotes = true;
    self.enable_heading_anchors = true;
    self.enable_ins = true;
    self.enable_yaml_front_matter = true;
    self.enable_image_attributes = true;
    self.enable_task_list = true;
    self
  }

  /// Enable or disable a single extension.
  pub const fn set(&mut self, extension: Extension, enabled: bool) -> &mut Self {
    *self.flag_mut(extension) = enabled;
    self
  }

  /// Whether `extension` is enabled.
  #[must_use]
  pub const fn is_enabled(&self, extension: Extension) -> bool {
    match extension {
      Extension::Autolink => self.enable_autolink,
      Extension::Strikethrough => self.enable_strikethrough,
      Extension::Tables => self.enable_tables,
      Extension::Footnotes => self.enable_footnotes,
      Extension::YamlFrontMatter => self.enable_yaml_front_matter,
      Extension::Ins => self.enable_ins,
      Extension::ImageAttributes => self.enable_image_attributes,
      Extension::TaskList => self.enable_task_list,
      Extension::HeadingAnchors => self.enable_heading_anchors,
    }
  }

  const fn flag_mut(&mut self, extension: Extension) -> &mut bool {
    match extension {
      Extension::Autolink => &mut self.enable_autolink,
      Extension::Strikethrough => &mut self.enable_strikethrough,
      Extension::Tables => &mut self.enable_tables,
      Extension::Footnotes => &mut self.enable_footnotes,
      Extension::YamlFrontMatter => &mut self.enable_yaml_front_matter,
      Extension::Ins => &mut self.enable_ins,
      Extension::ImageAttributes => &mut self.enable_image_attributes,
      Extension::TaskList => &mut self.enable_task_list,
      Extension::HeadingAnchors => &mut self.enable_heading_anchors,
    }
  }

  /// Active extensions in registration order.
  #[must_use]
  pub fn extensions(&self) -> Vec<Extension> {
    Extension::ALL
      .into_iter()
      .filter(|extension| self.is_enabled(*extension))
      .collect()
  }
}

/// Descriptor of one optional extension.
///
/// Each extension contributes parse rules (comrak flags and/or a tree
/// post-processor) and render rules (built-in HTML for the node types it
/// introduces, or a built-in attribute decoration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extension {
  Autolink,
  Strikethrough,
  Tables,
  Footnotes,
  YamlFrontMatter,
  Ins,
  ImageAttributes,
  TaskList,
  HeadingAnchors,
}

impl Extension {
  /// Registration order. Post-processors run in this order.
  pub const ALL: [Self; 9] = [
    Self::Autolink,
    Self::Strikethrough,
    Self::Tables,
    Self::Footnotes,
    Self::YamlFrontMatter,
    Self::Ins,
    Self::ImageAttributes,
    Self::TaskList,
    Self::HeadingAnchors,
  ];
}

/// Low-level options passed through to the comrak parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
  /// Convert straight quotes, `--` and `...` to typographic punctuation.
  pub smart:               bool,
  /// Accept a wider range of autolink forms.
  pub relaxed_autolinks:   bool,
  /// Info string given to fenced code blocks that have none.
  pub default_info_string: Option<String>,
}

/// Low-level options for the HTML writer and built-in render rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct RendererOptions {
  /// Emitted for every soft line break.
  pub softbreak:               String,
  /// Escape raw HTML blocks and inlines instead of passing them through.
  pub escape_html:             bool,
  /// Blank out link and image destinations with unsafe protocols and add
  /// `rel="nofollow"` to links.
  pub sanitize_urls:           bool,
  /// Percent-encode link and image destinations.
  pub percent_encode_urls:     bool,
  /// Render a document consisting of a single paragraph without `<p>`.
  pub omit_single_paragraph_p: bool,
}

impl Default for RendererOptions {
  fn default() -> Self {
    Self {
      softbreak:               "\n".to_string(),
      escape_html:             false,
      sanitize_urls:           false,
      percent_encode_urls:     false,
      omit_single_paragraph_p: false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_disable_everything() {
    let config = Config::default();
    assert!(config.extensions().is_empty());
    for extension in Extension::ALL {
      assert!(!config.is_enabled(extension));
    }
  }

  #[test]
  fn test_enable_all_extensions() {
    let mut config = Config::default();
    config.enable_all_extensions();
    assert_eq!(config.extensions(), Extension::ALL.to_vec());
    assert_eq!(config, Config::all());
  }

  #[test]
  fn test_extension_order_is_fixed() {
    let mut config = Config::default();
    config
      .set(Extension::HeadingAnchors, true)
      .set(Extension::Autolink, true)
      .set(Extension::Ins, true);
    assert_eq!(config.extensions(), vec![
      Extension::Autolink,
      Extension::Ins,
      Extension::HeadingAnchors,
    ]);
  }

  #[test]
  fn test_flags_are_independent() {
    let mut config = Config::all();
    config.set(Extension::Tables, false);
    assert!(!config.enable_tables);
    assert_eq!(config.extensions().len(), Extension::ALL.len() - 1);
  }
}
