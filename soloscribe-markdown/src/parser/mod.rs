//! Parser stage: Markdown text to [`Document`].
//!
//! Comrak provides the CommonMark grammar. Its arena AST is converted into
//! our own tree, after which each active extension's post-processor runs in
//! registration order.
mod convert;
mod front_matter;
mod postprocess;

use comrak::{Arena, Options, parse_document};
use log::debug;

use crate::{
  ast::Document,
  config::{Extension, ParserOptions},
};

/// Delimiter line that opens and closes a YAML front matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Parse `text` with the given active extensions.
///
/// Parsing is total: malformed constructs degrade to plain text and
/// paragraphs, so this never fails.
#[must_use]
pub fn parse(
  text: &str,
  extensions: &[Extension],
  options: &ParserOptions,
) -> Document {
  let arena = Arena::new();
  let comrak = comrak_options(extensions, options);
  let root = parse_document(&arena, text, &comrak);

  let mut document = convert::convert(root);
  for extension in extensions {
    postprocess::apply(*extension, &mut document);
  }

  debug!(
    "Parsed document with {} nodes ({} extensions active)",
    document.node_count(),
    extensions.len()
  );
  document
}

/// Build comrak options from the active extensions and parser passthrough
/// options.
fn comrak_options(
  extensions: &[Extension],
  parser: &ParserOptions,
) -> Options<'static> {
  let mut options = Options::default();
  for extension in extensions {
    match extension {
      Extension::Autolink => options.extension.autolink = true,
      Extension::Strikethrough => options.extension.strikethrough = true,
      Extension::Tables => options.extension.table = true,
      Extension::Footnotes => options.extension.footnotes = true,
      Extension::YamlFrontMatter => {
        options.extension.front_matter_delimiter =
          Some(FRONT_MATTER_DELIMITER.to_string());
      },
      // Implemented as tree post-processors or render rules.
      Extension::Ins
      | Extension::ImageAttributes
      | Extension::TaskList
      | Extension::HeadingAnchors => {},
    }
  }
  options.parse.smart = parser.smart;
  options.parse.relaxed_autolinks = parser.relaxed_autolinks;
  options
    .parse
    .default_info_string
    .clone_from(&parser.default_info_string);
  options
}
