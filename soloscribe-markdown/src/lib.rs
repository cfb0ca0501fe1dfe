//! # Soloscribe Markdown
//!
//! A configurable CommonMark to HTML pipeline. Text is parsed into a tree,
//! inspected by read-only visitors, optionally mined for YAML front matter,
//! and rendered to HTML. Callers can replace the HTML of any node type and
//! decorate the attributes of any emitted tag.
//!
//! ## Quick Start
//!
//! ```rust
//! use soloscribe_markdown::render_markdown;
//!
//! let rendered = render_markdown("# Hello\n\nThis is **bold** text.", |md| {
//!   md.config(|config| config.enable_heading_anchors = true);
//! })
//! .expect("no callback can fail here");
//!
//! assert_eq!(
//!   rendered.html,
//!   "<h1 id=\"hello\">Hello</h1>\n<p>This is <strong>bold</strong> text.</p>\n"
//! );
//! ```
//!
//! ## Overriding Output
//!
//! ```rust
//! use soloscribe_markdown::Markdown;
//!
//! let mut markdown = Markdown::new();
//! markdown
//!   .paragraph(|ctx| {
//!     ctx.html().tag("div");
//!     ctx.render_children()?;
//!     ctx.html().tag("/div");
//!     Ok(())
//!   })
//!   .soft_line_break(|ctx| {
//!     ctx.html().tag("br/");
//!     ctx.html().line();
//!     Ok(())
//!   });
//!
//! let rendered = markdown.render("one\ntwo").expect("rules do not fail");
//! assert_eq!(rendered.html, "<div>one<br/>\ntwo</div>");
//! ```
//!
//! ## Features
//!
//! - **Optional extensions**: autolinks, strikethrough, tables, footnotes,
//!   YAML front matter, `++ins++`, image attributes, task lists and heading
//!   anchors
//! - **Visitors** that see every node before rendering
//! - **Render rules** that take over the HTML of chosen node types
//! - **Attribute rules** that decorate the tags built-in rules emit

pub mod ast;
pub mod config;
pub mod error;
mod markdown;
pub mod metadata;
pub mod parser;
pub mod render;
mod types;
pub mod utils;
pub mod visitor;

pub use crate::{
  ast::{Document, NodeKind, NodeRef, NodeType, NodeTypeSet},
  config::{Config, Extension, ParserOptions, RendererOptions},
  error::{BoxError, CallbackResult, Error, Result},
  markdown::{Markdown, render_markdown},
  metadata::Metadata,
  render::{AttributeSet, CustomAttributes, CustomRenderer, HtmlWriter},
  types::Rendered,
  visitor::Visitor,
};
