#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
use std::fmt;

use soloscribe_markdown::{
  AttributeSet, CallbackResult, Config, Error, Markdown, NodeKind, NodeRef, NodeType,
  NodeTypeSet, Rendered, Visitor, render_markdown,
};

fn init_logging() {
  let _ = env_logger::builder().is_test(true).try_init();
}

fn render<'a>(text: &str, configure: impl FnOnce(&mut Markdown<'a>)) -> Rendered {
  init_logging();
  render_markdown(text, configure).expect("render should succeed")
}

#[derive(Debug)]
struct Rejected(&'static str);

impl fmt::Display for Rejected {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "rejected: {}", self.0)
  }
}

impl std::error::Error for Rejected {}

#[test]
fn test_plain_commonmark_without_rules() {
  let rendered = render("# Title\n\nSome *emphasis* and `code`.\n\n---\n", |_| {});
  assert_eq!(
    rendered.html,
    "<h1>Title</h1>\n<p>Some <em>emphasis</em> and <code>code</code>.</p>\n<hr />\n"
  );
  assert_eq!(rendered.metadata, None);
}

#[test]
fn test_render_rules_replace_paragraph_and_soft_break() {
  let text = "# Hello, Markdown!\n\nThis is a simple markdown document.\nLet's see how it renders.";
  let rendered = render(text, |md| {
    md.paragraph(|ctx| {
      ctx.html().tag("div");
      ctx.render_children()?;
      ctx.html().tag("/div");
      Ok(())
    })
    .soft_line_break(|ctx| {
      ctx.html().tag("br/");
      ctx.html().line();
      Ok(())
    });
  });
  assert_eq!(
    rendered.html.trim(),
    "<h1>Hello, Markdown!</h1>\n<div>This is a simple markdown document.<br/>\nLet's see \
     how it renders.</div>"
  );
}

#[test]
fn test_attribute_rule_adds_class() {
  let rendered = render("# Hello", |md| {
    md.attributes(NodeType::Heading, |attrs| {
      attrs.insert("class", "my-text");
      Ok(())
    });
  });
  assert_eq!(rendered.html.trim(), r#"<h1 class="my-text">Hello</h1>"#);
}

#[test]
fn test_attribute_rules_compose_in_registration_order() {
  let rendered = render("# Hello\n\ntext", |md| {
    md.attributes(NodeType::Heading, |attrs| {
      attrs.insert("class", "first");
      attrs.insert("data-a", "1");
      Ok(())
    })
    .attributes(NodeTypeSet::blocks(), |attrs| {
      let class = attrs.get("class").map(|class| format!("{class} second"));
      attrs.insert("class", class.unwrap_or_else(|| "block".to_string()));
      Ok(())
    })
    .attributes(NodeType::Heading, |attrs| {
      attrs.remove("data-a");
      Ok(())
    });
  });
  assert_eq!(
    rendered.html,
    "<h1 class=\"first second\">Hello</h1>\n<p class=\"block\">text</p>\n"
  );
}

#[test]
fn test_attribute_rule_sees_tag_and_node() {
  let rendered = render("```rust\nfn main() {}\n```\n", |md| {
    md.attributes(NodeType::FencedCodeBlock, |attrs| {
      let NodeKind::FencedCodeBlock { info, .. } = attrs.node().kind() else {
        return Err("unexpected node".into());
      };
      if attrs.tag() == "pre" {
        attrs.insert("data-lang", info.clone());
      }
      Ok(())
    });
  });
  assert_eq!(
    rendered.html,
    "<pre data-lang=\"rust\"><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
  );
}

#[test]
fn test_last_render_rule_wins() {
  let rendered = render("plain", |md| {
    md.paragraph(|ctx| {
      ctx.html().raw("first");
      Ok(())
    })
    .block(|ctx| {
      ctx.render_children()?;
      Ok(())
    })
    .paragraph(|ctx| {
      ctx.html().raw("<p>third:");
      ctx.render_children()?;
      ctx.html().raw("</p>");
      Ok(())
    });
  });
  assert_eq!(rendered.html, "<p>third:plain</p>");
}

#[test]
fn test_render_rule_owns_subtree() {
  let rendered = render("> quoted *text*\n\nafter", |md| {
    md.block_quote(|ctx| {
      ctx.html().raw("<aside>hidden</aside>");
      Ok(())
    });
  });
  assert_eq!(rendered.html, "<aside>hidden</aside>\n<p>after</p>\n");
}

#[test]
fn test_render_rule_can_use_decorated_attributes() {
  let rendered = render("## Section", |md| {
    md.config(|config| config.enable_heading_anchors = true)
      .attributes(NodeType::Heading, |attrs| {
        attrs.insert("class", "title");
        Ok(())
      })
      .heading(|ctx| {
        let attrs = ctx.attributes_with("div", AttributeSet::new().with("role", "heading"))?;
        ctx.html().tag_with("div", &attrs);
        ctx.render_children()?;
        ctx.html().close_tag("div");
        Ok(())
      });
  });
  assert_eq!(
    rendered.html,
    r#"<div role="heading" id="section" class="title">Section</div>"#
  );
}

#[test]
fn test_list_shorthand_covers_both_list_kinds() {
  let rendered = render("- a\n\n1. b\n", |md| {
    md.list_block(|ctx| {
      ctx.html().raw("[list]");
      Ok(())
    });
  });
  assert_eq!(rendered.html, "[list][list]");
}

#[test]
fn test_closure_visitor_counts_nodes() {
  let mut headings = 0;
  let mut paragraphs = 0;
  {
    let (h, p) = (&mut headings, &mut paragraphs);
    render("# One\n\ntext\n\n## Two\n\nmore\n\n### Three", |md| {
      md.visit(move |node: NodeRef<'_>| {
        match node.node_type() {
          NodeType::Heading => *h += 1,
          NodeType::Paragraph => *p += 1,
          _ => {},
        }
        Ok(())
      });
    });
  }
  assert_eq!(headings, 3);
  assert_eq!(paragraphs, 2);
}

struct LinkCollector<'c> {
  links: &'c mut Vec<String>,
}

impl Visitor for LinkCollector<'_> {
  fn visit(&mut self, node: NodeRef<'_>) -> CallbackResult {
    if let NodeKind::Link { destination, .. } = node.kind() {
      self.links.push(destination.clone());
    }
    Ok(())
  }
}

#[test]
fn test_struct_visitor_collects_links() {
  let mut links = Vec::new();
  {
    let collector = LinkCollector { links: &mut links };
    render("[a](/one) and [b](https://two.example)", |md| {
      md.visitor(collector);
    });
  }
  assert_eq!(links, vec!["/one", "https://two.example"]);
}

#[test]
fn test_visitors_can_navigate_the_tree() {
  let mut depths = Vec::new();
  {
    let depths = &mut depths;
    render("- item with *emphasis*", |md| {
      md.visit(move |node: NodeRef<'_>| {
        if node.node_type() == NodeType::Emphasis {
          depths.push(node.ancestors().count());
          assert_eq!(node.text_content(), "emphasis");
        }
        Ok(())
      });
    });
  }
  assert_eq!(depths, vec![4]);
}

#[test]
fn test_visitor_error_aborts_render() {
  init_logging();
  let error = render_markdown("text", |md| {
    md.visit(|_: NodeRef<'_>| Ok(()))
      .visit(|_: NodeRef<'_>| Err(Rejected("visitor").into()));
  })
  .expect_err("visitor fails");
  assert!(matches!(error, Error::Visitor { index: 1, .. }));
  assert_eq!(error.callback_error().to_string(), "rejected: visitor");
}

#[test]
fn test_attribute_error_aborts_render() {
  init_logging();
  let error = render_markdown("[link](/x)", |md| {
    md.attributes(NodeType::Link, |_| Err("no links".into()));
  })
  .expect_err("attribute rule fails");
  match error {
    Error::Attributes { node_type, tag, .. } => {
      assert_eq!(node_type, NodeType::Link);
      assert_eq!(tag, "a");
    },
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_render_error_aborts_render() {
  init_logging();
  let error = render_markdown("> quote", |md| {
    md.block_quote(|_| Err(Rejected("quote").into()));
  })
  .expect_err("render rule fails");
  assert!(matches!(error, Error::Render { node_type: NodeType::BlockQuote, .. }));
  assert!(error.callback_error().is::<Rejected>());
}

#[test]
fn test_nested_error_reports_innermost_rule() {
  init_logging();
  let error = render_markdown("> *deep*", |md| {
    md.block_quote(|ctx| ctx.render_children())
      .emphasis(|_| Err("inner".into()));
  })
  .expect_err("nested rule fails");
  assert!(matches!(error, Error::Render { node_type: NodeType::Emphasis, .. }));
  assert_eq!(error.callback_error().to_string(), "inner");
}

#[test]
fn test_metadata_absent_empty_and_present() {
  let without_flag = render("---\ntitle: A\n---\n\nBody", |_| {});
  assert_eq!(without_flag.metadata, None);
  assert_eq!(without_flag.get("title"), None);

  let without_front_matter = render("Body", |md| {
    md.config(|config| config.enable_yaml_front_matter = true);
  });
  assert_eq!(without_front_matter.metadata, Some(Default::default()));

  let with_front_matter = render(
    "---\ntitle: 'Quoted: title'\nauthors:\n  - Ada\n  - Grace\n---\n\n# Body\n",
    |md| {
      md.config(|config| config.enable_yaml_front_matter = true);
    },
  );
  assert_eq!(
    with_front_matter.get("title"),
    Some(&["Quoted: title".to_string()][..])
  );
  assert_eq!(
    with_front_matter.get("authors"),
    Some(&["Ada".to_string(), "Grace".to_string()][..])
  );
  assert_eq!(with_front_matter.get("missing"), None);
  assert_eq!(with_front_matter.html, "<h1>Body</h1>\n");
}

#[test]
fn test_render_is_idempotent() {
  let text = "# A\n\n# A\n\nx[^n] ++y++ ~~z~~\n\n[^n]: note\n\n- [ ] task\n";
  let mut markdown = Markdown::new();
  markdown.config(|config| {
    config.enable_all_extensions();
  });
  let first = markdown.render(text).expect("render");
  let second = markdown.render(text).expect("render");
  assert_eq!(first, second);
  assert!(first.html.contains(r#"<h1 id="a">A</h1>"#));
  assert!(first.html.contains(r#"<h1 id="a-1">A</h1>"#));
}

#[test]
fn test_parse_never_fails() {
  let inputs = [
    "",
    "\n\n\n",
    "[unclosed](",
    "| a |\n|",
    "***\n---\n___",
    "[^missing] and [^]",
    "---\nbroken: [\n",
    "++ ++ ~~ ~~ {width=}",
    "<div>\n\n*mixed*\n\n</div>",
    "\u{0}\u{feff}odd bytes",
  ];
  for enabled in [Config::default(), Config::all()] {
    let mut markdown = Markdown::new();
    markdown.config(|config| *config = enabled.clone());
    for input in inputs {
      markdown.render(input).expect("no rules, no failures");
    }
  }
}

#[test]
fn test_parse_exposes_the_tree() {
  let markdown = Markdown::new();
  let document = markdown.parse("# Title\n\ntext");
  let types: Vec<_> = document
    .root()
    .children()
    .map(|child| child.node_type())
    .collect();
  assert_eq!(types, vec![NodeType::Heading, NodeType::Paragraph]);
}

#[test]
fn test_renderer_options() {
  let rendered = render("<b>raw</b>\n\n[x](javascript:alert(1)) [y](</a b>)\nnext", |md| {
    md.renderer(|options| {
      options.escape_html = true;
      options.sanitize_urls = true;
      options.percent_encode_urls = true;
      options.softbreak = " ".to_string();
    });
  });
  assert_eq!(
    rendered.html,
    "<p>&lt;b&gt;raw&lt;/b&gt;</p>\n<p><a rel=\"nofollow\" href=\"\">x</a> <a rel=\"nofollow\" \
     href=\"/a%20b\">y</a> next</p>\n"
  );
}

#[test]
fn test_omit_single_paragraph() {
  let rendered = render("just *this*", |md| {
    md.renderer(|options| options.omit_single_paragraph_p = true);
  });
  assert_eq!(rendered.html, "just <em>this</em>");

  let two = render("one\n\ntwo", |md| {
    md.renderer(|options| options.omit_single_paragraph_p = true);
  });
  assert_eq!(two.html, "<p>one</p>\n<p>two</p>\n");
}

#[test]
fn test_config_round_trips_through_json() {
  let config: Config =
    serde_json::from_str(r#"{ "enable_tables": true }"#).expect("valid config");
  assert!(config.enable_tables);
  assert!(!config.enable_footnotes);

  let json = serde_json::to_string(&Config::all()).expect("serialize");
  let back: Config = serde_json::from_str(&json).expect("deserialize");
  assert_eq!(back, Config::all());
}

#[test]
fn test_deeply_nested_input_renders() {
  let depth = 10_000;
  let text = format!("{} x", ">".repeat(depth));
  let rendered = render(&text, |_| {});
  assert_eq!(rendered.html.matches("<blockquote>").count(), depth);
  assert_eq!(rendered.html.matches("</blockquote>").count(), depth);
  assert!(rendered.html.contains("<p>x</p>"));

  let document = Markdown::new().parse(&text);
  assert_eq!(document.root().descendants().count(), depth + 3);
}

#[test]
fn test_render_rule_inside_deep_nesting() {
  let text = format!("{} x", ">".repeat(5_000));
  let rendered = render(&text, |md| {
    md.paragraph(|ctx| {
      ctx.html().raw("[");
      ctx.render_children()?;
      ctx.html().raw("]");
      Ok(())
    });
  });
  assert!(rendered.html.contains("[x]"));
}

#[test]
fn test_text_escapes_double_quotes() {
  let rendered = render(r#"say "hi" & <b>"#, |md| {
    md.renderer(|options| options.escape_html = true);
  });
  assert_eq!(
    rendered.html,
    "<p>say &quot;hi&quot; &amp; &lt;b&gt;</p>\n"
  );
}

#[test]
fn test_footnote_list_is_decorated() {
  let rendered = render("a[^1]\n\n[^1]: note\n", |md| {
    md.config(|config| config.enable_footnotes = true)
      .attributes(NodeType::Document, |attrs| {
        if attrs.tag() == "ol" {
          attrs.insert("class", "notes");
        }
        Ok(())
      });
  });
  assert!(rendered.html.contains("<ol class=\"notes\">\n<li id=\"fn-1\">"));
}
