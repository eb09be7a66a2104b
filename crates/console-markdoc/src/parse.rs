//! Parse stage: source text to markup AST.
//!
//! The pipeline consumes the parser through the [`MarkupParser`] seam so
//! tests and embedders can supply a pre-built tree. The default
//! [`CmarkParser`] folds `pulldown-cmark` events into [`Node`]s with an
//! element stack.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::ast::{Element, Node};

/// Markup parser collaborator: source text in, AST out.
pub trait MarkupParser {
    /// Parse source text into a `document` root node.
    fn parse(&self, source: &str) -> Node;
}

/// Default parser backed by `pulldown-cmark`.
///
/// Produces a `document` root whose descendants use the node names the base
/// [`TransformConfig`](crate::TransformConfig) maps: `paragraph`, `heading`,
/// `image`, `link`, `strong`, `em`, `s`, `code`, `fence`, `list`, `item`,
/// `blockquote`, `hr`, `hardbreak`. Events with no counterpart in the
/// console's document model (footnotes, math, raw HTML, tables) are skipped.
#[derive(Clone, Copy, Debug)]
pub struct CmarkParser {
    gfm: bool,
}

impl CmarkParser {
    /// Create a parser with GFM extensions enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    fn parser_options(self) -> Options {
        if self.gfm {
            Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

impl Default for CmarkParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupParser for CmarkParser {
    fn parse(&self, source: &str) -> Node {
        let mut builder = TreeBuilder::new();
        for event in Parser::new_ext(source, self.parser_options()) {
            builder.process_event(event);
        }
        builder.finish()
    }
}

/// Folds the flat event stream into a tree with an element stack.
struct TreeBuilder {
    stack: Vec<Element>,
}

/// Name for transparent containers: popped children splice into the parent.
const PASSTHROUGH: &str = "";

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new("document")],
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.stack.push(element_for_tag(&tag)),
            Event::End(tag) => self.end_tag(&tag),
            Event::Text(text) => self.push_child(Node::text(text.as_ref())),
            Event::Code(code) => {
                self.push_child(Element::new("code").with_child(Node::text(code.as_ref())).into());
            }
            Event::SoftBreak => self.push_child(Node::text(" ")),
            Event::HardBreak => self.push_child(Element::new("hardbreak").into()),
            Event::Rule => self.push_child(Element::new("hr").into()),
            Event::Html(_)
            | Event::InlineHtml(_)
            | Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                // Not part of the console document model
            }
        }
    }

    fn end_tag(&mut self, tag: &TagEnd) {
        let Some(mut el) = self.stack.pop() else {
            return;
        };

        match tag {
            TagEnd::Image => {
                // Inner events are the alt text, not children.
                let alt = collect_text(&el.children);
                el.children.clear();
                if !alt.is_empty() {
                    el = el.with_attr("alt", alt);
                }
            }
            TagEnd::CodeBlock => {
                // Collapse collected text runs into a single content child.
                let content = el
                    .children
                    .iter()
                    .filter_map(|c| match c {
                        Node::Text(t) => Some(t.as_str()),
                        Node::Element(_) => None,
                    })
                    .collect::<String>();
                el.children = vec![Node::text(content)];
            }
            _ => {}
        }

        if el.name == PASSTHROUGH {
            let children = std::mem::take(&mut el.children);
            for child in children {
                self.push_child(child);
            }
        } else {
            self.push_child(el.into());
        }
    }

    fn push_child(&mut self, child: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(child);
        }
    }

    fn finish(mut self) -> Node {
        // Unbalanced input never panics: fold any open elements downward.
        while self.stack.len() > 1 {
            let tail = self.stack.pop().unwrap_or_else(|| Element::new(PASSTHROUGH));
            self.push_child(tail.into());
        }
        self.stack
            .pop()
            .map_or_else(|| Element::new("document").into(), Into::into)
    }
}

fn element_for_tag(tag: &Tag<'_>) -> Element {
    match tag {
        Tag::Paragraph => Element::new("paragraph"),
        Tag::Heading { level, .. } => {
            Element::new("heading").with_attr("level", heading_level_to_num(*level))
        }
        Tag::BlockQuote(_) => Element::new("blockquote"),
        Tag::CodeBlock(kind) => {
            let el = Element::new("fence");
            match kind {
                CodeBlockKind::Fenced(info) if !info.is_empty() => {
                    let language = info.split_whitespace().next().unwrap_or_default();
                    if language.is_empty() {
                        el
                    } else {
                        el.with_attr("language", language)
                    }
                }
                _ => el,
            }
        }
        Tag::List(start) => {
            let el = Element::new("list").with_attr("ordered", start.is_some());
            match start {
                Some(n) => el.with_attr("start", *n),
                None => el,
            }
        }
        Tag::Item => Element::new("item"),
        Tag::Emphasis => Element::new("em"),
        Tag::Strong => Element::new("strong"),
        Tag::Strikethrough => Element::new("s"),
        Tag::Link {
            dest_url, title, ..
        } => {
            let el = Element::new("link").with_attr("href", dest_url.as_ref());
            if title.is_empty() {
                el
            } else {
                el.with_attr("title", title.as_ref())
            }
        }
        Tag::Image {
            dest_url, title, ..
        } => {
            let el = Element::new("image").with_attr("src", dest_url.as_ref());
            if title.is_empty() {
                el
            } else {
                el.with_attr("title", title.as_ref())
            }
        }
        // No counterpart in the console document model: children splice
        // into the enclosing element.
        Tag::FootnoteDefinition(_)
        | Tag::HtmlBlock
        | Tag::MetadataBlock(_)
        | Tag::DefinitionList
        | Tag::DefinitionListTitle
        | Tag::DefinitionListDefinition
        | Tag::Table(_)
        | Tag::TableHead
        | Tag::TableRow
        | Tag::TableCell
        | Tag::Superscript
        | Tag::Subscript => Element::new(PASSTHROUGH),
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u64 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn collect_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => out.push_str(&collect_text(&el.children)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Element {
        match CmarkParser::new().parse(source) {
            Node::Element(el) => el,
            Node::Text(t) => panic!("expected document root, got text {t:?}"),
        }
    }

    fn child_element<'a>(el: &'a Element, idx: usize) -> &'a Element {
        match &el.children[idx] {
            Node::Element(child) => child,
            Node::Text(t) => panic!("expected element child, got text {t:?}"),
        }
    }

    #[test]
    fn test_parse_paragraph_with_inline() {
        let doc = parse("Deploys are **rolling** now.");
        assert_eq!(doc.name, "document");
        assert_eq!(doc.children.len(), 1);

        let para = child_element(&doc, 0);
        assert_eq!(para.name, "paragraph");
        assert_eq!(para.children[0], Node::text("Deploys are "));
        let strong = child_element(para, 1);
        assert_eq!(strong.name, "strong");
        assert_eq!(strong.children, vec![Node::text("rolling")]);
        assert_eq!(para.children[2], Node::text(" now."));
    }

    #[test]
    fn test_parse_heading_level() {
        let doc = parse("## Clusters");
        let heading = child_element(&doc, 0);
        assert_eq!(heading.name, "heading");
        assert_eq!(
            heading.attributes.get("level").and_then(serde_json::Value::as_u64),
            Some(2)
        );
        assert_eq!(heading.children, vec![Node::text("Clusters")]);
    }

    #[test]
    fn test_parse_inline_image_in_paragraph() {
        let doc = parse("before ![topology](net.png) after");
        let para = child_element(&doc, 0);
        assert_eq!(para.children.len(), 3);

        let image = child_element(para, 1);
        assert_eq!(image.name, "image");
        assert_eq!(image.attr_str("src"), Some("net.png"));
        assert_eq!(image.attr_str("alt"), Some("topology"));
        assert!(image.children.is_empty());
    }

    #[test]
    fn test_parse_image_without_alt() {
        let doc = parse("![](net.png)");
        let para = child_element(&doc, 0);
        let image = child_element(para, 0);
        assert_eq!(image.attr_str("src"), Some("net.png"));
        assert_eq!(image.attr_str("alt"), None);
    }

    #[test]
    fn test_parse_link_with_title() {
        let doc = parse(r#"[docs](https://example.com "Console docs")"#);
        let para = child_element(&doc, 0);
        let link = child_element(para, 0);
        assert_eq!(link.name, "link");
        assert_eq!(link.attr_str("href"), Some("https://example.com"));
        assert_eq!(link.attr_str("title"), Some("Console docs"));
    }

    #[test]
    fn test_parse_fenced_code_block() {
        let doc = parse("```yaml\nreplicas: 3\n```");
        let fence = child_element(&doc, 0);
        assert_eq!(fence.name, "fence");
        assert_eq!(fence.attr_str("language"), Some("yaml"));
        assert_eq!(fence.children, vec![Node::text("replicas: 3\n")]);
    }

    #[test]
    fn test_parse_lists() {
        let doc = parse("- one\n- two");
        let list = child_element(&doc, 0);
        assert_eq!(list.name, "list");
        assert_eq!(
            list.attributes.get("ordered").and_then(serde_json::Value::as_bool),
            Some(false)
        );
        assert_eq!(list.children.len(), 2);
        assert_eq!(child_element(list, 0).name, "item");
    }

    #[test]
    fn test_parse_inline_code() {
        let doc = parse("run `kubectl get pods`");
        let para = child_element(&doc, 0);
        let code = child_element(para, 1);
        assert_eq!(code.name, "code");
        assert_eq!(code.children, vec![Node::text("kubectl get pods")]);
    }

    #[test]
    fn test_parse_softbreak_becomes_space() {
        let doc = parse("line one\nline two");
        let para = child_element(&doc, 0);
        assert_eq!(
            para.children,
            vec![Node::text("line one"), Node::text(" "), Node::text("line two")]
        );
    }

    #[test]
    fn test_parse_raw_html_skipped() {
        let doc = parse("<div>raw</div>");
        // HtmlBlock is transparent and its Html events are dropped.
        assert!(doc.children.is_empty());
    }

    #[test]
    fn test_parse_empty_source() {
        let doc = parse("");
        assert_eq!(doc.name, "document");
        assert!(doc.children.is_empty());
    }
}
