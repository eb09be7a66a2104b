//! Render stage: renderable tree to final output.
//!
//! A [`TagRegistry`] maps the tag names produced by the transform stage to
//! [`TagRenderer`] implementations that write into a `String`. The registry
//! ships with an HTML implementation covering the base config's tags;
//! embedders swap in their own renderers per tag.

use std::collections::HashMap;
use std::fmt::Write;

use serde_json::Value;

use crate::ast::Attributes;
use crate::transform::{Renderable, tags};

/// Error returned when rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A tag produced by the transform stage has no registry entry
    /// (strict mode only).
    #[error("no renderer registered for tag `{0}`")]
    UnknownTag(String),
}

/// Result of rendering a transformed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedDoc {
    /// Rendered HTML content.
    pub html: String,
    /// Warnings generated during rendering (e.g., unknown tags in lenient
    /// mode).
    pub warnings: Vec<String>,
}

/// Renders one tag kind, wrapping already-rendered children.
pub trait TagRenderer {
    /// Write the tag's output. `children` holds the rendered output of the
    /// node's children, in document order.
    fn render(&self, attrs: &Attributes, children: &str, out: &mut String);
}

impl<F> TagRenderer for F
where
    F: Fn(&Attributes, &str, &mut String),
{
    fn render(&self, attrs: &Attributes, children: &str, out: &mut String) {
        self(attrs, children, out);
    }
}

/// Registry mapping tag names to concrete renderers.
///
/// Every tag name produced by the transform stage needs an entry. A missing
/// entry is a tree-shape contract violation: lenient mode (the default)
/// logs a warning and passes the children through; [`strict`](Self::strict)
/// mode surfaces it as [`RenderError::UnknownTag`].
#[derive(Default)]
pub struct TagRegistry {
    renderers: HashMap<String, Box<dyn TagRenderer>>,
    strict: bool,
}

impl TagRegistry {
    /// Create an empty, lenient registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with HTML renderers for all base-config tags.
    #[must_use]
    pub fn html() -> Self {
        Self::new()
            .with_tag(tags::PARAGRAPH, html_paragraph)
            .with_tag(tags::HEADING, html_heading)
            .with_tag(tags::IMAGE, html_image)
            .with_tag(tags::LINK, html_link)
            .with_tag(tags::STRONG, wrap("strong"))
            .with_tag(tags::EMPHASIS, wrap("em"))
            .with_tag(tags::STRIKE, wrap("s"))
            .with_tag(tags::CODE, wrap("code"))
            .with_tag(tags::FENCE, html_fence)
            .with_tag(tags::LIST, html_list)
            .with_tag(tags::ITEM, wrap("li"))
            .with_tag(tags::BLOCKQUOTE, wrap("blockquote"))
            .with_tag(tags::HR, |_: &Attributes, _: &str, out: &mut String| {
                out.push_str("<hr>");
            })
            .with_tag(tags::BREAK, |_: &Attributes, _: &str, out: &mut String| {
                out.push_str("<br>");
            })
    }

    /// Surface unknown tags as errors instead of warnings.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Register or replace the renderer for a tag name.
    #[must_use]
    pub fn with_tag<R: TagRenderer + 'static>(mut self, name: impl Into<String>, renderer: R) -> Self {
        self.renderers.insert(name.into(), Box::new(renderer));
        self
    }

    /// Render a transformed document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTag`] in strict mode when a tag has no
    /// registry entry.
    pub fn render_tree(&self, nodes: &[Renderable]) -> Result<RenderedDoc, RenderError> {
        let mut doc = RenderedDoc::default();
        let mut html = String::with_capacity(256);
        for node in nodes {
            self.render_node(node, &mut html, &mut doc.warnings)?;
        }
        doc.html = html;
        Ok(doc)
    }

    fn render_node(
        &self,
        node: &Renderable,
        out: &mut String,
        warnings: &mut Vec<String>,
    ) -> Result<(), RenderError> {
        match node {
            Renderable::Text(text) => {
                out.push_str(&escape_html(text));
                Ok(())
            }
            Renderable::Tag(tag) => {
                let mut children = String::new();
                for child in &tag.children {
                    self.render_node(child, &mut children, warnings)?;
                }

                match self.renderers.get(&tag.name) {
                    Some(renderer) => renderer.render(&tag.attributes, &children, out),
                    None if self.strict => return Err(RenderError::UnknownTag(tag.name.clone())),
                    None => {
                        tracing::warn!(tag = %tag.name, "no renderer registered, passing children through");
                        warnings.push(format!("no renderer registered for tag `{}`", tag.name));
                        out.push_str(&children);
                    }
                }
                Ok(())
            }
        }
    }
}

/// Escape text for HTML output.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn attr_str<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a str> {
    attrs.get(key).and_then(Value::as_str)
}

/// Renderer wrapping children in a fixed element with no attributes.
fn wrap(element: &'static str) -> impl Fn(&Attributes, &str, &mut String) {
    move |_attrs, children, out| {
        write!(out, "<{element}>{children}</{element}>").unwrap();
    }
}

fn html_paragraph(_attrs: &Attributes, children: &str, out: &mut String) {
    write!(out, "<p>{children}</p>").unwrap();
}

fn html_heading(attrs: &Attributes, children: &str, out: &mut String) {
    let level = attrs
        .get("level")
        .and_then(Value::as_u64)
        .filter(|l| (1..=6).contains(l))
        .unwrap_or(1);
    write!(out, "<h{level}>{children}</h{level}>").unwrap();
}

fn html_image(attrs: &Attributes, _children: &str, out: &mut String) {
    let src = attr_str(attrs, "src").unwrap_or_default();
    let alt = attr_str(attrs, "alt").unwrap_or_default();
    let title_attr = match attr_str(attrs, "title") {
        Some(title) if !title.is_empty() => format!(r#" title="{}""#, escape_html(title)),
        _ => String::new(),
    };
    write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}">"#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}

fn html_link(attrs: &Attributes, children: &str, out: &mut String) {
    let href = attr_str(attrs, "href").unwrap_or_default();
    write!(out, r#"<a href="{}">{children}</a>"#, escape_html(href)).unwrap();
}

fn html_fence(attrs: &Attributes, children: &str, out: &mut String) {
    match attr_str(attrs, "language") {
        Some(lang) if !lang.is_empty() => write!(
            out,
            r#"<pre><code class="language-{}">{children}</code></pre>"#,
            escape_html(lang)
        )
        .unwrap(),
        _ => write!(out, "<pre><code>{children}</code></pre>").unwrap(),
    }
}

fn html_list(attrs: &Attributes, children: &str, out: &mut String) {
    let ordered = attrs.get("ordered").and_then(Value::as_bool).unwrap_or(false);
    if ordered {
        match attrs.get("start").and_then(Value::as_u64) {
            Some(start) if start != 1 => {
                write!(out, r#"<ol start="{start}">{children}</ol>"#).unwrap();
            }
            _ => write!(out, "<ol>{children}</ol>").unwrap(),
        }
    } else {
        write!(out, "<ul>{children}</ul>").unwrap();
    }
}
