//! Markup parse/transform/render pipeline with a pluggable tag registry.
//!
//! Documentation fields in the console (runbooks, changelogs, app readmes)
//! arrive as raw markup and go through three ordered, pure stages:
//!
//! 1. **Parse**: the [`MarkupParser`] seam turns source text into a [`Node`]
//!    tree. The default [`CmarkParser`] is backed by `pulldown-cmark`.
//! 2. **Transform**: [`transform`] rewrites the tree into [`Renderable`]
//!    nodes tagged with render-target names, driven by a [`TransformConfig`].
//!    The one structural rewrite is the paragraph transform: images are
//!    never left nested inside a paragraph; the paragraph splits around
//!    them, preserving document order.
//! 3. **Render**: a [`TagRegistry`] maps tag names to [`TagRenderer`]
//!    implementations that write final output.
//!
//! # Example
//!
//! ```
//! use console_markdoc::MarkdocPipeline;
//!
//! let pipeline = MarkdocPipeline::new();
//! let doc = pipeline.render(Some("**Deploys** are rolling.")).unwrap().unwrap();
//! assert_eq!(doc.html, "<p><strong>Deploys</strong> are rolling.</p>");
//!
//! // Absent content short-circuits: no parse, no output.
//! assert!(pipeline.render(None).unwrap().is_none());
//! ```

mod ast;
mod parse;
mod pipeline;
mod render;
mod transform;

pub use ast::{Attributes, Element, Node};
pub use parse::{CmarkParser, MarkupParser};
pub use pipeline::MarkdocPipeline;
pub use render::{RenderError, RenderedDoc, TagRegistry, TagRenderer, escape_html};
pub use transform::{
    NodeSchema, NodeTransform, Renderable, TagNode, TransformConfig, Transformed, tags, transform,
};
