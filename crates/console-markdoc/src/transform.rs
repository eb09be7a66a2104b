//! Transform stage: markup AST to renderable tree.
//!
//! Driven by a [`TransformConfig`] mapping AST node names to render-target
//! schemas. Most nodes map 1:1 — transformed children wrapped in a tag named
//! after the schema's render target. The paragraph node carries the one
//! structural rewrite: the host environment's paragraph container must never
//! contain an image, so a paragraph splits around image children while
//! preserving document order.

use std::collections::HashMap;

use crate::ast::{Attributes, Element, Node};

/// Render-target tag names produced by the base config.
pub mod tags {
    pub const BLOCKQUOTE: &str = "Blockquote";
    pub const BREAK: &str = "Break";
    pub const CODE: &str = "Code";
    pub const EMPHASIS: &str = "Emphasis";
    pub const FENCE: &str = "Fence";
    pub const HEADING: &str = "Heading";
    pub const HR: &str = "Hr";
    pub const IMAGE: &str = "Image";
    pub const ITEM: &str = "Item";
    pub const LINK: &str = "Link";
    pub const LIST: &str = "List";
    pub const PARAGRAPH: &str = "Paragraph";
    pub const STRIKE: &str = "Strike";
    pub const STRONG: &str = "Strong";
}

/// One node in the renderable tree: a tagged node or a run of text.
#[derive(Clone, Debug, PartialEq)]
pub enum Renderable {
    /// Node tagged with a render-target name for the registry.
    Tag(TagNode),
    /// Literal text content.
    Text(String),
}

impl Renderable {
    /// Create a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// True when tagged with the given render-target name.
    #[must_use]
    pub fn is_tag(&self, name: &str) -> bool {
        matches!(self, Self::Tag(tag) if tag.name == name)
    }

    fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(t) if t.trim().is_empty())
    }
}

/// Tagged node in the renderable tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TagNode {
    /// Render-target name looked up in the registry.
    pub name: String,
    /// Attributes carried over from the source node.
    pub attributes: Attributes,
    /// Ordered children, document order.
    pub children: Vec<Renderable>,
}

impl TagNode {
    /// Create a tag node with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }
}

/// Output of transforming one AST node: a single renderable or an ordered
/// sequence of siblings (the paragraph rewrite produces a sequence).
#[derive(Clone, Debug, PartialEq)]
pub enum Transformed {
    One(Renderable),
    Many(Vec<Renderable>),
}

impl Transformed {
    /// Flatten into an ordered sequence.
    #[must_use]
    pub fn into_vec(self) -> Vec<Renderable> {
        match self {
            Self::One(node) => vec![node],
            Self::Many(nodes) => nodes,
        }
    }
}

/// Custom transform for a node type, overriding the default wrap-children
/// behavior.
pub type NodeTransform = fn(&Element, &TransformConfig) -> Transformed;

/// Schema describing how one AST node type transforms.
#[derive(Clone, Debug, Default)]
pub struct NodeSchema {
    /// Render-target tag name. `None` splices transformed children into
    /// the parent without a wrapping tag.
    pub render: Option<String>,
    /// Custom transform taking precedence over the default.
    pub transform: Option<NodeTransform>,
}

impl NodeSchema {
    /// Schema rendering to a named tag with the default transform.
    #[must_use]
    pub fn renders(target: impl Into<String>) -> Self {
        Self {
            render: Some(target.into()),
            transform: None,
        }
    }

    /// Schema splicing children into the parent (no wrapping tag).
    #[must_use]
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Attach a custom transform.
    #[must_use]
    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Mapping of AST node names to schemas.
///
/// AST node names with no schema behave like [`NodeSchema::passthrough`]:
/// their children transform and splice into the parent.
#[derive(Clone, Debug, Default)]
pub struct TransformConfig {
    nodes: HashMap<String, NodeSchema>,
}

impl TransformConfig {
    /// Create an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config covering the node names produced by the default parser,
    /// with the paragraph rewrite installed.
    #[must_use]
    pub fn base() -> Self {
        Self::new()
            .with_node("document", NodeSchema::passthrough())
            .with_node(
                "paragraph",
                NodeSchema::renders(tags::PARAGRAPH).with_transform(paragraph_transform),
            )
            .with_node("heading", NodeSchema::renders(tags::HEADING))
            .with_node("image", NodeSchema::renders(tags::IMAGE))
            .with_node("link", NodeSchema::renders(tags::LINK))
            .with_node("strong", NodeSchema::renders(tags::STRONG))
            .with_node("em", NodeSchema::renders(tags::EMPHASIS))
            .with_node("s", NodeSchema::renders(tags::STRIKE))
            .with_node("code", NodeSchema::renders(tags::CODE))
            .with_node("fence", NodeSchema::renders(tags::FENCE))
            .with_node("list", NodeSchema::renders(tags::LIST))
            .with_node("item", NodeSchema::renders(tags::ITEM))
            .with_node("blockquote", NodeSchema::renders(tags::BLOCKQUOTE))
            .with_node("hr", NodeSchema::renders(tags::HR))
            .with_node("hardbreak", NodeSchema::renders(tags::BREAK))
    }

    /// Register or replace the schema for a node name.
    #[must_use]
    pub fn with_node(mut self, name: impl Into<String>, schema: NodeSchema) -> Self {
        self.nodes.insert(name.into(), schema);
        self
    }

    /// Schema for a node name, if registered.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&NodeSchema> {
        self.nodes.get(name)
    }
}

/// Transform one AST node into renderable output.
///
/// Text maps to text. An element consults its schema: a custom transform
/// wins; otherwise transformed children wrap in a tag named by the schema's
/// render target, or splice into the parent when there is none. Child order
/// is preserved throughout.
#[must_use]
pub fn transform(node: &Node, config: &TransformConfig) -> Transformed {
    match node {
        Node::Text(text) => Transformed::One(Renderable::text(text.clone())),
        Node::Element(el) => {
            if let Some(custom) = config.schema(&el.name).and_then(|s| s.transform) {
                return custom(el, config);
            }

            let children = transform_children(el, config);
            match config.schema(&el.name).and_then(|s| s.render.as_deref()) {
                Some(target) => Transformed::One(Renderable::Tag(TagNode {
                    name: target.to_owned(),
                    attributes: el.attributes.clone(),
                    children,
                })),
                None => Transformed::Many(children),
            }
        }
    }
}

/// Transform all children of an element, in order, flattening sequences.
fn transform_children(el: &Element, config: &TransformConfig) -> Vec<Renderable> {
    el.children
        .iter()
        .flat_map(|child| transform(child, config).into_vec())
        .collect()
}

/// Paragraph rewrite: split the paragraph around image children.
///
/// Children transform first. If none of them is an Image, the paragraph
/// stays whole: one tag wrapping all transformed children. Otherwise the
/// children fold into sibling runs: consecutive non-image children
/// accumulate, and each Image (or nested Paragraph) child flushes the
/// accumulated run as a synthetic Paragraph before emitting itself
/// directly. Whitespace-only text outside an open run is dropped rather
/// than flushed as an empty paragraph. Sibling order matches document
/// order; an Image never ends up inside a Paragraph.
fn paragraph_transform(el: &Element, config: &TransformConfig) -> Transformed {
    let children = transform_children(el, config);

    if !children.iter().any(|c| c.is_tag(tags::IMAGE)) {
        return Transformed::One(Renderable::Tag(TagNode {
            name: tags::PARAGRAPH.to_owned(),
            attributes: el.attributes.clone(),
            children,
        }));
    }

    let mut out = Vec::with_capacity(children.len());
    let mut run: Vec<Renderable> = Vec::new();

    for child in children {
        if child.is_tag(tags::IMAGE) || child.is_tag(tags::PARAGRAPH) {
            if !run.is_empty() {
                out.push(paragraph(std::mem::take(&mut run)));
            }
            out.push(child);
        } else if run.is_empty() && child.is_blank_text() {
            // Stray whitespace between block siblings: never opens a run,
            // never flushes as an empty paragraph.
        } else {
            run.push(child);
        }
    }

    if !run.is_empty() {
        out.push(paragraph(run));
    }

    Transformed::Many(out)
}

fn paragraph(children: Vec<Renderable>) -> Renderable {
    Renderable::Tag(TagNode {
        children,
        ..TagNode::new(tags::PARAGRAPH)
    })
}
