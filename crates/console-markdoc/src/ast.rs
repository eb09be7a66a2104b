//! Markup AST produced by the parse stage.
//!
//! A tree of named elements with scalar attributes and ordered children,
//! prior to any presentation-specific transformation. Child order is
//! document order; nothing downstream may invent unordered output.

use std::collections::BTreeMap;

use serde_json::Value;

/// Attribute map for an element (string keys to scalar values).
pub type Attributes = BTreeMap<String, Value>;

/// One node in the markup AST: an element or a run of text.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Named element with attributes and children.
    Element(Element),
    /// Literal text content.
    Text(String),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// True for a text node that is empty or whitespace only.
    #[must_use]
    pub fn is_blank_text(&self) -> bool {
        match self {
            Self::Text(t) => t.trim().is_empty(),
            Self::Element(_) => false,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Named element with an attribute map and ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Node type name (e.g. "document", "paragraph", "image").
    pub name: String,
    /// Scalar attributes (e.g. `src`, `level`).
    pub attributes: Attributes,
    /// Ordered children, document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append multiple children in order.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// String attribute value, if present and a string.
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}
