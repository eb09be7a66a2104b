//! Connection wire types and the snapshot merge.
//!
//! Field names follow the GraphQL JSON convention (`camelCase` on the wire),
//! so these types deserialize directly from query responses.

use serde::{Deserialize, Serialize};

/// Cursor state for a paginated list.
///
/// An absent (or empty) `end_cursor` means the list is exhausted; it is
/// treated as "no further pages", never as an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether the server reports more pages after this one.
    #[serde(default)]
    pub has_next_page: bool,
    /// Opaque cursor of the last edge in this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
    /// Whether the server reports pages before this one.
    ///
    /// Present on the wire convention; ignored by the merge logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_previous_page: Option<bool>,
    /// Opaque cursor of the first edge in this page.
    ///
    /// Present on the wire convention; ignored by the merge logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor to request the next page with, if one exists.
    ///
    /// An empty-string cursor is terminal, same as an absent one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// A single list entry paired with its position cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The list entry itself.
    pub node: T,
    /// Opaque cursor marking this entry's position in the sequence.
    #[serde(default)]
    pub cursor: String,
}

/// Cursor-paginated list wrapper.
///
/// `edges` order reflects server-returned order. Merging never reorders
/// existing edges, only appends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    /// Ordered edges, oldest accumulated page first.
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
    /// Cursor state of the most recently fetched page.
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Iterate over the nodes in edge order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    /// Number of accumulated edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the connection holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Merge a freshly fetched page into a previously accumulated connection.
///
/// Both arguments are immutable snapshots; the result is a new owned value
/// that replaces the caller's accumulated reference.
///
/// - `prev` absent: `next` is returned unchanged.
/// - Otherwise the result's edges are `prev.edges` followed by `next.edges`,
///   both in their original order.
/// - The result's `page_info` is always `next.page_info` — the latest page
///   determines whether further pages exist.
///
/// Edges are **not** de-duplicated. If the server returns overlapping pages
/// (e.g. the list mutated between fetches), duplicates appear in the merged
/// result; filtering them is the caller's responsibility.
#[must_use]
pub fn extend_connection<T>(prev: Option<Connection<T>>, next: Connection<T>) -> Connection<T> {
    let Some(prev) = prev else {
        return next;
    };

    let mut edges = prev.edges;
    edges.extend(next.edges);

    Connection {
        edges,
        page_info: next.page_info,
    }
}
