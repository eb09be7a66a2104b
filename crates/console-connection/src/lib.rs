//! Cursor-paginated connection merging for the console data layer.
//!
//! GraphQL-convention list queries return pages wrapped in a [`Connection`]:
//! an ordered sequence of edges plus a [`PageInfo`] cursor record. Infinite
//! scroll accumulates pages by folding each freshly fetched page into the
//! previously accumulated connection. This crate provides:
//!
//! - [`extend_connection`]: the pure merge of two connection snapshots
//! - [`QueryData`]: a query-response container holding connections at named
//!   root keys
//! - [`fetch_more_and_extend`]: the async trigger that requests the next
//!   page (if one exists) and folds it in
//!
//! # Example
//!
//! ```
//! use console_connection::{Connection, Edge, PageInfo, extend_connection};
//!
//! let first = Connection {
//!     edges: vec![Edge { node: "a", cursor: "c1".into() }],
//!     page_info: PageInfo { has_next_page: true, end_cursor: Some("c1".into()), ..Default::default() },
//! };
//! let second = Connection {
//!     edges: vec![Edge { node: "b", cursor: "c2".into() }],
//!     page_info: PageInfo { has_next_page: false, end_cursor: Some("c2".into()), ..Default::default() },
//! };
//!
//! let merged = extend_connection(Some(first), second);
//! assert_eq!(merged.edges.len(), 2);
//! assert!(!merged.page_info.has_next_page);
//! ```

mod connection;
mod query;

pub use connection::{Connection, Edge, PageInfo, extend_connection};
pub use query::{FetchArgs, QueryData, fetch_more_and_extend};
