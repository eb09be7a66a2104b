//! Keyed query responses and the "load more" trigger.
//!
//! List queries return their connection nested under a named root key
//! (`{"audits": {"edges": [...], "pageInfo": {...}}}`). [`QueryData`] models
//! that container and knows how to fold a fresh response into the
//! accumulated one; [`fetch_more_and_extend`] drives the fold from a
//! caller-supplied fetch capability.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::connection::{Connection, extend_connection};

/// Arguments handed to the fetch collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchArgs {
    /// Cursor to resume after; `None` requests the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Query-response container holding connections at named root keys.
///
/// Deserializes directly from a GraphQL query response whose root fields
/// are all connections of the same node type. Accumulated state for an
/// infinite-scroll view is a `QueryData` that grows as pages fold in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryData<T> {
    connections: BTreeMap<String, Connection<T>>,
}

impl<T> Default for QueryData<T> {
    fn default() -> Self {
        Self {
            connections: BTreeMap::new(),
        }
    }
}

impl<T> QueryData<T> {
    /// Create an empty response container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a connection at a root key, replacing any existing one.
    #[must_use]
    pub fn with_connection(mut self, key: impl Into<String>, connection: Connection<T>) -> Self {
        self.connections.insert(key.into(), connection);
        self
    }

    /// Connection stored at `key`, if any.
    #[must_use]
    pub fn connection(&self, key: &str) -> Option<&Connection<T>> {
        self.connections.get(key)
    }

    /// Fold the connection at `key` in a fresh response into this one.
    ///
    /// The stored connection becomes `extend_connection(stored, incoming)`.
    /// A response without the key is a no-op; a missing stored connection
    /// degrades to the incoming one unchanged.
    pub fn extend(&mut self, key: &str, mut next: Self) {
        let Some(incoming) = next.connections.remove(key) else {
            return;
        };

        let prev = self.connections.remove(key);
        self.connections
            .insert(key.to_owned(), extend_connection(prev, incoming));
    }
}

/// Fetch the next page for the connection at `key` and fold it in.
///
/// Short-circuits to `Ok(false)` without invoking `fetch` when the stored
/// connection is absent or its `end_cursor` is missing or empty — a terminal
/// page never triggers another request, so a misbehaving caller loop cannot
/// fetch forever. Otherwise the capability is invoked with the cursor and
/// the resulting response is folded into `data`; returns `Ok(true)`.
///
/// Fetch errors propagate unchanged.
///
/// Concurrent triggers are not de-duplicated: two calls racing on the same
/// accumulated state each fetch and each merge, and the final edge order
/// depends on resolution order. Debouncing belongs to the caller.
pub async fn fetch_more_and_extend<T, F, Fut, E>(
    data: &mut QueryData<T>,
    key: &str,
    fetch: F,
) -> Result<bool, E>
where
    F: FnOnce(FetchArgs) -> Fut,
    Fut: Future<Output = Result<QueryData<T>, E>>,
{
    let Some(cursor) = data
        .connection(key)
        .and_then(|c| c.page_info.next_cursor())
        .map(str::to_owned)
    else {
        return Ok(false);
    };

    tracing::debug!(key, after = %cursor, "fetching next connection page");

    let next = fetch(FetchArgs {
        after: Some(cursor),
    })
    .await?;

    data.extend(key, next);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Edge, PageInfo};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn page(nodes: &[&str], end_cursor: Option<&str>) -> Connection<String> {
        Connection {
            edges: nodes
                .iter()
                .map(|n| Edge {
                    node: (*n).to_owned(),
                    cursor: (*n).to_owned(),
                })
                .collect(),
            page_info: PageInfo {
                has_next_page: end_cursor.is_some(),
                end_cursor: end_cursor.map(str::to_owned),
                ..Default::default()
            },
        }
    }

    fn nodes(data: &QueryData<String>, key: &str) -> Vec<String> {
        data.connection(key)
            .map(|c| c.nodes().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_extend_at_key() {
        let mut data = QueryData::new().with_connection("audits", page(&["a", "b"], Some("b")));
        let next = QueryData::new().with_connection("audits", page(&["c"], None));

        data.extend("audits", next);

        assert_eq!(nodes(&data, "audits"), ["a", "b", "c"]);
        let info = &data.connection("audits").unwrap().page_info;
        assert_eq!(info.end_cursor, None);
    }

    #[test]
    fn test_extend_missing_incoming_key_is_noop() {
        let mut data = QueryData::new().with_connection("audits", page(&["a"], Some("a")));
        data.extend("audits", QueryData::new());
        assert_eq!(nodes(&data, "audits"), ["a"]);
    }

    #[test]
    fn test_extend_missing_stored_key_takes_incoming() {
        let mut data: QueryData<String> = QueryData::new();
        let next = QueryData::new().with_connection("audits", page(&["a"], Some("a")));

        data.extend("audits", next);
        assert_eq!(nodes(&data, "audits"), ["a"]);
    }

    #[test]
    fn test_extend_leaves_other_keys_untouched() {
        let mut data = QueryData::new()
            .with_connection("audits", page(&["a"], Some("a")))
            .with_connection("builds", page(&["x"], Some("x")));
        let next = QueryData::new().with_connection("audits", page(&["b"], None));

        data.extend("audits", next);

        assert_eq!(nodes(&data, "audits"), ["a", "b"]);
        assert_eq!(nodes(&data, "builds"), ["x"]);
    }

    #[test]
    fn test_query_data_deserializes_keyed_response() {
        let json = r#"{
            "audits": {
                "edges": [{ "node": "login", "cursor": "YQ==" }],
                "pageInfo": { "hasNextPage": true, "endCursor": "YQ==" }
            }
        }"#;

        let data: QueryData<String> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes(&data, "audits"), ["login"]);
    }

    #[tokio::test]
    async fn test_fetch_more_appends_next_page() {
        let mut data = QueryData::new().with_connection("audits", page(&["a"], Some("cur-a")));
        let seen_after = Cell::new(None::<String>);

        let fetched = fetch_more_and_extend(&mut data, "audits", |args| {
            seen_after.set(args.after);
            async { Ok::<_, String>(QueryData::new().with_connection("audits", page(&["b"], None))) }
        })
        .await
        .unwrap();

        assert!(fetched);
        assert_eq!(seen_after.take(), Some("cur-a".to_owned()));
        assert_eq!(nodes(&data, "audits"), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_fetch_more_terminal_page_never_fetches() {
        let mut data = QueryData::new().with_connection("audits", page(&["a"], None));
        let invoked = Cell::new(false);

        let fetched = fetch_more_and_extend(&mut data, "audits", |_args| {
            invoked.set(true);
            async { Ok::<_, String>(QueryData::new()) }
        })
        .await
        .unwrap();

        assert!(!fetched);
        assert!(!invoked.get());
        assert_eq!(nodes(&data, "audits"), ["a"]);
    }

    #[tokio::test]
    async fn test_fetch_more_empty_cursor_never_fetches() {
        let mut data = QueryData::new().with_connection("audits", page(&["a"], Some("")));
        let invoked = Cell::new(false);

        let fetched = fetch_more_and_extend(&mut data, "audits", |_args| {
            invoked.set(true);
            async { Ok::<_, String>(QueryData::new()) }
        })
        .await
        .unwrap();

        assert!(!fetched);
        assert!(!invoked.get());
    }

    #[tokio::test]
    async fn test_fetch_more_missing_key_never_fetches() {
        let mut data: QueryData<String> = QueryData::new();
        let invoked = Cell::new(false);

        let fetched = fetch_more_and_extend(&mut data, "audits", |_args| {
            invoked.set(true);
            async { Ok::<_, String>(QueryData::new()) }
        })
        .await
        .unwrap();

        assert!(!fetched);
        assert!(!invoked.get());
    }

    #[tokio::test]
    async fn test_fetch_more_propagates_errors() {
        let mut data = QueryData::new().with_connection("audits", page(&["a"], Some("cur-a")));

        let result =
            fetch_more_and_extend(&mut data, "audits", |_args| async { Err("boom") }).await;

        assert_eq!(result, Err("boom"));
        // Accumulated state is untouched on failure.
        assert_eq!(nodes(&data, "audits"), ["a"]);
    }
}
