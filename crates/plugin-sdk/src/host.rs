//! Host collaborators consumed by block render callbacks.
//!
//! The host implements these traits over its own storage and request
//! handling; tests implement them in memory.

use std::collections::HashMap;

use tracing::debug;

use crate::error::RepositoryError;
use crate::query::QuerySpec;
use crate::types::{ContentTypeDescriptor, Item, ItemId, Metadata, StatusCounts};

/// Read access to the site's content, treated as a snapshot for one render.
pub trait ContentRepository {
    /// Public content types, in the repository's own order.
    fn public_content_types(&self) -> Result<Vec<ContentTypeDescriptor>, RepositoryError>;

    /// Item counts for one content type, broken down by status.
    fn count_by_status(&self, slug: &str) -> Result<StatusCounts, RepositoryError>;

    /// Items matching `spec`, ordered and limited as it requests.
    fn search(&self, spec: &QuerySpec) -> Result<Vec<Item>, RepositoryError>;

    /// Metadata attached to an item.
    fn item_metadata(&self, id: ItemId) -> Result<Metadata, RepositoryError>;

    /// The item currently being rendered, if any.
    fn current_item_id(&self) -> Option<ItemId>;
}

/// Access to the current request.
pub trait RequestContext {
    /// Raw value of a query-string parameter.
    fn query_param(&self, name: &str) -> Option<&str>;
}

/// Query-string parameters of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// `+` decodes to a space and `%XX` sequences are percent-decoded. The
    /// first occurrence of a key wins; pairs that do not decode to UTF-8 are
    /// skipped.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut params = HashMap::new();

        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(key), decode_component(value))
            else {
                debug!(pair, "skipping undecodable query pair");
                continue;
            };
            params.entry(key).or_insert(value);
        }

        Self { params }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl RequestContext for QueryParams {
    fn query_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }
}

fn decode_component(s: &str) -> Option<String> {
    let spaced = s.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|c| c.into_owned())
}
