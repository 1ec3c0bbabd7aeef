//! Core types for server-rendered blocks.
//!
//! These types cross the boundary between the host and a block's render
//! callback. Everything is plain data; the host owns the underlying records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::escape::intval;
use crate::host::RequestContext;

/// Identifier of a content item. `0` means "no item".
pub type ItemId = u64;

/// Name of the request parameter echoed by the block.
pub const POST_ID_PARAM: &str = "post_id";

/// A registered content type (e.g. `post`, `page`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeDescriptor {
    /// Stable machine name.
    pub slug: String,

    /// Human-readable plural name (e.g. "Posts").
    pub display_name: String,

    /// Whether the type is publicly queryable.
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

impl ContentTypeDescriptor {
    pub fn new(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            display_name: display_name.into(),
            public: true,
        }
    }

    /// Mark the type as internal (not returned by public listings).
    pub fn internal(mut self) -> Self {
        self.public = false;
        self
    }
}

/// Publication status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Publish,
    Future,
    Draft,
    Pending,
    Private,
    Trash,
    #[serde(rename = "auto-draft")]
    AutoDraft,
    Inherit,
}

impl ItemStatus {
    /// Whether a query for "any" status matches this status.
    ///
    /// Trashed items and auto-drafts are only found when asked for by name.
    pub fn included_in_any(self) -> bool {
        !matches!(self, ItemStatus::Trash | ItemStatus::AutoDraft)
    }
}

/// Per-status item counts for one content type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts(pub BTreeMap<ItemStatus, u64>);

impl StatusCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` items under `status`.
    pub fn add(&mut self, status: ItemStatus, n: u64) {
        let slot = self.0.entry(status).or_insert(0);
        *slot = slot.saturating_add(n);
    }

    /// Count for a single status (0 when absent).
    pub fn get(&self, status: ItemStatus) -> u64 {
        self.0.get(&status).copied().unwrap_or(0)
    }

    /// Number of items across every status.
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

impl FromIterator<(ItemStatus, u64)> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = (ItemStatus, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (status, n) in iter {
            counts.add(status, n);
        }
        counts
    }
}

/// A search hit returned by the content repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
}

impl Item {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Per-item metadata: each key holds a list of string values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub BTreeMap<String, Vec<String>>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Values stored under `key`.
    pub fn values(&self, key: &str) -> &[String] {
        self.0.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// True when any value under any key equals `needle` exactly.
    pub fn contains_value(&self, needle: &str) -> bool {
        self.0.values().flatten().any(|v| v == needle)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Block attributes after filtering against the block's declared schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockAttributes(pub Map<String, Value>);

impl BlockAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String attribute, or `""` when absent or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.0.get(key).and_then(|v| v.as_str()).unwrap_or("")
    }

    /// The editor-supplied extra CSS class.
    pub fn class_name(&self) -> &str {
        self.get_str("className")
    }
}

/// The block instance being rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInstance {
    /// Registered block name (e.g. `xwp/site-counts`).
    pub name: String,
}

impl BlockInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Per-render values taken from the host and the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Item the host is rendering (0 outside an item context).
    pub host_item_id: ItemId,

    /// `post_id` request parameter, coerced to an integer.
    pub query_string_post_id: u64,
}

impl RenderContext {
    pub fn new(host_item_id: Option<ItemId>, request: &dyn RequestContext) -> Self {
        Self {
            host_item_id: host_item_id.unwrap_or(0),
            query_string_post_id: intval(request.query_param(POST_ID_PARAM)),
        }
    }
}
