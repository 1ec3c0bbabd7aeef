//! Item search specification.
//!
//! A `QuerySpec` is handed to [`ContentRepository::search`](crate::host::ContentRepository::search).
//! Every populated criterion must hold for an item to match:
//! - item type membership and publication status
//! - publication hour-of-day range (inclusive)
//! - tag slugs (all required) and a category addressed by name
//! - explicit identifier exclusions

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, ItemStatus};

/// Publication status criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every status the host treats as "any" (see [`ItemStatus::included_in_any`]).
    #[default]
    Any,
    /// Only the listed statuses.
    Only(Vec<ItemStatus>),
}

impl StatusFilter {
    pub fn matches(&self, status: ItemStatus) -> bool {
        match self {
            StatusFilter::Any => status.included_in_any(),
            StatusFilter::Only(list) => list.contains(&status),
        }
    }
}

/// Inclusive hour-of-day range (0-23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour <= self.end
    }
}

/// Category criterion, addressed by term name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub name: String,

    /// Also match items filed under descendants of the category.
    #[serde(default)]
    pub include_children: bool,
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrder {
    /// Publication date, newest first.
    #[default]
    NewestFirst,
    /// Publication date, oldest first.
    OldestFirst,
}

/// Search criteria for content items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Content type slugs; empty matches every type.
    #[serde(default)]
    pub item_types: Vec<String>,

    #[serde(default)]
    pub status: StatusFilter,

    pub hour_range: Option<HourRange>,

    /// Tag slugs; an item must carry all of them.
    #[serde(default)]
    pub tag_slugs: Vec<String>,

    pub category: Option<CategoryFilter>,

    #[serde(default)]
    pub exclude_ids: Vec<ItemId>,

    /// Maximum number of hits; `None` returns everything.
    pub limit: Option<usize>,

    #[serde(default)]
    pub order: QueryOrder,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn hours(mut self, start: u32, end: u32) -> Self {
        self.hour_range = Some(HourRange::new(start, end));
        self
    }

    pub fn tag(mut self, slug: impl Into<String>) -> Self {
        self.tag_slugs.push(slug.into());
        self
    }

    pub fn category(mut self, name: impl Into<String>, include_children: bool) -> Self {
        self.category = Some(CategoryFilter {
            name: name.into(),
            include_children,
        });
        self
    }

    pub fn exclude(mut self, id: ItemId) -> Self {
        self.exclude_ids.push(id);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn order(mut self, order: QueryOrder) -> Self {
        self.order = order;
        self
    }

    /// Whether `item_type` passes the type criterion.
    pub fn matches_type(&self, item_type: &str) -> bool {
        self.item_types.is_empty() || self.item_types.iter().any(|t| t == item_type)
    }

    pub fn is_excluded(&self, id: ItemId) -> bool {
        self.exclude_ids.contains(&id)
    }
}
