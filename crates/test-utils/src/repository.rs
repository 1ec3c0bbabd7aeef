//! In-memory content repository.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::Timelike;
use site_counts_sdk::error::RepositoryError;
use site_counts_sdk::host::ContentRepository;
use site_counts_sdk::query::{QueryOrder, QuerySpec};
use site_counts_sdk::types::{ContentTypeDescriptor, Item, ItemId, Metadata, StatusCounts};
use tracing::debug;

use crate::TestItem;

/// Content repository holding fixtures in memory.
///
/// Implements every [`QuerySpec`] criterion so render callbacks can be
/// exercised without a host. The last search spec is recorded for
/// assertions.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    types: Vec<ContentTypeDescriptor>,
    items: Vec<TestItem>,
    /// Category name -> parent category name.
    categories: HashMap<String, Option<String>>,
    current_item: Option<ItemId>,
    next_id: ItemId,
    search_failure: Option<String>,
    last_search: RefCell<Option<QuerySpec>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository with the public `post` ("Posts") and `page` ("Pages") types.
    pub fn with_standard_types() -> Self {
        Self::new()
            .with_type(ContentTypeDescriptor::new("post", "Posts"))
            .with_type(ContentTypeDescriptor::new("page", "Pages"))
    }

    pub fn with_type(mut self, descriptor: ContentTypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// Register a category, optionally under a parent.
    pub fn with_category(mut self, name: &str, parent: Option<&str>) -> Self {
        self.categories
            .insert(name.to_string(), parent.map(str::to_string));
        self
    }

    pub fn with_item(mut self, item: TestItem) -> Self {
        self.insert(item);
        self
    }

    /// Store an item, assigning the next free id when its id is 0.
    pub fn insert(&mut self, mut item: TestItem) -> ItemId {
        if item.id == 0 {
            self.next_id += 1;
            item.id = self.next_id;
        } else {
            self.next_id = self.next_id.max(item.id);
        }
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Pretend the host is rendering item `id`.
    pub fn viewing(mut self, id: ItemId) -> Self {
        self.current_item = Some(id);
        self
    }

    /// Make every search fail with `message`.
    pub fn failing_searches(mut self, message: &str) -> Self {
        self.search_failure = Some(message.to_string());
        self
    }

    /// The spec passed to the most recent search.
    pub fn last_search(&self) -> Option<QuerySpec> {
        self.last_search.borrow().clone()
    }

    fn matches(&self, spec: &QuerySpec, item: &TestItem) -> bool {
        if !spec.matches_type(&item.item_type)
            || !spec.status.matches(item.status)
            || spec.is_excluded(item.id)
        {
            return false;
        }

        let hour = item.published_at.hour();
        if spec.hour_range.is_some_and(|range| !range.contains(hour)) {
            return false;
        }

        if !spec.tag_slugs.iter().all(|t| item.tags.contains(t)) {
            return false;
        }

        match &spec.category {
            Some(filter) => item.categories.iter().any(|c| {
                c == &filter.name || (filter.include_children && self.descends_from(c, &filter.name))
            }),
            None => true,
        }
    }

    fn descends_from(&self, category: &str, ancestor: &str) -> bool {
        let mut current = category;
        // Bounded walk so a malformed hierarchy cannot loop forever.
        for _ in 0..=self.categories.len() {
            match self.categories.get(current) {
                Some(Some(parent)) if parent == ancestor => return true,
                Some(Some(parent)) => current = parent,
                _ => return false,
            }
        }
        false
    }
}

impl ContentRepository for MemoryRepository {
    fn public_content_types(&self) -> Result<Vec<ContentTypeDescriptor>, RepositoryError> {
        Ok(self.types.iter().filter(|t| t.public).cloned().collect())
    }

    fn count_by_status(&self, slug: &str) -> Result<StatusCounts, RepositoryError> {
        Ok(self
            .items
            .iter()
            .filter(|i| i.item_type == slug)
            .map(|i| (i.status, 1))
            .collect())
    }

    fn search(&self, spec: &QuerySpec) -> Result<Vec<Item>, RepositoryError> {
        *self.last_search.borrow_mut() = Some(spec.clone());

        if let Some(message) = &self.search_failure {
            return Err(RepositoryError::unavailable(message));
        }

        let mut hits: Vec<&TestItem> = self.items.iter().filter(|i| self.matches(spec, i)).collect();
        match spec.order {
            QueryOrder::NewestFirst => hits.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
            QueryOrder::OldestFirst => hits.sort_by_key(|i| i.published_at),
        }
        if let Some(limit) = spec.limit {
            hits.truncate(limit);
        }

        debug!(hits = hits.len(), "memory repository search");
        Ok(hits.into_iter().map(|i| Item::new(i.id, &i.title)).collect())
    }

    fn item_metadata(&self, id: ItemId) -> Result<Metadata, RepositoryError> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.metadata.clone())
            .ok_or(RepositoryError::NotFound(id))
    }

    fn current_item_id(&self) -> Option<ItemId> {
        self.current_item
    }
}
