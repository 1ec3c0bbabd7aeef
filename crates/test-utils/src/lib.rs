//! Site Counts test utilities.
//!
//! Helpers for integration testing: item fixtures, an in-memory content
//! repository, a catalogue translator and assertion utilities.

mod repository;
mod translator;

use chrono::{NaiveDate, NaiveDateTime};
use site_counts_sdk::types::{ItemId, ItemStatus, Metadata};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use repository::MemoryRepository;
pub use translator::CatalogTranslator;

/// Install a test-writer tracing subscriber. Safe to call from every test.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// A timestamp on day `day` of January 2024 at `hour`:00.
///
/// Out-of-range arguments fall back to the Unix epoch.
pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap_or_default()
}

/// Create a published test item at 10:00 on January 1st, 2024.
///
/// The id is left at 0 so the repository assigns one on insert.
pub fn test_item(item_type: &str, title: &str) -> TestItem {
    TestItem {
        id: 0,
        item_type: item_type.to_string(),
        title: title.to_string(),
        status: ItemStatus::Publish,
        published_at: at(1, 10),
        tags: Vec::new(),
        categories: Vec::new(),
        metadata: Metadata::new(),
    }
}

/// An item fixture as stored by [`MemoryRepository`].
#[derive(Debug, Clone)]
pub struct TestItem {
    pub id: ItemId,
    pub item_type: String,
    pub title: String,
    pub status: ItemStatus,
    pub published_at: NaiveDateTime,
    /// Tag slugs.
    pub tags: Vec<String>,
    /// Category names.
    pub categories: Vec<String>,
    pub metadata: Metadata,
}

impl TestItem {
    /// Set a custom ID.
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    /// Set as draft.
    pub fn draft(self) -> Self {
        self.status(ItemStatus::Draft)
    }

    pub fn published_at(mut self, when: NaiveDateTime) -> Self {
        self.published_at = when;
        self
    }

    /// Add a tag by slug.
    pub fn tag(mut self, slug: &str) -> Self {
        self.tags.push(slug.to_string());
        self
    }

    /// File under a category by name.
    pub fn category(mut self, name: &str) -> Self {
        self.categories.push(name.to_string());
        self
    }

    /// Add a metadata value.
    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.metadata.push(key, value);
        self
    }

    /// Tag `foo`, category `baz`: the combination the Site Counts list selects.
    pub fn editorial(self) -> Self {
        self.tag("foo").category("baz")
    }
}

/// Assertion helpers for rendered markup.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `needles` occur in `haystack` in the given order.
    pub fn in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(pos) => from += pos + needle.len(),
                None => panic!("Expected '{needle}' after byte {from}\nActual: {haystack}"),
            }
        }
    }

    /// Number of non-overlapping occurrences of `needle`.
    pub fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }
}
