//! Shared helpers for Site Counts integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use serde_json::{Value, json};
use site_counts::error::BlockResult;
use site_counts::registry::{BlockRegistry, HostServices};
use site_counts_sdk::host::QueryParams;
use site_counts_sdk::i18n::{PassthroughTranslator, Translator};
use site_counts_test_utils::{MemoryRepository, TestItem, at, init_tracing, test_item};

pub const BLOCK_NAME: &str = "xwp/site-counts";

/// Registry with the Site Counts block registered from its shipped manifest.
pub fn registry() -> BlockRegistry {
    init_tracing();
    let mut registry = BlockRegistry::new();
    site_counts::register(&mut registry, site_counts::plugin_dir()).unwrap();
    registry
}

pub fn try_render_with(
    repo: &MemoryRepository,
    query: &str,
    attributes: &Value,
    translator: &dyn Translator,
) -> BlockResult<String> {
    let request = QueryParams::parse(query);
    let host = HostServices {
        repository: repo,
        request: &request,
        translator,
    };
    registry().render_block(BLOCK_NAME, attributes, "", &host)
}

pub fn render_with(
    repo: &MemoryRepository,
    query: &str,
    attributes: &Value,
    translator: &dyn Translator,
) -> String {
    try_render_with(repo, query, attributes, translator).unwrap()
}

/// Render with class `site-counts` and no translations.
pub fn render(repo: &MemoryRepository, query: &str) -> String {
    render_with(
        repo,
        query,
        &json!({ "className": "site-counts" }),
        &PassthroughTranslator,
    )
}

/// A post matching the editorial filter, published at 10:00 on January `day`.
pub fn editorial_post(title: &str, day: u32) -> TestItem {
    test_item("post", title).editorial().published_at(at(day, 10))
}

/// Titles listed under the editorial heading, in output order.
pub fn listed_titles(html: &str) -> Vec<String> {
    let Some((_, after)) = html.split_once("<h2>Any 5 posts with the tag of foo and the category of baz</h2>")
    else {
        return Vec::new();
    };
    let list = after.split("</ul>").next().unwrap_or("");
    list.split("<li>")
        .skip(1)
        .filter_map(|li| li.split("</li>").next())
        .map(str::to_string)
        .collect()
}

/// Text following "The current post ID is " up to the closing tag.
pub fn echoed_id(html: &str) -> &str {
    let (_, rest) = html.split_once("The current post ID is ").unwrap();
    rest.split("</p>").next().unwrap()
}
