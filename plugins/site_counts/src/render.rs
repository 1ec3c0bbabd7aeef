//! Server-side rendering of the Site Counts block.
//!
//! Output sections, in order:
//! - container `<div>` carrying the editor-supplied class
//! - item counts per public content type
//! - the coerced `post_id` request parameter
//! - up to `max_titles` editorial titles (omitted when none survive filtering)

use serde::Deserialize;
use site_counts_sdk::error::RepositoryError;
use site_counts_sdk::escape::{esc_attr, esc_html};
use site_counts_sdk::host::ContentRepository;
use site_counts_sdk::i18n::{FormatArg, Translator};
use site_counts_sdk::types::{BlockAttributes, BlockInstance, ContentTypeDescriptor, RenderContext};
use tracing::debug;

use crate::messages::{
    CURRENT_POST_ID, EDITORIAL_HEADING, POST_COUNTS_HEADING, TEXT_DOMAIN, TYPE_COUNT,
};
use crate::query::editorial_query;

/// Metadata value that keeps an item out of the title list.
pub const ACCEPTED_MARKER: &str = "Accepted";

/// Render tuning from the manifest's `[render]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RenderSettings {
    /// Hits requested from the repository before metadata filtering.
    #[serde(default = "default_over_fetch")]
    pub over_fetch: usize,

    /// Titles shown at most.
    #[serde(default = "default_max_titles")]
    pub max_titles: usize,
}

fn default_over_fetch() -> usize {
    15
}

fn default_max_titles() -> usize {
    5
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            over_fetch: default_over_fetch(),
            max_titles: default_max_titles(),
        }
    }
}

/// Renders the block from injected host collaborators.
#[derive(Debug, Clone)]
pub struct SiteCountsRenderer {
    settings: RenderSettings,
    text_domain: String,
}

impl Default for SiteCountsRenderer {
    fn default() -> Self {
        Self::new(RenderSettings::default(), TEXT_DOMAIN)
    }
}

impl SiteCountsRenderer {
    /// Renderer looking up its messages in `text_domain`.
    pub fn new(settings: RenderSettings, text_domain: impl Into<String>) -> Self {
        Self {
            settings,
            text_domain: text_domain.into(),
        }
    }

    /// Render the block to an HTML fragment.
    ///
    /// Absent inputs fall back to empty values; repository failures are
    /// returned to the caller untouched.
    pub fn render(
        &self,
        attributes: &BlockAttributes,
        _content: &str,
        block: &BlockInstance,
        ctx: &RenderContext,
        repository: &dyn ContentRepository,
        translator: &dyn Translator,
    ) -> Result<String, RepositoryError> {
        let counts = type_counts(repository)?;
        let titles = self.editorial_titles(repository, ctx)?;
        let domain = self.text_domain.as_str();

        let mut html = String::new();
        html.push_str(&format!(
            "<div class=\"{}\">\n",
            esc_attr(attributes.class_name())
        ));

        html.push_str(&format!(
            "<h2>{}</h2>\n",
            esc_html(&translator.translate(domain, POST_COUNTS_HEADING.msgid))
        ));
        html.push_str("<ul>\n");
        for (content_type, total) in &counts {
            let line = translator.format(
                domain,
                &TYPE_COUNT,
                &[
                    FormatArg::Int(*total),
                    FormatArg::Str(esc_html(&content_type.display_name)),
                ],
            );
            html.push_str(&format!("<li>{line}</li>\n"));
        }
        html.push_str("</ul>\n");

        let id_line = translator.format(
            domain,
            &CURRENT_POST_ID,
            &[FormatArg::Int(ctx.query_string_post_id)],
        );
        html.push_str(&format!("<p>{id_line}</p>\n"));

        if !titles.is_empty() {
            html.push_str(&format!(
                "<h2>{}</h2>\n",
                esc_html(&translator.translate(domain, EDITORIAL_HEADING.msgid))
            ));
            html.push_str("<ul>\n");
            for title in &titles {
                html.push_str(&format!("<li>{}</li>\n", esc_html(title)));
            }
            html.push_str("</ul>\n");
        }

        html.push_str("</div>\n");

        debug!(
            block = %block.name,
            content_types = counts.len(),
            titles = titles.len(),
            "rendered site counts block"
        );

        Ok(html)
    }

    /// Titles of editorial items, excluding the host item and accepted items.
    ///
    /// Starts with an `over_fetch` window and doubles it while the window
    /// comes back full without yielding `max_titles` survivors. Hits already
    /// examined are not looked up again.
    fn editorial_titles(
        &self,
        repository: &dyn ContentRepository,
        ctx: &RenderContext,
    ) -> Result<Vec<String>, RepositoryError> {
        let max_titles = self.settings.max_titles;
        let mut limit = self.settings.over_fetch.max(max_titles);
        let mut examined = 0usize;
        let mut titles = Vec::new();

        loop {
            let hits = repository.search(&editorial_query(ctx.host_item_id, limit))?;
            let fetched = hits.len();

            for item in hits.into_iter().skip(examined) {
                if titles.len() >= max_titles {
                    break;
                }
                examined += 1;
                if ctx.host_item_id != 0 && item.id == ctx.host_item_id {
                    continue;
                }
                if repository
                    .item_metadata(item.id)?
                    .contains_value(ACCEPTED_MARKER)
                {
                    debug!(item_id = item.id, "skipping accepted item");
                    continue;
                }
                titles.push(item.title);
            }

            // A short window means the repository has nothing more.
            if titles.len() >= max_titles || fetched < limit {
                break;
            }

            debug!(
                fetched,
                survivors = titles.len(),
                "widening editorial search window"
            );
            limit = limit.saturating_mul(2);
        }

        Ok(titles)
    }
}

/// Item totals per public content type, in repository order.
fn type_counts(
    repository: &dyn ContentRepository,
) -> Result<Vec<(ContentTypeDescriptor, u64)>, RepositoryError> {
    repository
        .public_content_types()?
        .into_iter()
        .map(|content_type| {
            let total = repository.count_by_status(&content_type.slug)?.total();
            Ok::<_, RepositoryError>((content_type, total))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use site_counts_sdk::i18n::PassthroughTranslator;
    use site_counts_test_utils::CatalogTranslator;
    use site_counts_sdk::query::QuerySpec;
    use site_counts_sdk::types::{Item, ItemId, Metadata, StatusCounts};

    /// Repository returning fixed hits in order, honouring only the limit.
    #[derive(Default)]
    struct FixedHits {
        hits: Vec<(ItemId, &'static str, bool)>,
        limits: RefCell<Vec<Option<usize>>>,
    }

    impl FixedHits {
        fn new(hits: Vec<(ItemId, &'static str, bool)>) -> Self {
            Self {
                hits,
                ..Self::default()
            }
        }
    }

    impl ContentRepository for FixedHits {
        fn public_content_types(&self) -> Result<Vec<ContentTypeDescriptor>, RepositoryError> {
            Ok(Vec::new())
        }

        fn count_by_status(&self, _slug: &str) -> Result<StatusCounts, RepositoryError> {
            Ok(StatusCounts::new())
        }

        fn search(&self, spec: &QuerySpec) -> Result<Vec<Item>, RepositoryError> {
            self.limits.borrow_mut().push(spec.limit);
            Ok(self
                .hits
                .iter()
                .take(spec.limit.unwrap_or(usize::MAX))
                .map(|(id, title, _)| Item::new(*id, *title))
                .collect())
        }

        fn item_metadata(&self, id: ItemId) -> Result<Metadata, RepositoryError> {
            let mut meta = Metadata::new();
            if self.hits.iter().any(|(hit, _, accepted)| *hit == id && *accepted) {
                meta.push("status", ACCEPTED_MARKER);
            }
            Ok(meta)
        }

        fn current_item_id(&self) -> Option<ItemId> {
            None
        }
    }

    fn render(repo: &dyn ContentRepository, ctx: RenderContext) -> String {
        SiteCountsRenderer::default()
            .render(
                &BlockAttributes::new(),
                "",
                &BlockInstance::new("xwp/site-counts"),
                &ctx,
                repo,
                &PassthroughTranslator,
            )
            .unwrap()
    }

    #[test]
    fn default_settings() {
        let settings = RenderSettings::default();
        assert_eq!(settings.over_fetch, 15);
        assert_eq!(settings.max_titles, 5);
    }

    #[test]
    fn host_item_skipped_even_if_repository_returns_it() {
        let repo = FixedHits::new(vec![(99, "Host", false), (1, "Other", false)]);
        let html = render(
            &repo,
            RenderContext {
                host_item_id: 99,
                query_string_post_id: 0,
            },
        );
        assert!(!html.contains("<li>Host</li>"));
        assert!(html.contains("<li>Other</li>"));
    }

    #[test]
    fn empty_type_list_still_renders_list_wrapper() {
        let repo = FixedHits::new(vec![]);
        let html = render(&repo, RenderContext::default());
        assert!(html.starts_with("<div class=\"\">\n<h2>Post Counts</h2>\n<ul>\n</ul>\n"));
        assert!(html.ends_with("<p>The current post ID is 0.</p>\n</div>\n"));
    }

    #[test]
    fn accepted_items_do_not_count_toward_cap() {
        let repo = FixedHits::new(vec![
            (1, "A", true),
            (2, "B", false),
            (3, "C", true),
            (4, "D", false),
            (5, "E", false),
            (6, "F", false),
            (7, "G", false),
            (8, "H", false),
        ]);
        let html = render(&repo, RenderContext::default());
        let titles: Vec<_> = ["B", "D", "E", "F", "G"]
            .iter()
            .map(|t| format!("<li>{t}</li>"))
            .collect();
        for li in &titles {
            assert!(html.contains(li.as_str()), "missing {li} in {html}");
        }
        assert!(!html.contains("<li>H</li>"));
        assert!(!html.contains("<li>A</li>"));
    }

    #[test]
    fn full_window_of_accepted_items_widens_search() {
        let mut hits: Vec<(ItemId, &'static str, bool)> =
            (1..=14).map(|id| (id, "Accepted", true)).collect();
        hits.extend([(15, "One", false), (16, "Two", false), (17, "Three", false)]);
        let repo = FixedHits::new(hits);

        let html = render(&repo, RenderContext::default());
        for title in ["One", "Two", "Three"] {
            assert!(html.contains(&format!("<li>{title}</li>")), "{html}");
        }
        assert_eq!(*repo.limits.borrow(), vec![Some(15), Some(30)]);
    }

    #[test]
    fn short_window_is_searched_once() {
        let repo = FixedHits::new(vec![(1, "A", true), (2, "B", false)]);
        render(&repo, RenderContext::default());
        assert_eq!(*repo.limits.borrow(), vec![Some(15)]);
    }

    #[test]
    fn window_keeps_doubling_until_exhausted() {
        let repo = FixedHits::new((1..=40).map(|id| (id, "Accepted", true)).collect());
        let html = render(&repo, RenderContext::default());
        assert!(!html.contains("Any 5 posts"));
        assert_eq!(*repo.limits.borrow(), vec![Some(15), Some(30), Some(60)]);
    }

    #[test]
    fn messages_use_configured_text_domain() {
        let translator = CatalogTranslator::new()
            .with("site-counts", "Post Counts", "Ignored")
            .with("acme-counts", "Post Counts", "Totals");
        let html = SiteCountsRenderer::new(RenderSettings::default(), "acme-counts")
            .render(
                &BlockAttributes::new(),
                "",
                &BlockInstance::new("acme/counts"),
                &RenderContext::default(),
                &FixedHits::new(vec![]),
                &translator,
            )
            .unwrap();
        assert!(html.contains("<h2>Totals</h2>"), "{html}");
        assert!(!html.contains("Ignored"));
    }

    #[test]
    fn default_renderer_uses_block_text_domain() {
        let translator = CatalogTranslator::new().with(TEXT_DOMAIN, "Post Counts", "Compteurs");
        let html = SiteCountsRenderer::default()
            .render(
                &BlockAttributes::new(),
                "",
                &BlockInstance::new("xwp/site-counts"),
                &RenderContext::default(),
                &FixedHits::new(vec![]),
                &translator,
            )
            .unwrap();
        assert!(html.contains("<h2>Compteurs</h2>"));
    }
}
