//! The editorial filter behind the title list.

use site_counts_sdk::query::{QuerySpec, StatusFilter};
use site_counts_sdk::types::ItemId;

/// Content types searched.
pub const ITEM_TYPES: [&str; 2] = ["post", "page"];

/// Tag slug every listed item carries.
pub const TAG_SLUG: &str = "foo";

/// Category name every listed item is filed under directly.
pub const CATEGORY_NAME: &str = "baz";

/// First and last publication hour accepted (inclusive).
pub const BUSINESS_HOURS: (u32, u32) = (9, 17);

/// Build the search for the editorial title list.
///
/// `over_fetch` bounds the number of hits requested; the caller filters the
/// hits further, so it must exceed the number of titles shown.
pub fn editorial_query(host_item_id: ItemId, over_fetch: usize) -> QuerySpec {
    let (start, end) = BUSINESS_HOURS;
    let mut spec = QuerySpec::new()
        .item_types(ITEM_TYPES)
        .status(StatusFilter::Any)
        .hours(start, end)
        .tag(TAG_SLUG)
        .category(CATEGORY_NAME, false)
        .limit(over_fetch);

    if host_item_id > 0 {
        spec = spec.exclude(host_item_id);
    }

    spec
}
