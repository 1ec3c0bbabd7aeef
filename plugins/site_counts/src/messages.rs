//! Translatable strings emitted by the block.

use site_counts_sdk::i18n::Message;

/// Text domain every message is looked up under.
pub const TEXT_DOMAIN: &str = "site-counts";

pub const POST_COUNTS_HEADING: Message = Message::new("Post Counts");

pub const TYPE_COUNT: Message = Message::with_comment(
    "There are %1$d %2$s.",
    "translators: %1$d is the number of items, %2$s is the content type name (e.g. \"Posts\").",
);

pub const CURRENT_POST_ID: Message = Message::with_comment(
    "The current post ID is %d.",
    "translators: %d is the post_id request parameter as a number.",
);

pub const EDITORIAL_HEADING: Message =
    Message::new("Any 5 posts with the tag of foo and the category of baz");

/// Every message, for catalogue extraction.
pub const ALL_MESSAGES: &[Message] = &[
    POST_COUNTS_HEADING,
    TYPE_COUNT,
    CURRENT_POST_ID,
    EDITORIAL_HEADING,
];
