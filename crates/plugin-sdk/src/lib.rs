//! Site Counts SDK
//!
//! Types and collaborator traits shared between the host and server-rendered
//! blocks. Blocks depend on this crate and receive the host's content
//! repository, request context and translator through the traits defined
//! here, so they can be rendered without a running host.

pub mod error;
pub mod escape;
pub mod host;
pub mod i18n;
pub mod query;
pub mod types;

pub mod prelude {
    pub use crate::error::RepositoryError;
    pub use crate::escape::{esc_attr, esc_html, intval};
    pub use crate::host::{ContentRepository, QueryParams, RequestContext};
    pub use crate::i18n::{FormatArg, Message, PassthroughTranslator, Translator, sprintf};
    pub use crate::query::{CategoryFilter, HourRange, QueryOrder, QuerySpec, StatusFilter};
    pub use crate::types::*;
}
