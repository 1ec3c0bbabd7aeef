//! Site Counts block.
//!
//! A server-rendered block summarising the site's content: item counts per
//! public content type, the `post_id` request parameter, and up to five
//! editorial titles tagged `foo` and filed under `baz`.
//!
//! The host calls [`register`] once at start-up; afterwards it renders the
//! block through [`registry::BlockRegistry::render_block`].

pub mod error;
pub mod manifest;
pub mod messages;
pub mod query;
pub mod registry;
pub mod render;

use std::path::Path;

use crate::error::BlockResult;
use crate::registry::{BlockRegistry, RenderCallback};
use crate::render::SiteCountsRenderer;

/// Register the Site Counts block declared by `plugin_dir/block.toml`.
pub fn register(registry: &mut BlockRegistry, plugin_dir: &Path) -> BlockResult<()> {
    registry.register_block_from_metadata(plugin_dir, |manifest| -> RenderCallback {
        let renderer = SiteCountsRenderer::new(manifest.render, manifest.text_domain.clone());
        Box::new(move |attributes, content, block, ctx, host| {
            renderer.render(
                attributes,
                content,
                block,
                ctx,
                host.repository,
                host.translator,
            )
        })
    })
}

/// Directory holding this plugin's `block.toml`.
pub fn plugin_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}
