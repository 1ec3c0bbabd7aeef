//! Block registry - binds block names to their server render callbacks.
//!
//! The host registers each block once at start-up under the name declared in
//! its manifest, then renders it by name for every page that embeds it.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_json::Value;
use site_counts_sdk::error::RepositoryError;
use site_counts_sdk::host::{ContentRepository, RequestContext};
use site_counts_sdk::i18n::Translator;
use site_counts_sdk::types::{BlockAttributes, BlockInstance, RenderContext};
use tracing::{debug, info};

use crate::error::{BlockError, BlockResult};
use crate::manifest::BlockManifest;

/// Host collaborators available to a render callback.
#[derive(Clone, Copy)]
pub struct HostServices<'a> {
    pub repository: &'a dyn ContentRepository,
    pub request: &'a dyn RequestContext,
    pub translator: &'a dyn Translator,
}

/// Server render callback: (attributes, inner content, block instance).
pub type RenderCallback = Box<
    dyn Fn(
            &BlockAttributes,
            &str,
            &BlockInstance,
            &RenderContext,
            &HostServices<'_>,
        ) -> Result<String, RepositoryError>
        + Send
        + Sync,
>;

/// A registered block.
pub struct RegisteredBlock {
    pub manifest: BlockManifest,
    callback: RenderCallback,
}

impl fmt::Debug for RegisteredBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredBlock")
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

/// Registry mapping block names to render callbacks.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    blocks: HashMap<String, RegisteredBlock>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block under its manifest name.
    pub fn register(&mut self, manifest: BlockManifest, callback: RenderCallback) -> BlockResult<()> {
        if self.blocks.contains_key(&manifest.name) {
            return Err(BlockError::AlreadyRegistered(manifest.name));
        }

        info!(block = %manifest.name, version = %manifest.version, "registered block");
        self.blocks
            .insert(manifest.name.clone(), RegisteredBlock { manifest, callback });
        Ok(())
    }

    /// Load `block.toml` from `dir` and register the block it declares.
    ///
    /// `make_callback` receives the parsed manifest so the callback can be
    /// configured from it.
    pub fn register_block_from_metadata<F>(&mut self, dir: &Path, make_callback: F) -> BlockResult<()>
    where
        F: FnOnce(&BlockManifest) -> RenderCallback,
    {
        let manifest = BlockManifest::load(dir)?;
        let callback = make_callback(&manifest);
        self.register(manifest, callback)
    }

    /// Render a registered block.
    ///
    /// Attributes are filtered through the block's declared schema before the
    /// callback sees them.
    pub fn render_block(
        &self,
        name: &str,
        raw_attributes: &Value,
        inner_content: &str,
        host: &HostServices<'_>,
    ) -> BlockResult<String> {
        let block = self
            .blocks
            .get(name)
            .ok_or_else(|| BlockError::UnknownBlock(name.to_string()))?;

        let attributes = block.manifest.filter_attributes(raw_attributes);
        let instance = BlockInstance::new(name);
        let ctx = RenderContext::new(host.repository.current_item_id(), host.request);
        debug!(block = name, host_item_id = ctx.host_item_id, "rendering block");

        let html = (block.callback)(&attributes, inner_content, &instance, &ctx, host)?;
        Ok(html)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredBlock> {
        self.blocks.get(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    /// Registered block names, sorted.
    pub fn block_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.blocks.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use site_counts_sdk::host::QueryParams;
    use site_counts_sdk::i18n::PassthroughTranslator;
    use site_counts_sdk::query::QuerySpec;
    use site_counts_sdk::types::{ContentTypeDescriptor, Item, ItemId, Metadata, StatusCounts};

    struct EmptyRepository;

    impl ContentRepository for EmptyRepository {
        fn public_content_types(&self) -> Result<Vec<ContentTypeDescriptor>, RepositoryError> {
            Ok(Vec::new())
        }

        fn count_by_status(&self, _slug: &str) -> Result<StatusCounts, RepositoryError> {
            Ok(StatusCounts::new())
        }

        fn search(&self, _spec: &QuerySpec) -> Result<Vec<Item>, RepositoryError> {
            Ok(Vec::new())
        }

        fn item_metadata(&self, id: ItemId) -> Result<Metadata, RepositoryError> {
            Err(RepositoryError::NotFound(id))
        }

        fn current_item_id(&self) -> Option<ItemId> {
            Some(12)
        }
    }

    fn manifest(name: &str) -> BlockManifest {
        let toml = format!(
            "name = \"{name}\"\nversion = \"1\"\n[attributes.className]\ntype = \"string\"\n"
        );
        BlockManifest::parse_str(&toml, Path::new("block.toml")).unwrap()
    }

    fn echo_callback() -> RenderCallback {
        Box::new(|attrs, content, block, ctx, _host| {
            Ok(format!(
                "{}|{}|{}|{}|{}",
                block.name,
                attrs.class_name(),
                content,
                ctx.host_item_id,
                ctx.query_string_post_id
            ))
        })
    }

    #[test]
    fn empty_registry() {
        let registry = BlockRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_registered("xwp/site-counts"));
        assert!(registry.get("xwp/site-counts").is_none());
    }

    #[test]
    fn register_and_render() {
        let mut registry = BlockRegistry::new();
        registry.register(manifest("acme/echo"), echo_callback()).unwrap();

        let request = QueryParams::parse("post_id=7x");
        let host = HostServices {
            repository: &EmptyRepository,
            request: &request,
            translator: &PassthroughTranslator,
        };
        let html = registry
            .render_block(
                "acme/echo",
                &json!({ "className": "wide", "style": "x" }),
                "inner",
                &host,
            )
            .unwrap();

        assert_eq!(html, "acme/echo|wide|inner|12|7");
        assert_eq!(registry.block_names(), vec!["acme/echo"]);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = BlockRegistry::new();
        registry.register(manifest("acme/echo"), echo_callback()).unwrap();
        let err = registry
            .register(manifest("acme/echo"), echo_callback())
            .unwrap_err();
        assert!(matches!(err, BlockError::AlreadyRegistered(ref n) if n == "acme/echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_block_rejected() {
        let registry = BlockRegistry::new();
        let request = QueryParams::default();
        let host = HostServices {
            repository: &EmptyRepository,
            request: &request,
            translator: &PassthroughTranslator,
        };
        let err = registry
            .render_block("acme/missing", &json!({}), "", &host)
            .unwrap_err();
        assert!(matches!(err, BlockError::UnknownBlock(_)));
    }

    #[test]
    fn callback_errors_propagate() {
        let mut registry = BlockRegistry::new();
        registry
            .register(
                manifest("acme/failing"),
                Box::new(|_, _, _, _, host| host.repository.item_metadata(5).map(|_| String::new())),
            )
            .unwrap();

        let request = QueryParams::default();
        let host = HostServices {
            repository: &EmptyRepository,
            request: &request,
            translator: &PassthroughTranslator,
        };
        let err = registry
            .render_block("acme/failing", &json!({}), "", &host)
            .unwrap_err();
        assert!(matches!(
            err,
            BlockError::Repository(RepositoryError::NotFound(5))
        ));
    }

    #[test]
    fn missing_metadata_is_a_manifest_error() {
        let mut registry = BlockRegistry::new();
        let err = registry
            .register_block_from_metadata(Path::new("/nonexistent"), |_| echo_callback())
            .unwrap_err();
        assert!(matches!(err, BlockError::Manifest(_)));
        assert!(err.to_string().contains("block.toml"));
    }
}
