//! Parser for the block's `block.toml` metadata manifest.
//!
//! The manifest lives in the plugin root and declares:
//! - the namespaced block name the host registers it under
//! - display metadata and the text domain for its messages
//! - the attribute schema (undeclared attributes are dropped)
//! - render tuning (`[render]` table)

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use site_counts_sdk::types::BlockAttributes;

use crate::render::RenderSettings;

/// File name of the manifest inside a block's directory.
pub const MANIFEST_FILE: &str = "block.toml";

/// Block metadata parsed from `block.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockManifest {
    /// Namespaced block name (`vendor/block`).
    pub name: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Inserter category.
    #[serde(default)]
    pub category: String,

    pub version: String,

    /// Text domain for the block's translatable messages.
    #[serde(default = "default_text_domain")]
    pub text_domain: String,

    /// Declared attributes, keyed by attribute name.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeSchema>,

    #[serde(default)]
    pub render: RenderSettings,
}

fn default_text_domain() -> String {
    "default".to_string()
}

/// Schema for one declared attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeSchema {
    #[serde(rename = "type")]
    pub kind: AttributeType,

    /// Value used when the attribute is absent or has the wrong type.
    #[serde(default)]
    pub default: Option<Value>,
}

/// JSON type an attribute value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl AttributeType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Number => value.is_number(),
            AttributeType::Integer => value.is_i64() || value.is_u64(),
            AttributeType::Boolean => value.is_boolean(),
            AttributeType::Array => value.is_array(),
            AttributeType::Object => value.is_object(),
        }
    }
}

impl BlockManifest {
    /// Load `block.toml` from a block directory.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::parse(&dir.join(MANIFEST_FILE))
    }

    /// Parse a manifest file from the given path.
    pub fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read block manifest: {}", path.display()))?;

        Self::parse_str(&content, path)
    }

    /// Parse a manifest from a TOML string.
    pub fn parse_str(content: &str, path: &Path) -> Result<Self> {
        let manifest: BlockManifest = toml::from_str(content).with_context(|| {
            format!("failed to parse block manifest TOML at {}", path.display())
        })?;

        manifest.validate(path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let well_formed = self
            .name
            .split_once('/')
            .is_some_and(|(ns, block)| !ns.is_empty() && !block.is_empty() && !block.contains('/'));
        if !well_formed {
            anyhow::bail!(
                "block manifest at {} has invalid name '{}' (expected 'namespace/block')",
                path.display(),
                self.name
            );
        }

        if self.version.is_empty() {
            anyhow::bail!(
                "block '{}' at {} has empty 'version' field",
                self.name,
                path.display()
            );
        }

        if self.render.max_titles == 0 {
            anyhow::bail!("block '{}' sets render.max_titles to 0", self.name);
        }

        if self.render.over_fetch < self.render.max_titles {
            anyhow::bail!(
                "block '{}' sets render.over_fetch ({}) below render.max_titles ({})",
                self.name,
                self.render.over_fetch,
                self.render.max_titles
            );
        }

        for (name, schema) in &self.attributes {
            if schema.default.as_ref().is_some_and(|d| !schema.kind.matches(d)) {
                anyhow::bail!(
                    "block '{}' attribute '{}' has a default of the wrong type",
                    self.name,
                    name
                );
            }
        }

        Ok(())
    }

    /// Keep only declared attributes whose JSON type matches the schema.
    ///
    /// Declared defaults fill in for absent or mistyped values. A non-object
    /// `raw` is treated as empty.
    pub fn filter_attributes(&self, raw: &Value) -> BlockAttributes {
        let mut attributes = BlockAttributes::new();

        for (name, schema) in &self.attributes {
            let supplied = raw.get(name).filter(|v| schema.kind.matches(v));
            if let Some(value) = supplied.or(schema.default.as_ref()) {
                attributes.0.insert(name.clone(), value.clone());
            }
        }

        attributes
    }
}
