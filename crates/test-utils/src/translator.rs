//! In-memory message catalogue.

use std::borrow::Cow;
use std::collections::HashMap;

use site_counts_sdk::i18n::Translator;

/// Translator backed by a `(domain, msgid) -> msgstr` map.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    entries: HashMap<(String, String), String>,
}

impl CatalogTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation.
    pub fn with(mut self, domain: &str, msgid: &str, msgstr: &str) -> Self {
        self.entries
            .insert((domain.to_string(), msgid.to_string()), msgstr.to_string());
        self
    }
}

impl Translator for CatalogTranslator {
    fn translate<'a>(&'a self, domain: &str, msgid: &'a str) -> Cow<'a, str> {
        match self.entries.get(&(domain.to_string(), msgid.to_string())) {
            Some(msgstr) if !msgstr.is_empty() => Cow::Borrowed(msgstr.as_str()),
            _ => Cow::Borrowed(msgid),
        }
    }
}
