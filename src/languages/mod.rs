mod common;
pub mod ecma;
pub mod json;
pub mod python;
pub mod rust;
pub mod traits;


use std::{collections::HashMap, path::Path, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{editor::TextDocument, syntax::TreeCache};
use traits::LanguageHandler;

/// Language identifiers the registry knows, as editors spell them
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LanguageName {
    Typescript,
    Typescriptreact,
    Javascript,
    Javascriptreact,
    Json,
    Python,
    Rust,
}

/// Which resolution strategy a language gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LanguageFamily {
    /// Full syntax tree with the scope and member model
    Ast,
    /// Properties addressed by key path
    StructuredData,
    /// Elements first, then the generic lookups
    Markup,
    Generic,
}

#[derive(fieldwork::Fieldwork)]
#[fieldwork(get)]
pub struct LanguageCommon {
    #[fieldwork(get(copy))]
    name: LanguageName,
    #[fieldwork(get(copy))]
    family: LanguageFamily,
    #[fieldwork(get(copy))]
    file_extensions: &'static [&'static str],
    #[fieldwork(skip)]
    handler: Arc<dyn LanguageHandler>,
}

impl std::fmt::Debug for LanguageCommon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageCommon")
            .field("name", &self.name)
            .field("family", &self.family)
            .field("file_extensions", &self.file_extensions)
            .finish()
    }
}

impl LanguageCommon {
    pub fn new(
        name: LanguageName,
        family: LanguageFamily,
        file_extensions: &'static [&'static str],
        handler: Arc<dyn LanguageHandler>,
    ) -> Self {
        Self {
            name,
            family,
            file_extensions,
            handler,
        }
    }

    pub fn handler(&self) -> &dyn LanguageHandler {
        &*self.handler
    }
}

/// Registry to manage all supported languages
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: HashMap<LanguageName, LanguageCommon>,
    extensions: HashMap<&'static str, LanguageName>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::with_cache_capacity(32)
    }

    /// Every built-in language, sharing one tree cache of `capacity` entries
    pub fn with_cache_capacity(capacity: usize) -> Self {
        let cache = Arc::new(TreeCache::new(capacity));
        let mut registry = Self::empty();

        for language in ecma::languages(cache.clone()) {
            registry.register_language(language);
        }
        registry.register_language(json::language(cache.clone()));
        registry.register_language(python::language(cache.clone()));
        registry.register_language(rust::language(cache));

        registry
    }

    pub fn empty() -> Self {
        Self {
            languages: HashMap::new(),
            extensions: HashMap::new(),
        }
    }

    pub fn register_language(&mut self, language: LanguageCommon) {
        let name = language.name();
        for extension in language.file_extensions() {
            self.extensions.insert(*extension, name);
        }
        self.languages.insert(name, language);
    }

    /// Look a language up by identifier; `jsonc` is served by the JSON handler
    pub fn get_language(&self, name: &str) -> Option<&LanguageCommon> {
        let name = match name {
            "jsonc" => LanguageName::Json,
            other => LanguageName::from_str(other).ok()?,
        };
        self.languages.get(&name)
    }

    pub fn detect_language_from_path(&self, file_path: &str) -> Option<LanguageName> {
        let extension = Path::new(file_path).extension()?.to_str()?;
        self.extensions.get(extension).copied()
    }

    /// The language for a document's identifier. Untitled or unknown identifiers are not
    /// guessed from the file name.
    pub fn for_document(&self, document: &TextDocument) -> Option<&LanguageCommon> {
        self.get_language(document.language_id())
    }
}
