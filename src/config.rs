use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::ResolverOrder;

/// User-tunable behavior, read from a JSON file.
///
/// Every field is optional in the file; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, fieldwork::Fieldwork)]
#[serde(default, rename_all = "camelCase")]
#[fieldwork(get, set, with)]
pub struct Settings {
    #[fieldwork(get(copy))]
    resolver_order: ResolverOrder,
    #[fieldwork(get(copy))]
    tree_cache_capacity: usize,
    /// Joins the texts of several cut elements on the clipboard
    clipboard_separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolver_order: ResolverOrder::default(),
            tree_cache_capacity: 32,
            clipboard_separator: "\n".into(),
        }
    }
}

impl Settings {
    /// Defaults when `path` is `None`; `~` in the path is expanded
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let path = PathBuf::from(&*shellexpand::tilde(&path.to_string_lossy()));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("could not read settings from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "resolverOrder": "generic" }"#).unwrap();
        assert_eq!(settings.resolver_order(), ResolverOrder::Generic);
        assert_eq!(settings.tree_cache_capacity(), 32);
        assert_eq!(settings.clipboard_separator(), "\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let error = Settings::load(Some(Path::new("/nonexistent/element-edit.json"))).unwrap_err();
        assert!(error.to_string().contains("could not read settings"));
    }
}
