use folio_editor::{EditorConfig, FileStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding page records
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Editor behaviour
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the pages directory
    pub fn get_pages_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.pages_dir)
    }

    pub fn store(&self, cwd: &str) -> FileStore {
        FileStore::new(self.get_pages_dir(cwd))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            editor: EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::Platform;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "pagesDir": "content/pages",
            "editor": { "historyDepth": 20, "platform": "mac" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.pages_dir, "content/pages");
        assert_eq!(config.editor.history_depth, 20);
        assert_eq!(config.editor.platform, Platform::Mac);
        assert_eq!(config.editor.drag_activation_distance, 8.0);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pages_dir, "pages");
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.get_pages_dir(&cwd), dir.path().join("pages"));
    }
}
