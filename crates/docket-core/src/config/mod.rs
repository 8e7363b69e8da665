use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DocketError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub highlight: HighlightSettings,
    pub context: ContextSettings,
    pub chat: ChatSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSettings {
    /// Use the surface's native range-highlight primitive when it has one.
    pub prefer_native: bool,
    /// Scroll jump targets into the vertical center of their container.
    pub center_on_jump: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Most chat-context spans held at once; the oldest is evicted first.
    pub max_spans: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    pub max_messages: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highlight: HighlightSettings {
                prefer_native: true,
                center_on_jump: true,
            },
            context: ContextSettings { max_spans: 8 },
            chat: ChatSettings { max_messages: 100 },
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docket")
            .join("config.toml")
    }

    /// Loads settings from the config dir, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &PathBuf) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(settings) = toml::from_str(&content) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| DocketError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
