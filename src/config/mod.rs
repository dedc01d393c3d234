//! Configuration management for duebrief

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Application configuration
///
/// Every field can be supplied by the config file or overridden through the
/// environment (the variable names match the original deployment scripts).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Notion integration token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notion_api_key: Option<String>,

    /// Notion database holding the tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notion_database_id: Option<String>,

    /// Telegram bot token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_bot_token: Option<String>,

    /// Chat that receives the MarkdownV2 digest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,

    /// Chat that receives the plain-text copy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id_plain: Option<String>,

    /// Override for the cache directory (defaults to the XDG cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

/// Environment variable names honored as overrides, in field order.
const ENV_VARS: [&str; 5] = [
    "NOTION_API_KEY",
    "NOTION_DATABASE_ID",
    "TELEGRAM_BOT_TOKEN",
    "TELEGRAM_CHAT_ID",
    "TELEGRAM_CHAT_ID_PLAIN",
];

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".duebrief").join("config.yaml"))
    }

    /// Resolve the config path from an optional override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path override, then apply
    /// environment overrides.
    ///
    /// A missing file is not an error: the bot can run entirely from the
    /// environment. `validate()` decides whether the result is usable.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents).map_err(ConfigError::from)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to an optional path override
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        let path = Self::resolve_path(path)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Tokens live in this file; keep it private on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Overlay values from the environment onto the loaded file
    fn apply_env_overrides(&mut self) {
        let fields = [
            &mut self.notion_api_key,
            &mut self.notion_database_id,
            &mut self.telegram_bot_token,
            &mut self.telegram_chat_id,
            &mut self.telegram_chat_id_plain,
        ];

        for (field, var) in fields.into_iter().zip(ENV_VARS) {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *field = Some(value);
                }
            }
        }
    }

    /// Validate that every value required for a run is present.
    ///
    /// Called before any I/O so a half-configured bot fails fast.
    pub fn validate(&self) -> Result<()> {
        if self.notion_api_key.is_none() {
            return Err(ConfigError::MissingNotionToken.into());
        }
        if self.notion_database_id.is_none() {
            return Err(ConfigError::MissingDatabaseId.into());
        }
        if self.telegram_bot_token.is_none() {
            return Err(ConfigError::MissingBotToken.into());
        }
        if self.telegram_chat_id.is_none() {
            return Err(ConfigError::MissingChatId.into());
        }
        if self.telegram_chat_id_plain.is_none() {
            return Err(ConfigError::MissingPlainChatId.into());
        }
        Ok(())
    }

    /// Resolve the cache directory (config override, else XDG cache dir)
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }

        let cache_base = dirs::cache_dir().ok_or(ConfigError::Invalid(
            "Could not determine cache directory".to_string(),
        ))?;
        Ok(cache_base.join("duebrief"))
    }
}
