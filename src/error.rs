//! Error types for the duebrief CLI

use thiserror::Error;

/// Result type alias for duebrief operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors (Notion and Telegram)
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Run `duebrief init` to set up your Notion token.")]
    Unauthorized,

    #[error("Access denied. The integration has no access to this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, retry after {0}s")]
    RateLimit(u64),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Notion API token not configured. Run `duebrief init` or set NOTION_API_KEY.")]
    MissingNotionToken,

    #[error("Notion database ID not configured. Run `duebrief init` or set NOTION_DATABASE_ID.")]
    MissingDatabaseId,

    #[error("Telegram bot token not configured. Run `duebrief init` or set TELEGRAM_BOT_TOKEN.")]
    MissingBotToken,

    #[error("Telegram chat ID not configured. Run `duebrief init` or set TELEGRAM_CHAT_ID.")]
    MissingChatId,

    #[error(
        "Plain-text chat ID not configured. Run `duebrief init` or set TELEGRAM_CHAT_ID_PLAIN."
    )]
    MissingPlainChatId,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
