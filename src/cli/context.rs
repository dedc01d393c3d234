//! Run execution context
//!
//! Bundles everything one digest run needs: validated configuration, the
//! two API clients, the three persisted caches, and the reference date the
//! whole pipeline computes against. Built once at startup and passed down,
//! so no component reaches for process-wide state.

use chrono::NaiveDate;

use crate::cache::{
    LastMessageStore, TitleCache, PAGE_TITLES_FILE, SUBJECT_TITLES_FILE,
};
use crate::client::{NotionApi, NotionClient, TelegramClient};
use crate::config::Config;
use crate::error::Result;
use crate::publish::ChatTargets;

/// Context for a digest run
pub struct RunContext {
    /// Notion API client
    pub notion: NotionClient,
    /// Telegram API client
    pub telegram: TelegramClient,
    /// Database holding the task records
    pub database_id: String,
    /// Destination chats
    pub chats: ChatTargets,
    /// Resolved titles for subject relations
    pub subject_cache: TitleCache,
    /// Resolved titles for topic relations
    pub page_cache: TitleCache,
    /// Last-sent-message record
    pub last_message: LastMessageStore,
    /// The date days-remaining is computed against
    pub reference: NaiveDate,
}

impl RunContext {
    /// Create a run context with full initialization.
    ///
    /// Loads and validates configuration, then health-checks the Notion
    /// database so a misconfigured run fails before any pipeline work.
    ///
    /// # Errors
    /// Returns an error if required configuration is missing or the
    /// database is unreachable; both are fatal to the run.
    pub async fn new(config_path: Option<&str>, reference: NaiveDate) -> Result<Self> {
        let config = Config::load_at(config_path)?;
        config.validate()?;

        let notion = NotionClient::new(
            config.notion_api_key.clone().expect("validated above"),
        )?;
        let database_id = config
            .notion_database_id
            .clone()
            .expect("validated above");

        notion.check_database(&database_id).await?;
        log::info!("Notion API reachable, database accessible");

        let telegram =
            TelegramClient::new(config.telegram_bot_token.as_deref().expect("validated above"))?;
        let chats = ChatTargets {
            primary: config.telegram_chat_id.clone().expect("validated above"),
            plain: config
                .telegram_chat_id_plain
                .clone()
                .expect("validated above"),
        };

        let cache_dir = config.cache_dir()?;
        let subject_cache = TitleCache::load(&cache_dir, SUBJECT_TITLES_FILE, "subject_titles");
        let page_cache = TitleCache::load(&cache_dir, PAGE_TITLES_FILE, "page_titles");
        let last_message = LastMessageStore::open(&cache_dir);

        Ok(Self {
            notion,
            telegram,
            database_id,
            chats,
            subject_cache,
            page_cache,
            last_message,
            reference,
        })
    }
}
