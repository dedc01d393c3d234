//! API clients for the two external collaborators
//!
//! Both are behind traits so the pipeline and its tests can run against
//! mocks without touching the network.

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod notion;
pub mod telegram;

pub use models::{Page, QueryResponse};
pub use notion::NotionClient;
pub use telegram::TelegramClient;

/// Notion API surface used by the pipeline
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Health check: retrieve the database metadata
    async fn check_database(&self, database_id: &str) -> Result<()>;

    /// Query one page of database records, optionally from a cursor
    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse>;

    /// Retrieve a single page by ID (relation resolution)
    async fn retrieve_page(&self, page_id: &str) -> Result<Page>;
}

/// Messaging API surface used by the publish step
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Send a message; returns the new message identifier
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<i64>;

    /// Delete a previously sent message
    async fn delete_message(&self, chat_id: &str, message_id: i64) -> Result<()>;
}

/// Collect every record of a database by following the pagination cursor.
pub async fn fetch_all_records(client: &dyn NotionApi, database_id: &str) -> Result<Vec<Page>> {
    let mut all_results = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let response = client.query_database(database_id, cursor.as_deref()).await?;
        all_results.extend(response.results);

        if !response.has_more {
            break;
        }
        match response.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    log::info!("Fetched {} records from Notion", all_results.len());
    Ok(all_results)
}
