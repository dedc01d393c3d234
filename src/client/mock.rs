//! Mock API clients for testing
//!
//! Configure expected responses via builder methods, then hand the mocks to
//! the pipeline components under test. No real API calls are made.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::models::{Page, QueryResponse};
use super::{MessagingApi, NotionApi};
use crate::error::{ApiError, Result};

/// Build a page whose `Name` title property is set, the shape relation
/// targets have.
pub fn page_with_name(id: &str, name: &str) -> Page {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "properties": {
            "Name": {"type": "title", "title": [{"plain_text": name}]}
        }
    }))
    .expect("static page JSON")
}

/// Build a bare page with an empty properties map
pub fn empty_page(id: &str) -> Page {
    serde_json::from_value(serde_json::json!({ "id": id, "properties": {} }))
        .expect("static page JSON")
}

/// Mock Notion client
pub struct MockNotionClient {
    /// Successive query responses, consumed in order
    query_pages: Mutex<Vec<QueryResponse>>,
    /// Pages retrievable by ID
    pages: Mutex<HashMap<String, Page>>,
    /// IDs whose retrieve fails
    failing_pages: Mutex<HashSet<String>>,
    /// Whether query_database fails outright
    query_fails: bool,
    /// Whether check_database fails
    health_check_fails: bool,
    /// Cursors observed by query_database
    cursors: Mutex<Vec<Option<String>>>,
    /// Call counters
    query_count: Mutex<usize>,
    retrieve_count: Mutex<usize>,
}

impl MockNotionClient {
    pub fn new() -> Self {
        Self {
            query_pages: Mutex::new(Vec::new()),
            pages: Mutex::new(HashMap::new()),
            failing_pages: Mutex::new(HashSet::new()),
            query_fails: false,
            health_check_fails: false,
            cursors: Mutex::new(Vec::new()),
            query_count: Mutex::new(0),
            retrieve_count: Mutex::new(0),
        }
    }

    /// Append one query result page of bare records
    pub fn with_query_page(mut self, ids: Vec<&str>, next_cursor: Option<&str>) -> Self {
        let response = QueryResponse {
            results: ids.into_iter().map(empty_page).collect(),
            has_more: next_cursor.is_some(),
            next_cursor: next_cursor.map(String::from),
        };
        self.query_pages.get_mut().push(response);
        self
    }

    /// Append one query result page of fully-formed records
    pub fn with_query_results(mut self, results: Vec<Page>) -> Self {
        let response = QueryResponse {
            results,
            has_more: false,
            next_cursor: None,
        };
        self.query_pages.get_mut().push(response);
        self
    }

    /// Make a page retrievable with the given `Name` title
    pub fn with_page(mut self, id: &str, name: &str) -> Self {
        self.pages
            .get_mut()
            .insert(id.to_string(), page_with_name(id, name));
        self
    }

    /// Make a page retrievable with no title set
    pub fn with_untitled_page(mut self, id: &str) -> Self {
        self.pages.get_mut().insert(id.to_string(), empty_page(id));
        self
    }

    /// Make retrieval of the given ID fail
    pub fn with_failing_page(mut self, id: &str) -> Self {
        self.failing_pages.get_mut().insert(id.to_string());
        self
    }

    /// Make query_database fail
    pub fn with_query_error(mut self) -> Self {
        self.query_fails = true;
        self
    }

    /// Make check_database fail
    pub fn with_failing_health_check(mut self) -> Self {
        self.health_check_fails = true;
        self
    }

    pub async fn query_calls(&self) -> usize {
        *self.query_count.lock().await
    }

    pub async fn retrieve_calls(&self) -> usize {
        *self.retrieve_count.lock().await
    }

    pub async fn seen_cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().await.clone()
    }
}

#[async_trait]
impl NotionApi for MockNotionClient {
    async fn check_database(&self, _database_id: &str) -> Result<()> {
        if self.health_check_fails {
            return Err(ApiError::Unauthorized.into());
        }
        Ok(())
    }

    async fn query_database(
        &self,
        _database_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse> {
        *self.query_count.lock().await += 1;
        self.cursors
            .lock()
            .await
            .push(start_cursor.map(String::from));

        if self.query_fails {
            return Err(ApiError::ServerError("query failed".to_string()).into());
        }

        let mut pages = self.query_pages.lock().await;
        if pages.is_empty() {
            return Ok(QueryResponse {
                results: Vec::new(),
                has_more: false,
                next_cursor: None,
            });
        }
        Ok(pages.remove(0))
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        *self.retrieve_count.lock().await += 1;

        if self.failing_pages.lock().await.contains(page_id) {
            return Err(ApiError::NotFound(page_id.to_string()).into());
        }

        self.pages
            .lock()
            .await
            .get(page_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(page_id.to_string()).into())
    }
}

/// Record of one send_message call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: Option<String>,
}

/// Mock Telegram client
pub struct MockMessagingClient {
    sent: Mutex<Vec<SentRecord>>,
    deleted: Mutex<Vec<(String, i64)>>,
    next_message_id: Mutex<i64>,
    send_fails: bool,
    delete_fails: bool,
}

impl MockMessagingClient {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            next_message_id: Mutex::new(100),
            send_fails: false,
            delete_fails: false,
        }
    }

    /// Make send_message fail
    pub fn with_send_error(mut self) -> Self {
        self.send_fails = true;
        self
    }

    /// Make delete_message fail
    pub fn with_delete_error(mut self) -> Self {
        self.delete_fails = true;
        self
    }

    pub async fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().await.clone()
    }

    pub async fn deleted(&self) -> Vec<(String, i64)> {
        self.deleted.lock().await.clone()
    }
}

#[async_trait]
impl MessagingApi for MockMessagingClient {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<i64> {
        if self.send_fails {
            return Err(ApiError::ServerError("send failed".to_string()).into());
        }

        self.sent.lock().await.push(SentRecord {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode: parse_mode.map(String::from),
        });

        let mut next = self.next_message_id.lock().await;
        *next += 1;
        Ok(*next)
    }

    async fn delete_message(&self, chat_id: &str, message_id: i64) -> Result<()> {
        if self.delete_fails {
            return Err(ApiError::BadRequest("message to delete not found".to_string()).into());
        }

        self.deleted
            .lock()
            .await
            .push((chat_id.to_string(), message_id));
        Ok(())
    }
}
