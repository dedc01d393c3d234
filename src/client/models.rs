//! Typed Notion API payloads and property extractors
//!
//! A page's properties map is a tagged union per property kind. Each
//! extractor is a pure function that returns a default on shape mismatch
//! (wrong kind, empty list, null payload) instead of failing the record.

use std::collections::HashMap;

use serde::Deserialize;

/// One record from a database query or a page retrieve
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,

    /// Absent only in malformed responses; handled by the projector
    #[serde(default)]
    pub properties: Option<Properties>,
}

/// Property name → typed value
pub type Properties = HashMap<String, PropertyValue>;

/// One page of database query results
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A property value, discriminated by the `type` field
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichTextItem>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    Relation {
        #[serde(default)]
        relation: Vec<RelationRef>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextItem>,
    },

    /// Property kinds this bot does not project (people, checkbox, ...)
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,

    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: String,
}

/// First title fragment, trimmed; empty on any mismatch
pub fn extract_title(props: &Properties, name: &str) -> String {
    match props.get(name) {
        Some(PropertyValue::Title { title }) => title
            .first()
            .map(|item| item.plain_text.trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Selected option name; empty when unset or mismatched
pub fn extract_select(props: &Properties, name: &str) -> String {
    match props.get(name) {
        Some(PropertyValue::Select {
            select: Some(option),
        }) => option.name.clone(),
        _ => String::new(),
    }
}

/// IDs of referenced pages, in payload order
pub fn extract_relation_ids(props: &Properties, name: &str) -> Vec<String> {
    match props.get(name) {
        Some(PropertyValue::Relation { relation }) => {
            relation.iter().map(|r| r.id.clone()).collect()
        }
        _ => Vec::new(),
    }
}

/// Start of the date range as an ISO string; empty when unset
pub fn extract_date(props: &Properties, name: &str) -> String {
    match props.get(name) {
        Some(PropertyValue::Date { date: Some(value) }) => value.start.clone(),
        _ => String::new(),
    }
}

/// Content of the first rich-text fragment; empty when unset
pub fn extract_rich_text(props: &Properties, name: &str) -> String {
    match props.get(name) {
        Some(PropertyValue::RichText { rich_text }) => rich_text
            .first()
            .and_then(|item| item.text.as_ref())
            .map(|text| text.content.clone())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
