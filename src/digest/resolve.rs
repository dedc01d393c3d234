//! Relation resolution
//!
//! Turns lists of referenced page IDs into display titles, reading through
//! the title cache to avoid repeat fetches across runs.

use crate::cache::TitleCache;
use crate::client::models::extract_title;
use crate::client::NotionApi;

/// Rendered when a non-empty relation list resolves to no titles at all
pub const NO_RELATION_PLACEHOLDER: &str = "Nenhuma relação encontrada";

/// Title property name on relation target pages
const TITLE_PROPERTY: &str = "Name";

/// Resolve relation IDs to a comma-joined string of display titles.
///
/// Titles come back in input order. An ID whose fetch fails or whose page
/// has no title is skipped silently. An empty input yields an empty string;
/// a non-empty input where nothing resolved yields the placeholder.
pub async fn resolve_relation_titles(
    client: &dyn NotionApi,
    ids: &[String],
    cache: &TitleCache,
) -> String {
    if ids.is_empty() {
        return String::new();
    }

    let mut titles = Vec::new();
    for id in ids {
        if let Some(title) = cache.get(id).await {
            titles.push(title);
            continue;
        }

        match client.retrieve_page(id).await {
            Ok(page) => {
                let title = page
                    .properties
                    .as_ref()
                    .map(|props| extract_title(props, TITLE_PROPERTY))
                    .unwrap_or_default();

                if title.is_empty() {
                    log::debug!("Relation {id} has no title, skipping");
                    continue;
                }

                cache.insert(id, &title).await;
                log::debug!("Relation {id} resolved to {title}");
                titles.push(title);
            }
            Err(err) => {
                log::warn!("Failed to resolve relation {id}: {err}");
            }
        }
    }

    if titles.is_empty() {
        NO_RELATION_PLACEHOLDER.to_string()
    } else {
        titles.join(", ")
    }
}
