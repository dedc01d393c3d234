//! Record projection
//!
//! Maps raw Notion records to [`Projection`] rows. Within a batch all
//! records are projected concurrently, including their nested relation
//! fetches; batches run sequentially. A failed fetch degrades one field,
//! never the batch.

use chrono::NaiveDate;
use futures::future;

use super::resolve::resolve_relation_titles;
use super::Projection;
use crate::cache::TitleCache;
use crate::client::models::{
    extract_date, extract_relation_ids, extract_rich_text, extract_select, extract_title, Page,
};
use crate::client::NotionApi;

/// Records projected concurrently per batch
pub const BATCH_SIZE: usize = 50;

/// Whole days between the due date and the run's reference date.
///
/// `None` iff the due date is empty or not calendar-parseable. Datetime
/// strings are truncated to their date part.
pub fn days_remaining(due_date: &str, reference: NaiveDate) -> Option<i64> {
    if due_date.is_empty() {
        return None;
    }

    let date_part = due_date.get(..10)?;
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(due) => Some((due - reference).num_days()),
        Err(err) => {
            log::error!("Failed to parse due date '{due_date}': {err}");
            None
        }
    }
}

/// Project one record, resolving relation fields through the caches.
///
/// Missing or malformed properties degrade to defaults. A record without a
/// properties block yields an all-default row and an error log.
pub async fn project_record(
    client: &dyn NotionApi,
    record: &Page,
    subject_cache: &TitleCache,
    page_cache: &TitleCache,
    reference: NaiveDate,
) -> Projection {
    let Some(props) = record.properties.as_ref() else {
        log::error!("Record {} has no properties block", record.id);
        return Projection::default();
    };

    let due_date = extract_date(props, "Data de Entrega");
    let subject_ids = extract_relation_ids(props, "Matéria");
    let topic_ids = extract_relation_ids(props, "Tópicos");

    Projection {
        professor: extract_title(props, "Professor"),
        status: extract_select(props, "Status"),
        kind: extract_select(props, "Tipo"),
        stage: extract_select(props, "Estágio"),
        subject: resolve_relation_titles(client, &subject_ids, subject_cache).await,
        days_remaining: days_remaining(&due_date, reference),
        due_date,
        description: extract_rich_text(props, "Descrição"),
        topics: resolve_relation_titles(client, &topic_ids, page_cache).await,
    }
}

/// Project one batch concurrently, preserving input order.
///
/// The caller walks the record list in chunks of [`BATCH_SIZE`]; batches
/// run sequentially.
pub async fn project_batch(
    client: &dyn NotionApi,
    batch: &[Page],
    subject_cache: &TitleCache,
    page_cache: &TitleCache,
    reference: NaiveDate,
) -> Vec<Projection> {
    let tasks = batch
        .iter()
        .map(|record| project_record(client, record, subject_cache, page_cache, reference));
    future::join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockNotionClient;
    use tempfile::tempdir;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn task_record(id: &str, due: &str) -> Page {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "properties": {
                "Professor": {"type": "title", "title": [{"plain_text": "Dr. Souza"}]},
                "Status": {"type": "select", "select": {"name": "Em andamento"}},
                "Tipo": {"type": "select", "select": {"name": "Prova"}},
                "Estágio": {"type": "select", "select": {"name": "Teórico"}},
                "Matéria": {"type": "relation", "relation": [{"id": "mat-1"}]},
                "Data de Entrega": {"type": "date", "date": {"start": due}},
                "Descrição": {"type": "rich_text", "rich_text": [
                    {"plain_text": "Cap. 3", "text": {"content": "Cap. 3"}}
                ]},
                "Tópicos": {"type": "relation", "relation": [{"id": "top-1"}, {"id": "top-2"}]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_days_remaining_date_only() {
        assert_eq!(days_remaining("2026-08-09", reference()), Some(3));
        assert_eq!(days_remaining("2026-08-06", reference()), Some(0));
        assert_eq!(days_remaining("2026-08-01", reference()), Some(-5));
    }

    #[test]
    fn test_days_remaining_datetime_truncates() {
        assert_eq!(
            days_remaining("2026-08-09T10:30:00.000-03:00", reference()),
            Some(3)
        );
    }

    #[test]
    fn test_days_remaining_none_iff_empty_or_unparseable() {
        assert_eq!(days_remaining("", reference()), None);
        assert_eq!(days_remaining("soon", reference()), None);
        assert_eq!(days_remaining("2026-13-40", reference()), None);
    }

    #[tokio::test]
    async fn test_project_record_full() {
        let dir = tempdir().unwrap();
        let client = MockNotionClient::new()
            .with_page("mat-1", "Linear Algebra")
            .with_page("top-1", "Eigenvalues")
            .with_page("top-2", "Diagonalization");
        let subject_cache = TitleCache::load(dir.path(), "subjects.json", "subjects");
        let page_cache = TitleCache::load(dir.path(), "pages.json", "pages");

        let record = task_record("rec-1", "2026-08-09");
        let row =
            project_record(&client, &record, &subject_cache, &page_cache, reference()).await;

        assert_eq!(row.professor, "Dr. Souza");
        assert_eq!(row.status, "Em andamento");
        assert_eq!(row.kind, "Prova");
        assert_eq!(row.stage, "Teórico");
        assert_eq!(row.subject, "Linear Algebra");
        assert_eq!(row.due_date, "2026-08-09");
        assert_eq!(row.days_remaining, Some(3));
        assert_eq!(row.description, "Cap. 3");
        assert_eq!(row.topics, "Eigenvalues, Diagonalization");
    }

    #[tokio::test]
    async fn test_project_record_without_properties_defaults() {
        let dir = tempdir().unwrap();
        let client = MockNotionClient::new();
        let subject_cache = TitleCache::load(dir.path(), "subjects.json", "subjects");
        let page_cache = TitleCache::load(dir.path(), "pages.json", "pages");

        let record: Page = serde_json::from_str(r#"{"id": "rec-1"}"#).unwrap();
        let row =
            project_record(&client, &record, &subject_cache, &page_cache, reference()).await;

        assert_eq!(row, Projection::default());
    }

    #[tokio::test]
    async fn test_project_record_missing_fields_degrade() {
        let dir = tempdir().unwrap();
        let client = MockNotionClient::new();
        let subject_cache = TitleCache::load(dir.path(), "subjects.json", "subjects");
        let page_cache = TitleCache::load(dir.path(), "pages.json", "pages");

        let record: Page =
            serde_json::from_str(r#"{"id": "rec-1", "properties": {}}"#).unwrap();
        let row =
            project_record(&client, &record, &subject_cache, &page_cache, reference()).await;

        assert_eq!(row.professor, "");
        assert_eq!(row.days_remaining, None);
        // Empty relation lists yield empty strings, not the placeholder
        assert_eq!(row.subject, "");
        assert_eq!(row.topics, "");
    }

    #[tokio::test]
    async fn test_project_batch_preserves_input_order() {
        let dir = tempdir().unwrap();
        let client = MockNotionClient::new().with_page("mat-1", "Linear Algebra");
        let subject_cache = TitleCache::load(dir.path(), "subjects.json", "subjects");
        let page_cache = TitleCache::load(dir.path(), "pages.json", "pages");

        let records: Vec<Page> = (0..3)
            .map(|i| task_record(&format!("rec-{i}"), &format!("2026-08-0{}", 7 + i)))
            .collect();

        let rows =
            project_batch(&client, &records, &subject_cache, &page_cache, reference()).await;

        let days: Vec<Option<i64>> = rows.iter().map(|r| r.days_remaining).collect();
        assert_eq!(days, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_shared_cache_within_batch() {
        // All three records point at the same subject; the mutex-guarded
        // cache keeps redundant fetches from corrupting anything, and later
        // sequential lookups hit the cache.
        let dir = tempdir().unwrap();
        let client = MockNotionClient::new().with_page("mat-1", "Linear Algebra");
        let subject_cache = TitleCache::load(dir.path(), "subjects.json", "subjects");
        let page_cache = TitleCache::load(dir.path(), "pages.json", "pages");

        let records: Vec<Page> =
            (0..3).map(|i| task_record(&format!("rec-{i}"), "2026-08-09")).collect();

        let rows =
            project_batch(&client, &records, &subject_cache, &page_cache, reference()).await;

        assert!(rows.iter().all(|r| r.subject == "Linear Algebra"));
        assert_eq!(subject_cache.get("mat-1").await.as_deref(), Some("Linear Algebra"));
    }
}
