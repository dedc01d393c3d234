//! Run command implementation: the digest pipeline
//!
//! fetch all records → project each batch (resolving relations through the
//! caches) → filter + sort → compose → publish → persist caches.

use chrono::{Local, NaiveDate};
use indicatif::ProgressBar;

use crate::cli::RunContext;
use crate::client::fetch_all_records;
use crate::compose::compose_digest;
use crate::digest::project::project_batch;
use crate::digest::{build_digest, BATCH_SIZE};
use crate::error::{ConfigError, Result};
use crate::output::digest_table;
use crate::publish::publish_digest;

/// Run the digest pipeline
pub async fn run(config_path: Option<&str>, dry_run: bool, date: Option<String>) -> Result<()> {
    let reference = match date {
        Some(ref raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ConfigError::Invalid(format!("Invalid --date '{raw}', expected YYYY-MM-DD")))?,
        None => Local::now().date_naive(),
    };

    log::info!("Starting digest run for {reference}");
    let ctx = RunContext::new(config_path, reference).await?;

    let records = fetch_all_records(&ctx.notion, &ctx.database_id).await?;

    let progress = ProgressBar::new(records.len() as u64);
    let mut rows = Vec::with_capacity(records.len());
    for batch in records.chunks(BATCH_SIZE) {
        rows.extend(
            project_batch(
                &ctx.notion,
                batch,
                &ctx.subject_cache,
                &ctx.page_cache,
                ctx.reference,
            )
            .await,
        );
        progress.inc(batch.len() as u64);
    }
    progress.finish_and_clear();

    log::info!("Projected {} records, filtering and sorting", rows.len());
    let digest = build_digest(rows);

    // Title caches persist whatever this run resolved, send or no send
    ctx.subject_cache.save().await;
    ctx.page_cache.save().await;

    if dry_run {
        println!("{}", digest_table(&digest));
        return Ok(());
    }

    let Some(message) = compose_digest(&digest) else {
        log::info!("No open tasks due within the next 7 days; nothing to send");
        return Ok(());
    };

    let last = ctx.last_message.load();
    let today = ctx.reference.format("%Y-%m-%d").to_string();
    if let Some(record) =
        publish_digest(&ctx.telegram, &ctx.chats, &message, last.as_ref(), &today).await
    {
        ctx.last_message.save(&record);
    }

    Ok(())
}
