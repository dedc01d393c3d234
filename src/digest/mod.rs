//! The digest pipeline: projection, relation resolution, filtering
//!
//! Raw Notion records become flat [`Projection`] rows, which are then
//! filtered to the notification window and sorted by urgency.

pub mod filter;
pub mod project;
pub mod resolve;

pub use filter::build_digest;
pub use project::BATCH_SIZE;

/// The flattened, display-ready representation of one source record.
///
/// Created fresh each run, never persisted. `days_remaining` is derived
/// from `due_date` against the run's reference date, not cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub professor: String,
    pub status: String,
    pub kind: String,
    pub stage: String,
    pub subject: String,
    pub due_date: String,
    pub days_remaining: Option<i64>,
    pub description: String,
    pub topics: String,
}
