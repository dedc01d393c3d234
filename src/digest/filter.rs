//! Digest filtering and ordering
//!
//! Keeps rows with a known due date inside the notification window and an
//! open status, then orders them most-urgent first.

use super::Projection;

/// Inclusive upper bound of the notification window, in days
pub const WINDOW_DAYS: i64 = 7;

/// Statuses that exclude a row from the digest
pub const EXCLUDED_STATUSES: [&str; 2] = ["Concluído", "Done"];

/// Whether a row belongs in the digest
pub fn is_eligible(row: &Projection) -> bool {
    if EXCLUDED_STATUSES.contains(&row.status.as_str()) {
        return false;
    }
    matches!(row.days_remaining, Some(days) if (0..=WINDOW_DAYS).contains(&days))
}

/// Sort ascending by days remaining, rows without a value last.
///
/// The filter already drops rows without a value, so the nulls-last rule
/// only matters when sorting unfiltered rows; the sort is stable either way.
pub fn sort_digest(rows: &mut [Projection]) {
    rows.sort_by_key(|row| (row.days_remaining.is_none(), row.days_remaining));
}

/// Filter and sort projections into the final digest.
pub fn build_digest(rows: Vec<Projection>) -> Vec<Projection> {
    let mut digest: Vec<Projection> = rows.into_iter().filter(is_eligible).collect();
    sort_digest(&mut digest);
    digest
}
