//! Table output formatting for the dry-run preview

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::digest::Projection;

#[derive(Tabled)]
struct DigestRow {
    #[tabled(rename = "DIAS")]
    days: String,
    #[tabled(rename = "TIPO")]
    kind: String,
    #[tabled(rename = "MATÉRIA")]
    subject: String,
    #[tabled(rename = "ENTREGA")]
    due_date: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "PROFESSOR")]
    professor: String,
}

impl From<&Projection> for DigestRow {
    fn from(row: &Projection) -> Self {
        Self {
            days: row
                .days_remaining
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            kind: row.kind.clone(),
            subject: row.subject.clone(),
            due_date: row.due_date.clone(),
            status: row.status.clone(),
            professor: row.professor.clone(),
        }
    }
}

/// Format the digest as a table for terminal preview
pub fn digest_table(rows: &[Projection]) -> String {
    if rows.is_empty() {
        return "No tasks due in the next 7 days.".to_string();
    }

    let rows: Vec<DigestRow> = rows.iter().map(DigestRow::from).collect();
    let mut table = Table::new(&rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}
