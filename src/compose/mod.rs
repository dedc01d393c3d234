//! Message composition
//!
//! Renders digest rows into Telegram MarkdownV2 blocks, joins them into a
//! single batched message, and derives the plain-text variant for the
//! markup-unaware channel.

use chrono::NaiveDate;

use crate::digest::filter::WINDOW_DAYS;
use crate::digest::Projection;

/// Characters MarkdownV2 reserves; each is prefixed with a backslash
const RESERVED_CHARS: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Separator block between tasks in the batched message
const TASK_SEPARATOR: &str = "\n\n*\\-\\-\\-\\-\\-\\-*\n\n";

/// Portuguese month names, January first
const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Escape every reserved MarkdownV2 character
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Remove escape backslashes, yielding the plain-text rendition.
///
/// A backslash consumes the character after it; a trailing backslash is
/// kept as-is.
pub fn strip_escapes(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => plain.push(next),
                None => plain.push('\\'),
            }
        } else {
            plain.push(c);
        }
    }
    plain
}

/// Format an ISO date as `{day} de {Month}`; unparseable input passes
/// through unchanged.
pub fn format_due_date(date_str: &str) -> String {
    let parsed = date_str
        .get(..10)
        .and_then(|part| NaiveDate::parse_from_str(part, "%Y-%m-%d").ok());

    match parsed {
        Some(date) => {
            use chrono::Datelike;
            format!("{} de {}", date.day(), MONTHS[date.month0() as usize])
        }
        None => date_str.to_string(),
    }
}

/// Render one digest row as a MarkdownV2 block.
///
/// Returns `None` when the row has no known due date or lies beyond the
/// notification window, so the composer stays safe without the upstream
/// filter.
pub fn render_task(task: &Projection) -> Option<String> {
    let days = task.days_remaining?;
    if days > WINDOW_DAYS {
        return None;
    }

    let kind = escape_markdown_v2(&task.kind.to_uppercase());
    let subject = escape_markdown_v2(&task.subject);
    let description = if task.description.is_empty() {
        escape_markdown_v2("Sem descrição")
    } else {
        escape_markdown_v2(&task.description)
    };
    let due = format_due_date(&task.due_date);

    let topics = if task.topics.is_empty() {
        "Sem Tópicos".to_string()
    } else {
        task.topics.clone()
    };
    let topic_lines: Vec<String> = topics
        .split(", ")
        .map(|topic| format!("\\- _{}_", escape_markdown_v2(topic.trim())))
        .collect();

    let days_text = if days == 0 {
        "🚨 HOJE 🚨".to_string()
    } else {
        format!("{} DIA{}", days, if days > 1 { "S" } else { "" })
    };

    Some(format!(
        "*{} \\- {}*\nDias Restantes: *{}*\nEntrega: `{}`\nTópicos:\n{}\nDescrição: _{}_",
        kind,
        subject,
        days_text,
        due,
        topic_lines.join("\n"),
        description,
    ))
}

/// Join per-task messages into one batched message.
pub fn render_batch(messages: &[String]) -> String {
    messages.join(TASK_SEPARATOR)
}

/// Compose the full digest message, or `None` when no row renders.
pub fn compose_digest(rows: &[Projection]) -> Option<String> {
    let messages: Vec<String> = rows.iter().filter_map(render_task).collect();
    if messages.is_empty() {
        return None;
    }
    Some(render_batch(&messages))
}

/// The plain-text variant for the markup-unaware channel: escapes
/// stripped, wrapped in a fenced block.
pub fn plain_variant(message: &str) -> String {
    format!("```md\n{}```", strip_escapes(message))
}
