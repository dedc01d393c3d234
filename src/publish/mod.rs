//! Publish coordination
//!
//! At most one digest message lives per calendar day: a same-day resend
//! deletes the previous message before sending the replacement. The
//! last-sent record only advances when the primary send succeeds.

use crate::cache::LastMessage;
use crate::client::MessagingApi;
use crate::compose::plain_variant;

/// The two destination chats
pub struct ChatTargets {
    /// Receives the MarkdownV2 digest; tracked by the last-sent record
    pub primary: String,
    /// Receives the plain-text copy; outcome never affects the record
    pub plain: String,
}

/// Publish the composed digest.
///
/// Returns the new last-sent record when the primary send succeeds;
/// `None` means the caller must keep the existing record so a later run
/// can still clean up.
pub async fn publish_digest(
    client: &dyn MessagingApi,
    chats: &ChatTargets,
    message: &str,
    last: Option<&LastMessage>,
    today: &str,
) -> Option<LastMessage> {
    // Same-day resend replaces the previous message. Deletion is
    // best-effort: a failure is logged and never blocks the new send.
    if let Some(last) = last {
        if last.date == today {
            if let Err(err) = client.delete_message(&chats.primary, last.message_id).await {
                log::error!("Failed to delete previous message {}: {err}", last.message_id);
            }
        }
    }

    let record = match client
        .send_message(&chats.primary, message, Some("MarkdownV2"))
        .await
    {
        Ok(message_id) => Some(LastMessage {
            message_id,
            date: today.to_string(),
        }),
        Err(err) => {
            log::error!("Failed to send digest to chat {}: {err}", chats.primary);
            None
        }
    };

    // Independent plain-text copy for the second channel
    match client
        .send_message(&chats.plain, &plain_variant(message), Some("Markdown"))
        .await
    {
        Ok(_) => log::info!("Plain-text copy sent to chat {}", chats.plain),
        Err(err) => {
            log::error!("Failed to send plain-text copy to chat {}: {err}", chats.plain)
        }
    }

    record
}
