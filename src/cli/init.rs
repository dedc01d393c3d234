//! Init command implementation

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Password};

use crate::client::{NotionApi, NotionClient};
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for the Notion and Telegram credentials, verifies Notion access
/// with a health check, and saves the configuration file.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}", "Welcome to duebrief!".bold().green());
    println!("Let's set up your Notion and Telegram credentials.\n");

    let notion_api_key: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your Notion integration token")
        .interact()?;

    let notion_database_id: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Notion database ID")
        .interact_text()?;

    println!("\n{}", "Checking Notion access...".cyan());
    let client = NotionClient::new(notion_api_key.clone())?;
    client.check_database(&notion_database_id).await?;
    println!("{}", "✓ Database reachable!".green());
    println!();

    let telegram_bot_token: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Telegram bot token")
        .interact()?;

    let telegram_chat_id: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Chat ID for the digest")
        .interact_text()?;

    let telegram_chat_id_plain: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Chat ID for the plain-text copy")
        .interact_text()?;

    // Keep a previously configured cache dir, replace everything else
    let existing = Config::load_at(config_path).unwrap_or_default();
    let config = Config {
        notion_api_key: Some(notion_api_key),
        notion_database_id: Some(notion_database_id),
        telegram_bot_token: Some(telegram_bot_token),
        telegram_chat_id: Some(telegram_chat_id),
        telegram_chat_id_plain: Some(telegram_chat_id_plain),
        cache_dir: existing.cache_dir,
    };
    config.save_at(config_path)?;

    let path = Config::resolve_path(config_path)?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!(
        "  {} - Preview today's digest",
        "duebrief run --dry-run".cyan()
    );
    println!("  {} - Show configuration status", "duebrief status".cyan());

    Ok(())
}
