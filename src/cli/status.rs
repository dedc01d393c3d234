//! Status command implementation

use colored::Colorize;

use crate::cache::{
    file_age_days, LastMessageStore, PAGE_TITLES_FILE, SUBJECT_TITLES_FILE,
    TITLE_CACHE_MAX_AGE_DAYS,
};
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration and cache state
pub fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}\n", "duebrief Configuration Status".bold());

    let path = Config::resolve_path(config_path)?;
    if path.exists() {
        println!("Config file: {}", path.display().to_string().cyan());
    } else {
        println!(
            "Config file: {} {}",
            path.display().to_string().cyan(),
            "(not present, environment only)".dimmed()
        );
    }
    println!();

    let config = Config::load_at(config_path)?;

    let fields = [
        ("Notion token", config.notion_api_key.is_some()),
        ("Notion database", config.notion_database_id.is_some()),
        ("Telegram bot token", config.telegram_bot_token.is_some()),
        ("Digest chat", config.telegram_chat_id.is_some()),
        ("Plain-text chat", config.telegram_chat_id_plain.is_some()),
    ];

    for (label, present) in fields {
        if present {
            println!("{} {} configured", "✓".green(), label);
        } else {
            println!("{} {} not configured", "✗".red(), label);
        }
    }
    if config.validate().is_err() {
        println!("  → Run 'duebrief init' to complete setup");
    }
    println!();

    let cache_dir = config.cache_dir()?;
    println!(
        "Cache directory: {}",
        cache_dir.display().to_string().cyan()
    );

    for file in [SUBJECT_TITLES_FILE, PAGE_TITLES_FILE] {
        let cache_path = cache_dir.join(file);
        match file_age_days(&cache_path) {
            Some(age) if age > TITLE_CACHE_MAX_AGE_DAYS => println!(
                "{} {} stale ({} days old, rebuilt on next run)",
                "⚠".yellow(),
                file,
                age
            ),
            Some(age) => println!("{} {} fresh ({} days old)", "✓".green(), file, age),
            None => println!("{} {} not present", "○".dimmed(), file),
        }
    }

    match LastMessageStore::open(&cache_dir).load() {
        Some(record) => println!(
            "{} Last digest sent {} (message {})",
            "✓".green(),
            record.date,
            record.message_id
        ),
        None => println!("{} No digest sent yet", "○".dimmed()),
    }
    println!();

    Ok(())
}
