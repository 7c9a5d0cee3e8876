use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Spinner shown on stderr while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Writes the rendered region to `path`, or to stdout when no path is given
pub fn emit_html(html: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn print_notice(message: &str) {
    eprintln!("{} {}", "Note:".blue(), message);
}

/// Tells the user where the queued follow-up question will appear
pub fn print_followup_hint(question: &str) {
    eprintln!("{}", "Follow-up question saved:".yellow().bold());
    eprintln!("  {}", question);
    eprintln!(
        "Run {} to ask it.",
        "gita-ashram ask".green().bold()
    );
}

/// Show usage instructions when no subcommand is given
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "gita-ashram ask \"your question\"".green().bold());
    println!("    Ask a free-text question");
    println!();
    println!("  {}", "gita-ashram compass --situation \"...\"".green().bold());
    println!("    Describe a dilemma and receive structured guidance");
    println!();
    println!("  {}", "gita-ashram init-config".green().bold());
    println!("    Write a default config file");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --endpoint <URL>       Use a different chat-gita endpoint");
    println!("  --output <FILE>        Write the rendered HTML to a file");
    println!("  --help                 Show this help message");
    println!();
}
