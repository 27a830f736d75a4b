use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use crate::entities::reports;
use crate::error::{OrangeError, Result};
use crate::history;

pub fn cmd_archive(
    config: &Config,
    week: Option<String>,
    no_embeddings: bool,
    keep_live: bool,
) -> Result<()> {
    let rt = super::runtime()?;
    rt.block_on(async {
        let store = super::open_store(config);
        let embedder = EmbeddingProvider::from_env()?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("static template"),
        );
        if no_embeddings {
            spinner.set_message("archiving reports...");
        } else {
            spinner.set_message("archiving reports (embedding generation may take a while)...");
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let archived = history::archive_reports(&store, &embedder, week, !no_embeddings).await;
        spinner.finish_and_clear();
        let week_id = archived?;

        println!("{} Archived week {}", "Done!".green().bold(), week_id.cyan());

        if keep_live {
            println!("  Live reports kept as-is (--keep-live)");
        } else {
            reports::clear_reports(&store).await?;
            println!("  Live reports cleared for the new cycle");
        }

        println!("\nAsk about past weeks with:");
        println!("  {}", "orange ask \"your question\"".cyan());
        Ok(())
    })
}

pub fn cmd_history_list(config: &Config) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    let records = rt.block_on(history::history_list(&store))?;

    if records.is_empty() {
        println!(
            "{} No archived weeks yet. Save one with 'orange archive'.",
            "Empty:".yellow()
        );
        return Ok(());
    }

    println!("{} {} archived week(s):", "History".green().bold(), records.len());
    for record in records {
        let embeddings = record
            .embeddings
            .as_ref()
            .map(|e| format!("{} embeddings", e.len()))
            .unwrap_or_else(|| "no embeddings".to_string());
        println!(
            "  {}  {} report(s), {} (saved {})",
            record.week_id.cyan(),
            record.reports.len(),
            embeddings,
            record.saved_at.dimmed()
        );
    }
    Ok(())
}

pub fn cmd_history_show(config: &Config, week_id: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    let record = rt
        .block_on(history::history_get(&store, week_id))?
        .ok_or_else(|| OrangeError::NotFound {
            collection: crate::store::REPORTS_HISTORY.into(),
            key: week_id.into(),
        })?;

    println!(
        "{} {} (saved {})",
        "Week".green().bold(),
        record.week_id.cyan(),
        record.saved_at
    );
    for report in record.reports {
        println!("  {}", report.nickname.bold());
        if !report.current_trial.is_empty() {
            println!("    trying:   {}", report.current_trial);
        }
        if !report.progress.is_empty() {
            println!("    progress: {}", report.progress);
        }
        if !report.result.is_empty() {
            println!("    result:   {}", report.result);
        }
    }
    Ok(())
}
