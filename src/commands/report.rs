use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use crate::config::Config;
use crate::enrich;
use crate::entities::reports;
use crate::error::{OrangeError, Result};
use crate::llm::{ChatModel, LlmClient};
use crate::model::{new_id, Report};
use crate::store::DocumentStore;

pub fn cmd_report_list(config: &Config) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    let reports = rt.block_on(reports::list_reports(&store))?;

    if reports.is_empty() {
        println!(
            "{} No live reports. Create one with 'orange report add <nickname>'.",
            "Empty:".yellow()
        );
        return Ok(());
    }

    println!("{} {} report(s):", "Reports".green().bold(), reports.len());
    for report in reports {
        println!("  {}  {}", report.id.dimmed(), report.nickname.bold());
        if let Some(teaser) = &report.teaser {
            println!("    {}", teaser.cyan());
        }
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

pub fn cmd_report_add(config: &Config, nickname: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;

    let report = Report {
        id: new_id(),
        nickname: nickname.to_string(),
        current_trial: String::new(),
        progress: String::new(),
        result: String::new(),
        teaser: None,
    };
    rt.block_on(reports::save_report(&store, &report))?;

    println!(
        "{} Added report for {} ({})",
        "Done!".green().bold(),
        nickname.bold(),
        report.id
    );
    Ok(())
}

pub fn cmd_report_edit(
    config: &Config,
    id: &str,
    trial: Option<String>,
    progress: Option<String>,
    result: Option<String>,
) -> Result<()> {
    let rt = super::runtime()?;
    rt.block_on(async {
        let store: Arc<dyn DocumentStore> = Arc::new(super::open_store(config));
        let model: Arc<dyn ChatModel> = Arc::new(LlmClient::new(&config.llm));

        let mut report = reports::get_report(store.as_ref(), id)
            .await?
            .ok_or_else(|| OrangeError::NotFound {
                collection: crate::store::REPORTS.into(),
                key: id.into(),
            })?;

        if let Some(trial) = trial {
            report.current_trial = trial;
        }
        if let Some(progress) = progress {
            report.progress = progress;
        }
        if let Some(result) = result {
            report.result = result;
        }

        let handle = enrich::save_report_with_teaser(store.clone(), model, report).await?;
        println!("{} Report {} saved, generating teaser...", "Done!".green().bold(), id);

        // Let the backfill settle before the process exits
        let _ = handle.await;

        if let Some(saved) = reports::get_report(store.as_ref(), id).await? {
            if let Some(teaser) = saved.teaser {
                println!("  Teaser: {}", teaser.cyan());
            }
        }
        Ok(())
    })
}

pub fn cmd_report_summarize(config: &Config, id: &str, file: Option<&Path>) -> Result<()> {
    let transcript = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    if transcript.trim().is_empty() {
        return Err(OrangeError::Config("transcript is empty".into()));
    }

    let rt = super::runtime()?;
    rt.block_on(async {
        let store: Arc<dyn DocumentStore> = Arc::new(super::open_store(config));
        let model: Arc<dyn ChatModel> = Arc::new(LlmClient::new(&config.llm));

        let mut report = reports::get_report(store.as_ref(), id)
            .await?
            .ok_or_else(|| OrangeError::NotFound {
                collection: crate::store::REPORTS.into(),
                key: id.into(),
            })?;

        let summary = enrich::summarize_transcript(model.as_ref(), &transcript).await?;
        report.current_trial = summary.current_trial;
        report.progress = summary.progress;
        report.result = summary.result;

        println!("{} Summary for {}:", "Done!".green().bold(), report.nickname.bold());
        println!("  trying:   {}", report.current_trial);
        println!("  progress: {}", report.progress);
        println!("  result:   {}", report.result);

        let handle = enrich::save_report_with_teaser(store.clone(), model, report).await?;
        let _ = handle.await;

        if let Some(saved) = reports::get_report(store.as_ref(), id).await? {
            if let Some(teaser) = saved.teaser {
                println!("  Teaser:   {}", teaser.cyan());
            }
        }
        Ok(())
    })
}

/// Declarative full-replace over the live report set; same contract as
/// member sync. Teasers come along verbatim from the file, the enrichment
/// flow is not involved here.
pub fn cmd_report_sync(config: &Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let set: Vec<Report> = serde_json::from_str(&content)?;

    let store = super::open_store(config);
    let rt = super::runtime()?;
    let deleted = rt.block_on(reports::sync_reports(&store, &set))?;

    println!(
        "{} Synced {} report(s), removed {} absent from the new set",
        "Done!".green().bold(),
        set.len(),
        deleted
    );
    Ok(())
}

pub fn cmd_report_remove(config: &Config, id: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    rt.block_on(reports::delete_report(&store, id))?;
    println!("{} Removed report {}", "Done!".green().bold(), id);
    Ok(())
}
