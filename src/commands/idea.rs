use std::sync::Arc;

use colored::Colorize;

use crate::config::Config;
use crate::enrich;
use crate::entities::{ideas, members};
use crate::error::{OrangeError, Result};
use crate::llm::{ChatModel, LlmClient};
use crate::store::DocumentStore;

pub fn cmd_idea_list(config: &Config) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    let ideas = rt.block_on(ideas::list_ideas(&store))?;

    if ideas.is_empty() {
        println!(
            "{} No ideas yet. Add one with 'orange idea add <member> <content>'.",
            "Empty:".yellow()
        );
        return Ok(());
    }

    println!("{} {} idea(s):", "Ideas".green().bold(), ideas.len());
    for idea in ideas {
        let marker = if idea.rejection_reason.is_some() {
            "rejected".red().to_string()
        } else {
            "open".green().to_string()
        };
        println!(
            "  {}  {} [{}] by {}",
            idea.id.dimmed(),
            idea.idea_name.bold(),
            marker,
            idea.member_name
        );
        if let Some(reason) = &idea.rejection_reason {
            println!("    reason: {}", reason);
        }
    }
    Ok(())
}

pub fn cmd_idea_add(config: &Config, member_id: &str, content: &str) -> Result<()> {
    let rt = super::runtime()?;
    rt.block_on(async {
        let store: Arc<dyn DocumentStore> = Arc::new(super::open_store(config));
        let model: Arc<dyn ChatModel> = Arc::new(LlmClient::new(&config.llm));

        let member = members::get_member(store.as_ref(), member_id)
            .await?
            .ok_or_else(|| OrangeError::NotFound {
                collection: crate::store::MEMBERS.into(),
                key: member_id.into(),
            })?;

        let (idea, handle) =
            enrich::add_idea_with_title(store.clone(), model, member_id, &member.name, content)
                .await?;
        println!("{} Idea {} saved, generating title...", "Done!".green().bold(), idea.id);

        let _ = handle.await;

        if let Some(saved) = ideas::get_idea(store.as_ref(), &idea.id).await? {
            println!("  Title: {}", saved.idea_name.cyan());
        }
        Ok(())
    })
}

pub fn cmd_idea_reject(config: &Config, id: &str, reason: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    let idea = rt.block_on(ideas::reject_idea(&store, id, reason))?;
    println!("{} Rejected '{}': {}", "Done!".green().bold(), idea.idea_name, reason);
    Ok(())
}

pub fn cmd_idea_remove(config: &Config, id: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    rt.block_on(ideas::delete_idea(&store, id))?;
    println!("{} Removed idea {}", "Done!".green().bold(), id);
    Ok(())
}
