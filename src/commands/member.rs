use std::path::Path;

use colored::Colorize;

use crate::config::Config;
use crate::entities::members;
use crate::error::{OrangeError, Result};
use crate::model::{new_id, Member};
use crate::store::blob::{member_image_path, validate_image, BlobStore};

pub fn cmd_member_list(config: &Config) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    let members = rt.block_on(members::list_members(&store))?;

    if members.is_empty() {
        println!(
            "{} No members yet. Add one with 'orange member add <name>'.",
            "Empty:".yellow()
        );
        return Ok(());
    }

    println!("{} {} member(s):", "Members".green().bold(), members.len());
    for member in members {
        let mut line = format!("  {}  {}", member.id.dimmed(), member.name.bold());
        if !member.nickname.is_empty() {
            line.push_str(&format!(" ({})", member.nickname));
        }
        if !member.tagline.is_empty() {
            line.push_str(&format!(" - {}", member.tagline));
        }
        println!("{}", line);
    }
    Ok(())
}

pub fn cmd_member_show(config: &Config, id: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    let member = rt
        .block_on(members::get_member(&store, id))?
        .ok_or_else(|| OrangeError::NotFound {
            collection: crate::store::MEMBERS.into(),
            key: id.into(),
        })?;

    println!("{} {}", "Member".green().bold(), member.name.bold());
    println!("  id:       {}", member.id);
    println!("  nickname: {}", member.nickname);
    println!("  tagline:  {}", member.tagline);
    println!("  birth:    {}", member.birth_date);
    println!("  hometown: {}", member.hometown);
    println!("  hobbies:  {}", member.hobbies);
    println!("  thoughts: {}", member.thoughts);
    println!("  career:   {}", member.career);
    if let Some(url) = &member.image_no1 {
        println!("  image 1:  {}", url);
    }
    if let Some(url) = &member.image_no2 {
        println!("  image 2:  {}", url);
    }
    Ok(())
}

pub fn cmd_member_add(config: &Config, name: &str, nickname: &str, tagline: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;

    let member = Member {
        id: new_id(),
        name: name.to_string(),
        nickname: nickname.to_string(),
        tagline: tagline.to_string(),
        image_no1: None,
        image_no2: None,
        birth_date: String::new(),
        hometown: String::new(),
        hobbies: String::new(),
        thoughts: String::new(),
        career: String::new(),
    };
    rt.block_on(members::save_member(&store, &member))?;

    println!("{} Added member {} ({})", "Done!".green().bold(), name.bold(), member.id);
    Ok(())
}

/// Declarative full-replace: the file holds the complete desired member
/// set, and anything persisted but absent from it gets deleted. Last write
/// wins when two editors sync at once.
pub fn cmd_member_sync(config: &Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let members: Vec<Member> = serde_json::from_str(&content)?;

    let store = super::open_store(config);
    let rt = super::runtime()?;
    let deleted = rt.block_on(members::sync_members(&store, &members))?;

    println!(
        "{} Synced {} member(s), removed {} absent from the new set",
        "Done!".green().bold(),
        members.len(),
        deleted
    );
    Ok(())
}

pub fn cmd_member_remove(config: &Config, id: &str) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;
    rt.block_on(members::delete_member(&store, id))?;
    println!("{} Removed member {}", "Done!".green().bold(), id);
    Ok(())
}

pub fn cmd_member_image(config: &Config, id: &str, path: &Path, slot: u8) -> Result<()> {
    let store = super::open_store(config);
    let rt = super::runtime()?;

    rt.block_on(async {
        let mut member =
            members::get_member(&store, id)
                .await?
                .ok_or_else(|| OrangeError::NotFound {
                    collection: crate::store::MEMBERS.into(),
                    key: id.into(),
                })?;

        // Validate before touching storage
        let bytes = std::fs::read(path)?;
        let kind = validate_image(&bytes)?;

        let blobs = BlobStore::new(config.blob_dir());
        let url = blobs.put(&member_image_path(id, slot, kind), &bytes)?;

        let previous = match slot {
            1 => member.image_no1.replace(url.clone()),
            _ => member.image_no2.replace(url.clone()),
        };
        members::save_member(&store, &member).await?;

        // The entity write has succeeded; the old blob is garbage now
        if let Some(old) = previous {
            let _ = blobs.delete(&old);
        }

        println!("{} Uploaded image {} for {}", "Done!".green().bold(), slot, member.name);
        println!("  {}", url);
        Ok(())
    })
}
