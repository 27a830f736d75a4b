use clap::Parser;

use orange::cli::{Cli, Commands, HistoryCommand, IdeaCommand, MemberCommand, ReportCommand};
use orange::config::Config;
use orange::error::Result;

use orange::commands::ask::cmd_ask;
use orange::commands::history::{cmd_archive, cmd_history_list, cmd_history_show};
use orange::commands::idea::{cmd_idea_add, cmd_idea_list, cmd_idea_reject, cmd_idea_remove};
use orange::commands::member::{
    cmd_member_add, cmd_member_image, cmd_member_list, cmd_member_remove, cmd_member_show,
    cmd_member_sync,
};
use orange::commands::report::{
    cmd_report_add, cmd_report_edit, cmd_report_list, cmd_report_remove, cmd_report_summarize,
    cmd_report_sync,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Member { command } => match command {
            MemberCommand::List => cmd_member_list(&config)?,
            MemberCommand::Show { id } => cmd_member_show(&config, &id)?,
            MemberCommand::Add {
                name,
                nickname,
                tagline,
            } => cmd_member_add(&config, &name, &nickname, &tagline)?,
            MemberCommand::Remove { id } => cmd_member_remove(&config, &id)?,
            MemberCommand::Sync { file } => cmd_member_sync(&config, &file)?,
            MemberCommand::Image { id, path, slot } => {
                cmd_member_image(&config, &id, &path, slot)?
            }
        },

        Commands::Report { command } => match command {
            ReportCommand::List => cmd_report_list(&config)?,
            ReportCommand::Add { nickname } => cmd_report_add(&config, &nickname)?,
            ReportCommand::Edit {
                id,
                trial,
                progress,
                result,
            } => cmd_report_edit(&config, &id, trial, progress, result)?,
            ReportCommand::Summarize { id, file } => {
                cmd_report_summarize(&config, &id, file.as_deref())?
            }
            ReportCommand::Remove { id } => cmd_report_remove(&config, &id)?,
            ReportCommand::Sync { file } => cmd_report_sync(&config, &file)?,
        },

        Commands::Idea { command } => match command {
            IdeaCommand::List => cmd_idea_list(&config)?,
            IdeaCommand::Add { member, content } => cmd_idea_add(&config, &member, &content)?,
            IdeaCommand::Reject { id, reason } => cmd_idea_reject(&config, &id, &reason)?,
            IdeaCommand::Remove { id } => cmd_idea_remove(&config, &id)?,
        },

        Commands::Archive {
            week,
            no_embeddings,
            keep_live,
        } => cmd_archive(&config, week, no_embeddings, keep_live)?,

        Commands::History { command } => match command {
            HistoryCommand::List => cmd_history_list(&config)?,
            HistoryCommand::Show { week_id } => cmd_history_show(&config, &week_id)?,
        },

        Commands::Ask { question, top_k } => cmd_ask(&config, &question, top_k, cli.verbose)?,
    }

    Ok(())
}
