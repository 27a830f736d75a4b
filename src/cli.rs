use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "orange",
    about = "O-range team workspace: member profiles, weekly reports, ideas",
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(global = true, long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage member profiles
    Member {
        #[command(subcommand)]
        command: MemberCommand,
    },

    /// Manage this week's live reports
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Manage the idea log
    Idea {
        #[command(subcommand)]
        command: IdeaCommand,
    },

    /// Snapshot this week's reports into history and start a new cycle
    Archive {
        /// Week label to store under (e.g. 2026-W02); defaults to the current ISO week
        #[arg(long)]
        week: Option<String>,

        /// Skip embedding generation for this snapshot
        #[arg(long)]
        no_embeddings: bool,

        /// Keep the live reports instead of clearing them for the new cycle
        #[arg(long)]
        keep_live: bool,
    },

    /// Browse archived weeks
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Ask a question over the archived report history
    Ask {
        question: String,

        /// How many report snippets to ground the answer on
        #[arg(long, default_value_t = crate::rag::DEFAULT_TOP_K)]
        top_k: usize,
    },
}

#[derive(Subcommand)]
pub enum MemberCommand {
    /// List all members
    List,

    /// Show one member's full profile
    Show { id: String },

    /// Add a member
    Add {
        name: String,

        #[arg(long, default_value = "")]
        nickname: String,

        #[arg(long, default_value = "")]
        tagline: String,
    },

    /// Delete a member
    Remove { id: String },

    /// Replace the whole collection with the members in a JSON file
    Sync {
        /// JSON array holding the complete desired member set
        file: PathBuf,
    },

    /// Upload a profile image (JPEG/PNG/WebP, max 5 MB)
    Image {
        id: String,

        /// Path to the image file
        path: PathBuf,

        /// Image slot, 1 or 2
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=2))]
        slot: u8,
    },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// List this week's reports
    List,

    /// Create an empty report for a member
    Add { nickname: String },

    /// Update report fields; regenerates the teaser
    Edit {
        id: String,

        /// What the member is currently trying
        #[arg(long)]
        trial: Option<String>,

        /// What happened this week
        #[arg(long)]
        progress: Option<String>,

        /// Outcomes and next actions
        #[arg(long)]
        result: Option<String>,
    },

    /// Fill a report from a spoken-update transcript
    Summarize {
        id: String,

        /// Transcript file; reads stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Delete a report
    Remove { id: String },

    /// Replace the whole collection with the reports in a JSON file
    Sync {
        /// JSON array holding the complete desired report set
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum IdeaCommand {
    /// List ideas, newest first
    List,

    /// Add an idea; the title is generated in the background
    Add {
        /// Owning member id
        member: String,

        /// Idea text
        content: String,
    },

    /// Record why an idea was turned down
    Reject { id: String, reason: String },

    /// Delete an idea
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List archived weeks
    List,

    /// Show one archived week's reports
    Show { week_id: String },
}
