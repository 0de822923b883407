use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "content-portal")]
#[command(about = "Client/agency content workflow portal")]
#[command(long_about = "Content Portal tracks each content item of a client package from direction \
                       through drafts, feedback rounds and approval, and reports where every item \
                       stands against its deadlines. Start with 'content-portal status'.")]
pub struct Cli {
    /// Configuration file (defaults to content-portal.toml in the working directory)
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,
    /// Snapshot file override
    #[arg(long, global = true, help = "Path of the JSON snapshot, overriding the configured one")]
    pub snapshot: Option<PathBuf>,
    /// Evaluate as of this instant instead of the current time
    #[arg(long, global = true, help = "RFC 3339 timestamp or YYYY-MM-DD date to use as 'now'")]
    pub now: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every content item of a client with its status and next action
    Status {
        /// Client email; lists all clients when omitted
        #[arg(long, help = "Client email to show the dashboard for")]
        client: Option<String>,
        /// Only show items that are overdue or due soon
        #[arg(long, help = "Only list items that need attention")]
        attention: bool,
        /// Print the dashboard as JSON
        #[arg(long, help = "Emit machine-readable JSON instead of text")]
        json: bool,
    },
    /// Show the full record of one content item
    Peek {
        #[arg(long, help = "Client email")]
        client: String,
        #[arg(long, help = "Content id, e.g. content-1")]
        content: String,
    },
    /// Create or update a client package
    Register {
        #[arg(long, help = "Client email")]
        client: String,
        /// Number of content items in the package
        #[arg(long, default_value = "3", help = "Number of content items in the package")]
        contents: u32,
        #[arg(long, help = "Display name for the client")]
        name: Option<String>,
        #[arg(long, help = "Date directions are due (YYYY-MM-DD)")]
        direction_deadline: Option<String>,
        #[arg(long, help = "Date all content is due (YYYY-MM-DD)")]
        content_deadline: Option<String>,
    },
    /// Submit the client's direction for a content item
    Direction {
        #[arg(long, help = "Client email")]
        client: String,
        #[arg(long, help = "Content id, e.g. content-1")]
        content: String,
        #[arg(long, help = "Direction text for the agency")]
        text: String,
        #[arg(long, help = "Optional reference file URL")]
        file_url: Option<String>,
    },
    /// Upload the agency's next draft for a content item
    Upload {
        #[arg(long, help = "Client email")]
        client: String,
        #[arg(long, help = "Content id, e.g. content-1")]
        content: String,
        #[arg(long, help = "URL of the draft asset")]
        file_url: String,
        #[arg(long, default_value = "", help = "Caption for the draft")]
        caption: String,
    },
    /// Request changes on the draft awaiting approval
    Feedback {
        #[arg(long, help = "Client email")]
        client: String,
        #[arg(long, help = "Content id, e.g. content-1")]
        content: String,
        #[arg(long, help = "What should change in the next draft")]
        text: String,
        #[arg(long, help = "Optional annotated file URL")]
        file_url: Option<String>,
    },
    /// Approve the draft awaiting approval
    Approve {
        #[arg(long, help = "Client email")]
        client: String,
        #[arg(long, help = "Content id, e.g. content-1")]
        content: String,
    },
    /// Mark an approved content item as delivered
    Complete {
        #[arg(long, help = "Client email")]
        client: String,
        #[arg(long, help = "Content id, e.g. content-1")]
        content: String,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, help = "Overwrite an existing content-portal.toml")]
        force: bool,
        /// Show what would be written without making changes
        #[arg(long, help = "Print the configuration without writing it")]
        dry_run: bool,
    },
}
