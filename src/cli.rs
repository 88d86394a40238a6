//! CLI argument parsing for the article pipeline.
//!
//! The CLI is intentionally thin: it wires requests into the studio without
//! embedding policy, so the same core logic can be reused elsewhere.
use crate::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "cstudio",
    version,
    about = "LM-driven article pipeline with session memory",
    after_help = "Examples:\n  cstudio write --topic kubernetes --audience beginners --length short\n  cstudio write --topic rust --session sess-1 --user alice --json\n  cstudio demo\n  cstudio search --query \"rust async\" --max-results 5",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Write(WriteArgs),
    Demo(DemoArgs),
    Search(SearchArgs),
}

/// Write command inputs for one non-interactive pipeline run.
#[derive(Parser, Debug)]
#[command(about = "Run the research/outline/draft/evaluate pipeline once")]
pub struct WriteArgs {
    /// Article topic
    #[arg(long)]
    pub topic: String,

    /// Target audience
    #[arg(long, default_value = "general")]
    pub audience: String,

    /// Desired tone
    #[arg(long, default_value = "friendly")]
    pub tone: String,

    /// Desired length (short, medium, long)
    #[arg(long, default_value = "medium")]
    pub length: String,

    /// Extra constraints passed to the outline step
    #[arg(long)]
    pub constraints: Option<String>,

    /// Session identifier (random when omitted)
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,

    /// User identifier owning the style profile
    #[arg(long, value_name = "ID", default_value = "api-user")]
    pub user: String,

    /// Root directory for profile and session files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Model name sent to the backend
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    pub model: String,

    /// Emit the full response as JSON
    #[arg(long)]
    pub json: bool,
}

/// Demo command inputs for the interactive walkthrough.
#[derive(Parser, Debug)]
#[command(about = "Interactively run the pipeline, with demo fallback output")]
pub struct DemoArgs {
    /// Root directory for profile and session files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Model name sent to the backend
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    pub model: String,
}

/// Search command inputs for the auxiliary web-search tool.
#[derive(Parser, Debug)]
#[command(about = "Search the web (placeholder results without a key)")]
pub struct SearchArgs {
    /// Search query
    #[arg(long)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, default_value_t = 5)]
    pub max_results: usize,
}
