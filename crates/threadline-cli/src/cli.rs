use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use threadline_types::{CommentId, PostId};

#[derive(Parser)]
#[command(
    name = "threadline",
    about = "Threaded comments kept in sync with a remote store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a post's comments once and print the thread
    Show(ShowArgs),
    /// Post a comment or a reply, then print the refreshed thread
    Post(PostArgs),
    /// Keep the thread on screen, re-rendering on every change
    Watch(WatchArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub post: PostId,
}

#[derive(Args)]
pub struct PostArgs {
    #[arg(long)]
    pub post: PostId,
    #[arg(short = 'm', long)]
    pub content: String,
    /// Id of the comment to reply to
    #[arg(long)]
    pub reply_to: Option<CommentId>,
    /// Post as this user id instead of the configured identity
    #[arg(long, requires = "name")]
    pub user_id: Option<String>,
    /// Display name to post under, with --user-id
    #[arg(long, requires = "user_id")]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct WatchArgs {
    #[arg(long)]
    pub post: PostId,
    /// Override the configured poll interval
    #[arg(long)]
    pub interval_ms: Option<u64>,
}
