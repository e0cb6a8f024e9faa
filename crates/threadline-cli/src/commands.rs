use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use colored::Colorize;
use threadline_section::{CommentSection, SectionError, SIGN_IN_NOTICE};
use threadline_sync::{StaticIdentity, SyncConfig, SyncController, SyncError};
use threadline_tree::build_forest_with_report;
use threadline_types::{CommentDraft, Identity};
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;
use crate::render::{print_forest, print_view};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Show(args) => cmd_show(config, args, cli.format).await,
        Command::Post(args) => cmd_post(config, args, cli.format).await,
        Command::Watch(args) => cmd_watch(config, args, cli.format).await,
    }
}

fn controller(config: &CliConfig, identity: Option<Identity>) -> anyhow::Result<SyncController> {
    let store = config.open_store()?;
    let identity = match identity {
        Some(identity) => StaticIdentity::signed_in(identity),
        None => StaticIdentity::anonymous(),
    };
    Ok(SyncController::new(store, Arc::new(identity), config.sync.clone()))
}

async fn cmd_show(config: CliConfig, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let controller = controller(&config, config.identity.clone())?;
    let rows = controller.refresh(args.post).await?;
    let (forest, report) = build_forest_with_report(&rows);
    if !report.is_complete() {
        debug!(
            threads = report.roots,
            placed = report.placed,
            orphans = report.orphans.len(),
            "comments with missing parents are hidden"
        );
    }
    print_forest(&forest, format)
}

async fn cmd_post(config: CliConfig, args: PostArgs, format: OutputFormat) -> anyhow::Result<()> {
    let identity = match (args.user_id, args.name) {
        (Some(user_id), Some(name)) => Some(Identity::new(user_id, name)),
        _ => config.identity.clone(),
    };
    let controller = controller(&config, identity)?;
    let draft = CommentDraft {
        content: args.content,
        parent_comment_id: args.reply_to,
    };

    // Track the post so the refetch after the insert lands in the cache.
    let _state = controller.watch(args.post);
    match controller.post_comment(args.post, draft).await {
        Ok(()) => {}
        Err(SyncError::Unauthenticated) => bail!(SIGN_IN_NOTICE),
        Err(err) => bail!("{}", err.user_message()),
    }
    if format == OutputFormat::Text {
        println!("{} Comment posted on post {}", "✓".green().bold(), args.post.to_string().yellow());
    }

    let query = controller.load_comments(args.post);
    match query.data {
        Some(rows) => print_forest(&build_forest_with_report(&rows).0, format),
        None => {
            println!("{}", query.error.unwrap_or_default().red());
            Ok(())
        }
    }
}

async fn cmd_watch(mut config: CliConfig, args: WatchArgs, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(ms) = args.interval_ms {
        config.sync = SyncConfig::with_poll_interval(Duration::from_millis(ms));
    }
    let controller = controller(&config, config.identity.clone())?;
    let mut section = CommentSection::new(controller, args.post);
    section.mount();
    print_view(&section.render(), format)?;

    loop {
        tokio::select! {
            changed = section.changed() => {
                match changed {
                    Ok(()) => {}
                    Err(SectionError::NotMounted(_)) => break,
                    Err(err) => return Err(err.into()),
                }
                if format == OutputFormat::Text {
                    println!();
                }
                print_view(&section.render(), format)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    section.unmount();
    Ok(())
}
