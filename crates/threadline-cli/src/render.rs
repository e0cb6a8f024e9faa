use colored::Colorize;
use threadline_section::{Composer, SectionView, ThreadBody, SIGN_IN_NOTICE};
use threadline_tree::{walk, CommentNode};

use crate::cli::OutputFormat;

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One line per comment, replies indented two spaces per level.
pub fn thread_lines(forest: &[CommentNode]) -> Vec<String> {
    walk(forest)
        .map(|(depth, node)| {
            let comment = &node.comment;
            format!(
                "{:indent$}#{} {} ({}): {}",
                "",
                comment.id,
                comment.author_display_name,
                comment.created_at.format(TIMESTAMP),
                comment.content,
                indent = depth * 2,
            )
        })
        .collect()
}

pub fn print_forest(forest: &[CommentNode], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(forest)?),
        OutputFormat::Text if forest.is_empty() => println!("{}", "No comments yet.".dimmed()),
        OutputFormat::Text => {
            for line in thread_lines(forest) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

pub fn print_view(view: &SectionView, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string(view)?);
        return Ok(());
    }

    println!("{} {}", "Comments on post".bold(), view.post_id.to_string().yellow());
    match &view.thread {
        ThreadBody::Loading => println!("{}", "Loading comments...".dimmed()),
        ThreadBody::Failed { message, stale } => {
            println!("{} {}", "✗".red().bold(), message.red());
            if let Some(forest) = stale {
                print_forest(forest, format)?;
            }
        }
        ThreadBody::Ready { forest } => print_forest(forest, format)?,
    }
    match &view.composer {
        Composer::Open { display_name } => println!("Posting as {}", display_name.cyan()),
        Composer::SignInNotice => println!("{}", SIGN_IN_NOTICE.dimmed()),
    }
    if let Some(error) = &view.post_error {
        println!("{} {}", "Post failed:".red(), error);
    }
    Ok(())
}
