//! Output module: renders orchestrator snapshots for people and scripts
//!
//! This module handles:
//! - One-line progress descriptions of each snapshot
//! - Printing the final crawl result to stdout
//! - JSON rendering of the final snapshot
//! - Markdown summaries of completed crawls

mod markdown;

pub use markdown::{format_markdown_summary, write_markdown_summary};

use crate::client::{CrawlResult, TaskHandle};
use crate::orchestrator::TaskSnapshot;

/// Describes a snapshot in one line, for progress output
pub fn describe_snapshot(snapshot: &TaskSnapshot) -> String {
    match snapshot {
        TaskSnapshot::Idle => "Idle".to_string(),
        TaskSnapshot::Starting { seed } => format!("Submitting crawl for {}", seed),
        TaskSnapshot::Polling {
            handle,
            last_status,
            polls,
        } => {
            let status = last_status
                .as_ref()
                .map(|s| s.as_str())
                .unwrap_or("unknown");
            format!("Task {} is {} (poll {})", handle.id, status, polls)
        }
        TaskSnapshot::Completed { handle, result } => format!(
            "Task {} completed: {} pages, {} links",
            handle.id,
            result.page_count(),
            result.link_count()
        ),
        TaskSnapshot::Failed {
            handle: Some(handle),
            kind,
            message,
        } => format!("Task {} failed ({}): {}", handle.id, kind, message),
        TaskSnapshot::Failed {
            handle: None,
            kind,
            message,
        } => format!("Could not start task ({}): {}", kind, message),
    }
}

/// Renders a snapshot as pretty-printed JSON
pub fn render_json(snapshot: &TaskSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Prints a completed crawl to stdout in a formatted manner
pub fn print_result(handle: &TaskHandle, result: &CrawlResult) {
    println!("=== Crawl Result ===\n");

    println!("Task:");
    println!("  ID: {}", handle.id);
    println!("  Seed: {}", handle.seed);
    println!();

    println!("Overview:");
    println!("  Pages visited: {}", result.page_count());
    println!("  Links found: {}", result.link_count());
    println!();

    if result.is_empty() {
        println!("No pages were returned by the backend.");
        return;
    }

    println!("Pages:");
    for (page, links) in result.pages() {
        println!("  {} ({} links)", page, links.len());
        for link in links {
            println!("    - {}", link);
        }
    }
}
