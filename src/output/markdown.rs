//! Markdown summary generation
//!
//! Produces a human-readable report of a completed crawl: task metadata,
//! overall counts, and the link list of every visited page.

use crate::client::{CrawlResult, TaskHandle};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of a completed crawl to `output_path`
pub fn write_markdown_summary(
    handle: &TaskHandle,
    result: &CrawlResult,
    output_path: &Path,
) -> std::io::Result<()> {
    let markdown = format_markdown_summary(handle, result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a completed crawl as markdown
pub fn format_markdown_summary(handle: &TaskHandle, result: &CrawlResult) -> String {
    let mut md = String::new();

    md.push_str("# Crawl Summary\n\n");

    md.push_str("## Task\n\n");
    md.push_str(&format!("- **Task ID**: {}\n", handle.id));
    md.push_str(&format!("- **Seed**: {}\n\n", handle.seed));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", result.page_count()));
    md.push_str(&format!("- **Links Found**: {}\n", result.link_count()));
    let average = if result.page_count() > 0 {
        result.link_count() as f64 / result.page_count() as f64
    } else {
        0.0
    };
    md.push_str(&format!("- **Links per Page**: {:.2}\n\n", average));

    if result.is_empty() {
        return md;
    }

    md.push_str("## Pages\n\n");
    for (page, links) in result.pages() {
        md.push_str(&format!("### {}\n\n", page));
        if links.is_empty() {
            md.push_str("_No links found._\n\n");
            continue;
        }
        for link in links {
            md.push_str(&format!("- {}\n", link));
        }
        md.push('\n');
    }

    md
}
