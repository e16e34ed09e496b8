//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl,
//! including run timing, totals, the most-referenced pages and failures.

use crate::output::traits::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Pages listed in the most-referenced table
const TOP_REFERENCED_LIMIT: usize = 20;

/// Writes a markdown summary to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Sitewalk Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed URL**: {}\n", summary.base_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        summary.duration_seconds
    ));
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Crawled**: {}\n", summary.total_pages));
    md.push_str(&format!("- **Total References**: {}\n", summary.total_visits));
    md.push_str(&format!("- **Outgoing Links**: {}\n", summary.total_links));
    md.push_str(&format!("- **Images**: {}\n", summary.total_images));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n",
        summary.success_rate()
    ));
    md.push_str(&format!(
        "- **Error Rate**: {:.2}%\n\n",
        summary.error_rate()
    ));

    // State breakdown
    md.push_str("## Page State Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    md.push_str(&format!("| Extracted | {} |\n", summary.pages_extracted));
    md.push_str(&format!("| Fetch Failed | {} |\n", summary.pages_failed));
    if summary.pages_pending > 0 {
        md.push_str(&format!("| Fetching | {} |\n", summary.pages_pending));
    }
    md.push('\n');

    if !summary.top_referenced.is_empty() {
        md.push_str(&format!(
            "## Top {} Referenced Pages\n\n",
            TOP_REFERENCED_LIMIT
        ));
        md.push_str("| Page | References |\n");
        md.push_str("|------|------------|\n");

        for (key, visits) in summary.top_referenced.iter().take(TOP_REFERENCED_LIMIT) {
            md.push_str(&format!("| {} | {} |\n", key, visits));
        }
        md.push('\n');
    }

    if !summary.failed_pages.is_empty() {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| Page | Error |\n");
        md.push_str("|------|-------|\n");

        for (key, error) in &summary.failed_pages {
            md.push_str(&format!("| {} | {} |\n", key, error.replace('|', "\\|")));
        }
        md.push('\n');
    }

    md
}
