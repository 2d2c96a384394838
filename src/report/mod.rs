pub mod types;

pub use types::{OutputFormat, Report, ReportEntry};

use crate::github::PullRequest;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Build a Report from the merged pull requests of `username`.
pub fn build(username: &str, pull_requests: Vec<PullRequest>) -> Report {
    Report {
        username: username.to_string(),
        pull_requests,
    }
}

/// Output the report to the terminal (default) or to a file.
/// Text goes to a file as markdown; JSON is the same document either way.
#[instrument(skip(report), fields(username = %report.username, count = report.pull_requests.len()))]
pub fn output(
    report: &Report,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<(), ReportError> {
    match (format, output_path) {
        (OutputFormat::Text, None) => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        (OutputFormat::Text, Some(path)) => {
            debug!(path = %path.display(), "writing markdown report to file");
            std::fs::write(path, render_markdown(report))?;
            Ok(())
        }
        (OutputFormat::Json, None) => {
            println!("{}", render_json(report)?);
            Ok(())
        }
        (OutputFormat::Json, Some(path)) => {
            debug!(path = %path.display(), "writing JSON report to file");
            std::fs::write(path, render_json(report)?)?;
            Ok(())
        }
    }
}

/// Print the report to the terminal with colors:
///
/// Merged pull requests opened by alice: 2
///
///   ✔ rust-lang/rust#123 Fix the thing (merged 2016-04-02T10:00:00Z)
///     https://github.com/rust-lang/rust/pull/123
fn print_terminal_report(report: &Report) {
    println!();
    println!(
        "Merged pull requests opened by {}: {}",
        report.username.bold(),
        report.pull_requests.len().to_string().green().bold()
    );
    println!();

    if report.pull_requests.is_empty() {
        println!("  No merged pull requests found in recent activity.");
        println!();
        return;
    }

    for pr in &report.pull_requests {
        let entry = ReportEntry::from_pull_request(pr);
        let merged = entry
            .merged_at
            .as_deref()
            .map(|at| format!(" (merged {})", at).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "  {} {} {}{}",
            "✔".green(),
            entry.reference().cyan(),
            entry.title,
            merged
        );
        println!("    {}", entry.link.dimmed());
    }
    println!();
}

fn render_markdown(report: &Report) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "# Merged pull requests opened by {}\n\n",
        report.username
    ));
    md.push_str(&format!("**Total:** {}\n\n", report.pull_requests.len()));

    if report.pull_requests.is_empty() {
        md.push_str("No merged pull requests found in recent activity.\n");
        return md;
    }

    for pr in &report.pull_requests {
        let entry = ReportEntry::from_pull_request(pr);
        md.push_str(&format!(
            "- [{}]({}) {}",
            entry.reference(),
            entry.link,
            entry.title
        ));
        if let Some(at) = &entry.merged_at {
            md.push_str(&format!(" _(merged {})_", at));
        }
        md.push('\n');
    }
    md
}

fn render_json(report: &Report) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&report.pull_requests)?)
}
