//! CLI output formatting for all commands.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects. Warnings (skipped files,
//! recovered records) go to stderr via [`print_warnings`] so they survive
//! piping stdout.

use crate::generate::GenerateSummary;
use crate::validate::FileReport;
use std::path::Path;

// ============================================================================
// generate-ids
// ============================================================================

pub fn format_generate_summary(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Found {} posts, {} tags, {} categories",
            summary.posts_found, summary.tags_found, summary.categories_found
        ),
        format!(
            "Assigned {} new post IDs, {} new tag IDs, {} new category IDs",
            summary.new_blog_ids, summary.new_tag_ids, summary.new_category_ids
        ),
        format!(
            "Posts: {} published, {} test/experimental",
            summary.regular_posts, summary.test_posts
        ),
    ];
    if !summary.skipped.is_empty() {
        lines.push(format!(
            "Skipped {} unparsable file(s) — they received no IDs",
            summary.skipped.len()
        ));
    }
    lines
}

/// Warning lines for a generate run: recovered (data-loss) records and
/// skipped files.
pub fn format_generate_warnings(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for path in &summary.recovered {
        lines.push(format!(
            "warning: {} was corrupt and has been reset — previously assigned IDs were lost, investigate before publishing",
            path.display()
        ));
    }
    for (path, reason) in &summary.skipped {
        lines.push(format!("warning: skipped {}: {}", path.display(), reason));
    }
    lines
}

pub fn print_generate_output(summary: &GenerateSummary) {
    print_warnings(&format_generate_warnings(summary));
    for line in format_generate_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// update
// ============================================================================

pub fn format_update_line(path: &Path, changed: bool) -> String {
    if changed {
        format!("{}: contentHash and lastUpdated regenerated", path.display())
    } else {
        format!("{}: unchanged", path.display())
    }
}

pub fn format_update_footer(changed: usize, total: usize) -> String {
    format!("Updated {}/{} files", changed, total)
}

// ============================================================================
// check
// ============================================================================

pub fn format_check_output(reports: &[FileReport], total_files: usize) -> Vec<String> {
    if reports.is_empty() {
        return vec![format!("{} content files are valid", total_files)];
    }
    let mut lines = Vec::new();
    for report in reports {
        lines.push(report.path.display().to_string());
        for error in &report.errors {
            lines.push(format!("    - {}", error));
        }
    }
    lines.push(format!(
        "{} of {} files have validation errors",
        reports.len(),
        total_files
    ));
    lines
}

pub fn print_check_output(reports: &[FileReport], total_files: usize) {
    for line in format_check_output(reports, total_files) {
        println!("{}", line);
    }
}

// ============================================================================
// Shared
// ============================================================================

pub fn print_warnings(lines: &[String]) {
    for line in lines {
        eprintln!("{}", line);
    }
}
