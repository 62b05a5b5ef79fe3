//! Output formatting and styling module.
//!
//! Provides a centralized interface for all user-facing output: colored
//! status lines, the dispatch progress bar and the end-of-run summary.

use crate::report::SortReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

    /// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Status lines (success, error, warning, info)
/// - The dispatch progress bar
/// - The end-of-run summary of a [`SortReport`]
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::success("Extracted data.zip");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::error("broken.zip: archive unreadable");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::warning("images/IMG.jpg was overwritten by trip/day2/IMG.jpg");
    /// ```
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::info("Sorting /home/user/Downloads");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    ///
    /// # Arguments
    ///
    /// * `header` - The header text
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for file operations.
    ///
    /// Falls back to the default bar style if the template cannot be parsed.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of files to dispatch
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints the end-of-run summary: normalized names per category, the
    /// extensions seen, failures and pruned directories.
    ///
    /// # Arguments
    ///
    /// * `report` - The finished run report
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// use foldersort::report::SortReport;
    /// use std::path::PathBuf;
    ///
    /// let mut report = SortReport::new(PathBuf::from("/home/user/Downloads"), false);
    /// report.finish();
    /// OutputFormatter::summary(&report);
    /// ```
    pub fn summary(report: &SortReport) {
        Self::header("SUMMARY");

        let width = report
            .categories
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for (category, names) in &report.categories {
            if names.is_empty() {
                continue;
            }
            let file_word = if names.len() == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                names.len().to_string().green(),
                file_word,
                width = width
            );
            for name in names {
                println!("{:<width$} |   {}", "", name, width = width);
            }
        }
        println!("{}", "-".repeat(width + 10));
        let total = report.total_files();
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            if total == 1 { "file" } else { "files" },
            width = width
        );

        if !report.extensions.is_empty() {
            println!(
                "\nKnown extensions: {}",
                report.extensions.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
        if !report.unknown_extensions.is_empty() {
            println!(
                "Unknown extensions: {}",
                report
                    .unknown_extensions
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
                    .yellow()
            );
        }

        if report.dry_run {
            Self::dry_run_notice("No files were modified.");
            return;
        }

        println!(
            "\nMoved: {}  Extracted: {}  Removed folders: {}",
            report.moved,
            report.extracted,
            report.removed_dirs.len()
        );
        if report.is_complete_success() {
            Self::success("Sorting complete!");
        } else {
            Self::warning(&format!(
                "{} file(s) could not be sorted. Please review errors above.",
                report.failures.len()
            ));
        }
    }
}
