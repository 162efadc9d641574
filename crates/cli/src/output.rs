//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use odcaf_search::{FacilityRecord, Schema};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Print numbered one-line summaries.
pub fn print_facilities(records: &[FacilityRecord]) {
    let width = records.len().to_string().len();
    for (i, record) in records.iter().enumerate() {
        println!(
            "{} {}",
            format!("{:>width$}.", i + 1, width = width).dimmed(),
            record.summary()
        );
    }
}

/// Print the detail block of one facility.
pub fn print_facility_detail(record: &FacilityRecord) {
    Status::header(&record.name);
    for line in record.detail_lines().iter().skip(1) {
        match line.split_once(": ") {
            Some((label, value)) => println!("{} {}", format!("{label}:").bold(), value),
            None => println!("{line}"),
        }
    }
}

/// Print column names and declared types, aligned.
pub fn print_schema(schema: &Schema) {
    let width = schema
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);
    for column in &schema.columns {
        println!("{:<width$}  {}", column.name, column.declared_type.dimmed(), width = width);
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
