//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Status lines meant for
//! humans go to stderr when they accompany machine-readable stdout.

use catalog_core::Error;
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

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a subheader
    pub fn subheader(message: &str) {
        println!();
        println!("{}", message.bold().dimmed());
    }
}

/// Print an error with its code, context and suggestion to stderr
///
/// Returns the exit code the process should terminate with.
pub fn report_error(err: &Error) -> i32 {
    Status::error(&format!("{} {}", err.code.to_string().dimmed(), err.message));
    if let Some(context) = &err.context {
        eprintln!("  {} {}", "context:".dimmed(), context);
    }
    if let Some(suggestion) = &err.suggestion {
        eprintln!("  {} {}", "hint:".cyan(), suggestion);
    }
    err.exit_code()
}

/// Render an error as a pretty-printed JSON [`ErrorReport`](catalog_core::error::ErrorReport)
pub fn error_json(err: &Error) -> String {
    serde_json::to_string_pretty(&err.to_report())
        .unwrap_or_else(|_| format!("{{\"code_str\": \"{}\"}}", err.code))
}

/// Print an error as a JSON report to stderr
///
/// Returns the exit code the process should terminate with.
pub fn report_error_json(err: &Error) -> i32 {
    eprintln!("{}", error_json(err));
    err.exit_code()
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

/// Format a price with two decimals and thousands separators
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, cents % 100)
}

/// Format a ratio in `[0, 1]` as a percentage
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::error::exit_codes;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        let d = Duration::from_millis(500);
        assert_eq!(format_duration(d), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        let d = Duration::from_secs_f32(5.5);
        assert_eq!(format_duration(d), "5.5s");
    }

    #[test]
    fn test_format_duration_mins() {
        let d = Duration::from_secs(125);
        assert_eq!(format_duration(d), "2m 5s");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.5), "0.50");
        assert_eq!(format_price(999.0), "999.00");
        assert_eq!(format_price(1299.99), "1,299.99");
        assert_eq!(format_price(1_000_000.0), "1,000,000.00");
        assert_eq!(format_price(-12.3), "-12.30");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.5), "50.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "product", "products"), "1 product");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(5, "product", "products"), "5 products");
    }

    #[test]
    fn test_error_json_report() {
        let err = Error::duplicate_sku("LP-100").with_context("While loading product 7");

        let report: serde_json::Value = serde_json::from_str(&error_json(&err)).unwrap();

        assert_eq!(report["code"], "DUPLICATE_SKU");
        assert_eq!(report["code_str"], "E4002");
        assert_eq!(report["category"], "Catalog");
        assert_eq!(report["context"], "While loading product 7");
        assert!(report.get("source").is_none());
        assert_eq!(report_error_json(&err), exit_codes::DATA_ERROR);
    }

    #[test]
    fn test_report_error_exit_code() {
        let err = Error::validation("Price must be greater than 0").with_suggestion("Use a positive price");
        assert_eq!(report_error(&err), exit_codes::VALIDATION_ERROR);
    }
}
