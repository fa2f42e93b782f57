//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use quotebook_core::{CategoryFilter, Quote};

/// Shown when the active filter matches nothing
pub const EMPTY_CATEGORY_MESSAGE: &str = "No quotes in this category.";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print the displayed quote, or the empty-category message
    pub fn print_quote(&self, quote: Option<&Quote>) {
        match (self.format, quote) {
            (OutputFormat::Human, Some(quote)) => println!("{}", format_quote(quote)),
            (OutputFormat::Human, None) => println!("{}", EMPTY_CATEGORY_MESSAGE),
            (OutputFormat::Json, quote) => print_json(&quote),
            (OutputFormat::Quiet, Some(quote)) => println!("{}", quote.text),
            (OutputFormat::Quiet, None) => {}
        }
    }

    /// Print a list of quotes
    pub fn print_quotes(&self, quotes: &[Quote]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("{}", EMPTY_CATEGORY_MESSAGE);
                    return;
                }
                for quote in quotes {
                    println!("{}", format_quote(quote));
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => print_json(&quotes),
            OutputFormat::Quiet => {
                for quote in quotes {
                    println!("{}", quote.text);
                }
            }
        }
    }

    /// Print the filter choices, marking the active one
    pub fn print_categories(&self, choices: &[String], selected: &CategoryFilter) {
        match self.format {
            OutputFormat::Human => {
                for choice in choices {
                    let marker = if choice == selected.as_str() { "*" } else { " " };
                    println!("{} {}", marker, choice);
                }
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "categories": choices,
                "selected": selected.as_str(),
            })),
            OutputFormat::Quiet => {
                for choice in choices {
                    println!("{}", choice);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a transient notification (sync results)
    pub fn notice(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("» {}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"notice": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// One-line human rendering of a quote
fn format_quote(quote: &Quote) -> String {
    format!("\"{}\" [{}]", quote.text, quote.category)
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_format_quote() {
        let quote = Quote::new("To be or not to be.", "Philosophy").unwrap();
        assert_eq!(format_quote(&quote), "\"To be or not to be.\" [Philosophy]");
    }
}
