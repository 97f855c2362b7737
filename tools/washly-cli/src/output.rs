//! Output formatting for the CLI.

use console::{style, Term};
use washly_commerce::cart::{CartLine, LineDetails};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stdout(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Whether stdout is an interactive terminal (prompts are allowed).
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// One-line description of what a cart line holds.
pub fn describe_line(line: &CartLine) -> String {
    match &line.details {
        LineDetails::Package(details) => {
            let mut parts = vec![format!("{} ({})", line.category, details.tier.as_str())];
            parts.extend(details.add_ons.iter().map(|a| match a.quantity {
                Some(q) if q > 1 => format!("+ {} × {}", a.name, q),
                _ => format!("+ {}", a.name),
            }));
            parts.join(" ")
        }
        LineDetails::LaundryBasket(details) => {
            let items: Vec<String> = details
                .items
                .iter()
                .map(|i| format!("{} × {}", i.item, i.quantity))
                .collect();
            format!("{} pcs: {}", details.pieces(), items.join(", "))
        }
        LineDetails::Generic(extras) if extras.is_empty() => line.category.to_string(),
        LineDetails::Generic(extras) => {
            let names: Vec<&str> = extras.iter().map(|e| e.name.as_str()).collect();
            format!("{} + {}", line.category, names.join(", "))
        }
    }
}
