//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the scout CLI.

use crate::search::SearchEvent;
use crate::utils::phone::format_phone;
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the banner
    pub fn banner(&self) {
        let art = r#"
  ___  ___ ___  _   _ _____
 / __|/ __/ _ \| | | |_   _|
 \__ \ (_| (_) | |_| | | |
 |___/\___\___/ \___/  |_|
"#;
        if self.colored {
            println!("{}", art.bright_cyan().bold());
            println!(
                "   {} {}\n",
                "Multi-source franchise location search".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("{}", art);
            println!(
                "   Multi-source franchise location search v{}\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message with next steps
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header = table_line(columns);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 21).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 21));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", table_line(values));
    }

    /// Print one search event as it arrives
    pub fn event(&self, event: &SearchEvent) {
        let (tag, text) = describe_event(event);
        if !self.colored {
            println!("  [{}] {}", tag, text);
            return;
        }

        match event {
            SearchEvent::RecordFound { .. } => println!("  {} {}", tag.green().bold(), text),
            SearchEvent::Fallback { .. } => println!("  {} {}", tag.yellow().bold(), text.yellow()),
            SearchEvent::WorkerError { .. } => println!("  {} {}", tag.red(), text.red()),
            SearchEvent::FatalError { .. } => eprintln!("  {} {}", tag.red().bold(), text.red().bold()),
            SearchEvent::AllDone => println!("\n  {} {}", tag.bright_green().bold(), text),
            _ => println!("  {} {}", tag.dimmed(), text.dimmed()),
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

fn table_line(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|c| format!("{:<20}", c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short tag and human-readable line for an event
pub fn describe_event(event: &SearchEvent) -> (&'static str, String) {
    match event {
        SearchEvent::Init { message } => ("init", message.clone()),
        SearchEvent::Progress { message, .. } => ("search", message.clone()),
        SearchEvent::RecordFound { location, source } => (
            "found",
            format!(
                "{} | {} ({})",
                location.address,
                format_phone(&location.phone),
                source
            ),
        ),
        SearchEvent::WorkerError { source, message } => ("error", format!("{}: {}", source, message)),
        SearchEvent::WorkerDone { source } => ("done", format!("{} finished", source)),
        SearchEvent::Fallback { location } => ("none", location.address.clone()),
        SearchEvent::AllDone => ("complete", "All sources finished".to_string()),
        SearchEvent::FatalError { message } => ("fatal", message.clone()),
    }
}
