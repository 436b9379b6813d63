//! CLI module for scout
//!
//! Provides command-line interface parsing for the scout-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// scout - multi-source franchise location search
///
/// Fans a franchise query out to several browsing agents and streams the
/// deduplicated locations they find.
#[derive(Parser, Debug)]
#[command(
    name = "scout-server",
    version,
    about = "scout - multi-source franchise location search",
    long_about = "Fans a franchise location query out to several LLM-driven browsing agents\n\
                  and streams the deduplicated results as they arrive.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  scout-server init                                   # Write scout.toml and .env.example\n    \
                  scout-server                                        # Start the server (requires scout.toml)\n    \
                  scout-server search Subway --city Denver --state CO # Run one search in the terminal\n    \
                  scout-server --config my.toml sources               # List sources from a custom config"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "scout.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Run one search in-process and print events as they arrive
    Search {
        /// Franchise to look for
        franchise: String,

        #[arg(long, default_value = "")]
        city: String,

        #[arg(long, default_value = "")]
        state: String,

        #[arg(long, default_value = "USA")]
        country: String,

        /// Print raw event JSON, one object per line
        #[arg(long)]
        json: bool,
    },

    /// List the sources every search fans out to
    Sources,

    /// Show configuration information
    Config {
        /// Validate the configuration file and report warnings
        #[arg(long)]
        validate: bool,
    },

    /// Write a starter scout.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure (ollama or openai)
        #[arg(long, default_value = "ollama")]
        provider: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
