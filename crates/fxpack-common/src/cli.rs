//! Common CLI arguments and console styling.

use clap::Args;
use std::str::FromStr;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "human" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json")),
        }
    }
}

/// Verbosity level shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Summary output
    #[default]
    Normal,
    /// Per-stage diagnostics
    Verbose,
}

/// Arguments accepted by every fxpack command.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format: text, json
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

impl CommonArgs {
    /// Resolve the flags into runtime settings.
    pub fn to_cli(&self) -> Cli {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Cli { verbosity, format: self.format }
    }
}

/// Resolved runtime settings for a command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cli {
    /// How much to print
    pub verbosity: Verbosity,
    /// How to print it
    pub format: OutputFormat,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Default `tracing` filter directive for this verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Consistent console styling.
pub mod styles {
    use console::style;

    pub fn header(text: &str) -> String {
        style(text).bold().underlined().to_string()
    }

    pub fn success(text: &str) -> String {
        format!("{} {}", style("✓").green().bold(), text)
    }

    pub fn info(text: &str) -> String {
        format!("{} {}", style("ℹ").cyan(), text)
    }

    pub fn warning(text: &str) -> String {
        format!("{} {}", style("⚠").yellow().bold(), style(text).yellow())
    }

    pub fn error(text: &str) -> String {
        format!("{} {}", style("✗").red().bold(), style(text).red())
    }
}
