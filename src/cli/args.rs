// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Progress indicator modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Dots,
    Bar,
    None,
    Verbose,
}

impl std::str::FromStr for ProgressMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dots" => Ok(Self::Dots),
            "bar" => Ok(Self::Bar),
            "none" => Ok(Self::None),
            "verbose" => Ok(Self::Verbose),
            _ => Ok(Self::Dots),
        }
    }
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Html,
    Junit,
}

/// Test report renderer for JSONL run-event logs
#[derive(Parser, Debug)]
#[command(name = "reportify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render test-run event logs as console, HTML, or JUnit XML reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Flatten RenderArgs so `reportify run.jsonl` works without
    // spelling out the render subcommand.
    #[command(flatten)]
    pub render_args: RenderArgs,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(short = 'c', long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Install shell completion (bash, zsh, fish, elvish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "elvish", "powershell"])]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a report from an event log (default)
    Render(RenderArgs),

    /// Check event logs for structural problems
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Event log to read, `-` or omitted for stdin
    #[arg(required = false)]
    pub events: Option<PathBuf>,

    /// Report format (console, html, junit)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Output file for the report (stdout when omitted)
    #[arg(short = 'o', long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Title for the HTML report
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Progress indicator style (auto, dots, bar, verbose, none)
    #[arg(long, value_name = "MODE")]
    pub progress: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Event logs or directories to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl Cli {
    /// Helper to get effective RenderArgs
    pub fn get_render_args(&self) -> &RenderArgs {
        match &self.command {
            Some(Commands::Render(args)) => args,
            _ => &self.render_args,
        }
    }
}

impl CheckArgs {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}
