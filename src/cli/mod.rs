// CLI module - argument parsing

pub mod args;

pub use args::{CheckArgs, Cli, Commands, ProgressMode, RenderArgs, ReportFormat};
