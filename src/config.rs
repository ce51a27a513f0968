// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub html: HtmlConfig,

    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Report format (console, html, junit)
    #[serde(default)]
    pub format: Option<String>,

    /// Output file for reports
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlConfig {
    /// Title of the generated page
    #[serde(default = "default_title")]
    pub title: String,

    /// Indent per nesting level, in pixels
    #[serde(default = "default_indent")]
    pub indent: u32,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            indent: default_indent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Progress indicator mode
    #[serde(default = "default_progress")]
    pub progress: String,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            progress: default_progress(),
            color: default_color(),
        }
    }
}

// Default values
pub const ENV_REPORTIFY_FORMAT: &str = "REPORTIFY_FORMAT";

pub fn default_title() -> String {
    String::from("Test Report")
}

pub fn default_indent() -> u32 {
    18
}

fn default_progress() -> String {
    String::from("auto")
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .reportifyrc (current directory)
        // 2. ~/.reportifyrc (home directory)
        // 3. .reportifyrc.toml (current directory)
        // 4. ~/.reportifyrc.toml (home directory)

        let cwd = std::env::current_dir().ok()?;
        let home = dirs::home_dir()?;

        let paths = [
            cwd.join(".reportifyrc"),
            home.join(".reportifyrc"),
            cwd.join(".reportifyrc.toml"),
            home.join(".reportifyrc.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}
