// Main entry point for reportify

use anyhow::Result;
use clap::Parser;
use tracing::info;

use reportify::cli::{Cli, Commands};
use reportify::commands::{handle_check, handle_completion, render_report};
use reportify::config;
use reportify::logging::CompactFormatter;

fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = config::Config::load();

    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        "reportify=debug,warn"
    } else {
        "reportify=warn,error"
    };

    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .event_format(CompactFormatter)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if cli.verbose {
        info!("Starting reportify v{}", env!("CARGO_PKG_VERSION"));
    }

    if cli.no_color || config.as_ref().is_some_and(|c| !c.console.color) {
        console::set_colors_enabled(false);
    }

    // Handle config flag
    if cli.config {
        print_config(&cli, config.as_ref());
        return Ok(());
    }

    // Handle init_config flag
    if let Some(config_file) = &cli.init_config {
        let defaults = config::Config::default();
        std::fs::write(config_file, defaults.to_toml())?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        print_precedence();
        return Ok(());
    }

    // Handle completion flag
    if let Some(shell_type) = &cli.completion {
        return handle_completion(shell_type);
    }

    match &cli.command {
        Some(Commands::Check(args)) => handle_check(args),
        Some(Commands::Render(_)) | None => {
            render_report(&cli, cli.get_render_args(), config.as_ref())
        }
    }
}

fn print_config(cli: &Cli, config: Option<&config::Config>) {
    println!("Current configuration:");
    println!("\n  Command-line arguments:");
    let args = cli.get_render_args();
    if let Some(ref format) = args.format {
        println!("    Format: {}", format);
    }
    if let Some(ref output) = args.output {
        println!("    Output: {}", output.display());
    }
    if let Some(ref title) = args.title {
        println!("    Title: {}", title);
    }
    if let Some(ref progress) = args.progress {
        println!("    Progress: {}", progress);
    }

    if let Some(cfg) = config {
        println!("\n  Configuration file loaded:");
        if let Some(ref format) = cfg.report.format {
            println!("    Format: {}", format);
        }
        if let Some(ref output) = cfg.report.output {
            println!("    Output: {}", output);
        }
        println!("    HTML title: {}", cfg.html.title);
        println!("    HTML indent: {}px", cfg.html.indent);
        println!("    Progress mode: {}", cfg.console.progress);
        println!(
            "    Color: {}",
            if cfg.console.color {
                "enabled"
            } else {
                "disabled"
            }
        );
    } else {
        println!("\n  No configuration file loaded");
        println!("  Create one with: reportify --init-config .reportifyrc.toml");
    }

    println!("\n  Environment variables:");
    if let Ok(format) = std::env::var(config::ENV_REPORTIFY_FORMAT) {
        println!("    {}: {}", config::ENV_REPORTIFY_FORMAT, format);
    } else {
        println!(
            "    {}: not set (default: console)",
            config::ENV_REPORTIFY_FORMAT
        );
    }

    print_precedence();
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Environment variables");
    println!("  3. Configuration file");
    println!("  4. Built-in defaults (lowest)");
}
