// Render command - drive reporters from an event log

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::cli::args::RenderArgs;
use crate::cli::{Cli, ProgressMode, ReportFormat};
use crate::config::{self, Config};
use crate::event::EventStream;
use crate::report::{self, HtmlOptions};
use crate::state::Aggregator;

/// Pick the report format: CLI flag first, then the environment, then
/// the config file, falling back to console.
fn resolve_format(args: &RenderArgs, config: Option<&Config>) -> ReportFormat {
    let name = args
        .format
        .clone()
        .or_else(|| std::env::var(config::ENV_REPORTIFY_FORMAT).ok())
        .or_else(|| config.and_then(|c| c.report.format.clone()));

    match name.as_deref() {
        Some("html") => ReportFormat::Html,
        Some("junit") | Some("xml") => ReportFormat::Junit,
        _ => ReportFormat::Console,
    }
}

/// Pick the progress mode: CLI flag first, then the config file.
/// Absent or `auto` selects verbose under `-v` and dots otherwise.
fn resolve_progress(args: &RenderArgs, config: Option<&Config>, verbose: bool) -> ProgressMode {
    let name = args
        .progress
        .clone()
        .or_else(|| config.map(|c| c.console.progress.clone()));

    match name.as_deref() {
        Some("dots") => ProgressMode::Dots,
        Some("bar") => ProgressMode::Bar,
        Some("none") => ProgressMode::None,
        Some("verbose") => ProgressMode::Verbose,
        _ => {
            if verbose {
                ProgressMode::Verbose
            } else {
                ProgressMode::Dots
            }
        }
    }
}

fn open_events(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            let file = File::open(p)
                .with_context(|| format!("failed to open event log: {}", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(std::io::stdin().lock())),
    }
}

pub fn render_report(cli: &Cli, args: &RenderArgs, config: Option<&Config>) -> Result<()> {
    let format = resolve_format(args, config);
    debug!("report format: {:?}", format);

    let output = args
        .output
        .clone()
        .or_else(|| config.and_then(|c| c.report.output.as_ref().map(PathBuf::from)));

    // A file-format report going to stdout leaves no room for console
    // progress.
    let console_active = matches!(format, ReportFormat::Console) || output.is_some();

    if matches!(format, ReportFormat::Console) && output.is_some() {
        warn!("--output is ignored for the console format");
    }

    let mut reporters: Vec<Box<dyn report::Reporter>> = Vec::new();

    if console_active {
        let progress = resolve_progress(args, config, cli.verbose);
        reporters.push(Box::new(report::ConsoleReporter::new(progress)));
    }

    match format {
        ReportFormat::Html => {
            let opts = HtmlOptions {
                title: args
                    .title
                    .clone()
                    .or_else(|| config.map(|c| c.html.title.clone()))
                    .unwrap_or_else(config::default_title),
                indent_px: config.map(|c| c.html.indent).unwrap_or_else(config::default_indent),
            };
            reporters.push(Box::new(report::HtmlReporter::new(output.clone(), opts)));
        }
        ReportFormat::Junit => {
            reporters.push(Box::new(report::JunitReporter::new(output.clone())));
        }
        ReportFormat::Console => {}
    }

    let reader = open_events(args.events.as_ref())?;
    let mut state = Aggregator::new();
    let mut seen = 0usize;

    for item in EventStream::new(reader) {
        let rec = item.context("failed to decode event stream")?;
        report::dispatch(&mut state, &mut reporters, &rec)?;
        seen += 1;

        if state.finished() {
            debug!("root suite closed after {} event(s)", seen);
            break;
        }
    }

    if seen == 0 {
        bail!("no events found in input");
    }
    if !state.finished() {
        bail!("event stream ended before the root suite closed; report would be incomplete");
    }

    info!("Processed {} event(s)", seen);

    if !state.totals().all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
