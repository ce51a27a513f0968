// Check command - validate event logs

use anyhow::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::info;

use crate::cli::args::CheckArgs;
use crate::event::{EventStream, RunEvent, StreamError, SuiteId};
use crate::report::{CheckReport, CheckSummary, Diagnostic, DiagnosticSeverity};
use crate::utils::FileUtils;

#[derive(Debug, Clone)]
struct OpenSuite {
    id: SuiteId,
    name: String,
    root: bool,
    tests: usize,
    failures: usize,
    line: usize,
}

/// Validate one event stream. Every finding is a diagnostic; the
/// checker recovers and keeps scanning after each one.
pub fn check_stream<R: BufRead>(file: &str, stream: EventStream<R>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut open: Vec<OpenSuite> = Vec::new();
    let mut root_closed = false;
    let mut saw_records = false;
    let mut last_line = 0usize;

    for item in stream {
        saw_records = true;
        let rec = match item {
            Ok(rec) => rec,
            Err(StreamError::Parse { line, source }) => {
                last_line = line;
                diagnostics.push(Diagnostic::error(
                    file,
                    "PARSE_ERROR",
                    &source.to_string(),
                    line,
                ));
                continue;
            }
            Err(StreamError::Io(e)) => {
                diagnostics.push(Diagnostic::error(
                    file,
                    "READ_ERROR",
                    &e.to_string(),
                    last_line + 1,
                ));
                break;
            }
        };
        last_line = rec.line;

        if root_closed {
            diagnostics.push(Diagnostic::warning(
                file,
                "EVENT_AFTER_ROOT",
                &format!("{} event after the root suite closed", rec.event.name()),
                rec.line,
            ));
            continue;
        }

        match &rec.event {
            RunEvent::SuiteStart { suite, .. } => {
                if suite.is_root() {
                    if !open.is_empty() {
                        diagnostics.push(Diagnostic::error(
                            file,
                            "UNEXPECTED_ROOT",
                            &format!(
                                "root suite '{}' started while '{}' is still open",
                                suite.name,
                                open[open.len() - 1].name
                            ),
                            rec.line,
                        ));
                    }
                    // Only a root opened on an empty stack can finish
                    // the run.
                    let is_true_root = open.is_empty();
                    open.push(OpenSuite {
                        id: suite.id,
                        name: suite.name.clone(),
                        root: is_true_root,
                        tests: 0,
                        failures: 0,
                        line: rec.line,
                    });
                } else {
                    match open.last() {
                        None => {
                            diagnostics.push(Diagnostic::error(
                                file,
                                "BAD_PARENT",
                                &format!("suite '{}' started before any root suite", suite.name),
                                rec.line,
                            ));
                        }
                        Some(top) if Some(top.id) != suite.parent => {
                            diagnostics.push(Diagnostic::error(
                                file,
                                "BAD_PARENT",
                                &format!(
                                    "suite '{}' declares parent {:?} but the innermost open suite is '{}' (id {})",
                                    suite.name,
                                    suite.parent.map(|p| p.0),
                                    top.name,
                                    top.id.0
                                ),
                                rec.line,
                            ));
                        }
                        _ => {}
                    }
                    open.push(OpenSuite {
                        id: suite.id,
                        name: suite.name.clone(),
                        root: false,
                        tests: 0,
                        failures: 0,
                        line: rec.line,
                    });
                }
            }

            RunEvent::TestPass { test, .. } | RunEvent::TestFail { test, .. } => {
                let failed = matches!(rec.event, RunEvent::TestFail { .. });

                match open.last() {
                    None => {
                        diagnostics.push(Diagnostic::error(
                            file,
                            "ORPHAN_TEST",
                            &format!("test '{}' reported outside any open suite", test.name),
                            rec.line,
                        ));
                        continue;
                    }
                    Some(top) if top.id != test.suite => {
                        diagnostics.push(Diagnostic::warning(
                            file,
                            "SUITE_MISMATCH",
                            &format!(
                                "test '{}' reports suite id {} but the innermost open suite is '{}' (id {})",
                                test.name, test.suite.0, top.name, top.id.0
                            ),
                            rec.line,
                        ));
                    }
                    _ => {}
                }

                if failed && test.error.is_none() {
                    diagnostics.push(
                        Diagnostic::warning(
                            file,
                            "FAIL_WITHOUT_ERROR",
                            &format!("failed test '{}' carries no error object", test.name),
                            rec.line,
                        )
                        .with_hint("attach an error with kind, message, and stack"),
                    );
                }

                // Counts are subtree-inclusive, so every open suite
                // takes the hit.
                for entry in open.iter_mut() {
                    entry.tests += 1;
                    if failed {
                        entry.failures += 1;
                    }
                }
            }

            RunEvent::SuiteEnd { suite, .. } => {
                match open.iter().rposition(|o| o.id == suite.id) {
                    None => {
                        diagnostics.push(Diagnostic::error(
                            file,
                            "UNBALANCED_SUITE",
                            &format!(
                                "suite_end for '{}' (id {}) does not match any open suite",
                                suite.name, suite.id.0
                            ),
                            rec.line,
                        ));
                    }
                    Some(pos) => {
                        if pos + 1 < open.len() {
                            let skipped: Vec<&str> =
                                open[pos + 1..].iter().map(|o| o.name.as_str()).collect();
                            diagnostics.push(Diagnostic::error(
                                file,
                                "UNBALANCED_SUITE",
                                &format!(
                                    "suite_end for '{}' closes over still-open suite(s): {}",
                                    suite.name,
                                    skipped.join(", ")
                                ),
                                rec.line,
                            ));
                        }

                        let entry = open[pos].clone();
                        open.truncate(pos);

                        // Run totals come from top-level suite ends, so
                        // the root payload counts are never consumed.
                        if !entry.root
                            && (entry.tests != suite.tests || entry.failures != suite.failures)
                        {
                            diagnostics.push(Diagnostic::warning(
                                file,
                                "COUNT_MISMATCH",
                                &format!(
                                    "suite '{}' declares {} test(s) and {} failure(s) but the stream contains {} and {}",
                                    suite.name,
                                    suite.tests,
                                    suite.failures,
                                    entry.tests,
                                    entry.failures
                                ),
                                rec.line,
                            ));
                        }

                        if entry.root {
                            root_closed = true;
                        }
                    }
                }
            }
        }
    }

    if !saw_records {
        diagnostics.push(Diagnostic::error(file, "EMPTY_STREAM", "no events found", 1));
    } else {
        for entry in open.iter().rev() {
            diagnostics.push(Diagnostic::error(
                file,
                "UNCLOSED_SUITE",
                &format!("suite '{}' was never closed", entry.name),
                entry.line,
            ));
        }
        if open.is_empty() && !root_closed {
            diagnostics.push(Diagnostic::error(
                file,
                "MISSING_ROOT",
                "stream ended without closing a root suite",
                last_line.max(1),
            ));
        }
    }

    diagnostics
}

pub fn handle_check(args: &CheckArgs) -> Result<()> {
    let mut files = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut files_with_errors = 0;

    for path in &args.files {
        if path.is_dir() {
            files.extend(FileUtils::collect_event_logs(path));
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            diagnostics.push(Diagnostic::error(
                &path.to_string_lossy(),
                "FILE_NOT_FOUND",
                "Path not found",
                1,
            ));
            files_with_errors += 1;
        }
    }

    if !files.is_empty() {
        info!("Checking {} file(s)...", files.len());
    }

    for file in &files {
        let file_str = file.to_string_lossy().to_string();
        let found = match File::open(file) {
            Ok(f) => check_stream(&file_str, EventStream::new(BufReader::new(f))),
            Err(e) => vec![Diagnostic::error(
                &file_str,
                "READ_ERROR",
                &e.to_string(),
                1,
            )],
        };

        if found.iter().any(|d| d.is_error()) {
            files_with_errors += 1;
        } else if !args.is_json() {
            println!("{} ... OK", file.display());
        }
        diagnostics.extend(found);
    }

    if args.is_json() {
        let report = build_report(diagnostics, files.len(), files_with_errors);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &diagnostics {
            println!(
                "{}:{}: {} [{}] {}",
                d.file,
                d.line,
                severity_label(d.severity),
                d.code,
                d.message
            );
            if let Some(hint) = &d.hint {
                println!("  hint: {}", hint);
            }
        }
    }

    if files_with_errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn build_report(
    diagnostics: Vec<Diagnostic>,
    total_files: usize,
    files_with_errors: usize,
) -> CheckReport {
    let total_errors = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Error))
        .count();
    let total_warnings = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Warning))
        .count();

    CheckReport {
        diagnostics,
        summary: CheckSummary {
            total_files,
            files_with_errors,
            total_errors,
            total_warnings,
        },
    }
}

fn severity_label(severity: DiagnosticSeverity) -> &'static str {
    match severity {
        DiagnosticSeverity::Error => "error",
        DiagnosticSeverity::Warning => "warning",
        DiagnosticSeverity::Info => "info",
        DiagnosticSeverity::Hint => "hint",
    }
}
