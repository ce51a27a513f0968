use serde::{Deserialize, Serialize};

/// One finding against an event log, addressed by line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub severity: DiagnosticSeverity,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: CheckSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total_files: usize,
    pub files_with_errors: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl Diagnostic {
    pub fn error(file: &str, code: &str, message: &str, line: usize) -> Self {
        Self {
            file: file.to_string(),
            line,
            severity: DiagnosticSeverity::Error,
            code: code.to_string(),
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn warning(file: &str, code: &str, message: &str, line: usize) -> Self {
        Self {
            file: file.to_string(),
            line,
            severity: DiagnosticSeverity::Warning,
            code: code.to_string(),
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}
