// Cross-platform file utilities

use std::path::{Path, PathBuf};

/// File utilities for cross-platform operations
pub struct FileUtils;

impl FileUtils {
    /// Collect event logs from the given path. Explicit file arguments
    /// are taken as given; directories are walked for `.jsonl` and
    /// `.ndjson` files, skipping hidden entries.
    pub fn collect_event_logs(path: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            // Use walkdir for cross-platform traversal
            let walker = walkdir::WalkDir::new(path).into_iter().filter_entry(|e| {
                // Always include the root directory itself, even if it starts with '.'
                if e.depth() == 0 {
                    return true;
                }
                !e.file_name().to_string_lossy().starts_with('.')
            });

            for entry in walker.flatten() {
                if entry.file_type().is_file() && Self::is_event_log(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }

        files.sort();
        files
    }

    /// Check if file has an event log extension
    pub fn is_event_log(path: &Path) -> bool {
        path.extension()
            .is_some_and(|e| e == "jsonl" || e == "ndjson")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_event_logs_single() {
        let file = tempfile::Builder::new().suffix(".log").tempfile().unwrap();
        let path = file.path();

        let files = FileUtils::collect_event_logs(path);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0], path);
    }

    #[test]
    fn test_collect_event_logs_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.jsonl");
        std::fs::write(&log, "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let files = FileUtils::collect_event_logs(dir.path());
        assert_eq!(files, vec![log]);
    }

    #[test]
    fn test_collect_event_logs_skips_hidden_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".cache");
        std::fs::create_dir(&hidden).unwrap();
        std::fs::write(hidden.join("stale.jsonl"), "{}").unwrap();
        let log = dir.path().join("run.ndjson");
        std::fs::write(&log, "{}").unwrap();

        let files = FileUtils::collect_event_logs(dir.path());
        assert_eq!(files, vec![log]);
    }

    #[test]
    fn test_is_event_log() {
        assert!(FileUtils::is_event_log(Path::new("a/run.jsonl")));
        assert!(FileUtils::is_event_log(Path::new("run.ndjson")));
        assert!(!FileUtils::is_event_log(Path::new("run.json")));
        assert!(!FileUtils::is_event_log(Path::new("run")));
    }
}
