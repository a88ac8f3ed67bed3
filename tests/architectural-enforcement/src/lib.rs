//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code; the client waits on I/O only
//! - No unwrap()/expect() in production code; errors propagate to main
//!
//! The helpers here walk the production sources of the workspace crates.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["core/src", "tui/src"];

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Every `.rs` file below the production directories
pub fn production_files() -> Vec<PathBuf> {
    let root = workspace_root();
    PRODUCTION_DIRS
        .iter()
        .map(|dir| root.join(dir))
        .filter(|dir| dir.exists())
        .flat_map(|dir| {
            walkdir::WalkDir::new(dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
                .map(|e| e.into_path())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Lines of a file up to its `#[cfg(test)] mod` block, with line numbers.
///
/// Comment lines are dropped and trailing comments cut off.
pub fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    let lines: Vec<&str> = content.lines().collect();

    let mut out = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]")
            && lines
                .get(idx + 1)
                .is_some_and(|next| next.trim_start().starts_with("mod "))
        {
            break;
        }
        if trimmed.starts_with("//") {
            continue;
        }
        let code = line.split("//").next().unwrap_or(line);
        out.push((idx + 1, code.to_string()));
    }
    out
}

/// Scan production code for lines matching `pattern`
pub fn find_violations(pattern: impl Fn(&str) -> bool) -> Vec<String> {
    let mut violations = Vec::new();
    for path in production_files() {
        for (line_number, code) in production_lines(&path) {
            if pattern(&code) {
                violations.push(format!(
                    "{}:{} - {}",
                    path.display(),
                    line_number,
                    code.trim()
                ));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_production_sources() {
        let files = production_files();
        assert!(files.iter().any(|p| p.ends_with("tui/src/app.rs")));
        assert!(files.iter().any(|p| p.ends_with("core/src/lib.rs")));
    }
}
