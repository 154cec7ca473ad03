//! Discovery of DGML files on disk

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File extensions treated as DGML input
pub const DGML_EXTENSIONS: &[&str] = &["xml", "dgml"];

/// Directory names never descended into
const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "target",
    "node_modules",
    "build",
    "dist",
    "__pycache__",
    "venv",
    ".venv",
];

/// Check if a directory entry should be skipped
pub fn should_ignore(path: &Path) -> bool {
    path.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        IGNORED_DIRS.contains(&name.as_ref())
    })
}

/// Check if a path has a DGML extension (case-insensitive)
pub fn is_dgml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            DGML_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Expand a list of input paths into DGML files
///
/// Files given explicitly are kept regardless of extension. Directories are
/// walked recursively, sorted by name, skipping ignored directories.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }

        if !input.is_dir() {
            anyhow::bail!("Input path does not exist: {}", input.display());
        }

        for entry in WalkDir::new(input)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !should_ignore(Path::new(e.file_name())))
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if entry.file_type().is_file() && is_dgml_file(path) {
                files.push(path.to_path_buf());
            }
        }
    }

    debug!(count = files.len(), "discovered input files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_is_dgml_file() {
        assert!(is_dgml_file(Path::new("a/report.xml")));
        assert!(is_dgml_file(Path::new("report.DGML")));
        assert!(!is_dgml_file(Path::new("report.txt")));
        assert!(!is_dgml_file(Path::new("xml")));
    }

    #[test]
    fn test_should_ignore() {
        assert!(should_ignore(Path::new("repo/.git/config.xml")));
        assert!(should_ignore(Path::new("node_modules")));
        assert!(!should_ignore(Path::new("docs/contract.xml")));
    }

    #[test]
    fn test_discover_walks_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.xml", "<doc/>");
        write(dir.path(), "a.dgml", "<doc/>");
        write(dir.path(), "notes.txt", "skip");
        write(dir.path(), "nested/c.xml", "<doc/>");
        write(dir.path(), ".git/d.xml", "<doc/>");

        let files = discover(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, vec!["a.dgml", "b.xml", "nested/c.xml"]);
    }

    #[test]
    fn test_discover_keeps_explicit_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "input.txt", "<doc/>");

        let files = discover(&[dir.path().join("input.txt")]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_missing_path() {
        let result = discover(&[PathBuf::from("/nonexistent/dgml/input")]);
        assert!(result.is_err());
    }
}
