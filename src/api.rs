use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::dialect::dialect_from_name;
use crate::error::Result;
use crate::mode::Mode;
use crate::report::{FileResult, FileStatus, Report};
use crate::splitter::StatementSplitter;

/// Split a multi-statement SQL script into its individual statements.
/// This is the core API function.
///
/// `dialect` selects the lexical rules: `"oracle"`, `"tsql"` (alias
/// `"mssql"`), or `"postgres"` (alias `"postgresql"`). With
/// `strip_trailing_semicolon`, the terminator character is removed from each
/// returned statement.
///
/// ```
/// let statements = sqlsplit::split_sql_script("SELECT 1; SELECT 2;", "postgres", false).unwrap();
/// assert_eq!(statements, vec!["SELECT 1;", "SELECT 2;"]);
/// ```
pub fn split_sql_script(
    script: &str,
    dialect: &str,
    strip_trailing_semicolon: bool,
) -> Result<Vec<String>> {
    let dialect = dialect_from_name(dialect)?;
    StatementSplitter::new(dialect.as_ref())
        .strip_trailing_terminator(strip_trailing_semicolon)
        .split(script)
}

/// Count the statements in a script without keeping them.
pub fn count_statements(script: &str, dialect: &str) -> Result<usize> {
    Ok(split_sql_script(script, dialect, false)?.len())
}

/// Run the splitter on a collection of files.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let matching_paths = get_matching_paths(files, mode);
    let mut report = Report::new();
    for path in &matching_paths {
        report.add(split_file(path, mode));
    }
    report
}

/// Split a single file.
fn split_file(path: &Path, mode: &Mode) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return FileResult {
                path: path.to_path_buf(),
                status: FileStatus::Error,
                statements: Vec::new(),
                error: Some(format!("Read error: {}", e)),
            };
        }
    };

    match split_sql_script(&source, &mode.dialect_name, mode.strip_trailing_semicolon) {
        Ok(statements) => FileResult {
            path: path.to_path_buf(),
            status: FileStatus::Split,
            statements,
            error: None,
        },
        Err(e) => FileResult {
            path: path.to_path_buf(),
            status: FileStatus::Error,
            statements: Vec::new(),
            error: Some(format!("{}", e)),
        },
    }
}

/// Get all SQL file paths that match the given inputs.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let mut result = HashSet::new();

    for path in paths {
        if path.is_file() {
            if is_sql_file(path, extensions) {
                result.insert(path.clone());
            }
        } else if path.is_dir() {
            collect_sql_files(path, extensions, &mode.exclude, &mut result);
        }
    }

    let mut sorted: Vec<PathBuf> = result.into_iter().collect();
    sorted.sort();
    sorted
}

/// Check if a file has a SQL extension.
fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map(|e| extensions.contains(&e.as_str()))
        .unwrap_or(false)
}

/// Recursively collect SQL files from a directory.
fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &[String],
    result: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // Skip hidden directories and excluded patterns
        if name.starts_with('.') {
            continue;
        }
        if exclude.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&name))
                .unwrap_or(false)
        }) {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, result);
        } else if is_sql_file(&path, extensions) {
            result.insert(path);
        }
    }
}
