use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SplitError;
use crate::mode::Mode;

/// Load sqlsplit configuration from a sqlsplit.toml file.
/// Searches parent directories of the inputs if no config path is given.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, SplitError> {
    let mut mode = Mode::default();

    let config_file = match config_path {
        Some(path) => {
            if path.exists() {
                Some(path.to_path_buf())
            } else {
                return Err(SplitError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        None => find_config_file(files),
    };

    if let Some(path) = config_file {
        let raw = load_config_from_path(&path)?;
        apply_config(&mut mode, &raw)?;
    }

    Ok(mode)
}

/// Search for a sqlsplit.toml in the common parent directories of the given files.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    for parent in get_common_parents(files) {
        let config = parent.join("sqlsplit.toml");
        if config.exists() {
            return Some(config);
        }
    }
    None
}

/// Get the common parent directories of the given file paths, ordered
/// from most specific to least specific.
fn get_common_parents(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut parents = Vec::new();

    for file in files {
        let parent = if file.is_dir() {
            file.clone()
        } else {
            file.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        // Walk up to root
        let mut current = Some(parent.as_path());
        while let Some(dir) = current {
            let dir_buf = dir.to_path_buf();
            if !parents.contains(&dir_buf) {
                parents.push(dir_buf);
            }
            current = dir.parent();
        }
    }

    parents
}

/// Load and parse a TOML config file.
fn load_config_from_path(path: &Path) -> Result<HashMap<String, toml::Value>, SplitError> {
    let content = std::fs::read_to_string(path)?;
    let parsed: toml::Value = content
        .parse()
        .map_err(|e| SplitError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    match parsed {
        toml::Value::Table(table) => {
            let mut map = HashMap::new();
            for (k, v) in table {
                map.insert(k.to_lowercase(), v);
            }
            Ok(map)
        }
        _ => Ok(HashMap::new()),
    }
}

/// Apply configuration values to a Mode.
fn apply_config(mode: &mut Mode, config: &HashMap<String, toml::Value>) -> Result<(), SplitError> {
    if let Some(toml::Value::String(d)) = config.get("dialect") {
        mode.dialect_name = d.clone();
    }

    if let Some(toml::Value::Boolean(b)) = config.get("strip_trailing_semicolon") {
        mode.strip_trailing_semicolon = *b;
    }

    if let Some(toml::Value::Array(arr)) = config.get("exclude") {
        mode.exclude = arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();
    }

    // Validate no unknown keys
    let known_keys = ["dialect", "strip_trailing_semicolon", "exclude"];
    for key in config.keys() {
        if !known_keys.contains(&key.as_str()) {
            return Err(SplitError::Config(format!(
                "Unknown config option: {}",
                key
            )));
        }
    }

    Ok(())
}
