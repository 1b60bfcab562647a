//! Strict-mode validation: detect top-level keys in the config file that no
//! registered field reads.

use std::path::Path;

use toml::Table;

use crate::error::FlagfigError;
use crate::field::Config;

/// Validate that `table` contains no keys unknown to config type `C`.
///
/// Keys of fields registered as `"-"` count as unknown since they are never
/// read. Line numbers are found by searching `content` for the key.
pub fn validate_unknown_keys<C: Config>(
    table: &Table,
    content: &str,
    path: &Path,
) -> Result<(), FlagfigError> {
    let known: Vec<&'static str> = C::fields()
        .iter()
        .filter(|f| !f.is_skipped())
        .map(|f| f.key())
        .collect();

    let mut unknown: Vec<(usize, String)> = table
        .keys()
        .filter(|key| !known.contains(&key.as_str()))
        .map(|key| (find_key_line(content, key), key.clone()))
        .collect();

    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort();

    let errors = unknown
        .into_iter()
        .map(|(line, key)| FlagfigError::UnknownKey {
            key,
            path: path.to_path_buf(),
            line,
        })
        .collect();
    Err(FlagfigError::UnknownKeys(errors))
}

/// Find the 1-indexed line number of a top-level key in TOML content.
///
/// Matches `key = ...` (bare or quoted) before the first section header, or a
/// `[key]` / `[[key]]` header anywhere. Returns 0 if the key cannot be located.
fn find_key_line(content: &str, key: &str) -> usize {
    let quoted = format!("\"{key}\"");
    let mut in_section = false;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') {
            let header = trimmed.trim_start_matches('[').trim_end_matches(']').trim();
            if header == key || header == quoted {
                return i + 1;
            }
            in_section = true;
            continue;
        }
        if in_section {
            continue;
        }

        let after_key = trimmed
            .strip_prefix(quoted.as_str())
            .or_else(|| trimmed.strip_prefix(key));
        if let Some(after_key) = after_key
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
