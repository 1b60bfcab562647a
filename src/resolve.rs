//! Core resolution pipeline: decode the config file and merge it into a
//! record that the flags parser has already filled.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Decode the file (if any) into a `toml::Table`
//! 2. Reject unknown keys (if strict mode)
//! 3. Merge environment, file and defaults into every unset field

use std::path::PathBuf;

use toml::Table;

use crate::error::FlagfigError;
use crate::field::Config;
use crate::merge::merge_all;
use crate::validate;

/// All pre-loaded data needed to resolve a config. No I/O happens here.
pub struct ResolveInput {
    /// The located config file and its contents, if one was found.
    pub file: Option<(PathBuf, String)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Whether to reject file keys that no field reads.
    pub strict: bool,
}

/// Merge pre-loaded inputs into `record`.
pub fn resolve<C: Config>(record: &mut C, input: ResolveInput) -> Result<(), FlagfigError> {
    let table = match &input.file {
        Some((path, content)) => {
            let table: Table = toml::from_str(content).map_err(|e| FlagfigError::TomlDecode {
                path: path.clone(),
                source: e,
            })?;
            if input.strict {
                validate::validate_unknown_keys::<C>(&table, content, path)?;
            }
            table
        }
        None => Table::new(),
    };

    merge_all(record, &table, &input.env_vars)?;
    Ok(())
}
