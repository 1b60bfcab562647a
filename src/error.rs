use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagfigError {
    #[cfg(feature = "clap")]
    #[error(transparent)]
    FlagsParse(#[from] clap::Error),

    #[error("Failed to parse {path}: {source}")]
    TomlDecode {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value for '{key}': {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: CoerceError,
    },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<FlagfigError>),

    #[error("App name is required: call .app_name() or .program() on the builder")]
    AppNameRequired,
}

/// A single value could not be converted into its field's type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("'{0}' is not a boolean")]
    InvalidBoolean(String),

    #[error("'{value}' is not a valid {shape}: {reason}")]
    InvalidInteger {
        value: String,
        shape: String,
        reason: String,
    },

    #[error("'{value}' is not a valid {shape}: {reason}")]
    InvalidFloat {
        value: String,
        shape: String,
        reason: String,
    },

    #[error("'{value}' is not a duration: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("map key must be a string, found {found}")]
    MapKeyType { found: String },

    #[error("map entry must have one or two elements, found {len}")]
    MalformedMapEntry { len: usize },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}
