//! Shared vocabulary: where config files are searched for, and the shapes and
//! polymorphic values fields can hold.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the shared configuration repository directory.
pub const CONFIG_REPO_ENV: &str = "CONFIG_REPO";

/// Passing this as the file name selects `<app name>.toml`.
pub const APP_NAME: &str = "APPNAME";

/// Where to look for an unqualified config file name.
///
/// Locations are tried in list order and the first one containing the file
/// wins.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Current working directory.
    Cwd,
    /// Directory of the running executable.
    ExeDir,
    /// A directory named by an environment variable, e.g. `Env("CONFIG_REPO")`.
    /// Skipped when the variable is unset or empty.
    Env(&'static str),
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// An explicit directory.
    Path(PathBuf),
}

impl SearchPath {
    /// Current directory, then the executable's directory, then `$CONFIG_REPO`.
    pub fn defaults() -> Vec<SearchPath> {
        vec![
            SearchPath::Cwd,
            SearchPath::ExeDir,
            SearchPath::Env(CONFIG_REPO_ENV),
        ]
    }
}

/// The declared type of a field, as seen by the coercion engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Str,
    Bool,
    Int { signed: bool, bits: u32 },
    Float { bits: u32 },
    Duration,
    Seq(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Optional(Box<Shape>),
    /// A [`Dynamic`] value; `None` while it holds no kind.
    Dynamic(Option<Box<Shape>>),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Str => write!(f, "string"),
            Shape::Bool => write!(f, "bool"),
            Shape::Int { signed: true, bits } => write!(f, "i{bits}"),
            Shape::Int { signed: false, bits } => write!(f, "u{bits}"),
            Shape::Float { bits } => write!(f, "f{bits}"),
            Shape::Duration => write!(f, "duration"),
            Shape::Seq(elem) => write!(f, "list of {elem}"),
            Shape::Map(key, value) => write!(f, "map of {key} to {value}"),
            Shape::Optional(inner) => write!(f, "optional {inner}"),
            Shape::Dynamic(Some(inner)) => write!(f, "dynamic {inner}"),
            Shape::Dynamic(None) => write!(f, "dynamic"),
        }
    }
}

/// A field whose concrete kind is chosen by the caller at runtime.
///
/// Initialise the field with the kind it should hold (`Dynamic::Int(0)`,
/// `Dynamic::Str(String::new())`, ...) and values are coerced into that kind.
/// A field left at [`Dynamic::Unset`] is never written.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Dynamic {
    #[default]
    Unset,
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Duration(Duration),
    List(Vec<String>),
}
