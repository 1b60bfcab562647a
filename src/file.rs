//! Config file discovery and loading.
//!
//! A file name that contains a directory component is taken as-is: it is used
//! if it exists and otherwise there is no config file. A bare file name is
//! looked up in each [`SearchPath`] in order and the first hit wins:
//!
//! ```text
//! Cwd        ./app.toml
//! ExeDir     <dir of the running executable>/app.toml
//! Env(var)   $CONFIG_REPO/app.toml
//! ```
//!
//! Not finding a file is not an error; the caller proceeds with defaults.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::FlagfigError;
use crate::types::{APP_NAME, SearchPath};

/// What search paths need from the running process.
pub struct SearchContext<'a> {
    pub app_name: &'a str,
    /// Path the program was invoked as (`argv[0]`).
    pub program: Option<&'a Path>,
    pub env_vars: &'a [(String, String)],
}

impl SearchContext<'_> {
    fn env(&self, var: &str) -> Option<&str> {
        self.env_vars
            .iter()
            .rev()
            .find(|(name, _)| name == var)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// Application name derived from the program path: its file name without extension.
pub fn app_name_from(program: &Path) -> Option<String> {
    program
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

/// The config file name to look for: `hint`, or `<app_name>.toml` when the
/// hint is empty or [`APP_NAME`].
pub fn config_file_name(hint: Option<&str>, app_name: &str) -> String {
    match hint {
        Some(name) if !name.is_empty() && name != APP_NAME => name.to_string(),
        _ => format!("{app_name}.toml"),
    }
}

/// Directory containing the running executable.
///
/// Uses the directory part of the invoked path when it has one, and asks the
/// OS otherwise.
pub fn exe_dir(program: Option<&Path>) -> Option<PathBuf> {
    if let Some(parent) = program.and_then(Path::parent)
        && !parent.as_os_str().is_empty()
    {
        return Some(parent.to_path_buf());
    }
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the location cannot be resolved (unset env var, no home
/// directory, ...).
pub fn resolve_search_path(sp: &SearchPath, ctx: &SearchContext<'_>) -> Option<PathBuf> {
    match sp {
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::ExeDir => exe_dir(ctx.program),
        SearchPath::Env(var) => ctx.env(var).map(PathBuf::from),
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", ctx.app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Path(p) => Some(p.clone()),
    }
}

fn is_qualified(file_name: &Path) -> bool {
    file_name
        .parent()
        .is_some_and(|dir| !dir.as_os_str().is_empty())
}

/// Anything but a definite "not found" counts as present; read errors surface
/// later when the file is loaded.
fn exists(path: &Path) -> bool {
    !matches!(path.try_exists(), Ok(false))
}

/// Find the config file, or `None` if there is none.
pub fn locate(
    file_name: &str,
    search_paths: &[SearchPath],
    ctx: &SearchContext<'_>,
) -> Option<PathBuf> {
    if file_name.is_empty() {
        return None;
    }
    let file_name = Path::new(file_name);

    if is_qualified(file_name) {
        if exists(file_name) {
            return Some(file_name.to_path_buf());
        }
        debug!(path = %file_name.display(), "explicit config file does not exist");
        return None;
    }

    for sp in search_paths {
        let Some(dir) = resolve_search_path(sp, ctx) else {
            debug!(search_path = ?sp, "search path not resolvable, skipping");
            continue;
        };
        let candidate = dir.join(file_name);
        if exists(&candidate) {
            return Some(candidate);
        }
        debug!(path = %candidate.display(), "no config file here");
    }
    None
}

/// Read a located config file.
pub fn load_config_file(path: &Path) -> Result<(PathBuf, String), FlagfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| FlagfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), "loaded config file");
    Ok((path.to_path_buf(), content))
}
