use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::error::FlagfigError;
use crate::field::Config;
use crate::file::{self, SearchContext};
use crate::resolve::{self, ResolveInput};
use crate::types::SearchPath;

/// Entry point for building a flagfig configuration.
pub struct Flagfig;

impl Flagfig {
    pub fn builder<C: Config>() -> FlagfigBuilder<C> {
        FlagfigBuilder::new()
    }
}

/// A successfully loaded configuration.
#[derive(Debug)]
pub struct Parsed<C> {
    /// Leading verb stripped from the arguments, e.g. `open` in `tool open -f`.
    pub action: Option<String>,
    pub config: C,
}

/// What the version-aware entry point produced.
#[derive(Debug)]
pub enum Outcome<C> {
    Loaded(Parsed<C>),
    /// Help text rendered by the flags parser.
    Help(String),
    /// The version banner, `"<app> version: <version> [<build date>]\n"`.
    Version(String),
}

struct VersionInfo<C> {
    version: String,
    build_date: String,
    flag: fn(&C) -> bool,
}

/// Builder for loading a record from flags, a config file and defaults.
///
/// - **File name**: [`file_name()`](Self::file_name), `<app>.toml` by default.
/// - **Discovery**: [`search_paths()`](Self::search_paths), where a bare file
///   name is looked for.
/// - **Version banner**: [`version()`](Self::version).
pub struct FlagfigBuilder<C: Config> {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    program: Option<PathBuf>,
    env_enabled: bool,
    strict: bool,
    version: Option<VersionInfo<C>>,
}

impl<C: Config> FlagfigBuilder<C> {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            program: None,
            env_enabled: true,
            strict: false,
            version: None,
        }
    }

    /// Set the application name (default: the program's file stem).
    /// Used for the default file name and the version banner.
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Config file name or path (default: `"{app_name}.toml"`).
    ///
    /// A name with a directory component is used as-is and never searched
    /// for. An empty name or [`APP_NAME`](crate::APP_NAME) selects the default.
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are tried in order; the first one containing the file wins.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path, starting from [`SearchPath::defaults`] if no
    /// paths have been set yet.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(SearchPath::defaults)
            .push(path);
        self
    }

    /// Path the program was invoked as (default: the first process argument).
    /// Only needed by [`load_onto`](Self::load_onto); the parse entry points
    /// take it from their argument list.
    pub fn program(mut self, path: impl Into<PathBuf>) -> Self {
        self.program = Some(path.into());
        self
    }

    /// Ignore the process environment: per-field env vars and
    /// [`SearchPath::Env`] locations.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, config file keys that no field reads produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Print a version banner and stop when `flag` reports the record's
    /// version flag as set after flag parsing.
    pub fn version(mut self, version: &str, build_date: &str, flag: fn(&C) -> bool) -> Self {
        self.version = Some(VersionInfo {
            version: version.to_string(),
            build_date: build_date.to_string(),
            flag,
        });
        self
    }

    fn effective_program(&self) -> Option<PathBuf> {
        self.program
            .clone()
            .or_else(|| std::env::args_os().next().map(PathBuf::from))
    }

    fn effective_app_name(&self, program: Option<&PathBuf>) -> Result<String, FlagfigError> {
        if let Some(name) = &self.app_name {
            return Ok(name.clone());
        }
        program
            .and_then(|p| file::app_name_from(p))
            .ok_or(FlagfigError::AppNameRequired)
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.search_paths.clone().unwrap_or_else(SearchPath::defaults)
    }

    fn env_vars(&self) -> Vec<(String, String)> {
        if self.env_enabled {
            utf8_vars(std::env::vars_os())
        } else {
            Vec::new()
        }
    }

    #[cfg_attr(not(feature = "clap"), allow(dead_code))]
    fn version_banner(&self, record: &C, app_name: &str) -> Option<String> {
        let info = self.version.as_ref()?;
        (info.flag)(record).then(|| {
            format!(
                "{app_name} version: {} [{}]\n",
                info.version, info.build_date
            )
        })
    }

    /// Locate and read the config file, and collect the environment.
    fn build_input(
        &self,
        program: Option<&PathBuf>,
        app_name: &str,
    ) -> Result<ResolveInput, FlagfigError> {
        let file_name = file::config_file_name(self.file_name.as_deref(), app_name);
        let env_vars = self.env_vars();
        let ctx = SearchContext {
            app_name,
            program: program.map(PathBuf::as_path),
            env_vars: &env_vars,
        };

        let file = match file::locate(&file_name, &self.effective_search_paths(), &ctx) {
            Some(path) => Some(file::load_config_file(&path)?),
            None => {
                debug!(%file_name, "no config file found, using defaults");
                None
            }
        };

        Ok(ResolveInput {
            file,
            env_vars,
            strict: self.strict,
        })
    }

    /// Merge the config file, environment and defaults into a record that has
    /// already been filled from the command line (by any flags parser).
    ///
    /// Fields that already hold a non-zero value are left alone.
    pub fn load_onto(self, mut record: C) -> Result<C, FlagfigError> {
        let program = self.effective_program();
        let app_name = self.effective_app_name(program.as_ref())?;
        let input = self.build_input(program.as_ref(), &app_name)?;
        resolve::resolve(&mut record, input)?;
        Ok(record)
    }

    /// Version check, then merge. Shared tail of the parse entry points.
    #[cfg(feature = "clap")]
    fn finish(
        self,
        mut record: C,
        action: Option<String>,
        program: Option<PathBuf>,
    ) -> Result<Outcome<C>, FlagfigError> {
        let app_name = self.effective_app_name(program.as_ref())?;
        if let Some(banner) = self.version_banner(&record, &app_name) {
            return Ok(Outcome::Version(banner));
        }
        let input = self.build_input(program.as_ref(), &app_name)?;
        resolve::resolve(&mut record, input)?;
        Ok(Outcome::Loaded(Parsed {
            action,
            config: record,
        }))
    }
}

/// Keep the variables whose name and value are both UTF-8. No field can read
/// the others, and `std::env::vars` would panic on them.
fn utf8_vars(vars: impl Iterator<Item = (OsString, OsString)>) -> Vec<(String, String)> {
    vars.filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

#[cfg(feature = "clap")]
impl<C: Config + clap::Parser> FlagfigBuilder<C> {
    /// Parse `args` (program path first) and load the config, without
    /// printing or exiting.
    ///
    /// 1. Strip a leading action verb
    /// 2. Parse flags with clap (help requests become [`Outcome::Help`])
    /// 3. Check the version flag (becomes [`Outcome::Version`])
    /// 4. Locate, decode and merge the config file
    pub fn try_parse_from<I, T>(self, args: I) -> Result<Outcome<C>, FlagfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (action, args) = crate::action::extract_action(args);
        if let Some(action) = &action {
            debug!(%action, "extracted action");
        }

        let record = match crate::cli::parse_flags::<C>(&args)? {
            crate::cli::FlagsOutcome::Parsed(record) => record,
            crate::cli::FlagsOutcome::Display(text) => return Ok(Outcome::Help(text)),
        };

        let program = self
            .program
            .clone()
            .or_else(|| args.first().map(PathBuf::from));
        self.finish(record, action, program)
    }

    /// Like [`try_parse_from`](Self::try_parse_from), but prints help or the
    /// version banner and exits with status 0 when asked to.
    pub fn parse_from<I, T>(self, args: I) -> Result<Parsed<C>, FlagfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.try_parse_from(args)? {
            Outcome::Loaded(parsed) => Ok(parsed),
            Outcome::Help(text) | Outcome::Version(text) => {
                print!("{text}");
                std::process::exit(0);
            }
        }
    }

    /// Parse the process arguments and load the config.
    pub fn parse(self) -> Result<Parsed<C>, FlagfigError> {
        let args = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
        self.parse_from(args)
    }
}
