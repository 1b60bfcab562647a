//! Field precedence: fill every still-unset field of a record from the
//! environment, the decoded config file, or its declared default.
//!
//! Precedence per field, highest first:
//!
//! ```text
//! Command line        whatever the flags parser left in the field
//!        ↓ falls through when the field is still at its zero value
//! Environment         the field's declared env var, if set and non-empty
//!        ↓
//! Config file         the field's TOML key, unless absent or "-"
//!        ↓
//! Default             the field's declared default literal
//! ```
//!
//! A field with no default that nothing else provides keeps its zero value.

use std::fmt;

use toml::{Table, Value};
use tracing::debug;

use crate::error::FlagfigError;
use crate::field::{Config, Field};

/// File value meaning "explicitly unset"; the field falls back to its default.
pub const SENTINEL: &str = "-";

/// Where a field's final value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    CommandLine,
    Env,
    File,
    Default,
    Unset,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::CommandLine => "command line",
            Source::Env => "environment",
            Source::File => "config file",
            Source::Default => "default",
            Source::Unset => "unset",
        };
        write!(f, "{name}")
    }
}

/// Merge `table` and `env_vars` into every keyed field of `record`, in
/// declaration order.
///
/// The first coercion error aborts the pass; fields merged before it keep
/// their new values. Returns the source chosen for each merged field.
pub fn merge_all<C: Config>(
    record: &mut C,
    table: &Table,
    env_vars: &[(String, String)],
) -> Result<Vec<(&'static str, Source)>, FlagfigError> {
    let mut sources = Vec::new();
    for field in C::fields() {
        if field.is_skipped() {
            match field.default_literal() {
                Some(default) => debug!(
                    key = field.key(),
                    default, "field is not merged; its declared default is ignored"
                ),
                None => debug!(key = field.key(), "field is not sourced from the config file"),
            }
            continue;
        }
        let source = merge_field(record, &field, table, env_vars)?;
        debug!(key = field.key(), %source, "field resolved");
        sources.push((field.key(), source));
    }
    Ok(sources)
}

fn merge_field<C>(
    record: &mut C,
    field: &Field<C>,
    table: &Table,
    env_vars: &[(String, String)],
) -> Result<Source, FlagfigError> {
    let slot = field.slot(record);
    if !slot.is_unset() {
        return Ok(Source::CommandLine);
    }

    let invalid = |source| FlagfigError::InvalidValue {
        key: field.key().to_string(),
        source,
    };

    if let Some(value) = field.env_var().and_then(|var| lookup_env(env_vars, var)) {
        slot.set_token(value).map_err(invalid)?;
        return Ok(Source::Env);
    }

    match table.get(field.key()) {
        Some(Value::String(s)) if s == SENTINEL => {}
        Some(value) => {
            slot.set_value(value).map_err(invalid)?;
            return Ok(Source::File);
        }
        None => {}
    }

    match field.default_literal() {
        Some(literal) => {
            slot.set_token(literal).map_err(invalid)?;
            Ok(Source::Default)
        }
        None => Ok(Source::Unset),
    }
}

/// Last assignment wins, like a real environment; empty values count as unset.
fn lookup_env<'a>(env_vars: &'a [(String, String)], var: &str) -> Option<&'a str> {
    env_vars
        .iter()
        .rev()
        .find(|(name, _)| name == var)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::CoerceError;
    use crate::fixtures::test::TestConfig;
    use crate::types::Dynamic;

    fn table(toml_str: &str) -> Table {
        toml_str.parse::<Table>().unwrap()
    }

    fn merge(config: &mut TestConfig, toml_str: &str) -> Result<(), FlagfigError> {
        merge_all(config, &table(toml_str), &[]).map(|_| ())
    }

    #[test]
    fn file_fills_unset_fields() {
        let mut config = TestConfig::default();
        merge(
            &mut config,
            r#"
            path = "/srv/data"
            max_conc = 4
            verbose = true
            tags = ["a", "b", "c"]
            filter = [["pat", "123"], ["ext"]]
            "#,
        )
        .unwrap();
        assert_eq!(config.path, "/srv/data");
        assert_eq!(config.max_concurrency, 4);
        assert!(config.verbose);
        assert_eq!(config.tags, vec!["a", "b", "c"]);
        assert_eq!(config.filters["pat"], "123");
        assert_eq!(config.filters["ext"], "");
    }

    #[test]
    fn command_line_values_win() {
        let mut config = TestConfig {
            path: "/from/cli".into(),
            max_concurrency: 9,
            verbose: true,
            tags: vec!["cli".into()],
            ..TestConfig::default()
        };
        merge(
            &mut config,
            r#"
            path = "/from/file"
            max_conc = 4
            verbose = false
            tags = ["file"]
            "#,
        )
        .unwrap();
        assert_eq!(config.path, "/from/cli");
        assert_eq!(config.max_concurrency, 9);
        assert!(config.verbose);
        assert_eq!(config.tags, vec!["cli"]);
    }

    #[test]
    fn absent_keys_take_declared_defaults() {
        let mut config = TestConfig::default();
        merge(&mut config, "").unwrap();
        assert_eq!(config.product, "MLM-DEFAULT");
        assert_eq!(config.ratio, 0.5);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn absent_keys_without_default_stay_zero() {
        let mut config = TestConfig::default();
        merge(&mut config, "").unwrap();
        assert_eq!(config.path, "");
        assert_eq!(config.max_concurrency, 0);
        assert!(!config.verbose);
        assert!(config.tags.is_empty());
        assert_eq!(config.retries, None);
    }

    #[test]
    fn sentinel_falls_back_to_default() {
        let mut config = TestConfig::default();
        merge(&mut config, "product = \"-\"\npath = \"-\"\n").unwrap();
        assert_eq!(config.product, "MLM-DEFAULT");
        assert_eq!(config.path, "");
    }

    #[test]
    fn dash_keyed_fields_are_never_touched() {
        let mut config = TestConfig::default();
        merge(&mut config, "\"-\" = \"from-file\"\nmode = \"x\"\n").unwrap();
        assert_eq!(config.mode, "");
    }

    #[test]
    fn dash_keyed_fields_keep_the_flags_parser_value() {
        let mut config = TestConfig {
            mode: "PRODUCTION".into(),
            ..TestConfig::default()
        };
        merge(&mut config, "mode = \"x\"\n").unwrap();
        assert_eq!(config.mode, "PRODUCTION");
    }

    #[derive(Default)]
    struct ModeOnly {
        mode: String,
    }

    impl Config for ModeOnly {
        fn fields() -> Vec<Field<Self>> {
            vec![Field::new("-", |c: &mut Self| &mut c.mode).default("PRODUCTION")]
        }
    }

    #[test]
    fn default_on_dash_keyed_field_is_not_applied() {
        let mut config = ModeOnly::default();
        let sources = merge_all(&mut config, &Table::new(), &[]).unwrap();
        assert!(sources.is_empty());
        assert_eq!(config.mode, "");
    }

    #[test]
    fn env_beats_file_and_default() {
        let mut config = TestConfig::default();
        let env = vec![("STK_PRODUCT".to_string(), "FROM-ENV".to_string())];
        let sources = merge_all(&mut config, &table("product = \"FROM-FILE\""), &env).unwrap();
        assert_eq!(config.product, "FROM-ENV");
        assert!(sources.contains(&("product", Source::Env)));
    }

    #[test]
    fn empty_env_value_is_ignored() {
        let mut config = TestConfig::default();
        let env = vec![("STK_PRODUCT".to_string(), String::new())];
        merge_all(&mut config, &table("product = \"FROM-FILE\""), &env).unwrap();
        assert_eq!(config.product, "FROM-FILE");
    }

    #[test]
    fn reports_sources() {
        let mut config = TestConfig {
            path: "/cli".into(),
            ..TestConfig::default()
        };
        let sources = merge_all(&mut config, &table("modo = \"fast\""), &[]).unwrap();
        assert_eq!(sources[0], ("path", Source::CommandLine));
        assert_eq!(sources[1], ("modo", Source::File));
        assert_eq!(sources[2], ("max_conc", Source::Unset));
        assert!(sources.contains(&("timeout", Source::Default)));
    }

    #[test]
    fn first_error_aborts_without_rollback() {
        let mut config = TestConfig::default();
        let err = merge(&mut config, "path = \"/ok\"\nverbose = \"yes\"\nratio = 2.0\n").unwrap_err();
        match err {
            FlagfigError::InvalidValue { key, source } => {
                assert_eq!(key, "verbose");
                assert_eq!(source, CoerceError::InvalidBoolean("yes".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(config.path, "/ok");
        assert_eq!(config.ratio, 0.0);
    }

    #[test]
    fn malformed_duration_in_file_is_an_error() {
        let mut config = TestConfig::default();
        let err = merge(&mut config, "timeout = \"soon\"").unwrap_err();
        assert!(matches!(
            err,
            FlagfigError::InvalidValue {
                source: CoerceError::InvalidDuration { .. },
                ..
            }
        ));
    }

    #[test]
    fn optional_and_dynamic_fields() {
        let mut config = TestConfig {
            extra: Dynamic::Float(0.0),
            ..TestConfig::default()
        };
        merge(&mut config, "retries = 3\nextra = 1.25\n").unwrap();
        assert_eq!(config.retries, Some(3));
        assert_eq!(config.extra, Dynamic::Float(1.25));
    }

    #[test]
    fn table_is_not_mutated() {
        let source = table("path = \"/a\"\ntags = [\"x\"]\n");
        let before = source.clone();
        let mut config = TestConfig::default();
        merge_all(&mut config, &source, &[]).unwrap();
        assert_eq!(source, before);
    }
}
