//! Layered configuration for command-line tools: flags, environment
//! variables, a TOML file, and per-field defaults, merged into one typed
//! record.
//!
//! The flags parser goes first. Every field it left at its zero value is then
//! taken from the field's environment variable if one is declared and set,
//! else from the config file, else from the field's declared default.
//!
//! ```ignore
//! let Parsed { action, config } = Flagfig::builder::<AppConfig>()
//!     .file_name("config.toml")
//!     .version(VERSION, BUILD_DATE, |c| c.version)
//!     .parse()?;
//! ```
//!
//! # Describing a record
//!
//! There is no reflection in Rust, so a record lists its mergeable fields in
//! a [`Config::fields`] table. Each [`Field`] names the TOML key, an accessor
//! for the field, and optionally a default literal and an environment
//! variable:
//!
//! ```ignore
//! impl Config for AppConfig {
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![
//!             Field::new("path", |c: &mut Self| &mut c.path),
//!             Field::new("timeout", |c: &mut Self| &mut c.timeout).default("30s"),
//!             Field::new("product", |c: &mut Self| &mut c.product)
//!                 .default("MLM-DEFAULT")
//!                 .env("STK_PRODUCT"),
//!         ]
//!     }
//! }
//! ```
//!
//! Fields left out of the table (or registered under the key `"-"`) are owned
//! by the flags parser alone.
//!
//! # Layer precedence
//!
//! ```text
//! Command line          whatever the flags parser put in the field
//!        ↓ only when the field is still zero / empty / false / None
//! Environment           Field::env(var), if set and non-empty
//!        ↓
//! Config file           the field's key, unless absent or set to "-"
//!        ↓
//! Default               Field::default(literal)
//! ```
//!
//! "Zero" is decided per type by [`FieldValue::is_unset`]: an empty string, a
//! zero number or duration, `false`, an empty list or map, `None`. A value the
//! user passed on the command line is therefore never overwritten. The flip
//! side is that a flag explicitly set to a zero value (`--count 0`) is
//! indistinguishable from an absent one and falls through to the lower layers.
//!
//! # Supported field types
//!
//! | Type | From a token | From TOML |
//! |------|--------------|-----------|
//! | `String` | as-is | scalars rendered as text |
//! | `bool` | `""` is `true`, else `true`/`false`/`1`/`0`/`t`/`f`... | boolean or token |
//! | `i8`..`i64`, `u8`..`u64`, `isize`, `usize` | decimal, width-checked | integer, range-checked |
//! | `f32`, `f64` | decimal | float or integer |
//! | [`Duration`](std::time::Duration) | `5s`, `1.5h`, `2h30m` | duration string |
//! | `Vec<T>` | appends one element | array, element by element |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `key:value` | `[["k", v], ...]`, `["k:v", ...]`, `{ k = v }` |
//! | `Option<T>` | allocates, then as `T` | allocates, then as `T` |
//! | [`Dynamic`] | as its declared kind | as its declared kind |
//!
//! Types compose: `Vec<Duration>`, `HashMap<String, Vec<u16>>` and
//! `Option<BTreeMap<u16, String>>` all work. Implement [`FieldValue`] to add
//! your own.
//!
//! # Finding the config file
//!
//! The file name defaults to `<app>.toml`, where the app name is the program's
//! file stem. A name containing a directory is used as-is: if that file is
//! missing there simply is no config file. A bare name is searched for in the
//! current directory, the executable's directory, and finally the directory
//! named by `$CONFIG_REPO`. See [`SearchPath`] to change the list.
//!
//! A missing file is not an error; defaults still apply.
//!
//! # Actions
//!
//! Tools often take a leading verb: `tool put --file x`. Before the flags are
//! parsed, a first argument that doesn't start with `-` or `/` is removed and
//! returned as [`Parsed::action`]. See [`extract_action`].
//!
//! # Help and version
//!
//! [`FlagfigBuilder::parse`] prints clap's help text, or the banner
//! `"<app> version: <version> [<build date>]"` when the record's version flag
//! is set, and exits with status 0. Neither reads the config file.
//! [`FlagfigBuilder::try_parse_from`] returns these as [`Outcome`] variants
//! instead of exiting.
//!
//! # Without a CLI framework
//!
//! The `clap` feature (on by default) provides the parse entry points. Without
//! it, fill the record with any parser and call
//! [`FlagfigBuilder::load_onto`] to merge the file and defaults into it.
//!
//! # Strict mode
//!
//! Off by default. With [`.strict(true)`](FlagfigBuilder::strict), a config
//! file key that no field reads fails the load with the key, file path and
//! line number:
//!
//! ```text
//! Unknown key 'typo_key' in /srv/app/config.toml (line 5)
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`FlagfigError`]. A value that cannot be
//! converted reports the key and the offending token through
//! [`CoerceError`]. The first bad field aborts the whole load.

pub mod error;
pub mod types;

mod action;
mod builder;
#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod duration;
mod field;
mod file;
mod merge;
mod resolve;
mod validate;

#[cfg(test)]
mod fixtures;

pub use action::extract_action;
pub use builder::{Flagfig, FlagfigBuilder, Outcome, Parsed};
pub use coerce::FieldValue;
pub use duration::parse_duration;
pub use error::{CoerceError, FlagfigError};
pub use field::{Config, Field};
pub use types::{APP_NAME, CONFIG_REPO_ENV, Dynamic, SearchPath, Shape};
