//! Clap adapter for flagfig.
//!
//! This module is the **optional integration layer** between flagfig's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! Clap owns everything about flags: names, help text, per-flag environment
//! variables. This module only runs the parser over the argument list and
//! separates "the user asked for help/version text" from real parse errors,
//! so the entry point can print the text and exit successfully instead of
//! reporting a failure.

use clap::Parser;
use clap::error::ErrorKind;

use crate::error::FlagfigError;

/// Result of running clap over the arguments.
#[derive(Debug)]
pub enum FlagsOutcome<C> {
    Parsed(C),
    /// Help or version text rendered by clap; the caller should print it and
    /// exit with status 0.
    Display(String),
}

/// Parse `args` (program path first) into `C`.
pub fn parse_flags<C: Parser>(args: &[String]) -> Result<FlagsOutcome<C>, FlagfigError> {
    match C::try_parse_from(args) {
        Ok(record) => Ok(FlagsOutcome::Parsed(record)),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion => Ok(FlagsOutcome::Display(e.render().to_string())),
            _ => Err(FlagfigError::FlagsParse(e)),
        },
    }
}
