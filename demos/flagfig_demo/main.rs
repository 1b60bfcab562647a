//! # flagfig demo application
//!
//! A sample CLI tool showing how flags, a config file and defaults combine.
//! It prints the merged record and exits.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example flagfig_demo
//! cargo run --example flagfig_demo -- deploy --maxconc 8
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature             | How to exercise it                                                 |
//! |---------------------|--------------------------------------------------------------------|
//! | Field defaults      | `cargo run --example flagfig_demo` (product, timeout)              |
//! | Flag-only default   | `mode` is `PRODUCTION` from clap's `default_value`                 |
//! | Config file         | Create `config.toml` in cwd with `product = "PRO"`, then run       |
//! | Shared config dir   | `CONFIG_REPO=/etc/myapps cargo run --example flagfig_demo`         |
//! | Env annotation      | `STK_PRODUCT=ENV cargo run --example flagfig_demo`                 |
//! | Flag wins           | `cargo run --example flagfig_demo -- --product CLI`                |
//! | Ignored file key    | `mode = "X"` in the file has no effect; `--mode` still works       |
//! | Leading action      | `cargo run --example flagfig_demo -- deploy`                       |
//! | Version banner      | `cargo run --example flagfig_demo -- -v`                           |
//! | Help                | `cargo run --example flagfig_demo -- --help`                       |
//! | Strict mode         | `FLAGFIG_DEMO_STRICT=1` rejects unknown keys in the file           |

mod config;

use flagfig::{Flagfig, FlagfigError, Parsed};

use config::DemoConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_DATE: &str = "2026-10-18";

fn run() -> Result<(), FlagfigError> {
    let strict = std::env::var_os("FLAGFIG_DEMO_STRICT").is_some();

    let Parsed { action, config } = Flagfig::builder::<DemoConfig>()
        .file_name("config.toml")
        .strict(strict)
        .version(VERSION, BUILD_DATE, |c| c.version)
        .parse()?;

    match action {
        Some(action) => println!("action: {action}"),
        None => println!("action: (none)"),
    }
    println!("{config:#?}");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
