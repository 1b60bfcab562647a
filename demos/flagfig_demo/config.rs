//! The demo's record: which flags exist, which file keys feed them, and their
//! defaults.

use std::time::Duration;

use clap::Parser;
use flagfig::{Config, Field};

/// flagfig demo: flags first, then flagfig-demo's config.toml, then defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "flagfig-demo")]
pub struct DemoConfig {
    /// Working directory.
    #[arg(long, default_value_t)]
    pub path: String,

    /// Working mode.
    #[arg(long, default_value_t)]
    pub modo: String,

    /// Maximum number of concurrent workers.
    #[arg(long = "maxconc", default_value_t)]
    pub max_concurrency: i32,

    /// Run mode. Never read from the config file.
    #[arg(long, default_value = "PRODUCTION")]
    pub mode: String,

    /// Product code.
    #[arg(long, default_value_t)]
    pub product: String,

    /// Dry run.
    #[arg(long)]
    pub test: bool,

    /// Request timeout, e.g. 30s or 1m30s.
    #[arg(long, value_parser = flagfig::parse_duration, default_value = "0")]
    pub timeout: Duration,

    /// Labels attached to every job. Repeatable.
    #[arg(long = "label")]
    pub labels: Vec<String>,

    /// Print version information and exit.
    #[arg(short = 'v', long)]
    pub version: bool,
}

impl Config for DemoConfig {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("path", |c: &mut Self| &mut c.path),
            Field::new("modo", |c: &mut Self| &mut c.modo),
            Field::new("max_conc", |c: &mut Self| &mut c.max_concurrency),
            Field::new("-", |c: &mut Self| &mut c.mode),
            Field::new("product", |c: &mut Self| &mut c.product)
                .default("MLM-DEFAULT")
                .env("STK_PRODUCT"),
            Field::new("test", |c: &mut Self| &mut c.test).env("STK_TEST"),
            Field::new("timeout", |c: &mut Self| &mut c.timeout).default("30s"),
            Field::new("labels", |c: &mut Self| &mut c.labels),
        ]
    }
}
