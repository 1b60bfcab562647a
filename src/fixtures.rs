#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::field::{Config, Field};
    use crate::types::Dynamic;

    #[derive(Debug, Default, PartialEq)]
    pub struct TestConfig {
        pub path: String,
        pub modo: String,
        pub max_concurrency: i32,
        pub mode: String,
        pub product: String,
        pub verbose: bool,
        pub ratio: f64,
        pub timeout: Duration,
        pub tags: Vec<String>,
        pub filters: HashMap<String, String>,
        pub retries: Option<u8>,
        pub extra: Dynamic,
    }

    impl Config for TestConfig {
        fn fields() -> Vec<Field<Self>> {
            vec![
                Field::new("path", |c: &mut Self| &mut c.path),
                Field::new("modo", |c: &mut Self| &mut c.modo),
                Field::new("max_conc", |c: &mut Self| &mut c.max_concurrency),
                Field::new("-", |c: &mut Self| &mut c.mode),
                Field::new("product", |c: &mut Self| &mut c.product)
                    .default("MLM-DEFAULT")
                    .env("STK_PRODUCT"),
                Field::new("verbose", |c: &mut Self| &mut c.verbose),
                Field::new("ratio", |c: &mut Self| &mut c.ratio).default("0.5"),
                Field::new("timeout", |c: &mut Self| &mut c.timeout).default("30s"),
                Field::new("tags", |c: &mut Self| &mut c.tags),
                Field::new("filter", |c: &mut Self| &mut c.filters),
                Field::new("retries", |c: &mut Self| &mut c.retries),
                Field::new("extra", |c: &mut Self| &mut c.extra),
            ]
        }
    }

    #[test]
    fn test_config_starts_unset() {
        let mut config = TestConfig::default();
        for field in TestConfig::fields() {
            assert!(field.slot(&mut config).is_unset(), "{}", field.key());
        }
    }

    // -- Fixture parsed by clap ------------------------------------------------

    #[cfg(feature = "clap")]
    #[derive(Debug, clap::Parser)]
    #[command(name = "tool")]
    pub struct CliConfig {
        /// Working directory.
        #[arg(long, default_value_t)]
        pub path: String,

        /// Maximum number of concurrent jobs.
        #[arg(long = "maxconc", default_value_t)]
        pub max_concurrency: i32,

        #[arg(long, default_value = "PRODUCTION")]
        pub mode: String,

        #[arg(long, default_value_t)]
        pub product: String,

        #[arg(long)]
        pub verbose: bool,

        #[arg(long = "tag")]
        pub tags: Vec<String>,

        #[arg(long, value_parser = crate::duration::parse_duration, default_value = "0")]
        pub timeout: Duration,

        #[arg(skip)]
        pub filters: HashMap<String, String>,

        #[arg(short = 'v', long)]
        pub version: bool,
    }

    #[cfg(feature = "clap")]
    impl Config for CliConfig {
        fn fields() -> Vec<Field<Self>> {
            vec![
                Field::new("path", |c: &mut Self| &mut c.path),
                Field::new("max_conc", |c: &mut Self| &mut c.max_concurrency),
                Field::new("-", |c: &mut Self| &mut c.mode),
                Field::new("product", |c: &mut Self| &mut c.product).default("MLM-DEFAULT"),
                Field::new("verbose", |c: &mut Self| &mut c.verbose),
                Field::new("tags", |c: &mut Self| &mut c.tags),
                Field::new("timeout", |c: &mut Self| &mut c.timeout).default("10s"),
                Field::new("filter", |c: &mut Self| &mut c.filters),
            ]
        }
    }
}
