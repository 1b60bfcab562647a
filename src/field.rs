//! The field descriptor table: how a configuration record tells the engine
//! which of its fields are mergeable.

use crate::coerce::FieldValue;

/// A configuration record the engine can merge into.
///
/// ```ignore
/// impl Config for AppConfig {
///     fn fields() -> Vec<Field<Self>> {
///         vec![
///             Field::new("path", |c: &mut Self| &mut c.path),
///             Field::new("max_conc", |c: &mut Self| &mut c.max_concurrency),
///             Field::new("product", |c: &mut Self| &mut c.product)
///                 .default("MLM-DEFAULT")
///                 .env("STK_PRODUCT"),
///         ]
///     }
/// }
/// ```
///
/// Fields are merged in table order. Fields that should never come from the
/// config file are left out of the table (or registered with the key `"-"`).
pub trait Config: Sized {
    fn fields() -> Vec<Field<Self>>;
}

/// One mergeable field of a record `C`.
pub struct Field<C> {
    key: &'static str,
    default: Option<&'static str>,
    env: Option<&'static str>,
    slot: fn(&mut C) -> &mut dyn FieldValue,
}

impl<C> Field<C> {
    /// Register the field stored at `slot` under TOML key `key`.
    pub fn new(key: &'static str, slot: fn(&mut C) -> &mut dyn FieldValue) -> Self {
        Self {
            key,
            default: None,
            env: None,
            slot,
        }
    }

    /// Literal coerced into the field when neither the command line nor the
    /// file provides a value.
    ///
    /// Ignored on a `"-"` field, which the merge never visits; give such a
    /// field its default in the flags parser instead.
    pub fn default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    /// Environment variable consulted before the config file.
    pub fn env(mut self, var: &'static str) -> Self {
        self.env = Some(var);
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn default_literal(&self) -> Option<&'static str> {
        self.default
    }

    pub fn env_var(&self) -> Option<&'static str> {
        self.env
    }

    /// `"-"` marks a field that is never sourced from the file.
    pub fn is_skipped(&self) -> bool {
        self.key.is_empty() || self.key == "-"
    }

    pub fn slot<'a>(&self, record: &'a mut C) -> &'a mut dyn FieldValue {
        (self.slot)(record)
    }
}

impl<C> std::fmt::Debug for Field<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}
