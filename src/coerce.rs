//! Value coercion: turn a textual token or a decoded TOML value into a field's
//! declared type.
//!
//! Every mergeable field type implements [`FieldValue`]. Scalars parse tokens
//! directly; composites (`Vec`, `HashMap`, `BTreeMap`, `Option`, [`Dynamic`])
//! recurse into their element types, so any nesting of supported types works
//! without per-type code in the caller.
//!
//! Two entry points exist because values arrive in two forms:
//!
//! - [`set_token`](FieldValue::set_token) takes a single string: a declared
//!   default, an environment value, or one `key:value` map entry. For lists it
//!   appends one element, for maps it inserts one entry.
//! - [`set_value`](FieldValue::set_value) takes a decoded `toml::Value`. Arrays
//!   fill lists and maps element by element; scalars that aren't already the
//!   right type are rendered back to text and go through `set_token`, so a
//!   TOML integer can fill a string field and a TOML string can fill an integer.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::time::Duration;

use toml::Value;
use tracing::debug;

use crate::duration::parse_duration;
use crate::error::CoerceError;
use crate::types::{Dynamic, Shape};

/// A field type the merge engine can fill.
pub trait FieldValue {
    /// The declared type of this field.
    fn shape(&self) -> Shape;

    /// `true` while the field holds its zero value and may be overwritten.
    fn is_unset(&self) -> bool;

    /// Coerce a single textual token into this field.
    fn set_token(&mut self, token: &str) -> Result<(), CoerceError>;

    /// Coerce a decoded TOML value into this field.
    fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
        let token = scalar_token(value, &self.shape())?;
        self.set_token(&token)
    }
}

/// Render a scalar TOML value as the token it would have been on the command line.
fn scalar_token(value: &Value, expected: &Shape) -> Result<String, CoerceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) | Value::Table(_) => Err(mismatch(expected, value)),
    }
}

fn mismatch(expected: impl ToString, found: &Value) -> CoerceError {
    CoerceError::TypeMismatch {
        expected: expected.to_string(),
        found: found.type_str().to_string(),
    }
}

impl FieldValue for String {
    fn shape(&self) -> Shape {
        Shape::Str
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        *self = token.to_string();
        Ok(())
    }
}

impl FieldValue for bool {
    fn shape(&self) -> Shape {
        Shape::Bool
    }

    fn is_unset(&self) -> bool {
        !*self
    }

    /// A bare flag carries no token, so the empty token means `true`.
    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        *self = match token {
            "" | "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
            "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
            _ => return Err(CoerceError::InvalidBoolean(token.to_string())),
        };
        Ok(())
    }

    fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
        match value {
            Value::Boolean(b) => {
                *self = *b;
                Ok(())
            }
            other => {
                let token = scalar_token(other, &Shape::Bool)?;
                self.set_token(&token)
            }
        }
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $signed:expr),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn shape(&self) -> Shape {
                Shape::Int { signed: $signed, bits: <$ty>::BITS }
            }

            fn is_unset(&self) -> bool {
                *self == 0
            }

            fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
                if token.is_empty() {
                    *self = 0;
                    return Ok(());
                }
                *self = token.parse::<$ty>().map_err(|e| CoerceError::InvalidInteger {
                    value: token.to_string(),
                    shape: self.shape().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(())
            }

            fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
                match value {
                    Value::Integer(i) => {
                        *self = <$ty>::try_from(*i).map_err(|e| CoerceError::InvalidInteger {
                            value: i.to_string(),
                            shape: self.shape().to_string(),
                            reason: e.to_string(),
                        })?;
                        Ok(())
                    }
                    other => {
                        let token = scalar_token(other, &self.shape())?;
                        self.set_token(&token)
                    }
                }
            }
        }
    )*};
}

impl_integer!(
    i8 => true, i16 => true, i32 => true, i64 => true, isize => true,
    u8 => false, u16 => false, u32 => false, u64 => false, usize => false,
);

macro_rules! impl_float {
    ($($ty:ty => $bits:expr),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn shape(&self) -> Shape {
                Shape::Float { bits: $bits }
            }

            fn is_unset(&self) -> bool {
                *self == 0.0
            }

            fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
                if token.is_empty() {
                    *self = 0.0;
                    return Ok(());
                }
                let parsed = token.parse::<$ty>().map_err(|e| CoerceError::InvalidFloat {
                    value: token.to_string(),
                    shape: self.shape().to_string(),
                    reason: e.to_string(),
                })?;
                if parsed.is_infinite() && !is_infinity_literal(token) {
                    return Err(float_out_of_range(token, &self.shape()));
                }
                *self = parsed;
                Ok(())
            }

            fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
                match value {
                    Value::Float(f) => {
                        let narrowed = *f as $ty;
                        if narrowed.is_infinite() && f.is_finite() {
                            return Err(float_out_of_range(&f.to_string(), &self.shape()));
                        }
                        *self = narrowed;
                    }
                    Value::Integer(i) => *self = *i as $ty,
                    other => {
                        let token = scalar_token(other, &self.shape())?;
                        return self.set_token(&token);
                    }
                }
                Ok(())
            }
        }
    )*};
}

impl_float!(f32 => 32, f64 => 64);

/// `inf`, `+infinity`, `-Inf` and friends, which parse to infinity on purpose.
fn is_infinity_literal(token: &str) -> bool {
    let unsigned = token.trim_start_matches(['+', '-']).to_ascii_lowercase();
    unsigned == "inf" || unsigned == "infinity"
}

fn float_out_of_range(value: &str, shape: &Shape) -> CoerceError {
    CoerceError::InvalidFloat {
        value: value.to_string(),
        shape: shape.to_string(),
        reason: "value out of range".to_string(),
    }
}

impl FieldValue for Duration {
    fn shape(&self) -> Shape {
        Shape::Duration
    }

    fn is_unset(&self) -> bool {
        self.is_zero()
    }

    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        *self = if token.is_empty() {
            Duration::ZERO
        } else {
            parse_duration(token)?
        };
        Ok(())
    }
}

impl<T: FieldValue + Default> FieldValue for Vec<T> {
    fn shape(&self) -> Shape {
        Shape::Seq(Box::new(T::default().shape()))
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        let mut item = T::default();
        item.set_token(token)?;
        self.push(item);
        Ok(())
    }

    /// Arrays are appended whole or not at all.
    fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
        match value {
            Value::Array(items) => {
                let mut staged = Vec::with_capacity(items.len());
                for raw in items {
                    let mut item = T::default();
                    item.set_value(raw)?;
                    staged.push(item);
                }
                self.extend(staged);
            }
            other => {
                let mut item = T::default();
                item.set_value(other)?;
                self.push(item);
            }
        }
        Ok(())
    }
}

/// Split a `key:value` token on its first colon. A missing value is empty.
fn split_entry(token: &str) -> (&str, &str) {
    token.split_once(':').unwrap_or((token, ""))
}

fn token_entry<K, V>(token: &str) -> Result<(K, V), CoerceError>
where
    K: FieldValue + Default,
    V: FieldValue + Default,
{
    let (raw_key, raw_value) = split_entry(token);
    let mut key = K::default();
    key.set_token(raw_key)?;
    let mut value = V::default();
    value.set_token(raw_value)?;
    Ok((key, value))
}

/// One element of an array-valued map source: `["key", value]`, `["key"]` or `"key:value"`.
fn array_entry<K, V>(entry: &Value) -> Result<(K, V), CoerceError>
where
    K: FieldValue + Default,
    V: FieldValue + Default,
{
    let pair = match entry {
        Value::Array(pair) => pair,
        Value::String(token) => return token_entry(token),
        other => return Err(mismatch("map entry", other)),
    };
    let (raw_key, raw_value) = match pair.as_slice() {
        [k] => (k, None),
        [k, v] => (k, Some(v)),
        _ => return Err(CoerceError::MalformedMapEntry { len: pair.len() }),
    };
    let Value::String(raw_key) = raw_key else {
        return Err(CoerceError::MapKeyType {
            found: raw_key.type_str().to_string(),
        });
    };

    let mut key = K::default();
    key.set_token(raw_key)?;
    let mut value = V::default();
    match raw_value {
        Some(v) => value.set_value(v)?,
        None => value.set_token("")?,
    }
    Ok((key, value))
}

/// Decode every entry of a map source before any of them is inserted.
fn value_entries<K, V>(source: &Value) -> Result<Vec<(K, V)>, CoerceError>
where
    K: FieldValue + Default,
    V: FieldValue + Default,
{
    match source {
        Value::Array(entries) => entries.iter().map(array_entry::<K, V>).collect(),
        Value::Table(table) => table
            .iter()
            .map(|(raw_key, raw_value)| {
                let mut key = K::default();
                key.set_token(raw_key)?;
                let mut value = V::default();
                value.set_value(raw_value)?;
                Ok((key, value))
            })
            .collect(),
        Value::String(token) => Ok(vec![token_entry(token)?]),
        other => Err(mismatch("map entry", other)),
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S>
where
    K: FieldValue + Default + Eq + Hash,
    V: FieldValue + Default,
    S: BuildHasher,
{
    fn shape(&self) -> Shape {
        Shape::Map(
            Box::new(K::default().shape()),
            Box::new(V::default().shape()),
        )
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        let (key, value) = token_entry(token)?;
        self.insert(key, value);
        Ok(())
    }

    fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
        self.extend(value_entries::<K, V>(value)?);
        Ok(())
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: FieldValue + Default + Ord,
    V: FieldValue + Default,
{
    fn shape(&self) -> Shape {
        Shape::Map(
            Box::new(K::default().shape()),
            Box::new(V::default().shape()),
        )
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        let (key, value) = token_entry(token)?;
        self.insert(key, value);
        Ok(())
    }

    fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
        self.extend(value_entries::<K, V>(value)?);
        Ok(())
    }
}

impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn shape(&self) -> Shape {
        let inner = match self {
            Some(v) => v.shape(),
            None => T::default().shape(),
        };
        Shape::Optional(Box::new(inner))
    }

    fn is_unset(&self) -> bool {
        self.is_none()
    }

    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        self.get_or_insert_with(T::default).set_token(token)
    }

    fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
        self.get_or_insert_with(T::default).set_value(value)
    }
}

impl Dynamic {
    fn inner(&self) -> Option<&dyn FieldValue> {
        match self {
            Dynamic::Unset => None,
            Dynamic::Str(v) => Some(v),
            Dynamic::Bool(v) => Some(v),
            Dynamic::Int(v) => Some(v),
            Dynamic::Float(v) => Some(v),
            Dynamic::Duration(v) => Some(v),
            Dynamic::List(v) => Some(v),
        }
    }

    fn inner_mut(&mut self) -> Option<&mut dyn FieldValue> {
        match self {
            Dynamic::Unset => None,
            Dynamic::Str(v) => Some(v),
            Dynamic::Bool(v) => Some(v),
            Dynamic::Int(v) => Some(v),
            Dynamic::Float(v) => Some(v),
            Dynamic::Duration(v) => Some(v),
            Dynamic::List(v) => Some(v),
        }
    }
}

impl FieldValue for Dynamic {
    fn shape(&self) -> Shape {
        Shape::Dynamic(self.inner().map(|v| Box::new(v.shape())))
    }

    fn is_unset(&self) -> bool {
        self.inner().is_none_or(|v| v.is_unset())
    }

    fn set_token(&mut self, token: &str) -> Result<(), CoerceError> {
        match self.inner_mut() {
            Some(v) => v.set_token(token),
            None => {
                debug!("dynamic value has no declared kind, ignoring token");
                Ok(())
            }
        }
    }

    fn set_value(&mut self, value: &Value) -> Result<(), CoerceError> {
        match self.inner_mut() {
            Some(v) => v.set_value(value),
            None => {
                debug!("dynamic value has no declared kind, ignoring value");
                Ok(())
            }
        }
    }
}
