//! Typed parameter values for one adapter invocation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entities::{AdapterDescriptor, ParamKind};
use crate::core::error::AdapterError;

/// A single typed parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl ParamValue {
    /// Truthiness used for optional-flag elision: empty strings, zero and
    /// `false` are treated as absent.
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Boolean(b) => *b,
            ParamValue::Integer(i) => *i != 0,
            ParamValue::String(s) => !s.is_empty(),
        }
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Boolean(_) => ParamKind::Boolean,
            ParamValue::Integer(_) => ParamKind::Integer,
            ParamValue::String(_) => ParamKind::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Coerce a raw front-end string into the declared kind.
    pub fn coerce(raw: &str, kind: ParamKind) -> Result<Self, String> {
        match kind {
            ParamKind::String => Ok(ParamValue::String(raw.to_string())),
            ParamKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(ParamValue::Integer)
                .map_err(|_| format!("expected an integer, got '{}'", raw)),
            ParamKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(ParamValue::Boolean(true)),
                "false" | "no" | "off" | "0" => Ok(ParamValue::Boolean(false)),
                _ => Err(format!("expected a boolean, got '{}'", raw)),
            },
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Boolean(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

/// Parameters supplied for one invocation, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Build a set from raw `name=value` strings, coercing each value by the
    /// kind the descriptor declares for it.
    pub fn from_raw<I, K, V>(descriptor: &AdapterDescriptor, raw: I) -> Result<Self, AdapterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = Self::new();
        for (name, value) in raw {
            let name = name.as_ref();
            let spec = descriptor.parameter(name).ok_or_else(|| {
                AdapterError::validation(&descriptor.id, name, "unknown parameter")
            })?;
            let value = ParamValue::coerce(value.as_ref(), spec.kind)
                .map_err(|message| AdapterError::validation(&descriptor.id, name, message))?;
            set.insert(name, value);
        }
        Ok(set)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Get a value only when it is present and truthy
    pub fn get_truthy(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name).filter(|v| v.is_truthy())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(|v| v.as_i64())
    }

    /// Boolean switches default to off when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.values.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Rendered value of a parameter the validator already guaranteed.
    pub fn require(&self, name: &str) -> Result<String, String> {
        self.get_truthy(name)
            .map(|v| v.to_string())
            .ok_or_else(|| format!("Missing required argument: {}", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
