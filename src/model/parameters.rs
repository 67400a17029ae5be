// src/model/parameters.rs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed fdf value, produced by the coercion chain in `io::fdf`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FdfValue {
    Int(i64),
    Float(f64),
    /// Scalar followed by a unit, e.g. `5.43 Ang`
    Quantity(f64, String),
    Bool(bool),
    Str(String),
    /// Block body: one token list per non-empty line
    Block(Vec<Vec<FdfValue>>),
}

impl FdfValue {
    /// Numeric value of a scalar entry. Quantities yield their magnitude.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FdfValue::Int(v) => Some(*v as f64),
            FdfValue::Float(v) => Some(*v),
            FdfValue::Quantity(v, _) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FdfValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FdfValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FdfValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&[Vec<FdfValue>]> {
        match self {
            FdfValue::Block(rows) => Some(rows),
            _ => None,
        }
    }
}

impl fmt::Display for FdfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FdfValue::Int(v) => write!(f, "{}", v),
            // Debug keeps a decimal point so the value re-reads as a float
            FdfValue::Float(v) => write!(f, "{:?}", v),
            FdfValue::Quantity(v, unit) => write!(f, "{:?} {}", v, unit),
            FdfValue::Bool(true) => write!(f, "T"),
            FdfValue::Bool(false) => write!(f, "F"),
            FdfValue::Str(s) => write!(f, "{}", s),
            FdfValue::Block(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    let tokens: Vec<String> = row.iter().map(|t| t.to_string()).collect();
                    write!(f, "{}", tokens.join(" "))?;
                }
                Ok(())
            }
        }
    }
}

/// Insertion-ordered parameter mapping with lower-cased keys.
///
/// Inserting a key twice keeps its original position and replaces the value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterMap {
    entries: Vec<(String, FdfValue)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FdfValue) {
        let key = key.into().to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FdfValue> {
        let key = key.to_lowercase();
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Like `get`, but a missing key is an error naming the key.
    pub fn require(&self, key: &str) -> Result<&FdfValue> {
        self.get(key)
            .ok_or_else(|| Error::MissingParameter(key.to_lowercase()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FdfValue::as_f64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(FdfValue::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FdfValue::as_str)
    }

    pub fn get_block(&self, key: &str) -> Option<&[Vec<FdfValue>]> {
        self.get(key).and_then(FdfValue::as_block)
    }

    /// Merges `other` into `self`; entries of `other` win.
    pub fn extend(&mut self, other: ParameterMap) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FdfValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FdfValue)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, FdfValue)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
