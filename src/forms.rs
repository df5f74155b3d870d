//! Submitted form fields.
//!
//! [`FormData`] keeps fields in submission order, like the browser's form
//! encoding does, and allows repeated keys (`tags[]`).

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.fields.push((key.to_string(), value.to_string()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Fail with every required key that is absent or blank. Whitespace-only
    /// values count as blank.
    pub fn require(&self, keys: &[&str]) -> Result<(), FormError> {
        let missing: Vec<String> = keys
            .iter()
            .filter(|key| self.get(key).is_none_or(|v| v.trim().is_empty()))
            .map(|key| key.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingFields(missing))
        }
    }

    /// Flatten into a JSON object. A repeated key keeps its last value.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.fields {
            map.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(map)
    }

    /// Parse `key=value` pairs as given on the command line.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut form = FormData::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got {pair:?}"))?;
            if key.is_empty() {
                return Err(format!("empty field name in {pair:?}"));
            }
            form.push(key, value);
        }
        Ok(form)
    }
}
