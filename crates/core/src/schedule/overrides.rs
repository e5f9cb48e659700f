//! Per-day status overrides attached to an assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Status marking a day as excluded from billing.
pub const EMPTY_STATUS: &str = "empty";

/// Rejected `day_overrides` payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverridesError {
    /// Payload is not valid JSON.
    #[error("day_overrides must be valid JSON")]
    InvalidJson,

    /// Payload is JSON but not an object.
    #[error("day_overrides must be a JSON object")]
    NotAnObject,

    /// A value in the object is not a string.
    #[error("day_overrides value for '{0}' must be a string")]
    NonStringValue(String),
}

/// Mapping of date key (`YYYY-MM-DD`) to day status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayOverrides(BTreeMap<String, String>);

impl DayOverrides {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parses stored JSON text, falling back to an empty mapping.
    ///
    /// Non-string values are kept as their JSON text so that they still count
    /// as an active status.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::new();
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self(
                map.into_iter()
                    .map(|(k, v)| match v {
                        Value::String(s) => (k, s),
                        other => (k, other.to_string()),
                    })
                    .collect(),
            ),
            _ => Self::new(),
        }
    }

    /// Parses client input, rejecting anything but an object of strings.
    ///
    /// # Errors
    ///
    /// Returns `OverridesError` describing the first problem found.
    pub fn parse_strict(value: &Value) -> Result<Self, OverridesError> {
        let Value::Object(map) = value else {
            return Err(OverridesError::NotAnObject);
        };
        let mut out = BTreeMap::new();
        for (k, v) in map {
            let Value::String(s) = v else {
                return Err(OverridesError::NonStringValue(k.clone()));
            };
            out.insert(k.clone(), s.clone());
        }
        Ok(Self(out))
    }

    /// Parses client input given as JSON text.
    ///
    /// # Errors
    ///
    /// Returns `OverridesError::InvalidJson` for malformed text, otherwise as
    /// [`DayOverrides::parse_strict`].
    pub fn parse_strict_str(raw: &str) -> Result<Self, OverridesError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| OverridesError::InvalidJson)?;
        Self::parse_strict(&value)
    }

    /// Serializes to the JSON text stored in the database.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// Returns true when there are no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of overridden days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sets the status for a date key.
    pub fn insert(&mut self, date: impl Into<String>, status: impl Into<String>) {
        self.0.insert(date.into(), status.into());
    }

    /// Iterates over `(date, status)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DayOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
