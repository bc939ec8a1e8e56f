use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::CoreError;

/// Label → value mapping that keeps labels in the order they were first seen.
///
/// Re-inserting an existing label replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<(String, String)>,
}

impl LabelMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            slot.1 = value;
        } else {
            self.entries.push((label, value));
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }
}

impl Serialize for LabelMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Parsed system requirements for one platform.
///
/// A tier that the source payload does not carry stays `None`; it is never
/// replaced by an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<LabelMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<LabelMap>,
}

/// Platform whose requirement block is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementPlatform {
    Pc,
    Mac,
    Linux,
}

impl fmt::Display for RequirementPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementPlatform::Pc => f.write_str("pc"),
            RequirementPlatform::Mac => f.write_str("mac"),
            RequirementPlatform::Linux => f.write_str("linux"),
        }
    }
}

impl FromStr for RequirementPlatform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pc" | "windows" => Ok(RequirementPlatform::Pc),
            "mac" | "macos" => Ok(RequirementPlatform::Mac),
            "linux" => Ok(RequirementPlatform::Linux),
            _ => Err(CoreError::InvalidPlatform(s.to_string())),
        }
    }
}
