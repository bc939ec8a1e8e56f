use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Output representation for text fields that have more than one.
///
/// - `Raw` returns the source markup untouched.
/// - `Normal` removes tags and store boilerplate.
/// - `List` splits the normalized text (or, for reviews, parses entries).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Raw,
    Normal,
    List,
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::Raw => f.write_str("raw"),
            TextFormat::Normal => f.write_str("normal"),
            TextFormat::List => f.write_str("list"),
        }
    }
}

impl FromStr for TextFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(TextFormat::Raw),
            "normal" => Ok(TextFormat::Normal),
            "list" => Ok(TextFormat::List),
            _ => Err(CoreError::InvalidFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_raw() {
        assert_eq!(TextFormat::default(), TextFormat::Raw);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("NORMAL".parse::<TextFormat>().unwrap(), TextFormat::Normal);
        assert_eq!(" list ".parse::<TextFormat>().unwrap(), TextFormat::List);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "dict".parse::<TextFormat>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat(ref f) if f == "dict"));
    }
}
