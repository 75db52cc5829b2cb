//! Event category enum as the single source of truth for category strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of care events a caregiver can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Feeding,
    Sleep,
    Diaper,
    Growth,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Feeding, Self::Sleep, Self::Diaper, Self::Growth];

    /// String representation for storage and output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Feeding => "feeding",
            Self::Sleep => "sleep",
            Self::Diaper => "diaper",
            Self::Growth => "growth",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feeding" | "feed" => Ok(Self::Feeding),
            "sleep" => Ok(Self::Sleep),
            "diaper" => Ok(Self::Diaper),
            "growth" => Ok(Self::Growth),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown category strings.
#[derive(Debug, Clone)]
pub struct UnknownCategory(String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for variant in Category::ALL {
            let s = variant.to_string();
            let parsed: Category = s.parse().expect("should parse");
            assert_eq!(parsed, variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn feed_alias_parses() {
        let feed: Category = "feed".parse().expect("should parse");
        assert_eq!(feed, Category::Feeding);
    }

    #[test]
    fn unknown_category_errors() {
        let err = "bath".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown event category: bath");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Category::Diaper).unwrap();
        assert_eq!(json, "\"diaper\"");
        let parsed: Category = serde_json::from_str("\"sleep\"").unwrap();
        assert_eq!(parsed, Category::Sleep);
    }
}
