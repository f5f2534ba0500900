//! Release versions and the version set a conversion run targets.
//!
//! Saves carry dotted release stamps such as `"19.1"` or `"1.0.0"`. Very
//! old saves store a bare integer instead, so deserialisation accepts both.
//! Comparison pads the shorter version with zeros, so `"19" == "19.0"`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SaveError;

/// A dotted release version (`major.minor.patch…`, any number of segments).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "VersionRepr", into = "String")]
pub struct Version {
    segments: Vec<u64>,
}

/// Wire shapes a version stamp may take inside a save.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Number(u64),
    Text(String),
}

impl Version {
    /// The empty version, equal to `0` and lower than every release.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a version from explicit segments.
    #[must_use]
    pub fn from_segments(segments: impl Into<Vec<u64>>) -> Self {
        Self {
            segments: segments.into(),
        }
    }

    /// The numeric segments, most significant first.
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Segment `i`, or zero past the end.
    fn segment(&self, i: usize) -> u64 {
        self.segments.get(i).copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "0");
        }
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SaveError::InvalidVersion(s.to_string()));
        }
        let segments = trimmed
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SaveError::InvalidVersion(s.to_string()))?;
        Ok(Self { segments })
    }
}

impl TryFrom<VersionRepr> for Version {
    type Error = SaveError;

    fn try_from(repr: VersionRepr) -> Result<Self, Self::Error> {
        match repr {
            VersionRepr::Number(n) => Ok(Self::from(n)),
            VersionRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl From<u64> for Version {
    fn from(major: u64) -> Self {
        Self {
            segments: vec![major],
        }
    }
}

impl From<u32> for Version {
    fn from(major: u32) -> Self {
        Self::from(u64::from(major))
    }
}

// ---------------------------------------------------------------------------
// EngineVersions
// ---------------------------------------------------------------------------

/// Versions of the running engine and game, handed to every conversion run.
///
/// The `unstamped_*` versions are what a save is assumed to be at when it
/// predates version stamping altogether.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineVersions {
    /// Release of the running engine.
    pub essentials: Version,
    /// Release of the running game.
    pub game: Version,
    /// Engine release assumed for saves without an engine stamp.
    pub unstamped_essentials: Version,
    /// Game release assumed for saves without a game stamp.
    pub unstamped_game: Version,
}

impl EngineVersions {
    /// Target the given engine and game releases with the stock
    /// unstamped assumptions (`18.1` and `0.0.0`).
    #[must_use]
    pub fn new(essentials: Version, game: Version) -> Self {
        Self {
            essentials,
            game,
            unstamped_essentials: Version::from_segments([18, 1]),
            unstamped_game: Version::from_segments([0, 0, 0]),
        }
    }
}

impl Default for EngineVersions {
    fn default() -> Self {
        Self::new(
            Version::from_segments([19, 1]),
            Version::from_segments([1, 0, 0]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().expect("valid version")
    }

    #[test]
    fn missing_segments_compare_as_zero() {
        assert_eq!(v("19"), v("19.0"));
        assert_eq!(v("19"), v("19.0.0"));
        assert!(v("18.1") < v("19"));
        assert!(v("19.0.1") > v("19"));
        assert_eq!(Version::zero(), v("0.0.0"));
    }

    #[test]
    fn numeric_not_lexical_ordering() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("20") > v("3"));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Version>().is_err());
        assert!("19.x".parse::<Version>().is_err());
        assert!("19..1".parse::<Version>().is_err());
    }

    #[test]
    fn deserializes_from_text_or_integer() {
        let from_text: Version = serde_json::from_str("\"19.1\"").expect("text");
        let from_int: Version = serde_json::from_str("19").expect("int");
        assert_eq!(from_text, v("19.1"));
        assert_eq!(from_int, v("19"));
        assert_eq!(
            serde_json::to_string(&from_text).expect("serialize"),
            "\"19.1\""
        );
    }

    #[test]
    fn display_round_trips_segments() {
        assert_eq!(v("1.0.0").to_string(), "1.0.0");
        assert_eq!(Version::zero().to_string(), "0");
    }

    #[test]
    fn default_engine_versions() {
        let versions = EngineVersions::default();
        assert_eq!(versions.essentials, v("19.1"));
        assert_eq!(versions.unstamped_essentials, v("18.1"));
        assert_eq!(versions.unstamped_game, v("0.0.0"));
    }
}
