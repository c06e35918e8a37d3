//! Tenant document version utilities
//!
//! Versions are `major.minor` or `major.minor.patch`. The merge engine
//! never touches them; callers bump on save if they want to.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

/// A parsed document version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigVersion {
    pub major: u64,
    pub minor: u64,
    /// Absent for two-part versions like "1.3"
    pub patch: Option<u64>,
}

impl ConfigVersion {
    pub fn new(major: u64, minor: u64, patch: Option<u64>) -> Self {
        Self { major, minor, patch }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| EngineError::InvalidVersion(s.to_string()))?;

        let number = |i: usize| -> Result<Option<u64>, EngineError> {
            caps.get(i)
                .map(|m| m.as_str().parse::<u64>())
                .transpose()
                .map_err(|_| EngineError::InvalidVersion(s.to_string()))
        };

        Ok(Self {
            major: number(1)?.unwrap_or_default(),
            minor: number(2)?.unwrap_or_default(),
            patch: number(3)?,
        })
    }

    /// Whether a string has a valid version shape
    pub fn is_valid(s: &str) -> bool {
        VERSION_RE.is_match(s)
    }

    /// Next minor version, keeping the original shape
    pub fn bump_minor(&self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
            patch: self.patch.map(|_| 0),
        }
    }

    /// Next patch version; two-part versions gain a patch component
    pub fn bump_patch(&self) -> Self {
        Self {
            major: self.major,
            minor: self.minor,
            patch: Some(self.patch.map_or(1, |p| p + 1)),
        }
    }

    pub fn bump_major(&self) -> Self {
        Self {
            major: self.major + 1,
            minor: 0,
            patch: self.patch.map(|_| 0),
        }
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

impl FromStr for ConfigVersion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConfigVersion {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ConfigVersion> for String {
    fn from(v: ConfigVersion) -> Self {
        v.to_string()
    }
}

// "1.3" and "1.3.0" are the same release
impl PartialOrd for ConfigVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConfigVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch.unwrap_or(0))
            .cmp(&(other.major, other.minor, other.patch.unwrap_or(0)))
            .then_with(|| self.patch.is_some().cmp(&other.patch.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let v = ConfigVersion::parse("1.3").unwrap();
        assert_eq!(v, ConfigVersion::new(1, 3, None));
        assert_eq!(v.to_string(), "1.3");

        let v: ConfigVersion = "2.0.11".parse().unwrap();
        assert_eq!(v.patch, Some(11));
    }

    #[test]
    fn test_invalid_versions() {
        for bad in ["", "1", "v1.2", "1.2.3.4", "1.x", " 1.2"] {
            assert!(ConfigVersion::parse(bad).is_err(), "{bad} should not parse");
            assert!(!ConfigVersion::is_valid(bad));
        }
    }

    #[test]
    fn test_version_bumps() {
        let two = ConfigVersion::parse("1.3").unwrap();
        assert_eq!(two.bump_minor().to_string(), "1.4");
        assert_eq!(two.bump_patch().to_string(), "1.3.1");
        assert_eq!(two.bump_major().to_string(), "2.0");

        let three = ConfigVersion::parse("1.3.7").unwrap();
        assert_eq!(three.bump_minor().to_string(), "1.4.0");
        assert_eq!(three.bump_patch().to_string(), "1.3.8");
    }

    #[test]
    fn test_version_ordering() {
        let a = ConfigVersion::parse("1.3").unwrap();
        let b = ConfigVersion::parse("1.3.0").unwrap();
        let c = ConfigVersion::parse("1.10").unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(ConfigVersion::parse("2.0").unwrap() > c);
    }

    #[test]
    fn test_serde_as_string() {
        let v = ConfigVersion::parse("1.4.0").unwrap();
        assert_eq!(serde_json::to_value(v).unwrap(), serde_json::json!("1.4.0"));
        let back: ConfigVersion = serde_json::from_value(serde_json::json!("1.4.0")).unwrap();
        assert_eq!(back, v);
    }
}
