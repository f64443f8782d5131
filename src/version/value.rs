//! Parsed semantic version value
//!
//! This module provides the immutable value type produced by the strict
//! parser and the permissive import normalizer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::error::ForgeError;
use crate::version::parser::VersionParser;

/// An immutable parsed semantic version
///
/// Holds the numeric triple plus the raw labels suffix (pre-release and/or
/// build metadata, kept as one opaque string). Constructed by
/// [`VersionParser::parse`] and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use forge_core::version::VersionValue;
///
/// let version: VersionValue = "v1.2.3-rc.1+build.1".parse().unwrap();
///
/// assert_eq!(version.major(), 1);
/// assert_eq!(version.labels(), "-rc.1+build.1");
/// assert_eq!(version.canonical(), "1.2.3-rc.1+build.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionValue {
    major: u64,
    minor: u64,
    patch: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    labels: String,
}

impl VersionValue {
    pub(crate) fn new(major: u64, minor: u64, patch: u64, labels: String) -> Self {
        Self {
            major,
            minor,
            patch,
            labels,
        }
    }

    /// Major version number
    pub fn major(&self) -> u64 {
        self.major
    }

    /// Minor version number (0 when absent from input)
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// Patch version number (0 when absent from input)
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The raw labels suffix beginning with `-` or `+`, empty when absent
    ///
    /// A suffix combining pre-release and build metadata (`-rc.1+build.1`)
    /// is kept intact as a single string; downstream consumers treat it
    /// opaquely.
    pub fn labels(&self) -> &str {
        &self.labels
    }

    /// The normalized string form: `{major}.{minor}.{patch}{labels}`
    ///
    /// Re-parsing the canonical form yields a structurally equal value.
    pub fn canonical(&self) -> String {
        format!("{}.{}.{}{}", self.major, self.minor, self.patch, self.labels)
    }

    /// The pre-release segment of the labels suffix, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::version::VersionValue;
    ///
    /// let version: VersionValue = "1.0.0-rc.1+build.1".parse().unwrap();
    /// assert_eq!(version.pre_release(), Some("rc.1"));
    ///
    /// let version: VersionValue = "1.0.0+build.1".parse().unwrap();
    /// assert_eq!(version.pre_release(), None);
    /// ```
    pub fn pre_release(&self) -> Option<&str> {
        let rest = self.labels.strip_prefix('-')?;
        match rest.find('+') {
            Some(idx) => Some(&rest[..idx]),
            None => Some(rest),
        }
    }

    /// The build metadata segment of the labels suffix, if any
    pub fn build_metadata(&self) -> Option<&str> {
        self.labels.find('+').map(|idx| &self.labels[idx + 1..])
    }

    /// Check if this version carries a pre-release segment
    pub fn is_pre_release(&self) -> bool {
        self.pre_release().is_some()
    }

    /// Check if this version carries any labels suffix at all
    pub fn is_labeled(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Convert to a `semver::Version` for range matching
    ///
    /// Returns `None` when the labels suffix does not satisfy the stricter
    /// SemVer 2.0.0 identifier rules (possible for normalized import data).
    pub fn to_semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.canonical()).ok()
    }

    /// Compare by SemVer precedence
    ///
    /// Numeric comparison of major, then minor, then patch; a pre-release
    /// sorts below the release it qualifies; build metadata is ignored.
    pub fn precedence_cmp(&self, other: &Self) -> Ordering {
        let triple = (self.major, self.minor, self.patch);
        let other_triple = (other.major, other.minor, other.patch);

        match triple.cmp(&other_triple) {
            Ordering::Equal => match (self.pre_release(), other.pre_release()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => cmp_pre_release(a, b),
            },
            ord => ord,
        }
    }

    /// Compare in display-listing order
    ///
    /// Descending by (major, minor, patch), non-labeled versions before
    /// labeled versions of the same triple, labels lexicographically
    /// ascending among ties. Produces deterministic, stable listings.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        let triple = (self.major, self.minor, self.patch);
        let other_triple = (other.major, other.minor, other.patch);

        other_triple
            .cmp(&triple)
            .then_with(|| self.is_labeled().cmp(&other.is_labeled()))
            .then_with(|| self.labels.cmp(&other.labels))
    }
}

/// SemVer pre-release precedence via the semver crate's identifier rules,
/// falling back to a plain string comparison for non-conformant segments.
fn cmp_pre_release(a: &str, b: &str) -> Ordering {
    match (semver::Prerelease::new(a), semver::Prerelease::new(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

impl fmt::Display for VersionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl FromStr for VersionValue {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionParser::new().parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &str) -> VersionValue {
        s.parse().unwrap()
    }

    #[test]
    fn test_accessors() {
        let version = value("1.2.3-rc.1+build.1");

        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 3);
        assert_eq!(version.labels(), "-rc.1+build.1");
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(value("1.2.3").canonical(), "1.2.3");
        assert_eq!(value("1.2.3-beta").canonical(), "1.2.3-beta");
        assert_eq!(value("1.2.3+spt-311").canonical(), "1.2.3+spt-311");
    }

    #[test]
    fn test_pre_release_segment() {
        assert_eq!(value("1.0.0-rc.1+build.1").pre_release(), Some("rc.1"));
        assert_eq!(value("1.0.0-rc.1").pre_release(), Some("rc.1"));
        assert_eq!(value("1.0.0+build.1").pre_release(), None);
        assert_eq!(value("1.0.0").pre_release(), None);
    }

    #[test]
    fn test_build_metadata_segment() {
        assert_eq!(value("1.0.0-rc.1+build.1").build_metadata(), Some("build.1"));
        assert_eq!(value("1.0.0+27928").build_metadata(), Some("27928"));
        assert_eq!(value("1.0.0-rc.1").build_metadata(), None);
    }

    #[test]
    fn test_is_pre_release() {
        assert!(value("1.0.0-alpha.1").is_pre_release());
        assert!(!value("1.0.0").is_pre_release());
        assert!(!value("1.0.0+build.1").is_pre_release());
    }

    #[test]
    fn test_to_semver() {
        let version = value("1.2.3-rc.1+build.1").to_semver().unwrap();

        assert_eq!(version.major, 1);
        assert_eq!(version.pre.as_str(), "rc.1");
        assert_eq!(version.build.as_str(), "build.1");
    }

    #[test]
    fn test_precedence_triple() {
        assert_eq!(
            value("1.2.3").precedence_cmp(&value("1.2.4")),
            Ordering::Less
        );
        assert_eq!(
            value("2.0.0").precedence_cmp(&value("1.9.9")),
            Ordering::Greater
        );
        assert_eq!(
            value("1.2.3").precedence_cmp(&value("1.2.3")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_precedence_pre_release_below_release() {
        assert_eq!(
            value("1.0.0-rc.1").precedence_cmp(&value("1.0.0")),
            Ordering::Less
        );
        assert_eq!(
            value("1.0.0").precedence_cmp(&value("1.0.0-rc.1")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_precedence_between_pre_releases() {
        assert_eq!(
            value("1.0.0-alpha").precedence_cmp(&value("1.0.0-beta")),
            Ordering::Less
        );
        // Numeric identifiers compare numerically, not lexically
        assert_eq!(
            value("1.0.0-rc.2").precedence_cmp(&value("1.0.0-rc.10")),
            Ordering::Less
        );
    }

    #[test]
    fn test_precedence_ignores_build_metadata() {
        assert_eq!(
            value("1.0.0+aaa").precedence_cmp(&value("1.0.0+zzz")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_display_order_descending_triple() {
        let mut versions = vec![value("1.2.0"), value("2.0.0"), value("1.3.0")];
        versions.sort_by(|a, b| a.display_cmp(b));

        let listed: Vec<String> = versions.iter().map(|v| v.canonical()).collect();
        assert_eq!(listed, vec!["2.0.0", "1.3.0", "1.2.0"]);
    }

    #[test]
    fn test_display_order_release_before_labeled() {
        let mut versions = vec![
            value("1.0.0-beta"),
            value("1.0.0"),
            value("1.0.0-alpha"),
        ];
        versions.sort_by(|a, b| a.display_cmp(b));

        let listed: Vec<String> = versions.iter().map(|v| v.canonical()).collect();
        assert_eq!(listed, vec!["1.0.0", "1.0.0-alpha", "1.0.0-beta"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(value("1.2.3-beta").to_string(), "1.2.3-beta");
    }

    #[test]
    fn test_serialization_round_trip() {
        let version = value("1.2.3+spt-311");
        let json = serde_json::to_string(&version).unwrap();

        assert!(json.contains("\"major\":1"));
        assert!(json.contains("\"labels\":\"+spt-311\""));

        let deserialized: VersionValue = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, version);
    }

    #[test]
    fn test_serialization_omits_empty_labels() {
        let json = serde_json::to_string(&value("1.2.3")).unwrap();
        assert!(!json.contains("labels"));

        let deserialized: VersionValue = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, value("1.2.3"));
    }
}
