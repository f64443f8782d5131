//! Strict semantic version parser
//!
//! This module provides the strict grammar parse for administrator-entered
//! version strings. Input that does not match the grammar is rejected with
//! a field-level validation error; best-effort cleanup of messy import data
//! lives in the import normalizer instead.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::ForgeError;
use crate::version::value::VersionValue;

lazy_static! {
    /// The accepted grammar, as one pattern: optional leading `v`/`V`, one
    /// to three dot-separated integer groups, optional labels suffix
    /// starting with `-` or `+`.
    static ref VERSION_PATTERN: Regex =
        Regex::new(r"^[vV]?(\d+)(?:\.(\d+))?(?:\.(\d+))?([-+][0-9A-Za-z.+-]+)?$").unwrap();
}

/// Parser for strict semantic version strings
///
/// # Examples
///
/// ```
/// use forge_core::version::VersionParser;
///
/// let parser = VersionParser::new();
/// let version = parser.parse("v1.2").unwrap();
///
/// assert_eq!(version.canonical(), "1.2.0");
/// assert!(parser.parse("SPT 1.2").is_err());
/// ```
pub struct VersionParser;

impl Default for VersionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionParser {
    /// Create a new VersionParser
    pub fn new() -> Self {
        Self
    }

    /// Parse a version string against the strict grammar
    ///
    /// Missing minor/patch groups default to 0. Leading zeros carry no
    /// meaning; groups are read as base-10 integers (`01` parses as `1`).
    /// A labels suffix combining pre-release and build metadata is kept
    /// intact as a single string.
    ///
    /// # Arguments
    ///
    /// * `raw` - Version string to parse (e.g., "1.2.3", "v1.2", "1.0.0-rc.1")
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::version::VersionParser;
    ///
    /// let parser = VersionParser::new();
    ///
    /// assert_eq!(parser.parse("1").unwrap().canonical(), "1.0.0");
    /// assert_eq!(
    ///     parser.parse("1.0.0-rc.1+build.1").unwrap().labels(),
    ///     "-rc.1+build.1"
    /// );
    /// ```
    pub fn parse(&self, raw: &str) -> Result<VersionValue, ForgeError> {
        let captures = VERSION_PATTERN.captures(raw.trim()).ok_or_else(|| {
            ForgeError::InvalidVersionFormat {
                raw: raw.to_string(),
            }
        })?;

        let major = Self::integer_group(&captures, 1, raw)?;
        let minor = Self::integer_group(&captures, 2, raw)?;
        let patch = Self::integer_group(&captures, 3, raw)?;
        let labels = captures
            .get(4)
            .map(|group| group.as_str().to_string())
            .unwrap_or_default();

        Ok(VersionValue::new(major, minor, patch, labels))
    }

    /// Parse one integer group, defaulting to 0 when absent
    ///
    /// A group too large for u64 is rejected as a format error rather than
    /// silently truncated.
    fn integer_group(
        captures: &regex::Captures<'_>,
        index: usize,
        raw: &str,
    ) -> Result<u64, ForgeError> {
        match captures.get(index) {
            Some(group) => {
                group
                    .as_str()
                    .parse::<u64>()
                    .map_err(|_| ForgeError::InvalidVersionFormat {
                        raw: raw.to_string(),
                    })
            }
            None => Ok(0),
        }
    }
}
