//! Constraint guessing and resolution
//!
//! This module maps legacy compatibility labels ("SPT 3.11", "SPT 3.4-3.6")
//! to normalized semver range constraints, and filters candidate version
//! sets against such constraints. Range parsing and matching delegate to
//! the semver crate; only the legacy-label heuristics live here.

use lazy_static::lazy_static;
use regex::Regex;
use semver::VersionReq;

use crate::core::config::ImportConfig;
use crate::core::error::ForgeError;
use crate::version::parser::VersionParser;
use crate::version::value::VersionValue;

/// Constraint emitted when no version token is recognized
///
/// Semantically "unknown baseline": it is satisfied by nothing the catalog
/// actually ships.
pub const FALLBACK_CONSTRAINT: &str = "0.0.0";

/// Known textual aliases mapped straight to a constraint, checked first.
/// Matched case-insensitively against the whole trimmed label.
const ALIAS_RULES: &[(&str, &str)] = &[("outdated", FALLBACK_CONSTRAINT)];

lazy_static! {
    /// Range label, e.g. "3.4-3.6" inside "SPT 3.4-3.6"
    static ref RANGE_PATTERN: Regex =
        Regex::new(r"(\d+)\.(\d+)\s*-\s*(\d+)\.(\d+)").unwrap();

    /// Single major.minor token, e.g. "3.11" inside "SPT 3.11"
    static ref MAJOR_MINOR_PATTERN: Regex = Regex::new(r"(\d+)\.(\d+)").unwrap();

    /// Hyphen range constraint, e.g. "1.2.3 - 2.3.4" (spaces required,
    /// so pre-release hyphens never match)
    static ref HYPHEN_RANGE: Regex =
        Regex::new(r"^\s*(\d[0-9A-Za-z.+-]*)\s+-\s+(\d[0-9A-Za-z.+-]*)\s*$").unwrap();
}

/// Guesser for semver constraints from legacy compatibility labels
///
/// An ordered set of pattern rules evaluated top to bottom, first match
/// wins: alias table, range label, single major.minor, fallback.
///
/// # Examples
///
/// ```
/// use forge_core::version::ConstraintGuesser;
///
/// let guesser = ConstraintGuesser::new();
///
/// assert_eq!(guesser.guess_semantic_constraint("SPT 3.11"), "~3.11.0");
/// assert_eq!(guesser.guess_semantic_constraint("SPT 3.4-3.6"), "~3.6.0");
/// assert_eq!(guesser.guess_semantic_constraint("Outdated"), "0.0.0");
/// ```
pub struct ConstraintGuesser {
    fallback: String,
}

impl Default for ConstraintGuesser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintGuesser {
    /// Create a new ConstraintGuesser with the default fallback constraint
    pub fn new() -> Self {
        Self {
            fallback: FALLBACK_CONSTRAINT.to_string(),
        }
    }

    /// Override the fallback constraint for unrecognized labels
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Build a guesser from the import section of the configuration
    pub fn from_config(config: &ImportConfig) -> Self {
        match &config.fallback_constraint {
            Some(fallback) => Self::new().with_fallback(fallback.clone()),
            None => Self::new(),
        }
    }

    /// Guess a normalized semver constraint from a free-text label
    ///
    /// Total function: always returns a constraint string, never a parsed
    /// version. Range labels collapse to the highest version mentioned,
    /// since historical range labels meant "works with everything up to
    /// and including this version".
    pub fn guess_semantic_constraint(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let lowered = trimmed.to_lowercase();

        for (alias, constraint) in ALIAS_RULES {
            if lowered == *alias {
                if *constraint == FALLBACK_CONSTRAINT {
                    return self.fallback.clone();
                }
                return (*constraint).to_string();
            }
        }

        if let Some(captures) = RANGE_PATTERN.captures(trimmed) {
            let low = (Self::capture_int(&captures, 1), Self::capture_int(&captures, 2));
            let high = (Self::capture_int(&captures, 3), Self::capture_int(&captures, 4));
            let (major, minor) = low.max(high);
            return format!("~{}.{}.0", major, minor);
        }

        if let Some(captures) = MAJOR_MINOR_PATTERN.captures(trimmed) {
            return format!(
                "~{}.{}.0",
                Self::capture_int(&captures, 1),
                Self::capture_int(&captures, 2)
            );
        }

        self.fallback.clone()
    }

    fn capture_int(captures: &regex::Captures<'_>, index: usize) -> u64 {
        captures
            .get(index)
            .and_then(|group| group.as_str().parse().ok())
            .unwrap_or(0)
    }
}

/// Resolver for matching candidate versions against a range constraint
///
/// A thin adapter around `semver::VersionReq`: caret/tilde, comparison
/// operators and compound ranges all follow conventional semver
/// precedence, with build metadata ignored for matching.
///
/// # Examples
///
/// ```
/// use forge_core::version::ConstraintResolver;
///
/// let resolver = ConstraintResolver::new();
/// let matched = resolver
///     .satisfied_by(&["1.2.0", "1.3.0", "2.0.0"], "~1.2.0")
///     .unwrap();
///
/// assert_eq!(matched, vec!["1.2.0"]);
/// ```
pub struct ConstraintResolver;

impl Default for ConstraintResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintResolver {
    /// Create a new ConstraintResolver
    pub fn new() -> Self {
        Self
    }

    /// Validate a constraint expression against semver range syntax
    ///
    /// Administrator-entered constraints must be rejected with a
    /// field-level validation error, never silently corrected.
    pub fn validate(&self, constraint: &str) -> Result<(), ForgeError> {
        Self::to_version_req(constraint).map(|_| ())
    }

    /// Check if a single version satisfies a constraint
    ///
    /// Returns false for versions or constraints that do not parse.
    pub fn matches(&self, version: &str, constraint: &str) -> bool {
        let Ok(req) = Self::to_version_req(constraint) else {
            return false;
        };
        Self::candidate_version(version)
            .map(|candidate| req.matches(&candidate))
            .unwrap_or(false)
    }

    /// Filter the candidates that satisfy a constraint, preserving input
    /// order
    ///
    /// Candidates that fail strict parsing are skipped: they come from
    /// already-normalized storage, so an unparseable entry is stale data,
    /// not a caller error.
    pub fn satisfied_by<S: AsRef<str>>(
        &self,
        candidates: &[S],
        constraint: &str,
    ) -> Result<Vec<String>, ForgeError> {
        let req = Self::to_version_req(constraint)?;

        Ok(candidates
            .iter()
            .map(|candidate| candidate.as_ref())
            .filter(|candidate| {
                Self::candidate_version(candidate)
                    .map(|version| req.matches(&version))
                    .unwrap_or(false)
            })
            .map(|candidate| candidate.to_string())
            .collect())
    }

    /// Sort versions into the deterministic display-listing order
    ///
    /// Descending by (major, minor, patch), release versions before
    /// labeled versions of the same triple, labels lexicographically
    /// ascending among ties.
    pub fn sort_for_display(&self, versions: &mut [VersionValue]) {
        versions.sort_by(|a, b| a.display_cmp(b));
    }

    fn candidate_version(candidate: &str) -> Option<semver::Version> {
        VersionParser::new()
            .parse(candidate)
            .ok()
            .and_then(|value| value.to_semver())
    }

    /// Parse a constraint, rewriting hyphen ranges into comparator pairs
    /// first since `VersionReq` has no native hyphen syntax
    fn to_version_req(constraint: &str) -> Result<VersionReq, ForgeError> {
        let normalized = Self::normalize_constraint(constraint);
        VersionReq::parse(&normalized).map_err(|_| ForgeError::InvalidConstraintFormat {
            raw: constraint.to_string(),
        })
    }

    /// Rewrite "A - B" into ">=A, <=B"
    ///
    /// A partial upper bound is exclusive of the next minor/major ("1.2 -
    /// 2.3" allows every 2.3.x patch), matching how hyphen ranges are
    /// conventionally read.
    fn normalize_constraint(constraint: &str) -> String {
        let Some(captures) = HYPHEN_RANGE.captures(constraint) else {
            return constraint.to_string();
        };

        let lower = Self::pad_version(&captures[1]);
        let upper_raw = &captures[2];
        let dots = upper_raw.chars().filter(|&c| c == '.').count();

        let upper_groups: Vec<u64> = upper_raw
            .split('.')
            .map(|group| group.parse().unwrap_or(0))
            .collect();

        match dots {
            0 => format!(">={}, <{}.0.0", lower, upper_groups[0] + 1),
            1 => format!(
                ">={}, <{}.{}.0",
                lower,
                upper_groups[0],
                upper_groups[1] + 1
            ),
            _ => format!(">={}, <={}", lower, upper_raw),
        }
    }

    /// Zero-pad a short version to the full triple
    fn pad_version(version: &str) -> String {
        let dots = version.chars().filter(|&c| c == '.').count();

        match dots {
            0 => format!("{}.0.0", version),
            1 => format!("{}.0", version),
            _ => version.to_string(),
        }
    }
}
