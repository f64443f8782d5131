//! Import normalizer for messy version labels
//!
//! This module provides best-effort cleanup for version strings scraped
//! from legacy import sources: free text typed by humans over years, like
//! "SPT 3.11", "1.5.0 (SPT 3.11)", "Beta 1.9" or "13.9.1.27928". Unlike
//! the strict parser, normalization is total: any input produces a usable
//! version value, and discarded noise is preserved as build metadata so
//! unrelated releases do not collide after cleanup.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::config::ImportConfig;
use crate::version::parser::VersionParser;
use crate::version::value::VersionValue;

lazy_static! {
    /// First run of dot-separated integers in the input
    static ref NUMERIC_CORE: Regex = Regex::new(r"\d+(?:\.\d+)*").unwrap();

    /// Leading "SPT" source tag ahead of the numeric version
    static ref SPT_PREFIX: Regex = Regex::new(r"(?i)^\s*spt\s+").unwrap();

    /// Trailing all-digit build-id parenthetical, e.g. "(123456)"
    static ref TRAILING_BUILD_ID: Regex = Regex::new(r"\s*\(\d+\)\s*$").unwrap();
}

/// Normalizer for version labels from bulk import sources
///
/// Both entry points are total functions: import pipelines must not halt
/// on a single bad record, so unrecognizable input still yields a
/// best-effort value anchored at `0.0.0`.
///
/// # Examples
///
/// ```
/// use forge_core::version::ImportNormalizer;
///
/// let normalizer = ImportNormalizer::new();
///
/// assert_eq!(normalizer.clean_mod_import("Beta 1.9").canonical(), "1.9.0+beta");
/// assert_eq!(normalizer.clean_spt_import("SPT 3.11").canonical(), "3.11.0");
/// ```
pub struct ImportNormalizer {
    extra_prefixes: Vec<Regex>,
}

impl Default for ImportNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportNormalizer {
    /// Create a new ImportNormalizer with the built-in noise rules
    pub fn new() -> Self {
        Self {
            extra_prefixes: Vec::new(),
        }
    }

    /// Build a normalizer from the import section of the configuration
    pub fn from_config(config: &ImportConfig) -> Self {
        match &config.noise_prefixes {
            Some(prefixes) => Self::new().with_noise_prefixes(prefixes),
            None => Self::new(),
        }
    }

    /// Add source-specific noise prefixes stripped ahead of SPT imports
    ///
    /// # Arguments
    ///
    /// * `prefixes` - Literal prefix tokens (e.g., "AKI"), matched
    ///   case-insensitively with a trailing space
    pub fn with_noise_prefixes(mut self, prefixes: &[String]) -> Self {
        self.extra_prefixes = prefixes
            .iter()
            .filter_map(|prefix| {
                let pattern = format!(r"(?i)^\s*{}\s+", regex::escape(prefix));
                Regex::new(&pattern).ok()
            })
            .collect();
        self
    }

    /// Normalize a mod version label from the import source
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::version::ImportNormalizer;
    ///
    /// let normalizer = ImportNormalizer::new();
    ///
    /// assert_eq!(normalizer.clean_mod_import("1.2").canonical(), "1.2.0");
    /// assert_eq!(
    ///     normalizer.clean_mod_import("1.5.0 (SPT 3.11)").canonical(),
    ///     "1.5.0+spt-311"
    /// );
    /// assert_eq!(
    ///     normalizer.clean_mod_import("13.9.1.27928").canonical(),
    ///     "13.9.1+27928"
    /// );
    /// ```
    pub fn clean_mod_import(&self, raw: &str) -> VersionValue {
        self.normalize(raw)
    }

    /// Normalize an SPT version label from the import source
    ///
    /// Strips the leading "SPT" tag and a trailing all-digit build-id
    /// parenthetical before the shared cleanup pass. The build-id is
    /// discarded outright, not preserved as metadata.
    pub fn clean_spt_import(&self, raw: &str) -> VersionValue {
        let mut stripped = SPT_PREFIX.replace(raw, "").into_owned();
        for prefix in &self.extra_prefixes {
            stripped = prefix.replace(&stripped, "").into_owned();
        }
        let stripped = TRAILING_BUILD_ID.replace(&stripped, "").into_owned();
        self.normalize(&stripped)
    }

    /// Shared cleanup pass
    ///
    /// Extracts the first run of dot-separated integers as the numeric
    /// core, pads missing groups with zeros, folds a 4th and later numeric
    /// group into build metadata, and slugifies whatever text remains into
    /// a build metadata token.
    fn normalize(&self, raw: &str) -> VersionValue {
        let trimmed = raw.trim();

        let (major, minor, patch, mut metadata_parts) = match NUMERIC_CORE.find(trimmed) {
            Some(core) => {
                let groups: Vec<&str> = core.as_str().split('.').collect();
                let major = Self::integer_group(groups.first());
                let minor = Self::integer_group(groups.get(1));
                let patch = Self::integer_group(groups.get(2));

                // Groups past the triple are build identifiers, not
                // version components
                let extras: Vec<String> = groups[groups.len().min(3)..]
                    .iter()
                    .map(|group| Self::normalize_extra_group(group))
                    .collect();

                let noise = format!(
                    "{} {}",
                    &trimmed[..core.start()],
                    &trimmed[core.end()..]
                );
                let mut parts = extras;
                let slug = Self::slugify(&noise);
                if !slug.is_empty() {
                    parts.push(slug);
                }
                (major, minor, patch, parts)
            }
            None => {
                tracing::debug!(raw, "no version token recognized in import label");
                let slug = Self::slugify(trimmed);
                let parts = if slug.is_empty() { Vec::new() } else { vec![slug] };
                (0, 0, 0, parts)
            }
        };

        metadata_parts.retain(|part| !part.is_empty());
        let labels = if metadata_parts.is_empty() {
            String::new()
        } else {
            format!("+{}", metadata_parts.join("-"))
        };

        let canonical = format!("{}.{}.{}{}", major, minor, patch, labels);
        VersionParser::new()
            .parse(&canonical)
            .expect("normalized import label must satisfy the strict grammar")
    }

    /// Read one numeric group as base-10, defaulting to 0
    fn integer_group(group: Option<&&str>) -> u64 {
        group.and_then(|g| g.parse::<u64>().ok()).unwrap_or(0)
    }

    /// Integer-normalize an extra numeric group, keeping the raw digits
    /// when it does not fit u64
    fn normalize_extra_group(group: &str) -> String {
        group
            .parse::<u64>()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| group.to_string())
    }

    /// Slugify leftover noise into a single build metadata token
    ///
    /// Dots are deleted (so "3.11" becomes "311"), everything is
    /// lowercased, runs of other non-alphanumerics collapse to single
    /// hyphens, and leading/trailing hyphens are trimmed.
    fn slugify(text: &str) -> String {
        let without_dots = text.replace('.', "");
        let mut slug = String::with_capacity(without_dots.len());
        let mut pending_hyphen = false;

        for c in without_dots.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_import_bare_major() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(normalizer.clean_mod_import("1").canonical(), "1.0.0");
    }

    #[test]
    fn test_mod_import_major_minor() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(normalizer.clean_mod_import("1.2").canonical(), "1.2.0");
    }

    #[test]
    fn test_mod_import_parenthetical_preserved_as_metadata() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(
            normalizer.clean_mod_import("1.5.0 (SPT 3.11)").canonical(),
            "1.5.0+spt-311"
        );
    }

    #[test]
    fn test_mod_import_leading_zeros() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(normalizer.clean_mod_import("1.123.01").canonical(), "1.123.1");
    }

    #[test]
    fn test_mod_import_fourth_group_folds_into_metadata() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(
            normalizer.clean_mod_import("13.9.1.27928").canonical(),
            "13.9.1+27928"
        );
    }

    #[test]
    fn test_mod_import_decorated_suffix() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(
            normalizer.clean_mod_import("4.0.0(for r7 & r7.1)").canonical(),
            "4.0.0+for-r7-r71"
        );
    }

    #[test]
    fn test_mod_import_word_prefix() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(normalizer.clean_mod_import("Beta 1.9").canonical(), "1.9.0+beta");
    }

    #[test]
    fn test_mod_import_word_suffix() {
        let normalizer = ImportNormalizer::new();

        assert_eq!(normalizer.clean_mod_import("1.9 AKI8").canonical(), "1.9.0+aki8");
        assert_eq!(normalizer.clean_mod_import("2.0 Simple").canonical(), "2.0.0+simple");
    }

    #[test]
    fn test_spt_import_prefix_stripped() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(normalizer.clean_spt_import("SPT 1.2.3").canonical(), "1.2.3");
    }

    #[test]
    fn test_spt_import_build_id_discarded() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(
            normalizer.clean_spt_import("SPT 1.2.3 (123456)").canonical(),
            "1.2.3"
        );
    }

    #[test]
    fn test_spt_import_short_version_padded() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(normalizer.clean_spt_import("SPT 3.11").canonical(), "3.11.0");
    }

    #[test]
    fn test_spt_import_prefix_case_insensitive() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(normalizer.clean_spt_import("spt 3.11").canonical(), "3.11.0");
    }

    #[test]
    fn test_spt_import_extra_noise_prefixes() {
        let normalizer =
            ImportNormalizer::new().with_noise_prefixes(&["AKI".to_string()]);
        assert_eq!(normalizer.clean_spt_import("AKI 2.3.1").canonical(), "2.3.1");
    }

    #[test]
    fn test_from_config_wires_noise_prefixes() {
        let config = ImportConfig {
            noise_prefixes: Some(vec!["AKI".to_string()]),
            fallback_constraint: None,
        };

        let normalizer = ImportNormalizer::from_config(&config);
        assert_eq!(normalizer.clean_spt_import("AKI 2.3.1").canonical(), "2.3.1");
    }

    #[test]
    fn test_unrecognizable_input_falls_back_to_zero() {
        let normalizer = ImportNormalizer::new();

        assert_eq!(
            normalizer.clean_mod_import("Outdated").canonical(),
            "0.0.0+outdated"
        );
        assert_eq!(normalizer.clean_mod_import("").canonical(), "0.0.0");
        assert_eq!(normalizer.clean_mod_import("---").canonical(), "0.0.0");
    }

    #[test]
    fn test_more_than_four_groups() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(
            normalizer.clean_mod_import("1.2.3.4.5").canonical(),
            "1.2.3+4-5"
        );
    }

    #[test]
    fn test_fourth_group_combines_with_noise_slug() {
        let normalizer = ImportNormalizer::new();
        assert_eq!(
            normalizer.clean_mod_import("13.9.1.27928 Beta").canonical(),
            "13.9.1+27928-beta"
        );
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let normalizer = ImportNormalizer::new();
        let inputs = [
            "1.5.0 (SPT 3.11)",
            "Beta 1.9",
            "13.9.1.27928",
            "4.0.0(for r7 & r7.1)",
            "garbage",
        ];

        for input in inputs {
            let first = normalizer.clean_mod_import(input);
            let second = normalizer.clean_mod_import(input);
            assert_eq!(first, second, "non-deterministic for {}", input);
        }
    }

    #[test]
    fn test_output_always_reparses_under_strict_grammar() {
        let normalizer = ImportNormalizer::new();
        let parser = VersionParser::new();
        let inputs = [
            "SPT 3.11",
            "1.5.0 (SPT 3.11)",
            "Beta 1.9",
            "13.9.1.27928",
            "4.0.0(for r7 & r7.1)",
            "v2 ~ the best version ~",
            "日本語 1.0",
            "",
        ];

        for input in inputs {
            let value = normalizer.clean_mod_import(input);
            let reparsed = parser.parse(&value.canonical()).unwrap();
            assert_eq!(reparsed, value, "round trip failed for {:?}", input);
        }
    }

    #[test]
    fn test_slugify_rules() {
        assert_eq!(ImportNormalizer::slugify("SPT 3.11"), "spt-311");
        assert_eq!(ImportNormalizer::slugify("(for r7 & r7.1)"), "for-r7-r71");
        assert_eq!(ImportNormalizer::slugify("Beta"), "beta");
        assert_eq!(ImportNormalizer::slugify("  __  "), "");
        assert_eq!(ImportNormalizer::slugify(""), "");
    }
}
