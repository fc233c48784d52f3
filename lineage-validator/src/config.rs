//! Configuration types for lineage validation.
//!
//! Every struct deserializes from any subset of its fields; missing fields
//! take their own defaults independently of each other.

use serde::{Deserialize, Serialize};

use crate::issue::Severity;
use crate::tags::Vendor;

/// Which severities the facade surfaces. The underlying checks always run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Errors only.
    Relaxed,
    /// Errors and warnings.
    #[default]
    Normal,
    /// Everything, including informational findings.
    Strict,
}

impl Strictness {
    #[must_use]
    pub fn allows(self, severity: Severity) -> bool {
        match (self, severity) {
            (_, Severity::Error) | (Self::Strict, _) | (Self::Normal, Severity::Warning) => true,
            (Self::Relaxed, _) | (Self::Normal, Severity::Info) => false,
        }
    }

    /// Parse a strictness name, falling back to [`Strictness::Normal`] for
    /// anything unrecognized.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "relaxed" | "lenient" => Self::Relaxed,
            "normal" => Self::Normal,
            "strict" => Self::Strict,
            other => {
                tracing::warn!(strictness = other, "unknown strictness, using normal");
                Self::Normal
            }
        }
    }
}

pub const DEFAULT_MAX_LIFESPAN: i32 = 120;
pub const DEFAULT_MIN_PARENT_AGE: i32 = 12;
pub const DEFAULT_MAX_MOTHER_AGE: i32 = 55;
pub const DEFAULT_MAX_FATHER_AGE: i32 = 90;

/// Chronology thresholds, in whole years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct DateLogicConfig {
    pub max_lifespan: Option<i32>,
    pub min_parent_age: Option<i32>,
    pub max_mother_age: Option<i32>,
    pub max_father_age: Option<i32>,
}

impl DateLogicConfig {
    #[must_use]
    pub fn max_lifespan(&self) -> i32 {
        self.max_lifespan.unwrap_or(DEFAULT_MAX_LIFESPAN)
    }

    #[must_use]
    pub fn min_parent_age(&self) -> i32 {
        self.min_parent_age.unwrap_or(DEFAULT_MIN_PARENT_AGE)
    }

    #[must_use]
    pub fn max_mother_age(&self) -> i32 {
        self.max_mother_age.unwrap_or(DEFAULT_MAX_MOTHER_AGE)
    }

    #[must_use]
    pub fn max_father_age(&self) -> i32 {
        self.max_father_age.unwrap_or(DEFAULT_MAX_FATHER_AGE)
    }
}

/// Duplicate detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct DuplicateConfig {
    /// Minimum total confidence for a pair to be reported.
    pub min_confidence: f64,
    /// Minimum given-name similarity; pairs below it are rejected outright.
    pub min_name_similarity: f64,
    /// Birth years this far apart (or closer) still count as evidence.
    pub max_birth_year_difference: i32,
    /// Only compare individuals that both have a birth date.
    pub require_birth_date: bool,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            min_name_similarity: 0.7,
            max_birth_year_difference: 2,
            require_birth_date: false,
        }
    }
}

/// Vendor tag rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct TagConfig {
    /// Vendor registries to load. Earlier vendors win on conflicting names.
    pub vendors: Vec<Vendor>,
    /// Report unregistered underscore tags as warnings; `false` demotes
    /// them to info.
    pub warn_unknown_tags: bool,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            vendors: Vec::new(),
            warn_unknown_tags: true,
        }
    }
}

/// Top-level configuration for the [`crate::Validator`] facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct ValidatorConfig {
    pub strictness: Strictness,
    pub date_logic: DateLogicConfig,
    pub duplicates: DuplicateConfig,
    pub tags: TagConfig,
    /// Duplicate detection is quadratic per surname group; allow opting out.
    pub check_duplicates: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            date_logic: DateLogicConfig::default(),
            duplicates: DuplicateConfig::default(),
            tags: TagConfig::default(),
            check_duplicates: true,
        }
    }
}
