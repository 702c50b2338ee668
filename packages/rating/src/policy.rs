//! Rating thresholds and the per-report confidence baseline.
//!
//! The default policy is embedded from `policy.toml` at compile time.
//! Deployments can load an override from a TOML file with the same keys.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Number of tracked features; every threshold must fall in `1..=5`.
const FEATURE_COUNT: u8 = 5;

/// Upper bound of a confidence score.
const MAX_CONFIDENCE: u8 = 100;

/// Embedded default policy.
const DEFAULT_POLICY_TOML: &str = include_str!("../policy.toml");

/// Errors that can occur while loading a [`RatingPolicy`].
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The policy file could not be read.
    #[error("Failed to read rating policy {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The policy is not valid TOML or has unexpected keys.
    #[error("Failed to parse rating policy: {0}")]
    Parse(#[from] toml::de::Error),

    /// A threshold is outside `1..=5`.
    #[error("Invalid rating threshold {name} = {value}: expected 1-5")]
    InvalidThreshold {
        /// Policy key.
        name: &'static str,
        /// Rejected value.
        value: u8,
    },

    /// The report confidence is above 100.
    #[error("Invalid report confidence {value}: expected 0-100")]
    InvalidConfidence {
        /// Rejected value.
        value: u8,
    },
}

/// Thresholds used by [`crate::RatingEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatingPolicy {
    /// Minimum `yes` count for `accessible`.
    pub accessible_min_yes: u8,
    /// Minimum `no` count for `not_accessible`.
    pub not_accessible_min_no: u8,
    /// Minimum `unknown` count for `unknown`.
    pub unknown_min_unknown: u8,
    /// Confidence assigned by a single report.
    pub report_confidence: u8,
}

impl RatingPolicy {
    /// Parses and validates a policy from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Parse`] for malformed TOML and
    /// [`PolicyError::InvalidThreshold`] / [`PolicyError::InvalidConfidence`]
    /// for out-of-range values.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, PolicyError> {
        let policy: Self = toml::from_str(toml_str)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reads, parses, and validates a policy file.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`RatingPolicy::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let policy = Self::from_toml_str(&contents)?;
        log::info!("Loaded rating policy from {}", path.display());
        Ok(policy)
    }

    /// Checks every threshold and the confidence baseline.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let thresholds = [
            ("accessible_min_yes", self.accessible_min_yes),
            ("not_accessible_min_no", self.not_accessible_min_no),
            ("unknown_min_unknown", self.unknown_min_unknown),
        ];

        if let Some(&(name, value)) = thresholds
            .iter()
            .find(|(_, value)| !(1..=FEATURE_COUNT).contains(value))
        {
            return Err(PolicyError::InvalidThreshold { name, value });
        }

        if self.report_confidence > MAX_CONFIDENCE {
            return Err(PolicyError::InvalidConfidence {
                value: self.report_confidence,
            });
        }

        Ok(())
    }
}

impl Default for RatingPolicy {
    /// Returns the embedded `policy.toml`.
    ///
    /// # Panics
    ///
    /// Panics if the embedded policy fails to parse or validate. It is a
    /// compile-time constant, so a failure is a development error caught by
    /// the tests below.
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_POLICY_TOML)
            .unwrap_or_else(|e| panic!("Embedded rating policy is invalid: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_policy_matches_documented_defaults() {
        assert_eq!(
            RatingPolicy::default(),
            RatingPolicy {
                accessible_min_yes: 4,
                not_accessible_min_no: 3,
                unknown_min_unknown: 4,
                report_confidence: 50,
            }
        );
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let err = RatingPolicy::from_toml_str(
            "accessible_min_yes = 6\nnot_accessible_min_no = 3\n\
             unknown_min_unknown = 4\nreport_confidence = 50\n",
        )
        .unwrap_err();

        assert!(
            matches!(
                err,
                PolicyError::InvalidThreshold {
                    name: "accessible_min_yes",
                    value: 6
                }
            ),
            "{err}"
        );

        let err = RatingPolicy::from_toml_str(
            "accessible_min_yes = 4\nnot_accessible_min_no = 0\n\
             unknown_min_unknown = 4\nreport_confidence = 50\n",
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidThreshold { value: 0, .. }));
    }

    #[test]
    fn rejects_confidence_above_one_hundred() {
        let err = RatingPolicy::from_toml_str(
            "accessible_min_yes = 4\nnot_accessible_min_no = 3\n\
             unknown_min_unknown = 4\nreport_confidence = 101\n",
        )
        .unwrap_err();

        assert!(matches!(err, PolicyError::InvalidConfidence { value: 101 }));
    }

    #[test]
    fn rejects_unknown_and_missing_keys() {
        assert!(matches!(
            RatingPolicy::from_toml_str(
                "accessible_min_yes = 4\nnot_accessible_min_no = 3\n\
                 unknown_min_unknown = 4\nreport_confidence = 50\nextra = 1\n",
            ),
            Err(PolicyError::Parse(_))
        ));
        assert!(matches!(
            RatingPolicy::from_toml_str("accessible_min_yes = 4\n"),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RatingPolicy::from_path("/nonexistent/accessmap/policy.toml").unwrap_err();
        assert!(matches!(err, PolicyError::Io { .. }), "{err}");
    }
}
