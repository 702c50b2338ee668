#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report submission payload and result types.
//!
//! [`ReportSubmission`] is the raw form payload as posted by the report
//! form. [`Submission`] is the consistent `(Place, Report)` pair the
//! coordinator hands to the persistence layer.

use accessmap_place_models::{FeatureSet, Place, PlaceRecord, Report};
use serde::{Deserialize, Serialize};

/// A raw report form payload.
///
/// Everything except `place_name` is optional. Features left out of the
/// payload are `unknown` and do not override what is already known about
/// the place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
    /// ID of the place being reported on. Only used when no existing place
    /// is supplied; a new ID is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Place name. Must not be empty.
    #[serde(default)]
    pub place_name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Latitude. Defaults to `0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude. Defaults to `0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Observed feature values.
    #[serde(flatten)]
    pub features: FeatureSet,
    /// Free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Submitter identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl ReportSubmission {
    /// Creates a payload for `place_name` with every feature `unknown`.
    #[must_use]
    pub fn new(place_name: impl Into<String>) -> Self {
        Self {
            place_name: place_name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the given feature values.
    #[must_use]
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    /// `(latitude, longitude)`, with absent values as `0`.
    #[must_use]
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude.unwrap_or(0.0), self.longitude.unwrap_or(0.0))
    }

    /// The comment, treating an empty string as no comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

/// The updated place and the new report produced by one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The place with the report applied.
    pub place: Place,
    /// The report that was applied.
    pub report: Report,
}

/// Serialized form of a [`Submission`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// The updated place.
    pub place: PlaceRecord,
    /// The new report.
    pub report: Report,
}

impl From<&Submission> for SubmissionRecord {
    fn from(submission: &Submission) -> Self {
        Self {
            place: PlaceRecord::from(&submission.place),
            report: submission.report.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use accessmap_place_models::FeatureValue;

    use super::*;

    #[test]
    fn deserializes_form_payload_with_defaults() {
        let payload: ReportSubmission = serde_json::from_str(
            r#"{"place_name": "City Library", "has_ramp": "no", "comment": ""}"#,
        )
        .unwrap();

        assert_eq!(payload.place_name, "City Library");
        assert_eq!(payload.features.ramp, FeatureValue::No);
        assert_eq!(payload.features.lift, FeatureValue::Unknown);
        assert_eq!(payload.coordinates(), (0.0, 0.0));
        assert_eq!(payload.comment(), None);
        assert_eq!(payload.place_id, None);
    }

    #[test]
    fn missing_place_name_deserializes_as_empty() {
        let payload: ReportSubmission = serde_json::from_str("{}").unwrap();
        assert!(payload.place_name.is_empty());
    }

    #[test]
    fn coordinates_keep_provided_values() {
        let payload = ReportSubmission {
            latitude: Some(40.5),
            ..ReportSubmission::new("Pier")
        };
        assert_eq!(payload.coordinates(), (40.5, 0.0));
    }
}
