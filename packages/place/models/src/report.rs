//! User-submitted accessibility observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FeatureSet;

/// A single observation of a place's features at a point in time.
///
/// Reports are append-only: once created they are never modified, so all
/// fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    place_id: String,
    #[serde(flatten)]
    features: FeatureSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    #[serde(default)]
    verified: bool,
}

impl Report {
    /// Creates an unverified report.
    #[must_use]
    pub fn new(
        place_id: impl Into<String>,
        features: FeatureSet,
        comment: Option<String>,
        created_by: Option<String>,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            place_id: place_id.into(),
            features,
            comment,
            created_date,
            created_by,
            verified: false,
        }
    }

    /// ID of the place this report describes.
    #[must_use]
    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    /// Feature values as submitted, including any `unknown`s.
    #[must_use]
    pub const fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Free-text comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// When the report was submitted.
    #[must_use]
    pub const fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    /// Submitter identity (usually an email address), if known.
    #[must_use]
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Whether a moderator has verified this report.
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verified
    }

    /// Short display handle for the submitter: the local part of an email
    /// address, or the whole identity if it has no `@`.
    #[must_use]
    pub fn reporter_handle(&self) -> Option<&str> {
        self.created_by
            .as_deref()
            .and_then(|by| by.split('@').next())
            .filter(|handle| !handle.is_empty())
    }
}
