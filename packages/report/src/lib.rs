#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report submission coordinator.
//!
//! Turns a raw [`ReportSubmission`] into a [`Report`], merges it into the
//! existing place (or a new one), lets a [`Rater`] recompute the overall
//! rating, and hands the resulting `(Place, Report)` pair to a
//! [`PlaceStore`]. Making the rating, confidence, and report count update
//! atomically is the store's job; the coordinator only guarantees the pair
//! it hands over is consistent.

use accessmap_place_models::{Place, PlaceError, Rater, Report};
use accessmap_report_models::{ReportSubmission, Submission};
use chrono::{DateTime, Utc};

/// Errors that can occur while submitting a report.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The payload has an empty `place_name`.
    #[error("Place name is required")]
    MissingPlaceName,

    /// The report could not be applied to the place.
    #[error(transparent)]
    Place(#[from] PlaceError),

    /// The store rejected the updated place or report.
    #[error("Failed to persist report for place {place_id}: {source}")]
    Persistence {
        /// ID of the place being updated.
        place_id: String,
        /// Underlying store error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// External persistence collaborator for submitted reports.
pub trait PlaceStore {
    /// Store-specific failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stores the updated place together with its new report.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    fn persist(&mut self, place: &Place, report: &Report) -> Result<(), Self::Error>;
}

/// ID assigned to a place first created by a report.
#[must_use]
pub fn new_place_id(now: DateTime<Utc>) -> String {
    format!("custom_{}", now.timestamp_millis())
}

/// Builds the report and the updated place for one submission.
///
/// `existing` is the place being reported on, if it already exists; its
/// identity, name, address, and coordinates are kept as they are.
/// Otherwise a new place is created from the payload, with coordinates
/// defaulting to `(0, 0)` and an ID of `payload.place_id` or
/// [`new_place_id`].
///
/// # Errors
///
/// Returns [`SubmissionError::MissingPlaceName`] if `place_name` is empty.
/// The rater is not consulted in that case.
pub fn submit(
    payload: ReportSubmission,
    existing: Option<&Place>,
    rater: &(impl Rater + ?Sized),
    now: DateTime<Utc>,
) -> Result<Submission, SubmissionError> {
    if payload.place_name.is_empty() {
        log::warn!("Rejected report submission without a place name");
        return Err(SubmissionError::MissingPlaceName);
    }

    let mut place = match existing {
        Some(place) => {
            if let Some(id) = payload.place_id.as_deref().filter(|&id| id != place.id()) {
                log::debug!(
                    "Ignoring submitted place ID {id}, reporting on existing place {}",
                    place.id()
                );
            }
            place.clone()
        }
        None => {
            let (latitude, longitude) = payload.coordinates();
            let id = payload
                .place_id
                .clone()
                .unwrap_or_else(|| new_place_id(now));
            log::debug!("Creating place {id} ({}) from first report", payload.place_name);
            Place::new(
                id,
                payload.place_name.clone(),
                payload.address.clone(),
                latitude,
                longitude,
                rater,
            )
        }
    };

    let comment = payload.comment().map(str::to_string);
    let report = Report::new(
        place.id(),
        payload.features,
        comment,
        payload.created_by,
        now,
    );

    place.apply_report(report.clone(), rater)?;

    log::info!(
        "Report applied to {} ({}): rating={} confidence={} reports={}",
        place.name(),
        place.id(),
        place.overall_rating(),
        place.confidence_score(),
        place.report_count(),
    );

    Ok(Submission { place, report })
}

/// Submits reports with a fixed rater and persists each result.
pub struct ReportCoordinator<R, S> {
    rater: R,
    store: S,
}

impl<R: Rater, S: PlaceStore> ReportCoordinator<R, S> {
    /// Creates a coordinator.
    #[must_use]
    pub const fn new(rater: R, store: S) -> Self {
        Self { rater, store }
    }

    /// Submits a report timestamped now and persists the result.
    ///
    /// # Errors
    ///
    /// See [`ReportCoordinator::submit_at`].
    pub fn submit(
        &mut self,
        payload: ReportSubmission,
        existing: Option<&Place>,
    ) -> Result<Submission, SubmissionError> {
        self.submit_at(payload, existing, Utc::now())
    }

    /// Submits a report with an explicit timestamp and persists the result
    /// with exactly one store write.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingPlaceName`] for an empty place name
    /// (nothing is written), or [`SubmissionError::Persistence`] if the store
    /// fails.
    pub fn submit_at(
        &mut self,
        payload: ReportSubmission,
        existing: Option<&Place>,
        now: DateTime<Utc>,
    ) -> Result<Submission, SubmissionError> {
        let submission = submit(payload, existing, &self.rater, now)?;

        self.store
            .persist(&submission.place, &submission.report)
            .map_err(|e| SubmissionError::Persistence {
                place_id: submission.place.id().to_string(),
                source: Box::new(e),
            })?;

        Ok(submission)
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the coordinator, returning the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}
