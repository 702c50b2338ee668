//! The place entity and its serialized record form.

use serde::{Deserialize, Serialize};

use crate::{FeatureSet, OverallRating, Rater, Report};

/// Upper bound of a confidence score.
const MAX_CONFIDENCE: u8 = 100;

/// Errors that can occur while updating a [`Place`].
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The report describes a different place.
    #[error("Report for place {report_place_id} cannot be applied to place {place_id}")]
    ForeignReport {
        /// ID of the place being updated.
        place_id: String,
        /// Place ID carried by the report.
        report_place_id: String,
    },
}

/// A place as exchanged with the external data source and store.
///
/// Field names follow the stored documents (`has_*` features, `reportCount`,
/// `userReports`). The `overall_rating` carried here is informational only:
/// [`Place::from_record`] recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Unique place ID.
    pub id: String,
    /// Place name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Latitude.
    #[serde(default)]
    pub latitude: f64,
    /// Longitude.
    #[serde(default)]
    pub longitude: f64,
    /// The five accessibility features.
    #[serde(flatten)]
    pub features: FeatureSet,
    /// Overall rating as last stored.
    #[serde(default)]
    pub overall_rating: OverallRating,
    /// Confidence score (0-100).
    #[serde(default)]
    pub confidence_score: u8,
    /// Whether the place data has been verified.
    #[serde(default)]
    pub verified: bool,
    /// Number of reports applied to this place.
    #[serde(default, rename = "reportCount")]
    pub report_count: u32,
    /// Reports, oldest first.
    #[serde(default, rename = "userReports")]
    pub reports: Vec<Report>,
}

impl From<&Place> for PlaceRecord {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id.clone(),
            name: place.name.clone(),
            address: place.address.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
            features: place.features,
            overall_rating: place.overall_rating,
            confidence_score: place.confidence_score,
            verified: place.verified,
            report_count: place.report_count,
            reports: place.reports.clone(),
        }
    }
}

/// A place annotated with accessibility features.
///
/// `overall_rating` is always the rating of the current feature set: every
/// constructor and every mutation takes the [`Rater`] that derives it.
/// Identity, name, address, and coordinates are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    id: String,
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
    features: FeatureSet,
    overall_rating: OverallRating,
    confidence_score: u8,
    verified: bool,
    report_count: u32,
    reports: Vec<Report>,
}

impl Place {
    /// Creates an unreported place with every feature `unknown` and a
    /// confidence of `0`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
        rater: &(impl Rater + ?Sized),
    ) -> Self {
        let features = FeatureSet::unknown();

        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
            features,
            overall_rating: rater.compute(&features).rating,
            confidence_score: 0,
            verified: false,
            report_count: 0,
            reports: Vec::new(),
        }
    }

    /// Builds a place from a stored record, recomputing its rating.
    ///
    /// Confidence scores above 100 are clamped.
    #[must_use]
    pub fn from_record(record: PlaceRecord, rater: &(impl Rater + ?Sized)) -> Self {
        let overall_rating = rater.compute(&record.features).rating;

        Self {
            id: record.id,
            name: record.name,
            address: record.address,
            latitude: record.latitude,
            longitude: record.longitude,
            features: record.features,
            overall_rating,
            confidence_score: record.confidence_score.min(MAX_CONFIDENCE),
            verified: record.verified,
            report_count: record.report_count,
            reports: record.reports,
        }
    }

    /// Replaces the seed features of a place, recomputing its rating.
    ///
    /// Intended for initial data sources. Reports go through
    /// [`Place::apply_report`] instead.
    #[must_use]
    pub fn with_features(mut self, features: FeatureSet, rater: &(impl Rater + ?Sized)) -> Self {
        self.features = features;
        self.overall_rating = rater.compute(&features).rating;
        self
    }

    /// Marks the place data as verified (or not).
    #[must_use]
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Applies a new report to this place.
    ///
    /// Known values in the report replace the place's values, `unknown`s
    /// leave them alone. The rating is recomputed, the confidence score is
    /// set to the report's confidence, the report count goes up by one, and
    /// the report is appended.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::ForeignReport`] if the report's `place_id` is
    /// not this place's ID. The place is left unchanged.
    pub fn apply_report(
        &mut self,
        report: Report,
        rater: &(impl Rater + ?Sized),
    ) -> Result<(), PlaceError> {
        if report.place_id() != self.id {
            return Err(PlaceError::ForeignReport {
                place_id: self.id.clone(),
                report_place_id: report.place_id().to_string(),
            });
        }

        let features = self.features.merge(report.features());
        let outcome = rater.compute(&features);

        self.features = features;
        self.overall_rating = outcome.rating;
        self.confidence_score = outcome.confidence_delta.min(MAX_CONFIDENCE);
        self.report_count = self.report_count.saturating_add(1);
        self.reports.push(report);
        Ok(())
    }

    /// Unique place ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Place name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Latitude.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Current feature values.
    #[must_use]
    pub const fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Overall rating derived from [`Place::features`].
    #[must_use]
    pub const fn overall_rating(&self) -> OverallRating {
        self.overall_rating
    }

    /// Confidence score (0-100).
    #[must_use]
    pub const fn confidence_score(&self) -> u8 {
        self.confidence_score
    }

    /// Whether the place data has been verified.
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verified
    }

    /// Number of reports applied to this place.
    #[must_use]
    pub const fn report_count(&self) -> u32 {
        self.report_count
    }

    /// All reports, oldest first.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Up to `limit` reports, newest first.
    ///
    /// This is the reverse of stored order; [`Place::reports`] lists the
    /// oldest first.
    pub fn recent_reports(&self, limit: usize) -> impl Iterator<Item = &Report> {
        self.reports.iter().rev().take(limit)
    }

    /// One-line description of the evidence behind the confidence score,
    /// e.g. "Based on 2 user reports".
    #[must_use]
    pub fn confidence_summary(&self) -> String {
        let plural = if self.report_count == 1 { "" } else { "s" };
        format!("Based on {} user report{plural}", self.report_count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;
    use crate::FeatureValue::{No, Unknown, Yes};
    use crate::RatingOutcome;

    /// Rates anything with a known lift as accessible.
    struct LiftRater;

    impl Rater for LiftRater {
        fn compute(&self, features: &FeatureSet) -> RatingOutcome {
            let rating = match features.lift {
                Yes => OverallRating::Accessible,
                No => OverallRating::NotAccessible,
                Unknown => OverallRating::Unknown,
            };
            RatingOutcome {
                rating,
                confidence_delta: 50,
            }
        }
    }

    fn report(features: FeatureSet, minute: u32) -> Report {
        Report::new(
            "lib",
            features,
            Some(format!("visit {minute}")),
            None,
            Utc.with_ymd_and_hms(2025, 11, 14, 12, minute, 0).unwrap(),
        )
    }

    fn library() -> Place {
        Place::new("lib", "City Library", "1 Main St", 51.5, -0.125, &LiftRater)
    }

    #[test]
    fn new_place_starts_unknown_with_zero_confidence() {
        let place = library();

        assert_eq!(place.features(), &FeatureSet::unknown());
        assert_eq!(place.overall_rating(), OverallRating::Unknown);
        assert_eq!(place.confidence_score(), 0);
        assert_eq!(place.report_count(), 0);
        assert!(place.reports().is_empty());
    }

    #[test]
    fn apply_report_merges_and_recomputes() {
        let mut place =
            library().with_features(FeatureSet::new(Unknown, Yes, No, Unknown, Unknown), &LiftRater);

        place.apply_report(
            report(FeatureSet::new(No, Unknown, Unknown, Unknown, Unknown), 0),
            &LiftRater,
        )
            .unwrap();

        assert_eq!(
            place.features(),
            &FeatureSet::new(No, Yes, No, Unknown, Unknown)
        );
        assert_eq!(place.overall_rating(), OverallRating::Accessible);
        assert_eq!(place.confidence_score(), 50);
        assert_eq!(place.report_count(), 1);
        assert_eq!(place.reports().len(), 1);
    }

    #[test]
    fn apply_report_keeps_identity_fixed() {
        let mut place = library();
        place.apply_report(
            report(FeatureSet::new(Yes, Yes, Yes, Yes, Yes), 0),
            &LiftRater,
        )
            .unwrap();

        assert_eq!(place.id(), "lib");
        assert_eq!(place.name(), "City Library");
        assert_eq!(place.address(), "1 Main St");
        assert!((place.latitude() - 51.5).abs() < f64::EPSILON);
        assert!((place.longitude() + 0.125).abs() < f64::EPSILON);
    }

    #[test]
    fn apply_report_rejects_reports_for_other_places() {
        let mut place = library();
        let foreign = Report::new(
            "harbour",
            FeatureSet::new(Yes, Yes, Yes, Yes, Yes),
            None,
            None,
            Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap(),
        );

        let err = place.apply_report(foreign, &LiftRater).unwrap_err();

        assert!(matches!(
            err,
            PlaceError::ForeignReport { ref place_id, ref report_place_id }
                if place_id == "lib" && report_place_id == "harbour"
        ));
        assert_eq!(place, library());
    }

    #[test]
    fn from_record_ignores_stored_rating() {
        let record = PlaceRecord {
            id: "lib".to_string(),
            name: "City Library".to_string(),
            address: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            features: FeatureSet::unknown().with(crate::Feature::Lift, No),
            overall_rating: OverallRating::Accessible,
            confidence_score: 250,
            verified: true,
            report_count: 3,
            reports: Vec::new(),
        };

        let place = Place::from_record(record, &LiftRater);

        assert_eq!(place.overall_rating(), OverallRating::NotAccessible);
        assert_eq!(place.confidence_score(), 100);
        assert!(place.verified());
        assert_eq!(place.report_count(), 3);
    }

    #[test]
    fn record_round_trip_preserves_place() {
        let mut place = library().with_verified(true);
        place.apply_report(
            report(FeatureSet::new(Yes, Yes, Unknown, No, Unknown), 5),
            &LiftRater,
        )
            .unwrap();

        let json = serde_json::to_string(&PlaceRecord::from(&place)).unwrap();
        let record: PlaceRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(Place::from_record(record, &LiftRater), place);
    }

    #[test]
    fn record_defaults_missing_fields() {
        let record: PlaceRecord =
            serde_json::from_str(r#"{"id": "p1", "name": "Park", "has_lift": "yes"}"#).unwrap();

        assert_eq!(record.address, "");
        assert_eq!(record.features.lift, Yes);
        assert_eq!(record.features.ramp, Unknown);
        assert_eq!(record.overall_rating, OverallRating::Unknown);
        assert_eq!(record.report_count, 0);
        assert!(!record.verified);
    }

    #[test]
    fn record_reads_camel_case_counters() {
        let record: PlaceRecord = serde_json::from_str(
            r#"{"id": "p1", "name": "Park", "reportCount": 2, "userReports": []}"#,
        )
        .unwrap();

        assert_eq!(record.report_count, 2);
    }

    #[test]
    fn recent_reports_are_newest_first() {
        let mut place = library();
        for minute in 0..5 {
            place.apply_report(report(FeatureSet::unknown(), minute), &LiftRater).unwrap();
        }

        let comments: Vec<_> = place
            .recent_reports(3)
            .filter_map(Report::comment)
            .collect();

        assert_eq!(comments, ["visit 4", "visit 3", "visit 2"]);
    }

    #[test]
    fn confidence_summary_pluralizes() {
        let mut place = library();
        assert_eq!(place.confidence_summary(), "Based on 0 user reports");

        place.apply_report(report(FeatureSet::unknown(), 0), &LiftRater).unwrap();
        assert_eq!(place.confidence_summary(), "Based on 1 user report");
    }
}
