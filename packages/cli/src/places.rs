//! Place collection files and the stdout place store.

use std::path::Path;

use accessmap_place_models::{Place, PlaceRecord, Rater, Report};
use accessmap_report::PlaceStore;
use accessmap_report_models::SubmissionRecord;

/// Parses a JSON array of place records, recomputing every rating.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or a record has an
/// unrecognized feature value.
pub fn parse_places(
    json: &str,
    rater: &(impl Rater + ?Sized),
) -> Result<Vec<Place>, serde_json::Error> {
    let records: Vec<PlaceRecord> = serde_json::from_str(json)?;
    Ok(records
        .into_iter()
        .map(|record| Place::from_record(record, rater))
        .collect())
}

/// Reads and parses a place collection file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_places(
    path: &Path,
    rater: &(impl Rater + ?Sized),
) -> Result<Vec<Place>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read places file {}: {e}", path.display()))?;
    let places = parse_places(&json, rater)
        .map_err(|e| format!("Failed to parse places file {}: {e}", path.display()))?;

    log::info!("Loaded {} places from {}", places.len(), path.display());
    Ok(places)
}

/// Serializes places back to their record form.
pub fn to_records<'a>(places: impl IntoIterator<Item = &'a Place>) -> Vec<PlaceRecord> {
    places.into_iter().map(PlaceRecord::from).collect()
}

/// Writes each submission to stdout as pretty JSON instead of storing it.
#[derive(Debug, Default)]
pub struct StdoutStore {
    written: usize,
}

impl StdoutStore {
    /// Number of submissions written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }
}

impl PlaceStore for StdoutStore {
    type Error = serde_json::Error;

    fn persist(&mut self, place: &Place, report: &Report) -> Result<(), Self::Error> {
        let record = SubmissionRecord {
            place: PlaceRecord::from(place),
            report: report.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
        self.written += 1;
        Ok(())
    }
}

/// Two places: a fully reported library and a bare record.
#[cfg(test)]
pub const PLACES_JSON: &str = r#"[
    {
        "id": "lib",
        "name": "City Library",
        "address": "12 Book Lane",
        "latitude": 51.5,
        "longitude": -0.125,
        "has_ramp": "yes",
        "has_lift": "yes",
        "has_accessible_toilet": "yes",
        "has_accessible_parking": "yes",
        "overall_rating": "not_accessible",
        "confidence_score": 50,
        "verified": true,
        "reportCount": 1
    },
    { "id": "mill", "name": "Old Mill" }
]"#;
