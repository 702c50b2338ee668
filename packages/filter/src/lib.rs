#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place filtering by feature toggles, verification, and free-text search.
//!
//! [`filter`] keeps the places that match a [`FilterSpec`] and returns them
//! in their original relative order. It never adds, duplicates, or mutates
//! places, so filtering an already-filtered result with the same spec
//! returns the same sequence.

use accessmap_filter_models::FilterSpec;
use accessmap_place_models::{FeatureValue, Place};

/// Returns the places matching `spec`, preserving input order.
///
/// Accepts any iterator of place references, so a previous result can be
/// filtered again with `result.iter().copied()`.
#[must_use]
pub fn filter<'a, I>(places: I, spec: &FilterSpec) -> Vec<&'a Place>
where
    I: IntoIterator<Item = &'a Place>,
{
    let query = spec.search_query.to_lowercase();
    let mut total = 0_usize;

    let matched: Vec<&Place> = places
        .into_iter()
        .inspect(|_| total += 1)
        .filter(|place| matches_query(place, &query) && matches_feature_filters(place, spec))
        .collect();

    log::debug!(
        "Filter kept {}/{total} places (query={:?}, features={:?}, verified_only={})",
        matched.len(),
        spec.search_query,
        spec.active_features().collect::<Vec<_>>(),
        spec.user_verified,
    );

    matched
}

/// Whether a single place matches both the search query and the toggles.
#[must_use]
pub fn matches(place: &Place, spec: &FilterSpec) -> bool {
    matches_search(place, &spec.search_query) && matches_feature_filters(place, spec)
}

/// Whether `query` is empty or a case-insensitive substring of the place's
/// name or address.
#[must_use]
pub fn matches_search(place: &Place, query: &str) -> bool {
    matches_query(place, &query.to_lowercase())
}

/// Whether every active toggle in `spec` is satisfied: each required
/// feature is `yes`, and the place is verified when `user_verified` is set.
#[must_use]
pub fn matches_feature_filters(place: &Place, spec: &FilterSpec) -> bool {
    let features = place.features();

    spec.active_features()
        .all(|feature| features.get(feature) == FeatureValue::Yes)
        && (!spec.user_verified || place.verified())
}

/// Search match against an already-lowercased query.
fn matches_query(place: &Place, lower_query: &str) -> bool {
    lower_query.is_empty()
        || place.name().to_lowercase().contains(lower_query)
        || place.address().to_lowercase().contains(lower_query)
}
