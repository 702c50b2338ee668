#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place filter specification types.
//!
//! A [`FilterSpec`] is rebuilt from the filter controls for every filtering
//! call and owns no state between calls.

use accessmap_place_models::Feature;
use serde::{Deserialize, Serialize};

/// Feature toggles, verification flag, and free-text search for one
/// filtering call.
///
/// Every `true` toggle narrows the result; absent or `false` toggles and an
/// empty query impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Require a wheelchair ramp.
    pub ramp: bool,
    /// Require a lift or elevator.
    pub lift: bool,
    /// Require an accessible toilet.
    pub toilet: bool,
    /// Require accessible parking.
    pub parking: bool,
    /// Require user-verified place data.
    pub user_verified: bool,
    /// Case-insensitive substring of the place name or address.
    pub search_query: String,
}

impl FilterSpec {
    /// Returns a copy with the given search query.
    #[must_use]
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Returns a copy that only keeps verified places.
    #[must_use]
    pub fn verified_only(mut self) -> Self {
        self.user_verified = true;
        self
    }

    /// Returns a copy that requires `feature` to be `yes`.
    ///
    /// There is no entrance toggle; requiring [`Feature::Entrance`] is a
    /// no-op.
    #[must_use]
    pub fn require(mut self, feature: Feature) -> Self {
        match feature {
            Feature::Ramp => self.ramp = true,
            Feature::Lift => self.lift = true,
            Feature::Toilet => self.toilet = true,
            Feature::Parking => self.parking = true,
            Feature::Entrance => {}
        }
        self
    }

    /// Whether `feature` must be `yes` for a place to match.
    #[must_use]
    pub const fn requires(&self, feature: Feature) -> bool {
        match feature {
            Feature::Ramp => self.ramp,
            Feature::Lift => self.lift,
            Feature::Toilet => self.toilet,
            Feature::Parking => self.parking,
            Feature::Entrance => false,
        }
    }

    /// The features whose toggles are on, in canonical order.
    pub fn active_features(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::all()
            .iter()
            .copied()
            .filter(|&feature| self.requires(feature))
    }

    /// Whether this spec keeps every place.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search_query.is_empty()
            && !self.user_verified
            && self.active_features().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unconstrained() {
        assert!(FilterSpec::default().is_unconstrained());
        assert!(!FilterSpec::default().with_search("x").is_unconstrained());
        assert!(!FilterSpec::default().verified_only().is_unconstrained());
        assert!(
            !FilterSpec::default()
                .require(Feature::Parking)
                .is_unconstrained()
        );
    }

    #[test]
    fn entrance_cannot_be_required() {
        let spec = FilterSpec::default().require(Feature::Entrance);
        assert!(!spec.requires(Feature::Entrance));
        assert!(spec.is_unconstrained());
    }

    #[test]
    fn active_features_follow_canonical_order() {
        let spec = FilterSpec::default()
            .require(Feature::Parking)
            .require(Feature::Ramp);

        assert_eq!(
            spec.active_features().collect::<Vec<_>>(),
            [Feature::Ramp, Feature::Parking]
        );
    }

    #[test]
    fn deserializes_partial_camel_case_options() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"lift": true, "userVerified": true}"#).unwrap();

        assert_eq!(
            spec,
            FilterSpec {
                lift: true,
                user_verified: true,
                ..FilterSpec::default()
            }
        );

        let spec: FilterSpec = serde_json::from_str(r#"{"searchQuery": "library"}"#).unwrap();
        assert_eq!(spec.search_query, "library");
    }
}
