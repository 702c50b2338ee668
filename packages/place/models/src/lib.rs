#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accessibility feature, rating, place, and report types.
//!
//! This crate defines the shared data model of the AccessMap core. The
//! rating and filter engines depend only on these types, never on each
//! other. A place's overall rating is derived data: it can only be set by a
//! [`Rater`], so it always agrees with the place's current feature set.

mod place;
mod report;

pub use place::{Place, PlaceError, PlaceRecord};
pub use report::Report;

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Observed state of a single accessibility feature.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureValue {
    /// The feature is present.
    Yes,
    /// The feature is absent.
    No,
    /// Nobody has reported on this feature.
    #[default]
    Unknown,
}

impl FeatureValue {
    /// Returns `true` for `yes` and `no`.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Yes, Self::No, Self::Unknown]
    }
}

/// Reads a feature value, treating a missing or `null` field as
/// [`FeatureValue::Unknown`].
///
/// # Errors
///
/// Returns the deserializer's error if the value is present but is not one
/// of `"yes"`, `"no"`, or `"unknown"`.
pub fn deserialize_feature_value<'de, D>(deserializer: D) -> Result<FeatureValue, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FeatureValue>::deserialize(deserializer)?.unwrap_or_default())
}

/// One of the five tracked accessibility attributes of a place.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    /// Wheelchair ramp
    Ramp,
    /// Lift or elevator
    Lift,
    /// Accessible toilet
    Toilet,
    /// Accessible parking
    Parking,
    /// Step-free entrance
    Entrance,
}

impl Feature {
    /// Returns the record field name carrying this feature
    /// (e.g. `has_accessible_toilet`).
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Ramp => "has_ramp",
            Self::Lift => "has_lift",
            Self::Toilet => "has_accessible_toilet",
            Self::Parking => "has_accessible_parking",
            Self::Entrance => "has_accessible_entrance",
        }
    }

    /// Human-readable label for listings and detail views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ramp => "Ramp",
            Self::Lift => "Lift/Elevator",
            Self::Toilet => "Accessible Toilet",
            Self::Parking => "Accessible Parking",
            Self::Entrance => "Accessible Entrance",
        }
    }

    /// Returns all variants of this enum in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Ramp,
            Self::Lift,
            Self::Toilet,
            Self::Parking,
            Self::Entrance,
        ]
    }
}

/// The five feature values of a place or a report.
///
/// Serialized flat with the `has_*` field names used by place records and
/// report payloads. Missing fields read as [`FeatureValue::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Wheelchair ramp.
    #[serde(
        rename = "has_ramp",
        default,
        deserialize_with = "deserialize_feature_value"
    )]
    pub ramp: FeatureValue,
    /// Lift or elevator.
    #[serde(
        rename = "has_lift",
        default,
        deserialize_with = "deserialize_feature_value"
    )]
    pub lift: FeatureValue,
    /// Accessible toilet.
    #[serde(
        rename = "has_accessible_toilet",
        default,
        deserialize_with = "deserialize_feature_value"
    )]
    pub toilet: FeatureValue,
    /// Accessible parking.
    #[serde(
        rename = "has_accessible_parking",
        default,
        deserialize_with = "deserialize_feature_value"
    )]
    pub parking: FeatureValue,
    /// Step-free entrance.
    #[serde(
        rename = "has_accessible_entrance",
        default,
        deserialize_with = "deserialize_feature_value"
    )]
    pub entrance: FeatureValue,
}

impl FeatureSet {
    /// Creates a feature set from the five values in canonical order.
    #[must_use]
    pub const fn new(
        ramp: FeatureValue,
        lift: FeatureValue,
        toilet: FeatureValue,
        parking: FeatureValue,
        entrance: FeatureValue,
    ) -> Self {
        Self {
            ramp,
            lift,
            toilet,
            parking,
            entrance,
        }
    }

    /// A feature set with every feature `unknown`.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(
            FeatureValue::Unknown,
            FeatureValue::Unknown,
            FeatureValue::Unknown,
            FeatureValue::Unknown,
            FeatureValue::Unknown,
        )
    }

    /// Returns the value of a single feature.
    #[must_use]
    pub const fn get(&self, feature: Feature) -> FeatureValue {
        match feature {
            Feature::Ramp => self.ramp,
            Feature::Lift => self.lift,
            Feature::Toilet => self.toilet,
            Feature::Parking => self.parking,
            Feature::Entrance => self.entrance,
        }
    }

    /// Returns a copy with one feature replaced.
    #[must_use]
    pub const fn with(mut self, feature: Feature, value: FeatureValue) -> Self {
        match feature {
            Feature::Ramp => self.ramp = value,
            Feature::Lift => self.lift = value,
            Feature::Toilet => self.toilet = value,
            Feature::Parking => self.parking = value,
            Feature::Entrance => self.entrance = value,
        }
        self
    }

    /// The five values in canonical order.
    #[must_use]
    pub const fn values(&self) -> [FeatureValue; 5] {
        [
            self.ramp,
            self.lift,
            self.toilet,
            self.parking,
            self.entrance,
        ]
    }

    /// Counts how many features are `yes`, `no`, and `unknown`.
    #[must_use]
    pub fn tally(&self) -> FeatureTally {
        self.values()
            .into_iter()
            .fold(FeatureTally::default(), |mut tally, value| {
                match value {
                    FeatureValue::Yes => tally.yes += 1,
                    FeatureValue::No => tally.no += 1,
                    FeatureValue::Unknown => tally.unknown += 1,
                }
                tally
            })
    }

    /// Merges newly observed values over this set.
    ///
    /// A known incoming value (`yes`/`no`) replaces the existing one; an
    /// incoming `unknown` never erases what is already known.
    #[must_use]
    pub fn merge(&self, incoming: &Self) -> Self {
        Feature::all().iter().fold(*self, |merged, &feature| {
            let value = incoming.get(feature);
            if value.is_known() {
                merged.with(feature, value)
            } else {
                merged
            }
        })
    }
}

/// Per-value counts over a [`FeatureSet`]. Always sums to 5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureTally {
    /// Number of `yes` features.
    pub yes: u8,
    /// Number of `no` features.
    pub no: u8,
    /// Number of `unknown` features.
    pub unknown: u8,
}

/// Single-value accessibility classification of a place.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverallRating {
    /// Most features are present.
    Accessible,
    /// Mixed evidence.
    PartiallyAccessible,
    /// Several features are known to be absent.
    NotAccessible,
    /// Too little is known to classify.
    #[default]
    Unknown,
}

impl OverallRating {
    /// Human-readable label (e.g. "Partially Accessible").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accessible => "Accessible",
            Self::PartiallyAccessible => "Partially Accessible",
            Self::NotAccessible => "Not Accessible",
            Self::Unknown => "Unknown",
        }
    }

    /// Compact badge symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Accessible => "✓",
            Self::PartiallyAccessible => "~",
            Self::NotAccessible => "✗",
            Self::Unknown => "?",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Accessible,
            Self::PartiallyAccessible,
            Self::NotAccessible,
            Self::Unknown,
        ]
    }
}

/// What a [`Rater`] derives from one feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOutcome {
    /// Overall classification.
    pub rating: OverallRating,
    /// Confidence (0-100) contributed by a single report with these values.
    pub confidence_delta: u8,
}

/// Derives an overall rating from a feature set.
///
/// [`Place`] only accepts ratings through this trait, which keeps the
/// stored rating a projection of the stored features.
pub trait Rater {
    /// Rates one feature set. Must be total and free of side effects.
    fn compute(&self, features: &FeatureSet) -> RatingOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::FeatureValue::{No, Unknown, Yes};

    #[test]
    fn tally_always_sums_to_five() {
        for &a in FeatureValue::all() {
            for &b in FeatureValue::all() {
                let set = FeatureSet::new(a, b, Unknown, Yes, No);
                let tally = set.tally();
                assert_eq!(tally.yes + tally.no + tally.unknown, 5, "{set:?}");
            }
        }
    }

    #[test]
    fn get_and_with_cover_every_feature() {
        for &feature in Feature::all() {
            let set = FeatureSet::unknown().with(feature, Yes);
            assert_eq!(set.get(feature), Yes);
            assert_eq!(set.tally().yes, 1, "{feature:?} set more than one field");
        }
    }

    #[test]
    fn merge_keeps_known_values_over_unknown() {
        let existing = FeatureSet::new(Yes, Yes, No, Unknown, Unknown);
        let incoming = FeatureSet::new(No, Unknown, Unknown, Yes, Unknown);

        let merged = existing.merge(&incoming);

        assert_eq!(merged, FeatureSet::new(No, Yes, No, Yes, Unknown));
    }

    #[test]
    fn merge_with_all_unknown_is_identity() {
        let existing = FeatureSet::new(Yes, No, Yes, No, Yes);
        assert_eq!(existing.merge(&FeatureSet::unknown()), existing);
    }

    #[test]
    fn feature_values_use_snake_case_strings() {
        assert_eq!(Yes.to_string(), "yes");
        assert_eq!("unknown".parse::<FeatureValue>().unwrap(), Unknown);
        assert_eq!(
            OverallRating::PartiallyAccessible.as_ref(),
            "partially_accessible"
        );
        assert_eq!(
            serde_json::to_string(&OverallRating::NotAccessible).unwrap(),
            "\"not_accessible\""
        );
    }

    #[test]
    fn feature_set_reads_missing_and_null_as_unknown() {
        let set: FeatureSet =
            serde_json::from_str(r#"{"has_ramp": "yes", "has_lift": null}"#).unwrap();

        assert_eq!(set, FeatureSet::new(Yes, Unknown, Unknown, Unknown, Unknown));
    }

    #[test]
    fn feature_set_rejects_unrecognized_values() {
        let result = serde_json::from_str::<FeatureSet>(r#"{"has_ramp": "maybe"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn field_names_match_serialized_keys() {
        let json = serde_json::to_value(FeatureSet::unknown()).unwrap();
        for feature in Feature::all() {
            assert!(
                json.get(feature.field_name()).is_some(),
                "{feature:?} missing key {}",
                feature.field_name()
            );
        }
    }
}
