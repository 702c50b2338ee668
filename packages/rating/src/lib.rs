#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Overall accessibility rating derivation.
//!
//! [`RatingEngine`] turns the five feature values of a place (or of a single
//! report) into one [`OverallRating`] plus the confidence a single report
//! contributes. It is a pure, total function: every one of the 243 possible
//! inputs maps to exactly one rating.
//!
//! Confidence is a fixed per-report baseline. It does not yet account for
//! report count, recency, or agreement between reports.

pub mod policy;

pub use policy::{PolicyError, RatingPolicy};

use accessmap_place_models::{FeatureSet, FeatureTally, OverallRating, Rater, RatingOutcome};

/// Derives ratings according to a [`RatingPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingEngine {
    policy: RatingPolicy,
}

impl RatingEngine {
    /// Creates an engine with the given policy.
    #[must_use]
    pub const fn new(policy: RatingPolicy) -> Self {
        Self { policy }
    }

    /// The policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &RatingPolicy {
        &self.policy
    }

    /// Rates a feature set.
    #[must_use]
    pub fn compute(&self, features: &FeatureSet) -> RatingOutcome {
        let tally = features.tally();
        let rating = self.classify(tally);

        log::debug!(
            "Rated {features:?} (yes={}, no={}, unknown={}) as {rating}",
            tally.yes,
            tally.no,
            tally.unknown,
        );

        RatingOutcome {
            rating,
            confidence_delta: self.policy.report_confidence,
        }
    }

    /// Classifies a tally. Rules are checked in order and the first match
    /// wins, so four `yes` and one `no` is `accessible`.
    #[must_use]
    pub const fn classify(&self, tally: FeatureTally) -> OverallRating {
        if tally.yes >= self.policy.accessible_min_yes {
            OverallRating::Accessible
        } else if tally.no >= self.policy.not_accessible_min_no {
            OverallRating::NotAccessible
        } else if tally.unknown >= self.policy.unknown_min_unknown {
            OverallRating::Unknown
        } else {
            OverallRating::PartiallyAccessible
        }
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(RatingPolicy::default())
    }
}

impl Rater for RatingEngine {
    fn compute(&self, features: &FeatureSet) -> RatingOutcome {
        Self::compute(self, features)
    }
}
