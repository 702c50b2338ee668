#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for rating, filtering, and reporting on accessible places.

mod places;

use std::path::{Path, PathBuf};

use accessmap_filter_models::FilterSpec;
use accessmap_place_models::{Feature, FeatureSet, FeatureValue, Place};
use accessmap_rating::{RatingEngine, RatingPolicy};
use accessmap_report::{PlaceStore, ReportCoordinator, SubmissionError};
use accessmap_report_models::{ReportSubmission, Submission, SubmissionRecord};
use clap::{Parser, Subcommand};

use crate::places::{StdoutStore, load_places, to_records};

/// Reports listed after a submission.
const RECENT_REPORT_LIMIT: usize = 3;

#[derive(Parser)]
#[command(name = "accessmap", about = "Accessible place rating and reporting tool")]
struct Cli {
    /// Rating policy TOML file (defaults to the built-in policy)
    #[arg(long, global = true, env = "ACCESSMAP_POLICY")]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate a place from its five feature values (`yes`, `no`, or `unknown`)
    Rate {
        ramp: FeatureValue,
        lift: FeatureValue,
        toilet: FeatureValue,
        parking: FeatureValue,
        entrance: FeatureValue,
    },
    /// Print the places from a JSON file that match the given filters
    Filter {
        /// JSON array of places
        #[arg(long)]
        places: PathBuf,
        /// Require a wheelchair ramp
        #[arg(long)]
        ramp: bool,
        /// Require a lift or elevator
        #[arg(long)]
        lift: bool,
        /// Require an accessible toilet
        #[arg(long)]
        toilet: bool,
        /// Require accessible parking
        #[arg(long)]
        parking: bool,
        /// Only keep user-verified places
        #[arg(long)]
        user_verified: bool,
        /// Case-insensitive search over name and address
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Submit a report and print the updated place and the new report
    Submit {
        /// JSON array of existing places
        #[arg(long)]
        places: PathBuf,
        /// JSON report form payload
        #[arg(long)]
        report: PathBuf,
        /// Place to report on (overrides `place_id` in the payload)
        #[arg(long)]
        place_id: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let engine = match &cli.policy {
        Some(path) => RatingEngine::new(RatingPolicy::from_path(path)?),
        None => RatingEngine::default(),
    };

    match cli.command {
        Commands::Rate {
            ramp,
            lift,
            toilet,
            parking,
            entrance,
        } => {
            let features = FeatureSet::new(ramp, lift, toilet, parking, entrance);
            let outcome = engine.compute(&features);

            for &feature in Feature::all() {
                println!("{:<22} {}", feature.label(), features.get(feature));
            }
            println!();
            println!(
                "Rating:     {} {}",
                outcome.rating.symbol(),
                outcome.rating.label()
            );
            println!("Confidence: {}%", outcome.confidence_delta);
        }
        Commands::Filter {
            places,
            ramp,
            lift,
            toilet,
            parking,
            user_verified,
            query,
        } => {
            let places = load_places(&places, &engine)?;
            let spec = FilterSpec {
                ramp,
                lift,
                toilet,
                parking,
                user_verified,
                search_query: query,
            };

            println!("{}", filter_places(&places, &spec)?);
        }
        Commands::Submit {
            places,
            report,
            place_id,
        } => {
            let places = load_places(&places, &engine)?;
            let payload = read_submission(&report)?;

            let mut coordinator = ReportCoordinator::new(engine, StdoutStore::default());
            let submission = submit_report(&mut coordinator, &places, payload, place_id)?;

            let place = &submission.place;
            log::info!(
                "{}: {} {} ({})",
                place.name(),
                place.overall_rating().symbol(),
                place.overall_rating().label(),
                place.confidence_summary(),
            );
            for report in place.recent_reports(RECENT_REPORT_LIMIT) {
                log::info!(
                    "  {} {}: {}",
                    report.created_date().date_naive(),
                    report.reporter_handle().unwrap_or("anonymous"),
                    report.comment().unwrap_or("(no comment)"),
                );
            }
            log::debug!(
                "Wrote {} submission(s): {}",
                coordinator.store().written(),
                serde_json::to_string(&SubmissionRecord::from(&submission))?,
            );
        }
    }

    Ok(())
}

/// Filters `places` and renders the matches as a JSON array of records.
fn filter_places(places: &[Place], spec: &FilterSpec) -> Result<String, serde_json::Error> {
    let matched = accessmap_filter::filter(places, spec);
    log::info!("{} of {} places match", matched.len(), places.len());
    serde_json::to_string_pretty(&to_records(matched))
}

/// Submits `payload`, reporting on the place with ID `place_id` (or the
/// payload's own `place_id`) when it is in `places`.
fn submit_report<S: PlaceStore>(
    coordinator: &mut ReportCoordinator<RatingEngine, S>,
    places: &[Place],
    mut payload: ReportSubmission,
    place_id: Option<String>,
) -> Result<Submission, SubmissionError> {
    if place_id.is_some() {
        payload.place_id = place_id;
    }

    let existing = payload
        .place_id
        .as_deref()
        .and_then(|id| places.iter().find(|place| place.id() == id));

    coordinator.submit(payload, existing)
}

fn read_submission(path: &Path) -> Result<ReportSubmission, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read report file {}: {e}", path.display()))?;
    serde_json::from_str(&json)
        .map_err(|e| format!("Failed to parse report file {}: {e}", path.display()).into())
}
