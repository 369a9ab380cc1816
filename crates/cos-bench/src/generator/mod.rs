//! Season generator.
//!
//! Produces [`SeasonSnapshot`] documents with a conference/division hierarchy,
//! a division round robin, cross-division and interconference games, and an
//! optional planted circle in every division.

pub mod layout;
pub mod schedule;

use cos_core::{League, SeasonSnapshot, SnapshotError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};

pub use layout::{conference_name, division_name};

/// Name of the generated league root.
pub const LEAGUE_NAME: &str = "Generated League";

/// Configuration for the season generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    pub conferences: usize,
    pub divisions_per_conference: usize,
    pub teams_per_division: usize,
    /// Games per team against random opponents in other divisions of the
    /// same conference.
    pub cross_division_games: usize,
    /// Games per team against random opponents in other conferences.
    pub interconference_games: usize,
    /// Fraction of unforced games left unplayed (0.0-1.0).
    pub undecided_fraction: f64,
    /// Force the division round robin of every division with at least three
    /// teams to contain the circle `t0 -> t1 -> ... -> t0`.
    pub plant_circles: bool,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 8 teams: one conference of two 4-team divisions.
    Small,
    /// 32 teams: two conferences of four 4-team divisions.
    Medium,
    /// 64 teams: four conferences of two 8-team divisions.
    Large,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                conferences: 1,
                divisions_per_conference: 2,
                teams_per_division: 4,
                cross_division_games: 2,
                interconference_games: 0,
                undecided_fraction: 0.2,
                plant_circles: true,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                conferences: 2,
                divisions_per_conference: 4,
                teams_per_division: 4,
                cross_division_games: 4,
                interconference_games: 2,
                undecided_fraction: 0.2,
                plant_circles: true,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                conferences: 4,
                divisions_per_conference: 2,
                teams_per_division: 8,
                cross_division_games: 3,
                interconference_games: 2,
                undecided_fraction: 0.1,
                plant_circles: true,
            },
        }
    }
}

impl GeneratorConfig {
    pub fn team_count(&self) -> usize {
        self.conferences * self.divisions_per_conference * self.teams_per_division
    }
}

/// Generates a season snapshot as a JSON document.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_snapshot_json(config: &GeneratorConfig) -> Value {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let layout = layout::Layout::new(config);
    let (games, upcoming) = schedule::build_schedule(&layout, config, &mut rng);
    json!({
        "league": {
            "name": LEAGUE_NAME,
            "abbreviation": "GL",
            "sport": "football",
            "season": "2023",
        },
        "groups": layout.groups_json(),
        "teams": layout.teams_json(),
        "games": games,
        "upcoming": upcoming,
    })
}

/// Generates a typed [`SeasonSnapshot`].
///
/// # Errors
///
/// [`SnapshotError::Json`] if the generated document fails validation.
pub fn generate_snapshot(config: &GeneratorConfig) -> Result<SeasonSnapshot, SnapshotError> {
    Ok(serde_json::from_value(generate_snapshot_json(config))?)
}

/// Generates a snapshot and builds its league.
///
/// # Errors
///
/// Any [`SnapshotError`] from generation or league construction.
pub fn generate_league(config: &GeneratorConfig) -> Result<League, SnapshotError> {
    generate_snapshot(config)?.into_league()
}
