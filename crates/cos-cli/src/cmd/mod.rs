//! Subcommand implementations. Each module exposes a `run` function that
//! writes its report to stdout and returns a [`CliError`] on failure.
use cos_core::{League, SeasonSnapshot};

use crate::error::CliError;

pub mod analyze;
pub mod inspect;

/// Parses snapshot text and builds the league, returning it with the season
/// label.
pub fn load_league(content: &str) -> Result<(League, Option<String>), CliError> {
    let snapshot = SeasonSnapshot::from_json(content)?;
    let season = snapshot.season().map(str::to_owned);
    Ok((snapshot.into_league()?, season))
}
