//! Report rendering for `cos analyze`.
//!
//! Human mode prints one line per game of a circle:
//!
//! ```text
//! Sep 2, 2023 Anchors -> Bears: 24-10
//! ********Oct 7, 2023 Eagles must defeat Falcons********
//! ```
//!
//! The starred form marks a game that has not been played yet and must go the
//! indicated way for the circle to close. JSON mode serializes the records
//! unchanged.
use std::io::Write;

use chrono::{DateTime, Utc};
use cos_core::{AnalysisRecord, CircleSummary, GameSummary};
use serde::Serialize;

/// `strftime` pattern for game dates, e.g. `Sep 2, 2023`.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

const CONTINGENT_MARK: &str = "********";

/// Formats a kickoff as its calendar date in [`DATE_FORMAT`].
pub fn kickoff_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Renders one game of `circle` as a human-readable line.
pub fn game_line(circle: &CircleSummary, game: &GameSummary) -> String {
    let date = kickoff_date(game.date);
    let winner = game.winner().unwrap_or(&game.home);
    let loser = game.loser().unwrap_or(&game.away);
    let name = |id: &cos_core::TeamId| {
        circle
            .team(id)
            .map_or_else(|| id.to_string(), |t| t.name.clone())
    };
    match game.score_line() {
        Some((won, lost)) => format!(
            "{date} {} -> {}: {won}-{lost}",
            name(winner),
            name(loser)
        ),
        None => format!(
            "{CONTINGENT_MARK}{date} {} must defeat {}{CONTINGENT_MARK}",
            name(winner),
            name(loser)
        ),
    }
}

/// Writes every game line of `circle`.
pub fn write_circle<W: Write>(w: &mut W, circle: &CircleSummary) -> std::io::Result<()> {
    for game in &circle.games {
        writeln!(w, "{}", game_line(circle, game))?;
    }
    Ok(())
}

/// Writes the outcome for one group under a `== A > B ==` heading.
pub fn write_record_human<W: Write>(
    w: &mut W,
    path: &[String],
    record: &AnalysisRecord,
) -> std::io::Result<()> {
    writeln!(w, "== {} ==", path.join(" > "))?;
    match record {
        AnalysisRecord::Circle { circle } => {
            writeln!(w, "Circle of Suck ({} teams):", circle.teams.len())?;
            write_circle(w, circle)?;
        }
        AnalysisRecord::Potential { circles, total } => {
            if circles.len() < *total {
                writeln!(
                    w,
                    "{total} potential {} (showing {}):",
                    pluralize(*total, "circle", "circles"),
                    circles.len()
                )?;
            } else {
                writeln!(w, "{total} potential {}:", pluralize(*total, "circle", "circles"))?;
            }
            for (i, circle) in circles.iter().enumerate() {
                let pending = circle.games.iter().filter(|g| !g.is_played()).count();
                writeln!(
                    w,
                    "Potential circle {} ({pending} {} to play):",
                    i + 1,
                    pluralize(pending, "game", "games")
                )?;
                write_circle(w, circle)?;
            }
        }
        AnalysisRecord::NoCircle => writeln!(w, "No circle of suck.")?,
        AnalysisRecord::Skipped { reason } => writeln!(w, "Skipped: {reason}.")?,
    }
    Ok(())
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
