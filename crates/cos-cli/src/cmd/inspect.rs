//! Implementation of `cos inspect <file>`.
//!
//! Prints league totals, one line per group with its team and game counts,
//! and in human mode the full hierarchy outline with attached games.
use cos_core::League;
use serde::Serialize;

use crate::OutputFormat;
use crate::error::CliError;
use crate::format;

/// Counts for one group. Game counts cover games attached to the group
/// itself; team counts cover the whole subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub path: Vec<String>,
    pub teams: usize,
    pub decided: usize,
    pub upcoming: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectStats {
    pub league: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    pub teams: usize,
    pub decided: usize,
    pub upcoming: usize,
    pub groups: Vec<GroupStats>,
}

impl InspectStats {
    pub fn from_league(league: &League, season: Option<String>) -> Self {
        let (decided, upcoming) = league.game_counts();
        let groups = league
            .groups()
            .into_iter()
            .filter_map(|idx| {
                let group = league.group(idx)?;
                Some(GroupStats {
                    path: league.group_path(idx).into_iter().map(str::to_owned).collect(),
                    teams: league.subtree_team_count(idx),
                    decided: group.games().len(),
                    upcoming: group.upcoming().len(),
                })
            })
            .collect();
        Self {
            league: league.name(league.root()).unwrap_or_default().to_owned(),
            season,
            teams: league.team_count(),
            decided,
            upcoming,
            groups,
        }
    }
}

/// Runs the `inspect` command.
///
/// # Errors
///
/// [`CliError::InvalidSnapshot`] (exit 2) if the content cannot be parsed.
pub fn run(content: &str, format: OutputFormat) -> Result<(), CliError> {
    let (league, season) = super::load_league(content)?;
    let stats = InspectStats::from_league(&league, season);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => print_human(&mut out, &stats, &league.render_tree()),
        OutputFormat::Json => format::write_json(&mut out, &stats),
    }
    .map_err(|e| CliError::stdout(&e))
}

fn print_human<W: std::io::Write>(
    w: &mut W,
    stats: &InspectStats,
    tree: &str,
) -> std::io::Result<()> {
    writeln!(w, "league:    {}", stats.league)?;
    if let Some(season) = &stats.season {
        writeln!(w, "season:    {season}")?;
    }
    writeln!(w, "teams:     {}", stats.teams)?;
    writeln!(w, "games:     {} decided, {} upcoming", stats.decided, stats.upcoming)?;
    writeln!(w, "groups:    {}", stats.groups.len())?;
    for g in &stats.groups {
        writeln!(
            w,
            "  {}: {} teams, {} decided, {} upcoming",
            g.path.join(" > "),
            g.teams,
            g.decided,
            g.upcoming
        )?;
    }
    writeln!(w)?;
    w.write_all(tree.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    const SEASON: &str = r#"{
        "league": {"name": "Mini", "season": "2023"},
        "groups": [{"name": "East", "abbreviation": "E"}, {"name": "West"}],
        "teams": [
            {"id": "1", "name": "Anchors", "abbreviation": "ANC", "group": "East"},
            {"id": "2", "name": "Bears", "abbreviation": "BEA", "group": "East"},
            {"id": "3", "name": "Dragons", "abbreviation": "DRA", "group": "West"}
        ],
        "games": [
            {"id": "g1", "date": "2023-09-02T17:00Z", "week": "Week 1", "home": "1", "away": "2", "home_score": 24, "away_score": 10},
            {"id": "g2", "date": "2023-09-09T17:00Z", "week": "Week 2", "home": "3", "away": "1", "home_score": 7, "away_score": 35}
        ],
        "upcoming": [
            {"id": "u1", "date": "2023-10-07T17:00Z", "week": "Week 6", "home": "2", "away": "3"}
        ]
    }"#;

    fn stats() -> (InspectStats, League) {
        let (league, season) = crate::cmd::load_league(SEASON).expect("league");
        (InspectStats::from_league(&league, season), league)
    }

    #[test]
    fn counts_per_group() {
        let (stats, _) = stats();
        assert_eq!(stats.league, "Mini");
        assert_eq!(stats.season.as_deref(), Some("2023"));
        assert_eq!((stats.teams, stats.decided, stats.upcoming), (3, 2, 1));
        let root = &stats.groups[0];
        assert_eq!((root.teams, root.decided, root.upcoming), (3, 1, 1));
        let east = &stats.groups[1];
        assert_eq!(east.path, vec!["Mini", "East"]);
        assert_eq!((east.teams, east.decided, east.upcoming), (2, 1, 0));
    }

    #[test]
    fn human_output_includes_outline() {
        let (stats, league) = stats();
        let mut buf = Vec::new();
        print_human(&mut buf, &stats, &league.render_tree()).expect("write");
        let text = String::from_utf8(buf).expect("utf-8");
        assert!(text.contains("games:     2 decided, 1 upcoming"), "{text}");
        assert!(text.contains("  Mini > East: 2 teams, 1 decided, 0 upcoming"), "{text}");
        assert!(text.contains("East (E)"), "{text}");
        assert!(text.contains("* Week 1 ANC vs BEA: 24-10"), "{text}");
        assert!(text.contains("? Week 6 BEA vs DRA"), "{text}");
    }

    #[test]
    fn json_omits_missing_season() {
        let (mut stats, _) = stats();
        stats.season = None;
        let value = serde_json::to_value(&stats).expect("json");
        assert!(value.get("season").is_none());
        assert_eq!(value["groups"].as_array().map(Vec::len), Some(3));
    }
}
