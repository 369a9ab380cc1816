/// Season snapshot: the JSON document a data provider hands to the engine.
///
/// A snapshot lists the league's groups and teams flatly (each naming its
/// parent group), plus every finished game and every scheduled fixture.
/// [`SeasonSnapshot::into_league`] turns it into a [`League`] with each game
/// attached at the lowest common ancestor of its teams.
///
/// Providers routinely report games against opponents outside the league
/// (non-conference or exhibition games). Those are skipped with a warning.
/// Every other inconsistency is an error.
use serde::{Deserialize, Serialize};

use crate::game::{Game, UndecidedGame};
use crate::league::{League, LeagueError, NodeIdx, TeamNode};
use crate::newtypes::TeamId;

/// Errors raised while reading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The document is not valid JSON, or a record violates its invariants
    /// (tied score, a team playing itself, an empty id).
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// A group names a parent that is not defined, or the parents form a loop.
    #[error("group {group:?} has unknown parent {parent:?}")]
    UnknownParent {
        /// The group that could not be placed.
        group: String,
        /// The parent it names.
        parent: String,
    },
    /// A team names a group that is not defined.
    #[error("team {team} belongs to unknown group {group:?}")]
    UnknownGroup {
        /// The team that could not be placed.
        team: TeamId,
        /// The group it names.
        group: String,
    },
    /// Building the hierarchy failed (duplicate group name or team id).
    #[error(transparent)]
    League(#[from] LeagueError),
}

/// Top-level league description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

/// A conference, division, or other grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Name of the parent group; absent (or the league name) for a direct
    /// child of the league root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// A team and the group it plays in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Name of the group; the league name places the team at the root.
    pub group: String,
}

/// One season of a league, as supplied by a data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSnapshot {
    pub league: LeagueInfo,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub upcoming: Vec<UndecidedGame>,
}

impl SeasonSnapshot {
    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Json`] for malformed JSON or invalid game records.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn season(&self) -> Option<&str> {
        self.league.season.as_deref()
    }

    /// Builds the league hierarchy and attaches every game.
    ///
    /// Groups may be listed in any order. Decided games are attached before
    /// fixtures, so an id listed as both keeps its result.
    ///
    /// # Errors
    ///
    /// See [`SnapshotError`].
    pub fn into_league(self) -> Result<League, SnapshotError> {
        let mut league = League::new(self.league.name.clone(), self.league.abbreviation.clone());
        self.add_groups(&mut league)?;

        for team in self.teams {
            let parent = resolve_group(&league, &team.group).ok_or_else(|| {
                SnapshotError::UnknownGroup {
                    team: team.id.clone(),
                    group: team.group.clone(),
                }
            })?;
            let mut node = TeamNode::new(team.id, team.name);
            node.abbreviation = team.abbreviation;
            node.logo = team.logo;
            league.add_team(parent, node)?;
        }

        let mut skipped = 0usize;
        for game in self.games {
            match league.attach_game(game) {
                Ok(_) => {}
                Err(LeagueError::UnknownTeam { game_id, team_id }) => {
                    log::warn!("skipping game {game_id}: team {team_id} is not in the league");
                    skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        for game in self.upcoming {
            match league.attach_undecided(game) {
                Ok(_) => {}
                Err(LeagueError::UnknownTeam { game_id, team_id }) => {
                    log::warn!("skipping fixture {game_id}: team {team_id} is not in the league");
                    skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let (decided, upcoming) = league.game_counts();
        log::info!(
            "loaded {:?}: {} teams, {} decided games, {} fixtures, {} skipped",
            self.league.name,
            league.team_count(),
            decided,
            upcoming,
            skipped
        );
        Ok(league)
    }

    /// Adds groups whose parent already exists until none are left.
    fn add_groups(&self, league: &mut League) -> Result<(), SnapshotError> {
        let mut pending: Vec<&GroupRecord> = self.groups.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for group in pending {
                let parent = match &group.parent {
                    None => Some(league.root()),
                    Some(name) => resolve_group(league, name),
                };
                match parent {
                    Some(parent) => {
                        league.add_group(parent, group.name.clone(), group.abbreviation.clone())?;
                    }
                    None => deferred.push(group),
                }
            }
            // No progress: every remaining parent is missing or part of a loop.
            if let Some(g) = deferred.first().filter(|_| deferred.len() == before) {
                return Err(SnapshotError::UnknownParent {
                    group: g.name.clone(),
                    parent: g.parent.clone().unwrap_or_default(),
                });
            }
            pending = deferred;
        }
        Ok(())
    }
}

/// A group by name; the league's own name resolves to the root.
fn resolve_group(league: &League, name: &str) -> Option<NodeIdx> {
    league.group_by_name(name)
}
