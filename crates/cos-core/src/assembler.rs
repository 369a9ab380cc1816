/// Turns solver cycles into reportable circles.
///
/// A [`Cycle`] is only a sequence of team indices. The assembler walks its
/// consecutive pairs, looks up the game backing each edge in the
/// [`ResultGraph`], and produces a [`CircleOfSuck`] (every edge decided) or a
/// [`PotentialCircleOfSuck`] (some edges hypothetical). Winners and losers are
/// re-derived from the game itself, never from the matrix orientation.
///
/// Both record types serialize through [`CircleSummary`], the stable output
/// shape shared by reports and the result store.
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{Game, UndecidedGame};
use crate::graph::{EdgeEvidence, ResultGraph};
use crate::league::League;
use crate::newtypes::{GameId, TeamId};
use crate::solver::Cycle;

/// Errors raised when a cycle cannot be mapped back onto its graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    /// The graph root is not a named group.
    #[error("graph root {0} is not a group of this league")]
    NotAGroup(usize),
    /// The cycle names an index the graph does not have.
    #[error("team index {0} is not in the results graph")]
    UnknownIndex(usize),
    /// The graph names a team the league does not have.
    #[error("team {0} is not in the league")]
    UnknownTeam(TeamId),
    /// The cycle follows an edge with no backing game.
    #[error("no game backs the edge {winner} -> {loser}")]
    MissingEdge {
        /// Winner index.
        winner: usize,
        /// Loser index.
        loser: usize,
    },
    /// A confirmed circle was requested over a hypothetical edge.
    #[error("game {0} is undecided and cannot be part of a confirmed circle")]
    ContingentEdge(GameId),
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// A team as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub parent_group_name: Option<String>,
}

impl TeamSummary {
    fn from_league(league: &League, id: &TeamId) -> Result<Self, AssembleError> {
        let team = league
            .team_by_id(id)
            .ok_or_else(|| AssembleError::UnknownTeam(id.clone()))?;
        Ok(Self {
            id: team.id.clone(),
            name: team.name.clone(),
            abbreviation: team.abbreviation.clone(),
            logo: team.logo.clone(),
            parent_group_name: league.parent_group_name(id).map(str::to_owned),
        })
    }

    /// Abbreviation, falling back to the full name.
    pub fn display_abbreviation(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.name)
    }
}

/// A game as it appears in a report.
///
/// Scores and `home_won` are `None` for a game that has not been played; such
/// a game names the team that must win it in `required_winner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    #[serde(with = "crate::serde_helpers::kickoff")]
    pub date: DateTime<Utc>,
    pub week: String,
    pub home: TeamId,
    pub away: TeamId,
    pub home_abbreviation: String,
    pub away_abbreviation: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub home_won: Option<bool>,
    /// Present only in potential circles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_winner: Option<TeamId>,
}

impl GameSummary {
    fn from_game(league: &League, game: &Game) -> Self {
        Self {
            id: game.id().clone(),
            date: game.date(),
            week: game.week().to_owned(),
            home: game.home().clone(),
            away: game.away().clone(),
            home_abbreviation: abbreviation(league, game.home()),
            away_abbreviation: abbreviation(league, game.away()),
            home_score: Some(game.home_score()),
            away_score: Some(game.away_score()),
            home_won: Some(game.home_won()),
            decided: None,
            required_winner: None,
        }
    }

    fn from_fixture(league: &League, game: &UndecidedGame, winner: &TeamId) -> Self {
        Self {
            id: game.id().clone(),
            date: game.date(),
            week: game.week().to_owned(),
            home: game.home().clone(),
            away: game.away().clone(),
            home_abbreviation: abbreviation(league, game.home()),
            away_abbreviation: abbreviation(league, game.away()),
            home_score: None,
            away_score: None,
            home_won: None,
            decided: Some(false),
            required_winner: Some(winner.clone()),
        }
    }

    /// Returns `true` if the game has a final score.
    pub fn is_played(&self) -> bool {
        self.home_won.is_some()
    }

    /// The team that won, or must win, this game.
    pub fn winner(&self) -> Option<&TeamId> {
        match self.home_won {
            Some(true) => Some(&self.home),
            Some(false) => Some(&self.away),
            None => self.required_winner.as_ref(),
        }
    }

    /// The team that lost, or must lose, this game.
    pub fn loser(&self) -> Option<&TeamId> {
        let winner = self.winner()?;
        Some(if winner == &self.home {
            &self.away
        } else {
            &self.home
        })
    }

    /// `(winner score, loser score)` for a played game.
    pub fn score_line(&self) -> Option<(u32, u32)> {
        let (h, a) = (self.home_score?, self.away_score?);
        Some(if h > a { (h, a) } else { (a, h) })
    }
}

fn abbreviation(league: &League, id: &TeamId) -> String {
    league
        .team_by_id(id)
        .map_or_else(|| id.to_string(), |t| t.display_abbreviation().to_owned())
}

/// Serialized form of a confirmed or potential circle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleSummary {
    pub group_name: String,
    pub teams: Vec<TeamSummary>,
    pub games: Vec<GameSummary>,
    /// Ids of the already-decided games in a potential circle; absent for a
    /// confirmed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_game_ids: Option<Vec<GameId>>,
}

impl CircleSummary {
    /// Returns `true` if this summarizes a [`PotentialCircleOfSuck`].
    pub fn is_potential(&self) -> bool {
        self.decided_game_ids.is_some()
    }

    pub fn team(&self, id: &TeamId) -> Option<&TeamSummary> {
        self.teams.iter().find(|t| &t.id == id)
    }
}

// ---------------------------------------------------------------------------
// Circles
// ---------------------------------------------------------------------------

/// A Hamiltonian cycle of decided wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleOfSuck {
    group_name: String,
    teams: Vec<TeamSummary>,
    games: Vec<Game>,
}

impl CircleOfSuck {
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Teams in cycle order, starting team not repeated.
    pub fn teams(&self) -> &[TeamSummary] {
        &self.teams
    }

    /// One game per link: `games[i]` was won by `teams[i]` over `teams[i + 1]`
    /// (wrapping).
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn summary(&self, league: &League) -> CircleSummary {
        CircleSummary {
            group_name: self.group_name.clone(),
            teams: self.teams.clone(),
            games: self
                .games
                .iter()
                .map(|g| GameSummary::from_game(league, g))
                .collect(),
            decided_game_ids: None,
        }
    }
}

/// One link of a potential circle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PotentialLink {
    /// A finished game.
    Decided(Game),
    /// A fixture that must end with `winner` beating `loser`.
    Contingent {
        game: UndecidedGame,
        winner: TeamId,
        loser: TeamId,
    },
}

impl PotentialLink {
    pub fn game_id(&self) -> &GameId {
        match self {
            Self::Decided(g) => g.id(),
            Self::Contingent { game, .. } => game.id(),
        }
    }

    pub fn winner(&self) -> &TeamId {
        match self {
            Self::Decided(g) => g.winner(),
            Self::Contingent { winner, .. } => winner,
        }
    }

    pub fn loser(&self) -> &TeamId {
        match self {
            Self::Decided(g) => g.loser(),
            Self::Contingent { loser, .. } => loser,
        }
    }
}

/// A Hamiltonian cycle that holds only if its contingent links go the stated
/// way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotentialCircleOfSuck {
    group_name: String,
    teams: Vec<TeamSummary>,
    links: Vec<PotentialLink>,
    decided_game_ids: BTreeSet<GameId>,
}

impl PotentialCircleOfSuck {
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn teams(&self) -> &[TeamSummary] {
        &self.teams
    }

    pub fn links(&self) -> &[PotentialLink] {
        &self.links
    }

    /// Ids of this circle's links whose games have already finished.
    pub fn decided_game_ids(&self) -> &BTreeSet<GameId> {
        &self.decided_game_ids
    }

    /// Returns `true` if the link's game has already finished.
    pub fn is_decided(&self, link: &PotentialLink) -> bool {
        self.decided_game_ids.contains(link.game_id())
    }

    /// Number of links still waiting on a result.
    pub fn contingent_count(&self) -> usize {
        self.links.iter().filter(|l| !self.is_decided(l)).count()
    }

    pub fn summary(&self, league: &League) -> CircleSummary {
        let games = self
            .links
            .iter()
            .map(|link| {
                let mut s = match link {
                    PotentialLink::Decided(g) => GameSummary::from_game(league, g),
                    PotentialLink::Contingent { game, winner, .. } => {
                        GameSummary::from_fixture(league, game, winner)
                    }
                };
                s.decided = Some(self.is_decided(link));
                s
            })
            .collect();
        CircleSummary {
            group_name: self.group_name.clone(),
            teams: self.teams.clone(),
            games,
            decided_game_ids: Some(self.decided_game_ids.iter().cloned().collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

fn group_name(league: &League, graph: &ResultGraph) -> Result<String, AssembleError> {
    league
        .group(graph.root())
        .map(|g| g.name().to_owned())
        .ok_or(AssembleError::NotAGroup(graph.root().index()))
}

fn team_summaries(
    league: &League,
    graph: &ResultGraph,
    cycle: &Cycle,
) -> Result<Vec<TeamSummary>, AssembleError> {
    cycle.indices()[..cycle.len()]
        .iter()
        .map(|&i| {
            let id = graph.team_at(i).ok_or(AssembleError::UnknownIndex(i))?;
            TeamSummary::from_league(league, id)
        })
        .collect()
}

fn link_evidence(graph: &ResultGraph, w: usize, l: usize) -> Result<&EdgeEvidence, AssembleError> {
    graph
        .evidence(w, l)
        .ok_or(AssembleError::MissingEdge { winner: w, loser: l })
}

/// Builds a confirmed circle from a cycle over decided edges.
///
/// # Errors
///
/// [`AssembleError::ContingentEdge`] if any edge is hypothetical, or another
/// [`AssembleError`] if the cycle does not belong to `graph`.
pub fn assemble_circle(
    league: &League,
    graph: &ResultGraph,
    cycle: &Cycle,
) -> Result<CircleOfSuck, AssembleError> {
    let teams = team_summaries(league, graph, cycle)?;
    let games = cycle
        .links()
        .map(|(w, l)| match link_evidence(graph, w, l)? {
            EdgeEvidence::Decided(game) => Ok(game.clone()),
            EdgeEvidence::Contingent { game, .. } => Err(AssembleError::ContingentEdge(game.id().clone())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CircleOfSuck {
        group_name: group_name(league, graph)?,
        teams,
        games,
    })
}

/// Builds a potential circle, flagging each link decided when its game id is
/// in `finished`.
///
/// # Errors
///
/// An [`AssembleError`] if the cycle does not belong to `graph`.
pub fn assemble_potential(
    league: &League,
    graph: &ResultGraph,
    cycle: &Cycle,
    finished: &BTreeSet<GameId>,
) -> Result<PotentialCircleOfSuck, AssembleError> {
    let teams = team_summaries(league, graph, cycle)?;
    let links = cycle
        .links()
        .map(|(w, l)| {
            Ok(match link_evidence(graph, w, l)? {
                EdgeEvidence::Decided(game) => PotentialLink::Decided(game.clone()),
                EdgeEvidence::Contingent { game, winner } => PotentialLink::Contingent {
                    game: game.clone(),
                    winner: game.team(*winner).clone(),
                    loser: game.team(winner.other()).clone(),
                },
            })
        })
        .collect::<Result<Vec<_>, AssembleError>>()?;
    let decided_game_ids = links
        .iter()
        .map(PotentialLink::game_id)
        .filter(|id| finished.contains(*id))
        .cloned()
        .collect();
    Ok(PotentialCircleOfSuck {
        group_name: group_name(league, graph)?,
        teams,
        links,
        decided_game_ids,
    })
}
