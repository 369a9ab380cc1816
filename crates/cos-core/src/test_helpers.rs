//! Shared test helper functions for constructing league fixtures.
//!
//! This module is compiled only in test builds. Integration tests in
//! `crates/cos-core/tests/` define their own local helpers because they link
//! against the non-test library build where this module is not available.
#![allow(clippy::expect_used)]

use chrono::{DateTime, Utc};

use crate::game::{Game, UndecidedGame};
use crate::graph::AdjacencyMatrix;
use crate::league::{League, NodeIdx, TeamNode};
use crate::newtypes::{GameId, TeamId};
use crate::serde_helpers::parse_kickoff;

/// Creates a [`TeamId`], panicking on invalid input.
pub fn tid(s: &str) -> TeamId {
    TeamId::try_from(s).expect("valid TeamId")
}

/// Creates a [`GameId`], panicking on invalid input.
pub fn gid(s: &str) -> GameId {
    GameId::try_from(s).expect("valid GameId")
}

/// A fixed kickoff time on the given day of September 2023.
pub fn kickoff(day: u32) -> DateTime<Utc> {
    parse_kickoff(&format!("2023-09-{day:02}T18:00Z")).expect("valid kickoff")
}

/// A team whose name and abbreviation are both `id`.
pub fn team(id: &str) -> TeamNode {
    TeamNode::new(tid(id), format!("Team {id}")).with_abbreviation(id)
}

/// A league root named `name` with the given teams as direct children.
pub fn flat_league(name: &str, teams: &[&str]) -> League {
    let mut league = League::new(name, None);
    let root = league.root();
    for id in teams {
        league.add_team(root, team(id)).expect("add team");
    }
    league
}

/// Adds a division under `parent` holding `teams`.
pub fn add_division(league: &mut League, parent: NodeIdx, name: &str, teams: &[&str]) -> NodeIdx {
    let div = league.add_group(parent, name, None).expect("add group");
    for id in teams {
        league.add_team(div, team(id)).expect("add team");
    }
    div
}

/// A decided game in which `winner` (at home) beat `loser` 28-14.
pub fn win(id: &str, winner: &str, loser: &str) -> Game {
    Game::new(gid(id), kickoff(2), "Week 1", tid(winner), tid(loser), 28, 14).expect("valid game")
}

/// A decided game in which `winner` won on the road, 10-3.
pub fn road_win(id: &str, winner: &str, loser: &str) -> Game {
    Game::new(gid(id), kickoff(9), "Week 2", tid(loser), tid(winner), 3, 10).expect("valid game")
}

/// An undecided fixture.
pub fn fixture(id: &str, home: &str, away: &str) -> UndecidedGame {
    UndecidedGame::new(gid(id), kickoff(30), "Week 5", tid(home), tid(away)).expect("valid fixture")
}

/// Attaches `win(id, winner, loser)` for each triple.
pub fn record(league: &mut League, results: &[(&str, &str, &str)]) {
    for (id, winner, loser) in results {
        league.attach_game(win(id, winner, loser)).expect("attach game");
    }
}

/// Builds an adjacency matrix from `(winner, loser)` index pairs.
pub fn matrix(n: usize, edges: &[(usize, usize)]) -> AdjacencyMatrix {
    let mut m = AdjacencyMatrix::new(n).expect("within capacity");
    for &(w, l) in edges {
        m.set(w, l);
    }
    m
}
