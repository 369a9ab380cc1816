/// Per-subtree results graph construction.
///
/// A [`ResultGraph`] is built fresh for one group subtree and one search. It
/// holds three things:
///
/// - the team index: every team leaf under the root, numbered `0..n` in
///   pre-order, so index 0 is deterministic for a given hierarchy;
/// - an [`AdjacencyMatrix`] with `adjacency[winner][loser] = true` for every
///   decided game in the subtree;
/// - the evidence map from `(winner, loser)` to the game backing that edge,
///   used to report a cycle.
///
/// # Repeated matchups
///
/// The matrix is boolean, so two teams that met more than once in the same
/// direction share one edge. The evidence retained for reporting is the game
/// processed last: ledgers are read in pre-order and each ledger in
/// attachment order, so that is the last-attached game of the deepest,
/// right-most group holding such a result.
use std::collections::HashMap;

use petgraph::graph::DiGraph;

use crate::game::{Game, Side, UndecidedGame};
use crate::league::{League, NodeIdx};
use crate::newtypes::{GameId, TeamId};

/// Width of the visited-set bitmask; the largest subtree a search can cover.
pub const MAX_TEAMS: usize = u64::BITS as usize;

/// Errors that can occur while building a [`ResultGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphBuildError {
    /// The requested root is not a group of the league.
    #[error("node {0} is not a group")]
    NotAGroup(usize),
    /// The subtree holds more teams than the search bitmask can represent.
    #[error("{teams} teams exceed the search capacity of {max}")]
    CapacityExceeded {
        /// Teams found in the subtree.
        teams: usize,
        /// [`MAX_TEAMS`].
        max: usize,
    },
    /// A game attached inside the subtree names a team outside it.
    ///
    /// Ledger placement makes this impossible for a consistent league; it is
    /// reported rather than skipped because it means the league is corrupt.
    #[error("game {game_id} references team {team_id} outside the subtree")]
    TeamOutsideSubtree {
        /// The offending game.
        game_id: GameId,
        /// The team that could not be indexed.
        team_id: TeamId,
    },
}

// ---------------------------------------------------------------------------
// AdjacencyMatrix
// ---------------------------------------------------------------------------

/// Boolean `n × n` win matrix stored as one `u64` bitmask per row.
///
/// Bit `l` of row `w` is set when team `w` beat team `l`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    rows: Vec<u64>,
}

impl AdjacencyMatrix {
    /// Creates an empty matrix for `n` teams.
    ///
    /// # Errors
    ///
    /// [`GraphBuildError::CapacityExceeded`] if `n > MAX_TEAMS`.
    pub fn new(n: usize) -> Result<Self, GraphBuildError> {
        if n > MAX_TEAMS {
            return Err(GraphBuildError::CapacityExceeded {
                teams: n,
                max: MAX_TEAMS,
            });
        }
        Ok(Self { rows: vec![0; n] })
    }

    /// Number of teams.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Mask with one bit set per team.
    pub fn full_mask(&self) -> u64 {
        match self.rows.len() {
            MAX_TEAMS => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }

    /// Returns `true` if `winner` beat `loser`. Out-of-range indices are `false`.
    pub fn get(&self, winner: usize, loser: usize) -> bool {
        loser < self.rows.len()
            && self
                .rows
                .get(winner)
                .is_some_and(|row| row & (1u64 << loser) != 0)
    }

    /// Records that `winner` beat `loser`. Out-of-range indices are ignored.
    pub fn set(&mut self, winner: usize, loser: usize) {
        let n = self.rows.len();
        if loser < n {
            if let Some(row) = self.rows.get_mut(winner) {
                *row |= 1u64 << loser;
            }
        }
    }

    /// Bitmask of the teams `winner` beat.
    pub fn row(&self, winner: usize) -> u64 {
        self.rows.get(winner).copied().unwrap_or(0)
    }

    /// Bitmask of the teams that beat `loser`.
    pub fn column(&self, loser: usize) -> u64 {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| loser < MAX_TEAMS && *row & (1u64 << loser) != 0)
            .fold(0, |acc, (w, _)| acc | (1u64 << w))
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.rows.iter().map(|r| r.count_ones() as usize).sum()
    }

    /// Copies the matrix into a `petgraph` digraph with node `i` = team `i`.
    pub fn to_digraph(&self) -> DiGraph<usize, ()> {
        let mut g = DiGraph::with_capacity(self.size(), self.edge_count());
        let nodes: Vec<_> = (0..self.size()).map(|i| g.add_node(i)).collect();
        for (w, &row) in self.rows.iter().enumerate() {
            for l in bits(row) {
                if let (Some(&a), Some(&b)) = (nodes.get(w), nodes.get(l)) {
                    g.add_edge(a, b, ());
                }
            }
        }
        g
    }
}

/// Iterates the set bits of `mask` in ascending order.
pub fn bits(mut mask: u64) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let i = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(i)
    })
}

// ---------------------------------------------------------------------------
// ResultGraph
// ---------------------------------------------------------------------------

/// The game that justifies a directed edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeEvidence {
    /// A finished game the edge's winner won.
    Decided(Game),
    /// A hypothesis: the edge holds only if `winner` wins this fixture.
    Contingent {
        /// The undecided fixture.
        game: UndecidedGame,
        /// The side that must win for the edge to hold.
        winner: Side,
    },
}

impl EdgeEvidence {
    /// Returns `true` for a finished game.
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Decided(_))
    }

    /// Id of the backing game.
    pub fn game_id(&self) -> &GameId {
        match self {
            Self::Decided(g) => g.id(),
            Self::Contingent { game, .. } => game.id(),
        }
    }
}

/// Directed results graph over one group subtree.
#[derive(Debug, Clone)]
pub struct ResultGraph {
    root: NodeIdx,
    teams: Vec<TeamId>,
    index: HashMap<TeamId, usize>,
    adjacency: AdjacencyMatrix,
    evidence: HashMap<(usize, usize), EdgeEvidence>,
}

impl ResultGraph {
    /// The group the graph was built for.
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Team ids in index order.
    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }

    pub fn team_at(&self, index: usize) -> Option<&TeamId> {
        self.teams.get(index)
    }

    pub fn index_of(&self, team: &TeamId) -> Option<usize> {
        self.index.get(team).copied()
    }

    pub fn adjacency(&self) -> &AdjacencyMatrix {
        &self.adjacency
    }

    /// The game backing the edge `winner -> loser`, if the edge exists.
    pub fn evidence(&self, winner: usize, loser: usize) -> Option<&EdgeEvidence> {
        self.evidence.get(&(winner, loser))
    }

    fn resolve(&self, game_id: &GameId, team: &TeamId) -> Result<usize, GraphBuildError> {
        self.index_of(team)
            .ok_or_else(|| GraphBuildError::TeamOutsideSubtree {
                game_id: game_id.clone(),
                team_id: team.clone(),
            })
    }

    /// Adds the edge for a decided game, overwriting earlier evidence for the
    /// same ordered pair.
    pub(crate) fn add_decided(&mut self, game: &Game) -> Result<(), GraphBuildError> {
        let w = self.resolve(game.id(), game.winner())?;
        let l = self.resolve(game.id(), game.loser())?;
        self.adjacency.set(w, l);
        self.evidence.insert((w, l), EdgeEvidence::Decided(game.clone()));
        Ok(())
    }

    /// Adds the edge for one outcome of an undecided fixture.
    ///
    /// A decided result for the same ordered pair already makes the edge hold
    /// unconditionally, so it is never replaced by a hypothesis. Returns
    /// whether the hypothesis was recorded.
    pub(crate) fn add_hypothesis(
        &mut self,
        game: &UndecidedGame,
        winner: Side,
    ) -> Result<bool, GraphBuildError> {
        let w = self.resolve(game.id(), game.team(winner))?;
        let l = self.resolve(game.id(), game.team(winner.other()))?;
        if self
            .evidence
            .get(&(w, l))
            .is_some_and(EdgeEvidence::is_decided)
        {
            return Ok(false);
        }
        self.adjacency.set(w, l);
        self.evidence.insert(
            (w, l),
            EdgeEvidence::Contingent {
                game: game.clone(),
                winner,
            },
        );
        Ok(true)
    }
}

/// Builds the decided-results graph for the subtree rooted at `root`.
///
/// Teams are indexed in pre-order; every group's decided games are then
/// applied in the same order.
///
/// # Errors
///
/// - [`GraphBuildError::NotAGroup`] if `root` is not a group.
/// - [`GraphBuildError::CapacityExceeded`] if the subtree has more than
///   [`MAX_TEAMS`] teams.
/// - [`GraphBuildError::TeamOutsideSubtree`] if a ledger game names a team
///   that is not under `root`.
pub fn build_result_graph(league: &League, root: NodeIdx) -> Result<ResultGraph, GraphBuildError> {
    if league.group(root).is_none() {
        return Err(GraphBuildError::NotAGroup(root.index()));
    }

    let mut teams = Vec::new();
    let mut games: Vec<&Game> = Vec::new();
    for idx in league.pre_order(root) {
        if let Some(team) = league.team(idx) {
            teams.push(team.id.clone());
        } else if let Some(group) = league.group(idx) {
            games.extend(group.games());
        }
    }

    let adjacency = AdjacencyMatrix::new(teams.len())?;
    let index = teams
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();
    let mut graph = ResultGraph {
        root,
        teams,
        index,
        adjacency,
        evidence: HashMap::new(),
    };
    for game in games {
        graph.add_decided(game)?;
    }

    log::debug!(
        "built results graph for {:?}: {} teams, {} edges",
        league.name(root),
        graph.team_count(),
        graph.adjacency.edge_count()
    );
    Ok(graph)
}
