/// League hierarchy and per-group game ledger.
///
/// The hierarchy is an arena of nodes addressed by [`NodeIdx`]. Each node
/// stores its parent index and an ordered list of child indices, so there are
/// no ownership cycles while ancestor walks stay O(depth). Group nodes
/// (conferences, divisions, the league root) own the games attached to them;
/// team nodes are leaves.
///
/// # Ledger placement
///
/// [`League::attach_game`] places a game at the lowest common ancestor (LCA)
/// of its two teams. A divisional game therefore never appears in the
/// conference's own ledger; searches rooted at the conference see it by
/// collecting games from the whole subtree (see [`crate::graph`]).
///
/// Every game id is attached at most once across the whole league. Ledgers are
/// ordered by insertion so that graph construction, and hence cycle search,
/// is reproducible.
use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::game::{Game, UndecidedGame};
use crate::newtypes::{GameId, TeamId};

/// Errors raised while building the hierarchy or attaching games.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeagueError {
    /// The index does not refer to a node of this league.
    #[error("node index {0} is out of range")]
    InvalidNode(usize),
    /// A group operation was attempted on a team leaf.
    #[error("node {0:?} is a team, not a group")]
    NotAGroup(String),
    /// A group with this name already exists.
    #[error("duplicate group name {0:?}")]
    DuplicateGroup(String),
    /// A team with this id already exists.
    #[error("duplicate team id {0}")]
    DuplicateTeam(TeamId),
    /// A game references a team that is not part of the hierarchy.
    #[error("game {game_id} references unknown team {team_id}")]
    UnknownTeam {
        /// The game being attached.
        game_id: GameId,
        /// The unresolved team.
        team_id: TeamId,
    },
}

/// Arena index of a node in a [`League`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(usize);

impl NodeIdx {
    /// Returns the raw arena position.
    pub fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Node payloads
// ---------------------------------------------------------------------------

/// A conference, division, or the league root.
#[derive(Debug, Clone)]
pub struct GroupNode {
    name: String,
    abbreviation: Option<String>,
    games: Vec<Game>,
    upcoming: Vec<UndecidedGame>,
}

impl GroupNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }

    /// Decided games whose LCA is this group, in attachment order.
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Undecided games whose LCA is this group, in attachment order.
    pub fn upcoming(&self) -> &[UndecidedGame] {
        &self.upcoming
    }
}

/// A team leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNode {
    pub id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl TeamNode {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: None,
            logo: None,
        }
    }

    #[must_use]
    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    #[must_use]
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Abbreviation for compact display, falling back to the full name when
    /// the provider supplied none.
    pub fn display_abbreviation(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Group(GroupNode),
    Team(TeamNode),
}

#[derive(Debug, Clone)]
struct LeagueNode {
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
    kind: NodeKind,
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

/// A league hierarchy decorated with game results.
#[derive(Debug, Clone)]
pub struct League {
    nodes: Vec<LeagueNode>,
    teams_by_id: HashMap<TeamId, NodeIdx>,
    groups_by_name: HashMap<String, NodeIdx>,
    /// Where each decided game id is attached.
    decided_at: HashMap<GameId, NodeIdx>,
    /// Where each undecided game id is attached.
    upcoming_at: HashMap<GameId, NodeIdx>,
}

impl League {
    /// Creates a league consisting only of its root group.
    pub fn new(name: impl Into<String>, abbreviation: Option<String>) -> Self {
        let name = name.into();
        let root = LeagueNode {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Group(GroupNode {
                name: name.clone(),
                abbreviation,
                games: Vec::new(),
                upcoming: Vec::new(),
            }),
        };
        let mut groups_by_name = HashMap::new();
        groups_by_name.insert(name, NodeIdx(0));
        Self {
            nodes: vec![root],
            teams_by_id: HashMap::new(),
            groups_by_name,
            decided_at: HashMap::new(),
            upcoming_at: HashMap::new(),
        }
    }

    /// Index of the root group.
    pub fn root(&self) -> NodeIdx {
        NodeIdx(0)
    }

    /// Total number of nodes (groups and teams).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of team leaves.
    pub fn team_count(&self) -> usize {
        self.teams_by_id.len()
    }

    fn group_mut(&mut self, idx: NodeIdx) -> Result<&mut GroupNode, LeagueError> {
        let node = self
            .nodes
            .get_mut(idx.0)
            .ok_or(LeagueError::InvalidNode(idx.0))?;
        match &mut node.kind {
            NodeKind::Group(g) => Ok(g),
            NodeKind::Team(t) => Err(LeagueError::NotAGroup(t.name.clone())),
        }
    }

    /// Adds a group under `parent`.
    ///
    /// # Errors
    ///
    /// - [`LeagueError::InvalidNode`] / [`LeagueError::NotAGroup`] if `parent`
    ///   is not a group of this league.
    /// - [`LeagueError::DuplicateGroup`] if the name is taken.
    pub fn add_group(
        &mut self,
        parent: NodeIdx,
        name: impl Into<String>,
        abbreviation: Option<String>,
    ) -> Result<NodeIdx, LeagueError> {
        let name = name.into();
        self.group_mut(parent)?;
        if self.groups_by_name.contains_key(&name) {
            return Err(LeagueError::DuplicateGroup(name));
        }
        let idx = self.push_child(
            parent,
            NodeKind::Group(GroupNode {
                name: name.clone(),
                abbreviation,
                games: Vec::new(),
                upcoming: Vec::new(),
            }),
        );
        self.groups_by_name.insert(name, idx);
        Ok(idx)
    }

    /// Adds a team leaf under `parent`.
    ///
    /// # Errors
    ///
    /// - [`LeagueError::InvalidNode`] / [`LeagueError::NotAGroup`] if `parent`
    ///   is not a group of this league.
    /// - [`LeagueError::DuplicateTeam`] if the id is taken.
    pub fn add_team(&mut self, parent: NodeIdx, team: TeamNode) -> Result<NodeIdx, LeagueError> {
        self.group_mut(parent)?;
        if self.teams_by_id.contains_key(&team.id) {
            return Err(LeagueError::DuplicateTeam(team.id));
        }
        let id = team.id.clone();
        let idx = self.push_child(parent, NodeKind::Team(team));
        self.teams_by_id.insert(id, idx);
        Ok(idx)
    }

    fn push_child(&mut self, parent: NodeIdx, kind: NodeKind) -> NodeIdx {
        let idx = NodeIdx(self.nodes.len());
        self.nodes.push(LeagueNode {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(idx);
        }
        idx
    }

    // -----------------------------------------------------------------------
    // Ledger
    // -----------------------------------------------------------------------

    /// Attaches a decided game at the LCA of its two teams.
    ///
    /// Idempotent on game id: attaching an id that is already recorded leaves
    /// the ledger unchanged and returns the existing location. An undecided
    /// fixture with the same id is removed, since the game has now finished.
    ///
    /// # Errors
    ///
    /// [`LeagueError::UnknownTeam`] if either team is not in the league.
    pub fn attach_game(&mut self, game: Game) -> Result<NodeIdx, LeagueError> {
        if let Some(&at) = self.decided_at.get(game.id()) {
            return Ok(at);
        }
        let lca = self.game_lca(game.id(), game.home(), game.away())?;

        if let Some(pending) = self.upcoming_at.remove(game.id()) {
            let id = game.id().clone();
            self.group_mut(pending)?.upcoming.retain(|u| u.id() != &id);
        }

        log::debug!(
            "attaching game {} ({} vs {}) at {:?}",
            game.id(),
            game.home(),
            game.away(),
            self.name(lca)
        );
        self.decided_at.insert(game.id().clone(), lca);
        self.group_mut(lca)?.games.push(game);
        Ok(lca)
    }

    /// Attaches an undecided game at the LCA of its two teams.
    ///
    /// Ignored (returning the existing location) if the id is already recorded
    /// as either decided or undecided.
    ///
    /// # Errors
    ///
    /// [`LeagueError::UnknownTeam`] if either team is not in the league.
    pub fn attach_undecided(&mut self, game: UndecidedGame) -> Result<NodeIdx, LeagueError> {
        if let Some(&at) = self
            .decided_at
            .get(game.id())
            .or_else(|| self.upcoming_at.get(game.id()))
        {
            return Ok(at);
        }
        let lca = self.game_lca(game.id(), game.home(), game.away())?;
        self.upcoming_at.insert(game.id().clone(), lca);
        self.group_mut(lca)?.upcoming.push(game);
        Ok(lca)
    }

    fn game_lca(&self, game_id: &GameId, home: &TeamId, away: &TeamId) -> Result<NodeIdx, LeagueError> {
        let resolve = |team_id: &TeamId| {
            self.teams_by_id
                .get(team_id)
                .copied()
                .ok_or_else(|| LeagueError::UnknownTeam {
                    game_id: game_id.clone(),
                    team_id: team_id.clone(),
                })
        };
        let h = resolve(home)?;
        let a = resolve(away)?;
        // Both leaves hang off the root, so a common ancestor always exists.
        Ok(self.lowest_common_ancestor(h, a).unwrap_or(self.root()))
    }

    /// Returns the deepest node that is an ancestor of both `a` and `b`.
    ///
    /// A node counts as its own ancestor, so the LCA of a group and one of its
    /// descendants is the group itself. Returns `None` only for indices outside
    /// this league.
    pub fn lowest_common_ancestor(&self, a: NodeIdx, b: NodeIdx) -> Option<NodeIdx> {
        self.nodes.get(a.0)?;
        self.nodes.get(b.0)?;
        let chain_a: HashSet<NodeIdx> = self.ancestors_inclusive(a).collect();
        self.ancestors_inclusive(b).find(|n| chain_a.contains(n))
    }

    /// Iterates from `idx` up to the root, starting with `idx` itself.
    pub fn ancestors_inclusive(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        std::iter::successors(Some(idx), move |n| {
            self.nodes.get(n.0).and_then(|node| node.parent)
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.nodes.get(idx.0).and_then(|n| n.parent)
    }

    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.nodes.get(idx.0).map_or(&[], |n| n.children.as_slice())
    }

    pub fn group(&self, idx: NodeIdx) -> Option<&GroupNode> {
        match &self.nodes.get(idx.0)?.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Team(_) => None,
        }
    }

    pub fn team(&self, idx: NodeIdx) -> Option<&TeamNode> {
        match &self.nodes.get(idx.0)?.kind {
            NodeKind::Team(t) => Some(t),
            NodeKind::Group(_) => None,
        }
    }

    /// Display name of any node.
    pub fn name(&self, idx: NodeIdx) -> Option<&str> {
        match &self.nodes.get(idx.0)?.kind {
            NodeKind::Group(g) => Some(g.name.as_str()),
            NodeKind::Team(t) => Some(t.name.as_str()),
        }
    }

    pub fn team_index(&self, id: &TeamId) -> Option<NodeIdx> {
        self.teams_by_id.get(id).copied()
    }

    pub fn team_by_id(&self, id: &TeamId) -> Option<&TeamNode> {
        self.team_index(id).and_then(|idx| self.team(idx))
    }

    pub fn group_by_name(&self, name: &str) -> Option<NodeIdx> {
        self.groups_by_name.get(name).copied()
    }

    /// Name of the group a team belongs to.
    pub fn parent_group_name(&self, id: &TeamId) -> Option<&str> {
        let idx = self.team_index(id)?;
        self.name(self.parent(idx)?)
    }

    /// Where a decided game id is attached, if anywhere.
    pub fn game_location(&self, id: &GameId) -> Option<NodeIdx> {
        self.decided_at.get(id).copied()
    }

    /// Ids of every decided game in the league.
    pub fn finished_game_ids(&self) -> BTreeSet<GameId> {
        self.decided_at.keys().cloned().collect()
    }

    /// Number of decided and undecided games attached anywhere.
    pub fn game_counts(&self) -> (usize, usize) {
        (self.decided_at.len(), self.upcoming_at.len())
    }

    /// Pre-order traversal of the subtree rooted at `root`, children visited
    /// in insertion order.
    pub fn pre_order(&self, root: NodeIdx) -> Vec<NodeIdx> {
        let mut order = Vec::new();
        if self.nodes.get(root.0).is_none() {
            return order;
        }
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.children(idx).iter().rev().copied());
        }
        order
    }

    /// Every group in the league, in pre-order.
    pub fn groups(&self) -> Vec<NodeIdx> {
        self.pre_order(self.root())
            .into_iter()
            .filter(|&idx| self.group(idx).is_some())
            .collect()
    }

    /// Number of team leaves under `root`.
    pub fn subtree_team_count(&self, root: NodeIdx) -> usize {
        self.pre_order(root)
            .into_iter()
            .filter(|&idx| self.team(idx).is_some())
            .count()
    }

    /// Returns `true` if any group under `root` holds an undecided game.
    pub fn subtree_has_upcoming(&self, root: NodeIdx) -> bool {
        self.pre_order(root)
            .into_iter()
            .filter_map(|idx| self.group(idx))
            .any(|g| !g.upcoming.is_empty())
    }

    /// Group names from the root down to `idx`, inclusive.
    pub fn group_path(&self, idx: NodeIdx) -> Vec<&str> {
        let mut path: Vec<&str> = self
            .ancestors_inclusive(idx)
            .filter_map(|n| self.name(n))
            .collect();
        path.reverse();
        path
    }

    /// Renders an indented outline of the hierarchy with each group's games.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root(), 0, &mut out);
        out
    }

    fn render_node(&self, idx: NodeIdx, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let Some(node) = self.nodes.get(idx.0) else {
            return;
        };
        match &node.kind {
            NodeKind::Team(t) => {
                out.push_str(&format!(
                    "{indent}{} ({})\n",
                    t.name,
                    t.display_abbreviation()
                ));
            }
            NodeKind::Group(g) => {
                match &g.abbreviation {
                    Some(abbr) => out.push_str(&format!("{indent}{} ({abbr})\n", g.name)),
                    None => out.push_str(&format!("{indent}{}\n", g.name)),
                }
                for game in &g.games {
                    out.push_str(&format!(
                        "{indent}  * {} {} vs {}: {}-{}\n",
                        game.week(),
                        self.abbreviation_of(game.home()),
                        self.abbreviation_of(game.away()),
                        game.home_score(),
                        game.away_score()
                    ));
                }
                for game in &g.upcoming {
                    out.push_str(&format!(
                        "{indent}  ? {} {} vs {}\n",
                        game.week(),
                        self.abbreviation_of(game.home()),
                        self.abbreviation_of(game.away())
                    ));
                }
                for &child in &node.children {
                    self.render_node(child, depth + 1, out);
                }
            }
        }
    }

    fn abbreviation_of<'a>(&'a self, id: &'a TeamId) -> &'a str {
        self.team_by_id(id)
            .map_or(&**id, TeamNode::display_abbreviation)
    }
}
