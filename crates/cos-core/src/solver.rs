/// Directed Hamiltonian-cycle search over an [`AdjacencyMatrix`].
///
/// The search state is `(current team, visited bitmask)`, as in Held-Karp.
/// Every search starts at team 0 with `{0}` visited and tries successors in
/// ascending index order, so results are reproducible for a given matrix.
///
/// # Modes
///
/// - [`find_first_cycle`] stops at the first cycle found.
/// - [`find_all_cycles`] returns every simple Hamiltonian cycle through team 0
///   exactly once.
///
/// # Memoization
///
/// Both modes remember *dead* states: `(node, visited)` pairs from which no
/// completion back to team 0 exists. The set of completions from a state does
/// not depend on the path that reached it, so a dead state stays dead for
/// every other inbound path and is never expanded twice. A state that did
/// complete is not cached in all-cycles mode, since each new inbound path
/// turns its completions into new cycles.
///
/// # Budgets
///
/// The problem is exponential. [`SearchLimits::step_budget`] caps the number
/// of state expansions; a search that hits it returns
/// [`SearchOutcome::Aborted`], which is distinct from "no cycle exists".
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::{AdjacencyMatrix, bits};

#[cfg(test)]
mod tests;

/// A closed walk of team indices: `n + 1` entries, first == last == 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cycle(Vec<usize>);

impl Cycle {
    /// The full index sequence, including the repeated start.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of teams (and edges) in the cycle.
    pub fn len(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consecutive `(winner, loser)` pairs.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// Returns `true` if this is a Hamiltonian cycle of `adjacency`: it is
    /// closed, visits every team exactly once, and follows only true edges.
    pub fn is_hamiltonian_in(&self, adjacency: &AdjacencyMatrix) -> bool {
        let n = adjacency.size();
        if self.0.len() != n + 1 || self.0.first() != self.0.last() {
            return false;
        }
        let mut seen = 0u64;
        for &i in &self.0[..n] {
            if i >= n || seen & (1u64 << i) != 0 {
                return false;
            }
            seen |= 1u64 << i;
        }
        self.links().all(|(w, l)| adjacency.get(w, l))
    }
}

/// Resource limits for one search invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of state expansions; `None` is unbounded.
    pub step_budget: Option<u64>,
}

impl SearchLimits {
    /// No limit on state expansions.
    pub fn unbounded() -> Self {
        Self { step_budget: None }
    }

    pub fn with_step_budget(steps: u64) -> Self {
        Self {
            step_budget: Some(steps),
        }
    }
}

/// Result of a search that may have been cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    /// The search ran to completion.
    Complete(T),
    /// The step budget ran out before the search finished.
    Aborted {
        /// State expansions performed before giving up.
        steps: u64,
    },
}

impl<T> SearchOutcome<T> {
    /// Returns the result if the search completed.
    pub fn complete(self) -> Option<T> {
        match self {
            Self::Complete(t) => Some(t),
            Self::Aborted { .. } => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

// ---------------------------------------------------------------------------
// Search context
// ---------------------------------------------------------------------------

/// Memo and path state owned by exactly one search invocation.
struct SearchContext<'a> {
    adjacency: &'a AdjacencyMatrix,
    full: u64,
    dead: HashSet<(usize, u64)>,
    path: Vec<usize>,
    steps: u64,
    budget: Option<u64>,
    aborted: bool,
}

impl<'a> SearchContext<'a> {
    fn new(adjacency: &'a AdjacencyMatrix, limits: SearchLimits) -> Self {
        let mut path = Vec::with_capacity(adjacency.size() + 1);
        path.push(0);
        Self {
            adjacency,
            full: adjacency.full_mask(),
            dead: HashSet::new(),
            path,
            steps: 0,
            budget: limits.step_budget,
            aborted: false,
        }
    }

    /// Counts one expansion; returns `false` once the budget is exhausted.
    fn tick(&mut self) -> bool {
        if self.budget.is_some_and(|b| self.steps >= b) {
            self.aborted = true;
            return false;
        }
        self.steps += 1;
        true
    }

    fn closed_path(&self) -> Cycle {
        let mut indices = self.path.clone();
        indices.push(0);
        Cycle(indices)
    }
}

/// Depth-first search for one cycle. On success `ctx.path` holds the walk
/// (without the closing 0).
fn visit_first(ctx: &mut SearchContext<'_>, node: usize, visited: u64) -> bool {
    if visited == ctx.full {
        return ctx.adjacency.get(node, 0);
    }
    if ctx.dead.contains(&(node, visited)) || !ctx.tick() {
        return false;
    }
    for next in bits(ctx.adjacency.row(node) & !visited) {
        ctx.path.push(next);
        if visit_first(ctx, next, visited | (1u64 << next)) {
            return true;
        }
        ctx.path.pop();
        if ctx.aborted {
            return false;
        }
    }
    ctx.dead.insert((node, visited));
    false
}

/// Depth-first enumeration of every cycle. Returns whether any completion
/// was found below this state.
fn visit_all(ctx: &mut SearchContext<'_>, node: usize, visited: u64, out: &mut Vec<Cycle>) -> bool {
    if visited == ctx.full {
        if ctx.adjacency.get(node, 0) {
            out.push(ctx.closed_path());
            return true;
        }
        return false;
    }
    if ctx.dead.contains(&(node, visited)) || !ctx.tick() {
        return false;
    }
    let mut completed = false;
    for next in bits(ctx.adjacency.row(node) & !visited) {
        ctx.path.push(next);
        completed |= visit_all(ctx, next, visited | (1u64 << next), out);
        ctx.path.pop();
        if ctx.aborted {
            return completed;
        }
    }
    if !completed {
        ctx.dead.insert((node, visited));
    }
    completed
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Finds the first Hamiltonian cycle through team 0.
///
/// Returns `Complete(None)` when no cycle exists, including for graphs of
/// zero or one team. Does not run the pre-checks in [`crate::precheck`];
/// callers decide whether to filter first.
pub fn find_first_cycle(
    adjacency: &AdjacencyMatrix,
    limits: SearchLimits,
) -> SearchOutcome<Option<Cycle>> {
    if adjacency.size() <= 1 {
        return SearchOutcome::Complete(None);
    }
    let mut ctx = SearchContext::new(adjacency, limits);
    let found = visit_first(&mut ctx, 0, 1);

    if ctx.aborted {
        log::warn!("first-cycle search aborted after {} steps", ctx.steps);
        return SearchOutcome::Aborted { steps: ctx.steps };
    }
    log::debug!(
        "first-cycle search over {} teams: {} after {} steps",
        adjacency.size(),
        if found { "found" } else { "none" },
        ctx.steps
    );
    SearchOutcome::Complete(found.then(|| ctx.closed_path()))
}

/// Enumerates every Hamiltonian cycle through team 0.
///
/// Cycles are returned in discovery order, which is lexicographic in the
/// index sequence.
pub fn find_all_cycles(adjacency: &AdjacencyMatrix, limits: SearchLimits) -> SearchOutcome<Vec<Cycle>> {
    let mut cycles = Vec::new();
    if adjacency.size() <= 1 {
        return SearchOutcome::Complete(cycles);
    }
    let mut ctx = SearchContext::new(adjacency, limits);
    visit_all(&mut ctx, 0, 1, &mut cycles);

    if ctx.aborted {
        log::warn!(
            "all-cycles search aborted after {} steps ({} cycles so far)",
            ctx.steps,
            cycles.len()
        );
        return SearchOutcome::Aborted { steps: ctx.steps };
    }
    log::debug!(
        "all-cycles search over {} teams: {} cycles after {} steps",
        adjacency.size(),
        cycles.len(),
        ctx.steps
    );
    SearchOutcome::Complete(cycles)
}
