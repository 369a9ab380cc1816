/// Necessary-condition filters run before the exponential cycle search.
///
/// Neither check proves that a Hamiltonian cycle exists; each only rules one
/// out cheaply. They apply to decided-results graphs in first-cycle mode. The
/// potential-cycle search skips them because speculative edges change the
/// degree structure.
use petgraph::algo::kosaraju_scc;

use crate::graph::AdjacencyMatrix;

/// Returns `true` unless some team is undefeated or winless.
///
/// Every row (a team's wins) and every column (a team's losses) must contain
/// at least one `true` and at least one `false` entry. O(n²) over the matrix,
/// O(n) here since rows are bitmasks. An empty matrix has no cycle.
pub fn is_cycle_possible(adjacency: &AdjacencyMatrix) -> bool {
    let n = adjacency.size();
    if n == 0 {
        return false;
    }
    let full = adjacency.full_mask();
    let mixed = |mask: u64| mask != 0 && mask != full;

    for team in 0..n {
        if !mixed(adjacency.row(team)) {
            log::debug!("pre-check: team index {team} has no wins or no non-wins");
            return false;
        }
        if !mixed(adjacency.column(team)) {
            log::debug!("pre-check: team index {team} has no losses or no non-losses");
            return false;
        }
    }
    true
}

/// Returns `true` if every team can reach every other team along wins.
///
/// A Hamiltonian cycle is itself a closed walk through all teams, so a graph
/// split into several strongly connected components cannot contain one.
pub fn is_strongly_connected(adjacency: &AdjacencyMatrix) -> bool {
    if adjacency.size() == 0 {
        return false;
    }
    kosaraju_scc(&adjacency.to_digraph()).len() == 1
}
