/// Potential-cycle search over undecided fixtures.
///
/// Every undecided game in the subtree contributes two speculative edges at
/// once, one per possible winner. Both hypotheses coexist in a single working
/// graph so that one all-cycles search discovers cycles relying on either
/// outcome. Evidence for each edge remembers which hypothesis it stands for,
/// and a decided result for the same ordered pair always takes precedence.
///
/// The degree pre-checks are deliberately not applied here; see
/// [`crate::precheck`].
use std::collections::HashSet;

use crate::game::Side;
use crate::graph::{EdgeEvidence, GraphBuildError, ResultGraph, build_result_graph};
use crate::league::{League, NodeIdx};
use crate::solver::{Cycle, SearchLimits, SearchOutcome, find_all_cycles};

/// Builds the decided graph for `root` and adds both outcomes of every
/// undecided game attached anywhere in the subtree.
///
/// # Errors
///
/// Same as [`build_result_graph`].
pub fn build_potential_graph(league: &League, root: NodeIdx) -> Result<ResultGraph, GraphBuildError> {
    let mut graph = build_result_graph(league, root)?;
    let mut hypotheses = 0usize;
    for idx in league.pre_order(root) {
        let Some(group) = league.group(idx) else {
            continue;
        };
        for game in group.upcoming() {
            for side in [Side::Home, Side::Away] {
                if graph.add_hypothesis(game, side)? {
                    hypotheses += 1;
                }
            }
        }
    }
    log::debug!(
        "potential graph for {:?}: {} speculative edges, {} edges total",
        league.name(root),
        hypotheses,
        graph.adjacency().edge_count()
    );
    Ok(graph)
}

/// Returns `true` if the cycle never needs both outcomes of one fixture.
///
/// Only a two-team cycle over a single undecided game can violate this: it
/// would need each team to win the same game.
pub fn is_consistent(graph: &ResultGraph, cycle: &Cycle) -> bool {
    let mut required = HashSet::new();
    cycle.links().all(|(w, l)| match graph.evidence(w, l) {
        Some(EdgeEvidence::Contingent { game, .. }) => required.insert(game.id()),
        Some(EdgeEvidence::Decided(_)) => true,
        None => false,
    })
}

/// Runs the all-cycles search on a potential graph and drops cycles that
/// depend on contradictory outcomes.
pub fn find_potential_cycles(graph: &ResultGraph, limits: SearchLimits) -> SearchOutcome<Vec<Cycle>> {
    match find_all_cycles(graph.adjacency(), limits) {
        SearchOutcome::Complete(cycles) => SearchOutcome::Complete(
            cycles
                .into_iter()
                .filter(|c| is_consistent(graph, c))
                .collect(),
        ),
        SearchOutcome::Aborted { steps } => SearchOutcome::Aborted { steps },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_helpers::{fixture, flat_league, record};

    fn unbounded(graph: &ResultGraph) -> Vec<Cycle> {
        find_potential_cycles(graph, SearchLimits::unbounded())
            .complete()
            .expect("completes")
    }

    #[test]
    fn both_outcomes_become_edges() {
        let mut league = flat_league("L", &["a", "b"]);
        league.attach_undecided(fixture("u1", "a", "b")).expect("fixture");
        let g = build_potential_graph(&league, league.root()).expect("build");
        assert!(g.adjacency().get(0, 1));
        assert!(g.adjacency().get(1, 0));
        assert!(matches!(
            g.evidence(0, 1),
            Some(EdgeEvidence::Contingent {
                winner: Side::Home,
                ..
            })
        ));
        assert!(matches!(
            g.evidence(1, 0),
            Some(EdgeEvidence::Contingent {
                winner: Side::Away,
                ..
            })
        ));
    }

    #[test]
    fn decided_edge_is_not_replaced_by_hypothesis() {
        let mut league = flat_league("L", &["a", "b"]);
        record(&mut league, &[("g1", "a", "b")]);
        league.attach_undecided(fixture("u1", "b", "a")).expect("fixture");
        let g = build_potential_graph(&league, league.root()).expect("build");
        assert!(g.evidence(0, 1).is_some_and(EdgeEvidence::is_decided));
        assert!(g.evidence(1, 0).is_some_and(|e| !e.is_decided()));
    }

    #[test]
    fn decided_graph_is_unchanged_without_fixtures() {
        let mut league = flat_league("L", &["a", "b", "c"]);
        record(&mut league, &[("g1", "a", "b")]);
        let g = build_potential_graph(&league, league.root()).expect("build");
        assert_eq!(g.adjacency().edge_count(), 1);
        assert!(unbounded(&g).is_empty());
    }

    #[test]
    fn one_decided_two_pending_closes_a_triangle() {
        let mut league = flat_league("L", &["a", "b", "c"]);
        record(&mut league, &[("g1", "a", "b")]);
        league.attach_undecided(fixture("u1", "b", "c")).expect("fixture");
        league.attach_undecided(fixture("u2", "c", "a")).expect("fixture");
        let g = build_potential_graph(&league, league.root()).expect("build");
        let cycles = unbounded(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].indices(), &[0, 1, 2, 0]);
    }

    #[test]
    fn single_fixture_cannot_be_won_by_both_teams() {
        let mut league = flat_league("L", &["a", "b"]);
        league.attach_undecided(fixture("u1", "a", "b")).expect("fixture");
        let g = build_potential_graph(&league, league.root()).expect("build");
        assert!(
            find_all_cycles(g.adjacency(), SearchLimits::unbounded())
                .complete()
                .is_some_and(|c| c.len() == 1)
        );
        assert!(unbounded(&g).is_empty());
    }

    #[test]
    fn two_fixtures_between_same_pair_can_split() {
        let mut league = flat_league("L", &["a", "b"]);
        league.attach_undecided(fixture("u1", "a", "b")).expect("fixture");
        record(&mut league, &[("g0", "b", "a")]);
        let g = build_potential_graph(&league, league.root()).expect("build");
        let cycles = unbounded(&g);
        assert_eq!(cycles.len(), 1);
    }
}
