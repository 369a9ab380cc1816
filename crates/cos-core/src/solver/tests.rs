#![allow(clippy::expect_used)]

use super::*;
use crate::test_helpers::matrix;

fn first(m: &AdjacencyMatrix) -> Option<Cycle> {
    find_first_cycle(m, SearchLimits::unbounded())
        .complete()
        .expect("unbounded search completes")
}

fn all(m: &AdjacencyMatrix) -> Vec<Cycle> {
    find_all_cycles(m, SearchLimits::unbounded())
        .complete()
        .expect("unbounded search completes")
}

/// Every permutation of `1..n` that closes into a cycle through 0.
fn brute_force(m: &AdjacencyMatrix) -> Vec<Vec<usize>> {
    fn permute(rest: &mut Vec<usize>, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if rest.is_empty() {
            out.push(prefix.clone());
            return;
        }
        for i in 0..rest.len() {
            let x = rest.remove(i);
            prefix.push(x);
            permute(rest, prefix, out);
            prefix.pop();
            rest.insert(i, x);
        }
    }
    let n = m.size();
    let mut perms = Vec::new();
    permute(&mut (1..n).collect(), &mut vec![0], &mut perms);
    perms
        .into_iter()
        .map(|mut p| {
            p.push(0);
            p
        })
        .filter(|p| p.windows(2).all(|w| m.get(w[0], w[1])))
        .collect()
}

#[test]
fn three_team_circle() {
    let m = matrix(3, &[(0, 1), (1, 2), (2, 0)]);
    let c = first(&m).expect("cycle");
    assert_eq!(c.indices(), &[0, 1, 2, 0]);
    assert_eq!(c.len(), 3);
}

#[test]
fn four_team_circle_in_order() {
    let m = matrix(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let c = first(&m).expect("cycle");
    assert_eq!(c.indices(), &[0, 1, 2, 3, 0]);
    assert_eq!(c.links().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
}

#[test]
fn lowest_successor_is_tried_first() {
    // Both 0->1->2->3->0 and 0->2->1->3->0 exist; ascending order picks the first.
    let m = matrix(4, &[(0, 1), (0, 2), (1, 2), (2, 1), (2, 3), (1, 3), (3, 0)]);
    assert_eq!(first(&m).expect("cycle").indices(), &[0, 1, 2, 3, 0]);
}

#[test]
fn disjoint_sub_cycles_are_not_hamiltonian() {
    let m = matrix(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
    assert!(first(&m).is_none());
    assert!(all(&m).is_empty());
}

#[test]
fn transitive_order_has_no_cycle() {
    let m = matrix(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    assert!(first(&m).is_none());
}

#[test]
fn empty_and_singleton_graphs_have_no_cycle() {
    assert!(first(&matrix(0, &[])).is_none());
    assert!(first(&matrix(1, &[])).is_none());
    assert!(all(&matrix(1, &[])).is_empty());
}

#[test]
fn split_series_is_a_two_team_circle() {
    let m = matrix(2, &[(0, 1), (1, 0)]);
    assert_eq!(first(&m).expect("cycle").indices(), &[0, 1, 0]);
}

#[test]
fn repeated_search_is_deterministic() {
    let m = matrix(
        5,
        &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 3), (3, 1), (1, 4), (4, 2), (2, 0)],
    );
    let a = first(&m).expect("cycle");
    let b = first(&m).expect("cycle");
    assert_eq!(a, b);
    assert_eq!(all(&m), all(&m));
}

#[test]
fn complete_digraph_has_factorial_cycles() {
    let n = 5;
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|w| (0..n).filter(move |&l| l != w).map(move |l| (w, l)))
        .collect();
    let m = matrix(n, &edges);
    let cycles = all(&m);
    assert_eq!(cycles.len(), 24);
    let unique: HashSet<&Cycle> = cycles.iter().collect();
    assert_eq!(unique.len(), 24);
    assert!(cycles.iter().all(|c| c.is_hamiltonian_in(&m)));
}

#[test]
fn all_cycles_matches_brute_force_on_fixed_tournament() {
    // Tournament on 6 teams: i beats j when (j - i) mod 6 is 1 or 2, plus 0 beats 3, 1 beats 4, 2 beats 5.
    let mut edges = Vec::new();
    for i in 0..6usize {
        edges.push((i, (i + 1) % 6));
        edges.push((i, (i + 2) % 6));
    }
    edges.extend([(0, 3), (1, 4), (2, 5)]);
    let m = matrix(6, &edges);
    let got: Vec<Vec<usize>> = all(&m).iter().map(|c| c.indices().to_vec()).collect();
    let mut want = brute_force(&m);
    want.sort();
    assert!(!want.is_empty());
    assert_eq!(got, want);
}

#[test]
fn dead_state_memo_does_not_hide_cycles() {
    // Two different prefixes reach state (3, {0,1,2,3}); both must complete.
    let m = matrix(5, &[(0, 1), (0, 2), (1, 2), (2, 1), (1, 3), (2, 3), (3, 4), (4, 0)]);
    let got: Vec<Vec<usize>> = all(&m).iter().map(|c| c.indices().to_vec()).collect();
    assert_eq!(got, vec![vec![0, 1, 2, 3, 4, 0], vec![0, 2, 1, 3, 4, 0]]);
}

#[test]
fn exhausted_budget_reports_aborted() {
    let n = 8;
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|w| (0..n).filter(move |&l| l != w).map(move |l| (w, l)))
        .collect();
    let m = matrix(n, &edges);
    let outcome = find_all_cycles(&m, SearchLimits::with_step_budget(10));
    assert_eq!(outcome, SearchOutcome::Aborted { steps: 10 });

    // A tiny budget that cannot reach a dead end still aborts rather than
    // reporting "no cycle".
    let none = matrix(4, &[(0, 1), (1, 2), (2, 3)]);
    assert!(find_first_cycle(&none, SearchLimits::with_step_budget(1)).is_aborted());
}

#[test]
fn generous_budget_completes() {
    let m = matrix(3, &[(0, 1), (1, 2), (2, 0)]);
    let outcome = find_first_cycle(&m, SearchLimits::with_step_budget(100));
    assert!(matches!(outcome, SearchOutcome::Complete(Some(_))));
}

#[test]
fn hamiltonian_check_rejects_malformed_cycles() {
    let m = matrix(3, &[(0, 1), (1, 2), (2, 0)]);
    assert!(Cycle(vec![0, 1, 2, 0]).is_hamiltonian_in(&m));
    assert!(!Cycle(vec![0, 2, 1, 0]).is_hamiltonian_in(&m));
    assert!(!Cycle(vec![0, 1, 1, 0]).is_hamiltonian_in(&m));
    assert!(!Cycle(vec![0, 1, 2]).is_hamiltonian_in(&m));
}
