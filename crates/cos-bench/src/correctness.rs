//! Invariant checkers for solver and assembler output.

use std::collections::BTreeSet;

use cos_core::{CircleSummary, Cycle, EdgeEvidence, ResultGraph};

/// Verifies that `cycle` is a Hamiltonian circuit of `graph` whose every link
/// is backed by a decided game.
pub fn check_confirmed_cycle(graph: &ResultGraph, cycle: &Cycle) -> Result<(), String> {
    if !cycle.is_hamiltonian_in(graph.adjacency()) {
        return Err(format!("{:?} is not a Hamiltonian cycle", cycle.indices()));
    }
    for (winner, loser) in cycle.links() {
        match graph.evidence(winner, loser) {
            Some(EdgeEvidence::Decided(_)) => {}
            Some(EdgeEvidence::Contingent { game, .. }) => {
                return Err(format!(
                    "link {winner}->{loser} rests on unplayed game {}",
                    game.id()
                ));
            }
            None => return Err(format!("link {winner}->{loser} has no evidence")),
        }
    }
    Ok(())
}

/// Verifies an assembled circle: distinct teams, game `i` won by team `i`
/// over team `i + 1`, the last game closing back to the first team, and
/// decided flags matching played games.
pub fn check_circle_summary(circle: &CircleSummary) -> Result<(), String> {
    let n = circle.teams.len();
    if n < 2 {
        return Err(format!("circle in {} has {n} teams", circle.group_name));
    }
    if circle.games.len() != n {
        return Err(format!(
            "circle in {} has {n} teams but {} games",
            circle.group_name,
            circle.games.len()
        ));
    }
    let distinct: BTreeSet<_> = circle.teams.iter().map(|t| &t.id).collect();
    if distinct.len() != n {
        return Err(format!("circle in {} repeats a team", circle.group_name));
    }
    for (i, game) in circle.games.iter().enumerate() {
        let expected_winner = &circle.teams[i].id;
        let expected_loser = &circle.teams[(i + 1) % n].id;
        if game.winner() != Some(expected_winner) || game.loser() != Some(expected_loser) {
            return Err(format!(
                "game {} should be {expected_winner} over {expected_loser}",
                game.id
            ));
        }
        if game.decided.is_some_and(|d| d != game.is_played()) {
            return Err(format!("game {} has a wrong decided flag", game.id));
        }
    }
    if circle.is_potential() {
        let flagged: BTreeSet<_> = circle
            .games
            .iter()
            .filter(|g| g.is_played())
            .map(|g| &g.id)
            .collect();
        let listed: BTreeSet<_> = circle.decided_game_ids.iter().flatten().collect();
        if flagged != listed {
            return Err(format!(
                "circle in {} lists decided games {listed:?} but played games are {flagged:?}",
                circle.group_name
            ));
        }
    }
    Ok(())
}
