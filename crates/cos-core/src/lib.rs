#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod analysis;
pub mod assembler;
pub mod extender;
pub mod game;
pub mod graph;
pub mod league;
pub mod newtypes;
pub mod precheck;
pub mod serde_helpers;
pub mod snapshot;
pub mod solver;
pub mod store;

pub use analysis::{
    AnalysisConfig, AnalysisError, GroupAnalysis, SkipReason, analyze_group, analyze_group_cached,
    analyze_league,
};
pub use assembler::{
    AssembleError, CircleOfSuck, CircleSummary, GameSummary, PotentialCircleOfSuck, PotentialLink,
    TeamSummary, assemble_circle, assemble_potential,
};
pub use extender::{build_potential_graph, find_potential_cycles, is_consistent};
pub use game::{Game, GameError, Side, UndecidedGame};
pub use graph::{
    AdjacencyMatrix, EdgeEvidence, GraphBuildError, MAX_TEAMS, ResultGraph, build_result_graph,
};
pub use league::{GroupNode, League, LeagueError, NodeIdx, TeamNode};
pub use newtypes::{GameId, NewtypeError, TeamId};
pub use precheck::{is_cycle_possible, is_strongly_connected};
pub use snapshot::{GroupRecord, LeagueInfo, SeasonSnapshot, SnapshotError, TeamRecord};
pub use solver::{Cycle, SearchLimits, SearchOutcome, find_all_cycles, find_first_cycle};
pub use store::{AnalysisRecord, MemoryStore, ResultStore, StoreError, StoreKey};

/// Returns the current version of the cos-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod test_helpers;
