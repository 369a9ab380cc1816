/// Per-group analysis driver.
///
/// For one group the driver looks for a confirmed circle first. Only when
/// none exists, and the subtree still has fixtures to play, does it enumerate
/// potential circles. Both searches are exponential, so every entry point is
/// bounded by [`AnalysisConfig`]: oversized groups and exhausted budgets come
/// back as [`GroupAnalysis::Skipped`] rather than errors.
///
/// Each call builds its own graphs and search state. [`analyze_league`] can
/// therefore fan groups out across rayon workers without sharing anything
/// mutable.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assembler::{
    AssembleError, CircleOfSuck, PotentialCircleOfSuck, assemble_circle, assemble_potential,
};
use crate::extender::{build_potential_graph, find_potential_cycles};
use crate::graph::{GraphBuildError, MAX_TEAMS, build_result_graph};
use crate::league::{GroupNode, League, NodeIdx};
use crate::precheck::{is_cycle_possible, is_strongly_connected};
use crate::solver::{SearchLimits, SearchOutcome, find_first_cycle};
use crate::store::{AnalysisRecord, ResultStore, StoreError, StoreKey};

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Limits and switches for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Largest group searched for a confirmed circle.
    ///
    /// Default: 64. Values above [`MAX_TEAMS`] are clamped.
    pub max_teams_first_cycle: usize,

    /// Largest group searched exhaustively for potential circles.
    ///
    /// Default: 16.
    pub max_teams_all_cycles: usize,

    /// State expansions allowed per search; `None` is unbounded.
    ///
    /// Default: 50 million.
    pub step_budget: Option<u64>,

    /// Enumerate potential circles when no confirmed one exists.
    ///
    /// Default: `true`.
    pub search_potential: bool,

    /// Report at most this many potential circles per group. The search
    /// itself stays exhaustive.
    ///
    /// Default: unlimited.
    pub max_potential_cycles: Option<usize>,

    /// Analyze groups on the rayon thread pool.
    ///
    /// Default: `false`. Has no effect without the `parallel` feature.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_teams_first_cycle: MAX_TEAMS,
            max_teams_all_cycles: 16,
            step_budget: Some(50_000_000),
            search_potential: true,
            max_potential_cycles: None,
            parallel: false,
        }
    }
}

impl AnalysisConfig {
    fn limits(&self) -> SearchLimits {
        SearchLimits {
            step_budget: self.step_budget,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Errors that abort analysis of a group.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The node handed to the driver is not a group.
    #[error("node {0} is not a group")]
    NotAGroup(usize),
    #[error(transparent)]
    Graph(#[from] GraphBuildError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a group was not searched to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The group has more teams than the applicable ceiling.
    TooLarge { teams: usize, max: usize },
    /// A search ran out of its step budget.
    BudgetExhausted { steps: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { teams, max } => {
                write!(f, "{teams} teams exceed the search limit of {max}")
            }
            Self::BudgetExhausted { steps } => {
                write!(f, "search budget exhausted after {steps} steps")
            }
        }
    }
}

/// Outcome of analyzing one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupAnalysis {
    /// A confirmed circle over finished games.
    Circle(CircleOfSuck),
    /// No confirmed circle, but `total` (at least one) could still form.
    Potential {
        /// The first `max_potential_cycles` of them.
        circles: Vec<PotentialCircleOfSuck>,
        /// Number found before `max_potential_cycles` truncation.
        total: usize,
    },
    NoCircle,
    Skipped(SkipReason),
}

impl GroupAnalysis {
    /// Converts to the storable, serializable form.
    pub fn to_record(&self, league: &League) -> AnalysisRecord {
        match self {
            Self::Circle(c) => AnalysisRecord::Circle {
                circle: c.summary(league),
            },
            Self::Potential { circles, total } => AnalysisRecord::Potential {
                circles: circles.iter().map(|c| c.summary(league)).collect(),
                total: *total,
            },
            Self::NoCircle => AnalysisRecord::NoCircle,
            Self::Skipped(reason) => AnalysisRecord::Skipped { reason: *reason },
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Analyzes the subtree rooted at `group`.
///
/// # Errors
///
/// - [`AnalysisError::NotAGroup`] if `group` is a team or out of range.
/// - [`AnalysisError::Graph`] / [`AnalysisError::Assemble`] if the league is
///   internally inconsistent.
pub fn analyze_group(
    league: &League,
    group: NodeIdx,
    config: &AnalysisConfig,
) -> Result<GroupAnalysis, AnalysisError> {
    let Some(name) = league.group(group).map(GroupNode::name) else {
        return Err(AnalysisError::NotAGroup(group.index()));
    };
    let teams = league.subtree_team_count(group);
    if teams <= 1 {
        return Ok(GroupAnalysis::NoCircle);
    }

    let max_first = config.max_teams_first_cycle.min(MAX_TEAMS);
    if teams > max_first {
        log::warn!("skipping {name:?}: {teams} teams exceed the limit of {max_first}");
        return Ok(GroupAnalysis::Skipped(SkipReason::TooLarge {
            teams,
            max: max_first,
        }));
    }

    let limits = config.limits();
    let graph = build_result_graph(league, group)?;
    let adjacency = graph.adjacency();
    if is_cycle_possible(adjacency) && is_strongly_connected(adjacency) {
        match find_first_cycle(adjacency, limits) {
            SearchOutcome::Complete(Some(cycle)) => {
                log::info!("circle of suck found in {name:?}");
                return Ok(GroupAnalysis::Circle(assemble_circle(
                    league, &graph, &cycle,
                )?));
            }
            SearchOutcome::Complete(None) => {}
            SearchOutcome::Aborted { steps } => {
                return Ok(GroupAnalysis::Skipped(SkipReason::BudgetExhausted {
                    steps,
                }));
            }
        }
    } else {
        log::debug!("{name:?} cannot contain a circle of decided games");
    }

    if !config.search_potential || !league.subtree_has_upcoming(group) {
        return Ok(GroupAnalysis::NoCircle);
    }
    let max_all = config.max_teams_all_cycles.min(MAX_TEAMS);
    if teams > max_all {
        log::warn!(
            "skipping potential search in {name:?}: {teams} teams exceed the limit of {max_all}"
        );
        return Ok(GroupAnalysis::Skipped(SkipReason::TooLarge {
            teams,
            max: max_all,
        }));
    }

    let graph = build_potential_graph(league, group)?;
    let cycles = match find_potential_cycles(&graph, limits) {
        SearchOutcome::Complete(cycles) => cycles,
        SearchOutcome::Aborted { steps } => {
            return Ok(GroupAnalysis::Skipped(SkipReason::BudgetExhausted {
                steps,
            }));
        }
    };
    if cycles.is_empty() {
        return Ok(GroupAnalysis::NoCircle);
    }

    let total = cycles.len();
    let keep = config.max_potential_cycles.unwrap_or(total);
    log::info!("{total} potential circles in {name:?}");
    let finished = league.finished_game_ids();
    let circles = cycles
        .iter()
        .take(keep)
        .map(|c| assemble_potential(league, &graph, c, &finished))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GroupAnalysis::Potential { circles, total })
}

/// Analyzes every group of the league, returning results in pre-order.
///
/// With `config.parallel` set (and the `parallel` feature enabled) groups are
/// analyzed concurrently; the result order is the same either way.
///
/// # Errors
///
/// The first [`AnalysisError`] encountered, in group order.
pub fn analyze_league(
    league: &League,
    config: &AnalysisConfig,
) -> Result<Vec<(NodeIdx, GroupAnalysis)>, AnalysisError> {
    let groups = league.groups();
    let run = |&group: &NodeIdx| analyze_group(league, group, config).map(|a| (group, a));

    if config.parallel {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            return groups.par_iter().map(run).collect();
        }
        #[cfg(not(feature = "parallel"))]
        log::warn!("parallel analysis requested but the `parallel` feature is disabled");
    }
    groups.iter().map(run).collect()
}

/// Like [`analyze_group`], but consults `store` first.
///
/// Only confirmed circles are read from or written to the store: a circle of
/// finished games is permanent, while every other outcome can change as
/// fixtures are played.
///
/// # Errors
///
/// Any [`AnalysisError`] from [`analyze_group`], or
/// [`AnalysisError::Store`] if the store fails.
pub fn analyze_group_cached<S: ResultStore + ?Sized>(
    store: &mut S,
    key: &StoreKey,
    league: &League,
    group: NodeIdx,
    config: &AnalysisConfig,
) -> Result<AnalysisRecord, AnalysisError> {
    if let Some(record) = store.get(key)?.filter(AnalysisRecord::is_circle) {
        log::debug!("cached circle for {}", key.slug());
        return Ok(record);
    }
    let record = analyze_group(league, group, config)?.to_record(league);
    if record.is_circle() {
        store.put(key, &record)?;
    }
    Ok(record)
}
