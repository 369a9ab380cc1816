//! Implementation of `cos analyze <file>`.
//!
//! Builds the league from a season snapshot and analyzes every group (or the
//! one named by `--group`) in pre-order. With `--cache-dir`, confirmed circles
//! are read from and written to a [`JsonDirStore`].
//!
//! Exit codes: 0 whether or not a circle was found, 1 for an unknown group or
//! a store failure, 2 for unreadable input.
use cos_core::{
    AnalysisConfig, AnalysisRecord, League, NodeIdx, StoreKey, analyze_group,
    analyze_group_cached, analyze_league,
};
use serde::Serialize;

use crate::OutputFormat;
use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::format;
use crate::store::JsonDirStore;

/// Outcome for one group, tagged with its path from the league root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub group_path: Vec<String>,
    pub result: AnalysisRecord,
}

/// Maps command-line options onto the analysis configuration.
pub fn config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        max_teams_first_cycle: args.max_teams,
        max_teams_all_cycles: args.max_teams_all,
        step_budget: (args.step_budget > 0).then_some(args.step_budget),
        search_potential: !args.no_potential,
        max_potential_cycles: args.max_potential,
        parallel: args.parallel,
    }
}

/// Runs the `analyze` command.
///
/// # Errors
///
/// [`CliError::InvalidSnapshot`] for unusable input,
/// [`CliError::GroupNotFound`] for an unknown `--group`, and
/// [`CliError::StoreFailed`] when the cache directory cannot be used.
pub fn run(content: &str, args: &AnalyzeArgs, format: OutputFormat) -> Result<(), CliError> {
    let (league, season) = super::load_league(content)?;
    let reports = analyze(&league, season.as_deref(), args)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => print_human(&mut out, &reports),
        OutputFormat::Json => format::write_json(&mut out, &reports),
    }
    .map_err(|e| CliError::stdout(&e))
}

/// Analyzes the requested groups of `league`.
pub fn analyze(
    league: &League,
    season: Option<&str>,
    args: &AnalyzeArgs,
) -> Result<Vec<GroupReport>, CliError> {
    let config = config_from_args(args);
    let groups = match &args.group {
        Some(name) => vec![
            league
                .group_by_name(name)
                .ok_or_else(|| CliError::GroupNotFound { name: name.clone() })?,
        ],
        None => league.groups(),
    };

    let records: Vec<(NodeIdx, AnalysisRecord)> = match &args.cache_dir {
        Some(dir) => {
            let mut store = JsonDirStore::new(dir);
            groups
                .iter()
                .map(|&g| -> Result<_, CliError> {
                    let key = StoreKey::for_group(league, season, g);
                    Ok((g, analyze_group_cached(&mut store, &key, league, g, &config)?))
                })
                .collect::<Result<_, _>>()?
        }
        None if args.group.is_none() => analyze_league(league, &config)?
            .into_iter()
            .map(|(g, analysis)| (g, analysis.to_record(league)))
            .collect(),
        None => groups
            .iter()
            .map(|&g| -> Result<_, CliError> {
                Ok((g, analyze_group(league, g, &config)?.to_record(league)))
            })
            .collect::<Result<_, _>>()?,
    };

    Ok(records
        .into_iter()
        .map(|(g, result)| GroupReport {
            group_path: league.group_path(g).into_iter().map(str::to_owned).collect(),
            result,
        })
        .collect())
}

fn print_human<W: std::io::Write>(w: &mut W, reports: &[GroupReport]) -> std::io::Result<()> {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        format::write_record_human(w, &report.group_path, &report.result)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
