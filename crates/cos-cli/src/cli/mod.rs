//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// A snapshot argument: a filesystem path, or `-` for stdin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOrStdin {
    Stdin,
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in error messages.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Self::Stdin,
            other => Self::Path(PathBuf::from(other)),
        })
    }
}

/// Output format for reports written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one line per game (default).
    Human,
    /// A single pretty-printed JSON document.
    Json,
}

/// Team ceilings cannot exceed the solver's bitmask width.
fn team_limit() -> clap::builder::RangedU64ValueParser<usize> {
    clap::builder::RangedU64ValueParser::new().range(1..=cos_core::MAX_TEAMS as u64)
}

/// Search and reporting options for `cos analyze`.
#[derive(Clone, Debug, clap::Args)]
pub struct AnalyzeArgs {
    /// Path to a season snapshot JSON file, or `-` for stdin.
    #[arg(value_name = "FILE")]
    pub file: PathOrStdin,

    /// Analyze only the group with this name (default: every group).
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Skip the potential-circle search when no confirmed circle exists.
    #[arg(long)]
    pub no_potential: bool,

    /// Largest group searched for a confirmed circle.
    #[arg(
        long,
        value_name = "N",
        env = "COS_MAX_TEAMS",
        default_value = "64",
        value_parser = team_limit()
    )]
    pub max_teams: usize,

    /// Largest group searched exhaustively for potential circles.
    #[arg(
        long,
        value_name = "N",
        env = "COS_MAX_TEAMS_ALL",
        default_value = "16",
        value_parser = team_limit()
    )]
    pub max_teams_all: usize,

    /// State expansions allowed per search; `0` removes the limit.
    #[arg(
        long,
        value_name = "N",
        env = "COS_STEP_BUDGET",
        default_value = "50000000"
    )]
    pub step_budget: u64,

    /// Report at most this many potential circles per group.
    #[arg(long, value_name = "N")]
    pub max_potential: Option<usize>,

    /// Analyze groups on a worker pool.
    #[arg(long)]
    pub parallel: bool,

    /// Directory where confirmed circles are cached between runs.
    #[arg(long, value_name = "DIR", env = "COS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// All top-level subcommands exposed by the `cos` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Search a season snapshot for circles of suck.
    Analyze(AnalyzeArgs),

    /// Print the league hierarchy with the games attached to each group.
    Inspect {
        /// Path to a season snapshot JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Print the cos-core library version.
    Version,
}

/// Root CLI struct for the `cos` binary.
#[derive(Parser)]
#[command(
    name = "cos",
    version,
    about = "Circle of Suck detector",
    long_about = "Finds closed chains of wins (A beat B, B beat C, ..., Z beat A) covering\n\
                  every team of a league group, and the chains that could still form\n\
                  once the remaining games are played."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log search statistics and skipped games (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum snapshot size in bytes. Default: 67108864 (64 MiB).
    #[arg(
        long,
        global = true,
        env = "COS_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,
}
