use clap::Parser;
use log::LevelFilter;

mod cli;
mod cmd;
mod error;
mod format;
mod io;
mod store;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(&cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

/// `RUST_LOG` applies unless `-v` or `-q` is given.
fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if cli.quiet {
        builder.filter_level(LevelFilter::Error);
    }
    builder.format_timestamp(None).init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Analyze(args) => {
            let content = io::read_input(&args.file, cli.max_file_size)?;
            cmd::analyze::run(&content, args, cli.format)
        }
        Command::Inspect { file } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::inspect::run(&content, cli.format)
        }
        Command::Version => {
            println!("{}", cos_core::version());
            Ok(())
        }
    }
}
