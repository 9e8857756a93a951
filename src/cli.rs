use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "runpaths",
    version,
    about = "Numbered models/logs directories for training runs"
)]
pub struct Cli {
    /// Config file (default: nearest .runpaths.toml, then the user config dir)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a run. Old runs are deleted unless --add is given.
    New(NewArgs),
    /// Print the most recent run without creating anything.
    Latest(ScopeArgs),
    /// List the runs of a scope.
    List(ScopeArgs),
}

#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// Name grouping a set of runs, e.g. the dataset
    #[arg(short = 's', long = "scope")]
    pub scope: String,
    /// Root directory holding scopes (default: config `base`, then ./runs)
    #[arg(short = 'b', long = "base")]
    pub base: Option<PathBuf>,
    /// Emit JSON instead of plain paths
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    /// Keep existing runs and add a new one
    #[arg(short = 'a', long = "add", default_value_t = false)]
    pub add: bool,
    /// Delete old runs without asking
    #[arg(short = 'y', long = "yes", default_value_t = false, conflicts_with = "add")]
    pub yes: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
