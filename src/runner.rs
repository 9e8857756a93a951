use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use runpaths::{
    AssumeYes, Confirm, Error, RunEntry, RunPathResolver, RunPaths, Strategy, TerminalPrompt,
};
use tracing::debug;

use crate::cli::{Cli, Command, NewArgs, ScopeArgs};
use crate::config::{self, RunpathsConfig};

pub fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| anyhow!("current directory must be valid UTF-8"))?;
    let location = config::locate(cli.config.as_deref(), &cwd)?;
    if let Some(location) = &location {
        debug!(path = %location.path, source = location.source.as_str(), "config path");
    }
    let config = config::load(location.as_ref())?;

    match cli.command {
        Command::New(args) => handle_new(&config, args),
        Command::Latest(args) => handle_latest(&config, args),
        Command::List(args) => handle_list(&config, args),
    }
}

fn resolver_for(config: &RunpathsConfig, args: &ScopeArgs) -> Result<RunPathResolver> {
    let base = match &args.base {
        Some(base) => utf8(base.clone())?,
        None => config.base_or_default(),
    };
    Ok(RunPathResolver::new(base, &args.scope))
}

fn handle_new(config: &RunpathsConfig, args: NewArgs) -> Result<ExitCode> {
    let resolver = resolver_for(config, &args.scope)?;
    let strategy = new_strategy(config, &args);
    new_run(
        &resolver,
        strategy,
        &mut TerminalPrompt::stdio(),
        args.scope.json,
        &mut io::stdout(),
    )
}

fn new_strategy(config: &RunpathsConfig, args: &NewArgs) -> Strategy {
    if args.add {
        Strategy::Append
    } else {
        Strategy::Overwrite {
            confirm: !args.yes && config.confirm_or_default(),
        }
    }
}

/// Create the run and print its paths. A declined prompt exits with status 1
/// and prints nothing.
fn new_run(
    resolver: &RunPathResolver,
    strategy: Strategy,
    confirm: &mut dyn Confirm,
    json: bool,
    out: &mut dyn io::Write,
) -> Result<ExitCode> {
    let paths = match resolver.resolve(strategy, confirm) {
        Ok(paths) => paths,
        Err(Error::Declined { .. }) => return Ok(ExitCode::FAILURE),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("creating run under {}", resolver.scope_dir()));
        }
    };

    out.write_all(render_paths(&paths, json)?.as_bytes())
        .context("writing run paths")?;
    Ok(ExitCode::SUCCESS)
}

fn handle_latest(config: &RunpathsConfig, args: ScopeArgs) -> Result<ExitCode> {
    let resolver = resolver_for(config, &args)?;
    let paths = resolver
        .resolve(Strategy::Latest, &mut AssumeYes)
        .with_context(|| format!("looking up latest run under {}", resolver.scope_dir()))?;
    print!("{}", render_paths(&paths, args.json)?);
    Ok(ExitCode::SUCCESS)
}

fn handle_list(config: &RunpathsConfig, args: ScopeArgs) -> Result<ExitCode> {
    let resolver = resolver_for(config, &args)?;
    let runs = resolver
        .runs()
        .with_context(|| format!("listing runs under {}", resolver.scope_dir()))?;
    if runs.is_empty() && !args.json {
        println!("No runs under {}.", resolver.scope_dir());
        return Ok(ExitCode::SUCCESS);
    }
    print!("{}", render_runs(&runs, args.json)?);
    Ok(ExitCode::SUCCESS)
}

fn render_paths(paths: &RunPaths, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(paths).context("serializing run paths")?;
        out.push('\n');
        return Ok(out);
    }
    Ok(format!("{}\n{}\n", paths.models, paths.logs))
}

fn render_runs(runs: &[RunEntry], json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(runs).context("serializing run list")?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for run in runs {
        let modified = run
            .modified
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(out, "{:>4}  {}  {}", run.run_id, modified, run.path);
    }
    Ok(out)
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|p| anyhow!("path must be valid UTF-8: {}", p.display()))
}
