//! Allocation and lookup of numbered run directories.
//!
//! A resolver owns one scope directory, `<base>/<scope>`. Each call to
//! [`RunPathResolver::resolve`] either hands back the latest run, appends a
//! new run next to the existing ones, or wipes the scope and starts over at
//! run `0`.

use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::layout::{self, RunEntry, RunId, RunPaths};
use crate::prompt::{AssumeYes, Confirm, TerminalPrompt};

/// What to do with the runs already present in a scope.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Return the most recent run; create nothing.
    Latest,
    /// Keep existing runs and create the next one.
    Append,
    /// Delete existing runs, then create run `0`.
    Overwrite { confirm: bool },
}

impl Strategy {
    /// Map the `add` / `no_create` / `confirm` flags onto a strategy.
    ///
    /// `no_create` wins over `add`.
    pub fn from_flags(add: bool, no_create: bool, confirm: bool) -> Self {
        if no_create {
            if add {
                debug!("`add` has no effect together with `no_create`");
            }
            Strategy::Latest
        } else if add {
            Strategy::Append
        } else {
            Strategy::Overwrite { confirm }
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Overwrite { confirm: true }
    }
}

#[derive(Clone, Debug)]
pub struct RunPathResolver {
    scope_dir: Utf8PathBuf,
}

impl RunPathResolver {
    pub fn new(base: impl AsRef<Utf8Path>, scope: &str) -> Self {
        Self {
            scope_dir: base.as_ref().join(scope),
        }
    }

    pub fn scope_dir(&self) -> &Utf8Path {
        &self.scope_dir
    }

    /// Paths of run `id`. Nothing is touched on disk.
    pub fn run(&self, id: RunId) -> RunPaths {
        RunPaths::new(&self.scope_dir, id)
    }

    /// Resolve the run directories for `strategy`, asking `confirm` before
    /// any deletion.
    pub fn resolve(&self, strategy: Strategy, confirm: &mut dyn Confirm) -> Result<RunPaths> {
        self.ensure_scope()?;
        let latest = layout::latest_id(&self.scope_dir)?;
        debug!(scope = %self.scope_dir, latest = ?latest.map(|id| id.0), "scanned scope");

        match (strategy, latest) {
            (Strategy::Latest, Some(id)) => Ok(self.run(id)),
            (Strategy::Latest, None) => Err(Error::NoRunsFound {
                scope: self.scope_dir.clone(),
            }),
            (Strategy::Overwrite { confirm: ask }, Some(_)) => {
                if ask && !confirm.confirm(&self.scope_dir)? {
                    return Err(Error::Declined {
                        scope: self.scope_dir.clone(),
                    });
                }
                self.wipe()?;
                self.create_run(RunId::FIRST)
            }
            (Strategy::Append | Strategy::Overwrite { .. }, latest) => {
                let next = match latest {
                    Some(id) => id.next().ok_or_else(|| Error::IdsExhausted {
                        scope: self.scope_dir.clone(),
                    })?,
                    None => RunId::FIRST,
                };
                self.create_run(next)
            }
        }
    }

    /// Latest run, or `None` when the scope holds no runs yet.
    pub fn latest(&self) -> Result<Option<RunPaths>> {
        self.ensure_scope()?;
        Ok(layout::latest_id(&self.scope_dir)?.map(|id| self.run(id)))
    }

    /// Every run in the scope, ascending by id.
    pub fn runs(&self) -> Result<Vec<RunEntry>> {
        self.ensure_scope()?;
        Ok(layout::scan(&self.scope_dir)?)
    }

    fn ensure_scope(&self) -> Result<()> {
        fs::create_dir_all(&self.scope_dir)?;
        Ok(())
    }

    fn wipe(&self) -> Result<()> {
        info!(scope = %self.scope_dir, "deleting old runs");
        fs::remove_dir_all(&self.scope_dir)?;
        fs::create_dir_all(&self.scope_dir)?;
        Ok(())
    }

    fn create_run(&self, id: RunId) -> Result<RunPaths> {
        let paths = self.run(id);
        fs::create_dir_all(&paths.run_dir)?;
        fs::create_dir(&paths.models)?;
        fs::create_dir(&paths.logs)?;
        info!(run = %paths.run_dir, "created run");
        Ok(paths)
    }
}

/// Prepare the directories where models and logs of a run are saved.
///
/// Flag form of [`RunPathResolver::resolve`]: `add` keeps old runs and adds
/// a new one, `no_create` only returns the most recent run, and `confirm`
/// asks on the terminal before old runs are deleted. Returns the `models`
/// and `logs` paths.
pub fn resolve(
    base: impl AsRef<Path>,
    scope: &str,
    add: bool,
    no_create: bool,
    confirm: bool,
) -> Result<(Utf8PathBuf, Utf8PathBuf)> {
    let base = Utf8Path::from_path(base.as_ref())
        .ok_or_else(|| Error::NonUtf8Path(base.as_ref().to_path_buf()))?;
    let resolver = RunPathResolver::new(base, scope);
    let strategy = Strategy::from_flags(add, no_create, confirm);

    let paths = if confirm {
        resolver.resolve(strategy, &mut TerminalPrompt::stdio())?
    } else {
        resolver.resolve(strategy, &mut AssumeYes)?
    };
    Ok(paths.into_pair())
}
