//! On-disk layout of a scope: `<base>/<scope>/<id>/{models,logs}`.

use std::fmt;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MODELS_DIR: &str = "models";
pub const LOGS_DIR: &str = "logs";

/// Numeric name of a run directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl RunId {
    pub const FIRST: RunId = RunId(0);

    /// Parse a directory name made only of ASCII digits.
    ///
    /// Leading zeros are tolerated on read (`007` is run 7). Names that do
    /// not fit in a `u64` are not runs.
    pub fn parse(name: &str) -> Option<RunId> {
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        name.parse().ok().map(RunId)
    }

    pub fn next(self) -> Option<RunId> {
        self.0.checked_add(1).map(RunId)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Paths belonging to one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunPaths {
    pub run_id: RunId,
    pub run_dir: Utf8PathBuf,
    pub models: Utf8PathBuf,
    pub logs: Utf8PathBuf,
}

impl RunPaths {
    pub fn new(scope_dir: &Utf8Path, run_id: RunId) -> Self {
        let run_dir = scope_dir.join(run_id.to_string());
        Self {
            run_id,
            models: run_dir.join(MODELS_DIR),
            logs: run_dir.join(LOGS_DIR),
            run_dir,
        }
    }

    pub fn into_pair(self) -> (Utf8PathBuf, Utf8PathBuf) {
        (self.models, self.logs)
    }
}

/// A run found while listing a scope.
#[derive(Clone, Debug, Serialize)]
pub struct RunEntry {
    pub run_id: RunId,
    pub path: Utf8PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Collect every numeric child of `scope_dir`, sorted by id.
pub fn scan(scope_dir: &Utf8Path) -> io::Result<Vec<RunEntry>> {
    let mut runs = Vec::new();
    for entry in fs::read_dir(scope_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some((name, run_id)) = name
            .to_str()
            .and_then(|name| RunId::parse(name).map(|id| (name, id)))
        else {
            continue;
        };
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        runs.push(RunEntry {
            run_id,
            path: scope_dir.join(name),
            modified,
        });
    }
    runs.sort_by(|a, b| a.run_id.cmp(&b.run_id).then_with(|| a.path.cmp(&b.path)));
    Ok(runs)
}

/// Highest run id under `scope_dir`, if any.
pub fn latest_id(scope_dir: &Utf8Path) -> io::Result<Option<RunId>> {
    let mut latest = None;
    for entry in fs::read_dir(scope_dir)? {
        let name = entry?.file_name();
        if let Some(id) = name.to_str().and_then(RunId::parse) {
            latest = latest.max(Some(id));
        }
    }
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_plain_decimal_names() {
        assert_eq!(RunId::parse("0"), Some(RunId(0)));
        assert_eq!(RunId::parse("42"), Some(RunId(42)));
        assert_eq!(RunId::parse("007"), Some(RunId(7)));
    }

    #[test]
    fn rejects_non_numeric_names() {
        for name in ["", "-1", "+3", "1.0", " 1", "notes.txt", "1a", "٣"] {
            assert_eq!(RunId::parse(name), None, "{name:?}");
        }
        assert_eq!(RunId::parse("99999999999999999999999"), None);
    }

    #[test]
    fn next_stops_at_max() {
        assert_eq!(RunId(4).next(), Some(RunId(5)));
        assert_eq!(RunId(u64::MAX).next(), None);
    }

    #[test]
    fn run_paths_follow_layout() {
        let paths = RunPaths::new(Utf8Path::new("/tmp/x/exp1"), RunId(3));
        assert_eq!(paths.run_dir, "/tmp/x/exp1/3");
        assert_eq!(paths.models, "/tmp/x/exp1/3/models");
        assert_eq!(paths.logs, "/tmp/x/exp1/3/logs");
    }

    #[test]
    fn latest_is_numeric_max() {
        let (_guard, scope) = utf8_tempdir();
        for name in ["0", "5", "2", "10a"] {
            fs::create_dir(scope.join(name)).unwrap();
        }
        fs::write(scope.join("notes.txt"), "stray").unwrap();

        assert_eq!(latest_id(&scope).unwrap(), Some(RunId(5)));
    }

    #[test]
    fn latest_of_empty_scope_is_none() {
        let (_guard, scope) = utf8_tempdir();
        assert_eq!(latest_id(&scope).unwrap(), None);
    }

    #[test]
    fn scan_sorts_and_skips_stray_entries() {
        let (_guard, scope) = utf8_tempdir();
        for name in ["10", "2", "checkpoints"] {
            fs::create_dir(scope.join(name)).unwrap();
        }

        let runs = scan(&scope).unwrap();
        let ids: Vec<_> = runs.iter().map(|run| run.run_id).collect();
        assert_eq!(ids, vec![RunId(2), RunId(10)]);
        assert_eq!(runs[1].path, scope.join("10"));
        assert!(runs[0].modified.is_some());
    }

    #[test]
    fn scan_keeps_zero_padded_names_as_found() {
        let (_guard, scope) = utf8_tempdir();
        fs::create_dir(scope.join("007")).unwrap();

        let runs = scan(&scope).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run_id, RunId(7));
        assert_eq!(runs[0].path, scope.join("007"));
        assert!(runs[0].path.is_dir());

        fs::create_dir(scope.join("7")).unwrap();
        let paths: Vec<_> = scan(&scope).unwrap().into_iter().map(|run| run.path).collect();
        assert_eq!(paths, vec![scope.join("007"), scope.join("7")]);
    }
}
