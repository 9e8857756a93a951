use std::path::PathBuf;

use camino::Utf8PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Asked for the latest run of a scope that has none.
    #[error("no previous run found under {scope}")]
    NoRunsFound { scope: Utf8PathBuf },

    /// The operator answered the overwrite prompt with anything but yes.
    #[error("deletion of old runs under {scope} was declined")]
    Declined { scope: Utf8PathBuf },

    #[error("run ids under {scope} are exhausted")]
    IdsExhausted { scope: Utf8PathBuf },

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
