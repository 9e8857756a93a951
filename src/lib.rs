//! Versioned output directories for iterative training runs.
//!
//! Runs live under `<base>/<scope>/<id>/` and each owns a `models` and a
//! `logs` directory. Ids are plain decimal directory names starting at `0`.

pub mod error;
pub mod layout;
pub mod prompt;
pub mod resolver;

pub use error::{Error, Result};
pub use layout::{LOGS_DIR, MODELS_DIR, RunEntry, RunId, RunPaths};
pub use prompt::{AssumeYes, Confirm, TerminalPrompt};
pub use resolver::{RunPathResolver, Strategy, resolve};
