use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

pub const DISCOVERED_FILE: &str = ".runpaths.toml";
const DEFAULT_BASE: &str = "runs";

/// Settings loaded from `.runpaths.toml` or `<config dir>/runpaths/config.toml`.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunpathsConfig {
    pub base: Option<Utf8PathBuf>,
    pub confirm: Option<bool>,
}

impl RunpathsConfig {
    pub fn base_or_default(&self) -> Utf8PathBuf {
        self.base
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_BASE))
    }

    pub fn confirm_or_default(&self) -> bool {
        self.confirm.unwrap_or(true)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSource {
    Explicit,
    Discovered,
    UserDefault,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Explicit => "explicit",
            ConfigSource::Discovered => "discovered",
            ConfigSource::UserDefault => "user-default",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConfigLocation {
    pub path: Utf8PathBuf,
    pub source: ConfigSource,
}

/// Pick the config file: `explicit`, else the nearest `.runpaths.toml` at
/// or above `start`, else `<config dir>/runpaths/config.toml`.
pub fn locate(explicit: Option<&Path>, start: &Utf8Path) -> Result<Option<ConfigLocation>> {
    if let Some(path) = explicit {
        let path = Utf8PathBuf::from_path_buf(path.to_path_buf())
            .map_err(|_| anyhow!("config path must be valid UTF-8"))?;
        return Ok(Some(ConfigLocation {
            path,
            source: ConfigSource::Explicit,
        }));
    }

    if let Some(path) = start
        .ancestors()
        .map(|dir| dir.join(DISCOVERED_FILE))
        .find(|candidate| candidate.is_file())
    {
        return Ok(Some(ConfigLocation {
            path,
            source: ConfigSource::Discovered,
        }));
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(None);
    };
    let path = Utf8PathBuf::from_path_buf(config_dir.join("runpaths").join("config.toml"))
        .map_err(|_| anyhow!("config path must be valid UTF-8"))?;
    Ok(Some(ConfigLocation {
        path,
        source: ConfigSource::UserDefault,
    }))
}

/// Load the config at `location`. Only an explicit file has to exist.
pub fn load(location: Option<&ConfigLocation>) -> Result<RunpathsConfig> {
    let Some(location) = location else {
        return Ok(RunpathsConfig::default());
    };
    if !location.path.exists() {
        if location.source == ConfigSource::Explicit {
            bail!("config file {} does not exist", location.path);
        }
        return Ok(RunpathsConfig::default());
    }
    load_from_path(&location.path)
}

pub fn load_from_path(path: &Utf8Path) -> Result<RunpathsConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}
