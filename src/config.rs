use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::errors::CsuiteError;
use crate::suites::Suite;

/// On-disk defaults, merged under CLI flags (a flag always wins).
///
/// Looked up at `$CSUITE_CONFIG` if set, otherwise
/// `<config dir>/csuite/config.toml`. A missing file yields defaults;
/// a malformed one is a fatal configuration error.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Extra arguments appended to every engine invocation, same syntax
    /// as `--extra-arguments`.
    pub extra_arguments: Option<String>,

    /// Per-suite run-count overrides.
    pub runs: RunOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOverrides {
    pub octane: Option<u32>,
    pub sunspider: Option<u32>,
    pub kraken: Option<u32>,
}

impl Config {
    pub fn load() -> Result<Config> {
        if let Ok(path) = std::env::var("CSUITE_CONFIG") {
            return Config::load_from(Path::new(&path));
        }
        match dirs::config_dir() {
            Some(dir) => Config::load_from(&dir.join("csuite").join("config.toml")),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.is_file() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| CsuiteError::ConfigReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|err| CsuiteError::ConfigParseError {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        Ok(config)
    }

    /// Run-count override for a suite; unrecognized suite names resolve to
    /// the sunspider entry, matching the suite fallback.
    pub fn runs_for(&self, suite: Suite) -> Option<u32> {
        match suite {
            Suite::Octane => self.runs.octane,
            Suite::Sunspider => self.runs.sunspider,
            Suite::Kraken => self.runs.kraken,
        }
    }
}
