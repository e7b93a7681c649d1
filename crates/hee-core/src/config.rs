// crates/hee-core/src/config.rs

//! Configuration resolution.
//!
//! Precedence, highest first: explicit overrides (command-line flags), the
//! optional `config.toml` inside the state directory, then defaults derived
//! from the state directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{HeeError, Result};

/// Name of the state directory under the user's home.
pub const STATE_DIR_NAME: &str = ".hee";
/// Optional configuration file inside the state directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Subdirectory holding the evidence log.
pub const EVIDENCE_DIR_NAME: &str = "evidence";
/// Evidence log file name.
pub const LOG_FILE_NAME: &str = "marks.log";
/// User card directory name.
pub const CARDS_DIR_NAME: &str = "cards";
/// Persisted installation identifier.
pub const NODE_ID_FILE_NAME: &str = "node.id";

/// Values supplied on the command line. `None` means "not given".
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub state_dir: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub cards_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    log_path: Option<PathBuf>,
    cards_dir: Option<PathBuf>,
}

/// Fully resolved locations, threaded into every handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub state_dir: PathBuf,
    pub log_path: PathBuf,
    pub cards_dir: PathBuf,
    pub node_id_path: PathBuf,
}

impl Config {
    /// Defaults for a given state directory, ignoring any config file.
    pub fn in_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Config {
            log_path: state_dir.join(EVIDENCE_DIR_NAME).join(LOG_FILE_NAME),
            cards_dir: state_dir.join(CARDS_DIR_NAME),
            node_id_path: state_dir.join(NODE_ID_FILE_NAME),
            state_dir,
        }
    }

    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let state_dir = match overrides.state_dir {
            Some(dir) => dir,
            None => default_state_dir()?,
        };
        let file = load_config_file(&state_dir.join(CONFIG_FILE_NAME))?;
        let mut cfg = Config::in_state_dir(&state_dir);

        if let Some(p) = file.log_path {
            cfg.log_path = anchor(&state_dir, p);
        }
        if let Some(p) = file.cards_dir {
            cfg.cards_dir = anchor(&state_dir, p);
        }
        if let Some(p) = overrides.log_path {
            cfg.log_path = p;
        }
        if let Some(p) = overrides.cards_dir {
            cfg.cards_dir = p;
        }

        tracing::debug!(
            state_dir = %cfg.state_dir.display(),
            log_path = %cfg.log_path.display(),
            cards_dir = %cfg.cards_dir.display(),
            "config resolved"
        );
        Ok(cfg)
    }
}

pub fn default_state_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(STATE_DIR_NAME))
        .ok_or_else(|| HeeError::Config("cannot resolve home directory; pass --state-dir".into()))
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => return Err(HeeError::io(path, e)),
    };
    toml::from_str(&text).map_err(|e| HeeError::Config(format!("{}: {e}", path.display())))
}

// Relative paths in the config file are relative to the state directory.
fn anchor(state_dir: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        p
    } else {
        state_dir.join(p)
    }
}
