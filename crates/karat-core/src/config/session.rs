//! Session persistence configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the session (token and cached profile) is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file. Defaults to `$HOME/.karat/session.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolve the session file path.
    ///
    /// Falls back to `.karat/session.json` relative to the working directory
    /// when `HOME` is not set.
    pub fn resolve_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let base = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        base.join(".karat").join("session.json")
    }
}
