//! Player binding persistence
//!
//! Saves the [`PlayerBinding`] handed out by create and join so a later
//! invocation knows which color this machine plays in which game. Bindings
//! are kept in one JSON object keyed by game code.
//!
//! # File Location
//!
//! `bindings.json` in the user's configuration directory, e.g.
//! `~/.config/codechess/bindings.json`. Falls back to the working directory
//! if no config directory can be resolved.

use crate::core::error::{ClientError, ClientResult};
use directories::ProjectDirs;
use shared::{GameCode, PlayerBinding};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Bindings filename
const BINDINGS_FILENAME: &str = "bindings.json";

/// Resolve the default bindings file path
pub fn default_bindings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "codechess") {
        proj_dirs.config_dir().join(BINDINGS_FILENAME)
    } else {
        PathBuf::from(BINDINGS_FILENAME)
    }
}

/// Durable map from game code to the binding this machine holds
#[derive(Debug, Clone)]
pub struct BindingStore {
    path: PathBuf,
}

impl BindingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BindingStore { path: path.into() }
    }

    pub fn at_default_location() -> Self {
        Self::new(default_bindings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved bindings. A missing file is an empty map.
    pub fn load(&self) -> ClientResult<BTreeMap<GameCode, PlayerBinding>> {
        if !self.path.exists() {
            info!("[BINDING] No bindings file at {:?}", self.path);
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Where an unparseable bindings file is moved before a fresh one is written
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    pub fn get(&self, code: &GameCode) -> ClientResult<Option<PlayerBinding>> {
        Ok(self.load()?.remove(code))
    }

    /// Record a binding. An existing binding for the same code is replaced.
    ///
    /// A file that cannot be parsed is kept at [`Self::corrupt_path`] rather
    /// than overwritten; I/O errors are returned.
    pub fn save(&self, binding: &PlayerBinding) -> ClientResult<()> {
        let mut bindings = match self.load() {
            Ok(bindings) => bindings,
            Err(ClientError::BindingSerialization(e)) => {
                let aside = self.corrupt_path();
                warn!(
                    "[BINDING] Unparseable bindings file at {:?}: {}. Moved to {:?}.",
                    self.path, e, aside
                );
                fs::rename(&self.path, &aside)?;
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        bindings.insert(binding.code.clone(), binding.clone());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&bindings)?;
        fs::write(&self.path, json)?;
        info!(
            "[BINDING] Saved {} as {} to {:?}",
            binding.code, binding.color, self.path
        );
        Ok(())
    }
}
