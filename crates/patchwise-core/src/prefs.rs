//! Durable session preferences.
//!
//! Two boolean flags survive process restarts: whether the operator is
//! authenticated and whether Demo mode is on. They live in one small JSON
//! file keyed exactly as the flags are named on the wire
//! (`patchwise_auth`, `patchwise_demo_mode`). Nothing else is persisted;
//! store contents are rebuilt per session.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PrefsError;

/// The persisted flag pair.
///
/// An absent `patchwise_auth` key reads as not authenticated, and an
/// absent `patchwise_demo_mode` key reads as Demo on. Logging out removes
/// the auth key from the file rather than writing `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether the operator has logged in
    #[serde(rename = "patchwise_auth", default, skip_serializing_if = "is_false")]
    pub authenticated: bool,

    /// Whether Demo mode is on
    #[serde(rename = "patchwise_demo_mode", default = "default_demo_flag")]
    pub demo_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            authenticated: false,
            demo_mode: true,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(flag: &bool) -> bool {
    !*flag
}

fn default_demo_flag() -> bool {
    true
}

/// Reads and writes the preference file.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    /// Create a store backed by the given file path.
    ///
    /// The file and its parent directory need not exist yet; they are
    /// created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted flags.
    ///
    /// A missing file yields the defaults. A file that exists but does not
    /// parse also yields the defaults, after logging a warning; a corrupt
    /// preference file should never lock the operator out of a session.
    pub fn load(&self) -> Result<Preferences, PrefsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(source) => return Err(PrefsError::io_error(&self.path, source)),
        };

        match serde_json::from_str(&raw) {
            Ok(prefs) => Ok(prefs),
            Err(error) => {
                warn!(
                    "Preference file {} is malformed ({}), starting from defaults",
                    self.path.display(),
                    error
                );
                Ok(Preferences::default())
            }
        }
    }

    /// Write the flags back, creating the parent directory if needed.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| PrefsError::io_error(&self.path, source))?;
        }
        let body = serde_json::to_string_pretty(prefs)?;
        fs::write(&self.path, body).map_err(|source| PrefsError::io_error(&self.path, source))
    }
}
