//! Session construction options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::Mode;

/// Options applied when a [`Session`](crate::session::Session) is built.
///
/// Both fields are optional: the mode falls back to whatever the
/// preference file recorded (Demo when there is none), and without a
/// preference path nothing is persisted at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Explicit operating mode, overriding the persisted flag
    pub mode: Option<Mode>,
    /// Preference file location; `None` disables persistence
    pub prefs_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Create a config with no overrides
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With an explicit operating mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// With a preference file path
    #[inline]
    #[must_use]
    pub fn with_prefs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prefs_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_overrides_nothing() {
        let config = SessionConfig::new();
        assert!(config.mode.is_none());
        assert!(config.prefs_path.is_none());
    }

    #[test]
    fn builders_set_both_fields() {
        let config = SessionConfig::new()
            .with_mode(Mode::Live)
            .with_prefs_path("/tmp/patchwise/prefs.json");
        assert_eq!(config.mode, Some(Mode::Live));
        assert_eq!(
            config.prefs_path.as_deref(),
            Some(std::path::Path::new("/tmp/patchwise/prefs.json"))
        );
    }
}
