use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertFlagError {
    #[error("failed to write alert flag {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode alert flag: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct FlagFile {
    enabled: bool,
}

/// Session-wide switch for the remote alert sink. Local cues ignore it.
///
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct AlertFlag {
    enabled: Arc<AtomicBool>,
    path: Option<PathBuf>,
}

impl AlertFlag {
    /// Reads the persisted flag. A missing or unreadable file means enabled.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let enabled = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<FlagFile>(&content) {
                Ok(file) => file.enabled,
                Err(error) => {
                    log::warn!(
                        "alert_flag_parse_failed path={} error={}",
                        path.display(),
                        error
                    );
                    true
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => true,
            Err(error) => {
                log::warn!(
                    "alert_flag_read_failed path={} error={}",
                    path.display(),
                    error
                );
                true
            }
        };

        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
            path: Some(path),
        }
    }

    /// In-memory flag that is never written to disk.
    pub fn fixed(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
            path: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Updates the flag, then persists it. The in-memory value changes even if the write fails.
    pub fn set(&self, enabled: bool) -> Result<(), AlertFlagError> {
        self.enabled.store(enabled, Ordering::SeqCst);
        match &self.path {
            Some(path) => persist(path, enabled),
            None => Ok(()),
        }
    }

    pub fn toggle(&self) -> Result<bool, AlertFlagError> {
        let enabled = !self.is_enabled();
        self.set(enabled)?;
        Ok(enabled)
    }
}

fn persist(path: &Path, enabled: bool) -> Result<(), AlertFlagError> {
    let write_error = |source| AlertFlagError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let content = serde_json::to_string(&FlagFile { enabled })?;
    fs::write(path, content).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::AlertFlag;

    #[test]
    fn missing_file_defaults_to_enabled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flag = AlertFlag::load(dir.path().join("alert_flag.json"));
        assert!(flag.is_enabled());
    }

    #[test]
    fn corrupt_file_defaults_to_enabled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("alert_flag.json");
        std::fs::write(&path, "not json").expect("write");

        assert!(AlertFlag::load(&path).is_enabled());
    }

    #[test]
    fn set_persists_across_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state").join("alert_flag.json");

        let flag = AlertFlag::load(&path);
        flag.set(false).expect("persist");

        let reloaded = AlertFlag::load(&path);
        assert!(!reloaded.is_enabled());
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            r#"{"enabled":false}"#
        );
    }

    #[test]
    fn clones_share_state() {
        let flag = AlertFlag::fixed(true);
        let clone = flag.clone();

        assert!(!clone.toggle().expect("toggle"));
        assert!(!flag.is_enabled());
    }
}
