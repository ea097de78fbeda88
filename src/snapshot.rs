use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::layout::FleetFrame;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes the frame as JSON. Readers never observe a half-written file.
pub fn write_frame(path: impl AsRef<Path>, frame: &FleetFrame) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let write_error = |source| SnapshotError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let content = serde_json::to_vec_pretty(frame)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content).map_err(write_error)?;
    fs::rename(&tmp_path, path).map_err(write_error)
}
