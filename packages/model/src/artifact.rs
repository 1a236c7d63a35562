//! Reading and writing model artifacts on the local filesystem.

use crate::error::{ModelError, Result};
use crate::ml::MLModel;
use std::fs;
use std::path::{Path, PathBuf};

/// Persist `model` at `path`, replacing any previous artifact.
///
/// The bytes go to a sibling `.tmp` file first and are renamed into place, so
/// a reader never observes a half-written artifact.
pub fn write_artifact(model: &MLModel, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ModelError::io(parent, e))?;
    }

    let bytes = model.to_fory_vec()?;
    let tmp = temp_path(path);
    fs::write(&tmp, &bytes).map_err(|e| ModelError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| ModelError::io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), model = %model, "Wrote model artifact");
    Ok(())
}

/// Load the artifact at `path`.
pub fn read_artifact(path: impl AsRef<Path>) -> Result<MLModel> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ModelError::io(path, e))?;
    MLModel::from_fory_slice(&bytes)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
