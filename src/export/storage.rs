use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};
use super::resize::ExportFormat;

const APP_DIR: &str = "photo_doodle";

/// Directory saved drawings go to: the override if set, else the user's
/// documents folder, falling back to local app data and finally the temp dir.
pub fn documents_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_owned();
    }
    dirs::document_dir()
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join(APP_DIR)))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
}

/// Where intermediate capture and resize files live
pub fn scratch_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// `drawing_<epoch-ms>.<ext>`
pub fn artifact_file_name(epoch_millis: u128, format: ExportFormat) -> String {
    format!("drawing_{}.{}", epoch_millis, format.extension())
}

/// Copy the finished artifact to its final location
pub fn copy_artifact(source: &Path, destination: &Path) -> ExportResult<()> {
    let write_error = |source| ExportError::Write {
        path: destination.to_owned(),
        source,
    };

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::copy(source, destination).map_err(write_error)?;
    Ok(())
}

/// Remove a temporary file, logging instead of failing
pub fn discard(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        log::debug!("Could not remove temporary file {}: {}", path.display(), err);
    }
}
