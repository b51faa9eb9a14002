use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::MediaIndexError;

/// Makes a freshly written file visible to gallery apps
pub trait MediaIndexer: Send + Sync {
    fn name(&self) -> &'static str;

    fn refresh(&self, path: &Path) -> Result<(), MediaIndexError>;
}

/// For platforms without a media index
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndexer;

impl MediaIndexer for NoopIndexer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn refresh(&self, path: &Path) -> Result<(), MediaIndexError> {
        log::debug!("No media index on this platform, skipping {}", path.display());
        Ok(())
    }
}

/// Runs an external scanner on the new file. `{path}` and `{uri}` in the
/// arguments are replaced with the file path and its `file://` URI.
#[derive(Debug, Clone)]
pub struct ScanCommandIndexer {
    program: String,
    args: Vec<String>,
}

impl ScanCommandIndexer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Broadcast a media scanner intent through the activity manager
    pub fn android() -> Self {
        Self::new(
            "am",
            vec![
                "broadcast".to_owned(),
                "-a".to_owned(),
                "android.intent.action.MEDIA_SCANNER_SCAN_FILE".to_owned(),
                "-d".to_owned(),
                "{uri}".to_owned(),
            ],
        )
    }

    fn expand_args(&self, path: &Path) -> Vec<String> {
        let path_str = path.display().to_string();
        let uri = format!("file://{}", path_str);
        self.args
            .iter()
            .map(|arg| arg.replace("{path}", &path_str).replace("{uri}", &uri))
            .collect()
    }
}

impl MediaIndexer for ScanCommandIndexer {
    fn name(&self) -> &'static str {
        "scan-command"
    }

    fn refresh(&self, path: &Path) -> Result<(), MediaIndexError> {
        let args = self.expand_args(path);
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|err| MediaIndexError {
                path: path.to_owned(),
                reason: format!("failed to run {}: {}", self.program, err),
            })?;

        if status.success() {
            log::info!("Media scan finished for {}", path.display());
            Ok(())
        } else {
            Err(MediaIndexError {
                path: path.to_owned(),
                reason: format!("{} exited with {}", self.program, status),
            })
        }
    }
}

/// Adds the file to the user's photo library folder, where gallery apps look
#[derive(Debug, Clone)]
pub struct LibraryCopyIndexer {
    library_dir: PathBuf,
}

impl LibraryCopyIndexer {
    pub fn new(library_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: library_dir.into(),
        }
    }

    pub fn library_dir(&self) -> &Path {
        &self.library_dir
    }
}

impl MediaIndexer for LibraryCopyIndexer {
    fn name(&self) -> &'static str {
        "photo-library"
    }

    fn refresh(&self, path: &Path) -> Result<(), MediaIndexError> {
        let fail = |reason: String| MediaIndexError {
            path: path.to_owned(),
            reason,
        };

        let file_name = path
            .file_name()
            .ok_or_else(|| fail("path has no file name".to_owned()))?;
        std::fs::create_dir_all(&self.library_dir)
            .map_err(|err| fail(format!("{}: {}", self.library_dir.display(), err)))?;

        let target = self.library_dir.join(file_name);
        std::fs::copy(path, &target).map_err(|err| fail(format!("{}: {}", target.display(), err)))?;
        log::info!("Saved {} to photo library at {}", path.display(), target.display());
        Ok(())
    }
}

/// Pick the media index strategy for the platform we are running on
pub fn platform_indexer(publish_to_library: bool) -> Box<dyn MediaIndexer> {
    if cfg!(target_os = "android") {
        return Box::new(ScanCommandIndexer::android());
    }

    match dirs::picture_dir() {
        Some(dir) if publish_to_library => Box::new(LibraryCopyIndexer::new(dir)),
        _ => Box::new(NoopIndexer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_args_are_expanded() {
        let indexer = ScanCommandIndexer::android();
        let args = indexer.expand_args(Path::new("/sdcard/drawing_1.jpeg"));
        assert_eq!(args.last().unwrap(), "file:///sdcard/drawing_1.jpeg");
        assert_eq!(args[0], "broadcast");
    }

    #[test]
    fn test_missing_scanner_is_reported() {
        let indexer = ScanCommandIndexer::new("photo-doodle-no-such-scanner", vec!["{path}".to_owned()]);
        let err = indexer.refresh(Path::new("/tmp/x.jpeg")).unwrap_err();
        assert_eq!(err.path, Path::new("/tmp/x.jpeg"));
    }

    #[test]
    fn test_library_copy() {
        let root = std::env::temp_dir().join(format!("photo_doodle_library_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        let file = root.join("drawing_1.jpeg");
        std::fs::write(&file, b"jpeg").unwrap();

        let indexer = LibraryCopyIndexer::new(root.join("Pictures"));
        indexer.refresh(&file).unwrap();
        assert_eq!(std::fs::read(root.join("Pictures").join("drawing_1.jpeg")).unwrap(), b"jpeg");
        std::fs::remove_dir_all(root).unwrap();
    }
}
