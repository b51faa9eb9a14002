//! Saving the composite (background + strokes) as a small raster file.
//!
//! A save runs these steps in order and stops at the first failure:
//!
//! ```text
//! permission -> capture -> resize -> copy to documents -> media index
//! ```
//!
//! The media index step is best effort: once the file exists on disk the save
//! has succeeded, a failed refresh is only logged.

pub mod capture;
pub mod media_index;
pub mod permission;
pub mod resize;
pub mod storage;
mod worker;

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::document::CanvasSnapshot;
use crate::error::{ExportError, ExportResult};
use crate::util::time;

pub use capture::{RasterCapture, ViewCapture};
pub use media_index::{LibraryCopyIndexer, MediaIndexer, NoopIndexer, ScanCommandIndexer};
pub use permission::{AlwaysGranted, DialogPermission, PermissionPrompt, StoragePermission};
pub use resize::{ExactResizer, ExportFormat, ImageResizer, ResizeRequest};
pub use worker::ExportWorker;

/// Size and encoding of the exported file
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub quality: u8,
    /// Save here instead of the platform documents directory
    pub documents_dir: Option<PathBuf>,
    /// Copy saved drawings into the user's picture folder
    pub publish_to_library: bool,
    /// Ask before writing even where the platform does not require it
    pub ask_permission: bool,
    pub prompt: PermissionPrompt,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            format: ExportFormat::Jpeg,
            quality: 100,
            documents_dir: None,
            publish_to_library: true,
            ask_permission: false,
            prompt: PermissionPrompt::default(),
        }
    }
}

/// Runs the save pipeline. At most one save runs at a time; a second call
/// while one is in flight fails with [`ExportError::Busy`].
pub struct CompositeExporter {
    settings: ExportSettings,
    documents_dir: PathBuf,
    scratch_dir: PathBuf,
    permission: Box<dyn StoragePermission>,
    capture: Box<dyn ViewCapture>,
    resizer: Box<dyn ImageResizer>,
    indexer: Box<dyn MediaIndexer>,
    in_flight: Mutex<bool>,
}

impl std::fmt::Debug for CompositeExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeExporter")
            .field("settings", &self.settings)
            .field("documents_dir", &self.documents_dir)
            .field("scratch_dir", &self.scratch_dir)
            .field("indexer", &self.indexer.name())
            .field("in_flight", &*self.in_flight.lock())
            .finish()
    }
}

// Clears the in-flight flag however the save ends
struct InFlightGuard<'a>(&'a Mutex<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock() = false;
    }
}

impl CompositeExporter {
    /// Exporter wired with the capabilities of the current platform
    pub fn for_platform(settings: ExportSettings) -> Self {
        let documents_dir = storage::documents_dir(settings.documents_dir.as_deref());
        let permission = permission::platform_permission(settings.ask_permission);
        let indexer = media_index::platform_indexer(settings.publish_to_library);
        log::info!(
            "Saving drawings to {} (media index: {})",
            documents_dir.display(),
            indexer.name()
        );

        Self {
            settings,
            documents_dir,
            scratch_dir: storage::scratch_dir(),
            permission,
            capture: Box::new(RasterCapture::default()),
            resizer: Box::new(ExactResizer::default()),
            indexer,
            in_flight: Mutex::new(false),
        }
    }

    /// Exporter with explicit capabilities and directories
    pub fn new(
        settings: ExportSettings,
        documents_dir: impl Into<PathBuf>,
        scratch_dir: impl Into<PathBuf>,
        permission: Box<dyn StoragePermission>,
        capture: Box<dyn ViewCapture>,
        resizer: Box<dyn ImageResizer>,
        indexer: Box<dyn MediaIndexer>,
    ) -> Self {
        Self {
            settings,
            documents_dir: documents_dir.into(),
            scratch_dir: scratch_dir.into(),
            permission,
            capture,
            resizer,
            indexer,
            in_flight: Mutex::new(false),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    pub fn is_busy(&self) -> bool {
        *self.in_flight.lock()
    }

    /// Save the snapshot and return the path of the written file
    pub fn save(&self, snapshot: &CanvasSnapshot) -> ExportResult<PathBuf> {
        {
            let mut in_flight = self.in_flight.lock();
            if *in_flight {
                log::warn!("Save requested while another save is running");
                return Err(ExportError::Busy);
            }
            *in_flight = true;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let started = time::current_time_secs();
        let result = self.run_pipeline(snapshot);
        match &result {
            Ok(path) => log::info!(
                "Saved drawing to {} in {:.0} ms",
                path.display(),
                (time::current_time_secs() - started) * 1000.0
            ),
            Err(err) => log::error!("Saving drawing failed: {}", err),
        }
        result
    }

    fn run_pipeline(&self, snapshot: &CanvasSnapshot) -> ExportResult<PathBuf> {
        if !self.permission.request(&self.settings.prompt) {
            return Err(ExportError::PermissionDenied);
        }

        let captured = self.capture.capture(snapshot, &self.scratch_dir)?;

        let request = ResizeRequest {
            source: captured.clone(),
            width: self.settings.width,
            height: self.settings.height,
            format: self.settings.format,
            quality: self.settings.quality,
            output_dir: self.scratch_dir.clone(),
        };
        let resized = self.resizer.resize(&request);
        storage::discard(&captured);
        let resized = resized?;

        let destination = self
            .documents_dir
            .join(storage::artifact_file_name(time::epoch_millis(), self.settings.format));
        let copied = storage::copy_artifact(&resized, &destination);
        storage::discard(&resized);
        copied?;

        if let Err(err) = self.indexer.refresh(&destination) {
            log::warn!("{}", err);
        }

        Ok(destination)
    }
}
