use std::path::PathBuf;
use std::sync::Arc;

use futures::channel::oneshot;

use super::CompositeExporter;
use crate::document::CanvasSnapshot;
use crate::error::{ExportError, ExportResult};

/// Runs saves off the UI thread, one at a time.
///
/// The snapshot is taken by the caller on the UI thread, so strokes drawn
/// while the save runs never end up in the file.
#[derive(Debug)]
pub struct ExportWorker {
    exporter: Arc<CompositeExporter>,
    pending: Option<oneshot::Receiver<ExportResult<PathBuf>>>,
}

impl ExportWorker {
    pub fn new(exporter: CompositeExporter) -> Self {
        Self {
            exporter: Arc::new(exporter),
            pending: None,
        }
    }

    pub fn exporter(&self) -> &CompositeExporter {
        &self.exporter
    }

    /// True while a save has been started and its result not yet collected
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start saving `snapshot` in the background. `on_done` runs on the worker
    /// thread once the result is ready, e.g. to request a repaint.
    pub fn start<F>(&mut self, snapshot: CanvasSnapshot, on_done: F) -> ExportResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.pending.is_some() || self.exporter.is_busy() {
            return Err(ExportError::Busy);
        }

        let (sender, receiver) = oneshot::channel();
        let exporter = Arc::clone(&self.exporter);
        std::thread::Builder::new()
            .name("photo_doodle-export".to_owned())
            .spawn(move || {
                let result = exporter.save(&snapshot);
                if sender.send(result).is_err() {
                    log::debug!("Save finished after its receiver was dropped");
                }
                on_done();
            })
            .map_err(ExportError::Spawn)?;

        self.pending = Some(receiver);
        Ok(())
    }

    /// Collect the result of the running save, if it has finished
    pub fn poll(&mut self) -> Option<ExportResult<PathBuf>> {
        let receiver = self.pending.as_mut()?;
        match receiver.try_recv() {
            Ok(Some(result)) => {
                self.pending = None;
                Some(result)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => {
                self.pending = None;
                Some(Err(ExportError::WorkerLost))
            }
        }
    }

    /// Block until the running save finishes
    pub fn wait(&mut self) -> Option<ExportResult<PathBuf>> {
        let receiver = self.pending.take()?;
        Some(futures::executor::block_on(receiver).unwrap_or(Err(ExportError::WorkerLost)))
    }
}
