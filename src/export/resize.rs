use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;

use crate::error::{ExportError, ExportResult};

/// Encoding of the exported file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

/// What to resize and how. Format and quality are fixed per app, not per save.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    /// 1..=100, only meaningful for lossy formats
    pub quality: u8,
    /// Directory the resized file is written to
    pub output_dir: PathBuf,
}

pub trait ImageResizer: Send + Sync {
    /// Resize `request.source` and return the path of the new file
    fn resize(&self, request: &ResizeRequest) -> ExportResult<PathBuf>;
}

/// Resizes with the `image` crate, ignoring the source aspect ratio
#[derive(Debug, Clone, Copy)]
pub struct ExactResizer {
    filter: FilterType,
}

impl Default for ExactResizer {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl ExactResizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl ImageResizer for ExactResizer {
    fn resize(&self, request: &ResizeRequest) -> ExportResult<PathBuf> {
        if request.width == 0 || request.height == 0 {
            return Err(ExportError::Resize(format!(
                "invalid target size {}x{}",
                request.width, request.height
            )));
        }

        let source = image::open(&request.source)
            .map_err(|err| ExportError::Resize(format!("{}: {}", request.source.display(), err)))?;
        log::debug!(
            "Resizing {}x{} snapshot to {}x{}",
            source.width(),
            source.height(),
            request.width,
            request.height
        );
        let resized = source.resize_exact(request.width, request.height, self.filter);

        std::fs::create_dir_all(&request.output_dir)
            .map_err(|err| ExportError::Resize(format!("{}: {}", request.output_dir.display(), err)))?;
        let output = request.output_dir.join(format!(
            "resized_{}.{}",
            uuid::Uuid::new_v4(),
            request.format.extension()
        ));

        encode(&resized, &output, request.format, request.quality)
            .map_err(|err| ExportError::Resize(format!("{}: {}", output.display(), err)))?;
        Ok(output)
    }
}

fn encode(image: &image::DynamicImage, path: &Path, format: ExportFormat, quality: u8) -> image::ImageResult<()> {
    match format {
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = image.to_rgb8();
            let writer = BufWriter::new(File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
            encoder.encode_image(&rgb)
        }
        ExportFormat::Png => image.save_with_format(path, ImageFormat::Png),
    }
}
