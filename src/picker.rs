use std::path::{Path, PathBuf};

use crate::background::BackgroundImage;
use crate::error::PickError;

/// Extensions offered in the picker and accepted on drop
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Lets the user choose a background image
pub trait ImageSource {
    /// `Ok(None)` means the user dismissed the picker
    fn pick(&self) -> Result<Option<PathBuf>, PickError>;
}

/// The platform's native open-file dialog
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeImagePicker;

impl ImageSource for NativeImagePicker {
    fn pick(&self) -> Result<Option<PathBuf>, PickError> {
        let future = async {
            rfd::AsyncFileDialog::new()
                .set_title("Pick an image from gallery")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
        };
        let picked = futures::executor::block_on(future).map(|handle| handle.path().to_path_buf());
        match &picked {
            Some(path) => log::info!("Picked {}", path.display()),
            None => log::debug!("Image picker dismissed"),
        }
        Ok(picked)
    }
}

/// True if the path has an image extension we can decode
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Read and decode an image file into a background
pub fn load_background(path: &Path) -> Result<BackgroundImage, PickError> {
    let bytes = std::fs::read(path).map_err(|source| PickError::Read {
        path: path.to_owned(),
        source,
    })?;
    decode_background(path, &bytes)
}

/// Decode in-memory image bytes into a background
pub fn decode_background(path: &Path, bytes: &[u8]) -> Result<BackgroundImage, PickError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| PickError::Decode {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("Decoded {}: {}x{}", path.display(), decoded.width(), decoded.height());
    Ok(BackgroundImage::new(path, decoded.to_rgba8()))
}
