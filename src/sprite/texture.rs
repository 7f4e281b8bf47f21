//! Decoded sprite textures.

use crate::error::{OverlayError, Result};
use crate::geometry::Rect;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// The decoded sprite sheet of one overlay.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    path: PathBuf,
    image: RgbaImage,
}

impl SpriteSheet {
    /// Read and decode an image file. Any failure is an `AssetError` naming the path.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| OverlayError::asset_io(path, e))?;
        Self::from_bytes(path, &bytes)
    }

    /// Decode an in-memory image; `path` is only used for error messages.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| OverlayError::asset(path, format!("cannot decode texture: {e}")))?
            .to_rgba8();
        log::debug!(
            "Decoded texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self {
            path: path.to_path_buf(),
            image,
        })
    }

    pub fn from_image(path: impl Into<PathBuf>, image: RgbaImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy out one sprite region. Returns `None` when the region is not inside the sheet.
    pub fn crop(&self, rect: Rect) -> Option<RgbaImage> {
        let (width, height) = self.dimensions();
        if !rect.fits_within(width, height) {
            return None;
        }
        Some(
            image::imageops::crop_imm(
                &self.image,
                rect.x as u32,
                rect.y as u32,
                rect.width as u32,
                rect.height as u32,
            )
            .to_image(),
        )
    }
}
