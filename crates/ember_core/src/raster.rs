//! Raster image loading for image-mapped textures.
//!
//! Images are decoded once, up front, into a flat RGB8 buffer that texture
//! lookups index without further decoding. A missing or unreadable file
//! degrades to an empty raster so the texture can fall back to its debug
//! color instead of aborting the render.

use std::path::Path;

use thiserror::Error;

/// Errors raised while decoding an image file.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded RGB8 raster, row-major, three bytes per pixel.
#[derive(Clone, Debug)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// A zero-size raster; texture lookups against it yield a debug color.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Wrap raw RGB8 data. `data` must hold `width * height * 3` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode an image file into an RGB8 raster.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let decoded = image::open(path)?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!("loaded raster {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    /// Decode an image file, degrading to [`RasterImage::empty`] on failure.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(raster) => raster,
            Err(err) => {
                log::warn!(
                    "could not load raster {}: {err}; texture will use its debug color",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The RGB bytes of pixel (x, y), with out-of-range coordinates clamped
    /// to the raster edge. Must not be called on an empty raster.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = ((y * self.width + x) * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_indexes_row_major() {
        // 2x2: red, green / blue, white
        let raster = RasterImage::from_raw(
            2,
            2,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        );
        assert_eq!(raster.pixel(0, 0), [255, 0, 0]);
        assert_eq!(raster.pixel(1, 0), [0, 255, 0]);
        assert_eq!(raster.pixel(0, 1), [0, 0, 255]);
        assert_eq!(raster.pixel(1, 1), [255, 255, 255]);
    }

    #[test]
    fn out_of_range_lookups_clamp() {
        let raster = RasterImage::from_raw(1, 1, vec![10, 20, 30]);
        assert_eq!(raster.pixel(5, 9), [10, 20, 30]);
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let raster = RasterImage::load_or_empty("/nonexistent/texture.png");
        assert!(raster.is_empty());
        assert_eq!(raster.height(), 0);
    }
}
