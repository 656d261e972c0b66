//! # Images
//!
//! Stamp and background images are decoded elsewhere and handed to the canvas as shared,
//! immutable bitmaps. Nothing in this crate writes to their pixels.

use std::sync::Arc;

/// Shared handle to an immutable bitmap. Outlives every stroke stamped with it.
pub type ImageRef = Arc<Bitmap>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    #[error("expected {expected} bytes of rgba data, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("bitmap dimensions overflow")]
    TooLarge,
}

/// Straight RGBA8 pixel data, row-major, no padding.
#[derive(PartialEq, Eq)]
pub struct Bitmap {
    size: [u32; 2],
    rgba: Box<[u8]>,
}
impl Bitmap {
    pub fn new(width: u32, height: u32, rgba: impl Into<Box<[u8]>>) -> Result<Self, BitmapError> {
        let rgba = rgba.into();
        let expected = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h)?.checked_mul(4))
            .ok_or(BitmapError::TooLarge)?;
        if rgba.len() != expected {
            return Err(BitmapError::LengthMismatch {
                expected,
                got: rgba.len(),
            });
        }
        Ok(Self {
            size: [width, height],
            rgba,
        })
    }
    /// Natural size, in pixels.
    #[must_use]
    pub fn size(&self) -> [u32; 2] {
        self.size
    }
    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
    #[must_use]
    pub fn into_ref(self) -> ImageRef {
        Arc::new(self)
    }
}
impl std::fmt::Debug for Bitmap {
    // Pixel data is noise in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap").field("size", &self.size).finish()
    }
}

/// How the background image is laid onto the canvas. Chosen once per canvas.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ImageRenderingMode {
    /// Stretch to fill the view bounds.
    Scale,
    /// Natural size, top-left corner at the origin.
    #[default]
    Original,
}
