// src/proposal/banner.rs
use crate::domain::errors::{BannerError, BannerResult};
use std::path::Path;

/// Decoded banner, stored as 8-bit RGB pixels
#[derive(Debug, Clone, PartialEq)]
pub struct BannerImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl BannerImage {
    /// Decode an image in any format the `image` crate understands
    pub fn from_bytes(bytes: &[u8]) -> BannerResult<Self> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        if width == 0 || height == 0 {
            return Err(BannerError::Blank);
        }

        Ok(Self {
            width,
            height,
            rgb: rgb.into_raw(),
        })
    }

    /// Height for a given width, keeping the aspect ratio
    pub fn scaled_height(&self, width: f32) -> f32 {
        width * self.height as f32 / self.width as f32
    }
}

/// Load the banner from disk. Callers fall back to a text title on error.
pub fn load_banner<P: AsRef<Path>>(path: P) -> BannerResult<BannerImage> {
    let bytes = std::fs::read(path.as_ref())?;
    let banner = BannerImage::from_bytes(&bytes)?;

    log::debug!(
        "Loaded banner {} ({}x{})",
        path.as_ref().display(),
        banner.width,
        banner.height
    );
    Ok(banner)
}
