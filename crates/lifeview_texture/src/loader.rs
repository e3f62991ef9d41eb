//! Image decoding and upload

use std::path::Path;

use lifeview_core::{NativeTexture, Surface};

use crate::{Result, TextureError};

/// Decoded image data ready for upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pixels: Vec<u8>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

impl ImageData {
    /// Create ImageData from raw RGBA pixels
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected_len = width as usize * height as usize * 4;
        if pixels.len() != expected_len {
            return Err(TextureError::Decode(format!(
                "Invalid pixel data length: expected {}, got {}",
                expected_len,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Read and decode an image file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| TextureError::FileLoad(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("decoding image {}", path.display());
        Self::from_bytes(&data)
    }

    /// Decode image from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)?;
        Ok(Self::from_dynamic_image(img))
    }

    fn from_dynamic_image(img: image::DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            pixels: rgba.into_raw(),
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Create a native texture from the pixels
    pub fn upload(&self, surface: &mut dyn Surface) -> Result<Box<dyn NativeTexture>> {
        Ok(surface.create_texture(&self.pixels, self.width, self.height)?)
    }
}
