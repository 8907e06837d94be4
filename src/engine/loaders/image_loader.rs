use std::io::Cursor;
use std::path::Path;

use image::io::Reader as ImageReader;
use log::{ debug, info };

use crate::engine::error::AssetError;

/// Decoded raster, always RGBA8 with tightly packed rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub fn decode_rgba8(bytes: &[u8]) -> Result<ImageData, AssetError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .decode()?;

    debug!("source color type: {:?}", img.color());

    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();

    Ok(ImageData {
        width,
        height,
        pixels: rgba_img.into_raw(),
    })
}

pub fn load_rgba8(path: &Path) -> Result<ImageData, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decode_rgba8(&bytes)?;
    info!("loaded texture {:?}: {}x{}", path, image.width, image.height);
    Ok(image)
}
