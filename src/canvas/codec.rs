use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("not a base64 image data URL")]
    NotDataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Encode the raster as a `data:image/png;base64,...` string
pub fn encode_data_url(pixels: &RgbaImage) -> Result<String, CodecError> {
    let mut png = Cursor::new(Vec::new());
    pixels.write_to(&mut png, ImageFormat::Png)?;
    Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png.into_inner())))
}

/// Decode an image data URL back to RGBA pixels
pub fn decode_data_url(data_url: &str) -> Result<RgbaImage, CodecError> {
    let rest = data_url.trim().strip_prefix("data:image/").ok_or(CodecError::NotDataUrl)?;
    let (_, payload) = rest.split_once(";base64,").ok_or(CodecError::NotDataUrl)?;
    let bytes = STANDARD.decode(payload)?;
    let image = image::load_from_memory(&bytes)?;
    Ok(image.to_rgba8())
}
