//! Still-frame encoding for the suggestion service.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use super::media::RgbaFrame;
use crate::error::{OptionExt, ReefTagResult};

/// Encode an RGBA frame as a JPEG `data:` URL.
pub fn encode_jpeg_data_url(frame: RgbaFrame, quality: u8) -> ReefTagResult<String> {
    let (width, height) = (frame.width, frame.height);
    let rgba = RgbaImage::from_raw(width, height, frame.data)
        .context("frame buffer does not match its dimensions")?;

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
        rgb.as_raw(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;

    log::debug!(
        "[PLAYER] Encoded {}x{} frame to {} bytes (q={})",
        width,
        height,
        bytes.len(),
        quality
    );
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&bytes)))
}
