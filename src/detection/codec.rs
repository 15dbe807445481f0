use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, RgbImage};

use crate::error::ProcessingError;

/// Decode an encoded raster image (any format the `image` crate recognizes)
/// into an 8-bit RGB grid.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, ProcessingError> {
    if bytes.is_empty() {
        return Err(ProcessingError::decode("input buffer is empty"));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProcessingError::decode(format!("failed to read image header: {}", e)))?;

    if reader.format().is_none() {
        return Err(ProcessingError::decode("unrecognized image encoding"));
    }

    let img = reader
        .decode()
        .map_err(|e| ProcessingError::decode(format!("failed to decode image: {}", e)))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(ProcessingError::decode("decoded image has no pixels"));
    }

    Ok(img.to_rgb8())
}

/// Encode an RGB grid as baseline JPEG.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| ProcessingError::encode(format!("failed to encode JPEG: {}", e)))?;

    if buffer.is_empty() {
        return Err(ProcessingError::encode("encoder produced an empty buffer"));
    }

    Ok(buffer)
}
