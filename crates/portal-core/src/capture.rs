/*!
PNG/JPEG encoding of captured pixel buffers.

Screen capture (`platform::Platform::capture_display`/`capture_window`)
returns raw RGBA8; `/screenshot` needs bytes in a format a browser or CLI
client can consume directly. This is pure `image`-crate plumbing with no
platform dependency, so it lives at the crate root rather than under
`platform::macos`.
*/

use crate::error::{PlatformError, PlatformResult};
use crate::platform::CapturedImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Encode a captured buffer as PNG, alpha channel intact.
pub fn encode_png(image: &CapturedImage) -> PlatformResult<Vec<u8>> {
  let mut out = Vec::new();
  PngEncoder::new(&mut out)
    .write_image(&image.rgba8, image.width, image.height, ExtendedColorType::Rgba8)
    .map_err(|err| PlatformError::EncodeFailed(err.to_string()))?;
  Ok(out)
}

/// Encode a captured buffer as JPEG. JPEG has no alpha channel, so it is
/// dropped before encoding.
pub fn encode_jpeg(image: &CapturedImage) -> PlatformResult<Vec<u8>> {
  let mut out = Vec::new();
  let rgb: Vec<u8> = image.rgba8.chunks_exact(4).flat_map(|pixel| [pixel[0], pixel[1], pixel[2]]).collect();
  JpegEncoder::new(&mut out)
    .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
    .map_err(|err| PlatformError::EncodeFailed(err.to_string()))?;
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn solid_image() -> CapturedImage {
    CapturedImage { width: 2, height: 2, rgba8: vec![255; 2 * 2 * 4] }
  }

  #[test]
  fn encode_png_produces_a_decodable_image() {
    let bytes = encode_png(&solid_image()).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 2);
    assert_eq!(decoded.height(), 2);
  }

  #[test]
  fn encode_jpeg_produces_a_decodable_image() {
    let bytes = encode_jpeg(&solid_image()).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 2);
    assert_eq!(decoded.height(), 2);
  }
}
