/*! Display and window capture via `CGWindowListCreateImage`. */

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::error::{PlatformError, PlatformResult};
use crate::platform::traits::CapturedImage;
use objc2_core_foundation::{CFData, CGRect};
use objc2_core_graphics::{
  CGDisplayBounds, CGImage, CGMainDisplayID, CGWindowID, CGWindowImageOption, CGWindowListCreateImage, CGWindowListOption,
};

/// Extract a tightly-packed RGBA8 buffer from a `CGImage`. The window-server
/// image is 32bpp with a one-byte alpha channel; `CGImageGetBytesPerRow` may
/// exceed `width * 4` for stride/alignment padding, so each row is copied
/// individually rather than treating the provider's buffer as contiguous.
///
/// `CGWindowListCreateImage` always returns host-endian,
/// premultiplied-alpha-first pixels: on every Mac this process runs on (all
/// little-endian), the in-memory byte sequence per pixel is B, G, R, A - not
/// R, G, B, A. Copying those bytes straight into a buffer labeled RGBA8 swaps
/// the red and blue channels of every captured pixel, so each pixel is
/// reordered here while copying.
fn to_rgba8(image: &CGImage) -> PlatformResult<CapturedImage> {
  let width = unsafe { CGImage::width(Some(image)) };
  let height = unsafe { CGImage::height(Some(image)) };
  if width == 0 || height == 0 {
    return Err(PlatformError::CaptureFailed("empty image".into()));
  }

  let provider = unsafe { CGImage::data_provider(Some(image)) }
    .ok_or_else(|| PlatformError::CaptureFailed("no data provider".into()))?;
  let data = unsafe { objc2_core_graphics::CGDataProviderCopyData(Some(&provider)) }
    .ok_or_else(|| PlatformError::CaptureFailed("failed to copy pixel data".into()))?;

  let stride = unsafe { CGImage::bytes_per_row(Some(image)) };
  let raw = CFData::bytes(&data);
  let raw_len = CFData::length(&data) as usize;

  let mut rgba8 = vec![0u8; width * height * 4];
  for row in 0..height {
    let src_offset = row * stride;
    if src_offset + width * 4 > raw_len {
      break;
    }
    let src = unsafe { std::slice::from_raw_parts(raw.add(src_offset), width * 4) };
    let dst = &mut rgba8[row * width * 4..(row + 1) * width * 4];
    for (src_px, dst_px) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
      // src_px is [B, G, R, A]; reorder to [R, G, B, A].
      dst_px[0] = src_px[2];
      dst_px[1] = src_px[1];
      dst_px[2] = src_px[0];
      dst_px[3] = src_px[3];
    }
  }

  Ok(CapturedImage { width: width as u32, height: height as u32, rgba8 })
}

pub(super) fn capture_display(display_id: Option<u32>) -> PlatformResult<CapturedImage> {
  let display_id = display_id.unwrap_or_else(|| unsafe { CGMainDisplayID() });
  let bounds = unsafe { CGDisplayBounds(display_id) };
  capture_rect(bounds, None)
}

pub(super) fn capture_window(window_id: u32) -> PlatformResult<CapturedImage> {
  let null_rect = CGRect::default();
  capture_rect(null_rect, Some(window_id as CGWindowID))
}

fn capture_rect(bounds: CGRect, window_id: Option<CGWindowID>) -> PlatformResult<CapturedImage> {
  let (list_option, window_id) = match window_id {
    Some(id) => (CGWindowListOption::OptionIncludingWindow, id),
    None => (CGWindowListOption::OptionOnScreenOnly, 0),
  };
  let image = CGWindowListCreateImage(bounds, list_option, window_id, CGWindowImageOption::BoundsIgnoreFraming)
    .ok_or_else(|| PlatformError::CaptureFailed("CGWindowListCreateImage returned null".into()))?;
  to_rgba8(&image)
}
