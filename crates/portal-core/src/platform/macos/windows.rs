/*! On-screen window enumeration via `CGWindowListCopyWindowInfo`. */

#![allow(unsafe_code)]
#![allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]

use super::cf_utils::{get_bool, get_i32, get_string, get_window_bounds, retain_dictionary};
use crate::types::{ElementFrame, WindowInfo};
use objc2_core_foundation::{CFArray, CFDictionary};
use objc2_core_graphics::{kCGNullWindowID, CGWindowListCopyWindowInfo, CGWindowListOption};

/// System UI owners never worth exposing as automation targets.
const FILTERED_OWNER_NAMES: &[&str] = &["Dock", "Window Server", "Screenshot"];

/// Enumerate on-screen windows, frontmost first (`CGWindowListCopyWindowInfo`
/// already reports them in z-order).
pub(super) fn list_windows() -> Vec<WindowInfo> {
  objc2::rc::autoreleasepool(|_pool| list_windows_inner())
}

fn list_windows_inner() -> Vec<WindowInfo> {
  let mut windows = Vec::new();
  let option = CGWindowListOption::OptionOnScreenOnly | CGWindowListOption::ExcludeDesktopElements;
  let Some(list) = CGWindowListCopyWindowInfo(option, kCGNullWindowID) else {
    return windows;
  };

  for index in 0..CFArray::count(&list) {
    let dict_ptr = unsafe { CFArray::value_at_index(&list, index).cast::<CFDictionary>() };
    let Some(dict) = retain_dictionary(dict_ptr) else {
      continue;
    };

    if !get_bool(&dict, "kCGWindowIsOnscreen") {
      continue;
    }
    let layer = get_i32(&dict, "kCGWindowLayer");
    if !(0..=100).contains(&layer) {
      continue;
    }
    let Some(bounds) = get_window_bounds(&dict) else {
      continue;
    };
    if bounds.size.width < 1.0 || bounds.size.height < 1.0 {
      continue;
    }

    let pid = get_i32(&dict, "kCGWindowOwnerPID");
    if pid <= 0 {
      continue;
    }
    let owner_name = get_string(&dict, "kCGWindowOwnerName");
    if FILTERED_OWNER_NAMES.contains(&owner_name.as_str()) {
      continue;
    }
    let owner_bundle_id = super::process::find_app(&owner_name).and_then(|app| app.bundle_id);

    windows.push(WindowInfo {
      window_id: get_i32(&dict, "kCGWindowNumber") as u32,
      title: get_string(&dict, "kCGWindowName"),
      owner_name,
      owner_bundle_id,
      pid,
      frame: ElementFrame { x: bounds.origin.x, y: bounds.origin.y, width: bounds.size.width, height: bounds.size.height },
      is_on_screen: true,
    });
  }
  windows
}

pub(super) fn screen_size() -> (f64, f64) {
  let bounds = unsafe { objc2_core_graphics::CGDisplayBounds(objc2_core_graphics::CGMainDisplayID()) };
  (bounds.size.width, bounds.size.height)
}
