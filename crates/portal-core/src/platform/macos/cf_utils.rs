/*! Core Foundation dictionary helpers shared by window enumeration and capture. */

#![allow(unsafe_code)]

use objc2_core_foundation::{CFBoolean, CFDictionary, CFNumber, CFNumberType, CFRetained, CFString, CGRect};
use objc2_core_graphics::CGRectMakeWithDictionaryRepresentation;
use std::ffi::c_void;

fn get_value<T>(dict: &CFDictionary, key: &str) -> Option<*const T> {
  let key = CFString::from_str(key);
  let key_ref = key.as_ref() as *const CFString;
  if unsafe { CFDictionary::contains_ptr_key(dict, key_ref.cast()) } {
    Some(unsafe { CFDictionary::value(dict, key_ref.cast()) }.cast::<T>())
  } else {
    None
  }
}

pub(super) fn get_i32(dict: &CFDictionary, key: &str) -> i32 {
  unsafe {
    let mut value: i32 = 0;
    if let Some(number) = get_value::<CFNumber>(dict, key) {
      CFNumber::value(&*number, CFNumberType::IntType, (&raw mut value).cast::<c_void>());
    }
    value
  }
}

pub(super) fn get_bool(dict: &CFDictionary, key: &str) -> bool {
  unsafe { get_value::<CFBoolean>(dict, key).is_some_and(|value| CFBoolean::value(&*value)) }
}

pub(super) fn get_string(dict: &CFDictionary, key: &str) -> String {
  unsafe { get_value::<CFString>(dict, key).map(|value| (*value).to_string()).unwrap_or_default() }
}

pub(super) fn get_window_bounds(dict: &CFDictionary) -> Option<CGRect> {
  let dict_rect = get_value::<CFDictionary>(dict, "kCGWindowBounds")?;
  unsafe {
    let mut rect = CGRect::default();
    (!dict_rect.is_null() && CGRectMakeWithDictionaryRepresentation(Some(&*dict_rect), &raw mut rect)).then_some(rect)
  }
}

pub(super) fn retain_dictionary(ptr: *const CFDictionary) -> Option<CFRetained<CFDictionary>> {
  if ptr.is_null() {
    None
  } else {
    Some(unsafe { CFRetained::retain(std::ptr::NonNull::from(&*ptr)) })
  }
}
