/*!
A thin, stateless wrapper around `AXUIElement`.

Unlike a cached element registry, a [`ElementHandle`] carries no identity
beyond the underlying `AXUIElement` reference for the current call - every
method re-reads the live tree. Callers obtain one by walking fresh from
[`super::util::app_element`] via [`super::tree::resolve`] on every request.
*/

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use super::mapping::action_from_macos;
use crate::platform::ElementAttributes;
use crate::types::ElementFrame;
use objc2_application_services::{AXError, AXUIElement, AXValue as AXValueRef, AXValueType};
use objc2_core_foundation::{CFArray, CFBoolean, CFRetained, CFString, CFType, CGPoint, CGSize};
use std::ffi::c_void;
use std::ptr::NonNull;

// Not exposed by objc2-core-foundation.
extern "C" {
  fn CFEqual(cf1: *const c_void, cf2: *const c_void) -> u8;
}

#[derive(Clone)]
pub(super) struct ElementHandle {
  inner: CFRetained<AXUIElement>,
}

impl ElementHandle {
  pub(super) const fn new(inner: CFRetained<AXUIElement>) -> Self {
    Self { inner }
  }

  pub(super) fn inner(&self) -> &AXUIElement {
    &self.inner
  }

  fn get_raw_attr(&self, attr: &str) -> Option<CFRetained<CFType>> {
    let name = CFString::from_str(attr);
    unsafe {
      let mut value: *const CFType = std::ptr::null();
      let result = self.inner.copy_attribute_value(&name, NonNull::new(&raw mut value)?);
      if result != AXError::Success || value.is_null() {
        return None;
      }
      Some(CFRetained::from_raw(NonNull::new_unchecked(value.cast_mut())))
    }
  }

  pub(super) fn get_string(&self, attr: &str) -> Option<String> {
    let value = self.get_raw_attr(attr)?;
    let s = value.downcast_ref::<CFString>()?.to_string();
    if s.is_empty() { None } else { Some(s) }
  }

  pub(super) fn get_bool(&self, attr: &str) -> Option<bool> {
    let value = self.get_raw_attr(attr)?;
    value.downcast_ref::<CFBoolean>().map(objc2_core_foundation::CFBoolean::as_bool)
  }

  pub(super) fn get_bounds(&self) -> Option<ElementFrame> {
    let pos = self.get_raw_attr("AXPosition")?;
    let size = self.get_raw_attr("AXSize")?;

    let point = pos.downcast_ref::<AXValueRef>().and_then(|v| unsafe {
      let mut out = CGPoint::default();
      v.value(AXValueType::CGPoint, NonNull::from(&mut out).cast()).then_some(out)
    })?;
    let dims = size.downcast_ref::<AXValueRef>().and_then(|v| unsafe {
      let mut out = CGSize::default();
      v.value(AXValueType::CGSize, NonNull::from(&mut out).cast()).then_some(out)
    })?;

    Some(ElementFrame { x: point.x, y: point.y, width: dims.width, height: dims.height })
  }

  /// Children in on-screen order, as reported by `AXChildren`.
  pub(super) fn get_children(&self) -> Vec<ElementHandle> {
    let Some(value) = self.get_raw_attr("AXChildren") else {
      return Vec::new();
    };
    let Ok(array) = value.downcast::<CFArray>() else {
      return Vec::new();
    };
    // SAFETY: AXChildren always holds AXUIElement entries.
    let typed: CFRetained<CFArray<AXUIElement>> = unsafe { CFRetained::cast_unchecked(array) };
    (0..typed.len()).filter_map(|i| typed.get(i)).map(ElementHandle::new).collect()
  }

  pub(super) fn get_element(&self, attr: &str) -> Option<ElementHandle> {
    let value = self.get_raw_attr(attr)?;
    value.downcast::<AXUIElement>().ok().map(ElementHandle::new)
  }

  /// Semantic actions this node currently reports support for.
  pub(super) fn get_actions(&self) -> Vec<crate::types::ActionKind> {
    unsafe {
      let mut actions_ref: *const CFArray<CFString> = std::ptr::null();
      let result = self
        .inner
        .copy_action_names(NonNull::new((&raw mut actions_ref).cast::<*const CFArray>()).expect("actions ptr"));
      if result != AXError::Success || actions_ref.is_null() {
        return Vec::new();
      }
      let names = CFRetained::<CFArray<CFString>>::from_raw(NonNull::new_unchecked(actions_ref.cast_mut()));
      (0..names.len())
        .filter_map(|i| names.get(i))
        .filter_map(|s| action_from_macos(&s.to_string()))
        .collect()
    }
  }

  pub(super) fn perform_action_raw(&self, action: &str) -> Result<(), AXError> {
    let name = CFString::from_str(action);
    let result = unsafe { self.inner.perform_action(&name) };
    if result == AXError::Success { Ok(()) } else { Err(result) }
  }

  pub(super) fn set_string_value(&self, value: &str) -> Result<(), AXError> {
    let attr = CFString::from_static_str("AXValue");
    let cf_value = CFString::from_str(value);
    let result = unsafe { self.inner.set_attribute_value(&attr, &cf_value) };
    if result == AXError::Success { Ok(()) } else { Err(result) }
  }

  pub(super) fn set_bool_value(&self, attr: &str, value: bool) -> Result<(), AXError> {
    let attr = CFString::from_str(attr);
    let cf_value = CFBoolean::new(value);
    let result = unsafe { self.inner.set_attribute_value(&attr, &cf_value) };
    if result == AXError::Success { Ok(()) } else { Err(result) }
  }

  /// Identity comparison via `CFEqual`, not pointer equality - two handles
  /// can reference the same accessibility element through distinct
  /// `AXUIElement` instances.
  pub(super) fn cf_equal(&self, other: &Self) -> bool {
    let a = CFRetained::as_ptr(&self.inner).as_ptr().cast::<c_void>();
    let b = CFRetained::as_ptr(&other.inner).as_ptr().cast::<c_void>();
    unsafe { CFEqual(a, b) != 0 }
  }

  pub(super) fn pid(&self) -> Option<i32> {
    let mut pid: i32 = 0;
    let result = unsafe { self.inner.pid(NonNull::new(&raw mut pid)?) };
    (result == AXError::Success).then_some(pid)
  }

  /// Read every attribute the dispatch engine needs for one [`ElementAttributes`]
  /// snapshot. Deliberately not batched via `copyMultipleAttributeValues` -
  /// this crate resolves one element per call rather than a whole subtree,
  /// so the extra round trips are not on a hot path.
  pub(super) fn fetch_attributes(&self) -> ElementAttributes {
    let role = self.get_string("AXRole").unwrap_or_else(|| "AXUnknown".to_string());
    ElementAttributes {
      role,
      title: self.get_string("AXTitle"),
      label: self.get_string("AXDescription").or_else(|| self.get_string("AXHelp")),
      value: self.get_string("AXValue"),
      description: self.get_string("AXDescription"),
      frame: self.get_bounds(),
      is_enabled: self.get_bool("AXEnabled").unwrap_or(true),
      is_focused: self.get_bool("AXFocused").unwrap_or(false),
      actions: self.get_actions(),
    }
  }
}
