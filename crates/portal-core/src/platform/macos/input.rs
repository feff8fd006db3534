/*! Mouse, scroll, and keyboard event synthesis via `CGEvent`. */

#![allow(unsafe_code)]

use crate::error::{PlatformError, PlatformResult};
use crate::platform::traits::KeyInput;
use crate::types::{KeyModifier, MouseButton};
use objc2_core_graphics::{
  CGEvent, CGEventFlags, CGEventSource, CGEventSourceStateID, CGEventTapLocation, CGEventType, CGMouseButton,
  CGPoint,
};

fn source() -> PlatformResult<objc2_core_foundation::CFRetained<CGEventSource>> {
  CGEventSource::new(CGEventSourceStateID::HIDSystemState)
    .ok_or_else(|| PlatformError::Os { code: -1, message: "CGEventSourceCreate failed".into() })
}

fn modifier_flags(modifiers: &[KeyModifier]) -> CGEventFlags {
  let mut flags = CGEventFlags::empty();
  for modifier in modifiers {
    flags |= match modifier {
      KeyModifier::Cmd => CGEventFlags::MaskCommand,
      KeyModifier::Ctrl => CGEventFlags::MaskControl,
      KeyModifier::Alt => CGEventFlags::MaskAlternate,
      KeyModifier::Shift => CGEventFlags::MaskShift,
      KeyModifier::Fn => CGEventFlags::MaskSecondaryFn,
    };
  }
  flags
}

/// Post to the global HID event stream, or to a specific process's event
/// queue so it reaches a background (non-frontmost) application.
fn dispatch(event: &CGEvent, target_pid: Option<i32>) {
  match target_pid {
    Some(pid) => unsafe { CGEvent::post_to_pid(pid, Some(event)) },
    None => unsafe { CGEvent::post(CGEventTapLocation::HIDEventTap, Some(event)) },
  }
}

fn mouse_button_kind(button: MouseButton) -> (CGMouseButton, CGEventType, CGEventType, CGEventType) {
  match button {
    MouseButton::Left => (CGMouseButton::Left, CGEventType::LeftMouseDown, CGEventType::LeftMouseUp, CGEventType::LeftMouseDragged),
    MouseButton::Right => (CGMouseButton::Right, CGEventType::RightMouseDown, CGEventType::RightMouseUp, CGEventType::RightMouseDragged),
    MouseButton::Center => (CGMouseButton::Center, CGEventType::OtherMouseDown, CGEventType::OtherMouseUp, CGEventType::OtherMouseDragged),
  }
}

/// Post a click (down, then up `count` times) at `(x, y)` in global screen
/// coordinates. `count` &gt; 1 produces a double/triple click by setting the
/// click-state field on the synthesized events, matching how real input
/// devices report multi-clicks.
pub(super) fn post_click(
  x: f64,
  y: f64,
  button: MouseButton,
  count: u32,
  modifiers: &[KeyModifier],
  target_pid: Option<i32>,
) -> PlatformResult<()> {
  let src = source()?;
  let (cg_button, down_kind, up_kind, _drag_kind) = mouse_button_kind(button);
  let point = CGPoint { x, y };
  let flags = modifier_flags(modifiers);

  for click_state in 1..=count.max(1) {
    let down = CGEvent::new_mouse_event(Some(&src), down_kind, point, cg_button)
      .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create mouse-down event".into() })?;
    down.set_flags(flags);
    down.set_integer_value_field(objc2_core_graphics::CGEventField::MouseEventClickState, i64::from(click_state));
    dispatch(&down, target_pid);

    let up = CGEvent::new_mouse_event(Some(&src), up_kind, point, cg_button)
      .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create mouse-up event".into() })?;
    up.set_flags(flags);
    up.set_integer_value_field(objc2_core_graphics::CGEventField::MouseEventClickState, i64::from(click_state));
    dispatch(&up, target_pid);
  }
  Ok(())
}

/// Post a scroll-wheel event at `(x, y)`. `dx`/`dy` are line-count deltas,
/// matching the sign convention of two-finger trackpad scrolling (positive
/// `dy` scrolls content up). Global scrolling goes wherever the cursor
/// currently is, so the caller is expected to have moved it first; a
/// process-targeted scroll is delivered directly regardless of cursor
/// position.
pub(super) fn post_scroll(x: f64, y: f64, dx: f64, dy: f64, target_pid: Option<i32>) -> PlatformResult<()> {
  if target_pid.is_none() {
    move_cursor(x, y)?;
  }
  let src = source()?;
  let event = CGEvent::new_scroll_wheel_event2(
    Some(&src),
    objc2_core_graphics::CGScrollEventUnit::Line,
    2,
    dy.round() as i32,
    dx.round() as i32,
    0,
  )
  .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create scroll event".into() })?;
  dispatch(&event, target_pid);
  Ok(())
}

/// Move the cursor to `(x, y)` without a click.
fn move_cursor(x: f64, y: f64) -> PlatformResult<()> {
  let src = source()?;
  let event = CGEvent::new_mouse_event(Some(&src), CGEventType::MouseMoved, CGPoint { x, y }, CGMouseButton::Left)
    .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create mouse-move event".into() })?;
  dispatch(&event, None);
  Ok(())
}

/// Post a single keycode press (down + up) with modifiers held for its
/// duration.
pub(super) fn post_key(keycode: u16, modifiers: &[KeyModifier], target_pid: Option<i32>) -> PlatformResult<()> {
  let src = source()?;
  let flags = modifier_flags(modifiers);

  let down = CGEvent::new_keyboard_event(Some(&src), keycode, true)
    .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create key-down event".into() })?;
  down.set_flags(flags);
  dispatch(&down, target_pid);

  let up = CGEvent::new_keyboard_event(Some(&src), keycode, false)
    .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create key-up event".into() })?;
  up.set_flags(flags);
  dispatch(&up, target_pid);
  Ok(())
}

/// Post a character, either via its mapped keycode (for a known ASCII key,
/// so it participates normally in key-repeat/shortcut handling) or, for
/// characters outside the ASCII keyboard map, as a synthetic Unicode string
/// attached to an otherwise-unused keycode.
pub(super) fn post_char(input: KeyInput, target_pid: Option<i32>) -> PlatformResult<()> {
  match input {
    KeyInput::Keycode { code, shift } => {
      let modifiers = if shift { &[KeyModifier::Shift][..] } else { &[][..] };
      post_key(code, modifiers, target_pid)
    }
    KeyInput::Unicode(ch) => {
      let src = source()?;
      let mut buf = [0u16; 2];
      let units = ch.encode_utf16(&mut buf);

      let down = CGEvent::new_keyboard_event(Some(&src), 0, true)
        .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create key-down event".into() })?;
      unsafe { down.set_string_from_utf16_unicode_string(units) };
      dispatch(&down, target_pid);

      let up = CGEvent::new_keyboard_event(Some(&src), 0, false)
        .ok_or_else(|| PlatformError::Os { code: -1, message: "failed to create key-up event".into() })?;
      unsafe { up.set_string_from_utf16_unicode_string(units) };
      dispatch(&up, target_pid);
      Ok(())
    }
  }
}
