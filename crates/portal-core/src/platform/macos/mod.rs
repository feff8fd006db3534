/*!
macOS implementation of [`Platform`], composing the accessibility, input,
screen-capture, and process-discovery primitives in the sibling modules.

Every method here is expected to run on the dedicated main-thread executor
(see [`crate::executor`]) - AX and CG calls are not guaranteed safe from an
arbitrary thread, and this struct does no synchronization of its own.
*/

#![allow(unsafe_code)]

mod cf_utils;
mod handles;
mod input;
mod mapping;
mod menu;
mod process;
mod screen;
mod tree;
mod util;
mod windows;

use super::traits::{CapturedImage, ElementAttributes, KeyInput, Platform};
use crate::error::{PlatformError, PlatformResult};
use crate::types::{ActionKind, ElementPath, KeyModifier, MenuItemInfo, MouseButton, TargetApp, WindowInfo};
use mapping::WRITABLE_ROLES;

#[derive(Debug, Default, Clone, Copy)]
pub struct MacosPlatform;

impl MacosPlatform {
  pub fn new() -> Self {
    Self
  }
}

impl Platform for MacosPlatform {
  fn accessibility_permission_granted(&self) -> bool {
    util::accessibility_trusted()
  }

  fn screen_recording_permission_granted(&self) -> bool {
    util::screen_capture_trusted()
  }

  fn open_accessibility_settings(&self) {
    open_settings_pane("Privacy_Accessibility");
  }

  fn open_screen_recording_settings(&self) {
    open_settings_pane("Privacy_ScreenCapture");
  }

  fn frontmost_app(&self) -> Option<TargetApp> {
    process::frontmost_app()
  }

  fn find_app(&self, spec: &str) -> Option<TargetApp> {
    process::find_app(spec)
  }

  fn launch_app(&self, spec: &str) -> PlatformResult<TargetApp> {
    process::launch_app(spec)
  }

  fn is_process_alive(&self, pid: i32) -> bool {
    process::is_process_alive(pid)
  }

  fn screen_size(&self) -> (f64, f64) {
    windows::screen_size()
  }

  fn list_windows(&self) -> Vec<WindowInfo> {
    windows::list_windows()
  }

  fn resolve(&self, path: &ElementPath) -> PlatformResult<ElementAttributes> {
    Ok(tree::resolve(path)?.fetch_attributes())
  }

  fn child_count(&self, path: &ElementPath) -> PlatformResult<usize> {
    tree::child_count(path)
  }

  fn focused_path(&self, pid: i32) -> PlatformResult<Option<ElementPath>> {
    tree::focused_path(pid)
  }

  fn set_value(&self, path: &ElementPath, value: &str) -> PlatformResult<()> {
    let handle = tree::resolve(path)?;
    let role = handle.get_string("AXRole").unwrap_or_default();
    if !WRITABLE_ROLES.contains(&role.as_str()) {
      return Err(PlatformError::SetValueFailed(format!("role '{role}' is not writable")));
    }
    handle
      .set_string_value(value)
      .map_err(|err| PlatformError::SetValueFailed(format!("{err:?}")))
  }

  fn perform_action(&self, path: &ElementPath, action: ActionKind, value: Option<&str>) -> PlatformResult<()> {
    let handle = tree::resolve(path)?;
    match action {
      ActionKind::SetValue => {
        let value = value.ok_or_else(|| PlatformError::ActionFailed {
          action: "setValue".into(),
          reason: "missing value".into(),
        })?;
        self.set_value(path, value)
      }
      ActionKind::Focus => handle
        .set_bool_value("AXFocused", true)
        .map_err(|err| PlatformError::ActionFailed { action: "focus".into(), reason: format!("{err:?}") }),
      other => {
        let ax_action = mapping::action_to_macos(other).expect("non-SetValue/Focus actions map to an AX action name");
        handle
          .perform_action_raw(ax_action)
          .map_err(|err| PlatformError::ActionFailed { action: format!("{other:?}"), reason: format!("{err:?}") })
      }
    }
  }

  fn menu_tree(&self, pid: i32, max_depth: usize) -> PlatformResult<Vec<MenuItemInfo>> {
    menu::menu_tree(pid, max_depth)
  }

  fn press_menu_path(&self, pid: i32, titles: &[String], background: bool) -> PlatformResult<()> {
    if !background {
      process::activate_app(pid)?;
    }
    menu::press_menu_path(pid, titles)
  }

  fn global_click(&self, x: f64, y: f64, button: MouseButton, count: u32, modifiers: &[KeyModifier]) -> PlatformResult<()> {
    input::post_click(x, y, button, count, modifiers, None)
  }

  fn global_scroll(&self, x: f64, y: f64, dx: f64, dy: f64) -> PlatformResult<()> {
    input::post_scroll(x, y, dx, dy, None)
  }

  fn global_key_press(&self, keycode: u16, modifiers: &[KeyModifier]) -> PlatformResult<()> {
    input::post_key(keycode, modifiers, None)
  }

  fn global_type_char(&self, input: KeyInput) -> PlatformResult<()> {
    input::post_char(input, None)
  }

  fn targeted_scroll(&self, pid: i32, x: f64, y: f64, dx: f64, dy: f64) -> PlatformResult<()> {
    input::post_scroll(x, y, dx, dy, Some(pid))
  }

  fn targeted_key_press(&self, pid: i32, keycode: u16, modifiers: &[KeyModifier]) -> PlatformResult<()> {
    input::post_key(keycode, modifiers, Some(pid))
  }

  fn targeted_type_char(&self, pid: i32, input: KeyInput) -> PlatformResult<()> {
    input::post_char(input, Some(pid))
  }

  fn capture_display(&self, display_id: Option<u32>) -> PlatformResult<CapturedImage> {
    if !self.screen_recording_permission_granted() {
      return Err(PlatformError::ScreenRecordingPermissionDenied);
    }
    screen::capture_display(display_id)
  }

  fn capture_window(&self, window_id: u32) -> PlatformResult<CapturedImage> {
    if !self.screen_recording_permission_granted() {
      return Err(PlatformError::ScreenRecordingPermissionDenied);
    }
    screen::capture_window(window_id)
  }

  fn char_to_key_input(&self, ch: char) -> KeyInput {
    match mapping::ascii_to_keycode(ch) {
      Some((code, shift)) => KeyInput::Keycode { code, shift },
      None => KeyInput::Unicode(ch),
    }
  }

  fn resolve_key_name(&self, name: &str) -> Option<u16> {
    mapping::named_key_to_keycode(name)
  }
}

fn open_settings_pane(pane: &str) {
  let url = format!("x-apple.systempreferences:com.apple.preference.security?{pane}");
  process::open_url(&url);
}
