/*!
Platform abstraction.

`Platform` is the seam between the dispatch engine and the OS. Every method
is synchronous and expected to run on the main-thread executor ([`crate::executor`]) -
implementations may assume single-threaded, serialized access to the
underlying OS facilities.

The macOS implementation lives in `platform::macos` and is the only one
built; other targets are out of scope (§1) and compile to a stub that
reports permissions as ungranted, matching the spec's description of these
facilities as external collaborators this core merely consumes.
*/

mod traits;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub use macos::MacosPlatform as CurrentPlatform;

#[cfg(not(target_os = "macos"))]
pub use unsupported::UnsupportedPlatform as CurrentPlatform;

pub use traits::{CapturedImage, ElementAttributes, KeyInput, Platform};

#[cfg(not(target_os = "macos"))]
mod unsupported {
  use super::traits::{CapturedImage, ElementAttributes, KeyInput, Platform};
  use crate::error::{PlatformError, PlatformResult};
  use crate::types::{
    ActionKind, ElementPath, KeyModifier, MenuItemInfo, MouseButton, TargetApp, WindowInfo,
  };

  /// Stand-in implementation for non-macOS builds. Every operation reports
  /// the permission as missing, since none of the underlying APIs exist.
  #[derive(Debug, Default, Clone, Copy)]
  pub struct UnsupportedPlatform;

  impl UnsupportedPlatform {
    pub fn new() -> Self {
      Self
    }
  }

  impl Platform for UnsupportedPlatform {
    fn accessibility_permission_granted(&self) -> bool {
      false
    }
    fn screen_recording_permission_granted(&self) -> bool {
      false
    }
    fn open_accessibility_settings(&self) {}
    fn open_screen_recording_settings(&self) {}
    fn frontmost_app(&self) -> Option<TargetApp> {
      None
    }
    fn find_app(&self, _spec: &str) -> Option<TargetApp> {
      None
    }
    fn launch_app(&self, spec: &str) -> PlatformResult<TargetApp> {
      Err(PlatformError::LaunchFailed(format!(
        "unsupported platform, cannot launch '{spec}'"
      )))
    }
    fn is_process_alive(&self, _pid: i32) -> bool {
      false
    }
    fn screen_size(&self) -> (f64, f64) {
      (0.0, 0.0)
    }
    fn list_windows(&self) -> Vec<WindowInfo> {
      Vec::new()
    }
    fn resolve(&self, path: &ElementPath) -> PlatformResult<ElementAttributes> {
      Err(PlatformError::ElementNotFound(path.clone()))
    }
    fn child_count(&self, _path: &ElementPath) -> PlatformResult<usize> {
      Ok(0)
    }
    fn focused_path(&self, _pid: i32) -> PlatformResult<Option<ElementPath>> {
      Ok(None)
    }
    fn set_value(&self, path: &ElementPath, _value: &str) -> PlatformResult<()> {
      Err(PlatformError::ElementNotFound(path.clone()))
    }
    fn perform_action(
      &self,
      path: &ElementPath,
      _action: ActionKind,
      _value: Option<&str>,
    ) -> PlatformResult<()> {
      Err(PlatformError::ElementNotFound(path.clone()))
    }
    fn menu_tree(&self, _pid: i32, _max_depth: usize) -> PlatformResult<Vec<MenuItemInfo>> {
      Ok(Vec::new())
    }
    fn press_menu_path(&self, _pid: i32, titles: &[String], _background: bool) -> PlatformResult<()> {
      Err(PlatformError::MenuNotFound(titles.join(" > ")))
    }
    fn global_click(
      &self,
      _x: f64,
      _y: f64,
      _button: MouseButton,
      _count: u32,
      _modifiers: &[KeyModifier],
    ) -> PlatformResult<()> {
      Err(PlatformError::Os { code: -1, message: "unsupported platform".into() })
    }
    fn global_scroll(&self, _x: f64, _y: f64, _dx: f64, _dy: f64) -> PlatformResult<()> {
      Err(PlatformError::Os { code: -1, message: "unsupported platform".into() })
    }
    fn targeted_scroll(&self, _pid: i32, _x: f64, _y: f64, _dx: f64, _dy: f64) -> PlatformResult<()> {
      Err(PlatformError::Os { code: -1, message: "unsupported platform".into() })
    }
    fn global_key_press(&self, _keycode: u16, _modifiers: &[KeyModifier]) -> PlatformResult<()> {
      Err(PlatformError::Os { code: -1, message: "unsupported platform".into() })
    }
    fn targeted_key_press(&self, _pid: i32, _keycode: u16, _modifiers: &[KeyModifier]) -> PlatformResult<()> {
      Err(PlatformError::Os { code: -1, message: "unsupported platform".into() })
    }
    fn global_type_char(&self, _input: KeyInput) -> PlatformResult<()> {
      Err(PlatformError::Os { code: -1, message: "unsupported platform".into() })
    }
    fn targeted_type_char(&self, _pid: i32, _input: KeyInput) -> PlatformResult<()> {
      Err(PlatformError::Os { code: -1, message: "unsupported platform".into() })
    }
    fn capture_display(&self, _display_id: Option<u32>) -> PlatformResult<CapturedImage> {
      Err(PlatformError::ScreenRecordingPermissionDenied)
    }
    fn capture_window(&self, _window_id: u32) -> PlatformResult<CapturedImage> {
      Err(PlatformError::ScreenRecordingPermissionDenied)
    }
    fn char_to_key_input(&self, ch: char) -> KeyInput {
      KeyInput::Unicode(ch)
    }
    fn resolve_key_name(&self, _name: &str) -> Option<u16> {
      None
    }
  }
}
