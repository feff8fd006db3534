/*!
The `Platform` trait - the contract between the dispatch engine and the OS.

Core code (element addressing, wait/poll, dispatch) only ever calls through
this trait. Tests substitute a fake implementation to exercise the dispatch
engine deterministically (§8's seed scenarios), without touching real
accessibility/input APIs.
*/

use crate::error::PlatformResult;
use crate::types::{ActionKind, ElementFrame, ElementPath, KeyModifier, MenuItemInfo, MouseButton, TargetApp, WindowInfo};

/// Raw attributes read from one accessibility node.
///
/// This is the platform layer's read shape; the dispatch engine converts it
/// into the public [`crate::types::UIElementInfo`].
#[derive(Debug, Clone, Default)]
pub struct ElementAttributes {
  /// Raw platform role string (e.g. `"AXButton"`), returned verbatim per
  /// the spec's "accessibility namespace" role field.
  pub role: String,
  pub title: Option<String>,
  pub label: Option<String>,
  pub value: Option<String>,
  pub description: Option<String>,
  pub frame: Option<ElementFrame>,
  pub is_enabled: bool,
  pub is_focused: bool,
  /// Semantic actions this node currently reports support for (mapped from
  /// raw AX action names via `platform::macos::mapping`).
  pub actions: Vec<ActionKind>,
}

/// A decoded key event destined for synthesis: either a known virtual
/// keycode (optionally shifted) or a raw Unicode character for characters
/// outside the ASCII keyboard map.
#[derive(Debug, Clone, Copy)]
pub enum KeyInput {
  Keycode { code: u16, shift: bool },
  Unicode(char),
}

/// Pixel buffer captured from a display or window, prior to PNG/JPEG encoding.
#[derive(Debug, Clone)]
pub struct CapturedImage {
  pub width: u32,
  pub height: u32,
  /// Tightly packed RGBA8, row-major, top-left origin.
  pub rgba8: Vec<u8>,
}

/// Platform-global operations. One instance is owned by the server for its
/// lifetime; implementations must be cheap to share across handler threads
/// (state, if any, behind an `Arc`/lock) since the trait object is cloned
/// into every request's work submitted to the main-thread executor.
pub trait Platform: Send + Sync + 'static {
  // ---- Permission probe ----------------------------------------------
  fn accessibility_permission_granted(&self) -> bool;
  fn screen_recording_permission_granted(&self) -> bool;
  fn open_accessibility_settings(&self);
  fn open_screen_recording_settings(&self);

  // ---- Process / window discovery ------------------------------------
  fn frontmost_app(&self) -> Option<TargetApp>;
  /// Find a running process by display-name (case-insensitive) or bundle id.
  fn find_app(&self, spec: &str) -> Option<TargetApp>;
  /// Launch by bundle path, bundle id, or display name (open-by-name).
  fn launch_app(&self, spec: &str) -> PlatformResult<TargetApp>;
  fn is_process_alive(&self, pid: i32) -> bool;
  fn screen_size(&self) -> (f64, f64);
  fn list_windows(&self) -> Vec<WindowInfo>;

  // ---- Accessibility tree ---------------------------------------------
  /// Resolve the node at `path` by walking fresh from the application root.
  fn resolve(&self, path: &ElementPath) -> PlatformResult<ElementAttributes>;
  /// Number of children of the node at `path` (used to bound traversal).
  fn child_count(&self, path: &ElementPath) -> PlatformResult<usize>;
  /// Path of the currently focused descendant of `pid`'s application, if any.
  fn focused_path(&self, pid: i32) -> PlatformResult<Option<ElementPath>>;

  fn set_value(&self, path: &ElementPath, value: &str) -> PlatformResult<()>;
  /// Perform a semantic action. `value` is required (and only meaningful)
  /// for [`ActionKind::SetValue`].
  fn perform_action(&self, path: &ElementPath, action: ActionKind, value: Option<&str>) -> PlatformResult<()>;

  fn menu_tree(&self, pid: i32, max_depth: usize) -> PlatformResult<Vec<MenuItemInfo>>;
  /// Resolve `titles` depth-first (case-insensitive substring at each
  /// level, first match wins - see DESIGN.md) and press the final item.
  fn press_menu_path(&self, pid: i32, titles: &[String], background: bool) -> PlatformResult<()>;

  // ---- Input synthesis: global -----------------------------------------
  fn global_click(&self, x: f64, y: f64, button: MouseButton, count: u32, modifiers: &[KeyModifier]) -> PlatformResult<()>;
  fn global_scroll(&self, x: f64, y: f64, dx: f64, dy: f64) -> PlatformResult<()>;
  fn global_key_press(&self, keycode: u16, modifiers: &[KeyModifier]) -> PlatformResult<()>;
  fn global_type_char(&self, input: KeyInput) -> PlatformResult<()>;

  // ---- Input synthesis: process-targeted -------------------------------
  fn targeted_scroll(&self, pid: i32, x: f64, y: f64, dx: f64, dy: f64) -> PlatformResult<()>;
  fn targeted_key_press(&self, pid: i32, keycode: u16, modifiers: &[KeyModifier]) -> PlatformResult<()>;
  fn targeted_type_char(&self, pid: i32, input: KeyInput) -> PlatformResult<()>;

  // ---- Screen capture ---------------------------------------------------
  fn capture_display(&self, display_id: Option<u32>) -> PlatformResult<CapturedImage>;
  fn capture_window(&self, window_id: u32) -> PlatformResult<CapturedImage>;

  // ---- Key mapping --------------------------------------------------------
  /// Map a single character to a synthesizable key input: a (keycode,
  /// needs-shift) pair for the platform's ASCII layout, or a Unicode-string
  /// fallback for characters outside it. Always succeeds.
  fn char_to_key_input(&self, ch: char) -> KeyInput;
  /// Map a named key as accepted by `/key` (`"return"`, `"space"`, a single
  /// character, ...) to a virtual keycode. `None` if unmapped.
  fn resolve_key_name(&self, name: &str) -> Option<u16>;
}
