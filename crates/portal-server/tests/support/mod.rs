//! Fake [`Platform`] used by the dispatch-engine end-to-end tests (spec §8's
//! seed scenarios). Deterministic, in-memory, no real accessibility/input
//! APIs touched - this is the same seam the macOS adapter fills in production.

use portal_core::platform::{CapturedImage, ElementAttributes, KeyInput, Platform};
use portal_core::types::{ActionKind, ElementFrame, ElementPath, KeyModifier, MenuItemInfo, MouseButton, TargetApp, WindowInfo};
use portal_core::{MainThreadExecutor, PlatformError, PlatformResult};
use portal_server::AppState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One node of a fake accessibility tree.
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
  pub role: String,
  pub title: Option<String>,
  pub label: Option<String>,
  pub value: Option<String>,
  pub description: Option<String>,
  pub frame: Option<ElementFrame>,
  pub is_enabled: bool,
  pub is_focused: bool,
  pub actions: Vec<ActionKind>,
  pub children: Vec<FakeNode>,
}

impl FakeNode {
  pub fn new(role: &str) -> Self {
    Self { role: role.to_string(), is_enabled: true, ..Default::default() }
  }

  #[must_use]
  pub fn title(mut self, title: &str) -> Self {
    self.title = Some(title.to_string());
    self
  }

  #[must_use]
  pub fn frame(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
    self.frame = Some(ElementFrame { x, y, width, height });
    self
  }

  #[must_use]
  pub fn actions(mut self, actions: &[ActionKind]) -> Self {
    self.actions = actions.to_vec();
    self
  }

  #[must_use]
  pub fn child(mut self, child: FakeNode) -> Self {
    self.children.push(child);
    self
  }

  fn to_attributes(&self) -> ElementAttributes {
    ElementAttributes {
      role: self.role.clone(),
      title: self.title.clone(),
      label: self.label.clone(),
      value: self.value.clone(),
      description: self.description.clone(),
      frame: self.frame,
      is_enabled: self.is_enabled,
      is_focused: self.is_focused,
      actions: self.actions.clone(),
    }
  }
}

/// One recorded global click.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickRecord {
  pub x: f64,
  pub y: f64,
  pub button: MouseButton,
  pub count: u32,
}

#[derive(Default)]
struct Inner {
  trees: HashMap<i32, FakeNode>,
  set_values: Vec<(ElementPath, String)>,
  actions: Vec<(ElementPath, ActionKind)>,
  clicks: Vec<ClickRecord>,
  global_key_presses: Vec<u16>,
  targeted_key_presses: Vec<(i32, u16)>,
}

/// Fake platform adapter. Cloning shares the underlying state (`Arc`).
#[derive(Clone, Default)]
pub struct FakePlatform {
  inner: Arc<Mutex<Inner>>,
}

impl FakePlatform {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register the accessibility tree root for `pid`.
  pub fn set_tree(&self, pid: i32, root: FakeNode) {
    self.inner.lock().expect("fake platform mutex poisoned").trees.insert(pid, root);
  }

  /// Remove the tree for `pid`, simulating a node (subtree) disappearing.
  pub fn clear_tree(&self, pid: i32) {
    self.inner.lock().expect("fake platform mutex poisoned").trees.remove(&pid);
  }

  pub fn recorded_clicks(&self) -> Vec<ClickRecord> {
    self.inner.lock().expect("fake platform mutex poisoned").clicks.clone()
  }

  pub fn recorded_set_values(&self) -> Vec<(ElementPath, String)> {
    self.inner.lock().expect("fake platform mutex poisoned").set_values.clone()
  }

  pub fn recorded_actions(&self) -> Vec<(ElementPath, ActionKind)> {
    self.inner.lock().expect("fake platform mutex poisoned").actions.clone()
  }

  pub fn recorded_global_key_presses(&self) -> Vec<u16> {
    self.inner.lock().expect("fake platform mutex poisoned").global_key_presses.clone()
  }

  fn navigate(&self, path: &ElementPath) -> PlatformResult<FakeNode> {
    let inner = self.inner.lock().expect("fake platform mutex poisoned");
    let mut node = inner.trees.get(&path.pid).cloned().ok_or_else(|| PlatformError::ElementNotFound(path.clone()))?;
    for &index in &path.path {
      node = node.children.into_iter().nth(index).ok_or_else(|| PlatformError::ElementNotFound(path.clone()))?;
    }
    Ok(node)
  }
}

impl Platform for FakePlatform {
  fn accessibility_permission_granted(&self) -> bool {
    true
  }

  fn screen_recording_permission_granted(&self) -> bool {
    true
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
    Err(PlatformError::LaunchFailed(format!("fake platform cannot launch '{spec}'")))
  }

  fn is_process_alive(&self, pid: i32) -> bool {
    self.inner.lock().expect("fake platform mutex poisoned").trees.contains_key(&pid)
  }

  fn screen_size(&self) -> (f64, f64) {
    (1920.0, 1080.0)
  }

  fn list_windows(&self) -> Vec<WindowInfo> {
    Vec::new()
  }

  fn resolve(&self, path: &ElementPath) -> PlatformResult<ElementAttributes> {
    self.navigate(path).map(|node| node.to_attributes())
  }

  fn child_count(&self, path: &ElementPath) -> PlatformResult<usize> {
    self.navigate(path).map(|node| node.children.len())
  }

  fn focused_path(&self, pid: i32) -> PlatformResult<Option<ElementPath>> {
    let inner = self.inner.lock().expect("fake platform mutex poisoned");
    let Some(root) = inner.trees.get(&pid) else { return Ok(None) };
    Ok(find_focused(root, ElementPath::root(pid)))
  }

  fn set_value(&self, path: &ElementPath, value: &str) -> PlatformResult<()> {
    self.navigate(path)?;
    self.inner.lock().expect("fake platform mutex poisoned").set_values.push((path.clone(), value.to_string()));
    Ok(())
  }

  fn perform_action(&self, path: &ElementPath, action: ActionKind, value: Option<&str>) -> PlatformResult<()> {
    self.navigate(path)?;
    if matches!(action, ActionKind::SetValue) {
      let value = value.ok_or_else(|| PlatformError::ActionFailed { action: "setValue".into(), reason: "missing value".into() })?;
      return self.set_value(path, value);
    }
    self.inner.lock().expect("fake platform mutex poisoned").actions.push((path.clone(), action));
    Ok(())
  }

  fn menu_tree(&self, _pid: i32, _max_depth: usize) -> PlatformResult<Vec<MenuItemInfo>> {
    Ok(Vec::new())
  }

  fn press_menu_path(&self, _pid: i32, titles: &[String], _background: bool) -> PlatformResult<()> {
    Err(PlatformError::MenuNotFound(titles.join(" > ")))
  }

  fn global_click(&self, x: f64, y: f64, button: MouseButton, count: u32, _modifiers: &[KeyModifier]) -> PlatformResult<()> {
    self.inner.lock().expect("fake platform mutex poisoned").clicks.push(ClickRecord { x, y, button, count });
    Ok(())
  }

  fn global_scroll(&self, _x: f64, _y: f64, _dx: f64, _dy: f64) -> PlatformResult<()> {
    Ok(())
  }

  fn global_key_press(&self, keycode: u16, _modifiers: &[KeyModifier]) -> PlatformResult<()> {
    self.inner.lock().expect("fake platform mutex poisoned").global_key_presses.push(keycode);
    Ok(())
  }

  fn global_type_char(&self, _input: KeyInput) -> PlatformResult<()> {
    Ok(())
  }

  fn targeted_scroll(&self, _pid: i32, _x: f64, _y: f64, _dx: f64, _dy: f64) -> PlatformResult<()> {
    Ok(())
  }

  fn targeted_key_press(&self, pid: i32, keycode: u16, _modifiers: &[KeyModifier]) -> PlatformResult<()> {
    self.inner.lock().expect("fake platform mutex poisoned").targeted_key_presses.push((pid, keycode));
    Ok(())
  }

  fn targeted_type_char(&self, _pid: i32, _input: KeyInput) -> PlatformResult<()> {
    Ok(())
  }

  fn capture_display(&self, _display_id: Option<u32>) -> PlatformResult<CapturedImage> {
    Ok(CapturedImage { width: 1, height: 1, rgba8: vec![0, 0, 0, 255] })
  }

  fn capture_window(&self, _window_id: u32) -> PlatformResult<CapturedImage> {
    Ok(CapturedImage { width: 1, height: 1, rgba8: vec![0, 0, 0, 255] })
  }

  fn char_to_key_input(&self, ch: char) -> KeyInput {
    KeyInput::Unicode(ch)
  }

  fn resolve_key_name(&self, name: &str) -> Option<u16> {
    match name.to_lowercase().as_str() {
      "return" | "enter" => Some(36),
      "escape" | "esc" => Some(53),
      "space" => Some(49),
      _ => None,
    }
  }
}

fn find_focused(node: &FakeNode, path: ElementPath) -> Option<ElementPath> {
  if node.is_focused {
    return Some(path);
  }
  node.children.iter().enumerate().find_map(|(index, child)| find_focused(child, path.child(index)))
}

/// Build an [`AppState`] wired to a fresh [`FakePlatform`], returning both so
/// tests can assert on recorded calls after driving the router.
pub fn test_state(target_app: Option<TargetApp>) -> (AppState, FakePlatform) {
  let fake = FakePlatform::new();
  let executor = MainThreadExecutor::spawn();
  let state = AppState::new(Arc::new(fake.clone()), executor, target_app);
  (state, fake)
}
