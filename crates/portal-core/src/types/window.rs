/*! Window, menu, and target-application descriptor types. */

use super::element::ElementFrame;
use serde::{Deserialize, Serialize};

/// The process a server instance is bound to for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetApp {
  pub pid: i32,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bundle_id: Option<String>,
}

/// Enumerated window snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct WindowInfo {
  pub window_id: u32,
  pub title: String,
  pub owner_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub owner_bundle_id: Option<String>,
  pub pid: i32,
  pub frame: ElementFrame,
  pub is_on_screen: bool,
}

/// Menu-tree node, used by `GET /menu`.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemInfo {
  pub title: String,
  pub is_enabled: bool,
  pub has_submenu: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub shortcut: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub children: Option<Vec<MenuItemInfo>>,
}

/// Main-display size, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScreenSize {
  pub width: f64,
  pub height: f64,
}

/// Result of the permission probe.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Permissions {
  pub accessibility_granted: bool,
  pub screen_recording_granted: bool,
}
