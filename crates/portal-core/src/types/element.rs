/*! Element addressing and accessibility-tree descriptor types. */

use serde::{Deserialize, Serialize};
use std::fmt;

/// A locator for one accessibility node: a process id plus the sequence of
/// child indices to walk from that process's application root.
///
/// `ElementPath` is intentionally not an opaque handle into a server-side
/// cache. Every navigation re-reads the live accessibility tree, so a path
/// captured from one response is valid to replay against a later one only
/// if the UI hasn't restructured in between - staleness fails cleanly at
/// navigation time rather than silently returning wrong data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementPath {
  pub pid: i32,
  pub path: Vec<usize>,
}

impl ElementPath {
  pub const fn root(pid: i32) -> Self {
    Self { pid, path: Vec::new() }
  }

  pub fn child(&self, index: usize) -> Self {
    let mut path = self.path.clone();
    path.push(index);
    Self { pid: self.pid, path }
  }
}

impl fmt::Display for ElementPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{:?}", self.pid, self.path)
  }
}

/// Screen-space rectangle, top-left origin, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementFrame {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl ElementFrame {
  /// Geometric center, used by mouse-mode element clicks.
  pub fn center(&self) -> (f64, f64) {
    (self.x + self.width / 2.0, self.y + self.height / 2.0)
  }
}

/// Descriptive snapshot of one accessibility node, as returned to clients.
///
/// Never held across requests - every field is read fresh from the OS at
/// the moment a handler serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIElementInfo {
  pub path: ElementPath,
  pub role: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub frame: Option<ElementFrame>,
  pub is_enabled: bool,
  pub is_focused: bool,
  /// Omitted entirely when empty - this is what lets the compact tree
  /// format's `includeActions=false` drop the field rather than serialize
  /// an empty list (§8's round-trip property).
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub actions: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub children: Option<Vec<UIElementInfo>>,
}

/// Predicate over accessibility nodes. All provided fields are ANDed;
/// string predicates are case-insensitive substrings except exact `title`
/// and `role`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementQuery {
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub title_contains: Option<String>,
  #[serde(default)]
  pub label_contains: Option<String>,
  #[serde(default)]
  pub value_contains: Option<String>,
  #[serde(default)]
  pub max_results: Option<usize>,
}

impl ElementQuery {
  /// True if at least one predicate is set. Several endpoints (e.g.
  /// `/accessibility/elements`) require this before doing a tree walk.
  pub fn has_predicate(&self) -> bool {
    self.role.is_some()
      || self.title.is_some()
      || self.title_contains.is_some()
      || self.label_contains.is_some()
      || self.value_contains.is_some()
  }

  /// Evaluate the query against one node's descriptor. `all provided
  /// predicates hold` - string predicates case-insensitive substrings
  /// except exact `title`/`role`.
  pub fn matches(&self, role: &str, title: Option<&str>, label: Option<&str>, value: Option<&str>) -> bool {
    if let Some(want) = &self.role {
      if want != role {
        return false;
      }
    }
    if let Some(want) = &self.title {
      if Some(want.as_str()) != title {
        return false;
      }
    }
    if let Some(want) = &self.title_contains {
      if !contains_ci(title, want) {
        return false;
      }
    }
    if let Some(want) = &self.label_contains {
      if !contains_ci(label, want) {
        return false;
      }
    }
    if let Some(want) = &self.value_contains {
      if !contains_ci(value, want) {
        return false;
      }
    }
    true
  }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
  match haystack {
    Some(h) => h.to_lowercase().contains(&needle.to_lowercase()),
    None => false,
  }
}

/// Closed set of semantic accessibility actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
  Press,
  SetValue,
  Focus,
  Confirm,
  Cancel,
  Increment,
  Decrement,
  ShowMenu,
  Pick,
}

/// Closed set of keyboard modifiers (with common aliases accepted on parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyModifier {
  Cmd,
  Ctrl,
  Alt,
  Shift,
  #[serde(rename = "fn")]
  Fn,
}

impl KeyModifier {
  /// Parse an alias (`"command"`, `"option"`, `"control"`, ...) into a modifier.
  pub fn parse_alias(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "cmd" | "command" | "meta" | "super" => Some(Self::Cmd),
      "ctrl" | "control" => Some(Self::Ctrl),
      "alt" | "option" | "opt" => Some(Self::Alt),
      "shift" => Some(Self::Shift),
      "fn" | "function" => Some(Self::Fn),
      _ => None,
    }
  }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
  Left,
  Right,
  Center,
}

impl Default for MouseButton {
  fn default() -> Self {
    Self::Left
  }
}

/// Text-insertion strategy for `/type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeMode {
  Replace,
  Keys,
}

impl Default for TypeMode {
  fn default() -> Self {
    Self::Replace
  }
}

/// Polling predicate evaluated by the wait subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitCondition {
  Exists,
  NotExists,
  Enabled,
  Focused,
}

impl Default for WaitCondition {
  fn default() -> Self {
    Self::Exists
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn query_predicates_are_anded() {
    let query = ElementQuery {
      role: Some("AXButton".into()),
      title_contains: Some("ok".into()),
      ..Default::default()
    };
    assert!(query.matches("AXButton", Some("OK"), None, None));
    assert!(!query.matches("AXButton", Some("Cancel"), None, None));
    assert!(!query.matches("AXTextField", Some("OK"), None, None));
  }

  #[test]
  fn title_exact_is_case_sensitive_substring_is_not() {
    let exact = ElementQuery { title: Some("OK".into()), ..Default::default() };
    assert!(!exact.matches("AXButton", Some("ok"), None, None));

    let contains = ElementQuery { title_contains: Some("ok".into()), ..Default::default() };
    assert!(contains.matches("AXButton", Some("Okay"), None, None));
  }

  #[test]
  fn empty_query_has_no_predicate() {
    assert!(!ElementQuery::default().has_predicate());
  }

  #[test]
  fn element_path_round_trips_through_json() {
    let path = ElementPath { pid: 1234, path: vec![0, 2, 1] };
    let json = serde_json::to_string(&path).unwrap();
    let back: ElementPath = serde_json::from_str(&json).unwrap();
    assert_eq!(path, back);
  }
}
