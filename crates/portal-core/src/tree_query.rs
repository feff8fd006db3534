/*!
Platform-agnostic accessibility-tree walking, built only on [`Platform`]'s
`resolve`/`child_count` primitives so it runs identically against the real
macOS adapter and a fake test double.
*/

use crate::error::PlatformResult;
use crate::platform::{ElementAttributes, Platform};
use crate::types::{ElementPath, ElementQuery, UIElementInfo};
use serde::Serialize;

/// Roles the compact tree format always keeps, regardless of text content -
/// buttons, text inputs, interactive containers, windows, sheets, toolbars,
/// tables, and menus.
const MEANINGFUL_ROLES: &[&str] = &[
  "AXButton",
  "AXTextField",
  "AXTextArea",
  "AXSecureTextField",
  "AXSearchField",
  "AXComboBox",
  "AXCheckBox",
  "AXRadioButton",
  "AXPopUpButton",
  "AXMenuButton",
  "AXSlider",
  "AXStepper",
  "AXLink",
  "AXWindow",
  "AXSheet",
  "AXToolbar",
  "AXTable",
  "AXOutline",
  "AXMenu",
  "AXMenuBar",
  "AXMenuItem",
  "AXTabGroup",
];

fn to_info(path: ElementPath, attrs: ElementAttributes) -> UIElementInfo {
  UIElementInfo {
    path,
    role: attrs.role,
    title: attrs.title,
    label: attrs.label,
    value: attrs.value,
    description: attrs.description,
    frame: attrs.frame,
    is_enabled: attrs.is_enabled,
    is_focused: attrs.is_focused,
    actions: attrs.actions.into_iter().map(|a| format!("{a:?}").to_lowercase()).collect(),
    children: None,
  }
}

/// Describe a single node with no children expansion.
pub fn describe(platform: &dyn Platform, path: &ElementPath) -> PlatformResult<UIElementInfo> {
  let attrs = platform.resolve(path)?;
  Ok(to_info(path.clone(), attrs))
}

/// Describe a node and recursively expand its children up to `max_depth`
/// additional levels.
pub fn describe_with_children(platform: &dyn Platform, path: &ElementPath, max_depth: usize) -> PlatformResult<UIElementInfo> {
  let mut info = describe(platform, path)?;
  if max_depth == 0 {
    return Ok(info);
  }
  let count = platform.child_count(path)?;
  let mut children = Vec::with_capacity(count);
  for index in 0..count {
    let child_path = path.child(index);
    if let Ok(child) = describe_with_children(platform, &child_path, max_depth - 1) {
      children.push(child);
    }
  }
  info.children = Some(children);
  Ok(info)
}

/// Depth-first traversal collecting every node matching `query`, stopping
/// once `query.max_results` (or `default_cap` if unset) is reached.
pub fn find_matching(platform: &dyn Platform, pid: i32, query: &ElementQuery, max_depth: usize) -> PlatformResult<Vec<UIElementInfo>> {
  const DEFAULT_CAP: usize = 500;
  let cap = query.max_results.unwrap_or(DEFAULT_CAP);
  let mut out = Vec::new();
  walk_matching(platform, &ElementPath::root(pid), query, max_depth, cap, &mut out)?;
  Ok(out)
}

fn walk_matching(
  platform: &dyn Platform,
  path: &ElementPath,
  query: &ElementQuery,
  remaining_depth: usize,
  cap: usize,
  out: &mut Vec<UIElementInfo>,
) -> PlatformResult<()> {
  if out.len() >= cap {
    return Ok(());
  }
  let Ok(attrs) = platform.resolve(path) else {
    return Ok(());
  };
  if query.matches(&attrs.role, attrs.title.as_deref(), attrs.label.as_deref(), attrs.value.as_deref()) {
    out.push(to_info(path.clone(), attrs));
  }
  if remaining_depth == 0 {
    return Ok(());
  }
  let count = platform.child_count(path).unwrap_or(0);
  for index in 0..count {
    if out.len() >= cap {
      return Ok(());
    }
    walk_matching(platform, &path.child(index), query, remaining_depth - 1, cap, out)?;
  }
  Ok(())
}

/// One flattened entry in the compact tree format.
#[derive(Debug, Clone, Serialize)]
pub struct CompactEntry {
  pub depth: usize,
  #[serde(flatten)]
  pub element: UIElementInfo,
}

/// Depth-first flattened listing of only nodes that carry identifying text
/// (title/label) or belong to [`MEANINGFUL_ROLES`]. When `include_actions`
/// is false, each entry's `actions` list is cleared before serialization.
pub fn compact_tree(platform: &dyn Platform, root: &ElementPath, max_depth: usize, include_actions: bool) -> PlatformResult<Vec<CompactEntry>> {
  let mut out = Vec::new();
  walk_compact(platform, root, 0, max_depth, include_actions, &mut out)?;
  Ok(out)
}

fn walk_compact(
  platform: &dyn Platform,
  path: &ElementPath,
  depth: usize,
  remaining_depth: usize,
  include_actions: bool,
  out: &mut Vec<CompactEntry>,
) -> PlatformResult<()> {
  let Ok(attrs) = platform.resolve(path) else {
    return Ok(());
  };

  let has_identifying_text = attrs.title.as_deref().is_some_and(|s| !s.is_empty()) || attrs.label.as_deref().is_some_and(|s| !s.is_empty());
  let is_meaningful_role = MEANINGFUL_ROLES.contains(&attrs.role.as_str());

  if has_identifying_text || is_meaningful_role {
    let mut element = to_info(path.clone(), attrs.clone());
    if !include_actions {
      element.actions.clear();
    }
    out.push(CompactEntry { depth, element });
  }

  if remaining_depth == 0 {
    return Ok(());
  }
  let count = platform.child_count(path).unwrap_or(0);
  for index in 0..count {
    walk_compact(platform, &path.child(index), depth + 1, remaining_depth - 1, include_actions, out)?;
  }
  Ok(())
}

/// Locate the focused descendant of `pid`'s application by asking the
/// platform directly (macOS reads `AXFocusedUIElement`, which is far
/// cheaper than re-deriving focus from a full tree scan).
pub fn describe_focused(platform: &dyn Platform, pid: i32) -> PlatformResult<Option<UIElementInfo>> {
  let Some(path) = platform.focused_path(pid)? else {
    return Ok(None);
  };
  Ok(Some(describe(platform, &path)?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::ActionKind;

  #[test]
  fn to_info_lowercases_action_names() {
    let info = to_info(ElementPath::root(1), ElementAttributes { actions: vec![ActionKind::ShowMenu], ..Default::default() });
    assert_eq!(info.actions, vec!["showmenu"]);
  }
}
