/*! Menu-bar tree reading and title-path navigation. */

#![allow(unsafe_code)]

use super::handles::ElementHandle;
use super::util::app_element;
use crate::error::{PlatformError, PlatformResult};
use crate::types::MenuItemInfo;

/// Top-level `AXMenuBar` for an application, or `None` if it has none
/// (background-only processes, most command-line tools launched by bundle id).
fn menu_bar(pid: i32) -> Option<ElementHandle> {
  ElementHandle::new(app_element(pid)).get_element("AXMenuBar")
}

fn describe(item: &ElementHandle, remaining_depth: usize) -> MenuItemInfo {
  let title = item.get_string("AXTitle").unwrap_or_default();
  let is_enabled = item.get_bool("AXEnabled").unwrap_or(true);
  let submenu_items = item.get_children();
  let has_submenu = !submenu_items.is_empty();

  let nested = if has_submenu && remaining_depth > 0 {
    Some(submenu_items.iter().map(|child| describe(child, remaining_depth - 1)).collect())
  } else {
    None
  };

  MenuItemInfo {
    title,
    is_enabled,
    has_submenu,
    shortcut: item.get_string("AXMenuItemCmdChar"),
    children: nested,
  }
}

pub(super) fn menu_tree(pid: i32, max_depth: usize) -> PlatformResult<Vec<MenuItemInfo>> {
  let Some(bar) = menu_bar(pid) else {
    return Ok(Vec::new());
  };
  // The menu bar's immediate children are each a top-level menu (File, Edit,
  // ...); its `AXChildren` attribute on that child is the drop-down itself.
  Ok(
    bar
      .get_children()
      .into_iter()
      .flat_map(|top_level| top_level.get_children())
      .map(|item| describe(&item, max_depth))
      .collect(),
  )
}

/// Resolve `titles` depth-first - case-insensitive substring match at each
/// level, first match wins - and perform `AXPress` on the final item.
pub(super) fn press_menu_path(pid: i32, titles: &[String]) -> PlatformResult<()> {
  let Some(bar) = menu_bar(pid) else {
    return Err(PlatformError::MenuNotFound(titles.join(" > ")));
  };

  let mut level = bar.get_children();
  let mut current: Option<ElementHandle> = None;

  for title in titles {
    let needle = title.to_lowercase();
    let matched = level.iter().find(|item| item.get_string("AXTitle").is_some_and(|t| t.to_lowercase().contains(&needle)));

    let Some(matched) = matched.cloned() else {
      return Err(PlatformError::MenuNotFound(titles.join(" > ")));
    };

    // A menu item's own `AXChildren` is its drop-down submenu; already
    // populated without needing to open it first.
    level = matched.get_children();
    current = Some(matched);
  }

  let Some(target) = current else {
    return Err(PlatformError::MenuNotFound(titles.join(" > ")));
  };
  target
    .perform_action_raw("AXPress")
    .map_err(|err| PlatformError::ActionFailed { action: "press".into(), reason: format!("{err:?}") })
}
