/*!
Stateless accessibility-tree navigation.

Every lookup starts from the application root for `path.pid` and walks
`AXChildren` by index. Nothing here is cached across calls - see
[`crate::types::ElementPath`] for the rationale.
*/

#![allow(unsafe_code)]

use super::handles::ElementHandle;
use super::util::app_element;
use crate::error::{PlatformError, PlatformResult};
use crate::types::ElementPath;

/// Walk from the application root for `path.pid` through each child index
/// in `path.path`, in order. Fails with [`PlatformError::ElementNotFound`]
/// as soon as any index is out of range.
pub(super) fn resolve(path: &ElementPath) -> PlatformResult<ElementHandle> {
  let mut current = ElementHandle::new(app_element(path.pid));
  for &index in &path.path {
    let children = current.get_children();
    current = children.into_iter().nth(index).ok_or_else(|| PlatformError::ElementNotFound(path.clone()))?;
  }
  Ok(current)
}

pub(super) fn child_count(path: &ElementPath) -> PlatformResult<usize> {
  Ok(resolve(path)?.get_children().len())
}

/// Depth-first search for the focused descendant, following `AXFocusedUIElement`
/// from the application element directly rather than scanning the tree.
pub(super) fn focused_path(pid: i32) -> PlatformResult<Option<ElementPath>> {
  let app = ElementHandle::new(app_element(pid));
  let Some(focused) = app.get_element("AXFocusedUIElement") else {
    return Ok(None);
  };
  Ok(find_path_to(&app, &focused, ElementPath::root(pid), 64))
}

/// Locate `target` within the subtree rooted at `from`, returning the index
/// path that reaches it. Bounded by `max_depth` to avoid pathological trees.
fn find_path_to(from: &ElementHandle, target: &ElementHandle, prefix: ElementPath, max_depth: usize) -> Option<ElementPath> {
  if max_depth == 0 {
    return None;
  }
  for (index, child) in from.get_children().into_iter().enumerate() {
    if child.cf_equal(target) {
      return Some(prefix.child(index));
    }
    if let Some(found) = find_path_to(&child, target, prefix.child(index), max_depth - 1) {
      return Some(found);
    }
  }
  None
}
