/*! `/key` (§4.1). */

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use portal_core::types::{ActionKind, ElementPath, KeyModifier};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct KeyBody {
  pub key: String,
  #[serde(default)]
  pub modifiers: Vec<KeyModifier>,
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default)]
  pub path: Option<ElementPath>,
}

/// Map a key name to the accessibility action `/key` invokes when a `path`
/// is given. Only this fixed set is supported in path mode (§4.1) - anything
/// else is rejected and the caller is told to use `pid` instead.
fn path_mode_action(key: &str) -> Option<ActionKind> {
  match key.to_lowercase().as_str() {
    "return" | "enter" => Some(ActionKind::Confirm),
    "escape" | "esc" => Some(ActionKind::Cancel),
    "space" => Some(ActionKind::Press),
    _ => None,
  }
}

pub async fn key(State(state): State<AppState>, Json(body): Json<KeyBody>) -> Result<Json<Value>, ApiError> {
  if body.key.is_empty() {
    return Err(ApiError::Validation("key must not be empty".into()));
  }

  if let Some(path) = body.path {
    let action = path_mode_action(&body.key).ok_or_else(|| {
      ApiError::Validation(format!(
        "key '{}' is not supported with a path target (supported: return/enter, escape/esc, space) - use pid for arbitrary keys",
        body.key
      ))
    })?;
    state.on_main_thread(move |platform| platform.perform_action(&path, action, None)).await?;
    return Ok(Json(json!({ "success": true, "action": format!("{action:?}").to_lowercase() })));
  }

  let keycode = state
    .on_main_thread({
      let key = body.key.clone();
      move |platform| platform.resolve_key_name(&key)
    })
    .await
    .ok_or_else(|| ApiError::Validation(format!("no keycode mapping for key '{}'", body.key)))?;

  let modifiers = body.modifiers;
  if let Some(pid) = body.pid {
    state.on_main_thread(move |platform| platform.targeted_key_press(pid, keycode, &modifiers)).await?;
  } else {
    state.on_main_thread(move |platform| platform.global_key_press(keycode, &modifiers)).await?;
  }

  Ok(Json(json!({ "success": true })))
}
