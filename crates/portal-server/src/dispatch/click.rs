/*! `/click` and `/click/element` (§4.1). */

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use portal_core::tree_query;
use portal_core::types::{ActionKind, ElementQuery, MouseButton};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ClickBody {
  pub x: f64,
  pub y: f64,
  #[serde(default)]
  pub button: Option<MouseButton>,
  #[serde(default)]
  pub click_count: Option<u32>,
  #[serde(default)]
  pub modifiers: Vec<portal_core::types::KeyModifier>,
}

pub async fn click(State(state): State<AppState>, Json(body): Json<ClickBody>) -> Result<Json<Value>, ApiError> {
  if body.x < 0.0 || body.y < 0.0 {
    return Err(ApiError::Validation("x and y must be non-negative".into()));
  }
  let x = body.x;
  let y = body.y;
  let button = body.button.unwrap_or_default();
  let count = body.click_count.unwrap_or(1).max(1);
  let modifiers = body.modifiers;

  state.on_main_thread(move |platform| platform.global_click(x, y, button, count, &modifiers)).await?;

  Ok(Json(json!({ "success": true, "x": x, "y": y })))
}

#[derive(Debug, Deserialize, Default)]
pub struct ClickElementBody {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub title_contains: Option<String>,
  #[serde(default)]
  pub role: Option<String>,
  /// Matched as a case-insensitive substring against the node's label, like
  /// the other text predicates `/click/element` accepts - there is no exact
  /// `label` field in the query model.
  #[serde(default)]
  pub label: Option<String>,
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default)]
  pub use_accessibility_action: Option<bool>,
  #[serde(default)]
  pub button: Option<MouseButton>,
}

pub async fn click_element(State(state): State<AppState>, Json(body): Json<ClickElementBody>) -> Result<Json<Value>, ApiError> {
  if body.title.is_none() && body.title_contains.is_none() && body.role.is_none() && body.label.is_none() {
    return Err(ApiError::Validation("at least one of title, title_contains, role, label is required".into()));
  }

  let pid = state.resolve_pid(body.pid).await?;
  let query = ElementQuery {
    role: body.role,
    title: body.title,
    title_contains: body.title_contains,
    label_contains: body.label,
    value_contains: None,
    max_results: Some(1),
  };
  let use_action = body.use_accessibility_action.unwrap_or(false);
  let button = body.button.unwrap_or_default();

  let matches = state.on_main_thread(move |platform| tree_query::find_matching(platform, pid, &query, 10)).await?;
  let element = matches.into_iter().next().ok_or_else(|| ApiError::Resolution("no element matched the query".into()))?;

  if use_action {
    let path = element.path.clone();
    state.on_main_thread(move |platform| platform.perform_action(&path, ActionKind::Press, None)).await?;
    return Ok(Json(json!({ "success": true, "element": element })));
  }

  let frame = element.frame.ok_or_else(|| ApiError::Resolution("matched element has no frame".into()))?;
  let (cx, cy) = frame.center();
  state.on_main_thread(move |platform| platform.global_click(cx, cy, button, 1, &[])).await?;

  Ok(Json(json!({ "success": true, "element": element, "clicked_at": { "x": cx, "y": cy } })))
}
