/*! `GET`/`POST /menu` (§4.1). */

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

const MAX_MENU_DEPTH: usize = 10;
const DEFAULT_MENU_DEPTH: usize = 5;

#[derive(Debug, Deserialize)]
pub struct MenuTreeQuery {
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default, rename = "maxDepth")]
  pub max_depth: Option<usize>,
}

pub async fn menu_tree(State(state): State<AppState>, Query(query): Query<MenuTreeQuery>) -> Result<Json<Value>, ApiError> {
  let pid = state.resolve_pid(query.pid).await?;
  let max_depth = query.max_depth.unwrap_or(DEFAULT_MENU_DEPTH).min(MAX_MENU_DEPTH);
  let items = state.on_main_thread(move |platform| platform.menu_tree(pid, max_depth)).await?;
  Ok(Json(json!({ "success": true, "items": items })))
}

#[derive(Debug, Deserialize)]
pub struct MenuPressBody {
  pub titles: Vec<String>,
  #[serde(default)]
  pub pid: Option<i32>,
  /// Skip activating the target app before pressing - the default brings
  /// it to the foreground first, since menu presses resolve against
  /// whichever app is frontmost.
  #[serde(default)]
  pub background: bool,
}

pub async fn menu_press(State(state): State<AppState>, Json(body): Json<MenuPressBody>) -> Result<Json<Value>, ApiError> {
  if body.titles.is_empty() {
    return Err(ApiError::Validation("titles must not be empty".into()));
  }

  let pid = state.resolve_pid(body.pid).await?;
  let titles = body.titles;
  let background = body.background;
  state.on_main_thread(move |platform| platform.press_menu_path(pid, &titles, background)).await?;

  Ok(Json(json!({ "success": true })))
}
