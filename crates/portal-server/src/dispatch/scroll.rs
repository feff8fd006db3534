/*! `/scroll` (§4.1). */

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use portal_core::types::ElementPath;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ScrollBody {
  pub delta_x: f64,
  pub delta_y: f64,
  #[serde(default)]
  pub x: Option<f64>,
  #[serde(default)]
  pub y: Option<f64>,
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default)]
  pub path: Option<ElementPath>,
}

pub async fn scroll(State(state): State<AppState>, Json(body): Json<ScrollBody>) -> Result<Json<Value>, ApiError> {
  if body.delta_x == 0.0 && body.delta_y == 0.0 {
    return Err(ApiError::Validation("at least one of delta_x, delta_y must be non-zero".into()));
  }

  let dx = body.delta_x;
  let dy = body.delta_y;

  if let Some(path) = body.path {
    let pid = path.pid;
    let path_for_resolve = path.clone();
    let attrs = state.on_main_thread(move |platform| platform.resolve(&path_for_resolve)).await?;
    let frame = attrs.frame.ok_or_else(|| ApiError::Resolution("element has no frame to scroll at".into()))?;
    let (cx, cy) = frame.center();
    state.on_main_thread(move |platform| platform.targeted_scroll(pid, cx, cy, dx, dy)).await?;
    return Ok(Json(json!({ "success": true, "x": cx, "y": cy })));
  }

  let x = body.x.ok_or_else(|| ApiError::Validation("x is required when path is not given".into()))?;
  let y = body.y.ok_or_else(|| ApiError::Validation("y is required when path is not given".into()))?;

  if let Some(pid) = body.pid {
    state.on_main_thread(move |platform| platform.targeted_scroll(pid, x, y, dx, dy)).await?;
  } else {
    state.on_main_thread(move |platform| platform.global_scroll(x, y, dx, dy)).await?;
  }

  Ok(Json(json!({ "success": true, "x": x, "y": y })))
}
