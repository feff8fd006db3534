/*! `/status` (§4.1). */

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn status(State(state): State<AppState>) -> Json<Value> {
  let (accessibility_granted, screen_recording_granted, frontmost_app, screen_size) = state
    .on_main_thread(|platform| {
      (
        platform.accessibility_permission_granted(),
        platform.screen_recording_permission_granted(),
        platform.frontmost_app(),
        platform.screen_size(),
      )
    })
    .await;

  Json(json!({
    "success": true,
    "version": env!("CARGO_PKG_VERSION"),
    "server_running": true,
    "permissions": {
      "accessibility_granted": accessibility_granted,
      "screen_recording_granted": screen_recording_granted,
    },
    "frontmost_app": frontmost_app,
    "screen_size": { "width": screen_size.0, "height": screen_size.1 },
    "target_app": state.target_app,
  }))
}
