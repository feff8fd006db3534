/*! `/`, `/health`, `/quit` (§4.1). */

use axum::Json;
use serde_json::{json, Value};
use std::time::Duration;

pub async fn root() -> Json<Value> {
  Json(json!({
    "name": "portal-server",
    "version": env!("CARGO_PKG_VERSION"),
    "endpoints": [
      "/status", "/screenshot", "/click", "/click/element", "/type", "/key",
      "/scroll", "/wait", "/accessibility/tree", "/accessibility/element",
      "/accessibility/elements", "/accessibility/focused", "/accessibility/action",
      "/menu", "/quit", "/health",
    ],
  }))
}

pub async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}

/// Schedules process exit shortly after the response is sent. The `run`
/// flow's contract is that the whole process exits cleanly once a client
/// asks it to, not just the HTTP listener (§4.5, §4.6's Stopping state).
pub async fn quit() -> Json<Value> {
  tokio::spawn(async {
    tokio::time::sleep(Duration::from_millis(150)).await;
    std::process::exit(0);
  });
  Json(json!({ "success": true }))
}
