/*! `/wait` (§4.1, §4.3). */

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use portal_core::types::{ElementQuery, UIElementInfo, WaitCondition};
use portal_core::wait::{self, WaitOutcome, MAX_POLL_INTERVAL_MS, MAX_TIMEOUT_MS, MIN_POLL_INTERVAL_MS, MIN_TIMEOUT_MS};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

fn default_timeout_ms() -> u64 {
  5_000
}

fn default_poll_interval_ms() -> u64 {
  100
}

#[derive(Debug, Deserialize)]
pub struct WaitBody {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub title_contains: Option<String>,
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default)]
  pub label: Option<String>,
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  #[serde(default = "default_poll_interval_ms")]
  pub poll_interval_ms: u64,
  #[serde(default)]
  pub condition: WaitCondition,
}

pub async fn wait_handler(State(state): State<AppState>, Json(body): Json<WaitBody>) -> Result<Json<Value>, ApiError> {
  if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&body.timeout_ms) {
    return Err(ApiError::Validation(format!("timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}")));
  }
  if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&body.poll_interval_ms) {
    return Err(ApiError::Validation(format!(
      "poll_interval_ms must be between {MIN_POLL_INTERVAL_MS} and {MAX_POLL_INTERVAL_MS}"
    )));
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
  let condition = body.condition;
  let timeout_ms = body.timeout_ms;
  let poll_interval_ms = body.poll_interval_ms;

  let outcome = run_wait(&state, pid, query, condition, timeout_ms, poll_interval_ms).await?;

  let mut response = json!({
    "success": true,
    "condition_met": outcome.condition_met,
    "waited_ms": outcome.waited_ms,
  });
  if let Some(element) = &outcome.element {
    response["element"] = serde_json::to_value(element).expect("UIElementInfo always serializes");
  }
  if !outcome.condition_met {
    response["error"] = json!(format!("Timeout: condition not met after {timeout_ms}ms"));
  }
  Ok(Json(response))
}

/// Drives [`wait::evaluate`]'s poll loop from the async handler instead of
/// [`wait::wait_for`]: each evaluation is its own short main-thread-executor
/// job, and the inter-poll sleep runs on the Tokio runtime, so a long wait
/// never pins the single accessibility/input thread other requests need
/// (§5's "each call is short and must not block arbitrarily").
async fn run_wait(
  state: &AppState,
  pid: i32,
  query: ElementQuery,
  condition: WaitCondition,
  timeout_ms: u64,
  poll_interval_ms: u64,
) -> Result<WaitOutcome, ApiError> {
  let start = Instant::now();
  let timeout = Duration::from_millis(timeout_ms);
  let poll_interval = Duration::from_millis(poll_interval_ms.max(1));

  let mut last_seen: Option<UIElementInfo> = None;
  loop {
    let q = query.clone();
    let (met, element) = state.on_main_thread(move |platform| wait::evaluate(platform, pid, &q, condition)).await?;
    if element.is_some() {
      last_seen = element.clone();
    }
    let waited_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    if met {
      return Ok(WaitOutcome { condition_met: true, waited_ms, element });
    }
    if start.elapsed() >= timeout {
      return Ok(WaitOutcome { condition_met: false, waited_ms, element: last_seen });
    }
    tokio::time::sleep(poll_interval.min(timeout.saturating_sub(start.elapsed()))).await;
  }
}
