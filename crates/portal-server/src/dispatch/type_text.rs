/*!
`/type` (§4.1) - the mode/targeting resolution table this endpoint exists
to encode:

| mode    | targeting            | behavior                                            |
|---------|----------------------|------------------------------------------------------|
| replace | `path`                | `setValue` on that node, atomically                  |
| replace | element query         | resolve to one node, `setValue` on it                |
| replace | none                  | global per-character key synthesis                   |
| keys    | `path`                | per-character key synthesis targeted at `path.pid`   |
| keys    | element query         | focus the match, then targeted per-character keys    |
| keys    | `pid` only            | targeted per-character keys                          |
| keys    | none                  | global per-character key synthesis                   |
*/

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use portal_core::platform::KeyInput;
use portal_core::tree_query;
use portal_core::types::{ActionKind, ElementPath, ElementQuery};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct TypeBody {
  pub text: String,
  #[serde(default)]
  pub delay_ms: Option<u64>,
  #[serde(default)]
  pub mode: Option<String>,
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default)]
  pub path: Option<ElementPath>,
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub title_contains: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Replace,
  Keys,
}

pub async fn type_text(State(state): State<AppState>, Json(body): Json<TypeBody>) -> Result<Json<Value>, ApiError> {
  if body.text.is_empty() {
    return Err(ApiError::Validation("text must not be empty".into()));
  }

  let mode = match body.mode.as_deref() {
    None | Some("replace") => Mode::Replace,
    Some("keys") => Mode::Keys,
    Some(other) => return Err(ApiError::Validation(format!("unknown type mode '{other}' (expected replace or keys)"))),
  };

  let query = ElementQuery {
    role: body.role,
    title: body.title,
    title_contains: body.title_contains,
    label_contains: None,
    value_contains: None,
    max_results: Some(1),
  };
  let has_query = query.has_predicate();
  let characters_typed = body.text.chars().count();

  match mode {
    Mode::Replace => {
      if let Some(path) = body.path {
        set_value_at(&state, path, &body.text).await?;
      } else if has_query {
        let pid = state.resolve_pid(body.pid).await?;
        let path = resolve_one(&state, pid, query).await?;
        set_value_at(&state, path, &body.text).await?;
      } else {
        type_globally(&state, &body.text, body.delay_ms).await?;
      }
    }
    Mode::Keys => {
      if let Some(path) = body.path {
        type_targeted(&state, &body.text, body.delay_ms, path.pid).await?;
      } else if has_query {
        let pid = state.resolve_pid(body.pid).await?;
        let path = resolve_one(&state, pid, query).await?;
        state.on_main_thread(move |platform| platform.perform_action(&path, ActionKind::Focus, None)).await?;
        type_targeted(&state, &body.text, body.delay_ms, pid).await?;
      } else if let Some(pid) = body.pid {
        type_targeted(&state, &body.text, body.delay_ms, pid).await?;
      } else {
        type_globally(&state, &body.text, body.delay_ms).await?;
      }
    }
  }

  Ok(Json(json!({ "success": true, "characters_typed": characters_typed })))
}

async fn resolve_one(state: &AppState, pid: i32, query: ElementQuery) -> Result<ElementPath, ApiError> {
  let matches = state.on_main_thread(move |platform| tree_query::find_matching(platform, pid, &query, 10)).await?;
  let element = matches.into_iter().next().ok_or_else(|| ApiError::Resolution("no element matched the query".into()))?;
  Ok(element.path)
}

async fn set_value_at(state: &AppState, path: ElementPath, text: &str) -> Result<(), ApiError> {
  let text = text.to_string();
  state.on_main_thread(move |platform| platform.set_value(&path, &text)).await?;
  Ok(())
}

async fn type_globally(state: &AppState, text: &str, delay_ms: Option<u64>) -> Result<(), ApiError> {
  for ch in text.chars() {
    let input: KeyInput = state.on_main_thread(move |platform| platform.char_to_key_input(ch)).await;
    state.on_main_thread(move |platform| platform.global_type_char(input)).await?;
    sleep_between(delay_ms).await;
  }
  Ok(())
}

async fn type_targeted(state: &AppState, text: &str, delay_ms: Option<u64>, pid: i32) -> Result<(), ApiError> {
  for ch in text.chars() {
    let input: KeyInput = state.on_main_thread(move |platform| platform.char_to_key_input(ch)).await;
    state.on_main_thread(move |platform| platform.targeted_type_char(pid, input)).await?;
    sleep_between(delay_ms).await;
  }
  Ok(())
}

async fn sleep_between(delay_ms: Option<u64>) {
  if let Some(ms) = delay_ms.filter(|&ms| ms > 0) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
  }
}
