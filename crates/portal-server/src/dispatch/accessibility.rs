/*!
`/accessibility/tree`, `/accessibility/element`, `/accessibility/elements`,
`/accessibility/focused`, `/accessibility/action` (§4.1).
*/

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use portal_core::tree_query;
use portal_core::types::{ActionKind, ElementPath, ElementQuery};
use serde::Deserialize;
use serde_json::{json, Value};

/// Maximum depth any of these endpoints will expand, regardless of what a
/// caller asks for - an unbounded accessibility tree can be arbitrarily deep.
const MAX_TREE_DEPTH: usize = 10;
const DEFAULT_TREE_DEPTH: usize = 5;
const DEFAULT_MAX_RESULTS: usize = 50;

fn parse_root_path(pid: i32, raw: Option<&str>) -> Result<ElementPath, ApiError> {
  let Some(raw) = raw.filter(|s| !s.is_empty()) else {
    return Ok(ElementPath::root(pid));
  };
  let indices = raw
    .split(',')
    .map(|part| part.trim().parse::<usize>().map_err(|_| ApiError::Validation(format!("invalid rootPath segment '{part}'"))))
    .collect::<Result<Vec<_>, _>>()?;
  Ok(ElementPath { pid, path: indices })
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default, rename = "maxDepth")]
  pub max_depth: Option<usize>,
  #[serde(default)]
  pub format: Option<String>,
  #[serde(default, rename = "includeActions")]
  pub include_actions: Option<bool>,
  #[serde(default, rename = "rootPath")]
  pub root_path: Option<String>,
}

pub async fn tree(State(state): State<AppState>, Query(query): Query<TreeQuery>) -> Result<Json<Value>, ApiError> {
  let pid = state.resolve_pid(query.pid).await?;
  let max_depth = query.max_depth.unwrap_or(DEFAULT_TREE_DEPTH).min(MAX_TREE_DEPTH);
  let format = query.format.as_deref().unwrap_or("tree");
  if !matches!(format, "tree" | "compact") {
    return Err(ApiError::Validation(format!("unknown tree format '{format}' (expected tree or compact)")));
  }
  let include_actions = query.include_actions.unwrap_or(false);
  let root = parse_root_path(pid, query.root_path.as_deref())?;

  if format == "compact" {
    let entries = state.on_main_thread(move |platform| tree_query::compact_tree(platform, &root, max_depth, include_actions)).await?;
    Ok(Json(json!({ "success": true, "format": "compact", "elements": entries })))
  } else {
    let info = state.on_main_thread(move |platform| tree_query::describe_with_children(platform, &root, max_depth)).await?;
    Ok(Json(json!({ "success": true, "format": "tree", "element": info })))
  }
}

#[derive(Debug, Deserialize)]
pub struct ElementQueryParams {
  pub pid: i32,
  #[serde(default)]
  pub path: Option<String>,
  #[serde(default, rename = "childDepth")]
  pub child_depth: Option<usize>,
}

pub async fn element(State(state): State<AppState>, Query(query): Query<ElementQueryParams>) -> Result<Json<Value>, ApiError> {
  let raw_path = query.path.ok_or_else(|| ApiError::Validation("path is required".into()))?;
  let path = parse_root_path(query.pid, Some(&raw_path))?;
  let depth = query.child_depth.unwrap_or(0).min(MAX_TREE_DEPTH);
  let info = state.on_main_thread(move |platform| tree_query::describe_with_children(platform, &path, depth)).await?;
  Ok(Json(json!({ "success": true, "element": info })))
}

#[derive(Debug, Deserialize)]
pub struct ElementsQuery {
  #[serde(default)]
  pub pid: Option<i32>,
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default, rename = "titleContains")]
  pub title_contains: Option<String>,
  #[serde(default, rename = "labelContains")]
  pub label_contains: Option<String>,
  #[serde(default, rename = "valueContains")]
  pub value_contains: Option<String>,
  #[serde(default, rename = "maxResults")]
  pub max_results: Option<usize>,
}

pub async fn elements(State(state): State<AppState>, Query(query): Query<ElementsQuery>) -> Result<Json<Value>, ApiError> {
  let max_results = query.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
  let element_query = ElementQuery {
    role: query.role,
    title: query.title,
    title_contains: query.title_contains,
    label_contains: query.label_contains,
    value_contains: query.value_contains,
    max_results: Some(max_results),
  };
  if !element_query.has_predicate() {
    return Err(ApiError::Validation(
      "at least one query criteria (role, title, titleContains, labelContains, valueContains) is required".into(),
    ));
  }

  let pid = state.resolve_pid(query.pid).await?;
  let matches = state.on_main_thread(move |platform| tree_query::find_matching(platform, pid, &element_query, MAX_TREE_DEPTH)).await?;
  Ok(Json(json!({ "success": true, "elements": matches })))
}

#[derive(Debug, Deserialize)]
pub struct FocusedQuery {
  #[serde(default)]
  pub pid: Option<i32>,
}

pub async fn focused(State(state): State<AppState>, Query(query): Query<FocusedQuery>) -> Result<Json<Value>, ApiError> {
  let pid = state.resolve_pid(query.pid).await?;
  let element = state.on_main_thread(move |platform| tree_query::describe_focused(platform, pid)).await?;
  match element {
    Some(element) => Ok(Json(json!({ "success": true, "element": element }))),
    None => Err(ApiError::Resolution("no focused element".into())),
  }
}

#[derive(Debug, Deserialize)]
pub struct ActionBody {
  pub path: ElementPath,
  pub action: ActionKind,
  #[serde(default)]
  pub value: Option<String>,
}

pub async fn action(State(state): State<AppState>, Json(body): Json<ActionBody>) -> Result<Json<Value>, ApiError> {
  let path = body.path;
  let action = body.action;

  if matches!(action, ActionKind::SetValue) {
    let value = body
      .value
      .filter(|v| !v.is_empty())
      .ok_or_else(|| ApiError::Validation("value is required and must be non-empty for the setValue action".into()))?;
    state.on_main_thread(move |platform| platform.perform_action(&path, ActionKind::SetValue, Some(&value))).await?;
  } else {
    state.on_main_thread(move |platform| platform.perform_action(&path, action, None)).await?;
  }

  Ok(Json(json!({ "success": true })))
}
