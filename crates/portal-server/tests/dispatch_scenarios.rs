//! End-to-end dispatch-engine scenarios from spec §8, driven against
//! [`support::FakePlatform`] instead of the real macOS adapter.

mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use portal_core::types::{ActionKind, ElementPath};
use serde_json::{json, Value};
use support::{test_state, FakeNode};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
  let bytes = response.into_body().collect().await.expect("read response body").to_bytes();
  serde_json::from_slice(&bytes).expect("response body is valid JSON")
}

fn post(path: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(path)
    .header("content-type", "application/json")
    .body(Body::from(serde_json::to_vec(&body).expect("serializable body")))
    .expect("valid request")
}

fn get(path: &str) -> Request<Body> {
  Request::builder().method("GET").uri(path).body(Body::empty()).expect("valid request")
}

/// Scenario 1: click an element by title, mouse mode.
#[tokio::test]
async fn click_element_by_title_computes_center_and_clicks_once() {
  let (state, fake) = test_state(None);
  fake.set_tree(
    1234,
    FakeNode::new("AXApplication").child(
      FakeNode::new("AXButton").title("OK").frame(100.0, 200.0, 80.0, 40.0).actions(&[ActionKind::Press]),
    ),
  );
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(post("/click/element", json!({ "title": "OK", "pid": 1234 }))).await.expect("router call");
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;

  assert_eq!(body["success"], json!(true));
  assert_eq!(body["element"]["role"], json!("AXButton"));
  assert_eq!(body["clicked_at"]["x"], json!(140.0));
  assert_eq!(body["clicked_at"]["y"], json!(220.0));

  let clicks = fake.recorded_clicks();
  assert_eq!(clicks.len(), 1);
  assert_eq!(clicks[0].x, 140.0);
  assert_eq!(clicks[0].y, 220.0);
}

/// Scenario 2: `/type` in `replace` mode against an element query resolves
/// to a single `setValue`, with zero synthesized key events.
#[tokio::test]
async fn type_replace_mode_uses_set_value_not_synthesized_keys() {
  let (state, fake) = test_state(None);
  fake.set_tree(
    1234,
    FakeNode::new("AXApplication").child(FakeNode::new("AXTextField").title("Email Address")),
  );
  let router = portal_server::server::build_router(state);

  let response = router
    .oneshot(post("/type", json!({ "text": "a@b", "pid": 1234, "role": "AXTextField", "title_contains": "Email" })))
    .await
    .expect("router call");
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;

  assert_eq!(body["success"], json!(true));
  assert_eq!(body["characters_typed"], json!(3));

  let set_values = fake.recorded_set_values();
  assert_eq!(set_values.len(), 1);
  assert_eq!(set_values[0].1, "a@b");
  assert!(fake.recorded_global_key_presses().is_empty());
}

/// Scenario 3: `/wait` with `not_exists` returns once a background mutation
/// removes the matching node.
#[tokio::test]
async fn wait_not_exists_returns_once_node_disappears() {
  let (state, fake) = test_state(None);
  fake.set_tree(1234, FakeNode::new("AXApplication").child(FakeNode::new("AXStaticText").title("Loading")));
  let router = portal_server::server::build_router(state);

  let vanish = fake.clone();
  std::thread::spawn(move || {
    std::thread::sleep(std::time::Duration::from_millis(350));
    vanish.set_tree(1234, FakeNode::new("AXApplication"));
  });

  let response = router
    .oneshot(post(
      "/wait",
      json!({ "title": "Loading", "pid": 1234, "condition": "not_exists", "timeout_ms": 2000, "poll_interval_ms": 50 }),
    ))
    .await
    .expect("router call");
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;

  assert_eq!(body["success"], json!(true));
  assert_eq!(body["condition_met"], json!(true));
  let waited_ms = body["waited_ms"].as_u64().expect("waited_ms is a number");
  assert!((300..=1000).contains(&waited_ms), "waited_ms {waited_ms} out of expected range");
}

/// Scenario 4: `/wait` reports a timeout as a normal HTTP 200 outcome.
#[tokio::test]
async fn wait_timeout_is_reported_not_thrown() {
  let (state, _fake) = test_state(None);
  let router = portal_server::server::build_router(state);
  // No tree registered at all for pid 1234 - the query never matches.

  let response = router
    .oneshot(post("/wait", json!({ "title": "NeverAppears", "pid": 1234, "timeout_ms": 200, "poll_interval_ms": 50 })))
    .await
    .expect("router call");
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;

  assert_eq!(body["success"], json!(true));
  assert_eq!(body["condition_met"], json!(false));
  let waited_ms = body["waited_ms"].as_u64().expect("waited_ms is a number");
  assert!((200..=400).contains(&waited_ms), "waited_ms {waited_ms} out of expected range");
  let error = body["error"].as_str().expect("error string present");
  assert!(error.contains("Timeout"));
  assert!(error.contains("200ms"));
}

/// Scenario 6: `/key` with a `path` maps to the fixed action set, and
/// rejects arbitrary keys in path mode.
#[tokio::test]
async fn key_with_path_maps_to_accessibility_actions() {
  let (state, fake) = test_state(None);
  fake.set_tree(1234, FakeNode::new("AXApplication").child(FakeNode::new("AXTextField")));
  let router = portal_server::server::build_router(state.clone());
  let path = ElementPath { pid: 1234, path: vec![0] };

  for (key, expected) in [("return", ActionKind::Confirm), ("escape", ActionKind::Cancel), ("space", ActionKind::Press)] {
    let response = router
      .clone()
      .oneshot(post("/key", json!({ "key": key, "path": { "pid": path.pid, "path": path.path } })))
      .await
      .expect("router call");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let recorded = fake.recorded_actions();
    assert_eq!(recorded.last().expect("an action was recorded").1, expected);
  }
  assert!(fake.recorded_global_key_presses().is_empty());

  let response = router
    .oneshot(post("/key", json!({ "key": "a", "path": { "pid": path.pid, "path": path.path } })))
    .await
    .expect("router call");
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body = body_json(response).await;
  let error = body["error"].as_str().expect("error string present");
  assert!(error.contains("pid"));
}

/// Quantified invariant: negative coordinates never reach the adapter.
#[tokio::test]
async fn click_with_negative_coordinate_is_rejected_before_synthesis() {
  let (state, fake) = test_state(None);
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(post("/click", json!({ "x": -1.0, "y": 10.0 }))).await.expect("router call");
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  assert!(fake.recorded_clicks().is_empty());
}

/// Quantified invariant: empty `/type` text is rejected with a descriptive error.
#[tokio::test]
async fn type_with_empty_text_is_rejected() {
  let (state, _fake) = test_state(None);
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(post("/type", json!({ "text": "" }))).await.expect("router call");
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body = body_json(response).await;
  let error = body["error"].as_str().expect("error string present");
  assert!(error.contains("empty"));
}

/// Quantified invariant: an unknown `/type` mode names both valid modes.
#[tokio::test]
async fn type_with_unknown_mode_names_valid_modes() {
  let (state, _fake) = test_state(None);
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(post("/type", json!({ "text": "hi", "mode": "paste" }))).await.expect("router call");
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body = body_json(response).await;
  let error = body["error"].as_str().expect("error string present");
  assert!(error.contains("replace"));
  assert!(error.contains("keys"));
}

/// Quantified invariant: `/scroll` with both deltas zero is rejected.
#[tokio::test]
async fn scroll_with_zero_deltas_is_rejected() {
  let (state, _fake) = test_state(None);
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(post("/scroll", json!({ "delta_x": 0.0, "delta_y": 0.0, "x": 1.0, "y": 1.0 }))).await.expect("router call");
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body = body_json(response).await;
  let error = body["error"].as_str().expect("error string present");
  assert!(error.contains("non-zero"));
}

/// Quantified invariant: out-of-range `timeout_ms` is rejected.
#[tokio::test]
async fn wait_with_out_of_range_timeout_is_rejected() {
  let (state, _fake) = test_state(None);
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(post("/wait", json!({ "title": "x", "pid": 1, "timeout_ms": 0 }))).await.expect("router call");
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Quantified invariant: `/accessibility/elements` requires at least one
/// query predicate.
#[tokio::test]
async fn elements_without_criteria_is_rejected() {
  let (state, _fake) = test_state(None);
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(get("/accessibility/elements?pid=1")).await.expect("router call");
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body = body_json(response).await;
  let error = body["error"].as_str().expect("error string present");
  assert!(error.contains("criteria"));
}

/// §8: a tree restricted by `rootPath` agrees with the matching subtree of
/// an unrestricted tree fetch.
#[tokio::test]
async fn tree_with_root_path_matches_unrestricted_subtree() {
  let (state, fake) = test_state(None);
  fake.set_tree(
    1234,
    FakeNode::new("AXApplication").child(
      FakeNode::new("AXGroup").child(FakeNode::new("AXButton").title("OK")),
    ),
  );
  let router = portal_server::server::build_router(state);

  let full = router.clone().oneshot(get("/accessibility/tree?pid=1234&format=tree&maxDepth=5")).await.expect("router call");
  let full_body = body_json(full).await;
  let group = &full_body["element"]["children"][0];
  assert_eq!(group["role"], json!("AXGroup"));

  let scoped = router.oneshot(get("/accessibility/tree?pid=1234&format=tree&rootPath=0&maxDepth=5")).await.expect("router call");
  let scoped_body = body_json(scoped).await;
  assert_eq!(scoped_body["element"]["role"], group["role"]);
  assert_eq!(scoped_body["element"]["children"], group["children"]);
}

/// §8: a compact tree with `includeActions=false` omits the `actions` field
/// entirely; with `true`, an entry whose node has actions carries a
/// non-empty list.
#[tokio::test]
async fn compact_tree_include_actions_controls_actions_field() {
  let (state, fake) = test_state(None);
  fake.set_tree(
    1234,
    FakeNode::new("AXApplication").child(
      FakeNode::new("AXButton").title("OK").actions(&[ActionKind::Press]),
    ),
  );
  let router = portal_server::server::build_router(state);

  let without = router
    .clone()
    .oneshot(get("/accessibility/tree?pid=1234&format=compact&includeActions=false"))
    .await
    .expect("router call");
  assert_eq!(without.status(), StatusCode::OK);
  let body = body_json(without).await;
  let button = body["elements"]
    .as_array()
    .expect("elements is an array")
    .iter()
    .find(|e| e["title"] == json!("OK"))
    .expect("button entry present");
  assert!(!button.as_object().expect("entry is an object").contains_key("actions"));

  let with = router.oneshot(get("/accessibility/tree?pid=1234&format=compact&includeActions=true")).await.expect("router call");
  assert_eq!(with.status(), StatusCode::OK);
  let body = body_json(with).await;
  let button = body["elements"]
    .as_array()
    .expect("elements is an array")
    .iter()
    .find(|e| e["title"] == json!("OK"))
    .expect("button entry present");
  let actions = button["actions"].as_array().expect("actions present when includeActions=true");
  assert!(!actions.is_empty());
}

/// `/health` is a plain liveness probe.
#[tokio::test]
async fn health_reports_ok() {
  let (state, _fake) = test_state(None);
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(get("/health")).await.expect("router call");
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

/// `/status` exposes the bound target app.
#[tokio::test]
async fn status_reports_bound_target_app() {
  use portal_core::types::TargetApp;
  let (state, _fake) = test_state(Some(TargetApp { pid: 4242, name: "Notes".into(), bundle_id: None }));
  let router = portal_server::server::build_router(state);

  let response = router.oneshot(get("/status")).await.expect("router call");
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["target_app"]["pid"], json!(4242));
  assert_eq!(body["target_app"]["name"], json!("Notes"));
}
