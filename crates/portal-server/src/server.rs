/*!
Router assembly: the route table, body-size caps, and the two middleware
layers §4.4 describes - error trap (panics become the same generic 500
body [`crate::errors::ApiError::Unexpected`] produces) and request
logging (method, path, status, duration at debug level).
*/

use crate::dispatch::{accessibility, click, key, menu, misc, screenshot, scroll, status, type_text, wait};
use crate::state::AppState;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;

/// Default body-size cap for every endpoint except `/type` (§4.1, §4.4).
const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024;
/// `/type` gets a larger cap since `text` can be long.
const TYPE_BODY_LIMIT_BYTES: usize = 100 * 1024;

pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(misc::root))
    .route("/health", get(misc::health))
    .route("/status", get(status::status))
    .route("/screenshot", get(screenshot::screenshot))
    .route("/click", post(click::click))
    .route("/click/element", post(click::click_element))
    .route(
      "/type",
      post(type_text::type_text).route_layer(RequestBodyLimitLayer::new(TYPE_BODY_LIMIT_BYTES)),
    )
    .route("/key", post(key::key))
    .route("/scroll", post(scroll::scroll))
    .route("/wait", post(wait::wait_handler))
    .route("/accessibility/tree", get(accessibility::tree))
    .route("/accessibility/element", get(accessibility::element))
    .route("/accessibility/elements", get(accessibility::elements))
    .route("/accessibility/focused", get(accessibility::focused))
    .route("/accessibility/action", post(accessibility::action))
    .route("/menu", get(menu::menu_tree).post(menu::menu_press))
    .route("/quit", post(misc::quit))
    .layer(RequestBodyLimitLayer::new(DEFAULT_BODY_LIMIT_BYTES))
    .layer(middleware::from_fn(request_log))
    .layer(CatchPanicLayer::custom(handle_panic))
    .with_state(state)
}

/// Request-log middleware: method, path, status, duration at debug level.
async fn request_log(req: Request, next: Next) -> Response {
  let method = req.method().clone();
  let path = req.uri().path().to_string();
  let start = Instant::now();
  let response = next.run(req).await;
  log::debug!("{method} {path} -> {} in {:?}", response.status(), start.elapsed());
  response
}

/// Error-trap middleware: a handler panic becomes HTTP 500 with the same
/// generic body [`crate::errors::ApiError::Unexpected`] produces, rather
/// than tearing down the connection.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
  let message = err
    .downcast_ref::<&str>()
    .map(|s| (*s).to_string())
    .or_else(|| err.downcast_ref::<String>().cloned())
    .unwrap_or_else(|| "unknown panic".to_string());
  log::error!("[dispatch] handler panicked: {message}");
  (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Internal server error", "code": 500 }))).into_response()
}
