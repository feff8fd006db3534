/*!
The public error taxonomy (§7): how internal failures are classified and
shaped into HTTP responses. [`PlatformError`] never crosses the HTTP
boundary unconverted.
*/

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portal_core::PlatformError;
use serde_json::json;

/// Dispatch-level error, already classified into one of the taxonomy's
/// kinds. Each variant knows its own HTTP status and response shape.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  /// Malformed JSON, missing/empty required field, predicate-less query,
  /// out-of-range timeout/delta. HTTP 400, `{"error":...,"code":400}`.
  #[error("{0}")]
  Validation(String),

  /// Target app not found, element path off-tree, no query match, menu
  /// path unresolved. HTTP 400, `{"success":false,"error":...}`.
  #[error("{0}")]
  Resolution(String),

  /// Accessibility or screen-recording entitlement missing for the call
  /// being attempted. HTTP 403, `{"success":false,"error":...}` with
  /// guidance to open the relevant settings pane.
  #[error("{0}")]
  PermissionDenied(String),

  /// OS call returned a non-success code. HTTP 500,
  /// `{"success":false,"error":...}`.
  #[error("{0}")]
  Adapter(String),

  /// Any uncaught handler error. HTTP 500, generic body, logged
  /// server-side. This is what the error-trap middleware produces.
  #[error("{0}")]
  Unexpected(String),
}

impl From<PlatformError> for ApiError {
  fn from(err: PlatformError) -> Self {
    match err {
      PlatformError::AccessibilityPermissionDenied => Self::PermissionDenied(
        "Accessibility permission not granted. Open System Settings > Privacy & Security > Accessibility.".into(),
      ),
      PlatformError::ScreenRecordingPermissionDenied => Self::PermissionDenied(
        "Screen recording permission not granted. Open System Settings > Privacy & Security > Screen Recording.".into(),
      ),
      PlatformError::ProcessNotFound(_)
      | PlatformError::ElementNotFound(_)
      | PlatformError::NoMatch
      | PlatformError::WindowNotFound
      | PlatformError::DisplayNotFound(_)
      | PlatformError::MenuNotFound(_) => Self::Resolution(err.to_string()),
      PlatformError::ActionFailed { .. }
      | PlatformError::SetValueFailed(_)
      | PlatformError::CaptureFailed(_)
      | PlatformError::EncodeFailed(_)
      | PlatformError::LaunchFailed(_)
      | PlatformError::Os { .. } => Self::Adapter(err.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      Self::Validation(message) => {
        log::warn!("[dispatch] validation error: {message}");
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message, "code": 400 }))).into_response()
      }
      Self::Resolution(message) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "error": message }))).into_response()
      }
      Self::PermissionDenied(message) => {
        (StatusCode::FORBIDDEN, Json(json!({ "success": false, "error": message }))).into_response()
      }
      Self::Adapter(message) => {
        log::warn!("[dispatch] adapter failure: {message}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false, "error": message }))).into_response()
      }
      Self::Unexpected(message) => {
        log::error!("[dispatch] unexpected error: {message}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Internal server error", "code": 500 }))).into_response()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_body_has_no_success_field() {
    let response = ApiError::Validation("text must not be empty".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn permission_denied_maps_to_forbidden() {
    let err = ApiError::from(PlatformError::AccessibilityPermissionDenied);
    assert!(matches!(err, ApiError::PermissionDenied(_)));
  }

  #[test]
  fn resolution_failures_classify_as_resolution() {
    let err = ApiError::from(PlatformError::WindowNotFound);
    assert!(matches!(err, ApiError::Resolution(_)));
  }
}
