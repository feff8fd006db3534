/*! `/screenshot` (§4.1). */

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use portal_core::capture;
use portal_core::types::WindowInfo;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct ScreenshotQuery {
  #[serde(default)]
  pub format: Option<String>,
  #[serde(default)]
  pub display: Option<u32>,
  #[serde(default)]
  pub app: Option<String>,
  #[serde(default, rename = "windowId")]
  pub window_id: Option<u32>,
}

/// What to capture, resolved from the query's `app`/`windowId`/`display`
/// in that order of precedence (§4.1: app-by-name first, then an explicit
/// window id, then the display).
enum Target {
  Display(Option<u32>),
  Window(u32, Option<WindowInfo>),
}

pub async fn screenshot(State(state): State<AppState>, Query(query): Query<ScreenshotQuery>) -> Result<Response, ApiError> {
  let format = query.format.as_deref().unwrap_or("png").to_string();
  if !matches!(format.as_str(), "png" | "jpeg" | "base64") {
    return Err(ApiError::Validation(format!("unknown screenshot format '{format}' (expected png, jpeg, or base64)")));
  }

  let app_filter = query.app.clone().or_else(|| state.target_app.as_ref().map(|app| app.name.clone()));

  let target = if let Some(app_name) = app_filter {
    let needle = app_name.to_lowercase();
    let windows = state.on_main_thread(|platform| platform.list_windows()).await;
    let mut matching: Vec<WindowInfo> = windows.into_iter().filter(|w| w.owner_name.to_lowercase().contains(&needle)).collect();
    matching.sort_by_key(|w| !w.is_on_screen);
    let window = matching.into_iter().next().ok_or_else(|| ApiError::Resolution(format!("no window found for app '{app_name}'")))?;
    Target::Window(window.window_id, Some(window))
  } else if let Some(window_id) = query.window_id {
    Target::Window(window_id, None)
  } else {
    Target::Display(query.display)
  };

  let captured = match &target {
    Target::Display(display_id) => {
      let display_id = *display_id;
      state.on_main_thread(move |platform| platform.capture_display(display_id)).await?
    }
    Target::Window(window_id, _) => {
      let window_id = *window_id;
      state.on_main_thread(move |platform| platform.capture_window(window_id)).await?
    }
  };

  let (width, height) = (captured.width, captured.height);

  match format.as_str() {
    "png" => {
      let bytes = capture::encode_png(&captured)?;
      Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
    }
    "jpeg" => {
      let bytes = capture::encode_jpeg(&captured)?;
      Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
    }
    _ => {
      let bytes = capture::encode_png(&captured)?;
      let data = BASE64.encode(&bytes);
      let mut body = json!({
        "success": true,
        "format": "png",
        "width": width,
        "height": height,
        "data": data,
      });
      if let Target::Window(_, Some(window)) = &target {
        body["window"] = serde_json::to_value(window).expect("WindowInfo always serializes");
      }
      Ok(Json(body).into_response())
    }
  }
}
