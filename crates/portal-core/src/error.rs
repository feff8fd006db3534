/*! Error types for platform operations. */

use crate::types::ElementPath;

/// Errors that can occur while talking to the OS accessibility, input, or
/// screen-capture facilities.
///
/// This is the *internal* taxonomy. `portal-server` classifies these into
/// the public response shape (validation / resolution / permission /
/// adapter / timeout / unexpected) documented by the dispatch engine.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
  #[error("Accessibility permissions not granted")]
  AccessibilityPermissionDenied,

  #[error("Screen recording permissions not granted")]
  ScreenRecordingPermissionDenied,

  #[error("Process {0} not found")]
  ProcessNotFound(u32),

  #[error("Element not found at path {0}")]
  ElementNotFound(ElementPath),

  #[error("No element matched the query")]
  NoMatch,

  #[error("Window not found")]
  WindowNotFound,

  #[error("Display {0} not found")]
  DisplayNotFound(u32),

  #[error("Action '{action}' failed: {reason}")]
  ActionFailed { action: String, reason: String },

  #[error("Failed to set value: {0}")]
  SetValueFailed(String),

  #[error("Menu path did not resolve: {0}")]
  MenuNotFound(String),

  #[error("Screen capture failed: {0}")]
  CaptureFailed(String),

  #[error("Failed to encode image: {0}")]
  EncodeFailed(String),

  #[error("Failed to launch application: {0}")]
  LaunchFailed(String),

  #[error("OS call failed (code {code}): {message}")]
  Os { code: i32, message: String },
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
