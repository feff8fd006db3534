/*! Shared utilities for macOS accessibility and permission checks. */

#![allow(unsafe_code)]

use objc2_application_services::AXIsProcessTrusted;
use objc2_application_services::AXUIElement;
use objc2_core_foundation::CFRetained;
use objc2_core_graphics::CGPreflightScreenCaptureAccess;

/// Create an `AXUIElement` for an application by pid.
pub(super) fn app_element(pid: i32) -> CFRetained<AXUIElement> {
  unsafe { AXUIElement::new_application(pid) }
}

/// Whether this process is trusted for accessibility API access.
pub(crate) fn accessibility_trusted() -> bool {
  unsafe { AXIsProcessTrusted() }
}

/// Whether this process has screen-recording entitlement.
///
/// `CGPreflightScreenCaptureAccess` checks without prompting; callers that
/// want the OS permission dialog should route the user to System Settings
/// instead (see `open_screen_recording_settings`).
pub(crate) fn screen_capture_trusted() -> bool {
  unsafe { CGPreflightScreenCaptureAccess() }
}
