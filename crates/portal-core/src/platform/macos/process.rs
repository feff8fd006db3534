/*! Process discovery and application launch via `NSRunningApplication`/`NSWorkspace`. */

#![allow(unsafe_code)]

use crate::error::{PlatformError, PlatformResult};
use crate::types::TargetApp;
use objc2::rc::Retained;
use objc2_app_kit::{NSRunningApplication, NSWorkspace, NSWorkspaceOpenConfiguration};
use objc2_foundation::{NSArray, NSString, NSURL};

fn running_application_for_pid(pid: i32) -> Option<Retained<NSRunningApplication>> {
  unsafe {
    objc2::msg_send![objc2::class!(NSRunningApplication), runningApplicationWithProcessIdentifier: pid]
  }
}

fn to_target_app(app: &NSRunningApplication) -> Option<TargetApp> {
  let pid = unsafe { app.processIdentifier() };
  if pid <= 0 {
    return None;
  }
  let name = unsafe { app.localizedName() }.map(|s| s.to_string()).unwrap_or_else(|| format!("pid:{pid}"));
  let bundle_id = unsafe { app.bundleIdentifier() }.map(|s| s.to_string());
  Some(TargetApp { pid, name, bundle_id })
}

pub(super) fn is_process_alive(pid: i32) -> bool {
  running_application_for_pid(pid).is_some_and(|app| unsafe { !app.isTerminated() })
}

pub(super) fn frontmost_app() -> Option<TargetApp> {
  let workspace = unsafe { NSWorkspace::sharedWorkspace() };
  let app = unsafe { workspace.frontmostApplication() }?;
  to_target_app(&app)
}

/// Case-insensitive match against a running application's display name or
/// bundle identifier.
pub(super) fn find_app(spec: &str) -> Option<TargetApp> {
  let workspace = unsafe { NSWorkspace::sharedWorkspace() };
  let apps: Retained<NSArray<NSRunningApplication>> = unsafe { workspace.runningApplications() };
  let needle = spec.to_lowercase();
  (0..apps.len()).filter_map(|i| apps.get(i)).find_map(|app| {
    let candidate = to_target_app(&app)?;
    let name_matches = candidate.name.to_lowercase() == needle;
    let bundle_matches = candidate.bundle_id.as_deref().is_some_and(|b| b.to_lowercase() == needle);
    (name_matches || bundle_matches).then_some(candidate)
  })
}

/// Launch by absolute bundle path, bundle identifier, or display name (in
/// that order of preference). Display-name launches resolve through
/// `find_app` first in case the application is already running.
pub(super) fn launch_app(spec: &str) -> PlatformResult<TargetApp> {
  if let Some(running) = find_app(spec) {
    return Ok(running);
  }

  let workspace = unsafe { NSWorkspace::sharedWorkspace() };
  let url = if spec.starts_with('/') {
    Some(unsafe { NSURL::fileURLWithPath(&NSString::from_str(spec)) })
  } else {
    unsafe { workspace.URLForApplicationWithBundleIdentifier(&NSString::from_str(spec)) }
  };

  let Some(url) = url else {
    // Not a bundle path or a known bundle id - fall back to launching by
    // display name through the `open` utility, then wait for the process
    // to show up in the running-application list.
    return launch_by_name(spec);
  };

  let config = unsafe { NSWorkspaceOpenConfiguration::configuration() };
  let app: Retained<NSRunningApplication> = unsafe { workspace.launchApplicationAtURL_options_configuration_error(&url, Default::default(), &config) }
    .map_err(|err| PlatformError::LaunchFailed(err.to_string()))?;

  to_target_app(&app).ok_or_else(|| PlatformError::LaunchFailed(format!("failed to launch '{spec}'")))
}

/// Launch-by-display-name via `/usr/bin/open -a`, then poll for up to
/// ~5s for the process to appear (§4.5's bounded readiness window) - `open`
/// returns before the launched app has finished registering itself.
fn launch_by_name(spec: &str) -> PlatformResult<TargetApp> {
  let status = std::process::Command::new("/usr/bin/open")
    .arg("-a")
    .arg(spec)
    .status()
    .map_err(|err| PlatformError::LaunchFailed(format!("failed to invoke open(1): {err}")))?;
  if !status.success() {
    return Err(PlatformError::LaunchFailed(format!("no application found for '{spec}'")));
  }

  let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
  loop {
    if let Some(app) = find_app(spec) {
      return Ok(app);
    }
    if std::time::Instant::now() >= deadline {
      return Err(PlatformError::LaunchFailed(format!("'{spec}' did not become ready within 5s")));
    }
    std::thread::sleep(std::time::Duration::from_millis(200));
  }
}

/// Bring a running application to the foreground. Used by `/menu`'s
/// non-background mode, which needs the target frontmost before a menu
/// press resolves correctly.
pub(super) fn activate_app(pid: i32) -> PlatformResult<()> {
  let app = running_application_for_pid(pid).ok_or(PlatformError::ProcessNotFound(pid.unsigned_abs()))?;
  let activated = unsafe { app.activateWithOptions(objc2_app_kit::NSApplicationActivationOptions::empty()) };
  if activated {
    Ok(())
  } else {
    Err(PlatformError::ActionFailed { action: "activate".into(), reason: "NSRunningApplication activation failed".into() })
  }
}

/// Open a URL (including `x-apple.systempreferences:` panes) with the
/// default handler.
pub(super) fn open_url(url: &str) {
  let Some(url) = (unsafe { NSURL::URLWithString(&NSString::from_str(url)) }) else {
    return;
  };
  let workspace = unsafe { NSWorkspace::sharedWorkspace() };
  unsafe { workspace.openURL(&url) };
}
