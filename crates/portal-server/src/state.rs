/*!
Shared request state: the platform adapter, the main-thread executor, and
the bound [`TargetApp`] (if any).
*/

use crate::errors::ApiError;
use portal_core::types::TargetApp;
use portal_core::{MainThreadExecutor, Platform};
use std::sync::Arc;

/// State shared across every handler via axum's `State` extractor.
///
/// `target_app` is read-only after server start (§5's "shared resources"),
/// so it is a plain field rather than behind a lock.
#[derive(Clone)]
pub struct AppState {
  platform: Arc<dyn Platform>,
  executor: MainThreadExecutor,
  pub target_app: Option<TargetApp>,
}

impl std::fmt::Debug for AppState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppState").field("target_app", &self.target_app).finish_non_exhaustive()
  }
}

impl AppState {
  pub fn new(platform: Arc<dyn Platform>, executor: MainThreadExecutor, target_app: Option<TargetApp>) -> Self {
    Self { platform, executor, target_app }
  }

  /// Run `f` on the main-thread executor without blocking the async
  /// runtime: the blocking wait for the executor's reply happens on a
  /// `spawn_blocking` thread, not the caller's task.
  pub async fn on_main_thread<F, R>(&self, f: F) -> R
  where
    F: FnOnce(&dyn Platform) -> R + Send + 'static,
    R: Send + 'static,
  {
    let platform = Arc::clone(&self.platform);
    let executor = self.executor.clone();
    tokio::task::spawn_blocking(move || executor.run(move || f(platform.as_ref())))
      .await
      .expect("main-thread executor task panicked")
  }

  /// Resolve the effective pid for a request per §4.5's scoping policy:
  /// explicit `pid` param, else the bound target app, else the frontmost
  /// application.
  pub async fn resolve_pid(&self, explicit: Option<i32>) -> Result<i32, ApiError> {
    if let Some(pid) = explicit {
      return Ok(pid);
    }
    if let Some(app) = &self.target_app {
      return Ok(app.pid);
    }
    let frontmost = self.on_main_thread(|platform| platform.frontmost_app()).await;
    frontmost
      .map(|app| app.pid)
      .ok_or_else(|| ApiError::Resolution("no pid given and no frontmost application found".into()))
  }
}
