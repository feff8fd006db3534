/*!
The `run` flow (§4.5): resolve the app spec, launch-or-attach, bind the
HTTP server, emit the bootstrap record, and watch the target app's
lifetime. Blocks until the process should exit - every termination path
(`/quit`, a target-app exit, an interrupt signal) calls
[`std::process::exit`] directly rather than threading a coordinated
shutdown signal through `axum::serve`, since the contract in §4.6 is that
the whole *process* stops, not just the listener.
*/

use crate::server;
use crate::state::AppState;
use portal_core::platform::CurrentPlatform;
use portal_core::{MainThreadExecutor, Platform};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Errors that can abort the `run` flow before the server starts serving.
/// Every variant maps to a non-zero process exit per §6's CLI contract.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
  #[error("failed to launch or attach to '{0}': {1}")]
  Launch(String, portal_core::PlatformError),
  #[error("failed to bind {0}:{1}: {2}")]
  Bind(String, u16, std::io::Error),
  #[error("server error: {0}")]
  Serve(std::io::Error),
}

/// Run the server bound to `app_spec` until the target app exits, `/quit`
/// is called, or the process receives an interrupt.
pub async fn run(app_spec: &str, host: &str, port: u16) -> Result<(), LifecycleError> {
  let platform: Arc<dyn Platform> = Arc::new(CurrentPlatform::default());
  let executor = MainThreadExecutor::spawn();

  let target_app = {
    let platform = Arc::clone(&platform);
    let executor = executor.clone();
    let spec = app_spec.to_string();
    tokio::task::spawn_blocking(move || executor.run(move || platform.launch_app(&spec)))
      .await
      .expect("main-thread executor task panicked")
      .map_err(|err| LifecycleError::Launch(app_spec.to_string(), err))?
  };

  let listener = tokio::net::TcpListener::bind((host, port))
    .await
    .map_err(|err| LifecycleError::Bind(host.to_string(), port, err))?;
  let bound_port = listener.local_addr().map_err(|err| LifecycleError::Bind(host.to_string(), port, err))?.port();

  let state = AppState::new(Arc::clone(&platform), executor.clone(), Some(target_app.clone()));
  let router = server::build_router(state.clone());

  let bootstrap = json!({
    "app": target_app.name,
    "host": host,
    "pid": target_app.pid,
    "port": bound_port,
  });
  println!("{bootstrap}");
  std::io::stdout().flush().map_err(LifecycleError::Serve)?;
  log::info!("bound to {host}:{bound_port}, target app '{}' (pid {})", target_app.name, target_app.pid);

  spawn_watchdog(state.clone(), target_app.pid);
  spawn_signal_handler();

  axum::serve(listener, router).await.map_err(LifecycleError::Serve)
}

/// Poll the target app's liveness once per second; exit cleanly the moment
/// it's gone (§4.5's "terminate when the target app quits").
fn spawn_watchdog(state: AppState, pid: i32) {
  tokio::spawn(async move {
    loop {
      tokio::time::sleep(Duration::from_secs(1)).await;
      let alive = state.on_main_thread(move |platform| platform.is_process_alive(pid)).await;
      if !alive {
        log::info!("target app (pid {pid}) exited, shutting down");
        std::process::exit(0);
      }
    }
  });
}

/// Exit cleanly on Ctrl+C / SIGINT, matching `/quit`'s exit code (§4.5's
/// "on signal").
fn spawn_signal_handler() {
  tokio::spawn(async {
    if tokio::signal::ctrl_c().await.is_ok() {
      log::info!("received interrupt, shutting down");
      std::process::exit(0);
    }
  });
}
