/*!
Bounded polling of the accessibility tree against a [`WaitCondition`].

This is pure composition of [`Platform::resolve`]-style queries inside a
time-bounded loop; it holds no platform-specific knowledge of its own.
*/

use crate::error::PlatformResult;
use crate::platform::Platform;
use crate::types::{ElementQuery, UIElementInfo, WaitCondition};
use std::time::{Duration, Instant};

/// Minimum and maximum accepted `timeout_ms` / `poll_interval_ms`, per
/// the data model invariants.
pub const MIN_TIMEOUT_MS: u64 = 1;
pub const MAX_TIMEOUT_MS: u64 = 60_000;
pub const MIN_POLL_INTERVAL_MS: u64 = 1;
pub const MAX_POLL_INTERVAL_MS: u64 = 5_000;

/// Outcome of a wait loop.
#[derive(Debug, Clone)]
pub struct WaitOutcome {
  pub condition_met: bool,
  pub waited_ms: u64,
  /// The last-seen match, present whenever any query evaluation found one -
  /// including on timeout, to aid debugging.
  pub element: Option<UIElementInfo>,
}

/// Resolve `query` within `pid`'s application and decide whether `condition`
/// currently holds. Returns the first match (if any) regardless of whether
/// the condition held, so the caller can report it on timeout too.
///
/// Exposed so an async caller (the HTTP dispatch layer) can drive the poll
/// loop itself, submitting only this single evaluation - not the sleeps in
/// between - to the main-thread executor. See [`wait_for`]'s docs.
pub fn evaluate(platform: &dyn Platform, pid: i32, query: &ElementQuery, condition: WaitCondition) -> PlatformResult<(bool, Option<UIElementInfo>)> {
  let matches = crate::tree_query::find_matching(platform, pid, query, 10)?;
  let first = matches.into_iter().next();

  let met = match condition {
    WaitCondition::Exists => first.is_some(),
    WaitCondition::NotExists => first.is_none(),
    WaitCondition::Enabled => first.as_ref().is_some_and(|e| e.is_enabled),
    WaitCondition::Focused => first.as_ref().is_some_and(|e| e.is_focused),
  };
  Ok((met, first))
}

/// Poll `query` against `pid`'s accessibility tree until `condition` holds
/// or `timeout_ms` elapses, sleeping `poll_interval_ms` between attempts.
///
/// Callers are responsible for validating `timeout_ms`/`poll_interval_ms`
/// against the documented bounds before calling this - it trusts its inputs.
///
/// This blocks its caller's thread for the whole wait, `std::thread::sleep`
/// included - fine for a synchronous caller (tests, a CLI), but wrong to run
/// as a single job on [`crate::executor::MainThreadExecutor`]: that would
/// pin the one dedicated OS thread every other accessibility/input call
/// needs for up to `timeout_ms`. The HTTP dispatch layer instead drives this
/// same loop itself with [`evaluate`], submitting only each poll - not the
/// sleep - to the executor and sleeping on the async runtime in between.
pub fn wait_for(
  platform: &dyn Platform,
  pid: i32,
  query: &ElementQuery,
  condition: WaitCondition,
  timeout_ms: u64,
  poll_interval_ms: u64,
) -> PlatformResult<WaitOutcome> {
  let start = Instant::now();
  let timeout = Duration::from_millis(timeout_ms);
  let poll_interval = Duration::from_millis(poll_interval_ms.max(1));

  let mut last_seen = None;
  loop {
    let (met, element) = evaluate(platform, pid, query, condition)?;
    if element.is_some() {
      last_seen = element.clone();
    }
    let waited_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    if met {
      return Ok(WaitOutcome { condition_met: true, waited_ms, element });
    }
    if start.elapsed() >= timeout {
      return Ok(WaitOutcome { condition_met: false, waited_ms, element: last_seen });
    }
    std::thread::sleep(poll_interval.min(timeout.saturating_sub(start.elapsed())));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bounds_match_data_model_invariants() {
    assert_eq!(MIN_TIMEOUT_MS, 1);
    assert_eq!(MAX_TIMEOUT_MS, 60_000);
    assert_eq!(MIN_POLL_INTERVAL_MS, 1);
    assert_eq!(MAX_POLL_INTERVAL_MS, 5_000);
  }
}
