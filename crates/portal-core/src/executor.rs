/*!
A dedicated OS thread that serializes every accessibility/input/capture
call, satisfying the single-thread-affinity invariant `AXUIElement` and
`CGEvent` calls require.

`tokio::task::spawn_blocking` alone isn't enough here: it runs work on a
thread *pool*, so two calls from the same request (or two different
requests) can land on different OS threads even though they must appear to
the OS as coming from one. This executor owns exactly one thread and a work
queue; callers submit closures and block for the result, typically from
inside a `spawn_blocking` so the async runtime isn't stalled.
*/

use std::sync::mpsc;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to the dedicated thread. Cheap to clone (an `mpsc::Sender` is a
/// shared handle); every clone submits to the same thread.
#[derive(Clone)]
pub struct MainThreadExecutor {
  sender: mpsc::Sender<Job>,
}

impl MainThreadExecutor {
  /// Spawn the worker thread. Panics if the OS refuses to create it - there
  /// is no reasonable way to run this crate without it.
  pub fn spawn() -> Self {
    let (sender, receiver) = mpsc::channel::<Job>();
    std::thread::Builder::new()
      .name("portal-main".to_string())
      .spawn(move || {
        for job in receiver {
          job();
        }
      })
      .expect("failed to spawn main-thread executor");
    Self { sender }
  }

  /// Run `f` on the dedicated thread and block until it completes.
  ///
  /// Panics if the executor thread has terminated (it never exits under
  /// normal operation) or if `f` itself panics - the panic propagates to
  /// the caller the same way it would for any closure, rather than
  /// silently dropping the reply.
  pub fn run<F, R>(&self, f: F) -> R
  where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
  {
    let (reply_tx, reply_rx) = mpsc::channel::<R>();
    let job: Job = Box::new(move || {
      let _ = reply_tx.send(f());
    });
    self.sender.send(job).expect("main-thread executor terminated unexpectedly");
    reply_rx.recv().expect("main-thread executor dropped without replying")
  }
}

impl std::fmt::Debug for MainThreadExecutor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MainThreadExecutor").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  #[test]
  fn run_executes_and_returns_result() {
    let executor = MainThreadExecutor::spawn();
    let result = executor.run(|| 2 + 2);
    assert_eq!(result, 4);
  }

  #[test]
  fn sequential_calls_observe_a_single_thread() {
    let executor = MainThreadExecutor::spawn();
    let counter = Arc::new(AtomicUsize::new(0));
    let seen_thread = executor.run(|| std::thread::current().id());
    for _ in 0..8 {
      let counter = Arc::clone(&counter);
      let thread_id = executor.run(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        std::thread::current().id()
      });
      assert_eq!(thread_id, seen_thread);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 8);
  }
}
