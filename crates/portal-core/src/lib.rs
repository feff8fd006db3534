/*!
portal-core - platform adapters, element addressing, and the wait/poll engine
for the local UI-automation agent.

```ignore
use portal_core::{MainThreadExecutor, Platform, platform::CurrentPlatform};

let executor = MainThreadExecutor::spawn();
let platform = CurrentPlatform::default();
let granted = executor.run(move || platform.accessibility_permission_granted());
```

Everything that talks to the OS goes through the [`Platform`] trait, run on
a [`MainThreadExecutor`] so that `AXUIElement`/`CGEvent` calls observe a
single, consistent OS thread regardless of which async task is driving
them. [`tree_query`] and [`wait`] are built only on that trait, so they run
identically against the real adapter or a fake test double.
*/

pub mod capture;
pub mod error;
pub mod executor;
pub mod platform;
pub mod tree_query;
pub mod types;
pub mod wait;

pub use error::{PlatformError, PlatformResult};
pub use executor::MainThreadExecutor;
pub use platform::{CapturedImage, ElementAttributes, KeyInput, Platform};
pub use wait::WaitOutcome;
