/*!
portal-server - the dispatch engine: HTTP routing, request/response
contracts, the error taxonomy, and the `run` lifecycle coordinator.

```ignore
use portal_server::{lifecycle, AppState};

lifecycle::run("Notes", "127.0.0.1", 0).await?;
```

Handlers never let a [`portal_core::PlatformError`] cross the HTTP boundary
directly - [`errors::ApiError`] classifies every failure into the public
taxonomy (validation / resolution / permission / adapter / unexpected)
before it is serialized.
*/

pub mod dispatch;
pub mod errors;
pub mod lifecycle;
pub mod server;
pub mod state;

pub use errors::ApiError;
pub use state::AppState;
