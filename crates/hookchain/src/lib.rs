//! Hookchain
//!
//! Priority-ordered event hooks with sequential dispatch and reverse error
//! unwinding.
//!
//! # Overview
//!
//! A hook is a handler registered under an event name. Triggering the event
//! runs its hooks one after another in ascending priority order and collects
//! their results. Handlers may answer synchronously or with a future; the
//! dispatcher waits for each one to settle before starting the next.
//!
//! When a hook fails, the hooks that already ran get a chance to compensate:
//! their error handlers are called in reverse order with the original error
//! and the trigger's arguments. The trigger then fails with that original
//! error. Failures inside error handlers are reported to a fault sink and
//! never change the trigger's outcome.
//!
//! # Architecture
//!
//! 1. **Hook Registry** (`registry`): Stores hooks per event, sorted lazily
//! 2. **Dispatcher** (`dispatcher`): Runs hooks forward, unwinds on failure
//! 3. **Configuration** (`config`): Optional YAML-backed dispatcher settings
//!
//! # Quick Start
//!
//! ```ignore
//! use hookchain::{Dispatcher, Registration, Reply, TriggerError};
//!
//! let dispatcher: Dispatcher<u32, String, String> = Dispatcher::new();
//!
//! dispatcher
//!     .register(
//!         "deploy",
//!         Registration::new(|build| Reply::ok(format!("reserved slot for {}", build)))
//!             .priority(1)
//!             .on_error(|_err, build| {
//!                 Reply::deferred(async move { release_slot(build).await })
//!             }),
//!     )
//!     .register(
//!         "deploy",
//!         Registration::new(|build| Reply::deferred(async move { push_image(build).await }))
//!             .priority(2),
//!     );
//!
//! match dispatcher.trigger("deploy", 42).await {
//!     Ok(results) => println!("deployed: {:?}", results),
//!     Err(TriggerError::Handler(e)) => eprintln!("deploy failed: {}", e),
//!     Err(e) => eprintln!("deploy failed: {}", e),
//! }
//! ```
//!
//! # Ordering
//!
//! Hooks run by ascending priority. Hooks sharing a priority (including the
//! default priority of 0) run in registration order.
//!
//! # Error Handling
//!
//! Registration and configuration return `Result<T>`, an alias for
//! `std::result::Result<T, HooksError>`. Triggers resolve to
//! `Result<Vec<T>, TriggerError<E>>`.
//!
//! # Thread Safety
//!
//! `Dispatcher` is `Send + Sync` and cheap to clone. Concurrent triggers are
//! independent of each other.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod types;

// Re-export public types
pub use config::{ConfigLoader, ConfigValidator, DispatcherConfig};
pub use dispatcher::{ChannelFaultSink, Dispatcher, FaultSink, LogFaultSink};
pub use error::{ErrorHandlerFault, HooksError, Result, TriggerError};
pub use registry::{EventEntry, HookRegistry};
pub use types::{
    ErrorHandlerFn, HandlerFn, HandlerRecord, HookArg, Priority, Registration, Reply,
    DEFAULT_PRIORITY,
};
