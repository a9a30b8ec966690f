//! Event dispatcher for triggering hooks
//!
//! The [`Dispatcher`] owns a [`HookRegistry`] and runs the hooks registered
//! for an event when that event is triggered:
//!
//! 1. Hooks are sorted by ascending priority (registration order breaks ties)
//! 2. Each hook runs only after the previous one has settled
//! 3. Results are collected in execution order
//! 4. On the first failure, the error handlers of the hooks that already ran
//!    are invoked in reverse order, then the trigger fails with the original
//!    error
//!
//! # Examples
//!
//! ```ignore
//! use hookchain::{Dispatcher, Registration, Reply};
//!
//! let dispatcher: Dispatcher<String, String, String> = Dispatcher::new();
//! dispatcher
//!     .register(
//!         "file_saved",
//!         Registration::new(|path| Reply::ok(format!("linted {}", path))).priority(1),
//!     )
//!     .register("file_saved", Registration::new(|path| {
//!         Reply::deferred(async move { Ok(format!("uploaded {}", path)) })
//!     }).priority(2));
//!
//! let results = dispatcher.trigger("file_saved", "main.rs".to_string()).await?;
//! assert_eq!(results, vec!["linted main.rs", "uploaded main.rs"]);
//! ```

mod engine;
pub mod fault;

pub use fault::{ChannelFaultSink, FaultSink, LogFaultSink};

use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use tracing::debug;

use crate::{
    config::{ConfigValidator, DispatcherConfig},
    error::{Result, TriggerError},
    registry::{args, HookRegistry},
    types::{HandlerRecord, HookArg, Registration},
};

/// Priority-ordered hook dispatcher
///
/// Each dispatcher owns its registry; two dispatchers never see each other's
/// hooks. Clones share the same registry, configuration and fault sink.
///
/// # Thread Safety
///
/// The dispatcher is `Send + Sync`. Any number of triggers, for the same or
/// different events, may run concurrently. Each trigger works on a snapshot
/// of the hooks taken when it starts.
pub struct Dispatcher<A, T, E> {
    registry: Arc<RwLock<HookRegistry<A, T, E>>>,
    config: Arc<DispatcherConfig>,
    fault_sink: Arc<dyn FaultSink<E>>,
}

impl<A, T, E> Dispatcher<A, T, E>
where
    A: Clone + Send + Sync + 'static,
    T: Send + 'static,
    E: fmt::Debug + Send + 'static,
{
    /// Create a dispatcher with the default configuration
    pub fn new() -> Self {
        Self::from_parts(DispatcherConfig::default())
    }

    /// Create a dispatcher with a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(config: DispatcherConfig) -> Result<Self> {
        ConfigValidator::validate(&config)?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: DispatcherConfig) -> Self {
        Self {
            registry: Arc::new(RwLock::new(HookRegistry::new())),
            config: Arc::new(config),
            fault_sink: Arc::new(LogFaultSink),
        }
    }

    /// Replace the sink receiving error handler faults
    pub fn with_fault_sink<S>(mut self, sink: S) -> Self
    where
        S: FaultSink<E> + 'static,
    {
        self.fault_sink = Arc::new(sink);
        self
    }

    /// Register a hook for `event`
    ///
    /// Returns the dispatcher so registrations can be chained.
    pub fn register(&self, event: &str, registration: Registration<A, T, E>) -> &Self {
        let record = HandlerRecord::from(registration);

        debug!(
            dispatcher = %self.config.name,
            event = %event,
            hook_id = %record.id(),
            priority = record.priority(),
            has_error_handler = record.has_error_handler(),
            "Registering hook"
        );

        self.registry.write().append(event, record);
        self
    }

    /// Register a hook from positional arguments
    ///
    /// Accepts `[priority], handler, [error_handler]`. Nothing is registered
    /// if the arguments are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`HooksError::InvalidArguments`](crate::HooksError::InvalidArguments)
    /// if the handler is missing, an argument is out of place, or extra
    /// arguments follow the error handler.
    pub fn register_args<I>(&self, event: &str, args: I) -> Result<&Self>
    where
        I: IntoIterator<Item = HookArg<A, T, E>>,
    {
        let registration = args::parse(event, args)?;
        Ok(self.register(event, registration))
    }

    /// Run the hooks registered for `event`
    ///
    /// Resolves with one result per hook, in execution order, or with an
    /// empty vector if no hooks are registered. Fails with the error of the
    /// first hook that fails, after the error handlers of the hooks before it
    /// have run in reverse order.
    ///
    /// There is no timeout: a hook whose future never settles stalls the
    /// trigger until the returned future is dropped.
    pub async fn trigger(
        &self,
        event: &str,
        args: A,
    ) -> std::result::Result<Vec<T>, TriggerError<E>> {
        let records = match self.ordered(event) {
            Some(records) => records,
            None => {
                debug!(
                    dispatcher = %self.config.name,
                    event = %event,
                    "No hooks registered for event"
                );
                return Ok(Vec::new());
            }
        };

        debug!(
            dispatcher = %self.config.name,
            event = %event,
            hook_count = records.len(),
            "Dispatching event"
        );

        engine::Run {
            event: event.to_string(),
            records,
            args,
            config: self.config.clone(),
            fault_sink: self.fault_sink.clone(),
        }
        .execute()
        .await
    }

    /// Ordered snapshot of the hooks for `event`, sorting only when needed
    fn ordered(&self, event: &str) -> Option<Vec<Arc<HandlerRecord<A, T, E>>>> {
        {
            let registry = self.registry.read();
            let entry = registry.entry(event)?;
            if entry.is_sorted() {
                return Some(entry.handlers().to_vec());
            }
        }

        self.registry.write().ordered(event)
    }

    /// Whether any hook is registered for `event`
    pub fn has_hooks(&self, event: &str) -> bool {
        self.registry.read().contains(event)
    }

    /// Number of hooks registered for `event`
    pub fn hook_count(&self, event: &str) -> usize {
        self.registry.read().hook_count(event)
    }

    /// Names of all events with hooks, sorted alphabetically
    pub fn event_names(&self) -> Vec<String> {
        self.registry.read().event_names()
    }

    /// Ids of the hooks for `event`, in the order they will run
    pub fn hook_ids(&self, event: &str) -> Vec<String> {
        self.ordered(event)
            .map(|records| records.iter().map(|r| r.id().to_string()).collect())
            .unwrap_or_default()
    }

    /// Configuration in use
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }
}

impl<A, T, E> Default for Dispatcher<A, T, E>
where
    A: Clone + Send + Sync + 'static,
    T: Send + 'static,
    E: fmt::Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T, E> Clone for Dispatcher<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config.clone(),
            fault_sink: self.fault_sink.clone(),
        }
    }
}

impl<A, T, E> fmt::Debug for Dispatcher<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("events", &self.registry.read().event_names())
            .finish()
    }
}
