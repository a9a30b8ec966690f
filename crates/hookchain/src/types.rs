//! Core data types for the hooks system
//!
//! This module defines what a hook is: a forward handler, an optional error
//! handler that compensates when a later hook fails, and a priority that
//! decides where the hook runs relative to the others on the same event.
//!
//! The dispatcher is generic over three types shared by all of its hooks:
//!
//! * `A` - the arguments passed to every handler of a trigger (cloned per call)
//! * `T` - the value each forward handler produces
//! * `E` - the error a handler (or error handler) fails with
//!
//! # Examples
//!
//! ```ignore
//! use hookchain::{Registration, Reply};
//!
//! let hook = Registration::new(|path: String| Reply::ok(format!("formatted {}", path)))
//!     .id("format-on-save")
//!     .priority(10)
//!     .on_error(|_err, path: String| {
//!         Reply::deferred(async move { restore_backup(&path).await })
//!     });
//! ```

use std::{fmt, future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
use uuid::Uuid;

use crate::error::TriggerError;

/// Execution priority of a hook; lower values run first
pub type Priority = i64;

/// Priority used when a registration does not name one
pub const DEFAULT_PRIORITY: Priority = 0;

/// Forward handler stored in a hook
pub type HandlerFn<A, T, E> = Arc<dyn Fn(A) -> Reply<T, E> + Send + Sync>;

/// Error handler stored in a hook
///
/// Receives the original failure of the trigger and the trigger's arguments.
pub type ErrorHandlerFn<A, E> = Arc<dyn Fn(&TriggerError<E>, A) -> Reply<(), E> + Send + Sync>;

/// What a handler hands back to the dispatcher
///
/// A handler either knows its outcome immediately (`Ready`) or returns a
/// future that settles later (`Deferred`). The dispatcher only suspends for
/// `Deferred` replies.
pub enum Reply<T, E> {
    /// Outcome known at return time
    Ready(std::result::Result<T, E>),

    /// Outcome produced by a future
    Deferred(BoxFuture<'static, std::result::Result<T, E>>),
}

impl<T, E> Reply<T, E> {
    /// Successful synchronous reply
    pub fn ok(value: T) -> Self {
        Reply::Ready(Ok(value))
    }

    /// Failed synchronous reply
    pub fn err(error: E) -> Self {
        Reply::Ready(Err(error))
    }

    /// Reply settled by a future
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        Reply::Deferred(future.boxed())
    }

    /// Whether the dispatcher will have to wait for this reply
    pub fn is_deferred(&self) -> bool {
        matches!(self, Reply::Deferred(_))
    }
}

impl<T, E> From<std::result::Result<T, E>> for Reply<T, E> {
    fn from(result: std::result::Result<T, E>) -> Self {
        Reply::Ready(result)
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Reply<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Reply::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Declarative description of a hook to register
///
/// Only the handler is required. Priority defaults to [`DEFAULT_PRIORITY`]
/// and the id defaults to a generated UUID.
pub struct Registration<A, T, E> {
    pub(crate) id: Option<String>,
    pub(crate) priority: Option<Priority>,
    pub(crate) handler: HandlerFn<A, T, E>,
    pub(crate) error_handler: Option<ErrorHandlerFn<A, E>>,
}

impl<A, T, E> Registration<A, T, E> {
    /// Describe a hook running `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(A) -> Reply<T, E> + Send + Sync + 'static,
    {
        Self::from_handler(Arc::new(handler))
    }

    pub(crate) fn from_handler(handler: HandlerFn<A, T, E>) -> Self {
        Self {
            id: None,
            priority: None,
            handler,
            error_handler: None,
        }
    }

    /// Label used in logs and introspection
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Execution priority; lower runs first
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Compensation to run if a later hook on the same trigger fails
    pub fn on_error<F>(mut self, error_handler: F) -> Self
    where
        F: Fn(&TriggerError<E>, A) -> Reply<(), E> + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(error_handler));
        self
    }

    pub(crate) fn with_error_handler(mut self, error_handler: ErrorHandlerFn<A, E>) -> Self {
        self.error_handler = Some(error_handler);
        self
    }
}

impl<A, T, E> fmt::Debug for Registration<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("has_error_handler", &self.error_handler.is_some())
            .finish()
    }
}

/// One positional registration argument
///
/// Used with `Dispatcher::register_args`, which accepts
/// `[priority], handler, [error_handler]` in that order.
pub enum HookArg<A, T, E> {
    /// Execution priority
    Priority(Priority),

    /// Forward handler
    Handler(HandlerFn<A, T, E>),

    /// Error handler
    ErrorHandler(ErrorHandlerFn<A, E>),
}

impl<A, T, E> HookArg<A, T, E> {
    /// Wrap a forward handler
    pub fn handler<F>(handler: F) -> Self
    where
        F: Fn(A) -> Reply<T, E> + Send + Sync + 'static,
    {
        HookArg::Handler(Arc::new(handler))
    }

    /// Wrap an error handler
    pub fn error_handler<F>(error_handler: F) -> Self
    where
        F: Fn(&TriggerError<E>, A) -> Reply<(), E> + Send + Sync + 'static,
    {
        HookArg::ErrorHandler(Arc::new(error_handler))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            HookArg::Priority(_) => "priority",
            HookArg::Handler(_) => "handler",
            HookArg::ErrorHandler(_) => "error handler",
        }
    }
}

impl<A, T, E> fmt::Debug for HookArg<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookArg::Priority(p) => f.debug_tuple("Priority").field(p).finish(),
            HookArg::Handler(_) => f.write_str("Handler(..)"),
            HookArg::ErrorHandler(_) => f.write_str("ErrorHandler(..)"),
        }
    }
}

/// A registered hook
///
/// Records are immutable once created and shared between the registry and
/// in-flight triggers.
pub struct HandlerRecord<A, T, E> {
    id: String,
    priority: Priority,
    handler: HandlerFn<A, T, E>,
    error_handler: Option<ErrorHandlerFn<A, E>>,
}

impl<A, T, E> HandlerRecord<A, T, E> {
    /// Id of the hook
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resolved priority of the hook
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Whether the hook carries an error handler
    pub fn has_error_handler(&self) -> bool {
        self.error_handler.is_some()
    }

    pub(crate) fn handler(&self) -> &HandlerFn<A, T, E> {
        &self.handler
    }

    pub(crate) fn error_handler(&self) -> Option<&ErrorHandlerFn<A, E>> {
        self.error_handler.as_ref()
    }
}

impl<A, T, E> From<Registration<A, T, E>> for HandlerRecord<A, T, E> {
    fn from(registration: Registration<A, T, E>) -> Self {
        Self {
            id: registration
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            priority: registration.priority.unwrap_or(DEFAULT_PRIORITY),
            handler: registration.handler,
            error_handler: registration.error_handler,
        }
    }
}

impl<A, T, E> fmt::Debug for HandlerRecord<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRecord")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("has_error_handler", &self.error_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestRegistration = Registration<u32, u32, String>;

    #[test]
    fn test_record_defaults() {
        let record: HandlerRecord<u32, u32, String> =
            TestRegistration::new(|n| Reply::ok(n + 1)).into();

        assert_eq!(record.priority(), DEFAULT_PRIORITY);
        assert!(!record.has_error_handler());
        assert!(Uuid::parse_str(record.id()).is_ok());
    }

    #[test]
    fn test_record_keeps_explicit_fields() {
        let record: HandlerRecord<u32, u32, String> = TestRegistration::new(|n| Reply::ok(n))
            .id("audit")
            .priority(-3)
            .on_error(|_err, _n| Reply::ok(()))
            .into();

        assert_eq!(record.id(), "audit");
        assert_eq!(record.priority(), -3);
        assert!(record.has_error_handler());
    }

    #[test]
    fn test_reply_constructors() {
        let ready: Reply<u32, String> = Reply::ok(1);
        assert!(!ready.is_deferred());
        assert_eq!(format!("{:?}", ready), "Ready(Ok(1))");

        let failed: Reply<u32, String> = Reply::err("nope".to_string());
        assert!(matches!(failed, Reply::Ready(Err(ref e)) if e == "nope"));

        let deferred: Reply<u32, String> = Reply::deferred(async { Ok(2) });
        assert!(deferred.is_deferred());
        assert_eq!(format!("{:?}", deferred), "Deferred(..)");

        let converted: Reply<u32, String> = Ok(5).into();
        assert!(matches!(converted, Reply::Ready(Ok(5))));
    }

    #[test]
    fn test_hook_arg_kind() {
        let arg: HookArg<u32, u32, String> = HookArg::Priority(0);
        assert_eq!(arg.kind(), "priority");
        let arg: HookArg<u32, u32, String> = HookArg::handler(|n| Reply::ok(n));
        assert_eq!(arg.kind(), "handler");
        let arg: HookArg<u32, u32, String> = HookArg::error_handler(|_e, _n| Reply::ok(()));
        assert_eq!(arg.kind(), "error handler");
    }
}
