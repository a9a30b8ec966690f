//! Error types for the hooks system
//!
//! Two families of errors exist:
//!
//! 1. [`HooksError`]: raised synchronously by registration and configuration
//!    loading. These are caller mistakes and are never retried.
//!
//! 2. [`TriggerError`]: the rejection reason of a trigger. It carries the
//!    failing handler's own error by value, or a synthesized
//!    "executing error" when the handler panicked instead of failing.
//!
//! Failures raised by error handlers while unwinding are not errors of the
//! trigger at all; they are reported as [`ErrorHandlerFault`]s to the
//! dispatcher's fault sink.
//!
//! # Examples
//!
//! ```ignore
//! match dispatcher.trigger("save", path).await {
//!     Ok(results) => println!("{} hooks ran", results.len()),
//!     Err(TriggerError::Handler(e)) => eprintln!("hook failed: {}", e),
//!     Err(TriggerError::Executing(msg)) => eprintln!("hook panicked: {}", msg),
//! }
//! ```

use thiserror::Error;

/// Errors raised by registration and configuration
#[derive(Debug, Error)]
pub enum HooksError {
    /// Registration arguments were malformed
    ///
    /// Raised by `register_args` when an argument appears in the wrong slot,
    /// the handler is missing, or extraneous trailing arguments were supplied.
    /// Nothing is registered when this is returned.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Invalid dispatcher configuration
    ///
    /// The configuration document parsed but does not have the expected shape.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration validation error
    ///
    /// The configuration is well-formed but one of its values is out of range.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Serialization error
    ///
    /// Wraps `serde_yaml::Error` for YAML parsing failures.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Rejection reason of a trigger
///
/// `E` is the error type produced by the dispatcher's handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError<E> {
    /// A handler failed; the value is exactly what the handler produced
    #[error("{0}")]
    Handler(E),

    /// A handler panicked without producing an error value
    #[error("executing error: {0}")]
    Executing(String),
}

impl<E> TriggerError<E> {
    /// The handler's error, if the failure carried one
    pub fn handler_error(&self) -> Option<&E> {
        match self {
            TriggerError::Handler(e) => Some(e),
            TriggerError::Executing(_) => None,
        }
    }

    /// Consume the error and return the handler's error, if any
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            TriggerError::Handler(e) => Some(e),
            TriggerError::Executing(_) => None,
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "handler panicked".to_string()
        };
        TriggerError::Executing(message)
    }
}

/// A failure raised inside an error handler during unwinding
///
/// Faults never change the outcome of the trigger that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error handler for hook '{hook_id}' on event '{event}' (position {position}) failed: {error}")]
pub struct ErrorHandlerFault<E> {
    /// Event being triggered
    pub event: String,

    /// Id of the hook whose error handler failed
    pub hook_id: String,

    /// Position of that hook in execution order
    pub position: usize,

    /// What the error handler produced
    pub error: TriggerError<E>,
}

/// Result type for registration and configuration
pub type Result<T> = std::result::Result<T, HooksError>;
