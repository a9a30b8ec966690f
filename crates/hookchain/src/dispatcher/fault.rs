//! Out-of-band reporting of error handler failures
//!
//! An error handler that fails while unwinding must not change what the
//! trigger resolves to, but its failure must not disappear either. Faults are
//! handed to a [`FaultSink`] instead.

use std::fmt;

use tokio::sync::mpsc;
use tracing::error;

use crate::error::ErrorHandlerFault;

/// Destination for error handler faults
pub trait FaultSink<E>: Send + Sync {
    /// Receive a fault; must not block
    fn report(&self, fault: ErrorHandlerFault<E>);
}

/// Reports faults as `error`-level tracing events
///
/// This is the default sink of a dispatcher. Faults are only visible if the
/// host installs a `tracing` subscriber; use [`ChannelFaultSink`] when every
/// fault must reach the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFaultSink;

impl<E: fmt::Debug> FaultSink<E> for LogFaultSink {
    fn report(&self, fault: ErrorHandlerFault<E>) {
        error!(
            event = %fault.event,
            hook_id = %fault.hook_id,
            position = fault.position,
            error = ?fault.error,
            "Error handler failed during unwinding"
        );
    }
}

/// Forwards faults into an unbounded channel
///
/// If the receiving half has been dropped the fault is logged instead.
#[derive(Debug, Clone)]
pub struct ChannelFaultSink<E> {
    sender: mpsc::UnboundedSender<ErrorHandlerFault<E>>,
}

impl<E> ChannelFaultSink<E> {
    /// Create a sink and the receiver its faults are delivered to
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ErrorHandlerFault<E>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl<E: fmt::Debug + Send> FaultSink<E> for ChannelFaultSink<E> {
    fn report(&self, fault: ErrorHandlerFault<E>) {
        if let Err(mpsc::error::SendError(fault)) = self.sender.send(fault) {
            LogFaultSink.report(fault);
        }
    }
}
