//! Sequential execution of one trigger
//!
//! A trigger walks its hooks forward, one at a time, collecting results. The
//! first failure flips it into reverse: the error handlers of the hooks that
//! already ran are invoked from the most recent back to the first, and the
//! trigger then rejects with the original failure.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Instant,
};

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::fault::FaultSink;
use crate::{
    config::DispatcherConfig,
    error::{ErrorHandlerFault, TriggerError},
    types::{HandlerRecord, Reply},
};

/// Where a trigger currently is
enum Phase<E> {
    /// Next hook to run
    Forward { position: usize },

    /// Hooks at positions `0..remaining` still get their error handler
    Reverse {
        remaining: usize,
        error: TriggerError<E>,
    },
}

/// State of a single trigger
pub(crate) struct Run<A, T, E> {
    pub(crate) event: String,
    pub(crate) records: Vec<Arc<HandlerRecord<A, T, E>>>,
    pub(crate) args: A,
    pub(crate) config: Arc<DispatcherConfig>,
    pub(crate) fault_sink: Arc<dyn FaultSink<E>>,
}

impl<A, T, E> Run<A, T, E>
where
    A: Clone + Send + Sync + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    pub(crate) async fn execute(self) -> std::result::Result<Vec<T>, TriggerError<E>> {
        let mut results = Vec::with_capacity(self.records.len());
        let mut phase = Phase::Forward { position: 0 };

        loop {
            phase = match phase {
                Phase::Forward { position } if position == self.records.len() => {
                    info!(
                        dispatcher = %self.config.name,
                        event = %self.event,
                        hook_count = results.len(),
                        "All hooks completed"
                    );
                    return Ok(results);
                }
                Phase::Forward { position } => match self.run_hook(position).await {
                    Ok(value) => {
                        results.push(value);
                        Phase::Forward {
                            position: position + 1,
                        }
                    }
                    Err(error) => {
                        if position > 0 {
                            warn!(
                                dispatcher = %self.config.name,
                                event = %self.event,
                                failed_position = position,
                                "Unwinding completed hooks"
                            );
                        }
                        Phase::Reverse {
                            remaining: position,
                            error,
                        }
                    }
                },
                Phase::Reverse {
                    remaining: 0,
                    error,
                } => return Err(error),
                Phase::Reverse { remaining, error } => {
                    let position = remaining - 1;
                    let outcome = self.invoke_error_handler(position, &error);
                    if let Some(outcome) = outcome {
                        if let Err(fault) = self.settle(outcome, true).await {
                            self.report_fault(position, fault);
                        }
                    }
                    Phase::Reverse {
                        remaining: position,
                        error,
                    }
                }
            };
        }
    }

    async fn run_hook(&self, position: usize) -> std::result::Result<T, TriggerError<E>> {
        let record = &self.records[position];
        let start = Instant::now();

        debug!(
            dispatcher = %self.config.name,
            event = %self.event,
            hook_id = %record.id(),
            priority = record.priority(),
            position,
            "Executing hook"
        );

        let handler = record.handler().clone();
        let args = self.args.clone();
        let catch_panics = self.config.catch_panics;
        let outcome = match self.guard(catch_panics, move || handler(args)) {
            Ok(reply) => self.settle(reply, catch_panics).await,
            Err(panicked) => Err(panicked),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        if let Some(threshold) = self.config.slow_hook_threshold_ms {
            if duration_ms > threshold {
                warn!(
                    dispatcher = %self.config.name,
                    event = %self.event,
                    hook_id = %record.id(),
                    duration_ms,
                    threshold_ms = threshold,
                    "Slow hook"
                );
            }
        }

        match &outcome {
            Ok(_) => debug!(
                event = %self.event,
                hook_id = %record.id(),
                duration_ms,
                "Hook completed"
            ),
            Err(TriggerError::Handler(_)) => error!(
                dispatcher = %self.config.name,
                event = %self.event,
                hook_id = %record.id(),
                position,
                duration_ms,
                "Hook failed"
            ),
            Err(TriggerError::Executing(message)) => error!(
                dispatcher = %self.config.name,
                event = %self.event,
                hook_id = %record.id(),
                position,
                panic = %message,
                "Hook panicked"
            ),
        }

        outcome
    }

    /// Call the error handler at `position`, if it has one
    ///
    /// Returns `None` when the hook has no error handler, or when calling it
    /// panicked (the panic has already been reported as a fault). Error
    /// handler panics are always caught, whatever `catch_panics` says.
    fn invoke_error_handler(
        &self,
        position: usize,
        error: &TriggerError<E>,
    ) -> Option<Reply<(), E>> {
        let record = &self.records[position];
        let error_handler = record.error_handler()?.clone();

        debug!(
            event = %self.event,
            hook_id = %record.id(),
            position,
            "Executing error handler"
        );

        let args = self.args.clone();
        match self.guard(true, move || error_handler(error, args)) {
            Ok(reply) => Some(reply),
            Err(panicked) => {
                self.report_fault(position, panicked);
                None
            }
        }
    }

    /// Wait for a reply without suspending when it is already settled
    async fn settle<V>(
        &self,
        reply: Reply<V, E>,
        catch_panics: bool,
    ) -> std::result::Result<V, TriggerError<E>> {
        match reply {
            Reply::Ready(result) => result.map_err(TriggerError::Handler),
            Reply::Deferred(future) if catch_panics => {
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(result) => result.map_err(TriggerError::Handler),
                    Err(payload) => Err(TriggerError::from_panic(payload)),
                }
            }
            Reply::Deferred(future) => future.await.map_err(TriggerError::Handler),
        }
    }

    /// Run a synchronous call, turning a panic into `Executing` when `catch_panics`
    fn guard<R>(
        &self,
        catch_panics: bool,
        call: impl FnOnce() -> R,
    ) -> std::result::Result<R, TriggerError<E>> {
        if catch_panics {
            panic::catch_unwind(AssertUnwindSafe(call)).map_err(TriggerError::from_panic)
        } else {
            Ok(call())
        }
    }

    fn report_fault(&self, position: usize, error: TriggerError<E>) {
        self.fault_sink.report(ErrorHandlerFault {
            event: self.event.clone(),
            hook_id: self.records[position].id().to_string(),
            position,
            error,
        });
    }
}
