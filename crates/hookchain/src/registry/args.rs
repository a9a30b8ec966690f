//! Positional registration arguments
//!
//! Accepts the `[priority], handler, [error_handler]` form. A leading
//! priority is recognised by its variant, never by its value, so an explicit
//! `Priority(0)` is consumed as a priority just like any other number.

use tracing::warn;

use crate::{
    error::{HooksError, Result},
    types::{HookArg, Registration},
};

/// Turn positional arguments into a [`Registration`]
///
/// # Errors
///
/// Returns [`HooksError::InvalidArguments`] if the handler is missing, an
/// argument sits in the wrong slot, or arguments remain after the error
/// handler.
pub fn parse<A, T, E, I>(event: &str, args: I) -> Result<Registration<A, T, E>>
where
    I: IntoIterator<Item = HookArg<A, T, E>>,
{
    let mut args = args.into_iter().peekable();

    let priority = match args.peek() {
        Some(HookArg::Priority(p)) => {
            let p = *p;
            args.next();
            Some(p)
        }
        _ => None,
    };

    let handler = match args.next() {
        Some(HookArg::Handler(handler)) => handler,
        Some(other) => {
            return Err(invalid(
                event,
                format!("expected a handler, found {}", other.kind()),
            ))
        }
        None => return Err(invalid(event, "missing handler".to_string())),
    };

    let mut registration = Registration::from_handler(handler);
    if let Some(p) = priority {
        registration = registration.priority(p);
    }

    match args.next() {
        Some(HookArg::ErrorHandler(error_handler)) => {
            registration = registration.with_error_handler(error_handler);
        }
        Some(other) => {
            return Err(invalid(
                event,
                format!("expected an error handler, found {}", other.kind()),
            ))
        }
        None => return Ok(registration),
    }

    let extra = args.count();
    if extra != 0 {
        return Err(invalid(
            event,
            format!("too many arguments ({} unexpected after error handler)", extra),
        ));
    }

    Ok(registration)
}

fn invalid(event: &str, reason: String) -> HooksError {
    warn!(event = %event, reason = %reason, "Rejected hook registration");
    HooksError::InvalidArguments(format!("{} (event '{}')", reason, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HandlerRecord, Reply, DEFAULT_PRIORITY};

    type Arg = HookArg<u32, u32, String>;

    fn handler() -> Arg {
        HookArg::handler(|n| Reply::ok(n))
    }

    fn error_handler() -> Arg {
        HookArg::error_handler(|_e, _n| Reply::ok(()))
    }

    fn record(args: Vec<Arg>) -> Result<HandlerRecord<u32, u32, String>> {
        parse("ping", args).map(HandlerRecord::from)
    }

    #[test]
    fn test_handler_only() {
        let record = record(vec![handler()]).unwrap();
        assert_eq!(record.priority(), DEFAULT_PRIORITY);
        assert!(!record.has_error_handler());
    }

    #[test]
    fn test_priority_and_handler() {
        let record = record(vec![Arg::Priority(7), handler()]).unwrap();
        assert_eq!(record.priority(), 7);
    }

    #[test]
    fn test_zero_priority_is_consumed() {
        let record = record(vec![Arg::Priority(0), handler(), error_handler()]).unwrap();
        assert_eq!(record.priority(), 0);
        assert!(record.has_error_handler());
    }

    #[test]
    fn test_handler_and_error_handler() {
        let record = record(vec![handler(), error_handler()]).unwrap();
        assert_eq!(record.priority(), DEFAULT_PRIORITY);
        assert!(record.has_error_handler());
    }

    #[test]
    fn test_too_many_arguments() {
        let result = record(vec![
            Arg::Priority(1),
            handler(),
            error_handler(),
            handler(),
        ]);
        assert!(matches!(
            result,
            Err(HooksError::InvalidArguments(ref m)) if m.contains("too many")
        ));
    }

    #[test]
    fn test_extra_argument_without_priority() {
        let result = record(vec![handler(), error_handler(), error_handler()]);
        assert!(matches!(result, Err(HooksError::InvalidArguments(_))));
    }

    #[test]
    fn test_missing_handler() {
        assert!(matches!(
            record(vec![]),
            Err(HooksError::InvalidArguments(ref m)) if m.contains("missing handler")
        ));
        assert!(matches!(
            record(vec![Arg::Priority(2)]),
            Err(HooksError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_wrong_slot() {
        let result = record(vec![error_handler()]);
        assert!(matches!(
            result,
            Err(HooksError::InvalidArguments(ref m)) if m.contains("found error handler")
        ));

        let result = record(vec![handler(), Arg::Priority(3)]);
        assert!(matches!(
            result,
            Err(HooksError::InvalidArguments(ref m)) if m.contains("found priority")
        ));
    }
}
