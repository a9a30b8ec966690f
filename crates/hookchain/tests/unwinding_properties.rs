//! Property-based tests for failure handling
//!
//! **Property 5: Error handlers of completed hooks run in reverse order**
//! **Property 6: Failing error handlers never change the rejection reason**

use std::sync::{Arc, Mutex};

use hookchain::*;
use proptest::prelude::*;

type TestDispatcher = Dispatcher<u32, usize, String>;
type Journal = Arc<Mutex<Vec<String>>>;

/// How an error handler behaves when it is called
#[derive(Debug, Clone, Copy)]
enum Compensation {
    None,
    Succeeds,
    SucceedsLater,
    Fails,
    FailsLater,
}

fn compensation_strategy() -> impl Strategy<Value = Compensation> {
    prop_oneof![
        Just(Compensation::None),
        Just(Compensation::Succeeds),
        Just(Compensation::SucceedsLater),
        Just(Compensation::Fails),
        Just(Compensation::FailsLater),
    ]
}

/// Hooks (one compensation each) plus the position of the hook that fails
fn scenario_strategy() -> impl Strategy<Value = (Vec<Compensation>, usize)> {
    prop::collection::vec(compensation_strategy(), 1..10).prop_flat_map(|hooks| {
        let len = hooks.len();
        (Just(hooks), 0..len)
    })
}

fn record(journal: &Journal, entry: String) {
    journal.lock().unwrap().push(entry);
}

fn build(
    hooks: &[Compensation],
    failing: usize,
    journal: &Journal,
) -> (TestDispatcher, tokio::sync::mpsc::UnboundedReceiver<ErrorHandlerFault<String>>) {
    let (sink, faults) = ChannelFaultSink::new();
    let dispatcher = TestDispatcher::new().with_fault_sink(sink);

    for (index, compensation) in hooks.iter().copied().enumerate() {
        let forward = journal.clone();
        let mut registration = Registration::new(move |_: u32| {
            record(&forward, format!("run {}", index));
            if index == failing {
                Reply::deferred(async move {
                    tokio::task::yield_now().await;
                    Err(format!("hook {} failed", index))
                })
            } else {
                Reply::ok(index)
            }
        })
        .id(format!("hook{}", index));

        if !matches!(compensation, Compensation::None) {
            let backward = journal.clone();
            registration = registration.on_error(move |error: &TriggerError<String>, arg: u32| {
                record(&backward, format!("undo {} ({}, {})", index, error, arg));
                match compensation {
                    Compensation::None | Compensation::Succeeds => Reply::ok(()),
                    Compensation::SucceedsLater => Reply::deferred(async {
                        tokio::task::yield_now().await;
                        Ok(())
                    }),
                    Compensation::Fails => Reply::err(format!("undo {} failed", index)),
                    Compensation::FailsLater => Reply::deferred(async move {
                        tokio::task::yield_now().await;
                        Err(format!("undo {} failed", index))
                    }),
                }
            });
        }

        dispatcher.register("event", registration);
    }

    (dispatcher, faults)
}

proptest! {
    /// Property 5: Reverse unwinding over completed hooks only
    ///
    /// For any set of hooks where hook `k` fails, hooks `0..=k` run forward,
    /// then the error handlers of hooks `k-1` down to `0` run (skipping hooks
    /// without one), and the failing hook's own error handler never runs.
    #[test]
    fn prop_unwinding_is_reverse_of_completed((hooks, failing) in scenario_strategy()) {
        let journal: Journal = Arc::new(Mutex::new(Vec::new()));
        let (dispatcher, _faults) = build(&hooks, failing, &journal);

        let error = tokio_test::block_on(dispatcher.trigger("event", 9)).unwrap_err();
        prop_assert_eq!(error, TriggerError::Handler(format!("hook {} failed", failing)));

        let mut expected: Vec<String> = (0..=failing).map(|i| format!("run {}", i)).collect();
        for index in (0..failing).rev() {
            if !matches!(hooks[index], Compensation::None) {
                expected.push(format!("undo {} (hook {} failed, 9)", index, failing));
            }
        }

        prop_assert_eq!(journal.lock().unwrap().clone(), expected);
    }

    /// Property 6: Faults are reported, not propagated
    ///
    /// For any mix of failing and succeeding error handlers, the trigger
    /// rejects with the original error and every failing error handler
    /// produces exactly one fault, in unwinding order.
    #[test]
    fn prop_faults_are_out_of_band((hooks, failing) in scenario_strategy()) {
        let journal: Journal = Arc::new(Mutex::new(Vec::new()));
        let (dispatcher, mut faults) = build(&hooks, failing, &journal);

        let error = tokio_test::block_on(dispatcher.trigger("event", 1)).unwrap_err();
        prop_assert_eq!(error, TriggerError::Handler(format!("hook {} failed", failing)));

        let expected: Vec<String> = (0..failing)
            .rev()
            .filter(|i| matches!(hooks[*i], Compensation::Fails | Compensation::FailsLater))
            .map(|i| format!("hook{}", i))
            .collect();

        let mut reported = Vec::new();
        while let Ok(fault) = faults.try_recv() {
            prop_assert_eq!(
                &fault.error,
                &TriggerError::Handler(format!("undo {} failed", fault.position))
            );
            reported.push(fault.hook_id);
        }
        prop_assert_eq!(reported, expected);
    }
}

#[tokio::test]
async fn test_priority_scenario_from_three_hooks() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = TestDispatcher::new();

    for (name, priority) in [("C", 3i64), ("A", 1), ("B", 2)] {
        let forward = journal.clone();
        let backward = journal.clone();
        dispatcher.register(
            "event",
            Registration::new(move |_| {
                record(&forward, name.to_string());
                if name == "C" {
                    Reply::err("C broke".to_string())
                } else {
                    Reply::ok(0)
                }
            })
            .priority(priority)
            .on_error(move |_, _| {
                record(&backward, format!("err{}", name));
                Reply::ok(())
            }),
        );
    }

    let error = dispatcher.trigger("event", 0).await.unwrap_err();
    assert_eq!(error, TriggerError::Handler("C broke".to_string()));
    assert_eq!(
        *journal.lock().unwrap(),
        vec!["A", "B", "C", "errB", "errA"]
    );
}

#[tokio::test]
async fn test_results_exclude_unrun_hooks_on_success_path() {
    let dispatcher = TestDispatcher::new();
    dispatcher
        .register("event", Registration::new(|n| Reply::ok(n as usize)))
        .register("other", Registration::new(|_| Reply::err("unrelated".to_string())));

    assert_eq!(dispatcher.trigger("event", 4).await.unwrap(), vec![4]);
}
