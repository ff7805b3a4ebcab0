//! Onion dispatch through a repository: ordering, short-circuits, argument
//! rewriting and fail-fast configuration errors.

mod common;

use common::{
    Answer, Double, Echo, Increment, Lookup, LookupOnly, ShortCircuit, Unsupported,
    bare_repository, constant, counted, identity,
};
use mediate::{
    MediateError, Next, Operation, Perform, Repository, StrategySpec, Wrap, WrapperSpec,
    testing::{CallCounter, Journal, Recording},
};
use std::panic::{AssertUnwindSafe, catch_unwind};

#[test]
fn test_unconfigured_repository_fails_before_any_wrapper() {
    let repo = bare_repository("unconfigured");
    let counter = CallCounter::new();
    repo.configure_wrappers([
        counted("outer", &counter, || ShortCircuit(1)),
        counted("inner", &counter, || Increment),
    ]);

    for result in [repo.call(Echo(1)).map(|_| ()), repo.call(Unsupported)] {
        assert_eq!(
            result,
            Err(MediateError::NotConfigured {
                repository: "unconfigured".to_string(),
            })
        );
    }
    assert_eq!(counter.count(), 0);
    assert!(repo.plans().is_empty());
}

#[test]
fn test_wrappers_nest_in_configuration_order() {
    let journal = Journal::new();
    let repo = Repository::builder("ordered")
        .declare::<Echo>()
        .strategy(identity("S", &journal))
        .wrapper(Recording::spec("W1", &journal).hook::<Echo>().build())
        .wrapper(Recording::spec("W2", &journal).hook::<Echo>().build())
        .wrapper(Recording::spec("W3", &journal).hook::<Echo>().build())
        .build()
        .unwrap();

    assert_eq!(repo.call(Echo(5)).unwrap(), 5);
    assert_eq!(
        journal.entries(),
        vec![
            "enter W1", "enter W2", "enter W3", "call S", "exit W3", "exit W2", "exit W1",
        ]
    );
}

#[test]
fn test_wrapper_without_matching_hook_is_transparent() {
    let journal = Journal::new();
    let bystander = WrapperSpec::builder(|| LookupOnly)
        .named("lookup_only")
        .hook::<Lookup>()
        .build();
    let repo = Repository::builder("transparent")
        .declare::<Echo>()
        .strategy(identity("S", &journal))
        .wrapper(Recording::spec("W1", &journal).hook::<Echo>().build())
        .wrapper(bystander)
        .wrapper(Recording::spec("W2", &journal).hook::<Echo>().build())
        .build()
        .unwrap();

    assert_eq!(repo.call(Echo(7)).unwrap(), 7);
    assert_eq!(
        journal.entries(),
        vec!["enter W1", "enter W2", "call S", "exit W2", "exit W1"]
    );

    let plan = repo.plan::<Echo>().unwrap();
    assert_eq!(plan.wrappers().collect::<Vec<_>>(), vec!["W1", "W2"]);
    assert_eq!(
        repo.wrapper_names(),
        vec!["W1", "lookup_only", "W2"],
        "building a plan must not touch the configured list"
    );
}

#[test]
fn test_short_circuit_skips_inner_wrappers_and_strategy() {
    let journal = Journal::new();
    let repo = Repository::builder("short")
        .declare::<Echo>()
        .strategy(identity("S", &journal))
        .wrapper(Recording::spec("outer", &journal).hook::<Echo>().build())
        .wrapper(
            WrapperSpec::builder(|| ShortCircuit(42))
                .named("short")
                .hook::<Echo>()
                .build(),
        )
        .wrapper(Recording::spec("inner", &journal).hook::<Echo>().build())
        .build()
        .unwrap();

    assert_eq!(repo.call(Echo(1)).unwrap(), 42);
    assert_eq!(journal.entries(), vec!["enter outer", "exit outer"]);
}

#[test]
fn test_argument_and_result_transformation() {
    let journal = Journal::new();
    let repo = Repository::builder("transform")
        .declare::<Echo>()
        .strategy(identity("S", &journal))
        .wrapper(WrapperSpec::builder(|| Increment).hook::<Echo>().build())
        .wrapper(WrapperSpec::builder(|| Double).hook::<Echo>().build())
        .build()
        .unwrap();

    assert_eq!(repo.call(Echo(3)).unwrap(), 8);
    assert_eq!(repo.call(Echo(-1)).unwrap(), 0);
}

#[test]
fn test_no_applicable_wrappers_calls_strategy_directly() {
    let counter = CallCounter::new();
    let repo = Repository::builder("direct")
        .declare::<Echo>()
        .strategy(constant(9))
        .wrapper(
            WrapperSpec::builder(counter.factory(|| LookupOnly))
                .named("lookup_only")
                .hook::<Lookup>()
                .build(),
        )
        .build()
        .unwrap();

    let plan = repo.plan::<Echo>().unwrap();
    assert!(plan.skip_before());
    assert!(plan.skip_after());
    assert!(plan.is_direct());

    assert_eq!(repo.call(Echo(0)).unwrap(), 9);
    assert_eq!(counter.count(), 0, "no wrapper may be instantiated");
}

#[test]
fn test_hook_without_phases_runs_whatever_its_neighbours() {
    let journal = Journal::new();
    let answer = WrapperSpec::builder(|| Answer(99))
        .named("answer")
        .hook::<Echo>()
        .build();

    let alone = bare_repository("alone");
    alone.configure_strategy(identity("S", &journal));
    alone.configure_wrappers([answer.clone()]);

    let mixed = bare_repository("mixed");
    mixed.configure_strategy(identity("S", &journal));
    mixed.configure_wrappers([
        Recording::spec("W1", &journal).hook::<Echo>().build(),
        answer,
    ]);

    let plan = alone.plan::<Echo>().unwrap();
    assert!(plan.skip_before() && plan.skip_after());
    assert!(!plan.is_direct());

    assert_eq!(alone.call(Echo(1)).unwrap(), 99);
    assert_eq!(mixed.call(Echo(1)).unwrap(), 99);
    assert_eq!(journal.entries(), vec!["enter W1", "exit W1"]);
}

/// Panics on every call.
struct Exploding;

impl Perform<Echo> for Exploding {
    fn perform(&self, _op: Echo) -> i64 {
        panic!("strategy failed")
    }
}

#[test]
fn test_panic_unwinds_through_entered_wrappers() {
    let journal = Journal::new();
    let repo = Repository::builder("panicking")
        .declare::<Echo>()
        .strategy(StrategySpec::builder(|| Exploding).perform::<Echo>().build())
        .wrapper(Recording::spec("outer", &journal).hook::<Echo>().build())
        .wrapper(Recording::spec("inner", &journal).hook::<Echo>().build())
        .build()
        .unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| repo.call(Echo(1))));
    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"strategy failed"));
    assert_eq!(journal.entries(), vec!["enter outer", "enter inner"]);

    // The repository stays usable after the unwind.
    repo.configure_strategy(constant(4));
    journal.clear();
    assert_eq!(repo.call(Echo(1)).unwrap(), 4);
    assert_eq!(
        journal.entries(),
        vec!["enter outer", "enter inner", "exit inner", "exit outer"]
    );
}

#[test]
fn test_wrapper_instances_are_fresh_per_call() {
    let counter = CallCounter::new();
    let repo = Repository::builder("fresh")
        .declare::<Echo>()
        .strategy(constant(1))
        .wrapper(counted("increment", &counter, || Increment))
        .build()
        .unwrap();

    for _ in 0..3 {
        repo.call(Echo(0)).unwrap();
    }
    assert_eq!(counter.count(), 3);
}

#[test]
fn test_missing_operation_fails_at_call_time() {
    let repo = bare_repository("partial");
    repo.configure_strategy(constant(1));

    assert_eq!(repo.call(Echo(0)), Ok(1));
    assert_eq!(
        repo.call(Unsupported),
        Err(MediateError::MissingOperation {
            strategy: "constant",
            operation: "unsupported",
        })
    );
    assert!(!repo.plans().contains(Unsupported::NAME));
}

#[test]
fn test_undeclared_operation() {
    let repo = Repository::builder("empty")
        .strategy(constant(1))
        .build()
        .unwrap();

    assert_eq!(
        repo.call(Echo(0)),
        Err(MediateError::UndeclaredOperation {
            repository: "empty".to_string(),
            operation: "echo",
        })
    );
}

/// Runs the continuation twice and sums the results.
struct Twice;

impl Wrap<Echo> for Twice {
    fn wrap(&self, op: Echo, next: Next<'_, Echo>) -> i64 {
        assert_eq!(next.remaining(), 1);
        assert_eq!(next.operation(), "echo");
        next.run(op) + next.run(Echo(op.0 * 10))
    }
}

#[test]
fn test_continuation_may_run_more_than_once() {
    let journal = Journal::new();
    let repo = Repository::builder("twice")
        .declare::<Echo>()
        .strategy(identity("S", &journal))
        .wrapper(WrapperSpec::builder(|| Twice).hook::<Echo>().build())
        .wrapper(Recording::spec("inner", &journal).hook::<Echo>().build())
        .build()
        .unwrap();

    assert_eq!(repo.call(Echo(2)).unwrap(), 22);
    assert_eq!(
        journal.entries(),
        vec![
            "enter inner", "call S", "exit inner", "enter inner", "call S", "exit inner",
        ]
    );
}
