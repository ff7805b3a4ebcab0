#![allow(dead_code)]

use mediate::{
    Next, Operation, Perform, Phases, Rejected, Repository, StrategySpec, Validation, Wrap,
    WrapperSpec,
    testing::{CallCounter, Journal},
};
use thiserror::Error;

// ============================================================================
// Test Operations
// ============================================================================

/// Returns its argument, possibly transformed by wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Echo(pub i64);

impl Operation for Echo {
    const NAME: &'static str = "echo";
    type Output = i64;
}

/// Fallible lookup used with the standard wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lookup {
    pub key: String,
}

impl Operation for Lookup {
    const NAME: &'static str = "lookup";
    type Output = Result<String, StoreError>;
}

impl Validation for Lookup {
    fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            Err("key must not be empty".to_string())
        } else {
            Ok(())
        }
    }
}

/// Declared on repositories but performed by no strategy.
#[derive(Debug)]
pub struct Unsupported;

impl Operation for Unsupported {
    const NAME: &'static str = "unsupported";
    type Output = ();
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("key `{0}` not found")]
    NotFound(String),
    #[error("store unavailable")]
    Unavailable,
    #[error(transparent)]
    Rejected(#[from] Rejected),
}

// ============================================================================
// Test Strategies
// ============================================================================

/// Returns `Echo` unchanged and journals `call {label}`.
pub struct Identity {
    pub label: &'static str,
    pub journal: Journal,
}

impl Perform<Echo> for Identity {
    fn perform(&self, op: Echo) -> i64 {
        self.journal.record(format!("call {}", self.label));
        op.0
    }
}

pub fn identity(label: &'static str, journal: &Journal) -> StrategySpec {
    let journal = journal.clone();
    StrategySpec::builder(move || Identity {
        label,
        journal: journal.clone(),
    })
    .named(label)
    .perform::<Echo>()
    .build()
}

/// Constant answer for `Echo`.
pub struct Constant(pub i64);

impl Perform<Echo> for Constant {
    fn perform(&self, _op: Echo) -> i64 {
        self.0
    }
}

pub fn constant(value: i64) -> StrategySpec {
    StrategySpec::builder(move || Constant(value))
        .named("constant")
        .perform::<Echo>()
        .build()
}

/// Key-value store that fails its first `failures` lookups.
pub struct FlakyStore {
    pub calls: CallCounter,
    pub failures: usize,
}

impl Perform<Lookup> for FlakyStore {
    fn perform(&self, op: Lookup) -> Result<String, StoreError> {
        self.calls.tick();
        if self.calls.count() <= self.failures {
            return Err(StoreError::Unavailable);
        }
        match op.key.as_str() {
            "missing" => Err(StoreError::NotFound(op.key)),
            key => Ok(key.to_uppercase()),
        }
    }
}

pub fn flaky_store(calls: &CallCounter, failures: usize) -> StrategySpec {
    let calls = calls.clone();
    StrategySpec::builder(move || FlakyStore {
        calls: calls.clone(),
        failures,
    })
    .named("flaky_store")
    .perform::<Lookup>()
    .build()
}

// ============================================================================
// Test Wrappers
// ============================================================================

/// Adds one to the argument on the way in.
#[derive(Default)]
pub struct Increment;

impl Wrap<Echo> for Increment {
    const PHASES: Phases = Phases::BEFORE;

    fn before(&self, op: Echo) -> Echo {
        Echo(op.0 + 1)
    }
}

/// Doubles the result on the way out.
#[derive(Default)]
pub struct Double;

impl Wrap<Echo> for Double {
    const PHASES: Phases = Phases::AFTER;

    fn after(&self, output: i64) -> i64 {
        output * 2
    }
}

/// Answers without continuing.
pub struct ShortCircuit(pub i64);

impl Wrap<Echo> for ShortCircuit {
    fn wrap(&self, _op: Echo, _next: Next<'_, Echo>) -> i64 {
        self.0
    }
}

/// Declares no phases but still answers on its own.
pub struct Answer(pub i64);

impl Wrap<Echo> for Answer {
    const PHASES: Phases = Phases::empty();

    fn wrap(&self, _op: Echo, _next: Next<'_, Echo>) -> i64 {
        self.0
    }
}

/// Only intercepts `Lookup`.
#[derive(Default)]
pub struct LookupOnly;

impl Wrap<Lookup> for LookupOnly {
    fn wrap(&self, _op: Lookup, _next: Next<'_, Lookup>) -> Result<String, StoreError> {
        Err(StoreError::Unavailable)
    }
}

/// Wrapper spec whose instances tick `counter` when created.
pub fn counted<W>(name: &'static str, counter: &CallCounter, make: fn() -> W) -> WrapperSpec
where
    W: Wrap<Echo>,
{
    WrapperSpec::builder(counter.factory(make))
        .named(name)
        .hook::<Echo>()
        .build()
}

/// A repository declaring `Echo`, `Lookup` and `Unsupported`, with no
/// strategy and no wrappers.
pub fn bare_repository(name: &'static str) -> Repository {
    Repository::builder(name)
        .declare::<Echo>()
        .declare::<Lookup>()
        .declare::<Unsupported>()
        .build()
        .unwrap()
}
