//! Testing utilities - observe how calls travel through a chain.

use mediate_core::{Next, Operation, Wrap, WrapperBuilder, WrapperSpec};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// An ordered, shared log of events.
///
/// Clones append to the same log, so a journal handed to wrappers and
/// strategies can be inspected by the test afterwards.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Every entry so far, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// A wrapper that records `enter {label}` and `exit {label}` around the
/// rest of the chain.
#[derive(Debug, Clone)]
pub struct Recording {
    label: &'static str,
    journal: Journal,
}

impl Recording {
    /// Create a recording wrapper.
    pub fn new(label: &'static str, journal: Journal) -> Self {
        Self { label, journal }
    }

    /// Start a wrapper description named `label`; add one `.hook::<Op>()`
    /// per operation.
    pub fn spec(label: &'static str, journal: &Journal) -> WrapperBuilder<Recording> {
        let journal = journal.clone();
        WrapperSpec::builder(move || Recording::new(label, journal.clone())).named(label)
    }
}

impl<Op: Operation> Wrap<Op> for Recording {
    fn wrap(&self, op: Op, next: Next<'_, Op>) -> Op::Output {
        self.journal.record(format!("enter {}", self.label));
        let output = next.run(op);
        self.journal.record(format!("exit {}", self.label));
        output
    }
}

/// A shared counter.
///
/// Mostly used to count how many strategy or wrapper instances a
/// repository creates.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by one.
    pub fn tick(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Current value.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Back to zero.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }

    /// Wrap a factory so every instance it produces ticks this counter.
    pub fn factory<T, F>(&self, factory: F) -> impl Fn() -> T + Send + Sync + 'static
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let counter = self.clone();
        move || {
            counter.tick();
            factory()
        }
    }
}
