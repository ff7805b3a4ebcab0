//! Memoization wrapper - answers repeated operations from a shared store.

use crate::outcome::Outcome;
use mediate_core::{Next, Operation, Wrap, WrapperBuilder, WrapperSpec};
use parking_lot::Mutex;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    hash::Hash,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Results remembered by [`Memoize`], keyed by operation value.
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    tables: Mutex<Tables>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

#[derive(Default)]
struct Tables {
    by_op: HashMap<TypeId, Box<dyn Any + Send>>,
    entries: usize,
}

impl MemoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The remembered output for `op`, if any.
    pub fn lookup<Op>(&self, op: &Op) -> Option<Op::Output>
    where
        Op: Operation + Hash + Eq,
        Op::Output: Clone,
    {
        let tables = self.inner.tables.lock();
        let found = tables
            .by_op
            .get(&TypeId::of::<Op>())
            .and_then(|table| table.downcast_ref::<HashMap<Op, Op::Output>>())
            .and_then(|table| table.get(op))
            .cloned();
        let counter = if found.is_some() {
            &self.inner.hits
        } else {
            &self.inner.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Remember `output` for `op`.
    pub fn store<Op>(&self, op: Op, output: Op::Output)
    where
        Op: Operation + Hash + Eq,
    {
        let mut guard = self.inner.tables.lock();
        let tables = &mut *guard;
        let table = tables
            .by_op
            .entry(TypeId::of::<Op>())
            .or_insert_with(|| Box::new(HashMap::<Op, Op::Output>::new()));
        let Some(table) = table.downcast_mut::<HashMap<Op, Op::Output>>() else {
            return;
        };
        if table.insert(op, output).is_none() {
            tables.entries += 1;
        }
    }

    /// Forget every remembered output of `Op`.
    pub fn invalidate<Op>(&self)
    where
        Op: Operation + Hash + Eq,
    {
        let mut tables = self.inner.tables.lock();
        let removed = tables
            .by_op
            .remove(&TypeId::of::<Op>())
            .and_then(|table| table.downcast::<HashMap<Op, Op::Output>>().ok())
            .map_or(0, |table| table.len());
        tables.entries -= removed;
    }

    /// Forget everything.
    pub fn clear(&self) {
        let mut tables = self.inner.tables.lock();
        tables.by_op.clear();
        tables.entries = 0;
    }

    /// Number of remembered outputs across all operations.
    pub fn len(&self) -> usize {
        self.inner.tables.lock().entries
    }

    /// Whether nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookups answered from the store.
    pub fn hits(&self) -> usize {
        self.inner.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> usize {
        self.inner.misses.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for MemoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoStore")
            .field("entries", &self.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

/// A wrapper that short-circuits operations it has already seen.
///
/// Failed outputs are never remembered. The store lock is not held while the
/// rest of the chain runs.
pub struct Memoize {
    store: MemoStore,
}

impl Memoize {
    /// Create a wrapper backed by `store`.
    pub fn new(store: MemoStore) -> Self {
        Self { store }
    }

    /// Start a wrapper description; add one `.hook::<Op>()` per operation.
    pub fn spec(store: &MemoStore) -> WrapperBuilder<Memoize> {
        let store = store.clone();
        WrapperSpec::builder(move || Memoize::new(store.clone())).named("memoize")
    }
}

impl<Op> Wrap<Op> for Memoize
where
    Op: Operation + Hash + Eq + Clone,
    Op::Output: Clone + Outcome,
{
    fn wrap(&self, op: Op, next: Next<'_, Op>) -> Op::Output {
        if let Some(output) = self.store.lookup(&op) {
            #[cfg(feature = "tracing")]
            tracing::trace!(operation = Op::NAME, "memoized");
            return output;
        }

        let key = op.clone();
        let output = next.run(op);
        if !output.is_failure() {
            self.store.store(key, output.clone());
        }
        output
    }
}
