//! # Strategy
//!
//! The concrete implementation behind a repository's declared operations.
//!
//! A strategy type implements [`Perform<Op>`] once per operation it supports.
//! It is handed to a repository as a [`StrategySpec`]: a factory plus the
//! table of operations it performs. A fresh instance is produced by the
//! factory for every dispatched call.
//!
//! Nothing checks at configuration time that a strategy covers every declared
//! operation; the gap surfaces on the first call as
//! [`MediateError::MissingOperation`](crate::MediateError::MissingOperation).

use crate::{capability::Capabilities, operation::Operation};
use std::sync::Arc;

/// Performs one operation. This is the innermost link of every chain.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot perform `{Op}`",
    label = "missing `Perform<{Op}>` implementation",
    note = "Strategies must implement `Perform` for each operation they register."
)]
pub trait Perform<Op: Operation>: Send + Sync + 'static {
    /// Execute the operation.
    fn perform(&self, op: Op) -> Op::Output;
}

/// A strategy type that describes its own operation set.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct InMemoryUsers;
///
/// impl Strategy for InMemoryUsers {
///     fn describe(ops: StrategyBuilder<Self>) -> StrategyBuilder<Self> {
///         ops.perform::<FindUser>().perform::<SaveUser>()
///     }
/// }
///
/// repo.configure_strategy(StrategySpec::new::<InMemoryUsers>());
/// ```
pub trait Strategy: Send + Sync + Sized + 'static {
    /// Register every operation this strategy performs.
    fn describe(ops: StrategyBuilder<Self>) -> StrategyBuilder<Self>;
}

/// The terminal action for one operation: build a strategy, perform.
pub(crate) type Terminal<Op> = Arc<dyn Fn(Op) -> <Op as Operation>::Output + Send + Sync>;

/// A configured strategy: its name and the operations it performs.
///
/// Cheap to clone; clones share the same capability table.
#[derive(Clone)]
pub struct StrategySpec {
    name: &'static str,
    capabilities: Arc<Capabilities>,
}

impl StrategySpec {
    /// Describe a [`Strategy`] built with `Default` on every call.
    pub fn new<S: Strategy + Default>() -> Self {
        S::describe(StrategyBuilder::new(S::default)).build()
    }

    /// Describe a [`Strategy`] built by `factory` on every call.
    pub fn from_fn<S, F>(factory: F) -> Self
    where
        S: Strategy,
        F: Fn() -> S + Send + Sync + 'static,
    {
        S::describe(StrategyBuilder::new(factory)).build()
    }

    /// Start describing a strategy by hand.
    ///
    /// Use this for types that do not implement [`Strategy`], or to register
    /// only a subset of what they can perform.
    pub fn builder<S, F>(factory: F) -> StrategyBuilder<S>
    where
        S: Send + Sync + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        StrategyBuilder::new(factory)
    }

    /// The strategy name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this strategy performs `Op`.
    pub fn performs<Op: Operation>(&self) -> bool {
        self.capabilities.contains::<Op>()
    }

    /// Names of the operations this strategy performs, in registration order.
    pub fn operations(&self) -> &[&'static str] {
        self.capabilities.names()
    }

    pub(crate) fn terminal<Op: Operation>(&self) -> Option<Terminal<Op>> {
        self.capabilities.get::<Op, Terminal<Op>>().cloned()
    }
}

impl std::fmt::Debug for StrategySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategySpec")
            .field("name", &self.name)
            .field("operations", &self.operations())
            .finish()
    }
}

/// Builder for a [`StrategySpec`].
pub struct StrategyBuilder<S> {
    factory: Arc<dyn Fn() -> S + Send + Sync>,
    name: &'static str,
    capabilities: Capabilities,
}

impl<S: Send + Sync + 'static> StrategyBuilder<S> {
    /// Create a builder around a factory. The name defaults to the type name.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            name: std::any::type_name::<S>(),
            capabilities: Capabilities::default(),
        }
    }

    /// Override the diagnostic name.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Register `Op` as performed by this strategy.
    pub fn perform<Op>(mut self) -> Self
    where
        Op: Operation,
        S: Perform<Op>,
    {
        let factory = Arc::clone(&self.factory);
        let terminal: Terminal<Op> = Arc::new(move |op: Op| factory().perform(op));
        self.capabilities.insert::<Op, _>(terminal);
        self
    }

    /// Finish the description.
    pub fn build(self) -> StrategySpec {
        StrategySpec {
            name: self.name,
            capabilities: Arc::new(self.capabilities),
        }
    }
}
