//! # Wrapper
//!
//! Cross-cutting interceptors around a strategy call.
//!
//! A wrapper type implements [`Wrap<Op>`] for each operation it intercepts
//! and is configured on a repository as a [`WrapperSpec`]. Configured
//! wrappers nest like an onion: the first one in the list is the outermost.
//!
//! # Hook Shapes
//!
//! - **Continuation**: override [`Wrap::wrap`]. The hook receives the
//!   operation and a [`Next`] continuation and decides whether, how often and
//!   with what value to continue.
//! - **Before / After**: override [`Wrap::before`] and/or [`Wrap::after`] and
//!   narrow [`Wrap::PHASES`]. The default `wrap` runs them around a single
//!   continuation call.

use crate::{capability::Capabilities, engine::Next, operation::Operation};
use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    /// The halves of a call a hook participates in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Phases: u8 {
        /// Runs before the inner chain.
        const BEFORE = 0b01;
        /// Runs after the inner chain.
        const AFTER = 0b10;
        /// Runs on both sides, the continuation model.
        const AROUND = Self::BEFORE.bits() | Self::AFTER.bits();
    }
}

/// Intercepts one operation.
///
/// Implement only what the hook needs; every method has a pass-through
/// default.
///
/// # Example
///
/// ```rust,ignore
/// struct Audit;
///
/// impl Wrap<SaveUser> for Audit {
///     fn wrap(&self, op: SaveUser, next: Next<'_, SaveUser>) -> Result<(), StoreError> {
///         let id = op.user.id;
///         let result = next.run(op);
///         audit_log(id, &result);
///         result
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not wrap `{Op}`",
    label = "missing `Wrap<{Op}>` implementation",
    note = "Wrappers must implement `Wrap` for each operation they register a hook for."
)]
pub trait Wrap<Op: Operation>: Send + Sync + 'static {
    /// Which halves of the call this hook takes part in.
    ///
    /// Feeds the plan's `skip_before` / `skip_after` flags. It never decides
    /// whether the hook runs: every registered hook is part of the chain.
    const PHASES: Phases = Phases::AROUND;

    /// Rewrite the operation on the way in.
    fn before(&self, op: Op) -> Op {
        op
    }

    /// Rewrite the output on the way out.
    fn after(&self, output: Op::Output) -> Op::Output {
        output
    }

    /// Run this hook around the rest of the chain.
    fn wrap(&self, op: Op, next: Next<'_, Op>) -> Op::Output {
        let op = self.before(op);
        let output = next.run(op);
        self.after(output)
    }
}

/// A wrapper type that describes its own hook set.
pub trait Wrapper: Send + Sync + Sized + 'static {
    /// Register a hook for every operation this wrapper intercepts.
    fn describe(hooks: WrapperBuilder<Self>) -> WrapperBuilder<Self>;
}

/// Erased hook body: instantiate the wrapper, run its hook.
pub(crate) trait Intercept<Op: Operation>: Send + Sync {
    fn intercept(&self, op: Op, next: Next<'_, Op>) -> Op::Output;
}

struct Bound<W> {
    factory: Arc<dyn Fn() -> W + Send + Sync>,
}

impl<W, Op> Intercept<Op> for Bound<W>
where
    Op: Operation,
    W: Wrap<Op>,
{
    fn intercept(&self, op: Op, next: Next<'_, Op>) -> Op::Output {
        (self.factory)().wrap(op, next)
    }
}

/// Capability table entry for one (wrapper, operation) pair.
pub(crate) struct Interceptor<Op: Operation> {
    phases: Phases,
    body: Arc<dyn Intercept<Op>>,
}

impl<Op: Operation> Clone for Interceptor<Op> {
    fn clone(&self) -> Self {
        Self {
            phases: self.phases,
            body: Arc::clone(&self.body),
        }
    }
}

/// One link of a resolved chain: a wrapper's hook for a single operation.
pub struct Hook<Op: Operation> {
    wrapper: &'static str,
    interceptor: Interceptor<Op>,
}

impl<Op: Operation> Hook<Op> {
    pub(crate) fn new(wrapper: &'static str, interceptor: Interceptor<Op>) -> Self {
        Self {
            wrapper,
            interceptor,
        }
    }

    /// Name of the wrapper owning this hook.
    pub fn wrapper(&self) -> &'static str {
        self.wrapper
    }

    /// Phases the hook takes part in.
    pub fn phases(&self) -> Phases {
        self.interceptor.phases
    }

    pub(crate) fn intercept(&self, op: Op, next: Next<'_, Op>) -> Op::Output {
        self.interceptor.body.intercept(op, next)
    }
}

impl<Op: Operation> Clone for Hook<Op> {
    fn clone(&self) -> Self {
        Self {
            wrapper: self.wrapper,
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<Op: Operation> std::fmt::Debug for Hook<Op> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("wrapper", &self.wrapper)
            .field("phases", &self.phases())
            .finish()
    }
}

/// A configured wrapper: its name and the operations it intercepts.
///
/// Cheap to clone. Clones are the *same* wrapper: listing one spec twice in a
/// repository's wrapper order runs it twice but names it once in
/// [`DispatchPlan::wrappers`](crate::DispatchPlan::wrappers).
#[derive(Clone)]
pub struct WrapperSpec {
    name: &'static str,
    capabilities: Arc<Capabilities>,
}

impl WrapperSpec {
    /// Describe a [`Wrapper`] built with `Default` on every call.
    pub fn new<W: Wrapper + Default>() -> Self {
        W::describe(WrapperBuilder::new(W::default)).build()
    }

    /// Describe a [`Wrapper`] built by `factory` on every call.
    pub fn from_fn<W, F>(factory: F) -> Self
    where
        W: Wrapper,
        F: Fn() -> W + Send + Sync + 'static,
    {
        W::describe(WrapperBuilder::new(factory)).build()
    }

    /// Start describing a wrapper by hand.
    ///
    /// Generic wrappers (logging, metrics, ...) can wrap any operation, so the
    /// operations they should intercept on a given repository are listed here.
    pub fn builder<W, F>(factory: F) -> WrapperBuilder<W>
    where
        W: Send + Sync + 'static,
        F: Fn() -> W + Send + Sync + 'static,
    {
        WrapperBuilder::new(factory)
    }

    /// The wrapper name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this wrapper has a hook for `Op`.
    pub fn intercepts<Op: Operation>(&self) -> bool {
        self.capabilities.contains::<Op>()
    }

    /// Names of the operations this wrapper intercepts, in registration order.
    pub fn operations(&self) -> &[&'static str] {
        self.capabilities.names()
    }

    pub(crate) fn interceptor<Op: Operation>(&self) -> Option<&Interceptor<Op>> {
        self.capabilities.get::<Op, Interceptor<Op>>()
    }

    pub(crate) fn same_as(&self, other: &WrapperSpec) -> bool {
        Arc::ptr_eq(&self.capabilities, &other.capabilities)
    }
}

impl std::fmt::Debug for WrapperSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapperSpec")
            .field("name", &self.name)
            .field("operations", &self.operations())
            .finish()
    }
}

/// Builder for a [`WrapperSpec`].
pub struct WrapperBuilder<W> {
    factory: Arc<dyn Fn() -> W + Send + Sync>,
    name: &'static str,
    capabilities: Capabilities,
}

impl<W: Send + Sync + 'static> WrapperBuilder<W> {
    /// Create a builder around a factory. The name defaults to the type name.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> W + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            name: std::any::type_name::<W>(),
            capabilities: Capabilities::default(),
        }
    }

    /// Override the diagnostic name.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Register a hook for `Op`.
    pub fn hook<Op>(mut self) -> Self
    where
        Op: Operation,
        W: Wrap<Op>,
    {
        let interceptor = Interceptor::<Op> {
            phases: <W as Wrap<Op>>::PHASES,
            body: Arc::new(Bound {
                factory: Arc::clone(&self.factory),
            }),
        };
        self.capabilities.insert::<Op, _>(interceptor);
        self
    }

    /// Finish the description.
    pub fn build(self) -> WrapperSpec {
        WrapperSpec {
            name: self.name,
            capabilities: Arc::new(self.capabilities),
        }
    }
}
