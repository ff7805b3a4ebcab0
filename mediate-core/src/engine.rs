//! # Dispatch Engine
//!
//! The onion executor.
//!
//! Each hook in a plan receives the operation and a [`Next`] continuation
//! over the rest of the chain. Calling [`Next::run`] descends one level; the
//! strategy is reached when no hooks remain. Whatever the innermost level
//! that produced a value returns travels back out unchanged, through any
//! post-processing the outer hooks perform after their continuation returns.
//!
//! The engine never inspects, retries or catches. Recursion depth is the
//! number of hooks plus one.

use crate::{operation::Operation, plan::DispatchPlan, wrapper::Hook};

/// The remainder of a chain, handed to a hook.
///
/// A hook may call [`run`](Next::run) zero times (short-circuit), once, or
/// several times (retry). Each call walks the same remaining links with a
/// fresh wrapper instance per link.
pub struct Next<'a, Op: Operation> {
    hooks: &'a [Hook<Op>],
    terminal: &'a (dyn Fn(Op) -> Op::Output + Send + Sync),
}

impl<'a, Op: Operation> Next<'a, Op> {
    pub(crate) fn new(
        hooks: &'a [Hook<Op>],
        terminal: &'a (dyn Fn(Op) -> Op::Output + Send + Sync),
    ) -> Self {
        Self { hooks, terminal }
    }

    /// Continue the chain with `op`.
    pub fn run(&self, op: Op) -> Op::Output {
        match self.hooks.split_first() {
            Some((hook, rest)) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    operation = Op::NAME,
                    wrapper = hook.wrapper(),
                    remaining = rest.len(),
                    "entering wrapper"
                );
                hook.intercept(op, Next::new(rest, self.terminal))
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(operation = Op::NAME, "invoking strategy");
                (self.terminal)(op)
            }
        }
    }

    /// Number of hooks left before the strategy.
    pub fn remaining(&self) -> usize {
        self.hooks.len()
    }

    /// Name of the operation being dispatched.
    pub fn operation(&self) -> &'static str {
        Op::NAME
    }
}

impl<Op: Operation> Clone for Next<'_, Op> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Op: Operation> Copy for Next<'_, Op> {}

impl<Op: Operation> std::fmt::Debug for Next<'_, Op> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("operation", &Op::NAME)
            .field("remaining", &self.hooks.len())
            .finish()
    }
}

/// Run `op` through `plan`.
///
/// When no wrapper intercepts the operation the strategy is invoked directly
/// and no chain is walked.
pub fn dispatch<Op: Operation>(plan: &DispatchPlan<Op>, op: Op) -> Op::Output {
    if plan.is_direct() {
        return plan.terminal()(op);
    }
    Next::new(plan.hooks(), plan.terminal()).run(op)
}
