//! Validation wrapper - rejects invalid operations before the strategy runs.

use mediate_core::{Next, Operation, Wrap, WrapperBuilder, WrapperSpec};
use thiserror::Error;

/// An operation refused by [`Validate`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("operation `{operation}` rejected: {reason}")]
pub struct Rejected {
    /// Name of the rejected operation.
    pub operation: &'static str,
    /// Why it was rejected.
    pub reason: String,
}

/// An operation that can check its own arguments.
pub trait Validation: Operation {
    /// `Err(reason)` when the operation must not reach the strategy.
    fn validate(&self) -> Result<(), String>;
}

/// A wrapper that short-circuits invalid operations.
///
/// The strategy and every inner wrapper are skipped for a rejected
/// operation; the caller receives `Err(Rejected.into())`. The rejection is
/// produced on the way out, so the hook takes part in both halves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validate;

impl Validate {
    /// Start a wrapper description; add one `.hook::<Op>()` per operation.
    pub fn spec() -> WrapperBuilder<Validate> {
        WrapperSpec::builder(|| Validate).named("validate")
    }
}

impl<Op, T, E> Wrap<Op> for Validate
where
    Op: Validation<Output = Result<T, E>>,
    E: From<Rejected>,
{
    fn wrap(&self, op: Op, next: Next<'_, Op>) -> Result<T, E> {
        match op.validate() {
            Ok(()) => next.run(op),
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(operation = Op::NAME, %reason, "operation rejected");
                Err(Rejected {
                    operation: Op::NAME,
                    reason,
                }
                .into())
            }
        }
    }
}
