//! Logging wrapper - Observability for dispatched operations.

use mediate_core::{Next, Operation, Wrap, WrapperBuilder, WrapperSpec};
use std::fmt::Debug;
#[cfg(feature = "tracing")]
use std::time::Instant;

/// A wrapper that logs every call and its outcome.
///
/// Logs the operation value on the way in and the output with the elapsed
/// time on the way out, at `DEBUG` level. Without the `tracing` feature it is
/// a pass-through.
///
/// # Example
///
/// ```rust,ignore
/// let logging = Logging::spec("users")
///     .hook::<FindUser>()
///     .build();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logging {
    name: &'static str,
}

impl Logging {
    /// Create a new `Logging` wrapper with a default name.
    pub fn new() -> Self {
        Self { name: "repository" }
    }

    /// Create a new `Logging` wrapper with a custom name.
    ///
    /// The name identifies the repository or pipeline in log records.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log records.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Start a wrapper description; add one `.hook::<Op>()` per operation.
    pub fn spec(name: &'static str) -> WrapperBuilder<Logging> {
        WrapperSpec::builder(move || Logging::named(name)).named("logging")
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new()
    }
}

impl<Op> Wrap<Op> for Logging
where
    Op: Operation + Debug,
    Op::Output: Debug,
{
    fn wrap(&self, op: Op, next: Next<'_, Op>) -> Op::Output {
        #[cfg(feature = "tracing")]
        tracing::debug!(name = %self.name, operation = Op::NAME, args = ?op, "dispatching");
        #[cfg(feature = "tracing")]
        let started = Instant::now();

        let output = next.run(op);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = %self.name,
            operation = Op::NAME,
            elapsed = ?started.elapsed(),
            output = ?output,
            "dispatched"
        );
        output
    }
}
