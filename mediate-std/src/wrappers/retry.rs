//! Retry wrapper for fallible operations.

use mediate_core::{Next, Operation, Wrap, WrapperBuilder, WrapperSpec};
use std::time::Duration;

/// How often and how patiently [`Retry`] re-runs a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Allow up to `max_attempts` calls in total (at least one).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Duration::ZERO,
        }
    }

    /// Sleep for `backoff` between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total number of attempts allowed.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause between attempts.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// A wrapper that re-runs the rest of the chain while it returns `Err`.
///
/// Every attempt goes through all inner wrappers again with a clone of the
/// original operation. The last result is returned whatever it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Retry {
    policy: RetryPolicy,
}

impl Retry {
    /// Create a retry wrapper.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Start a wrapper description; add one `.hook::<Op>()` per operation.
    pub fn spec(policy: RetryPolicy) -> WrapperBuilder<Retry> {
        WrapperSpec::builder(move || Retry::new(policy)).named("retry")
    }
}

impl<Op, T, E> Wrap<Op> for Retry
where
    Op: Operation<Output = Result<T, E>> + Clone,
{
    fn wrap(&self, op: Op, next: Next<'_, Op>) -> Result<T, E> {
        let mut attempt = 1;
        loop {
            let result = next.run(op.clone());
            if result.is_ok() || attempt >= self.policy.max_attempts {
                return result;
            }

            #[cfg(feature = "tracing")]
            tracing::warn!(
                operation = Op::NAME,
                attempt,
                max_attempts = self.policy.max_attempts,
                "retrying failed operation"
            );
            if !self.policy.backoff.is_zero() {
                std::thread::sleep(self.policy.backoff);
            }
            attempt += 1;
        }
    }
}
