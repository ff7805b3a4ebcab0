//! Success / failure classification of operation outputs.

/// Classifies an operation output as a failure or not.
///
/// # Default Implementations
///
/// - `Result<T, E>` → `Err` is a failure
/// - `Option<T>` → never a failure; `None` is a valid answer
/// - `()` → never a failure
pub trait Outcome {
    /// Whether this output represents a failed call.
    fn is_failure(&self) -> bool;
}

impl<T, E> Outcome for Result<T, E> {
    fn is_failure(&self) -> bool {
        self.is_err()
    }
}

impl<T> Outcome for Option<T> {
    fn is_failure(&self) -> bool {
        false
    }
}

impl Outcome for () {
    fn is_failure(&self) -> bool {
        false
    }
}
