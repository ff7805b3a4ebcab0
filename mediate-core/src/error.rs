//! Error types for mediate.
//!
//! [`MediateError`] covers what can go wrong *before* an operation reaches
//! the chain: configuration and resolution. Failures produced by strategies
//! or wrappers are part of the operation's output and never pass through
//! this type.

use thiserror::Error;

/// Configuration and resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediateError {
    /// A call was made on a repository with no active strategy.
    ///
    /// Raised before any wrapper runs.
    #[error("repository `{repository}` has no strategy configured")]
    NotConfigured {
        /// The repository the call was made on.
        repository: String,
    },

    /// The active strategy does not perform the called operation.
    #[error("strategy `{strategy}` does not perform operation `{operation}`")]
    MissingOperation {
        /// The active strategy.
        strategy: &'static str,
        /// The operation that was called.
        operation: &'static str,
    },

    /// The called operation was never declared on the repository.
    #[error("operation `{operation}` is not declared on repository `{repository}`")]
    UndeclaredOperation {
        /// The repository the call was made on.
        repository: String,
        /// The operation that was called.
        operation: &'static str,
    },

    /// Two different operation types were declared under one name.
    #[error("operation name `{operation}` is already declared on repository `{repository}`")]
    DuplicateOperation {
        /// The repository being declared on.
        repository: String,
        /// The conflicting name.
        operation: &'static str,
    },

    /// A cached plan under this name was built for another operation type.
    #[error("cached plan for `{operation}` belongs to a different operation type")]
    ConflictingPlan {
        /// The conflicting name.
        operation: &'static str,
    },
}
