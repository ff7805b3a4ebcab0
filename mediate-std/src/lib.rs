//! # mediate-std
//!
//! Standard implementations for the mediate dispatch framework.
//!
//! This crate provides:
//! - **Wrappers**: [`Logging`], [`Metrics`], [`Retry`], [`Validate`],
//!   [`Memoize`]
//! - **Outcome classification**: [`Outcome`], used by wrappers that treat
//!   failed results differently
//! - **Testing utilities**: [`testing`]
//!
//! Every wrapper here is generic over the operations it can intercept, so it
//! is configured through a builder that lists the operations explicitly:
//!
//! ```rust,ignore
//! let logging = Logging::spec("users")
//!     .hook::<FindUser>()
//!     .hook::<SaveUser>()
//!     .build();
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use mediate_core;

// Modules
mod outcome;
pub mod testing;
pub mod wrappers;

pub use outcome::Outcome;
pub use wrappers::{
    logging::Logging,
    memoize::{MemoStore, Memoize},
    metrics::{Metrics, MetricsRecorder, OperationStats},
    retry::{Retry, RetryPolicy},
    validate::{Rejected, Validate, Validation},
};
