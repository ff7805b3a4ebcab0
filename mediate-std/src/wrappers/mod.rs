//! Standard wrapper implementations.

pub mod logging;
pub mod memoize;
pub mod metrics;
pub mod retry;
pub mod validate;
