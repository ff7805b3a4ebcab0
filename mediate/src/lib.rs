//! # mediate - Strategy Mediation with a Composable Wrapper Chain
//!
//! A repository declares typed operations. One swappable strategy performs
//! them; an ordered list of wrappers intercepts every call on the way in and
//! out, like the layers of an onion.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mediate::prelude::*;
//!
//! #[derive(Debug, Operation)]
//! #[operation(output = Option<String>)]
//! struct FindUser {
//!     id: u64,
//! }
//!
//! #[derive(Default)]
//! struct InMemoryUsers;
//!
//! impl Perform<FindUser> for InMemoryUsers {
//!     fn perform(&self, op: FindUser) -> Option<String> {
//!         (op.id == 1).then(|| "ada".to_string())
//!     }
//! }
//!
//! impl Strategy for InMemoryUsers {
//!     fn describe(ops: StrategyBuilder<Self>) -> StrategyBuilder<Self> {
//!         ops.perform::<FindUser>()
//!     }
//! }
//!
//! mediate! {
//!     pub struct Users {
//!         pub fn find_user(FindUser);
//!     }
//! }
//!
//! let users = Users::new()?;
//! users.configure_strategy(StrategySpec::new::<InMemoryUsers>());
//! users.configure_wrappers([Logging::spec("users").hook::<FindUser>().build()]);
//! assert_eq!(users.find_user(FindUser { id: 1 })?, Some("ada".to_string()));
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use mediate_core::{
    // Dispatch
    DispatchPlan,
    Hook,
    // Errors
    MediateError,
    Next,
    // Operation
    Operation,
    // Strategy
    Perform,
    Phases,
    PlanCache,
    // Repository
    Repository,
    RepositoryBuilder,
    Strategy,
    StrategyBuilder,
    StrategySpec,
    // Wrapper
    Wrap,
    Wrapper,
    WrapperBuilder,
    WrapperSpec,
    dispatch,
    mediate,
};

// Standard wrappers
pub use mediate_std::{
    Logging, MemoStore, Memoize, Metrics, MetricsRecorder, OperationStats, Outcome, Rejected,
    Retry, RetryPolicy, Validate, Validation,
};

/// Standard wrapper implementations.
pub mod wrappers {
    pub use mediate_std::wrappers::{logging, memoize, metrics, retry, validate};
}

/// Testing utilities.
pub mod testing {
    pub use mediate_std::testing::{CallCounter, Journal, Recording};
}

/// Prelude module - common imports for mediate.
///
/// # Usage
///
/// ```rust,ignore
/// use mediate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        MediateError,
        Next,
        // Core traits
        Operation,
        Perform,
        Phases,
        // Repository
        Repository,
        Strategy,
        StrategyBuilder,
        StrategySpec,
        Wrap,
        Wrapper,
        WrapperBuilder,
        WrapperSpec,
        mediate,
        // Standard wrappers
        Logging,
        Memoize,
        Metrics,
        Retry,
        Validate,
    };
}

#[cfg(feature = "macros")]
pub use mediate_macros::Operation;
