//! # mediate-core
//!
//! Core dispatch machinery for strategy mediation with a composable wrapper
//! chain.
//!
//! A [`Repository`] declares a set of [`Operation`]s. Each operation is
//! performed by the repository's single active strategy and intercepted on
//! the way in and out by an ordered list of wrappers.
//!
//! # Layers
//!
//! ## Operation ([`Operation`])
//!
//! A typed call. The operation value carries the call arguments, its
//! associated [`Operation::Output`] is whatever the strategy returns. Wrappers
//! may rewrite the value before passing it on.
//!
//! ## Collaborators ([`Perform`], [`Wrap`])
//!
//! - **Strategy**: implements [`Perform<Op>`] for every operation it handles
//!   and is described to a repository through a [`StrategySpec`].
//! - **Wrapper**: implements [`Wrap<Op>`] for the operations it intercepts
//!   and is described through a [`WrapperSpec`]. The continuation model
//!   ([`Wrap::wrap`]) is primary; [`Wrap::before`] / [`Wrap::after`] cover the
//!   restricted before/after shape.
//!
//! Both specs record their capabilities at configuration time, so "does this
//! wrapper intercept `Op`?" is a table lookup instead of runtime reflection.
//!
//! ## Plan ([`DispatchPlan`], [`PlanCache`])
//!
//! The resolved strategy entry and filtered hook list for one operation,
//! built lazily on first call and memoized per repository.
//!
//! ## Engine ([`Next`], [`dispatch`])
//!
//! The onion executor. Every hook receives the operation and a [`Next`]
//! continuation over the rest of the chain; the strategy sits at the core.
//!
//! # Error Types
//!
//! - [`MediateError`] - Configuration and resolution failures. Failures raised
//!   by strategies or wrappers travel inside `Op::Output` and are never
//!   translated.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod cache;
mod capability;
mod engine;
mod error;
mod macros;
mod operation;
mod plan;
mod repository;
mod strategy;
mod wrapper;

// Re-exports
pub use cache::PlanCache;
pub use engine::{Next, dispatch};
pub use error::MediateError;
pub use operation::Operation;
pub use plan::DispatchPlan;
pub use repository::{Repository, RepositoryBuilder};
pub use strategy::{Perform, Strategy, StrategyBuilder, StrategySpec};
pub use wrapper::{Hook, Phases, Wrap, Wrapper, WrapperBuilder, WrapperSpec};
