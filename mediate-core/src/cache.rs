//! Plan cache.
//!
//! One cache per repository, keyed by operation name. Plans are built on
//! first use and kept until the repository is reconfigured.

use crate::{error::MediateError, operation::Operation, plan::DispatchPlan};
use parking_lot::RwLock;
use std::{
    any::Any,
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

type ErasedPlan = Arc<dyn Any + Send + Sync>;

/// Memoized [`DispatchPlan`]s of one repository.
///
/// Concurrent first resolution of the same operation may build the plan more
/// than once; only the first build is published and every caller receives
/// that one.
#[derive(Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<&'static str, ErasedPlan>>,
    builds: AtomicUsize,
}

impl PlanCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached plan for `Op`, if any.
    pub fn get<Op: Operation>(&self) -> Result<Option<Arc<DispatchPlan<Op>>>, MediateError> {
        match self.plans.read().get(Op::NAME) {
            Some(plan) => Self::downcast::<Op>(Arc::clone(plan)).map(Some),
            None => Ok(None),
        }
    }

    /// Return the cached plan for `Op`, building and publishing it first if
    /// needed. `build` runs without any cache lock held.
    pub fn get_or_try_insert_with<Op, F>(
        &self,
        build: F,
    ) -> Result<Arc<DispatchPlan<Op>>, MediateError>
    where
        Op: Operation,
        F: FnOnce() -> Result<DispatchPlan<Op>, MediateError>,
    {
        if let Some(plan) = self.get::<Op>()? {
            return Ok(plan);
        }

        let built: ErasedPlan = Arc::new(build()?);
        self.builds.fetch_add(1, Ordering::Relaxed);

        let published = Arc::clone(
            self.plans
                .write()
                .entry(Op::NAME)
                .or_insert(built),
        );
        Self::downcast::<Op>(published)
    }

    /// Whether a plan is cached under `operation`.
    pub fn contains(&self, operation: &str) -> bool {
        self.plans.read().contains_key(operation)
    }

    /// Names of the cached operations, in no particular order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.plans.read().keys().copied().collect()
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.plans.read().is_empty()
    }

    /// Total number of plans built, including discarded concurrent builds.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Drop every cached plan.
    pub fn clear(&self) {
        self.plans.write().clear();
    }

    fn downcast<Op: Operation>(plan: ErasedPlan) -> Result<Arc<DispatchPlan<Op>>, MediateError> {
        plan.downcast::<DispatchPlan<Op>>()
            .map_err(|_| MediateError::ConflictingPlan {
                operation: Op::NAME,
            })
    }
}

impl std::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCache")
            .field("operations", &self.operations())
            .field("builds", &self.builds())
            .finish()
    }
}
