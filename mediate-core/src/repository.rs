//! # Repository
//!
//! The registration surface and call entry point.
//!
//! A [`Repository`] owns its configuration: one active strategy, an ordered
//! wrapper list and the set of declared operations. Calls resolve a
//! [`DispatchPlan`] through the repository's [`PlanCache`] and hand it to the
//! engine.
//!
//! # Reconfiguration
//!
//! Configuration is guarded by a lock with a single writer. Replacing the
//! strategy or the wrapper list clears the plan cache, so the next call of
//! every operation is resolved against the new configuration. Calls already
//! in flight finish on the plan they started with.

use crate::{
    cache::PlanCache,
    engine,
    error::MediateError,
    operation::Operation,
    plan::DispatchPlan,
    strategy::StrategySpec,
    wrapper::WrapperSpec,
};
use parking_lot::RwLock;
use std::{any::TypeId, borrow::Cow, collections::HashMap, sync::Arc};

#[derive(Default)]
struct Config {
    strategy: Option<StrategySpec>,
    wrappers: Vec<WrapperSpec>,
}

/// A set of declared operations mediated through a strategy and wrappers.
///
/// # Example
///
/// ```rust,ignore
/// let users = Repository::builder("users")
///     .declare::<FindUser>()
///     .strategy(StrategySpec::new::<InMemoryUsers>())
///     .wrapper(logging)
///     .build()?;
///
/// let user = users.call(FindUser { id: 7 })?;
/// ```
pub struct Repository {
    name: Cow<'static, str>,
    config: RwLock<Config>,
    declared: RwLock<HashMap<&'static str, TypeId>>,
    plans: PlanCache,
}

impl Repository {
    /// Create an empty repository: no strategy, no wrappers, nothing declared.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            config: RwLock::new(Config::default()),
            declared: RwLock::new(HashMap::new()),
            plans: PlanCache::new(),
        }
    }

    /// Start building a repository.
    pub fn builder(name: impl Into<Cow<'static, str>>) -> RepositoryBuilder {
        RepositoryBuilder::new(name)
    }

    /// The repository name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the active strategy.
    ///
    /// The strategy is not checked against the declared operations; an
    /// operation it does not perform fails when called.
    pub fn configure_strategy(&self, strategy: StrategySpec) {
        let mut config = self.config.write();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            repository = %self.name,
            strategy = strategy.name(),
            "strategy configured"
        );
        config.strategy = Some(strategy);
        self.plans.clear();
    }

    /// Replace the wrapper order wholesale. The first wrapper is outermost.
    pub fn configure_wrappers<I>(&self, wrappers: I)
    where
        I: IntoIterator<Item = WrapperSpec>,
    {
        let wrappers: Vec<WrapperSpec> = wrappers.into_iter().collect();
        let mut config = self.config.write();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            repository = %self.name,
            wrappers = ?wrappers.iter().map(WrapperSpec::name).collect::<Vec<_>>(),
            "wrappers configured"
        );
        config.wrappers = wrappers;
        self.plans.clear();
    }

    /// Declare `Op` as dispatch-mediated on this repository.
    ///
    /// Declaring the same type again is a no-op. Declaring a different type
    /// under an existing name fails with [`MediateError::DuplicateOperation`].
    pub fn declare<Op: Operation>(&self) -> Result<(), MediateError> {
        let mut declared = self.declared.write();
        match declared.get(Op::NAME) {
            Some(existing) if *existing == TypeId::of::<Op>() => Ok(()),
            Some(_) => Err(MediateError::DuplicateOperation {
                repository: self.name.to_string(),
                operation: Op::NAME,
            }),
            None => {
                declared.insert(Op::NAME, TypeId::of::<Op>());
                Ok(())
            }
        }
    }

    /// Whether `Op` is declared on this repository.
    pub fn is_declared<Op: Operation>(&self) -> bool {
        self.declared.read().get(Op::NAME) == Some(&TypeId::of::<Op>())
    }

    /// Names of the declared operations, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.declared.read().keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Name of the active strategy, if any.
    pub fn strategy_name(&self) -> Option<&'static str> {
        self.config.read().strategy.as_ref().map(StrategySpec::name)
    }

    /// Names of the configured wrappers, outermost first.
    pub fn wrapper_names(&self) -> Vec<&'static str> {
        self.config
            .read()
            .wrappers
            .iter()
            .map(WrapperSpec::name)
            .collect()
    }

    /// The plan cache of this repository.
    pub fn plans(&self) -> &PlanCache {
        &self.plans
    }

    /// Resolve the plan for `Op`, building and caching it on first use.
    pub fn plan<Op: Operation>(&self) -> Result<Arc<DispatchPlan<Op>>, MediateError> {
        // Publishing under the read lock keeps a concurrent reconfiguration
        // from clearing the cache between build and insert.
        let config = self.config.read();
        let Some(strategy) = config.strategy.as_ref() else {
            return Err(MediateError::NotConfigured {
                repository: self.name.to_string(),
            });
        };
        if !self.is_declared::<Op>() {
            return Err(MediateError::UndeclaredOperation {
                repository: self.name.to_string(),
                operation: Op::NAME,
            });
        }

        self.plans.get_or_try_insert_with(|| {
            let plan = DispatchPlan::<Op>::build(strategy, &config.wrappers)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                repository = %self.name,
                operation = Op::NAME,
                strategy = plan.strategy(),
                wrappers = ?plan.wrappers().collect::<Vec<_>>(),
                skip_before = plan.skip_before(),
                skip_after = plan.skip_after(),
                "dispatch plan built"
            );
            Ok(plan)
        })
    }

    /// Dispatch `op` through the wrapper chain to the strategy.
    ///
    /// Fails with [`MediateError::NotConfigured`] before any wrapper runs
    /// when no strategy is configured. Everything the strategy or a wrapper
    /// returns comes back as the `Ok` value, untouched.
    pub fn call<Op: Operation>(&self, op: Op) -> Result<Op::Output, MediateError> {
        let plan = self.plan::<Op>()?;
        Ok(engine::dispatch(&plan, op))
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("name", &self.name)
            .field("strategy", &self.strategy_name())
            .field("wrappers", &self.wrapper_names())
            .field("operations", &self.operations())
            .finish()
    }
}

/// Builder for a [`Repository`].
///
/// # Example
///
/// ```rust,ignore
/// let repo = RepositoryBuilder::new("orders")
///     .declare::<PlaceOrder>()
///     .declare::<CancelOrder>()
///     .strategy(StrategySpec::new::<SqlOrders>())
///     .wrappers([validate, metrics])
///     .build()?;
/// ```
pub struct RepositoryBuilder {
    name: Cow<'static, str>,
    strategy: Option<StrategySpec>,
    wrappers: Vec<WrapperSpec>,
    declarations: Vec<Box<dyn FnOnce(&Repository) -> Result<(), MediateError>>>,
}

impl RepositoryBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            strategy: None,
            wrappers: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Declare `Op`.
    pub fn declare<Op: Operation>(mut self) -> Self {
        self.declarations.push(Box::new(|repo: &Repository| repo.declare::<Op>()));
        self
    }

    /// Set the strategy, replacing any earlier one.
    pub fn strategy(mut self, strategy: StrategySpec) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Append a wrapper. Wrappers nest in the order they are added.
    pub fn wrapper(mut self, wrapper: WrapperSpec) -> Self {
        self.wrappers.push(wrapper);
        self
    }

    /// Append several wrappers.
    pub fn wrappers<I>(mut self, wrappers: I) -> Self
    where
        I: IntoIterator<Item = WrapperSpec>,
    {
        self.wrappers.extend(wrappers);
        self
    }

    /// Build the repository. Fails on conflicting declarations.
    pub fn build(self) -> Result<Repository, MediateError> {
        let repo = Repository::new(self.name);
        for declare in self.declarations {
            declare(&repo)?;
        }
        if let Some(strategy) = self.strategy {
            repo.configure_strategy(strategy);
        }
        repo.configure_wrappers(self.wrappers);
        Ok(repo)
    }
}
