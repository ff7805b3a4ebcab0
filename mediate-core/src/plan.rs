//! Per-operation dispatch plans.

use crate::{
    error::MediateError,
    operation::Operation,
    strategy::{StrategySpec, Terminal},
    wrapper::{Hook, Phases, WrapperSpec},
};

/// The resolved description of one operation's chain.
///
/// Holds the strategy entry and the chain of hooks, one per configured
/// position whose wrapper intercepts the operation, outermost first. A
/// wrapper listed twice runs twice. The distinct applicable wrappers, in
/// first-seen order, are kept separately as [`wrappers`](Self::wrappers).
///
/// Plans are immutable once built and shared between concurrent calls; each
/// call walks the chain with its own cursor.
pub struct DispatchPlan<Op: Operation> {
    strategy: &'static str,
    terminal: Terminal<Op>,
    chain: Vec<Hook<Op>>,
    wrappers: Vec<&'static str>,
    skip_before: bool,
    skip_after: bool,
}

impl<Op: Operation> DispatchPlan<Op> {
    /// Resolve `Op` against a strategy and a wrapper order.
    ///
    /// `wrappers` is only read. Fails with
    /// [`MediateError::MissingOperation`] if the strategy does not perform
    /// `Op`.
    pub fn build(strategy: &StrategySpec, wrappers: &[WrapperSpec]) -> Result<Self, MediateError> {
        let terminal = strategy
            .terminal::<Op>()
            .ok_or(MediateError::MissingOperation {
                strategy: strategy.name(),
                operation: Op::NAME,
            })?;

        let mut seen: Vec<&WrapperSpec> = Vec::with_capacity(wrappers.len());
        let mut chain = Vec::new();
        for spec in wrappers {
            let Some(interceptor) = spec.interceptor::<Op>() else {
                continue;
            };
            chain.push(Hook::new(spec.name(), interceptor.clone()));
            if !seen.iter().any(|s| s.same_as(spec)) {
                seen.push(spec);
            }
        }

        let skip_before = !chain.iter().any(|h| h.phases().contains(Phases::BEFORE));
        let skip_after = !chain.iter().any(|h| h.phases().contains(Phases::AFTER));

        Ok(Self {
            strategy: strategy.name(),
            terminal,
            chain,
            wrappers: seen.into_iter().map(WrapperSpec::name).collect(),
            skip_before,
            skip_after,
        })
    }

    /// The operation this plan dispatches.
    pub fn operation(&self) -> &'static str {
        Op::NAME
    }

    /// Name of the strategy captured when the plan was built.
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// The dispatch chain in nesting order, outermost first. Repeats of a
    /// wrapper in the configured order are repeated here.
    pub fn hooks(&self) -> &[Hook<Op>] {
        &self.chain
    }

    /// Distinct applicable wrapper names, in first-seen order.
    pub fn wrappers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.wrappers.iter().copied()
    }

    /// No hook declares a before half.
    ///
    /// A signal for callers; dispatch runs every hook in the chain.
    pub fn skip_before(&self) -> bool {
        self.skip_before
    }

    /// No hook declares an after half.
    pub fn skip_after(&self) -> bool {
        self.skip_after
    }

    /// No wrapper intercepts the operation, so dispatch calls the strategy
    /// directly.
    pub fn is_direct(&self) -> bool {
        self.chain.is_empty()
    }

    pub(crate) fn terminal(&self) -> &(dyn Fn(Op) -> Op::Output + Send + Sync) {
        &*self.terminal
    }
}

impl<Op: Operation> std::fmt::Debug for DispatchPlan<Op> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchPlan")
            .field("operation", &Op::NAME)
            .field("strategy", &self.strategy)
            .field("chain", &self.chain)
            .field("wrappers", &self.wrappers)
            .field("skip_before", &self.skip_before)
            .field("skip_after", &self.skip_after)
            .finish()
    }
}
