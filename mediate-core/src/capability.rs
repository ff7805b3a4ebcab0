//! Type-keyed capability tables.
//!
//! Strategies and wrappers record, per operation type, the erased entry the
//! plan builder needs. Looking an operation up answers "does this type
//! implement `Op`?" without reflection.

use crate::operation::Operation;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

#[derive(Default)]
pub(crate) struct Capabilities {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
}

impl Capabilities {
    /// Record `value` for `Op`, replacing any previous entry.
    pub(crate) fn insert<Op, V>(&mut self, value: V)
    where
        Op: Operation,
        V: Any + Send + Sync,
    {
        if self
            .entries
            .insert(TypeId::of::<Op>(), Box::new(value))
            .is_none()
        {
            self.names.push(Op::NAME);
        }
    }

    pub(crate) fn get<Op, V>(&self) -> Option<&V>
    where
        Op: Operation,
        V: Any,
    {
        self.entries.get(&TypeId::of::<Op>())?.downcast_ref::<V>()
    }

    pub(crate) fn contains<Op: Operation>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<Op>())
    }

    /// Operation names in registration order.
    pub(crate) fn names(&self) -> &[&'static str] {
        &self.names
    }
}
