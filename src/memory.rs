//! Shared storage ("memory") referenced from the tree.
//!
//! Each key holds a [`Slot`]: either a factory that has not run yet, or the
//! value it produced. A constructor reference in the tree materializes the
//! slot in place the first time a widget binds it. The factory is kept after
//! materialization, so a later bind from another node runs it again and the
//! newest instance wins.

use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::dispatch::Constructor;
use crate::error::ResolveError;
use crate::value::{Args, Kwargs, Value};
use crate::widget::WidgetRef;

/// Factories share the widget-constructor signature: `factory(root, *args, **kwargs)`.
pub type Factory = Constructor;

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum Slot {
    Uninitialized(Factory),
    Initialized {
        value: Value,
        /// The factory that produced `value`, if any.
        factory: Option<Factory>,
    },
}

impl Slot {
    /// The stored value, or `None` before the factory has run.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Uninitialized(_) => None,
            Slot::Initialized { value, .. } => Some(value),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Uninitialized(_) => f.write_str("Uninitialized(<factory>)"),
            Slot::Initialized { value, .. } => f.debug_tuple("Initialized").field(value).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct Memory {
    slots: IndexMap<String, Slot>,
}

impl Memory {
    /// An empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain value (builder).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a factory (builder).
    pub fn with_factory(mut self, name: impl Into<String>, factory: Factory) -> Self {
        self.insert_factory(name, factory);
        self
    }

    /// Store a plain value, replacing whatever was there.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Slot> {
        self.slots.insert(
            name.into(),
            Slot::Initialized {
                value: value.into(),
                factory: None,
            },
        )
    }

    /// Store a factory to be materialized by a constructor reference.
    pub fn insert_factory(&mut self, name: impl Into<String>, factory: Factory) -> Option<Slot> {
        self.slots.insert(name.into(), Slot::Uninitialized(factory))
    }

    /// Whether `name` holds a slot, materialized or not.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// The current value, or `None` if missing or not yet materialized.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).and_then(Slot::value)
    }

    /// The current value, distinguishing a missing key from an unrun factory.
    pub fn value(&self, name: &str) -> Result<Value, ResolveError> {
        match self.slots.get(name) {
            None => Err(ResolveError::MissingKey(name.to_owned())),
            Some(Slot::Uninitialized(_)) => Err(ResolveError::Unmaterialized(name.to_owned())),
            Some(Slot::Initialized { value, .. }) => Ok(value.clone()),
        }
    }

    /// The raw slot for `name`.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// Whether `name` holds a value (plain or produced by its factory).
    pub fn is_materialized(&self, name: &str) -> bool {
        matches!(
            self.slots.get(name),
            Some(Slot::Initialized {
                factory: Some(_),
                ..
            })
        )
    }

    /// Run the factory under `name` as `factory(root, *args, **kwargs)` and
    /// store the result in its place.
    pub fn materialize(
        &mut self,
        name: &str,
        root: &WidgetRef,
        args: Args,
        kwargs: Kwargs,
    ) -> Result<Value, ResolveError> {
        let factory = match self.slots.get(name) {
            None => return Err(ResolveError::MissingKey(name.to_owned())),
            Some(Slot::Uninitialized(factory)) => factory.clone(),
            Some(Slot::Initialized {
                factory: Some(factory),
                ..
            }) => factory.clone(),
            Some(Slot::Initialized { factory: None, .. }) => {
                return Err(ResolveError::NotAFactory(name.to_owned()))
            }
        };
        let value = factory(root, args, kwargs).map_err(|source| ResolveError::Factory {
            name: name.to_owned(),
            source,
        })?;
        trace!(name, kind = value.type_name(), "materialized memory entry");
        self.slots.insert(
            name.to_owned(),
            Slot::Initialized {
                value: value.clone(),
                factory: Some(factory),
            },
        );
        Ok(value)
    }

    /// Slot names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Iterate over `(name, slot)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.slots.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Memory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut memory = Memory::new();
        for (name, value) in iter {
            memory.insert(name, value);
        }
        memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::constructor;
    use crate::value::Variable;
    use crate::widgets::basic::Basic;
    use std::cell::Cell;
    use std::rc::Rc;

    fn root() -> WidgetRef {
        WidgetRef::new(Basic::tk())
    }

    fn counting_factory(calls: Rc<Cell<usize>>) -> Factory {
        constructor(move |_root, _args, kwargs| {
            calls.set(calls.get() + 1);
            Ok(Variable::new(kwargs.get("value").cloned().unwrap_or(Value::Int(0))).into())
        })
    }

    #[test]
    fn plain_values() {
        let memory: Memory = [("options", Value::from(vec![1, 2, 3]))].into_iter().collect();
        assert!(memory.contains("options"));
        assert_eq!(memory.get("options"), Some(&Value::from(vec![1, 2, 3])));
        assert!(memory.get("missing").is_none());
    }

    #[test]
    fn uninitialized_factory_has_no_value() {
        let memory = Memory::new().with_factory("opt", counting_factory(Rc::default()));
        assert!(memory.contains("opt"));
        assert!(memory.get("opt").is_none());
        assert_eq!(
            memory.value("opt").unwrap_err(),
            ResolveError::Unmaterialized("opt".into())
        );
    }

    #[test]
    fn materialize_replaces_factory() {
        let calls = Rc::new(Cell::new(0));
        let mut memory = Memory::new().with_factory("opt", counting_factory(calls.clone()));
        let mut kw = Kwargs::new();
        kw.insert("value".into(), Value::Int(4));
        let value = memory.materialize("opt", &root(), Args::new(), kw).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(memory.is_materialized("opt"));
        let var = value.as_variable().unwrap();
        assert_eq!(var.get(), Value::Int(4));
        assert_eq!(memory.get("opt"), Some(&value));
    }

    #[test]
    fn rematerialize_overwrites() {
        let calls = Rc::new(Cell::new(0));
        let mut memory = Memory::new().with_factory("opt", counting_factory(calls.clone()));
        let first = memory.materialize("opt", &root(), Args::new(), Kwargs::new()).unwrap();
        let second = memory.materialize("opt", &root(), Args::new(), Kwargs::new()).unwrap();
        assert_eq!(calls.get(), 2);
        assert_ne!(first, second);
        assert_eq!(memory.get("opt"), Some(&second));
    }

    #[test]
    fn materialize_plain_value_fails() {
        let mut memory = Memory::new().with("options", vec![1]);
        let err = memory
            .materialize("options", &root(), Args::new(), Kwargs::new())
            .unwrap_err();
        assert_eq!(err, ResolveError::NotAFactory("options".into()));
    }

    #[test]
    fn materialize_missing_fails() {
        let mut memory = Memory::new();
        let err = memory
            .materialize("nope", &root(), Args::new(), Kwargs::new())
            .unwrap_err();
        assert_eq!(err, ResolveError::MissingKey("nope".into()));
    }

    #[test]
    fn factory_failure_is_wrapped() {
        let failing = constructor(|_, _, _| Err(crate::error::ToolkitError::invalid("no")));
        let mut memory = Memory::new().with_factory("bad", failing);
        let err = memory
            .materialize("bad", &root(), Args::new(), Kwargs::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::Factory { ref name, .. } if name == "bad"));
    }
}
