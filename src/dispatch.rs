//! Constructor dispatch: symbolic names to constructors.
//!
//! A [`Dispatcher`] searches an ordered list of [`Namespace`]s and returns the
//! first match, then falls back to a user-supplied custom table. Lookup never
//! constructs anything, so a failed lookup leaves no partial state behind.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{DispatchError, ToolkitError};
use crate::mother::Ctor;
use crate::value::{Args, Kwargs, Value};
use crate::widget::WidgetRef;
use crate::widgets;

/// A widget or memory-value constructor: `constructor(parent, *args, **kwargs)`.
pub type Constructor = Rc<dyn Fn(&WidgetRef, Args, Kwargs) -> Result<Value, ToolkitError>>;

/// Wrap a closure as a [`Constructor`].
pub fn constructor(
    func: impl Fn(&WidgetRef, Args, Kwargs) -> Result<Value, ToolkitError> + 'static,
) -> Constructor {
    Rc::new(func)
}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// A named table of constructors.
#[derive(Clone, Default)]
pub struct Namespace {
    name: String,
    entries: HashMap<String, Constructor>,
}

impl Namespace {
    /// An empty namespace called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Add a constructor (builder).
    pub fn with(mut self, name: impl Into<String>, ctor: Constructor) -> Self {
        self.register(name, ctor);
        self
    }

    /// Add or replace the constructor for `name`.
    pub fn register(&mut self, name: impl Into<String>, ctor: Constructor) {
        self.entries.insert(name.into(), ctor);
    }

    /// The constructor registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Constructor> {
        self.entries.get(name)
    }

    /// Whether `name` is registered here.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The namespace name, used in lookup errors and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("entries", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Ordered, first-match constructor lookup.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    namespaces: Vec<Namespace>,
    custom: Namespace,
}

impl Dispatcher {
    /// The headless toolkit's `tk`, `scrolledtext` and `ttk` namespaces, in
    /// that order.
    pub fn new() -> Self {
        Self::with_namespaces(widgets::default_namespaces())
    }

    /// No namespaces and an empty custom table.
    pub fn empty() -> Self {
        Self::with_namespaces(Vec::new())
    }

    /// A dispatcher searching `namespaces` in order, with an empty custom namespace.
    pub fn with_namespaces(namespaces: Vec<Namespace>) -> Self {
        Self {
            namespaces,
            custom: Namespace::new("custom"),
        }
    }

    /// Append a namespace at the lowest priority (builder).
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Add a custom element (builder).
    pub fn with_custom(mut self, name: impl Into<String>, ctor: Constructor) -> Self {
        self.register_custom(name, ctor);
        self
    }

    /// Add a custom element, consulted only after every namespace misses.
    pub fn register_custom(&mut self, name: impl Into<String>, ctor: Constructor) {
        self.custom.register(name, ctor);
    }

    /// The searched namespaces, in lookup order.
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// User constructors, consulted after every namespace.
    pub fn custom(&self) -> &Namespace {
        &self.custom
    }

    /// Find the constructor for `name`: namespaces in order, then custom.
    pub fn resolve(&self, name: &str) -> Result<Constructor, DispatchError> {
        for namespace in &self.namespaces {
            if let Some(ctor) = namespace.get(name) {
                trace!(name, namespace = namespace.name(), "resolved constructor");
                return Ok(ctor.clone());
            }
        }
        match self.custom.get(name) {
            Some(ctor) => {
                trace!(name, namespace = "custom", "resolved constructor");
                Ok(ctor.clone())
            }
            None => Err(DispatchError::NotFound(name.to_owned())),
        }
    }

    /// Resolve `ctor` and call it as `ctor(root, *args, **kwargs)`.
    pub fn generate(
        &self,
        ctor: &Ctor,
        root: &WidgetRef,
        args: Args,
        kwargs: Kwargs,
    ) -> Result<Value, DispatchError> {
        let func = match ctor {
            Ctor::Direct(func) => func.clone(),
            Ctor::Named(name) => self.resolve(name)?,
            Ctor::Stub => return Err(DispatchError::Deferred),
        };
        Ok(func(root, args, kwargs)?)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::basic::Basic;
    use std::cell::Cell;

    fn root() -> WidgetRef {
        WidgetRef::new(Basic::tk())
    }

    fn tagging(tag: &'static str) -> Constructor {
        constructor(move |_, _, _| Ok(Value::from(tag)))
    }

    #[test]
    fn first_namespace_wins() {
        let dispatcher = Dispatcher::with_namespaces(vec![
            Namespace::new("a").with("Button", tagging("a")),
            Namespace::new("b").with("Button", tagging("b")).with("Gauge", tagging("b")),
        ]);
        let ctor = Ctor::from("Button");
        let value = dispatcher.generate(&ctor, &root(), Args::new(), Kwargs::new()).unwrap();
        assert_eq!(value, Value::from("a"));
        let gauge = dispatcher
            .generate(&Ctor::from("Gauge"), &root(), Args::new(), Kwargs::new())
            .unwrap();
        assert_eq!(gauge, Value::from("b"));
    }

    #[test]
    fn namespaces_shadow_custom() {
        let dispatcher = Dispatcher::with_namespaces(vec![Namespace::new("a").with("X", tagging("ns"))])
            .with_custom("X", tagging("custom"))
            .with_custom("Y", tagging("custom"));
        let x = dispatcher.generate(&"X".into(), &root(), Args::new(), Kwargs::new()).unwrap();
        let y = dispatcher.generate(&"Y".into(), &root(), Args::new(), Kwargs::new()).unwrap();
        assert_eq!(x, Value::from("ns"));
        assert_eq!(y, Value::from("custom"));
    }

    #[test]
    fn unknown_name_fails_without_side_effects() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let dispatcher = Dispatcher::empty().with_custom(
            "Known",
            constructor(move |_, _, _| {
                counter.set(counter.get() + 1);
                Ok(Value::None)
            }),
        );
        let err = dispatcher
            .generate(&"Unknown".into(), &root(), Args::new(), Kwargs::new())
            .unwrap_err();
        assert_eq!(err, DispatchError::NotFound("Unknown".into()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn direct_constructor_is_called() {
        let ctor = Ctor::direct(|_, args, _| Ok(Value::Int(args.len() as i64)));
        let value = Dispatcher::empty()
            .generate(&ctor, &root(), vec![Value::None, Value::None], Kwargs::new())
            .unwrap();
        assert_eq!(value, Value::Int(2));
    }

    #[test]
    fn stub_is_refused() {
        let err = Dispatcher::new()
            .generate(&Ctor::Stub, &root(), Args::new(), Kwargs::new())
            .unwrap_err();
        assert_eq!(err, DispatchError::Deferred);
    }

    #[test]
    fn default_namespace_order() {
        let dispatcher = Dispatcher::new();
        let names: Vec<_> = dispatcher.namespaces().iter().map(Namespace::name).collect();
        assert_eq!(names, vec!["tk", "scrolledtext", "ttk"]);
        assert!(dispatcher.resolve("ScrolledText").is_ok());
        assert!(dispatcher.resolve("Progressbar").is_ok());
    }

    #[test]
    fn default_button_comes_from_tk() {
        let value = Dispatcher::new()
            .generate(&"Button".into(), &root(), Args::new(), Kwargs::new())
            .unwrap();
        assert_eq!(value.as_widget().unwrap().class_name(), "Button");
    }
}
