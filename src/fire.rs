//! The tree builder and its post-build API.
//!
//! [`Fire`] walks a [`Mother`] depth-first, pre-order, constructing each node
//! under its parent's widget and recording it in a path-addressed
//! [`Registry`]. Per node the walk runs, in order: resolve the type and
//! layout arguments, strip the scroll flags, construct, place, run the post
//! steps, attach scrollbars, then recurse into the children.
//!
//! After a build the same object is the handle for later changes: command
//! binding, option-menu refresh and deferred construction of stubs.

use std::fmt;
use std::ops::Index;

use tracing::{debug, info, warn};

use crate::config::FireConfig;
use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, FireError, RegistryError, RenderAction, ResolveError, Result, ToolkitError};
use crate::memory::Memory;
use crate::mother::{Call, Ctor, Mother, Node, Spec};
use crate::registry::{self, Entry, IntoPath, Registry, Stub, DELIMITER};
use crate::resolve::{ResolvedCall, Resolver, VariableMap};
use crate::value::{kwargs, Args, Callback, Kwargs, Value, Variable};
use crate::widget::{ScrollAxis, ScrollFlags, WidgetRef};
use crate::widgets::menu;

// ---------------------------------------------------------------------------
// Option menu refresh
// ---------------------------------------------------------------------------

/// How option-menu entries are labelled.
#[derive(Default)]
pub enum OptionLabels {
    /// Each option's display form.
    #[default]
    Display,
    /// Explicit labels, paired with the options in order. Extra labels or
    /// options are dropped.
    Names(Vec<String>),
    /// A label computed from each option.
    With(Box<dyn Fn(&Value) -> String>),
}

impl fmt::Debug for OptionLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionLabels::Display => f.write_str("Display"),
            OptionLabels::Names(names) => f.debug_tuple("Names").field(names).finish(),
            OptionLabels::With(_) => f.write_str("With(<fn>)"),
        }
    }
}

/// Optional overrides for [`Fire::set_option_menu_options`].
#[derive(Debug, Default)]
pub struct OptionOverrides {
    /// Variable the entries write to. Defaults to the one bound when the
    /// menu was built.
    pub variable: Option<Variable>,
    pub labels: OptionLabels,
}

impl OptionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target variable (builder).
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variable = Some(variable);
        self
    }

    /// Set the labelling rule (builder).
    pub fn with_labels(mut self, labels: OptionLabels) -> Self {
        self.labels = labels;
        self
    }
}

// ---------------------------------------------------------------------------
// Fire
// ---------------------------------------------------------------------------

/// Where a node's layout directive comes from.
enum Layout<'a> {
    /// Declared on the node; resolved along with the type arguments.
    Declared(Option<&'a Call>),
    /// Captured when a stub was recorded.
    Stored(Option<ResolvedCall>),
}

/// Builds a widget tree from a [`Mother`] and keeps it addressable by path.
pub struct Fire {
    core: WidgetRef,
    memory: Memory,
    mother: Mother,
    dispatcher: Dispatcher,
    config: FireConfig,
    registry: Registry,
    variables: VariableMap,
    built: bool,
}

impl Fire {
    /// A builder for `mother` under `core`, using the default namespaces.
    /// Nothing is constructed until [`build`](Self::build).
    pub fn new(core: WidgetRef, memory: Memory, mother: Mother) -> Self {
        Self {
            core,
            memory,
            mother,
            dispatcher: Dispatcher::new(),
            config: FireConfig::default(),
            registry: Registry::new(),
            variables: VariableMap::new(),
            built: false,
        }
    }

    /// Replace the dispatcher (builder).
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Replace the config (builder).
    pub fn with_config(mut self, config: FireConfig) -> Self {
        self.config = config;
        self
    }

    /// Construct the whole tree.
    ///
    /// The first failure aborts the walk. Whatever was built before it stays
    /// in the registry and memory. A builder builds once: later calls fail
    /// with [`FireError::AlreadyBuilt`], even after a failed walk. Deferred
    /// nodes are finished with [`build_stub`](Self::build_stub).
    pub fn build(&mut self) -> Result<&mut Self> {
        if self.built {
            return Err(FireError::AlreadyBuilt);
        }
        self.built = true;
        let mother = std::mem::take(&mut self.mother);
        let core = self.core.clone();
        let result = self.build_level(&mother, "", &core);
        self.mother = mother;
        result?;
        info!(entries = self.registry.len(), "build complete");
        Ok(self)
    }

    fn build_level(&mut self, nodes: &Mother, parent: &str, root: &WidgetRef) -> Result<()> {
        for (name, node) in nodes {
            let path = registry::join(parent, name);
            self.build_node(name, node, &path, root)?;
        }
        Ok(())
    }

    fn build_node(&mut self, name: &str, node: &Node, path: &str, root: &WidgetRef) -> Result<()> {
        let depth = self.config.snapshot_depth;
        if self.config.strict_names && name.contains(DELIMITER) {
            return Err(parse_error(
                path,
                format!("node name contains the path delimiter '{DELIMITER}'"),
                node,
                depth,
            ));
        }
        let Some(spec) = &node.kind else {
            return Err(parse_error(path, "missing type".to_owned(), node, depth));
        };

        if spec.is_stub() {
            let layout = match &node.layout {
                Some(call) => {
                    let resolved = Resolver::new(&mut self.memory, &mut self.variables, path, root)
                        .resolve_call(call);
                    Some(resolved.map_err(|source| specification(path, "layout", node, depth, source))?)
                }
                None => None,
            };
            debug!(path, "deferred stub");
            record(&mut self.registry, path, Entry::Pending(Stub { layout }));
            return Ok(());
        }

        let widget = self.realize(path, spec, node, Layout::Declared(node.layout.as_ref()), root)?;
        self.build_level(&node.children, path, &widget)
    }

    /// Steps shared by the walk and deferred builds: resolve, construct,
    /// place, post steps, scrollbars. Children are left to the caller.
    fn realize(
        &mut self,
        path: &str,
        spec: &Spec,
        node: &Node,
        layout: Layout<'_>,
        root: &WidgetRef,
    ) -> Result<WidgetRef> {
        let depth = self.config.snapshot_depth;
        let mut resolver = Resolver::new(&mut self.memory, &mut self.variables, path, root);

        let resolved = resolver.resolve_parts(&spec.args, &spec.kwargs);
        let (mut args, mut kwargs) =
            resolved.map_err(|source| specification(path, "type", node, depth, source))?;
        let layout = match layout {
            Layout::Declared(Some(call)) => {
                let resolved = resolver.resolve_call(call);
                Some(resolved.map_err(|source| specification(path, "layout", node, depth, source))?)
            }
            Layout::Declared(None) => None,
            Layout::Stored(layout) => layout,
        };
        let scrolls = ScrollFlags::take(&mut args, &mut kwargs);

        let widget = match self.dispatcher.generate(&spec.ctor, root, args, kwargs) {
            Ok(Value::Widget(widget)) => widget,
            Ok(other) => {
                let source = ToolkitError::NotAWidget(other.type_name().to_owned());
                return Err(render(path, RenderAction::Build, node, depth, source));
            }
            Err(DispatchError::Toolkit(source)) => {
                return Err(render(path, RenderAction::Build, node, depth, source))
            }
            Err(source) => {
                return Err(FireError::Lookup {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        debug!(path, class = %widget.class_name(), "constructed");
        record(&mut self.registry, path, Entry::Built(widget.clone()));

        if let Some(layout) = &layout {
            layout
                .apply(&widget)
                .map_err(|source| render(path, RenderAction::Place, node, depth, source))?;
        }

        for step in &node.post {
            let resolved = resolver.resolve_call(step);
            let call = resolved.map_err(|source| {
                specification(path, &format!("post step '{}'", step.method), node, depth, source)
            })?;
            call.apply(&widget).map_err(|source| FireError::Post {
                path: path.to_owned(),
                method: step.method.clone(),
                source,
            })?;
        }
        drop(resolver);

        for axis in scrolls.axes() {
            let bar = self
                .scrollbar(&widget, axis, root)
                .map_err(|source| render(path, RenderAction::Scroll, node, depth, source))?;
            let bar_path = registry::join(path, axis.suffix());
            debug!(path = %bar_path, orient = axis.orient(), "attached scrollbar");
            record(&mut self.registry, &bar_path, Entry::Built(bar));
        }
        Ok(widget)
    }

    /// Create a scrollbar beside `widget` and wire the two together.
    fn scrollbar(
        &self,
        widget: &WidgetRef,
        axis: ScrollAxis,
        root: &WidgetRef,
    ) -> Result<WidgetRef, ToolkitError> {
        let mut options = Kwargs::new();
        if axis == ScrollAxis::Horizontal {
            options.insert("orient".to_owned(), Value::from(axis.orient()));
        }
        let ctor = Ctor::Named(self.config.scrollbar.clone());
        let bar = match self.dispatcher.generate(&ctor, root, Args::new(), options) {
            Ok(Value::Widget(bar)) => bar,
            Ok(other) => return Err(ToolkitError::NotAWidget(other.type_name().to_owned())),
            Err(DispatchError::Toolkit(err)) => return Err(err),
            Err(err) => return Err(ToolkitError::Custom(err.to_string())),
        };
        widget.set(axis.command_option(), Callback::bound(&bar, "set"))?;
        bar.set("command", Callback::bound(widget, axis.view_method()))?;
        let (side, fill) = axis.placement();
        bar.call("pack", Args::new(), kwargs([("side", side), ("fill", fill)]))?;
        Ok(bar)
    }

    // -- Lookup -------------------------------------------------------------

    /// The registry entry at `path`.
    pub fn get(&self, path: impl IntoPath) -> Result<&Entry> {
        let path = path.into_path();
        self.registry
            .get(&path)
            .ok_or_else(|| RegistryError::Missing(path).into())
    }

    /// The built widget at `path`.
    pub fn widget(&self, path: impl IntoPath) -> Result<WidgetRef> {
        Ok(self.registry.widget(&path.into_path())?)
    }

    /// Store an entry directly. Nothing is resolved or constructed.
    pub fn set(&mut self, path: impl IntoPath, entry: impl Into<Entry>) -> Option<Entry> {
        self.registry.insert(path.into_path(), entry)
    }

    pub fn insert_widget(&mut self, path: impl IntoPath, widget: WidgetRef) -> Option<Entry> {
        self.set(path, Entry::Built(widget))
    }

    // -- Mutation -----------------------------------------------------------

    /// Set the `command` option of the widget at `path`.
    pub fn bind_command(&self, path: impl IntoPath, command: impl Into<Value>) -> Result<()> {
        self.widget(path)?.set("command", command)?;
        Ok(())
    }

    pub fn bind_commands<P, C>(&self, bindings: impl IntoIterator<Item = (P, C)>) -> Result<()>
    where
        P: IntoPath,
        C: Into<Value>,
    {
        for (path, command) in bindings {
            self.bind_command(path, command)?;
        }
        Ok(())
    }

    /// Replace the entries of the option menu at `path`.
    ///
    /// The menu is always cleared. With `options`, one entry per option is
    /// added in order; picking it stores that option in the bound variable.
    pub fn set_option_menu_options(
        &self,
        path: impl IntoPath,
        options: Option<Vec<Value>>,
        overrides: OptionOverrides,
    ) -> Result<()> {
        let path = path.into_path();
        let menu = match self.widget(&path)?.get("menu")? {
            Value::Widget(menu) => menu,
            other => {
                return Err(ToolkitError::invalid(format!(
                    "'{path}' has no menu (menu option holds {})",
                    other.repr()
                ))
                .into())
            }
        };
        menu.call("delete", vec![Value::Int(0), Value::from("end")], Kwargs::new())?;
        let Some(options) = options else {
            debug!(path, "cleared option menu");
            return Ok(());
        };

        let variable = match overrides.variable {
            Some(variable) => variable,
            None => self
                .bound_variable(&path)
                .ok_or_else(|| FireError::Unbound(path.clone()))?,
        };
        let labels: Vec<String> = match overrides.labels {
            OptionLabels::Display => options.iter().map(ToString::to_string).collect(),
            OptionLabels::Names(names) => names,
            OptionLabels::With(label) => options.iter().map(|option| label(option)).collect(),
        };
        let count = options.len().min(labels.len());
        for (option, label) in options.into_iter().zip(labels) {
            let command = menu::setter(&variable, option, None);
            menu.call(
                "add_command",
                Args::new(),
                kwargs([("label", Value::from(label)), ("command", Value::from(command))]),
            )?;
        }
        debug!(path, entries = count, "refreshed option menu");
        Ok(())
    }

    /// Construct the pending stub at `path` from `spec`.
    ///
    /// The parent is taken from the path prefix. The layout captured when the
    /// stub was recorded is applied, then the node's declared post steps run
    /// and its declared children are built.
    pub fn build_stub(&mut self, path: impl IntoPath, spec: Spec) -> Result<WidgetRef> {
        let path = path.into_path();
        let layout = match self.registry.get(&path) {
            Some(Entry::Pending(stub)) => stub.layout.clone(),
            Some(Entry::Built(_)) => return Err(FireError::NotPending(path)),
            None => return Err(RegistryError::Missing(path).into()),
        };
        let parent = registry::parent_of(&path).to_owned();
        let root = if parent.is_empty() {
            self.core.clone()
        } else {
            self.registry
                .widget(&parent)
                .map_err(|source| FireError::Structural {
                    parent: parent.clone(),
                    source,
                })?
        };

        let mother = std::mem::take(&mut self.mother);
        let declared = find_node(&mother, &path).cloned().unwrap_or_default();
        let node = Node {
            kind: Some(spec.clone()),
            ..declared
        };
        let result = self
            .realize(&path, &spec, &node, Layout::Stored(layout), &root)
            .and_then(|widget| {
                self.build_level(&node.children, &path, &widget)?;
                Ok(widget)
            });
        self.mother = mother;
        let widget = result?;
        debug!(path, class = %widget.class_name(), "built deferred node");
        Ok(widget)
    }

    // -- Whole application --------------------------------------------------

    /// Destroy the core widget.
    pub fn destroy(&self) -> Result<()> {
        self.core.call("destroy", Args::new(), Kwargs::new())?;
        Ok(())
    }

    /// Pack the core widget into its own master.
    pub fn pack(&self, args: Args, kwargs: Kwargs) -> Result<()> {
        self.core.call("pack", args, kwargs)?;
        Ok(())
    }

    /// Grid the core widget into its own master.
    pub fn grid(&self, args: Args, kwargs: Kwargs) -> Result<()> {
        self.core.call("grid", args, kwargs)?;
        Ok(())
    }

    // -- Accessors ----------------------------------------------------------

    pub fn core(&self) -> &WidgetRef {
        &self.core
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn mother(&self) -> &Mother {
        &self.mother
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    /// The variable the node at `path` bound through a constructor
    /// reference, if it is still in memory.
    pub fn bound_variable(&self, path: impl IntoPath) -> Option<Variable> {
        let key = self.variables.get(&path.into_path())?;
        self.memory.get(key)?.as_variable().cloned()
    }
}

impl Index<&str> for Fire {
    type Output = WidgetRef;

    /// # Panics
    ///
    /// Panics if `path` is not a built widget. Use [`Fire::widget`] to get
    /// an error instead.
    fn index(&self, path: &str) -> &WidgetRef {
        match self.registry.get(path).and_then(Entry::widget) {
            Some(widget) => widget,
            None => panic!("no built widget at '{path}'"),
        }
    }
}

impl fmt::Debug for Fire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fire")
            .field("core", &self.core)
            .field("memory", &self.memory)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A built widget is never demoted back to a pending stub.
fn record(registry: &mut Registry, path: &str, entry: Entry) {
    if entry.is_pending() && matches!(registry.get(path), Some(Entry::Built(_))) {
        warn!(path, "ignored a stub over a built widget");
        return;
    }
    if let Some(Entry::Built(_)) = registry.insert(path, entry) {
        warn!(path, "overwrote a built widget");
    }
}

fn find_node<'m>(mother: &'m Mother, path: &str) -> Option<&'m Node> {
    let mut segments = path.split(DELIMITER);
    let mut node = mother.get(segments.next()?)?;
    for segment in segments {
        node = node.children.get(segment)?;
    }
    Some(node)
}

fn parse_error(path: &str, reason: String, node: &Node, depth: usize) -> FireError {
    FireError::Parse {
        path: path.to_owned(),
        reason,
        snapshot: node.snapshot(depth),
    }
}

fn specification(path: &str, part: &str, node: &Node, depth: usize, source: ResolveError) -> FireError {
    FireError::Specification {
        path: path.to_owned(),
        part: part.to_owned(),
        snapshot: node.snapshot(depth),
        source,
    }
}

fn render(path: &str, action: RenderAction, node: &Node, depth: usize, source: ToolkitError) -> FireError {
    FireError::Render {
        path: path.to_owned(),
        action,
        snapshot: node.snapshot(depth),
        source,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
