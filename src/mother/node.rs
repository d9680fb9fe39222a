//! Node types: Node, Spec, Call, Ctor.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::arg::Arg;
use crate::dispatch::Constructor;
use crate::error::ToolkitError;
use crate::value::{Args, Kwargs, Value};
use crate::widget::WidgetRef;

/// The whole declarative tree (or any sub-tree): node name to node, in
/// declaration order.
pub type Mother = IndexMap<String, Node>;

// ---------------------------------------------------------------------------
// Ctor
// ---------------------------------------------------------------------------

/// What to construct for a node.
#[derive(Clone)]
pub enum Ctor {
    /// Looked up by name through the dispatcher's namespaces.
    Named(String),
    /// Called directly.
    Direct(Constructor),
    /// Deferred: keep a placeholder, construct later with `Fire::build_stub`.
    Stub,
}

impl Ctor {
    /// Wrap a closure as a direct constructor.
    pub fn direct(
        func: impl Fn(&WidgetRef, Args, Kwargs) -> Result<Value, ToolkitError> + 'static,
    ) -> Self {
        Ctor::Direct(Rc::new(func))
    }
}

impl fmt::Debug for Ctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ctor::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Ctor::Direct(_) => f.write_str("Direct(<constructor>)"),
            Ctor::Stub => f.write_str("Stub"),
        }
    }
}

impl fmt::Display for Ctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ctor::Named(name) => f.write_str(name),
            Ctor::Direct(_) => f.write_str("<constructor>"),
            Ctor::Stub => f.write_str("stub"),
        }
    }
}

impl From<&str> for Ctor {
    fn from(name: &str) -> Self {
        Ctor::Named(name.to_owned())
    }
}

impl From<String> for Ctor {
    fn from(name: String) -> Self {
        Ctor::Named(name)
    }
}

impl From<Constructor> for Ctor {
    fn from(func: Constructor) -> Self {
        Ctor::Direct(func)
    }
}

// ---------------------------------------------------------------------------
// Spec
// ---------------------------------------------------------------------------

/// A node's `type`: `(constructor, args, kwargs)`.
#[derive(Debug, Clone)]
pub struct Spec {
    pub ctor: Ctor,
    pub args: Vec<Arg>,
    pub kwargs: IndexMap<String, Arg>,
}

impl Spec {
    pub fn new(ctor: impl Into<Ctor>) -> Self {
        Self {
            ctor: ctor.into(),
            args: Vec::new(),
            kwargs: IndexMap::new(),
        }
    }

    /// The deferred marker.
    pub fn stub() -> Self {
        Self::new(Ctor::Stub)
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.ctor, Ctor::Stub)
    }

    /// Append a positional argument (builder).
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add a keyword argument (builder).
    pub fn kwarg(mut self, key: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.kwargs.insert(key.into(), arg.into());
        self
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ctor)?;
        write_arguments(f, &self.args, &self.kwargs)
    }
}

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

/// A method invocation on a constructed widget: a layout directive or a post
/// step.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub args: Vec<Arg>,
    pub kwargs: IndexMap<String, Arg>,
}

impl Call {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
            kwargs: IndexMap::new(),
        }
    }

    /// Append a positional argument (builder).
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add a keyword argument (builder).
    pub fn kwarg(mut self, key: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.kwargs.insert(key.into(), arg.into());
        self
    }

    /// Add every pair of an already-resolved keyword map (builder).
    pub fn kwargs(mut self, kwargs: Kwargs) -> Self {
        for (key, value) in kwargs {
            self.kwargs.insert(key, Arg::Literal(value));
        }
        self
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.method)?;
        write_arguments(f, &self.args, &self.kwargs)
    }
}

fn write_arguments(
    f: &mut fmt::Formatter<'_>,
    args: &[Arg],
    kwargs: &IndexMap<String, Arg>,
) -> fmt::Result {
    f.write_str("(")?;
    let positional = args.iter().map(ToString::to_string);
    let keywords = kwargs.iter().map(|(k, v)| format!("{k}={v}"));
    for (i, text) in positional.chain(keywords).enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&text)?;
    }
    f.write_str(")")
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One declared element of the tree.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// The `type` tag. `None` is a parse error at build time.
    pub kind: Option<Spec>,
    /// Placement directive; `None` leaves the widget unplaced.
    pub layout: Option<Call>,
    /// Calls made on the widget after construction and placement, in order.
    pub post: Vec<Call>,
    pub children: Mother,
}

impl Node {
    pub fn new(spec: Spec) -> Self {
        Self {
            kind: Some(spec),
            ..Self::default()
        }
    }

    /// Set the placement directive (builder).
    pub fn layout(mut self, call: impl Into<Call>) -> Self {
        self.layout = Some(call.into());
        self
    }

    /// Append a post step (builder).
    pub fn post(mut self, call: impl Into<Call>) -> Self {
        self.post.push(call.into());
        self
    }

    /// Add a child node (builder).
    pub fn child(mut self, name: impl Into<String>, node: Node) -> Self {
        self.children.insert(name.into(), node);
        self
    }

    /// Pretty-print the unresolved node, collapsing anything nested deeper
    /// than `depth` to `{...}`.
    pub fn snapshot(&self, depth: usize) -> String {
        let mut out = String::new();
        write_node(&mut out, self, depth, 0);
        out
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize, indent: usize) {
    if depth == 0 {
        out.push_str("{...}");
        return;
    }
    let pad = "  ".repeat(indent + 1);
    out.push_str("{\n");
    match &node.kind {
        Some(spec) => out.push_str(&format!("{pad}type: {spec},\n")),
        None => out.push_str(&format!("{pad}type: <missing>,\n")),
    }
    if let Some(layout) = &node.layout {
        out.push_str(&format!("{pad}layout: {layout},\n"));
    }
    if !node.post.is_empty() {
        let steps: Vec<String> = node.post.iter().map(ToString::to_string).collect();
        out.push_str(&format!("{pad}post: [{}],\n", steps.join(", ")));
    }
    if !node.children.is_empty() {
        out.push_str(&format!("{pad}children: {{\n"));
        let child_pad = "  ".repeat(indent + 2);
        for (name, child) in &node.children {
            out.push_str(&format!("{child_pad}{name}: "));
            write_node(out, child, depth - 1, indent + 2);
            out.push_str(",\n");
        }
        out.push_str(&format!("{pad}}},\n"));
    }
    out.push_str(&"  ".repeat(indent));
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mother::arg::VarSpec;

    fn sample() -> Node {
        Node::new(Spec::new("Frame").kwarg("text", "Left"))
            .layout(Call::new("pack").kwarg("side", "left"))
            .post(Call::new("rowconfigure").arg(0).kwarg("weight", 1))
            .child(
                "btn",
                Node::new(Spec::new("Button").kwarg("command", "cmd"))
                    .child("deep", Node::new(Spec::new("Label"))),
            )
    }

    #[test]
    fn spec_display() {
        let spec = Spec::new("OptionMenu")
            .arg(VarSpec::new("opt"))
            .arg(0)
            .kwarg("width", 4);
        assert_eq!(spec.to_string(), "OptionMenu(varspec(\"opt\"), 0, width=4)");
        assert_eq!(Spec::stub().to_string(), "stub()");
    }

    #[test]
    fn snapshot_full_depth() {
        insta::assert_snapshot!(sample().snapshot(3), @r#"
        {
          type: Frame(text="Left"),
          layout: pack(side="left"),
          post: [rowconfigure(0, weight=1)],
          children: {
            btn: {
              type: Button(command="cmd"),
              children: {
                deep: {
                  type: Label(),
                },
              },
            },
          },
        }
        "#);
    }

    #[test]
    fn snapshot_is_bounded() {
        insta::assert_snapshot!(sample().snapshot(1), @r#"
        {
          type: Frame(text="Left"),
          layout: pack(side="left"),
          post: [rowconfigure(0, weight=1)],
          children: {
            btn: {...},
          },
        }
        "#);
    }

    #[test]
    fn snapshot_missing_type() {
        let node = Node::default();
        assert_eq!(node.snapshot(2), "{\n  type: <missing>,\n}");
    }

    #[test]
    fn builders_preserve_declaration_order() {
        let node = Node::new(Spec::new("Frame"))
            .child("b", Node::default())
            .child("a", Node::default());
        let names: Vec<_> = node.children.keys().cloned().collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
