//! Dynamic values passed between the tree, memory and widgets.
//!
//! Widget constructors, placement calls and post steps all take positional
//! and keyword arguments. [`Value`] is the currency for those arguments;
//! [`Callback`] and [`Variable`] are the two shared, reference-counted kinds a
//! widget can hold on to (a command and a state cell).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::ToolkitError;
use crate::widget::WidgetRef;

/// Positional arguments.
pub type Args = Vec<Value>;

/// Keyword arguments, in declaration order.
pub type Kwargs = IndexMap<String, Value>;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A dynamically typed argument or option value.
///
/// Equality is structural for plain data and by identity for widgets,
/// variables and callables.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Widget(WidgetRef),
    Variable(Variable),
    Callable(Callback),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Widget(_) => "widget",
            Value::Variable(_) => "variable",
            Value::Callable(_) => "callable",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_widget(&self) -> Option<&WidgetRef> {
        match self {
            Value::Widget(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Value::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callback> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Invoke a callable value.
    pub fn call(&self, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        match self {
            Value::Callable(callback) => callback.call(args, kwargs),
            other => Err(ToolkitError::NotCallable(other.repr())),
        }
    }

    /// Quoted form used inside containers and snapshots.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Widget(a), Value::Widget(b)) => a.ptr_eq(b),
            (Value::Variable(a), Value::Variable(b)) => a.ptr_eq(b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// The "string form" of a value: what an option label shows by default.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.repr())?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {}", item.repr())?;
                }
                f.write_str("}")
            }
            Value::Widget(w) => write!(f, "<{}>", w.class_name()),
            Value::Variable(v) => write!(f, "<variable {}>", v.get().repr()),
            Value::Callable(c) => write!(f, "<callable {}>", c.label()),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(i: $t) -> Self {
                Value::Int(i64::from(i))
            }
        })*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

/// Saturates at `i64::MAX`.
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(item: Option<T>) -> Self {
        item.map_or(Value::None, Into::into)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<WidgetRef> for Value {
    fn from(w: WidgetRef) -> Self {
        Value::Widget(w)
    }
}

impl From<Variable> for Value {
    fn from(v: Variable) -> Self {
        Value::Variable(v)
    }
}

impl From<Callback> for Value {
    fn from(c: Callback) -> Self {
        Value::Callable(c)
    }
}

/// Build a [`Kwargs`] map from `(name, value)` pairs.
pub fn kwargs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Kwargs
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

// ---------------------------------------------------------------------------
// Callback
// ---------------------------------------------------------------------------

type CallbackFn = dyn Fn(Args, Kwargs) -> Result<Value, ToolkitError>;

/// A shared callable: a command for a button, a menu entry, a scroll hook.
#[derive(Clone)]
pub struct Callback {
    label: Rc<str>,
    func: Rc<CallbackFn>,
}

impl Callback {
    /// Wrap a closure taking the full `(args, kwargs)` call.
    pub fn new(
        label: impl Into<String>,
        func: impl Fn(Args, Kwargs) -> Result<Value, ToolkitError> + 'static,
    ) -> Self {
        Self {
            label: Rc::from(label.into()),
            func: Rc::new(func),
        }
    }

    /// Wrap a closure that ignores its arguments.
    pub fn from_fn(label: impl Into<String>, func: impl Fn() + 'static) -> Self {
        Self::new(label, move |_, _| {
            func();
            Ok(Value::None)
        })
    }

    /// A bound method: calling it calls `method` on `widget`.
    ///
    /// Holds the widget weakly, so wiring two widgets to each other does not
    /// leak them.
    pub fn bound(widget: &WidgetRef, method: &str) -> Self {
        let target = widget.downgrade();
        let method_name = method.to_owned();
        let label = format!("{}.{}", widget.class_name(), method);
        Self::new(label, move |args, kwargs| match target.upgrade() {
            Some(widget) => widget.call(&method_name, args, kwargs),
            None => Err(ToolkitError::Custom(format!(
                "widget for '{method_name}' no longer exists"
            ))),
        })
    }

    pub fn call(&self, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        (self.func)(args, kwargs)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.label).finish()
    }
}

// ---------------------------------------------------------------------------
// Variable
// ---------------------------------------------------------------------------

/// A shared state cell that widgets read and write (the selected option of an
/// option menu, the text of an entry, ...).
#[derive(Clone, Default)]
pub struct Variable(Rc<RefCell<Value>>);

impl Variable {
    pub fn new(initial: impl Into<Value>) -> Self {
        Self(Rc::new(RefCell::new(initial.into())))
    }

    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: impl Into<Value>) {
        *self.0.borrow_mut() = value.into();
    }

    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(value) => f.debug_tuple("Variable").field(&*value).finish(),
            Err(_) => f.write_str("Variable(<borrowed>)"),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
