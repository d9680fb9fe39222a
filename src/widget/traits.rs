//! Widget trait: the capability contract a host toolkit must satisfy.
//!
//! A widget is anything that can be called by method name with
//! `(*args, **kwargs)` and that exposes indexable, settable options. The
//! builder never needs more than that. [`WidgetRef`] is the shared handle the
//! registry, memory and callbacks pass around.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::ToolkitError;
use crate::value::{Args, Kwargs, Value};

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Core trait implemented by every toolkit widget.
///
/// Object-safe: the builder only ever sees `dyn Widget`.
pub trait Widget {
    /// The toolkit class name (e.g. "Button", "Frame").
    fn class_name(&self) -> &str;

    /// Invoke a named method, `widget.method(*args, **kwargs)`.
    ///
    /// Placement (`pack`, `grid`, `place`) and post steps go through here.
    fn call(&mut self, method: &str, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError>;

    /// Read an option, `widget[option]`.
    fn cget(&self, option: &str) -> Result<Value, ToolkitError>;

    /// Write an option, `widget[option] = value`.
    fn configure(&mut self, option: &str, value: Value) -> Result<(), ToolkitError>;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// WidgetRef
// ---------------------------------------------------------------------------

/// Shared, single-threaded handle to a constructed widget.
///
/// Every accessor borrows only for the duration of the call. Re-entrant
/// access to a widget that is already mutably borrowed returns
/// [`ToolkitError::Busy`] instead of panicking.
#[derive(Clone)]
pub struct WidgetRef(Rc<RefCell<dyn Widget>>);

impl WidgetRef {
    pub fn new(widget: impl Widget + 'static) -> Self {
        Self(Rc::new(RefCell::new(widget)))
    }

    /// `widget.method(*args, **kwargs)`.
    pub fn call(&self, method: &str, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        let mut widget = self.0.try_borrow_mut().map_err(|_| ToolkitError::Busy)?;
        widget.call(method, args, kwargs)
    }

    /// `widget[option]`.
    pub fn get(&self, option: &str) -> Result<Value, ToolkitError> {
        let widget = self.0.try_borrow().map_err(|_| ToolkitError::Busy)?;
        widget.cget(option)
    }

    /// `widget[option] = value`.
    pub fn set(&self, option: &str, value: impl Into<Value>) -> Result<(), ToolkitError> {
        let mut widget = self.0.try_borrow_mut().map_err(|_| ToolkitError::Busy)?;
        widget.configure(option, value.into())
    }

    /// Read an option holding a callable and call it.
    ///
    /// The widget is not borrowed while the callable runs, so the callable may
    /// freely touch the widget it came from. An unset (`None`) option is a
    /// no-op.
    pub fn invoke_option(&self, option: &str, args: Args) -> Result<Value, ToolkitError> {
        match self.get(option)? {
            Value::None => Ok(Value::None),
            command => command.call(args, Kwargs::new()),
        }
    }

    /// The class name, or `"?"` while the widget is mutably borrowed.
    pub fn class_name(&self) -> String {
        self.0
            .try_borrow()
            .map(|w| w.class_name().to_owned())
            .unwrap_or_else(|_| "?".to_owned())
    }

    /// Run `f` against the concrete widget type, if it is a `W`.
    pub fn with<W: 'static, R>(&self, f: impl FnOnce(&W) -> R) -> Option<R> {
        let widget = self.0.try_borrow().ok()?;
        widget.as_any().downcast_ref::<W>().map(f)
    }

    /// Run `f` against the concrete widget type mutably, if it is a `W`.
    pub fn with_mut<W: 'static, R>(&self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        let mut widget = self.0.try_borrow_mut().ok()?;
        widget.as_any_mut().downcast_mut::<W>().map(f)
    }

    pub fn ptr_eq(&self, other: &WidgetRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakWidgetRef {
        WeakWidgetRef(Rc::downgrade(&self.0))
    }
}

impl fmt::Debug for WidgetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WidgetRef").field(&self.class_name()).finish()
    }
}

/// Non-owning counterpart of [`WidgetRef`].
#[derive(Clone)]
pub struct WeakWidgetRef(Weak<RefCell<dyn Widget>>);

impl fmt::Debug for WeakWidgetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(widget) => f.debug_tuple("WeakWidgetRef").field(&widget.class_name()).finish(),
            None => f.write_str("WeakWidgetRef(<dropped>)"),
        }
    }
}

impl WeakWidgetRef {
    /// The widget, if it is still alive.
    pub fn upgrade(&self) -> Option<WidgetRef> {
        self.0.upgrade().map(WidgetRef)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
