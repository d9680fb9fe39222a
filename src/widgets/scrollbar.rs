//! Scrollbar: remembers the visible fraction it was last told about and
//! forwards drags to its `command`.

use std::any::Any;

use super::base::Base;
use crate::dispatch::{constructor as wrap, Constructor};
use crate::error::ToolkitError;
use crate::value::{Args, Kwargs, Value};
use crate::widget::{Widget, WidgetRef};

pub const SCROLLBAR_OPTIONS: &[&str] = &[
    "orient", "command", "width", "background", "borderwidth", "relief", "jump", "cursor",
    "takefocus", "activebackground", "troughcolor", "highlightthickness", "elementborderwidth",
    "repeatdelay", "repeatinterval",
];

#[derive(Debug)]
pub struct Scrollbar {
    base: Base,
    first: f64,
    last: f64,
}

impl Scrollbar {
    pub fn new(master: &WidgetRef) -> Self {
        Self {
            base: Base::new("Scrollbar", SCROLLBAR_OPTIONS).with_master(master),
            first: 0.0,
            last: 1.0,
        }
    }

    /// The visible range last reported through `set`.
    pub fn fractions(&self) -> (f64, f64) {
        (self.first, self.last)
    }

    fn set_fractions(&mut self, args: &[Value]) -> Result<Value, ToolkitError> {
        match args {
            [first, last] => {
                self.first = fraction(first)?;
                self.last = fraction(last)?;
                Ok(Value::None)
            }
            _ => Err(ToolkitError::invalid(format!(
                "set expects first and last fractions, got {} arguments",
                args.len()
            ))),
        }
    }
}

impl Widget for Scrollbar {
    fn class_name(&self) -> &str {
        self.base.class()
    }

    fn call(&mut self, method: &str, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        match method {
            "set" => self.set_fractions(&args),
            "get" => Ok(Value::List(vec![
                Value::Float(self.first),
                Value::Float(self.last),
            ])),
            _ => self
                .base
                .call(method, args, kwargs)
                .unwrap_or_else(|| Err(self.base.unknown_method(method))),
        }
    }

    fn cget(&self, option: &str) -> Result<Value, ToolkitError> {
        self.base.cget(option)
    }

    fn configure(&mut self, option: &str, value: Value) -> Result<(), ToolkitError> {
        if option == "orient" {
            check_orient(&value)?;
        }
        self.base.configure(option, value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn fraction(value: &Value) -> Result<f64, ToolkitError> {
    let parsed = match value {
        Value::Str(s) => s.trim().parse::<f64>().ok(),
        other => other.as_float(),
    };
    parsed.ok_or_else(|| ToolkitError::invalid(format!("expected a fraction, got {}", value.repr())))
}

fn check_orient(value: &Value) -> Result<(), ToolkitError> {
    match value.as_str() {
        Some("vertical" | "horizontal") => Ok(()),
        _ => Err(ToolkitError::invalid(format!(
            "bad orientation \"{value}\": must be vertical or horizontal"
        ))),
    }
}

/// `Scrollbar(master, **options)`; `orient` defaults to vertical.
pub fn constructor() -> Constructor {
    wrap(|master, args, kwargs| {
        if let Some(orient) = kwargs.get("orient") {
            check_orient(orient)?;
        }
        let mut bar = Scrollbar::new(master);
        bar.base.configure("orient", Value::from("vertical"))?;
        bar.base.init(args, kwargs)?;
        Ok(WidgetRef::new(bar).into())
    })
}

/// Simulate the user dragging the slider to `fraction`: calls the bar's
/// `command` with `("moveto", fraction)`.
///
/// The bar is not borrowed while the command runs, so the command may push
/// the new view back through the bar's `set`.
pub fn drag(bar: &WidgetRef, fraction: f64) -> Result<Value, ToolkitError> {
    bar.invoke_option("command", vec![Value::from("moveto"), Value::Float(fraction)])
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{kwargs, Callback};
    use crate::widgets::basic::Basic;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn bar(options: Kwargs) -> WidgetRef {
        let root = WidgetRef::new(Basic::tk());
        let value = constructor()(&root, Args::new(), options).unwrap();
        value.as_widget().unwrap().clone()
    }

    #[test]
    fn defaults_to_vertical() {
        let bar = bar(Kwargs::new());
        assert_eq!(bar.get("orient").unwrap(), Value::from("vertical"));
        assert_eq!(bar.class_name(), "Scrollbar");
    }

    #[test]
    fn rejects_bad_orientation() {
        let root = WidgetRef::new(Basic::tk());
        assert!(constructor()(&root, Args::new(), kwargs([("orient", "diagonal")])).is_err());
        let bar = bar(Kwargs::new());
        assert!(bar.set("orient", "sideways").is_err());
    }

    #[test]
    fn set_and_get_fractions() {
        let bar = bar(Kwargs::new());
        bar.call("set", vec![Value::Float(0.25), Value::from("0.5")], Kwargs::new())
            .unwrap();
        let got = bar.call("get", Args::new(), Kwargs::new()).unwrap();
        assert_eq!(got, Value::List(vec![Value::Float(0.25), Value::Float(0.5)]));
        assert_eq!(bar.with(|b: &Scrollbar| b.fractions()), Some((0.25, 0.5)));
    }

    #[test]
    fn set_requires_two_numbers() {
        let bar = bar(Kwargs::new());
        assert!(bar.call("set", vec![Value::Float(0.1)], Kwargs::new()).is_err());
        assert!(bar
            .call("set", vec![Value::from("a"), Value::from("b")], Kwargs::new())
            .is_err());
    }

    #[test]
    fn drag_calls_command_with_moveto() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let bar = bar(Kwargs::new());
        bar.set(
            "command",
            Callback::new("view", move |args, _| {
                log.borrow_mut().extend(args);
                Ok(Value::None)
            }),
        )
        .unwrap();
        drag(&bar, 0.5).unwrap();
        assert_eq!(*seen.borrow(), vec![Value::from("moveto"), Value::Float(0.5)]);
    }

    #[test]
    fn drag_without_command_is_noop() {
        assert_eq!(drag(&bar(Kwargs::new()), 0.3).unwrap(), Value::None);
    }
}
