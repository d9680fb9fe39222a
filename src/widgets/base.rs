//! State and behavior every headless widget shares.
//!
//! [`Base`] owns the option table, the master link, the recorded placement
//! and grid weights. Concrete widgets embed one and forward the methods they
//! do not handle themselves to [`Base::call`].

use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::geometry::{Manager, Placement};
use crate::error::ToolkitError;
use crate::value::{Args, Kwargs, Value};
use crate::widget::{WeakWidgetRef, WidgetRef};

/// Options recognized by row/column configuration.
const AXIS_OPTIONS: &[&str] = &["weight", "minsize", "pad", "uniform"];

/// Short option aliases and their full names.
fn canonical(option: &str) -> &str {
    match option {
        "bg" => "background",
        "fg" => "foreground",
        "bd" => "borderwidth",
        other => other,
    }
}

#[derive(Debug)]
pub struct Base {
    class: String,
    allowed: &'static [&'static str],
    options: IndexMap<String, Value>,
    master: Option<WeakWidgetRef>,
    placement: Option<Placement>,
    columns: BTreeMap<i64, Kwargs>,
    rows: BTreeMap<i64, Kwargs>,
    destroyed: bool,
}

impl Base {
    pub fn new(class: impl Into<String>, allowed: &'static [&'static str]) -> Self {
        Self {
            class: class.into(),
            allowed,
            options: IndexMap::new(),
            master: None,
            placement: None,
            columns: BTreeMap::new(),
            rows: BTreeMap::new(),
            destroyed: false,
        }
    }

    /// Attach to a master widget (builder).
    pub fn with_master(mut self, master: &WidgetRef) -> Self {
        self.master = Some(master.downgrade());
        self
    }

    /// Apply constructor options: an optional positional option mapping
    /// followed by keywords.
    pub fn init(&mut self, args: Args, kwargs: Kwargs) -> Result<(), ToolkitError> {
        for arg in args {
            match arg {
                Value::Map(cnf) => self.configure_all(cnf)?,
                other => {
                    return Err(ToolkitError::invalid(format!(
                        "{} takes no positional arguments, got {}",
                        self.class,
                        other.repr()
                    )))
                }
            }
        }
        self.configure_all(kwargs)
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.allowed.contains(&canonical(option))
    }

    /// The current value of `option`; unset options read as `None`.
    pub fn cget(&self, option: &str) -> Result<Value, ToolkitError> {
        let option = canonical(option);
        if !self.has_option(option) {
            return Err(self.unknown_option(option));
        }
        Ok(self.options.get(option).cloned().unwrap_or_default())
    }

    pub fn configure(&mut self, option: &str, value: Value) -> Result<(), ToolkitError> {
        let option = canonical(option);
        if !self.has_option(option) {
            return Err(self.unknown_option(option));
        }
        self.options.insert(option.to_owned(), value);
        Ok(())
    }

    /// Validate every option before applying any of them.
    pub fn configure_all(&mut self, kwargs: Kwargs) -> Result<(), ToolkitError> {
        if let Some(bad) = kwargs.keys().find(|key| !self.has_option(key)) {
            return Err(self.unknown_option(canonical(bad)));
        }
        for (option, value) in kwargs {
            self.options.insert(canonical(&option).to_owned(), value);
        }
        Ok(())
    }

    pub fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    pub fn master(&self) -> Option<WidgetRef> {
        self.master.as_ref().and_then(WeakWidgetRef::upgrade)
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Weights and sizes recorded by `columnconfigure`.
    pub fn column(&self, index: i64) -> Option<&Kwargs> {
        self.columns.get(&index)
    }

    /// Weights and sizes recorded by `rowconfigure`.
    pub fn row(&self, index: i64) -> Option<&Kwargs> {
        self.rows.get(&index)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn unknown_option(&self, option: &str) -> ToolkitError {
        ToolkitError::UnknownOption {
            class: self.class.clone(),
            option: option.to_owned(),
        }
    }

    pub fn unknown_method(&self, method: &str) -> ToolkitError {
        ToolkitError::UnknownMethod {
            class: self.class.clone(),
            method: method.to_owned(),
        }
    }

    /// Handle a method every widget has. `None` means the method is not one
    /// of them.
    pub fn call(
        &mut self,
        method: &str,
        args: Args,
        kwargs: Kwargs,
    ) -> Option<Result<Value, ToolkitError>> {
        if let Some(manager) = Manager::from_method(method) {
            return Some(self.place_with(manager, args, kwargs));
        }
        if let Some(manager) = Manager::from_forget(method) {
            if self.placement.as_ref().is_some_and(|p| p.manager == manager) {
                self.placement = None;
            }
            return Some(Ok(Value::None));
        }
        if let Some(manager) = Manager::from_info(method) {
            return Some(match &self.placement {
                Some(placement) if placement.manager == manager => Ok(placement.info()),
                _ => Err(ToolkitError::invalid(format!(
                    "window isn't managed by {manager}"
                ))),
            });
        }
        let result = match method {
            "configure" | "config" => self.configure_call(args, kwargs),
            "cget" => match args.first().and_then(Value::as_str) {
                Some(option) => self.cget(option),
                None => Err(ToolkitError::invalid("cget expects an option name")),
            },
            "destroy" => {
                self.destroyed = true;
                self.placement = None;
                Ok(Value::None)
            }
            "winfo_class" => Ok(Value::from(self.class.as_str())),
            "winfo_exists" => Ok(Value::Bool(!self.destroyed)),
            "winfo_parent" => Ok(self.master().map(Value::Widget).unwrap_or_default()),
            "winfo_manager" => Ok(Value::from(
                self.placement.as_ref().map_or("", |p| p.manager.name()),
            )),
            "columnconfigure" | "grid_columnconfigure" => {
                axis_configure(&mut self.columns, method, args, kwargs)
            }
            "rowconfigure" | "grid_rowconfigure" => {
                axis_configure(&mut self.rows, method, args, kwargs)
            }
            _ => return None,
        };
        Some(result)
    }

    fn place_with(
        &mut self,
        manager: Manager,
        args: Args,
        kwargs: Kwargs,
    ) -> Result<Value, ToolkitError> {
        if self.master.is_none() {
            return Err(ToolkitError::invalid(format!(
                "can't {manager} a top-level {}",
                self.class
            )));
        }
        let placement = Placement::new(manager, args, kwargs)?;
        match &mut self.placement {
            Some(current) => current.update(placement),
            None => self.placement = Some(placement),
        }
        Ok(Value::None)
    }

    fn configure_call(&mut self, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        match args.as_slice() {
            [] if kwargs.is_empty() => return Ok(Value::Map(self.options.clone())),
            [Value::Str(option)] if kwargs.is_empty() => return self.cget(option),
            _ => {}
        }
        self.init(args, kwargs)?;
        Ok(Value::None)
    }
}

fn axis_configure(
    axis: &mut BTreeMap<i64, Kwargs>,
    method: &str,
    args: Args,
    kwargs: Kwargs,
) -> Result<Value, ToolkitError> {
    let indices: Vec<i64> = match args.first() {
        Some(Value::Int(index)) => vec![*index],
        Some(Value::List(items)) => items.iter().filter_map(Value::as_int).collect(),
        _ => Vec::new(),
    };
    if indices.is_empty() {
        return Err(ToolkitError::invalid(format!("{method} expects an index")));
    }
    if let Some(bad) = kwargs.keys().find(|key| !AXIS_OPTIONS.contains(&key.as_str())) {
        return Err(ToolkitError::invalid(format!(
            "bad option \"-{bad}\": must be {}",
            AXIS_OPTIONS.join(", ")
        )));
    }
    if kwargs.is_empty() {
        return Ok(Value::Map(axis.get(&indices[0]).cloned().unwrap_or_default()));
    }
    for index in indices {
        axis.entry(index).or_default().extend(kwargs.clone());
    }
    Ok(Value::None)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::kwargs;
    use crate::widgets::basic::Basic;

    const OPTIONS: &[&str] = &["text", "background", "width"];

    fn child() -> (WidgetRef, Base) {
        let master = WidgetRef::new(Basic::tk());
        let base = Base::new("Thing", OPTIONS).with_master(&master);
        (master, base)
    }

    // -----------------------------------------------------------------------
    // Options
    // -----------------------------------------------------------------------

    #[test]
    fn aliases_map_to_full_names() {
        let (_master, mut base) = child();
        base.configure("bg", Value::from("red")).unwrap();
        assert_eq!(base.cget("background").unwrap(), Value::from("red"));
        assert_eq!(base.cget("bg").unwrap(), Value::from("red"));
    }

    #[test]
    fn unset_option_reads_none() {
        let (_master, base) = child();
        assert_eq!(base.cget("text").unwrap(), Value::None);
    }

    #[test]
    fn unknown_option_is_rejected_atomically() {
        let (_master, mut base) = child();
        let err = base
            .init(Args::new(), kwargs([("text", "a"), ("colour", "red")]))
            .unwrap_err();
        assert_eq!(
            err,
            ToolkitError::UnknownOption {
                class: "Thing".into(),
                option: "colour".into()
            }
        );
        assert!(base.options().is_empty());
    }

    #[test]
    fn positional_scalars_are_rejected() {
        let (_master, mut base) = child();
        assert!(base.init(vec![Value::Int(1)], Kwargs::new()).is_err());
        base.init(vec![Value::Map(kwargs([("width", 3)]))], Kwargs::new()).unwrap();
        assert_eq!(base.cget("width").unwrap(), Value::Int(3));
    }

    #[test]
    fn configure_method_forms() {
        let (_master, mut base) = child();
        base.call("config", Args::new(), kwargs([("text", "hi")]))
            .unwrap()
            .unwrap();
        let one = base.call("configure", vec!["text".into()], Kwargs::new()).unwrap();
        assert_eq!(one.unwrap(), Value::from("hi"));
        let all = base.call("configure", Args::new(), Kwargs::new()).unwrap().unwrap();
        assert_eq!(all, Value::Map(kwargs([("text", "hi")])));
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    #[test]
    fn pack_records_and_forgets() {
        let (_master, mut base) = child();
        base.call("pack", Args::new(), kwargs([("side", "left")]))
            .unwrap()
            .unwrap();
        assert_eq!(base.placement().unwrap().manager, Manager::Pack);
        let info = base.call("pack_info", Args::new(), Kwargs::new()).unwrap().unwrap();
        assert_eq!(info, Value::Map(kwargs([("side", "left")])));
        assert!(base.call("grid_info", Args::new(), Kwargs::new()).unwrap().is_err());
        base.call("pack_forget", Args::new(), Kwargs::new()).unwrap().unwrap();
        assert!(base.placement().is_none());
    }

    #[test]
    fn toplevels_cannot_be_placed() {
        let mut base = Base::new("Tk", OPTIONS);
        let err = base.call("pack", Args::new(), Kwargs::new()).unwrap().unwrap_err();
        assert!(err.to_string().contains("top-level"));
    }

    #[test]
    fn column_weights() {
        let (_master, mut base) = child();
        base.call("columnconfigure", vec![Value::Int(0)], kwargs([("weight", 1)]))
            .unwrap()
            .unwrap();
        assert_eq!(base.column(0), Some(&kwargs([("weight", 1)])));
        base.call("rowconfigure", vec![Value::from(vec![0, 1, 2])], kwargs([("weight", 2)]))
            .unwrap()
            .unwrap();
        assert_eq!(base.row(2), Some(&kwargs([("weight", 2)])));
        assert!(base
            .call("rowconfigure", vec![Value::Int(0)], kwargs([("stretch", 1)]))
            .unwrap()
            .is_err());
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    #[test]
    fn winfo_methods() {
        let (master, mut base) = child();
        let class = base.call("winfo_class", Args::new(), Kwargs::new()).unwrap().unwrap();
        assert_eq!(class, Value::from("Thing"));
        let parent = base.call("winfo_parent", Args::new(), Kwargs::new()).unwrap().unwrap();
        assert_eq!(parent, Value::Widget(master));
        base.call("destroy", Args::new(), Kwargs::new()).unwrap().unwrap();
        let exists = base.call("winfo_exists", Args::new(), Kwargs::new()).unwrap().unwrap();
        assert_eq!(exists, Value::Bool(false));
    }

    #[test]
    fn unknown_methods_fall_through() {
        let (_master, mut base) = child();
        assert!(base.call("flash", Args::new(), Kwargs::new()).is_none());
    }
}
