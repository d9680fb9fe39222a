//! Geometry managers: option validation and recorded placements.
//!
//! The headless toolkit never lays anything out. `pack`, `grid` and `place`
//! check their options the way the real managers do and remember the result,
//! so tests can assert where a widget was asked to go.

use std::fmt;

use crate::error::ToolkitError;
use crate::value::{Args, Kwargs, Value};

const PACK_OPTIONS: &[&str] = &[
    "side", "fill", "anchor", "expand", "padx", "pady", "ipadx", "ipady", "in", "before", "after",
];

const GRID_OPTIONS: &[&str] = &[
    "row", "column", "rowspan", "columnspan", "sticky", "padx", "pady", "ipadx", "ipady", "in",
];

const PLACE_OPTIONS: &[&str] = &[
    "x", "y", "relx", "rely", "anchor", "width", "height", "relwidth", "relheight", "bordermode",
    "in",
];

const ANCHORS: &[&str] = &["n", "ne", "e", "se", "s", "sw", "w", "nw", "center"];

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manager {
    Pack,
    Grid,
    Place,
}

impl Manager {
    /// The manager a placement method belongs to: `pack`, `pack_configure`,
    /// `grid`, `grid_configure`, `place`, `place_configure`.
    pub fn from_method(method: &str) -> Option<Self> {
        match method.strip_suffix("_configure").unwrap_or(method) {
            "pack" => Some(Manager::Pack),
            "grid" => Some(Manager::Grid),
            "place" => Some(Manager::Place),
            _ => None,
        }
    }

    /// The manager a `*_forget` method belongs to.
    pub fn from_forget(method: &str) -> Option<Self> {
        method.strip_suffix("_forget").and_then(Self::from_method)
    }

    /// The manager a `*_info` method belongs to.
    pub fn from_info(method: &str) -> Option<Self> {
        method.strip_suffix("_info").and_then(Self::from_method)
    }

    pub fn name(self) -> &'static str {
        match self {
            Manager::Pack => "pack",
            Manager::Grid => "grid",
            Manager::Place => "place",
        }
    }

    pub fn options(self) -> &'static [&'static str] {
        match self {
            Manager::Pack => PACK_OPTIONS,
            Manager::Grid => GRID_OPTIONS,
            Manager::Place => PLACE_OPTIONS,
        }
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// A validated placement request.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub manager: Manager,
    pub options: Kwargs,
}

impl Placement {
    /// Validate `(args, kwargs)` for `manager`.
    ///
    /// A single positional mapping is accepted as the option dictionary, the
    /// way `pack(cnf)` is. `in_` is normalized to `in`.
    pub fn new(manager: Manager, args: Args, kwargs: Kwargs) -> Result<Self, ToolkitError> {
        let mut options = Kwargs::new();
        for arg in args {
            match arg {
                Value::Map(map) => options.extend(map),
                other => {
                    return Err(ToolkitError::invalid(format!(
                        "{manager} takes keyword options, got positional {}",
                        other.repr()
                    )))
                }
            }
        }
        options.extend(kwargs);

        let mut validated = Kwargs::with_capacity(options.len());
        for (key, value) in options {
            let key = if key == "in_" { "in".to_owned() } else { key };
            if !manager.options().contains(&key.as_str()) {
                return Err(ToolkitError::invalid(format!(
                    "bad option \"-{key}\": must be {}",
                    manager.options().join(", ")
                )));
            }
            check_value(manager, &key, &value)?;
            validated.insert(key, value);
        }
        Ok(Self {
            manager,
            options: validated,
        })
    }

    /// Merge a later `*_configure` call into this placement.
    pub fn update(&mut self, other: Placement) {
        if other.manager == self.manager {
            self.options.extend(other.options);
        } else {
            *self = other;
        }
    }

    pub fn get(&self, option: &str) -> Option<&Value> {
        self.options.get(option)
    }

    /// The placement as an option map, as `pack_info()` reports it.
    pub fn info(&self) -> Value {
        Value::Map(self.options.clone())
    }
}

fn check_value(manager: Manager, key: &str, value: &Value) -> Result<(), ToolkitError> {
    let ok = match key {
        "side" => one_of(value, &["left", "right", "top", "bottom"]),
        "fill" => one_of(value, &["none", "x", "y", "both"]),
        "anchor" => one_of(value, ANCHORS),
        "bordermode" => one_of(value, &["inside", "outside", "ignore"]),
        "sticky" => value
            .as_str()
            .is_some_and(|s| s.chars().all(|c| "nsew, ".contains(c))),
        "row" | "column" => value.as_int().is_some_and(|n| n >= 0),
        "rowspan" | "columnspan" => value.as_int().is_some_and(|n| n >= 1),
        "in" | "before" | "after" => value.as_widget().is_some(),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(ToolkitError::invalid(format!(
            "bad {key} \"{value}\" for {manager}"
        )))
    }
}

fn one_of(value: &Value, allowed: &[&str]) -> bool {
    value.as_str().is_some_and(|s| allowed.contains(&s))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::kwargs;

    #[test]
    fn method_names() {
        assert_eq!(Manager::from_method("pack"), Some(Manager::Pack));
        assert_eq!(Manager::from_method("grid_configure"), Some(Manager::Grid));
        assert_eq!(Manager::from_method("configure"), None);
        assert_eq!(Manager::from_forget("place_forget"), Some(Manager::Place));
        assert_eq!(Manager::from_info("pack_info"), Some(Manager::Pack));
        assert_eq!(Manager::from_forget("pack"), None);
    }

    #[test]
    fn pack_accepts_its_options() {
        let placement = Placement::new(
            Manager::Pack,
            Args::new(),
            kwargs([("side", "left"), ("fill", "both")]),
        )
        .unwrap();
        assert_eq!(placement.get("side"), Some(&Value::from("left")));
        assert_eq!(placement.options.len(), 2);
    }

    #[test]
    fn positional_mapping_is_the_option_dict() {
        let cnf = Value::Map(kwargs([("row", 1)]));
        let placement = Placement::new(Manager::Grid, vec![cnf], kwargs([("column", 2)])).unwrap();
        assert_eq!(placement.get("row"), Some(&Value::Int(1)));
        assert_eq!(placement.get("column"), Some(&Value::Int(2)));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = Placement::new(Manager::Pack, Args::new(), kwargs([("row", 0)])).unwrap_err();
        assert!(err.to_string().contains("bad option \"-row\""));
    }

    #[test]
    fn bad_values_are_rejected() {
        for (manager, key, value) in [
            (Manager::Pack, "side", Value::from("middle")),
            (Manager::Pack, "fill", Value::from("xy")),
            (Manager::Grid, "sticky", Value::from("up")),
            (Manager::Grid, "row", Value::Int(-1)),
            (Manager::Grid, "columnspan", Value::Int(0)),
            (Manager::Place, "bordermode", Value::from("around")),
            (Manager::Place, "anchor", Value::from("middle")),
        ] {
            let mut kw = Kwargs::new();
            kw.insert(key.to_owned(), value);
            assert!(Placement::new(manager, Args::new(), kw).is_err(), "{manager} {key}");
        }
    }

    #[test]
    fn sticky_combinations() {
        let placement =
            Placement::new(Manager::Grid, Args::new(), kwargs([("sticky", "nsew")])).unwrap();
        assert_eq!(placement.get("sticky"), Some(&Value::from("nsew")));
    }

    #[test]
    fn update_merges_same_manager_and_replaces_other() {
        let mut placement =
            Placement::new(Manager::Pack, Args::new(), kwargs([("side", "top")])).unwrap();
        placement.update(
            Placement::new(Manager::Pack, Args::new(), kwargs([("fill", "x")])).unwrap(),
        );
        assert_eq!(placement.options.len(), 2);
        placement.update(Placement::new(Manager::Grid, Args::new(), kwargs([("row", 0)])).unwrap());
        assert_eq!(placement.manager, Manager::Grid);
        assert_eq!(placement.options.len(), 1);
    }
}
