//! Variable constructors: `IntVar`, `StringVar`, `DoubleVar`, `BooleanVar`.
//!
//! Each takes an optional initial `value` (positionally or by keyword) and an
//! ignored `name`, and produces a [`Variable`] rather than a widget. They are
//! what memory factories usually wrap.

use crate::dispatch::{constructor, Constructor};
use crate::error::ToolkitError;
use crate::value::{Args, Kwargs, Value, Variable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Int,
    Str,
    Double,
    Boolean,
}

impl VarKind {
    pub fn class(self) -> &'static str {
        match self {
            VarKind::Int => "IntVar",
            VarKind::Str => "StringVar",
            VarKind::Double => "DoubleVar",
            VarKind::Boolean => "BooleanVar",
        }
    }

    fn default_value(self) -> Value {
        match self {
            VarKind::Int => Value::Int(0),
            VarKind::Str => Value::from(""),
            VarKind::Double => Value::Float(0.0),
            VarKind::Boolean => Value::Bool(false),
        }
    }

    /// Coerce an initial value the way the typed variable would read it back.
    fn coerce(self, value: Value) -> Result<Value, ToolkitError> {
        let coerced = match (self, &value) {
            (VarKind::Str, Value::Str(_)) => Some(value.clone()),
            (VarKind::Str, other) => Some(Value::Str(other.to_string())),
            (VarKind::Int, Value::Str(s)) => s.trim().parse().ok().map(Value::Int),
            (VarKind::Int, other) => other.as_int().map(Value::Int),
            (VarKind::Double, Value::Str(s)) => s.trim().parse().ok().map(Value::Float),
            (VarKind::Double, other) => other.as_float().map(Value::Float),
            (VarKind::Boolean, other) => other.as_bool().map(Value::Bool),
        };
        coerced.ok_or_else(|| {
            ToolkitError::invalid(format!("{} cannot hold {}", self.class(), value.repr()))
        })
    }

    pub fn make(self, args: Args, mut kwargs: Kwargs) -> Result<Variable, ToolkitError> {
        let keyword = kwargs.shift_remove("value");
        kwargs.shift_remove("name");
        if let Some(bad) = kwargs.keys().next() {
            return Err(ToolkitError::invalid(format!(
                "{} got an unexpected keyword argument '{bad}'",
                self.class()
            )));
        }
        if args.len() > 1 {
            return Err(ToolkitError::invalid(format!(
                "{} takes at most one positional value",
                self.class()
            )));
        }
        let initial = match keyword.or_else(|| args.into_iter().next()) {
            None | Some(Value::None) => self.default_value(),
            Some(value) => self.coerce(value)?,
        };
        Ok(Variable::new(initial))
    }

    pub fn constructor(self) -> Constructor {
        constructor(move |_master, args, kwargs| Ok(self.make(args, kwargs)?.into()))
    }
}

pub const ALL: [VarKind; 4] = [VarKind::Int, VarKind::Str, VarKind::Double, VarKind::Boolean];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::kwargs;

    #[test]
    fn defaults() {
        for (kind, expected) in [
            (VarKind::Int, Value::Int(0)),
            (VarKind::Str, Value::from("")),
            (VarKind::Double, Value::Float(0.0)),
            (VarKind::Boolean, Value::Bool(false)),
        ] {
            let var = kind.make(Args::new(), Kwargs::new()).unwrap();
            assert_eq!(var.get(), expected, "{}", kind.class());
        }
    }

    #[test]
    fn keyword_beats_positional() {
        let var = VarKind::Int
            .make(vec![Value::Int(1)], kwargs([("value", 2)]))
            .unwrap();
        assert_eq!(var.get(), Value::Int(2));
    }

    #[test]
    fn coercion() {
        let var = VarKind::Double.make(vec![Value::Int(3)], Kwargs::new()).unwrap();
        assert_eq!(var.get(), Value::Float(3.0));
        let var = VarKind::Str.make(vec![Value::Int(3)], Kwargs::new()).unwrap();
        assert_eq!(var.get(), Value::from("3"));
        let var = VarKind::Int.make(vec!["42".into()], Kwargs::new()).unwrap();
        assert_eq!(var.get(), Value::Int(42));
        assert!(VarKind::Int.make(vec!["many".into()], Kwargs::new()).is_err());
    }

    #[test]
    fn unexpected_arguments() {
        assert!(VarKind::Str.make(Args::new(), kwargs([("colour", "red")])).is_err());
        assert!(VarKind::Str
            .make(vec!["a".into(), "b".into()], Kwargs::new())
            .is_err());
        VarKind::Str.make(Args::new(), kwargs([("name", "PY_VAR0")])).unwrap();
    }
}
