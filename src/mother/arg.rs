//! Argument markers: literals and references into memory.
//!
//! Every argument slot in a node is an [`Arg`]. The variant is fixed when the
//! tree is declared, so resolution is a match over three cases:
//!
//! - [`Arg::Literal`]: passed through, except that a string equal to a memory
//!   key is looked up (a bare key reference).
//! - [`Arg::Construct`]: a [`VarSpec`], a factory in memory to be invoked with
//!   the node's root widget and replaced by its result.
//! - [`Arg::Unpack`]: a [`VarArg`], a memory lookup with an unpack arity.

use std::fmt;

use crate::error::ResolveError;
use crate::value::{Args, Callback, Kwargs, Value, Variable};
use crate::widget::WidgetRef;

// ---------------------------------------------------------------------------
// Unpack
// ---------------------------------------------------------------------------

/// How a referenced memory value is spliced into a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unpack {
    /// Arity 0: `foo(value)`.
    #[default]
    Single,
    /// Arity 1: `foo(*value)`.
    Positional,
    /// Arity 2: `foo(**value)`, defaults only.
    Keyword,
}

impl Unpack {
    pub fn from_arity(arity: u8) -> Result<Self, ResolveError> {
        match arity {
            0 => Ok(Unpack::Single),
            1 => Ok(Unpack::Positional),
            2 => Ok(Unpack::Keyword),
            other => Err(ResolveError::InvalidArity(other)),
        }
    }

    pub fn arity(self) -> u8 {
        match self {
            Unpack::Single => 0,
            Unpack::Positional => 1,
            Unpack::Keyword => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// VarSpec / VarArg
// ---------------------------------------------------------------------------

/// Constructor reference: invoke the factory stored under `name` as
/// `factory(root, *args, **kwargs)` and keep the result in its place.
#[derive(Debug, Clone, PartialEq)]
pub struct VarSpec {
    pub name: String,
    pub args: Args,
    pub kwargs: Kwargs,
}

impl VarSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Args::new(),
            kwargs: Kwargs::new(),
        }
    }

    /// Append a positional argument for the factory (builder).
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Add a keyword argument for the factory (builder).
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

/// Argument reference: look up `name` in memory and splice it per `unpack`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarArg {
    pub name: String,
    pub unpack: Unpack,
}

impl VarArg {
    pub fn new(name: impl Into<String>, unpack: Unpack) -> Self {
        Self {
            name: name.into(),
            unpack,
        }
    }

    /// Build from a numeric arity, rejecting anything outside `0..=2`.
    pub fn with_arity(name: impl Into<String>, arity: u8) -> Result<Self, ResolveError> {
        Ok(Self::new(name, Unpack::from_arity(arity)?))
    }
}

// ---------------------------------------------------------------------------
// Arg
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Literal(Value),
    Construct(VarSpec),
    Unpack(VarArg),
}

impl Arg {
    /// The memory key this argument would be looked up under, if any.
    ///
    /// Only string literals can act as bare key references.
    pub fn memory_key(&self) -> Option<&str> {
        match self {
            Arg::Literal(value) => value.as_str(),
            Arg::Construct(spec) => Some(&spec.name),
            Arg::Unpack(var) => Some(&var.name),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Literal(value) => f.write_str(&value.repr()),
            Arg::Construct(spec) => {
                write!(f, "varspec({:?}", spec.name)?;
                for value in &spec.args {
                    write!(f, ", {}", value.repr())?;
                }
                for (key, value) in &spec.kwargs {
                    write!(f, ", {key}={}", value.repr())?;
                }
                f.write_str(")")
            }
            Arg::Unpack(var) => write!(f, "varg({:?}, {})", var.name, var.unpack.arity()),
        }
    }
}

impl From<VarSpec> for Arg {
    fn from(spec: VarSpec) -> Self {
        Arg::Construct(spec)
    }
}

impl From<VarArg> for Arg {
    fn from(var: VarArg) -> Self {
        Arg::Unpack(var)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Literal(value)
    }
}

macro_rules! literal_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Arg::Literal(Value::from(value))
            }
        })*
    };
}

literal_from!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    usize,
    f32,
    f64,
    &str,
    String,
    WidgetRef,
    Variable,
    Callback
);

impl<T: Into<Value>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::Literal(Value::from(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_round_trip_and_rejection() {
        assert_eq!(Unpack::from_arity(1).unwrap(), Unpack::Positional);
        assert_eq!(Unpack::Keyword.arity(), 2);
        assert_eq!(
            VarArg::with_arity("options", 3).unwrap_err(),
            ResolveError::InvalidArity(3)
        );
    }

    #[test]
    fn memory_key_per_variant() {
        assert_eq!(Arg::from("cmd").memory_key(), Some("cmd"));
        assert_eq!(Arg::from(3).memory_key(), None);
        assert_eq!(Arg::from(VarSpec::new("opt")).memory_key(), Some("opt"));
        assert_eq!(
            Arg::from(VarArg::new("options", Unpack::Positional)).memory_key(),
            Some("options")
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(Arg::from("x").to_string(), "\"x\"");
        assert_eq!(
            Arg::from(VarSpec::new("opt").kwarg("value", 0)).to_string(),
            "varspec(\"opt\", value=0)"
        );
        assert_eq!(
            Arg::from(VarArg::new("options", Unpack::Keyword)).to_string(),
            "varg(\"options\", 2)"
        );
    }
}
