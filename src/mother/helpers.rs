//! Shorthand constructors for declaring trees.
//!
//! `fire_pack`, `fire_grid` and `fire_place` return typed builders whose
//! methods name the placement options each geometry manager recognizes; only
//! the options actually set end up in the resulting [`Call`].

use super::arg::{Unpack, VarArg, VarSpec};
use super::node::{Call, Ctor, Spec};
use crate::mother::Arg;
use crate::value::{Kwargs, Value};

/// A node type: `spec("Button").kwarg("text", "OK")`.
pub fn spec(ctor: impl Into<Ctor>) -> Spec {
    Spec::new(ctor)
}

/// A deferred node type, built later with `Fire::build_stub`.
pub fn stub() -> Spec {
    Spec::stub()
}

/// A post step: a method called on the widget after it is placed.
pub fn post(method: impl Into<String>) -> Call {
    Call::new(method)
}

/// A constructor reference into memory.
pub fn varspec(name: impl Into<String>) -> VarSpec {
    VarSpec::new(name)
}

/// An argument reference into memory with an unpack arity.
pub fn varg(name: impl Into<String>, unpack: Unpack) -> VarArg {
    VarArg::new(name, unpack)
}

/// Keyword arguments for `grid`: `row` and `column` plus any extras.
pub fn grid_arg(row: i64, column: i64, extra: Kwargs) -> Kwargs {
    let mut args = Kwargs::new();
    args.insert("row".into(), Value::Int(row));
    args.insert("column".into(), Value::Int(column));
    args.extend(extra);
    args
}

// ---------------------------------------------------------------------------
// Placement builders
// ---------------------------------------------------------------------------

macro_rules! placement {
    ($(#[$meta:meta])* $builder:ident, $ctor:ident, $method:literal { $($option:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $builder(Call);

        $(#[$meta])*
        pub fn $ctor() -> $builder {
            $builder(Call::new($method))
        }

        impl $builder {
            $(
                pub fn $option(self, value: impl Into<Arg>) -> Self {
                    Self(self.0.kwarg(stringify!($option), value))
                }
            )*

            /// Any other keyword, passed through unchecked.
            pub fn kwarg(self, key: impl Into<String>, value: impl Into<Arg>) -> Self {
                Self(self.0.kwarg(key, value))
            }

            /// Every pair of a keyword map, passed through unchecked.
            pub fn kwargs(self, kwargs: Kwargs) -> Self {
                Self(self.0.kwargs(kwargs))
            }
        }

        impl From<$builder> for Call {
            fn from(builder: $builder) -> Call {
                builder.0
            }
        }
    };
}

placement!(
    /// Pack a widget against a side of its parent.
    Pack, fire_pack, "pack" {
        side, fill, anchor, expand, padx, pady, ipadx, ipady,
    }
);

placement!(
    /// Position a widget in a cell of its parent's grid.
    Grid, fire_grid, "grid" {
        row, column, rowspan, columnspan, sticky, padx, pady, ipadx, ipady,
    }
);

placement!(
    /// Place a widget at absolute or relative coordinates.
    Place, fire_place, "place" {
        x, y, relx, rely, anchor, width, height, relwidth, relheight, bordermode,
    }
);
