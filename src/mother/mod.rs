//! The declarative tree ("mother"): nodes, argument markers and helpers.

pub mod arg;
pub mod helpers;
pub mod node;

pub use arg::{Arg, Unpack, VarArg, VarSpec};
pub use helpers::{
    fire_grid, fire_pack, fire_place, grid_arg, post, spec, stub, varg, varspec, Grid, Pack, Place,
};
pub use node::{Call, Ctor, Mother, Node, Spec};
