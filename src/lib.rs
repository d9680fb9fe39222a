//! # kindling
//!
//! Build a live widget tree from a declarative description, then address any
//! widget in it by path.
//!
//! A [`Mother`] maps node names to [`Node`]s: a constructor with arguments,
//! an optional layout directive, post-construction calls and children.
//! Arguments can refer to a shared [`Memory`]: a constructor reference builds
//! a value from a stored factory (a variable, typically) and binds it to the
//! node, an argument reference splices a stored value into the call.
//! [`Fire::build`] walks the tree depth-first and records every widget under
//! its `parent!child` path.
//!
//! ## Core Systems
//!
//! - **[`mother`]**: Declarative tree types and the `spec` / `varspec` /
//!   `fire_pack` helpers
//! - **[`memory`]**: Shared storage with factory slots
//! - **[`resolve`]**: Reference resolution against memory
//! - **[`dispatch`]**: Constructor lookup across ordered namespaces
//! - **[`registry`]**: Path-addressed widgets and pending stubs
//! - **[`fire`]**: The tree builder and its post-build API
//! - **[`widget`]**: The widget contract a toolkit satisfies
//! - **[`widgets`]**: A headless reference toolkit
//!
//! ## Example
//!
//! ```
//! use kindling::prelude::*;
//!
//! let memory = Memory::new().with_factory("choice", VarKind::Str.constructor());
//! let mut mother = Mother::new();
//! mother.insert(
//!     "panel".into(),
//!     Node::new(spec("Frame"))
//!         .layout(fire_pack().side("left"))
//!         .child(
//!             "pick",
//!             Node::new(spec("OptionMenu").arg(varspec("choice")).arg("a").arg("b"))
//!                 .layout(fire_grid().row(0).column(0)),
//!         ),
//! );
//!
//! let root = WidgetRef::new(Basic::tk());
//! let mut fire = Fire::new(root, memory, mother);
//! fire.build().unwrap();
//! assert!(fire.registry().contains("panel!pick"));
//! assert!(fire.bound_variable("panel!pick").is_some());
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod value;

// Declaration and storage
pub mod memory;
pub mod mother;
pub mod registry;

// Building
pub mod dispatch;
pub mod fire;
pub mod resolve;

// Toolkit
pub mod widget;
pub mod widgets;

pub use config::FireConfig;
pub use error::{FireError, Result, ToolkitError};
pub use fire::{Fire, OptionLabels, OptionOverrides};
pub use memory::Memory;
pub use mother::{Mother, Node, Spec};
pub use value::{Value, Variable};
pub use widget::{Widget, WidgetRef};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use kindling_macros::mother;

/// Everything needed to declare and build a tree.
pub mod prelude {
    pub use crate::config::FireConfig;
    pub use crate::dispatch::{constructor, Dispatcher, Namespace};
    pub use crate::error::{FireError, ToolkitError};
    pub use crate::fire::{Fire, OptionLabels, OptionOverrides};
    pub use crate::memory::Memory;
    pub use crate::mother::{
        fire_grid, fire_pack, fire_place, grid_arg, post, spec, stub, varg, varspec, Call, Ctor,
        Mother, Node, Spec, Unpack,
    };
    pub use crate::registry::{Entry, IntoPath};
    pub use crate::value::{kwargs, Args, Callback, Kwargs, Value, Variable};
    pub use crate::widget::{Widget, WidgetRef};
    pub use crate::widgets::{Basic, VarKind};
}
