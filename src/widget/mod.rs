//! Widget system: the toolkit contract and scroll wiring.

pub mod traits;
pub mod scroll;

pub use traits::{WeakWidgetRef, Widget, WidgetRef};
pub use scroll::{ScrollAxis, ScrollFlags, SCROLL_X, SCROLL_Y};
