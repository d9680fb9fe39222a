//! Scroll axes and the scroll-companion flags a node can request.
//!
//! A node asks for scrollbars with the reserved flags `scrolly` / `scrollx`,
//! either as a bare positional string or as a keyword. [`ScrollFlags::take`]
//! strips them so they never reach the widget constructor. [`ScrollAxis`]
//! holds everything that differs between the vertical and horizontal wiring.

use crate::value::{Args, Kwargs};

/// Reserved flag requesting a vertical scrollbar.
pub const SCROLL_Y: &str = "scrolly";

/// Reserved flag requesting a horizontal scrollbar.
pub const SCROLL_X: &str = "scrollx";

// ---------------------------------------------------------------------------
// ScrollAxis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

impl ScrollAxis {
    /// The reserved flag for this axis.
    pub fn flag(self) -> &'static str {
        match self {
            ScrollAxis::Vertical => SCROLL_Y,
            ScrollAxis::Horizontal => SCROLL_X,
        }
    }

    /// Last path segment the companion scrollbar is registered under.
    pub fn suffix(self) -> &'static str {
        match self {
            ScrollAxis::Vertical => "Scrolly",
            ScrollAxis::Horizontal => "Scrollx",
        }
    }

    /// The scrolled widget's view method (the scrollbar's `command`).
    pub fn view_method(self) -> &'static str {
        match self {
            ScrollAxis::Vertical => "yview",
            ScrollAxis::Horizontal => "xview",
        }
    }

    /// The scrolled widget's option that reports its view to the scrollbar.
    pub fn command_option(self) -> &'static str {
        match self {
            ScrollAxis::Vertical => "yscrollcommand",
            ScrollAxis::Horizontal => "xscrollcommand",
        }
    }

    /// Value of the scrollbar's `orient` option.
    pub fn orient(self) -> &'static str {
        match self {
            ScrollAxis::Vertical => "vertical",
            ScrollAxis::Horizontal => "horizontal",
        }
    }

    /// Default `pack` options for the companion: `(side, fill)`.
    pub fn placement(self) -> (&'static str, &'static str) {
        match self {
            ScrollAxis::Vertical => ("right", "y"),
            ScrollAxis::Horizontal => ("bottom", "x"),
        }
    }
}

// ---------------------------------------------------------------------------
// ScrollFlags
// ---------------------------------------------------------------------------

/// Which scroll companions a node requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollFlags {
    pub vertical: bool,
    pub horizontal: bool,
}

impl ScrollFlags {
    /// Detect and strip both flags from resolved constructor arguments.
    ///
    /// A keyword takes precedence; otherwise the first positional string
    /// equal to the flag is removed.
    pub fn take(args: &mut Args, kwargs: &mut Kwargs) -> Self {
        Self {
            vertical: take_flag(SCROLL_Y, args, kwargs),
            horizontal: take_flag(SCROLL_X, args, kwargs),
        }
    }

    /// The requested axes, vertical first.
    pub fn axes(self) -> impl Iterator<Item = ScrollAxis> {
        [
            (self.vertical, ScrollAxis::Vertical),
            (self.horizontal, ScrollAxis::Horizontal),
        ]
        .into_iter()
        .filter_map(|(on, axis)| on.then_some(axis))
    }

    pub fn any(self) -> bool {
        self.vertical || self.horizontal
    }
}

fn take_flag(flag: &str, args: &mut Args, kwargs: &mut Kwargs) -> bool {
    if kwargs.shift_remove(flag).is_some() {
        return true;
    }
    match args.iter().position(|a| a.as_str() == Some(flag)) {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{kwargs, Value};

    #[test]
    fn flags_from_keywords() {
        let mut args = Args::new();
        let mut kw = kwargs([("width", Value::Int(10)), ("scrolly", Value::Bool(true))]);
        let flags = ScrollFlags::take(&mut args, &mut kw);
        assert!(flags.vertical);
        assert!(!flags.horizontal);
        assert_eq!(kw.len(), 1);
        assert!(kw.contains_key("width"));
    }

    #[test]
    fn flags_from_positionals() {
        let mut args: Args = vec!["scrollx".into(), Value::Int(1), "scrolly".into()];
        let mut kw = Kwargs::new();
        let flags = ScrollFlags::take(&mut args, &mut kw);
        assert!(flags.vertical && flags.horizontal);
        assert_eq!(args, vec![Value::Int(1)]);
    }

    #[test]
    fn no_flags() {
        let mut args: Args = vec!["text".into()];
        let mut kw = Kwargs::new();
        let flags = ScrollFlags::take(&mut args, &mut kw);
        assert!(!flags.any());
        assert_eq!(flags.axes().count(), 0);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn axes_vertical_first() {
        let flags = ScrollFlags {
            vertical: true,
            horizontal: true,
        };
        let axes: Vec<_> = flags.axes().collect();
        assert_eq!(axes, vec![ScrollAxis::Vertical, ScrollAxis::Horizontal]);
    }

    #[test]
    fn axis_wiring_names() {
        assert_eq!(ScrollAxis::Vertical.suffix(), "Scrolly");
        assert_eq!(ScrollAxis::Horizontal.view_method(), "xview");
        assert_eq!(ScrollAxis::Horizontal.command_option(), "xscrollcommand");
        assert_eq!(ScrollAxis::Vertical.placement(), ("right", "y"));
    }
}
