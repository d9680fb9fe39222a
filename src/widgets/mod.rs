//! Headless reference toolkit.
//!
//! Satisfies the [`Widget`](crate::widget::Widget) contract entirely in
//! memory: options are validated per class, geometry requests are validated
//! and recorded, text, scrollbars and menus keep just enough state to be
//! driven from tests. Nothing is ever drawn.

pub mod base;
pub mod basic;
pub mod button;
pub mod geometry;
pub mod menu;
pub mod scrollbar;
pub mod text;
pub mod variable;

pub use base::Base;
pub use basic::Basic;
pub use geometry::{Manager, Placement};
pub use menu::{Menu, MenuEntry};
pub use scrollbar::Scrollbar;
pub use text::Text;
pub use variable::VarKind;

use crate::dispatch::Namespace;
use basic::{
    ENTRY_OPTIONS, FRAME_OPTIONS, LABELFRAME_OPTIONS, LABEL_OPTIONS, ROOT_OPTIONS,
    TTK_FRAME_OPTIONS, TTK_LABEL_OPTIONS, TTK_PROGRESSBAR_OPTIONS, TTK_SEPARATOR_OPTIONS,
};

/// The classic widget set plus the variable classes.
pub fn tk() -> Namespace {
    let mut namespace = Namespace::new("tk")
        .with("Tk", Basic::root_constructor())
        .with("Toplevel", Basic::constructor("Toplevel", ROOT_OPTIONS))
        .with("Frame", Basic::constructor("Frame", FRAME_OPTIONS))
        .with("LabelFrame", Basic::constructor("Labelframe", LABELFRAME_OPTIONS))
        .with("Label", Basic::constructor("Label", LABEL_OPTIONS))
        .with("Button", button::constructor())
        .with("Entry", Basic::constructor("Entry", ENTRY_OPTIONS))
        .with("Text", text::constructor())
        .with("Scrollbar", scrollbar::constructor())
        .with("Menu", menu::constructor())
        .with("OptionMenu", menu::option_menu_constructor());
    for kind in variable::ALL {
        namespace.register(kind.class(), kind.constructor());
    }
    namespace
}

pub fn scrolledtext() -> Namespace {
    Namespace::new("scrolledtext").with("ScrolledText", text::scrolled_constructor())
}

/// Themed widgets.
pub fn ttk() -> Namespace {
    Namespace::new("ttk")
        .with("Label", Basic::constructor("TLabel", TTK_LABEL_OPTIONS))
        .with("Button", button::themed_constructor())
        .with("Frame", Basic::constructor("TFrame", TTK_FRAME_OPTIONS))
        .with("Separator", Basic::constructor("TSeparator", TTK_SEPARATOR_OPTIONS))
        .with("Progressbar", Basic::constructor("TProgressbar", TTK_PROGRESSBAR_OPTIONS))
}

/// `tk`, `scrolledtext`, `ttk`, in lookup order.
pub fn default_namespaces() -> Vec<Namespace> {
    vec![tk(), scrolledtext(), ttk()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Args, Kwargs};
    use crate::widget::WidgetRef;

    #[test]
    fn namespace_contents() {
        assert_eq!(
            tk().names(),
            vec![
                "BooleanVar", "Button", "DoubleVar", "Entry", "Frame", "IntVar", "Label",
                "LabelFrame", "Menu", "OptionMenu", "Scrollbar", "StringVar", "Text", "Tk",
                "Toplevel",
            ]
        );
        assert_eq!(scrolledtext().names(), vec!["ScrolledText"]);
        assert_eq!(ttk().names(), vec!["Button", "Frame", "Label", "Progressbar", "Separator"]);
    }

    #[test]
    fn every_widget_constructor_builds_under_a_root() {
        let root = WidgetRef::new(Basic::tk());
        for namespace in default_namespaces() {
            for name in namespace.names() {
                if name == "OptionMenu" {
                    continue;
                }
                let ctor = namespace.get(name).unwrap();
                let value = ctor(&root, Args::new(), Kwargs::new()).unwrap();
                assert!(
                    value.as_widget().is_some() || value.as_variable().is_some(),
                    "{}.{name}",
                    namespace.name()
                );
            }
        }
    }

    #[test]
    fn themed_classes_are_prefixed() {
        let root = WidgetRef::new(Basic::tk());
        let ctor = ttk().get("Label").unwrap().clone();
        let label = ctor(&root, Args::new(), Kwargs::new()).unwrap();
        assert_eq!(label.as_widget().unwrap().class_name(), "TLabel");
    }
}
