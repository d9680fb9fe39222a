//! Widgets with no behavior beyond options and geometry: windows, frames,
//! labels, entries, buttons and the themed variants.

use std::any::Any;

use super::base::Base;
use crate::dispatch::{constructor, Constructor};
use crate::error::ToolkitError;
use crate::value::{Args, Kwargs, Value};
use crate::widget::{Widget, WidgetRef};

// ---------------------------------------------------------------------------
// Option tables
// ---------------------------------------------------------------------------

pub const FRAME_OPTIONS: &[&str] = &[
    "background", "borderwidth", "relief", "width", "height", "padx", "pady", "cursor",
    "highlightthickness", "highlightbackground", "takefocus",
];

pub const ROOT_OPTIONS: &[&str] = &[
    "background", "borderwidth", "relief", "width", "height", "padx", "pady", "cursor",
    "highlightthickness", "takefocus", "menu",
];

pub const LABELFRAME_OPTIONS: &[&str] = &[
    "background", "borderwidth", "relief", "width", "height", "padx", "pady", "cursor",
    "highlightthickness", "takefocus", "text", "labelanchor", "font", "foreground",
];

pub const LABEL_OPTIONS: &[&str] = &[
    "text", "textvariable", "font", "foreground", "background", "borderwidth", "relief",
    "width", "height", "padx", "pady", "anchor", "justify", "image", "compound",
    "wraplength", "state", "cursor", "highlightthickness", "takefocus", "underline",
];

pub const BUTTON_OPTIONS: &[&str] = &[
    "text", "textvariable", "command", "font", "foreground", "background", "borderwidth",
    "relief", "width", "height", "padx", "pady", "anchor", "justify", "image", "compound",
    "wraplength", "state", "cursor", "highlightthickness", "takefocus", "underline",
    "activebackground", "activeforeground", "default", "overrelief",
];

pub const ENTRY_OPTIONS: &[&str] = &[
    "textvariable", "font", "foreground", "background", "borderwidth", "relief", "width",
    "justify", "show", "state", "cursor", "highlightthickness", "takefocus",
    "exportselection", "insertbackground",
];

pub const TTK_LABEL_OPTIONS: &[&str] = &[
    "style", "class", "cursor", "takefocus", "text", "textvariable", "font", "foreground",
    "background", "anchor", "justify", "image", "compound", "padding", "width", "wraplength",
    "state", "relief", "underline",
];

pub const TTK_BUTTON_OPTIONS: &[&str] = &[
    "style", "class", "cursor", "takefocus", "text", "textvariable", "command", "image",
    "compound", "padding", "width", "state", "default", "underline",
];

pub const TTK_FRAME_OPTIONS: &[&str] = &[
    "style", "class", "cursor", "takefocus", "width", "height", "padding", "relief",
    "borderwidth",
];

pub const TTK_SEPARATOR_OPTIONS: &[&str] = &["style", "class", "cursor", "takefocus", "orient"];

pub const TTK_PROGRESSBAR_OPTIONS: &[&str] = &[
    "style", "class", "cursor", "takefocus", "orient", "length", "mode", "maximum", "value",
    "variable", "phase",
];

// ---------------------------------------------------------------------------
// Basic
// ---------------------------------------------------------------------------

/// A widget that is nothing more than its [`Base`].
#[derive(Debug)]
pub struct Basic {
    base: Base,
}

impl Basic {
    pub fn new(class: impl Into<String>, allowed: &'static [&'static str]) -> Self {
        Self {
            base: Base::new(class, allowed),
        }
    }

    /// Attach to a master widget (builder).
    pub fn with_master(self, master: &WidgetRef) -> Self {
        Self {
            base: self.base.with_master(master),
        }
    }

    /// A root window.
    pub fn tk() -> Self {
        Self::new("Tk", ROOT_OPTIONS)
    }

    /// A detached frame, for tests and custom constructors.
    pub fn frame() -> Self {
        Self::new("Frame", FRAME_OPTIONS)
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    /// A constructor for `class` that accepts the `allowed` options.
    pub fn constructor(class: &'static str, allowed: &'static [&'static str]) -> Constructor {
        constructor(move |master, args, kwargs| {
            let mut widget = Basic {
                base: Base::new(class, allowed).with_master(master),
            };
            widget.base.init(args, kwargs)?;
            Ok(WidgetRef::new(widget).into())
        })
    }

    /// A constructor for a fresh root window; the master is ignored.
    pub fn root_constructor() -> Constructor {
        constructor(|_master, args, kwargs| {
            let mut widget = Basic::tk();
            widget.base.init(args, kwargs)?;
            Ok(WidgetRef::new(widget).into())
        })
    }
}

impl Widget for Basic {
    fn class_name(&self) -> &str {
        self.base.class()
    }

    fn call(&mut self, method: &str, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        self.base
            .call(method, args, kwargs)
            .unwrap_or_else(|| Err(self.base.unknown_method(method)))
    }

    fn cget(&self, option: &str) -> Result<Value, ToolkitError> {
        self.base.cget(option)
    }

    fn configure(&mut self, option: &str, value: Value) -> Result<(), ToolkitError> {
        self.base.configure(option, value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
