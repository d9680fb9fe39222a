//! Menus and option menus.
//!
//! A [`Menu`] is an ordered list of entries. An option menu is a menubutton
//! that owns a tear-off-less `Menu` (exposed as its `menu` option) whose
//! entries each set the same variable.

use std::any::Any;

use super::base::Base;
use super::basic::Basic;
use crate::dispatch::{constructor as wrap, Constructor};
use crate::error::ToolkitError;
use crate::value::{kwargs, Args, Callback, Kwargs, Value, Variable};
use crate::widget::{Widget, WidgetRef};

pub const MENU_OPTIONS: &[&str] = &[
    "tearoff", "background", "foreground", "font", "activebackground", "activeforeground",
    "relief", "borderwidth", "title", "cursor", "postcommand", "takefocus", "selectcolor",
];

pub const ENTRY_OPTIONS: &[&str] = &[
    "label", "command", "accelerator", "underline", "state", "font", "foreground",
    "background", "image", "compound", "menu", "variable", "value",
];

pub const OPTIONMENU_OPTIONS: &[&str] = &[
    "text", "textvariable", "menu", "width", "background", "foreground", "font", "relief",
    "borderwidth", "state", "anchor", "direction", "indicatoron", "highlightthickness",
    "cursor", "takefocus", "padx", "pady", "activebackground", "activeforeground",
];

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Command,
    Separator,
    Cascade,
    Checkbutton,
    Radiobutton,
}

impl EntryKind {
    fn parse(kind: &str) -> Option<Self> {
        match kind {
            "command" => Some(EntryKind::Command),
            "separator" => Some(EntryKind::Separator),
            "cascade" => Some(EntryKind::Cascade),
            "checkbutton" => Some(EntryKind::Checkbutton),
            "radiobutton" => Some(EntryKind::Radiobutton),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            EntryKind::Command => "command",
            EntryKind::Separator => "separator",
            EntryKind::Cascade => "cascade",
            EntryKind::Checkbutton => "checkbutton",
            EntryKind::Radiobutton => "radiobutton",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub kind: EntryKind,
    pub options: Kwargs,
}

impl MenuEntry {
    pub fn label(&self) -> Option<&Value> {
        self.options.get("label")
    }
}

#[derive(Debug)]
pub struct Menu {
    base: Base,
    entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn new(master: &WidgetRef) -> Self {
        Self {
            base: Base::new("Menu", MENU_OPTIONS).with_master(master),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Entry labels in display form.
    pub fn labels(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(MenuEntry::label)
            .map(Value::to_string)
            .collect()
    }

    fn add(&mut self, kind: EntryKind, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        check_entry_options(&kwargs)?;
        self.entries.push(MenuEntry {
            kind,
            options: kwargs,
        });
        Ok(Value::None)
    }

    /// Resolve an entry index: a number, `end` / `last`, or `none`.
    /// `None` means the menu has no such entry.
    fn index(&self, index: &Value) -> Result<Option<usize>, ToolkitError> {
        let last = self.entries.len().checked_sub(1);
        match index {
            Value::Int(i) => Ok(usize::try_from(*i).ok()),
            Value::Str(s) => match s.as_str() {
                "end" | "last" => Ok(last),
                "none" => Ok(None),
                digits => digits
                    .parse::<usize>()
                    .map(Some)
                    .map_err(|_| ToolkitError::invalid(format!("bad menu entry index \"{s}\""))),
            },
            other => Err(ToolkitError::invalid(format!(
                "bad menu entry index {}",
                other.repr()
            ))),
        }
    }

    fn entry(&self, index: &Value) -> Result<&MenuEntry, ToolkitError> {
        self.index(index)?
            .and_then(|i| self.entries.get(i))
            .ok_or_else(|| ToolkitError::invalid(format!("no menu entry at {}", index.repr())))
    }

    /// `delete(first, last=None)`: inclusive; out-of-range indices are
    /// clamped and an empty menu is left alone.
    fn delete(&mut self, args: &[Value]) -> Result<Value, ToolkitError> {
        let (first, last) = match args {
            [first] => (first, first),
            [first, last] => (first, last),
            _ => return Err(ToolkitError::invalid("delete expects one or two indices")),
        };
        let (Some(first), Some(last)) = (self.index(first)?, self.index(last)?) else {
            return Ok(Value::None);
        };
        if first < self.entries.len() && first <= last {
            let last = last.min(self.entries.len() - 1);
            self.entries.drain(first..=last);
        }
        Ok(Value::None)
    }
}

impl Widget for Menu {
    fn class_name(&self) -> &str {
        self.base.class()
    }

    fn call(&mut self, method: &str, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        match method {
            "add_command" => self.add(EntryKind::Command, kwargs),
            "add_separator" => self.add(EntryKind::Separator, kwargs),
            "add_cascade" => self.add(EntryKind::Cascade, kwargs),
            "add_checkbutton" => self.add(EntryKind::Checkbutton, kwargs),
            "add_radiobutton" => self.add(EntryKind::Radiobutton, kwargs),
            "add" => {
                let kind = args
                    .first()
                    .and_then(Value::as_str)
                    .and_then(EntryKind::parse)
                    .ok_or_else(|| ToolkitError::invalid("add expects an entry type"))?;
                self.add(kind, kwargs)
            }
            "delete" => self.delete(&args),
            "index" => {
                let index = args
                    .first()
                    .ok_or_else(|| ToolkitError::invalid("index expects an index"))?;
                Ok(self
                    .index(index)?
                    .map(Value::from)
                    .unwrap_or_default())
            }
            "type" => {
                let index = args
                    .first()
                    .ok_or_else(|| ToolkitError::invalid("type expects an index"))?;
                Ok(Value::from(self.entry(index)?.kind.name()))
            }
            "entrycget" => match args.as_slice() {
                [index, Value::Str(option)] => {
                    if !ENTRY_OPTIONS.contains(&option.as_str()) {
                        return Err(ToolkitError::UnknownOption {
                            class: "menu entry".into(),
                            option: option.clone(),
                        });
                    }
                    let entry = self.entry(index)?;
                    Ok(entry.options.get(option).cloned().unwrap_or_default())
                }
                _ => Err(ToolkitError::invalid("entrycget expects an index and an option")),
            },
            "entryconfigure" | "entryconfig" => {
                check_entry_options(&kwargs)?;
                let index = args
                    .first()
                    .ok_or_else(|| ToolkitError::invalid("entryconfigure expects an index"))?;
                let at = self
                    .index(index)?
                    .filter(|i| *i < self.entries.len())
                    .ok_or_else(|| ToolkitError::invalid(format!("no menu entry at {}", index.repr())))?;
                self.entries[at].options.extend(kwargs);
                Ok(Value::None)
            }
            _ => self
                .base
                .call(method, args, kwargs)
                .unwrap_or_else(|| Err(self.base.unknown_method(method))),
        }
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

fn check_entry_options(kwargs: &Kwargs) -> Result<(), ToolkitError> {
    match kwargs.keys().find(|key| !ENTRY_OPTIONS.contains(&key.as_str())) {
        Some(bad) => Err(ToolkitError::UnknownOption {
            class: "menu entry".into(),
            option: bad.clone(),
        }),
        None => Ok(()),
    }
}

/// `Menu(master, **options)`.
pub fn constructor() -> Constructor {
    wrap(|master, args, kwargs| {
        let mut menu = Menu::new(master);
        menu.base.init(args, kwargs)?;
        Ok(WidgetRef::new(menu).into())
    })
}

/// Run the command of entry `index`, as if the user picked it.
///
/// Works on any widget that answers `entrycget`. The menu is not borrowed
/// while the command runs.
pub fn activate(menu: &WidgetRef, index: usize) -> Result<Value, ToolkitError> {
    let command = menu.call(
        "entrycget",
        vec![Value::from(index), Value::from("command")],
        Kwargs::new(),
    )?;
    match command {
        Value::None => Ok(Value::None),
        command => command.call(Args::new(), Kwargs::new()),
    }
}

// ---------------------------------------------------------------------------
// OptionMenu
// ---------------------------------------------------------------------------

/// A menu command that stores `value` in `variable`, then tells `callback`.
pub fn setter(variable: &Variable, value: Value, callback: Option<Value>) -> Callback {
    let variable = variable.clone();
    Callback::new(format!("set {}", value.repr()), move |_, _| {
        variable.set(value.clone());
        match &callback {
            Some(callback) => callback.call(vec![value.clone()], Kwargs::new()),
            None => Ok(Value::None),
        }
    })
}

/// `OptionMenu(master, variable, value, *values, command=None)`.
///
/// The menubutton displays `variable`; its `menu` option holds a menu with
/// one entry per value.
pub fn option_menu_constructor() -> Constructor {
    wrap(|master, args, mut options| {
        let callback = options.shift_remove("command");
        if let Some(bad) = options.keys().next() {
            return Err(ToolkitError::UnknownOption {
                class: "OptionMenu".into(),
                option: bad.clone(),
            });
        }
        let mut args = args.into_iter();
        let variable = match args.next() {
            Some(Value::Variable(variable)) => variable,
            Some(other) => {
                return Err(ToolkitError::invalid(format!(
                    "OptionMenu expects a variable, got {}",
                    other.repr()
                )))
            }
            None => return Err(ToolkitError::invalid("OptionMenu expects a variable and a value")),
        };
        let values: Vec<Value> = args.collect();
        if values.is_empty() {
            return Err(ToolkitError::invalid("OptionMenu expects at least one value"));
        }

        let button = WidgetRef::new(Basic::new("Menubutton", OPTIONMENU_OPTIONS).with_master(master));
        button.set("textvariable", variable.clone())?;
        button.set("indicatoron", true)?;
        button.set("relief", "raised")?;

        let mut menu = Menu::new(&button);
        menu.base.configure("tearoff", Value::Bool(false))?;
        for value in values {
            let command = setter(&variable, value.clone(), callback.clone());
            menu.add(
                EntryKind::Command,
                kwargs([
                    ("label", Value::Str(value.to_string())),
                    ("command", Value::from(command)),
                ]),
            )?;
        }
        button.set("menu", WidgetRef::new(menu))?;
        Ok(button.into())
    })
}

// ===========================================================================
// Tests
// ===========================================================================
