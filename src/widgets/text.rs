//! Multi-line text: `line.column` indices, editing and scrolled views.
//!
//! The buffer always ends in a newline, as the real widget's does. Views are
//! measured in whole lines (vertically) and characters (horizontally); the
//! visible extent is the widget's `height` and `width` options. Every view
//! change is reported through `yscrollcommand` / `xscrollcommand` with the
//! visible `(first, last)` fractions.

use std::any::Any;

use super::base::Base;
use super::scrollbar::Scrollbar;
use crate::dispatch::{constructor as wrap, Constructor};
use crate::error::ToolkitError;
use crate::value::{Args, Callback, Kwargs, Value};
use crate::widget::{ScrollAxis, Widget, WidgetRef};

pub const TEXT_OPTIONS: &[&str] = &[
    "background", "borderwidth", "relief", "width", "height", "font", "foreground", "padx",
    "pady", "wrap", "state", "yscrollcommand", "xscrollcommand", "undo", "cursor", "takefocus",
    "highlightthickness", "insertbackground", "spacing1", "spacing2", "spacing3", "tabs",
];

const DEFAULT_HEIGHT: usize = 24;
const DEFAULT_WIDTH: usize = 80;

#[derive(Debug)]
pub struct Text {
    base: Base,
    chars: Vec<char>,
    /// First visible line (0-based).
    top: usize,
    /// First visible column.
    left: usize,
    /// The built-in vertical scrollbar of a scrolled text.
    vbar: Option<WidgetRef>,
}

impl Text {
    pub fn new(master: &WidgetRef) -> Self {
        Self {
            base: Base::new("Text", TEXT_OPTIONS).with_master(master),
            chars: vec!['\n'],
            top: 0,
            left: 0,
            vbar: None,
        }
    }

    /// The buffer without its trailing newline.
    pub fn content(&self) -> String {
        self.chars[..self.end_minus_one()].iter().collect()
    }

    pub fn vbar(&self) -> Option<&WidgetRef> {
        self.vbar.as_ref()
    }

    fn end_minus_one(&self) -> usize {
        self.chars.len() - 1
    }

    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        starts.extend(
            self.chars
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == '\n')
                .map(|(i, _)| i + 1),
        );
        starts
    }

    /// Number of lines, not counting the empty one after the final newline.
    fn line_count(&self) -> usize {
        self.line_starts().len() - 1
    }

    fn longest_line(&self) -> usize {
        self.chars
            .split(|c| *c == '\n')
            .map(<[char]>::len)
            .max()
            .unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Indices
    // -----------------------------------------------------------------------

    /// Character offset for an index: `line.column`, `line.end`, `end`, with
    /// optional `+Nc` / `-Nc` modifiers. Floats are read as `line.column`.
    fn offset(&self, index: &Value) -> Result<usize, ToolkitError> {
        let text = match index {
            Value::Str(s) => s.trim().to_owned(),
            Value::Float(x) => format!("{x:?}"),
            Value::Int(line) => format!("{line}.0"),
            other => return Err(bad_index(&other.repr())),
        };
        let split = text
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '+' || *c == '-')
            .map_or(text.len(), |(i, _)| i);
        let (base, modifiers) = text.split_at(split);
        let mut offset = self.base_offset(base).ok_or_else(|| bad_index(&text))?;
        if !modifiers.is_empty() {
            offset = apply_modifiers(offset, modifiers).ok_or_else(|| bad_index(&text))?;
        }
        Ok(offset.min(self.chars.len()))
    }

    fn base_offset(&self, base: &str) -> Option<usize> {
        if base == "end" {
            return Some(self.chars.len());
        }
        let (line, column) = base.split_once('.')?;
        let line: usize = line.parse().ok()?;
        let starts = self.line_starts();
        let line = line.max(1);
        if line > starts.len() - 1 {
            return Some(self.chars.len());
        }
        let start = starts[line - 1];
        let line_end = starts[line] - 1;
        if column == "end" {
            return Some(line_end);
        }
        let column: usize = column.parse().ok()?;
        Some((start + column).min(line_end))
    }

    /// `line.column` for a character offset.
    fn index_of(&self, offset: usize) -> String {
        let starts = self.line_starts();
        let line = starts.partition_point(|start| *start <= offset);
        format!("{}.{}", line, offset - starts[line - 1])
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    fn insert(&mut self, args: &[Value]) -> Result<Value, ToolkitError> {
        let (index, rest) = args
            .split_first()
            .ok_or_else(|| ToolkitError::invalid("insert expects an index and text"))?;
        if rest.is_empty() {
            return Err(ToolkitError::invalid("insert expects an index and text"));
        }
        let mut at = self.offset(index)?.min(self.end_minus_one());
        // Alternating text and tag arguments; tags are accepted and ignored.
        for chunk in rest.chunks(2) {
            let inserted: Vec<char> = match &chunk[0] {
                Value::Str(s) => s.chars().collect(),
                other => other.to_string().chars().collect(),
            };
            let count = inserted.len();
            self.chars.splice(at..at, inserted);
            at += count;
        }
        self.changed()
    }

    fn delete(&mut self, args: &[Value]) -> Result<Value, ToolkitError> {
        let limit = self.end_minus_one();
        let (start, end) = match args {
            [first] => {
                let start = self.offset(first)?.min(limit);
                (start, (start + 1).min(limit))
            }
            [first, last] => (self.offset(first)?.min(limit), self.offset(last)?.min(limit)),
            _ => return Err(ToolkitError::invalid("delete expects one or two indices")),
        };
        if end > start {
            self.chars.drain(start..end);
        }
        self.changed()
    }

    fn get(&self, args: &[Value]) -> Result<Value, ToolkitError> {
        let (start, end) = match args {
            [first] => {
                let start = self.offset(first)?;
                (start, (start + 1).min(self.chars.len()))
            }
            [first, last] => (self.offset(first)?, self.offset(last)?),
            _ => return Err(ToolkitError::invalid("get expects one or two indices")),
        };
        if end <= start {
            return Ok(Value::from(""));
        }
        Ok(Value::Str(self.chars[start..end].iter().collect()))
    }

    fn changed(&mut self) -> Result<Value, ToolkitError> {
        self.clamp_views();
        self.notify(ScrollAxis::Vertical)?;
        self.notify(ScrollAxis::Horizontal)?;
        Ok(Value::None)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    fn visible(&self, axis: ScrollAxis) -> usize {
        let (option, default) = match axis {
            ScrollAxis::Vertical => ("height", DEFAULT_HEIGHT),
            ScrollAxis::Horizontal => ("width", DEFAULT_WIDTH),
        };
        self.base
            .options()
            .get(option)
            .and_then(Value::as_int)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(default)
    }

    fn total(&self, axis: ScrollAxis) -> usize {
        let total = match axis {
            ScrollAxis::Vertical => self.line_count(),
            ScrollAxis::Horizontal => self.longest_line(),
        };
        total.max(1)
    }

    fn position(&mut self, axis: ScrollAxis) -> &mut usize {
        match axis {
            ScrollAxis::Vertical => &mut self.top,
            ScrollAxis::Horizontal => &mut self.left,
        }
    }

    fn max_position(&self, axis: ScrollAxis) -> usize {
        self.total(axis).saturating_sub(self.visible(axis))
    }

    fn clamp_views(&mut self) {
        for axis in [ScrollAxis::Vertical, ScrollAxis::Horizontal] {
            let max = self.max_position(axis);
            let position = self.position(axis);
            *position = (*position).min(max);
        }
    }

    /// The visible `(first, last)` fractions along `axis`.
    pub fn fractions(&self, axis: ScrollAxis) -> (f64, f64) {
        let total = self.total(axis);
        let first = match axis {
            ScrollAxis::Vertical => self.top,
            ScrollAxis::Horizontal => self.left,
        };
        let last = (first + self.visible(axis)).min(total);
        (first as f64 / total as f64, last as f64 / total as f64)
    }

    /// `yview()` / `xview()` with no arguments reports the fractions;
    /// `("moveto", f)` and `("scroll", n, "units" | "pages")` move the view.
    fn view(&mut self, axis: ScrollAxis, args: &[Value]) -> Result<Value, ToolkitError> {
        let max = self.max_position(axis);
        let target = match args {
            [] => {
                let (first, last) = self.fractions(axis);
                return Ok(Value::List(vec![Value::Float(first), Value::Float(last)]));
            }
            [Value::Str(op), fraction] if op == "moveto" => {
                let fraction = number(fraction)?;
                (fraction * self.total(axis) as f64).floor().max(0.0) as usize
            }
            [Value::Str(op), amount, Value::Str(what)] if op == "scroll" => {
                let amount = number(amount)? as i64;
                let step = match what.as_str() {
                    "units" => amount,
                    "pages" => amount.saturating_mul(to_i64(self.visible(axis))),
                    other => {
                        return Err(ToolkitError::invalid(format!(
                            "bad argument \"{other}\": must be units or pages"
                        )))
                    }
                };
                let current = to_i64(*self.position(axis));
                usize::try_from(current.saturating_add(step).max(0)).unwrap_or(usize::MAX)
            }
            _ => {
                return Err(ToolkitError::invalid(format!(
                    "{} expects moveto or scroll",
                    axis.view_method()
                )))
            }
        };
        *self.position(axis) = target.min(max);
        self.notify(axis)?;
        Ok(Value::None)
    }

    /// Scroll so that `index` is visible.
    fn see(&mut self, args: &[Value]) -> Result<Value, ToolkitError> {
        let index = args
            .first()
            .ok_or_else(|| ToolkitError::invalid("see expects an index"))?;
        let offset = self.offset(index)?;
        let line = self.line_starts().partition_point(|start| *start <= offset) - 1;
        let visible = self.visible(ScrollAxis::Vertical);
        if line < self.top {
            self.top = line;
        } else if line >= self.top + visible {
            self.top = line + 1 - visible;
        }
        self.top = self.top.min(self.max_position(ScrollAxis::Vertical));
        self.notify(ScrollAxis::Vertical)?;
        Ok(Value::None)
    }

    fn notify(&self, axis: ScrollAxis) -> Result<(), ToolkitError> {
        let command = self
            .base
            .options()
            .get(axis.command_option())
            .cloned()
            .unwrap_or_default();
        if command.is_none() {
            return Ok(());
        }
        let (first, last) = self.fractions(axis);
        command.call(vec![Value::Float(first), Value::Float(last)], Kwargs::new())?;
        Ok(())
    }
}

impl Widget for Text {
    fn class_name(&self) -> &str {
        self.base.class()
    }

    fn call(&mut self, method: &str, args: Args, kwargs: Kwargs) -> Result<Value, ToolkitError> {
        match method {
            "insert" => self.insert(&args),
            "delete" => self.delete(&args),
            "get" => self.get(&args),
            "index" => {
                let index = args
                    .first()
                    .ok_or_else(|| ToolkitError::invalid("index expects an index"))?;
                let offset = self.offset(index)?;
                Ok(Value::Str(self.index_of(offset)))
            }
            "see" => self.see(&args),
            "yview" => self.view(ScrollAxis::Vertical, &args),
            "xview" => self.view(ScrollAxis::Horizontal, &args),
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

fn bad_index(index: &str) -> ToolkitError {
    ToolkitError::invalid(format!("bad text index \"{index}\""))
}

fn apply_modifiers(mut offset: usize, modifiers: &str) -> Option<usize> {
    let mut rest = modifiers.trim();
    while !rest.is_empty() {
        let sign = rest.chars().next()?;
        let body = rest[sign.len_utf8()..].trim_start();
        let digits = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
        let count: usize = body[..digits].parse().ok()?;
        let after = body[digits..].trim_start();
        let unit = after
            .find(|c: char| c == '+' || c == '-')
            .unwrap_or(after.len());
        if !matches!(after[..unit].trim(), "c" | "chars") {
            return None;
        }
        offset = match sign {
            '+' => offset.saturating_add(count),
            '-' => offset.saturating_sub(count),
            _ => return None,
        };
        rest = &after[unit..];
    }
    Some(offset)
}

fn number(value: &Value) -> Result<f64, ToolkitError> {
    let parsed = match value {
        Value::Str(s) => s.trim().parse().ok(),
        other => other.as_float(),
    };
    parsed.ok_or_else(|| ToolkitError::invalid(format!("expected a number, got {}", value.repr())))
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// `Text(master, **options)`.
pub fn constructor() -> Constructor {
    wrap(|master, args, kwargs| {
        let mut text = Text::new(master);
        text.base.init(args, kwargs)?;
        Ok(WidgetRef::new(text).into())
    })
}

/// `ScrolledText(master, **options)`: a text with its own vertical scrollbar
/// already wired in both directions.
pub fn scrolled_constructor() -> Constructor {
    wrap(|master, args, kwargs| {
        let mut text = Text::new(master);
        text.base.init(args, kwargs)?;
        let text = WidgetRef::new(text);
        let bar = WidgetRef::new(Scrollbar::new(master));
        bar.set("orient", "vertical")?;
        bar.set("command", Callback::bound(&text, ScrollAxis::Vertical.view_method()))?;
        text.set(
            ScrollAxis::Vertical.command_option(),
            Callback::bound(&bar, "set"),
        )?;
        text.with_mut(|t: &mut Text| t.vbar = Some(bar));
        Ok(text.into())
    })
}

/// The built-in scrollbar of a scrolled text.
pub fn vbar(text: &WidgetRef) -> Option<WidgetRef> {
    text.with(|t: &Text| t.vbar.clone()).flatten()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::kwargs;
    use crate::widgets::basic::Basic;
    use crate::widgets::scrollbar;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn text(options: Kwargs) -> WidgetRef {
        let root = WidgetRef::new(Basic::tk());
        let value = constructor()(&root, Args::new(), options).unwrap();
        value.as_widget().unwrap().clone()
    }

    fn call(w: &WidgetRef, method: &str, args: Vec<Value>) -> Value {
        w.call(method, args, Kwargs::new()).unwrap()
    }

    fn lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_get() {
        let t = text(Kwargs::new());
        call(&t, "insert", vec!["end".into(), "hello\nworld".into()]);
        assert_eq!(call(&t, "get", vec!["1.0".into(), "end".into()]), Value::from("hello\nworld\n"));
        assert_eq!(call(&t, "get", vec!["2.0".into(), "2.end".into()]), Value::from("world"));
        assert_eq!(call(&t, "get", vec!["1.0".into(), "end-1c".into()]), Value::from("hello\nworld"));
        assert_eq!(call(&t, "get", vec!["1.1".into()]), Value::from("e"));
    }

    #[test]
    fn float_indices() {
        let t = text(Kwargs::new());
        call(&t, "insert", vec![Value::Float(1.0), "abc".into()]);
        call(&t, "insert", vec![Value::Float(1.1), "X".into()]);
        assert_eq!(t.with(|t: &Text| t.content()), Some("aXbc".to_owned()));
    }

    #[test]
    fn delete_ranges() {
        let t = text(Kwargs::new());
        call(&t, "insert", vec!["1.0".into(), "abcdef".into()]);
        call(&t, "delete", vec!["1.0".into()]);
        call(&t, "delete", vec!["1.2".into(), "1.4".into()]);
        assert_eq!(t.with(|t: &Text| t.content()), Some("bcf".to_owned()));
        call(&t, "delete", vec!["1.0".into(), "end".into()]);
        assert_eq!(call(&t, "get", vec!["1.0".into(), "end".into()]), Value::from("\n"));
    }

    #[test]
    fn index_normalizes() {
        let t = text(Kwargs::new());
        call(&t, "insert", vec!["1.0".into(), "ab\ncd".into()]);
        assert_eq!(call(&t, "index", vec!["end".into()]), Value::from("3.0"));
        assert_eq!(call(&t, "index", vec!["1.99".into()]), Value::from("1.2"));
        assert_eq!(call(&t, "index", vec!["1.0+4c".into()]), Value::from("2.1"));
        assert_eq!(call(&t, "index", vec!["9.0".into()]), Value::from("3.0"));
        assert_eq!(
            call(&t, "index", vec![format!("1.0+{}c", usize::MAX).into()]),
            Value::from("3.0")
        );
    }

    #[test]
    fn bad_indices() {
        let t = text(Kwargs::new());
        assert!(t.call("get", vec!["here".into()], Kwargs::new()).is_err());
        assert!(t.call("get", vec!["1.0+2w".into()], Kwargs::new()).is_err());
        assert!(t.call("insert", vec!["1.0".into()], Kwargs::new()).is_err());
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    #[test]
    fn short_content_is_fully_visible() {
        let t = text(kwargs([("height", 10)]));
        call(&t, "insert", vec!["end".into(), lines(3).into()]);
        let view = call(&t, "yview", vec![]);
        assert_eq!(view, Value::List(vec![Value::Float(0.0), Value::Float(1.0)]));
    }

    #[test]
    fn moveto_and_scroll() {
        let t = text(kwargs([("height", 10)]));
        call(&t, "insert", vec!["1.0".into(), lines(40).into()]);
        call(&t, "yview", vec!["moveto".into(), Value::Float(0.5)]);
        assert_eq!(
            call(&t, "yview", vec![]),
            Value::List(vec![Value::Float(0.5), Value::Float(0.75)])
        );
        call(&t, "yview", vec!["scroll".into(), Value::Int(-1), "pages".into()]);
        assert_eq!(t.with(|t: &Text| t.top), Some(10));
        call(&t, "yview", vec!["scroll".into(), Value::Int(100), "units".into()]);
        assert_eq!(t.with(|t: &Text| t.top), Some(30));
        assert!(t
            .call("yview", vec!["scroll".into(), Value::Int(1), "lines".into()], Kwargs::new())
            .is_err());
    }

    #[test]
    fn huge_scroll_amounts_clamp() {
        let t = text(kwargs([("height", 10)]));
        call(&t, "insert", vec!["1.0".into(), lines(40).into()]);
        call(&t, "yview", vec!["scroll".into(), Value::Float(1e300), "pages".into()]);
        assert_eq!(t.with(|t: &Text| t.top), Some(30));
        call(&t, "yview", vec!["scroll".into(), Value::Float(-1e300), "pages".into()]);
        assert_eq!(t.with(|t: &Text| t.top), Some(0));
        call(&t, "yview", vec!["scroll".into(), Value::Float(1e300), "units".into()]);
        assert_eq!(t.with(|t: &Text| t.top), Some(30));
    }

    #[test]
    fn view_changes_notify_scroll_command() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let t = text(kwargs([("height", 10)]));
        t.set(
            "yscrollcommand",
            Callback::new("log", move |args, _| {
                log.borrow_mut().push(args);
                Ok(Value::None)
            }),
        )
        .unwrap();
        call(&t, "insert", vec!["1.0".into(), lines(20).into()]);
        call(&t, "yview", vec!["moveto".into(), Value::Float(1.0)]);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], vec![Value::Float(0.0), Value::Float(0.5)]);
        assert_eq!(seen[1], vec![Value::Float(0.5), Value::Float(1.0)]);
    }

    #[test]
    fn see_scrolls_index_into_view() {
        let t = text(kwargs([("height", 5)]));
        call(&t, "insert", vec!["1.0".into(), lines(20).into()]);
        call(&t, "see", vec!["12.0".into()]);
        assert_eq!(t.with(|t: &Text| t.top), Some(7));
        call(&t, "see", vec!["1.0".into()]);
        assert_eq!(t.with(|t: &Text| t.top), Some(0));
    }

    #[test]
    fn horizontal_view_follows_longest_line() {
        let t = text(kwargs([("width", 10)]));
        call(&t, "insert", vec!["1.0".into(), "x".repeat(40).into()]);
        call(&t, "xview", vec!["moveto".into(), Value::Float(0.25)]);
        assert_eq!(
            call(&t, "xview", vec![]),
            Value::List(vec![Value::Float(0.25), Value::Float(0.5)])
        );
    }

    // -----------------------------------------------------------------------
    // ScrolledText
    // -----------------------------------------------------------------------

    #[test]
    fn scrolled_text_wires_its_scrollbar() {
        let root = WidgetRef::new(Basic::tk());
        let value = scrolled_constructor()(&root, Args::new(), kwargs([("height", 10)])).unwrap();
        let t = value.as_widget().unwrap().clone();
        let bar = vbar(&t).unwrap();
        call(&t, "insert", vec!["1.0".into(), lines(40).into()]);
        assert_eq!(
            bar.with(|b: &Scrollbar| b.fractions()),
            Some((0.0, 0.25))
        );
        scrollbar::drag(&bar, 0.5).unwrap();
        assert_eq!(t.with(|t: &Text| t.top), Some(20));
        assert_eq!(bar.with(|b: &Scrollbar| b.fractions()), Some((0.5, 0.75)));
    }

    #[test]
    fn plain_text_has_no_vbar() {
        assert!(vbar(&text(Kwargs::new())).is_none());
    }
}
