//! Buttons: plain and themed. The only behavior is running the command.

use super::basic::{Basic, BUTTON_OPTIONS, TTK_BUTTON_OPTIONS};
use crate::dispatch::Constructor;
use crate::error::ToolkitError;
use crate::value::{Args, Value};
use crate::widget::WidgetRef;

pub fn constructor() -> Constructor {
    Basic::constructor("Button", BUTTON_OPTIONS)
}

pub fn themed_constructor() -> Constructor {
    Basic::constructor("TButton", TTK_BUTTON_OPTIONS)
}

/// Simulate a click: run the button's `command` unless it is disabled.
///
/// The button is not borrowed while the command runs.
pub fn invoke(button: &WidgetRef) -> Result<Value, ToolkitError> {
    if button.get("state")?.as_str() == Some("disabled") {
        return Ok(Value::None);
    }
    button.invoke_option("command", Args::new())
}
