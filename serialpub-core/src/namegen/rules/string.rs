//! str_*: rules on the terminal string

use super::{RuleCall, RuleContext};
use crate::error::Result;
use crate::namegen::text::to_safe_filename;
use crate::namegen::value::{StringValue, Value};

pub(super) fn str_rm_space(
    value: Value,
    _call: &RuleCall,
    _ctx: &RuleContext<'_>,
) -> Result<Value> {
    Ok(map_string(value, |s| s.replace(' ', "")))
}

pub(super) fn str_replace_space(
    value: Value,
    call: &RuleCall,
    _ctx: &RuleContext<'_>,
) -> Result<Value> {
    Ok(map_string(value, |s| s.replace(' ', call.str(0))))
}

pub(super) fn str_filesafe(value: Value, call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_string(value, |s| to_safe_filename(s, call.str(0), call.str(1))))
}

fn map_string(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(StringValue {
            text: f(&s.text),
            marker: s.marker,
        }),
        other => other,
    }
}
