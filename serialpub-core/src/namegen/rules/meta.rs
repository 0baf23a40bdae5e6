//! Rules that cross several levels at once

use super::{part, volume, RuleCall, RuleContext};
use crate::error::{NamingError, Result};
use crate::namegen::legacy::{legacy_folder, legacy_title};
use crate::namegen::text::ends_with_punctuation;
use crate::namegen::value::Value;
use crate::types::{Part, Volume};

/// `v_to_series` then `p_to_series`: whatever the seed, the result is a series
pub(super) fn to_series(value: Value, call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    let value = volume::v_to_series(value, call, ctx)?;
    part::p_to_series(value, call, ctx)
}

/// Collapse into a string
///
/// A series name is kept (with a trailing ':' when `add_colon` is set and the
/// name doesn't already end with punctuation); catalog titles are dropped,
/// only rendered annotations remain.
pub(super) fn to_string(value: Value, call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    let add_colon = call.int(0) != 0;
    let head = match &value {
        Value::String(_) => return Ok(value),
        Value::SeriesString(s)
            if add_colon && !s.name.is_empty() && !ends_with_punctuation(&s.name) =>
        {
            Some(format!("{}:", s.name))
        }
        Value::SeriesString(s) => Some(s.name.clone()),
        _ => None,
    };
    Ok(value.collapse(head))
}

pub(super) fn legacy_t(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    let request = ctx.request;
    let (volumes, parts): (Vec<Volume>, Vec<Part>) = match &value {
        Value::Part(p) => {
            let volume = ctx.volume_of_part(p.part)?;
            (
                vec![request.volumes[volume].clone()],
                vec![request.parts[p.part].clone()],
            )
        }
        Value::Volume(v) => (
            vec![request.volumes[v.volume].clone()],
            v.parts.iter().map(|&i| request.parts[i].clone()).collect(),
        ),
        Value::Series(s) => (
            s.volumes.iter().map(|&i| request.volumes[i].clone()).collect(),
            s.parts.iter().map(|&i| request.parts[i].clone()).collect(),
        ),
        Value::SeriesString(s) => (
            s.volumes.iter().map(|&i| request.volumes[i].clone()).collect(),
            s.parts.iter().map(|&i| request.parts[i].clone()).collect(),
        ),
        Value::String(_) => {
            return Err(NamingError::TypeMismatch {
                channel: ctx.channel,
                rule: "legacy_t",
                variant: value.variant(),
            })
        }
    };
    Ok(Value::string(legacy_title(
        &request.series,
        &volumes,
        &parts,
        request.fc,
    )))
}

pub(super) fn legacy_f(_value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(Value::string(legacy_folder(&ctx.request.series)))
}
